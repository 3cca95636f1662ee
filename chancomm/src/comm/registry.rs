//! Named rendezvous for channel sets.
//!
//! The registry maps channel-set names to shared per-set state. All
//! participants of a set call
//! [`CommunicatorRegistry::create_channel_communicator`] with the identical
//! name: the first call allocates the set, every later call joins it. The
//! registry is shared between locality tasks as `Rc<RefCell<..>>`
//! (current-thread runtime, no `Send` required).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tokio_util::sync::CancellationToken;

use crate::comm::channel::ChannelCommunicator;
use crate::comm::matching::MatchingTable;
use crate::error::CommError;
use crate::locality::LocalityId;

/// Shared state of one named channel set.
#[derive(Debug)]
pub(crate) struct ChannelSet {
    name: String,
    num_sites: u32,
    joined: RefCell<HashSet<u32>>,
    table: MatchingTable,
}

impl ChannelSet {
    fn new(name: &str, num_sites: u32) -> Self {
        Self {
            name: name.to_string(),
            num_sites,
            joined: RefCell::new(HashSet::new()),
            table: MatchingTable::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn num_sites(&self) -> u32 {
        self.num_sites
    }

    pub(crate) fn table(&self) -> &MatchingTable {
        &self.table
    }
}

/// Rendezvous point handing out [`ChannelCommunicator`] handles.
///
/// Cloning is cheap and shares the underlying map; the runtime gives every
/// locality a clone of one registry so that identical names resolve to the
/// same channel set.
#[derive(Debug, Clone)]
pub struct CommunicatorRegistry {
    sets: Rc<RefCell<HashMap<String, Rc<ChannelSet>>>>,
    shutdown: CancellationToken,
}

impl CommunicatorRegistry {
    /// Create a standalone registry with its own shutdown token.
    ///
    /// The runtime builds its registry via [`with_shutdown`] so pending
    /// receives observe runtime shutdown; a standalone registry is mainly
    /// useful in tests.
    ///
    /// [`with_shutdown`]: CommunicatorRegistry::with_shutdown
    pub fn new() -> Self {
        Self::with_shutdown(CancellationToken::new())
    }

    /// Create a registry whose handles observe the given shutdown token.
    pub fn with_shutdown(shutdown: CancellationToken) -> Self {
        Self {
            sets: Rc::new(RefCell::new(HashMap::new())),
            shutdown,
        }
    }

    /// Create or join the channel set `name` scoped to `num_sites`
    /// participants, acting as site `this_site`.
    ///
    /// Rendezvous contract: every participant must pass the identical name
    /// and the identical `num_sites`. Errors:
    ///
    /// - [`CommError::SiteCountMismatch`] if the set exists with another size
    /// - [`CommError::SiteOutOfRange`] if `this_site >= num_sites`
    /// - [`CommError::AlreadyJoined`] if `this_site` joined this name before
    pub fn create_channel_communicator(
        &self,
        name: &str,
        num_sites: u32,
        this_site: LocalityId,
    ) -> Result<ChannelCommunicator, CommError> {
        if this_site.as_u32() >= num_sites {
            return Err(CommError::SiteOutOfRange {
                site: this_site.as_u32(),
                num_sites,
            });
        }

        let set = {
            let mut sets = self.sets.borrow_mut();
            Rc::clone(sets.entry(name.to_string()).or_insert_with(|| {
                tracing::debug!(name, num_sites, "allocating channel set");
                Rc::new(ChannelSet::new(name, num_sites))
            }))
        };

        if set.num_sites() != num_sites {
            return Err(CommError::SiteCountMismatch {
                name: name.to_string(),
                expected: set.num_sites(),
                got: num_sites,
            });
        }
        if !set.joined.borrow_mut().insert(this_site.as_u32()) {
            return Err(CommError::AlreadyJoined {
                name: name.to_string(),
                site: this_site.as_u32(),
            });
        }

        tracing::debug!(name, site = %this_site, "site joined channel set");
        Ok(ChannelCommunicator::new(
            set,
            this_site,
            self.shutdown.clone(),
        ))
    }
}

impl Default for CommunicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_resolves_to_same_set() {
        let registry = CommunicatorRegistry::new();
        let a = registry
            .create_channel_communicator("/set/", 2, LocalityId::new(0))
            .unwrap();
        let b = registry
            .create_channel_communicator("/set/", 2, LocalityId::new(1))
            .unwrap();
        assert_eq!(a.name(), b.name());
        assert_eq!(a.num_sites(), 2);
        assert_eq!(b.num_sites(), 2);
    }

    #[test]
    fn site_count_mismatch_rejected() {
        let registry = CommunicatorRegistry::new();
        registry
            .create_channel_communicator("/set/", 2, LocalityId::new(0))
            .unwrap();
        let err = registry
            .create_channel_communicator("/set/", 3, LocalityId::new(1))
            .unwrap_err();
        assert!(matches!(
            err,
            CommError::SiteCountMismatch {
                expected: 2,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn double_join_rejected() {
        let registry = CommunicatorRegistry::new();
        registry
            .create_channel_communicator("/set/", 2, LocalityId::new(0))
            .unwrap();
        let err = registry
            .create_channel_communicator("/set/", 2, LocalityId::new(0))
            .unwrap_err();
        assert!(matches!(err, CommError::AlreadyJoined { site: 0, .. }));
    }

    #[test]
    fn site_out_of_range_rejected() {
        let registry = CommunicatorRegistry::new();
        let err = registry
            .create_channel_communicator("/set/", 2, LocalityId::new(2))
            .unwrap_err();
        assert!(matches!(
            err,
            CommError::SiteOutOfRange {
                site: 2,
                num_sites: 2
            }
        ));
    }

    #[test]
    fn distinct_names_are_distinct_sets() {
        let registry = CommunicatorRegistry::new();
        // Same site may join two differently named sets.
        registry
            .create_channel_communicator("/a/", 1, LocalityId::new(0))
            .unwrap();
        registry
            .create_channel_communicator("/b/", 1, LocalityId::new(0))
            .unwrap();
    }
}
