//! Communicator handles and the `set` / `get` exchange primitives.

use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::codec::JsonCodec;
use crate::comm::{ChannelSet, Claimed, SlotKey};
use crate::error::CommError;
use crate::locality::{LocalityId, Tag};

/// How long a receiver parked at shutdown keeps waiting for an in-flight
/// deposit before failing with [`CommError::Shutdown`].
const SHUTDOWN_DRAIN: Duration = Duration::from_millis(100);

/// Handle to one site's view of a named channel set.
///
/// Created by [`CommunicatorRegistry`](crate::CommunicatorRegistry); opaque,
/// exclusively owned, no explicit teardown (dropping the handle is enough).
///
/// # Example
///
/// ```rust,ignore
/// let comm = registry.create_channel_communicator("/ring/", n, me)?;
/// comm.set(successor, &value, Tag(0)).await?;
/// let received: i32 = comm.get(predecessor, Tag(0)).await?;
/// ```
#[derive(Debug)]
pub struct ChannelCommunicator {
    set_state: Rc<ChannelSet>,
    this_site: LocalityId,
    shutdown: CancellationToken,
}

impl ChannelCommunicator {
    pub(crate) fn new(
        set_state: Rc<ChannelSet>,
        this_site: LocalityId,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            set_state,
            this_site,
            shutdown,
        }
    }

    /// Name of the channel set this handle belongs to.
    pub fn name(&self) -> &str {
        self.set_state.name()
    }

    /// Number of sites in the channel set.
    pub fn num_sites(&self) -> u32 {
        self.set_state.num_sites()
    }

    /// The site this handle acts as.
    pub fn this_site(&self) -> LocalityId {
        self.this_site
    }

    fn check_site(&self, site: LocalityId) -> Result<(), CommError> {
        if site.as_u32() >= self.num_sites() {
            return Err(CommError::SiteOutOfRange {
                site: site.as_u32(),
                num_sites: self.num_sites(),
            });
        }
        Ok(())
    }

    /// Send `value` to `that_site` under `tag`.
    ///
    /// Buffered semantics: the returned future resolves once the value is
    /// deposited into the destination's channel slot, without waiting for the
    /// matching [`get`](ChannelCommunicator::get). Site validation and codec
    /// failures are reported through the future.
    pub async fn set<T: Serialize>(
        &self,
        that_site: LocalityId,
        value: &T,
        tag: Tag,
    ) -> Result<(), CommError> {
        self.check_site(that_site)?;
        let bytes = JsonCodec::encode(value)?;
        let key = SlotKey {
            to: that_site.as_u32(),
            from: self.this_site.as_u32(),
            tag: tag.0,
        };
        tracing::debug!(
            name = self.name(),
            from = %self.this_site,
            to = %that_site,
            %tag,
            "set: depositing value"
        );
        self.set_state.table().deposit(key, bytes);
        Ok(())
    }

    /// Receive the value sent *by* `that_site` to this site under `tag`.
    ///
    /// Resolves as soon as such a value is available, whether it was
    /// deposited before or after this call. If the runtime begins shutting
    /// down while the receive is parked, a short drain window lets in-flight
    /// deposits land; after that the future fails with
    /// [`CommError::Shutdown`] instead of hanging forever.
    pub async fn get<T: DeserializeOwned>(
        &self,
        that_site: LocalityId,
        tag: Tag,
    ) -> Result<T, CommError> {
        self.check_site(that_site)?;
        let key = SlotKey {
            to: self.this_site.as_u32(),
            from: that_site.as_u32(),
            tag: tag.0,
        };
        tracing::debug!(
            name = self.name(),
            at = %self.this_site,
            from = %that_site,
            %tag,
            "get: claiming value"
        );
        let mut rx = match self.set_state.table().claim(key) {
            Claimed::Ready(bytes) => return JsonCodec::decode(&bytes),
            Claimed::Pending(rx) => rx,
        };

        tokio::select! {
            biased;
            result = &mut rx => match result {
                Ok(bytes) => JsonCodec::decode(&bytes),
                Err(_) => Err(CommError::Disconnected),
            },
            _ = self.shutdown.cancelled() => {
                tracing::debug!(
                    name = self.name(),
                    at = %self.this_site,
                    from = %that_site,
                    "get parked at shutdown, draining"
                );
                match tokio::time::timeout(SHUTDOWN_DRAIN, &mut rx).await {
                    Ok(Ok(bytes)) => JsonCodec::decode(&bytes),
                    Ok(Err(_)) => Err(CommError::Disconnected),
                    Err(_) => Err(CommError::Shutdown),
                }
            }
        }
    }
}
