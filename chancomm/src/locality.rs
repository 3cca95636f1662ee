//! Locality identifiers and ring topology math.
//!
//! A *locality* is one addressable participant in a run, identified by a
//! zero-based index among a fixed total count. [`Topology`] captures both
//! numbers and answers the ring-neighbor questions the exchange driver needs.

use crate::error::RuntimeError;

/// Zero-based index of one participant locality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalityId(u32);

impl LocalityId {
    /// Create a locality id from a raw index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Raw index value as usize, for table lookups.
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for LocalityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer discriminator keeping logically distinct exchanges on one
/// communicator from cross-matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tag(
    /// Raw tag value.
    pub i32,
);

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant count plus this participant's own index.
///
/// Invariant: `this_locality < num_localities`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    num_localities: u32,
    this_locality: LocalityId,
}

impl Topology {
    /// Build a topology, validating the index against the count.
    pub fn new(num_localities: u32, this_locality: LocalityId) -> Result<Self, RuntimeError> {
        if num_localities == 0 {
            return Err(RuntimeError::NoLocalities);
        }
        if this_locality.as_u32() >= num_localities {
            return Err(RuntimeError::InvalidTopology {
                this_locality: this_locality.as_u32(),
                num_localities,
            });
        }
        Ok(Self {
            num_localities,
            this_locality,
        })
    }

    /// Total participant count.
    pub const fn num_localities(&self) -> u32 {
        self.num_localities
    }

    /// This participant's own index.
    pub const fn this_locality(&self) -> LocalityId {
        self.this_locality
    }

    /// Ring successor: `(i + 1) % N`. With `N == 1` this is self.
    pub const fn successor(&self) -> LocalityId {
        LocalityId::new((self.this_locality.as_u32() + 1) % self.num_localities)
    }

    /// Ring predecessor: `(i - 1 + N) % N`. With `N == 1` this is self.
    pub const fn predecessor(&self) -> LocalityId {
        LocalityId::new(
            (self.this_locality.as_u32() + self.num_localities - 1) % self.num_localities,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_wrap_around() {
        let topo = Topology::new(4, LocalityId::new(3)).unwrap();
        assert_eq!(topo.successor(), LocalityId::new(0));
        assert_eq!(topo.predecessor(), LocalityId::new(2));
    }

    #[test]
    fn neighbors_interior() {
        let topo = Topology::new(4, LocalityId::new(1)).unwrap();
        assert_eq!(topo.successor(), LocalityId::new(2));
        assert_eq!(topo.predecessor(), LocalityId::new(0));
    }

    #[test]
    fn neighbors_all_indices() {
        for n in 1..=8u32 {
            for i in 0..n {
                let topo = Topology::new(n, LocalityId::new(i)).unwrap();
                assert_eq!(topo.successor().as_u32(), (i + 1) % n);
                assert_eq!(topo.predecessor().as_u32(), (i + n - 1) % n);
            }
        }
    }

    #[test]
    fn single_locality_is_its_own_neighbor() {
        let topo = Topology::new(1, LocalityId::new(0)).unwrap();
        assert_eq!(topo.successor(), LocalityId::new(0));
        assert_eq!(topo.predecessor(), LocalityId::new(0));
    }

    #[test]
    fn index_out_of_range_rejected() {
        let err = Topology::new(2, LocalityId::new(2)).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidTopology {
                this_locality: 2,
                num_localities: 2
            }
        ));
    }

    #[test]
    fn zero_localities_rejected() {
        assert!(matches!(
            Topology::new(0, LocalityId::new(0)),
            Err(RuntimeError::NoLocalities)
        ));
    }
}
