//! Error types for communicator and runtime operations.

use thiserror::Error;

/// Errors raised by channel-communicator operations.
///
/// Every failure mode of `create_channel_communicator`, `set`, and `get`
/// surfaces here; the repro driver catches this type at a single point and
/// converts it into a logged diagnostic plus a graceful finalize.
#[derive(Debug, Error)]
pub enum CommError {
    /// A participant tried to rendezvous on an existing channel set with a
    /// different site count.
    #[error("channel set {name:?} spans {expected} sites, caller asked for {got}")]
    SiteCountMismatch {
        /// Channel-set name the caller used.
        name: String,
        /// Site count the existing channel set was created with.
        expected: u32,
        /// Site count the caller passed.
        got: u32,
    },

    /// A site index was outside the communicator's scope.
    #[error("site {site} out of range (channel set spans {num_sites} sites)")]
    SiteOutOfRange {
        /// The offending site index.
        site: u32,
        /// Number of sites in the channel set.
        num_sites: u32,
    },

    /// The same site joined the same channel set twice in one session.
    #[error("site {site} already joined channel set {name:?}")]
    AlreadyJoined {
        /// Channel-set name.
        name: String,
        /// The site that attempted the second join.
        site: u32,
    },

    /// Payload encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The sending side went away before the exchange completed.
    #[error("peer dropped the exchange before completion")]
    Disconnected,

    /// The runtime shut down while the operation was still pending.
    #[error("runtime is shutting down")]
    Shutdown,
}

/// Errors raised by the in-process runtime harness itself.
///
/// Distinct from [`CommError`]: these mean the harness could not run at all,
/// not that an exchange failed.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime was configured with zero localities.
    #[error("runtime needs at least one locality")]
    NoLocalities,

    /// A locality index was not within the configured participant count.
    #[error("locality {this_locality} out of range (num_localities: {num_localities})")]
    InvalidTopology {
        /// The offending locality index.
        this_locality: u32,
        /// Configured participant count.
        num_localities: u32,
    },

    /// A locality task could not be joined (cancelled from outside).
    #[error("locality task failed to join: {0}")]
    Join(String),
}
