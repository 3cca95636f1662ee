//! # chancomm
//!
//! In-process channel communicators for site- and tag-addressed point-to-point
//! exchanges, plus the reproduction driver that exercises them.
//!
//! A *channel communicator* is a named endpoint scoped to a fixed set of
//! participant localities. Every participant calls
//! [`CommunicatorRegistry::create_channel_communicator`] with the identical
//! name to rendezvous on the same logical channel set, then exchanges values
//! with [`ChannelCommunicator::set`] (send to a site) and
//! [`ChannelCommunicator::get`] (receive from a site), disambiguated by an
//! integer [`Tag`].
//!
//! ## Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ bin/repro                                               │
//! │   process entry, arg handling, exit code from finalize  │
//! ├─────────────────────────────────────────────────────────┤
//! │ driver                                                  │
//! │   one set() to the successor, one get() from the        │
//! │   predecessor, console contract, single catch point     │
//! ├────────────────────────────┬────────────────────────────┤
//! │ runtime                    │ comm                       │
//! │ • RuntimeBuilder           │ • CommunicatorRegistry     │
//! │ • one spawn_local task     │ • ChannelCommunicator      │
//! │   per locality             │ • (to, from, tag) matching │
//! │ • finalize / shutdown      │   table                    │
//! ├────────────────────────────┴────────────────────────────┤
//! │ locality (ids, neighbor math)   codec (JSON payloads)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading Model
//!
//! Everything runs on a tokio current-thread runtime inside a
//! [`tokio::task::LocalSet`]: localities are `spawn_local` tasks sharing the
//! registry through `Rc`/`RefCell`. Nothing in this crate is `Send`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chancomm::{RuntimeBuilder, driver};
//!
//! let code = RuntimeBuilder::new()
//!     .localities(2)
//!     .run(driver::run)
//!     .await?;
//! ```

#![deny(missing_docs)]

pub mod codec;
pub mod comm;
pub mod driver;
pub mod error;
pub mod locality;
pub mod runtime;

pub use codec::JsonCodec;
pub use comm::{ChannelCommunicator, CommunicatorRegistry};
pub use error::{CommError, RuntimeError};
pub use locality::{LocalityId, Tag, Topology};
pub use runtime::{InitParams, RuntimeBuilder, RuntimeContext, RUN_DRIVER_MAIN};
