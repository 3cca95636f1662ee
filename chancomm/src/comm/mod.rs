//! Channel communicators: named, site-addressed point-to-point exchange.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ CommunicatorRegistry                                │
//! │   name ──► ChannelSet (shared by all joined sites)  │
//! │              │                                      │
//! │              ▼                                      │
//! │            MatchingTable                            │
//! │              (to, from, tag) ──► Slot               │
//! │                 queued values / waiting receivers   │
//! └─────────────────────────────────────────────────────┘
//!         ▲                         ▲
//!         │ create(name, N, site)   │ set / get
//!   RuntimeContext            ChannelCommunicator
//! ```
//!
//! All participants call [`CommunicatorRegistry::create_channel_communicator`]
//! with the identical name; the first call allocates the shared channel-set
//! state, later calls join it. Each handle then
//! performs tag-addressed sends and receives through the shared matching
//! table, which accepts value and receiver in either arrival order.

mod channel;
mod matching;
mod registry;

pub use channel::ChannelCommunicator;
pub use registry::CommunicatorRegistry;

pub(crate) use matching::{Claimed, SlotKey};
pub(crate) use registry::ChannelSet;
