//! In-process multi-locality runtime.
//!
//! Stands in for a distributed runtime: every locality runs as a
//! `spawn_local` task on one current-thread tokio [`LocalSet`], sharing a
//! [`CommunicatorRegistry`] so identical channel-set names rendezvous. The
//! same machinery doubles as the multi-participant test harness.
//!
//! # Lifecycle
//!
//! ```text
//! RuntimeBuilder::run(entry)
//!   ├─ spawn entry(ctx) once per locality
//!   ├─ entry finishes with ctx.finalize()  ──► shutdown token cancelled
//!   ├─ panicking entries are caught at the join boundary
//!   │    ("Unknown exception caught", same shutdown path)
//!   └─ returns the first nonzero locality exit code, else 0
//! ```
//!
//! [`LocalSet`]: tokio::task::LocalSet

mod builder;

use std::cell::Cell;

use tokio_util::sync::CancellationToken;

use crate::comm::CommunicatorRegistry;
use crate::locality::{LocalityId, Topology};

pub use builder::RuntimeBuilder;

/// Configuration directive asking the runtime to run the repro driver as the
/// program's main body on every locality.
pub const RUN_DRIVER_MAIN: &str = "run-driver-main";

/// Startup configuration handed to the runtime, mirroring the process
/// arguments plus any fixed directives the entry point adds.
#[derive(Debug, Clone, Default)]
pub struct InitParams {
    /// Configuration directives, one string each.
    pub cfg: Vec<String>,
}

impl InitParams {
    /// Whether a given directive was passed.
    pub fn has_directive(&self, directive: &str) -> bool {
        self.cfg.iter().any(|d| d == directive)
    }
}

/// Per-locality handle to the runtime.
///
/// Exposes the locality's place in the topology, the shared communicator
/// registry, and the graceful [`finalize`](RuntimeContext::finalize) path.
/// All queries are synchronous and non-blocking.
#[derive(Debug)]
pub struct RuntimeContext {
    topology: Topology,
    registry: CommunicatorRegistry,
    shutdown: CancellationToken,
    finalized: Cell<bool>,
}

impl RuntimeContext {
    pub(crate) fn new(
        topology: Topology,
        registry: CommunicatorRegistry,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            topology,
            registry,
            shutdown,
            finalized: Cell::new(false),
        }
    }

    /// Total participant count of this run.
    pub fn num_localities(&self) -> u32 {
        self.topology.num_localities()
    }

    /// This locality's own index.
    pub fn this_locality(&self) -> LocalityId {
        self.topology.this_locality()
    }

    /// The full topology, for neighbor math.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The registry shared by all localities of this runtime.
    pub fn registry(&self) -> &CommunicatorRegistry {
        &self.registry
    }

    /// Gracefully shut the runtime down and produce this locality's exit
    /// code.
    ///
    /// The first finalize in the runtime trips the shutdown token so that
    /// receivers parked on channels that will never be served stop waiting.
    /// Idempotent; always returns 0 — the exit code comes from this call on
    /// every path, success or caught failure, never from the entry itself.
    pub fn finalize(&self) -> i32 {
        if !self.finalized.replace(true) {
            tracing::debug!(locality = %self.this_locality(), "locality finalized");
            self.shutdown.cancel();
        }
        0
    }
}
