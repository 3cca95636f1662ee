//! Runtime builder with fluent configuration.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::comm::CommunicatorRegistry;
use crate::error::RuntimeError;
use crate::locality::{LocalityId, Topology};
use crate::runtime::{InitParams, RuntimeContext};

/// Builder for one multi-locality run.
///
/// # Example
///
/// ```rust,ignore
/// let code = RuntimeBuilder::new()
///     .localities(4)
///     .init_params(params)
///     .run(driver::run)
///     .await?;
/// ```
#[derive(Debug)]
pub struct RuntimeBuilder {
    localities: u32,
    init_params: InitParams,
}

impl RuntimeBuilder {
    /// Create a builder with the default topology of two localities.
    pub fn new() -> Self {
        Self {
            localities: 2,
            init_params: InitParams::default(),
        }
    }

    /// Set the participant count.
    pub fn localities(mut self, localities: u32) -> Self {
        self.localities = localities;
        self
    }

    /// Attach startup configuration (process arguments plus directives).
    pub fn init_params(mut self, init_params: InitParams) -> Self {
        self.init_params = init_params;
        self
    }

    /// Spawn `entry` once per locality and run the whole topology to
    /// completion.
    ///
    /// Must be awaited inside a [`tokio::task::LocalSet`] on a current-thread
    /// runtime; localities are `spawn_local` tasks. The entry's `i32` result
    /// is its locality's exit code (conventionally whatever
    /// [`RuntimeContext::finalize`] returned). A panicking entry is caught at
    /// the join boundary, reported as `"Unknown exception caught"`, and
    /// treated as exit code 0 after tripping the shutdown token so its peers
    /// do not wait on it forever.
    ///
    /// Returns the first nonzero locality exit code, else 0.
    pub async fn run<F, Fut>(self, entry: F) -> Result<i32, RuntimeError>
    where
        F: Fn(RuntimeContext) -> Fut,
        Fut: Future<Output = i32> + 'static,
    {
        if self.localities == 0 {
            return Err(RuntimeError::NoLocalities);
        }

        let shutdown = CancellationToken::new();
        let registry = CommunicatorRegistry::with_shutdown(shutdown.clone());
        tracing::debug!(
            localities = self.localities,
            cfg = ?self.init_params.cfg,
            "starting runtime"
        );

        let mut supervised = Vec::with_capacity(self.localities as usize);
        for index in 0..self.localities {
            let topology = Topology::new(self.localities, LocalityId::new(index))?;
            let ctx = RuntimeContext::new(topology, registry.clone(), shutdown.clone());
            let handle = tokio::task::spawn_local(entry(ctx));

            // Supervisors run concurrently with the localities, so a panic
            // trips the shutdown token as soon as it happens, not when this
            // locality's turn in the join loop below comes up.
            let token = shutdown.clone();
            supervised.push(tokio::task::spawn_local(async move {
                match handle.await {
                    Ok(code) => code,
                    Err(err) if err.is_panic() => {
                        eprintln!("Unknown exception caught");
                        tracing::error!(locality = index, "locality task panicked");
                        token.cancel();
                        0
                    }
                    Err(err) => {
                        tracing::error!(locality = index, error = %err, "locality task cancelled");
                        token.cancel();
                        0
                    }
                }
            }));
        }

        let mut exit_code = 0;
        for handle in supervised {
            let code = handle
                .await
                .map_err(|err| RuntimeError::Join(err.to_string()))?;
            if exit_code == 0 {
                exit_code = code;
            }
        }

        // Entries that returned without finalizing must not leave the token
        // armed for a later run on the same thread.
        shutdown.cancel();
        tracing::debug!(exit_code, "runtime finished");
        Ok(exit_code)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
