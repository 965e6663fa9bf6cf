//! Dedicated runtime driving the async client from synchronous C calls

use crate::error::{BridgeError, BridgeResult};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Upper bound on one blocking call, on top of the client's request timeout
const CALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Single-threaded runtime owned by one client handle.
///
/// Separate from any runtime the host process may run, so calls never
/// depend on `Handle::current()`.
pub(crate) struct BridgeRuntime {
    runtime: Option<Runtime>,
    timeout: Duration,
}

impl BridgeRuntime {
    pub(crate) fn new() -> BridgeResult<Self> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(BridgeError::NestedRuntime);
        }

        let runtime = Builder::new_current_thread()
            .thread_name("conductor-bridge")
            .enable_all()
            .build()
            .map_err(|e| BridgeError::Runtime(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            runtime: Some(runtime),
            timeout: CALL_TIMEOUT,
        })
    }

    /// Block the calling thread on `future`.
    ///
    /// Fails instead of panicking when the caller is itself inside a runtime.
    pub(crate) fn block_on<F>(&self, future: F) -> BridgeResult<F::Output>
    where
        F: Future,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(BridgeError::NestedRuntime);
        }

        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| BridgeError::Runtime("runtime already shut down".to_string()))?;

        runtime.block_on(async {
            tokio::time::timeout(self.timeout, future)
                .await
                .map_err(|_| BridgeError::Runtime("operation timed out".to_string()))
        })
    }
}

impl Drop for BridgeRuntime {
    fn drop(&mut self) {
        // A plain drop panics when the last handle is released on an async thread
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
