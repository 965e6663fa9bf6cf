//! Process-wide table of client handles

use crate::error::{BridgeError, BridgeResult};
use crate::runtime::BridgeRuntime;
use conductor_relay_core::{execute, Operation, SdkResponse};
use conductor_relay_sdk::ConductorClient;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle -> client entry. Entries are shared so that a destroy racing a
/// call only drops the entry once the call has finished with it.
static CLIENTS: Lazy<DashMap<u64, Arc<ClientEntry>>> = Lazy::new(DashMap::new);

/// Handles start at 1 and are never reused; 0 signals failure to C callers.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

pub(crate) struct ClientEntry {
    client: ConductorClient,
    runtime: BridgeRuntime,
}

impl ClientEntry {
    pub(crate) fn new(client: ConductorClient) -> BridgeResult<Self> {
        Ok(Self {
            client,
            runtime: BridgeRuntime::new()?,
        })
    }

    /// Perform one operation, blocking until the envelope is ready
    pub(crate) fn run(&self, operation: Operation) -> SdkResponse {
        match self.runtime.block_on(execute(&self.client, operation)) {
            Ok(response) => response,
            Err(e) => SdkResponse::error(e.to_string()),
        }
    }
}

pub(crate) fn register(entry: ClientEntry) -> u64 {
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    CLIENTS.insert(handle, Arc::new(entry));
    tracing::debug!(handle, "registered client");
    handle
}

/// Remove a handle. `None` if it was unknown or already removed.
pub(crate) fn unregister(handle: u64) -> Option<Arc<ClientEntry>> {
    tracing::debug!(handle, "unregistering client");
    CLIENTS.remove(&handle).map(|(_, entry)| entry)
}

pub(crate) fn get(handle: u64) -> BridgeResult<Arc<ClientEntry>> {
    CLIENTS
        .get(&handle)
        .map(|entry| entry.value().clone())
        .ok_or(BridgeError::ClientNotFound(handle))
}
