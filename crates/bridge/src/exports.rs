//! Exported C functions
//!
//! Strings passed in must be NUL-terminated UTF-8 and stay valid for the
//! duration of the call. Strings returned are owned by the caller and must be
//! released with [`conductor_free_string`]. Panics are caught here and turned
//! into error envelopes.

use crate::error::{BridgeError, BridgeResult};
use crate::registry::{self, ClientEntry};
use conductor_relay_core::{prepare, Operation, Parameters, Resource, SdkResponse, WorkflowSearch};
use conductor_relay_sdk::config::SERVER_URL_ENV;
use conductor_relay_sdk::{ClientConfig, ConductorClient};
use serde_json::json;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

/// Create a client and return its handle, or 0 on failure.
///
/// A NULL or empty `server_url` uses `CONDUCTOR_SERVER_URL`. The access token
/// and timeout always come from the environment.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_client_create(server_url: *const c_char) -> u64 {
    let result = catch_unwind(AssertUnwindSafe(|| -> BridgeResult<u64> {
        // SAFETY: caller contract, see module docs
        let server_url = unsafe { optional_str(server_url, "server_url")? };
        let entry = ClientEntry::new(connect(server_url)?)?;
        Ok(registry::register(entry))
    }));

    match result {
        Ok(Ok(handle)) => {
            tracing::info!(handle, "created conductor client");
            handle
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to create conductor client");
            0
        }
        Err(panic) => {
            tracing::error!("conductor_client_create panicked: {}", panic_message(&*panic));
            0
        }
    }
}

/// Release a client handle. Unknown or already destroyed handles are ignored.
#[no_mangle]
pub extern "C" fn conductor_client_destroy(handle: u64) {
    let result = catch_unwind(|| {
        if registry::unregister(handle).is_none() {
            tracing::debug!(handle, "ignoring destroy of unknown client");
        }
    });
    if result.is_err() {
        tracing::error!(handle, "conductor_client_destroy panicked");
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_add_event_handler(
    handle: u64,
    name: *const c_char,
    event: *const c_char,
    active: bool,
) -> *mut c_char {
    relay("conductor_add_event_handler", handle, || {
        // SAFETY: caller contract, see module docs
        let (name, event) = unsafe { (required_str(name, "name")?, required_str(event, "event")?) };
        operation(
            Resource::Event,
            "add-event",
            json!({"name": name, "event": event, "active": active}),
        )
    })
}

#[no_mangle]
pub extern "C" fn conductor_get_event_handlers(handle: u64) -> *mut c_char {
    relay("conductor_get_event_handlers", handle, || Ok(Operation::GetEvents))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_get_event_handlers_for_event(
    handle: u64,
    event: *const c_char,
    active_only: bool,
) -> *mut c_char {
    relay("conductor_get_event_handlers_for_event", handle, || {
        // SAFETY: caller contract, see module docs
        let event = unsafe { required_str(event, "event")? };
        operation(
            Resource::Event,
            "get-event-by-name",
            json!({"event": event, "activeOnly": active_only}),
        )
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_update_event_handler(
    handle: u64,
    name: *const c_char,
    event: *const c_char,
    active: bool,
) -> *mut c_char {
    relay("conductor_update_event_handler", handle, || {
        // SAFETY: caller contract, see module docs
        let (name, event) = unsafe { (required_str(name, "name")?, required_str(event, "event")?) };
        operation(
            Resource::Event,
            "update-event",
            json!({"name": name, "event": event, "active": active}),
        )
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_delete_event_handler(handle: u64, name: *const c_char) -> *mut c_char {
    relay("conductor_delete_event_handler", handle, || {
        // SAFETY: caller contract, see module docs
        let name = unsafe { required_str(name, "name")? };
        operation(Resource::Event, "delete-event", json!({"name": name}))
    })
}

/// Start a workflow. `version <= 0` starts the latest version; a NULL
/// `correlation_id` sends none. The envelope's `data` is the workflow id.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_start_workflow(
    handle: u64,
    name: *const c_char,
    version: i32,
    correlation_id: *const c_char,
) -> *mut c_char {
    relay("conductor_start_workflow", handle, || {
        // SAFETY: caller contract, see module docs
        let (name, correlation_id) = unsafe {
            (
                required_str(name, "name")?,
                optional_str(correlation_id, "correlation_id")?,
            )
        };
        operation(
            Resource::Workflow,
            "start-workflow",
            json!({
                "name": name,
                "version": (version > 0).then_some(version),
                "correlationId": correlation_id,
            }),
        )
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_get_workflow(
    handle: u64,
    workflow_id: *const c_char,
    include_tasks: bool,
) -> *mut c_char {
    relay("conductor_get_workflow", handle, || {
        // SAFETY: caller contract, see module docs
        let workflow_id = unsafe { required_str(workflow_id, "workflow_id")? };
        operation(
            Resource::Workflow,
            "get-workflow",
            json!({"workflowId": workflow_id, "includeTasks": include_tasks}),
        )
    })
}

/// First page of all workflow executions
#[no_mangle]
pub extern "C" fn conductor_get_workflows(handle: u64) -> *mut c_char {
    relay("conductor_get_workflows", handle, || {
        Ok(Operation::GetWorkflows(WorkflowSearch::default()))
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_terminate_workflow(
    handle: u64,
    workflow_id: *const c_char,
    reason: *const c_char,
) -> *mut c_char {
    relay("conductor_terminate_workflow", handle, || {
        // SAFETY: caller contract, see module docs
        let (workflow_id, reason) = unsafe {
            (
                required_str(workflow_id, "workflow_id")?,
                optional_str(reason, "reason")?,
            )
        };
        operation(
            Resource::Workflow,
            "terminate-workflow",
            json!({"workflowId": workflow_id, "reason": reason}),
        )
    })
}

/// Run any catalogued operation, named as on the command line
/// (`resource` = `event`, `operation` = `get-event-by-name`, ...).
/// A NULL `parameters_json` counts as `{}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_execute(
    handle: u64,
    resource: *const c_char,
    operation: *const c_char,
    parameters_json: *const c_char,
) -> *mut c_char {
    relay("conductor_execute", handle, || {
        // SAFETY: caller contract, see module docs
        let (resource, operation, parameters) = unsafe {
            (
                required_str(resource, "resource")?,
                required_str(operation, "operation")?,
                optional_str(parameters_json, "parameters_json")?,
            )
        };
        Ok(prepare(resource, operation, parameters.unwrap_or("{}"))?)
    })
}

/// Release a string returned by this library. NULL is ignored.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn conductor_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr came from CString::into_raw in this library and is freed once
    drop(unsafe { CString::from_raw(ptr) });
}

fn connect(server_url: Option<&str>) -> BridgeResult<ConductorClient> {
    let server_url = server_url.filter(|url| !url.trim().is_empty());
    let config = ClientConfig::from_lookup(|key| match (key, server_url) {
        (SERVER_URL_ENV, Some(url)) => Some(url.to_string()),
        _ => std::env::var(key).ok(),
    })?;
    Ok(ConductorClient::from_config(config)?)
}

fn operation(resource: Resource, name: &str, params: serde_json::Value) -> BridgeResult<Operation> {
    let params = Parameters::from_value(params)?;
    Ok(Operation::parse(resource, name, &params)?)
}

/// Resolve the handle, build the operation and run it, all inside a panic guard
fn relay<F>(function: &'static str, handle: u64, build: F) -> *mut c_char
where
    F: FnOnce() -> BridgeResult<Operation>,
{
    let result = catch_unwind(AssertUnwindSafe(|| -> BridgeResult<SdkResponse> {
        let entry = registry::get(handle)?;
        let operation = build()?;
        Ok(entry.run(operation))
    }));

    let response = match result {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::warn!(function, handle, error = %e, "bridge call rejected");
            SdkResponse::error(e.to_string())
        }
        Err(panic) => {
            let message = panic_message(&*panic);
            tracing::error!(function, handle, "bridge call panicked: {}", message);
            SdkResponse::error(format!("{} panicked: {}", function, message))
        }
    };
    into_raw(response.to_json())
}

fn into_raw(json: String) -> *mut c_char {
    // serde_json escapes NUL, so this only fails on a corrupted envelope
    CString::new(json)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// # Safety
/// `ptr` is NULL or points to a NUL-terminated string valid for `'a`.
unsafe fn optional_str<'a>(ptr: *const c_char, name: &'static str) -> BridgeResult<Option<&'a str>> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(Some)
        .map_err(|_| BridgeError::InvalidUtf8(name))
}

/// # Safety
/// Same as [`optional_str`].
unsafe fn required_str<'a>(ptr: *const c_char, name: &'static str) -> BridgeResult<&'a str> {
    optional_str(ptr, name)?.ok_or(BridgeError::NullArgument(name))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}
