//! Errors raised by the bridge itself, before or around a client call

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("{0} must not be NULL")]
    NullArgument(&'static str),

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    /// Argument rejected by the operation catalogue
    #[error(transparent)]
    Invalid(#[from] conductor_relay_core::RelayError),

    #[error("client not found: {0}")]
    ClientNotFound(u64),

    /// The calling thread is already driving an async runtime
    #[error("cannot block on a client call from within an async runtime")]
    NestedRuntime,

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("failed to create client: {0}")]
    Client(#[from] conductor_relay_sdk::ConductorError),
}
