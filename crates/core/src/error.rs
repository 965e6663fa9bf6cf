// Input errors raised before any downstream call is made

use crate::operation::Resource;

pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Parameters were not valid JSON
    #[error("failed to parse parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),

    /// Parameters were valid JSON but not an object
    #[error("parameters must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown {resource} operation: {operation}")]
    UnknownOperation { resource: Resource, operation: String },
}
