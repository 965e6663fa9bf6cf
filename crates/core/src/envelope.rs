// Uniform response envelope shared by every relay surface

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one relayed operation.
///
/// Serializes as `{"success":true}`, `{"success":true,"data":...}` or
/// `{"success":false,"errorMessage":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SdkResponse {
    /// Success without a payload
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error_message: None,
        }
    }

    /// Success carrying a payload. A unit/null payload is omitted; a payload
    /// that cannot be serialized turns the envelope into an error.
    pub fn success_with<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(Value::Null) => Self::success(),
            Ok(value) => Self {
                success: true,
                data: Some(value),
                error_message: None,
            },
            Err(e) => Self::error(format!("failed to serialize response: {}", e)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Compact JSON text of the envelope
    pub fn to_json(&self) -> String {
        // Only strings, bools and already-built `Value`s are serialized here
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"errorMessage":"failed to serialize envelope: {}"}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

impl<T: Serialize, E: std::fmt::Display> From<Result<T, E>> for SdkResponse {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success_with(data),
            Err(e) => Self::error(e.to_string()),
        }
    }
}
