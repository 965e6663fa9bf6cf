// Lenient accessors over the JSON parameter object handed to an operation

use crate::error::{RelayError, RelayResult};
use crate::types::JsonObject;
use serde_json::Value;

/// Named operation parameters, as passed on the command line, through the
/// native bridge or in an HTTP body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(JsonObject);

impl Parameters {
    pub fn new(map: JsonObject) -> Self {
        Self(map)
    }

    /// Parse a JSON object string
    pub fn parse(json: &str) -> RelayResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parse a JSON object from raw bytes, such as a request body
    pub fn from_slice(bytes: &[u8]) -> RelayResult<Self> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    /// Wrap an already-parsed JSON value, which must be an object
    pub fn from_value(value: Value) -> RelayResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RelayError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value, or `""` when absent or not a string
    pub fn string(&self, key: &str) -> String {
        self.optional_string(key).unwrap_or_default()
    }

    pub fn optional_string(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(str::to_string)
    }

    /// Non-empty string value or `MissingParameter`
    pub fn require_string(&self, key: &str) -> RelayResult<String> {
        match self.optional_string(key) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(RelayError::MissingParameter(key.to_string())),
        }
    }

    /// Boolean value; accepts `true`/`false` as JSON or as strings
    pub fn bool(&self, key: &str) -> bool {
        self.optional_bool(key).unwrap_or(false)
    }

    pub fn optional_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().to_ascii_lowercase().parse().ok(),
            _ => None,
        }
    }

    pub fn optional_i32(&self, key: &str) -> Option<i32> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn i32(&self, key: &str, default: i32) -> i32 {
        self.optional_i32(key).unwrap_or(default)
    }

    /// Object value, or an empty object when absent or of another type
    pub fn object(&self, key: &str) -> JsonObject {
        match self.0.get(key) {
            Some(Value::Object(map)) => map.clone(),
            _ => JsonObject::new(),
        }
    }

    pub fn into_inner(self) -> JsonObject {
        self.0
    }
}

impl From<JsonObject> for Parameters {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
