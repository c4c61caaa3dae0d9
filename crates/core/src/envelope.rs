//! Request envelopes and response reshaping
//!
//! Mutating endpoints wrap their payload under a resource key next to an
//! `updated_by` attribution: `{"services": {...}, "updated_by": "user"}`.

use crate::error::{ApiError, ApiResult};
use serde_json::{Map, Value};

/// Attribution key added to mutating request bodies
pub const UPDATED_BY: &str = "updated_by";

/// JSON object body under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    /// Create an empty envelope
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an envelope holding `payload` under `key`
    #[must_use]
    pub fn wrap(key: &str, payload: impl Into<Value>) -> Self {
        Self::new().with(key, payload)
    }

    /// Start from an existing object, keeping its keys at the top level
    ///
    /// Non-object values contribute nothing.
    #[must_use]
    pub fn flatten(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    /// Add a key
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Add a key only when a value is given
    #[must_use]
    pub fn with_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Add the `updated_by` attribution
    #[must_use]
    pub fn updated_by(self, user: impl Into<String>) -> Self {
        self.with(UPDATED_BY, user.into())
    }

    /// Finish the body
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        envelope.into_value()
    }
}

/// Extract the value at a JSON pointer
///
/// An empty object (what a disabled client returns) yields an empty object.
/// A missing pointer on any other body is an invalid response.
pub fn pluck(value: &Value, pointer: &str) -> ApiResult<Value> {
    if is_empty_object(value) {
        return Ok(Value::Object(Map::new()));
    }

    value
        .pointer(pointer)
        .cloned()
        .ok_or_else(|| ApiError::invalid_response(200, format!("response has no {pointer}")))
}

/// Extract the value at a JSON pointer and wrap it under `key`
///
/// An empty object passes through unchanged.
pub fn reshape(value: &Value, pointer: &str, key: &str) -> ApiResult<Value> {
    if is_empty_object(value) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(Envelope::wrap(key, pluck(value, pointer)?).into_value())
}

/// Whether a value is `{}`
#[must_use]
pub fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}
