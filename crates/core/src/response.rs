//! Response classification
//!
//! [`classify`] is a pure function of status, `Location` header, body and
//! response mode, so every branch is testable without a server.

use crate::error::{ApiError, ApiResult, REQUEST_ERROR_MESSAGE};
use crate::request::ResponseMode;
use serde_json::{Map, Value};

/// Successful result of a request
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// Decoded JSON body
    Decoded(Value),
    /// Raw body bytes
    RawBytes(Vec<u8>),
    /// No body: empty response, fire-and-forget, or disabled client
    Empty,
}

impl ResponseOutcome {
    /// Convert to JSON; anything without a JSON body becomes `{}`
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Decoded(value) => value,
            Self::RawBytes(_) | Self::Empty => Value::Object(Map::new()),
        }
    }

    /// Convert to bytes; a decoded body is re-serialized
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::RawBytes(bytes) => bytes,
            Self::Decoded(value) => value.to_string().into_bytes(),
            Self::Empty => Vec::new(),
        }
    }
}

/// What the engine should do with a response
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The request is complete
    Outcome(ResponseOutcome),
    /// Follow a redirect to this location
    Redirect(String),
}

/// Classify a response
pub fn classify(
    status: u16,
    location: Option<&str>,
    body: &[u8],
    mode: ResponseMode,
) -> ApiResult<Classification> {
    match status {
        200..=299 => match mode {
            ResponseMode::Bytes => Ok(Classification::Outcome(ResponseOutcome::RawBytes(
                body.to_vec(),
            ))),
            ResponseMode::Json if body.is_empty() => {
                Ok(Classification::Outcome(ResponseOutcome::Empty))
            }
            ResponseMode::Json => serde_json::from_slice(body)
                .map(|value| Classification::Outcome(ResponseOutcome::Decoded(value)))
                .map_err(|e| ApiError::invalid_response(status, e.to_string())),
        },
        300..=399 if mode == ResponseMode::Bytes => match location {
            Some(location) => Ok(Classification::Redirect(location.to_string())),
            None => Err(failure(status, body)),
        },
        _ => Err(failure(status, body)),
    }
}

/// Build an HTTP failure from a non-2xx response
///
/// The message is the body's `error` field; a string is used as-is and any
/// other JSON value is rendered. Non-JSON bodies and bodies without `error`
/// get the generic message.
#[must_use]
pub fn failure(status: u16, body: &[u8]) -> ApiError {
    let decoded = serde_json::from_slice::<Value>(body).ok();

    let message = decoded
        .as_ref()
        .and_then(|value| value.get("error"))
        .map_or_else(
            || REQUEST_ERROR_MESSAGE.to_string(),
            |error| match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        );

    ApiError::Http {
        status,
        message,
        body: decoded,
    }
}
