//! Error types shared by every Digital Marketplace API client
//!
//! Errors fall into four families:
//! - HTTP failures (`Http`, `InvalidResponse`, `RequestFailed`, `UnexpectedRedirect`)
//! - "not found" reported without I/O (`NotFound`)
//! - precondition failures raised before any request (`InvalidArgument`,
//!   `MissingUpdatedBy`, `UnknownVariant`)
//! - local setup problems (`Config`, `InvalidUrl`, `Json`)

use serde_json::Value;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Message used when a failure carries no usable message of its own
pub const REQUEST_ERROR_MESSAGE: &str = "Request failed";

/// Status code reported for failures that never produced a response
pub const REQUEST_ERROR_STATUS_CODE: u16 = 503;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message taken from the response body's `error` field
        message: String,
        /// Decoded response body, when it was JSON
        body: Option<Value>,
    },

    /// The API answered 2xx but the body could not be used
    #[error("Invalid response ({status}): {message}")]
    InvalidResponse {
        /// HTTP status code
        status: u16,
        /// What went wrong while reading the body
        message: String,
    },

    /// No response was received (connection failure, timeout, TLS error)
    ///
    /// The wrapped error has its URL stripped: signed URLs carry the credential.
    #[error("Request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// A redirect was answered with another redirect
    #[error("Unexpected redirect to {location}")]
    UnexpectedRedirect {
        /// Status of the second redirect
        status: u16,
        /// Where the second redirect pointed
        location: String,
    },

    /// The resource does not exist on this API (no request is made)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument combination is not allowed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A mutating call has no `updated_by` attribution
    #[error("Invalid argument: no updated_by user given and no default user configured")]
    MissingUpdatedBy,

    /// A value outside a closed set was supplied
    #[error("Unknown {kind}: {value}")]
    UnknownVariant {
        /// Name of the closed set
        kind: &'static str,
        /// Rejected value
        value: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP failure without a body
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(status: u16, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Wrap a transport error, dropping the URL it carries
    #[must_use]
    pub fn request_failed(err: reqwest::Error) -> Self {
        Self::RequestFailed(err.without_url())
    }

    /// Status code associated with this error
    ///
    /// Transport failures report 503; "not found" reports 404; errors
    /// raised before any request report `None`.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. }
            | Self::InvalidResponse { status, .. }
            | Self::UnexpectedRedirect { status, .. } => Some(*status),
            Self::RequestFailed(_) => Some(REQUEST_ERROR_STATUS_CODE),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Human-readable message without the status prefix
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } | Self::InvalidResponse { message, .. } => message.clone(),
            Self::RequestFailed(_) => REQUEST_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this is an HTTP-class failure (including transport failures)
    #[must_use]
    pub fn is_http_error(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::InvalidResponse { .. }
                | Self::RequestFailed(_)
                | Self::UnexpectedRedirect { .. }
        )
    }

    /// Whether the error was raised before any request was sent
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MissingUpdatedBy | Self::UnknownVariant { .. }
        )
    }

    /// Whether the failure is likely temporary (503 or no response at all)
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.status_code() == Some(REQUEST_ERROR_STATUS_CODE)
    }

    /// Whether the API answered with this exact status
    #[must_use]
    pub fn has_status(&self, status: u16) -> bool {
        matches!(self, Self::Http { status: s, .. } if *s == status)
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 500)
    }
}
