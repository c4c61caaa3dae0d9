//! Core building blocks for Digital Marketplace API clients
//!
//! This crate provides the pieces every API façade shares:
//!
//! - **Errors**: one taxonomy for HTTP failures, precondition failures and setup problems
//! - **Configuration**: per-client settings and key/value sources for deferred binding
//! - **Authentication**: bearer, API-key header and signed query strategies
//! - **Requests**: request descriptors and ordered query parameters
//! - **Responses**: classification of status, body and redirects
//! - **Pagination**: a lazy iterator that follows `links.next`
//! - **Envelopes**: `updated_by` request bodies and response reshaping
//!
//! # Example
//!
//! ```rust
//! use dm_api_core::prelude::*;
//! use serde_json::json;
//!
//! let body = Envelope::wrap("services", json!({"serviceName": "Cloud hosting"}))
//!     .updated_by("user@example.com")
//!     .into_value();
//! assert_eq!(body["updated_by"], "user@example.com");
//!
//! let pages = Pages::new("services", QueryParams::new(), |_params| {
//!     Ok(json!({"services": [{"id": 1}, {"id": 2}]}))
//! });
//! assert_eq!(pages.count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod pagination;
pub mod request;
pub mod response;

pub use error::{ApiError, ApiResult};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::auth::{Auth, AuthContribution};
    pub use crate::config::{parse_key_values, ClientConfig, ConfigSource, EnvConfig, FileConfig, Timeout};
    pub use crate::envelope::{pluck, reshape, Envelope};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::pagination::Pages;
    pub use crate::request::{QueryParams, RequestDescriptor, ResponseMode};
    pub use crate::response::{classify, Classification, ResponseOutcome};
}
