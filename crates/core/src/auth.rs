//! Authentication strategies
//!
//! Each façade picks one strategy at construction. A strategy turns the
//! configured credential into the headers and query parameters attached to
//! every request.

use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};

/// `api-version` sent with signed query requests
pub const SIGNED_API_VERSION: &str = "2016-10-01";

/// `sv` sent with signed query requests
pub const SIGNED_PROTOCOL_VERSION: &str = "1.0";

/// Route used by manually triggered signed workflows
pub const ROUTE_MANUAL: &str = "/triggers/manual/run";

/// Route used by trigger-based signed workflows
pub const ROUTE_TRIGGER: &str = "/triggers/Trigger/run";

/// How a client authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// A named header carrying the raw key
    ApiKeyHeader(&'static str),
    /// Query parameters `api-version`, `sp`, `sv` and `sig`
    ///
    /// `sig` is the credential itself, not a computed signature. The
    /// receiving workflows expect exactly that.
    SignedQuery {
        /// Value of the `sp` parameter
        route: &'static str,
    },
    /// Nothing is attached
    Anonymous,
}

/// Headers and query parameters contributed by an [`Auth`] strategy
#[derive(Debug, Clone, Default)]
pub struct AuthContribution {
    /// Headers to add
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// Query parameters to add, ahead of the call's own parameters
    pub query: Vec<(&'static str, String)>,
}

impl AuthContribution {
    /// Whether nothing is contributed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.query.is_empty()
    }
}

impl Auth {
    /// Compute what this strategy attaches for the given credential
    ///
    /// No credential means no contribution.
    pub fn contribution(&self, credential: Option<&str>) -> ApiResult<AuthContribution> {
        let Some(credential) = credential else {
            return Ok(AuthContribution::default());
        };

        let mut contribution = AuthContribution::default();
        match *self {
            Self::Bearer => {
                contribution
                    .headers
                    .push((AUTHORIZATION, sensitive_value(&format!("Bearer {credential}"))?));
            }
            Self::ApiKeyHeader(name) => {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| ApiError::config(format!("invalid API key header name {name}")))?;
                contribution.headers.push((name, sensitive_value(credential)?));
            }
            Self::SignedQuery { route } => {
                contribution.query = vec![
                    ("api-version", SIGNED_API_VERSION.to_string()),
                    ("sp", route.to_string()),
                    ("sv", SIGNED_PROTOCOL_VERSION.to_string()),
                    ("sig", credential.to_string()),
                ];
            }
            Self::Anonymous => {}
        }

        Ok(contribution)
    }
}

fn sensitive_value(raw: &str) -> ApiResult<HeaderValue> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|_| ApiError::config("credential contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(value)
}
