//! Data API: the marketplace's primary store
//!
//! Operations are grouped by resource, one `impl DataApiClient` block per
//! submodule:
//!
//! | Module | Resources |
//! |--------|-----------|
//! | [`audit`] | audit events |
//! | [`services`] | published and archived services |
//! | [`drafts`] | draft services |
//! | [`users`] | users and buyer email domains |
//! | [`suppliers`] | suppliers, contact details, platform connections |
//! | [`supplier_frameworks`] | framework interest, declarations, framework suppliers |
//! | [`agreements`] | framework agreements |
//! | [`frameworks`] | frameworks and communication categories |
//! | [`briefs`] | briefs, brief responses and awards |
//! | [`direct_award`] | direct award projects and outcomes |
//! | [`communications`] | communications and system messages |
//!
//! Mutating calls take an optional `user`; when it is `None` the client's
//! configured default user is used, and when neither is set the call fails
//! with [`ApiError::MissingUpdatedBy`](dm_api_core::error::ApiError::MissingUpdatedBy)
//! before any request is made.

pub mod agreements;
pub mod audit;
pub mod briefs;
pub mod communications;
pub mod direct_award;
pub mod drafts;
pub mod frameworks;
pub mod services;
pub mod supplier_frameworks;
pub mod suppliers;
pub mod users;

pub use audit::{AuditType, FindAuditEvents};
pub use briefs::{FindBriefResponses, FindBriefs};
pub use communications::FindCommunications;
pub use direct_award::FindProjects;
pub use drafts::{FindDraftServices, FindDraftServicesByFramework};
pub use frameworks::NewFramework;
pub use services::FindServices;
pub use supplier_frameworks::{FindFrameworkSuppliers, SupplierFrameworkDetails};
pub use suppliers::FindSuppliers;
pub use users::{FindUsers, UserUpdate};

use crate::client::BaseClient;
use dm_api_core::auth::Auth;
use dm_api_core::config::{ClientConfig, ConfigSource};
use dm_api_core::error::ApiResult;
use serde_json::Value;

/// Configuration key for the Data API URL
pub const DATA_API_URL: &str = "DM_DATA_API_URL";

/// Configuration key for the Data API token
pub const DATA_API_AUTH_TOKEN: &str = "DM_DATA_API_AUTH_TOKEN";

/// Data API client
#[derive(Debug, Clone)]
pub struct DataApiClient {
    client: BaseClient,
}

impl DataApiClient {
    /// Create a client; the token is sent as a bearer token
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::Bearer)?,
        })
    }

    /// Bind URL and token from `DM_DATA_API_URL` / `DM_DATA_API_AUTH_TOKEN`
    pub fn init_app(&mut self, source: &impl ConfigSource) -> ApiResult<()> {
        let url = source.require(DATA_API_URL)?;
        let token = source.require(DATA_API_AUTH_TOKEN)?;
        self.client.init(url, token);
        Ok(())
    }

    /// Underlying engine
    #[must_use]
    pub fn client(&self) -> &BaseClient {
        &self.client
    }

    /// Configured base URL
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.client.base_url()
    }

    /// Configured bearer token
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.client.credential()
    }

    /// GET /_status
    pub fn get_status(&self) -> ApiResult<Value> {
        self.client.get_status()
    }

    fn user(&self, user: Option<&str>) -> ApiResult<String> {
        self.client.resolve_user(user)
    }
}

/// Map a 404 to `None`, keeping every other outcome
fn none_on_404(result: ApiResult<Value>) -> ApiResult<Option<Value>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.has_status(404) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
fn test_client(server: &mockito::Server) -> DataApiClient {
    DataApiClient::new(ClientConfig::new(server.url(), "auth-token")).unwrap()
}

/// Two pages under `key` at `path`: ids 1 and 2 linking to `?page=2`, then id 3
#[cfg(test)]
fn mock_two_pages(server: &mut mockito::Server, path: &str, key: &str) -> [mockito::Mock; 2] {
    use serde_json::{json, Map};

    let mut first = Map::new();
    first.insert(key.to_string(), json!([{"id": 1}, {"id": 2}]));
    first.insert(
        "links".to_string(),
        json!({"next": format!("{}{path}?page=2", server.url())}),
    );
    let mut second = Map::new();
    second.insert(key.to_string(), json!([{"id": 3}]));

    [
        server
            .mock("GET", path)
            .with_status(200)
            .with_body(Value::Object(first).to_string())
            .create(),
        server
            .mock("GET", path)
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(Value::Object(second).to_string())
            .create(),
    ]
}

#[cfg(test)]
fn ids(items: impl Iterator<Item = ApiResult<Value>>) -> Vec<i64> {
    items
        .map(|item| item.unwrap()["id"].as_i64().unwrap())
        .collect()
}
