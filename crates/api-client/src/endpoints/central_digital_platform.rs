//! Central Digital Platform API: supplier information shared by share code

use crate::client::BaseClient;
use dm_api_core::auth::Auth;
use dm_api_core::config::{ClientConfig, ConfigSource};
use dm_api_core::envelope::Envelope;
use dm_api_core::error::{ApiError, ApiResult};
use serde_json::Value;

/// Configuration key for the Central Digital Platform API URL
pub const CDP_API_URL: &str = "DM_CENTRAL_DIGITAL_PLATFORM_API_URL";

/// Configuration key for the Central Digital Platform API key
pub const CDP_API_KEY: &str = "DM_CENTRAL_DIGITAL_PLATFORM_API_KEY";

/// Header carrying the Central Digital Platform API key
pub const CDP_API_KEY_HEADER: &str = "CDP-Api-Key";

/// Central Digital Platform API client
#[derive(Debug, Clone)]
pub struct CentralDigitalPlatformClient {
    client: BaseClient,
}

impl CentralDigitalPlatformClient {
    /// Create a client; the key is sent in the `CDP-Api-Key` header
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::ApiKeyHeader(CDP_API_KEY_HEADER))?,
        })
    }

    /// Bind URL and key from the `DM_CENTRAL_DIGITAL_PLATFORM_API_*` keys
    pub fn init_app(&mut self, source: &impl ConfigSource) -> ApiResult<()> {
        let url = source.require(CDP_API_URL)?;
        let key = source.require(CDP_API_KEY)?;
        self.client.init(url, key);
        Ok(())
    }

    /// Underlying engine
    #[must_use]
    pub fn client(&self) -> &BaseClient {
        &self.client
    }

    /// The configured API key
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.client.credential()
    }

    /// The platform has no status endpoint
    pub fn get_status(&self) -> ApiResult<Value> {
        Err(ApiError::NotFound("status endpoint".into()))
    }

    /// GET /share/data/{share_code}
    pub fn get_supplier_submitted_information(&self, share_code: &str) -> ApiResult<Value> {
        self.client.get(&format!("/share/data/{share_code}"))
    }

    /// GET /share/data/{share_code}/document/{document_id}
    ///
    /// The platform answers with a redirect to the stored file, which is
    /// followed once.
    pub fn get_document_within_supplier_submitted_information(
        &self,
        share_code: &str,
        document_id: &str,
    ) -> ApiResult<Vec<u8>> {
        self.client
            .get_bytes(&format!("/share/data/{share_code}/document/{document_id}"))
    }

    /// GET /share/data/{share_code}/file
    pub fn get_supplier_submitted_information_as_file(&self, share_code: &str) -> ApiResult<Vec<u8>> {
        self.client.get_bytes(&format!("/share/data/{share_code}/file"))
    }

    /// POST /share/data/verify
    pub fn verify_shared_data_is_latest_version(
        &self,
        share_code: &str,
        form_version_id: &str,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("shareCode", share_code)
            .with("formVersionId", form_version_id);
        self.client.post("/share/data/verify", body)
    }

    /// GET /share/organisations/{organisation_id}/codes
    pub fn get_organisation_sharecodes(&self, organisation_id: &str) -> ApiResult<Value> {
        self.client
            .get(&format!("/share/organisations/{organisation_id}/codes"))
    }
}
