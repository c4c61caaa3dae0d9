//! Antivirus API: scanning uploaded documents

use crate::client::BaseClient;
use dm_api_core::auth::Auth;
use dm_api_core::config::{ClientConfig, ConfigSource};
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use serde_json::Value;

/// Configuration key for the Antivirus API URL
pub const ANTIVIRUS_API_URL: &str = "DM_ANTIVIRUS_API_URL";

/// Configuration key for the Antivirus API key
pub const ANTIVIRUS_API_KEY: &str = "DM_ANTIVIRUS_API_KEY";

/// Header carrying the Antivirus API key
pub const ANTIVIRUS_API_KEY_HEADER: &str = "X-Api-Key";

/// Antivirus API client
#[derive(Debug, Clone)]
pub struct AntivirusApiClient {
    client: BaseClient,
}

impl AntivirusApiClient {
    /// Create a client; the key is sent in the `X-Api-Key` header
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::ApiKeyHeader(ANTIVIRUS_API_KEY_HEADER))?,
        })
    }

    /// Bind URL and key from `DM_ANTIVIRUS_API_URL` / `DM_ANTIVIRUS_API_KEY`
    pub fn init_app(&mut self, source: &impl ConfigSource) -> ApiResult<()> {
        let url = source.require(ANTIVIRUS_API_URL)?;
        let key = source.require(ANTIVIRUS_API_KEY)?;
        self.client.init(url, key);
        Ok(())
    }

    /// Underlying engine
    #[must_use]
    pub fn client(&self) -> &BaseClient {
        &self.client
    }

    /// GET /_status
    pub fn get_status(&self) -> ApiResult<Value> {
        self.client.get_status()
    }

    /// Scan an S3 object version and tag it with the result
    ///
    /// POST /scan/s3-object
    pub fn scan_and_tag_s3_object(
        &self,
        bucket_name: &str,
        object_key: &str,
        object_version_id: &str,
        dry_run: bool,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("bucketName", bucket_name)
            .with("objectKey", object_key)
            .with("objectVersionId", object_version_id)
            .with("dryRun", dry_run);
        self.client.post("/scan/s3-object", body)
    }
}
