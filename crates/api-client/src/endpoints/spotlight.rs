//! Spotlight organisation-verification and financial-risk workflows
//!
//! Each workflow lives at its own URL with its own key, so there is one
//! client per workflow and [`SpotlightApiClient`] bundles them. All of them
//! authenticate with signed query parameters.

use crate::client::BaseClient;
use dm_api_core::auth::{Auth, ROUTE_MANUAL, ROUTE_TRIGGER};
use dm_api_core::config::{parse_key_values, ClientConfig, ConfigSource};
use dm_api_core::envelope::reshape;
use dm_api_core::error::{ApiError, ApiResult};
use dm_api_core::request::{RequestDescriptor, ResponseMode};
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

const POST_IDENTITY_SEARCH: &str =
    "/workflows/5319fad3d7e341a89183b32df72671ba/triggers/manual/paths/invoke";
const POST_FVRA_WARM_UP: &str =
    "/workflows/91fa768cca7348cab37695fcf34b1262/triggers/Trigger/paths/invoke";
const POST_SINGLE_FINANCIALS_CHECK: &str =
    "/workflows/9f848cc1409f441ca6bae23793ba7960/triggers/Trigger/paths/invoke";
const POST_MULTIPLE_FINANCIALS_CHECK: &str =
    "/workflows/6d3d793e151a4a2c86af189bcca435dd/triggers/Trigger/paths/invoke";

/// Body the warm-up workflow answers with once the check is queued
const WARM_UP_ACCEPTED: &[u8] = b"'Call received.'";

/// Configuration key holding `KEY=url` pairs for the Spotlight workflows
pub const SPOTLIGHT_API_URLS: &str = "DM_SPOTLIGHT_API_URLS";
/// Configuration key holding `KEY=api-key` pairs for the Spotlight workflows
pub const SPOTLIGHT_API_KEYS: &str = "DM_SPOTLIGHT_API_KEYS";

pub(crate) const DUNS_API_URL: &str = "DM_SPOTLIGHT_DUNS_API_URL";
pub(crate) const DUNS_API_KEY: &str = "DM_SPOTLIGHT_DUNS_API_KEY";
pub(crate) const WARM_UP_API_URL: &str = "DM_SPOTLIGHT_FVRA_WARM_UP_API_URL";
pub(crate) const WARM_UP_API_KEY: &str = "DM_SPOTLIGHT_FVRA_WARM_UP_API_KEY";
pub(crate) const SINGLE_CHECK_API_URL: &str = "DM_SPOTLIGHT_FVRA_SINGLE_CHECK_API_URL";
pub(crate) const SINGLE_CHECK_API_KEY: &str = "DM_SPOTLIGHT_FVRA_SINGLE_CHECK_API_KEY";
pub(crate) const MULTIPLE_CHECK_API_URL: &str = "DM_SPOTLIGHT_FVRA_MULTIPLE_CHECK_API_URL";
pub(crate) const MULTIPLE_CHECK_API_KEY: &str = "DM_SPOTLIGHT_FVRA_MULTIPLE_CHECK_API_KEY";

// -----------------------------------------------------------------------------
// Shared behaviour
// -----------------------------------------------------------------------------

/// Behaviour shared by clients of signed workflow endpoints
pub trait SignedWorkflowClient {
    /// Underlying engine
    fn client(&self) -> &BaseClient;

    /// Underlying engine, mutably
    fn client_mut(&mut self) -> &mut BaseClient;

    /// Rebind base URL and API key
    fn init_app(&mut self, base_url: &str, api_key: &str) {
        self.client_mut().init(base_url, api_key);
    }

    /// The configured base URL
    fn base_url(&self) -> Option<&str> {
        self.client().base_url()
    }

    /// The configured API key, sent as the `sig` parameter
    fn api_key(&self) -> Option<&str> {
        self.client().credential()
    }

    /// Workflows have no status endpoint
    fn get_status(&self) -> ApiResult<Value> {
        Err(ApiError::NotFound("status endpoint".into()))
    }
}

/// URL and key pairs read for a group of workflow clients
pub(crate) struct WorkflowBindings {
    urls: HashMap<String, String>,
    keys: HashMap<String, String>,
}

impl WorkflowBindings {
    pub(crate) fn from_source(
        source: &impl ConfigSource,
        urls_key: &str,
        keys_key: &str,
    ) -> ApiResult<Self> {
        Ok(Self {
            urls: parse_key_values(&source.require(urls_key)?)?,
            keys: parse_key_values(&source.require(keys_key)?)?,
        })
    }

    pub(crate) fn bind(
        &self,
        client: &mut impl SignedWorkflowClient,
        url_key: &str,
        api_key_key: &str,
    ) -> ApiResult<()> {
        let url = self
            .urls
            .get(url_key)
            .ok_or_else(|| ApiError::config(format!("missing configuration key {url_key}")))?;
        let key = self
            .keys
            .get(api_key_key)
            .ok_or_else(|| ApiError::config(format!("missing configuration key {api_key_key}")))?;
        client.init_app(url, key);
        Ok(())
    }
}

fn check_request(duns_numbers: impl Into<Value>) -> Value {
    json!({
        "Account": [{
            "DunsNumber": duns_numbers.into(),
            "OnDemandChecks": "true",
            "PartOfDailyChecks": "false",
        }]
    })
}

// -----------------------------------------------------------------------------
// Workflow clients
// -----------------------------------------------------------------------------

/// Organisation lookup by DUNS number
#[derive(Debug, Clone)]
pub struct SpotlightDunsClient {
    client: BaseClient,
}

impl SpotlightDunsClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::SignedQuery { route: ROUTE_MANUAL })?,
        })
    }

    /// Find an organisation by DUNS number
    ///
    /// Answers `{"organisations": <first match>}`. A body that is not JSON,
    /// or one without a first `searchOrganisation` entry, means no match and
    /// is reported as a 404.
    pub fn find_organisation_from_duns_number(&self, duns_number: &str) -> ApiResult<Value> {
        let body = json!({
            "requestType": "SearchOrganisation",
            "parameters": {"dunsNumber": duns_number},
        });

        let found = self
            .client
            .post(POST_IDENTITY_SEARCH, body)
            .and_then(|response| reshape(&response, "/searchOrganisation/0", "organisations"));

        match found {
            Ok(organisation) => Ok(organisation),
            Err(ApiError::InvalidResponse { message, .. }) => {
                warn!(error = %message, "Organisation search returned no usable match");
                Err(ApiError::http(
                    404,
                    format!("Could not find organisation with Duns Number {duns_number}"),
                ))
            }
            Err(e) => Err(e),
        }
    }
}

impl SignedWorkflowClient for SpotlightDunsClient {
    fn client(&self) -> &BaseClient {
        &self.client
    }

    fn client_mut(&mut self) -> &mut BaseClient {
        &mut self.client
    }
}

/// Financial-risk check warm-up
#[derive(Debug, Clone)]
pub struct FvraWarmUpClient {
    client: BaseClient,
}

impl FvraWarmUpClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::SignedQuery { route: ROUTE_TRIGGER })?,
        })
    }

    /// Ask Spotlight to start checking an organisation
    ///
    /// Answers `{"message": "done"}` once the workflow acknowledges the call.
    pub fn inform_spotlight_of_duns_number_for_check(
        &self,
        duns_number: &str,
        organisation_name: &str,
    ) -> ApiResult<Value> {
        if !self.client.is_enabled() {
            return Ok(json!({}));
        }

        let body = json!({
            "Account": [{
                "Name": organisation_name,
                "DunsNumber": duns_number,
                "OnDemandChecks": "true",
                "PartOfDailyChecks": "false",
            }]
        });
        let request = RequestDescriptor::new(Method::POST, POST_FVRA_WARM_UP)
            .with_json(body)
            .with_mode(ResponseMode::Bytes);
        let response = self.client.execute(request)?.into_bytes();

        if response == WARM_UP_ACCEPTED {
            return Ok(json!({"message": "done"}));
        }

        warn!(bytes = response.len(), "Warm-up workflow did not acknowledge the call");
        Err(ApiError::http(
            500,
            format!("Could not initiate warm up with Duns Number {duns_number}"),
        ))
    }
}

impl SignedWorkflowClient for FvraWarmUpClient {
    fn client(&self) -> &BaseClient {
        &self.client
    }

    fn client_mut(&mut self) -> &mut BaseClient {
        &mut self.client
    }
}

/// Financial metrics for one organisation
#[derive(Debug, Clone)]
pub struct FvraSingleCheckClient {
    client: BaseClient,
}

impl FvraSingleCheckClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::SignedQuery { route: ROUTE_TRIGGER })?,
        })
    }

    /// Answers `{"organisationMetrics": <first result set>}`
    pub fn get_financials_from_duns_number(&self, duns_number: &str) -> ApiResult<Value> {
        let response = self
            .client
            .post(POST_SINGLE_FINANCIALS_CHECK, check_request(duns_number))?;
        reshape(&response, "/ResultSets/0", "organisationMetrics")
    }
}

impl SignedWorkflowClient for FvraSingleCheckClient {
    fn client(&self) -> &BaseClient {
        &self.client
    }

    fn client_mut(&mut self) -> &mut BaseClient {
        &mut self.client
    }
}

/// Financial metrics for several organisations
#[derive(Debug, Clone)]
pub struct FvraMultipleCheckClient {
    client: BaseClient,
}

impl FvraMultipleCheckClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::SignedQuery { route: ROUTE_TRIGGER })?,
        })
    }

    /// Answers `{"organisationMetrics": <ResultSets.Table1>}`
    ///
    /// `DunsNumber` is sent as a list here, unlike the single check.
    pub fn get_financials_from_duns_numbers(&self, duns_numbers: &[&str]) -> ApiResult<Value> {
        let response = self
            .client
            .post(POST_MULTIPLE_FINANCIALS_CHECK, check_request(duns_numbers.to_vec()))?;
        reshape(&response, "/ResultSets/Table1", "organisationMetrics")
    }
}

impl SignedWorkflowClient for FvraMultipleCheckClient {
    fn client(&self) -> &BaseClient {
        &self.client
    }

    fn client_mut(&mut self) -> &mut BaseClient {
        &mut self.client
    }
}

// -----------------------------------------------------------------------------
// Composite
// -----------------------------------------------------------------------------

/// Per-workflow configuration for [`SpotlightApiClient`]
#[derive(Debug, Clone, Default)]
pub struct SpotlightOptions {
    /// DUNS organisation search
    pub duns: ClientConfig,
    /// Financial-risk warm-up
    pub warm_up: ClientConfig,
    /// Single-organisation financial check
    pub fvra_single_check: ClientConfig,
    /// Multi-organisation financial check
    pub fvra_multiple_check: ClientConfig,
}

/// The four Spotlight workflows behind one client
#[derive(Debug, Clone)]
pub struct SpotlightApiClient {
    duns: SpotlightDunsClient,
    warm_up: FvraWarmUpClient,
    fvra_single_check: FvraSingleCheckClient,
    fvra_multiple_check: FvraMultipleCheckClient,
}

impl SpotlightApiClient {
    /// Create the workflow clients
    pub fn new(options: SpotlightOptions) -> ApiResult<Self> {
        Ok(Self {
            duns: SpotlightDunsClient::new(options.duns)?,
            warm_up: FvraWarmUpClient::new(options.warm_up)?,
            fvra_single_check: FvraSingleCheckClient::new(options.fvra_single_check)?,
            fvra_multiple_check: FvraMultipleCheckClient::new(options.fvra_multiple_check)?,
        })
    }

    /// Bind every workflow from `DM_SPOTLIGHT_API_URLS` / `DM_SPOTLIGHT_API_KEYS`
    pub fn init_app(&mut self, source: &impl ConfigSource) -> ApiResult<()> {
        let bindings = WorkflowBindings::from_source(source, SPOTLIGHT_API_URLS, SPOTLIGHT_API_KEYS)?;
        bindings.bind(&mut self.duns, DUNS_API_URL, DUNS_API_KEY)?;
        bindings.bind(&mut self.warm_up, WARM_UP_API_URL, WARM_UP_API_KEY)?;
        bindings.bind(&mut self.fvra_single_check, SINGLE_CHECK_API_URL, SINGLE_CHECK_API_KEY)?;
        bindings.bind(&mut self.fvra_multiple_check, MULTIPLE_CHECK_API_URL, MULTIPLE_CHECK_API_KEY)
    }

    /// DUNS search client
    #[must_use]
    pub fn duns(&self) -> &SpotlightDunsClient {
        &self.duns
    }

    /// Warm-up client
    #[must_use]
    pub fn warm_up(&self) -> &FvraWarmUpClient {
        &self.warm_up
    }

    /// Single check client
    #[must_use]
    pub fn fvra_single_check(&self) -> &FvraSingleCheckClient {
        &self.fvra_single_check
    }

    /// Multiple check client
    #[must_use]
    pub fn fvra_multiple_check(&self) -> &FvraMultipleCheckClient {
        &self.fvra_multiple_check
    }

    /// Spotlight has no status endpoint
    pub fn get_status(&self) -> ApiResult<Value> {
        self.duns.get_status()
    }

    /// See [`SpotlightDunsClient::find_organisation_from_duns_number`]
    pub fn find_organisation_from_duns_number(&self, duns_number: &str) -> ApiResult<Value> {
        self.duns.find_organisation_from_duns_number(duns_number)
    }

    /// See [`FvraWarmUpClient::inform_spotlight_of_duns_number_for_check`]
    pub fn inform_spotlight_of_duns_number_for_check(
        &self,
        duns_number: &str,
        organisation_name: &str,
    ) -> ApiResult<Value> {
        self.warm_up
            .inform_spotlight_of_duns_number_for_check(duns_number, organisation_name)
    }

    /// See [`FvraSingleCheckClient::get_financials_from_duns_number`]
    pub fn get_financials_from_duns_number(&self, duns_number: &str) -> ApiResult<Value> {
        self.fvra_single_check.get_financials_from_duns_number(duns_number)
    }

    /// See [`FvraMultipleCheckClient::get_financials_from_duns_numbers`]
    pub fn get_financials_from_duns_numbers(&self, duns_numbers: &[&str]) -> ApiResult<Value> {
        self.fvra_multiple_check.get_financials_from_duns_numbers(duns_numbers)
    }
}
