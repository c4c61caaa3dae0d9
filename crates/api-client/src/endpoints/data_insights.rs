//! Data insights: Spotlight workflows plus Cyber Essentials behind one client

use super::cyber_essentials::CyberEssentialsClient;
use super::spotlight::{
    FvraMultipleCheckClient, FvraSingleCheckClient, FvraWarmUpClient, SignedWorkflowClient,
    SpotlightDunsClient, WorkflowBindings, DUNS_API_KEY, DUNS_API_URL, MULTIPLE_CHECK_API_KEY,
    MULTIPLE_CHECK_API_URL, SINGLE_CHECK_API_KEY, SINGLE_CHECK_API_URL, WARM_UP_API_KEY,
    WARM_UP_API_URL,
};
use dm_api_core::config::{ClientConfig, ConfigSource};
use dm_api_core::error::ApiResult;
use serde_json::Value;

/// Configuration key holding `KEY=url` pairs for the data insights workflows
pub const DATA_INSIGHTS_API_URLS: &str = "DM_DATA_INSIGHTS_API_URLS";
/// Configuration key holding `KEY=api-key` pairs for the data insights workflows
pub const DATA_INSIGHTS_API_KEYS: &str = "DM_DATA_INSIGHTS_API_KEYS";

const CYBER_ESSENTIALS_API_URL: &str = "DM_IASME_CYBER_ESSENTIALS_API_URL";
const CYBER_ESSENTIALS_API_KEY: &str = "DM_IASME_CYBER_ESSENTIALS_API_KEY";

/// Per-workflow configuration for [`DataInsightsApiClient`]
#[derive(Debug, Clone, Default)]
pub struct DataInsightsOptions {
    /// DUNS organisation search
    pub duns: ClientConfig,
    /// Financial-risk warm-up
    pub warm_up: ClientConfig,
    /// Single-organisation financial check
    pub fvra_single_check: ClientConfig,
    /// Multi-organisation financial check
    pub fvra_multiple_check: ClientConfig,
    /// Cyber Essentials certificate lookup
    pub cyber_essentials: ClientConfig,
}

/// Organisation insight workflows behind one client
#[derive(Debug, Clone)]
pub struct DataInsightsApiClient {
    duns: SpotlightDunsClient,
    warm_up: FvraWarmUpClient,
    fvra_single_check: FvraSingleCheckClient,
    fvra_multiple_check: FvraMultipleCheckClient,
    cyber_essentials: CyberEssentialsClient,
}

impl DataInsightsApiClient {
    /// Create the workflow clients
    pub fn new(options: DataInsightsOptions) -> ApiResult<Self> {
        Ok(Self {
            duns: SpotlightDunsClient::new(options.duns)?,
            warm_up: FvraWarmUpClient::new(options.warm_up)?,
            fvra_single_check: FvraSingleCheckClient::new(options.fvra_single_check)?,
            fvra_multiple_check: FvraMultipleCheckClient::new(options.fvra_multiple_check)?,
            cyber_essentials: CyberEssentialsClient::new(options.cyber_essentials)?,
        })
    }

    /// Bind every workflow from `DM_DATA_INSIGHTS_API_URLS` / `DM_DATA_INSIGHTS_API_KEYS`
    pub fn init_app(&mut self, source: &impl ConfigSource) -> ApiResult<()> {
        let bindings =
            WorkflowBindings::from_source(source, DATA_INSIGHTS_API_URLS, DATA_INSIGHTS_API_KEYS)?;
        bindings.bind(&mut self.duns, DUNS_API_URL, DUNS_API_KEY)?;
        bindings.bind(&mut self.warm_up, WARM_UP_API_URL, WARM_UP_API_KEY)?;
        bindings.bind(&mut self.fvra_single_check, SINGLE_CHECK_API_URL, SINGLE_CHECK_API_KEY)?;
        bindings.bind(&mut self.fvra_multiple_check, MULTIPLE_CHECK_API_URL, MULTIPLE_CHECK_API_KEY)?;
        bindings.bind(&mut self.cyber_essentials, CYBER_ESSENTIALS_API_URL, CYBER_ESSENTIALS_API_KEY)
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

    /// Cyber Essentials client
    #[must_use]
    pub fn cyber_essentials(&self) -> &CyberEssentialsClient {
        &self.cyber_essentials
    }

    /// There is no status endpoint
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

    /// See [`CyberEssentialsClient::get_cyber_essentials_certificate`]
    pub fn get_cyber_essentials_certificate(&self, certificate_number: &str) -> ApiResult<Value> {
        self.cyber_essentials
            .get_cyber_essentials_certificate(certificate_number)
    }
}
