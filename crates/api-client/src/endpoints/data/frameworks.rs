//! Frameworks, their statistics and communication categories

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use serde_json::Value;

/// A framework to be created in the `coming` state
#[derive(Debug, Clone, Default)]
pub struct NewFramework {
    /// Framework slug, e.g. `g-cloud-12`
    pub slug: String,
    /// Display name
    pub name: String,
    /// Family slug, e.g. `g-cloud`
    pub framework: String,
    /// Lot slugs
    pub lots: Vec<String>,
    /// Buyers can award directly
    pub has_direct_award: bool,
    /// Buyers can run further competitions
    pub has_further_competition: bool,
    /// Applications are evaluated
    pub has_evaluation: bool,
    /// Suppliers supply technical ability certificates
    pub has_technical_ability_certificate: bool,
    /// Lots carry pricing
    pub has_lot_pricing: bool,
    /// Clarification questions are accepted
    pub clarification_questions_open: bool,
}

impl NewFramework {
    fn into_envelope(self) -> Envelope {
        Envelope::new()
            .with("slug", self.slug)
            .with("name", self.name)
            .with("framework", self.framework)
            .with("lots", self.lots)
            .with("hasDirectAward", self.has_direct_award)
            .with("hasFurtherCompetition", self.has_further_competition)
            .with("hasEvaluation", self.has_evaluation)
            .with("hasTechnicalAbilityCertificate", self.has_technical_ability_certificate)
            .with("hasLotPricing", self.has_lot_pricing)
            .with("clarificationQuestionsOpen", self.clarification_questions_open)
            .with("status", "coming")
    }
}

impl DataApiClient {
    /// POST /frameworks
    pub fn create_framework(&self, framework: NewFramework, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::wrap("frameworks", framework.into_envelope())
            .updated_by(self.user(user)?);
        self.client.post("/frameworks", body)
    }

    /// GET /frameworks/{framework}
    pub fn get_framework(&self, framework_slug: &str) -> ApiResult<Value> {
        self.client.get(&format!("/frameworks/{framework_slug}"))
    }

    /// GET /frameworks
    pub fn find_frameworks(&self) -> ApiResult<Value> {
        self.client.get("/frameworks")
    }

    /// POST /frameworks/{framework}
    pub fn update_framework(
        &self,
        framework_slug: &str,
        frameworks: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("frameworks", frameworks).updated_by(self.user(user)?);
        self.client
            .post(&format!("/frameworks/{framework_slug}"), body)
    }

    /// Suppliers who registered interest in a framework
    pub fn get_interested_suppliers(&self, framework_slug: &str) -> ApiResult<Value> {
        self.client
            .get(&format!("/frameworks/{framework_slug}/interest"))
    }

    /// GET /frameworks/{framework}/stats
    pub fn get_framework_stats(&self, framework_slug: &str) -> ApiResult<Value> {
        self.client
            .get(&format!("/frameworks/{framework_slug}/stats"))
    }

    /// Open a new Digital Outcomes and Specialists iteration and close the old one
    ///
    /// POST /frameworks/transition-dos/{framework}
    pub fn transition_dos_framework(
        &self,
        framework_slug: &str,
        expiring_framework_slug: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("expiringFramework", expiring_framework_slug)
            .updated_by(self.user(user)?);
        self.client
            .post(&format!("/frameworks/transition-dos/{framework_slug}"), body)
    }

    /// POST /frameworks/{framework}/communication-category
    pub fn update_framework_communication_category(
        &self,
        framework_slug: &str,
        communication_categories: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("communicationCategories", communication_categories)
            .updated_by(self.user(user)?);
        self.client.post(
            &format!("/frameworks/{framework_slug}/communication-category"),
            body,
        )
    }

    /// DELETE /frameworks/{framework}/communication-category
    pub fn delete_framework_communication_category(
        &self,
        framework_slug: &str,
        communication_category: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("communicationCategory", communication_category)
            .updated_by(self.user(user)?);
        self.client.delete(
            &format!("/frameworks/{framework_slug}/communication-category"),
            Some(body.into()),
        )
    }
}
