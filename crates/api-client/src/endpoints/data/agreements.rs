//! Framework agreements: signing, approval and countersignature

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use serde_json::Value;

impl DataApiClient {
    /// GET /agreements/{id}
    pub fn get_framework_agreement(&self, agreement_id: u64) -> ApiResult<Value> {
        self.client.get(&format!("/agreements/{agreement_id}"))
    }

    /// POST /agreements
    pub fn create_framework_agreement(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        signed_agreement_details: Option<Value>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let agreement = Envelope::new()
            .with("supplierId", supplier_id)
            .with("frameworkSlug", framework_slug)
            .with_opt("signedAgreementDetails", signed_agreement_details);
        let body = Envelope::wrap("agreement", agreement).updated_by(self.user(user)?);
        self.client.post("/agreements", body)
    }

    /// POST /agreements/{id}
    pub fn update_framework_agreement(
        &self,
        agreement_id: u64,
        agreement: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("agreement", agreement).updated_by(self.user(user)?);
        self.client.post(&format!("/agreements/{agreement_id}"), body)
    }

    /// Sign an agreement, optionally recording the final signer details
    ///
    /// POST /agreements/{id}/sign
    pub fn sign_framework_agreement(
        &self,
        agreement_id: u64,
        signed_agreement_details: Option<Value>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let mut body = Envelope::new().updated_by(self.user(user)?);
        if let Some(details) = signed_agreement_details {
            body = body.with(
                "agreement",
                Envelope::wrap("signedAgreementDetails", details),
            );
        }
        self.client
            .post(&format!("/agreements/{agreement_id}/sign"), body)
    }

    /// POST /agreements/{id}/on-hold
    pub fn put_signed_agreement_on_hold(
        &self,
        agreement_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/agreements/{agreement_id}/on-hold"), body)
    }

    /// POST /agreements/{id}/approve
    pub fn approve_agreement_for_countersignature(
        &self,
        agreement_id: u64,
        user: Option<&str>,
        user_id: u64,
    ) -> ApiResult<Value> {
        self.approval(agreement_id, user, user_id, false)
    }

    /// Withdraw an approval; the API takes this on the approve endpoint
    pub fn unapprove_agreement_for_countersignature(
        &self,
        agreement_id: u64,
        user: Option<&str>,
        user_id: u64,
    ) -> ApiResult<Value> {
        self.approval(agreement_id, user, user_id, true)
    }

    /// POST /agreements/{id}/undo-countersign
    pub fn update_framework_agreement_undo_countersign(
        &self,
        agreement_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/agreements/{agreement_id}/undo-countersign"), body)
    }

    fn approval(
        &self,
        agreement_id: u64,
        user: Option<&str>,
        user_id: u64,
        unapprove: bool,
    ) -> ApiResult<Value> {
        let mut agreement = Envelope::new().with("userId", user_id);
        if unapprove {
            agreement = agreement.with("unapprove", true);
        }
        let body = Envelope::wrap("agreement", agreement).updated_by(self.user(user)?);
        self.client
            .post(&format!("/agreements/{agreement_id}/approve"), body)
    }
}
