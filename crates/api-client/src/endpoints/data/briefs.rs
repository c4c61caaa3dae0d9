//! Buyer briefs, supplier responses to them and contract awards

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Filters for [`DataApiClient::find_briefs`]
#[derive(Debug, Clone, Default)]
pub struct FindBriefs {
    /// Only briefs owned by this user
    pub user_id: Option<u64>,
    /// Comma-separated statuses
    pub status: Option<String>,
    /// Framework slug
    pub framework: Option<String>,
    /// Lot slug
    pub lot: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Render dates and labels for people rather than machines
    pub human: Option<bool>,
    /// Embed the brief owners
    pub with_users: Option<bool>,
    /// Embed clarification questions
    pub with_clarification_questions: Option<bool>,
    /// Closed on this date
    pub closed_on: Option<String>,
    /// Withdrawn on this date
    pub withdrawn_on: Option<String>,
    /// Cancelled on this date
    pub cancelled_on: Option<String>,
    /// Marked unsuccessful on this date
    pub unsuccessful_on: Option<String>,
    /// Extra date bounds passed through verbatim, e.g. `("closed_after", "2017-10-20")`
    pub status_date_filters: Vec<(String, String)>,
}

impl FindBriefs {
    fn query(&self) -> QueryParams {
        let mut query = QueryParams::new()
            .opt("user_id", self.user_id)
            .opt("status", self.status.as_deref())
            .opt("framework", self.framework.as_deref())
            .opt("lot", self.lot.as_deref())
            .opt("page", self.page)
            .flag("human", self.human)
            .title_flag("with_users", self.with_users)
            .title_flag("with_clarification_questions", self.with_clarification_questions)
            .opt("closed_on", self.closed_on.as_deref())
            .opt("withdrawn_on", self.withdrawn_on.as_deref())
            .opt("cancelled_on", self.cancelled_on.as_deref())
            .opt("unsuccessful_on", self.unsuccessful_on.as_deref());
        for (key, value) in &self.status_date_filters {
            query.set(key.as_str(), value);
        }
        query
    }
}

/// Filters for [`DataApiClient::find_brief_responses`]
#[derive(Debug, Clone, Default)]
pub struct FindBriefResponses {
    /// Brief the responses answer
    pub brief_id: Option<u64>,
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// Status to match
    pub status: Option<String>,
    /// Framework slug
    pub framework: Option<String>,
    /// Award date
    pub awarded_at: Option<String>,
    /// Include the full response answers
    pub with_data: Option<bool>,
    /// Page number, starting at 1
    pub page: Option<u32>,
}

impl FindBriefResponses {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("brief_id", self.brief_id)
            .opt("supplier_id", self.supplier_id)
            .opt("status", self.status.as_deref())
            .opt("framework", self.framework.as_deref())
            .opt("awarded_at", self.awarded_at.as_deref())
            .flag("with-data", self.with_data)
            .opt("page", self.page)
    }
}

impl DataApiClient {
    /// POST /briefs
    pub fn create_brief(
        &self,
        framework_slug: &str,
        lot_slug: &str,
        user_id: u64,
        data: Value,
        user: Option<&str>,
        page_questions: Option<Vec<String>>,
    ) -> ApiResult<Value> {
        let brief = Envelope::flatten(data)
            .with("frameworkSlug", framework_slug)
            .with("lot", lot_slug)
            .with("userId", user_id);
        let body = Envelope::wrap("briefs", brief)
            .with("page_questions", page_questions.unwrap_or_default())
            .updated_by(self.user(user)?);
        self.client.post("/briefs", body)
    }

    /// POST /briefs/{id}/copy
    pub fn copy_brief(&self, brief_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.brief_action(brief_id, "copy", user)
    }

    /// POST /briefs/{id}
    pub fn update_brief(
        &self,
        brief_id: u64,
        brief: Value,
        user: Option<&str>,
        page_questions: Option<Vec<String>>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("briefs", brief)
            .with("page_questions", page_questions.unwrap_or_default())
            .updated_by(self.user(user)?);
        self.client.post(&format!("/briefs/{brief_id}"), body)
    }

    /// Award a brief to one of its responses
    ///
    /// POST /briefs/{id}/award
    pub fn update_brief_award_brief_response(
        &self,
        brief_id: u64,
        brief_response_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("briefResponseId", brief_response_id)
            .updated_by(self.user(user)?);
        self.client.post(&format!("/briefs/{brief_id}/award"), body)
    }

    /// POST /briefs/{id}/award/{response}/contract-details
    pub fn update_brief_award_details(
        &self,
        brief_id: u64,
        brief_response_id: u64,
        award_details: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("awardDetails", award_details).updated_by(self.user(user)?);
        self.client.post(
            &format!("/briefs/{brief_id}/award/{brief_response_id}/contract-details"),
            body,
        )
    }

    /// DELETE /briefs/{id}/award/{response}/contract-details
    pub fn unaward_brief_response(
        &self,
        brief_id: u64,
        brief_response_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client.delete(
            &format!("/briefs/{brief_id}/award/{brief_response_id}/contract-details"),
            Some(body.into()),
        )
    }

    /// POST /briefs/{id}/publish
    pub fn publish_brief(&self, brief_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.brief_action(brief_id, "publish", user)
    }

    /// POST /briefs/{id}/cancel
    pub fn cancel_brief(&self, brief_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.brief_action(brief_id, "cancel", user)
    }

    /// POST /briefs/{id}/withdraw
    pub fn withdraw_brief(&self, brief_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.brief_action(brief_id, "withdraw", user)
    }

    /// POST /briefs/{id}/unsuccessful
    pub fn update_brief_as_unsuccessful(
        &self,
        brief_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        self.brief_action(brief_id, "unsuccessful", user)
    }

    /// DELETE /briefs/{id}
    pub fn delete_brief(&self, brief_id: u64, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .delete(&format!("/briefs/{brief_id}"), Some(body.into()))
    }

    /// GET /briefs/{id}
    pub fn get_brief(&self, brief_id: u64) -> ApiResult<Value> {
        self.client.get(&format!("/briefs/{brief_id}"))
    }

    /// GET /briefs
    pub fn find_briefs(&self, filters: FindBriefs) -> ApiResult<Value> {
        self.client.get_with("/briefs", filters.query())
    }

    /// Every brief matching `filters`, across pages
    pub fn find_briefs_iter(
        &self,
        filters: FindBriefs,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages("briefs", "/briefs", filters.query())
    }

    /// Whether any of the supplier's services qualify it to respond to a brief
    pub fn is_supplier_eligible_for_brief(&self, supplier_id: u64, brief_id: u64) -> ApiResult<bool> {
        let response = self.client.get_with(
            &format!("/briefs/{brief_id}/services"),
            QueryParams::new().with("supplier_id", supplier_id),
        )?;
        Ok(response["services"]
            .as_array()
            .is_some_and(|services| !services.is_empty()))
    }

    /// POST /briefs/{id}/clarification-questions
    pub fn add_brief_clarification_question(
        &self,
        brief_id: u64,
        question: &str,
        answer: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let clarification = Envelope::new()
            .with("question", question)
            .with("answer", answer);
        let body = Envelope::wrap("clarificationQuestion", clarification)
            .updated_by(self.user(user)?);
        self.client.post(
            &format!("/briefs/{brief_id}/clarification-questions"),
            body,
        )
    }

    /// POST /brief-responses
    pub fn create_brief_response(
        &self,
        brief_id: u64,
        supplier_id: u64,
        data: Value,
        user: Option<&str>,
        page_questions: Option<Vec<String>>,
    ) -> ApiResult<Value> {
        let response = Envelope::flatten(data)
            .with("briefId", brief_id)
            .with("supplierId", supplier_id);
        let body = Envelope::wrap("briefResponses", response)
            .with("page_questions", page_questions.unwrap_or_default())
            .updated_by(self.user(user)?);
        self.client.post("/brief-responses", body)
    }

    /// POST /brief-responses/{id}
    pub fn update_brief_response(
        &self,
        brief_response_id: u64,
        data: Value,
        user: Option<&str>,
        page_questions: Option<Vec<String>>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("briefResponses", data)
            .with("page_questions", page_questions.unwrap_or_default())
            .updated_by(self.user(user)?);
        self.client
            .post(&format!("/brief-responses/{brief_response_id}"), body)
    }

    /// POST /brief-responses/{id}/submit
    pub fn submit_brief_response(
        &self,
        brief_response_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/brief-responses/{brief_response_id}/submit"), body)
    }

    /// GET /brief-responses/{id}
    pub fn get_brief_response(&self, brief_response_id: u64) -> ApiResult<Value> {
        self.client
            .get(&format!("/brief-responses/{brief_response_id}"))
    }

    /// GET /brief-responses
    pub fn find_brief_responses(&self, filters: FindBriefResponses) -> ApiResult<Value> {
        self.client.get_with("/brief-responses", filters.query())
    }

    /// Every brief response matching `filters`, across pages
    pub fn find_brief_responses_iter(
        &self,
        filters: FindBriefResponses,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client
            .pages("briefResponses", "/brief-responses", filters.query())
    }

    fn brief_action(&self, brief_id: u64, action: &str, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/briefs/{brief_id}/{action}"), body)
    }
}
