//! Communications between admins and suppliers, and site-wide system messages

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Filters for [`DataApiClient::find_communications`]
#[derive(Debug, Clone, Default)]
pub struct FindCommunications {
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Framework slug
    pub framework: Option<String>,
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// Only resolved (or unresolved) communications
    pub resolved: Option<bool>,
    /// Resolution to match
    pub resolution: Option<String>,
    /// Communication category
    pub category: Option<String>,
    /// Text within the subject
    pub subject: Option<String>,
    /// Text within the supplier name
    pub supplier_name: Option<String>,
    /// Text within any message
    pub message_text: Option<String>,
    /// `field:direction`, e.g. `supplier_name:asc`
    pub sort_by: Option<String>,
}

impl FindCommunications {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("page", self.page)
            .opt("framework", self.framework.as_deref())
            .opt("supplier_id", self.supplier_id)
            .flag("resolved", self.resolved)
            .opt("resolution", self.resolution.as_deref())
            .opt("category", self.category.as_deref())
            .opt("subject", self.subject.as_deref())
            .opt("supplier_name", self.supplier_name.as_deref())
            .opt("message_text", self.message_text.as_deref())
            .opt("sort_by", self.sort_by.as_deref())
    }
}

impl DataApiClient {
    /// GET /communications
    pub fn find_communications(&self, filters: FindCommunications) -> ApiResult<Value> {
        self.client.get_with("/communications", filters.query())
    }

    /// Every communication matching `filters`, across pages
    pub fn find_communications_iter(
        &self,
        filters: FindCommunications,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client
            .pages("communications", "/communications", filters.query())
    }

    /// GET /communications/{id}
    pub fn get_communication(&self, communication_id: u64) -> ApiResult<Value> {
        self.client
            .get(&format!("/communications/{communication_id}"))
    }

    /// Open a communication with its first message
    ///
    /// POST /communications
    pub fn create_communication(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        category: &str,
        subject: &str,
        message: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let communication = Envelope::new()
            .with("supplierId", supplier_id)
            .with("frameworkSlug", framework_slug)
            .with("category", category)
            .with("subject", subject)
            .with("messages", message);
        let body = Envelope::wrap("communications", communication).updated_by(self.user(user)?);
        self.client.post("/communications", body)
    }

    /// POST /communications/{id}
    pub fn update_communication(
        &self,
        communication_id: u64,
        communication: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("communications", communication).updated_by(self.user(user)?);
        self.client
            .post(&format!("/communications/{communication_id}"), body)
    }

    /// POST /communications/{id}/resolve
    pub fn resolve_communication(
        &self,
        communication_id: u64,
        resolved_by_user_id: u64,
        resolution: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("resolvedByUserId", resolved_by_user_id)
            .with("resolution", resolution)
            .updated_by(self.user(user)?);
        self.client
            .post(&format!("/communications/{communication_id}/resolve"), body)
    }

    /// POST /communications/{id}/undo-resolve
    pub fn undo_resolve_communication(
        &self,
        communication_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client.post(
            &format!("/communications/{communication_id}/undo-resolve"),
            body,
        )
    }

    /// Add a message to an existing communication
    ///
    /// POST /communications/{id}/messages
    pub fn create_communication_message(
        &self,
        communication_id: u64,
        message: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("communicationMessages", message).updated_by(self.user(user)?);
        self.client.post(
            &format!("/communications/{communication_id}/messages"),
            body,
        )
    }

    /// POST /communications/messages/{id}/read
    pub fn read_communication_message(
        &self,
        message_id: u64,
        read_by_user_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("readByUserId", read_by_user_id)
            .updated_by(self.user(user)?);
        self.client.post(
            &format!("/communications/messages/{message_id}/read"),
            body,
        )
    }

    /// Categories a supplier may file communications under for a framework
    pub fn get_framework_communication_categories(&self, framework_slug: &str) -> ApiResult<Value> {
        self.client
            .get(&format!("/communications/{framework_slug}/categories"))
    }

    /// GET /system-messages/{slug}
    pub fn get_system_message(&self, slug: &str) -> ApiResult<Value> {
        self.client.get(&format!("/system-messages/{slug}"))
    }

    /// POST /system-messages
    pub fn create_system_message(
        &self,
        slug: &str,
        data: Value,
        show: Option<bool>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let message = Envelope::new()
            .with("slug", slug)
            .with("data", data)
            .with_opt("show", show);
        let body = Envelope::wrap("systemMessages", message).updated_by(self.user(user)?);
        self.client.post("/system-messages", body)
    }

    /// Change a system message's content, its visibility, or both
    pub fn update_system_message(
        &self,
        slug: &str,
        data: Option<Value>,
        show: Option<bool>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let message = Envelope::new()
            .with_opt("data", data)
            .with_opt("show", show);
        let body = Envelope::wrap("systemMessages", message).updated_by(self.user(user)?);
        self.client
            .post(&format!("/system-messages/{slug}"), body)
    }
}
