//! Audit events

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::{ApiError, ApiResult};
use dm_api_core::request::QueryParams;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Kinds of audit event the Data API records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AuditType {
    ContactUpdate,
    SupplierUpdate,
    UpdateService,
    UpdateServiceStatus,
    UpdateServiceArchived,
    ImportService,
    CreateDraftService,
    UpdateDraftService,
    CompleteDraftService,
    DeleteDraftService,
    PublishDraftService,
    CreateUser,
    UpdateUser,
    InviteUser,
    RegisterFrameworkInterest,
    AnswerSelectionQuestions,
    SendClarificationQuestion,
    CreateBrief,
    UpdateBrief,
    UpdateBriefStatus,
    DeleteBrief,
    CreateBriefResponse,
    UpdateBriefResponse,
    SubmitBriefResponse,
    AddBriefClarificationQuestion,
    CreateProject,
    UpdateOutcome,
    AgreeFrameworkVariation,
}

impl AuditType {
    /// Every audit type, in declaration order
    pub const ALL: [Self; 28] = [
        Self::ContactUpdate,
        Self::SupplierUpdate,
        Self::UpdateService,
        Self::UpdateServiceStatus,
        Self::UpdateServiceArchived,
        Self::ImportService,
        Self::CreateDraftService,
        Self::UpdateDraftService,
        Self::CompleteDraftService,
        Self::DeleteDraftService,
        Self::PublishDraftService,
        Self::CreateUser,
        Self::UpdateUser,
        Self::InviteUser,
        Self::RegisterFrameworkInterest,
        Self::AnswerSelectionQuestions,
        Self::SendClarificationQuestion,
        Self::CreateBrief,
        Self::UpdateBrief,
        Self::UpdateBriefStatus,
        Self::DeleteBrief,
        Self::CreateBriefResponse,
        Self::UpdateBriefResponse,
        Self::SubmitBriefResponse,
        Self::AddBriefClarificationQuestion,
        Self::CreateProject,
        Self::UpdateOutcome,
        Self::AgreeFrameworkVariation,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContactUpdate => "contact_update",
            Self::SupplierUpdate => "supplier_update",
            Self::UpdateService => "update_service",
            Self::UpdateServiceStatus => "update_service_status",
            Self::UpdateServiceArchived => "update_service_archived",
            Self::ImportService => "import_service",
            Self::CreateDraftService => "create_draft_service",
            Self::UpdateDraftService => "update_draft_service",
            Self::CompleteDraftService => "complete_draft_service",
            Self::DeleteDraftService => "delete_draft_service",
            Self::PublishDraftService => "publish_draft_service",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::InviteUser => "invite_user",
            Self::RegisterFrameworkInterest => "register_framework_interest",
            Self::AnswerSelectionQuestions => "answer_selection_questions",
            Self::SendClarificationQuestion => "send_clarification_question",
            Self::CreateBrief => "create_brief",
            Self::UpdateBrief => "update_brief",
            Self::UpdateBriefStatus => "update_brief_status",
            Self::DeleteBrief => "delete_brief",
            Self::CreateBriefResponse => "create_brief_response",
            Self::UpdateBriefResponse => "update_brief_response",
            Self::SubmitBriefResponse => "submit_brief_response",
            Self::AddBriefClarificationQuestion => "add_brief_clarification_question",
            Self::CreateProject => "create_project",
            Self::UpdateOutcome => "update_outcome",
            Self::AgreeFrameworkVariation => "agree_framework_variation",
        }
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|audit_type| audit_type.as_str() == s)
            .ok_or_else(|| ApiError::UnknownVariant {
                kind: "audit type",
                value: s.to_string(),
            })
    }
}

/// Filters for [`DataApiClient::find_audit_events`]
#[derive(Debug, Clone, Default)]
pub struct FindAuditEvents {
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Page size
    pub per_page: Option<u32>,
    /// Only events of this type
    pub audit_type: Option<AuditType>,
    /// Only events on this date (`YYYY-MM-DD`)
    pub audit_date: Option<String>,
    /// `all`, `true` or `false`
    pub acknowledged: Option<String>,
    /// Type of the audited object, e.g. `suppliers`
    pub object_type: Option<String>,
    /// Id of the audited object
    pub object_id: Option<String>,
    /// Newest events first
    pub latest_first: Option<bool>,
    /// Only the earliest event per object
    pub earliest_for_each_object: Option<bool>,
    /// Acting user
    pub user: Option<String>,
    /// Supplier id recorded in the event data
    pub data_supplier_id: Option<u64>,
    /// Sort field
    pub sort_by: Option<String>,
}

impl FindAuditEvents {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("page", self.page)
            .opt("per_page", self.per_page)
            .opt("audit-type", self.audit_type)
            .opt("audit-date", self.audit_date.as_deref())
            .opt("acknowledged", self.acknowledged.as_deref())
            .opt("object-type", self.object_type.as_deref())
            .opt("object-id", self.object_id.as_deref())
            .title_flag("latest_first", self.latest_first)
            .title_flag("earliest_for_each_object", self.earliest_for_each_object)
            .opt("user", self.user.as_deref())
            .opt("data-supplier-id", self.data_supplier_id)
            .opt("sort_by", self.sort_by.as_deref())
    }
}

impl DataApiClient {
    /// GET /audit-events/{id}
    pub fn get_audit_event(&self, audit_event_id: u64) -> ApiResult<Value> {
        self.client.get(&format!("/audit-events/{audit_event_id}"))
    }

    /// GET /audit-events
    pub fn find_audit_events(&self, filters: FindAuditEvents) -> ApiResult<Value> {
        self.client.get_with("/audit-events", filters.query())
    }

    /// Every audit event matching `filters`, across pages
    pub fn find_audit_events_iter(
        &self,
        filters: FindAuditEvents,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages("auditEvents", "/audit-events", filters.query())
    }

    /// POST /audit-events/{id}/acknowledge
    pub fn acknowledge_audit_event(&self, audit_event_id: u64, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/audit-events/{audit_event_id}/acknowledge"), body)
    }

    /// Acknowledge a service update and every earlier unacknowledged one
    ///
    /// POST /services/{id}/updates/acknowledge
    pub fn acknowledge_service_update_including_previous(
        &self,
        service_id: &str,
        audit_event_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("latestAuditEventId", audit_event_id)
            .updated_by(self.user(user)?);
        self.client
            .post(&format!("/services/{service_id}/updates/acknowledge"), body)
    }

    /// POST /audit-events
    ///
    /// `data` defaults to an empty object; `user`, `object_type` and
    /// `object_id` are left out when not given.
    pub fn create_audit_event(
        &self,
        audit_type: AuditType,
        user: Option<&str>,
        data: Option<Value>,
        object_type: Option<&str>,
        object_id: Option<&str>,
    ) -> ApiResult<Value> {
        let event = Envelope::new()
            .with("type", audit_type.as_str())
            .with_opt("user", user)
            .with("data", data.unwrap_or_else(|| json!({})))
            .with_opt("objectType", object_type)
            .with_opt("objectId", object_id);
        self.client
            .post("/audit-events", Envelope::wrap("auditEvents", event))
    }
}
