//! Published and archived services

use super::{none_on_404, DataApiClient};
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Filters for [`DataApiClient::find_services`]
#[derive(Debug, Clone, Default)]
pub struct FindServices {
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// Framework slug
    pub framework: Option<String>,
    /// Status to match
    pub status: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
}

impl FindServices {
    /// Services belonging to one supplier
    #[must_use]
    pub fn for_supplier(supplier_id: u64) -> Self {
        Self {
            supplier_id: Some(supplier_id),
            ..Self::default()
        }
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("supplier_id", self.supplier_id)
            .opt("framework", self.framework.as_deref())
            .opt("status", self.status.as_deref())
            .opt("page", self.page)
    }
}

impl DataApiClient {
    /// GET /archived-services/{id}
    pub fn get_archived_service(&self, archived_service_id: u64) -> ApiResult<Value> {
        self.client
            .get(&format!("/archived-services/{archived_service_id}"))
    }

    /// GET /services/{id}; `None` when the service does not exist
    pub fn get_service(&self, service_id: &str) -> ApiResult<Option<Value>> {
        none_on_404(self.client.get(&format!("/services/{service_id}")))
    }

    /// GET /services
    pub fn find_services(&self, filters: FindServices) -> ApiResult<Value> {
        self.client.get_with("/services", filters.query())
    }

    /// Every service matching `filters`, across pages
    pub fn find_services_iter(
        &self,
        filters: FindServices,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages("services", "/services", filters.query())
    }

    /// POST /services/{id}
    ///
    /// `user_role` is passed through as `user-role`; admins may edit fields
    /// suppliers cannot.
    pub fn update_service(
        &self,
        service_id: &str,
        service: Value,
        user: Option<&str>,
        user_role: Option<&str>,
        wait_for_index: bool,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("services", service).updated_by(self.user(user)?);
        let query = QueryParams::new()
            .with("wait-for-index", wait_for_index)
            .opt("user-role", user_role);
        self.client
            .post_with(&format!("/services/{service_id}"), query, body)
    }

    /// POST /services/{id}/status/{status}
    pub fn update_service_status(
        &self,
        service_id: &str,
        status: &str,
        user: Option<&str>,
        wait_for_index: bool,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        let query = QueryParams::new().with("wait-for-index", wait_for_index);
        self.client.post_with(
            &format!("/services/{service_id}/status/{status}"),
            query,
            body,
        )
    }

    /// Restore a service to an archived version
    ///
    /// POST /services/{id}/revert
    pub fn revert_service(
        &self,
        service_id: &str,
        archived_service_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("archivedServiceId", archived_service_id)
            .updated_by(self.user(user)?);
        self.client
            .post(&format!("/services/{service_id}/revert"), body)
    }
}
