//! Suppliers, contact information and Central Digital Platform links

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Filters for [`DataApiClient::find_suppliers`]
#[derive(Debug, Clone, Default)]
pub struct FindSuppliers {
    /// Name prefix
    pub prefix: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Framework slug
    pub framework: Option<String>,
    /// DUNS number
    pub duns_number: Option<String>,
    /// Companies House number
    pub company_registration_number: Option<String>,
    /// Supplier name
    pub name: Option<String>,
}

impl FindSuppliers {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("prefix", self.prefix.as_deref())
            .opt("page", self.page)
            .opt("framework", self.framework.as_deref())
            .opt("duns_number", self.duns_number.as_deref())
            .opt(
                "company_registration_number",
                self.company_registration_number.as_deref(),
            )
            .opt("name", self.name.as_deref())
    }
}

impl DataApiClient {
    /// GET /suppliers
    pub fn find_suppliers(&self, filters: FindSuppliers) -> ApiResult<Value> {
        self.client.get_with("/suppliers", filters.query())
    }

    /// Every supplier matching `filters`, across pages
    pub fn find_suppliers_iter(
        &self,
        filters: FindSuppliers,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages("suppliers", "/suppliers", filters.query())
    }

    /// GET /suppliers/{id}
    ///
    /// A missing supplier is an error, unlike services and users.
    pub fn get_supplier(&self, supplier_id: u64, with_cdp_supplier_information: bool) -> ApiResult<Value> {
        let query = QueryParams::new().flag(
            "with_cdp_supplier_information",
            with_cdp_supplier_information.then_some(true),
        );
        self.client
            .get_with(&format!("/suppliers/{supplier_id}"), query)
    }

    /// POST /suppliers
    pub fn create_supplier(&self, supplier: Value) -> ApiResult<Value> {
        self.client
            .post("/suppliers", Envelope::wrap("suppliers", supplier))
    }

    /// POST /suppliers/{id}
    pub fn update_supplier(&self, supplier_id: u64, supplier: Value, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::wrap("suppliers", supplier).updated_by(self.user(user)?);
        self.client.post(&format!("/suppliers/{supplier_id}"), body)
    }

    /// POST /suppliers/{id}/contact-information/{contact_id}
    pub fn update_contact_information(
        &self,
        supplier_id: u64,
        contact_id: u64,
        contact: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("contactInformation", contact).updated_by(self.user(user)?);
        self.client.post(
            &format!("/suppliers/{supplier_id}/contact-information/{contact_id}"),
            body,
        )
    }

    /// POST /suppliers/{id}/contact-information/{contact_id}/remove-personal-data
    pub fn remove_contact_information_personal_data(
        &self,
        supplier_id: u64,
        contact_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client.post(
            &format!("/suppliers/{supplier_id}/contact-information/{contact_id}/remove-personal-data"),
            body,
        )
    }

    /// GET /suppliers/export/{framework}
    pub fn export_suppliers(&self, framework_slug: &str) -> ApiResult<Value> {
        self.client
            .get(&format!("/suppliers/export/{framework_slug}"))
    }

    /// Every exported supplier for a framework, across pages
    pub fn export_suppliers_iter(
        &self,
        framework_slug: &str,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "suppliers",
            format!("/suppliers/export/{framework_slug}"),
            QueryParams::new(),
        )
    }

    // -------------------------------------------------------------------------
    // Central Digital Platform
    // -------------------------------------------------------------------------

    /// Link a supplier to its Central Digital Platform record
    ///
    /// POST /suppliers/{id}/central-digital-platform/create
    pub fn create_central_digital_platform_connection(
        &self,
        supplier_id: u64,
        central_digital_platform_data: Value,
        trading_name: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("centralDigitalPlatformData", central_digital_platform_data)
            .with("tradingName", trading_name)
            .updated_by(self.user(user)?);
        self.client.post(
            &format!("/suppliers/{supplier_id}/central-digital-platform/create"),
            body,
        )
    }

    /// POST /suppliers/{id}/central-digital-platform/revoke
    pub fn revoke_central_digital_platform_connection(
        &self,
        supplier_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client.post(
            &format!("/suppliers/{supplier_id}/central-digital-platform/revoke"),
            body,
        )
    }

    /// POST /suppliers/{id}/central-digital-platform/update
    ///
    /// `frameworks_to_update` is only sent when given.
    pub fn update_supplier_central_digital_platform_data(
        &self,
        supplier_id: u64,
        central_digital_platform_data: Value,
        frameworks_to_update: Option<&[&str]>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("centralDigitalPlatformData", central_digital_platform_data)
            .with_opt("frameworksToUpdate", frameworks_to_update.map(<[&str]>::to_vec))
            .updated_by(self.user(user)?);
        self.client.post(
            &format!("/suppliers/{supplier_id}/central-digital-platform/update"),
            body,
        )
    }

    /// POST /suppliers/{id}/frameworks/{framework}/central-digital-platform/update
    pub fn update_supplier_framework_central_digital_platform_data(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        central_digital_platform_data: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::new()
            .with("centralDigitalPlatformData", central_digital_platform_data)
            .updated_by(self.user(user)?);
        self.client.post(
            &format!(
                "/suppliers/{supplier_id}/frameworks/{framework_slug}/central-digital-platform/update"
            ),
            body,
        )
    }

    /// GET /suppliers/central-digital-platform/verify-organisation/{id}
    pub fn verify_central_digital_platform_organisation(&self, organisation_id: &str) -> ApiResult<Value> {
        self.client.get(&format!(
            "/suppliers/central-digital-platform/verify-organisation/{organisation_id}"
        ))
    }
}
