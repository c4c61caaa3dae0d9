//! Users and buyer email domains

use super::{none_on_404, DataApiClient};
use dm_api_core::envelope::Envelope;
use dm_api_core::error::{ApiError, ApiResult};
use dm_api_core::request::QueryParams;
use serde_json::Value;
use tracing::debug;

/// Attribution used for password changes made without a logged-in user
pub const NO_LOGGED_IN_USER: &str = "no logged-in user";

/// Filters for [`DataApiClient::find_users`]
///
/// `supplier_id` and `role` cannot be combined.
#[derive(Debug, Clone, Default)]
pub struct FindUsers {
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// User role
    pub role: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Only users whose personal data was (or was not) removed
    pub personal_data_removed: Option<bool>,
    /// User research opt-in
    pub user_research_opted_in: Option<bool>,
    /// Active flag
    pub active: Option<bool>,
}

impl FindUsers {
    fn query(&self) -> ApiResult<QueryParams> {
        if self.supplier_id.is_some() && self.role.is_some() {
            return Err(ApiError::invalid_argument(
                "cannot get users by both supplier_id and role",
            ));
        }

        Ok(QueryParams::new()
            .opt("supplier_id", self.supplier_id)
            .opt("role", self.role.as_deref())
            .opt("page", self.page)
            .flag("personal_data_removed", self.personal_data_removed)
            .flag("user_research_opted_in", self.user_research_opted_in)
            .flag("active", self.active))
    }
}

/// Fields to change with [`DataApiClient::update_user`]; unset fields are left alone
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// Locked flag
    pub locked: Option<bool>,
    /// Active flag
    pub active: Option<bool>,
    /// User role
    pub role: Option<String>,
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// Display name
    pub name: Option<String>,
    /// User research opt-in
    pub user_research_opted_in: Option<bool>,
}

impl UserUpdate {
    fn into_value(self) -> Value {
        Envelope::new()
            .with_opt("locked", self.locked)
            .with_opt("active", self.active)
            .with_opt("role", self.role)
            .with_opt("supplierId", self.supplier_id)
            .with_opt("name", self.name)
            .with_opt("userResearchOptedIn", self.user_research_opted_in)
            .into_value()
    }
}

impl DataApiClient {
    /// GET /users
    pub fn find_users(&self, filters: FindUsers) -> ApiResult<Value> {
        self.client.get_with("/users", filters.query()?)
    }

    /// Every user matching `filters`, across pages
    ///
    /// The `supplier_id`/`role` check happens here, before any request.
    pub fn find_users_iter(
        &self,
        filters: FindUsers,
    ) -> ApiResult<impl Iterator<Item = ApiResult<Value>> + '_> {
        Ok(self.client.pages("users", "/users", filters.query()?))
    }

    /// Look a user up by id or by email address; exactly one must be given
    ///
    /// `None` when the user does not exist.
    pub fn get_user(
        &self,
        user_id: Option<u64>,
        email_address: Option<&str>,
    ) -> ApiResult<Option<Value>> {
        let result = match (user_id, email_address) {
            (Some(user_id), None) => self.client.get(&format!("/users/{user_id}")),
            (None, Some(email_address)) => self.client.get_with(
                "/users",
                QueryParams::new().with("email_address", email_address),
            ),
            _ => {
                return Err(ApiError::invalid_argument(
                    "exactly one of user_id and email_address is required",
                ));
            }
        };
        none_on_404(result)
    }

    /// POST /users/auth
    ///
    /// `None` when the credentials are rejected (400, 403 or 404).
    pub fn authenticate_user(&self, email_address: &str, password: &str) -> ApiResult<Option<Value>> {
        let body = Envelope::wrap(
            "authUsers",
            Envelope::new()
                .with("emailAddress", email_address)
                .with("password", password),
        );
        match self.client.post("/users/auth", body) {
            Ok(user) => Ok(Some(user)),
            Err(err) if err.has_status(400) || err.has_status(403) || err.has_status(404) => {
                debug!(status = err.status_code(), "User authentication rejected");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// POST /users
    pub fn create_user(&self, user: Value) -> ApiResult<Value> {
        self.client.post("/users", Envelope::wrap("users", user))
    }

    /// Change a user's password
    ///
    /// Without an explicit or configured user the change is attributed to
    /// "no logged-in user". HTTP failures answer `false` instead of an error.
    pub fn update_user_password(
        &self,
        user_id: u64,
        new_password: &str,
        updater: Option<&str>,
    ) -> ApiResult<bool> {
        let updater = self
            .user(updater)
            .unwrap_or_else(|_| NO_LOGGED_IN_USER.to_string());
        let body = Envelope::wrap("users", Envelope::new().with("password", new_password))
            .updated_by(updater);

        match self.client.post(&format!("/users/{user_id}"), body) {
            Ok(_) => Ok(true),
            Err(err) if err.is_http_error() => {
                debug!(status = err.status_code(), "Password update failed");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// POST /users/{id}
    pub fn update_user(&self, user_id: u64, update: UserUpdate, updater: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::wrap("users", update.into_value()).updated_by(self.user(updater)?);
        self.client.post(&format!("/users/{user_id}"), body)
    }

    /// POST /users/{id}/remove-personal-data
    pub fn remove_user_personal_data(&self, user_id: u64, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/users/{user_id}/remove-personal-data"), body)
    }

    /// GET /users/export/{framework}
    pub fn export_users(&self, framework_slug: &str) -> ApiResult<Value> {
        self.client.get(&format!("/users/export/{framework_slug}"))
    }

    /// Every exported user for a framework, across pages
    pub fn export_users_iter(&self, framework_slug: &str) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "users",
            format!("/users/export/{framework_slug}"),
            QueryParams::new(),
        )
    }

    /// Whether an email address belongs to an approved buyer domain
    pub fn is_email_address_with_valid_buyer_domain(&self, email_address: &str) -> ApiResult<bool> {
        self.check_email("/users/check-buyer-email", email_address)
    }

    /// Whether an email address may be used for an admin account
    pub fn email_is_valid_for_admin_user(&self, email_address: &str) -> ApiResult<bool> {
        self.check_email("/users/valid-admin-email", email_address)
    }

    fn check_email(&self, path: &str, email_address: &str) -> ApiResult<bool> {
        let response = self
            .client
            .post(path, Envelope::new().with("emailAddress", email_address))?;
        Ok(response.get("valid").and_then(Value::as_bool).unwrap_or(false))
    }

    /// GET /buyer-email-domains
    pub fn get_buyer_email_domains(&self, page: Option<u32>) -> ApiResult<Value> {
        self.client
            .get_with("/buyer-email-domains", QueryParams::new().opt("page", page))
    }

    /// Every buyer email domain, across pages
    pub fn get_buyer_email_domains_iter(&self) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client
            .pages("buyerEmailDomains", "/buyer-email-domains", QueryParams::new())
    }

    /// POST /buyer-email-domains
    pub fn create_buyer_email_domain(&self, domain_name: &str, user: Option<&str>) -> ApiResult<Value> {
        let body = self.buyer_email_domain(domain_name, user)?;
        self.client.post("/buyer-email-domains", body)
    }

    /// DELETE /buyer-email-domains
    pub fn delete_buyer_email_domain(&self, domain_name: &str, user: Option<&str>) -> ApiResult<Value> {
        let body = self.buyer_email_domain(domain_name, user)?;
        self.client.delete("/buyer-email-domains", Some(body))
    }

    fn buyer_email_domain(&self, domain_name: &str, user: Option<&str>) -> ApiResult<Value> {
        Ok(Envelope::wrap(
            "buyerEmailDomains",
            Envelope::new().with("domainName", domain_name),
        )
        .updated_by(self.user(user)?)
        .into_value())
    }
}
