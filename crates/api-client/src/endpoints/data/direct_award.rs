//! Direct award projects, their saved searches and outcomes

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Filters for [`DataApiClient::find_direct_award_projects`]
#[derive(Debug, Clone, Default)]
pub struct FindProjects {
    /// Only projects of this user
    pub user_id: Option<u64>,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Newest projects first
    pub latest_first: Option<bool>,
    /// Embed the project's users; sent as `include=users`
    pub with_users: bool,
    /// Only projects with (or without) an outcome
    pub having_outcome: Option<bool>,
    /// Only locked (or unlocked) projects
    pub locked: Option<bool>,
}

impl FindProjects {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("user-id", self.user_id)
            .opt("page", self.page)
            .title_flag("latest-first", self.latest_first)
            .opt("include", self.with_users.then_some("users"))
            .title_flag("having-outcome", self.having_outcome)
            .title_flag("locked", self.locked)
    }
}

fn searches_query(user_id: Option<u64>, page: Option<u32>, only_active: Option<bool>) -> QueryParams {
    QueryParams::new()
        .opt("user-id", user_id)
        .opt("page", page)
        .title_flag("only-active", only_active)
}

fn services_query(user_id: Option<u64>, fields: &[&str]) -> QueryParams {
    let fields = (!fields.is_empty()).then(|| fields.join(","));
    QueryParams::new()
        .opt("user-id", user_id)
        .opt("fields", fields)
}

impl DataApiClient {
    /// GET /direct-award/projects
    pub fn find_direct_award_projects(&self, filters: FindProjects) -> ApiResult<Value> {
        self.client
            .get_with("/direct-award/projects", filters.query())
    }

    /// Every project matching `filters`, across pages
    pub fn find_direct_award_projects_iter(
        &self,
        filters: FindProjects,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client
            .pages("projects", "/direct-award/projects", filters.query())
    }

    /// GET /direct-award/projects/{id}
    pub fn get_direct_award_project(&self, project_id: u64) -> ApiResult<Value> {
        self.client
            .get(&format!("/direct-award/projects/{project_id}"))
    }

    /// POST /direct-award/projects
    pub fn create_direct_award_project(
        &self,
        user_id: u64,
        project_name: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let project = Envelope::new()
            .with("name", project_name)
            .with("userId", user_id);
        let body = Envelope::wrap("project", project).updated_by(self.user(user)?);
        self.client.post("/direct-award/projects", body)
    }

    /// GET /direct-award/projects/{id}/searches
    pub fn find_direct_award_project_searches(
        &self,
        project_id: u64,
        user_id: Option<u64>,
        page: Option<u32>,
        only_active: Option<bool>,
    ) -> ApiResult<Value> {
        self.client.get_with(
            &format!("/direct-award/projects/{project_id}/searches"),
            searches_query(user_id, page, only_active),
        )
    }

    /// Every saved search on a project, across pages
    pub fn find_direct_award_project_searches_iter(
        &self,
        project_id: u64,
        user_id: Option<u64>,
        only_active: Option<bool>,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "searches",
            format!("/direct-award/projects/{project_id}/searches"),
            searches_query(user_id, None, only_active),
        )
    }

    /// POST /direct-award/projects/{id}/searches
    pub fn create_direct_award_project_search(
        &self,
        project_id: u64,
        user_id: u64,
        search_url: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let search = Envelope::new()
            .with("searchUrl", search_url)
            .with("userId", user_id);
        let body = Envelope::wrap("search", search).updated_by(self.user(user)?);
        self.client.post(
            &format!("/direct-award/projects/{project_id}/searches"),
            body,
        )
    }

    /// GET /direct-award/projects/{id}/searches/{search}
    pub fn get_direct_award_project_search(
        &self,
        project_id: u64,
        search_id: u64,
        user_id: Option<u64>,
    ) -> ApiResult<Value> {
        self.client.get_with(
            &format!("/direct-award/projects/{project_id}/searches/{search_id}"),
            QueryParams::new().opt("user-id", user_id),
        )
    }

    /// Services captured by the project's active search
    ///
    /// An empty `fields` asks for every field.
    pub fn find_direct_award_project_services(
        &self,
        project_id: u64,
        user_id: Option<u64>,
        fields: &[&str],
    ) -> ApiResult<Value> {
        self.client.get_with(
            &format!("/direct-award/projects/{project_id}/services"),
            services_query(user_id, fields),
        )
    }

    /// Every service captured by the project, across pages
    pub fn find_direct_award_project_services_iter(
        &self,
        project_id: u64,
        user_id: Option<u64>,
        fields: &[&str],
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "services",
            format!("/direct-award/projects/{project_id}/services"),
            services_query(user_id, fields),
        )
    }

    /// Freeze the project's search so results can be downloaded
    pub fn lock_direct_award_project(&self, project_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.project_action(project_id, "lock", user)
    }

    /// POST /direct-award/projects/{id}/record-download
    pub fn record_direct_award_project_download(
        &self,
        project_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        self.project_action(project_id, "record-download", user)
    }

    /// Record the service the project was awarded to
    pub fn create_direct_award_project_outcome_award(
        &self,
        project_id: u64,
        awarded_service_id: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        self.project_action(project_id, &format!("services/{awarded_service_id}/award"), user)
    }

    /// Record that no service met the buyer's needs
    pub fn create_direct_award_project_outcome_none_suitable(
        &self,
        project_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        self.project_action(project_id, "none-suitable", user)
    }

    /// Record that the buyer abandoned the procurement
    pub fn create_direct_award_project_outcome_cancelled(
        &self,
        project_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        self.project_action(project_id, "cancel", user)
    }

    /// PATCH /direct-award/projects/{id} with `stillAssessing: true`
    pub fn mark_direct_award_project_as_still_assessing(
        &self,
        project_id: u64,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let project = Envelope::new().with("stillAssessing", true);
        self.update_direct_award_project(project_id, project.into(), user)
    }

    /// PATCH /direct-award/projects/{id}
    pub fn update_direct_award_project(
        &self,
        project_id: u64,
        project: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("project", project).updated_by(self.user(user)?);
        self.client
            .patch(&format!("/direct-award/projects/{project_id}"), body)
    }

    /// PUT /outcomes/{id}
    pub fn update_outcome(
        &self,
        outcome_id: u64,
        outcome: Value,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("outcome", outcome).updated_by(self.user(user)?);
        self.client.put(&format!("/outcomes/{outcome_id}"), body)
    }

    /// GET /outcomes
    pub fn find_outcomes(&self, page: Option<u32>, completed: Option<bool>) -> ApiResult<Value> {
        self.client.get_with(
            "/outcomes",
            QueryParams::new()
                .opt("page", page)
                .flag("completed", completed),
        )
    }

    /// Every outcome, across pages
    pub fn find_outcomes_iter(
        &self,
        completed: Option<bool>,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "outcomes",
            "/outcomes",
            QueryParams::new().flag("completed", completed),
        )
    }

    fn project_action(&self, project_id: u64, action: &str, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/direct-award/projects/{project_id}/{action}"), body)
    }
}
