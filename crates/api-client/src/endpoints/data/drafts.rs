//! Draft services: the editable copies suppliers submit to a framework

use super::DataApiClient;
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use dm_api_core::request::QueryParams;
use serde_json::Value;

/// Filters for [`DataApiClient::find_draft_services`]
#[derive(Debug, Clone, Default)]
pub struct FindDraftServices {
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// Service the drafts were copied from
    pub service_id: Option<String>,
    /// Framework slug
    pub framework: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
}

impl FindDraftServices {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("supplier_id", self.supplier_id)
            .opt("service_id", self.service_id.as_deref())
            .opt("framework", self.framework.as_deref())
            .opt("page", self.page)
    }
}

/// Filters for [`DataApiClient::find_draft_services_by_framework`]
#[derive(Debug, Clone, Default)]
pub struct FindDraftServicesByFramework {
    /// Status to match
    pub status: Option<String>,
    /// Supplier id
    pub supplier_id: Option<u64>,
    /// Lot slug
    pub lot: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
}

impl FindDraftServicesByFramework {
    fn query(&self) -> QueryParams {
        QueryParams::new()
            .opt("status", self.status.as_deref())
            .opt("supplier_id", self.supplier_id)
            .opt("lot", self.lot.as_deref())
            .opt("page", self.page)
    }
}

impl DataApiClient {
    /// GET /draft-services
    pub fn find_draft_services(&self, filters: FindDraftServices) -> ApiResult<Value> {
        self.client.get_with("/draft-services", filters.query())
    }

    /// Every draft matching `filters`, across pages
    pub fn find_draft_services_iter(
        &self,
        filters: FindDraftServices,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client
            .pages("services", "/draft-services", filters.query())
    }

    /// GET /draft-services/framework/{framework}
    pub fn find_draft_services_by_framework(
        &self,
        framework_slug: &str,
        filters: FindDraftServicesByFramework,
    ) -> ApiResult<Value> {
        self.client.get_with(
            &format!("/draft-services/framework/{framework_slug}"),
            filters.query(),
        )
    }

    /// Every draft on a framework matching `filters`, across pages
    pub fn find_draft_services_by_framework_iter(
        &self,
        framework_slug: &str,
        filters: FindDraftServicesByFramework,
    ) -> impl Iterator<Item = ApiResult<Value>> + '_ {
        self.client.pages(
            "services",
            format!("/draft-services/framework/{framework_slug}"),
            filters.query(),
        )
    }

    /// GET /draft-services/{id}
    pub fn get_draft_service(&self, draft_id: u64) -> ApiResult<Value> {
        self.client.get(&format!("/draft-services/{draft_id}"))
    }

    /// DELETE /draft-services/{id}
    pub fn delete_draft_service(&self, draft_id: u64, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .delete(&format!("/draft-services/{draft_id}"), Some(body.into()))
    }

    /// Start a draft from a published service
    ///
    /// Keys in `extra` are merged into the top level of the body.
    pub fn copy_draft_service_from_existing_service(
        &self,
        service_id: &str,
        user: Option<&str>,
        extra: Option<Value>,
    ) -> ApiResult<Value> {
        let body = Envelope::flatten(extra.unwrap_or(Value::Null)).updated_by(self.user(user)?);
        self.client
            .put(&format!("/draft-services/copy-from/{service_id}"), body)
    }

    /// Copy a supplier's published services on one framework into drafts on another
    ///
    /// POST /draft-services/{target}/{lot}/copy-published-from-framework
    pub fn copy_published_from_framework(
        &self,
        framework_slug: &str,
        lot_slug: &str,
        user: Option<&str>,
        extra: Option<Value>,
    ) -> ApiResult<Value> {
        let body = Envelope::flatten(extra.unwrap_or(Value::Null)).updated_by(self.user(user)?);
        self.client.post(
            &format!("/draft-services/{framework_slug}/{lot_slug}/copy-published-from-framework"),
            body,
        )
    }

    /// POST /draft-services/{id}/copy
    pub fn copy_draft_service(&self, draft_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.draft_action(draft_id, "copy", user)
    }

    /// POST /draft-services/{id}/complete
    pub fn complete_draft_service(&self, draft_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.draft_action(draft_id, "complete", user)
    }

    /// POST /draft-services/{id}/publish
    pub fn publish_draft_service(&self, draft_id: u64, user: Option<&str>) -> ApiResult<Value> {
        self.draft_action(draft_id, "publish", user)
    }

    /// POST /draft-services/{id}/update-status
    pub fn update_draft_service_status(
        &self,
        draft_id: u64,
        status: &str,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("services", Envelope::new().with("status", status))
            .updated_by(self.user(user)?);
        self.client
            .post(&format!("/draft-services/{draft_id}/update-status"), body)
    }

    /// Save answers to a draft
    ///
    /// `page_questions` limits validation to the questions on the page being
    /// saved; `ignored_fields` lists answers the API should not validate.
    pub fn update_draft_service(
        &self,
        draft_id: u64,
        services: Value,
        user: Option<&str>,
        page_questions: Option<Vec<String>>,
        ignored_fields: Option<Vec<String>>,
    ) -> ApiResult<Value> {
        let body = Envelope::wrap("services", services)
            .updated_by(self.user(user)?)
            .with_opt("page_questions", page_questions)
            .with_opt("ignored_fields", ignored_fields);
        self.client
            .post(&format!("/draft-services/{draft_id}"), body)
    }

    /// POST /draft-services
    pub fn create_new_draft_service(
        &self,
        framework_slug: &str,
        lot: &str,
        supplier_id: u64,
        data: Value,
        user: Option<&str>,
        page_questions: Option<Vec<String>>,
    ) -> ApiResult<Value> {
        let services = Envelope::flatten(data)
            .with("frameworkSlug", framework_slug)
            .with("lot", lot)
            .with("supplierId", supplier_id);
        let body = Envelope::wrap("services", services)
            .with("page_questions", page_questions.unwrap_or_default())
            .updated_by(self.user(user)?);
        self.client.post("/draft-services", body)
    }

    fn draft_action(&self, draft_id: u64, action: &str, user: Option<&str>) -> ApiResult<Value> {
        let body = Envelope::new().updated_by(self.user(user)?);
        self.client
            .post(&format!("/draft-services/{draft_id}/{action}"), body)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ids, mock_two_pages, test_client};
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_find_draft_services() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/draft-services?supplier_id=2&service_id=1234&framework=g-slug")
            .with_status(200)
            .with_body(r#"{"services": "result"}"#)
            .create();

        let filters = FindDraftServices {
            supplier_id: Some(2),
            service_id: Some("1234".into()),
            framework: Some("g-slug".into()),
            page: None,
        };
        let result = test_client(&server).find_draft_services(filters).unwrap();
        assert_eq!(result, json!({"services": "result"}));
        mock.assert();
    }

    #[test]
    fn test_find_draft_services_iter() {
        let mut server = Server::new();
        let _mocks = mock_two_pages(&mut server, "/draft-services", "services");

        let client = test_client(&server);
        let drafts = client.find_draft_services_iter(FindDraftServices::default());
        assert_eq!(ids(drafts), vec![1, 2, 3]);
    }

    #[test]
    fn test_find_draft_services_by_framework() {
        let mut server = Server::new();
        let mock = server
            .mock(
                "GET",
                "/draft-services/framework/g-cloud-12?status=submitted&supplier_id=4&lot=cloud-hosting",
            )
            .with_status(200)
            .with_body(r#"{"services": []}"#)
            .create();

        let filters = FindDraftServicesByFramework {
            status: Some("submitted".into()),
            supplier_id: Some(4),
            lot: Some("cloud-hosting".into()),
            page: None,
        };
        test_client(&server)
            .find_draft_services_by_framework("g-cloud-12", filters)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_find_draft_services_by_framework_iter() {
        let mut server = Server::new();
        let _mocks = mock_two_pages(&mut server, "/draft-services/framework/g-cloud-12", "services");

        let client = test_client(&server);
        let drafts = client.find_draft_services_by_framework_iter(
            "g-cloud-12",
            FindDraftServicesByFramework::default(),
        );
        assert_eq!(ids(drafts), vec![1, 2, 3]);
    }

    #[test]
    fn test_get_and_delete_draft_service() {
        let mut server = Server::new();
        let get = server
            .mock("GET", "/draft-services/2")
            .with_status(200)
            .with_body(r#"{"services": {"id": 2}}"#)
            .create();
        let delete = server
            .mock("DELETE", "/draft-services/2")
            .match_body(Matcher::Json(json!({"updated_by": "user"})))
            .with_status(200)
            .with_body(r#"{"done": "it"}"#)
            .create();

        let client = test_client(&server);
        assert_eq!(client.get_draft_service(2).unwrap()["services"]["id"], 2);
        assert_eq!(
            client.delete_draft_service(2, Some("user")).unwrap(),
            json!({"done": "it"})
        );
        get.assert();
        delete.assert();
    }

    #[test]
    fn test_copy_draft_service_from_existing_service() {
        let mut server = Server::new();
        let plain = server
            .mock("PUT", "/draft-services/copy-from/2")
            .match_body(Matcher::Json(json!({"updated_by": "user"})))
            .with_status(201)
            .with_body(r#"{"services": "result"}"#)
            .create();
        let with_extra = server
            .mock("PUT", "/draft-services/copy-from/2")
            .match_body(Matcher::Json(json!({
                "updated_by": "user",
                "targetFramework": "g-cloud-9",
                "questionsToCopy": ["serviceName"],
            })))
            .with_status(201)
            .with_body(r#"{"services": "result"}"#)
            .create();

        let client = test_client(&server);
        client
            .copy_draft_service_from_existing_service("2", Some("user"), None)
            .unwrap();
        client
            .copy_draft_service_from_existing_service(
                "2",
                Some("user"),
                Some(json!({"targetFramework": "g-cloud-9", "questionsToCopy": ["serviceName"]})),
            )
            .unwrap();
        plain.assert();
        with_extra.assert();
    }

    #[test]
    fn test_copy_published_from_framework() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/draft-services/g-cloud-11/cloud-hosting/copy-published-from-framework")
            .match_body(Matcher::Json(json!({
                "sourceFrameworkSlug": "g-cloud-10",
                "supplierId": 1234,
                "updated_by": "user",
            })))
            .with_status(201)
            .with_body(r#"{"services": "result"}"#)
            .create();

        test_client(&server)
            .copy_published_from_framework(
                "g-cloud-11",
                "cloud-hosting",
                Some("user"),
                Some(json!({"sourceFrameworkSlug": "g-cloud-10", "supplierId": 1234})),
            )
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_draft_actions() {
        let mut server = Server::new();
        let mocks: Vec<_> = ["copy", "complete", "publish"]
            .into_iter()
            .map(|action| {
                server
                    .mock("POST", format!("/draft-services/2/{action}").as_str())
                    .match_body(Matcher::Json(json!({"updated_by": "user"})))
                    .with_status(200)
                    .with_body("{}")
                    .create()
            })
            .collect();

        let client = test_client(&server);
        client.copy_draft_service(2, Some("user")).unwrap();
        client.complete_draft_service(2, Some("user")).unwrap();
        client.publish_draft_service(2, Some("user")).unwrap();
        for mock in mocks {
            mock.assert();
        }
    }

    #[test]
    fn test_update_draft_service_status() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/draft-services/2/update-status")
            .match_body(Matcher::Json(json!({
                "services": {"status": "failed"},
                "updated_by": "user",
            })))
            .with_status(200)
            .with_body(r#"{"services": {"status": "failed"}}"#)
            .create();

        test_client(&server)
            .update_draft_service_status(2, "failed", Some("user"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_update_draft_service_with_page_questions_and_ignored_fields() {
        let mut server = Server::new();
        let plain = server
            .mock("POST", "/draft-services/2")
            .match_body(Matcher::Json(json!({
                "services": {"foo": "bar"},
                "updated_by": "user",
            })))
            .with_status(200)
            .with_body("{}")
            .create();
        let detailed = server
            .mock("POST", "/draft-services/2")
            .match_body(Matcher::Json(json!({
                "services": {"foo": "bar"},
                "updated_by": "user",
                "page_questions": ["foo"],
                "ignored_fields": ["bar"],
            })))
            .with_status(200)
            .with_body("{}")
            .create();

        let client = test_client(&server);
        client
            .update_draft_service(2, json!({"foo": "bar"}), Some("user"), None, None)
            .unwrap();
        client
            .update_draft_service(
                2,
                json!({"foo": "bar"}),
                Some("user"),
                Some(vec!["foo".into()]),
                Some(vec!["bar".into()]),
            )
            .unwrap();
        plain.assert();
        detailed.assert();
    }

    #[test]
    fn test_create_new_draft_service() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/draft-services")
            .match_body(Matcher::Json(json!({
                "services": {
                    "frameworkSlug": "g-cloud-7",
                    "lot": "iaas",
                    "supplierId": 2,
                    "serviceName": "name",
                },
                "page_questions": [],
                "updated_by": "user",
            })))
            .with_status(201)
            .with_body(r#"{"services": {"id": 9}}"#)
            .create();

        test_client(&server)
            .create_new_draft_service(
                "g-cloud-7",
                "iaas",
                2,
                json!({"serviceName": "name"}),
                Some("user"),
                None,
            )
            .unwrap();
        mock.assert();
    }
}
