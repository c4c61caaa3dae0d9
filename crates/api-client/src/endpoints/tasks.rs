//! Tasks API: background job dispatch

use crate::client::BaseClient;
use dm_api_core::auth::Auth;
use dm_api_core::config::{ClientConfig, ConfigSource};
use dm_api_core::envelope::Envelope;
use dm_api_core::error::ApiResult;
use serde_json::Value;

/// Configuration key for the Tasks API URL
pub const TASKS_API_URL: &str = "DM_TASKS_API_URL";

/// Configuration key for the Tasks API token
pub const TASKS_API_AUTH_TOKEN: &str = "DM_TASKS_API_AUTH_TOKEN";

/// Tasks API client
#[derive(Debug, Clone)]
pub struct TasksApiClient {
    client: BaseClient,
}

impl TasksApiClient {
    /// Create a client; the token is sent as a bearer token
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            client: BaseClient::new(config, Auth::Bearer)?,
        })
    }

    /// Bind URL and token from `DM_TASKS_API_URL` / `DM_TASKS_API_AUTH_TOKEN`
    pub fn init_app(&mut self, source: &impl ConfigSource) -> ApiResult<()> {
        let url = source.require(TASKS_API_URL)?;
        let token = source.require(TASKS_API_AUTH_TOKEN)?;
        self.client.init(url, token);
        Ok(())
    }

    /// Underlying engine
    #[must_use]
    pub fn client(&self) -> &BaseClient {
        &self.client
    }

    /// GET /_status
    pub fn get_status(&self) -> ApiResult<Value> {
        self.client.get_status()
    }

    /// GET /_worker-status
    pub fn get_worker_status(&self) -> ApiResult<Value> {
        self.client.get("/_worker-status")
    }

    /// Ask the worker to email suppliers about a framework application event
    ///
    /// POST /frameworks/{slug}/notifications/framework-application-event
    ///
    /// Template name and id are sent as `null` when not given.
    pub fn notify_suppliers_of_framework_application_event(
        &self,
        framework_slug: &str,
        notification_template_name: Option<&str>,
        notification_template_id: Option<&str>,
        user: Option<&str>,
    ) -> ApiResult<Value> {
        let user = self.client.resolve_user(user)?;
        let body = Envelope::new()
            .updated_by(user)
            .with("notificationTemplateName", notification_template_name)
            .with("notificationTemplateId", notification_template_id);

        self.client.post(
            &format!("/frameworks/{framework_slug}/notifications/framework-application-event"),
            body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_api_core::error::ApiError;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::collections::HashMap;

    fn tasks(server: &Server) -> TasksApiClient {
        TasksApiClient::new(ClientConfig::new(server.url(), "auth-token")).unwrap()
    }

    #[test]
    fn test_init_app() {
        let mut client = TasksApiClient::new(ClientConfig::default()).unwrap();
        let source = HashMap::from([
            (TASKS_API_URL.to_string(), "http://tasks".to_string()),
            (TASKS_API_AUTH_TOKEN.to_string(), "token".to_string()),
        ]);
        client.init_app(&source).unwrap();
        assert_eq!(client.client().base_url(), Some("http://tasks"));
        assert_eq!(client.client().credential(), Some("token"));

        let mut client = TasksApiClient::new(ClientConfig::default()).unwrap();
        assert!(client.init_app(&HashMap::<String, String>::new()).is_err());
    }

    #[test]
    fn test_worker_status() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/_worker-status")
            .match_header("authorization", "Bearer auth-token")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create();

        assert_eq!(tasks(&server).get_worker_status().unwrap(), json!({"status": "ok"}));
        mock.assert();
    }

    #[test]
    fn test_notify_suppliers() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/frameworks/g-cloud-12/notifications/framework-application-event")
            .match_body(Matcher::Json(json!({
                "updated_by": "user@example.com",
                "notificationTemplateName": "application-made",
                "notificationTemplateId": "123-abc",
            })))
            .with_status(200)
            .with_body(r#"{"request_id": "999"}"#)
            .create();

        let result = tasks(&server)
            .notify_suppliers_of_framework_application_event(
                "g-cloud-12",
                Some("application-made"),
                Some("123-abc"),
                Some("user@example.com"),
            )
            .unwrap();
        assert_eq!(result, json!({"request_id": "999"}));
        mock.assert();
    }

    #[test]
    fn test_notify_suppliers_sends_nulls() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/frameworks/g-cloud-12/notifications/framework-application-event")
            .match_body(Matcher::Json(json!({
                "updated_by": "user",
                "notificationTemplateName": null,
                "notificationTemplateId": null,
            })))
            .with_status(200)
            .with_body("{}")
            .create();

        tasks(&server)
            .notify_suppliers_of_framework_application_event("g-cloud-12", None, None, Some("user"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_notify_suppliers_requires_user() {
        let mut server = Server::new();
        let mock = server.mock("POST", Matcher::Any).expect(0).create();

        let err = tasks(&server)
            .notify_suppliers_of_framework_application_event("g-cloud-12", None, None, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingUpdatedBy));
        mock.assert();
    }
}
