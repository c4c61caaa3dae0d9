//! Base request engine shared by every façade

use dm_api_core::auth::{Auth, AuthContribution};
use dm_api_core::config::ClientConfig;
use dm_api_core::error::{ApiError, ApiResult};
use dm_api_core::pagination::Pages;
use dm_api_core::request::{QueryParams, RequestDescriptor, ResponseMode};
use dm_api_core::response::{self, classify, Classification, ResponseOutcome};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Method, Url};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// User agent sent with every request
pub const USER_AGENT_VALUE: &str = concat!("DM-API-Client/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP engine
///
/// Attaches fixed headers, the auth contribution and a correlation id,
/// sends the request and classifies the response. Disabled clients return
/// [`ResponseOutcome::Empty`] without touching the network.
#[derive(Debug, Clone)]
pub struct BaseClient {
    http: Client,
    config: ClientConfig,
    auth: Auth,
}

impl BaseClient {
    /// Create an engine for a configuration and auth strategy
    pub fn new(config: ClientConfig, auth: Auth) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = Client::builder()
            .connect_timeout(config.timeout.connect)
            .timeout(config.timeout.read)
            .redirect(Policy::none())
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config, auth })
    }

    /// Rebind base URL and credential
    pub fn init(&mut self, base_url: impl Into<String>, credential: impl Into<String>) {
        self.config.base_url = Some(base_url.into());
        self.config.credential = Some(credential.into());
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    /// Get the credential
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.config.credential.as_deref()
    }

    /// Whether requests are sent at all
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Auth strategy in use
    #[must_use]
    pub fn auth(&self) -> Auth {
        self.auth
    }

    /// Resolve `updated_by`: the explicit user, then the configured default
    pub fn resolve_user(&self, explicit: Option<&str>) -> ApiResult<String> {
        explicit
            .filter(|user| !user.is_empty())
            .or_else(|| self.config.user.as_deref().filter(|user| !user.is_empty()))
            .map(str::to_string)
            .ok_or(ApiError::MissingUpdatedBy)
    }

    // -------------------------------------------------------------------------
    // Verb helpers
    // -------------------------------------------------------------------------

    /// GET a JSON resource
    pub fn get(&self, path: &str) -> ApiResult<Value> {
        self.get_with(path, QueryParams::new())
    }

    /// GET a JSON resource with query parameters
    pub fn get_with(&self, path: &str, query: QueryParams) -> ApiResult<Value> {
        self.request_json(RequestDescriptor::get(path).with_query(query))
    }

    /// POST a JSON body
    pub fn post(&self, path: &str, body: impl Into<Value>) -> ApiResult<Value> {
        self.send_json(Method::POST, path, QueryParams::new(), Some(body.into()))
    }

    /// POST a JSON body with query parameters
    pub fn post_with(&self, path: &str, query: QueryParams, body: impl Into<Value>) -> ApiResult<Value> {
        self.send_json(Method::POST, path, query, Some(body.into()))
    }

    /// PUT a JSON body
    pub fn put(&self, path: &str, body: impl Into<Value>) -> ApiResult<Value> {
        self.send_json(Method::PUT, path, QueryParams::new(), Some(body.into()))
    }

    /// PATCH a JSON body
    pub fn patch(&self, path: &str, body: impl Into<Value>) -> ApiResult<Value> {
        self.send_json(Method::PATCH, path, QueryParams::new(), Some(body.into()))
    }

    /// DELETE, optionally with a JSON body
    pub fn delete(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.send_json(Method::DELETE, path, QueryParams::new(), body)
    }

    /// GET a binary resource, following one redirect
    pub fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        self.execute(RequestDescriptor::get(path).with_mode(ResponseMode::Bytes))
            .map(ResponseOutcome::into_bytes)
    }

    /// Anonymous `GET /_status`
    pub fn get_status(&self) -> ApiResult<Value> {
        self.request_json(RequestDescriptor::get("/_status").anonymous())
    }

    /// Iterate over every item of a paginated endpoint
    pub fn pages<'a>(
        &'a self,
        key: &'static str,
        path: impl Into<String>,
        query: QueryParams,
    ) -> Pages<impl FnMut(&QueryParams) -> ApiResult<Value> + 'a> {
        let path = path.into();
        Pages::new(key, query, move |params| self.get_with(&path, params.clone()))
    }

    fn send_json(
        &self,
        method: Method,
        path: &str,
        query: QueryParams,
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let mut request = RequestDescriptor::new(method, path).with_query(query);
        request.body = body;
        self.request_json(request)
    }

    /// Execute a request and render the outcome as JSON
    pub fn request_json(&self, request: RequestDescriptor) -> ApiResult<Value> {
        self.execute(request).map(ResponseOutcome::into_json)
    }

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------

    /// Execute a request
    #[instrument(skip_all, fields(method = %request.method, path = %request.path, request_id))]
    pub fn execute(&self, request: RequestDescriptor) -> ApiResult<ResponseOutcome> {
        if !self.config.enabled {
            debug!("Client disabled, skipping request");
            return Ok(ResponseOutcome::Empty);
        }

        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let auth = if request.anonymous {
            AuthContribution::default()
        } else {
            self.auth.contribution(self.credential())?
        };
        let url = self.url_for(&request.path, &auth, &request.query)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(X_REQUEST_ID, &request_id);
        for (name, value) in auth.headers.into_iter().chain(request.headers) {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder.send().map_err(|e| {
            let err = ApiError::request_failed(e);
            warn!(error = %err, "Request failed before a response was received");
            err
        })?;
        let status = response.status().as_u16();
        debug!(status, elapsed_ms = start.elapsed().as_millis(), "Response received");

        if !request.wait_for_response {
            if status >= 400 {
                let body = read_body(response)?;
                return Err(response::failure(status, &body));
            }
            return Ok(ResponseOutcome::Empty);
        }

        let response_url = response.url().clone();
        let location = location_of(&response);
        let body = read_body(response)?;

        match classify(status, location.as_deref(), &body, request.mode) {
            Ok(Classification::Outcome(outcome)) => Ok(outcome),
            Ok(Classification::Redirect(location)) => {
                self.follow_redirect(&response_url, &location, &request_id)
            }
            Err(err) => {
                warn!(status, error = %err, "Request returned an error");
                Err(err)
            }
        }
    }

    /// Follow a single redirect hop without auth
    fn follow_redirect(&self, from: &Url, location: &str, request_id: &str) -> ApiResult<ResponseOutcome> {
        let target = from
            .join(location)
            .map_err(|e| ApiError::InvalidUrl(format!("redirect location: {e}")))?;
        debug!(host = target.host_str().unwrap_or_default(), "Following redirect");

        let response = self
            .http
            .get(target)
            .header(X_REQUEST_ID, request_id)
            .send()
            .map_err(ApiError::request_failed)?;
        let status = response.status().as_u16();
        let location = location_of(&response);
        let body = read_body(response)?;

        match classify(status, location.as_deref(), &body, ResponseMode::Bytes)? {
            Classification::Outcome(outcome) => Ok(outcome),
            Classification::Redirect(location) => {
                warn!(status, "Redirect answered with another redirect");
                Err(ApiError::UnexpectedRedirect { status, location })
            }
        }
    }

    fn url_for(&self, path: &str, auth: &AuthContribution, query: &QueryParams) -> ApiResult<Url> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| ApiError::config("base URL is not configured"))?;
        let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        if !auth.query.is_empty() || !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &auth.query {
                pairs.append_pair(key, value);
            }
            for (key, value) in query.iter() {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

fn location_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn read_body(response: Response) -> ApiResult<Vec<u8>> {
    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(ApiError::request_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_api_core::auth::ROUTE_MANUAL;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn bearer(server: &Server) -> BaseClient {
        BaseClient::new(ClientConfig::new(server.url(), "auth-token"), Auth::Bearer).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = BaseClient::new(ClientConfig::default(), Auth::Bearer).unwrap();
        assert!(client.is_enabled());
        assert!(client.base_url().is_none());

        assert!(BaseClient::new(ClientConfig::new("ftp://x", "t"), Auth::Bearer).is_err());
    }

    #[test]
    fn test_sends_fixed_and_auth_headers() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/services/123")
            .match_header("authorization", "Bearer auth-token")
            .match_header("user-agent", Matcher::Regex(r"^DM-API-Client/\d+\.\d+\.\d+$".into()))
            .match_header("content-type", "application/json")
            .match_header("x-request-id", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"services": {"id": 123}}"#)
            .create();

        let result = bearer(&server).get("/services/123").unwrap();
        assert_eq!(result, json!({"services": {"id": 123}}));
        mock.assert();
    }

    #[test]
    fn test_disabled_client_makes_no_requests() {
        let mut server = Server::new();
        let mocks: Vec<_> = ["GET", "POST", "PUT", "PATCH", "DELETE"]
            .into_iter()
            .map(|method| server.mock(method, Matcher::Any).expect(0).create())
            .collect();

        let client = BaseClient::new(
            ClientConfig::new(server.url(), "auth-token").with_enabled(false),
            Auth::Bearer,
        )
        .unwrap();

        assert_eq!(client.get("/services").unwrap(), json!({}));
        assert_eq!(client.post("/services", json!({"a": 1})).unwrap(), json!({}));
        assert_eq!(client.put("/x", json!({})).unwrap(), json!({}));
        assert_eq!(client.patch("/x", json!({})).unwrap(), json!({}));
        assert_eq!(client.delete("/x", None).unwrap(), json!({}));
        assert!(client.get_bytes("/x").unwrap().is_empty());
        assert_eq!(client.get_status().unwrap(), json!({}));
        assert_eq!(client.pages("services", "/services", QueryParams::new()).count(), 0);

        for mock in mocks {
            mock.assert();
        }
    }

    #[test]
    fn test_missing_base_url() {
        let client = BaseClient::new(ClientConfig::default(), Auth::Bearer).unwrap();
        assert!(matches!(client.get("/x"), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_init_rebinds_url_and_credential() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/services")
            .match_header("authorization", "Bearer new-token")
            .with_status(200)
            .with_body("{}")
            .create();

        let mut client = BaseClient::new(ClientConfig::default(), Auth::Bearer).unwrap();
        client.init(server.url(), "new-token");
        assert_eq!(client.base_url(), Some(server.url().as_str()));
        client.get("/services").unwrap();
        mock.assert();
    }

    #[test]
    fn test_status_is_anonymous() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/_status")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create();

        assert_eq!(bearer(&server).get_status().unwrap(), json!({"status": "ok"}));
        mock.assert();
    }

    #[test]
    fn test_repeated_get_is_identical() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/services")
            .match_query(Matcher::UrlEncoded("framework".into(), "g-cloud-6".into()))
            .with_status(200)
            .with_body(r#"{"services": [{"id": 1}, {"id": 2}], "links": {}}"#)
            .expect(2)
            .create();
        let client = bearer(&server);
        let query = QueryParams::new().with("framework", "g-cloud-6");

        let first = client.get_with("/services", query.clone()).unwrap();
        let second = client.get_with("/services", query).unwrap();
        assert_eq!(first, second);
        assert_eq!(first["services"][1]["id"], 2);
        mock.assert();
    }

    #[test]
    fn test_query_params_are_sent() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/services/123")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("wait-for-index".into(), "false".into()),
                Matcher::UrlEncoded("user-role".into(), "admin".into()),
            ]))
            .match_body(Matcher::Json(json!({"services": {}, "updated_by": "u"})))
            .with_status(200)
            .with_body("{}")
            .create();

        let query = QueryParams::new().with("wait-for-index", "false").with("user-role", "admin");
        bearer(&server)
            .post_with("/services/123", query, json!({"services": {}, "updated_by": "u"}))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_error_status_raises() {
        let mut server = Server::new();
        let _m1 = server
            .mock("GET", "/services/123")
            .with_status(400)
            .with_body(r#"{"error": "Bad request"}"#)
            .create();

        let err = bearer(&server).get("/services/123").unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.message(), "Bad request");
    }

    #[test]
    fn test_invalid_json_raises_invalid_response() {
        let mut server = Server::new();
        let _m2 = server.mock("GET", "/x").with_status(200).with_body("Internal Error").create();

        let err = bearer(&server).get("/x").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { status: 200, .. }));
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let mut server = Server::new();
        let _m3 = server.mock("DELETE", "/x").with_status(204).create();
        assert_eq!(bearer(&server).delete("/x", None).unwrap(), json!({}));
    }

    #[test]
    fn test_without_waiting() {
        let mut server = Server::new();
        let ok = server
            .mock("POST", "/notify")
            .with_status(202)
            .with_body(r#"{"big": "body"}"#)
            .create();
        let failing = server
            .mock("POST", "/fail")
            .with_status(500)
            .with_body(r#"{"error": "nope"}"#)
            .create();

        let client = bearer(&server);
        let outcome = client
            .execute(RequestDescriptor::new(Method::POST, "/notify").with_json(json!({})).without_waiting())
            .unwrap();
        assert_eq!(outcome, ResponseOutcome::Empty);

        let err = client
            .execute(RequestDescriptor::new(Method::POST, "/fail").without_waiting())
            .unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.message(), "nope");

        ok.assert();
        failing.assert();
    }

    #[test]
    fn test_follows_one_redirect_without_auth() {
        let mut server = Server::new();
        let redirect = server
            .mock("GET", "/documents/1")
            .match_header("authorization", "Bearer auth-token")
            .with_status(302)
            .with_header("location", &format!("{}/storage/1.pdf", server.url()))
            .create();
        let target = server
            .mock("GET", "/storage/1.pdf")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("%PDF-1.4")
            .create();

        let bytes = bearer(&server).get_bytes("/documents/1").unwrap();
        assert_eq!(bytes, b"%PDF-1.4".to_vec());
        redirect.assert();
        target.assert();
    }

    #[test]
    fn test_relative_redirect() {
        let mut server = Server::new();
        let _m4 = server
            .mock("GET", "/documents/1")
            .with_status(302)
            .with_header("location", "/storage/1.pdf")
            .create();
        let target = server.mock("GET", "/storage/1.pdf").with_status(200).with_body("data").create();

        assert_eq!(bearer(&server).get_bytes("/documents/1").unwrap(), b"data".to_vec());
        target.assert();
    }

    #[test]
    fn test_second_redirect_is_an_error() {
        let mut server = Server::new();
        let _m5 = server
            .mock("GET", "/documents/1")
            .with_status(302)
            .with_header("location", "/storage/1.pdf")
            .create();
        let _m6 = server
            .mock("GET", "/storage/1.pdf")
            .with_status(302)
            .with_header("location", "/elsewhere")
            .create();
        let elsewhere = server.mock("GET", "/elsewhere").expect(0).create();

        let err = bearer(&server).get_bytes("/documents/1").unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedRedirect { status: 302, .. }));
        elsewhere.assert();
    }

    #[test]
    fn test_redirect_in_json_mode_is_not_followed() {
        let mut server = Server::new();
        let _m7 = server
            .mock("GET", "/x")
            .with_status(302)
            .with_header("location", "/y")
            .create();
        let y = server.mock("GET", "/y").expect(0).create();

        let err = bearer(&server).get("/x").unwrap_err();
        assert!(err.has_status(302));
        y.assert();
    }

    #[test]
    fn test_signed_query_auth() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/workflow")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api-version".into(), "2016-10-01".into()),
                Matcher::UrlEncoded("sp".into(), "/triggers/manual/run".into()),
                Matcher::UrlEncoded("sv".into(), "1.0".into()),
                Matcher::UrlEncoded("sig".into(), "signature".into()),
                Matcher::UrlEncoded("Filter".into(), "x eq '1'".into()),
            ]))
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create();

        let client = BaseClient::new(
            ClientConfig::new(server.url(), "signature"),
            Auth::SignedQuery { route: ROUTE_MANUAL },
        )
        .unwrap();
        let result = client
            .get_with("/workflow", QueryParams::new().with("Filter", "x eq '1'"))
            .unwrap();
        assert_eq!(result, json!([]));
        mock.assert();
    }

    #[test]
    fn test_transport_failure_hides_credential() {
        let client = BaseClient::new(
            ClientConfig::new("http://127.0.0.1:1", "secret-signature"),
            Auth::SignedQuery { route: ROUTE_MANUAL },
        )
        .unwrap();

        let err = client.get("/workflow").unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed(_)));
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.message(), "Request failed");
        assert!(!err.to_string().contains("secret-signature"));
        assert!(!format!("{err:?}").contains("secret-signature"));
    }

    #[test]
    fn test_resolve_user() {
        let client = BaseClient::new(ClientConfig::default().with_user("default"), Auth::Bearer).unwrap();
        assert_eq!(client.resolve_user(Some("explicit")).unwrap(), "explicit");
        assert_eq!(client.resolve_user(None).unwrap(), "default");
        assert_eq!(client.resolve_user(Some("")).unwrap(), "default");

        let client = BaseClient::new(ClientConfig::default(), Auth::Bearer).unwrap();
        assert!(matches!(client.resolve_user(None), Err(ApiError::MissingUpdatedBy)));
    }

    #[test]
    fn test_pages_makes_one_call_per_page() {
        let mut server = Server::new();
        let first = server
            .mock("GET", "/users")
            .with_status(200)
            .with_body(format!(
                r#"{{"users": [{{"id": 1}}, {{"id": 2}}], "links": {{"next": "{}/users?page=2"}}}}"#,
                server.url()
            ))
            .create();
        let second = server
            .mock("GET", "/users")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(r#"{"users": [{"id": 3}], "links": {"prev": "http://x/users"}}"#)
            .create();

        let client = bearer(&server);
        let ids: Vec<_> = client
            .pages("users", "/users", QueryParams::new())
            .map(|user| user.unwrap()["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        first.assert();
        second.assert();
    }
}
