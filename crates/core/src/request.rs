//! Request descriptors and query parameters

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde_json::Value;
use std::fmt::Display;

/// Ordered query parameters
///
/// Setting a key that is already present replaces its value in place, so a
/// parameter keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Create empty parameters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any existing value
    pub fn set(&mut self, key: impl Into<String>, value: impl Display) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder-style [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.set(key, value);
        self
    }

    /// Set a parameter only when a value is given
    #[must_use]
    pub fn opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Set a boolean spelled `true` / `false`
    #[must_use]
    pub fn flag(self, key: impl Into<String>, value: Option<bool>) -> Self {
        self.opt(key, value)
    }

    /// Set a boolean spelled `True` / `False`
    ///
    /// Several endpoints only recognise the capitalised spelling.
    #[must_use]
    pub fn title_flag(self, key: impl Into<String>, value: Option<bool>) -> Self {
        self.opt(key, value.map(|v| if v { "True" } else { "False" }))
    }

    /// Look up a parameter
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Override parameters with those found in a URL's query string
    pub fn merge_from_url(&mut self, url: &Url) {
        for (key, value) in url.query_pairs() {
            self.set(key.into_owned(), value);
        }
    }

    /// Iterate over `(key, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a successful response body is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Decode the body as JSON
    #[default]
    Json,
    /// Return the body as raw bytes; one redirect hop is followed
    Bytes,
}

/// Everything needed to send one request
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// Query parameters
    pub query: QueryParams,
    /// JSON body
    pub body: Option<Value>,
    /// Headers besides the fixed and auth headers
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// How to read the response
    pub mode: ResponseMode,
    /// When false the body is dropped unread after the status is checked
    pub wait_for_response: bool,
    /// When true no auth is attached
    pub anonymous: bool,
}

impl RequestDescriptor {
    /// Create a descriptor with no body or parameters
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            headers: Vec::new(),
            mode: ResponseMode::Json,
            wait_for_response: true,
            anonymous: false,
        }
    }

    /// Shorthand for a GET descriptor
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Set query parameters
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Set the response mode
    #[must_use]
    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Do not wait for the response body
    #[must_use]
    pub fn without_waiting(mut self) -> Self {
        self.wait_for_response = false;
        self
    }

    /// Send without auth
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}
