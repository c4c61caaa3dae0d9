//! Lazy iteration over paginated list endpoints
//!
//! List endpoints answer with a page envelope:
//!
//! ```json
//! {"services": [...], "links": {"next": "https://api/services?page=2", "prev": "..."}}
//! ```
//!
//! [`Pages`] yields the items of each page under its resource key, fetching
//! the next page only once the current one is exhausted. Only the query of a
//! `next` link is used, so relative links such as `/services?page=2` work too.

use crate::error::{ApiError, ApiResult};
use crate::request::QueryParams;
use reqwest::Url;
use serde_json::Value;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, warn};

/// Base used to read the query of relative `next` links
const RELATIVE_LINK_BASE: &str = "http://localhost/";

/// Iterator over every item of a paginated endpoint
///
/// Errors are yielded once, after which the iterator is exhausted. A bad
/// `next` link is reported after the items of the page that carried it.
pub struct Pages<F> {
    key: &'static str,
    fetch: F,
    pending: Option<QueryParams>,
    buffer: VecDeque<Value>,
    deferred: Option<ApiError>,
    pages_fetched: usize,
}

impl<F> Pages<F>
where
    F: FnMut(&QueryParams) -> ApiResult<Value>,
{
    /// Create an iterator; nothing is fetched until the first `next()`
    pub fn new(key: &'static str, params: QueryParams, fetch: F) -> Self {
        Self {
            key,
            fetch,
            pending: Some(params),
            buffer: VecDeque::new(),
            deferred: None,
            pages_fetched: 0,
        }
    }

    /// Number of pages fetched so far
    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn load(&mut self, mut params: QueryParams) -> ApiResult<()> {
        let page = (self.fetch)(&params)?;
        self.pages_fetched += 1;

        match page.get(self.key) {
            Some(Value::Array(items)) => self.buffer.extend(items.iter().cloned()),
            Some(_) => {
                return Err(ApiError::invalid_response(
                    200,
                    format!("`{}` is not a list", self.key),
                ));
            }
            None => {}
        }

        if let Some(next) = page.pointer("/links/next").and_then(Value::as_str) {
            let current = params.clone();
            match resolve_link(next) {
                Ok(url) => params.merge_from_url(&url),
                Err(e) => {
                    self.defer(e);
                    return Ok(());
                }
            }
            if params == current {
                self.defer(ApiError::invalid_response(
                    200,
                    "next page link does not change the query",
                ));
                return Ok(());
            }
            debug!(key = self.key, page = self.pages_fetched + 1, "Following next page link");
            self.pending = Some(params);
        }

        Ok(())
    }

    fn defer(&mut self, err: ApiError) {
        warn!(key = self.key, error = %err, "Stopping at unusable next page link");
        self.deferred = Some(err);
    }
}

/// Parse a `next` link, absolute or relative to the API root
fn resolve_link(link: &str) -> ApiResult<Url> {
    Url::parse(link)
        .or_else(|_| Url::parse(RELATIVE_LINK_BASE).and_then(|base| base.join(link)))
        .map_err(|e| ApiError::invalid_response(200, format!("invalid next page link: {e}")))
}

impl<F> Iterator for Pages<F>
where
    F: FnMut(&QueryParams) -> ApiResult<Value>,
{
    type Item = ApiResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            if let Some(e) = self.deferred.take() {
                return Some(Err(e));
            }

            let params = self.pending.take()?;
            if let Err(e) = self.load(params) {
                self.pending = None;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<F> FusedIterator for Pages<F> where F: FnMut(&QueryParams) -> ApiResult<Value> {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(results: Vec<ApiResult<Value>>) -> Vec<i64> {
        results
            .into_iter()
            .map(|r| r.unwrap()["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_follows_next_links() {
        let mut calls = Vec::new();
        let pages = Pages::new("services", QueryParams::new().with("framework", "g-cloud"), |params| {
            calls.push(params.clone());
            Ok(match params.get("page") {
                None => json!({
                    "services": [{"id": 1}, {"id": 2}],
                    "links": {"next": "http://baseurl/services?framework=g-cloud&page=2"}
                }),
                Some(_) => json!({
                    "services": [{"id": 3}],
                    "links": {"prev": "http://baseurl/services?page=1"}
                }),
            })
        });

        assert_eq!(ids(pages.collect()), vec![1, 2, 3]);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].get("page"), Some("2"));
        assert_eq!(calls[1].get("framework"), Some("g-cloud"));
    }

    #[test]
    fn test_single_page_without_links() {
        let mut count = 0;
        let pages = Pages::new("services", QueryParams::new(), |_| {
            count += 1;
            Ok(json!({"services": [{"id": 1}]}))
        });
        assert_eq!(ids(pages.collect()), vec![1]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_is_lazy() {
        let mut count = 0;
        {
            let mut pages = Pages::new("users", QueryParams::new(), |_| {
                count += 1;
                Ok(json!({"users": [{"id": 1}], "links": {"next": "http://x/users?page=2"}}))
            });
            assert_eq!(pages.pages_fetched(), 0);
            assert!(pages.next().is_some());
            assert_eq!(pages.pages_fetched(), 1);
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_object_is_empty_page() {
        let mut pages = Pages::new("users", QueryParams::new(), |_| Ok(json!({})));
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_error_is_yielded_once() {
        let mut pages = Pages::new("users", QueryParams::new(), |_| Err(ApiError::http(500, "boom")));
        assert!(matches!(pages.next(), Some(Err(ApiError::Http { status: 500, .. }))));
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_non_list_resource_is_invalid() {
        let mut pages = Pages::new("users", QueryParams::new(), |_| Ok(json!({"users": {"id": 1}})));
        assert!(matches!(pages.next(), Some(Err(ApiError::InvalidResponse { .. }))));
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_invalid_next_link_after_page_items() {
        let mut count = 0;
        let mut pages = Pages::new("users", QueryParams::new(), |_| {
            count += 1;
            Ok(json!({"users": [{"id": 1}, {"id": 2}], "links": {"next": "not a url"}}))
        });

        assert_eq!(pages.next().unwrap().unwrap()["id"], 1);
        assert_eq!(pages.next().unwrap().unwrap()["id"], 2);
        assert!(matches!(pages.next(), Some(Err(ApiError::InvalidResponse { .. }))));
        assert!(pages.next().is_none());
        drop(pages);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unparseable_next_link_after_page_items() {
        let mut pages = Pages::new("users", QueryParams::new(), |_| {
            Ok(json!({"users": [{"id": 7}], "links": {"next": "http://[::1"}}))
        });

        assert_eq!(pages.next().unwrap().unwrap()["id"], 7);
        let err = pages.next().unwrap().unwrap_err();
        assert!(err.message().starts_with("invalid next page link"));
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_follows_relative_next_links() {
        let mut calls = Vec::new();
        let pages = Pages::new("services", QueryParams::new().with("framework", "g-cloud"), |params| {
            calls.push(params.clone());
            Ok(match params.get("page") {
                None => json!({
                    "services": [{"id": 1}],
                    "links": {"next": "/services?framework=g-cloud&page=2"}
                }),
                Some(_) => json!({"services": [{"id": 2}]}),
            })
        });

        assert_eq!(ids(pages.collect()), vec![1, 2]);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].get("page"), Some("2"));
        assert_eq!(calls[1].get("framework"), Some("g-cloud"));
    }
}
