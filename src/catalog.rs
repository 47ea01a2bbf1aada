//! Catalog adapter abstraction and the iTunes implementation.
//!
//! The iTunes search endpoint answers JSONP: a static `JSONP.run(...)`
//! envelope around the JSON payload. The envelope format never varies, so it
//! is stripped by fixed byte offsets before parsing. The lookup endpoint
//! answers plain JSON. Timeout policy lives entirely in the `ureq` agent; the
//! rest of the client performs no retries.

use std::time::Duration;

use log::warn;
use serde_json::Value;
use thiserror::Error;

use crate::config::SearchDefaults;
use crate::entity::RawResult;

const SEARCH_URL: &str = "https://itunes.apple.com/search";
const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";
const JSONP_CALLBACK: &str = "JSONP.run";
/// Bytes of envelope before the JSON payload in a search response body.
const JSONP_PREFIX_LEN: usize = 13;
/// Bytes of envelope after the JSON payload in a search response body.
const JSONP_SUFFIX_LEN: usize = 5;

/// Failure at the transport/parse boundary; the whole cycle yields no results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog response could not be parsed: {0}")]
    MalformedResponse(String),
}

/// Parsed body of a search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub result_count: u64,
    pub results: Vec<RawResult>,
}

/// Interface implemented by concrete catalog adapters.
pub trait CatalogAdapter {
    /// Runs one search request for a term and an API entity filter string.
    fn search(&self, term: &str, entity_filter: &str) -> Result<SearchResponse, CatalogError>;
    /// Looks up a single record by identifier; absent is not an error.
    fn lookup(&self, uid: u64) -> Result<Option<RawResult>, CatalogError>;
}

/// iTunes catalog adapter backed by `ureq`.
pub struct ItunesAdapter {
    http_client: ureq::Agent,
    defaults: SearchDefaults,
}

impl ItunesAdapter {
    /// Creates a new adapter with the compiled-in request defaults.
    pub fn new(defaults: SearchDefaults) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self {
            http_client,
            defaults,
        }
    }

    fn search_url(&self, term: &str, entity_filter: &str) -> String {
        let params: Vec<(&str, String)> = vec![
            ("output", "json".to_string()),
            ("callback", JSONP_CALLBACK.to_string()),
            ("term", term.to_string()),
            ("country", self.defaults.country.clone()),
            ("media", self.defaults.media.clone()),
            ("entity", entity_filter.to_string()),
            ("limit", self.defaults.limit.to_string()),
            ("lang", self.defaults.lang.clone()),
        ];
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        format!("{}?{}", SEARCH_URL, query.join("&"))
    }

    fn lookup_url(&self, uid: u64) -> String {
        format!("{}?id={}", LOOKUP_URL, uid)
    }

    fn fetch_body(&self, url: &str) -> Result<String, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .call()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        response
            .into_string()
            .map_err(|err| CatalogError::Transport(err.to_string()))
    }
}

impl CatalogAdapter for ItunesAdapter {
    fn search(&self, term: &str, entity_filter: &str) -> Result<SearchResponse, CatalogError> {
        let body = self.fetch_body(&self.search_url(term, entity_filter))?;
        parse_search_body(&body)
    }

    fn lookup(&self, uid: u64) -> Result<Option<RawResult>, CatalogError> {
        let body = self.fetch_body(&self.lookup_url(uid))?;
        parse_lookup_body(&body)
    }
}

/// Strips the static JSONP envelope from a search response body.
fn strip_jsonp_envelope(body: &str) -> Result<&str, CatalogError> {
    body.len()
        .checked_sub(JSONP_PREFIX_LEN + JSONP_SUFFIX_LEN)
        .and_then(|_| body.get(JSONP_PREFIX_LEN..body.len() - JSONP_SUFFIX_LEN))
        .ok_or_else(|| CatalogError::MalformedResponse("response shorter than the JSONP envelope".to_string()))
}

fn parse_search_body(body: &str) -> Result<SearchResponse, CatalogError> {
    let payload = strip_jsonp_envelope(body)?;
    let parsed: Value = serde_json::from_str(payload)
        .map_err(|err| CatalogError::MalformedResponse(err.to_string()))?;
    let results = collect_records(parsed.get("results"));
    let result_count = parsed
        .get("resultCount")
        .and_then(Value::as_u64)
        .unwrap_or(results.len() as u64);
    Ok(SearchResponse {
        result_count,
        results,
    })
}

fn parse_lookup_body(body: &str) -> Result<Option<RawResult>, CatalogError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|err| CatalogError::MalformedResponse(err.to_string()))?;
    Ok(collect_records(parsed.get("results")).into_iter().next())
}

fn collect_records(results: Option<&Value>) -> Vec<RawResult> {
    let items = match results {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };
    items
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(record) => Some(record.clone()),
            None => {
                warn!("dropping non-object record from catalog response");
                None
            }
        })
        .collect()
}
