//! Encyclopedia lookup via the MediaWiki search API
//!
//! Backs the agent's `knowledge_lookup` tool: up to three summarized
//! results returned as a single string.

use crate::errors::{RagError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// English Wikipedia API endpoint
const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Number of search results to summarize
const MAX_RESULTS: usize = 3;

/// Lookup request timeout
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// External general-knowledge lookup capability
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Search for `query` and return summarized results as one string
    async fn lookup(&self, query: &str) -> Result<String>;
}

pub struct WikipediaClient {
    client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .user_agent(concat!("askdocs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RagError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl KnowledgeSource for WikipediaClient {
    async fn lookup(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(WIKIPEDIA_API_URL)
            .query(&search_params(query))
            .send()
            .await
            .map_err(|e| RagError::ExternalService(format!("Wikipedia lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RagError::ExternalService(format!(
                "Wikipedia returned HTTP {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            RagError::ExternalService(format!("Failed to parse Wikipedia response: {}", e))
        })?;

        let summaries: Vec<String> = body
            .query
            .search
            .into_iter()
            .take(MAX_RESULTS)
            .map(|hit| format!("{}: {}", hit.title, strip_html(&hit.snippet)))
            .collect();

        if summaries.is_empty() {
            return Ok(format!("No encyclopedia results for '{}'.", query));
        }

        Ok(summaries.join("\n\n"))
    }
}

/// MediaWiki search query parameters, limited to [`MAX_RESULTS`] hits
fn search_params(query: &str) -> [(&'static str, String); 6] {
    [
        ("action", "query".to_string()),
        ("list", "search".to_string()),
        ("srsearch", query.to_string()),
        ("srlimit", MAX_RESULTS.to_string()),
        ("format", "json".to_string()),
        ("utf8", "1".to_string()),
    ]
}

/// Flatten an HTML snippet to plain text
fn strip_html(snippet: &str) -> String {
    let fragment = scraper::Html::parse_fragment(snippet);
    fragment.root_element().text().collect::<String>()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    snippet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_limit_matches_result_cap() {
        let params = search_params("agents");
        let (_, limit) = params.iter().find(|(k, _)| *k == "srlimit").unwrap();
        assert_eq!(limit, &MAX_RESULTS.to_string());

        let (_, term) = params.iter().find(|(k, _)| *k == "srsearch").unwrap();
        assert_eq!(term, "agents");
    }

    #[test]
    fn test_strip_html() {
        let snippet = r#"<span class="searchmatch">Paris</span> is the capital of France"#;
        assert_eq!(strip_html(snippet), "Paris is the capital of France");
    }

    #[test]
    fn test_search_response_parsing() {
        let raw = r#"{
            "query": {
                "search": [
                    { "title": "Paris", "snippet": "capital of <b>France</b>" },
                    { "title": "France", "snippet": "a country" }
                ]
            }
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.query.search.len(), 2);
        assert_eq!(parsed.query.search[0].title, "Paris");
    }
}
