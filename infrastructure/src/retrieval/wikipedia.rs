//! Wikipedia document retriever (MediaWiki Action API)
//!
//! For each question:
//!
//! 1. `list=search` returns up to `num_articles` candidate titles.
//! 2. `prop=extracts` fetches the plain-text body of each title.
//! 3. A title the API reports as `missing` is retried once with the search
//!    suggestion for it (`srinfo=suggestion`). Titles without a suggestion
//!    are skipped.
//!
//! Bodies are cut to `characters_per_article` characters.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use wikiqa_application::{DocumentRetriever, RetrievalError};
use wikiqa_domain::Document;

const USER_AGENT: &str = concat!("wikiqa/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout of the HTTP client
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

// ==================== Wire types ====================

#[derive(Debug, Deserialize)]
struct ApiResponse<Q> {
    query: Option<Q>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
    searchinfo: Option<SearchInfo>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchInfo {
    suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
}

/// Outcome of fetching one page body
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PageExtract {
    Found { title: String, text: String },
    Missing,
}

// ==================== Parsing ====================

fn decode<Q: serde::de::DeserializeOwned>(body: &str) -> Result<Option<Q>, RetrievalError> {
    let response: ApiResponse<Q> = serde_json::from_str(body)
        .map_err(|e| RetrievalError::Malformed(format!("invalid JSON: {}", e)))?;
    if let Some(error) = response.error {
        return Err(RetrievalError::Malformed(format!(
            "{}: {}",
            error.code, error.info
        )));
    }
    Ok(response.query)
}

/// Titles from a `list=search` response, in ranking order
pub(crate) fn parse_search_titles(body: &str) -> Result<Vec<String>, RetrievalError> {
    let query: Option<SearchQuery> = decode(body)?;
    Ok(query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default())
}

/// Spelling suggestion from a `srinfo=suggestion` response
pub(crate) fn parse_suggestion(body: &str) -> Result<Option<String>, RetrievalError> {
    let query: Option<SearchQuery> = decode(body)?;
    Ok(query
        .and_then(|q| q.searchinfo)
        .and_then(|info| info.suggestion)
        .filter(|s| !s.trim().is_empty()))
}

/// The single page of a `prop=extracts` response
pub(crate) fn parse_extract(body: &str) -> Result<PageExtract, RetrievalError> {
    let query: Option<ExtractQuery> = decode(body)?;
    let page = query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| RetrievalError::Malformed("response has no pages".to_string()))?;

    if page.missing || page.invalid {
        return Ok(PageExtract::Missing);
    }
    Ok(PageExtract::Found {
        title: page.title,
        text: page.extract.unwrap_or_default(),
    })
}

// ==================== Retriever ====================

/// [`DocumentRetriever`] backed by a MediaWiki installation
pub struct WikipediaRetriever {
    client: reqwest::Client,
    endpoint: String,
}

impl WikipediaRetriever {
    /// Create a retriever for the given `api.php` endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a retriever sharing an existing client
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String, RetrievalError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Unavailable(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response.text().await.map_err(map_transport_error)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, RetrievalError> {
        let limit = limit.to_string();
        let body = self
            .get(&[("list", "search"), ("srsearch", query), ("srlimit", &limit)])
            .await?;
        parse_search_titles(&body)
    }

    async fn suggest(&self, title: &str) -> Result<Option<String>, RetrievalError> {
        let body = self
            .get(&[
                ("list", "search"),
                ("srsearch", title),
                ("srinfo", "suggestion"),
                ("srlimit", "1"),
            ])
            .await?;
        parse_suggestion(&body)
    }

    async fn extract(&self, title: &str) -> Result<PageExtract, RetrievalError> {
        let body = self
            .get(&[
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;
        parse_extract(&body)
    }

    /// Fetch one title, falling back to its search suggestion when missing
    async fn fetch_article(&self, title: &str) -> Result<Option<(String, String)>, RetrievalError> {
        if let PageExtract::Found { title, text } = self.extract(title).await? {
            return Ok(Some((title, text)));
        }

        let Some(suggestion) = self.suggest(title).await? else {
            warn!("Article \"{}\" not found and has no suggestion, skipping", title);
            return Ok(None);
        };
        debug!("Article \"{}\" not found, trying \"{}\"", title, suggestion);

        match self.extract(&suggestion).await? {
            PageExtract::Found { title, text } => Ok(Some((title, text))),
            PageExtract::Missing => {
                warn!(
                    "Suggested article \"{}\" for \"{}\" not found, skipping",
                    suggestion, title
                );
                Ok(None)
            }
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> RetrievalError {
    if error.is_timeout() {
        RetrievalError::Timeout
    } else if error.is_decode() {
        RetrievalError::Malformed(error.to_string())
    } else {
        RetrievalError::Unavailable(error.to_string())
    }
}

#[async_trait]
impl DocumentRetriever for WikipediaRetriever {
    async fn get_articles(
        &self,
        query: &str,
        num_articles: usize,
        characters_per_article: usize,
    ) -> Result<Vec<Document>, RetrievalError> {
        let titles = self.search(query, num_articles).await?;
        info!("Search for \"{}\" returned {} titles", query, titles.len());

        let mut documents = Vec::with_capacity(titles.len());
        for title in titles.iter().take(num_articles) {
            if let Some((title, text)) = self.fetch_article(title).await? {
                debug!("Fetched \"{}\" ({} characters)", title, text.chars().count());
                documents.push(Document::truncated(title, &text, characters_per_article));
            }
        }
        Ok(documents)
    }
}
