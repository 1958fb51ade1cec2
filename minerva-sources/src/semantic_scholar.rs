//! Semantic Scholar source adapter: paper search and citation lookup.

use async_trait::async_trait;
use std::time::Duration;

use minerva_core::{Paper, PaperSource, SourceError, normalize_whitespace};

use crate::adapter::{RequestPacer, SourceAdapter};

const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1";
const SEARCH_FIELDS: &str = "title,authors,abstract,year,url,citationCount,venue,openAccessPdf";
const USER_AGENT: &str = "Minerva/0.1 (research assistant)";

/// Minimum delay between unauthenticated Semantic Scholar requests.
const S2_MIN_DELAY: Duration = Duration::from_secs(1);

/// Rate-limited client for the Semantic Scholar Graph API.
///
/// Doubles as a search adapter and as the citation-count lookup used to
/// enrich papers from sources that carry no citation data.
pub struct SemanticScholarAdapter {
    client: reqwest::Client,
    pacer: RequestPacer,
    api_key: Option<String>,
}

impl SemanticScholarAdapter {
    pub fn new(api_key: Option<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Http {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            pacer: RequestPacer::new(S2_MIN_DELAY),
            api_key,
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, SourceError> {
        self.pacer.wait().await;
        tracing::debug!("Semantic Scholar URL: {}", url);

        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| SourceError::Http {
            message: format!("Semantic Scholar request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| SourceError::Parse {
            message: format!("Failed to parse Semantic Scholar response: {}", e),
        })
    }

    async fn fetch_inner(&self, query: &str, limit: usize) -> Result<Vec<Paper>, SourceError> {
        let url = format!(
            "{}/paper/search?query={}&limit={}&fields={}",
            SEMANTIC_SCHOLAR_API,
            urlencoding::encode(query),
            limit,
            SEARCH_FIELDS,
        );
        let body = self.get_json(&url).await?;

        let data = body
            .get("data")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(data.iter().filter_map(parse_search_item).collect())
    }

    /// Look up the citation count of the best title match.
    ///
    /// Searches with `limit=1`; the top hit is taken as the match.
    pub async fn citation_count_by_title(&self, title: &str) -> Result<u64, SourceError> {
        let url = format!(
            "{}/paper/search?query={}&limit=1&fields=title,citationCount",
            SEMANTIC_SCHOLAR_API,
            urlencoding::encode(title),
        );
        let body = self.get_json(&url).await?;

        body.get("data")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|item| item.get("citationCount"))
            .and_then(|v| v.as_u64())
            .ok_or(SourceError::Parse {
                message: "No citation count in search result".into(),
            })
    }
}

#[async_trait]
impl SourceAdapter for SemanticScholarAdapter {
    fn source(&self) -> PaperSource {
        PaperSource::SemanticScholar
    }

    async fn fetch(&self, query: &str, limit: usize) -> Vec<Paper> {
        match self.fetch_inner(query, limit).await {
            Ok(papers) => papers,
            Err(e) => {
                tracing::warn!("Semantic Scholar fetch failed, continuing without it: {}", e);
                Vec::new()
            }
        }
    }
}

fn parse_search_item(item: &serde_json::Value) -> Option<Paper> {
    let title = normalize_whitespace(item.get("title").and_then(|v| v.as_str())?);
    if title.is_empty() {
        return None;
    }

    let authors = item
        .get("authors")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|author| author.get("name").and_then(|v| v.as_str()))
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    let abstract_text = normalize_whitespace(
        item.get("abstract").and_then(|v| v.as_str()).unwrap_or(""),
    );

    let year = item
        .get("year")
        .and_then(|v| v.as_i64())
        .map(|y| y as i32)
        .unwrap_or(0);

    let url = item
        .get("url")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let pdf_url = item
        .get("openAccessPdf")
        .and_then(|v| v.get("url"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let citations = item
        .get("citationCount")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    let venue = item
        .get("venue")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Some(Paper {
        title,
        authors,
        abstract_text,
        year,
        url,
        pdf_url,
        source: PaperSource::SemanticScholar,
        citations,
        venue,
    })
}
