//! ArXiv source adapter: HTTP client and Atom feed parser.

use async_trait::async_trait;
use std::time::Duration;

use minerva_core::{Paper, PaperSource, SourceError, normalize_whitespace};

use crate::adapter::{RequestPacer, SourceAdapter};
use crate::xml::{extract_attribute, extract_blocks, extract_tag_text};

const ARXIV_API_BASE: &str = "https://export.arxiv.org/api/query";
const USER_AGENT: &str = "Minerva/0.1 (research assistant)";

/// Minimum delay between arXiv API requests, per their usage policy.
const ARXIV_MIN_DELAY: Duration = Duration::from_secs(3);

/// Adapter for the arXiv Atom API.
pub struct ArxivAdapter {
    client: reqwest::Client,
    pacer: RequestPacer,
    /// Drop papers published before this year; 0 disables the filter.
    from_year: i32,
}

impl ArxivAdapter {
    pub fn new() -> Result<Self, SourceError> {
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
            pacer: RequestPacer::new(ARXIV_MIN_DELAY),
            from_year: 0,
        })
    }

    pub fn with_from_year(mut self, from_year: i32) -> Self {
        self.from_year = from_year;
        self
    }

    async fn fetch_inner(&self, query: &str, limit: usize) -> Result<Vec<Paper>, SourceError> {
        self.pacer.wait().await;

        let url = format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=relevance&sortOrder=descending",
            ARXIV_API_BASE,
            urlencoding::encode(&format!("all:{}", query)),
            limit,
        );
        tracing::debug!("arXiv search URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                message: format!("arXiv request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Parse {
            message: format!("Failed to read arXiv response: {}", e),
        })?;

        let mut papers: Vec<Paper> = extract_blocks(&body, "entry")
            .iter()
            .filter_map(|entry| parse_entry(entry))
            .collect();
        if self.from_year > 0 {
            papers.retain(|p| p.year >= self.from_year);
        }
        Ok(papers)
    }
}

#[async_trait]
impl SourceAdapter for ArxivAdapter {
    fn source(&self) -> PaperSource {
        PaperSource::Arxiv
    }

    async fn fetch(&self, query: &str, limit: usize) -> Vec<Paper> {
        match self.fetch_inner(query, limit).await {
            Ok(papers) => papers,
            Err(e) => {
                tracing::warn!("arXiv fetch failed, continuing without it: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parse a single Atom `<entry>` block into a `Paper`.
///
/// Returns `None` when the entry has no usable title; such records are
/// dropped rather than defaulted.
fn parse_entry(entry: &str) -> Option<Paper> {
    let title = normalize_whitespace(&extract_tag_text(entry, "title")?);
    if title.is_empty() {
        return None;
    }

    let mut authors = Vec::new();
    for author_block in extract_blocks(entry, "author") {
        if let Some(name) = extract_tag_text(&author_block, "name") {
            authors.push(name);
        }
    }

    let abstract_text =
        normalize_whitespace(&extract_tag_text(entry, "summary").unwrap_or_default());

    let published = extract_tag_text(entry, "published").unwrap_or_default();
    let year = published
        .get(..4)
        .and_then(|y| y.parse::<i32>().ok())
        .unwrap_or(0);

    // Links: the pdf link carries title="pdf" or an application/pdf type;
    // the abstract page link has no type attribute and contains /abs/.
    let id_url = extract_tag_text(entry, "id").unwrap_or_default();
    let mut pdf_url = None;
    let mut abs_url = id_url.clone();
    let mut link_search = 0;
    while let Some(pos) = entry[link_search..].find("<link") {
        let link_start = link_search + pos;
        let Some(end_pos) = entry[link_start..].find('>') else {
            break;
        };
        let link_end = link_start + end_pos + 1;
        let link_tag = &entry[link_start..link_end];
        let href = extract_attribute(link_tag, "href").unwrap_or_default();
        let title_attr = extract_attribute(link_tag, "title").unwrap_or_default();
        let link_type = extract_attribute(link_tag, "type").unwrap_or_default();

        if title_attr == "pdf" || link_type == "application/pdf" {
            pdf_url = Some(href);
        } else if href.contains("/abs/") {
            abs_url = href;
        }
        link_search = link_end;
    }

    if abs_url.is_empty() {
        abs_url = pdf_url.clone().unwrap_or_default();
    }

    Some(Paper {
        title,
        authors,
        abstract_text,
        year,
        url: abs_url,
        pdf_url,
        source: PaperSource::Arxiv,
        citations: 0, // arXiv provides no citation data
        venue: "arXiv".into(),
    })
}
