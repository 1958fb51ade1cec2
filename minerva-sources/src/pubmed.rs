//! PubMed source adapter: NCBI E-utilities client (esearch + efetch).

use async_trait::async_trait;
use chrono::Datelike;
use std::time::Duration;

use minerva_core::{Paper, PaperSource, SourceError, normalize_whitespace};

use crate::adapter::{RequestPacer, SourceAdapter};
use crate::xml::{extract_blocks, extract_tag_text};

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const USER_AGENT: &str = "Minerva/0.1 (research assistant)";

/// NCBI allows 3 requests per second without an API key.
const PUBMED_MIN_DELAY: Duration = Duration::from_millis(340);

/// Adapter for PubMed via the NCBI E-utilities.
///
/// Runs two requests per search: `esearch.fcgi` for PMIDs, then
/// `efetch.fcgi` for the article XML.
pub struct PubmedAdapter {
    client: reqwest::Client,
    pacer: RequestPacer,
    /// Contact email sent with every request, per NCBI usage policy.
    email: String,
    /// Restrict results to this publication year onward; 0 disables.
    from_year: i32,
}

impl PubmedAdapter {
    pub fn new(email: impl Into<String>) -> Result<Self, SourceError> {
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
            pacer: RequestPacer::new(PUBMED_MIN_DELAY),
            email: email.into(),
            from_year: 0,
        })
    }

    pub fn with_from_year(mut self, from_year: i32) -> Self {
        self.from_year = from_year;
        self
    }

    async fn search_ids(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        self.pacer.wait().await;

        let term = if self.from_year > 0 {
            let current_year = chrono::Utc::now().year();
            format!("{} AND {}:{}[dp]", query, self.from_year, current_year)
        } else {
            query.to_string()
        };

        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json&sort=relevance&email={}",
            EUTILS_BASE,
            urlencoding::encode(&term),
            limit,
            urlencoding::encode(&self.email),
        );
        tracing::debug!("PubMed esearch URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                message: format!("PubMed search request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| SourceError::Parse {
            message: format!("Failed to parse PubMed search response: {}", e),
        })?;

        let ids = body
            .get("esearchresult")
            .and_then(|v| v.get("idlist"))
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn fetch_articles(&self, ids: &[String]) -> Result<String, SourceError> {
        self.pacer.wait().await;

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml&email={}",
            EUTILS_BASE,
            ids.join(","),
            urlencoding::encode(&self.email),
        );
        tracing::debug!("PubMed efetch URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                message: format!("PubMed fetch request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| SourceError::Parse {
            message: format!("Failed to read PubMed fetch response: {}", e),
        })
    }

    async fn fetch_inner(&self, query: &str, limit: usize) -> Result<Vec<Paper>, SourceError> {
        let ids = self.search_ids(query, limit).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let xml = self.fetch_articles(&ids).await?;
        Ok(extract_blocks(&xml, "PubmedArticle")
            .iter()
            .filter_map(|article| parse_article(article))
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for PubmedAdapter {
    fn source(&self) -> PaperSource {
        PaperSource::Pubmed
    }

    async fn fetch(&self, query: &str, limit: usize) -> Vec<Paper> {
        match self.fetch_inner(query, limit).await {
            Ok(papers) => papers,
            Err(e) => {
                tracing::warn!("PubMed fetch failed, continuing without it: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parse one `<PubmedArticle>` block into a `Paper`.
fn parse_article(article: &str) -> Option<Paper> {
    let title = normalize_whitespace(&extract_tag_text(article, "ArticleTitle")?);
    if title.is_empty() {
        return None;
    }

    let mut authors = Vec::new();
    for author_block in extract_blocks(article, "Author") {
        let fore = extract_tag_text(&author_block, "ForeName");
        let last = extract_tag_text(&author_block, "LastName");
        match (fore, last) {
            (Some(f), Some(l)) => authors.push(format!("{} {}", f, l)),
            (None, Some(l)) => authors.push(l),
            _ => {}
        }
    }

    let abstract_text: String = extract_blocks(article, "AbstractText")
        .iter()
        .map(|block| normalize_whitespace(&strip_tags(block)))
        .collect::<Vec<_>>()
        .join(" ");

    let year = extract_blocks(article, "PubDate")
        .first()
        .and_then(|date| extract_tag_text(date, "Year"))
        .and_then(|y| y.parse::<i32>().ok())
        .unwrap_or(0);

    let venue = extract_blocks(article, "Journal")
        .first()
        .and_then(|journal| extract_tag_text(journal, "Title"))
        .unwrap_or_default();

    let pmid = extract_tag_text(article, "PMID").unwrap_or_default();
    let url = if pmid.is_empty() {
        String::new()
    } else {
        format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid)
    };

    Some(Paper {
        title,
        authors,
        abstract_text,
        year,
        url,
        pdf_url: None,
        source: PaperSource::Pubmed,
        citations: 0, // PubMed carries no citation data
        venue,
    })
}

/// Drop inline markup such as `<i>` inside abstract sections.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ARTICLE: &str = r#"<PubmedArticle>
        <MedlineCitation>
            <PMID Version="1">31978945</PMID>
            <Article>
                <Journal>
                    <Title>Nature medicine</Title>
                    <JournalIssue>
                        <PubDate><Year>2020</Year><Month>Jan</Month></PubDate>
                    </JournalIssue>
                </Journal>
                <ArticleTitle>Deep learning for chest radiograph diagnosis</ArticleTitle>
                <Abstract>
                    <AbstractText Label="BACKGROUND">Chest radiography is widely used.</AbstractText>
                    <AbstractText Label="RESULTS">The model matched <i>expert</i> performance.</AbstractText>
                </Abstract>
                <AuthorList>
                    <Author><LastName>Rajpurkar</LastName><ForeName>Pranav</ForeName></Author>
                    <Author><LastName>Irvin</LastName><ForeName>Jeremy</ForeName></Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>"#;

    #[test]
    fn test_parse_article_full() {
        let paper = parse_article(SAMPLE_ARTICLE).unwrap();
        assert_eq!(paper.title, "Deep learning for chest radiograph diagnosis");
        assert_eq!(paper.authors, vec!["Pranav Rajpurkar", "Jeremy Irvin"]);
        assert_eq!(
            paper.abstract_text,
            "Chest radiography is widely used. The model matched expert performance."
        );
        assert_eq!(paper.year, 2020);
        assert_eq!(paper.venue, "Nature medicine");
        assert_eq!(paper.url, "https://pubmed.ncbi.nlm.nih.gov/31978945/");
        assert_eq!(paper.source, PaperSource::Pubmed);
        assert_eq!(paper.citations, 0);
        assert!(paper.pdf_url.is_none());
    }

    #[test]
    fn test_parse_article_missing_title_dropped() {
        let article = "<PubmedArticle><MedlineCitation><PMID>1</PMID></MedlineCitation></PubmedArticle>";
        assert!(parse_article(article).is_none());
    }

    #[test]
    fn test_parse_article_collective_author() {
        let article = r#"<PubmedArticle>
            <PMID>2</PMID>
            <ArticleTitle>Trial results</ArticleTitle>
            <AuthorList>
                <Author><LastName>Smith</LastName></Author>
            </AuthorList>
        </PubmedArticle>"#;
        let paper = parse_article(article).unwrap();
        assert_eq!(paper.authors, vec!["Smith"]);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a <i>b</i> c"), "a b c");
        assert_eq!(strip_tags("plain"), "plain");
    }
}
