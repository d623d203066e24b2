//! PubMed ingestion utilities leveraging E-utilities.

use std::time::Duration;

use anyhow::Result;
use once_cell::sync::Lazy;
use quick_xml::{de::from_str, events::Event, Reader};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};
use urlencoding::encode;

use crate::{config::Settings, data::articles::ArticleRecord, data::throttle::Throttle, workers};

const RETRY_DELAY: Duration = Duration::from_secs(1);

static INLINE_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?(?:i|b|u|sup|sub|em|strong)(?:\s[^>]*)?/?>").expect("valid regex")
});

/// A batch request that failed twice in a row.
#[derive(Debug, Error)]
#[error("efetch for {count} pmids failed after retry")]
pub struct FetchError {
    pub count: usize,
    #[source]
    pub source: reqwest::Error,
}

/// Per-article parse failures. These skip the article, never the batch.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("unparseable article: {0}")]
    Unparseable(#[from] quick_xml::de::DeError),
}

/// Throttled efetch client with a single retry.
pub struct PubmedClient {
    client: Client,
    efetch_url: String,
    tool: String,
    email: String,
    api_key: Option<String>,
    throttle: Throttle,
    retry_delay: Duration,
}

impl PubmedClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            client: http_client(settings)?,
            efetch_url: settings.efetch_url.clone(),
            tool: settings.pubmed_tool.clone(),
            email: settings.pubmed_email.clone(),
            api_key: settings.ncbi_api_key.clone(),
            throttle: Throttle::per_second(settings.rate_limit),
            retry_delay: RETRY_DELAY,
        })
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn request_url(&self, pmids: &[u64]) -> String {
        let ids = pmids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut url = format!(
            "{base}?tool={tool}&email={email}&db=pubmed&retmode=xml",
            base = self.efetch_url,
            tool = encode(&self.tool),
            email = encode(&self.email),
        );
        if let Some(key) = &self.api_key {
            url.push_str(&format!("&api_key={}", encode(key)));
        }
        url.push_str(&format!("&id={}", encode(&ids)));
        url
    }

    /// Fetch the XML for one batch, retrying once after a fixed delay.
    pub async fn fetch_batch(&self, pmids: &[u64]) -> Result<String, FetchError> {
        let url = self.request_url(pmids);
        match self.try_fetch(&url).await {
            Ok(body) => Ok(body),
            Err(first) => {
                warn!(error = %first, delay = ?self.retry_delay, "efetch failed, retrying");
                sleep(self.retry_delay).await;
                self.try_fetch(&url).await.map_err(|source| FetchError {
                    count: pmids.len(),
                    source,
                })
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        self.throttle.acquire().await;
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Fetch and parse every PMID. Batches run in order; articles within a batch
/// are parsed on the worker pool and arrive in completion order.
pub async fn fetch_articles(
    client: &PubmedClient,
    pmids: &[u64],
    batch_size: usize,
    workers: usize,
) -> Result<Vec<ArticleRecord>> {
    let mut articles = Vec::new();
    let mut requested = 0;
    for batch in pmids.chunks(batch_size.max(1)) {
        let xml = client.fetch_batch(batch).await?;
        let slices = split_articles(&xml);
        let parsed = workers::map_unordered(slices, workers, |slice| parse_article(&slice)).await?;
        for outcome in parsed {
            match outcome {
                Ok(article) => articles.push(article),
                Err(err) => warn!(%err, "skipping article"),
            }
        }
        requested += batch.len();
        info!(requested, parsed = articles.len(), "articles parsed");
    }
    Ok(articles)
}

/// Cut each `<PubmedArticle>` element out of an efetch response.
///
/// Scanning stops at the first XML error; articles before it are kept.
pub fn split_articles(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut articles = Vec::new();
    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(element)) if element.name().as_ref() == b"PubmedArticle" => {
                if let Err(err) = reader.read_to_end(element.name()) {
                    warn!(%err, "truncated article in response");
                    break;
                }
                let end = reader.buffer_position() as usize;
                articles.push(xml[start..end].to_string());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, kept = articles.len(), "malformed efetch response");
                break;
            }
        }
    }
    articles
}

/// Parse a single `<PubmedArticle>` element.
pub fn parse_article(xml: &str) -> Result<ArticleRecord, ArticleError> {
    let cleaned = INLINE_MARKUP.replace_all(xml, "");
    let article: PubmedArticle = from_str(&cleaned)?;
    Ok(article.into_record())
}

fn http_client(settings: &Settings) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(format!("phrase-miner/0.1 (+{})", settings.pubmed_email))
        .gzip(true)
        .brotli(true)
        .build()?)
}

#[derive(Debug, Deserialize)]
struct PubmedArticle {
    #[serde(rename = "MedlineCitation")]
    citation: MedlineCitation,
    #[serde(rename = "PubmedData")]
    pubmed_data: Option<PubmedData>,
}

impl PubmedArticle {
    fn into_record(self) -> ArticleRecord {
        let citation = self.citation;
        let article = citation.article;

        let abstract_text = article
            .abstract_section
            .map(|abs| {
                abs.text
                    .iter()
                    .map(|t| t.value.trim())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let journal = article
            .journal
            .and_then(|j| j.title)
            .map(|t| t.value.trim().to_string())
            .unwrap_or_default();

        let authors_list = article.author_list.map(|l| l.authors).unwrap_or_default();
        let affiliation = authors_list
            .iter()
            .flat_map(|a| a.affiliation_info.iter())
            .filter_map(|info| info.affiliation.as_ref())
            .map(|t| t.value.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        let authors = authors_list
            .iter()
            .map(Author::full_name)
            .collect::<Vec<_>>()
            .join("; ");

        let keywords = match (citation.mesh_headings, citation.keyword_lists) {
            (Some(mesh), _) if !mesh.headings.is_empty() => mesh
                .headings
                .iter()
                .map(|h| format!("{}:{}", h.descriptor.ui, h.descriptor.name.trim()))
                .collect::<Vec<_>>()
                .join(";"),
            (_, lists) => lists
                .iter()
                .flat_map(|l| l.keywords.iter())
                .map(|k| k.value.trim())
                .collect::<Vec<_>>()
                .join(";"),
        };

        let (doi, year) = match self.pubmed_data {
            Some(data) => {
                let doi = data
                    .article_ids
                    .map(|list| list.ids)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|id| id.id_type == "doi")
                    .last()
                    .map(|id| id.value.trim().to_string())
                    .unwrap_or_default();
                let year = data
                    .history
                    .map(|h| h.dates)
                    .unwrap_or_default()
                    .into_iter()
                    .find(|d| d.status == "medline")
                    .and_then(|d| d.year)
                    .map(|y| y.value.trim().to_string())
                    .unwrap_or_default();
                (doi, year)
            }
            None => (String::new(), String::new()),
        };

        ArticleRecord {
            pmid: citation.pmid.value.trim().to_string(),
            title: article.title.map(|t| t.value.trim().to_string()).unwrap_or_default(),
            abstract_text,
            journal,
            affiliation,
            authors,
            keywords,
            doi,
            year,
            text: Default::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MedlineCitation {
    #[serde(rename = "PMID")]
    pmid: TextNode,
    #[serde(rename = "Article")]
    article: Article,
    #[serde(rename = "MeshHeadingList")]
    mesh_headings: Option<MeshHeadingList>,
    #[serde(rename = "KeywordList", default)]
    keyword_lists: Vec<KeywordList>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(rename = "ArticleTitle")]
    title: Option<TextNode>,
    #[serde(rename = "Abstract")]
    abstract_section: Option<Abstract>,
    #[serde(rename = "Journal")]
    journal: Option<Journal>,
    #[serde(rename = "AuthorList")]
    author_list: Option<AuthorList>,
}

#[derive(Debug, Deserialize)]
struct Abstract {
    #[serde(rename = "AbstractText", default)]
    text: Vec<TextNode>,
}

#[derive(Debug, Deserialize)]
struct Journal {
    #[serde(rename = "Title")]
    title: Option<TextNode>,
}

#[derive(Debug, Deserialize)]
struct AuthorList {
    #[serde(rename = "Author", default)]
    authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(rename = "ForeName")]
    forename: Option<TextNode>,
    #[serde(rename = "LastName")]
    lastname: Option<TextNode>,
    #[serde(rename = "CollectiveName")]
    collective: Option<TextNode>,
    #[serde(rename = "AffiliationInfo", default)]
    affiliation_info: Vec<AffiliationInfo>,
}

impl Author {
    fn full_name(&self) -> String {
        let first = self.forename.as_ref().map_or("", |n| n.value.trim());
        let last = self.lastname.as_ref().map_or("", |n| n.value.trim());
        let full = format!("{first} {last}").trim().to_string();
        if full.is_empty() {
            self.collective
                .as_ref()
                .map(|n| n.value.trim().to_string())
                .unwrap_or_default()
        } else {
            full
        }
    }
}

#[derive(Debug, Deserialize)]
struct AffiliationInfo {
    #[serde(rename = "Affiliation")]
    affiliation: Option<TextNode>,
}

#[derive(Debug, Deserialize)]
struct MeshHeadingList {
    #[serde(rename = "MeshHeading", default)]
    headings: Vec<MeshHeading>,
}

#[derive(Debug, Deserialize)]
struct MeshHeading {
    #[serde(rename = "DescriptorName")]
    descriptor: DescriptorName,
}

#[derive(Debug, Deserialize)]
struct DescriptorName {
    #[serde(rename = "@UI", default)]
    ui: String,
    #[serde(rename = "$text", default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct KeywordList {
    #[serde(rename = "Keyword", default)]
    keywords: Vec<TextNode>,
}

#[derive(Debug, Deserialize)]
struct PubmedData {
    #[serde(rename = "History")]
    history: Option<History>,
    #[serde(rename = "ArticleIdList")]
    article_ids: Option<ArticleIdList>,
}

#[derive(Debug, Deserialize)]
struct History {
    #[serde(rename = "PubMedPubDate", default)]
    dates: Vec<PubDate>,
}

#[derive(Debug, Deserialize)]
struct PubDate {
    #[serde(rename = "@PubStatus", default)]
    status: String,
    #[serde(rename = "Year")]
    year: Option<TextNode>,
}

#[derive(Debug, Deserialize)]
struct ArticleIdList {
    #[serde(rename = "ArticleId", default)]
    ids: Vec<ArticleId>,
}

#[derive(Debug, Deserialize)]
struct ArticleId {
    #[serde(rename = "@IdType", default)]
    id_type: String,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}
