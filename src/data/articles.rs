//! Article records, entity filtering and sentence export.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::nlp::{entities::EntityDictionary, sentences::split_sentences};

/// Sections at or above this many characters are skipped by the entity filter.
pub const MAX_SECTION_CHARS: usize = 1_000_000;

/// Flattened PubMed article metadata. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub pmid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub doi: String,
    #[serde(default)]
    pub year: String,
    /// Section name to text, filled by the entity filter.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub text: IndexMap<String, String>,
}

impl ArticleRecord {
    /// DOI when present, otherwise `pmid:<PMID>`.
    pub fn doc_id(&self) -> String {
        if self.doi.is_empty() {
            format!("pmid:{}", self.pmid)
        } else {
            self.doi.clone()
        }
    }

    /// Full-text sections when present, otherwise the abstract alone.
    pub fn sections(&self) -> IndexMap<String, String> {
        if self.text.is_empty() {
            let mut sections = IndexMap::new();
            sections.insert("abstract".to_string(), self.abstract_text.clone());
            sections
        } else {
            self.text.clone()
        }
    }
}

/// Keep `article` only if a section mentions an entity; the mentioning
/// sections become its `text`.
pub fn filter_article(article: ArticleRecord, dictionary: &EntityDictionary) -> Option<ArticleRecord> {
    let sections = article.sections();
    filter_sections(article, sections, dictionary)
}

/// Keep `article` if any `(section, text)` pair mentions an entity.
///
/// Pairs may repeat a section name (one per paragraph); mentioning texts of
/// the same section are joined with a space in input order.
pub fn filter_sections<I>(
    mut article: ArticleRecord,
    sections: I,
    dictionary: &EntityDictionary,
) -> Option<ArticleRecord>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut kept: IndexMap<String, String> = IndexMap::new();
    for (section, text) in sections {
        if text.chars().count() >= MAX_SECTION_CHARS || !dictionary.mentions(&text) {
            continue;
        }
        match kept.get_mut(&section) {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&text);
            }
            None => {
                kept.insert(section, text);
            }
        }
    }
    if kept.is_empty() {
        return None;
    }
    article.text = kept;
    Some(article)
}

/// Read a PMID list, one per line. Values such as `123.0` are accepted.
pub fn load_pmids(path: &Path) -> Result<Vec<u64>> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("read pmid list {}", path.display()))?;
    parse_pmids(&raw)
}

pub fn parse_pmids(raw: &str) -> Result<Vec<u64>> {
    raw.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| {
            line.parse::<u64>()
                .ok()
                .or_else(|| {
                    line.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && *v >= 0.0)
                        .map(|v| v.trunc() as u64)
                })
                .with_context(|| format!("line {line_no}: invalid pmid {line:?}"))
        })
        .collect()
}

pub fn read_articles(path: &Path) -> Result<Vec<ArticleRecord>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let articles: Vec<ArticleRecord> = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("decode articles from {}", path.display()))?;
    info!(path = %path.display(), count = articles.len(), "loaded articles");
    Ok(articles)
}

/// Write any serialisable collection as pretty JSON.
pub fn persist_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("create {path:?}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Sentence file for the external parser: a `# newdoc id` line per article
/// followed by one sentence per line.
pub fn write_sentences(articles: &[ArticleRecord], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("create {path:?}"))?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;
    for article in articles {
        writeln!(writer, "# newdoc id = {}", article.doc_id())?;
        for text in article.sections().values() {
            for sentence in split_sentences(text) {
                writeln!(writer, "{sentence}")?;
                count += 1;
            }
        }
    }
    writer.flush()?;
    info!(path = %path.display(), sentences = count, "wrote sentences");
    Ok(count)
}
