//! PubMed Central full-text reader (JATS `.xml` articles).

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use quick_xml::{
    events::{attributes::AttrError, BytesStart, BytesText, Event},
    Reader,
};
use thiserror::Error;
use walkdir::WalkDir;

use crate::{
    data::articles::{self, ArticleRecord},
    nlp::entities::EntityDictionary,
};

/// Section name given to the abstract when it joins the paragraphs.
pub const ABSTRACT_SECTION: &str = "abstract";

/// Elements whose text is left out of the surrounding field.
const MUTED: &[&[u8]] = &[b"label", b"xref"];

#[derive(Debug, Error)]
pub enum PmcError {
    #[error("malformed xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("document ended inside <{0}>")]
    Truncated(String),
    #[error("no <article> element")]
    NotAnArticle,
}

/// One body paragraph with the title of its innermost titled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub section: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FullTextArticle {
    pub record: ArticleRecord,
    pub paragraphs: Vec<Paragraph>,
}

impl FullTextArticle {
    /// Paragraphs as `(section, text)` in document order, then the abstract.
    pub fn sections(&self) -> Vec<(String, String)> {
        self.paragraphs
            .iter()
            .map(|p| (p.section.clone(), p.text.clone()))
            .chain(std::iter::once((
                ABSTRACT_SECTION.to_string(),
                self.record.abstract_text.clone(),
            )))
            .collect()
    }
}

/// Filter a full-text article paragraph by paragraph; see
/// [`articles::filter_sections`].
pub fn filter_full_text(article: FullTextArticle, dictionary: &EntityDictionary) -> Option<ArticleRecord> {
    let sections = article.sections();
    articles::filter_sections(article.record, sections, dictionary)
}

/// `*.xml` files directly inside `folder`, sorted.
pub fn pmc_files(folder: &Path) -> Result<Vec<PathBuf>> {
    ensure!(folder.is_dir(), "pmc folder {} is not a directory", folder.display());
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("xml"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn read_pmc_article(path: &Path) -> Result<FullTextArticle> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_pmc_article(&raw).with_context(|| format!("parse {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Abstract,
    Journal,
    Pmid,
    Doi,
    Surname,
    GivenNames,
    Affiliation,
    Keyword,
    Year,
    SectionTitle,
    Paragraph,
}

struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct Builder {
    record: ArticleRecord,
    paragraphs: Vec<Paragraph>,
    /// Titles of the open `<sec>` elements, outermost first.
    sections: Vec<String>,
    authors: Vec<String>,
    affiliations: Vec<String>,
    keywords: Vec<String>,
    surname: String,
    given_names: String,
}

impl Builder {
    fn finish_field(&mut self, field: Field, raw: &str) {
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        match field {
            Field::Title => set_once(&mut self.record.title, text),
            Field::Abstract => set_once(&mut self.record.abstract_text, text),
            Field::Journal => set_once(&mut self.record.journal, text),
            Field::Pmid => set_once(&mut self.record.pmid, text),
            Field::Doi => set_once(&mut self.record.doi, text),
            Field::Year => set_once(&mut self.record.year, text),
            Field::Surname => self.surname = text,
            Field::GivenNames => self.given_names = text,
            Field::Affiliation if !text.is_empty() => self.affiliations.push(text),
            Field::Keyword if !text.is_empty() => self.keywords.push(text),
            Field::SectionTitle => {
                if let Some(title) = self.sections.last_mut() {
                    *title = text;
                }
            }
            Field::Paragraph if !text.is_empty() => {
                let section = self
                    .sections
                    .iter()
                    .rev()
                    .find(|t| !t.is_empty())
                    .cloned()
                    .unwrap_or_default();
                self.paragraphs.push(Paragraph { section, text });
            }
            _ => {}
        }
    }

    fn finish_author(&mut self) {
        let given = std::mem::take(&mut self.given_names);
        let surname = std::mem::take(&mut self.surname);
        let name = format!("{given} {surname}").trim().to_string();
        if !name.is_empty() {
            self.authors.push(name);
        }
    }

    fn build(mut self) -> FullTextArticle {
        self.record.authors = self.authors.join("; ");
        self.record.affiliation = self.affiliations.join("; ");
        self.record.keywords = self.keywords.join(";");
        FullTextArticle {
            record: self.record,
            paragraphs: self.paragraphs,
        }
    }
}

fn set_once(slot: &mut String, value: String) {
    if slot.is_empty() {
        *slot = value;
    }
}

/// Parse one JATS article into metadata and body paragraphs.
pub fn parse_pmc_article(xml: &str) -> Result<FullTextArticle, PmcError> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut muted: Option<usize> = None;
    let mut builder = Builder::default();
    let mut seen_article = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = start.name().as_ref().to_vec();
                let field = if capture.is_none() {
                    field_for(&path, &start)?
                } else {
                    None
                };
                seen_article |= name.as_slice() == b"article";
                if name.as_slice() == b"sec" && within(&path, b"body") {
                    builder.sections.push(String::new());
                }
                path.push(name);
                if let Some(field) = field {
                    capture = Some(Capture {
                        field,
                        depth: path.len(),
                        text: String::new(),
                    });
                } else if capture.is_some()
                    && muted.is_none()
                    && path.last().is_some_and(|n| MUTED.contains(&n.as_slice()))
                {
                    muted = Some(path.len());
                }
            }
            Event::End(_) => {
                let depth = path.len();
                if muted == Some(depth) {
                    muted = None;
                }
                if capture.as_ref().is_some_and(|c| c.depth == depth) {
                    if let Some(done) = capture.take() {
                        builder.finish_field(done.field, &done.text);
                    }
                }
                match path.pop().as_deref() {
                    Some(b"contrib") => builder.finish_author(),
                    Some(b"sec") if within(&path, b"body") => {
                        builder.sections.pop();
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if let (Some(capture), None) = (capture.as_mut(), muted) {
                    capture.text.push_str(&text_of(&text));
                }
            }
            Event::CData(data) => {
                if let (Some(capture), None) = (capture.as_mut(), muted) {
                    capture.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = path.last() {
        return Err(PmcError::Truncated(String::from_utf8_lossy(open).into_owned()));
    }
    if !seen_article {
        return Err(PmcError::NotAnArticle);
    }
    Ok(builder.build())
}

/// Field started by `start`, given the path of its ancestors.
fn field_for(path: &[Vec<u8>], start: &BytesStart) -> Result<Option<Field>, PmcError> {
    let parent = path.last().map(Vec::as_slice);
    let field = match start.name().as_ref() {
        b"article-title" if parent == Some(&b"title-group"[..]) => Some(Field::Title),
        b"abstract" if within(path, b"article-meta") => Some(Field::Abstract),
        b"journal-title" => Some(Field::Journal),
        b"article-id" => match start.try_get_attribute("pub-id-type")? {
            Some(attr) => match attr.unescape_value()?.as_ref() {
                "pmid" => Some(Field::Pmid),
                "doi" => Some(Field::Doi),
                _ => None,
            },
            None => None,
        },
        b"surname" if within(path, b"contrib") => Some(Field::Surname),
        b"given-names" if within(path, b"contrib") => Some(Field::GivenNames),
        b"aff" if within(path, b"article-meta") => Some(Field::Affiliation),
        b"kwd" => Some(Field::Keyword),
        b"year" if parent == Some(&b"pub-date"[..]) => Some(Field::Year),
        b"title" if parent == Some(&b"sec"[..]) && within(path, b"body") => Some(Field::SectionTitle),
        b"p" if within(path, b"body") => Some(Field::Paragraph),
        _ => None,
    };
    Ok(field)
}

fn within(path: &[Vec<u8>], element: &[u8]) -> bool {
    path.iter().any(|name| name.as_slice() == element)
}

/// Unescaped text; unknown entities fall back to the raw bytes.
fn text_of(text: &BytesText) -> String {
    match text.unescape() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}
