//! Natural language processing orchestration layer.

pub mod embeddings;
pub mod entities;
pub mod extend;
pub mod matcher;
pub mod normalize;
pub mod sentences;
pub mod tree;

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::Settings,
    data::conllu::ParsedDocument,
    workers::{self, Unordered},
};

use self::{
    embeddings::Embedder,
    matcher::{Match, Matcher},
    tree::{SentenceTree, Span},
};

/// Malformed inputs to the phrase functions. Short trees or missing children
/// are not errors; these only fire on spans and heads that do not fit the tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhraseError {
    #[error("span {start}..{end} outside sentence of {len} tokens")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
    #[error("match of {len} tokens too short, copula needs {needed}")]
    SpanTooShort { len: usize, needed: usize },
    #[error("token {index} points at head {head} outside sentence of {len} tokens")]
    HeadOutOfBounds { index: usize, head: usize, len: usize },
    #[error("token {index} is its own head")]
    SelfHead { index: usize },
}

/// A match together with its extended span and texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPhrase {
    #[serde(rename = "match")]
    pub matched: Match,
    pub extended: Span,
    /// Surface text of the extended span.
    pub phrase: String,
    /// Text sent to the embedding service.
    pub normalized: String,
}

/// Output unit of the embedding stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub doc_id: String,
    pub label: String,
    pub phrase: String,
    pub embedding: Vec<f32>,
}

/// Sentences of one document that matched at least one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedDocument {
    pub doc_id: String,
    /// One entry per match, so a sentence matching twice appears twice.
    pub matched_sent: Vec<String>,
}

/// Extend and normalise every match in one sentence.
pub fn extract_phrases(matcher: &Matcher, tree: &SentenceTree) -> Result<Vec<ExtractedPhrase>, PhraseError> {
    matcher
        .find(tree)
        .into_iter()
        .map(|matched| {
            let extended = extend::extend(matched.span, tree, matched.shape)?;
            let phrase = tree.span_text(extended)?;
            let normalized = normalize::normalize(extended, tree, matched.shape)?;
            Ok(ExtractedPhrase {
                matched,
                extended,
                phrase,
                normalized,
            })
        })
        .collect()
}

/// Matched sentence texts of one document, or `None` without matches.
pub fn match_document(matcher: &Matcher, doc: &ParsedDocument) -> Option<MatchedDocument> {
    let matched_sent: Vec<String> = doc
        .sentences
        .iter()
        .flat_map(|tree| {
            let text = tree.text().to_string();
            matcher.find(tree).into_iter().map(move |_| text.clone())
        })
        .collect();
    if matched_sent.is_empty() {
        return None;
    }
    Some(MatchedDocument {
        doc_id: doc.doc_id.clone(),
        matched_sent,
    })
}

/// Run document matching on the worker pool. Result order is unspecified.
pub async fn find_matches(
    matcher: Arc<Matcher>,
    docs: Vec<ParsedDocument>,
    workers: usize,
) -> Result<Unordered<MatchedDocument>> {
    let found = workers::map_unordered(docs, workers, move |doc| match_document(&matcher, &doc)).await?;
    Ok(found.into_iter().flatten().collect())
}

/// Shared, read-only services for the embedding stage.
#[derive(Clone)]
pub struct Pipeline {
    matcher: Arc<Matcher>,
    embedder: Arc<dyn Embedder>,
}

impl Pipeline {
    pub fn new(matcher: Arc<Matcher>, embedder: Arc<dyn Embedder>) -> Self {
        Self { matcher, embedder }
    }

    /// Build the matcher for `entities` and load the configured embedder.
    pub fn initialise(settings: &Settings, entities: &[String]) -> Result<Self> {
        ensure!(!entities.is_empty(), "entity list is empty");
        let matcher = Arc::new(Matcher::for_entities(entities));
        let embedder = load_embedder(settings)?;
        info!(
            rules = matcher.len(),
            dimension = embedder.dimension(),
            "pipeline initialised"
        );
        Ok(Self::new(matcher, embedder))
    }

    pub fn matcher(&self) -> &Arc<Matcher> {
        &self.matcher
    }

    pub fn extract_sentence(&self, tree: &SentenceTree) -> Result<Vec<ExtractedPhrase>, PhraseError> {
        extract_phrases(&self.matcher, tree)
    }

    /// One record per match, phrases of the document embedded in one call.
    pub fn embed_document(&self, doc: &ParsedDocument) -> Result<Vec<PhraseRecord>> {
        let mut phrases = Vec::new();
        for tree in &doc.sentences {
            let extracted = self
                .extract_sentence(tree)
                .with_context(|| format!("extract phrases in {:?}", tree.text()))?;
            phrases.extend(extracted);
        }
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = phrases.iter().map(|p| p.normalized.clone()).collect();
        let vectors = self.embedder.embed(&texts)?;
        ensure!(
            vectors.len() == phrases.len(),
            "embedder returned {} vectors for {} phrases",
            vectors.len(),
            phrases.len()
        );
        debug!(doc_id = %doc.doc_id, phrases = phrases.len(), "embedded document");

        Ok(phrases
            .into_iter()
            .zip(vectors)
            .map(|(phrase, embedding)| PhraseRecord {
                doc_id: doc.doc_id.clone(),
                label: phrase.matched.label,
                phrase: phrase.phrase,
                embedding,
            })
            .collect())
    }

    /// Embed documents in input order into one flat sequence.
    pub fn embed_corpus(&self, docs: &[ParsedDocument]) -> Result<Vec<PhraseRecord>> {
        let mut records = Vec::new();
        for (idx, doc) in docs.iter().enumerate() {
            if idx % 100 == 0 {
                info!(processed = idx, total = docs.len(), "embedding documents");
            }
            records.extend(self.embed_document(doc)?);
        }
        Ok(records)
    }

    pub fn shutdown(self) {
        info!(rules = self.matcher.len(), "pipeline shut down");
    }
}

#[cfg(feature = "embeddings")]
fn load_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let embedder = embeddings::FastEmbedder::load(&settings.embedding_model)?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "embeddings"))]
fn load_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    tracing::warn!(
        model = %settings.embedding_model,
        "embeddings feature disabled; using hashing embedder"
    );
    Ok(Arc::new(embeddings::HashingEmbedder::new(settings.embedding_dim)))
}
