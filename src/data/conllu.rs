//! CoNLL-U reader for dependency trees produced by the external parser.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::nlp::tree::{SentenceTree, TokenRow};

const COLUMNS: usize = 10;

#[derive(Debug, Error)]
pub enum ConllError {
    #[error("line {line}: expected 10 tab-separated columns, found {found}")]
    Columns { line: usize, found: usize },
    #[error("line {line}: invalid {field} {value:?}")]
    Field {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("sentence ending at line {line}: {reason}")]
    Tree { line: usize, reason: String },
}

/// Sentences of one document in input order.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub doc_id: String,
    pub sentences: Vec<SentenceTree>,
}

/// Parse a CoNLL-U stream. `# newdoc id = X` opens a new document.
///
/// The first malformed line fails the whole stream.
pub fn parse_conllu(input: &str) -> Result<Vec<ParsedDocument>, ConllError> {
    let mut parser = DocumentParser::default();
    let mut last_line = 0;
    for (idx, raw) in input.lines().enumerate() {
        last_line = idx + 1;
        parser.line(raw, last_line)?;
    }
    parser.flush_sentence(last_line)?;

    debug!(documents = parser.documents.len(), "parsed conllu");
    Ok(parser.documents)
}

/// Parse a CoNLL-U stream, dropping every document that holds a malformed
/// line or tree. Dropped documents are logged and their errors returned.
pub fn parse_conllu_skipping(input: &str) -> (Vec<ParsedDocument>, Vec<ConllError>) {
    let mut parser = DocumentParser::default();
    let mut skipped = Vec::new();
    let mut last_line = 0;
    for (idx, raw) in input.lines().enumerate() {
        last_line = idx + 1;
        let line = raw.trim_end_matches('\r');
        if newdoc_id(line).is_some() {
            // the previous document closes before this one opens
            if let Err(err) = parser.flush_sentence(last_line) {
                parser.discard_document(&err);
                skipped.push(err);
            }
        } else if parser.skipping {
            continue;
        }
        if let Err(err) = parser.line(raw, last_line) {
            parser.discard_document(&err);
            skipped.push(err);
        }
    }
    if let Err(err) = parser.flush_sentence(last_line) {
        parser.discard_document(&err);
        skipped.push(err);
    }

    debug!(
        documents = parser.documents.len(),
        skipped = skipped.len(),
        "parsed conllu"
    );
    (parser.documents, skipped)
}

#[derive(Default)]
struct DocumentParser {
    documents: Vec<ParsedDocument>,
    rows: Vec<TokenRow>,
    text: Option<String>,
    skipping: bool,
}

impl DocumentParser {
    fn line(&mut self, raw: &str, line_no: usize) -> Result<(), ConllError> {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            return self.flush_sentence(line_no);
        }
        if let Some(id) = newdoc_id(line) {
            // a failing sentence here still belongs to the previous document
            self.flush_sentence(line_no)?;
            self.skipping = false;
            self.documents.push(ParsedDocument {
                doc_id: id.to_string(),
                sentences: Vec::new(),
            });
            return Ok(());
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(sentence) = comment_value(comment.trim(), "text") {
                self.text = Some(sentence.to_string());
            }
            return Ok(());
        }
        if let Some(row) = parse_row(line, line_no, self.rows.len() + 1)? {
            self.rows.push(row);
        }
        Ok(())
    }

    fn flush_sentence(&mut self, line: usize) -> Result<(), ConllError> {
        if self.rows.is_empty() {
            self.text = None;
            return Ok(());
        }
        if self.documents.is_empty() {
            self.documents.push(ParsedDocument {
                doc_id: String::new(),
                sentences: Vec::new(),
            });
        }
        let tree = SentenceTree::from_rows(std::mem::take(&mut self.rows), self.text.take())
            .map_err(|err| ConllError::Tree {
                line,
                reason: err.to_string(),
            })?;
        if let Some(doc) = self.documents.last_mut() {
            doc.sentences.push(tree);
        }
        Ok(())
    }

    /// Drop the open document and ignore lines up to the next `newdoc`.
    fn discard_document(&mut self, err: &ConllError) {
        self.rows.clear();
        self.text = None;
        self.skipping = true;
        let doc_id = self.documents.pop().map(|doc| doc.doc_id).unwrap_or_default();
        warn!(%doc_id, %err, "skipping malformed document");
    }
}

fn newdoc_id(line: &str) -> Option<&str> {
    let comment = line.strip_prefix('#')?;
    comment_value(comment.trim(), "newdoc id")
}

fn comment_value<'a>(comment: &'a str, key: &str) -> Option<&'a str> {
    let rest = comment.strip_prefix(key)?.trim_start();
    rest.strip_prefix('=').map(str::trim)
}

fn parse_row(line: &str, line_no: usize, expected_id: usize) -> Result<Option<TokenRow>, ConllError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != COLUMNS {
        return Err(ConllError::Columns {
            line: line_no,
            found: fields.len(),
        });
    }
    let id = fields[0];
    // multi-word token ranges and empty nodes carry no tree position
    if id.contains('-') || id.contains('.') {
        return Ok(None);
    }
    // heads index by position, so ids must run 1, 2, 3, ...
    if !matches!(id.parse::<usize>(), Ok(n) if n == expected_id) {
        return Err(ConllError::Field {
            line: line_no,
            field: "ID",
            value: id.to_string(),
        });
    }
    let head: usize = fields[6].parse().map_err(|_| ConllError::Field {
        line: line_no,
        field: "HEAD",
        value: fields[6].to_string(),
    })?;
    Ok(Some(TokenRow::new(
        fields[1],
        fields[3],
        head.checked_sub(1),
        fields[7],
    )))
}

/// Read one `.conllu` file, or every `.conllu` file below a directory.
/// Malformed documents are skipped with a warning; IO failures are errors.
pub fn read_corpus(path: &Path) -> Result<Vec<ParsedDocument>> {
    ensure!(path.exists(), "corpus {} does not exist", path.display());
    let mut documents = Vec::new();
    for file in corpus_files(path) {
        let raw = std::fs::read_to_string(&file)
            .with_context(|| format!("read {}", file.display()))?;
        let (parsed, skipped) = parse_conllu_skipping(&raw);
        if !skipped.is_empty() {
            warn!(file = %file.display(), skipped = skipped.len(), "dropped malformed documents");
        }
        documents.extend(parsed);
    }
    Ok(documents)
}

fn corpus_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("conllu"))
        .collect();
    files.sort();
    files
}
