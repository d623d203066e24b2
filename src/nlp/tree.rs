//! Dependency tree model consumed from the external parser.

use serde::{Deserialize, Serialize};

use crate::nlp::PhraseError;

/// Contiguous token range `[start, end)` within one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single parsed token. Children are stored as indices into the owning tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub text: String,
    pub lower: String,
    pub pos: String,
    pub dep: String,
    pub head: Option<usize>,
    pub lefts: Vec<usize>,
    pub rights: Vec<usize>,
}

/// Raw parser row before child links are derived.
#[derive(Debug, Clone)]
pub struct TokenRow {
    pub text: String,
    pub pos: String,
    pub head: Option<usize>,
    pub dep: String,
}

impl TokenRow {
    pub fn new(text: &str, pos: &str, head: Option<usize>, dep: &str) -> Self {
        Self {
            text: text.to_string(),
            pos: pos.to_string(),
            head,
            dep: dep.to_string(),
        }
    }
}

/// One parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceTree {
    text: String,
    tokens: Vec<Token>,
}

impl SentenceTree {
    /// Build a tree from parser rows, deriving `lefts`/`rights` from heads.
    ///
    /// When `text` is `None` the sentence text is the forms joined by spaces.
    pub fn from_rows(rows: Vec<TokenRow>, text: Option<String>) -> Result<Self, PhraseError> {
        let len = rows.len();
        for (index, row) in rows.iter().enumerate() {
            if let Some(head) = row.head {
                if head >= len {
                    return Err(PhraseError::HeadOutOfBounds { index, head, len });
                }
                if head == index {
                    return Err(PhraseError::SelfHead { index });
                }
            }
        }

        let mut tokens: Vec<Token> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| Token {
                index,
                lower: row.text.to_lowercase(),
                text: row.text,
                pos: row.pos,
                dep: row.dep,
                head: row.head,
                lefts: Vec::new(),
                rights: Vec::new(),
            })
            .collect();

        // iterating in index order keeps both child lists sorted
        for index in 0..len {
            if let Some(head) = tokens[index].head {
                if index < head {
                    tokens[head].lefts.push(index);
                } else {
                    tokens[head].rights.push(index);
                }
            }
        }

        let text = text.unwrap_or_else(|| {
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        });
        Ok(Self { text, tokens })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Head of `token`; the root is its own head.
    pub fn head_of<'a>(&'a self, token: &'a Token) -> &'a Token {
        token
            .head
            .and_then(|head| self.tokens.get(head))
            .unwrap_or(token)
    }

    pub fn span(&self, span: Span) -> Result<&[Token], PhraseError> {
        if span.start > span.end || span.end > self.tokens.len() {
            return Err(PhraseError::SpanOutOfBounds {
                start: span.start,
                end: span.end,
                len: self.tokens.len(),
            });
        }
        Ok(&self.tokens[span.start..span.end])
    }

    /// Surface forms of `span` joined by single spaces.
    pub fn span_text(&self, span: Span) -> Result<String, PhraseError> {
        Ok(self
            .span(span)?
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }
}
