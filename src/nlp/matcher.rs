//! Token-sequence matcher for copula constructions ("the X is a ...").

use serde::{Deserialize, Serialize};

use crate::nlp::tree::{SentenceTree, Span, Token};

const COPULAS: &[&str] = &["is", "are"];

/// Whether an adjective sits between the determiner and the head noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternShape {
    Bare,
    Adjectival,
}

impl PatternShape {
    /// Position of the copula verb relative to the start of the match.
    pub fn copula_offset(self) -> usize {
        match self {
            Self::Bare => 2,
            Self::Adjectival => 3,
        }
    }

    /// Relative position of the adjective, if the shape carries one.
    pub fn adjective_offset(self) -> Option<usize> {
        match self {
            Self::Bare => None,
            Self::Adjectival => Some(1),
        }
    }
}

/// Constraints on a single token. Unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct TokenPattern {
    pub pos: Option<String>,
    pub lower: Option<Vec<String>>,
    pub dep: Option<String>,
}

impl TokenPattern {
    pub fn pos(pos: &str) -> Self {
        Self {
            pos: Some(pos.to_string()),
            ..Self::default()
        }
    }

    pub fn lower_in(words: &[&str]) -> Self {
        Self {
            lower: Some(words.iter().map(|w| w.to_lowercase()).collect()),
            ..Self::default()
        }
    }

    pub fn with_dep(mut self, dep: &str) -> Self {
        self.dep = Some(dep.to_string());
        self
    }

    pub fn matches(&self, token: &Token) -> bool {
        self.pos.as_deref().map_or(true, |pos| token.pos == pos)
            && self
                .lower
                .as_ref()
                .map_or(true, |words| words.iter().any(|w| *w == token.lower))
            && self.dep.as_deref().map_or(true, |dep| token.dep == dep)
    }
}

/// Named sequence of token constraints.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub label: String,
    pub shape: PatternShape,
    pub tokens: Vec<TokenPattern>,
}

/// A rule firing on a contiguous span of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub label: String,
    pub shape: PatternShape,
    pub span: Span,
}

/// Ordered rule set; read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    rules: Vec<PatternRule>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bare and adjectival copula rules for every entity.
    pub fn for_entities<S: AsRef<str>>(entities: &[S]) -> Self {
        let mut matcher = Self::new();
        for entity in entities {
            let entity = entity.as_ref().trim().to_lowercase();
            if entity.is_empty() {
                continue;
            }
            matcher.add(PatternRule {
                label: entity.clone(),
                shape: PatternShape::Bare,
                tokens: vec![
                    TokenPattern::pos("DET"),
                    TokenPattern::lower_in(&[entity.as_str()]).with_dep("nsubj"),
                    TokenPattern::lower_in(COPULAS).with_dep("cop"),
                    TokenPattern::pos("DET"),
                ],
            });
            matcher.add(PatternRule {
                label: format!("{entity}_adj"),
                shape: PatternShape::Adjectival,
                tokens: vec![
                    TokenPattern::pos("DET"),
                    TokenPattern::pos("ADJ"),
                    TokenPattern::lower_in(&[entity.as_str()]).with_dep("nsubj"),
                    TokenPattern::lower_in(COPULAS).with_dep("cop"),
                    TokenPattern::pos("DET"),
                ],
            });
        }
        matcher
    }

    pub fn add(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All matches, ordered by start index then by rule registration order.
    pub fn find(&self, tree: &SentenceTree) -> Vec<Match> {
        let tokens = tree.tokens();
        let mut found = Vec::new();
        for start in 0..tokens.len() {
            for rule in &self.rules {
                let end = start + rule.tokens.len();
                if rule.tokens.is_empty() || end > tokens.len() {
                    continue;
                }
                let hit = rule
                    .tokens
                    .iter()
                    .zip(&tokens[start..end])
                    .all(|(pattern, token)| pattern.matches(token));
                if hit {
                    found.push(Match {
                        label: rule.label.clone(),
                        shape: rule.shape,
                        span: Span::new(start, end),
                    });
                }
            }
        }
        found
    }
}
