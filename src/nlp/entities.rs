//! Dictionary lookup for domain entity mentions.

use std::path::Path;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

/// Load entity strings, one per line. Blank lines are skipped.
pub fn load_entities(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read entity list {}", path.display()))?;
    Ok(parse_entities(&raw))
}

pub fn parse_entities(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Case-insensitive whole-word matcher over a fixed entity list.
#[derive(Debug, Clone)]
pub struct EntityDictionary {
    pattern: Option<Regex>,
}

impl EntityDictionary {
    pub fn new<S: AsRef<str>>(entities: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = entities
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }
        // plural suffix stands in for lemmatisation
        let source = format!(r"\b(?:{})(?:s|es)?\b", alternatives.join("|"));
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .context("compile entity pattern")?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn mentions(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(false, |pattern| pattern.is_match(text))
    }
}
