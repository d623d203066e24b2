//! Phrase text preparation before embedding.

use crate::nlp::{
    matcher::PatternShape,
    tree::{SentenceTree, Span},
    PhraseError,
};

/// Space-joined phrase text with the incidental adjective removed.
///
/// For adjectival matches the token at relative position 1 ("human brain",
/// "mammalian brain") is dropped so it does not dominate similarity.
pub fn normalize(span: Span, tree: &SentenceTree, shape: PatternShape) -> Result<String, PhraseError> {
    let tokens = tree.span(span)?;
    let skip = shape.adjective_offset();
    Ok(tokens
        .iter()
        .enumerate()
        .filter(|(pos, _)| Some(*pos) != skip)
        .map(|(_, token)| token.text.as_str())
        .collect::<Vec<_>>()
        .join(" "))
}
