//! Rightward dependency walk that recovers the descriptive phrase after a copula.
//!
//! The matcher only captures "the X is a"; the content of the predicate hangs off
//! the copula's head through nominal modifiers, coordination or relative clauses.
//! Rules are tried in that priority order at every step.

use crate::nlp::{
    matcher::PatternShape,
    tree::{SentenceTree, Span, Token},
    PhraseError,
};

const NOMINAL_MODIFIER: &str = "nmod";
const CONJUNCT: &str = "conj";
const RELATIVE_CLAUSE: &str = "acl:relcl";
const DIRECT_OBJECT: &[&str] = &["dobj", "obj"];

/// Compute the extended phrase span for a match.
///
/// `start` is kept; `end` begins just past the copula's head and only ever moves
/// right. Absent children end the walk early and are not errors.
pub fn extend(span: Span, tree: &SentenceTree, shape: PatternShape) -> Result<Span, PhraseError> {
    let matched = tree.span(span)?;
    let offset = shape.copula_offset();
    let copula = matched.get(offset).ok_or(PhraseError::SpanTooShort {
        len: matched.len(),
        needed: offset + 1,
    })?;

    let head = tree.head_of(copula);
    let mut end = head.index + 1;
    let mut rights: &[usize] = &head.rights;

    while !rights.is_empty() {
        if let Some(child) = first_child(tree, rights, |dep| dep == NOMINAL_MODIFIER) {
            end = child.index + 1;
            rights = &child.rights;
        } else if let Some(conj) = first_child(tree, rights, |dep| dep == CONJUNCT) {
            if !conj.rights.is_empty() {
                end = conj.index + 1;
                rights = &conj.rights;
                continue;
            }
            if coordinates_with_head(tree, conj, head) {
                end = conj.index + 1;
            }
            break;
        } else if let Some(clause) = first_child(tree, rights, |dep| dep == RELATIVE_CLAUSE) {
            end = clause.index + 1;
            rights = &clause.rights;
            if let Some(object) = first_child(tree, rights, |dep| DIRECT_OBJECT.contains(&dep)) {
                end = object.index + 1;
                rights = &object.rights;
            }
        } else {
            break;
        }
    }

    Ok(Span::new(span.start, end.max(span.end)))
}

fn first_child<'t>(
    tree: &'t SentenceTree,
    children: &[usize],
    accept: impl Fn(&str) -> bool,
) -> Option<&'t Token> {
    children
        .iter()
        .filter_map(|&idx| tree.get(idx))
        .find(|token| accept(token.dep.as_str()))
}

/// Tie-break for a childless conjunct: the token right after it must have
/// `head` as its first left child. A conjunct closing the sentence qualifies
/// when it hangs directly off `head`.
fn coordinates_with_head(tree: &SentenceTree, conj: &Token, head: &Token) -> bool {
    match tree.get(conj.index + 1) {
        Some(next) => next.lefts.first() == Some(&head.index),
        None => conj.head == Some(head.index),
    }
}
