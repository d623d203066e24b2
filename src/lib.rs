//! Mining copula phrases ("the brain is a ...") from PubMed literature.
//!
//! Stages: fetch article metadata, filter by entity mentions, export sentences
//! for an external dependency parser, match copula patterns over the parsed
//! trees, then extend, normalise and embed the matched phrases.

pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod nlp;
pub mod workers;
