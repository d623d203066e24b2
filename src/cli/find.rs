//! CLI entry-point for copula pattern matching.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{articles, conllu},
    nlp::{self, entities, matcher::Matcher, MatchedDocument},
};

/// Args for the `find` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CoNLL-U file, or a folder of `.conllu` files.
    #[arg(short, long)]
    pub input: PathBuf,
    /// Entity list (defaults to the configured entity file).
    #[arg(long)]
    pub entities: Option<PathBuf>,
    /// Output JSON path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Override the worker pool size.
    #[arg(short = 'n', long)]
    pub n_processes: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| settings.join_output("matched_articles.json"));
    let entity_path = args.entities.unwrap_or_else(|| settings.entity_file.clone());
    let workers = args.n_processes.unwrap_or(settings.workers);

    let entities = entities::load_entities(&entity_path)?;
    let matcher = Arc::new(Matcher::for_entities(&entities));
    let docs = conllu::read_corpus(&args.input)?;
    let total = docs.len();

    let found = nlp::find_matches(matcher, docs, workers).await?;
    let found: Vec<MatchedDocument> = found.into_iter().collect();
    articles::persist_json(&found, &output)?;
    info!(path = %output.display(), matched = found.len(), total, "saved matched articles");
    Ok(())
}
