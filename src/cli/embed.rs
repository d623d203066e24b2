//! CLI entry-point for embedding matched phrases.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{conllu, phrases},
    nlp::{entities, Pipeline},
};

/// Args for the `embed` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CoNLL-U file, or a folder of `.conllu` files.
    #[arg(short, long)]
    pub input: PathBuf,
    /// Entity list (defaults to the configured entity file).
    #[arg(long)]
    pub entities: Option<PathBuf>,
    /// Output Parquet path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| settings.join_output("phrase_embeddings.parquet"));
    let entity_path = args
        .entities
        .clone()
        .unwrap_or_else(|| settings.entity_file.clone());

    let entities = entities::load_entities(&entity_path)?;
    let docs = conllu::read_corpus(&args.input)?;
    let pipeline = Pipeline::initialise(&settings, &entities)?;

    let worker = pipeline.clone();
    let records = tokio::task::spawn_blocking(move || worker.embed_corpus(&docs)).await??;
    phrases::persist_phrases(&records, &output)?;
    info!(path = %output.display(), phrases = records.len(), "saved phrase embeddings");

    pipeline.shutdown();
    Ok(())
}
