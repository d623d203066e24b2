//! Command-line interface wiring for phrase-miner.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod embed;
pub mod fetch;
pub mod filter;
pub mod find;
pub mod sentences;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Copula phrase miner for PubMed literature", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Fetch(args) => fetch::run(args, settings).await,
            Commands::Filter(args) => filter::run(args, settings).await,
            Commands::Sentences(args) => sentences::run(args, settings).await,
            Commands::Find(args) => find::run(args, settings).await,
            Commands::Embed(args) => embed::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download and parse PubMed metadata for a PMID list.
    Fetch(fetch::Args),
    /// Keep articles whose sections mention an entity.
    Filter(filter::Args),
    /// Export sentences for the external dependency parser.
    Sentences(sentences::Args),
    /// Find copula pattern matches in a parsed CoNLL-U corpus.
    Find(find::Args),
    /// Extend, normalise and embed matched phrases.
    Embed(embed::Args),
}
