//! Data ingestion and persistence layer.

pub mod articles;
pub mod conllu;
pub mod phrases;
pub mod pmc;
pub mod pubmed;
pub mod throttle;
