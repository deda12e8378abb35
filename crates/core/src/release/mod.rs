//! Release records handed over by the indexer/RSS collaborator.

mod types;

pub use types::*;
