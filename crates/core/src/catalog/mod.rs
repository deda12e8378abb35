//! Catalog snapshot consumed by the decision pipeline.
//!
//! Authors, books, files already on disk, import history and the blocklist
//! all arrive from the catalog collaborator as plain data.

mod types;

pub use types::*;
