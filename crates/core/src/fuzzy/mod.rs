//! Fuzzy matching.
//!
//! Edit-distance and similarity primitives, and the catalog resolver built
//! on top of them.

mod distance;
mod resolver;

pub use distance::{bounded_edit_distance, fuzzy_match, levenshtein_distance};
pub use resolver::{similarity_within, CatalogResolver, MatchStatus, Resolution};
