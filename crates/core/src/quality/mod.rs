//! Release quality: format detection and quality profiles.

mod parser;
mod profile;
mod types;

pub use parser::parse_quality;
pub use profile::{ProfileFormatItem, QualityProfile, QualityProfileItem, QualityRank};
pub use types::Quality;
