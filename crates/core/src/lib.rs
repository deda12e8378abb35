//! Release parsing, catalog matching and download decisions for a book
//! library manager.
//!
//! The crate is pure: callers hand in an immutable [`DecisionSnapshot`]
//! (catalog, profiles, blocklist, library state) plus indexer releases and
//! get ranked [`DownloadDecision`]s back.

pub mod catalog;
pub mod config;
pub mod custom_format;
pub mod decision;
pub mod fuzzy;
pub mod metrics;
pub mod names;
pub mod parser;
pub mod quality;
pub mod release;
pub mod search;
pub mod testing;

pub use catalog::{Author, BlocklistEntry, Book, BookFile, CatalogSnapshot, ImportedRelease};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use custom_format::{CustomFormat, CustomFormatError, CustomFormatEvaluator, CustomFormatSpec, FormatCondition};
pub use decision::{
    select_best, Candidate, Decision, DecisionEngine, DecisionMaker, DecisionSnapshot, DecisionSpecification,
    DelayProfile, DownloadDecision, Rejection, RejectionReason, SpecificationFault,
};
pub use fuzzy::{fuzzy_match, levenshtein_distance, CatalogResolver, MatchStatus};
pub use names::{clean_name, strip_brackets, to_last_first};
pub use parser::{parse_title, parse_title_with_authors, ParsedBookInfo, TitleParser};
pub use quality::{parse_quality, Quality, QualityProfile};
pub use release::{Protocol, ReleaseInfo};
pub use search::{clean_query_title, SearchCriteria};
