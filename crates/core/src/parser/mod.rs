//! Release title parsing.
//!
//! Parsing is a pure function of the title (and, for the catalog-aware
//! variant, the supplied authors). Titles that carry no usable structure
//! yield `None`, which the decision engine turns into an "unparseable"
//! rejection.

mod title_parser;
mod types;

pub use title_parser::{parse_title, parse_title_with_authors, TitleParser};
pub use types::ParsedBookInfo;
