//! Search criteria for indexer queries.

mod criteria;

pub use criteria::{clean_query_title, SearchCriteria};
