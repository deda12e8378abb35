//! Custom formats: user-defined release properties that adjust ranking.

mod evaluator;
mod types;

pub use evaluator::{CustomFormatEvaluator, FormatEvaluation, FormatSubject};
pub use types::{CustomFormat, CustomFormatError, CustomFormatSpec, FormatCondition};
