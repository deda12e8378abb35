//! Download decisions.
//!
//! A [`DecisionMaker`] turns a batch of indexer releases into ranked
//! [`DownloadDecision`]s:
//!
//! ```text
//! release ─▶ parse ─▶ resolve ─▶ specification chain ─▶ custom formats ─▶ rank
//! ```
//!
//! Every release gets exactly one decision. Specifications that fault do not
//! reject; they leave a diagnostic on the decision instead.

mod comparer;
mod engine;
mod maker;
pub mod specs;
mod types;

pub use comparer::{compare, compare_decisions, prioritize, select_best};
pub use engine::{DecisionEngine, DecisionSpecification};
pub use maker::DecisionMaker;
pub use types::{
    Candidate, Decision, DecisionError, DecisionSnapshot, DelayProfile, Diagnostics, DownloadDecision,
    EvaluationContext, Rejection, RejectionReason, RejectionType, Score, SpecOutcome, SpecificationFault,
};
