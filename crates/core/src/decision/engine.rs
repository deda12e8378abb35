//! Specification chain.
//!
//! Specifications run in a fixed order and the first rejection ends
//! evaluation. A specification that faults is treated as a non-match: the
//! fault is flagged on the decision and the chain moves on.

use tracing::{debug, warn};

use crate::metrics;

use super::specs::default_specifications;
use super::types::{
    Candidate, Decision, DecisionError, Diagnostics, EvaluationContext, SpecOutcome, SpecificationFault,
};

/// One accept/reject rule.
pub trait DecisionSpecification: Send + Sync {
    /// Unique name within a chain, used for diagnostics and chain edits.
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault>;
}

/// Ordered specification chain.
pub struct DecisionEngine {
    specs: Vec<Box<dyn DecisionSpecification>>,
}

impl DecisionEngine {
    /// An engine with no specifications; approves everything.
    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// The standard chain, cheapest and most decisive checks first.
    pub fn default_chain() -> Self {
        Self {
            specs: default_specifications(),
        }
    }

    /// Specification names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name()).collect()
    }

    pub fn push(&mut self, spec: Box<dyn DecisionSpecification>) {
        self.specs.push(spec);
    }

    /// Insert `spec` directly before the specification called `name`.
    pub fn insert_before(
        &mut self,
        name: &str,
        spec: Box<dyn DecisionSpecification>,
    ) -> Result<(), DecisionError> {
        let index = self.position(name)?;
        self.specs.insert(index, spec);
        Ok(())
    }

    /// Insert `spec` directly after the specification called `name`.
    pub fn insert_after(
        &mut self,
        name: &str,
        spec: Box<dyn DecisionSpecification>,
    ) -> Result<(), DecisionError> {
        let index = self.position(name)?;
        self.specs.insert(index + 1, spec);
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize, DecisionError> {
        self.specs
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| DecisionError::UnknownSpecification(name.to_string()))
    }

    /// Run the chain over one candidate.
    pub fn evaluate(&self, candidate: &Candidate, context: &EvaluationContext<'_>) -> Decision {
        let mut diagnostics = Diagnostics::new();

        for spec in &self.specs {
            match spec.evaluate(candidate, context, &mut diagnostics) {
                Ok(SpecOutcome::Accept) => {}
                Ok(SpecOutcome::Reject(rejection)) => {
                    debug!(
                        release = %candidate.release.title,
                        specification = spec.name(),
                        reason = %rejection.reason,
                        "Release rejected: {}",
                        rejection.message
                    );
                    return Decision {
                        rejections: vec![rejection],
                        diagnostics,
                    };
                }
                Err(fault) => {
                    warn!(
                        release = %candidate.release.title,
                        specification = spec.name(),
                        error = %fault,
                        "Specification faulted, treating as non-match"
                    );
                    metrics::SPECIFICATION_FAULTS
                        .with_label_values(&[spec.name()])
                        .inc();
                    diagnostics.flag(format!("{}: {}", spec.name(), fault));
                }
            }
        }

        Decision {
            rejections: Vec::new(),
            diagnostics,
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::default_chain()
    }
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("specs", &self.names())
            .finish()
    }
}
