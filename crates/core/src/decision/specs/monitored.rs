use crate::decision::engine::DecisionSpecification;
use crate::decision::types::{
    Candidate, Diagnostics, EvaluationContext, Rejection, RejectionReason, SpecOutcome, SpecificationFault,
};

/// Rejects unmonitored authors and books.
///
/// User searches skip this check unless they ask for monitored items only.
pub struct MonitoredSpecification;

impl DecisionSpecification for MonitoredSpecification {
    fn name(&self) -> &str {
        "monitored"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        if let Some(criteria) = context.criteria {
            if criteria.user_invoked && !criteria.monitored_only {
                return Ok(SpecOutcome::Accept);
            }
        }

        if let Some(author) = &candidate.author {
            if !author.monitored {
                return Ok(SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::NotMonitored,
                    format!("Author '{}' is not monitored", author.name),
                )));
            }
        }

        // A discography is wanted if any of its books is.
        let books_monitored = if candidate.is_discography() {
            candidate.books.is_empty() || candidate.books.iter().any(|b| b.monitored)
        } else {
            candidate.books.iter().all(|b| b.monitored)
        };

        if !books_monitored {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::NotMonitored,
                "Book is not monitored",
            )));
        }
        Ok(SpecOutcome::Accept)
    }
}
