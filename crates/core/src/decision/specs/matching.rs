//! Parsing and catalog-resolution checks.

use crate::decision::engine::DecisionSpecification;
use crate::decision::types::{
    Candidate, Diagnostics, EvaluationContext, Rejection, RejectionReason, SpecOutcome, SpecificationFault,
};
use crate::fuzzy::MatchStatus;

/// Rejects releases whose title could not be parsed.
pub struct UnparseableSpecification;

impl DecisionSpecification for UnparseableSpecification {
    fn name(&self) -> &str {
        "unparseable"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        _context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        if candidate.parsed.is_some() {
            return Ok(SpecOutcome::Accept);
        }
        Ok(SpecOutcome::Reject(Rejection::permanent(
            RejectionReason::Unparseable,
            format!("Unable to parse release title '{}'", candidate.release.title),
        )))
    }
}

/// Requires the parsed author to resolve to exactly one catalog author.
pub struct AuthorMatchSpecification;

impl DecisionSpecification for AuthorMatchSpecification {
    fn name(&self) -> &str {
        "author_match"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        _context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let outcome = match &candidate.author_match {
            MatchStatus::Matched { .. } if candidate.author.is_some() => SpecOutcome::Accept,
            MatchStatus::Matched { id, .. } => {
                return Err(SpecificationFault::MissingData(format!(
                    "author {} matched but not attached",
                    id
                )))
            }
            MatchStatus::Ambiguous { ids } => SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::Ambiguous,
                format!("Author name matches {} catalog authors", ids.len()),
            )),
            MatchStatus::NotFound | MatchStatus::Skipped => {
                let name = candidate
                    .parsed
                    .as_ref()
                    .and_then(|p| p.author_name.as_deref())
                    .unwrap_or("<none>");
                SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::UnknownAuthor,
                    format!("Unknown author '{}'", name),
                ))
            }
        };
        Ok(outcome)
    }
}

/// Requires a single-book release to resolve to exactly one of the
/// author's books. Discographies are matched at author level.
pub struct BookMatchSpecification;

impl DecisionSpecification for BookMatchSpecification {
    fn name(&self) -> &str {
        "book_match"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        _context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        if candidate.is_discography() {
            if candidate.books.is_empty() {
                return Ok(SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::UnknownBook,
                    "Discography release but the author has no books",
                )));
            }
            return Ok(SpecOutcome::Accept);
        }

        let outcome = match &candidate.book_match {
            MatchStatus::Matched { .. } if !candidate.books.is_empty() => SpecOutcome::Accept,
            MatchStatus::Matched { id, .. } => {
                return Err(SpecificationFault::MissingData(format!(
                    "book {} matched but not attached",
                    id
                )))
            }
            MatchStatus::Ambiguous { ids } => SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::Ambiguous,
                format!("Book title matches {} catalog books", ids.len()),
            )),
            MatchStatus::NotFound | MatchStatus::Skipped => {
                let title = candidate
                    .parsed
                    .as_ref()
                    .and_then(|p| p.book_title.as_deref())
                    .unwrap_or("<none>");
                SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::UnknownBook,
                    format!("Unknown book '{}'", title),
                ))
            }
        };
        Ok(outcome)
    }
}

/// With search criteria, only the searched author and books are accepted.
pub struct SearchMatchSpecification;

impl DecisionSpecification for SearchMatchSpecification {
    fn name(&self) -> &str {
        "search_match"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let Some(criteria) = context.criteria else {
            return Ok(SpecOutcome::Accept);
        };
        let author = candidate
            .author
            .as_ref()
            .ok_or_else(|| SpecificationFault::MissingData("resolved author".to_string()))?;

        if author.id != criteria.author.id {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::NotRequested,
                format!(
                    "Release is for '{}', search was for '{}'",
                    author.name, criteria.author.name
                ),
            )));
        }

        if !criteria.books.is_empty() && !candidate.books.iter().any(|b| criteria.wants_book(b.id)) {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::NotRequested,
                "None of the release's books were searched for",
            )));
        }

        Ok(SpecOutcome::Accept)
    }
}
