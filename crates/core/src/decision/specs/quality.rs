//! Quality profile checks.

use crate::decision::engine::DecisionSpecification;
use crate::decision::types::{
    Candidate, Diagnostics, EvaluationContext, Rejection, RejectionReason, SpecOutcome, SpecificationFault,
};

/// Rejects qualities the profile does not allow.
pub struct QualityAllowedSpecification;

impl DecisionSpecification for QualityAllowedSpecification {
    fn name(&self) -> &str {
        "quality_allowed"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let quality = candidate.quality();
        if context.profile().is_allowed(quality) {
            return Ok(SpecOutcome::Accept);
        }
        Ok(SpecOutcome::Reject(Rejection::permanent(
            RejectionReason::QualityNotWanted,
            format!("{} is not wanted in profile '{}'", quality, context.profile().name),
        )))
    }
}

/// Rejects releases for books whose files already satisfy the profile.
pub struct CutoffSpecification;

impl DecisionSpecification for CutoffSpecification {
    fn name(&self) -> &str {
        "cutoff"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        if candidate.books.is_empty() {
            return Ok(SpecOutcome::Accept);
        }

        let profile = context.profile();
        let existing: Vec<_> = candidate
            .books
            .iter()
            .map(|book| context.snapshot.existing_quality(book.id))
            .collect();

        // Any book without a file still wants this release.
        if existing.iter().any(Option::is_none) {
            return Ok(SpecOutcome::Accept);
        }

        if !profile.upgrade_allowed {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::CutoffMet,
                "Files exist and upgrades are disabled",
            )));
        }

        if existing.iter().flatten().all(|&q| profile.meets_cutoff(q)) {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::CutoffMet,
                format!("Existing files meet the cutoff of {}", profile.cutoff),
            )));
        }

        Ok(SpecOutcome::Accept)
    }
}

/// Rejects releases whose custom format score is below the profile minimum.
pub struct FormatScoreSpecification;

impl DecisionSpecification for FormatScoreSpecification {
    fn name(&self) -> &str {
        "format_score"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let profile = context.profile();
        let evaluation = candidate.format_evaluation(context.formats, profile);
        diagnostics.extend(evaluation.diagnostics.iter().cloned());

        if evaluation.score < profile.min_format_score {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::FormatScore,
                format!(
                    "Custom format score {} is below the minimum of {}",
                    evaluation.score, profile.min_format_score
                ),
            )));
        }
        Ok(SpecOutcome::Accept)
    }
}
