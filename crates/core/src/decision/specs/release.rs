//! Checks on the release record itself.

use crate::decision::engine::DecisionSpecification;
use crate::decision::types::{
    Candidate, Diagnostics, EvaluationContext, Rejection, RejectionReason, SpecOutcome, SpecificationFault,
};
use crate::release::Protocol;

/// Rejects protocols the delay profile disables.
pub struct ProtocolSpecification;

impl DecisionSpecification for ProtocolSpecification {
    fn name(&self) -> &str {
        "protocol"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let protocol = candidate.release.protocol;
        if context.snapshot.delay_profile.is_enabled(protocol) {
            return Ok(SpecOutcome::Accept);
        }
        Ok(SpecOutcome::Reject(Rejection::permanent(
            RejectionReason::ProtocolDisabled,
            format!("{} is disabled", protocol),
        )))
    }
}

/// Holds back automatic grabs until a release is old enough.
pub struct DelaySpecification;

impl DecisionSpecification for DelaySpecification {
    fn name(&self) -> &str {
        "delay"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        if context.is_user_invoked() {
            return Ok(SpecOutcome::Accept);
        }

        let delay_profile = &context.snapshot.delay_profile;
        let delay = delay_profile.delay_minutes(candidate.release.protocol);
        if delay <= 0 {
            return Ok(SpecOutcome::Accept);
        }

        if delay_profile.bypass_if_highest_quality
            && context.profile().highest_allowed() == Some(candidate.quality())
        {
            return Ok(SpecOutcome::Accept);
        }

        let age = candidate.release.age_minutes(context.now);
        if age < delay {
            return Ok(SpecOutcome::Reject(Rejection::temporary(
                RejectionReason::Delayed,
                format!("Release is {} minutes old, delay is {} minutes", age, delay),
            )));
        }
        Ok(SpecOutcome::Accept)
    }
}

/// Rejects releases outside the configured size range.
///
/// Releases without a reported size pass.
pub struct SizeSpecification;

impl DecisionSpecification for SizeSpecification {
    fn name(&self) -> &str {
        "size"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let size = candidate.release.size_bytes;
        if size == 0 {
            return Ok(SpecOutcome::Accept);
        }

        if let Some(min) = context.config.min_size_bytes() {
            if size < min {
                return Ok(SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::Size,
                    format!("{} bytes is smaller than the minimum of {} bytes", size, min),
                )));
            }
        }

        if let Some(max) = context.config.max_size_bytes() {
            if size > max {
                return Ok(SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::Size,
                    format!("{} bytes is larger than the maximum of {} bytes", size, max),
                )));
            }
        }

        Ok(SpecOutcome::Accept)
    }
}

/// Rejects torrents with too few seeders.
pub struct SeedersSpecification;

impl DecisionSpecification for SeedersSpecification {
    fn name(&self) -> &str {
        "seeders"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        if candidate.release.protocol != Protocol::Torrent {
            return Ok(SpecOutcome::Accept);
        }

        match candidate.release.seeders {
            Some(seeders) if seeders < context.config.min_seeders => {
                Ok(SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::Seeders,
                    format!(
                        "{} seeders, minimum is {}",
                        seeders, context.config.min_seeders
                    ),
                )))
            }
            _ => Ok(SpecOutcome::Accept),
        }
    }
}
