//! Checks against what was already blocked, imported or stored.

use crate::decision::engine::DecisionSpecification;
use crate::decision::types::{
    Candidate, Diagnostics, EvaluationContext, Rejection, RejectionReason, SpecOutcome, SpecificationFault,
};

/// Rejects releases on the blocklist for the resolved author.
pub struct BlocklistSpecification;

impl DecisionSpecification for BlocklistSpecification {
    fn name(&self) -> &str {
        "blocklist"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let Some(author) = &candidate.author else {
            return Ok(SpecOutcome::Accept);
        };
        let release = &candidate.release;
        let info_hash = release.normalized_info_hash();

        let blocked = context
            .snapshot
            .blocklist
            .iter()
            .any(|entry| entry.blocks(author.id, &release.title, info_hash.as_deref()));

        if blocked {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::Blocklisted,
                "Release is blocklisted",
            )));
        }
        Ok(SpecOutcome::Accept)
    }
}

/// Rejects releases that were already imported for one of the books.
pub struct AlreadyImportedSpecification;

impl DecisionSpecification for AlreadyImportedSpecification {
    fn name(&self) -> &str {
        "already_imported"
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        context: &EvaluationContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let release = &candidate.release;
        let info_hash = release.normalized_info_hash();

        for book in &candidate.books {
            let imported = context
                .snapshot
                .history
                .iter()
                .filter(|h| h.book_id == book.id)
                .any(|h| match (h.info_hash.as_deref(), info_hash.as_deref()) {
                    (Some(previous), Some(hash)) if !previous.is_empty() => previous.eq_ignore_ascii_case(hash),
                    _ => h.source_title.trim().eq_ignore_ascii_case(release.title.trim()),
                });

            if imported {
                return Ok(SpecOutcome::Reject(Rejection::permanent(
                    RejectionReason::AlreadyImported,
                    format!("Already imported for '{}'", book.title),
                )));
            }
        }
        Ok(SpecOutcome::Accept)
    }
}

/// Rejects releases that would not improve on the files already on disk.
pub struct UpgradeDiskSpecification;

impl DecisionSpecification for UpgradeDiskSpecification {
    fn name(&self) -> &str {
        "upgrade_disk"
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
        let quality = candidate.quality();
        let no_upgrade = candidate.books.iter().all(|book| {
            context
                .snapshot
                .existing_quality(book.id)
                .is_some_and(|existing| !profile.is_upgrade(existing, quality))
        });

        if no_upgrade {
            return Ok(SpecOutcome::Reject(Rejection::permanent(
                RejectionReason::ExistingFile,
                format!("Existing files are at least as good as {}", quality),
            )));
        }
        Ok(SpecOutcome::Accept)
    }
}
