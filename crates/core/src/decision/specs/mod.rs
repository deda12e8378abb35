//! Built-in decision specifications.

mod history;
mod matching;
mod monitored;
mod quality;
mod release;

pub use history::{AlreadyImportedSpecification, BlocklistSpecification, UpgradeDiskSpecification};
pub use matching::{
    AuthorMatchSpecification, BookMatchSpecification, SearchMatchSpecification, UnparseableSpecification,
};
pub use monitored::MonitoredSpecification;
pub use quality::{CutoffSpecification, FormatScoreSpecification, QualityAllowedSpecification};
pub use release::{DelaySpecification, ProtocolSpecification, SeedersSpecification, SizeSpecification};

use super::engine::DecisionSpecification;

/// The standard chain, in evaluation order.
pub fn default_specifications() -> Vec<Box<dyn DecisionSpecification>> {
    vec![
        Box::new(UnparseableSpecification),
        Box::new(AuthorMatchSpecification),
        Box::new(BookMatchSpecification),
        Box::new(SearchMatchSpecification),
        Box::new(BlocklistSpecification),
        Box::new(AlreadyImportedSpecification),
        Box::new(UpgradeDiskSpecification),
        Box::new(MonitoredSpecification),
        Box::new(ProtocolSpecification),
        Box::new(DelaySpecification),
        Box::new(QualityAllowedSpecification),
        Box::new(CutoffSpecification),
        Box::new(SizeSpecification),
        Box::new(SeedersSpecification),
        Box::new(FormatScoreSpecification),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Author, BlocklistEntry, Book, BookFile, ImportedRelease};
    use crate::config::DecisionConfig;
    use crate::custom_format::{CustomFormat, CustomFormatSpec, FormatCondition};
    use crate::decision::types::{
        Candidate, Diagnostics, RejectionReason, RejectionType, SpecOutcome, SpecificationFault,
    };
    use crate::decision::DecisionSnapshot;
    use crate::fuzzy::MatchStatus;
    use crate::quality::{ProfileFormatItem, Quality};
    use crate::testing::fixtures::{self, ContextHarness};

    fn run(
        spec: &dyn DecisionSpecification,
        candidate: &Candidate,
        harness: &ContextHarness<'_>,
    ) -> Result<SpecOutcome, SpecificationFault> {
        let mut diagnostics = Diagnostics::new();
        spec.evaluate(candidate, &harness.context(), &mut diagnostics)
    }

    fn rejected_with(outcome: Result<SpecOutcome, SpecificationFault>) -> Option<RejectionReason> {
        match outcome {
            Ok(SpecOutcome::Reject(rejection)) => Some(rejection.reason),
            Ok(SpecOutcome::Accept) => None,
            Err(fault) => panic!("unexpected fault: {}", fault),
        }
    }

    fn weir() -> Author {
        Author::new(1, "Andy Weir")
    }

    fn martian() -> Book {
        Book::new(10, 1, "The Martian")
    }

    fn martian_candidate(title: &str) -> Candidate {
        fixtures::resolved_candidate(fixtures::release(title), &weir(), &[martian()])
    }

    #[test]
    fn test_unparseable() {
        let snapshot = fixtures::snapshot();
        let harness = ContextHarness::new(&snapshot);

        let candidate = fixtures::candidate("0123456789abcdef0123456789abcdef");
        assert_eq!(
            rejected_with(run(&UnparseableSpecification, &candidate, &harness)),
            Some(RejectionReason::Unparseable)
        );

        let candidate = martian_candidate("Andy Weir - The Martian [EPUB]");
        assert_eq!(rejected_with(run(&UnparseableSpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_author_match() {
        let snapshot = fixtures::snapshot();
        let harness = ContextHarness::new(&snapshot);

        let mut candidate = fixtures::candidate("Someone - Something");
        candidate.author_match = MatchStatus::Ambiguous { ids: vec![1, 2] };
        assert_eq!(
            rejected_with(run(&AuthorMatchSpecification, &candidate, &harness)),
            Some(RejectionReason::Ambiguous)
        );

        candidate.author_match = MatchStatus::NotFound;
        assert_eq!(
            rejected_with(run(&AuthorMatchSpecification, &candidate, &harness)),
            Some(RejectionReason::UnknownAuthor)
        );

        // Matched status without the author attached cannot be judged.
        candidate.author_match = MatchStatus::Matched { id: 1, similarity: 1.0 };
        assert!(run(&AuthorMatchSpecification, &candidate, &harness).is_err());
    }

    #[test]
    fn test_book_match() {
        let snapshot = fixtures::snapshot();
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian");
        assert_eq!(rejected_with(run(&BookMatchSpecification, &candidate, &harness)), None);

        let mut candidate = fixtures::resolved_candidate(fixtures::release("Andy Weir - Artemis"), &weir(), &[]);
        candidate.book_match = MatchStatus::NotFound;
        assert_eq!(
            rejected_with(run(&BookMatchSpecification, &candidate, &harness)),
            Some(RejectionReason::UnknownBook)
        );
    }

    #[test]
    fn test_book_match_discography_needs_books() {
        let snapshot = fixtures::snapshot();
        let harness = ContextHarness::new(&snapshot);
        let books = vec![martian(), Book::new(11, 1, "Project Hail Mary")];

        let candidate = fixtures::resolved_candidate(
            fixtures::release("Andy Weir - Complete Collection [EPUB]"),
            &weir(),
            &books,
        );
        assert!(candidate.is_discography());
        assert_eq!(rejected_with(run(&BookMatchSpecification, &candidate, &harness)), None);

        let candidate = fixtures::resolved_candidate(
            fixtures::release("Andy Weir - Complete Collection [EPUB]"),
            &weir(),
            &[],
        );
        assert_eq!(
            rejected_with(run(&BookMatchSpecification, &candidate, &harness)),
            Some(RejectionReason::UnknownBook)
        );
    }

    #[test]
    fn test_search_match() {
        let snapshot = fixtures::snapshot();
        let candidate = martian_candidate("Andy Weir - The Martian");

        let harness = ContextHarness::new(&snapshot).with_criteria(fixtures::criteria(&snapshot, 1, &[10]));
        assert_eq!(rejected_with(run(&SearchMatchSpecification, &candidate, &harness)), None);

        let harness = ContextHarness::new(&snapshot).with_criteria(fixtures::criteria(&snapshot, 1, &[11]));
        assert_eq!(
            rejected_with(run(&SearchMatchSpecification, &candidate, &harness)),
            Some(RejectionReason::NotRequested)
        );

        let harness = ContextHarness::new(&snapshot).with_criteria(fixtures::criteria(&snapshot, 2, &[]));
        assert_eq!(
            rejected_with(run(&SearchMatchSpecification, &candidate, &harness)),
            Some(RejectionReason::NotRequested)
        );

        let harness = ContextHarness::new(&snapshot);
        assert_eq!(rejected_with(run(&SearchMatchSpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_blocklist_by_title_and_hash() {
        let mut snapshot = fixtures::snapshot();
        snapshot.blocklist = vec![BlocklistEntry::new(1, "Andy Weir - The Martian [EPUB]")];
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("andy weir - the martian [epub]");
        assert_eq!(
            rejected_with(run(&BlocklistSpecification, &candidate, &harness)),
            Some(RejectionReason::Blocklisted)
        );

        let mut entry = BlocklistEntry::new(1, "something else");
        entry.info_hash = Some("ABCDEF".to_string());
        snapshot.blocklist = vec![entry];
        let harness = ContextHarness::new(&snapshot);

        let mut release = fixtures::release("Andy Weir - The Martian [EPUB]");
        release.info_hash = Some("abcdef".to_string());
        let candidate = fixtures::resolved_candidate(release, &weir(), &[martian()]);
        assert_eq!(
            rejected_with(run(&BlocklistSpecification, &candidate, &harness)),
            Some(RejectionReason::Blocklisted)
        );

        // Blocklist entries are per author.
        let other = fixtures::resolved_candidate(
            candidate.release.clone(),
            &Author::new(2, "Brandon Sanderson"),
            &[],
        );
        assert_eq!(rejected_with(run(&BlocklistSpecification, &other, &harness)), None);
    }

    #[test]
    fn test_already_imported() {
        let mut snapshot = fixtures::snapshot();
        snapshot.history = vec![ImportedRelease {
            book_id: 10,
            source_title: "Andy Weir - The Martian [EPUB]".to_string(),
            info_hash: None,
        }];
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian [EPUB]");
        assert_eq!(
            rejected_with(run(&AlreadyImportedSpecification, &candidate, &harness)),
            Some(RejectionReason::AlreadyImported)
        );

        let candidate = martian_candidate("Andy Weir - The Martian [AZW3]");
        assert_eq!(rejected_with(run(&AlreadyImportedSpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_upgrade_disk() {
        let mut snapshot = fixtures::snapshot();
        snapshot.existing_files = vec![BookFile {
            book_id: 10,
            quality: Quality::Epub,
        }];
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian [MOBI]");
        assert_eq!(
            rejected_with(run(&UpgradeDiskSpecification, &candidate, &harness)),
            Some(RejectionReason::ExistingFile)
        );

        let candidate = martian_candidate("Andy Weir - The Martian [AZW3]");
        assert_eq!(rejected_with(run(&UpgradeDiskSpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_monitored() {
        let snapshot = fixtures::snapshot();
        let mut author = weir();
        author.monitored = false;
        let candidate = fixtures::resolved_candidate(
            fixtures::release("Andy Weir - The Martian"),
            &author,
            &[martian()],
        );

        let harness = ContextHarness::new(&snapshot);
        assert_eq!(
            rejected_with(run(&MonitoredSpecification, &candidate, &harness)),
            Some(RejectionReason::NotMonitored)
        );

        let user_search = fixtures::criteria(&snapshot, 1, &[10]).user_invoked(true);
        let harness = ContextHarness::new(&snapshot).with_criteria(user_search.clone());
        assert_eq!(rejected_with(run(&MonitoredSpecification, &candidate, &harness)), None);

        let harness = ContextHarness::new(&snapshot).with_criteria(user_search.monitored_only(true));
        assert_eq!(
            rejected_with(run(&MonitoredSpecification, &candidate, &harness)),
            Some(RejectionReason::NotMonitored)
        );
    }

    #[test]
    fn test_protocol_disabled() {
        let mut snapshot = fixtures::snapshot();
        snapshot.delay_profile.enable_torrent = false;
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian");
        assert_eq!(
            rejected_with(run(&ProtocolSpecification, &candidate, &harness)),
            Some(RejectionReason::ProtocolDisabled)
        );

        let candidate = fixtures::resolved_candidate(
            fixtures::usenet_release("Andy Weir - The Martian"),
            &weir(),
            &[martian()],
        );
        assert_eq!(rejected_with(run(&ProtocolSpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_delay_is_temporary() {
        let mut snapshot = fixtures::snapshot();
        // Fixture releases are 24 hours old.
        snapshot.delay_profile.torrent_delay_minutes = 48 * 60;
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian [EPUB]");
        let mut diagnostics = Diagnostics::new();
        match DelaySpecification.evaluate(&candidate, &harness.context(), &mut diagnostics) {
            Ok(SpecOutcome::Reject(rejection)) => {
                assert_eq!(rejection.reason, RejectionReason::Delayed);
                assert_eq!(rejection.rejection_type, RejectionType::Temporary);
            }
            other => panic!("expected delay rejection, got {:?}", other),
        }

        // Highest allowed quality bypasses the delay.
        let candidate = martian_candidate("Andy Weir - The Martian [AZW3]");
        assert_eq!(rejected_with(run(&DelaySpecification, &candidate, &harness)), None);

        // User searches are never delayed.
        let candidate = martian_candidate("Andy Weir - The Martian [EPUB]");
        let harness = ContextHarness::new(&snapshot)
            .with_criteria(fixtures::criteria(&snapshot, 1, &[10]).user_invoked(true));
        assert_eq!(rejected_with(run(&DelaySpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_quality_allowed() {
        let snapshot = fixtures::snapshot();
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian");
        assert_eq!(
            rejected_with(run(&QualityAllowedSpecification, &candidate, &harness)),
            Some(RejectionReason::QualityNotWanted)
        );

        let candidate = martian_candidate("Andy Weir - The Martian [PDF]");
        assert_eq!(rejected_with(run(&QualityAllowedSpecification, &candidate, &harness)), None);
    }

    #[test]
    fn test_cutoff() {
        let mut snapshot = fixtures::snapshot();
        snapshot.existing_files = vec![BookFile {
            book_id: 10,
            quality: Quality::Epub,
        }];
        let candidate = martian_candidate("Andy Weir - The Martian [AZW3]");

        let harness = ContextHarness::new(&snapshot);
        assert_eq!(
            rejected_with(run(&CutoffSpecification, &candidate, &harness)),
            Some(RejectionReason::CutoffMet)
        );

        snapshot.existing_files[0].quality = Quality::Pdf;
        let harness = ContextHarness::new(&snapshot);
        assert_eq!(rejected_with(run(&CutoffSpecification, &candidate, &harness)), None);

        snapshot.quality_profile.upgrade_allowed = false;
        let harness = ContextHarness::new(&snapshot);
        assert_eq!(
            rejected_with(run(&CutoffSpecification, &candidate, &harness)),
            Some(RejectionReason::CutoffMet)
        );
    }

    #[test]
    fn test_size_and_seeders() {
        let snapshot = fixtures::snapshot();
        let config = DecisionConfig {
            min_size_mb: 10,
            min_seeders: 30,
            ..Default::default()
        };
        let harness = ContextHarness::new(&snapshot).with_config(config);

        let candidate = martian_candidate("Andy Weir - The Martian");
        assert_eq!(
            rejected_with(run(&SizeSpecification, &candidate, &harness)),
            Some(RejectionReason::Size)
        );
        assert_eq!(
            rejected_with(run(&SeedersSpecification, &candidate, &harness)),
            Some(RejectionReason::Seeders)
        );

        let usenet = fixtures::resolved_candidate(
            fixtures::usenet_release("Andy Weir - The Martian"),
            &weir(),
            &[martian()],
        );
        assert_eq!(rejected_with(run(&SeedersSpecification, &usenet, &harness)), None);
    }

    #[test]
    fn test_format_score_minimum() {
        let mut snapshot: DecisionSnapshot = fixtures::snapshot();
        snapshot.custom_formats = vec![CustomFormat::new(
            1,
            "Retail",
            vec![CustomFormatSpec::new(
                "retail",
                FormatCondition::ReleaseTitle {
                    pattern: r"\bretail\b".to_string(),
                },
            )],
        )];
        snapshot.quality_profile.format_items = vec![ProfileFormatItem { format_id: 1, score: 10 }];
        snapshot.quality_profile.min_format_score = 5;
        let harness = ContextHarness::new(&snapshot);

        let candidate = martian_candidate("Andy Weir - The Martian RETAIL [EPUB]");
        assert_eq!(rejected_with(run(&FormatScoreSpecification, &candidate, &harness)), None);

        let candidate = martian_candidate("Andy Weir - The Martian [EPUB]");
        assert_eq!(
            rejected_with(run(&FormatScoreSpecification, &candidate, &harness)),
            Some(RejectionReason::FormatScore)
        );
    }
}
