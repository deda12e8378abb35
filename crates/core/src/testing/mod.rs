//! Testing utilities shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use tomekeeper_core::testing::fixtures;
//!
//! let snapshot = fixtures::snapshot();
//! let harness = fixtures::ContextHarness::new(&snapshot);
//! let candidate = fixtures::candidate("Andy Weir - The Martian [EPUB]");
//! let decision = engine.evaluate(&candidate, &harness.context());
//! ```

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::catalog::{Author, Book, CatalogSnapshot};
    use crate::config::DecisionConfig;
    use crate::custom_format::CustomFormatEvaluator;
    use crate::decision::{Candidate, DecisionSnapshot, EvaluationContext};
    use crate::fuzzy::MatchStatus;
    use crate::parser::parse_title;
    use crate::quality::{Quality, QualityProfile};
    use crate::release::{Protocol, ReleaseInfo};
    use crate::search::SearchCriteria;

    /// Reference "now" for age-dependent tests: 2024-01-02 00:00 UTC.
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    /// A torrent release published a day before [`now`].
    pub fn release(title: &str) -> ReleaseInfo {
        ReleaseInfo {
            title: title.to_string(),
            size_bytes: 5 * 1024 * 1024, // 5 MB
            publish_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            download_uri: format!("magnet:?xt=urn:btih:{}", title.len()),
            indexer_id: 1,
            indexer: "mock-indexer".to_string(),
            protocol: Protocol::Torrent,
            seeders: Some(25),
            info_hash: None,
        }
    }

    /// A usenet release published a day before [`now`].
    pub fn usenet_release(title: &str) -> ReleaseInfo {
        ReleaseInfo {
            protocol: Protocol::Usenet,
            seeders: None,
            download_uri: "https://indexer.example/getnzb/1".to_string(),
            ..release(title)
        }
    }

    /// An unresolved candidate for a torrent release.
    pub fn candidate(title: &str) -> Candidate {
        Candidate::new(release(title))
    }

    /// A candidate already parsed and resolved to `author` and `books`.
    pub fn resolved_candidate(release: ReleaseInfo, author: &Author, books: &[Book]) -> Candidate {
        let mut candidate = Candidate::new(release);
        candidate.parsed = parse_title(&candidate.release.title);
        candidate.author_match = MatchStatus::Matched {
            id: author.id,
            similarity: 1.0,
        };
        candidate.author = Some(author.clone());
        candidate.book_match = match books {
            [book] => MatchStatus::Matched {
                id: book.id,
                similarity: 1.0,
            },
            _ => MatchStatus::Skipped,
        };
        candidate.books = books.to_vec();
        candidate
    }

    /// PDF < MOBI < EPUB < AZW3, cutoff EPUB, unknown formats not allowed.
    pub fn ebook_profile() -> QualityProfile {
        let mut profile = QualityProfile::new(
            1,
            "eBook",
            &[
                Quality::Unknown,
                Quality::Pdf,
                Quality::Mobi,
                Quality::Epub,
                Quality::Azw3,
            ],
            Quality::Epub,
        );
        profile.items[0].allowed = false;
        profile
    }

    /// Two authors with two books each.
    ///
    /// Authors: 1 "Andy Weir", 2 "Brandon Sanderson".
    /// Books: 10 "The Martian", 11 "Project Hail Mary" (author 1),
    /// 20 "The Way of Kings", 21 "Words of Radiance" (author 2).
    pub fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![Author::new(1, "Andy Weir"), Author::new(2, "Brandon Sanderson")],
            vec![
                Book::new(10, 1, "The Martian"),
                Book::new(11, 1, "Project Hail Mary"),
                Book::new(20, 2, "The Way of Kings"),
                Book::new(21, 2, "Words of Radiance"),
            ],
        )
    }

    /// [`catalog`] with [`ebook_profile`] and default everything else.
    pub fn snapshot() -> DecisionSnapshot {
        DecisionSnapshot::new(catalog(), ebook_profile())
    }

    /// Criteria for an automatic search of one author's books.
    pub fn criteria(snapshot: &DecisionSnapshot, author_id: i64, book_ids: &[i64]) -> SearchCriteria {
        let author = snapshot
            .catalog
            .author(author_id)
            .cloned()
            .unwrap_or_else(|| Author::new(author_id, "Unknown"));
        let books = snapshot
            .catalog
            .books
            .iter()
            .filter(|b| book_ids.contains(&b.id))
            .cloned()
            .collect();
        SearchCriteria::new(author, books)
    }

    /// Owns what an [`EvaluationContext`] borrows besides the snapshot.
    pub struct ContextHarness<'a> {
        pub snapshot: &'a DecisionSnapshot,
        pub config: DecisionConfig,
        pub formats: CustomFormatEvaluator,
        pub criteria: Option<SearchCriteria>,
        pub now: DateTime<Utc>,
    }

    impl<'a> ContextHarness<'a> {
        pub fn new(snapshot: &'a DecisionSnapshot) -> Self {
            Self {
                snapshot,
                config: DecisionConfig::default(),
                formats: CustomFormatEvaluator::new(&snapshot.custom_formats),
                criteria: None,
                now: now(),
            }
        }

        pub fn with_config(mut self, config: DecisionConfig) -> Self {
            self.config = config;
            self
        }

        pub fn with_criteria(mut self, criteria: SearchCriteria) -> Self {
            self.criteria = Some(criteria);
            self
        }

        pub fn context(&self) -> EvaluationContext<'_> {
            EvaluationContext {
                snapshot: self.snapshot,
                criteria: self.criteria.as_ref(),
                config: &self.config,
                formats: &self.formats,
                now: self.now,
            }
        }
    }
}
