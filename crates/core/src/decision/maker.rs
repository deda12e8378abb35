//! Batch decision making.
//!
//! For every release: parse the title, resolve it against the catalog, run
//! the specification chain, score approved candidates with custom formats,
//! and finally rank the whole batch.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, Span};

use crate::catalog::{Author, Book};
use crate::config::{Config, DecisionConfig};
use crate::custom_format::CustomFormatEvaluator;
use crate::fuzzy::{CatalogResolver, MatchStatus};
use crate::metrics;
use crate::parser::TitleParser;
use crate::release::ReleaseInfo;
use crate::search::SearchCriteria;

use super::comparer::prioritize;
use super::engine::DecisionEngine;
use super::types::{Candidate, Decision, DecisionSnapshot, DownloadDecision, EvaluationContext, Score};

/// Turns indexer results into ranked download decisions.
#[derive(Debug)]
pub struct DecisionMaker {
    config: DecisionConfig,
    parser: TitleParser,
    resolver: CatalogResolver,
    engine: DecisionEngine,
    clock: Option<DateTime<Utc>>,
}

impl DecisionMaker {
    /// Create a maker with the default specification chain.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.decision.clone(),
            parser: TitleParser::new(config.matching.clone()),
            resolver: CatalogResolver::new(&config.matching),
            engine: DecisionEngine::default_chain(),
            clock: None,
        }
    }

    /// Replace the specification chain.
    pub fn with_engine(mut self, engine: DecisionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Evaluate release ages against a fixed time instead of the wall clock.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn engine_mut(&mut self) -> &mut DecisionEngine {
        &mut self.engine
    }

    /// Evaluate sequentially or on the rayon pool, as configured.
    pub fn evaluate_batch(
        &self,
        releases: Vec<ReleaseInfo>,
        snapshot: &DecisionSnapshot,
        criteria: Option<&SearchCriteria>,
        cancel: &CancellationToken,
    ) -> Vec<DownloadDecision> {
        if self.config.parallel {
            self.evaluate_parallel(releases, snapshot, criteria, cancel)
        } else {
            self.evaluate(releases, snapshot, criteria, cancel)
        }
    }

    /// Decide every release in order and return them ranked.
    ///
    /// Cancellation is checked between releases; the decisions made before
    /// it are still returned.
    #[instrument(skip_all, fields(releases = releases.len()))]
    pub fn evaluate(
        &self,
        releases: Vec<ReleaseInfo>,
        snapshot: &DecisionSnapshot,
        criteria: Option<&SearchCriteria>,
        cancel: &CancellationToken,
    ) -> Vec<DownloadDecision> {
        let started = Instant::now();
        let total = releases.len();
        let formats = CustomFormatEvaluator::new(&snapshot.custom_formats);
        let context = self.context(snapshot, criteria, &formats);

        let mut decisions = Vec::with_capacity(total);
        for release in releases {
            if cancel.is_cancelled() {
                info!(evaluated = decisions.len(), total, "Decision batch cancelled");
                break;
            }
            decisions.push(self.decide(release, &context));
        }

        self.finish(decisions, total, started)
    }

    /// Like [`evaluate`](Self::evaluate), but candidates are decided on the
    /// rayon pool. Input order is preserved before ranking.
    #[instrument(skip_all, fields(releases = releases.len()))]
    pub fn evaluate_parallel(
        &self,
        releases: Vec<ReleaseInfo>,
        snapshot: &DecisionSnapshot,
        criteria: Option<&SearchCriteria>,
        cancel: &CancellationToken,
    ) -> Vec<DownloadDecision> {
        let started = Instant::now();
        let total = releases.len();
        let formats = CustomFormatEvaluator::new(&snapshot.custom_formats);
        let context = self.context(snapshot, criteria, &formats);
        let span = Span::current();

        let decisions: Vec<DownloadDecision> = releases
            .into_par_iter()
            .filter_map(|release| {
                let _enter = span.enter();
                if cancel.is_cancelled() {
                    return None;
                }
                Some(self.decide(release, &context))
            })
            .collect();

        if decisions.len() < total {
            info!(evaluated = decisions.len(), total, "Decision batch cancelled");
        }

        self.finish(decisions, total, started)
    }

    /// Parse a release and resolve it against the catalog.
    pub fn build_candidate(
        &self,
        release: ReleaseInfo,
        snapshot: &DecisionSnapshot,
        criteria: Option<&SearchCriteria>,
    ) -> Candidate {
        let mut candidate = Candidate::new(release);

        let authors: &[Author] = match criteria {
            Some(criteria) if snapshot.catalog.authors.is_empty() => std::slice::from_ref(&criteria.author),
            _ => &snapshot.catalog.authors,
        };

        let Some(parsed) = self.parser.parse_with_authors(&candidate.release.title, authors) else {
            metrics::UNPARSEABLE_TITLES.inc();
            return candidate;
        };

        match parsed.author_name.as_deref() {
            Some(name) => {
                let resolution = self.resolver.resolve_author(name, authors);
                candidate.author_match = MatchStatus::from_resolution(&resolution, |a: &Author| a.id);
                candidate.author = resolution.matched().cloned();
            }
            None => candidate.author_match = MatchStatus::NotFound,
        }

        if let Some(author_id) = candidate.author.as_ref().map(|a| a.id) {
            let mut books: Vec<&Book> = snapshot.catalog.books_by_author(author_id).collect();
            if books.is_empty() {
                if let Some(criteria) = criteria.filter(|c| c.author.id == author_id) {
                    books = criteria.books.iter().collect();
                }
            }

            if parsed.discography {
                let now = self.clock.unwrap_or_else(Utc::now);
                candidate.books = books.into_iter().filter(|b| b.is_released(now)).cloned().collect();
                candidate.book_match = MatchStatus::Skipped;
            } else if let Some(title) = parsed.book_title.as_deref() {
                let resolution = self.resolver.resolve_book(title, books);
                candidate.book_match = MatchStatus::from_resolution(&resolution, |b: &Book| b.id);
                candidate.books = resolution.matched().cloned().into_iter().collect();
            } else {
                candidate.book_match = MatchStatus::NotFound;
            }
        }

        candidate.parsed = Some(parsed);
        candidate
    }

    fn context<'a>(
        &'a self,
        snapshot: &'a DecisionSnapshot,
        criteria: Option<&'a SearchCriteria>,
        formats: &'a CustomFormatEvaluator,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            snapshot,
            criteria,
            config: &self.config,
            formats,
            now: self.clock.unwrap_or_else(Utc::now),
        }
    }

    fn decide(&self, release: ReleaseInfo, context: &EvaluationContext<'_>) -> DownloadDecision {
        let candidate = self.build_candidate(release, context.snapshot, context.criteria);
        let mut decision = self.engine.evaluate(&candidate, context);

        let (score, custom_formats) = if decision.approved() {
            let profile = context.profile();
            let evaluation = candidate.format_evaluation(context.formats, profile);
            decision.diagnostics.extend(evaluation.diagnostics.iter().cloned());

            let score = Score {
                format_score: evaluation.score,
                quality_rank: profile.rank(candidate.quality()),
                protocol_preference: context
                    .snapshot
                    .delay_profile
                    .protocol_preference(candidate.release.protocol),
                seeders: candidate.release.seeders.unwrap_or(0),
                publish_date: candidate.release.publish_date,
            };
            (Some(score), evaluation.matched.clone())
        } else {
            (None, Vec::new())
        };

        record(&decision);
        debug!(
            release = %candidate.release.title,
            approved = decision.approved(),
            "Release evaluated"
        );

        DownloadDecision {
            candidate,
            decision,
            score,
            custom_formats,
        }
    }

    fn finish(&self, decisions: Vec<DownloadDecision>, total: usize, started: Instant) -> Vec<DownloadDecision> {
        let approved = decisions.iter().filter(|d| d.approved()).count();
        let ranked = prioritize(decisions);

        metrics::BATCH_SIZE.observe(total as f64);
        metrics::BATCH_DURATION.observe(started.elapsed().as_secs_f64());
        info!(
            total,
            evaluated = ranked.len(),
            approved,
            rejected = ranked.len() - approved,
            "Decision batch complete"
        );

        ranked
    }
}

fn record(decision: &Decision) {
    let result = if decision.approved() {
        "approved"
    } else if decision.temporarily_rejected() {
        "temporarily_rejected"
    } else {
        "rejected"
    };
    metrics::DECISIONS_TOTAL.with_label_values(&[result]).inc();

    for rejection in &decision.rejections {
        metrics::REJECTIONS_TOTAL
            .with_label_values(&[rejection.reason.as_str()])
            .inc();
    }
}
