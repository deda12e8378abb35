//! Ranking of approved candidates.
//!
//! Scores compare lexicographically: custom format score, quality rank,
//! protocol preference, seeders, then newer publish date. Because every key
//! is totally ordered the result is a strict weak ordering, and ties keep
//! discovery order.

use std::cmp::Ordering;

use super::types::{DownloadDecision, Score};

/// Order two scores so that the better one sorts first.
pub fn compare(a: &Score, b: &Score) -> Ordering {
    b.format_score
        .cmp(&a.format_score)
        .then_with(|| b.quality_rank.cmp(&a.quality_rank))
        .then_with(|| b.protocol_preference.cmp(&a.protocol_preference))
        .then_with(|| b.seeders.cmp(&a.seeders))
        .then_with(|| b.publish_date.cmp(&a.publish_date))
}

/// Order two decisions: approved before rejected, approved ones by score.
///
/// Rejected decisions compare equal to each other so a stable sort keeps
/// them in discovery order.
pub fn compare_decisions(a: &DownloadDecision, b: &DownloadDecision) -> Ordering {
    match (a.approved(), b.approved()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
        (true, true) => match (&a.score, &b.score) {
            (Some(a), Some(b)) => compare(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// The best approved decision, or `None` when nothing was approved.
///
/// Among equally ranked decisions the first discovered wins.
pub fn select_best(decisions: &[DownloadDecision]) -> Option<&DownloadDecision> {
    decisions
        .iter()
        .filter(|d| d.approved())
        .min_by(|a, b| compare_decisions(a, b))
}

/// Every decision ranked: approved in score order, then rejected in
/// discovery order.
pub fn prioritize(mut decisions: Vec<DownloadDecision>) -> Vec<DownloadDecision> {
    decisions.sort_by(compare_decisions);
    decisions
}
