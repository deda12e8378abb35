//! Quality profiles: ordered preference over formats plus a cutoff.

use serde::{Deserialize, Serialize};

use super::Quality;

/// One quality level in a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityProfileItem {
    pub quality: Quality,
    /// Whether releases of this quality may be grabbed at all.
    #[serde(default = "default_true")]
    pub allowed: bool,
}

/// Score a profile assigns to a custom format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileFormatItem {
    pub format_id: i64,
    pub score: i32,
}

fn default_true() -> bool {
    true
}

/// Ordered quality levels (worst first), cutoff and custom format scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
    /// Quality levels, worst to best.
    pub items: Vec<QualityProfileItem>,
    /// Once every wanted book has a file at this level, stop upgrading.
    pub cutoff: Quality,
    #[serde(default = "default_true")]
    pub upgrade_allowed: bool,
    /// Per-format score table. Formats missing from it score 0.
    #[serde(default)]
    pub format_items: Vec<ProfileFormatItem>,
    /// Releases scoring below this are rejected.
    #[serde(default)]
    pub min_format_score: i32,
}

/// Position of a quality within a profile, used for ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualityRank {
    /// Index in the profile's ordered items; -1 when the profile lacks it.
    pub index: i32,
    pub meets_cutoff: bool,
}

impl QualityProfile {
    /// Build a profile allowing every listed quality, worst first.
    pub fn new(id: i64, name: impl Into<String>, qualities: &[Quality], cutoff: Quality) -> Self {
        Self {
            id,
            name: name.into(),
            items: qualities
                .iter()
                .map(|&quality| QualityProfileItem {
                    quality,
                    allowed: true,
                })
                .collect(),
            cutoff,
            upgrade_allowed: true,
            format_items: Vec::new(),
            min_format_score: 0,
        }
    }

    /// Index of a quality in the ordered items.
    pub fn index_of(&self, quality: Quality) -> Option<usize> {
        self.items.iter().position(|item| item.quality == quality)
    }

    pub fn is_allowed(&self, quality: Quality) -> bool {
        self.items
            .iter()
            .any(|item| item.quality == quality && item.allowed)
    }

    /// Whether a quality is at or above the cutoff.
    pub fn meets_cutoff(&self, quality: Quality) -> bool {
        match (self.index_of(quality), self.index_of(self.cutoff)) {
            (Some(index), Some(cutoff)) => index >= cutoff,
            _ => false,
        }
    }

    pub fn rank(&self, quality: Quality) -> QualityRank {
        QualityRank {
            index: self.index_of(quality).map(|i| i as i32).unwrap_or(-1),
            meets_cutoff: self.meets_cutoff(quality),
        }
    }

    /// Whether `candidate` ranks strictly above `existing`.
    pub fn is_upgrade(&self, existing: Quality, candidate: Quality) -> bool {
        self.rank(candidate).index > self.rank(existing).index
    }

    /// Best quality the profile allows.
    pub fn highest_allowed(&self) -> Option<Quality> {
        self.items
            .iter()
            .rev()
            .find(|item| item.allowed)
            .map(|item| item.quality)
    }

    /// Score for a custom format (0 when not listed).
    pub fn format_score(&self, format_id: i64) -> i32 {
        self.format_items
            .iter()
            .find(|item| item.format_id == format_id)
            .map(|item| item.score)
            .unwrap_or(0)
    }
}
