//! Batch file format read by `tomekeeper decide`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tomekeeper_core::{DecisionSnapshot, DownloadDecision, ReleaseInfo, SearchCriteria};

/// Everything one decision run needs.
#[derive(Debug, Deserialize)]
pub struct Batch {
    pub snapshot: DecisionSnapshot,
    #[serde(default)]
    pub criteria: Option<SearchCriteria>,
    #[serde(default)]
    pub releases: Vec<ReleaseInfo>,
}

impl Batch {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file {:?}", path))?;
        Self::from_json(&raw).with_context(|| format!("Invalid batch file {:?}", path))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse batch JSON")
    }
}

/// Output of a decision run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub total: usize,
    pub approved: usize,
    /// Title of the release to grab, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<&'a str>,
    pub decisions: &'a [DownloadDecision],
}

impl<'a> Report<'a> {
    pub fn new(decisions: &'a [DownloadDecision]) -> Self {
        Self {
            total: decisions.len(),
            approved: decisions.iter().filter(|d| d.approved()).count(),
            best: tomekeeper_core::select_best(decisions).map(|d| d.candidate.release.title.as_str()),
            decisions,
        }
    }
}
