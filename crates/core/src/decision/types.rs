//! Decision data model.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Author, BlocklistEntry, Book, BookFile, CatalogSnapshot, ImportedRelease};
use crate::config::DecisionConfig;
use crate::custom_format::{CustomFormat, CustomFormatEvaluator, FormatEvaluation, FormatSubject};
use crate::fuzzy::MatchStatus;
use crate::parser::ParsedBookInfo;
use crate::quality::{Quality, QualityProfile, QualityRank};
use crate::release::{Protocol, ReleaseInfo};
use crate::search::SearchCriteria;

// ============================================================================
// Candidate
// ============================================================================

/// A release together with everything parsing and matching learned about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub release: ReleaseInfo,
    /// `None` when the title could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedBookInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Resolved books. Several for a discography, empty when unresolved.
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub author_match: MatchStatus,
    #[serde(default)]
    pub book_match: MatchStatus,
    /// Custom format result, computed on first use.
    #[serde(skip)]
    formats: OnceLock<FormatEvaluation>,
}

impl Candidate {
    /// A candidate with nothing parsed or resolved yet.
    pub fn new(release: ReleaseInfo) -> Self {
        Self {
            release,
            parsed: None,
            author: None,
            books: Vec::new(),
            author_match: MatchStatus::Skipped,
            book_match: MatchStatus::Skipped,
            formats: OnceLock::new(),
        }
    }

    /// Parsed quality, `Unknown` for unparseable titles.
    pub fn quality(&self) -> Quality {
        self.parsed.as_ref().map(|p| p.quality).unwrap_or_default()
    }

    pub fn release_group(&self) -> Option<&str> {
        self.parsed.as_ref().and_then(|p| p.release_group.as_deref())
    }

    pub fn is_discography(&self) -> bool {
        self.parsed.as_ref().is_some_and(|p| p.discography)
    }

    /// The properties custom formats are tested against.
    pub fn format_subject(&self) -> FormatSubject<'_> {
        FormatSubject {
            title: &self.release.title,
            release_group: self.release_group(),
            quality: self.quality(),
            size_bytes: self.release.size_bytes,
            protocol: self.release.protocol,
            indexer_id: self.release.indexer_id,
        }
    }

    /// Custom format evaluation against the batch's formats and profile.
    ///
    /// Evaluated once per candidate; later calls return the stored result.
    pub fn format_evaluation(&self, formats: &CustomFormatEvaluator, profile: &QualityProfile) -> &FormatEvaluation {
        self.formats
            .get_or_init(|| formats.evaluate(&self.format_subject(), profile))
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Unparseable,
    UnknownAuthor,
    UnknownBook,
    Ambiguous,
    NotRequested,
    Blocklisted,
    AlreadyImported,
    ExistingFile,
    NotMonitored,
    ProtocolDisabled,
    Delayed,
    QualityNotWanted,
    CutoffMet,
    Size,
    Seeders,
    FormatScore,
}

impl RejectionReason {
    /// Stable label, used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::Unparseable => "unparseable",
            RejectionReason::UnknownAuthor => "unknown_author",
            RejectionReason::UnknownBook => "unknown_book",
            RejectionReason::Ambiguous => "ambiguous",
            RejectionReason::NotRequested => "not_requested",
            RejectionReason::Blocklisted => "blocklisted",
            RejectionReason::AlreadyImported => "already_imported",
            RejectionReason::ExistingFile => "existing_file",
            RejectionReason::NotMonitored => "not_monitored",
            RejectionReason::ProtocolDisabled => "protocol_disabled",
            RejectionReason::Delayed => "delayed",
            RejectionReason::QualityNotWanted => "quality_not_wanted",
            RejectionReason::CutoffMet => "cutoff_met",
            RejectionReason::Size => "size",
            RejectionReason::Seeders => "seeders",
            RejectionReason::FormatScore => "format_score",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a rejection may go away on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RejectionType {
    #[default]
    Permanent,
    /// The same release may be accepted later (e.g. once a delay has passed).
    Temporary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rejection {
    pub reason: RejectionReason,
    /// Human-readable explanation.
    pub message: String,
    #[serde(default)]
    pub rejection_type: RejectionType,
}

impl Rejection {
    pub fn permanent(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            rejection_type: RejectionType::Permanent,
        }
    }

    pub fn temporary(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            rejection_type: RejectionType::Temporary,
        }
    }
}

/// Flags raised while evaluating a candidate, without rejecting it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Diagnostics(Vec<String>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flag. Repeated flags are kept once.
    pub fn flag(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.0.contains(&message) {
            self.0.push(message);
        }
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, messages: I) {
        for message in messages {
            self.flag(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Outcome of running the specification chain over one candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    /// Empty when approved.
    #[serde(default)]
    pub rejections: Vec<Rejection>,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl Decision {
    pub fn approved(&self) -> bool {
        self.rejections.is_empty()
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejections.first()
    }

    pub fn temporarily_rejected(&self) -> bool {
        !self.rejections.is_empty()
            && self
                .rejections
                .iter()
                .all(|r| r.rejection_type == RejectionType::Temporary)
    }
}

/// Result of a single specification.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecOutcome {
    Accept,
    Reject(Rejection),
}

/// A specification that could not reach a verdict.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpecificationFault {
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from modifying a specification chain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecisionError {
    #[error("No specification named '{0}' in the chain")]
    UnknownSpecification(String),
}

// ============================================================================
// Batch Inputs
// ============================================================================

/// Per-protocol preference and grab delays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelayProfile {
    #[serde(default = "default_preferred_protocol")]
    pub preferred_protocol: Protocol,
    #[serde(default = "default_true")]
    pub enable_usenet: bool,
    #[serde(default = "default_true")]
    pub enable_torrent: bool,
    /// Minutes a usenet release must age before it is grabbed.
    #[serde(default)]
    pub usenet_delay_minutes: i64,
    #[serde(default)]
    pub torrent_delay_minutes: i64,
    /// Grab immediately when the release is the profile's best quality.
    #[serde(default = "default_true")]
    pub bypass_if_highest_quality: bool,
}

fn default_preferred_protocol() -> Protocol {
    Protocol::Usenet
}

fn default_true() -> bool {
    true
}

impl Default for DelayProfile {
    fn default() -> Self {
        Self {
            preferred_protocol: default_preferred_protocol(),
            enable_usenet: true,
            enable_torrent: true,
            usenet_delay_minutes: 0,
            torrent_delay_minutes: 0,
            bypass_if_highest_quality: true,
        }
    }
}

impl DelayProfile {
    pub fn is_enabled(&self, protocol: Protocol) -> bool {
        match protocol {
            Protocol::Usenet => self.enable_usenet,
            Protocol::Torrent => self.enable_torrent,
            Protocol::Unknown => true,
        }
    }

    pub fn delay_minutes(&self, protocol: Protocol) -> i64 {
        match protocol {
            Protocol::Usenet => self.usenet_delay_minutes,
            Protocol::Torrent => self.torrent_delay_minutes,
            Protocol::Unknown => 0,
        }
    }

    /// 1 for the preferred protocol, 0 otherwise.
    pub fn protocol_preference(&self, protocol: Protocol) -> i32 {
        i32::from(protocol == self.preferred_protocol)
    }
}

/// Everything a batch of decisions is made against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    #[serde(default)]
    pub catalog: CatalogSnapshot,
    pub quality_profile: QualityProfile,
    #[serde(default)]
    pub delay_profile: DelayProfile,
    #[serde(default)]
    pub custom_formats: Vec<CustomFormat>,
    #[serde(default)]
    pub blocklist: Vec<BlocklistEntry>,
    /// Files already on disk.
    #[serde(default)]
    pub existing_files: Vec<BookFile>,
    /// Downloads already imported.
    #[serde(default)]
    pub history: Vec<ImportedRelease>,
}

impl DecisionSnapshot {
    pub fn new(catalog: CatalogSnapshot, quality_profile: QualityProfile) -> Self {
        Self {
            catalog,
            quality_profile,
            delay_profile: DelayProfile::default(),
            custom_formats: Vec::new(),
            blocklist: Vec::new(),
            existing_files: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Best quality already on disk for a book.
    pub fn existing_quality(&self, book_id: i64) -> Option<Quality> {
        let profile = &self.quality_profile;
        self.existing_files
            .iter()
            .filter(|f| f.book_id == book_id)
            .map(|f| f.quality)
            .max_by_key(|&q| profile.rank(q))
    }
}

/// Read-only state shared by every specification in a batch.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub snapshot: &'a DecisionSnapshot,
    pub criteria: Option<&'a SearchCriteria>,
    pub config: &'a DecisionConfig,
    pub formats: &'a CustomFormatEvaluator,
    /// Reference time for age checks.
    pub now: DateTime<Utc>,
}

impl<'a> EvaluationContext<'a> {
    pub fn profile(&self) -> &'a QualityProfile {
        &self.snapshot.quality_profile
    }

    pub fn is_user_invoked(&self) -> bool {
        self.criteria.is_some_and(|c| c.user_invoked)
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Sort key of an approved candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub format_score: i32,
    pub quality_rank: QualityRank,
    pub protocol_preference: i32,
    /// 0 when unknown.
    pub seeders: u32,
    pub publish_date: DateTime<Utc>,
}

/// A candidate with its decision, as returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadDecision {
    pub candidate: Candidate,
    pub decision: Decision,
    /// Present for approved candidates only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    /// IDs of the custom formats the release satisfies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_formats: Vec<i64>,
}

impl DownloadDecision {
    pub fn approved(&self) -> bool {
        self.decision.approved()
    }
}
