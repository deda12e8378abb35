//! Raw release records supplied by the indexer collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transfer protocol of a release.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    #[default]
    Unknown,
    Usenet,
    Torrent,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Unknown => write!(f, "unknown"),
            Protocol::Usenet => write!(f, "usenet"),
            Protocol::Torrent => write!(f, "torrent"),
        }
    }
}

/// A release as listed by an indexer or RSS feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseInfo {
    /// Release title as published.
    pub title: String,
    /// Size in bytes (0 when the indexer did not report one).
    #[serde(default)]
    pub size_bytes: u64,
    /// When the release was published on the indexer.
    pub publish_date: DateTime<Utc>,
    /// Where the download client fetches it from (NZB/torrent URL or magnet).
    #[serde(default)]
    pub download_uri: String,
    /// Indexer that returned the release.
    pub indexer_id: i64,
    /// Indexer display name.
    #[serde(default)]
    pub indexer: String,
    pub protocol: Protocol,
    /// Seeders (torrents only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeders: Option<u32>,
    /// Info hash (torrents only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
}

impl ReleaseInfo {
    /// Age of the release in whole minutes at `now` (never negative).
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.publish_date).num_minutes().max(0)
    }

    /// Lowercased info hash, if the indexer provided a non-empty one.
    pub fn normalized_info_hash(&self) -> Option<String> {
        self.info_hash
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_lowercase)
    }
}
