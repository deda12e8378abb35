//! Parsed release information.

use serde::{Deserialize, Serialize};

use crate::quality::Quality;

/// Structured fields extracted from a release title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedBookInfo {
    /// The title the fields were extracted from. Never empty.
    pub release_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Detected format, `Unknown` when the title carries none.
    #[serde(default)]
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_group: Option<String>,
    /// The release bundles many books of one author ("complete", box sets,
    /// book ranges). Book-level matching is skipped for these.
    #[serde(default)]
    pub discography: bool,
}
