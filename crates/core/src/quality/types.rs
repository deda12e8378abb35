//! Book quality (format) levels.

use serde::{Deserialize, Serialize};

/// Format of a book release.
///
/// `Unknown` is the sentinel for releases whose title carries no format
/// hint; such releases are still evaluated, never failed outright.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Unknown,
    Pdf,
    Mobi,
    Epub,
    Azw3,
    Mp3,
    M4b,
    Flac,
}

impl Quality {
    /// Human-readable name, as shown in rejection messages.
    pub fn name(&self) -> &'static str {
        match self {
            Quality::Unknown => "Unknown",
            Quality::Pdf => "PDF",
            Quality::Mobi => "MOBI",
            Quality::Epub => "EPUB",
            Quality::Azw3 => "AZW3",
            Quality::Mp3 => "MP3",
            Quality::M4b => "M4B",
            Quality::Flac => "FLAC",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
