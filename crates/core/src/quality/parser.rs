//! Quality detection from release titles.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::Quality;

/// Format patterns in detection order. The first hit wins.
static QUALITY_PATTERNS: Lazy<Vec<(Quality, Regex)>> = Lazy::new(|| {
    [
        (Quality::Azw3, r"(?i)\bazw3?\b"),
        (Quality::Epub, r"(?i)\bepub\b"),
        (Quality::Mobi, r"(?i)\bmobi\b"),
        (Quality::Pdf, r"(?i)\bpdf\b"),
        (Quality::M4b, r"(?i)\bm4b\b"),
        (Quality::Flac, r"(?i)\bflac\b"),
        (
            Quality::Mp3,
            r"(?i)\bmp3\b|\b(?:32|64|96|128|160|192|256|320)\s?kbps\b",
        ),
    ]
    .into_iter()
    .filter_map(|(quality, pattern)| Regex::new(pattern).ok().map(|re| (quality, re)))
    .collect()
});

/// Detect the format of a release from its title.
///
/// Returns [`Quality::Unknown`] when no format hint is present.
pub fn parse_quality(title: &str) -> Quality {
    // Underscores are word characters for `\b`, scene titles use them as separators.
    let normalized = title.replace('_', " ");

    QUALITY_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&normalized))
        .map(|(quality, _)| *quality)
        .unwrap_or_default()
}
