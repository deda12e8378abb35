//! Release title parser.
//!
//! Handles both spaced titles ("Andy Weir - Project Hail Mary (2021) [EPUB]")
//! and scene-style titles ("Andy.Weir-Project.Hail.Mary-2021-RETAIL-EPUB-GRP").

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::catalog::Author;
use crate::config::MatchingConfig;
use crate::fuzzy::similarity_within;
use crate::names::{clean_name, strip_brackets};
use crate::quality::parse_quality;

use super::ParsedBookInfo;

fn regex(pattern: &str) -> Regex {
    // Only called with the literal patterns below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid parser pattern {:?}: {}", pattern, e))
}

static FILE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)\.(?:epub|mobi|azw3?|pdf|m4b|mp3|flac|zip|rar|nzb|torrent)$"));

static HASH_LIKE: Lazy<Regex> = Lazy::new(|| regex(r"^[0-9A-Fa-f]{24,}$"));

static LEADING_GROUP: Lazy<Regex> = Lazy::new(|| regex(r"^\[([^\]]+)\]"));

static TRAILING_GROUP: Lazy<Regex> = Lazy::new(|| regex(r"-([A-Za-z0-9]+)$"));

static BRACKETED_YEAR: Lazy<Regex> =
    Lazy::new(|| regex(r"[\(\[\{]\s*((?:18|19|20)\d{2})\s*[\)\]\}]"));

static YEAR_ONLY: Lazy<Regex> = Lazy::new(|| regex(r"^(?:18|19|20)\d{2}$"));

static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| regex(r"\s((?:18|19|20)\d{2})$"));

static DISCOGRAPHY: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?i)\b(?:complete|collection|discography|anthology|omnibus|box ?set|books? ?\d+ ?(?:-|to) ?\d+)\b",
    )
});

static FORMAT_TOKENS: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?i)\b(?:epub|mobi|azw3?|pdf|m4b|mp3|flac|\d{2,3} ?kbps|retail|e-?books?|audiobooks?|unabridged|abridged|kf8|cbr|cbz)\b",
    )
});

static SEGMENT_SEPARATOR: Lazy<Regex> = Lazy::new(|| regex(r"\s+-\s+"));

static BY_SEPARATOR: Lazy<Regex> = Lazy::new(|| regex(r"(?i)\s+by\s+"));

const SEGMENT_TRIM: &[char] = &[' ', '-', ',', ':', ';', '/', '|'];

/// Parses release titles into [`ParsedBookInfo`].
#[derive(Debug, Clone, Default)]
pub struct TitleParser {
    config: MatchingConfig,
}

impl TitleParser {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Parse a title on its own.
    ///
    /// An "Author - Title" separator (or "Title by Author") splits the
    /// author from the book title; otherwise everything is the book title.
    /// Returns `None` for unparseable titles.
    pub fn parse(&self, title: &str) -> Option<ParsedBookInfo> {
        self.parse_inner(title, None)
    }

    /// Parse a title, splitting at the catalog author whose name appears in it.
    ///
    /// When no catalog author is recognized the whole remainder becomes the
    /// book title.
    pub fn parse_with_authors(&self, title: &str, authors: &[Author]) -> Option<ParsedBookInfo> {
        self.parse_inner(title, Some(authors))
    }

    fn parse_inner(&self, title: &str, authors: Option<&[Author]>) -> Option<ParsedBookInfo> {
        let release_title = title.trim();
        if release_title.is_empty() || !release_title.chars().any(char::is_alphabetic) {
            debug!("Unparseable release title {:?}: no text", title);
            return None;
        }

        let without_extension = FILE_EXTENSION.replace(release_title, "");
        if HASH_LIKE.is_match(&without_extension) {
            debug!("Unparseable release title {:?}: looks like a hash", title);
            return None;
        }

        let quality = parse_quality(release_title);
        let (normalized, scene_group) = normalize_separators(&without_extension);
        let release_group = scene_group.or_else(|| {
            LEADING_GROUP
                .captures(&normalized)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|g| is_release_group(g))
        });
        let discography = DISCOGRAPHY.is_match(&normalized);
        let bracketed_year = BRACKETED_YEAR
            .captures_iter(&normalized)
            .last()
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u16>().ok());

        let (segments, trailing_year) = clean_segments(&strip_brackets(&normalized));
        if segments.is_empty() {
            debug!("Unparseable release title {:?}: nothing left after cleanup", title);
            return None;
        }

        let (author_name, book_title) = match authors {
            Some(authors) => self.split_at_catalog_author(&segments, authors),
            None => split_on_separator(&segments),
        };

        Some(ParsedBookInfo {
            release_title: release_title.to_string(),
            author_name,
            book_title: if discography { None } else { book_title },
            year: bracketed_year.or(trailing_year),
            quality,
            release_group,
            discography,
        })
    }

    /// Find the token window that best matches a catalog author and split there.
    fn split_at_catalog_author(
        &self,
        segments: &[String],
        authors: &[Author],
    ) -> (Option<String>, Option<String>) {
        let text = segments.join(" - ");
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let slack = self.config.author_window_slack;

        // (similarity, start, length)
        let mut best: Option<(f64, usize, usize)> = None;

        for author in authors {
            let key = author.matching_name();
            if key.is_empty() {
                continue;
            }

            let spaced = author.name.split_whitespace().count();
            let dotted = author
                .name
                .split(|c: char| c.is_whitespace() || c == '.')
                .filter(|t| !t.is_empty())
                .count();
            let min_len = spaced.min(dotted).saturating_sub(slack).max(1);
            let max_len = (spaced.max(dotted) + slack).min(tokens.len());

            for len in min_len..=max_len {
                for start in 0..=tokens.len() - len {
                    let window = &tokens[start..start + len];
                    if window.contains(&"-") {
                        continue;
                    }
                    let Some(similarity) =
                        similarity_within(&clean_name(&window.join(" ")), &key, self.config.author_threshold)
                    else {
                        continue;
                    };

                    let better = match best {
                        None => true,
                        Some((s, st, l)) => {
                            similarity > s || (similarity == s && (start < st || (start == st && len < l)))
                        }
                    };
                    if better {
                        best = Some((similarity, start, len));
                    }
                }
            }
        }

        match best {
            Some((_, start, len)) => {
                let author = tokens[start..start + len].join(" ");
                let before = trim_edge_tokens(&tokens[..start]);
                let after = trim_edge_tokens(&tokens[start + len..]);
                let title = if after.is_empty() { before } else { after };
                (Some(author), (!title.is_empty()).then_some(title))
            }
            None => (None, Some(text)),
        }
    }
}

/// Parse a title without catalog context.
pub fn parse_title(title: &str) -> Option<ParsedBookInfo> {
    TitleParser::default().parse(title)
}

/// Parse a title, recognizing the author from the given catalog authors.
pub fn parse_title_with_authors(title: &str, authors: &[Author]) -> Option<ParsedBookInfo> {
    TitleParser::default().parse_with_authors(title, authors)
}

/// Turn scene separators into spaces, pulling off a trailing `-GROUP`.
///
/// Titles that already contain whitespace are returned unchanged.
fn normalize_separators(title: &str) -> (String, Option<String>) {
    if title.chars().any(char::is_whitespace) {
        return (title.to_string(), None);
    }

    let mut body = title;
    let mut group = None;
    if let Some(caps) = TRAILING_GROUP.captures(title) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            if whole.start() > 0 && is_release_group(name.as_str()) {
                group = Some(name.as_str().to_string());
                body = &title[..whole.start()];
            }
        }
    }

    let spaced = body.replace(['.', '_'], " ").replace('-', " - ");
    (spaced, group)
}

fn is_release_group(candidate: &str) -> bool {
    !candidate.is_empty()
        && !YEAR_ONLY.is_match(candidate)
        && FORMAT_TOKENS
            .find(candidate)
            .map(|m| m.as_str().len() != candidate.len())
            .unwrap_or(true)
}

/// Split on " - ", drop format tokens and standalone years.
///
/// A year that is a whole segment only counts as a year once an author and
/// a title segment were already seen ("George Orwell - 1984" keeps 1984).
fn clean_segments(text: &str) -> (Vec<String>, Option<u16>) {
    let mut kept: Vec<String> = Vec::new();
    let mut year: Option<u16> = None;

    for raw in SEGMENT_SEPARATOR.split(text) {
        let without_formats = FORMAT_TOKENS.replace_all(raw, " ");
        let mut segment = without_formats
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .trim_matches(SEGMENT_TRIM)
            .to_string();

        if segment.is_empty() {
            continue;
        }

        if YEAR_ONLY.is_match(&segment) {
            if kept.len() >= 2 {
                year = year.or_else(|| segment.parse().ok());
                continue;
            }
            kept.push(segment);
            continue;
        }

        if let Some(caps) = TRAILING_YEAR.captures(&segment) {
            if let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) {
                year = year.or_else(|| digits.as_str().parse().ok());
                segment = segment[..whole.start()].trim_end_matches(SEGMENT_TRIM).to_string();
            }
        }

        if segment.chars().any(char::is_alphanumeric) {
            kept.push(segment);
        }
    }

    (kept, year)
}

fn split_on_separator(segments: &[String]) -> (Option<String>, Option<String>) {
    match segments {
        [] => (None, None),
        [single] => {
            if let Some(m) = BY_SEPARATOR.find(single) {
                let title = single[..m.start()].trim();
                let author = single[m.end()..].trim();
                if !title.is_empty() && !author.is_empty() {
                    return (Some(author.to_string()), Some(title.to_string()));
                }
            }
            (None, Some(single.clone()))
        }
        [author, rest @ ..] => (Some(author.clone()), Some(rest.join(" - "))),
    }
}

/// Join tokens, dropping separator and "by" tokens at both edges.
fn trim_edge_tokens(tokens: &[&str]) -> String {
    let is_edge = |t: &&str| *t == "-" || t.eq_ignore_ascii_case("by");
    let start = tokens.iter().position(|t| !is_edge(t)).unwrap_or(tokens.len());
    let end = tokens.iter().rposition(|t| !is_edge(t)).map(|i| i + 1).unwrap_or(start);
    if start >= end {
        return String::new();
    }
    tokens[start..end]
        .join(" ")
        .trim_matches(SEGMENT_TRIM)
        .to_string()
}
