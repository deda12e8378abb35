//! Resolution of parsed names and titles against the catalog.
//!
//! A parsed value resolves only when exactly one catalog entry clears the
//! similarity threshold. Zero hits is "not found", several hits is
//! "ambiguous"; the resolver never guesses between close entries.

use serde::{Deserialize, Serialize};

use crate::catalog::{Author, Book};
use crate::config::MatchingConfig;
use crate::names::clean_name;

use super::distance::bounded_edit_distance;

/// Outcome of resolving against a set of catalog entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a, T> {
    /// Exactly one entry matched, with its similarity.
    Matched(&'a T, f64),
    NotFound,
    /// Several entries cleared the threshold.
    Ambiguous(Vec<&'a T>),
}

impl<'a, T> Resolution<'a, T> {
    pub fn matched(&self) -> Option<&'a T> {
        match self {
            Resolution::Matched(entry, _) => Some(*entry),
            _ => None,
        }
    }
}

/// Serializable summary of a resolution, kept on candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    Matched {
        id: i64,
        similarity: f64,
    },
    NotFound,
    Ambiguous {
        ids: Vec<i64>,
    },
    /// Nothing to resolve (no parsed value, or book matching was suppressed).
    #[default]
    Skipped,
}

impl MatchStatus {
    pub fn from_resolution<T>(resolution: &Resolution<'_, T>, id: impl Fn(&T) -> i64) -> Self {
        match resolution {
            Resolution::Matched(entry, similarity) => MatchStatus::Matched {
                id: id(entry),
                similarity: *similarity,
            },
            Resolution::NotFound => MatchStatus::NotFound,
            Resolution::Ambiguous(entries) => MatchStatus::Ambiguous {
                ids: entries.iter().map(|e| id(e)).collect(),
            },
        }
    }
}

/// Similarity of two clean strings, or `None` when it falls below `threshold`.
///
/// Uses the bounded edit distance so clearly dissimilar pairs are discarded
/// without computing the full table.
pub fn similarity_within(query: &str, key: &str, threshold: f64) -> Option<f64> {
    let max_len = query.chars().count().max(key.chars().count());
    if max_len == 0 || query.is_empty() || key.is_empty() {
        return None;
    }

    // Absorb rounding in `1.0 - threshold` so pairs exactly at the threshold pass.
    let max_distance = ((1.0 - threshold) * max_len as f64 + 1e-9).floor() as usize;
    bounded_edit_distance(query, key, max_distance)
        .map(|distance| 1.0 - distance as f64 / max_len as f64)
}

/// Resolve a clean query against entries that each expose one or more clean keys.
fn resolve_by_keys<'a, T, I, K>(query: &str, entries: I, keys: K, threshold: f64) -> Resolution<'a, T>
where
    I: IntoIterator<Item = &'a T>,
    K: Fn(&T) -> Vec<String>,
{
    if query.is_empty() {
        return Resolution::NotFound;
    }

    let mut exact: Vec<&'a T> = Vec::new();
    let mut close: Vec<(&'a T, f64)> = Vec::new();

    for entry in entries {
        let entry_keys = keys(entry);
        if entry_keys.iter().any(|k| k == query) {
            exact.push(entry);
            continue;
        }

        let best = entry_keys
            .iter()
            .filter_map(|k| similarity_within(query, k, threshold))
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
        if let Some(similarity) = best {
            close.push((entry, similarity));
        }
    }

    match exact.len() {
        1 => return Resolution::Matched(exact[0], 1.0),
        n if n > 1 => return Resolution::Ambiguous(exact),
        _ => {}
    }

    match close.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Matched(close[0].0, close[0].1),
        _ => Resolution::Ambiguous(close.into_iter().map(|(entry, _)| entry).collect()),
    }
}

/// Resolves parsed author names and book titles against catalog entries.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    author_threshold: f64,
    book_threshold: f64,
}

impl CatalogResolver {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            author_threshold: config.author_threshold,
            book_threshold: config.book_threshold,
        }
    }

    /// Resolve a parsed author name against catalog authors by clean name.
    pub fn resolve_author<'a>(&self, name: &str, authors: &'a [Author]) -> Resolution<'a, Author> {
        let query = clean_name(name);
        resolve_by_keys(
            &query,
            authors,
            |author| vec![author.matching_name().into_owned()],
            self.author_threshold,
        )
    }

    /// Resolve a parsed book title against an author's books.
    ///
    /// Titles are also compared without their subtitle.
    pub fn resolve_book<'a, I>(&self, title: &str, books: I) -> Resolution<'a, Book>
    where
        I: IntoIterator<Item = &'a Book>,
    {
        let query = clean_name(title);
        resolve_by_keys(&query, books, Book::matching_titles, self.book_threshold)
    }
}

impl Default for CatalogResolver {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}
