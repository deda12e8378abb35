//! Catalog snapshot types.
//!
//! These are supplied by the catalog collaborator once per decision batch
//! and never mutated by the core.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::names::clean_name;
use crate::quality::Quality;
use crate::release::Protocol;

// ============================================================================
// Authors and Books
// ============================================================================

/// A wanted author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    /// Catalog ID.
    pub id: i64,
    /// Canonical display name.
    pub name: String,
    /// Normalized name used for matching. Derived from `name` when empty.
    #[serde(default)]
    pub clean_name: String,
    /// ID in the external metadata source.
    #[serde(default)]
    pub foreign_author_id: String,
    /// Whether new releases for this author are wanted.
    #[serde(default = "default_monitored")]
    pub monitored: bool,
}

fn default_monitored() -> bool {
    true
}

impl Author {
    /// Create a monitored author with a derived clean name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            clean_name: clean_name(&name),
            name,
            foreign_author_id: String::new(),
            monitored: true,
        }
    }

    /// The clean name, derived on the fly if the snapshot omitted it.
    pub fn matching_name(&self) -> Cow<'_, str> {
        if self.clean_name.is_empty() {
            Cow::Owned(clean_name(&self.name))
        } else {
            Cow::Borrowed(&self.clean_name)
        }
    }
}

/// A wanted book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Catalog ID.
    pub id: i64,
    /// Owning author.
    pub author_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default = "default_monitored")]
    pub monitored: bool,
}

impl Book {
    /// Create a monitored book with no release date.
    pub fn new(id: i64, author_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            author_id,
            title: title.into(),
            release_date: None,
            monitored: true,
        }
    }

    /// Clean forms of the title: the full title, plus the part before a
    /// subtitle separator when there is one.
    pub fn matching_titles(&self) -> Vec<String> {
        let mut titles = vec![clean_name(&self.title)];
        if let Some((main, _)) = self.title.split_once(':') {
            let main = clean_name(main);
            if !main.is_empty() && !titles.contains(&main) {
                titles.push(main);
            }
        }
        titles
    }

    /// Whether the book was released at `now` (unknown dates count as released).
    pub fn is_released(&self, now: DateTime<Utc>) -> bool {
        self.release_date.map(|d| d <= now).unwrap_or(true)
    }
}

/// Immutable catalog state for one decision batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub books: Vec<Book>,
}

impl CatalogSnapshot {
    pub fn new(authors: Vec<Author>, books: Vec<Book>) -> Self {
        Self { authors, books }
    }

    pub fn author(&self, id: i64) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }

    /// Books owned by an author, in snapshot order.
    pub fn books_by_author(&self, author_id: i64) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |b| b.author_id == author_id)
    }
}

// ============================================================================
// Library State
// ============================================================================

/// A file already on disk for a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookFile {
    pub book_id: i64,
    pub quality: Quality,
}

/// A download that was already imported for a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportedRelease {
    pub book_id: i64,
    /// Release title the import came from.
    pub source_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
}

/// A release that previously failed or was rejected by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlocklistEntry {
    pub author_id: i64,
    pub source_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl BlocklistEntry {
    pub fn new(author_id: i64, source_title: impl Into<String>) -> Self {
        Self {
            author_id,
            source_title: source_title.into(),
            info_hash: None,
            protocol: None,
            date: None,
        }
    }

    /// Whether this entry blocks a release for the given author.
    ///
    /// Info hashes are authoritative when both sides have one; otherwise the
    /// source titles are compared case-insensitively.
    pub fn blocks(&self, author_id: i64, title: &str, info_hash: Option<&str>) -> bool {
        if self.author_id != author_id {
            return false;
        }

        match (self.info_hash.as_deref(), info_hash) {
            (Some(blocked), Some(hash)) if !blocked.is_empty() && !hash.is_empty() => {
                blocked.eq_ignore_ascii_case(hash)
            }
            _ => self.source_title.trim().eq_ignore_ascii_case(title.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_author_new_derives_clean_name() {
        let author = Author::new(1, "The Black Eyed Peas");
        assert_eq!(author.clean_name, "blackeyedpeas");
        assert!(author.monitored);
    }

    #[test]
    fn test_matching_name_falls_back_when_missing() {
        let json = r#"{"id": 3, "name": "Octavia E. Butler"}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert!(author.clean_name.is_empty());
        assert_eq!(author.matching_name(), "octaviaebutler");
        assert!(author.monitored);
    }

    #[test]
    fn test_book_matching_titles_with_subtitle() {
        let book = Book::new(1, 1, "Dune Messiah: The Second Book");
        assert_eq!(book.matching_titles(), vec!["dunemessiahsecondbook", "dunemessiah"]);
    }

    #[test]
    fn test_book_is_released() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut book = Book::new(1, 1, "Future Book");
        assert!(book.is_released(now));

        book.release_date = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert!(!book.is_released(now));
    }

    #[test]
    fn test_books_by_author() {
        let snapshot = CatalogSnapshot::new(
            vec![Author::new(1, "A"), Author::new(2, "B")],
            vec![Book::new(10, 1, "One"), Book::new(11, 2, "Two"), Book::new(12, 1, "Three")],
        );
        let ids: Vec<i64> = snapshot.books_by_author(1).map(|b| b.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(snapshot.author(2).map(|a| a.name.as_str()), Some("B"));
    }

    #[test]
    fn test_blocklist_matches_title_case_insensitively() {
        let entry = BlocklistEntry::new(1, "Author - Book [EPUB]");
        assert!(entry.blocks(1, "author - book [epub]", None));
        assert!(!entry.blocks(2, "Author - Book [EPUB]", None));
        assert!(!entry.blocks(1, "Author - Other [EPUB]", None));
    }

    #[test]
    fn test_blocklist_prefers_info_hash() {
        let mut entry = BlocklistEntry::new(1, "Some Title");
        entry.info_hash = Some("ABCDEF".to_string());
        assert!(entry.blocks(1, "Renamed Title", Some("abcdef")));
        assert!(!entry.blocks(1, "Some Title", Some("123456")));
        // Without a hash on the release, fall back to the title.
        assert!(entry.blocks(1, "Some Title", None));
    }
}
