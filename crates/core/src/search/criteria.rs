//! Search criteria and indexer query strings.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{Author, Book};
use crate::names::remove_diacritics;

static REPEATED_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+{2,}").unwrap_or_else(|e| panic!("invalid query pattern: {}", e)));

const QUOTE_VARIANTS: &[char] = &['\u{2018}', '\u{2019}', '\u{201B}', '`', '\u{00B4}'];

/// Normalize a title into an indexer query, words joined with `+`.
///
/// Returns the original title when nothing usable is left.
pub fn clean_query_title(title: &str) -> String {
    if title.trim().eq_ignore_ascii_case("various authors") {
        return "VA".to_string();
    }

    let trimmed = title.trim();
    let without_article = match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("the ") => &trimmed[4..],
        _ => trimmed,
    };

    let quoted: String = without_article
        .chars()
        .map(|c| if QUOTE_VARIANTS.contains(&c) { '\'' } else { c })
        .collect();
    let folded = remove_diacritics(&quoted);
    let joined: String = folded
        .chars()
        .map(|c| if is_query_char(c) { c } else { '+' })
        .collect();
    let collapsed = REPEATED_SEPARATOR.replace_all(&joined, "+");
    let cleaned = collapsed.trim_matches('+');

    if cleaned.is_empty() {
        title.to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_query_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// What a search was run for.
///
/// Automatic searches (RSS sync, missing-book sweeps) are not user invoked;
/// searches started from the UI are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCriteria {
    pub author: Author,
    /// Target books, de-duplicated by ID in request order. Empty means any
    /// book by the author.
    #[serde(default)]
    pub books: Vec<Book>,
    /// Only accept monitored authors and books even for user searches.
    #[serde(default)]
    pub monitored_only: bool,
    #[serde(default)]
    pub user_invoked: bool,
    /// The user will pick from the results by hand.
    #[serde(default)]
    pub interactive: bool,
}

impl SearchCriteria {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        let mut unique: Vec<Book> = Vec::with_capacity(books.len());
        for book in books {
            if !unique.iter().any(|b| b.id == book.id) {
                unique.push(book);
            }
        }

        Self {
            author,
            books: unique,
            monitored_only: false,
            user_invoked: false,
            interactive: false,
        }
    }

    pub fn monitored_only(mut self, monitored_only: bool) -> Self {
        self.monitored_only = monitored_only;
        self
    }

    pub fn user_invoked(mut self, user_invoked: bool) -> Self {
        self.user_invoked = user_invoked;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        if interactive {
            self.user_invoked = true;
        }
        self
    }

    /// Query string for the author alone.
    pub fn author_query(&self) -> String {
        clean_query_title(&self.author.name)
    }

    /// One `author+book` query per target book, without duplicates.
    pub fn book_queries(&self) -> Vec<String> {
        let author = self.author_query();
        let mut queries: Vec<String> = Vec::with_capacity(self.books.len());
        for book in &self.books {
            let query = format!("{}+{}", author, clean_query_title(&book.title));
            if !queries.contains(&query) {
                queries.push(query);
            }
        }
        queries
    }

    /// Whether the search targets this book (always true for author searches).
    pub fn wants_book(&self, book_id: i64) -> bool {
        self.books.is_empty() || self.books.iter().any(|b| b.id == book_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_various_authors_alias() {
        assert_eq!(clean_query_title("Various Authors"), "VA");
    }

    #[test]
    fn test_clean_query_title() {
        assert_eq!(clean_query_title("The Way of Kings"), "Way+of+Kings");
        assert_eq!(clean_query_title("Harry Potter: The Philosopher's Stone"), "Harry+Potter+The+Philosopher's+Stone");
        assert_eq!(clean_query_title("Ender\u{2019}s Game"), "Ender's+Game");
        assert_eq!(clean_query_title("Cien años de soledad"), "Cien+anos+de+soledad");
        assert_eq!(clean_query_title("  -- Dune --  "), "Dune");
        assert_eq!(clean_query_title("Theodore"), "Theodore");
    }

    #[test]
    fn test_empty_result_falls_back_to_original() {
        assert_eq!(clean_query_title("!!!"), "!!!");
        assert_eq!(clean_query_title(""), "");
    }

    #[test]
    fn test_undecomposable_letters_are_kept() {
        assert_eq!(clean_query_title("Søren Kierkegaard"), "Søren+Kierkegaard");
        assert_eq!(clean_query_title("Die Straße"), "Die+Straße");
        assert_eq!(clean_query_title("Łukasz Orbitowski"), "Łukasz+Orbitowski");
    }

    #[test]
    fn test_criteria_dedups_books() {
        let author = Author::new(1, "Brandon Sanderson");
        let criteria = SearchCriteria::new(
            author,
            vec![
                Book::new(10, 1, "Elantris"),
                Book::new(11, 1, "Warbreaker"),
                Book::new(10, 1, "Elantris"),
            ],
        );

        assert_eq!(criteria.books.len(), 2);
        assert_eq!(criteria.author_query(), "Brandon+Sanderson");
        assert_eq!(
            criteria.book_queries(),
            vec!["Brandon+Sanderson+Elantris", "Brandon+Sanderson+Warbreaker"]
        );
        assert!(criteria.wants_book(11));
        assert!(!criteria.wants_book(12));
    }

    #[test]
    fn test_author_search_wants_every_book() {
        let criteria = SearchCriteria::new(Author::new(1, "Robin Hobb"), Vec::new())
            .user_invoked(true)
            .monitored_only(true);

        assert!(criteria.wants_book(99));
        assert!(criteria.user_invoked);
        assert!(criteria.monitored_only);
        assert!(criteria.book_queries().is_empty());
    }

    #[test]
    fn test_interactive_implies_user_invoked() {
        let criteria = SearchCriteria::new(Author::new(1, "Robin Hobb"), Vec::new()).interactive(true);
        assert!(criteria.user_invoked);
    }
}
