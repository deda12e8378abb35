//! Name normalization.
//!
//! Two independent transforms live here:
//! - [`strip_brackets`] removes bracketed runs (used before clean-name and
//!   sort-key derivation)
//! - [`to_last_first`] builds the "Last, First" sort form of a personal name
//!
//! plus [`clean_name`], the matching key used to compare names and titles
//! independently of case, punctuation, articles and diacritics.

mod brackets;
mod sort_key;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub use brackets::strip_brackets;
pub use sort_key::to_last_first;

/// Words dropped from clean names.
const CLEAN_NAME_STOP_WORDS: &[&str] = &["a", "an", "the", "and"];

/// Strip diacritics by decomposing (NFD) and dropping combining marks.
pub fn remove_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Build the clean (matching) form of a name or title.
///
/// Bracketed content, diacritics, case, the words "a", "an", "the", "and"
/// and every non-alphanumeric character are removed. If nothing but stop
/// words remain, the stop words are kept.
pub fn clean_name(name: &str) -> String {
    let folded = remove_diacritics(&strip_brackets(name)).to_lowercase();
    let words: Vec<&str> = folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let significant: String = words
        .iter()
        .filter(|w| !CLEAN_NAME_STOP_WORDS.contains(w))
        .copied()
        .collect();

    if significant.is_empty() {
        words.concat()
    } else {
        significant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_diacritics() {
        assert_eq!(remove_diacritics("Gabriel García Márquez"), "Gabriel Garcia Marquez");
        assert_eq!(remove_diacritics("Zoë Brontë"), "Zoe Bronte");
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("The Black Eyed Peas"), "blackeyedpeas");
        assert_eq!(clean_name("J.R.R. Tolkien"), "jrrtolkien");
        assert_eq!(clean_name("Pride and Prejudice (Annotated)"), "prideprejudice");
        assert_eq!(clean_name("Ender's Game"), "endersgame");
    }

    #[test]
    fn test_clean_name_only_stop_words() {
        assert_eq!(clean_name("The The"), "thethe");
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn test_clean_name_folds_diacritics() {
        assert_eq!(clean_name("Gabriel García Márquez"), clean_name("Gabriel Garcia Marquez"));
        assert_eq!(clean_name("Émile Zola"), "emilezola");
    }
}
