//! Bracket stripping.
//!
//! Removes bracketed runs from a string, tolerating interleaved and
//! mismatched bracket families.

/// The four bracket families recognized by [`strip_brackets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BracketFamily {
    Round,
    Square,
    Curly,
    Angle,
}

impl BracketFamily {
    fn index(self) -> usize {
        match self {
            BracketFamily::Round => 0,
            BracketFamily::Square => 1,
            BracketFamily::Curly => 2,
            BracketFamily::Angle => 3,
        }
    }

    /// Classify a character as an opening or closing bracket.
    fn classify(c: char) -> Option<(BracketFamily, bool)> {
        match c {
            '(' => Some((BracketFamily::Round, true)),
            ')' => Some((BracketFamily::Round, false)),
            '[' => Some((BracketFamily::Square, true)),
            ']' => Some((BracketFamily::Square, false)),
            '{' => Some((BracketFamily::Curly, true)),
            '}' => Some((BracketFamily::Curly, false)),
            '<' => Some((BracketFamily::Angle, true)),
            '>' => Some((BracketFamily::Angle, false)),
            _ => None,
        }
    }
}

/// Remove every bracketed run from `input`.
///
/// Open brackets are counted per family. A close bracket whose family has an
/// open bracket closes the innermost open bracket of that family; a close
/// bracket whose family has none closes the innermost open bracket of any
/// family. A close bracket with nothing open is kept as plain text, and an
/// open bracket that never closes swallows the rest of the string.
///
/// The operation is idempotent.
///
/// ```
/// use tomekeeper_core::names::strip_brackets;
///
/// assert_eq!(strip_brackets("Dune (1965) [EPUB]"), "Dune  ");
/// ```
pub fn strip_brackets(input: &str) -> String {
    let mut open_counts = [0usize; 4];
    let mut open_stack: Vec<BracketFamily> = Vec::new();
    let mut output = String::with_capacity(input.len());

    for c in input.chars() {
        match BracketFamily::classify(c) {
            Some((family, true)) => {
                open_counts[family.index()] += 1;
                open_stack.push(family);
            }
            Some((family, false)) => {
                if open_stack.is_empty() {
                    output.push(c);
                    continue;
                }

                let closed = if open_counts[family.index()] > 0 {
                    open_stack
                        .iter()
                        .rposition(|open| *open == family)
                        .map(|pos| open_stack.remove(pos))
                } else {
                    open_stack.pop()
                };

                if let Some(closed) = closed {
                    open_counts[closed.index()] -= 1;
                }
            }
            None => {
                if open_stack.is_empty() {
                    output.push(c);
                }
            }
        }
    }

    output
}
