//! "Last, First" sort-key transform for personal names.

const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "mx", "dr", "prof", "sir", "dame", "rev", "lady", "lord",
];

const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

const ORGANIZATION_MARKERS: &[&str] = &[
    "inc", "llc", "ltd", "corp", "co", "company", "press", "publishing", "publishers",
];

const SURNAME_PARTICLES: &[&str] = &[
    "van", "von", "da", "de", "del", "della", "di", "du", "la", "le", "der", "den", "ter", "st",
];

/// Lowercase a token and drop trailing punctuation (`.` and `,`).
fn bare(token: &str) -> String {
    token
        .trim_end_matches(['.', ','])
        .to_lowercase()
}

fn is_nickname(token: &str) -> bool {
    token.starts_with(['"', '\u{201C}'])
}

/// Split a name into tokens, keeping quoted nicknames together.
fn tokenize(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut closing_quote: Option<char> = None;

    for c in name.chars() {
        match closing_quote {
            Some(close) => {
                current.push(c);
                if c == close {
                    closing_quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if current.is_empty() {
                    closing_quote = match c {
                        '"' => Some('"'),
                        '\u{201C}' => Some('\u{201D}'),
                        _ => None,
                    };
                }
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn looks_like_organization(tokens: &[String]) -> bool {
    if tokens.iter().any(|t| t == "&") {
        return true;
    }
    tokens
        .last()
        .map(|last| ORGANIZATION_MARKERS.contains(&bare(last).as_str()))
        .unwrap_or(false)
}

/// Reorder a personal name into its "Last, First Middle Suffix" sort form.
///
/// Organization names and names with fewer than two personal tokens are
/// returned unchanged. Leading honorifics are dropped, generational suffixes
/// move to the end, surname particles stay attached to the surname and quoted
/// nicknames keep their position among the given names.
///
/// ```
/// use tomekeeper_core::names::to_last_first;
///
/// assert_eq!(to_last_first("Ursula K. Le Guin"), "Le Guin, Ursula K.");
/// assert_eq!(to_last_first("Senior Inc"), "Senior Inc");
/// ```
pub fn to_last_first(name: &str) -> String {
    let trimmed = name.trim();
    let mut tokens = tokenize(trimmed);

    if tokens.len() < 2 || looks_like_organization(&tokens) {
        return trimmed.to_string();
    }

    let honorifics = tokens
        .iter()
        .take_while(|t| HONORIFICS.contains(&bare(t).as_str()))
        .count();
    tokens.drain(..honorifics);

    let suffix = match tokens.last() {
        Some(last) if tokens.len() > 1 && SUFFIXES.contains(&bare(last).as_str()) => tokens.pop(),
        _ => None,
    };
    if let Some(last) = tokens.last_mut() {
        if suffix.is_some() {
            let without_comma = last.trim_end_matches(',').to_string();
            *last = without_comma;
        }
    }

    // Already in sorted form ("Doe, Jane").
    if tokens.iter().any(|t| t.ends_with(',')) {
        return trimmed.to_string();
    }

    let personal: Vec<usize> = (0..tokens.len()).filter(|&i| !is_nickname(&tokens[i])).collect();
    if personal.len() < 2 {
        return trimmed.to_string();
    }

    let surname_end = personal[personal.len() - 1];
    let first_personal = personal[0];
    let mut surname_start = surname_end;
    while surname_start > first_personal + 1
        && SURNAME_PARTICLES.contains(&bare(&tokens[surname_start - 1]).as_str())
    {
        surname_start -= 1;
    }

    let surname = tokens[surname_start..=surname_end].join(" ");
    let given: Vec<&str> = tokens[..surname_start]
        .iter()
        .chain(tokens[surname_end + 1..].iter())
        .map(String::as_str)
        .collect();

    let mut result = format!("{}, {}", surname, given.join(" "));
    if let Some(suffix) = suffix {
        result.push(' ');
        result.push_str(&suffix);
    }
    result
}
