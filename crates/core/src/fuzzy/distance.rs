//! Edit-distance primitives.

/// Levenshtein edit distance (unit-cost insert, delete, substitute).
///
/// Computes the full dynamic-programming table over `char`s, with no
/// cutoff. Use [`bounded_edit_distance`] when only near matches matter.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, val) in matrix[0].iter_mut().enumerate() {
        *val = j;
    }

    for (i, a_char) in a_chars.iter().enumerate() {
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            matrix[i + 1][j + 1] = (matrix[i][j + 1] + 1)
                .min(matrix[i + 1][j] + 1)
                .min(matrix[i][j] + cost);
        }
    }

    matrix[a_len][b_len]
}

/// Normalized similarity in `[0, 1]`: `1 - distance / longer_length`.
///
/// Symmetric, and 0 when either input is empty.
pub fn fuzzy_match(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - distance as f64 / a_len.max(b_len) as f64
}

/// Edit distance restricted to a diagonal band of width `max_distance`.
///
/// Returns `None` as soon as the distance provably exceeds `max_distance`:
/// when the lengths alone differ by more than that, or when every cell of a
/// row in the band is already above it. Cost is `O(max_distance * len)`
/// instead of `O(len_a * len_b)`.
pub fn bounded_edit_distance(a: &str, b: &str, max_distance: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len.abs_diff(b_len) > max_distance {
        return None;
    }
    if a_len == 0 || b_len == 0 {
        return Some(a_len.max(b_len));
    }

    // Anything above the bound is clamped here so band edges never overflow.
    let outside = max_distance + 1;

    let mut previous = vec![outside; b_len + 1];
    for (j, cell) in previous.iter_mut().enumerate().take(max_distance.min(b_len) + 1) {
        *cell = j;
    }
    let mut current = vec![outside; b_len + 1];

    for i in 1..=a_len {
        let band_start = i.saturating_sub(max_distance).max(1);
        let band_end = (i + max_distance).min(b_len);

        current[band_start - 1] = if band_start == 1 && i <= max_distance {
            i
        } else {
            outside
        };
        let mut row_min = current[band_start - 1];

        for j in band_start..=band_end {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            let value = (previous[j - 1] + cost)
                .min(previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(outside);
            current[j] = value;
            row_min = row_min.min(value);
        }
        if band_end < b_len {
            current[band_end + 1] = outside;
        }

        if row_min > max_distance {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let distance = previous[b_len];
    (distance <= max_distance).then_some(distance)
}
