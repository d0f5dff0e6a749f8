//! Guess evaluation
//!
//! Pure helpers used to compare a guess against the secret word.

/// Normalize free text for comparison: trim and lowercase
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Check whether two strings are exactly one edit apart
///
/// One edit is a single insertion, deletion or substitution, i.e. a
/// Levenshtein distance of 1. Equal strings are not a near miss.
/// Runs in a single pass over both strings.
pub fn is_one_edit_away(a: &str, b: &str) -> bool {
    if a == b {
        return false;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > 1 {
        return false;
    }

    let (mut i, mut j) = (0, 0);
    let mut edits = 0;

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            i += 1;
            j += 1;
            continue;
        }

        edits += 1;
        if edits > 1 {
            return false;
        }

        match a.len().cmp(&b.len()) {
            std::cmp::Ordering::Greater => i += 1,
            std::cmp::Ordering::Less => j += 1,
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }

    if i < a.len() || j < b.len() {
        edits += 1;
    }

    edits == 1
}
