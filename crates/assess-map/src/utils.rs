//! Name normalization helpers for column matching.

/// Normalizes a column or field name for comparison: lowercase, trimmed,
/// non-alphanumeric runs collapsed to a single underscore, edge
/// underscores stripped.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Whole-word tokens of a normalized name.
pub fn word_tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split('_').filter(|token| !token.is_empty())
}

/// True when the two normalized names share at least one whole-word token.
pub fn share_token(a: &str, b: &str) -> bool {
    word_tokens(a).any(|token| word_tokens(b).any(|other| other == token))
}

/// Dice coefficient over character bigrams of two normalized names.
///
/// Returns 1.0 for identical non-empty strings and 0.0 when the inputs
/// share no bigrams (including single-character inputs).
pub fn dice_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return if a.is_empty() { 0.0 } else { 1.0 };
    }
    let a_bigrams = bigrams(a);
    let b_bigrams = bigrams(b);
    if a_bigrams.is_empty() || b_bigrams.is_empty() {
        return 0.0;
    }
    let mut remaining = b_bigrams.clone();
    let mut overlap = 0usize;
    for bigram in &a_bigrams {
        if let Some(pos) = remaining.iter().position(|other| other == bigram) {
            remaining.swap_remove(pos);
            overlap += 1;
        }
    }
    (2.0 * overlap as f64) / (a_bigrams.len() + b_bigrams.len()) as f64
}

fn bigrams(s: &str) -> Vec<[char; 2]> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|pair| [pair[0], pair[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_separator_runs() {
        assert_eq!(normalize_name("  First -- Name  "), "first_name");
        assert_eq!(normalize_name("Student ID#"), "student_id");
        assert_eq!(normalize_name("__grade__"), "grade");
    }

    #[test]
    fn shared_tokens_are_whole_words() {
        assert!(share_token("teacher_name", "first_name"));
        assert!(!share_token("grade", "upgraded_level"));
    }

    #[test]
    fn dice_bounds() {
        assert_eq!(dice_similarity("grade", "grade"), 1.0);
        assert_eq!(dice_similarity("bus_route", "first_name"), 0.0);
        let partial = dice_similarity("gradelevel", "grade_level");
        assert!(partial > 0.5 && partial < 1.0, "got {partial}");
    }
}
