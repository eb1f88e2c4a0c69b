// src/matching/similarity.rs - Token-aware scorers over rapidfuzz
//
// All scorers return points in [0, 100]. Inputs are preprocessed the same way
// everywhere: lowercased, non-alphanumerics turned into spaces, trimmed. The
// Indel ratio itself comes from `rapidfuzz::fuzz::ratio`; this module only
// decides what gets compared with it.

use rapidfuzz::fuzz;

use crate::models::matching::FuzzyScorer;
use crate::utils::text::alnum_tokens;

fn preprocess(text: &str) -> String {
    alnum_tokens(text).join(" ")
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    fuzz::ratio(a.iter().copied(), b.iter().copied())
}

fn ratio_processed(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return if a.is_empty() && b.is_empty() { 100.0 } else { 0.0 };
    }
    fuzz::ratio(a.chars(), b.chars())
}

/// Normalized Indel similarity of the whole strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_processed(&preprocess(a), &preprocess(b))
}

/// Best alignment of the shorter string against any window of the longer one,
/// including windows hanging off either end.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = preprocess(a).chars().collect();
    let b: Vec<char> = preprocess(b).chars().collect();
    if a.is_empty() || b.is_empty() {
        return ratio_chars(&a, &b);
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let ls = short.len();
    let ll = long.len();

    let mut best: f64 = 0.0;
    for start in 0..=(ll - ls) {
        best = best.max(ratio_chars(short, &long[start..start + ls]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    for k in 1..ls {
        best = best.max(ratio_chars(short, &long[..k]));
        best = best.max(ratio_chars(short, &long[ll - k..]));
    }
    best
}

/// Ratio after sorting the tokens of both sides.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut ta = alnum_tokens(a);
    let mut tb = alnum_tokens(b);
    ta.sort();
    tb.sort();
    ratio_processed(&ta.join(" "), &tb.join(" "))
}

/// Set-based ratio: shared tokens count once, and a subset relation scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let mut ta = alnum_tokens(a);
    let mut tb = alnum_tokens(b);
    ta.sort();
    ta.dedup();
    tb.sort();
    tb.dedup();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let sect: Vec<&str> = ta.iter().filter(|t| tb.contains(t)).map(String::as_str).collect();
    let diff_ab: Vec<&str> = ta.iter().filter(|t| !tb.contains(t)).map(String::as_str).collect();
    let diff_ba: Vec<&str> = tb.iter().filter(|t| !ta.contains(t)).map(String::as_str).collect();

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect_str = sect.join(" ");
    let join = |diff: &[&str]| -> String {
        if sect_str.is_empty() {
            diff.join(" ")
        } else {
            format!("{} {}", sect_str, diff.join(" "))
        }
    };
    let combined_ab = join(&diff_ab);
    let combined_ba = join(&diff_ba);

    let mut best = ratio_processed(&combined_ab, &combined_ba);
    if !sect_str.is_empty() {
        best = best
            .max(ratio_processed(&sect_str, &combined_ab))
            .max(ratio_processed(&sect_str, &combined_ba));
    }
    best
}

pub fn score_with(scorer: FuzzyScorer, a: &str, b: &str) -> f64 {
    match scorer {
        FuzzyScorer::TokenSet => token_set_ratio(a, b),
        FuzzyScorer::TokenSort => token_sort_ratio(a, b),
        FuzzyScorer::Partial => partial_ratio(a, b),
    }
}

/// Up to `limit` choices at or above `cutoff`, best first, stable on ties.
pub fn extract<'a, I>(query: &str, choices: I, scorer: FuzzyScorer, cutoff: f64, limit: usize) -> Vec<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&'a str, f64)> = choices
        .into_iter()
        .map(|choice| (choice, score_with(scorer, query, choice)))
        .filter(|(_, score)| *score >= cutoff)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("police", "police"), 100.0);
        assert!(close(ratio("polce", "police"), 90.91));
        assert_eq!(ratio("abc", ""), 0.0);
        assert!(close(ratio("alice smith", "bob jones"), 20.0));
    }

    #[test]
    fn test_ratio_delegates_to_rapidfuzz_on_clean_text() {
        let expected = fuzz::ratio("public works".chars(), "public work".chars());
        assert_eq!(ratio("Public Works", "public-work"), expected);
        assert_eq!(ratio("", ""), 100.0);
    }

    #[test]
    fn test_partial_ratio_finds_typo_window() {
        assert!(close(partial_ratio("Polce Dept", "Police"), 83.33));
        assert_eq!(partial_ratio("fire", "fire department"), 100.0);
    }

    #[test]
    fn test_token_sort_ignores_order() {
        assert_eq!(token_sort_ratio("Works Public", "public works"), 100.0);
    }

    #[test]
    fn test_token_set_subset_is_perfect() {
        assert_eq!(token_set_ratio("Police Department", "police"), 100.0);
        assert!(close(token_set_ratio("Polce Dept", "Police"), 62.5));
    }

    #[test]
    fn test_extract_respects_cutoff_and_order() {
        let choices = ["Finance", "Fire", "Police"];
        let best = extract("polce", choices.iter().copied(), FuzzyScorer::TokenSort, 60.0, 1);
        assert_eq!(best.first().map(|(c, _)| *c), Some("Police"));
        assert!(extract("zzz", choices.iter().copied(), FuzzyScorer::TokenSort, 60.0, 1).is_empty());
    }

    #[test]
    fn test_extract_limit() {
        let choices = ["Public Works", "Public Safety", "Police"];
        let found = extract("public works", choices.iter().copied(), FuzzyScorer::TokenSort, 50.0, 2);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "Public Works");
    }
}
