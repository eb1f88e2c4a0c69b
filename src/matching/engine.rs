// src/matching/engine.rs - Shared canonicalization cascade
//
// exact canonical -> variant -> substring / segment overlap -> fuzzy scorers.
// The first step that produces a candidate wins. Every step is a pure
// function of the input and the (immutable) vocabulary.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::matching::semantic;
use crate::matching::similarity::{extract, ratio};
use crate::models::matching::{FuzzyScorer, MatchCandidate, MatchResult, MatchStrategy};
use crate::utils::constants::{
    CONFIDENCE_EXACT, CONFIDENCE_FUZZY_MAX, CONFIDENCE_FUZZY_MIN, CONFIDENCE_SEGMENT,
    CONFIDENCE_SUBSTRING, CONFIDENCE_VARIANT, CONFIDENCE_VARIANT_EXACT_CASE,
    FUZZY_TOKEN_MATCH_RATIO, MIN_FUZZY_SINGLE_TOKEN_LEN, MIN_SEGMENT_TOKEN_OVERLAP,
    PARTIAL_CUTOFF_DROP, PARTIAL_CUTOFF_FLOOR,
};
use crate::utils::text::alnum_tokens;
use crate::vocabulary::{DomainIndex, VocabularyStore};

/// Words that glue a name together without identifying it.
pub const CONNECTOR_WORDS: [&str; 20] = [
    "dept", "department", "departments", "office", "offices", "of", "the", "and", "for", "division",
    "div", "bureau", "city", "county", "town", "a", "an", "to", "in", "at",
];

/// Tokens that mark a building or location rather than an organizational unit.
pub const LOCATION_KEYWORDS: [&str; 18] = [
    "building", "room", "floor", "suite", "office", "desk", "wing", "unit", "bldg", "rm", "apt",
    "space", "block", "section", "area", "zone", "lot", "station",
];

/// Location tokens that disqualify the input even without a number.
const HARD_LOCATION_KEYWORDS: [&str; 5] = ["room", "suite", "desk", "rm", "apt"];

static LOCATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(room|floor|building|suite|office|bldg|rm|apt|ste)\s*#?\s*\d").unwrap());

static SEGMENT_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:/|&|,|\band\b|-+)\s*").unwrap());

/// True for building/room/suite style strings ("Room 101", "Harbor Building 04B").
pub fn is_location_like(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    if LOCATION_PATTERN.is_match(text) {
        return true;
    }
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    alnum_tokens(text).iter().any(|token| {
        HARD_LOCATION_KEYWORDS.contains(&token.as_str())
            || (has_digit && LOCATION_KEYWORDS.contains(&token.as_str()))
    })
}

/// Inputs too thin to trust a fuzzy score on: nothing alphabetic, a single
/// letter, a single short token, or a location string.
pub fn rejects_before_fuzzy(text: &str) -> bool {
    let tokens: Vec<String> = alnum_tokens(text)
        .into_iter()
        .filter(|t| t.chars().any(|c| c.is_alphabetic()))
        .collect();
    match tokens.as_slice() {
        [] => true,
        [only] => only.chars().count() < MIN_FUZZY_SINGLE_TOKEN_LEN || is_location_like(text),
        _ => is_location_like(text),
    }
}

/// Crude plural folding so "Works"/"Work" and "Mayor's"/"Mayor" line up.
fn stem(token: &str) -> String {
    let t = token.trim_end_matches("'s");
    if t.len() > 3 && t.ends_with('s') && !t.ends_with("ss") {
        t[..t.len() - 1].to_string()
    } else {
        t.to_string()
    }
}

/// Tokens that carry meaning: not a connector, not in `ignored`, two chars or more.
pub fn meaningful_tokens(text: &str, ignored: &[&str]) -> Vec<String> {
    alnum_tokens(text)
        .into_iter()
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !CONNECTOR_WORDS.contains(&t.as_str()) && !ignored.contains(&t.as_str()))
        .map(|t| stem(&t))
        .collect()
}

/// Knobs that differ between the department and title cascades.
#[derive(Debug, Clone)]
pub struct CascadeOptions<'a> {
    /// Threshold in [0, 1]; scorers compare in points
    pub threshold: f64,
    /// Single-token queries may only substring-match single-token labels
    pub single_word_guard: bool,
    /// Extra tokens that never count towards the fuzzy overlap guard
    pub ignored_tokens: &'a [&'a str],
    /// Primary scorers, tried in order at the full cutoff
    pub scorers: &'a [FuzzyScorer],
    /// Whether to fall back to partial-ratio at the lowered cutoff
    pub partial_fallback: bool,
}

impl<'a> CascadeOptions<'a> {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            single_word_guard: false,
            ignored_tokens: &[],
            scorers: &[FuzzyScorer::TokenSet, FuzzyScorer::TokenSort],
            partial_fallback: true,
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.threshold * 100.0
    }

    pub fn partial_cutoff(&self) -> f64 {
        (self.cutoff() - PARTIAL_CUTOFF_DROP).max(PARTIAL_CUTOFF_FLOOR)
    }
}

/// Cascade over one vocabulary, guarded by a domain index.
pub struct MatchingEngine<'a> {
    vocab: &'a VocabularyStore,
    domains: &'a DomainIndex,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(vocab: &'a VocabularyStore, domains: &'a DomainIndex) -> Self {
        Self { vocab, domains }
    }

    /// Step 1: the input already is a canonical label.
    pub fn exact(&self, normalized: &str) -> Option<MatchCandidate> {
        self.vocab
            .is_canonical(normalized)
            .then(|| MatchCandidate::new(normalized, CONFIDENCE_EXACT, MatchStrategy::ExactCanonical))
    }

    /// Step 2: a canonical label differing only in case, or a known variant.
    pub fn variant(&self, normalized: &str) -> Option<MatchCandidate> {
        if let Some(canonical) = self.vocab.canonical_caseless(normalized) {
            return Some(MatchCandidate::new(
                canonical,
                CONFIDENCE_VARIANT_EXACT_CASE,
                MatchStrategy::Variant,
            ));
        }
        self.vocab
            .lookup_variant(normalized)
            .map(|canonical| MatchCandidate::new(canonical, CONFIDENCE_VARIANT, MatchStrategy::Variant))
    }

    /// Step 3a: whole-word containment in either direction. Labels found inside
    /// the input rank by earliest position, then length; labels containing the
    /// input rank after them.
    pub fn substring(&self, normalized: &str, single_word_guard: bool) -> Option<MatchCandidate> {
        let query = alnum_tokens(normalized);
        if query.is_empty() {
            return None;
        }
        let single_word = query.len() == 1;

        let mut best: Option<MatchCandidate> = None;
        for label in self.vocab.labels() {
            let label_tokens = alnum_tokens(label);
            if label_tokens.is_empty() {
                continue;
            }
            if single_word_guard && single_word && label_tokens.len() > 1 {
                continue;
            }

            let candidate = if let Some(pos) = find_run(&query, &label_tokens) {
                MatchCandidate::new(label, CONFIDENCE_SUBSTRING, MatchStrategy::Substring).at(pos)
            } else if find_run(&label_tokens, &query).is_some() {
                MatchCandidate::new(label, CONFIDENCE_SUBSTRING, MatchStrategy::Substring)
            } else {
                continue;
            };

            if best.as_ref().map_or(true, |b| candidate.rank_key() > b.rank_key()) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Step 3b: split on delimiters and look for a label sharing enough
    /// meaningful tokens with one segment.
    pub fn segment_overlap(&self, normalized: &str) -> Option<MatchCandidate> {
        let mut segments: Vec<String> = vec![normalized.to_string()];
        segments.extend(
            SEGMENT_SPLIT
                .split(normalized)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );

        // (overlap, coverage per mille, label length) -> label
        let mut best: Option<((usize, usize, usize), &str)> = None;
        for segment in &segments {
            let seg_tokens: HashSet<String> = meaningful_tokens(segment, &[]).into_iter().collect();
            if seg_tokens.is_empty() {
                continue;
            }
            for label in self.vocab.labels() {
                let label_tokens: HashSet<String> = meaningful_tokens(label, &[]).into_iter().collect();
                if label_tokens.is_empty() {
                    continue;
                }
                let required = if label.to_lowercase().contains("office") {
                    1
                } else {
                    MIN_SEGMENT_TOKEN_OVERLAP
                };
                let overlap = seg_tokens.intersection(&label_tokens).count();
                if overlap < required {
                    continue;
                }
                let coverage = overlap * 1000 / label_tokens.len();
                let key = (overlap, coverage, label.len());
                if best.map_or(true, |(k, _)| key > k) {
                    best = Some((key, label));
                }
            }
        }

        best.map(|(_, label)| MatchCandidate::new(label, CONFIDENCE_SEGMENT, MatchStrategy::Segment))
    }

    /// Step 4: ranked fuzzy scorers. Within a scorer, candidates are tried
    /// best-first until one passes the overlap guard and the safeguard.
    pub fn fuzzy(&self, normalized: &str, options: &CascadeOptions) -> Option<MatchCandidate> {
        let query_tokens = meaningful_tokens(normalized, options.ignored_tokens);
        if query_tokens.is_empty() {
            return None;
        }

        let mut passes: Vec<(FuzzyScorer, f64)> =
            options.scorers.iter().map(|s| (*s, options.cutoff())).collect();
        if options.partial_fallback {
            passes.push((FuzzyScorer::Partial, options.partial_cutoff()));
        }

        for (scorer, cutoff) in passes {
            for (label, score) in extract(normalized, self.vocab.labels(), scorer, cutoff, usize::MAX) {
                if !tokens_overlap(&query_tokens, &meaningful_tokens(label, options.ignored_tokens)) {
                    debug!("Fuzzy {:?} candidate '{}' for '{}' rejected: no meaningful overlap", scorer, label, normalized);
                    continue;
                }
                if semantic::conflicts(self.domains, normalized, label) {
                    debug!("Fuzzy {:?} candidate '{}' for '{}' vetoed by safeguard", scorer, label, normalized);
                    continue;
                }
                return Some(MatchCandidate::new(
                    label,
                    fuzzy_confidence(score),
                    MatchStrategy::Fuzzy(scorer),
                ));
            }
        }
        None
    }

    /// Full cascade over an already-normalized input.
    pub fn run(&self, raw: &str, normalized: &str, options: &CascadeOptions) -> MatchResult {
        if normalized.trim().is_empty() || self.vocab.is_empty() {
            return MatchResult::no_match(raw, normalized);
        }

        let found = self
            .exact(normalized)
            .or_else(|| self.variant(normalized))
            .or_else(|| self.substring(normalized, options.single_word_guard))
            .or_else(|| self.segment_overlap(normalized))
            .or_else(|| {
                if rejects_before_fuzzy(normalized) {
                    debug!("'{}' rejected before fuzzy matching", normalized);
                    None
                } else {
                    self.fuzzy(normalized, options)
                }
            });

        match found {
            Some(candidate) => {
                debug!(
                    "Matched '{}' -> '{}' via {:?} ({:.2})",
                    normalized, candidate.label, candidate.strategy, candidate.score
                );
                let confidence = candidate.score;
                MatchResult::from_candidate(raw, normalized, candidate, confidence)
            }
            None => MatchResult::no_match(raw, normalized),
        }
    }
}

/// Index of the first run of `needle` inside `haystack`.
fn find_run(haystack: &[String], needle: &[String]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Any query token close enough to any label token ("polce" ~ "police").
fn tokens_overlap(query: &[String], label: &[String]) -> bool {
    query.iter().any(|q| {
        label
            .iter()
            .any(|l| q == l || ratio(q, l) >= FUZZY_TOKEN_MATCH_RATIO)
    })
}

fn fuzzy_confidence(score: f64) -> f64 {
    let span = CONFIDENCE_FUZZY_MAX - CONFIDENCE_FUZZY_MIN;
    (CONFIDENCE_FUZZY_MIN + span * (score / 100.0)).clamp(0.0, CONFIDENCE_FUZZY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::builtin;

    #[test]
    fn test_location_and_segment_patterns_compile() {
        assert!(LOCATION_PATTERN.is_match("Suite 200"));
        assert_eq!(SEGMENT_SPLIT.split("Parks / Recreation").count(), 2);
    }

    fn run(input: &str) -> MatchResult {
        let vocab = builtin::department_vocabulary();
        let domains = builtin::domain_index();
        MatchingEngine::new(&vocab, &domains).run(input, input, &CascadeOptions::new(0.6))
    }

    #[test]
    fn test_exact_canonical_is_idempotent() {
        let vocab = builtin::department_vocabulary();
        for label in vocab.labels() {
            let result = run(label);
            assert_eq!(result.canonical.as_deref(), Some(label));
            assert_eq!(result.confidence, 1.0);
            assert_eq!(result.strategy, MatchStrategy::ExactCanonical);
        }
    }

    #[test]
    fn test_variant_confidence_by_case() {
        let result = run("POLICE");
        assert_eq!(result.canonical.as_deref(), Some("Police"));
        assert_eq!(result.confidence, CONFIDENCE_VARIANT_EXACT_CASE);

        let result = run("Police Department");
        assert_eq!(result.canonical.as_deref(), Some("Police"));
        assert_eq!(result.confidence, CONFIDENCE_VARIANT);
    }

    #[test]
    fn test_substring_prefers_earliest_then_longest() {
        let result = run("Wastewater Treatment Plant Water Quality");
        assert_eq!(result.canonical.as_deref(), Some("Wastewater"));
        assert_eq!(result.strategy, MatchStrategy::Substring);

        let result = run("Human Resources Benefits Team");
        assert_eq!(result.canonical.as_deref(), Some("Human Resources"));
    }

    #[test]
    fn test_segment_overlap_needs_two_tokens() {
        let vocab = VocabularyStore::from_parts(
            vec![
                crate::vocabulary::CanonicalEntry::new("Veterans Benefits Services", None, &[]),
                crate::vocabulary::CanonicalEntry::new("Mayor's Office", None, &[]),
            ],
            Vec::new(),
            Vec::new(),
        );
        let domains = DomainIndex::default();
        let engine = MatchingEngine::new(&vocab, &domains);

        let hit = engine.segment_overlap("Finance / Benefits for Veterans");
        assert_eq!(hit.map(|c| c.label), Some("Veterans Benefits Services".to_string()));
        assert!(engine.segment_overlap("Benefits Desk").is_none());

        let hit = engine.segment_overlap("Office of Mayor Smith");
        assert_eq!(hit.map(|c| c.label), Some("Mayor's Office".to_string()));
    }

    #[test]
    fn test_fuzzy_catches_typos() {
        let result = run("Polce Dept");
        assert_eq!(result.canonical.as_deref(), Some("Police"));
        assert!(result.strategy.is_fuzzy());
        assert!(result.confidence <= CONFIDENCE_FUZZY_MAX);
    }

    #[test]
    fn test_thin_inputs_never_reach_fuzzy() {
        assert!(rejects_before_fuzzy("X"));
        assert!(rejects_before_fuzzy("Ab"));
        assert!(rejects_before_fuzzy("Suite 200"));
        assert!(rejects_before_fuzzy("12345"));
        assert!(!rejects_before_fuzzy("Polce"));
        assert!(run("Q").canonical.is_none());
    }

    #[test]
    fn test_location_detection() {
        assert!(is_location_like("Room 101"));
        assert!(is_location_like("Harbor Building 04B"));
        assert!(is_location_like("Station 14 Ladder Unit"));
        assert!(!is_location_like("Police"));
        assert!(!is_location_like("Facilities Management"));
    }

    #[test]
    fn test_unrelated_input_has_no_match() {
        let result = run("Quantum Basket Weaving");
        assert!(result.canonical.is_none());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.strategy, MatchStrategy::None);
    }

    #[test]
    fn test_empty_vocabulary_fails_closed() {
        let vocab = VocabularyStore::empty();
        let domains = DomainIndex::default();
        let result = MatchingEngine::new(&vocab, &domains).run("Police", "Police", &CascadeOptions::new(0.6));
        assert!(result.canonical.is_none());
    }

    #[test]
    fn test_deterministic() {
        for input in ["Polce Dept", "Water and Sewer", "Parks / Library", "Station 9"] {
            assert_eq!(run(input), run(input));
        }
    }
}
