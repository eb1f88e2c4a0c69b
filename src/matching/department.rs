// src/matching/department.rs - Department canonicalization
//
// Order: exact canonical, leading abbreviation, location rejection, keyword
// shortcut, then the shared engine cascade (variant, substring, segment,
// fuzzy). Anything left over keeps its cleaned text at low confidence.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::errors::{validate_threshold, CanonError};
use crate::matching::engine::{is_location_like, CascadeOptions, MatchingEngine};
use crate::matching::similarity::{extract, token_sort_ratio};
use crate::models::matching::{DepartmentResult, FuzzyScorer, MatchCandidate, MatchStrategy};
use crate::utils::constants::{
    CONFIDENCE_EXACT, DEPT_CONFIDENCE_MATCH, DEPT_CONFIDENCE_OVERRIDE, DEPT_CONFIDENCE_REJECTED,
    DEPT_CONFIDENCE_UNMATCHED,
};
use crate::utils::text::{collapse_whitespace, smart_title_case};
use crate::vocabulary::CanonContext;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap());
static EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:ext|x|extension)[\s.]*\d+\b").unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static SYMBOL_WRAPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#|]+").unwrap());
static SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*").unwrap());
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());
static LEADING_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,}[\s\-]*").unwrap());
static CONTACT_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\breach\s+(?:me|us)\s+at\b|\bcontact\s+(?:me|us)\b|\be-?mail\b|\bphone\b|\btel\b|\bcell\b").unwrap()
});

const SEPARATOR_NOISE: &[char] = &[' ', '-', '_', ',', '.', ';', ':'];

/// Strip contact noise, codes and symbols from a raw department string and
/// title-case what is left. `None` when nothing survives.
pub fn normalize_department(raw: &str) -> Option<String> {
    let text = HTML_TAG.replace_all(raw, " ").into_owned();
    let text = PHONE.replace_all(&text, "").into_owned();
    let text = EXTENSION.replace_all(&text, "").into_owned();
    let text = EMAIL.replace_all(&text, "").into_owned();
    let text = SYMBOL_WRAPPER.replace_all(&text, " ").into_owned();
    let text = SLASH.replace_all(&text, " / ").into_owned();
    let mut text = DASH_RUN.replace_all(&text, " ").into_owned();

    let contact_at = CONTACT_PHRASE.find(&text).map(|m| m.start());
    if let Some(cut) = contact_at {
        text.truncate(cut);
    }

    let text = LEADING_CODE.replace_all(text.trim(), "").into_owned();
    let text = collapse_whitespace(text.trim_matches(SEPARATOR_NOISE));
    let text = text.trim_matches(SEPARATOR_NOISE);
    if text.is_empty() {
        return None;
    }
    Some(smart_title_case(text))
}

/// Leading-token abbreviation ("HR Dept" -> Human Resources). Numeric tokens
/// are skipped; only the first meaningful token is consulted.
fn leading_abbreviation<'a>(ctx: &'a CanonContext, normalized: &str) -> Option<&'a str> {
    let token = normalized
        .split_whitespace()
        .map(|t| t.trim_matches('.'))
        .find(|t| !t.is_empty() && !t.chars().all(|c| c.is_ascii_digit()))?;
    ctx.departments.abbreviation(token)
}

fn finish(
    ctx: &CanonContext,
    raw: &str,
    normalized: &str,
    candidate: Option<MatchCandidate>,
    confidence: f64,
) -> DepartmentResult {
    let (canonical, strategy) = match candidate {
        Some(c) => (Some(c.label), c.strategy),
        None => (None, MatchStrategy::None),
    };
    let category = canonical
        .as_deref()
        .and_then(|c| ctx.departments.category(c))
        .map(str::to_lowercase);
    DepartmentResult {
        raw: raw.to_string(),
        normalized: Some(normalized.to_string()),
        canonical,
        category,
        confidence,
        strategy,
        is_override: false,
    }
}

fn compute(ctx: &CanonContext, raw: &str, threshold: f64) -> DepartmentResult {
    let normalized = match normalize_department(raw) {
        Some(n) => n,
        None => return DepartmentResult::empty(raw),
    };
    let engine = MatchingEngine::new(&ctx.departments, &ctx.domains);

    if let Some(hit) = engine.exact(&normalized) {
        return finish(ctx, raw, &normalized, Some(hit), CONFIDENCE_EXACT);
    }

    if let Some(canonical) = leading_abbreviation(ctx, &normalized) {
        let hit = MatchCandidate::new(canonical, DEPT_CONFIDENCE_MATCH, MatchStrategy::Abbreviation);
        return finish(ctx, raw, &normalized, Some(hit), DEPT_CONFIDENCE_MATCH);
    }

    if is_location_like(&normalized) {
        debug!("Department '{}' looks like a location; rejecting", normalized);
        let mut result = finish(ctx, raw, &normalized, None, DEPT_CONFIDENCE_REJECTED);
        result.strategy = MatchStrategy::Rejected;
        return result;
    }

    if let Some(canonical) = ctx.departments.keyword_shortcut(&normalized) {
        let hit = MatchCandidate::new(canonical, DEPT_CONFIDENCE_MATCH, MatchStrategy::Keyword);
        return finish(ctx, raw, &normalized, Some(hit), DEPT_CONFIDENCE_MATCH);
    }

    // Variant, substring, segment and fuzzy steps come from the shared cascade;
    // only the confidence bands are department-specific.
    let cascaded = engine.run(raw, &normalized, &CascadeOptions::new(threshold));
    let strategy = cascaded.strategy;
    let confidence = match strategy {
        MatchStrategy::Variant => cascaded.confidence,
        _ if cascaded.is_match() => DEPT_CONFIDENCE_MATCH,
        _ => DEPT_CONFIDENCE_UNMATCHED,
    };
    let hit = cascaded
        .canonical
        .map(|label| MatchCandidate::new(label, confidence, strategy));
    finish(ctx, raw, &normalized, hit, confidence)
}

/// Canonicalize a department. Blank input yields an empty result; an
/// out-of-range threshold is an error.
pub fn resolve(ctx: &CanonContext, raw: &str, threshold: f64) -> Result<DepartmentResult, CanonError> {
    validate_threshold(threshold)?;
    if raw.trim().is_empty() {
        return Ok(DepartmentResult::empty(raw));
    }
    let key = CanonContext::memo_key(raw, threshold);
    Ok(ctx.cached_department(key, || compute(ctx, raw, threshold)))
}

/// Like [`resolve`], but a caller-supplied override keyed on the normalized
/// name (case-insensitively) wins over the vocabulary.
pub fn resolve_with_overrides(
    ctx: &CanonContext,
    raw: &str,
    threshold: f64,
    overrides: &HashMap<String, String>,
) -> Result<DepartmentResult, CanonError> {
    validate_threshold(threshold)?;
    if raw.trim().is_empty() {
        return Ok(DepartmentResult::empty(raw));
    }

    if let Some(normalized) = normalize_department(raw) {
        let lowered = normalized.to_lowercase();
        let hit = overrides
            .get(&normalized)
            .or_else(|| overrides.iter().find(|(k, _)| k.to_lowercase() == lowered).map(|(_, v)| v));
        if let Some(target) = hit {
            let category = ctx.departments.category(target).map(str::to_lowercase);
            return Ok(DepartmentResult {
                raw: raw.to_string(),
                normalized: Some(normalized),
                canonical: Some(target.clone()),
                category,
                confidence: DEPT_CONFIDENCE_OVERRIDE,
                strategy: MatchStrategy::Override,
                is_override: true,
            });
        }
    }
    resolve(ctx, raw, threshold)
}

/// Up to `top_n` canonical departments ranked by token-sort similarity.
pub fn find_all_matches(
    ctx: &CanonContext,
    raw: &str,
    threshold: f64,
    top_n: usize,
) -> Result<Vec<String>, CanonError> {
    validate_threshold(threshold)?;
    let normalized = match normalize_department(raw) {
        Some(n) => n,
        None => return Ok(Vec::new()),
    };
    if ctx.departments.is_canonical(&normalized) {
        return Ok(vec![normalized]);
    }
    Ok(extract(
        &normalized,
        ctx.departments.labels(),
        FuzzyScorer::TokenSort,
        threshold * 100.0,
        top_n,
    )
    .into_iter()
    .map(|(label, _)| label.to_string())
    .collect())
}

/// Token-sort similarity of two department names in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    token_sort_ratio(a, b) / 100.0
}

/// Category of a canonical department ("Police" -> "Public Safety").
pub fn category<'a>(ctx: &'a CanonContext, canonical: &str) -> Option<&'a str> {
    ctx.departments.category(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CanonContext;

    fn ctx() -> CanonContext {
        CanonContext::builtin()
    }

    #[test]
    fn test_cleanup_patterns_compile() {
        let patterns: [&Regex; 9] = [
            &HTML_TAG, &PHONE, &EXTENSION, &EMAIL, &SYMBOL_WRAPPER, &SLASH, &DASH_RUN, &LEADING_CODE,
            &CONTACT_PHRASE,
        ];
        for re in patterns {
            assert!(!re.as_str().is_empty());
        }
        assert!(CONTACT_PHRASE.is_match("call my cell"));
    }

    #[test]
    fn test_normalize_department() {
        assert_eq!(
            normalize_department("000171 - Supervisor 850-123-1234 ext 200").as_deref(),
            Some("Supervisor")
        );
        assert_eq!(normalize_department("Public Works 850-123-1234").as_deref(), Some("Public Works"));
        assert_eq!(normalize_department("  City  Clerk  ").as_deref(), Some("City Clerk"));
        assert_eq!(
            normalize_department("<b>Finance</b> reach me at jdoe@city.gov").as_deref(),
            Some("Finance")
        );
        assert_eq!(normalize_department("###PARKS###").as_deref(), Some("Parks"));
        assert_eq!(normalize_department("Planning/Zoning").as_deref(), Some("Planning / Zoning"));
        assert_eq!(normalize_department("---"), None);
    }

    #[test]
    fn test_typo_resolves_with_confidence() {
        let result = resolve(&ctx(), "Polce Dept", 0.6).unwrap();
        assert_eq!(result.canonical.as_deref(), Some("Police"));
        assert!(result.confidence >= 0.75);
        assert_eq!(result.category.as_deref(), Some("public safety"));
    }

    #[test]
    fn test_location_is_rejected() {
        let result = resolve(&ctx(), "Station #14 - Ladder Unit", 0.6).unwrap();
        assert!(result.canonical.is_none());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.strategy, MatchStrategy::Rejected);

        let result = resolve(&ctx(), "Room 101", 0.6).unwrap();
        assert!(result.canonical.is_none());
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let ctx = ctx();
        let labels: Vec<String> = ctx.departments.labels().map(str::to_string).collect();
        for label in labels {
            let result = resolve(&ctx, &label, 0.6).unwrap();
            assert_eq!(result.canonical.as_deref(), Some(label.as_str()));
            assert_eq!(result.confidence, 1.0);
        }
    }

    #[test]
    fn test_abbreviation_and_keyword_shortcuts() {
        let ctx = ctx();
        let hr = resolve(&ctx, "HR Dept", 0.6).unwrap();
        assert_eq!(hr.canonical.as_deref(), Some("Human Resources"));
        assert_eq!(hr.strategy, MatchStrategy::Abbreviation);

        let sheriff = resolve(&ctx, "Madison County Sheriff Patrol Division", 0.6).unwrap();
        assert_eq!(sheriff.canonical.as_deref(), Some("Sheriff"));
        assert_eq!(sheriff.strategy, MatchStrategy::Keyword);

        let transit = resolve(&ctx, "Regional Transit", 0.6).unwrap();
        assert_eq!(transit.canonical.as_deref(), Some("Transportation Services"));
    }

    #[test]
    fn test_confidence_bands() {
        let ctx = ctx();
        let variant = resolve(&ctx, "Dept of Public Works", 0.6).unwrap();
        assert_eq!(variant.canonical.as_deref(), Some("Public Works"));
        assert!(variant.confidence >= 0.90);

        let substring = resolve(&ctx, "Water Quality Lab", 0.6).unwrap();
        assert_eq!(substring.canonical.as_deref(), Some("Water"));
        assert_eq!(substring.confidence, DEPT_CONFIDENCE_MATCH);

        let unmatched = resolve(&ctx, "Quantum Basket Weaving", 0.6).unwrap();
        assert!(unmatched.canonical.is_none());
        assert_eq!(unmatched.normalized.as_deref(), Some("Quantum Basket Weaving"));
        assert_eq!(unmatched.confidence, DEPT_CONFIDENCE_UNMATCHED);
    }

    #[test]
    fn test_cascade_steps_follow_the_shared_engine() {
        let ctx = ctx();
        let engine = MatchingEngine::new(&ctx.departments, &ctx.domains);
        for raw in ["Dept of Public Works", "Water Quality Lab", "Polce Dept", "Quantum Basket Weaving"] {
            let normalized = normalize_department(raw).unwrap();
            let shared = engine.run(raw, &normalized, &CascadeOptions::new(0.6));
            let resolved = resolve(&ctx, raw, 0.6).unwrap();
            assert_eq!(resolved.canonical, shared.canonical, "{}", raw);
            assert_eq!(resolved.strategy, shared.strategy, "{}", raw);
        }
    }

    #[test]
    fn test_blank_and_invalid_inputs() {
        let ctx = ctx();
        let blank = resolve(&ctx, "   ", 0.6).unwrap();
        assert!(blank.canonical.is_none());
        assert!(blank.normalized.is_none());

        assert!(resolve(&ctx, "Police", 1.5).is_err());
        assert!(resolve(&ctx, "Police", -0.1).is_err());
        assert!(resolve(&ctx, "", f64::NAN).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let ctx = ctx();
        let mut overrides = HashMap::new();
        overrides.insert("Human Resources".to_string(), "People Operations".to_string());

        let result = resolve_with_overrides(&ctx, "human resources", 0.6, &overrides).unwrap();
        assert_eq!(result.canonical.as_deref(), Some("People Operations"));
        assert!(result.is_override);
        assert_eq!(result.confidence, DEPT_CONFIDENCE_OVERRIDE);

        let result = resolve_with_overrides(&ctx, "Finance", 0.6, &overrides).unwrap();
        assert!(!result.is_override);
    }

    #[test]
    fn test_find_all_and_similarity() {
        let ctx = ctx();
        let found = find_all_matches(&ctx, "Public Works", 0.5, 3).unwrap();
        assert_eq!(found, vec!["Public Works".to_string()]);

        let found = find_all_matches(&ctx, "Publik Works", 0.5, 3).unwrap();
        assert_eq!(found.first().map(String::as_str), Some("Public Works"));

        assert_eq!(similarity("Public Works", "public works"), 1.0);
        assert_eq!(similarity("", "Police"), 0.0);
        assert_eq!(category(&ctx, "Water"), Some("Infrastructure"));
    }
}
