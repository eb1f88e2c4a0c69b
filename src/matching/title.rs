// src/matching/title.rs - Three-tier job title resolver
//
// Tier 1 looks the cleaned title up in the real-world job-title set (exact,
// then token-sort fuzzy). Tier 2 walks the curated canonical list: official
// classification titles, variants, guarded substring, guarded fuzzy.
// Department context is applied after the (memoized) cascade: generic single
// words only expand into multi-word titles the context allows.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::errors::{validate_threshold, CanonError};
use crate::matching::engine::{meaningful_tokens, rejects_before_fuzzy, MatchingEngine};
use crate::matching::semantic;
use crate::matching::similarity::{extract, ratio, token_sort_ratio};
use crate::models::matching::{FuzzyScorer, MatchCandidate, MatchStrategy, TitleResult};
use crate::utils::constants::*;
use crate::utils::text::{alnum_tokens, capitalize, collapse_whitespace, squash_tokens, LOWERCASE_CONNECTORS};
use crate::vocabulary::builtin::CONTEXT_EXPANSIONS;
use crate::vocabulary::CanonContext;

//------------------------------------------------------------------------------
// NORMALIZATION
//------------------------------------------------------------------------------

static HONORIFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Dr|Mr|Mrs|Ms|Miss|Prof|Professor|Rev|Reverend|Sir|Madam|Esq)\.?\s+").unwrap()
});
static PERSON_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]*(?:\s+[A-Z][a-z]*)*\s*,\s*").unwrap());
static CREDENTIALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:,\s*|\s+)(?:PhD|MD|DDS|DVM|Esq|MBA|MA|BS|BA|CISSP|PMP|RN|LPN|CPA)\.?$").unwrap()
});
static LEADING_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,}[\s\-]*").unwrap());
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static LOCATION_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*-\s*(?:Downtown Office|Main Office|Downtown|Main|HQ|Headquarters)\b").unwrap()
});
static SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*").unwrap());
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\u{2013}\u{2014}]+").unwrap());
static AMPERSAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*&\s*").unwrap());
static SHORT_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,4}\b").unwrap());

/// Abbreviated title words and their expansions.
const TITLE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("dir", "Director"),
    ("mgr", "Manager"),
    ("sr", "Senior"),
    ("jr", "Junior"),
    ("asst", "Assistant"),
    ("assoc", "Associate"),
    ("coord", "Coordinator"),
    ("supv", "Supervisor"),
    ("supt", "Superintendent"),
    ("tech", "Technician"),
    ("spec", "Specialist"),
    ("mgmt", "Management"),
    ("svcs", "Services"),
    ("dept", "Department"),
];

/// Words shared by so many titles that they never identify one.
pub const GENERIC_TITLE_TOKENS: [&str; 17] = [
    "manager", "director", "administrator", "admin", "analyst", "specialist", "technician", "tech",
    "coordinator", "officer", "supervisor", "consultant", "advisor", "assistant", "associate", "lead",
    "program",
];

/// Seniority words that an apprentice-style title never inherits.
const TRAINEE_TOKENS: [&str; 4] = ["intern", "trainee", "apprentice", "student"];
/// Words after "executive" that make it part of a support title.
const SUPPORT_AFTER_EXECUTIVE: [&str; 3] = ["assistant", "secretary", "administrative"];

fn expand_abbreviation(token: &str) -> Option<&'static str> {
    let bare = token.trim_end_matches('.').to_lowercase();
    TITLE_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == bare)
        .map(|(_, full)| *full)
}

/// Clean a raw job title: honorifics, person prefixes, credentials, codes,
/// parentheticals and location tails go; abbreviations are expanded; the
/// result is title-cased with stopwords lowercase and short acronyms kept.
pub fn normalize_title(raw: &str) -> Option<String> {
    let text = HONORIFIC.replace_all(raw.trim(), "").into_owned();
    let text = PERSON_PREFIX.replace_all(&text, "").into_owned();
    let text = CREDENTIALS.replace_all(text.trim(), "").into_owned();
    let text = LEADING_CODE.replace_all(text.trim(), "").into_owned();
    let text = PARENTHETICAL.replace_all(&text, "").into_owned();
    let text = LOCATION_TAIL.replace_all(&text, "").into_owned();
    let text = SLASH.replace_all(&text, " / ").into_owned();
    let text = DASHES.replace_all(&text, " ").into_owned();
    let text = AMPERSAND.replace_all(&text, " & ").into_owned();
    let text = collapse_whitespace(&text);

    let preserve: HashSet<String> = SHORT_CAPS
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect();

    let words: Vec<String> = text
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if let Some(full) = expand_abbreviation(word) {
                return full.to_string();
            }
            let bare = word.trim_end_matches('.');
            let suffix = &word[bare.len()..];
            if preserve.contains(bare) {
                return word.to_string();
            }
            let lower = bare.to_lowercase();
            if i > 0 && LOWERCASE_CONNECTORS.contains(&lower.as_str()) {
                return format!("{}{}", lower, suffix);
            }
            format!("{}{}", capitalize(bare), suffix)
        })
        .collect();

    let cleaned = words.join(" ");
    let cleaned = cleaned.trim_matches(|c: char| c == ',' || c == ';' || c.is_whitespace());
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

//------------------------------------------------------------------------------
// SENIORITY
//------------------------------------------------------------------------------

fn seniority_excluded(phrase: &[String], label: &str, tokens: &[String], at: usize) -> bool {
    if label == "Senior" && tokens.iter().any(|t| TRAINEE_TOKENS.contains(&t.as_str())) {
        return true;
    }
    if phrase.len() == 1 && phrase[0] == "executive" {
        if let Some(next) = tokens.get(at + 1) {
            return SUPPORT_AFTER_EXECUTIVE.contains(&next.as_str());
        }
    }
    false
}

/// Seniority label of a cleaned title. Phrases anchored at the start win over
/// phrases found later; within a pass, multi-word phrases come first.
pub fn extract_seniority(ctx: &CanonContext, title: &str) -> Option<String> {
    let tokens = squash_tokens(title);
    if tokens.is_empty() {
        return None;
    }

    for (phrase, label) in ctx.seniority.iter() {
        if tokens.starts_with(phrase) && !seniority_excluded(phrase, label, &tokens, 0) {
            return Some(label.to_string());
        }
    }
    for (phrase, label) in ctx.seniority.iter() {
        if phrase.len() > tokens.len() {
            continue;
        }
        let hit = tokens
            .windows(phrase.len())
            .enumerate()
            .find(|(at, window)| *window == phrase && !seniority_excluded(phrase, label, &tokens, *at));
        if hit.is_some() {
            return Some(label.to_string());
        }
    }
    None
}

//------------------------------------------------------------------------------
// CASCADE
//------------------------------------------------------------------------------

fn non_generic(tokens: Vec<String>) -> HashSet<String> {
    tokens
        .into_iter()
        .filter(|t| !GENERIC_TITLE_TOKENS.contains(&t.as_str()))
        .collect()
}

fn is_generic_word(word: &str) -> bool {
    GENERIC_TITLE_TOKENS.contains(&word) || CONTEXT_EXPANSIONS.iter().any(|(generic, _, _)| *generic == word)
}

/// Tier 1: the real-world job-title set.
fn job_title_tier(ctx: &CanonContext, normalized: &str) -> Option<MatchCandidate> {
    let titles = &ctx.titles;
    if let Some(job) = titles.exact_job_title(normalized) {
        let canonical = titles.standardize(job).unwrap_or(job);
        return Some(MatchCandidate::new(canonical, TITLE_JOB_EXACT, MatchStrategy::JobTitle));
    }
    if rejects_before_fuzzy(normalized) {
        return None;
    }

    let query = non_generic(meaningful_tokens(normalized, &[]));
    for (job, score) in extract(
        normalized,
        titles.job_titles(),
        FuzzyScorer::TokenSort,
        TITLE_JOB_FUZZY_ACCEPT * 100.0,
        5,
    ) {
        if !shares_specific_token(&query, job) {
            debug!("Job title '{}' for '{}' shares only generic words", job, normalized);
            continue;
        }
        if semantic::conflicts(&ctx.domains, normalized, job) {
            debug!("Job title '{}' for '{}' vetoed by safeguard", job, normalized);
            continue;
        }
        let canonical = titles.standardize(job).unwrap_or(job);
        let confidence = (score / 100.0).max(TITLE_JOB_FUZZY_FLOOR);
        return Some(MatchCandidate::new(canonical, confidence, MatchStrategy::JobTitle));
    }
    None
}

/// A query made only of generic words passes. Otherwise one of its specific
/// words must be close to a word of the candidate, so "IT Manager" never lands
/// on "City Manager" through "manager" alone.
fn shares_specific_token(query: &HashSet<String>, candidate: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let candidate_tokens = meaningful_tokens(candidate, &[]);
    query
        .iter()
        .any(|q| candidate_tokens.iter().any(|c| q == c || ratio(q, c) >= TITLE_TOKEN_TYPO_RATIO))
}

/// Tier 2b: official classification titles.
fn official_tier(ctx: &CanonContext, normalized: &str) -> Option<MatchCandidate> {
    let official = ctx.titles.official_title(normalized)?;
    let confidence = if official == normalized {
        TITLE_OFFICIAL_EXACT
    } else {
        TITLE_OFFICIAL_CASELESS
    };
    Some(MatchCandidate::new(official, confidence, MatchStrategy::OfficialTitle))
}

/// Tier 2d: guarded substring, with confidence by where the label sits.
fn substring_tier(engine: &MatchingEngine, normalized: &str) -> Option<MatchCandidate> {
    let mut hit = engine.substring(normalized, true)?;
    let query_len = normalized.chars().count() as f64;
    let label_len = hit.label.chars().count();
    let label_words = hit.label.split_whitespace().count();

    hit.score = match hit.position {
        Some(0) if label_len as f64 >= 0.8 * query_len => TITLE_SUBSTRING_EARLY_EXIT,
        Some(0) => TITLE_SUBSTRING_START,
        Some(pos) if pos > label_words => TITLE_SUBSTRING_LATE,
        _ => TITLE_SUBSTRING_MIDDLE,
    };
    Some(hit)
}

/// Tier 2e: token-sort fuzzy over canonical titles. A candidate sharing only
/// generic words needs a much higher score.
fn fuzzy_tier(ctx: &CanonContext, normalized: &str, threshold: f64) -> Option<MatchCandidate> {
    if rejects_before_fuzzy(normalized) {
        return None;
    }
    let cutoff = (threshold * 100.0).max(TITLE_FUZZY_MIN * 100.0);
    let query = non_generic(meaningful_tokens(normalized, &[]));

    for (label, score) in extract(normalized, ctx.titles.canonicals.labels(), FuzzyScorer::TokenSort, cutoff, 5) {
        if semantic::conflicts(&ctx.domains, normalized, label) {
            continue;
        }
        let s = score / 100.0;
        let shared = !query.is_disjoint(&non_generic(meaningful_tokens(label, &[])));
        let confidence = if s >= TITLE_FUZZY_EXCELLENT {
            TITLE_FUZZY_EXCELLENT_CONFIDENCE
        } else if shared {
            0.75 + 0.15 * s
        } else if s >= TITLE_FUZZY_GENERIC_ONLY {
            TITLE_FUZZY_GENERIC_ONLY_CONFIDENCE
        } else {
            debug!("Title candidate '{}' for '{}' shares only generic words", label, normalized);
            continue;
        };
        return Some(MatchCandidate::new(label, confidence, MatchStrategy::Fuzzy(FuzzyScorer::TokenSort)));
    }
    None
}

fn cascade(ctx: &CanonContext, normalized: &str, threshold: f64) -> Option<MatchCandidate> {
    let engine = MatchingEngine::new(&ctx.titles.canonicals, &ctx.domains);

    if let Some(hit) = engine.exact(normalized) {
        return Some(hit);
    }
    if let Some(hit) = job_title_tier(ctx, normalized) {
        return Some(hit);
    }
    if let Some(hit) = official_tier(ctx, normalized) {
        return Some(hit);
    }
    if let Some(mut hit) = engine.variant(normalized) {
        hit.score = if hit.label.eq_ignore_ascii_case(normalized) {
            TITLE_VARIANT_EXACT
        } else {
            TITLE_VARIANT_CASELESS
        };
        return Some(hit);
    }
    if let Some(hit) = substring_tier(&engine, normalized) {
        return Some(hit);
    }
    fuzzy_tier(ctx, normalized, threshold)
}

/// Context-free part of the resolver; this is what gets memoized.
fn compute(ctx: &CanonContext, raw: &str, threshold: f64) -> TitleResult {
    let normalized = match normalize_title(raw) {
        Some(n) => n,
        None => return TitleResult::empty(raw),
    };
    let seniority = extract_seniority(ctx, &normalized);

    let mut result = TitleResult::empty(raw);
    if let Some(hit) = cascade(ctx, &normalized, threshold) {
        debug!("Title '{}' -> '{}' via {:?} ({:.2})", normalized, hit.label, hit.strategy, hit.score);
        result.canonical = Some(hit.label);
        result.confidence = hit.score;
        result.strategy = hit.strategy;
    }
    result.normalized = Some(normalized);
    result.seniority = seniority;
    result
}

/// Multi-word expansion of a generic word unlocked by the department context.
fn context_expansion(ctx: &CanonContext, word: &str, dept_context: Option<&str>) -> Option<&'static str> {
    let dept_tokens = alnum_tokens(dept_context?);
    if dept_tokens.is_empty() {
        return None;
    }
    CONTEXT_EXPANSIONS
        .iter()
        .filter(|(generic, target, _)| *generic == word && ctx.titles.canonicals.is_canonical(target))
        .find(|(_, _, keywords)| {
            keywords.iter().any(|keyword| {
                let needle = alnum_tokens(keyword);
                !needle.is_empty() && dept_tokens.windows(needle.len()).any(|w| w == needle.as_slice())
            })
        })
        .map(|(_, target, _)| *target)
}

fn apply_context(ctx: &CanonContext, mut result: TitleResult, dept_context: Option<&str>) -> TitleResult {
    let tokens = result.normalized.as_deref().map(alnum_tokens).unwrap_or_default();
    let word = match tokens.as_slice() {
        [only] if is_generic_word(only) => only.clone(),
        _ => return result,
    };
    let allowed = context_expansion(ctx, &word, dept_context);

    let multi_word = result
        .canonical
        .as_deref()
        .map_or(false, |c| c.split_whitespace().count() > 1);
    if multi_word && result.canonical.as_deref() != allowed {
        debug!(
            "Dropping expansion '{}' of generic '{}' (context {:?})",
            result.canonical.as_deref().unwrap_or_default(),
            word,
            dept_context
        );
        result.canonical = None;
        result.confidence = 0.0;
        result.strategy = MatchStrategy::None;
    }

    if result.canonical.is_none() {
        if let Some(target) = allowed {
            result.canonical = Some(target.to_string());
            result.confidence = TITLE_CONTEXT_EXPANSION;
            result.strategy = MatchStrategy::ContextExpansion;
        }
    }
    result
}

/// Resolve a raw job title, optionally using the contact's department to
/// expand generic single-word titles.
pub fn resolve(
    ctx: &CanonContext,
    raw: &str,
    threshold: f64,
    dept_context: Option<&str>,
) -> Result<TitleResult, CanonError> {
    validate_threshold(threshold)?;
    if raw.trim().is_empty() {
        return Ok(TitleResult::empty(raw));
    }
    let key = CanonContext::memo_key(raw, threshold);
    let result = ctx.cached_title(key, || compute(ctx, raw, threshold));
    Ok(apply_context(ctx, result, dept_context))
}

/// [`resolve`] with a caller-supplied override table keyed on the cleaned
/// title (case-insensitively).
pub fn resolve_with_overrides(
    ctx: &CanonContext,
    raw: &str,
    threshold: f64,
    dept_context: Option<&str>,
    overrides: &HashMap<String, String>,
) -> Result<TitleResult, CanonError> {
    validate_threshold(threshold)?;
    if let Some(normalized) = normalize_title(raw) {
        let lowered = normalized.to_lowercase();
        let hit = overrides
            .iter()
            .find(|(k, _)| k.to_lowercase() == lowered)
            .map(|(_, v)| v.clone());
        if let Some(target) = hit {
            return Ok(TitleResult {
                raw: raw.to_string(),
                seniority: extract_seniority(ctx, &normalized),
                normalized: Some(normalized),
                canonical: Some(target),
                confidence: TITLE_CONFIDENCE_OVERRIDE,
                strategy: MatchStrategy::Override,
                is_override: true,
            });
        }
    }
    resolve(ctx, raw, threshold, dept_context)
}

/// Up to `top_n` canonical titles ranked by token-sort similarity.
pub fn find_all_matches(
    ctx: &CanonContext,
    raw: &str,
    threshold: f64,
    top_n: usize,
) -> Result<Vec<String>, CanonError> {
    validate_threshold(threshold)?;
    let normalized = match normalize_title(raw) {
        Some(n) => n,
        None => return Ok(Vec::new()),
    };
    if ctx.titles.canonicals.is_canonical(&normalized) {
        return Ok(vec![normalized]);
    }
    Ok(extract(
        &normalized,
        ctx.titles.canonicals.labels(),
        FuzzyScorer::TokenSort,
        threshold * 100.0,
        top_n,
    )
    .into_iter()
    .map(|(label, _)| label.to_string())
    .collect())
}

/// Token-sort similarity of two cleaned titles in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    match (normalize_title(a), normalize_title(b)) {
        (Some(a), Some(b)) => token_sort_ratio(&a, &b) / 100.0,
        _ => 0.0,
    }
}
