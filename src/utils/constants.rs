// src/utils/constants.rs
//
// Hand-tuned thresholds. None of these were fitted against labelled data, so
// changes should be checked against the scenario tests before landing.

/// Default similarity threshold for both resolvers, in [0, 1].
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

// --- shared cascade ---------------------------------------------------------

pub const CONFIDENCE_EXACT: f64 = 1.0;
pub const CONFIDENCE_VARIANT_EXACT_CASE: f64 = 0.98;
pub const CONFIDENCE_VARIANT: f64 = 0.95;
pub const CONFIDENCE_SUBSTRING: f64 = 0.88;
pub const CONFIDENCE_SEGMENT: f64 = 0.85;
/// Ceiling for anything accepted by a fuzzy scorer.
pub const CONFIDENCE_FUZZY_MAX: f64 = 0.84;
pub const CONFIDENCE_FUZZY_MIN: f64 = 0.60;

/// Points subtracted from the primary cutoff for the partial-ratio fallback.
pub const PARTIAL_CUTOFF_DROP: f64 = 15.0;
/// Floor (in points) for the partial-ratio fallback cutoff.
pub const PARTIAL_CUTOFF_FLOOR: f64 = 65.0;

/// Shared meaningful tokens required by segment overlap.
pub const MIN_SEGMENT_TOKEN_OVERLAP: usize = 2;
/// Two tokens count as the same word in the fuzzy overlap guard at this ratio.
pub const FUZZY_TOKEN_MATCH_RATIO: f64 = 80.0;
/// Single-token inputs shorter than this never reach the fuzzy scorers.
pub const MIN_FUZZY_SINGLE_TOKEN_LEN: usize = 4;

// --- department resolver ----------------------------------------------------

pub const DEPT_CONFIDENCE_OVERRIDE: f64 = 0.95;
pub const DEPT_CONFIDENCE_MATCH: f64 = 0.85;
pub const DEPT_CONFIDENCE_UNMATCHED: f64 = 0.40;
pub const DEPT_CONFIDENCE_REJECTED: f64 = 0.0;

// --- title resolver ---------------------------------------------------------

pub const TITLE_CONFIDENCE_OVERRIDE: f64 = 0.95;
pub const TITLE_JOB_EXACT: f64 = 0.98;
/// Minimum fuzzy score for a tier-one job-title match.
pub const TITLE_JOB_FUZZY_ACCEPT: f64 = 0.75;
pub const TITLE_JOB_FUZZY_FLOOR: f64 = 0.70;
/// Points at which two title words count as the same word with a typo.
pub const TITLE_TOKEN_TYPO_RATIO: f64 = 80.0;
pub const TITLE_OFFICIAL_EXACT: f64 = 0.98;
pub const TITLE_OFFICIAL_CASELESS: f64 = 0.95;
pub const TITLE_VARIANT_EXACT: f64 = 0.95;
pub const TITLE_VARIANT_CASELESS: f64 = 0.90;
pub const TITLE_SUBSTRING_EARLY_EXIT: f64 = 0.95;
pub const TITLE_SUBSTRING_START: f64 = 0.90;
pub const TITLE_SUBSTRING_MIDDLE: f64 = 0.85;
pub const TITLE_SUBSTRING_LATE: f64 = 0.80;
/// Fuzzy canonical matches under this score are discarded.
pub const TITLE_FUZZY_MIN: f64 = 0.75;
pub const TITLE_FUZZY_EXCELLENT: f64 = 0.95;
pub const TITLE_FUZZY_EXCELLENT_CONFIDENCE: f64 = 0.92;
pub const TITLE_FUZZY_GENERIC_ONLY: f64 = 0.90;
pub const TITLE_FUZZY_GENERIC_ONLY_CONFIDENCE: f64 = 0.88;
pub const TITLE_CONTEXT_EXPANSION: f64 = 0.85;

// --- record scorer ----------------------------------------------------------

pub const WEIGHT_NAME: f64 = 0.4;
pub const WEIGHT_EMAIL: f64 = 0.4;
pub const WEIGHT_PHONE: f64 = 0.4;
pub const WEIGHT_DEPARTMENT: f64 = 0.2;
pub const WEIGHT_TITLE: f64 = 0.2;

pub const NAME_FIRST_SHARE: f64 = 0.35;
pub const NAME_LAST_SHARE: f64 = 0.55;
pub const NAME_SWAP_DISCOUNT: f64 = 0.9;
pub const NAME_INITIAL_LAST_FLOOR: f64 = 82.0;
pub const NAME_INCOMPATIBLE_INITIAL_CAP: f64 = 24.0;
pub const NAME_SHARED_INITIAL_FLOOR: f64 = 75.0;
pub const NAME_FIRST_ONLY_CAP: f64 = 52.0;
pub const NAME_WEAK_BOTH_CAP: f64 = 58.0;

pub const EMAIL_ALIAS_SCORE: f64 = 95.0;
pub const EMAIL_SUBSTRING_SCORE: f64 = 70.0;
pub const EMAIL_FUZZY_HIGH_SCORE: f64 = 65.0;
pub const EMAIL_FUZZY_MEDIUM_SCORE: f64 = 50.0;

pub const DEPARTMENT_MISMATCH_PENALTY: f64 = 15.0;
pub const GENDER_CONFLICT_PENALTY: f64 = 3.0;
pub const TITLE_GENERIC_ONLY_CAP: f64 = 35.0;
pub const TITLE_GENERIC_STRONG_FLOOR: f64 = 75.0;
pub const TITLE_GENERIC_STRONG_CAP: f64 = 90.0;
pub const STRONG_NAME_THRESHOLD: f64 = 95.0;
pub const STRONG_NAME_FLOOR: f64 = 45.0;
pub const STRONG_IDENTIFIER_FLOOR: f64 = 90.0;

// --- caches and bulk runs ---------------------------------------------------

pub const DEFAULT_CACHE_SIZE: usize = 4096;
pub const DEFAULT_BULK_BATCH_SIZE: usize = 100;
