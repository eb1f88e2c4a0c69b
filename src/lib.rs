// src/lib.rs
//
// Department and job-title canonicalization against a curated vocabulary,
// a domain-vote safeguard for fuzzy candidates, and weighted similarity
// scoring of contact records.
//
// The functions at the crate root use the process-wide context built from
// the environment on first use. Long-running services should build their own
// `CanonContext` once and call the `_with` variants in `matching`.

pub mod bulk;
pub mod config;
pub mod errors;
pub mod matching;
pub mod models;
pub mod utils;
pub mod vocabulary;

pub use config::CanonConfig;
pub use errors::CanonError;
pub use matching::{
    compare, compare_explained, department_similarity, normalize_department, normalize_title,
    title_similarity,
};
pub use models::matching::{DepartmentResult, MatchStrategy, TitleResult};
pub use models::record::{
    ComparisonScore, ContactRecord, DepartmentFields, EmailFields, NameFields, PhoneFields,
    RecordField, SimilarityWeights, TitleFields,
};
pub use utils::logging::init_logging;
pub use vocabulary::{default_context, CanonContext};

use std::collections::HashMap;

/// Canonicalize a department name. Errors only on an out-of-range threshold.
pub fn resolve_department(raw: &str, threshold: f64) -> Result<DepartmentResult, CanonError> {
    matching::department::resolve(default_context(), raw, threshold)
}

pub fn resolve_department_with_overrides(
    raw: &str,
    threshold: f64,
    overrides: &HashMap<String, String>,
) -> Result<DepartmentResult, CanonError> {
    matching::department::resolve_with_overrides(default_context(), raw, threshold, overrides)
}

pub fn find_all_department_matches(raw: &str, threshold: f64, top_n: usize) -> Result<Vec<String>, CanonError> {
    matching::department::find_all_matches(default_context(), raw, threshold, top_n)
}

pub fn department_category(canonical: &str) -> Option<&'static str> {
    matching::department::category(default_context(), canonical)
}

/// Canonicalize a job title. `dept_context` lets a generic single word
/// ("Coordinator") expand into the title that department uses.
pub fn resolve_title(raw: &str, threshold: f64, dept_context: Option<&str>) -> Result<TitleResult, CanonError> {
    matching::title::resolve(default_context(), raw, threshold, dept_context)
}

pub fn resolve_title_with_overrides(
    raw: &str,
    threshold: f64,
    dept_context: Option<&str>,
    overrides: &HashMap<String, String>,
) -> Result<TitleResult, CanonError> {
    matching::title::resolve_with_overrides(default_context(), raw, threshold, dept_context, overrides)
}

pub fn find_all_title_matches(raw: &str, threshold: f64, top_n: usize) -> Result<Vec<String>, CanonError> {
    matching::title::find_all_matches(default_context(), raw, threshold, top_n)
}

/// True when both strings carry domain signals and none of them agree.
pub fn semantic_conflict(a: &str, b: &str) -> bool {
    matching::semantic::semantic_conflict(default_context(), a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_typo_department_resolves_to_police() {
        init();
        let result = resolve_department("Polce Dept", 0.6).unwrap();
        assert_eq!(result.canonical.as_deref(), Some("Police"));
        assert!(result.confidence >= 0.75);
    }

    #[test]
    fn test_station_is_not_a_department() {
        init();
        let result = resolve_department("Station #14 - Ladder Unit", 0.6).unwrap();
        assert!(result.canonical.is_none());
    }

    #[test]
    fn test_generic_title_without_context_stays_unresolved() {
        init();
        let result = resolve_title("Coordinator", 0.6, None).unwrap();
        assert_ne!(result.canonical.as_deref(), Some("Recreation Coordinator"));
        assert!(result.canonical.is_none());
    }

    #[test]
    fn test_generic_title_with_parks_context_expands() {
        init();
        let result = resolve_title("Coordinator", 0.6, Some("Parks")).unwrap();
        assert_eq!(result.canonical.as_deref(), Some("Recreation Coordinator"));
    }

    #[test]
    fn test_identical_email_records() {
        let a = ContactRecord::new().with_email("a@city.gov");
        let b = ContactRecord::new().with_email("a@city.gov");
        assert!(compare(&a, &b, &SimilarityWeights::default()) >= 95.0);
    }

    #[test]
    fn test_different_names_score_low() {
        let a = ContactRecord::new().with_name("Alice Smith");
        let b = ContactRecord::new().with_name("Bob Jones");
        assert!(compare(&a, &b, &SimilarityWeights::default()) < 30.0);
    }

    #[test]
    fn test_invalid_threshold_fails_loudly() {
        assert!(matches!(
            resolve_department("Police", 1.01),
            Err(CanonError::InvalidParameter { name: "threshold", .. })
        ));
        assert!(resolve_title("Teacher", -0.5, None).is_err());
    }

    #[test]
    fn test_blank_inputs_return_empty_results() {
        assert!(resolve_department("", 0.6).unwrap().canonical.is_none());
        assert!(resolve_title("   ", 0.6, Some("Parks")).unwrap().canonical.is_none());
        let empty = ContactRecord::new();
        assert_eq!(compare(&empty, &empty, &SimilarityWeights::default()), 0.0);
    }

    #[test]
    fn test_confidence_follows_strategy_strength() {
        let exact = resolve_department("Public Works", 0.6).unwrap();
        let variant = resolve_department("Dept of Public Works", 0.6).unwrap();
        let cascade = resolve_department("Water Quality Lab", 0.6).unwrap();
        let unmatched = resolve_department("Quantum Basket Weaving", 0.6).unwrap();
        assert_eq!(exact.confidence, 1.0);
        assert!(exact.confidence >= variant.confidence);
        assert!(variant.confidence >= cascade.confidence);
        assert!(cascade.confidence > unmatched.confidence);
    }

    #[test]
    fn test_safeguard_is_symmetric_and_fails_open() {
        for (a, b) in [
            ("Web Developer", "Water Developer"),
            ("Police Officer", "Finance Director"),
            ("Manager", "Nurse"),
        ] {
            assert_eq!(semantic_conflict(a, b), semantic_conflict(b, a));
        }
        assert!(!semantic_conflict("Manager", "Nurse"));
        assert!(semantic_conflict("Web Developer", "Water Developer"));
    }

    #[test]
    fn test_scores_stay_bounded_and_zero_weights_drop_fields() {
        let a = ContactRecord::new()
            .with_name("Alice Smith")
            .with_email("alice@city.gov")
            .with_phone("555-123-4567")
            .with_department("Police")
            .with_title("Police Chief");
        let b = ContactRecord::new()
            .with_name("Alicia Smyth")
            .with_email("asmith@city.gov")
            .with_phone("555-987-6543")
            .with_department("Finance")
            .with_title("Fire Chief");

        for field in RecordField::ALL {
            let weights = SimilarityWeights::with_overrides(&[(field, 0.0)]).unwrap();
            let explained = compare_explained(&a, &b, &weights);
            assert!((0.0..=100.0).contains(&explained.score));
            assert!(explained.contributions.iter().all(|c| c.field != field));
        }
    }

    #[test]
    fn test_resolution_is_deterministic_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| resolve_department("Polce Dept", 0.6).unwrap()))
            .collect();
        let results: Vec<DepartmentResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
