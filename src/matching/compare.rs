// src/matching/compare.rs - Weighted contact-record similarity
//
// Each field contributes only when present on both records and weighted
// above zero. The weighted average is then adjusted: gender and department
// conflicts subtract, strong name or identifier agreement sets a floor.
// The final score is clamped to [0, 100].

use log::debug;
use std::collections::HashSet;

use crate::matching::email::email_score;
use crate::matching::name::name_score;
use crate::matching::phone::phone_score;
use crate::matching::similarity::token_set_ratio;
use crate::models::record::{
    ComparisonScore, ContactRecord, DepartmentFields, FieldContribution, NameFields, RecordField,
    SimilarityWeights, TitleFields,
};
use crate::utils::constants::{
    DEPARTMENT_MISMATCH_PENALTY, GENDER_CONFLICT_PENALTY, STRONG_IDENTIFIER_FLOOR,
    STRONG_NAME_FLOOR, STRONG_NAME_THRESHOLD, TITLE_GENERIC_ONLY_CAP, TITLE_GENERIC_STRONG_CAP,
    TITLE_GENERIC_STRONG_FLOOR,
};

/// Title words too common to show two titles are the same job.
const GENERIC_TITLE_WORDS: [&str; 4] = ["chief", "officer", "manager", "director"];

fn fuzzy(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => token_set_ratio(a, b),
        _ => 0.0,
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

fn name_present(name: &NameFields) -> bool {
    name.full.is_some() || name.first.is_some() || name.last.is_some()
}

fn department_present(dept: &DepartmentFields) -> bool {
    dept.canonical.is_some() || dept.normalized.is_some()
}

fn title_present(title: &TitleFields) -> bool {
    title.canonical.is_some() || title.cleaned.is_some()
}

pub fn department_score(a: &DepartmentFields, b: &DepartmentFields) -> f64 {
    fuzzy(a.canonical.as_deref(), b.canonical.as_deref())
}

fn specific_words(text: Option<&str>) -> HashSet<String> {
    text.unwrap_or_default()
        .to_lowercase()
        .split_whitespace()
        .filter(|t| !GENERIC_TITLE_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Title similarity in [0, 100]. Titles that agree only on generic words
/// ("Police Chief" / "Fire Chief") are capped unless the cleaned forms are
/// nearly identical.
pub fn title_score(a: &TitleFields, b: &TitleFields) -> f64 {
    let canonical = fuzzy(a.canonical.as_deref(), b.canonical.as_deref());
    let cleaned = fuzzy(a.cleaned.as_deref(), b.cleaned.as_deref());
    let score = canonical.max(cleaned);
    if score <= 0.0 {
        return score;
    }

    let canonical_overlap = !specific_words(a.canonical.as_deref())
        .is_disjoint(&specific_words(b.canonical.as_deref()));
    let cleaned_overlap = !specific_words(a.cleaned.as_deref())
        .is_disjoint(&specific_words(b.cleaned.as_deref()));
    if canonical_overlap || cleaned_overlap {
        return score;
    }

    if cleaned >= 85.0 {
        score.min(TITLE_GENERIC_STRONG_CAP).max(TITLE_GENERIC_STRONG_FLOOR)
    } else {
        score.min(TITLE_GENERIC_ONLY_CAP)
    }
}

/// Similarity of two contact records with the trace of how it was reached.
pub fn compare_explained(a: &ContactRecord, b: &ContactRecord, weights: &SimilarityWeights) -> ComparisonScore {
    let mut contributions: Vec<FieldContribution> = Vec::new();
    let mut push = |field: RecordField, score: f64| {
        let weight = weights.get(field);
        if weight > 0.0 {
            contributions.push(FieldContribution { field, score, weight });
        }
    };

    let mut name = 0.0;
    if let (Some(na), Some(nb)) = (&a.name, &b.name) {
        if name_present(na) && name_present(nb) {
            name = name_score(na, nb);
            push(RecordField::Name, name);
        }
    }

    let mut email = 0.0;
    if let (Some(ea), Some(eb)) = (&a.email, &b.email) {
        if !ea.normalized.is_empty() && !eb.normalized.is_empty() {
            email = email_score(ea, eb);
            push(RecordField::Email, email);
        }
    }

    let mut phone = 0.0;
    if let (Some(pa), Some(pb)) = (&a.phone, &b.phone) {
        if pa.is_present() && pb.is_present() {
            phone = phone_score(pa, pb);
            push(RecordField::Phone, phone);
        }
    }

    let mut department_mismatch = false;
    if let (Some(da), Some(db)) = (&a.department, &b.department) {
        if department_present(da) && department_present(db) {
            push(RecordField::Department, department_score(da, db));
            department_mismatch = match (lowered(da.canonical.as_deref()), lowered(db.canonical.as_deref())) {
                (Some(ca), Some(cb)) => ca != cb,
                _ => false,
            };
        }
    }

    if let (Some(ta), Some(tb)) = (&a.title, &b.title) {
        if title_present(ta) && title_present(tb) {
            push(RecordField::Title, title_score(ta, tb));
        }
    }

    let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
    let mut score = if total_weight > 0.0 {
        contributions.iter().map(|c| c.score * c.weight).sum::<f64>() / total_weight
    } else {
        0.0
    };
    let mut adjustments = Vec::new();

    let gender = |r: &ContactRecord| r.name.as_ref().and_then(|n| lowered(n.gender.as_deref()));
    if weights.get(RecordField::Name) > 0.0 {
        if let (Some(ga), Some(gb)) = (gender(a), gender(b)) {
            if ga != gb {
                let penalty = GENDER_CONFLICT_PENALTY * weights.ratio(RecordField::Name);
                score -= penalty;
                adjustments.push(format!("gender conflict -{:.1}", penalty));
            }
        }
    }

    if department_mismatch && weights.get(RecordField::Department) > 0.0 {
        let penalty = DEPARTMENT_MISMATCH_PENALTY * weights.ratio(RecordField::Department);
        score -= penalty;
        adjustments.push(format!("department mismatch -{:.1}", penalty));
    }

    if weights.get(RecordField::Name) > 0.0 && name >= STRONG_NAME_THRESHOLD {
        let floor = STRONG_NAME_FLOOR * weights.ratio(RecordField::Name);
        if score < floor {
            score = floor;
            adjustments.push(format!("strong name floor {:.1}", floor));
        }
    }

    let identifier_floor = |field: RecordField, field_score: f64| {
        if weights.get(field) > 0.0 && field_score == 100.0 {
            STRONG_IDENTIFIER_FLOOR * weights.ratio(field)
        } else {
            0.0
        }
    };
    let floor = identifier_floor(RecordField::Email, email).max(identifier_floor(RecordField::Phone, phone));
    if floor > 0.0 && score < floor {
        score = floor;
        adjustments.push(format!("exact identifier floor {:.1}", floor));
    }

    let score = score.clamp(0.0, 100.0);
    debug!(
        "Compared records: {} field(s), {} adjustment(s) -> {:.1}",
        contributions.len(),
        adjustments.len(),
        score
    );
    ComparisonScore {
        score,
        contributions,
        adjustments,
    }
}

/// Similarity of two contact records in [0, 100].
pub fn compare(a: &ContactRecord, b: &ContactRecord, weights: &SimilarityWeights) -> f64 {
    compare_explained(a, b, weights).score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::NameFields;

    #[test]
    fn test_identical_email_scores_high() {
        let a = ContactRecord::new().with_email("jdoe@city.gov");
        let b = ContactRecord::new().with_email("JDoe@City.gov");
        assert!(compare(&a, &b, &SimilarityWeights::default()) >= 95.0);

        let a = a.with_name("Alice Smith");
        let b = b.with_name("Bob Jones");
        assert!(compare(&a, &b, &SimilarityWeights::default()) >= 90.0);
    }

    #[test]
    fn test_different_people_score_low() {
        let a = ContactRecord::new().with_name("Alice Smith");
        let b = ContactRecord::new().with_name("Bob Jones");
        assert!(compare(&a, &b, &SimilarityWeights::default()) < 30.0);
    }

    #[test]
    fn test_no_shared_fields_scores_zero() {
        let a = ContactRecord::new().with_name("Alice Smith");
        let b = ContactRecord::new().with_email("alice@x.org");
        let explained = compare_explained(&a, &b, &SimilarityWeights::default());
        assert_eq!(explained.score, 0.0);
        assert!(explained.contributions.is_empty());
    }

    #[test]
    fn test_zero_weight_field_is_excluded() {
        let a = ContactRecord::new().with_name("Alice Smith").with_email("alice@x.org");
        let b = ContactRecord::new().with_name("Alice Smith").with_email("asmith@y.org");

        let default = compare(&a, &b, &SimilarityWeights::default());
        assert!((default - 50.0).abs() < 1e-9);

        let weights = SimilarityWeights::with_overrides(&[(RecordField::Email, 0.0)]).unwrap();
        let explained = compare_explained(&a, &b, &weights);
        assert!((explained.score - 100.0).abs() < 1e-9);
        assert!(explained.contributions.iter().all(|c| c.field != RecordField::Email));
    }

    #[test]
    fn test_department_mismatch_penalty() {
        let base = ContactRecord::new().with_name("Alice Smith").with_department("Police");
        let same = compare(&base, &base.clone(), &SimilarityWeights::default());
        let other = ContactRecord::new().with_name("Alice Smith").with_department("Fire");
        let explained = compare_explained(&base, &other, &SimilarityWeights::default());
        assert!(explained.score < same);
        assert!(explained.adjustments.iter().any(|a| a.starts_with("department mismatch")));
    }

    #[test]
    fn test_gender_conflict_penalty() {
        let a = ContactRecord::new()
            .with_name_fields(NameFields::from_full("Sam Lee").with_gender("male"))
            .with_email("slee@x.org");
        let b = ContactRecord::new()
            .with_name_fields(NameFields::from_full("Sam Lee").with_gender("female"))
            .with_email("sam.lee@x.org");
        let explained = compare_explained(&a, &b, &SimilarityWeights::default());
        assert!(explained.adjustments.iter().any(|a| a.starts_with("gender conflict")));
        assert!(explained.score < 100.0);
    }

    #[test]
    fn test_generic_only_title_overlap_is_capped() {
        let a = TitleFields::from("Police Chief");
        let b = TitleFields::from("Fire Chief");
        assert!(title_score(&a, &b) <= TITLE_GENERIC_ONLY_CAP);

        let a = TitleFields::from("Planning Director");
        let b = TitleFields::from("Director of Planning");
        assert_eq!(title_score(&a, &b), 100.0);
    }

    #[test]
    fn test_scores_stay_bounded() {
        let weights = SimilarityWeights::with_overrides(&[
            (RecordField::Name, 5.0),
            (RecordField::Department, 3.0),
        ])
        .unwrap();
        let a = ContactRecord::new()
            .with_name("Alice Smith")
            .with_email("alice@x.org")
            .with_phone("555-123-4567")
            .with_department("Police")
            .with_title("Police Officer");
        let b = ContactRecord::new()
            .with_name("Bob Jones")
            .with_email("bob@y.org")
            .with_phone("555-000-1111")
            .with_department("Finance")
            .with_title("Accountant");
        for (x, y) in [(&a, &b), (&a, &a), (&b, &a)] {
            let score = compare(x, y, &weights);
            assert!((0.0..=100.0).contains(&score));
            assert_eq!(score, compare(x, y, &weights));
        }
    }
}
