// src/matching/semantic.rs - Domain-vote safeguard for fuzzy candidates
//
// Each token of a string votes for the domain tag it carries in the index.
// Unknown and NULL tokens evaporate. Two strings conflict only when both
// produce tags and the tag sets are disjoint; an empty side always passes.

use log::debug;

use crate::vocabulary::{CanonContext, DomainIndex};

/// True when `a` and `b` carry domain signals with no overlap.
pub fn conflicts(index: &DomainIndex, a: &str, b: &str) -> bool {
    let domains_a = index.domains(a);
    if domains_a.is_empty() {
        return false;
    }
    let domains_b = index.domains(b);
    if domains_b.is_empty() {
        return false;
    }

    let conflict = domains_a.is_disjoint(&domains_b);
    if conflict {
        debug!(
            "Semantic conflict: '{}' {:?} vs '{}' {:?}",
            a, domains_a, b, domains_b
        );
    }
    conflict
}

/// Safeguard check against a context's domain index.
pub fn semantic_conflict(ctx: &CanonContext, a: &str, b: &str) -> bool {
    conflicts(&ctx.domains, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::builtin;

    #[test]
    fn test_cross_domain_conflict() {
        let index = builtin::domain_index();
        assert!(conflicts(&index, "Web Developer", "Water Developer"));
        assert!(conflicts(&index, "Police", "Finance"));
    }

    #[test]
    fn test_same_domain_passes() {
        let index = builtin::domain_index();
        assert!(!conflicts(&index, "Software Engineer", "Senior Software Engineer"));
        assert!(!conflicts(&index, "Police Officer", "Police Department"));
    }

    #[test]
    fn test_fail_open_when_either_side_is_silent() {
        let index = builtin::domain_index();
        assert!(!conflicts(&index, "Manager", "Director"));
        assert!(!conflicts(&index, "Developer", "Program Manager"));
        assert!(!conflicts(&index, "Coordinator", "Water"));
        assert!(!conflicts(&index, "", "Police"));
        assert!(!conflicts(&DomainIndex::default(), "Police", "Finance"));
    }

    #[test]
    fn test_symmetry() {
        let index = builtin::domain_index();
        let samples = ["Web Developer", "Water Developer", "Manager", "School Nurse", "Fire Chief", "Budget"];
        for a in samples {
            for b in samples {
                assert_eq!(conflicts(&index, a, b), conflicts(&index, b, a), "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn test_mixed_domains_overlap_passes() {
        let index = builtin::domain_index();
        assert!(!conflicts(&index, "School Nurse", "Public Health Nurse"));
    }
}
