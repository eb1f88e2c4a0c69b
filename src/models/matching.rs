// src/models/matching.rs

use serde::{Deserialize, Serialize};

//------------------------------------------------------------------------------
// CASCADE STRATEGIES
//------------------------------------------------------------------------------

/// Fuzzy scorer that produced an accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuzzyScorer {
    TokenSet,
    TokenSort,
    Partial,
}

/// How a canonical label was reached. Carried on every result so callers can
/// filter on provenance as well as confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Caller-supplied override table
    Override,
    /// Normalized input already is a canonical label
    ExactCanonical,
    /// Known alternate spelling
    Variant,
    /// Leading-token abbreviation ("HR", "PD")
    Abbreviation,
    /// Domain keyword shortcut ("sheriff", "transit")
    Keyword,
    /// Canonical label contained in the input (or vice versa)
    Substring,
    /// Meaningful-token overlap within one delimiter-separated segment
    Segment,
    Fuzzy(FuzzyScorer),
    /// Real-world job-title reference set
    JobTitle,
    /// Official occupational classification entry
    OfficialTitle,
    /// Generic title expanded using department context
    ContextExpansion,
    /// Rejected as a building/location string
    Rejected,
    None,
}

impl MatchStrategy {
    pub fn is_fuzzy(&self) -> bool {
        matches!(self, MatchStrategy::Fuzzy(_))
    }
}

//------------------------------------------------------------------------------
// CANDIDATES AND RESULTS
//------------------------------------------------------------------------------

/// One attempt inside a cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub label: String,
    /// Score in [0, 1]
    pub score: f64,
    pub strategy: MatchStrategy,
    /// Token index of the label inside the input, when it appears there
    pub position: Option<usize>,
}

impl MatchCandidate {
    pub fn new(label: impl Into<String>, score: f64, strategy: MatchStrategy) -> Self {
        Self {
            label: label.into(),
            score,
            strategy,
            position: None,
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Ordering key: higher score, then earlier position, then longer label.
    pub fn rank_key(&self) -> (i64, i64, usize) {
        let score = (self.score * 1_000_000.0).round() as i64;
        let position = self.position.map(|p| -(p as i64)).unwrap_or(i64::MIN);
        (score, position, self.label.len())
    }
}

/// Outcome of one run of the shared cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub raw: String,
    pub normalized: String,
    pub canonical: Option<String>,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    pub fn no_match(raw: &str, normalized: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalized.to_string(),
            canonical: None,
            confidence: 0.0,
            strategy: MatchStrategy::None,
        }
    }

    pub fn from_candidate(raw: &str, normalized: &str, candidate: MatchCandidate, confidence: f64) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalized.to_string(),
            canonical: Some(candidate.label),
            confidence,
            strategy: candidate.strategy,
        }
    }

    pub fn is_match(&self) -> bool {
        self.canonical.is_some()
    }
}

/// Department resolver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentResult {
    pub raw: String,
    /// Cleaned input, `None` when the input was blank
    pub normalized: Option<String>,
    pub canonical: Option<String>,
    /// Lowercased category of the canonical department
    pub category: Option<String>,
    pub confidence: f64,
    pub strategy: MatchStrategy,
    pub is_override: bool,
}

impl DepartmentResult {
    pub fn empty(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: None,
            canonical: None,
            category: None,
            confidence: 0.0,
            strategy: MatchStrategy::None,
            is_override: false,
        }
    }

    /// The value downstream consumers should display: canonical label when
    /// matched, otherwise the cleaned text (unless it was rejected).
    pub fn display_value(&self) -> Option<&str> {
        match (&self.canonical, self.strategy) {
            (Some(canonical), _) => Some(canonical.as_str()),
            (None, MatchStrategy::Rejected) => None,
            (None, _) => self.normalized.as_deref(),
        }
    }
}

/// Title resolver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleResult {
    pub raw: String,
    pub normalized: Option<String>,
    pub canonical: Option<String>,
    pub confidence: f64,
    pub strategy: MatchStrategy,
    /// Seniority label extracted from the cleaned title ("Senior", "Chief", ...)
    pub seniority: Option<String>,
    pub is_override: bool,
}

impl TitleResult {
    pub fn empty(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: None,
            canonical: None,
            confidence: 0.0,
            strategy: MatchStrategy::None,
            seniority: None,
            is_override: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_key_prefers_earlier_then_longer() {
        let early = MatchCandidate::new("Water", 0.9, MatchStrategy::Substring).at(0);
        let late = MatchCandidate::new("Wastewater", 0.9, MatchStrategy::Substring).at(6);
        assert!(early.rank_key() > late.rank_key());

        let short = MatchCandidate::new("Fire", 0.9, MatchStrategy::Substring).at(0);
        let long = MatchCandidate::new("Fire Rescue", 0.9, MatchStrategy::Substring).at(0);
        assert!(long.rank_key() > short.rank_key());
    }

    #[test]
    fn test_display_value_hides_rejected_input() {
        let mut result = DepartmentResult::empty("Room 101");
        result.normalized = Some("Room 101".to_string());
        result.strategy = MatchStrategy::Rejected;
        assert_eq!(result.display_value(), None);

        result.strategy = MatchStrategy::None;
        assert_eq!(result.display_value(), Some("Room 101"));
    }
}
