// src/errors.rs

use thiserror::Error;

/// Errors surfaced to callers of the resolvers, the scorer and the loader.
///
/// Blank or missing input is never an error; the resolvers hand back an
/// empty result for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanonError {
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("vocabulary asset `{asset}` unavailable: {reason}")]
    VocabularyUnavailable { asset: String, reason: String },
}

impl CanonError {
    pub fn invalid(name: &'static str, value: impl ToString) -> Self {
        CanonError::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

/// Rejects thresholds outside [0, 1] (NaN included). Never clamps.
pub fn validate_threshold(threshold: f64) -> Result<f64, CanonError> {
    if threshold.is_nan() || !(0.0..=1.0).contains(&threshold) {
        return Err(CanonError::invalid("threshold", threshold));
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(0.6).is_ok());
        assert!(validate_threshold(-0.01).is_err());
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = validate_threshold(2.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid parameter `threshold`: 2");
    }
}
