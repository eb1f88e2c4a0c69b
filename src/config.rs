// src/config.rs

use std::env;
use std::path::PathBuf;

use crate::errors::{validate_threshold, CanonError};
use crate::utils::constants::{
    DEFAULT_BULK_BATCH_SIZE, DEFAULT_CACHE_SIZE, DEFAULT_MATCH_THRESHOLD,
};

/// Runtime configuration for the canonicalization context and bulk runner.
#[derive(Debug, Clone)]
pub struct CanonConfig {
    /// Directory holding JSON vocabulary assets. `None` uses the built-in vocabulary.
    pub vocab_dir: Option<PathBuf>,
    /// Capacity of each memo cache owned by the context
    pub cache_size: usize,
    /// Threshold used by callers that do not pass one explicitly
    pub default_threshold: f64,
    /// Maximum number of concurrent blocking tasks in a bulk run
    pub bulk_workers: usize,
    /// Unique inputs handed to the pool per batch
    pub bulk_batch_size: usize,
    /// Whether bulk runs draw an indicatif progress bar
    pub show_progress: bool,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            vocab_dir: None,
            cache_size: DEFAULT_CACHE_SIZE,
            default_threshold: DEFAULT_MATCH_THRESHOLD,
            bulk_workers: num_cpus::get(),
            bulk_batch_size: DEFAULT_BULK_BATCH_SIZE,
            show_progress: false,
        }
    }
}

impl CanonConfig {
    /// Create configuration from environment variables (and a `.env` file if present).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let positive = |key: &str| {
            lookup(key)
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
        };

        Self {
            vocab_dir: lookup("CANON_VOCAB_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            cache_size: positive("CANON_CACHE_SIZE").unwrap_or(defaults.cache_size),
            default_threshold: lookup("CANON_DEFAULT_THRESHOLD")
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(defaults.default_threshold),
            bulk_workers: positive("CANON_BULK_WORKERS").unwrap_or(defaults.bulk_workers),
            bulk_batch_size: positive("CANON_BULK_BATCH_SIZE").unwrap_or(defaults.bulk_batch_size),
            show_progress: lookup("CANON_PROGRESS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(false),
        }
    }

    /// Checks the values a caller may have set by hand.
    pub fn validate(&self) -> Result<(), CanonError> {
        validate_threshold(self.default_threshold)?;
        if self.bulk_workers == 0 {
            return Err(CanonError::invalid("bulk_workers", 0));
        }
        if self.bulk_batch_size == 0 {
            return Err(CanonError::invalid("bulk_batch_size", 0));
        }
        if self.cache_size == 0 {
            return Err(CanonError::invalid("cache_size", 0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CanonConfig::default();
        assert!(config.vocab_dir.is_none());
        assert_eq!(config.cache_size, DEFAULT_CACHE_SIZE);
        assert_eq!(config.default_threshold, DEFAULT_MATCH_THRESHOLD);
        assert!(config.bulk_workers >= 1);
        assert!(!config.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CanonConfig::default();
        config.default_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = CanonConfig::default();
        config.bulk_workers = 0;
        assert!(config.validate().is_err());
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = CanonConfig::from_lookup(lookup_from(&[
            ("CANON_CACHE_SIZE", "128"),
            ("CANON_BULK_BATCH_SIZE", "7"),
            ("CANON_PROGRESS", "true"),
            ("CANON_VOCAB_DIR", "/srv/vocab"),
            ("CANON_DEFAULT_THRESHOLD", "0.8"),
        ]));
        assert_eq!(config.cache_size, 128);
        assert_eq!(config.bulk_batch_size, 7);
        assert!(config.show_progress);
        assert_eq!(config.vocab_dir, Some(PathBuf::from("/srv/vocab")));
        assert_eq!(config.default_threshold, 0.8);
    }

    #[test]
    fn test_bad_lookup_values_keep_defaults() {
        let config = CanonConfig::from_lookup(lookup_from(&[
            ("CANON_CACHE_SIZE", "0"),
            ("CANON_BULK_WORKERS", "many"),
            ("CANON_PROGRESS", "yes"),
            ("CANON_VOCAB_DIR", "  "),
        ]));
        let defaults = CanonConfig::default();
        assert_eq!(config.cache_size, defaults.cache_size);
        assert_eq!(config.bulk_workers, defaults.bulk_workers);
        assert!(!config.show_progress);
        assert!(config.vocab_dir.is_none());
    }
}
