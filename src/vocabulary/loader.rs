// src/vocabulary/loader.rs - JSON vocabulary assets produced by the offline build step
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::{CanonicalEntry, DomainIndex, SeniorityPhrases, TitleVocabulary, VocabularyStore};
use crate::errors::CanonError;
use crate::utils::logging::{MatchComponent, MatchingLogger};

pub const DEPARTMENTS_ASSET: &str = "departments.json";
pub const TITLES_ASSET: &str = "titles.json";
pub const SEMANTIC_TOKENS_ASSET: &str = "semantic_tokens.json";
pub const SENIORITY_ASSET: &str = "seniority.json";

#[derive(Debug, Deserialize)]
struct DepartmentDocument {
    version: Option<String>,
    canonicals: Vec<String>,
    /// variant -> canonical
    #[serde(default)]
    variants: BTreeMap<String, String>,
    #[serde(default)]
    abbreviations: BTreeMap<String, String>,
    /// canonical -> category
    #[serde(default)]
    categories: HashMap<String, String>,
    #[serde(default)]
    keywords: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct TitleDocument {
    version: Option<String>,
    canonicals: Vec<String>,
    #[serde(default)]
    variants: BTreeMap<String, String>,
    #[serde(default)]
    job_titles: Vec<String>,
    #[serde(default)]
    official_titles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SemanticDocument {
    version: Option<String>,
    tokens: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SeniorityDocument {
    version: Option<String>,
    phrases: Vec<(String, String)>,
}

/// Every vocabulary a context needs.
#[derive(Debug, Clone, Default)]
pub struct VocabularyAssets {
    pub departments: VocabularyStore,
    pub titles: TitleVocabulary,
    pub domains: DomainIndex,
    pub seniority: SeniorityPhrases,
}

fn read_document<T: DeserializeOwned>(dir: &Path, asset: &str) -> Result<T> {
    let path = dir.join(asset);
    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

fn entries_from(
    canonicals: Vec<String>,
    variants: BTreeMap<String, String>,
    categories: &HashMap<String, String>,
) -> Vec<CanonicalEntry> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (variant, canonical) in variants {
        grouped.entry(canonical).or_default().push(variant);
    }
    canonicals
        .into_iter()
        .map(|label| CanonicalEntry {
            variants: grouped.remove(&label).unwrap_or_default(),
            category: categories.get(&label).cloned(),
            label,
        })
        .collect()
}

fn load_departments(dir: &Path, logger: &MatchingLogger) -> Result<VocabularyStore> {
    let doc: DepartmentDocument = read_document(dir, DEPARTMENTS_ASSET)?;
    let entries = entries_from(doc.canonicals, doc.variants, &doc.categories);
    let store = VocabularyStore::from_parts(
        entries,
        doc.abbreviations.into_iter().collect(),
        doc.keywords.into_iter().collect(),
    );
    logger.log_vocabulary_loaded(DEPARTMENTS_ASSET, doc.version.as_deref(), store.len());
    Ok(store)
}

fn load_titles(dir: &Path, logger: &MatchingLogger) -> Result<TitleVocabulary> {
    let doc: TitleDocument = read_document(dir, TITLES_ASSET)?;
    let entries = entries_from(doc.canonicals, doc.variants, &HashMap::new());
    let canonicals = VocabularyStore::from_parts(entries, Vec::new(), Vec::new());
    let titles = TitleVocabulary::new(canonicals, doc.job_titles, doc.official_titles);
    logger.log_vocabulary_loaded(TITLES_ASSET, doc.version.as_deref(), titles.canonicals.len());
    Ok(titles)
}

fn load_domains(dir: &Path, logger: &MatchingLogger) -> Result<DomainIndex> {
    let doc: SemanticDocument = read_document(dir, SEMANTIC_TOKENS_ASSET)?;
    let index = DomainIndex::new(doc.tokens);
    logger.log_vocabulary_loaded(SEMANTIC_TOKENS_ASSET, doc.version.as_deref(), index.len());
    Ok(index)
}

fn load_seniority(dir: &Path, logger: &MatchingLogger) -> Result<SeniorityPhrases> {
    let doc: SeniorityDocument = read_document(dir, SENIORITY_ASSET)?;
    let phrases = SeniorityPhrases::new(doc.phrases);
    logger.log_vocabulary_loaded(SENIORITY_ASSET, doc.version.as_deref(), phrases.len());
    Ok(phrases)
}

fn unavailable(asset: &str, err: anyhow::Error) -> CanonError {
    CanonError::VocabularyUnavailable {
        asset: asset.to_string(),
        reason: format!("{:#}", err),
    }
}

/// Load all four assets, failing on the first one that is missing or broken.
pub fn load_dir(dir: &Path) -> Result<VocabularyAssets, CanonError> {
    let logger = MatchingLogger::new(MatchComponent::Vocabulary);
    Ok(VocabularyAssets {
        departments: load_departments(dir, &logger).map_err(|e| unavailable(DEPARTMENTS_ASSET, e))?,
        titles: load_titles(dir, &logger).map_err(|e| unavailable(TITLES_ASSET, e))?,
        domains: load_domains(dir, &logger).map_err(|e| unavailable(SEMANTIC_TOKENS_ASSET, e))?,
        seniority: load_seniority(dir, &logger).map_err(|e| unavailable(SENIORITY_ASSET, e))?,
    })
}

/// Load what can be loaded. Each asset that fails is replaced by an empty
/// vocabulary and reported with a warning.
pub fn load_dir_or_empty(dir: &Path) -> VocabularyAssets {
    let logger = MatchingLogger::new(MatchComponent::Vocabulary);
    logger.log_phase("Loading vocabulary assets", Some(&dir.display().to_string()));

    fn or_empty<T: Default>(logger: &MatchingLogger, asset: &str, loaded: Result<T>) -> T {
        loaded.unwrap_or_else(|e| {
            logger.log_vocabulary_unavailable(asset, &format!("{:#}", e));
            T::default()
        })
    }

    VocabularyAssets {
        departments: or_empty(&logger, DEPARTMENTS_ASSET, load_departments(dir, &logger)),
        titles: or_empty(&logger, TITLES_ASSET, load_titles(dir, &logger)),
        domains: or_empty(&logger, SEMANTIC_TOKENS_ASSET, load_domains(dir, &logger)),
        seniority: or_empty(&logger, SENIORITY_ASSET, load_seniority(dir, &logger)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, asset: &str, body: &str) {
        fs::write(dir.join(asset), body).unwrap();
    }

    #[test]
    fn test_load_departments_document() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            DEPARTMENTS_ASSET,
            r#"{
                "version": "2024.1",
                "canonicals": ["Police", "Fire"],
                "variants": {"police dept": "Police", "ghost": "Nowhere"},
                "abbreviations": {"pd": "Police"},
                "categories": {"Police": "Public Safety"},
                "keywords": {}
            }"#,
        );
        let logger = MatchingLogger::new(MatchComponent::Vocabulary);
        let store = load_departments(dir.path(), &logger).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup_variant("Police Dept"), Some("Police"));
        assert!(store.lookup_variant("ghost").is_none());
        assert_eq!(store.abbreviation("PD"), Some("Police"));
        assert_eq!(store.category("Police"), Some("Public Safety"));
    }

    #[test]
    fn test_strict_load_reports_missing_asset() {
        let dir = tempdir().unwrap();
        let err = load_dir(dir.path()).unwrap_err();
        match err {
            CanonError::VocabularyUnavailable { asset, .. } => assert_eq!(asset, DEPARTMENTS_ASSET),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_lenient_load_degrades_per_asset() {
        let dir = tempdir().unwrap();
        write(dir.path(), SEMANTIC_TOKENS_ASSET, r#"{"version": "1", "tokens": {"software": "IT"}}"#);
        write(dir.path(), SENIORITY_ASSET, "not json");

        let assets = load_dir_or_empty(dir.path());
        assert!(assets.departments.is_empty());
        assert!(assets.titles.is_empty());
        assert!(assets.seniority.is_empty());
        assert_eq!(assets.domains.len(), 1);
    }
}
