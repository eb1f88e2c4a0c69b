// src/vocabulary/mod.rs
//
// Immutable vocabularies plus the context that owns them. Everything in here
// is read-only after construction; the only interior mutability is the memo
// caches, which are safe to miss.

pub mod builtin;
pub mod loader;

use log::{debug, info, warn};
use lru::LruCache;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::config::CanonConfig;
use crate::models::matching::{DepartmentResult, TitleResult};
use crate::utils::constants::DEFAULT_CACHE_SIZE;
use crate::utils::text::{alnum_tokens, squash_tokens};

/// Domain tags that never take part in voting.
const EVAPORATING_TAGS: [&str; 2] = ["NULL", "GENERIC"];

//------------------------------------------------------------------------------
// CANONICAL VOCABULARY STORE
//------------------------------------------------------------------------------

/// A canonical label with its known spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    pub label: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CanonicalEntry {
    pub fn new(label: &str, category: Option<&str>, variants: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
            category: category.map(str::to_string),
        }
    }
}

/// Canonical labels, variant index and abbreviation map. Built once.
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    labels: Vec<String>,
    label_set: HashSet<String>,
    /// lowercased canonical -> canonical
    label_lower: HashMap<String, String>,
    /// lowercased variant -> canonical
    variant_index: HashMap<String, String>,
    /// lowercased abbreviation token -> canonical
    abbreviations: HashMap<String, String>,
    /// keyword -> canonical, checked in insertion order
    keywords: Vec<(String, String)>,
    categories: HashMap<String, String>,
}

impl VocabularyStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store. Variants, abbreviations and keywords pointing at labels
    /// outside `entries` are dropped so every lookup lands on a canonical label.
    pub fn from_parts(
        entries: Vec<CanonicalEntry>,
        abbreviations: Vec<(String, String)>,
        keywords: Vec<(String, String)>,
    ) -> Self {
        let mut store = Self::default();
        let mut sorted = entries;
        sorted.sort_by(|a, b| a.label.cmp(&b.label));
        sorted.dedup_by(|a, b| a.label == b.label);

        for entry in &sorted {
            store.labels.push(entry.label.clone());
            store.label_set.insert(entry.label.clone());
            store
                .label_lower
                .insert(entry.label.to_lowercase(), entry.label.clone());
            if let Some(category) = &entry.category {
                store.categories.insert(entry.label.clone(), category.clone());
            }
        }
        for entry in &sorted {
            for variant in &entry.variants {
                let key = variant.trim().to_lowercase();
                if key.is_empty() || store.label_lower.contains_key(&key) {
                    continue;
                }
                store.variant_index.entry(key).or_insert_with(|| entry.label.clone());
            }
        }
        for (abbr, canonical) in abbreviations {
            if store.label_set.contains(&canonical) {
                store.abbreviations.insert(abbr.to_lowercase(), canonical);
            } else {
                debug!("Dropping abbreviation {} -> {} (unknown label)", abbr, canonical);
            }
        }
        for (keyword, canonical) in keywords {
            if store.label_set.contains(&canonical) {
                store.keywords.push((keyword.to_lowercase(), canonical));
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Canonical labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn is_canonical(&self, text: &str) -> bool {
        self.label_set.contains(text)
    }

    /// Canonical label whose lowercase form equals `text` lowercased.
    pub fn canonical_caseless(&self, text: &str) -> Option<&str> {
        self.label_lower.get(&text.to_lowercase()).map(String::as_str)
    }

    pub fn lookup_variant(&self, text: &str) -> Option<&str> {
        self.variant_index
            .get(text.trim().to_lowercase().as_str())
            .map(String::as_str)
    }

    pub fn abbreviation(&self, token: &str) -> Option<&str> {
        self.abbreviations.get(&token.to_lowercase()).map(String::as_str)
    }

    /// First keyword that appears as a whole token of `text`.
    pub fn keyword_shortcut(&self, text: &str) -> Option<&str> {
        let tokens: HashSet<String> = alnum_tokens(text).into_iter().collect();
        self.keywords
            .iter()
            .find(|(keyword, _)| tokens.contains(keyword))
            .map(|(_, canonical)| canonical.as_str())
    }

    pub fn category(&self, label: &str) -> Option<&str> {
        self.categories.get(label).map(String::as_str)
    }

    pub fn variant_count(&self) -> usize {
        self.variant_index.len()
    }
}

//------------------------------------------------------------------------------
// TITLE VOCABULARY
//------------------------------------------------------------------------------

/// Everything the three-tier title resolver consults.
#[derive(Debug, Clone, Default)]
pub struct TitleVocabulary {
    /// Curated canonical titles and their variants
    pub canonicals: VocabularyStore,
    /// Real-world job titles, in display form
    job_titles: Vec<String>,
    /// lowercased job title -> display form
    job_title_index: HashMap<String, String>,
    /// lowercased official classification title -> its official spelling
    official_index: HashMap<String, String>,
}

impl TitleVocabulary {
    pub fn new(canonicals: VocabularyStore, job_titles: Vec<String>, official_titles: Vec<String>) -> Self {
        let mut job_titles: Vec<String> = job_titles
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        job_titles.sort();
        job_titles.dedup();
        let job_title_index = job_titles
            .iter()
            .map(|t| (t.to_lowercase(), t.clone()))
            .collect();
        let official_index = official_titles
            .into_iter()
            .map(|t| (t.trim().to_lowercase(), t.trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        Self {
            canonicals,
            job_titles,
            job_title_index,
            official_index,
        }
    }

    pub fn job_titles(&self) -> impl Iterator<Item = &str> {
        self.job_titles.iter().map(String::as_str)
    }

    pub fn exact_job_title(&self, text: &str) -> Option<&str> {
        self.job_title_index
            .get(&text.to_lowercase())
            .map(String::as_str)
    }

    pub fn official_title(&self, text: &str) -> Option<&str> {
        self.official_index
            .get(&text.to_lowercase())
            .map(String::as_str)
    }

    /// Standardized form of a job title: its canonical label if one exists.
    pub fn standardize(&self, job_title: &str) -> Option<&str> {
        if let Some(canonical) = self.canonicals.canonical_caseless(job_title) {
            return Some(canonical);
        }
        self.canonicals.lookup_variant(job_title)
    }

    pub fn is_empty(&self) -> bool {
        self.canonicals.is_empty() && self.job_titles.is_empty() && self.official_index.is_empty()
    }
}

//------------------------------------------------------------------------------
// SEMANTIC DOMAIN INDEX
//------------------------------------------------------------------------------

/// token -> domain tag ("software" -> "IT").
#[derive(Debug, Clone, Default)]
pub struct DomainIndex {
    tokens: HashMap<String, String>,
}

impl DomainIndex {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|(token, tag)| (token.to_lowercase(), tag.to_uppercase()))
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tag of one token, `None` for unknown tokens and evaporating tags.
    pub fn tag(&self, token: &str) -> Option<&str> {
        self.tokens
            .get(token)
            .map(String::as_str)
            .filter(|tag| !EVAPORATING_TAGS.contains(tag))
    }

    /// Domain tags voted by the tokens of `text`.
    pub fn domains(&self, text: &str) -> BTreeSet<String> {
        squash_tokens(text)
            .iter()
            .filter_map(|token| self.tag(token))
            .map(str::to_string)
            .collect()
    }
}

//------------------------------------------------------------------------------
// SENIORITY PHRASES
//------------------------------------------------------------------------------

/// Ordered seniority phrases. Multi-word phrases are always tried before
/// single words; within a word count the configured order holds.
#[derive(Debug, Clone, Default)]
pub struct SeniorityPhrases {
    phrases: Vec<(Vec<String>, String)>,
}

impl SeniorityPhrases {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        let mut phrases: Vec<(Vec<String>, String)> = pairs
            .into_iter()
            .map(|(phrase, label)| (squash_tokens(&phrase), label))
            .filter(|(tokens, _)| !tokens.is_empty())
            .collect();
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { phrases }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[String], &str)> {
        self.phrases.iter().map(|(tokens, label)| (tokens.as_slice(), label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

//------------------------------------------------------------------------------
// CONTEXT
//------------------------------------------------------------------------------

/// Memo key: input text plus the threshold's bit pattern.
type MemoKey = (String, u64);

/// Load-once vocabularies and the bounded memo caches in front of the
/// resolvers. Construct one at startup and pass it by reference.
pub struct CanonContext {
    pub departments: VocabularyStore,
    pub titles: TitleVocabulary,
    pub domains: DomainIndex,
    pub seniority: SeniorityPhrases,
    config: CanonConfig,
    department_cache: Mutex<LruCache<MemoKey, DepartmentResult>>,
    title_cache: Mutex<LruCache<MemoKey, TitleResult>>,
}

impl CanonContext {
    pub fn from_parts(
        departments: VocabularyStore,
        titles: TitleVocabulary,
        domains: DomainIndex,
        seniority: SeniorityPhrases,
        config: CanonConfig,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.cache_size)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_SIZE))
            .unwrap_or(NonZeroUsize::MIN);

        info!(
            "Initializing CanonContext: {} departments ({} variants), {} canonical titles ({} variants), {} domain tokens, cache size {}",
            departments.len(),
            departments.variant_count(),
            titles.canonicals.len(),
            titles.canonicals.variant_count(),
            domains.len(),
            capacity
        );

        Self {
            departments,
            titles,
            domains,
            seniority,
            config,
            department_cache: Mutex::new(LruCache::new(capacity)),
            title_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Context over the vocabulary compiled into the crate.
    pub fn builtin() -> Self {
        Self::builtin_with_config(CanonConfig::default())
    }

    pub fn builtin_with_config(config: CanonConfig) -> Self {
        Self::from_parts(
            builtin::department_vocabulary(),
            builtin::title_vocabulary(),
            builtin::domain_index(),
            builtin::seniority_phrases(),
            config,
        )
    }

    /// Context for `config`: assets from `vocab_dir` when set, otherwise the
    /// built-in vocabulary. Asset failures degrade to empty vocabularies.
    pub fn new(config: CanonConfig) -> Self {
        match config.vocab_dir.clone() {
            Some(dir) => {
                let assets = loader::load_dir_or_empty(&dir);
                Self::from_parts(
                    assets.departments,
                    assets.titles,
                    assets.domains,
                    assets.seniority,
                    config,
                )
            }
            None => Self::builtin_with_config(config),
        }
    }

    /// Context with every vocabulary empty. All lookups fail closed.
    pub fn empty() -> Self {
        Self::from_parts(
            VocabularyStore::empty(),
            TitleVocabulary::default(),
            DomainIndex::default(),
            SeniorityPhrases::default(),
            CanonConfig::default(),
        )
    }

    pub fn config(&self) -> &CanonConfig {
        &self.config
    }

    pub(crate) fn memo_key(text: &str, threshold: f64) -> MemoKey {
        (text.to_string(), threshold.to_bits())
    }

    pub(crate) fn cached_department<F>(&self, key: MemoKey, compute: F) -> DepartmentResult
    where
        F: FnOnce() -> DepartmentResult,
    {
        memoize(&self.department_cache, key, compute)
    }

    pub(crate) fn cached_title<F>(&self, key: MemoKey, compute: F) -> TitleResult
    where
        F: FnOnce() -> TitleResult,
    {
        memoize(&self.title_cache, key, compute)
    }

    /// Drop every memoized result.
    pub fn clear_caches(&self) {
        if let Ok(mut cache) = self.department_cache.lock() {
            cache.clear();
        }
        if let Ok(mut cache) = self.title_cache.lock() {
            cache.clear();
        }
    }

    /// (department entries, title entries) currently memoized.
    pub fn cache_len(&self) -> (usize, usize) {
        let departments = self.department_cache.lock().map(|c| c.len()).unwrap_or(0);
        let titles = self.title_cache.lock().map(|c| c.len()).unwrap_or(0);
        (departments, titles)
    }
}

/// The lock is never held while `compute` runs. A poisoned cache is skipped.
fn memoize<V, F>(cache: &Mutex<LruCache<MemoKey, V>>, key: MemoKey, compute: F) -> V
where
    V: Clone,
    F: FnOnce() -> V,
{
    if let Ok(mut guard) = cache.lock() {
        if let Some(hit) = guard.get(&key) {
            return hit.clone();
        }
    }
    let value = compute();
    match cache.lock() {
        Ok(mut guard) => {
            guard.put(key, value.clone());
        }
        Err(_) => warn!("Memo cache lock poisoned; result not cached"),
    }
    value
}

static DEFAULT_CONTEXT: Lazy<CanonContext> = Lazy::new(|| CanonContext::new(CanonConfig::from_env()));

/// Process-wide context, built from the environment on first use.
pub fn default_context() -> &'static CanonContext {
    &DEFAULT_CONTEXT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_store() -> VocabularyStore {
        VocabularyStore::from_parts(
            vec![
                CanonicalEntry::new("Police", Some("Public Safety"), &["police department", "pd"]),
                CanonicalEntry::new("Fire", Some("Public Safety"), &["fire rescue"]),
            ],
            vec![("hr".to_string(), "Human Resources".to_string())],
            vec![("sheriff".to_string(), "Sheriff".to_string())],
        )
    }

    #[test]
    fn test_store_lookups() {
        let store = small_store();
        assert_eq!(store.len(), 2);
        assert!(store.is_canonical("Police"));
        assert!(!store.is_canonical("police"));
        assert_eq!(store.canonical_caseless("POLICE"), Some("Police"));
        assert_eq!(store.lookup_variant("Police Department"), Some("Police"));
        assert_eq!(store.category("Fire"), Some("Public Safety"));
        assert_eq!(store.labels().collect::<Vec<_>>(), vec!["Fire", "Police"]);
    }

    #[test]
    fn test_store_drops_dangling_targets() {
        let store = small_store();
        assert!(store.abbreviation("hr").is_none());
        assert!(store.keyword_shortcut("County Sheriff").is_none());
    }

    #[test]
    fn test_domain_index_evaporates_null() {
        let mut tokens = HashMap::new();
        tokens.insert("software".to_string(), "IT".to_string());
        tokens.insert("manager".to_string(), "NULL".to_string());
        let index = DomainIndex::new(tokens);

        assert_eq!(index.domains("Software Manager").len(), 1);
        assert!(index.domains("Manager").is_empty());
        assert!(index.domains("").is_empty());
    }

    #[test]
    fn test_seniority_orders_multi_word_first() {
        let phrases = SeniorityPhrases::new(vec![
            ("senior".to_string(), "Senior".to_string()),
            ("vice president".to_string(), "Vice President".to_string()),
        ]);
        let first = phrases.iter().next().map(|(tokens, _)| tokens.len());
        assert_eq!(first, Some(2));
    }

    #[test]
    fn test_memo_cache_hits() {
        let ctx = CanonContext::empty();
        let key = CanonContext::memo_key("Police", 0.6);
        let first = ctx.cached_department(key.clone(), || DepartmentResult::empty("Police"));
        let second = ctx.cached_department(key, || DepartmentResult::empty("changed"));
        assert_eq!(first, second);
        assert_eq!(ctx.cache_len().0, 1);

        ctx.clear_caches();
        assert_eq!(ctx.cache_len(), (0, 0));
    }
}
