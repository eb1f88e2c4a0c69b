// src/bulk.rs - Deduplicating bulk runner
//
// Identical inputs are resolved once: each input is keyed by a SHA-256
// digest, unique inputs are split into batches and handed to blocking tasks
// (at most `bulk_workers` at a time), and results are expanded back into
// input order. Output is the same as resolving every input on its own.

use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::errors::{validate_threshold, CanonError};
use crate::matching::{compare, department, title};
use crate::models::matching::{DepartmentResult, TitleResult};
use crate::models::record::{ContactRecord, SimilarityWeights};
use crate::utils::logging::{MatchComponent, MatchingLogger};
use crate::vocabulary::CanonContext;

fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("  {spinner:.blue} [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    pb
}

async fn run_deduplicated<I, O, K, F, P>(
    ctx: &Arc<CanonContext>,
    component: MatchComponent,
    inputs: &[I],
    key: K,
    work: F,
    is_positive: P,
) -> Result<Vec<O>>
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
    K: Fn(&I) -> String,
    F: Fn(&CanonContext, &I) -> Result<O, CanonError> + Send + Sync + 'static,
    P: Fn(&O) -> bool,
{
    let logger = MatchingLogger::new(component);
    logger.log_start(inputs.len());

    logger.log_phase("Deduplication", Some("hashing inputs"));
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<I> = Vec::new();
    let mut slots: Vec<usize> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let slot = *index_of.entry(digest(&key(input))).or_insert_with(|| {
            unique.push(input.clone());
            unique.len() - 1
        });
        slots.push(slot);
    }
    logger.log_dedup(inputs.len(), unique.len());

    let config = ctx.config();
    let batch_size = config.bulk_batch_size.max(1);
    let total_batches = (unique.len() + batch_size - 1) / batch_size;
    let semaphore = Arc::new(Semaphore::new(config.bulk_workers.max(1)));
    let pb = config.show_progress.then(|| progress_bar(unique.len()));
    let work = Arc::new(work);

    logger.log_batch_processing_start(unique.len(), batch_size);
    let mut tasks = Vec::with_capacity(total_batches);
    for (i, batch) in unique.chunks(batch_size).enumerate() {
        logger.log_batch_progress(i + 1, total_batches, batch.len());
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("bulk worker pool closed")?;
        let batch = batch.to_vec();
        let ctx = Arc::clone(ctx);
        let work = Arc::clone(&work);
        let pb = pb.clone();

        tasks.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let results: Result<Vec<O>, CanonError> = batch.iter().map(|item| work(&ctx, item)).collect();
            if let Some(pb) = &pb {
                pb.inc(batch.len() as u64);
            }
            results
        }));
    }

    let mut unique_results: Vec<O> = Vec::with_capacity(unique.len());
    for joined in join_all(tasks).await {
        let batch = joined.context("bulk worker task failed")??;
        unique_results.extend(batch);
    }
    if let Some(pb) = &pb {
        pb.finish_with_message("done");
    }

    logger.log_phase("Expansion", Some("restoring input order"));
    let outputs: Vec<O> = slots.iter().map(|&slot| unique_results[slot].clone()).collect();
    let positive = outputs.iter().filter(|o| is_positive(*o)).count();
    logger.log_completion(outputs.len(), positive);
    Ok(outputs)
}

/// Resolve many department strings; identical strings are resolved once.
/// `None` uses the context's configured default threshold.
pub async fn resolve_departments(
    ctx: Arc<CanonContext>,
    inputs: &[String],
    threshold: Option<f64>,
) -> Result<Vec<DepartmentResult>> {
    let threshold = validate_threshold(threshold.unwrap_or(ctx.config().default_threshold))?;
    run_deduplicated(
        &ctx,
        MatchComponent::Department,
        inputs,
        |raw: &String| raw.clone(),
        move |ctx: &CanonContext, raw: &String| department::resolve(ctx, raw, threshold),
        |result: &DepartmentResult| result.canonical.is_some(),
    )
    .await
}

/// Resolve many (title, department context) pairs. `None` uses the configured default threshold.
pub async fn resolve_titles(
    ctx: Arc<CanonContext>,
    inputs: &[(String, Option<String>)],
    threshold: Option<f64>,
) -> Result<Vec<TitleResult>> {
    let threshold = validate_threshold(threshold.unwrap_or(ctx.config().default_threshold))?;
    run_deduplicated(
        &ctx,
        MatchComponent::Title,
        inputs,
        |(raw, dept): &(String, Option<String>)| format!("{}\u{1f}{}", raw, dept.as_deref().unwrap_or_default()),
        move |ctx: &CanonContext, (raw, dept): &(String, Option<String>)| {
            title::resolve(ctx, raw, threshold, dept.as_deref())
        },
        |result: &TitleResult| result.canonical.is_some(),
    )
    .await
}

/// Score many record pairs. Pairs with the same fingerprints are scored once.
pub async fn compare_pairs(
    ctx: Arc<CanonContext>,
    pairs: &[(ContactRecord, ContactRecord)],
    weights: SimilarityWeights,
) -> Result<Vec<f64>> {
    run_deduplicated(
        &ctx,
        MatchComponent::Compare,
        pairs,
        |(a, b): &(ContactRecord, ContactRecord)| format!("{}\u{1f}{}", a.fingerprint(), b.fingerprint()),
        move |_: &CanonContext, (a, b): &(ContactRecord, ContactRecord)| Ok(compare::compare(a, b, &weights)),
        |score: &f64| *score >= 50.0,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanonConfig;

    fn small_batches() -> Arc<CanonContext> {
        let config = CanonConfig {
            bulk_batch_size: 2,
            bulk_workers: 2,
            ..CanonConfig::default()
        };
        Arc::new(CanonContext::builtin_with_config(config))
    }

    #[tokio::test]
    async fn test_departments_match_individual_resolution() {
        let ctx = small_batches();
        let inputs: Vec<String> = [
            "Polce Dept",
            "Police",
            "Polce Dept",
            "Station #14 - Ladder Unit",
            "HR Dept",
            "",
            "Police",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let bulk = resolve_departments(Arc::clone(&ctx), &inputs, Some(0.6)).await.unwrap();
        assert_eq!(bulk.len(), inputs.len());
        let fresh = CanonContext::builtin();
        for (raw, result) in inputs.iter().zip(&bulk) {
            assert_eq!(result, &department::resolve(&fresh, raw, 0.6).unwrap());
        }
    }

    #[tokio::test]
    async fn test_titles_keep_context_per_input() {
        let ctx = small_batches();
        let inputs = vec![
            ("Coordinator".to_string(), None),
            ("Coordinator".to_string(), Some("Parks".to_string())),
            ("Coordinator".to_string(), None),
            ("Sr. Accountant".to_string(), Some("Finance".to_string())),
        ];
        let bulk = resolve_titles(ctx, &inputs, Some(0.6)).await.unwrap();
        assert!(bulk[0].canonical.is_none());
        assert_eq!(bulk[1].canonical.as_deref(), Some("Recreation Coordinator"));
        assert!(bulk[2].canonical.is_none());
        assert_eq!(bulk[3].seniority.as_deref(), Some("Senior"));
    }

    #[tokio::test]
    async fn test_compare_pairs_in_order() {
        let ctx = small_batches();
        let alice = ContactRecord::new().with_name("Alice Smith").with_email("alice@city.gov");
        let bob = ContactRecord::new().with_name("Bob Jones");
        let pairs = vec![
            (alice.clone(), alice.clone()),
            (alice.clone(), bob.clone()),
            (alice.clone(), alice.clone()),
        ];
        let weights = SimilarityWeights::default();
        let scores = compare_pairs(ctx, &pairs, weights).await.unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores[0] > 99.9);
        assert_eq!(scores[0], scores[2]);
        assert_eq!(scores[1], compare::compare(&alice, &bob, &weights));
    }

    #[tokio::test]
    async fn test_invalid_threshold_and_empty_input() {
        let ctx = small_batches();
        assert!(resolve_departments(Arc::clone(&ctx), &["Police".to_string()], Some(1.2)).await.is_err());
        assert!(resolve_departments(ctx, &[], Some(0.6)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_threshold_uses_configured_default() {
        let strict = Arc::new(CanonContext::builtin_with_config(CanonConfig {
            default_threshold: 1.0,
            ..CanonConfig::default()
        }));
        let inputs = vec!["Polce Dept".to_string()];
        let defaulted = resolve_departments(Arc::clone(&strict), &inputs, None).await.unwrap();
        let explicit = resolve_departments(Arc::clone(&strict), &inputs, Some(1.0)).await.unwrap();
        assert_eq!(defaulted, explicit);

        let broken = Arc::new(CanonContext::builtin_with_config(CanonConfig {
            default_threshold: 7.0,
            ..CanonConfig::default()
        }));
        assert!(resolve_departments(broken, &inputs, None).await.is_err());
    }
}
