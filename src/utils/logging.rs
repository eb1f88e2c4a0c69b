// src/utils/logging.rs - Phase logging for vocabulary loads and bulk runs
use log::{info, warn};
use std::time::Instant;

/// Initialize env_logger from `RUST_LOG` (default `info`). Safe to call more
/// than once; only the first call installs the logger.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Which part of the crate is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchComponent {
    Department,
    Title,
    Compare,
    Vocabulary,
}

#[derive(Clone)]
pub struct MatchingLogger {
    component_name: &'static str,
    component_emoji: &'static str,
    start_time: Instant,
}

impl MatchingLogger {
    pub fn new(component: MatchComponent) -> Self {
        let (component_name, component_emoji) = match component {
            MatchComponent::Department => ("DEPARTMENT", "🏢"),
            MatchComponent::Title => ("TITLE", "💼"),
            MatchComponent::Compare => ("COMPARE", "🔍"),
            MatchComponent::Vocabulary => ("VOCABULARY", "📚"),
        };

        Self {
            component_name,
            component_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, total_inputs: usize) {
        info!(
            "[{}] {} 🚀 Starting {} run over {} inputs",
            self.component_name,
            self.component_emoji,
            self.component_name.to_lowercase(),
            total_inputs
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.component_name, self.component_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.component_name, self.component_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_dedup(&self, total_inputs: usize, unique_inputs: usize) {
        let saved = total_inputs.saturating_sub(unique_inputs);
        info!(
            "[{}] {} ♻️  Deduplicated {} inputs → {} unique ({} repeats skipped)",
            self.component_name, self.component_emoji, total_inputs, unique_inputs, saved
        );
    }

    pub fn log_batch_processing_start(&self, unique_inputs: usize, batch_size: usize) {
        let batch_count = (unique_inputs + batch_size - 1) / batch_size.max(1);
        info!(
            "[{}] {} ⚙️  Processing {} inputs in {} batches (batch size: {})",
            self.component_name, self.component_emoji, unique_inputs, batch_count, batch_size
        );
    }

    pub fn log_batch_progress(&self, batch_num: usize, total_batches: usize, inputs_in_batch: usize) {
        if batch_num % 5 == 0 || batch_num == 1 || batch_num == total_batches {
            info!(
                "[{}] {} 📦 Processing batch {}/{} ({} inputs)",
                self.component_name, self.component_emoji, batch_num, total_batches, inputs_in_batch
            );
        }
    }

    pub fn log_vocabulary_loaded(&self, asset: &str, version: Option<&str>, entries: usize) {
        info!(
            "[{}] {} 📊 Loaded {} ({} entries, version {})",
            self.component_name,
            self.component_emoji,
            asset,
            entries,
            version.unwrap_or("unversioned")
        );
    }

    pub fn log_vocabulary_unavailable(&self, asset: &str, reason: &str) {
        warn!(
            "[{}] {} ⚠️  {} unavailable, falling back to an empty vocabulary: {}",
            self.component_name, self.component_emoji, asset, reason
        );
    }

    pub fn log_completion(&self, processed: usize, matched: usize) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {} inputs processed in {:.2?}",
            self.component_name, self.component_emoji, processed, duration
        );
        if processed > 0 {
            let rate = (matched as f64 / processed as f64) * 100.0;
            info!(
                "[{}] {} 📊 Results: {} with a positive outcome ({:.1}%)",
                self.component_name, self.component_emoji, matched, rate
            );
        }
    }
}
