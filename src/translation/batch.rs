/*!
 * Batch translation processing.
 *
 * This module splits the texts of a run into fixed-size batches and sends
 * them through a provider one batch at a time, reporting progress after
 * each batch.
 */

use log::{debug, error};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::TranslationError;
use crate::providers::Provider;

use super::progress::ProgressReporter;

/// Batch translator for processing source texts in sequential batches
///
/// Batches never overlap: batch N+1 is only sent once every request of
/// batch N has settled. Within a batch the provider is free to run its
/// requests concurrently.
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// The provider to send batches to
    provider: Arc<dyn Provider>,

    /// Number of texts per batch
    batch_size: usize,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Arc<dyn Provider>, batch_size: usize) -> Result<Self, TranslationError> {
        if batch_size == 0 {
            return Err(TranslationError::InvalidBatchSize);
        }

        Ok(Self { provider, batch_size })
    }

    /// Number of texts per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The provider batches are sent to
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Number of batches a run over `count` texts will send
    pub fn batch_count(&self, count: usize) -> usize {
        count.div_ceil(self.batch_size)
    }

    /// Translate all texts, preserving their order
    ///
    /// The result always has the same length as `texts`; position `i` holds
    /// the translation of `texts[i]` or an empty string if that item failed.
    /// A provider error aborts the run and no partial results are returned.
    /// `progress` is started at `{0, texts.len()}` and advanced after each
    /// batch; resetting it is left to the caller.
    pub async fn translate_all(
        &self,
        texts: &[String],
        target_language: &str,
        progress: &ProgressReporter,
    ) -> Result<Vec<String>, TranslationError> {
        progress.start(texts.len());

        let mut results = Vec::with_capacity(texts.len());
        let total_batches = self.batch_count(texts.len());

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let start_time = Instant::now();

            let batch_results = self.provider
                .translate_batch(batch, target_language)
                .await
                .map_err(|e| {
                    error!("Batch {} of {} failed: {}", batch_index + 1, total_batches, e);
                    e
                })?;

            if batch_results.len() != batch.len() {
                return Err(TranslationError::ResultCountMismatch {
                    expected: batch.len(),
                    actual: batch_results.len(),
                });
            }

            results.extend(batch_results);
            progress.advance(batch.len());

            debug!(
                "Batch {} of {} completed in {:?}",
                batch_index + 1,
                total_batches,
                start_time.elapsed()
            );
        }

        Ok(results)
    }
}
