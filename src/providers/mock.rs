/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::intermittent(n)` - Every nth string comes back empty
 * - `MockProvider::failing()` - Every batch fails with an error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Every `fail_every`-th string degrades to an empty result
    Intermittent { fail_every: usize },
    /// Every batch fails with an API error
    Failing,
    /// Fails with an API error once `after_batches` batches went through
    FailAfter { after_batches: usize },
    /// Returns an empty result for every string
    Empty,
    /// Simulates slow responses
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Counter over individual strings, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Size of every batch received, in call order
    batch_sizes: Arc<Mutex<Vec<usize>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str, &str) -> String>,
    /// Whether the provider claims to need an API key
    requires_credential: bool,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            batch_sizes: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
            requires_credential: false,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a provider where every `fail_every`-th string fails
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a provider that errors after a number of successful batches
    pub fn fail_after(after_batches: usize) -> Self {
        Self::new(MockBehavior::FailAfter { after_batches })
    }

    /// Create a mock that returns empty results
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before answering each string
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator, called with `(text, target_language)`
    ///
    /// An empty string from the generator is treated like a failed item.
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Make the provider behave as if it needs an API key that is missing
    pub fn requiring_credential(mut self) -> Self {
        self.requires_credential = true;
        self
    }

    /// Sizes of the batches received so far
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().clone()
    }

    /// Number of strings received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn translate_one(&self, text: &str, target_language: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text, target_language),
            None => format!("[{}] {}", target_language, text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            batch_sizes: Arc::clone(&self.batch_sizes),
            custom_response: self.custom_response,
            requires_credential: self.requires_credential,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let batches_before = {
            let mut sizes = self.batch_sizes.lock();
            sizes.push(texts.len());
            sizes.len() - 1
        };

        match self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "Simulated provider failure".to_string(),
                });
            }
            MockBehavior::FailAfter { after_batches } if batches_before >= after_batches => {
                return Err(ProviderError::ApiError {
                    status_code: 456,
                    message: format!("Simulated failure on batch #{}", batches_before + 1),
                });
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
            }
            _ => {}
        }

        let results = texts
            .iter()
            .map(|text| {
                let count = self.request_count.fetch_add(1, Ordering::SeqCst);
                match self.behavior {
                    MockBehavior::Empty => String::new(),
                    MockBehavior::Intermittent { fail_every } if count % fail_every == fail_every - 1 => {
                        String::new()
                    }
                    _ => self.translate_one(text, target_language),
                }
            })
            .collect();

        Ok(results)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated outage".to_string())),
            _ => Ok(()),
        }
    }

    fn requires_credential(&self) -> bool {
        self.requires_credential
    }

    fn has_credential(&self) -> bool {
        !self.requires_credential
    }
}
