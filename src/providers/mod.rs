/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - LibreTranslate: self-hosted API, one request per string
 * - DeepL: commercial API, one request per batch, needs an API key
 * - Mock: in-process provider used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};

/// Common trait for all translation providers
///
/// The batcher hands every chunk to `translate_batch`; how the chunk is sent
/// over the wire, and which failures degrade to an empty string rather than
/// an error, is up to the provider.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Display name of the provider
    fn name(&self) -> &str;

    /// Translate a chunk of source texts
    ///
    /// # Arguments
    /// * `texts` - Source texts, in order
    /// * `target_language` - Target language code as chosen by the user
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One result per input text, in
    ///   input order; an empty string marks an item that failed on its own
    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Whether the provider needs an API key before any request is made
    fn requires_credential(&self) -> bool {
        false
    }

    /// Whether a credential is currently configured
    fn has_credential(&self) -> bool {
        true
    }
}

pub mod deepl;
pub mod libretranslate;
pub mod mock;

/// Build the provider selected by the configuration
///
/// `api_key` overrides the key stored in the configuration (e.g. a key taken
/// from the environment or typed in at a prompt).
pub fn create_provider(
    config: &TranslationConfig,
    api_key: Option<String>,
) -> Result<Arc<dyn Provider>, TranslationError> {
    let endpoint = config.get_endpoint();
    let timeout = Duration::from_secs(config.get_timeout_secs());
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| config.get_api_key());

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::LibreTranslate => {
            let key = if api_key.is_empty() { None } else { Some(api_key) };
            Arc::new(
                libretranslate::LibreTranslate::new(endpoint, timeout)
                    .with_source_language(&config.common.source_language)
                    .with_api_key(key),
            )
        }
        TranslationProvider::DeepL => {
            if api_key.is_empty() {
                return Err(TranslationError::MissingCredential {
                    provider: config.provider.display_name().to_string(),
                });
            }
            Arc::new(deepl::DeepL::new(api_key, endpoint, timeout))
        }
    };

    Ok(provider)
}

/// Shorten a text for log output
pub(crate) fn truncate_for_log(text: &str) -> String {
    if text.chars().count() > 60 {
        let head: String = text.chars().take(60).collect();
        format!("{}…", head)
    } else {
        text.to_string()
    }
}
