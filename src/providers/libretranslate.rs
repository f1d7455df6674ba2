use async_trait::async_trait;
use futures::future::join_all;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{truncate_for_log, Provider};

/// LibreTranslate client for a self-hosted or public instance
///
/// Every string is sent in its own request. A failed request only costs that
/// one string: it comes back as an empty result and the rest of the batch is
/// unaffected.
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the instance
    endpoint: String,
    /// Language of the source strings
    source_language: String,
    /// Optional API key for instances that require one
    api_key: Option<String>,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct LibreTranslateRequest {
    /// Text to translate
    pub q: String,
    /// Source language code
    pub source: String,
    /// Target language code
    pub target: String,
    /// API key, only sent when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Translate response body
#[derive(Debug, Deserialize)]
pub struct LibreTranslateResponse {
    /// The translated text
    #[serde(rename = "translatedText", default)]
    pub translated_text: String,
}

impl LibreTranslate {
    /// Create a new client for the given instance URL
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            source_language: "en".to_string(),
            api_key: None,
        }
    }

    /// Set the source language sent with every request
    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    /// Set an optional API key
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Base URL of the instance
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body for one text
    pub fn build_request(&self, text: &str, target_language: &str) -> LibreTranslateRequest {
        LibreTranslateRequest {
            q: text.to_string(),
            source: self.source_language.clone(),
            target: language_utils::libretranslate_target(target_language),
            api_key: self.api_key.clone(),
        }
    }

    /// Translate one text
    pub async fn translate_text(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let url = format!("{}/translate", self.endpoint);
        let request = self.build_request(text, target_language);

        let response = self.client.post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        Self::parse_response(&body)
    }

    /// Extract the translated text from a response body
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        let parsed: LibreTranslateResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(parsed.translated_text)
    }
}

#[async_trait]
impl Provider for LibreTranslate {
    fn name(&self) -> &str {
        "LibreTranslate"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let requests = texts.iter().map(|text| async move {
            match self.translate_text(text, target_language).await {
                Ok(translated) => translated,
                Err(e) => {
                    error!("Translation failed for '{}': {}", truncate_for_log(text), e);
                    String::new()
                }
            }
        });

        Ok(join_all(requests).await)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/languages", self.endpoint);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("LibreTranslate instance at {} is not reachable", self.endpoint),
            });
        }

        Ok(())
    }
}
