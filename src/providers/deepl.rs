use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;

/// DeepL client for the v2 translate API
///
/// A whole batch goes out in a single request, so there is no per-item
/// failure: any non-success status fails the batch and with it the run.
#[derive(Debug, Clone)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
}

/// DeepL translate request
#[derive(Debug, Serialize)]
pub struct DeepLRequest {
    /// Texts to translate
    pub text: Vec<String>,
    /// Target language code
    pub target_lang: String,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// One translation per requested text
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Detected source language, if reported
    #[serde(default)]
    pub detected_source_language: Option<String>,
    /// The translated text
    pub text: String,
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        if self.endpoint.is_empty() {
            format!("https://api-free.deepl.com/v2/{}", path)
        } else {
            format!("{}/v2/{}", self.endpoint, path)
        }
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Build the request body for a batch
    pub fn build_request(texts: &[String], target_language: &str) -> DeepLRequest {
        DeepLRequest {
            text: texts.to_vec(),
            target_lang: language_utils::deepl_target(target_language),
        }
    }

    /// Complete a translate request
    pub async fn complete(&self, request: DeepLRequest) -> Result<DeepLResponse, ProviderError> {
        let response = self.client.post(self.api_url("translate"))
            .header("Content-Type", "application/json")
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(Self::status_error(status, error_text));
        }

        let body = response.text().await?;
        Self::parse_response(&body)
    }

    fn status_error(status: StatusCode, message: String) -> ProviderError {
        match status {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                ProviderError::AuthenticationError(format!("DeepL rejected the API key ({})", status))
            }
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    /// Parse a response body
    pub fn parse_response(body: &str) -> Result<DeepLResponse, ProviderError> {
        serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract the texts from a response, checking that every input got one
    pub fn extract_texts(response: DeepLResponse, expected: usize) -> Result<Vec<String>, ProviderError> {
        if response.translations.len() != expected {
            return Err(ProviderError::ParseError(format!(
                "DeepL returned {} translations for {} texts",
                response.translations.len(),
                expected
            )));
        }

        Ok(response.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait]
impl Provider for DeepL {
    fn name(&self) -> &str {
        "DeepL"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = Self::build_request(texts, target_language);
        let response = self.complete(request).await?;
        Self::extract_texts(response, texts.len())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(self.api_url("usage"))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, error_text));
        }

        Ok(())
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
