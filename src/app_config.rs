use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (e.g. "de", "zh-CN")
    pub target_language: String,

    /// Human readable name of the target language
    #[serde(default)]
    pub language_name: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Languages already shipped by the application
    #[serde(default)]
    pub available_languages: Vec<AvailableLanguage>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// A language that already has a translation in the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvailableLanguage {
    /// Language code
    pub code: String,
    /// English name
    pub name: String,
    /// Native name
    pub native: String,
    /// Completion percentage (0-100)
    #[serde(default)]
    pub completion: u8,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Self-hosted LibreTranslate, one request per string
    #[default]
    LibreTranslate,
    // @provider: DeepL API, one request per batch
    DeepL,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::LibreTranslate => "LibreTranslate",
            Self::DeepL => "DeepL",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::LibreTranslate => "libretranslate".to_string(),
            Self::DeepL => "deepl".to_string(),
        }
    }

    /// Whether the provider refuses requests without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::DeepL)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "libretranslate" | "libre" => Ok(Self::LibreTranslate),
            "deepl" => Ok(Self::DeepL),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Strings per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::LibreTranslate => Self {
                provider_type: "libretranslate".to_string(),
                api_key: String::new(),
                endpoint: default_libretranslate_endpoint(),
                batch_size: default_batch_size(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::DeepL => Self {
                provider_type: "deepl".to_string(),
                api_key: String::new(),
                endpoint: default_deepl_endpoint(),
                batch_size: default_batch_size(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Language the source strings are written in
    #[serde(default = "default_source_language")]
    pub source_language: String,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_batch_size() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_libretranslate_endpoint() -> String {
    "https://translate.bambuddy.cool".to_string()
}

fn default_deepl_endpoint() -> String {
    "https://api-free.deepl.com".to_string()
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    ///
    /// A missing DeepL key is not an error here: the key can still come from
    /// the environment or an interactive prompt before a run starts.
    pub fn validate(&self) -> Result<()> {
        if !self.target_language.is_empty() {
            language_utils::validate_language_code(&self.target_language)?;
        }

        for provider in &self.translation.available_providers {
            if provider.batch_size == 0 {
                return Err(anyhow!(
                    "Batch size for provider '{}' must be greater than zero",
                    provider.provider_type
                ));
            }
        }

        let endpoint = self.translation.get_endpoint();
        url::Url::parse(&endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;

        for language in &self.available_languages {
            if language.completion > 100 {
                return Err(anyhow!(
                    "Completion for language '{}' must be between 0 and 100",
                    language.code
                ));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: String::new(),
            language_name: String::new(),
            translation: TranslationConfig::default(),
            available_languages: Vec::new(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::LibreTranslate => default_libretranslate_endpoint(),
            TranslationProvider::DeepL => default_deepl_endpoint(),
        }
    }

    /// Get the batch size for the active provider
    pub fn get_batch_size(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.batch_size > 0 {
                return provider_config.batch_size;
            }
        }

        default_batch_size()
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::LibreTranslate),
                ProviderConfig::new(TranslationProvider::DeepL),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
