use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::export::{self, ExportFormat};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::{self, Provider};
use crate::session::{self, TranslationSession};
use crate::translation::{AutoTranslator, BatchTranslator, PipelineState, ProgressReporter, RunSummary};

// @module: Application controller for translation sessions

/// Main application controller for contributing translations
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: API key taken from the environment or a prompt
    api_key: Option<String>,

    // @field: Progress shared with every pipeline this controller builds
    progress: ProgressReporter,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.target_language = "de".to_string();
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            config,
            api_key: None,
            progress: ProgressReporter::new(),
        })
    }

    /// Override the API key stored in the configuration
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// The controller configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Progress of the current auto-translation run, for polling front ends
    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Check if the controller is properly initialized with a target language
    pub fn is_initialized(&self) -> bool {
        !self.config.target_language.is_empty()
    }

    /// Whether the active provider can run without asking for a key
    pub fn credential_known(&self) -> bool {
        !self.config.translation.provider.requires_api_key()
            || self.api_key.is_some()
            || !self.config.translation.get_api_key().is_empty()
    }

    // @method: Display name of the target language
    fn language_name(&self) -> String {
        if !self.config.language_name.is_empty() {
            return self.config.language_name.clone();
        }
        language_utils::get_language_name(&self.config.target_language)
            .unwrap_or_else(|_| self.config.target_language.clone())
    }

    /// Start a session from the English source file
    ///
    /// An existing translation file pre-fills entries as manual edits.
    pub fn start_session(&self, source_path: &Path, existing: Option<&Path>) -> Result<TranslationSession> {
        if !self.is_initialized() {
            return Err(anyhow!("No target language configured"));
        }

        let strings = session::load_source_strings(source_path)?;
        let mut session = TranslationSession::start(
            self.config.target_language.clone(),
            self.language_name(),
            strings,
        );

        if let Some(existing) = existing {
            if FileManager::file_exists(existing) {
                let translations = FileManager::read_string_map(existing)?;
                let applied = session.prefill(translations);
                info!("Loaded {} existing translations from {}", applied, existing.display());
            } else {
                warn!("Existing translation file not found: {}", existing.display());
            }
        }

        Ok(session)
    }

    // @method: Build the provider selected by the configuration
    fn create_provider(&self) -> Result<Arc<dyn Provider>> {
        Ok(providers::create_provider(&self.config.translation, self.api_key.clone())?)
    }

    /// Build the auto-translation pipeline for the active provider
    pub fn build_pipeline(&self) -> Result<AutoTranslator> {
        let translator = BatchTranslator::new(self.create_provider()?, self.config.translation.get_batch_size())?;
        Ok(AutoTranslator::new(translator).with_progress(self.progress.clone()))
    }

    /// Auto-translate every pending entry with a progress bar
    pub async fn auto_translate(&self, session: &mut TranslationSession) -> Result<RunSummary> {
        let pipeline = self.build_pipeline()?;
        self.auto_translate_with(&pipeline, session).await
    }

    /// Auto-translate with an existing pipeline
    pub async fn auto_translate_with(
        &self,
        pipeline: &AutoTranslator,
        session: &mut TranslationSession,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();

        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} strings ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(self.config.translation.provider.display_name().to_string());

        let bar = progress_bar.clone();
        pipeline.progress().set_listener(move |progress| {
            bar.set_length(progress.total as u64);
            bar.set_position(progress.current as u64);
        });

        let result = pipeline.run(session).await;

        pipeline.progress().clear_listener();
        progress_bar.finish_and_clear();

        let state = pipeline.state();
        pipeline.finish();

        match result {
            Ok(summary) => {
                info!(
                    "Auto-translated {} of {} strings in {}",
                    summary.translated,
                    summary.submitted,
                    Self::format_duration(start_time.elapsed())
                );
                if summary.failed > 0 {
                    warn!("{} strings could not be translated and stay pending", summary.failed);
                }
                Ok(summary)
            }
            Err(e) => match state {
                PipelineState::Failed { message } => Err(anyhow::Error::new(e).context(message)),
                _ => Err(e.into()),
            },
        }
    }

    /// Write the session's translations in each requested format
    pub fn export(&self, session: &TranslationSession, dir: &Path, formats: &[ExportFormat]) -> Result<Vec<PathBuf>> {
        let data = session.export_data();
        if data.is_empty() {
            warn!("No translations to export for {}", session.language_name());
        }

        formats
            .iter()
            .map(|format| export::write_export(dir, session.language_code(), *format, &data))
            .collect()
    }

    /// Log the completion summary of a session
    pub fn summary(&self, session: &TranslationSession) {
        let stats = session.stats();
        info!(
            "{} ({}): {}% complete, {} of {} strings translated",
            session.language_name(),
            session.language_code(),
            stats.percentage(),
            stats.translated,
            stats.total
        );
        info!("Manual: {}, auto-translated: {}, pending: {}", stats.manual(), stats.auto, stats.pending());
    }

    /// Test the connection to the active provider
    pub async fn check_connection(&self) -> Result<()> {
        let provider = self.create_provider()?;
        debug!("Testing connection to {} at {}", provider.name(), self.config.translation.get_endpoint());

        provider
            .test_connection()
            .await
            .with_context(|| format!("Failed to connect to {}", provider.name()))?;

        info!("{} is reachable", provider.name());
        Ok(())
    }

    // @formats: Duration as "1h 2m 3s", "2m 3s" or "3.250s"
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
