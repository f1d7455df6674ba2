/*!
 * Auto-translation run for a language session.
 *
 * A run snapshots the pending entries, sends them through the batch
 * translator and merges the results back. Runs move through
 * `Idle -> Running -> (Success | Failed) -> Idle`; a failed run merges
 * nothing, and the progress reporter is back at `{0, 0}` however the run
 * ends.
 */

use log::{error, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ProviderError, TranslationError};
use crate::session::TranslationSession;

use super::batch::BatchTranslator;
use super::progress::ProgressReporter;

/// State of the auto-translation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum PipelineState {
    /// No run in flight
    #[default]
    Idle,
    /// A run is in flight; new runs are refused
    Running,
    /// The last run finished and its results were merged
    Success {
        /// Entries that received a translation
        translated: usize,
        /// Submitted entries that came back empty
        failed: usize,
    },
    /// The last run was aborted; nothing was merged
    Failed {
        /// User-facing description of the failure
        message: String,
    },
}

impl PipelineState {
    /// Whether a run is in flight
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Success { translated, failed } => {
                write!(f, "success ({} translated, {} failed)", translated, failed)
            }
            Self::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    /// Entries handed to the provider
    pub submitted: usize,
    /// Entries that received a translation
    pub translated: usize,
    /// Submitted entries that are still pending
    pub failed: usize,
}

/// Drives auto-translation runs over a session
#[derive(Debug, Clone)]
pub struct AutoTranslator {
    translator: BatchTranslator,
    progress: ProgressReporter,
    state: Arc<Mutex<PipelineState>>,
}

/// Restores the pipeline on every exit path of a run
struct RunGuard {
    progress: ProgressReporter,
    state: Arc<Mutex<PipelineState>>,
    settled: bool,
}

impl RunGuard {
    fn settle(&mut self, state: PipelineState) {
        *self.state.lock() = state;
        self.settled = true;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.progress.reset();
        // A run dropped mid-flight leaves nothing to report
        if !self.settled {
            *self.state.lock() = PipelineState::Idle;
        }
    }
}

impl AutoTranslator {
    /// Create a pipeline over a batch translator
    pub fn new(translator: BatchTranslator) -> Self {
        Self {
            translator,
            progress: ProgressReporter::new(),
            state: Arc::new(Mutex::new(PipelineState::Idle)),
        }
    }

    /// Use an existing progress handle
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Progress handle updated during runs
    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Current pipeline state
    pub fn state(&self) -> PipelineState {
        self.state.lock().clone()
    }

    /// Whether the provider can be called without asking for a credential
    pub fn credential_known(&self) -> bool {
        let provider = self.translator.provider();
        !provider.requires_credential() || provider.has_credential()
    }

    /// Acknowledge the outcome of the last run and return to `Idle`
    pub fn finish(&self) {
        let mut state = self.state.lock();
        if !state.is_running() {
            *state = PipelineState::Idle;
        }
    }

    /// Auto-translate every pending entry of a session
    ///
    /// Entries that already hold a translation are never submitted. On
    /// success the results are merged by submission position; on failure the
    /// session is left exactly as it was.
    pub async fn run(&self, session: &mut TranslationSession) -> Result<RunSummary, TranslationError> {
        let provider_name = self.translator.provider().name().to_string();

        if !self.credential_known() {
            warn!("{} needs an API key before auto-translating", provider_name);
            return Err(TranslationError::MissingCredential { provider: provider_name });
        }

        {
            let mut state = self.state.lock();
            if state.is_running() {
                return Err(TranslationError::AlreadyRunning);
            }
            *state = PipelineState::Running;
        }

        let mut guard = RunGuard {
            progress: self.progress.clone(),
            state: Arc::clone(&self.state),
            settled: false,
        };

        let submission = session.pending_submission();
        if submission.is_empty() {
            info!("Nothing to auto-translate for {}", session.language_name());
            guard.settle(PipelineState::Success { translated: 0, failed: 0 });
            return Ok(RunSummary::default());
        }

        info!(
            "Auto-translating {} strings to {} with {} ({} batches)",
            submission.len(),
            session.language_code(),
            provider_name,
            self.translator.batch_count(submission.len())
        );
        let start_time = Instant::now();

        let target_language = session.language_code().to_string();
        let outcome = match self.translator
            .translate_all(&submission.texts, &target_language, &self.progress)
            .await
        {
            Ok(results) => session.merge(&submission, &results),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(translated) => {
                let summary = RunSummary {
                    submitted: submission.len(),
                    translated,
                    failed: submission.len() - translated,
                };
                info!(
                    "Auto-translation finished in {:?}: {} translated, {} failed",
                    start_time.elapsed(),
                    summary.translated,
                    summary.failed
                );
                guard.settle(PipelineState::Success {
                    translated: summary.translated,
                    failed: summary.failed,
                });
                Ok(summary)
            }
            Err(e) => {
                error!("Auto-translation failed: {}", e);
                guard.settle(PipelineState::Failed {
                    message: failure_message(&provider_name, &e),
                });
                Err(e)
            }
        }
    }
}

fn failure_message(provider_name: &str, error: &TranslationError) -> String {
    match error {
        TranslationError::Provider(ProviderError::AuthenticationError(_)) => {
            format!("Translation failed. Please check your {} API key.", provider_name)
        }
        _ => format!(
            "Translation failed. Please check that the {} endpoint is reachable.",
            provider_name
        ),
    }
}
