/*!
 * Auto-translation of pending session entries.
 *
 * - `batch`: sequential batches of source texts sent through a provider
 * - `progress`: shared `{current, total}` progress of a run
 * - `pipeline`: run state machine and merge into the session
 */

// Re-export main types for easier usage
pub use self::batch::BatchTranslator;
pub use self::pipeline::{AutoTranslator, PipelineState, RunSummary};
pub use self::progress::{BatchProgress, ProgressReporter};

// Submodules
pub mod batch;
pub mod pipeline;
pub mod progress;
