/*!
 * Session management module for language sessions.
 *
 * This module provides:
 * - The entry collection of one target language
 * - Manual edits and the merge of auto-translation results
 * - Completion statistics and entry filtering
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::{load_source_strings, TranslationSession};
pub use models::{CompletionStats, EntryFilter, StatusFilter, Submission, TranslationEntry};
