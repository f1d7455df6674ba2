/*!
 * Translation session for one target language.
 *
 * This module handles:
 * - Building the entry collection from the source strings
 * - Manual edits keyed by string identity
 * - Snapshotting pending entries for auto-translation
 * - Merging auto-translation results back by submission order
 */

use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::TranslationError;
use crate::file_utils::FileManager;

use super::models::{
    is_namespaced_key, CompletionStats, EntryFilter, Submission, TranslationEntry,
};

/// Entries of one language session
///
/// The collection is created once when a target language is chosen and is
/// dropped as a whole when another language is started. Entries are never
/// removed individually.
#[derive(Debug, Clone)]
pub struct TranslationSession {
    /// Target language code
    language_code: String,
    /// Target language display name
    language_name: String,
    /// Entries in source order
    entries: Vec<TranslationEntry>,
    /// Position of every key in `entries`
    index: HashMap<String, usize>,
}

impl TranslationSession {
    /// Start a session from ordered `(key, english)` source strings
    ///
    /// Every string becomes a pending entry. A key that appears more than
    /// once keeps its first position and its last text.
    pub fn start(
        language_code: impl Into<String>,
        language_name: impl Into<String>,
        source_strings: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut entries: Vec<TranslationEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (key, english) in source_strings {
            match index.get(&key) {
                Some(&position) => {
                    warn!("Duplicate source key '{}', keeping the last text", key);
                    entries[position].english = english;
                }
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push(TranslationEntry::new(key, english));
                }
            }
        }

        let session = Self {
            language_code: language_code.into(),
            language_name: language_name.into(),
            entries,
            index,
        };

        info!(
            "Started {} ({}) session with {} strings",
            session.language_name,
            session.language_code,
            session.entries.len()
        );

        session
    }

    /// Target language code
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Target language display name
    pub fn language_name(&self) -> &str {
        &self.language_name
    }

    /// All entries in source order
    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    /// Look up an entry by key
    pub fn entry(&self, key: &str) -> Option<&TranslationEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Set the translation of a single entry
    pub fn update_entry(&mut self, key: &str, value: impl Into<String>, is_auto: bool) -> Result<(), TranslationError> {
        let position = *self.index
            .get(key)
            .ok_or_else(|| TranslationError::UnknownKey(key.to_string()))?;

        let entry = &mut self.entries[position];
        entry.translated = value.into();
        entry.is_auto = is_auto;
        Ok(())
    }

    /// Apply existing translations as manual edits
    ///
    /// Empty values and unknown keys are skipped. Returns the number of
    /// entries that were filled.
    pub fn prefill(&mut self, existing: impl IntoIterator<Item = (String, String)>) -> usize {
        let mut applied = 0;

        for (key, value) in existing {
            if value.is_empty() {
                continue;
            }
            match self.update_entry(&key, value, false) {
                Ok(()) => applied += 1,
                Err(_) => warn!("Ignoring translation for unknown key '{}'", key),
            }
        }

        debug!("Prefilled {} entries", applied);
        applied
    }

    /// Snapshot of the entries that still need a translation
    pub fn pending_submission(&self) -> Submission {
        let (keys, texts) = self.entries
            .iter()
            .filter(|e| e.is_pending())
            .map(|e| (e.key.clone(), e.english.clone()))
            .unzip();

        Submission { keys, texts }
    }

    /// Merge auto-translation results back into the submitted entries
    ///
    /// `results[i]` belongs to `submission.keys[i]`. Non-empty results set
    /// the translation and mark the entry as auto-translated; empty results
    /// leave the entry untouched. Entries outside the submission are never
    /// modified. Applying the same results twice gives the same state.
    /// Returns the number of entries that received a translation.
    pub fn merge(&mut self, submission: &Submission, results: &[String]) -> Result<usize, TranslationError> {
        if results.len() != submission.len() {
            return Err(TranslationError::ResultCountMismatch {
                expected: submission.len(),
                actual: results.len(),
            });
        }

        let mut merged = 0;
        for (key, result) in submission.keys.iter().zip(results) {
            if result.is_empty() {
                continue;
            }
            if let Some(&position) = self.index.get(key) {
                let entry = &mut self.entries[position];
                entry.translated = result.clone();
                entry.is_auto = true;
                merged += 1;
            }
        }

        Ok(merged)
    }

    /// Completion statistics over all entries
    pub fn stats(&self) -> CompletionStats {
        CompletionStats::from_entries(&self.entries)
    }

    /// Sorted distinct categories
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.entries.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Entries matching a filter, in source order
    pub fn filter<'a>(&'a self, filter: &'a EntryFilter) -> impl Iterator<Item = &'a TranslationEntry> + 'a {
        self.entries.iter().filter(move |e| filter.matches(e))
    }

    /// Ordered `(key, translation)` pairs of every translated entry
    pub fn export_data(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|e| !e.is_pending())
            .map(|e| (e.key.clone(), e.translated.clone()))
            .collect()
    }
}

/// Load `(key, english)` source strings from a flat JSON object
pub fn load_source_strings<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>> {
    let strings = FileManager::read_string_map(&path)?;

    let malformed = strings.iter().filter(|(key, _)| !is_namespaced_key(key)).count();
    if malformed > 0 {
        warn!("{} source keys in {:?} are not dot-namespaced", malformed, path.as_ref());
    }

    debug!("Loaded {} source strings from {:?}", strings.len(), path.as_ref());
    Ok(strings)
}
