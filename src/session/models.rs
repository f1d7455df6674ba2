/*!
 * Session-specific models.
 *
 * Entries, derived completion statistics and the filter used to browse a
 * session.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use anyhow::anyhow;

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)+$").unwrap()
});

/// Whether a key has the dot-namespaced `category.name` shape
pub fn is_namespaced_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Category of a key: its first dot-separated segment
pub fn category_of(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

/// One translatable string and its current translation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Unique, stable identifier (e.g. "button.save")
    pub key: String,
    /// First segment of the key
    pub category: String,
    /// English source text
    pub english: String,
    /// Current translation, empty while pending
    pub translated: String,
    /// Whether the current value was set by auto-translation
    pub is_auto: bool,
}

impl TranslationEntry {
    /// Create a pending entry for a source string
    pub fn new(key: impl Into<String>, english: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            category: category_of(&key).to_string(),
            key,
            english: english.into(),
            translated: String::new(),
            is_auto: false,
        }
    }

    /// Whether the entry still needs a translation
    pub fn is_pending(&self) -> bool {
        self.translated.is_empty()
    }

    /// Whether the entry holds an auto-translated value
    pub fn is_auto_translated(&self) -> bool {
        self.is_auto && !self.translated.is_empty()
    }
}

/// Completion statistics derived from the entries of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompletionStats {
    /// Number of entries
    pub total: usize,
    /// Entries with a non-empty translation
    pub translated: usize,
    /// Translated entries whose value came from auto-translation
    pub auto: usize,
}

impl CompletionStats {
    /// Compute statistics over a slice of entries
    pub fn from_entries(entries: &[TranslationEntry]) -> Self {
        Self {
            total: entries.len(),
            translated: entries.iter().filter(|e| !e.is_pending()).count(),
            auto: entries.iter().filter(|e| e.is_auto_translated()).count(),
        }
    }

    /// Translated entries that were entered by hand
    pub fn manual(&self) -> usize {
        self.translated - self.auto
    }

    /// Entries still pending
    pub fn pending(&self) -> usize {
        self.total - self.translated
    }

    /// Rounded completion percentage, 0 for an empty session
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.translated as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Status filter for browsing entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Translated,
    Auto,
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "translated" => Ok(Self::Translated),
            "auto" => Ok(Self::Auto),
            _ => Err(anyhow!("Invalid status filter: {}", s)),
        }
    }
}

/// Filter over the entries of a session
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring matched against key and English text
    pub search: Option<String>,
    /// Exact category, `None` for all
    pub category: Option<String>,
    /// Translation status
    pub status: StatusFilter,
}

impl EntryFilter {
    /// Whether an entry passes the filter
    pub fn matches(&self, entry: &TranslationEntry) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !entry.key.to_lowercase().contains(&needle)
                && !entry.english.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            if category != "all" && entry.category != category {
                return false;
            }
        }

        match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => entry.is_pending(),
            StatusFilter::Translated => !entry.is_pending(),
            StatusFilter::Auto => entry.is_auto,
        }
    }
}

/// Snapshot of the pending entries handed to the batcher
///
/// `keys[i]` is the entry whose English text is `texts[i]`; results are
/// merged back by this position, not by searching the collection again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Keys of the submitted entries, in collection order
    pub keys: Vec<String>,
    /// English texts of the submitted entries
    pub texts: Vec<String>,
}

impl Submission {
    /// Number of submitted entries
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing was submitted
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
