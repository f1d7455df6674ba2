/*!
 * Progress reporting for auto-translation runs.
 *
 * The reporter holds the `{current, total}` pair a front end displays while
 * a run is in flight. It is updated once per completed batch and reset to
 * `{0, 0}` when the run ends, whatever the outcome.
 */

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Number of strings that received a result so far, out of the run total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchProgress {
    /// Strings with a result (successful or not)
    pub current: usize,
    /// Strings submitted in this run
    pub total: usize,
}

impl BatchProgress {
    /// Whether the run has produced a result for every string
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }

    /// Completion as a fraction in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

type Listener = Arc<dyn Fn(BatchProgress) + Send + Sync>;

/// Shared, cloneable progress handle
///
/// Clones observe the same state, so a UI can keep one clone and poll
/// `snapshot()` while the batcher updates another.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    state: Arc<Mutex<BatchProgress>>,
    listener: Arc<Mutex<Option<Listener>>>,
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl ProgressReporter {
    /// Create a reporter at `{0, 0}`
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked after every change
    pub fn set_listener(&self, listener: impl Fn(BatchProgress) + Send + Sync + 'static) {
        *self.listener.lock() = Some(Arc::new(listener));
    }

    /// Remove the registered callback
    pub fn clear_listener(&self) {
        *self.listener.lock() = None;
    }

    /// Current progress
    pub fn snapshot(&self) -> BatchProgress {
        *self.state.lock()
    }

    /// Begin a run over `total` strings
    pub fn start(&self, total: usize) {
        self.update(BatchProgress { current: 0, total });
    }

    /// Record that `count` more strings received a result
    pub fn advance(&self, count: usize) {
        let next = {
            let state = self.state.lock();
            BatchProgress {
                current: (state.current + count).min(state.total),
                total: state.total,
            }
        };
        self.update(next);
    }

    /// Return to `{0, 0}`
    pub fn reset(&self) {
        self.update(BatchProgress::default());
    }

    // Listener runs outside the lock so it may replace or clear itself
    fn update(&self, progress: BatchProgress) {
        *self.state.lock() = progress;
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            listener(progress);
        }
    }
}
