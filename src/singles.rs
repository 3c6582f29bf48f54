//! Output type for single detection.

use std::time::Duration;

/// Points classified as singles by the last refresh.
///
/// Replaced wholesale on every refresh, never patched.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SinglesResult {
    /// Slots of the single points, ascending.
    singles: Vec<usize>,
    elapsed: Duration,
}

impl SinglesResult {
    pub(crate) fn new(singles: Vec<usize>, elapsed: Duration) -> Self {
        Self { singles, elapsed }
    }

    pub fn indices(&self) -> &[usize] {
        &self.singles
    }

    pub fn len(&self) -> usize {
        self.singles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.singles.is_empty()
    }

    /// Returns true if the point in slot `index` is a single.
    pub fn contains(&self, index: usize) -> bool {
        self.singles.binary_search(&index).is_ok()
    }

    /// Time spent computing this result.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}
