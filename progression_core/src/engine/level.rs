//! Level boundary search and the memoized level

use std::cell::Cell;

/// Level for `experience` given cumulative thresholds (index 0 = level 1)
///
/// Returns the first level whose threshold is strictly greater than
/// `experience`, or one past the last defined level when every threshold
/// has been met. Thresholds are assumed to rise; they are not checked here.
pub fn calculate_level(thresholds: &[f64], experience: f64) -> u32 {
    thresholds
        .iter()
        .position(|&threshold| threshold > experience)
        .unwrap_or(thresholds.len()) as u32
        + 1
}

/// Lazily computed level that can only move upward once set
#[derive(Debug, Default)]
pub(crate) struct CachedLevel {
    value: Cell<Option<u32>>,
}

impl CachedLevel {
    pub(crate) fn get(&self) -> Option<u32> {
        self.value.get()
    }

    /// Return the memoized level, computing it with `init` the first time
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> u32) -> u32 {
        match self.value.get() {
            Some(level) => level,
            None => {
                let level = init();
                self.value.set(Some(level));
                level
            }
        }
    }

    /// Store `level` if it is higher than the current one, returning the previous level
    pub(crate) fn raise(&self, level: u32) -> Option<u32> {
        match self.value.get() {
            Some(current) if level <= current => None,
            previous => {
                self.value.set(Some(level));
                previous
            }
        }
    }
}
