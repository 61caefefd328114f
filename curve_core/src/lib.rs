//! curve_core - Progression curves indexed by stat, class and level
//!
//! Content is authored as TOML:
//!
//! ```toml
//! [[classes]]
//! class = "warrior"
//!
//! [[classes.stats]]
//! stat = "health"
//! levels = [50, 65, 80, 100]
//!
//! [[classes.stats]]
//! stat = "experience_to_level_up"
//! levels = [100, 250, 500]
//! ```
//!
//! A loaded [`ProgressionTable`] is immutable and can be shared between
//! characters (and threads) behind an `Arc`.

mod config;
mod loader;
mod table;
mod types;

pub use config::{ClassConfig, CurveConfig, ProgressionFileConfig};
pub use table::ProgressionTable;
pub use types::{CharacterClass, Stat};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading progression content
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Malformed curve content
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("{class} has an empty {stat} curve")]
    Empty { stat: Stat, class: CharacterClass },
    #[error("{class} {stat} level {level} is not a finite number")]
    NonFinite {
        stat: Stat,
        class: CharacterClass,
        level: u32,
    },
    #[error("{class} {stat} level {level} is negative ({value})")]
    Negative {
        stat: Stat,
        class: CharacterClass,
        level: u32,
        value: f64,
    },
    #[error("{class} {stat} curve is defined more than once")]
    Duplicate { stat: Stat, class: CharacterClass },
    #[error("{class} {stat} curve defines {defined} levels but level {required} is reachable")]
    ShortCurve {
        stat: Stat,
        class: CharacterClass,
        defined: u32,
        required: u32,
    },
}

/// Query against content that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No {stat} curve defined for {class}")]
    MissingCurve { stat: Stat, class: CharacterClass },
    #[error("Level {level} is outside the {stat} curve for {class} (1..={max})")]
    LevelOutOfRange {
        stat: Stat,
        class: CharacterClass,
        level: u32,
        max: u32,
    },
}
