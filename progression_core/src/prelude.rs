//! Prelude module for convenient imports
//!
//! ```rust
//! use progression_core::prelude::*;
//! ```

// Core types
pub use crate::character::{Character, CharacterRecord};
pub use crate::engine::{LevelUp, LevelUpPresenter, ProgressionEngine};
pub use crate::experience::ExperienceLedger;
pub use crate::ProgressionError;

// Modifiers
pub use crate::modifier::{ModifierContribution, ModifierProvider};

// Config
pub use crate::config::CharacterSettings;

// Re-exports from curve_core
pub use curve_core::{CharacterClass, ProgressionTable, Stat};
