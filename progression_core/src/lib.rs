//! progression_core - Experience, leveling and stat evaluation for game characters
//!
//! This library provides:
//! - ExperienceLedger: Accumulated experience with a gain notification
//! - ModifierAggregator: Additive/percentage deltas from attached providers
//! - ProgressionEngine: Memoized level, level-up events, stat formula
//! - Character: A ledger and engine wired together from settings or a saved record
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use progression_core::prelude::*;
//! use std::sync::Arc;
//!
//! let table = Arc::new(ProgressionTable::load(Path::new("content/progression/"))?);
//! let settings = CharacterSettings::load(Path::new("content/player.toml"))?;
//!
//! let character = Character::new(&settings, table)?;
//! character.engine().on_level_up(|event| println!("Reached level {}", event.current));
//!
//! character.add_experience(250.0)?;
//! let health = character.engine().get_stat(Stat::Health)?;
//! ```

pub mod character;
pub mod config;
pub mod engine;
pub mod event;
pub mod experience;
pub mod modifier;
pub mod prelude;

mod error;

// Core API - what most users need
pub use character::{Character, CharacterRecord};
pub use engine::{EngineBuilder, LevelUp, LevelUpPresenter, ProgressionEngine};
pub use error::ProgressionError;
pub use experience::{ExperienceGained, ExperienceLedger, Subscription};
pub use modifier::{ModifierAggregator, ModifierContribution, ModifierProvider};

// Configuration
pub use config::CharacterSettings;
pub use event::ListenerId;

// Re-export commonly needed curve_core types
pub use curve_core::{CharacterClass, LookupError, ProgressionTable, Stat};
