//! Per-character progression settings

use super::ConfigError;
use curve_core::CharacterClass;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest level a character may be configured to start at
pub const MAX_STARTING_LEVEL: u32 = 100;

/// How a character's progression engine is set up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSettings {
    pub class: CharacterClass,
    /// Level used when the character has no experience ledger
    #[serde(default = "default_starting_level")]
    pub starting_level: u32,
    /// Whether attached modifier providers affect stat queries
    #[serde(default)]
    pub use_modifiers: bool,
}

fn default_starting_level() -> u32 {
    1
}

impl CharacterSettings {
    pub fn new(class: CharacterClass) -> Self {
        CharacterSettings {
            class,
            starting_level: default_starting_level(),
            use_modifiers: false,
        }
    }

    pub fn with_starting_level(mut self, level: u32) -> Self {
        self.starting_level = level;
        self
    }

    pub fn with_modifiers(mut self, use_modifiers: bool) -> Self {
        self.use_modifiers = use_modifiers;
        self
    }

    /// Load and validate settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: CharacterSettings = super::load_toml(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a TOML string
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let settings: CharacterSettings = super::parse_toml(toml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_STARTING_LEVEL).contains(&self.starting_level) {
            return Err(ConfigError::ValidationError(format!(
                "starting_level {} is outside 1..={}",
                self.starting_level, MAX_STARTING_LEVEL
            )));
        }
        Ok(())
    }
}
