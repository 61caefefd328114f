//! Character - a ledger and an attached progression engine

use crate::config::CharacterSettings;
use crate::engine::ProgressionEngine;
use crate::experience::ExperienceLedger;
use crate::ProgressionError;
use curve_core::{CharacterClass, ProgressionTable};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;

/// Persisted progression state for one character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub class: CharacterClass,
    #[serde(default)]
    pub experience: f64,
}

/// A character whose level follows its own experience
#[derive(Debug)]
pub struct Character {
    ledger: Rc<ExperienceLedger>,
    engine: ProgressionEngine,
}

impl Character {
    /// Create a fresh character with no experience
    pub fn new(
        settings: &CharacterSettings,
        table: Arc<ProgressionTable>,
    ) -> Result<Self, ProgressionError> {
        Self::with_ledger(settings, ExperienceLedger::new(), table)
    }

    /// Recreate a character from saved state
    ///
    /// The record's class takes precedence over the one in `settings`.
    pub fn restore(
        record: &CharacterRecord,
        settings: &CharacterSettings,
        table: Arc<ProgressionTable>,
    ) -> Result<Self, ProgressionError> {
        let settings = CharacterSettings {
            class: record.class,
            ..settings.clone()
        };
        let ledger = ExperienceLedger::with_points(record.experience)?;
        Self::with_ledger(&settings, ledger, table)
    }

    fn with_ledger(
        settings: &CharacterSettings,
        ledger: ExperienceLedger,
        table: Arc<ProgressionTable>,
    ) -> Result<Self, ProgressionError> {
        let ledger = Rc::new(ledger);
        let mut engine =
            ProgressionEngine::from_settings(settings, table, Some(Rc::clone(&ledger)))?;
        engine.attach();

        tracing::debug!(
            class = %settings.class,
            experience = ledger.experience_points(),
            level = engine.level(),
            "character ready"
        );
        Ok(Character { ledger, engine })
    }

    pub fn add_experience(&self, amount: f64) -> Result<(), ProgressionError> {
        self.ledger.add_experience(amount)
    }

    /// Capture state for saving
    pub fn record(&self) -> CharacterRecord {
        CharacterRecord {
            class: self.engine.character_class(),
            experience: self.ledger.experience_points(),
        }
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    /// Mutable access for attach/detach
    pub fn engine_mut(&mut self) -> &mut ProgressionEngine {
        &mut self.engine
    }

    pub fn ledger(&self) -> &Rc<ExperienceLedger> {
        &self.ledger
    }

    pub fn level(&self) -> u32 {
        self.engine.level()
    }
}
