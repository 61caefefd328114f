use crate::types::{CharacterClass, Stat};
use serde::Deserialize;

/// TOML configuration for a progression file
#[derive(Debug, Default, Deserialize)]
pub struct ProgressionFileConfig {
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
}

/// All curves authored for one class
#[derive(Debug, Deserialize)]
pub struct ClassConfig {
    pub class: CharacterClass,
    #[serde(default)]
    pub stats: Vec<CurveConfig>,
}

/// Values for one stat, index 0 is level 1
#[derive(Debug, Deserialize)]
pub struct CurveConfig {
    pub stat: Stat,
    pub levels: Vec<f64>,
}
