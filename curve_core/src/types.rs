use serde::{Deserialize, Serialize};
use std::fmt;

/// Character archetypes, used as a progression lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Player,
    Warrior,
    Mage,
    Archer,
    Grunt,
}

impl CharacterClass {
    /// Get all character classes
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Player,
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Archer,
            CharacterClass::Grunt,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterClass::Player => write!(f, "Player"),
            CharacterClass::Warrior => write!(f, "Warrior"),
            CharacterClass::Mage => write!(f, "Mage"),
            CharacterClass::Archer => write!(f, "Archer"),
            CharacterClass::Grunt => write!(f, "Grunt"),
        }
    }
}

/// Measurable character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Health,
    Damage,
    /// Experience granted to whoever defeats this character
    ExperienceReward,
    /// Cumulative experience needed to leave a level
    ExperienceToLevelUp,
}

impl Stat {
    /// Get all stat variants
    pub fn all() -> &'static [Stat] {
        &[
            Stat::Health,
            Stat::Damage,
            Stat::ExperienceReward,
            Stat::ExperienceToLevelUp,
        ]
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Health => write!(f, "Health"),
            Stat::Damage => write!(f, "Damage"),
            Stat::ExperienceReward => write!(f, "Experience Reward"),
            Stat::ExperienceToLevelUp => write!(f, "Experience To Level Up"),
        }
    }
}
