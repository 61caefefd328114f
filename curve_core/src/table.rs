use crate::config::ProgressionFileConfig;
use crate::types::{CharacterClass, Stat};
use crate::{CurveError, LookupError};
use std::collections::HashMap;

/// Read-only lookup of stat values by (stat, class, level)
#[derive(Debug, Clone, Default)]
pub struct ProgressionTable {
    curves: HashMap<(Stat, CharacterClass), Vec<f64>>,
}

impl ProgressionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from parsed file config
    pub fn from_config(config: ProgressionFileConfig) -> Result<Self, CurveError> {
        let mut table = Self::new();
        for class in config.classes {
            for curve in class.stats {
                table.insert_curve(class.class, curve.stat, curve.levels)?;
            }
        }
        table.validate()?;
        Ok(table)
    }

    /// Add a curve, consuming and returning the table
    pub fn with_curve(
        mut self,
        class: CharacterClass,
        stat: Stat,
        levels: impl Into<Vec<f64>>,
    ) -> Result<Self, CurveError> {
        self.insert_curve(class, stat, levels.into())?;
        Ok(self)
    }

    /// Add a curve after validating its values
    pub fn insert_curve(
        &mut self,
        class: CharacterClass,
        stat: Stat,
        levels: Vec<f64>,
    ) -> Result<(), CurveError> {
        validate_curve(stat, class, &levels)?;
        if self.curves.contains_key(&(stat, class)) {
            return Err(CurveError::Duplicate { stat, class });
        }
        self.curves.insert((stat, class), levels);
        Ok(())
    }

    /// Move every curve of `other` into this table
    ///
    /// Fails without modifying `self` if any pair is defined in both.
    pub fn merge(&mut self, other: ProgressionTable) -> Result<(), CurveError> {
        let conflict = other.curves.keys().find(|k| self.curves.contains_key(*k));
        if let Some(&(stat, class)) = conflict {
            return Err(CurveError::Duplicate { stat, class });
        }
        self.curves.extend(other.curves);
        Ok(())
    }

    /// Check that every stat curve reaches the class's top level
    ///
    /// A class with `n` experience thresholds can reach level `n + 1`, so each
    /// of its other curves needs at least `n + 1` values. Classes without an
    /// experience curve are not checked.
    pub fn validate(&self) -> Result<(), CurveError> {
        for (&(stat, class), levels) in &self.curves {
            if stat == Stat::ExperienceToLevelUp {
                continue;
            }
            let Some(thresholds) = self.curve(Stat::ExperienceToLevelUp, class) else {
                continue;
            };

            let required = thresholds.len() as u32 + 1;
            let defined = levels.len() as u32;
            if defined < required {
                return Err(CurveError::ShortCurve {
                    stat,
                    class,
                    defined,
                    required,
                });
            }
        }
        Ok(())
    }

    /// Value of `stat` for `class` at a 1-based `level`
    pub fn get_stat(
        &self,
        stat: Stat,
        class: CharacterClass,
        level: u32,
    ) -> Result<f64, LookupError> {
        let curve = self
            .curve(stat, class)
            .ok_or(LookupError::MissingCurve { stat, class })?;

        if level == 0 || level as usize > curve.len() {
            return Err(LookupError::LevelOutOfRange {
                stat,
                class,
                level,
                max: curve.len() as u32,
            });
        }

        Ok(curve[level as usize - 1])
    }

    /// Highest level with a defined value for (stat, class)
    pub fn levels(&self, stat: Stat, class: CharacterClass) -> Result<u32, LookupError> {
        self.curve(stat, class)
            .map(|c| c.len() as u32)
            .ok_or(LookupError::MissingCurve { stat, class })
    }

    /// Raw curve values, index 0 is level 1
    pub fn curve(&self, stat: Stat, class: CharacterClass) -> Option<&[f64]> {
        self.curves.get(&(stat, class)).map(|c| c.as_slice())
    }

    /// Check if a curve exists
    pub fn contains(&self, stat: Stat, class: CharacterClass) -> bool {
        self.curves.contains_key(&(stat, class))
    }

    /// Classes with at least one curve
    pub fn classes(&self) -> impl Iterator<Item = CharacterClass> + '_ {
        let mut seen = Vec::new();
        self.curves.keys().filter_map(move |&(_, class)| {
            if seen.contains(&class) {
                None
            } else {
                seen.push(class);
                Some(class)
            }
        })
    }

    /// Number of curves
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

fn validate_curve(stat: Stat, class: CharacterClass, levels: &[f64]) -> Result<(), CurveError> {
    if levels.is_empty() {
        return Err(CurveError::Empty { stat, class });
    }

    for (i, &value) in levels.iter().enumerate() {
        let level = i as u32 + 1;
        if !value.is_finite() {
            return Err(CurveError::NonFinite { stat, class, level });
        }
        if value < 0.0 {
            return Err(CurveError::Negative {
                stat,
                class,
                level,
                value,
            });
        }
    }

    // Leveling assumes strictly rising thresholds but content may still ship without them
    if stat == Stat::ExperienceToLevelUp {
        if let Some(i) = levels.windows(2).position(|w| w[1] <= w[0]) {
            tracing::warn!(
                %class,
                level = i + 2,
                "experience thresholds do not increase; levels in this range are unreachable"
            );
        }
    }

    Ok(())
}
