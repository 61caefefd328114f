use curve_core::LookupError;
use thiserror::Error;

/// Errors raised by experience and progression queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressionError {
    /// Content does not cover the requested stat, class or level
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Experience amount must be a finite, non-negative number (got {amount})")]
    InvalidExperience { amount: f64 },
    #[error("Adding {amount} experience to {current} exceeds the representable total")]
    ExperienceOverflow { current: f64, amount: f64 },
    #[error("Starting level {level} is outside 1..={max}")]
    InvalidStartingLevel { level: u32, max: u32 },
    #[error("Character has no experience ledger")]
    MissingLedger,
}
