//! Experience ledger - accumulated experience for one character

use crate::event::{ListenerId, Listeners};
use crate::ProgressionError;
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Raised after every successful [`ExperienceLedger::add_experience`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceGained {
    /// Amount just added (may be zero)
    pub amount: f64,
    /// Total after the addition
    pub total: f64,
}

/// Non-decreasing experience counter with a gain notification
#[derive(Debug, Default)]
pub struct ExperienceLedger {
    points: Cell<f64>,
    gained: Listeners<ExperienceGained>,
}

impl ExperienceLedger {
    /// Create a ledger with no experience
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded from saved state
    pub fn with_points(points: f64) -> Result<Self, ProgressionError> {
        check_amount(points)?;
        Ok(ExperienceLedger {
            points: Cell::new(points),
            gained: Listeners::new(),
        })
    }

    pub fn experience_points(&self) -> f64 {
        self.points.get()
    }

    /// Add experience, then notify subscribers in subscription order
    ///
    /// A zero amount is accepted and still notifies. A gain that would push
    /// the total past `f64::MAX` is rejected and leaves the ledger unchanged.
    pub fn add_experience(&self, amount: f64) -> Result<(), ProgressionError> {
        check_amount(amount)?;

        let current = self.points.get();
        let total = current + amount;
        if !total.is_finite() {
            return Err(ProgressionError::ExperienceOverflow { current, amount });
        }
        self.points.set(total);
        tracing::debug!(amount, total, "experience gained");

        self.gained.emit(&ExperienceGained { amount, total });
        Ok(())
    }

    /// Register a gain callback; pair with [`remove_listener`](Self::remove_listener)
    pub fn on_experience_gained(
        &self,
        callback: impl Fn(&ExperienceGained) + 'static,
    ) -> ListenerId {
        self.gained.subscribe(callback)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.gained.unsubscribe(id)
    }

    /// Register a gain callback that is removed when the returned guard drops
    pub fn subscribe(
        self: &Rc<Self>,
        callback: impl Fn(&ExperienceGained) + 'static,
    ) -> Subscription {
        Subscription {
            id: self.on_experience_gained(callback),
            ledger: Rc::downgrade(self),
        }
    }

    /// Number of registered callbacks
    pub fn listener_count(&self) -> usize {
        self.gained.len()
    }
}

fn check_amount(amount: f64) -> Result<(), ProgressionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ProgressionError::InvalidExperience { amount });
    }
    Ok(())
}

/// Scoped ledger subscription; unsubscribes on drop
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    ledger: Weak<ExperienceLedger>,
    id: ListenerId,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.upgrade() {
            ledger.remove_listener(self.id);
        }
    }
}
