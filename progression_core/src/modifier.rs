//! Modifier aggregation - additive and percentage deltas from attached providers
//!
//! Formula:
//! - final = (base + sum(additive)) * (1 + sum(percentage) / 100)

use curve_core::Stat;
use std::fmt;
use std::rc::{Rc, Weak};

/// Something that contributes stat deltas (equipment, buffs, debuffs)
///
/// Both methods default to no contribution so a provider only
/// implements the kind it supplies.
pub trait ModifierProvider {
    /// Flat amounts added to the base value
    fn additive_modifiers(&self, stat: Stat) -> Vec<f64> {
        let _ = stat;
        Vec::new()
    }

    /// Percentages applied after the additive sum (50.0 = +50%)
    fn percentage_modifiers(&self, stat: Stat) -> Vec<f64> {
        let _ = stat;
        Vec::new()
    }
}

/// Summed deltas for one stat query
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModifierContribution {
    pub additive: f64,
    pub percentage: f64,
}

impl ModifierContribution {
    /// Apply the deltas to a base value
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.additive) * (1.0 + self.percentage / 100.0)
    }
}

/// Providers attached to one character
///
/// Providers are held weakly; whoever attaches them owns them, and a
/// dropped provider simply stops contributing.
#[derive(Default)]
pub struct ModifierAggregator {
    providers: Vec<Weak<dyn ModifierProvider>>,
}

impl ModifierAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a provider; attaching the same provider twice has no effect
    pub fn attach<P: ModifierProvider + 'static>(&mut self, provider: &Rc<P>) {
        let weak = Rc::downgrade(provider);
        let weak: Weak<dyn ModifierProvider> = weak;
        if !self.providers.iter().any(|p| Weak::ptr_eq(p, &weak)) {
            self.providers.push(weak);
        }
    }

    /// Detach a provider; returns false if it was not attached
    pub fn detach<P: ModifierProvider + 'static>(&mut self, provider: &Rc<P>) -> bool {
        let weak = Rc::downgrade(provider);
        let weak: Weak<dyn ModifierProvider> = weak;
        let before = self.providers.len();
        self.providers.retain(|p| !Weak::ptr_eq(p, &weak));
        self.providers.len() != before
    }

    /// Forget providers that have been dropped
    pub fn prune(&mut self) {
        self.providers.retain(|p| p.strong_count() > 0);
    }

    /// Live providers at this moment
    pub fn snapshot(&self) -> Vec<Rc<dyn ModifierProvider>> {
        self.providers.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of live providers
    pub fn len(&self) -> usize {
        self.providers.iter().filter(|p| p.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum every live provider's deltas for `stat`
    pub fn aggregate(&self, stat: Stat) -> ModifierContribution {
        sum_contributions(&self.snapshot(), stat)
    }
}

impl fmt::Debug for ModifierAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierAggregator")
            .field("providers", &self.len())
            .finish()
    }
}

/// Sum deltas for `stat` over a provider snapshot
pub fn sum_contributions(
    providers: &[Rc<dyn ModifierProvider>],
    stat: Stat,
) -> ModifierContribution {
    providers
        .iter()
        .fold(ModifierContribution::default(), |mut total, provider| {
            total.additive += provider.additive_modifiers(stat).iter().sum::<f64>();
            total.percentage += provider.percentage_modifiers(stat).iter().sum::<f64>();
            total
        })
}
