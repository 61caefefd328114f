//! Progression engine - level tracking, level-up detection and stat evaluation
//!
//! The engine owns one character's cached level. It reads experience from an
//! optional [`ExperienceLedger`], base values from a shared
//! [`ProgressionTable`] and deltas from attached modifier providers.
//!
//! Lifecycle:
//! - `attach()` initializes the level and subscribes to the ledger
//! - every experience gain recomputes the level; a rise fires one [`LevelUp`]
//! - `detach()` (or dropping the engine) unsubscribes

mod level;

pub use level::calculate_level;

use crate::config::{CharacterSettings, MAX_STARTING_LEVEL};
use crate::event::{ListenerId, Listeners};
use crate::experience::{ExperienceLedger, Subscription};
use crate::modifier::{
    sum_contributions, ModifierAggregator, ModifierContribution, ModifierProvider,
};
use crate::ProgressionError;
use curve_core::{CharacterClass, ProgressionTable, Stat};
use level::CachedLevel;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Emitted once per experience gain that raises the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub class: CharacterClass,
    pub previous: u32,
    pub current: u32,
}

impl LevelUp {
    /// Levels crossed by this gain (can exceed 1)
    pub fn levels_gained(&self) -> u32 {
        self.current - self.previous
    }
}

/// Presentation side effect run on level-up, before public listeners
pub trait LevelUpPresenter {
    fn present(&self, level_up: &LevelUp);
}

impl<F: Fn(&LevelUp)> LevelUpPresenter for F {
    fn present(&self, level_up: &LevelUp) {
        self(level_up)
    }
}

/// Builder for [`ProgressionEngine`]
pub struct EngineBuilder {
    class: CharacterClass,
    table: Arc<ProgressionTable>,
    ledger: Option<Rc<ExperienceLedger>>,
    starting_level: u32,
    use_modifiers: bool,
    modifiers: ModifierAggregator,
    presenter: Option<Rc<dyn LevelUpPresenter>>,
}

impl EngineBuilder {
    pub fn new(class: CharacterClass, table: Arc<ProgressionTable>) -> Self {
        EngineBuilder {
            class,
            table,
            ledger: None,
            starting_level: 1,
            use_modifiers: false,
            modifiers: ModifierAggregator::new(),
            presenter: None,
        }
    }

    /// Track levels from this ledger instead of the starting level
    pub fn with_ledger(mut self, ledger: Rc<ExperienceLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_starting_level(mut self, level: u32) -> Self {
        self.starting_level = level;
        self
    }

    pub fn with_modifiers(mut self, use_modifiers: bool) -> Self {
        self.use_modifiers = use_modifiers;
        self
    }

    pub fn with_provider<P: ModifierProvider + 'static>(mut self, provider: &Rc<P>) -> Self {
        self.modifiers.attach(provider);
        self
    }

    pub fn with_presenter(mut self, presenter: impl LevelUpPresenter + 'static) -> Self {
        let presenter: Rc<dyn LevelUpPresenter> = Rc::new(presenter);
        self.presenter = Some(presenter);
        self
    }

    /// Validate and build the engine (not yet attached)
    pub fn build(self) -> Result<ProgressionEngine, ProgressionError> {
        if !(1..=MAX_STARTING_LEVEL).contains(&self.starting_level) {
            return Err(ProgressionError::InvalidStartingLevel {
                level: self.starting_level,
                max: MAX_STARTING_LEVEL,
            });
        }

        // Leveling from experience needs the class's threshold curve
        if self.ledger.is_some() {
            self.table.levels(Stat::ExperienceToLevelUp, self.class)?;
        }

        Ok(ProgressionEngine {
            core: Rc::new(EngineCore {
                class: self.class,
                table: self.table,
                ledger: self.ledger,
                starting_level: self.starting_level,
                use_modifiers: self.use_modifiers,
                level: CachedLevel::default(),
                modifiers: RefCell::new(self.modifiers),
                presenter: self.presenter,
                level_up: Listeners::new(),
            }),
            subscription: None,
        })
    }
}

struct EngineCore {
    class: CharacterClass,
    table: Arc<ProgressionTable>,
    ledger: Option<Rc<ExperienceLedger>>,
    starting_level: u32,
    use_modifiers: bool,
    level: CachedLevel,
    modifiers: RefCell<ModifierAggregator>,
    presenter: Option<Rc<dyn LevelUpPresenter>>,
    level_up: Listeners<LevelUp>,
}

impl EngineCore {
    fn thresholds(&self) -> &[f64] {
        // Presence is checked by EngineBuilder::build whenever a ledger is set
        self.table
            .curve(Stat::ExperienceToLevelUp, self.class)
            .unwrap_or(&[])
    }

    fn calculate_level(&self) -> u32 {
        match &self.ledger {
            None => self.starting_level,
            Some(ledger) => calculate_level(self.thresholds(), ledger.experience_points()),
        }
    }

    fn level(&self) -> u32 {
        self.level.get_or_init(|| {
            let level = self.calculate_level();
            tracing::debug!(class = %self.class, level, "level initialized");
            level
        })
    }

    fn on_experience_gained(&self) {
        let current = self.level();
        let new_level = self.calculate_level();
        if new_level <= current {
            return;
        }

        self.level.raise(new_level);
        let event = LevelUp {
            class: self.class,
            previous: current,
            current: new_level,
        };
        tracing::info!(class = %self.class, previous = current, current = new_level, "level up");

        if let Some(presenter) = &self.presenter {
            presenter.present(&event);
        }
        self.level_up.emit(&event);
    }

    fn contribution(&self, stat: Stat) -> ModifierContribution {
        if !self.use_modifiers {
            return ModifierContribution::default();
        }
        let providers = self.modifiers.borrow().snapshot();
        sum_contributions(&providers, stat)
    }
}

/// Level and stat state for one character
pub struct ProgressionEngine {
    core: Rc<EngineCore>,
    subscription: Option<Subscription>,
}

impl ProgressionEngine {
    pub fn builder(class: CharacterClass, table: Arc<ProgressionTable>) -> EngineBuilder {
        EngineBuilder::new(class, table)
    }

    /// Build an engine from loaded settings
    pub fn from_settings(
        settings: &CharacterSettings,
        table: Arc<ProgressionTable>,
        ledger: Option<Rc<ExperienceLedger>>,
    ) -> Result<Self, ProgressionError> {
        let mut builder = EngineBuilder::new(settings.class, table)
            .with_starting_level(settings.starting_level)
            .with_modifiers(settings.use_modifiers);
        if let Some(ledger) = ledger {
            builder = builder.with_ledger(ledger);
        }
        builder.build()
    }

    /// Activate: initialize the level and subscribe to experience gains
    ///
    /// Calling it while already attached has no effect. Without a ledger
    /// this only initializes the level.
    pub fn attach(&mut self) {
        self.core.level();
        if self.subscription.is_some() {
            return;
        }

        if let Some(ledger) = &self.core.ledger {
            let core = Rc::downgrade(&self.core);
            self.subscription = Some(ledger.subscribe(move |_| {
                if let Some(core) = core.upgrade() {
                    core.on_experience_gained();
                }
            }));
        }
    }

    /// Deactivate: stop reacting to experience gains
    ///
    /// Gains made while detached are not replayed on re-attach; the level
    /// catches up on the next gain after that.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Force the cached level to be computed; no-op once it is
    pub fn initialize(&self) -> u32 {
        self.core.level()
    }

    pub fn is_initialized(&self) -> bool {
        self.core.level.get().is_some()
    }

    /// Current level, computed on first access and memoized after
    pub fn level(&self) -> u32 {
        self.core.level()
    }

    /// Level implied by the experience held right now, without caching it
    pub fn calculate_level(&self) -> u32 {
        self.core.calculate_level()
    }

    pub fn character_class(&self) -> CharacterClass {
        self.core.class
    }

    pub fn uses_modifiers(&self) -> bool {
        self.core.use_modifiers
    }

    pub fn ledger(&self) -> Option<&Rc<ExperienceLedger>> {
        self.core.ledger.as_ref()
    }

    pub fn experience(&self) -> Option<f64> {
        self.core.ledger.as_ref().map(|l| l.experience_points())
    }

    /// Stat value at the current level with modifiers applied
    pub fn get_stat(&self, stat: Stat) -> Result<f64, ProgressionError> {
        let base = self.base_stat(stat)?;
        Ok(self.core.contribution(stat).apply(base))
    }

    /// Unmodified table value at the current level
    pub fn base_stat(&self, stat: Stat) -> Result<f64, ProgressionError> {
        let level = self.level();
        Ok(self.core.table.get_stat(stat, self.core.class, level)?)
    }

    /// Summed modifier deltas (zero when modifiers are disabled)
    pub fn modifiers(&self, stat: Stat) -> ModifierContribution {
        self.core.contribution(stat)
    }

    /// Total experience needed to leave the current level
    pub fn exp_to_next_level_up(&self) -> Result<f64, ProgressionError> {
        Ok(self.core.table.get_stat(
            Stat::ExperienceToLevelUp,
            self.core.class,
            self.level(),
        )?)
    }

    /// Fraction of the way through the current level, nominally in [0, 1]
    ///
    /// A level whose bounds are equal reports 0.0.
    pub fn exp_progression(&self) -> Result<f64, ProgressionError> {
        let experience = self.experience().ok_or(ProgressionError::MissingLedger)?;
        let level = self.level();
        let next = self.exp_to_next_level_up()?;

        let last = if level == 1 {
            0.0
        } else {
            self.core
                .table
                .get_stat(Stat::ExperienceToLevelUp, self.core.class, level - 1)?
        };

        let span = next - last;
        if span == 0.0 {
            tracing::warn!(class = %self.core.class, level, "zero-width experience band");
            return Ok(0.0);
        }
        Ok((experience - last) / span)
    }

    /// True once experience has met every defined threshold
    pub fn is_max_level(&self) -> bool {
        self.core.ledger.is_some() && self.level() as usize > self.core.thresholds().len()
    }

    /// Subscribe to level-up events
    pub fn on_level_up(&self, callback: impl Fn(&LevelUp) + 'static) -> ListenerId {
        self.core.level_up.subscribe(callback)
    }

    pub fn remove_level_up_listener(&self, id: ListenerId) -> bool {
        self.core.level_up.unsubscribe(id)
    }

    pub fn add_provider<P: ModifierProvider + 'static>(&self, provider: &Rc<P>) {
        let mut modifiers = self.core.modifiers.borrow_mut();
        modifiers.prune();
        modifiers.attach(provider);
    }

    pub fn remove_provider<P: ModifierProvider + 'static>(&self, provider: &Rc<P>) -> bool {
        self.core.modifiers.borrow_mut().detach(provider)
    }
}

impl fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("class", &self.core.class)
            .field("level", &self.core.level.get())
            .field("experience", &self.experience())
            .field("use_modifiers", &self.core.use_modifiers)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_core::LookupError;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn warrior_table() -> Arc<ProgressionTable> {
        Arc::new(
            ProgressionTable::new()
                .with_curve(
                    CharacterClass::Warrior,
                    Stat::ExperienceToLevelUp,
                    [100.0, 250.0, 500.0],
                )
                .unwrap()
                .with_curve(
                    CharacterClass::Warrior,
                    Stat::Health,
                    [50.0, 65.0, 80.0, 100.0],
                )
                .unwrap()
                .with_curve(
                    CharacterClass::Warrior,
                    Stat::Damage,
                    [10.0, 12.0, 15.0, 20.0],
                )
                .unwrap()
                .with_curve(
                    CharacterClass::Mage,
                    Stat::ExperienceToLevelUp,
                    [10.0, 20.0, 30.0],
                )
                .unwrap()
                .with_curve(
                    CharacterClass::Grunt,
                    Stat::ExperienceToLevelUp,
                    [10.0, 10.0, 40.0],
                )
                .unwrap()
                .with_curve(CharacterClass::Grunt, Stat::Health, [5.0, 6.0, 7.0])
                .unwrap(),
        )
    }

    fn attached(class: CharacterClass, ledger: &Rc<ExperienceLedger>) -> ProgressionEngine {
        let mut engine = ProgressionEngine::builder(class, warrior_table())
            .with_ledger(Rc::clone(ledger))
            .build()
            .unwrap();
        engine.attach();
        engine
    }

    fn count_level_ups(engine: &ProgressionEngine) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        engine.on_level_up(move |_| counter.set(counter.get() + 1));
        count
    }

    struct Gear {
        additive: f64,
        percentage: f64,
    }

    impl ModifierProvider for Gear {
        fn additive_modifiers(&self, stat: Stat) -> Vec<f64> {
            if stat == Stat::Damage {
                vec![self.additive]
            } else {
                Vec::new()
            }
        }

        fn percentage_modifiers(&self, stat: Stat) -> Vec<f64> {
            if stat == Stat::Damage {
                vec![self.percentage]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_warrior_scenario() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);
        let level_ups = count_level_ups(&engine);

        assert_eq!(engine.level(), 1);

        ledger.add_experience(100.0).unwrap();
        assert_eq!(engine.level(), 2);
        assert_eq!(level_ups.get(), 1);

        ledger.add_experience(500.0).unwrap();
        assert_eq!(engine.level(), 4);
        assert_eq!(level_ups.get(), 2);
        assert!(engine.is_max_level());
    }

    #[test]
    fn test_single_event_for_multi_level_gain() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);

        let events = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&events);
        engine.on_level_up(move |event| log.borrow_mut().push(*event));

        ledger.add_experience(300.0).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            LevelUp {
                class: CharacterClass::Warrior,
                previous: 1,
                current: 3
            }
        );
        assert_eq!(events[0].levels_gained(), 2);
    }

    #[test]
    fn test_gain_without_crossing_is_silent() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);
        let level_ups = count_level_ups(&engine);

        ledger.add_experience(50.0).unwrap();
        ledger.add_experience(0.0).unwrap();
        ledger.add_experience(49.0).unwrap();

        assert_eq!(engine.level(), 1);
        assert_eq!(level_ups.get(), 0);
    }

    #[test]
    fn test_threshold_boundary_uses_strict_comparison() {
        let ledger = Rc::new(ExperienceLedger::with_points(20.0).unwrap());
        let engine = attached(CharacterClass::Mage, &ledger);
        assert_eq!(engine.level(), 3);
    }

    #[test]
    fn test_level_is_memoized() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = ProgressionEngine::builder(CharacterClass::Warrior, warrior_table())
            .with_ledger(Rc::clone(&ledger))
            .build()
            .unwrap();

        assert!(!engine.is_initialized());
        assert_eq!(engine.level(), 1);
        assert!(engine.is_initialized());

        // Not attached, so the gain is not observed
        ledger.add_experience(1000.0).unwrap();
        assert_eq!(engine.calculate_level(), 4);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.level(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let ledger = Rc::new(ExperienceLedger::with_points(120.0).unwrap());
        let engine = ProgressionEngine::builder(CharacterClass::Warrior, warrior_table())
            .with_ledger(Rc::clone(&ledger))
            .build()
            .unwrap();

        assert_eq!(engine.initialize(), 2);
        ledger.add_experience(400.0).unwrap();
        assert_eq!(engine.initialize(), 2);
    }

    #[test]
    fn test_detach_stops_updates() {
        let ledger = Rc::new(ExperienceLedger::new());
        let mut engine = attached(CharacterClass::Warrior, &ledger);
        let level_ups = count_level_ups(&engine);

        engine.detach();
        assert!(!engine.is_attached());
        assert_eq!(ledger.listener_count(), 0);

        ledger.add_experience(150.0).unwrap();
        assert_eq!(engine.level(), 1);
        assert_eq!(level_ups.get(), 0);

        engine.attach();
        ledger.add_experience(10.0).unwrap();
        assert_eq!(engine.level(), 2);
        assert_eq!(level_ups.get(), 1);
    }

    #[test]
    fn test_attach_twice_subscribes_once() {
        let ledger = Rc::new(ExperienceLedger::new());
        let mut engine = attached(CharacterClass::Warrior, &ledger);
        engine.attach();
        assert_eq!(ledger.listener_count(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);
        assert_eq!(ledger.listener_count(), 1);

        drop(engine);
        assert_eq!(ledger.listener_count(), 0);
        ledger.add_experience(1000.0).unwrap();
    }

    #[test]
    fn test_presenter_runs_before_listeners() {
        let ledger = Rc::new(ExperienceLedger::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        let presenter_log = Rc::clone(&order);
        let mut engine = ProgressionEngine::builder(CharacterClass::Warrior, warrior_table())
            .with_ledger(Rc::clone(&ledger))
            .with_presenter(move |event: &LevelUp| {
                presenter_log.borrow_mut().push(format!("present {}", event.current))
            })
            .build()
            .unwrap();
        engine.attach();

        let listener_log = Rc::clone(&order);
        engine.on_level_up(move |event| {
            listener_log
                .borrow_mut()
                .push(format!("event {}", event.current))
        });

        ledger.add_experience(100.0).unwrap();
        assert_eq!(*order.borrow(), vec!["present 2", "event 2"]);
    }

    #[test]
    fn test_level_up_listener_can_add_experience() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);
        let level_ups = count_level_ups(&engine);

        let bonus_ledger = Rc::downgrade(&ledger);
        engine.on_level_up(move |event| {
            if event.current == 2 {
                if let Some(ledger) = bonus_ledger.upgrade() {
                    ledger.add_experience(150.0).unwrap();
                }
            }
        });

        ledger.add_experience(100.0).unwrap();
        assert_eq!(engine.level(), 3);
        assert_eq!(level_ups.get(), 2);
    }

    #[test]
    fn test_remove_level_up_listener() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);

        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let id = engine.on_level_up(move |_| counter.set(counter.get() + 1));

        assert!(engine.remove_level_up_listener(id));
        ledger.add_experience(100.0).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_starting_level_without_ledger() {
        let engine = ProgressionEngine::builder(CharacterClass::Grunt, warrior_table())
            .with_starting_level(3)
            .build()
            .unwrap();

        assert_eq!(engine.level(), 3);
        assert_eq!(engine.get_stat(Stat::Health), Ok(7.0));
        assert_eq!(engine.experience(), None);
        assert!(!engine.is_max_level());
        assert_eq!(
            engine.exp_progression(),
            Err(ProgressionError::MissingLedger)
        );
    }

    #[test]
    fn test_attach_without_ledger_initializes_only() {
        let mut engine = ProgressionEngine::builder(CharacterClass::Grunt, warrior_table())
            .with_starting_level(2)
            .build()
            .unwrap();
        engine.attach();
        assert!(engine.is_initialized());
        assert!(!engine.is_attached());
    }

    #[test]
    fn test_invalid_starting_level() {
        for level in [0, MAX_STARTING_LEVEL + 1] {
            let result = ProgressionEngine::builder(CharacterClass::Grunt, warrior_table())
                .with_starting_level(level)
                .build();
            assert!(matches!(
                result,
                Err(ProgressionError::InvalidStartingLevel { .. })
            ));
        }
    }

    #[test]
    fn test_ledger_requires_threshold_curve() {
        let result = ProgressionEngine::builder(CharacterClass::Archer, warrior_table())
            .with_ledger(Rc::new(ExperienceLedger::new()))
            .build();
        assert!(matches!(result, Err(ProgressionError::Lookup(_))));
    }

    #[test]
    fn test_get_stat_without_modifiers_matches_table() {
        let ledger = Rc::new(ExperienceLedger::with_points(260.0).unwrap());
        let engine = attached(CharacterClass::Warrior, &ledger);
        engine.add_provider(&Rc::new(Gear {
            additive: 100.0,
            percentage: 100.0,
        }));

        assert_eq!(engine.level(), 3);
        assert_eq!(engine.get_stat(Stat::Damage), Ok(15.0));
        assert_eq!(
            engine.modifiers(Stat::Damage),
            ModifierContribution::default()
        );
    }

    #[test]
    fn test_get_stat_formula() {
        let gear = Rc::new(Gear {
            additive: 5.0,
            percentage: 50.0,
        });
        let engine = ProgressionEngine::builder(CharacterClass::Warrior, warrior_table())
            .with_modifiers(true)
            .with_provider(&gear)
            .build()
            .unwrap();

        // base 10 at level 1
        let damage = engine.get_stat(Stat::Damage).unwrap();
        assert!((damage - 22.5).abs() < f64::EPSILON);

        let health = engine.get_stat(Stat::Health).unwrap();
        assert!((health - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_providers_added_and_removed() {
        let engine = ProgressionEngine::builder(CharacterClass::Warrior, warrior_table())
            .with_modifiers(true)
            .build()
            .unwrap();

        let ring = Rc::new(Gear {
            additive: 2.0,
            percentage: 0.0,
        });
        let amulet = Rc::new(Gear {
            additive: 3.0,
            percentage: 10.0,
        });
        engine.add_provider(&ring);
        engine.add_provider(&amulet);

        let damage = engine.get_stat(Stat::Damage).unwrap();
        assert!((damage - 16.5).abs() < 1e-9);

        assert!(engine.remove_provider(&amulet));
        assert_eq!(engine.get_stat(Stat::Damage), Ok(12.0));

        drop(ring);
        assert_eq!(engine.get_stat(Stat::Damage), Ok(10.0));
    }

    #[test]
    fn test_stat_past_curve_is_an_error() {
        let ledger = Rc::new(ExperienceLedger::with_points(600.0).unwrap());
        let engine = attached(CharacterClass::Warrior, &ledger);

        assert_eq!(engine.level(), 4);
        assert_eq!(engine.get_stat(Stat::Health), Ok(100.0));
        assert!(matches!(
            engine.exp_to_next_level_up(),
            Err(ProgressionError::Lookup(LookupError::LevelOutOfRange { level: 4, .. }))
        ));
    }

    #[test]
    fn test_exp_to_next_level_up() {
        let ledger = Rc::new(ExperienceLedger::with_points(120.0).unwrap());
        let engine = attached(CharacterClass::Warrior, &ledger);
        assert_eq!(engine.exp_to_next_level_up(), Ok(250.0));
    }

    #[test]
    fn test_exp_progression_first_level() {
        let ledger = Rc::new(ExperienceLedger::with_points(5.0).unwrap());
        let engine = attached(CharacterClass::Mage, &ledger);
        assert_eq!(engine.exp_progression(), Ok(0.5));
    }

    #[test]
    fn test_exp_progression_later_level() {
        let ledger = Rc::new(ExperienceLedger::with_points(175.0).unwrap());
        let engine = attached(CharacterClass::Warrior, &ledger);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.exp_progression(), Ok(0.5));
    }

    #[test]
    fn test_exp_progression_zero_width_band() {
        // Grunt thresholds [10, 10, 40]: level 2 spans nothing
        let ledger = Rc::new(ExperienceLedger::with_points(0.0).unwrap());
        let engine = ProgressionEngine::builder(CharacterClass::Grunt, warrior_table())
            .with_ledger(Rc::clone(&ledger))
            .build()
            .unwrap();

        // Only reachable by seeding the cache directly
        engine.core.level.get_or_init(|| 2);
        assert_eq!(engine.exp_progression(), Ok(0.0));
    }

    #[test]
    fn test_level_never_decreases_over_gains() {
        let ledger = Rc::new(ExperienceLedger::new());
        let engine = attached(CharacterClass::Warrior, &ledger);

        let mut last = engine.level();
        for amount in [0.0, 30.0, 80.0, 0.0, 140.0, 1.0, 300.0, 5.0] {
            ledger.add_experience(amount).unwrap();
            let level = engine.level();
            assert!(level >= last);
            assert_eq!(level, engine.calculate_level());
            last = level;
        }
        assert_eq!(last, 4);
    }

    #[test]
    fn test_from_settings() {
        let settings = CharacterSettings::new(CharacterClass::Warrior)
            .with_starting_level(2)
            .with_modifiers(true);

        let engine = ProgressionEngine::from_settings(&settings, warrior_table(), None).unwrap();
        assert_eq!(engine.character_class(), CharacterClass::Warrior);
        assert_eq!(engine.level(), 2);
        assert!(engine.uses_modifiers());
    }

    proptest! {
        #[test]
        fn attached_level_tracks_every_gain(
            gains in prop::collection::vec(0.0f64..400.0, 0..30)
        ) {
            let ledger = Rc::new(ExperienceLedger::new());
            let engine = attached(CharacterClass::Warrior, &ledger);
            let count = count_level_ups(&engine);

            let mut previous = engine.level();
            for (applied, gain) in gains.iter().enumerate() {
                ledger.add_experience(*gain).unwrap();

                let level = engine.level();
                prop_assert!(level >= previous);
                prop_assert_eq!(level, engine.calculate_level());

                // At most one event per gain, and never more than the levels crossed
                let level_ups = count.get() as usize;
                prop_assert!(level_ups <= applied + 1);
                prop_assert!(count.get() <= level - 1);
                previous = level;
            }
        }
    }
}
