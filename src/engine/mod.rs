//! The timer engine: owns the runtime state and settings and exposes every
//! timer operation.
//!
//! The engine is synchronous and single-owner. A host drives it by calling
//! [`TimerEngine::tick`] periodically (see `tasks::ticker`) and by invoking
//! operations in response to user input; each call runs to completion.
//! Observers subscribe with [`TimerEngine::on`] and receive snapshots.

pub mod report;
pub mod rotation;
pub mod scheduler;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    events::{EventBus, EventKind, ListenerId, TimerEvent},
    settings::{Settings, SettingsPatch, STORAGE_KEYS},
    state::{TimeAccumulator, TimerState},
    storage::{MemoryStore, SettingsStore, StorageError, StoredValues},
};

pub use report::{DisplayTime, ParticipantSummary};
pub use rotation::Direction;
pub use scheduler::{Scheduler, TickOutcome, DEFAULT_TICK_PERIOD};

/// Rotating multi-participant meeting timer
pub struct TimerEngine {
    settings: Settings,
    state: TimerState,
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    turn_clock: TimeAccumulator,
    scheduler: Scheduler,
    bus: EventBus,
}

impl TimerEngine {
    /// Create an engine with default settings backed by `store` and `clock`
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings: Settings::default(),
            state: TimerState::default(),
            store,
            clock,
            turn_clock: TimeAccumulator::new(),
            scheduler: Scheduler::default(),
            bus: EventBus::new(),
        }
    }

    /// Engine on the system clock with an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    /// Seed the in-memory settings before `initialize`; stored values still win
    pub fn with_settings(mut self, patch: &SettingsPatch) -> Self {
        self.settings = self.settings.apply(patch);
        self.state = TimerState::seeded(&self.settings.participants);
        self
    }

    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    fn has_participants(&self) -> bool {
        !self.settings.participants.is_empty()
    }

    /// Whether turns are being timed right now
    fn is_timing(&self) -> bool {
        self.scheduler.is_armed() && !self.state.is_paused
    }

    fn current_name(&self) -> Option<String> {
        self.state
            .current_participant(&self.settings.participants)
            .map(str::to_string)
    }

    fn emit(&mut self, kind: EventKind) {
        self.bus.emit(kind, &self.state, &self.settings);
    }

    /// Fold the current participant's in-flight turn into their total
    fn commit_current_turn(&mut self, now: i64) {
        if let Some(name) = self.current_name() {
            let spent = self.state.tracker.commit_turn(&name, now);
            if spent > 0 {
                debug!("Committed {}s to {}", spent, name);
            }
        }
    }

    fn start_current_turn(&mut self, now: i64) {
        if let Some(name) = self.current_name() {
            self.state.tracker.start_turn(&name, now);
        }
    }
}

// Settings lifecycle
impl TimerEngine {
    /// Load settings from the store, overlaying them on the in-memory ones.
    ///
    /// Totals already tracked survive, including those frozen by `stop`. On
    /// failure the current settings are kept and the error is returned.
    pub async fn initialize(&mut self) -> Result<(), StorageError> {
        let stored = self.store.get(&STORAGE_KEYS).await?;
        let next = merge_stored(&self.settings, stored)?;
        let previous = self.current_name();

        info!(
            "Loaded settings: {} participant(s), {} min, {:?} mode",
            next.participants.len(),
            next.total_time,
            next.timer_mode
        );
        self.settings = next;
        self.reconcile_roster(previous);
        Ok(())
    }

    /// Persist a partial update and apply it.
    ///
    /// The store is written first; if that fails, the in-memory settings stay
    /// as they were and the error is returned.
    pub async fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), StorageError> {
        let values = match serde_json::to_value(&patch)? {
            serde_json::Value::Object(values) => values,
            _ => StoredValues::new(),
        };
        self.store.set(values).await?;

        let previous = self.current_name();
        self.settings = self.settings.apply(&patch);
        info!("Settings updated: {:?}", patch);
        self.reconcile_roster(previous);
        self.emit(EventKind::SettingsChanged);
        Ok(())
    }

    /// Bring state in line with a possibly changed participant list.
    ///
    /// New names are tracked at zero. If the current slot no longer holds
    /// `previous`, the old turn is committed and a new one begins, paused or not.
    fn reconcile_roster(&mut self, previous: Option<String>) {
        let now = self.now();
        for name in &self.settings.participants {
            self.state.tracker.ensure(name);
        }

        let in_flight: Vec<String> = self.state.tracker.active_turns().map(str::to_string).collect();
        let current = self.current_name();
        let slot_changed = previous.is_some() && previous != current;
        if !slot_changed
            && in_flight.iter().all(|name| Some(name) == current.as_ref())
            && self.state.current_participant_index < self.settings.participants.len().max(1)
        {
            return;
        }

        for name in &in_flight {
            self.state.tracker.commit_turn(name, now);
        }
        if self.state.current_participant_index >= self.settings.participants.len() {
            self.state.current_participant_index = 0;
        }
        self.state.elapsed_time = 0;
        self.turn_clock.restart(now);
        if self.is_timing() {
            self.start_current_turn(now);
        }
        warn!(
            "Roster changed under the current turn, now on {:?}",
            self.current_name()
        );
        self.emit(EventKind::ParticipantChanged);
    }
}

// Timer controls
impl TimerEngine {
    /// Reset all state, seed every participant at zero and arm the scheduler
    pub fn start(&mut self) {
        if !self.has_participants() {
            debug!("start ignored: no participants");
            return;
        }
        let now = self.now();
        self.state = TimerState::seeded(&self.settings.participants);
        self.turn_clock.start(now);
        self.scheduler.arm();
        self.start_current_turn(now);

        info!(
            "Timer started with {} participant(s), {}s each",
            self.settings.participants.len(),
            self.get_time_per_participant()
        );
        self.emit(EventKind::StateChanged);
    }

    /// Disarm the scheduler. The in-flight turn is committed and the turn
    /// clock frozen, so totals and elapsed stay put until the next `start`.
    pub fn stop(&mut self) {
        if !self.scheduler.is_armed() {
            return;
        }
        let now = self.now();
        self.commit_current_turn(now);
        self.state.elapsed_time = self.turn_clock.pause(now);
        self.scheduler.disarm();
        info!("Timer stopped");
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Commit the current turn and freeze the turn clock. No-op if paused.
    ///
    /// While stopped only the flag flips; the turn clock is already frozen.
    pub fn pause(&mut self) {
        if !self.has_participants() || self.state.is_paused {
            return;
        }
        let now = self.now();
        self.commit_current_turn(now);
        if self.scheduler.is_armed() {
            self.state.elapsed_time = self.turn_clock.pause(now);
        }
        self.state.is_paused = true;

        info!("Timer paused at {}s into the turn", self.state.elapsed_time);
        self.emit(EventKind::Paused);
    }

    /// Re-anchor the turn clock and restart the current turn. No-op if running.
    pub fn resume(&mut self) {
        if !self.has_participants() || !self.state.is_paused {
            return;
        }
        let now = self.now();
        self.state.is_paused = false;
        if self.scheduler.is_armed() {
            self.turn_clock.resume(now);
            self.start_current_turn(now);
        }

        info!("Timer resumed");
        self.emit(EventKind::Resumed);
    }

    pub fn next_participant(&mut self) {
        self.advance(Direction::Forward);
    }

    pub fn previous_participant(&mut self) {
        self.advance(Direction::Backward);
    }

    /// Zero the current participant's total and turn clock, clearing any pause
    pub fn reset_current_participant(&mut self) {
        let Some(name) = self.current_name() else {
            return;
        };
        let now = self.now();
        self.state.tracker.commit_turn(&name, now);
        self.state.tracker.reset_participant(&name);
        self.state.elapsed_time = 0;
        self.state.is_paused = false;
        self.turn_clock.start(now);
        if self.scheduler.is_armed() {
            self.state.tracker.start_turn(&name, now);
        }

        info!("Reset time for {}", name);
        self.emit(EventKind::Reset);
    }

    /// Reinitialize all state from the first participant.
    ///
    /// A running timer keeps running; its first turn starts now.
    pub fn reset_all(&mut self) {
        if !self.has_participants() {
            return;
        }
        let now = self.now();
        self.state = TimerState::seeded(&self.settings.participants);
        self.turn_clock.start(now);
        if self.scheduler.is_armed() {
            self.start_current_turn(now);
        }

        info!("Reset all participants");
        self.emit(EventKind::Reset);
    }

    /// Flip the UI minimized flag; time is unaffected
    pub fn toggle_minimized(&mut self) {
        self.state.is_minimized = !self.state.is_minimized;
        self.emit(EventKind::StateChanged);
    }
}

// Subscriptions
impl TimerEngine {
    /// Subscribe to an event kind. Listeners must not block.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        self.bus.on(kind, listener)
    }

    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.bus.off(kind, id)
    }

    pub fn remove_all_listeners(&mut self) {
        self.bus.clear();
    }
}

/// Overlay stored values on top of `current`
fn merge_stored(current: &Settings, stored: StoredValues) -> Result<Settings, StorageError> {
    let mut merged = match serde_json::to_value(current)? {
        serde_json::Value::Object(values) => values,
        _ => StoredValues::new(),
    };
    merged.extend(stored);
    Ok(serde_json::from_value(serde_json::Value::Object(merged))?)
}
