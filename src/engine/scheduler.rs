//! The periodic tick that refreshes elapsed time and drives countdown rotation

use std::time::Duration;
use tracing::{info, trace};

use super::{Direction, TimerEngine};
use crate::{events::EventKind, settings::TimerMode};

/// Tick period: coarse enough for a UI, fine enough for a seconds display
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Whether ticks are armed, and how often the host should deliver them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    armed: bool,
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            armed: false,
            period,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not armed, or paused
    Idle,
    /// Elapsed time refreshed
    Updated { elapsed: u64 },
    /// The allocation ran out and the turn moved on
    Rotated { from: usize, to: usize },
}

impl TimerEngine {
    /// Refresh elapsed time and, in countdown mode, rotate when the current
    /// participant's allocation is used up.
    ///
    /// Elapsed is recomputed from timestamps every time, so late or skipped
    /// ticks only delay the refresh.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.scheduler.is_armed() || self.state.is_paused {
            return TickOutcome::Idle;
        }

        let now = self.now();
        let elapsed = self.turn_clock.elapsed(now);
        self.state.elapsed_time = elapsed;
        trace!("Tick: {}s into turn {}", elapsed, self.state.current_participant_index);
        self.emit(EventKind::Tick);

        if self.settings.timer_mode == TimerMode::Countdown {
            let allocation = self.get_time_per_participant();
            if allocation as i64 - elapsed as i64 <= 0 {
                let from = self.state.current_participant_index;
                info!(
                    "Time is up for {} after {}s",
                    self.current_name().unwrap_or_default(),
                    elapsed
                );
                self.emit(EventKind::TimeUp);
                self.advance(Direction::Forward);
                return TickOutcome::Rotated {
                    from,
                    to: self.state.current_participant_index,
                };
            }
        }

        TickOutcome::Updated { elapsed }
    }

    /// Whether the scheduler is armed (between `start` and `stop`)
    pub fn is_running(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// How often the host should call [`TimerEngine::tick`]
    pub fn tick_period(&self) -> Duration {
        self.scheduler.period()
    }
}
