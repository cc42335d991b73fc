//! Elapsed-time accounting for the active turn

use super::whole_seconds_between;

/// Converts a turn origin plus banked pause time into elapsed seconds.
///
/// Elapsed is always recomputed from timestamps, never incremented per tick,
/// so missed or late ticks cannot skew it. Resuming re-anchors the origin
/// instead of stacking offsets, which keeps repeated pause cycles drift-free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeAccumulator {
    /// Origin of the current turn (`T0`), epoch milliseconds
    turn_start: Option<i64>,
    /// Seconds banked at the last pause (`P`)
    paused_elapsed: u64,
    /// When the current pause began, if paused
    pause_started: Option<i64>,
}

impl TimeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh, running turn at `now` with nothing banked
    pub fn start(&mut self, now_ms: i64) {
        self.turn_start = Some(now_ms);
        self.paused_elapsed = 0;
        self.pause_started = None;
    }

    /// Begin a new turn at `now` with nothing banked, keeping the pause state.
    ///
    /// A paused accumulator stays frozen at zero until resumed.
    pub fn restart(&mut self, now_ms: i64) {
        self.turn_start = Some(now_ms);
        self.paused_elapsed = 0;
        if self.pause_started.is_some() {
            self.pause_started = Some(now_ms);
        }
    }

    /// Seconds elapsed in the current turn: `floor((now - T0) / 1000) + P`.
    ///
    /// While paused this is frozen at the banked value.
    pub fn elapsed(&self, now_ms: i64) -> u64 {
        if self.pause_started.is_some() {
            return self.paused_elapsed;
        }
        match self.turn_start {
            Some(start) => whole_seconds_between(start, now_ms) + self.paused_elapsed,
            None => self.paused_elapsed,
        }
    }

    /// Bank the elapsed time and stop advancing. Returns the banked seconds.
    pub fn pause(&mut self, now_ms: i64) -> u64 {
        if self.pause_started.is_none() {
            self.paused_elapsed = self.elapsed(now_ms);
            self.pause_started = Some(now_ms);
        }
        self.paused_elapsed
    }

    /// Re-anchor the origin so reads continue from the banked value
    pub fn resume(&mut self, now_ms: i64) {
        if self.pause_started.take().is_some() {
            self.turn_start = Some(now_ms - self.paused_elapsed as i64 * 1000);
            self.paused_elapsed = 0;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }
}
