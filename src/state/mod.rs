//! State management module
//! 
//! This module contains the runtime timer state, the time accounting helpers
//! that mutate it, and the shared application state used by the HTTP server.

pub mod accumulator;
pub mod app_state;
pub mod timer_state;
pub mod tracker;

// Re-export main types
pub use accumulator::TimeAccumulator;
pub use app_state::AppState;
pub use timer_state::TimerState;
pub use tracker::ParticipantTracker;

/// Whole seconds between two millisecond timestamps, floored and never negative
pub(crate) fn whole_seconds_between(start_ms: i64, now_ms: i64) -> u64 {
    (now_ms.saturating_sub(start_ms).max(0) / 1000) as u64
}
