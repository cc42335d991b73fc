//! Per-participant cumulative time tracking

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use super::whole_seconds_between;

/// Cumulative committed seconds per participant, plus the start marker of the
/// single in-flight turn.
///
/// A participant's true usage is `committed + (now - start)` while their marker
/// is set. Commits must happen before any index change, pause or reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantTracker {
    #[serde(rename = "participantTimeTracker")]
    committed: HashMap<String, u64>,
    #[serde(rename = "participantCurrentStartTime")]
    current_start: HashMap<String, Option<i64>>,
}

impl ParticipantTracker {
    /// Create a tracker with every participant at zero and no turn in flight
    pub fn seeded<S: AsRef<str>>(participants: &[S]) -> Self {
        let mut tracker = Self::default();
        for name in participants {
            tracker.ensure(name.as_ref());
        }
        tracker
    }

    /// Register a participant at zero if they are not tracked yet
    pub fn ensure(&mut self, name: &str) {
        self.committed.entry(name.to_string()).or_insert(0);
        self.current_start.entry(name.to_string()).or_insert(None);
    }

    /// Mark the start of `name`'s turn. Empty names are ignored.
    pub fn start_turn(&mut self, name: &str, now_ms: i64) {
        if name.is_empty() {
            return;
        }
        self.committed.entry(name.to_string()).or_insert(0);
        self.current_start.insert(name.to_string(), Some(now_ms));
    }

    /// Fold the in-flight turn of `name` into its committed total.
    ///
    /// Returns the seconds added; 0 when no turn was in flight.
    pub fn commit_turn(&mut self, name: &str, now_ms: i64) -> u64 {
        let Some(start) = self.current_start.get_mut(name).and_then(Option::take) else {
            return 0;
        };
        let spent = whole_seconds_between(start, now_ms);
        *self.committed.entry(name.to_string()).or_insert(0) += spent;
        spent
    }

    /// Zero `name`'s committed time without touching its start marker
    pub fn reset_participant(&mut self, name: &str) {
        self.committed.insert(name.to_string(), 0);
    }

    /// Committed seconds, excluding any in-flight turn
    pub fn committed(&self, name: &str) -> u64 {
        self.committed.get(name).copied().unwrap_or(0)
    }

    pub fn turn_started_at(&self, name: &str) -> Option<i64> {
        self.current_start.get(name).copied().flatten()
    }

    /// Time used by `name` right now.
    ///
    /// The in-flight delta only counts when `name` is the current participant,
    /// its marker is set and the timer is not paused. Every display, total and
    /// summary goes through this.
    pub fn live_time(&self, name: &str, current: Option<&str>, is_paused: bool, now_ms: i64) -> u64 {
        let committed = self.committed(name);
        if is_paused || current != Some(name) {
            return committed;
        }
        match self.turn_started_at(name) {
            Some(start) => committed + whole_seconds_between(start, now_ms),
            None => committed,
        }
    }

    /// Names whose turn is currently in flight
    pub fn active_turns(&self) -> impl Iterator<Item = &str> {
        self.current_start
            .iter()
            .filter(|(_, start)| start.is_some())
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_tracker_starts_at_zero() {
        let tracker = ParticipantTracker::seeded(&["A", "B"]);
        assert_eq!(tracker.committed("A"), 0);
        assert_eq!(tracker.committed("B"), 0);
        assert_eq!(tracker.active_turns().count(), 0);
    }

    #[test]
    fn commit_folds_whole_seconds_and_clears_marker() {
        let mut tracker = ParticipantTracker::seeded(&["A"]);
        tracker.start_turn("A", 0);

        assert_eq!(tracker.commit_turn("A", 10_900), 10);
        assert_eq!(tracker.committed("A"), 10);
        assert_eq!(tracker.turn_started_at("A"), None);

        // idempotent once the marker is gone
        assert_eq!(tracker.commit_turn("A", 50_000), 0);
        assert_eq!(tracker.committed("A"), 10);
    }

    #[test]
    fn live_time_only_counts_current_unpaused_turn() {
        let mut tracker = ParticipantTracker::seeded(&["A", "B"]);
        tracker.start_turn("A", 0);

        assert_eq!(tracker.live_time("A", Some("A"), false, 7_000), 7);
        assert_eq!(tracker.live_time("A", Some("A"), true, 7_000), 0);
        assert_eq!(tracker.live_time("A", Some("B"), false, 7_000), 0);
        assert_eq!(tracker.live_time("B", Some("A"), false, 7_000), 0);
    }

    #[test]
    fn empty_name_is_ignored() {
        let mut tracker = ParticipantTracker::default();
        tracker.start_turn("", 0);
        assert_eq!(tracker.active_turns().count(), 0);
    }

    #[test]
    fn serializes_with_state_field_names() {
        let mut tracker = ParticipantTracker::seeded(&["A"]);
        tracker.start_turn("A", 1_000);
        let value = serde_json::to_value(&tracker).unwrap();
        assert_eq!(value["participantTimeTracker"]["A"], 0);
        assert_eq!(value["participantCurrentStartTime"]["A"], 1_000);
    }
}
