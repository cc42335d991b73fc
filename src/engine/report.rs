//! Read-only views: snapshots, display values and the end-of-meeting summary

use serde::Serialize;

use super::TimerEngine;
use crate::{
    settings::{Settings, TimerMode},
    state::TimerState,
    utils::{format_time, time_per_participant},
};

/// Remaining seconds at or below which countdown mode warns
pub const WARNING_THRESHOLD_SECS: u64 = 30;

/// What the timer face should show for the current turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTime {
    /// `MM:SS`; remaining time in countdown mode, elapsed in countup
    pub time: String,
    /// Share of the allocation used, 0 to 100
    pub progress: f64,
    pub is_warning: bool,
    pub elapsed_time: u64,
    pub remaining_time: u64,
}

/// One row of the summary report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub name: String,
    pub time_taken: u64,
    pub time_taken_display: String,
    pub total_allocation: u64,
    pub total_allocation_display: String,
    /// Allocation used, rounded to the nearest integer percent
    pub percentage: u64,
    pub is_over: bool,
    pub is_current: bool,
}

impl TimerEngine {
    pub fn get_state(&self) -> TimerState {
        self.state.clone()
    }

    pub fn get_settings(&self) -> Settings {
        self.settings.clone()
    }

    pub fn get_current_participant(&self) -> Option<String> {
        self.current_name()
    }

    /// Seconds allotted to each participant
    pub fn get_time_per_participant(&self) -> u64 {
        time_per_participant(self.settings.total_time, self.settings.participants.len())
    }

    /// Elapsed seconds in the current turn as of now
    fn current_elapsed(&self) -> u64 {
        if self.is_timing() {
            self.turn_clock.elapsed(self.now())
        } else {
            self.state.elapsed_time
        }
    }

    /// Time `name` has used, including the live turn if it is theirs
    pub fn participant_time(&self, name: &str) -> u64 {
        let current = self.state.current_participant(&self.settings.participants);
        self.state
            .tracker
            .live_time(name, current, self.state.is_paused, self.now())
    }

    pub fn get_display_time(&self) -> DisplayTime {
        let allocation = self.get_time_per_participant();
        let elapsed = self.current_elapsed();
        let remaining = allocation.saturating_sub(elapsed);
        let progress = if allocation > 0 {
            (elapsed as f64 / allocation as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let (time, is_warning) = match self.settings.timer_mode {
            TimerMode::Countdown => (format_time(remaining as i64), remaining <= WARNING_THRESHOLD_SECS),
            TimerMode::Countup => (format_time(elapsed as i64), false),
        };

        DisplayTime {
            time,
            progress,
            is_warning,
            elapsed_time: elapsed,
            remaining_time: remaining,
        }
    }

    /// Total time used across the roster.
    ///
    /// Duplicate names share one tracker and are counted once.
    pub fn get_total_time(&self) -> u64 {
        let mut seen = std::collections::HashSet::new();
        self.settings
            .participants
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| self.participant_time(name))
            .sum()
    }

    pub fn get_total_time_display(&self) -> String {
        format_time(self.get_total_time() as i64)
    }

    /// Current participant's total across all their turns, including this one
    pub fn get_current_participant_total_time(&self) -> u64 {
        self.current_name()
            .map(|name| self.participant_time(&name))
            .unwrap_or(0)
    }

    /// `taken / allocation`, e.g. `01:10 / 02:00`
    pub fn get_current_participant_time_display(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.get_current_participant_total_time() as i64),
            format_time(self.get_time_per_participant() as i64)
        )
    }

    pub fn get_summary(&self) -> Vec<ParticipantSummary> {
        let allocation = self.get_time_per_participant();
        self.settings
            .participants
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let taken = self.participant_time(name);
                let percentage = if allocation > 0 {
                    (taken as f64 / allocation as f64 * 100.0).round() as u64
                } else {
                    0
                };
                ParticipantSummary {
                    name: name.clone(),
                    time_taken: taken,
                    time_taken_display: format_time(taken as i64),
                    total_allocation: allocation,
                    total_allocation_display: format_time(allocation as i64),
                    percentage,
                    is_over: taken > allocation,
                    is_current: index == self.state.current_participant_index,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, settings::SettingsPatch, storage::MemoryStore};
    use std::sync::Arc;

    fn engine_with(names: &[&str], total: f64, mode: TimerMode) -> (TimerEngine, ManualClock) {
        let clock = ManualClock::new(0);
        let patch = SettingsPatch {
            participants: Some(names.iter().map(|n| n.to_string()).collect()),
            total_time: Some(total),
            timer_mode: Some(mode),
            ..Default::default()
        };
        let engine = TimerEngine::new(Arc::new(MemoryStore::new()), Arc::new(clock.clone()))
            .with_settings(&patch);
        (engine, clock)
    }

    #[test]
    fn countdown_display_warns_in_last_thirty_seconds() {
        let (mut engine, clock) = engine_with(&["A", "B"], 2.0, TimerMode::Countdown);
        engine.start();

        clock.advance_secs(29);
        let display = engine.get_display_time();
        assert_eq!(display.time, "00:31");
        assert!(!display.is_warning);

        clock.advance_secs(1);
        let display = engine.get_display_time();
        assert_eq!(display.time, "00:30");
        assert!(display.is_warning);
        assert_eq!(display.progress, 50.0);
    }

    #[test]
    fn countup_display_shows_elapsed_without_warning() {
        let (mut engine, clock) = engine_with(&["A", "B"], 2.0, TimerMode::Countup);
        engine.start();
        clock.advance_secs(75);

        let display = engine.get_display_time();
        assert_eq!(display.time, "01:15");
        assert!(!display.is_warning);
        assert_eq!(display.progress, 100.0);
        assert_eq!(display.remaining_time, 0);
    }

    #[test]
    fn current_participant_display_includes_live_turn() {
        let (mut engine, clock) = engine_with(&["A", "B"], 4.0, TimerMode::Countup);
        engine.start();
        clock.advance_secs(70);
        assert_eq!(engine.get_current_participant_time_display(), "01:10 / 02:00");
    }

    #[test]
    fn summary_rounds_percentages_and_flags_overruns() {
        let (mut engine, clock) = engine_with(&["A", "B", "C"], 1.0, TimerMode::Countup);
        engine.start();
        clock.advance_secs(25);
        engine.next_participant();
        clock.advance_secs(7);

        let summary = engine.get_summary();
        assert_eq!(summary.len(), 3);

        assert_eq!(summary[0].time_taken, 25);
        assert_eq!(summary[0].total_allocation, 20);
        assert_eq!(summary[0].percentage, 125);
        assert!(summary[0].is_over);
        assert!(!summary[0].is_current);

        assert_eq!(summary[1].time_taken, 7);
        assert_eq!(summary[1].percentage, 35);
        assert!(!summary[1].is_over);
        assert!(summary[1].is_current);

        assert_eq!(summary[2].time_taken_display, "00:00");
        assert_eq!(engine.get_total_time_display(), "00:32");
    }

    #[test]
    fn empty_roster_reports_nothing() {
        let (engine, _clock) = engine_with(&[], 15.0, TimerMode::Countdown);
        assert_eq!(engine.get_current_participant(), None);
        assert_eq!(engine.get_time_per_participant(), 0);
        assert!(engine.get_summary().is_empty());
        assert_eq!(engine.get_display_time().progress, 0.0);
    }
}
