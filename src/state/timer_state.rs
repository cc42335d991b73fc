//! Runtime timer state

use serde::{Deserialize, Serialize};

use super::ParticipantTracker;

/// Mutable runtime state of one timer, owned by the engine.
///
/// Observers only ever receive clones of this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Index into the participant list; meaningful only when it is non-empty
    pub current_participant_index: usize,
    /// Seconds elapsed in the current turn
    pub elapsed_time: u64,
    pub is_paused: bool,
    /// UI-only flag with no effect on time
    pub is_minimized: bool,
    #[serde(flatten)]
    pub tracker: ParticipantTracker,
}

impl TimerState {
    /// Fresh state with every participant tracked at zero
    pub fn seeded<S: AsRef<str>>(participants: &[S]) -> Self {
        Self {
            tracker: ParticipantTracker::seeded(participants),
            ..Self::default()
        }
    }

    /// Name of the current participant, if any
    pub fn current_participant<'a>(&self, participants: &'a [String]) -> Option<&'a str> {
        participants
            .get(self.current_participant_index)
            .map(String::as_str)
    }
}
