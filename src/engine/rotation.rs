//! Moving the active turn between participants

use tracing::info;

use super::TimerEngine;
use crate::events::EventKind;

/// Rotation direction through the participant list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Next index in `direction`, wrapping at both ends. `None` for an empty list.
pub fn rotate_index(index: usize, direction: Direction, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = index % len;
    Some(match direction {
        Direction::Forward => (index + 1) % len,
        Direction::Backward => (index + len - 1) % len,
    })
}

impl TimerEngine {
    /// Hand the turn to the neighbouring participant.
    ///
    /// The outgoing turn is committed before the index moves. The new turn
    /// starts at zero; a paused timer stays paused and the new turn's clock
    /// starts on resume.
    pub fn advance(&mut self, direction: Direction) {
        let Some(next_index) = rotate_index(
            self.state.current_participant_index,
            direction,
            self.settings.participants.len(),
        ) else {
            return;
        };

        let now = self.now();
        self.commit_current_turn(now);

        self.state.current_participant_index = next_index;
        self.state.elapsed_time = 0;
        self.turn_clock.restart(now);

        if self.is_timing() {
            self.start_current_turn(now);
        }

        info!(
            "Turn passed to {} (#{})",
            self.current_name().unwrap_or_default(),
            next_index
        );
        self.emit(EventKind::ParticipantChanged);
    }
}
