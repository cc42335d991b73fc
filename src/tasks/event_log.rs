//! Structured logging of engine events

use tracing::{debug, info};

use crate::{engine::TimerEngine, events::EventKind};

/// Subscribe a listener that logs every engine event.
///
/// Ticks are logged at debug level; everything else at info.
pub fn attach_event_logger(engine: &mut TimerEngine) {
    for kind in EventKind::ALL {
        engine.on(kind, move |event| {
            let current = event
                .settings
                .participants
                .get(event.state.current_participant_index)
                .map(String::as_str)
                .unwrap_or("-");
            if kind == EventKind::Tick {
                debug!(kind = kind.as_str(), participant = current, elapsed = event.state.elapsed_time);
            } else {
                info!(
                    kind = kind.as_str(),
                    participant = current,
                    elapsed = event.state.elapsed_time,
                    paused = event.state.is_paused,
                    "Timer event"
                );
            }
        });
    }
}
