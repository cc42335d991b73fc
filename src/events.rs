//! Synchronous event bus notifying observers of timer state transitions

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::{settings::Settings, state::TimerState};

/// Kinds of notifications the engine emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Tick,
    ParticipantChanged,
    Paused,
    Resumed,
    Reset,
    TimeUp,
    SettingsChanged,
    StateChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Tick,
        EventKind::ParticipantChanged,
        EventKind::Paused,
        EventKind::Resumed,
        EventKind::Reset,
        EventKind::TimeUp,
        EventKind::SettingsChanged,
        EventKind::StateChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Tick => "tick",
            EventKind::ParticipantChanged => "participantChanged",
            EventKind::Paused => "paused",
            EventKind::Resumed => "resumed",
            EventKind::Reset => "reset",
            EventKind::TimeUp => "timeUp",
            EventKind::SettingsChanged => "settingsChanged",
            EventKind::StateChanged => "stateChanged",
        }
    }
}

/// Snapshot delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub state: TimerState,
    pub settings: Settings,
}

/// Token returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&TimerEvent) + Send>;

/// Observer lists keyed by event kind.
///
/// Listeners run synchronously, in subscription order, on the thread that
/// emitted. They receive clones and cannot reach back into the engine.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one kind of event
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `true` if it was subscribed to `kind`.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver a snapshot of `state` and `settings` to every listener of `kind`
    pub fn emit(&mut self, kind: EventKind, state: &TimerState, settings: &Settings) {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return;
        };
        if listeners.is_empty() {
            return;
        }
        let event = TimerEvent {
            kind,
            state: state.clone(),
            settings: settings.clone(),
        };
        for (_, listener) in listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (kind.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(bus: &mut EventBus, kind: EventKind) -> (ListenerId, Arc<Mutex<Vec<EventKind>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = bus.on(kind, move |event| sink.lock().unwrap().push(event.kind));
        (id, seen)
    }

    #[test]
    fn emit_reaches_only_matching_kind() {
        let mut bus = EventBus::new();
        let (_, ticks) = recorder(&mut bus, EventKind::Tick);
        let (_, resets) = recorder(&mut bus, EventKind::Reset);

        bus.emit(EventKind::Tick, &TimerState::default(), &Settings::default());
        bus.emit(EventKind::Tick, &TimerState::default(), &Settings::default());

        assert_eq!(ticks.lock().unwrap().len(), 2);
        assert!(resets.lock().unwrap().is_empty());
    }

    #[test]
    fn off_removes_listener() {
        let mut bus = EventBus::new();
        let (id, seen) = recorder(&mut bus, EventKind::Paused);

        assert!(bus.off(EventKind::Paused, id));
        assert!(!bus.off(EventKind::Paused, id));
        assert!(!bus.off(EventKind::Resumed, id));

        bus.emit(EventKind::Paused, &TimerState::default(), &Settings::default());
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.listener_count(EventKind::Paused), 0);
    }

    #[test]
    fn listeners_get_independent_snapshots() {
        let mut bus = EventBus::new();
        let captured = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&captured);
        bus.on(EventKind::StateChanged, move |event| {
            *sink.lock().unwrap() = Some(event.state.clone());
        });

        let mut state = TimerState::seeded(&["A"]);
        bus.emit(EventKind::StateChanged, &state, &Settings::default());
        state.elapsed_time = 99;

        let snapshot = captured.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.elapsed_time, 0);
    }

    #[test]
    fn event_kind_names_match_wire_format() {
        for kind in EventKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
    }
}
