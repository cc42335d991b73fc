//! Standup Timer - a rotating multi-participant meeting timer
//! 
//! The core is [`engine::TimerEngine`]: it owns the runtime state, computes
//! elapsed and remaining time from wall-clock timestamps, rotates between
//! participants, keeps per-participant totals consistent across pauses and
//! rotations, and notifies observers. Around it sit a settings store contract,
//! a clock abstraction, and an HTTP control surface used by the binary.

pub mod api;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod settings;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use engine::{DisplayTime, ParticipantSummary, TimerEngine};
pub use events::{EventKind, ListenerId, TimerEvent};
pub use settings::{Settings, SettingsPatch, TimerMode};
pub use state::{AppState, TimerState};
pub use storage::{JsonFileStore, MemoryStore, SettingsStore, StorageError};
pub use api::create_router;
pub use utils::{format_time, matches_host, shutdown_signal};
