//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{DisplayTime, TimerEngine},
    settings::Settings,
    state::TimerState,
};

/// Everything a client needs to render the timer after an action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub running: bool,
    pub current_participant: Option<String>,
    pub display: DisplayTime,
    pub total_time_display: String,
    pub current_participant_time_display: String,
    pub state: TimerState,
}

impl TimerSnapshot {
    pub fn capture(engine: &TimerEngine) -> Self {
        Self {
            running: engine.is_running(),
            current_participant: engine.get_current_participant(),
            display: engine.get_display_time(),
            total_time_display: engine.get_total_time_display(),
            current_participant_time_display: engine.get_current_participant_time_display(),
            state: engine.get_state(),
        }
    }
}

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        let status = if !timer.running {
            "idle"
        } else if timer.state.is_paused {
            "paused"
        } else {
            "running"
        };
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Response for settings reads and updates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: Settings,
    pub time_per_participant: u64,
    pub timestamp: DateTime<Utc>,
}

/// Server status with timer information
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Query for GET /host-match
#[derive(Debug, Clone, Deserialize)]
pub struct HostMatchQuery {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMatchResponse {
    pub url: String,
    pub host_url: String,
    pub matches: bool,
    pub show_timer: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
