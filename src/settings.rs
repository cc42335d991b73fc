//! Timer settings, partial updates and the validation boundary

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys persisted in the settings store
pub const STORAGE_KEYS: [&str; 5] = ["participants", "totalTime", "timerMode", "hostUrl", "showTimer"];

/// Whether the display counts down from the allocation or up from zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Countdown,
    Countup,
}

/// Timer configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Participant names in rotation order; duplicates are allowed
    pub participants: Vec<String>,
    /// Total meeting budget in minutes
    pub total_time: f64,
    pub timer_mode: TimerMode,
    /// Host the timer is shown on; opaque to the engine
    pub host_url: String,
    /// Visibility flag; opaque to the engine
    pub show_timer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            participants: Vec::new(),
            total_time: 15.0,
            timer_mode: TimerMode::Countdown,
            host_url: "linear.app".to_string(),
            show_timer: true,
        }
    }
}

impl Settings {
    /// Return a copy with every field present in `patch` overwritten
    pub fn apply(&self, patch: &SettingsPatch) -> Self {
        let mut next = self.clone();
        if let Some(participants) = &patch.participants {
            next.participants = participants.clone();
        }
        if let Some(total_time) = patch.total_time {
            next.total_time = total_time;
        }
        if let Some(timer_mode) = patch.timer_mode {
            next.timer_mode = timer_mode;
        }
        if let Some(host_url) = &patch.host_url {
            next.host_url = host_url.clone();
        }
        if let Some(show_timer) = patch.show_timer {
            next.show_timer = show_timer;
        }
        next
    }
}

/// Partial settings update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_mode: Option<TimerMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_timer: Option<bool>,
}

/// Rejections raised before a patch reaches the engine
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("total time must be a positive number of minutes, got {0}")]
    NonPositiveTotalTime(f64),
    #[error("participant at position {0} has an empty name")]
    EmptyParticipantName(usize),
}

impl SettingsPatch {
    /// Validate and normalize a patch coming from a user-facing surface.
    ///
    /// Participant names are trimmed. The engine does not call this; it trusts
    /// whatever its caller hands it.
    pub fn validate(mut self) -> Result<Self, SettingsError> {
        if let Some(total_time) = self.total_time {
            if !(total_time.is_finite() && total_time > 0.0) {
                return Err(SettingsError::NonPositiveTotalTime(total_time));
            }
        }
        if let Some(participants) = self.participants.as_mut() {
            for (position, name) in participants.iter_mut().enumerate() {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(SettingsError::EmptyParticipantName(position));
                }
                *name = trimmed.to_string();
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_values() {
        let settings = Settings::default();
        assert!(settings.participants.is_empty());
        assert_eq!(settings.total_time, 15.0);
        assert_eq!(settings.timer_mode, TimerMode::Countdown);
        assert_eq!(settings.host_url, "linear.app");
        assert!(settings.show_timer);
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let base = Settings::default();
        let patch = SettingsPatch {
            participants: Some(vec!["A".into(), "B".into()]),
            timer_mode: Some(TimerMode::Countup),
            ..Default::default()
        };

        let next = base.apply(&patch);
        assert_eq!(next.participants, vec!["A", "B"]);
        assert_eq!(next.timer_mode, TimerMode::Countup);
        assert_eq!(next.total_time, base.total_time);
        assert_eq!(next.host_url, base.host_url);
    }

    #[test]
    fn serializes_with_storage_key_names() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        for key in STORAGE_KEYS {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["timerMode"], "countdown");
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = SettingsPatch {
            total_time: Some(2.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "totalTime": 2.0 }));
    }

    #[test]
    fn validate_trims_names_and_rejects_bad_input() {
        let patch = SettingsPatch {
            participants: Some(vec!["  Ann ".into(), "Bo".into()]),
            ..Default::default()
        };
        let patch = patch.validate().unwrap();
        assert_eq!(patch.participants.unwrap(), vec!["Ann", "Bo"]);

        let blank = SettingsPatch {
            participants: Some(vec!["Ann".into(), "   ".into()]),
            ..Default::default()
        };
        assert_eq!(blank.validate(), Err(SettingsError::EmptyParticipantName(1)));

        let zero = SettingsPatch {
            total_time: Some(0.0),
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(SettingsError::NonPositiveTotalTime(0.0)));
    }
}
