use serde::{Deserialize, Serialize};

use super::SessionType;

fn default_sound_enabled() -> bool {
    true
}

fn default_sound_volume() -> f32 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PomodoroSettings {
    pub user_id: String,
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub cycles_before_long_break: u32,
    pub strict_mode: bool,
    pub auto_start_breaks: bool,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_sound_volume")]
    pub sound_volume: f32,
}

impl PomodoroSettings {
    pub fn defaults_for(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long_break: 4,
            strict_mode: false,
            auto_start_breaks: false,
            sound_enabled: default_sound_enabled(),
            sound_volume: default_sound_volume(),
        }
    }

    pub fn minutes_for(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Focus => self.focus_minutes,
            SessionType::ShortBreak => self.short_break_minutes,
            SessionType::LongBreak => self.long_break_minutes,
        }
    }

    /// Request that overwrites every field with this value.
    pub fn to_update(&self) -> SettingsUpdateRequest {
        SettingsUpdateRequest {
            user_id: self.user_id.clone(),
            focus_minutes: Some(self.focus_minutes),
            short_break_minutes: Some(self.short_break_minutes),
            long_break_minutes: Some(self.long_break_minutes),
            cycles_before_long_break: Some(self.cycles_before_long_break),
            strict_mode: Some(self.strict_mode),
            auto_start_breaks: Some(self.auto_start_breaks),
            sound_enabled: Some(self.sound_enabled),
            sound_volume: Some(self.sound_volume),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsUpdateRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles_before_long_break: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_breaks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_volume: Option<f32>,
}
