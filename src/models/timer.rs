use serde::{Deserialize, Serialize};

use super::SessionType;

/// Authoritative timer snapshot returned by `get_timer_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerStatus {
    /// Seconds left on the running timer.
    pub time_remaining: u32,
    pub is_running: bool,
    pub is_paused: bool,
    pub session_type: SessionType,
    #[serde(default)]
    pub task_title: Option<String>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub interruption_count: u32,
}

impl Default for TimerStatus {
    fn default() -> Self {
        Self {
            time_remaining: 0,
            is_running: false,
            is_paused: false,
            session_type: SessionType::Focus,
            task_title: None,
            duration_minutes: 25,
            interruption_count: 0,
        }
    }
}
