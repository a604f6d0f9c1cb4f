//! Session records as reported by the backend.
//!
//! These are read-only on the client: the backend creates, finishes and
//! stores them; the client only aggregates and displays them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Focus => "FOCUS",
            SessionType::ShortBreak => "SHORT_BREAK",
            SessionType::LongBreak => "LONG_BREAK",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Focus)
    }

    /// Timer length used when a status snapshot carries no duration.
    pub fn fallback_minutes(&self) -> u32 {
        match self {
            SessionType::Focus => 25,
            SessionType::ShortBreak | SessionType::LongBreak => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PomodoroSession {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    pub session_type: SessionType,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Absent while the session is still in progress.
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub interrupted: bool,
    #[serde(default)]
    pub interruption_count: u32,
    #[serde(default)]
    pub manual_override: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub task_title: Option<String>,
}

impl PomodoroSession {
    pub fn is_focus(&self) -> bool {
        self.session_type == SessionType::Focus
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Recorded duration, zero for sessions that never finished.
    pub fn recorded_seconds(&self) -> u64 {
        self.duration_seconds.map(u64::from).unwrap_or(0)
    }

    pub fn is_uninterrupted(&self) -> bool {
        self.interruption_count == 0
    }
}

/// Payload of the `start_session` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: String,
    pub task_id: Option<String>,
    pub session_type: SessionType,
}

/// Session logged by hand from the manual entry form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualSession {
    pub task_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_type_uses_backend_spelling() {
        let json = serde_json::to_string(&SessionType::ShortBreak).unwrap();
        assert_eq!(json, "\"SHORT_BREAK\"");
        let parsed: SessionType = serde_json::from_str("\"LONG_BREAK\"").unwrap();
        assert_eq!(parsed, SessionType::LongBreak);
    }

    #[test]
    fn in_progress_session_parses_without_duration() {
        let raw = r#"{
            "id": "s1",
            "user_id": "default_user",
            "session_type": "FOCUS",
            "start_time": "2026-03-02T09:00:00Z",
            "created_at": "2026-03-02T09:00:00Z"
        }"#;
        let session: PomodoroSession = serde_json::from_str(raw).unwrap();
        assert!(session.is_focus());
        assert!(!session.is_completed());
        assert_eq!(session.recorded_seconds(), 0);
        assert!(session.is_uninterrupted());
    }
}
