use serde::Serialize;

use crate::models::PomodoroSession;

/// Counters for the "today" cards.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_focus_seconds: u64,
    pub completed_focus_sessions: u32,
    pub completed_break_sessions: u32,
    pub interruption_count: u32,
}

impl TodayStats {
    pub fn from_sessions(sessions: &[PomodoroSession]) -> Self {
        sessions.iter().fold(Self::default(), |mut acc, session| {
            if session.is_focus() {
                acc.total_focus_seconds += session.recorded_seconds();
                acc.completed_focus_sessions += 1;
            } else {
                acc.completed_break_sessions += 1;
            }
            acc.interruption_count += session.interruption_count;
            acc
        })
    }
}

/// `Xh Ym`, `Ym Zs` or `Zs`.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
