use serde::{Deserialize, Serialize};

use crate::models::TimerStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerPhase {
    /// Derives the phase from a backend snapshot.
    pub fn of(status: &TimerStatus) -> Self {
        if status.is_running && status.time_remaining == 0 {
            TimerPhase::Completed
        } else if status.is_paused {
            TimerPhase::Paused
        } else if status.is_running {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "Ready to start",
            TimerPhase::Running => "Focusing",
            TimerPhase::Paused => "Paused",
            TimerPhase::Completed => "Completed",
        }
    }
}

/// Everything the timer face renders, recomputed from each snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub phase: TimerPhase,
    pub minutes: u32,
    pub seconds: u32,
    pub is_active: bool,
    pub is_paused: bool,
    pub is_completed: bool,
    pub progress_percent: f64,
    pub status: TimerStatus,
}

impl TimerView {
    pub fn project(status: &TimerStatus, is_completed: bool) -> Self {
        Self {
            phase: TimerPhase::of(status),
            minutes: status.time_remaining / 60,
            seconds: status.time_remaining % 60,
            is_active: status.is_running && !status.is_paused,
            is_paused: status.is_paused,
            is_completed,
            progress_percent: progress_percent(status),
            status: status.clone(),
        }
    }

    /// `MM:SS` as shown on the timer face.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl Default for TimerView {
    fn default() -> Self {
        Self::project(&TimerStatus::default(), false)
    }
}

/// Elapsed share of the session in percent, clamped to `0..=100`.
pub fn progress_percent(status: &TimerStatus) -> f64 {
    let minutes = if status.duration_minutes == 0 {
        status.session_type.fallback_minutes()
    } else {
        status.duration_minutes
    };
    let total = f64::from(minutes * 60);
    let elapsed = total - f64::from(status.time_remaining);
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Next value of the completion latch after observing `status`.
///
/// The latch rises on a running timer at zero and falls once the backend
/// reports a stopped timer with time left; otherwise it holds.
pub fn next_completed(previous: bool, status: &TimerStatus) -> bool {
    if status.is_running && status.time_remaining == 0 {
        true
    } else if !status.is_running && status.time_remaining > 0 {
        false
    } else {
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionType;

    fn status(remaining: u32, running: bool, paused: bool) -> TimerStatus {
        TimerStatus {
            time_remaining: remaining,
            is_running: running,
            is_paused: paused,
            session_type: SessionType::Focus,
            task_title: None,
            duration_minutes: 25,
            interruption_count: 0,
        }
    }

    #[test]
    fn phase_follows_snapshot_flags() {
        assert_eq!(TimerPhase::of(&status(0, false, false)), TimerPhase::Idle);
        assert_eq!(TimerPhase::of(&status(600, true, false)), TimerPhase::Running);
        assert_eq!(TimerPhase::of(&status(600, true, true)), TimerPhase::Paused);
        assert_eq!(TimerPhase::of(&status(0, true, false)), TimerPhase::Completed);
    }

    #[test]
    fn view_splits_remaining_seconds() {
        let view = TimerView::project(&status(1499, true, false), false);
        assert_eq!((view.minutes, view.seconds), (24, 59));
        assert_eq!(view.clock(), "24:59");
        assert!(view.is_active);
        assert!(!view.is_paused);

        let paused = TimerView::project(&status(61, true, true), false);
        assert!(!paused.is_active);
        assert!(paused.is_paused);
    }

    #[test]
    fn progress_is_clamped_and_uses_fallback_length() {
        assert_eq!(progress_percent(&status(1500, true, false)), 0.0);
        assert_eq!(progress_percent(&status(750, true, false)), 50.0);
        assert_eq!(progress_percent(&status(0, true, false)), 100.0);

        let mut over = status(4000, true, false);
        assert_eq!(progress_percent(&over), 0.0);

        over.duration_minutes = 0;
        over.session_type = SessionType::ShortBreak;
        over.time_remaining = 150;
        assert_eq!(progress_percent(&over), 50.0);
    }

    #[test]
    fn completion_latch_rises_holds_and_clears() {
        assert!(next_completed(false, &status(0, true, false)));
        // Holds while the backend still reports the finished timer, or reports idle at zero.
        assert!(next_completed(true, &status(0, true, false)));
        assert!(next_completed(true, &status(0, false, false)));
        // A fresh, not-yet-running session clears it.
        assert!(!next_completed(true, &status(1500, false, false)));
        assert!(!next_completed(false, &status(900, true, false)));
    }
}
