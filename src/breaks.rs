//! Break screen: a random stretch suggestion and the optional auto-start of
//! the next break.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::backend::Backend;
use crate::models::{PomodoroSession, SessionType};
use crate::state::{AppState, Tab};
use crate::timer::TimerController;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BreakActivity {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub how_to: &'static [&'static str],
}

pub static STRETCH_SUGGESTIONS: [BreakActivity; 5] = [
    BreakActivity {
        id: "neck-stretch",
        title: "Neck & Shoulder Release",
        subtitle: "Active Rest",
        description: "Gently tilt your head toward each shoulder for 15 seconds each.",
        how_to: &[
            "Sit upright with your shoulders relaxed.",
            "Gently drop your right ear toward your right shoulder.",
            "Hold for 15-30 seconds, breathing deeply.",
            "Slowly return to center and repeat on the left side.",
            "Don't pull or force your head; let gravity do the work.",
        ],
    },
    BreakActivity {
        id: "eye-rest",
        title: "20-20-20 Rule",
        subtitle: "Visual Care",
        description: "Every 20 minutes, look at something 20 feet away for 20 seconds.",
        how_to: &[
            "Look away from your screen.",
            "Find an object about 20 feet (6 meters) away.",
            "Focus on it for at least 20 seconds.",
            "Blink several times to moisten your eyes.",
            "This helps reduce digital eye strain.",
        ],
    },
    BreakActivity {
        id: "wrist-stretch",
        title: "Wrist & Hand Stretch",
        subtitle: "Ergonomics",
        description: "Stretch your wrists and fingers to prevent repetitive strain.",
        how_to: &[
            "Extend one arm in front of you, palm facing up.",
            "Use your other hand to gently pull your fingers back toward your body.",
            "Hold for 15 seconds.",
            "Flip your hand over (palm facing down) and gently push it down.",
            "Repeat with the other hand.",
        ],
    },
    BreakActivity {
        id: "spinal-twist",
        title: "Seated Spinal Twist",
        subtitle: "Back Health",
        description: "Relieve tension in your lower back with a gentle seated twist.",
        how_to: &[
            "Sit on the edge of your chair with feet flat on the floor.",
            "Place your right hand on the back of the chair and your left hand on your right knee.",
            "Inhale to grow tall, then exhale to gently twist to the right.",
            "Hold for 15-20 seconds, then repeat on the other side.",
            "Ensure you're twisting from your spine, not just moving your neck.",
        ],
    },
    BreakActivity {
        id: "deep-breathing",
        title: "Box Breathing",
        subtitle: "Mental Clarity",
        description: "A simple technique to reset your nervous system and reduce stress.",
        how_to: &[
            "Inhale slowly through your nose for 4 seconds.",
            "Hold your breath for 4 seconds.",
            "Exhale slowly through your mouth for 4 seconds.",
            "Hold your breath for 4 seconds before the next inhale.",
            "Repeat the cycle 3-4 times.",
        ],
    },
];

pub fn random_suggestion() -> &'static BreakActivity {
    suggestion_with(&mut rand::thread_rng())
}

pub fn suggestion_with<R: Rng + ?Sized>(rng: &mut R) -> &'static BreakActivity {
    STRETCH_SUGGESTIONS
        .choose(rng)
        .unwrap_or(&STRETCH_SUGGESTIONS[0])
}

/// Break to (re)start from the break screen: a long break stays long.
pub fn next_break_type(last: SessionType) -> SessionType {
    match last {
        SessionType::LongBreak => SessionType::LongBreak,
        _ => SessionType::ShortBreak,
    }
}

/// Break that follows the `completed_focus`-th focus session of the day.
pub fn break_after_focus(completed_focus: u32, cycles_before_long_break: u32) -> SessionType {
    if cycles_before_long_break > 0
        && completed_focus > 0
        && completed_focus % cycles_before_long_break == 0
    {
        SessionType::LongBreak
    } else {
        SessionType::ShortBreak
    }
}

/// Focus sessions of `sessions` that ran to the end.
pub fn completed_focus_count(sessions: &[PomodoroSession]) -> u32 {
    sessions
        .iter()
        .filter(|session| session.is_focus() && !session.interrupted)
        .count() as u32
}

/// What the break screen shows on entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakScreen {
    pub heading: &'static str,
    pub suggestion: BreakActivity,
    /// Skip is hidden in strict mode.
    pub strict_mode: bool,
    pub auto_started: bool,
    /// Long after every `cycles_before_long_break` completed focus sessions.
    pub suggested_next: SessionType,
}

pub struct BreakFlow {
    backend: Arc<dyn Backend>,
    timer: TimerController,
    state: Arc<AppState>,
    user_id: String,
}

impl BreakFlow {
    pub fn new(
        backend: Arc<dyn Backend>,
        timer: TimerController,
        state: Arc<AppState>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            timer,
            state,
            user_id: user_id.into(),
        }
    }

    /// Opens the break screen, starting the next break when settings ask for
    /// it and nothing is running. Settings failures only cost the auto-start.
    pub async fn enter(&self) -> BreakScreen {
        self.state.set_tab(Tab::Break).await;
        let last = self.timer.status().await.session_type;
        let mut screen = BreakScreen {
            heading: if last == SessionType::LongBreak {
                "Long Break"
            } else {
                "Break Time"
            },
            suggestion: *random_suggestion(),
            strict_mode: false,
            auto_started: false,
            suggested_next: next_break_type(last),
        };

        let settings = match self.backend.get_settings(&self.user_id).await {
            Ok(settings) => settings,
            Err(err) => {
                log_error!("Error loading settings for break: {err}");
                return screen;
            }
        };
        screen.strict_mode = settings.strict_mode;

        match self.backend.get_today_sessions(&self.user_id).await {
            Ok(sessions) => {
                let completed = completed_focus_count(&sessions);
                screen.suggested_next =
                    break_after_focus(completed, settings.cycles_before_long_break);
                log_info!(
                    "{completed} focus sessions today, suggesting {}",
                    screen.suggested_next.as_str()
                );
            }
            Err(err) => log_error!("Error loading today's sessions for break: {err}"),
        }

        if settings.auto_start_breaks && !self.timer.view().await.is_active {
            let next = next_break_type(last);
            log_info!("Auto-starting {}", next.as_str());
            screen.auto_started = self.timer.start(None, next).await.is_some();
        }
        screen
    }

    /// Manual "Start Break" button.
    pub async fn start_break(&self) -> bool {
        let last = self.timer.status().await.session_type;
        self.timer.start(None, next_break_type(last)).await.is_some()
    }

    pub async fn skip(&self) {
        self.timer.stop().await;
        self.state.set_tab(Tab::Timer).await;
    }
}
