//! Shared UI state.
//!
//! One `AppState` lives behind an `Arc` for the whole session. Each field
//! has its own lock so services never hold one across a backend call.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::analytics::TodayStats;
use crate::models::{Goal, GoalView, TaskWithPomodoroCount};

pub const DEFAULT_DAILY_GOAL: u32 = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Timer,
    Tasks,
    Goals,
    History,
    ManualEntry,
    Analytics,
    Stopwatch,
    Settings,
    Break,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyStats {
    pub completed_pomodoros: u32,
    pub daily_goal: u32,
    pub total_focus_minutes: u64,
    /// Share of the daily goal reached, capped at 100.
    pub focus_score: u32,
}

impl Default for DailyStats {
    fn default() -> Self {
        Self {
            completed_pomodoros: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            total_focus_minutes: 0,
            focus_score: 0,
        }
    }
}

impl DailyStats {
    pub fn from_today(stats: &TodayStats, daily_goal: u32) -> Self {
        let completed = stats.completed_focus_sessions;
        let focus_score = if daily_goal == 0 {
            0
        } else {
            (completed.saturating_mul(100) / daily_goal).min(100)
        };
        Self {
            completed_pomodoros: completed,
            daily_goal,
            total_focus_minutes: stats.total_focus_seconds / 60,
            focus_score,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskList {
    pub items: Vec<TaskWithPomodoroCount>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GoalList {
    pub items: Vec<Goal>,
    pub loading: bool,
    pub view: GoalView,
    pub selected: Option<String>,
}

#[derive(Debug, Default)]
pub struct AppState {
    tab: RwLock<Tab>,
    selected_task: RwLock<Option<String>>,
    tasks: RwLock<TaskList>,
    goals: RwLock<GoalList>,
    daily: RwLock<DailyStats>,
    theme: RwLock<Theme>,
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme: RwLock::new(theme),
            ..Self::default()
        }
    }

    pub async fn tab(&self) -> Tab {
        *self.tab.read().await
    }

    pub async fn set_tab(&self, tab: Tab) {
        *self.tab.write().await = tab;
    }

    pub async fn selected_task(&self) -> Option<String> {
        self.selected_task.read().await.clone()
    }

    /// Picking a task from the task list jumps back to the timer.
    pub async fn select_task(&self, task_id: Option<String>) {
        *self.selected_task.write().await = task_id;
        self.set_tab(Tab::Timer).await;
    }

    pub async fn tasks(&self) -> TaskList {
        self.tasks.read().await.clone()
    }

    pub async fn set_tasks_loading(&self, loading: bool) {
        self.tasks.write().await.loading = loading;
    }

    /// A selected task that disappeared from the list is deselected.
    pub async fn replace_tasks(&self, items: Vec<TaskWithPomodoroCount>) {
        {
            let mut selected = self.selected_task.write().await;
            let gone = selected
                .as_ref()
                .is_some_and(|id| !items.iter().any(|t| &t.task.id == id));
            if gone {
                *selected = None;
            }
        }
        self.tasks.write().await.items = items;
    }

    pub async fn goals(&self) -> GoalList {
        self.goals.read().await.clone()
    }

    pub async fn set_goals_loading(&self, loading: bool) {
        self.goals.write().await.loading = loading;
    }

    pub async fn replace_goals(&self, items: Vec<Goal>) {
        self.goals.write().await.items = items;
    }

    pub async fn show_goal_view(&self, view: GoalView, selected: Option<String>) {
        let mut goals = self.goals.write().await;
        goals.view = view;
        goals.selected = selected;
    }

    pub async fn daily_stats(&self) -> DailyStats {
        *self.daily.read().await
    }

    pub async fn set_daily_stats(&self, stats: DailyStats) {
        *self.daily.write().await = stats;
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.read().await
    }

    pub async fn set_theme(&self, theme: Theme) {
        *self.theme.write().await = theme;
    }
}
