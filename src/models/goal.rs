use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_pomodoros: u32,
    pub completed_pomodoros: u32,
    pub completed: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Completion percentage, capped at 100.
    pub fn progress_percent(&self) -> u32 {
        if self.target_pomodoros == 0 {
            return 0;
        }
        let raw = u64::from(self.completed_pomodoros) * 100 / u64::from(self.target_pomodoros);
        raw.min(100) as u32
    }

    pub fn is_achieved(&self) -> bool {
        self.completed || self.progress_percent() >= 100
    }

    /// Focused hours, counting each pomodoro as 25 minutes.
    pub fn focused_hours(&self) -> u32 {
        (f64::from(self.completed_pomodoros) * 25.0 / 60.0).round() as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGoal {
    pub user_id: String,
    pub title: String,
    pub target_pomodoros: u32,
    pub category: Option<String>,
    pub motivation: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoalUpdate {
    pub goal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_pomodoros: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum GoalView {
    #[default]
    List,
    Create,
    Details,
    Edit,
}
