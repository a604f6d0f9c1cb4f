use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub estimated_pomodoros: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Task plus the number of focus sessions already logged against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskWithPomodoroCount {
    #[serde(flatten)]
    pub task: Task,
    pub actual_pomodoros: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskUpdate {
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_pomodoros: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TaskTab {
    #[default]
    Todo,
    Done,
}

impl TaskTab {
    pub fn includes(&self, task: &Task) -> bool {
        match self {
            TaskTab::Todo => !task.completed,
            TaskTab::Done => task.completed,
        }
    }
}
