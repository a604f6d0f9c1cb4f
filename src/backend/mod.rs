//! Command surface of the Timebox backend.
//!
//! The backend owns persistence and the authoritative timer. The client only
//! ever reaches it through [`Backend`]; the transport behind the trait is not
//! this crate's concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BackendError;
use crate::models::{
    Goal, GoalUpdate, NewGoal, PomodoroSession, PomodoroSettings, SessionType,
    SettingsUpdateRequest, StartSessionRequest, Task, TaskUpdate, TaskWithPomodoroCount,
    TimerStatus,
};

#[cfg(test)]
pub mod testing;

pub type BackendResult<T> = Result<T, BackendError>;

#[async_trait]
pub trait Backend: Send + Sync {
    // Timer
    async fn start_session(&self, req: StartSessionRequest) -> BackendResult<PomodoroSession>;
    async fn pause_session(&self) -> BackendResult<()>;
    async fn resume_session(&self) -> BackendResult<()>;
    async fn stop_session(&self) -> BackendResult<()>;
    async fn get_timer_status(&self) -> BackendResult<TimerStatus>;
    /// Returns the new interruption count of the active session.
    async fn record_interruption(&self) -> BackendResult<u32>;

    // Settings
    async fn get_settings(&self, user_id: &str) -> BackendResult<PomodoroSettings>;
    async fn update_settings(&self, req: SettingsUpdateRequest) -> BackendResult<()>;

    // Tasks
    async fn create_task(
        &self,
        user_id: &str,
        title: &str,
        estimated_pomodoros: Option<u32>,
    ) -> BackendResult<Task>;
    async fn get_tasks(&self, user_id: &str) -> BackendResult<Vec<Task>>;
    async fn get_tasks_with_pomodoro_counts(
        &self,
        user_id: &str,
    ) -> BackendResult<Vec<TaskWithPomodoroCount>>;
    async fn update_task(&self, update: TaskUpdate) -> BackendResult<Task>;
    async fn delete_task(&self, task_id: &str) -> BackendResult<()>;

    // Sessions
    async fn get_sessions(&self, user_id: &str) -> BackendResult<Vec<PomodoroSession>>;
    async fn get_today_sessions(&self, user_id: &str) -> BackendResult<Vec<PomodoroSession>>;
    async fn get_sessions_by_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        session_type: Option<SessionType>,
    ) -> BackendResult<Vec<PomodoroSession>>;

    // Goals
    async fn create_goal(&self, goal: NewGoal) -> BackendResult<Goal>;
    async fn get_goals(&self, user_id: &str) -> BackendResult<Vec<Goal>>;
    async fn update_goal(&self, update: GoalUpdate) -> BackendResult<()>;
    async fn delete_goal(&self, goal_id: &str) -> BackendResult<()>;
}
