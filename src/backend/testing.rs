//! In-memory backend double used by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::{Backend, BackendResult};
use crate::error::BackendError;
use crate::models::{
    Goal, GoalUpdate, NewGoal, PomodoroSession, PomodoroSettings, SessionType,
    SettingsUpdateRequest, StartSessionRequest, Task, TaskUpdate, TaskWithPomodoroCount,
    TimerStatus,
};

#[derive(Default)]
struct Inner {
    status: TimerStatus,
    settings: Option<PomodoroSettings>,
    tasks: Vec<TaskWithPomodoroCount>,
    goals: Vec<Goal>,
    sessions: Vec<PomodoroSession>,
    failing: HashSet<&'static str>,
    calls: Vec<&'static str>,
    next_id: u32,
    status_delay: Option<std::time::Duration>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    inner: Mutex<Inner>,
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, command: &'static str) {
        self.inner.lock().unwrap().failing.insert(command);
    }

    pub fn recover(&self, command: &'static str) {
        self.inner.lock().unwrap().failing.remove(command);
    }

    pub fn set_status(&self, status: TimerStatus) {
        self.inner.lock().unwrap().status = status;
    }

    pub fn set_remaining(&self, seconds: u32) {
        self.inner.lock().unwrap().status.time_remaining = seconds;
    }

    /// The next `get_timer_status` reads the snapshot now but answers after `delay`.
    pub fn delay_next_status(&self, delay: std::time::Duration) {
        self.inner.lock().unwrap().status_delay = Some(delay);
    }

    pub fn set_settings(&self, settings: PomodoroSettings) {
        self.inner.lock().unwrap().settings = Some(settings);
    }

    pub fn add_session(&self, session: PomodoroSession) {
        self.inner.lock().unwrap().sessions.push(session);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| **call == command)
            .count()
    }

    pub fn task_titles(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.task.title.clone())
            .collect()
    }

    fn enter(&self, command: &'static str) -> BackendResult<std::sync::MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(command);
        if inner.failing.contains(command) {
            return Err(BackendError::command(command, "scripted failure"));
        }
        Ok(inner)
    }
}

fn next_id(inner: &mut Inner, prefix: &str) -> String {
    inner.next_id += 1;
    format!("{prefix}-{}", inner.next_id)
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn start_session(&self, req: StartSessionRequest) -> BackendResult<PomodoroSession> {
        let mut inner = self.enter("start_session")?;
        let minutes = inner
            .settings
            .clone()
            .unwrap_or_else(|| PomodoroSettings::defaults_for(&req.user_id))
            .minutes_for(req.session_type);
        let task_title = req.task_id.as_ref().and_then(|id| {
            inner
                .tasks
                .iter()
                .find(|t| &t.task.id == id)
                .map(|t| t.task.title.clone())
        });
        inner.status = TimerStatus {
            time_remaining: minutes * 60,
            is_running: true,
            is_paused: false,
            session_type: req.session_type,
            task_title: task_title.clone(),
            duration_minutes: minutes,
            interruption_count: 0,
        };
        let id = next_id(&mut inner, "session");
        Ok(PomodoroSession {
            id,
            user_id: req.user_id,
            task_id: req.task_id,
            session_type: req.session_type,
            start_time: fixed_now(),
            end_time: None,
            duration_seconds: None,
            interrupted: false,
            interruption_count: 0,
            manual_override: false,
            created_at: fixed_now(),
            task_title,
        })
    }

    async fn pause_session(&self) -> BackendResult<()> {
        let mut inner = self.enter("pause_session")?;
        if inner.status.is_running {
            inner.status.is_paused = true;
        }
        Ok(())
    }

    async fn resume_session(&self) -> BackendResult<()> {
        let mut inner = self.enter("resume_session")?;
        inner.status.is_paused = false;
        Ok(())
    }

    async fn stop_session(&self) -> BackendResult<()> {
        let mut inner = self.enter("stop_session")?;
        let session_type = inner.status.session_type;
        inner.status = TimerStatus {
            session_type,
            ..TimerStatus::default()
        };
        Ok(())
    }

    async fn get_timer_status(&self) -> BackendResult<TimerStatus> {
        let (status, delay) = {
            let mut inner = self.enter("get_timer_status")?;
            let delay = inner.status_delay.take();
            (inner.status.clone(), delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(status)
    }

    async fn record_interruption(&self) -> BackendResult<u32> {
        let mut inner = self.enter("record_interruption")?;
        inner.status.interruption_count += 1;
        Ok(inner.status.interruption_count)
    }

    async fn get_settings(&self, user_id: &str) -> BackendResult<PomodoroSettings> {
        let inner = self.enter("get_settings")?;
        Ok(inner
            .settings
            .clone()
            .unwrap_or_else(|| PomodoroSettings::defaults_for(user_id)))
    }

    async fn update_settings(&self, req: SettingsUpdateRequest) -> BackendResult<()> {
        let mut inner = self.enter("update_settings")?;
        let mut settings = inner
            .settings
            .clone()
            .unwrap_or_else(|| PomodoroSettings::defaults_for(&req.user_id));
        if let Some(v) = req.focus_minutes {
            settings.focus_minutes = v;
        }
        if let Some(v) = req.short_break_minutes {
            settings.short_break_minutes = v;
        }
        if let Some(v) = req.long_break_minutes {
            settings.long_break_minutes = v;
        }
        if let Some(v) = req.cycles_before_long_break {
            settings.cycles_before_long_break = v;
        }
        if let Some(v) = req.strict_mode {
            settings.strict_mode = v;
        }
        if let Some(v) = req.auto_start_breaks {
            settings.auto_start_breaks = v;
        }
        if let Some(v) = req.sound_enabled {
            settings.sound_enabled = v;
        }
        if let Some(v) = req.sound_volume {
            settings.sound_volume = v;
        }
        inner.settings = Some(settings);
        Ok(())
    }

    async fn create_task(
        &self,
        user_id: &str,
        title: &str,
        estimated_pomodoros: Option<u32>,
    ) -> BackendResult<Task> {
        let mut inner = self.enter("create_task")?;
        let id = next_id(&mut inner, "task");
        let task = Task {
            id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            estimated_pomodoros: estimated_pomodoros.unwrap_or(1),
            completed: false,
            created_at: fixed_now(),
        };
        inner.tasks.push(TaskWithPomodoroCount {
            task: task.clone(),
            actual_pomodoros: 0,
        });
        Ok(task)
    }

    async fn get_tasks(&self, _user_id: &str) -> BackendResult<Vec<Task>> {
        let inner = self.enter("get_tasks")?;
        Ok(inner.tasks.iter().map(|t| t.task.clone()).collect())
    }

    async fn get_tasks_with_pomodoro_counts(
        &self,
        _user_id: &str,
    ) -> BackendResult<Vec<TaskWithPomodoroCount>> {
        let inner = self.enter("get_tasks_with_pomodoro_counts")?;
        Ok(inner.tasks.clone())
    }

    async fn update_task(&self, update: TaskUpdate) -> BackendResult<Task> {
        let mut inner = self.enter("update_task")?;
        let entry = inner
            .tasks
            .iter_mut()
            .find(|t| t.task.id == update.task_id)
            .ok_or_else(|| BackendError::command("update_task", "task not found"))?;
        if let Some(title) = update.title {
            entry.task.title = title;
        }
        if let Some(estimate) = update.estimated_pomodoros {
            entry.task.estimated_pomodoros = estimate;
        }
        if let Some(completed) = update.completed {
            entry.task.completed = completed;
        }
        Ok(entry.task.clone())
    }

    async fn delete_task(&self, task_id: &str) -> BackendResult<()> {
        let mut inner = self.enter("delete_task")?;
        inner.tasks.retain(|t| t.task.id != task_id);
        Ok(())
    }

    async fn get_sessions(&self, _user_id: &str) -> BackendResult<Vec<PomodoroSession>> {
        let inner = self.enter("get_sessions")?;
        Ok(inner.sessions.clone())
    }

    async fn get_today_sessions(&self, _user_id: &str) -> BackendResult<Vec<PomodoroSession>> {
        let inner = self.enter("get_today_sessions")?;
        Ok(inner.sessions.clone())
    }

    async fn get_sessions_by_date_range(
        &self,
        _user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        session_type: Option<SessionType>,
    ) -> BackendResult<Vec<PomodoroSession>> {
        let inner = self.enter("get_sessions_by_date_range")?;
        Ok(inner
            .sessions
            .iter()
            .filter(|s| s.start_time >= start && s.start_time <= end)
            .filter(|s| session_type.map_or(true, |t| s.session_type == t))
            .cloned()
            .collect())
    }

    async fn create_goal(&self, goal: NewGoal) -> BackendResult<Goal> {
        let mut inner = self.enter("create_goal")?;
        let id = next_id(&mut inner, "goal");
        let created = Goal {
            id,
            user_id: goal.user_id,
            title: goal.title,
            target_pomodoros: goal.target_pomodoros,
            completed_pomodoros: 0,
            completed: false,
            category: goal.category,
            motivation: goal.motivation,
            target_date: goal.target_date.map(|d| d.to_string()),
            description: goal.description,
            created_at: fixed_now(),
        };
        inner.goals.push(created.clone());
        Ok(created)
    }

    async fn get_goals(&self, _user_id: &str) -> BackendResult<Vec<Goal>> {
        let inner = self.enter("get_goals")?;
        Ok(inner.goals.clone())
    }

    async fn update_goal(&self, update: GoalUpdate) -> BackendResult<()> {
        let mut inner = self.enter("update_goal")?;
        let goal = inner
            .goals
            .iter_mut()
            .find(|g| g.id == update.goal_id)
            .ok_or_else(|| BackendError::command("update_goal", "goal not found"))?;
        if let Some(title) = update.title {
            goal.title = title;
        }
        if let Some(target) = update.target_pomodoros {
            goal.target_pomodoros = target;
        }
        if let Some(completed) = update.completed {
            goal.completed = completed;
        }
        if update.category.is_some() {
            goal.category = update.category;
        }
        if update.motivation.is_some() {
            goal.motivation = update.motivation;
        }
        if update.target_date.is_some() {
            goal.target_date = update.target_date;
        }
        if update.description.is_some() {
            goal.description = update.description;
        }
        Ok(())
    }

    async fn delete_goal(&self, goal_id: &str) -> BackendResult<()> {
        let mut inner = self.enter("delete_goal")?;
        inner.goals.retain(|g| g.id != goal_id);
        Ok(())
    }
}
