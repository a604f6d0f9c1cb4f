use std::sync::Arc;

use crate::backend::Backend;
use crate::error::{BackendError, ClientError, ClientResult};
use crate::events::EventBus;
use crate::models::{Task, TaskTab, TaskUpdate, TaskWithPomodoroCount};
use crate::state::AppState;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

/// Task list operations. Successful writes refresh the shared list.
#[derive(Clone)]
pub struct TaskService {
    backend: Arc<dyn Backend>,
    events: EventBus,
    state: Arc<AppState>,
    user_id: String,
}

impl TaskService {
    pub fn new(
        backend: Arc<dyn Backend>,
        events: EventBus,
        state: Arc<AppState>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            events,
            state,
            user_id: user_id.into(),
        }
    }

    /// Reloads tasks with their pomodoro counts. The list is left as it was
    /// when the call fails.
    pub async fn fetch(&self) -> bool {
        self.state.set_tasks_loading(true).await;
        let result = self
            .backend
            .get_tasks_with_pomodoro_counts(&self.user_id)
            .await;
        let ok = match result {
            Ok(tasks) => {
                self.state.replace_tasks(tasks).await;
                true
            }
            Err(err) => {
                log_error!("Error fetching tasks: {err}");
                false
            }
        };
        self.state.set_tasks_loading(false).await;
        ok
    }

    pub async fn visible(&self, tab: TaskTab) -> Vec<TaskWithPomodoroCount> {
        self.state
            .tasks()
            .await
            .items
            .into_iter()
            .filter(|t| tab.includes(&t.task))
            .collect()
    }

    pub async fn create(&self, title: &str, estimate: u32) -> ClientResult<Option<Task>> {
        let title = self.check(validate_title(title))?;
        let estimate = self.check(validate_estimate(estimate))?;

        match self
            .backend
            .create_task(&self.user_id, &title, Some(estimate))
            .await
        {
            Ok(task) => {
                log_info!("Created task {}", task.id);
                self.events.success("Task created successfully");
                self.fetch().await;
                Ok(Some(task))
            }
            Err(err) => {
                self.report("Error creating task", "Failed to create task", &err);
                Ok(None)
            }
        }
    }

    pub async fn edit(&self, task_id: &str, title: &str, estimate: u32) -> ClientResult<bool> {
        let title = self.check(validate_title(title))?;
        let estimate = self.check(validate_estimate(estimate))?;

        let update = TaskUpdate {
            task_id: task_id.to_string(),
            title: Some(title),
            estimated_pomodoros: Some(estimate),
            completed: None,
        };
        match self.backend.update_task(update).await {
            Ok(_) => {
                self.events.success("Task updated");
                self.fetch().await;
                Ok(true)
            }
            Err(err) => {
                self.report("Error updating task", "Failed to update task", &err);
                Ok(false)
            }
        }
    }

    /// Flips completion of a task in the current list.
    pub async fn toggle_complete(&self, task_id: &str) -> bool {
        let current = self
            .state
            .tasks()
            .await
            .items
            .iter()
            .find(|t| t.task.id == task_id)
            .map(|t| t.task.completed);
        let Some(completed) = current else {
            log_error!("Cannot toggle unknown task {task_id}");
            return false;
        };

        let done = !completed;
        let update = TaskUpdate {
            task_id: task_id.to_string(),
            completed: Some(done),
            ..TaskUpdate::default()
        };
        match self.backend.update_task(update).await {
            Ok(_) => {
                self.events
                    .success(if done { "Task completed!" } else { "Task reopened" });
                self.fetch().await;
                true
            }
            Err(err) => {
                self.report(
                    "Error toggling task completion",
                    "Failed to update task status",
                    &err,
                );
                false
            }
        }
    }

    pub async fn delete(&self, task_id: &str) -> bool {
        match self.backend.delete_task(task_id).await {
            Ok(()) => {
                self.events.success("Task deleted");
                self.fetch().await;
                true
            }
            Err(err) => {
                self.report("Error deleting task", "Failed to delete task", &err);
                false
            }
        }
    }

    pub async fn select_for_focus(&self, task_id: &str) {
        self.state.select_task(Some(task_id.to_string())).await;
        self.events.info("Task selected for focus");
    }

    fn check<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result {
            self.events.error(err.to_string());
        }
        result
    }

    fn report(&self, context: &str, message: &str, err: &BackendError) {
        log_error!("{context}: {err}");
        self.events.error(message);
    }
}

pub fn validate_title(title: &str) -> ClientResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation("Task title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_estimate(estimate: u32) -> ClientResult<u32> {
    if estimate == 0 {
        return Err(ClientError::validation(
            "Estimate must be at least one pomodoro",
        ));
    }
    Ok(estimate)
}
