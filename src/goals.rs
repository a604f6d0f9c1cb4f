use std::sync::Arc;

use chrono::NaiveDate;

use crate::backend::Backend;
use crate::error::{BackendError, ClientError, ClientResult};
use crate::events::EventBus;
use crate::models::{Goal, GoalUpdate, GoalView, NewGoal};
use crate::state::AppState;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

/// Contents of the goal form.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub target_pomodoros: u32,
    pub category: Option<String>,
    pub motivation: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            target_pomodoros: 10,
            category: Some("Personal".to_string()),
            motivation: None,
            target_date: None,
            description: None,
        }
    }
}

impl GoalDraft {
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::validation("Goal title cannot be empty"));
        }
        if self.target_pomodoros == 0 {
            return Err(ClientError::validation(
                "Target must be at least one pomodoro",
            ));
        }
        Ok(())
    }

    fn into_new_goal(self, user_id: &str) -> NewGoal {
        NewGoal {
            user_id: user_id.to_string(),
            title: self.title.trim().to_string(),
            target_pomodoros: self.target_pomodoros,
            category: non_empty(self.category),
            motivation: non_empty(self.motivation),
            target_date: self.target_date,
            description: non_empty(self.description),
        }
    }

    fn into_update(self, goal_id: &str) -> GoalUpdate {
        GoalUpdate {
            goal_id: goal_id.to_string(),
            title: Some(self.title.trim().to_string()),
            target_pomodoros: Some(self.target_pomodoros),
            completed: None,
            category: non_empty(self.category),
            motivation: non_empty(self.motivation),
            target_date: self.target_date.map(|d| d.to_string()),
            description: non_empty(self.description),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct GoalService {
    backend: Arc<dyn Backend>,
    events: EventBus,
    state: Arc<AppState>,
    user_id: String,
}

impl GoalService {
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

    pub async fn fetch(&self) -> bool {
        self.state.set_goals_loading(true).await;
        let ok = match self.backend.get_goals(&self.user_id).await {
            Ok(goals) => {
                self.state.replace_goals(goals).await;
                true
            }
            Err(err) => {
                log_error!("Error fetching goals: {err}");
                false
            }
        };
        self.state.set_goals_loading(false).await;
        ok
    }

    /// Goal currently open in the details or edit view, if it still exists.
    pub async fn selected(&self) -> Option<Goal> {
        let goals = self.state.goals().await;
        let id = goals.selected?;
        goals.items.into_iter().find(|g| g.id == id)
    }

    pub async fn show_list(&self) {
        self.state.show_goal_view(GoalView::List, None).await;
    }

    pub async fn show_create(&self) {
        self.state.show_goal_view(GoalView::Create, None).await;
    }

    pub async fn show_details(&self, goal_id: &str) {
        self.state
            .show_goal_view(GoalView::Details, Some(goal_id.to_string()))
            .await;
    }

    pub async fn show_edit(&self, goal_id: &str) {
        self.state
            .show_goal_view(GoalView::Edit, Some(goal_id.to_string()))
            .await;
    }

    pub async fn create(&self, draft: GoalDraft) -> ClientResult<Option<Goal>> {
        self.check(draft.validate())?;

        match self
            .backend
            .create_goal(draft.into_new_goal(&self.user_id))
            .await
        {
            Ok(goal) => {
                log_info!("Created goal {}", goal.id);
                self.events.success("Goal created successfully");
                self.fetch().await;
                self.show_list().await;
                Ok(Some(goal))
            }
            Err(err) => {
                self.report("Error creating goal", "Failed to create goal", &err);
                Ok(None)
            }
        }
    }

    pub async fn update(&self, goal_id: &str, draft: GoalDraft) -> ClientResult<bool> {
        self.check(draft.validate())?;

        match self.backend.update_goal(draft.into_update(goal_id)).await {
            Ok(()) => {
                self.events.success("Goal updated");
                self.fetch().await;
                self.show_details(goal_id).await;
                Ok(true)
            }
            Err(err) => {
                self.report("Error updating goal", "Failed to update goal", &err);
                Ok(false)
            }
        }
    }

    pub async fn delete(&self, goal_id: &str) -> bool {
        match self.backend.delete_goal(goal_id).await {
            Ok(()) => {
                self.events.success("Goal deleted");
                self.fetch().await;
                self.show_list().await;
                true
            }
            Err(err) => {
                self.report("Error deleting goal", "Failed to delete goal", &err);
                false
            }
        }
    }

    fn check(&self, result: ClientResult<()>) -> ClientResult<()> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::events::{drain, toasts, ToastLevel};

    fn service(backend: &Arc<ScriptedBackend>) -> (GoalService, Arc<AppState>, EventBus) {
        let events = EventBus::new();
        let state = Arc::new(AppState::default());
        let service =
            GoalService::new(backend.clone(), events.clone(), state.clone(), "default_user");
        (service, state, events)
    }

    fn draft(title: &str, target: u32) -> GoalDraft {
        GoalDraft {
            title: title.to_string(),
            target_pomodoros: target,
            ..GoalDraft::default()
        }
    }

    #[tokio::test]
    async fn create_returns_to_list_with_fresh_goals() {
        let backend = Arc::new(ScriptedBackend::new());
        let (service, state, _) = service(&backend);
        service.show_create().await;

        let mut form = draft(" Learn Rust ", 40);
        form.motivation = Some("   ".to_string());
        form.target_date = NaiveDate::from_ymd_opt(2026, 6, 30);
        let goal = service.create(form).await.unwrap().unwrap();

        assert_eq!(goal.title, "Learn Rust");
        assert_eq!(goal.category.as_deref(), Some("Personal"));
        assert_eq!(goal.motivation, None);
        assert_eq!(goal.target_date.as_deref(), Some("2026-06-30"));

        let goals = state.goals().await;
        assert_eq!(goals.view, GoalView::List);
        assert_eq!(goals.items.len(), 1);
        assert!(!goals.loading);
    }

    #[tokio::test]
    async fn invalid_drafts_are_rejected_locally() {
        let backend = Arc::new(ScriptedBackend::new());
        let (service, _, events) = service(&backend);
        let mut rx = events.subscribe();

        assert!(service.create(draft("", 10)).await.unwrap_err().is_validation());
        assert!(service.create(draft("Read", 0)).await.unwrap_err().is_validation());
        assert!(service.update("g1", draft(" ", 3)).await.is_err());
        assert!(backend.calls().is_empty());
        assert_eq!(toasts(&drain(&mut rx)).len(), 3);
    }

    #[tokio::test]
    async fn update_and_delete_move_between_views() {
        let backend = Arc::new(ScriptedBackend::new());
        let (service, state, _) = service(&backend);
        let goal = service.create(draft("Write", 5)).await.unwrap().unwrap();

        service.show_edit(&goal.id).await;
        assert!(service.update(&goal.id, draft("Write book", 50)).await.unwrap());
        let goals = state.goals().await;
        assert_eq!(goals.view, GoalView::Details);
        let selected = service.selected().await.unwrap();
        assert_eq!(selected.title, "Write book");
        assert_eq!(selected.target_pomodoros, 50);

        assert!(service.delete(&goal.id).await);
        assert_eq!(state.goals().await.view, GoalView::List);
        assert!(service.selected().await.is_none());
    }

    #[tokio::test]
    async fn failed_delete_stays_on_details() {
        let backend = Arc::new(ScriptedBackend::new());
        let (service, state, events) = service(&backend);
        let goal = service.create(draft("Keep", 5)).await.unwrap().unwrap();
        service.show_details(&goal.id).await;
        let mut rx = events.subscribe();

        backend.fail("delete_goal");
        assert!(!service.delete(&goal.id).await);
        assert_eq!(state.goals().await.view, GoalView::Details);

        let toasts = toasts(&drain(&mut rx));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
        assert_eq!(toasts[0].message, "Failed to delete goal");
    }
}
