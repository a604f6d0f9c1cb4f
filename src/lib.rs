//! Client core of the Timebox Pomodoro app.
//!
//! The backend owns persistence and the running timer; this crate mirrors
//! it for display, aggregates session history into the focus heatmap and
//! runs the client-only pieces (stopwatch, preferences, close guard).

pub mod analytics;
pub mod backend;
pub mod breaks;
pub mod config;
pub mod error;
pub mod events;
pub mod goals;
pub mod history;
pub mod models;
pub mod settings;
pub mod state;
pub mod stopwatch;
pub mod store;
pub mod tasks;
pub mod timer;
pub mod utils;
pub mod window;

use std::sync::Arc;

use anyhow::Result;

pub use analytics::{AnalyticsService, HeatmapData, TimePeriod};
pub use backend::Backend;
pub use config::ClientConfig;
pub use error::{BackendError, ClientError, ClientResult};
pub use events::{AppEvent, EventBus, Toast, ToastLevel};
pub use state::{AppState, DailyStats, Tab, Theme};
pub use timer::{TimerController, TimerPhase, TimerView};
pub use utils::init_logging;
pub use window::{CloseDecision, WindowChrome, WindowGuard};

use breaks::BreakFlow;
use goals::GoalService;
use history::HistoryService;
use models::{PomodoroSession, SessionType};
use settings::SettingsService;
use stopwatch::{system_clock, Stopwatch};
use store::LocalStore;
use tasks::TaskService;

const ENABLE_LOGS: bool = true;

/// Every service of one running client, sharing one backend, one event bus
/// and one `AppState`.
pub struct App {
    pub config: ClientConfig,
    pub events: EventBus,
    pub state: Arc<AppState>,
    pub store: Arc<LocalStore>,
    pub timer: TimerController,
    pub stopwatch: Stopwatch,
    pub tasks: TaskService,
    pub goals: GoalService,
    pub settings: SettingsService,
    pub history: HistoryService,
    pub analytics: AnalyticsService,
    pub breaks: BreakFlow,
    pub window: WindowGuard,
}

impl App {
    pub async fn start(
        config: ClientConfig,
        backend: Arc<dyn Backend>,
        chrome: Arc<dyn WindowChrome>,
    ) -> Result<Self> {
        log_info!("Timebox client starting for {}", config.user_id);

        utils::dir::create_state_dir(&config.data_dir)?;
        let store = Arc::new(LocalStore::open(config.preferences_path())?);
        let events = EventBus::new();
        let state = Arc::new(AppState::new(store.theme()));
        let user_id = config.user_id.clone();

        let timer = TimerController::new(
            backend.clone(),
            events.clone(),
            user_id.clone(),
            config.poll_interval,
        );
        let stopwatch = Stopwatch::restore(
            store.clone(),
            events.clone(),
            config.stopwatch_tick,
            system_clock(),
        )
        .await;

        let app = Self {
            tasks: TaskService::new(
                backend.clone(),
                events.clone(),
                state.clone(),
                user_id.clone(),
            ),
            goals: GoalService::new(
                backend.clone(),
                events.clone(),
                state.clone(),
                user_id.clone(),
            ),
            settings: SettingsService::new(backend.clone(), events.clone(), user_id.clone()),
            history: HistoryService::new(
                backend.clone(),
                events.clone(),
                state.clone(),
                user_id.clone(),
            ),
            analytics: AnalyticsService::new(backend.clone(), events.clone(), user_id.clone()),
            breaks: BreakFlow::new(backend, timer.clone(), state.clone(), user_id),
            window: WindowGuard::new(chrome),
            config,
            events,
            state,
            store,
            timer,
            stopwatch,
        };

        // Pick up a session that was already running.
        app.timer.refresh().await;
        app.tasks.fetch().await;
        Ok(app)
    }

    /// Starts a focus session for the selected task.
    pub async fn start_focus(&self, without_task: bool) -> ClientResult<Option<PomodoroSession>> {
        let selected = self.state.selected_task().await;
        let has_tasks = !self.state.tasks().await.items.is_empty();
        self.timer
            .start_for_selection(selected, has_tasks, without_task, SessionType::Focus)
            .await
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = self.state.theme().await.toggled();
        self.state.set_theme(theme).await;
        if let Err(err) = self.store.set_theme(theme) {
            log_warn!("Failed to persist theme: {err:#}");
        }
        theme
    }

    pub async fn refresh_daily_stats(&self) -> DailyStats {
        let today = self.analytics.today().await;
        let daily_goal = self.state.daily_stats().await.daily_goal;
        let stats = DailyStats::from_today(&today.stats, daily_goal);
        self.state.set_daily_stats(stats).await;
        stats
    }

    pub async fn shutdown(&self) {
        self.timer.shutdown().await;
        self.stopwatch.shutdown().await;
        log_info!("Timebox client stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{fixed_now, ScriptedBackend};
    use crate::backend::BackendResult;
    use async_trait::async_trait;
    use tempfile::{tempdir, TempDir};

    struct IdleChrome;

    #[async_trait]
    impl WindowChrome for IdleChrome {
        async fn has_active_session(&self) -> BackendResult<bool> {
            Ok(false)
        }
        async fn save_active_session(&self) -> BackendResult<()> {
            Ok(())
        }
        async fn minimize(&self) -> BackendResult<()> {
            Ok(())
        }
        async fn close(&self) -> BackendResult<()> {
            Ok(())
        }
    }

    async fn start(dir: &TempDir, backend: Arc<ScriptedBackend>) -> App {
        let config = ClientConfig {
            data_dir: dir.path().join("state"),
            ..ClientConfig::default()
        };
        App::start(config, backend, Arc::new(IdleChrome)).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn focus_start_respects_task_selection() {
        let dir = tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new());
        let app = start(&dir, backend.clone()).await;

        app.tasks.create("Write", 2).await.unwrap();
        let err = app.start_focus(false).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(backend.call_count("start_session"), 0);

        let task_id = app.state.tasks().await.items[0].task.id.clone();
        app.tasks.select_for_focus(&task_id).await;
        let session = app.start_focus(false).await.unwrap().unwrap();
        assert_eq!(session.task_id.as_deref(), Some(task_id.as_str()));
        assert_eq!(app.timer.view().await.phase, TimerPhase::Running);

        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn theme_persists_across_restarts() {
        let dir = tempdir().unwrap();
        let backend: Arc<ScriptedBackend> = Arc::new(ScriptedBackend::new());
        let app = start(&dir, backend.clone()).await;
        assert!(app.config.data_dir.is_dir());
        assert_eq!(app.toggle_theme().await, Theme::Dark);
        app.shutdown().await;

        let again = start(&dir, backend).await;
        assert_eq!(again.state.theme().await, Theme::Dark);
        assert_eq!(again.window.request_close().await, CloseDecision::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn daily_stats_follow_today_sessions() {
        let dir = tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new());
        for i in 0..2 {
            backend.add_session(PomodoroSession {
                id: format!("s{i}"),
                user_id: "default_user".into(),
                task_id: None,
                session_type: SessionType::Focus,
                start_time: fixed_now(),
                end_time: None,
                duration_seconds: Some(1500),
                interrupted: false,
                interruption_count: 0,
                manual_override: false,
                created_at: fixed_now(),
                task_title: None,
            });
        }
        let app = start(&dir, backend).await;

        let stats = app.refresh_daily_stats().await;
        assert_eq!(stats.completed_pomodoros, 2);
        assert_eq!(stats.total_focus_minutes, 50);
        assert_eq!(stats.focus_score, 25);
        assert_eq!(app.state.daily_stats().await, stats);
    }
}
