use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    backend::Backend,
    error::{BackendError, ClientError, ClientResult},
    events::{AppEvent, EventBus},
    models::{PomodoroSession, SessionType, StartSessionRequest, TimerStatus},
};

use super::state::{next_completed, TimerView};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// Last good snapshot plus the completion latch derived from it.
#[derive(Debug, Clone, Default)]
struct SyncedTimer {
    status: TimerStatus,
    completed: bool,
    /// Bumped by every accepted mutation; polls started before it are stale.
    generation: u64,
}

struct Poller {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Mirrors the backend timer for display.
///
/// Every mutation goes to the backend first and is followed by a fresh
/// `get_timer_status`; the local copy is never advanced on its own. While the
/// backend reports a running timer a single poller re-fetches the snapshot
/// once per `poll_interval`.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<SyncedTimer>>,
    backend: Arc<dyn Backend>,
    events: EventBus,
    poller: Arc<Mutex<Option<Poller>>>,
    poll_interval: Duration,
    user_id: String,
}

impl TimerController {
    pub fn new(
        backend: Arc<dyn Backend>,
        events: EventBus,
        user_id: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SyncedTimer::default())),
            backend,
            events,
            poller: Arc::new(Mutex::new(None)),
            poll_interval,
            user_id: user_id.into(),
        }
    }

    pub async fn status(&self) -> TimerStatus {
        self.state.lock().await.status.clone()
    }

    pub async fn view(&self) -> TimerView {
        let guard = self.state.lock().await;
        TimerView::project(&guard.status, guard.completed)
    }

    pub async fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .map(|poller| !poller.handle.is_finished())
            .unwrap_or(false)
    }

    /// Re-fetches the snapshot. On failure the last good snapshot is kept.
    pub async fn refresh(&self) -> bool {
        match self.backend.get_timer_status().await {
            Ok(status) => {
                self.apply_status(status, None).await;
                true
            }
            Err(err) => {
                log_error!("Error getting timer status: {err}");
                false
            }
        }
    }

    pub async fn start(
        &self,
        task_id: Option<String>,
        session_type: SessionType,
    ) -> Option<PomodoroSession> {
        let request = StartSessionRequest {
            user_id: self.user_id.clone(),
            task_id,
            session_type,
        };

        match self.backend.start_session(request).await {
            Ok(session) => {
                log_info!(
                    "Started {} session {}",
                    session.session_type.as_str(),
                    session.id
                );
                self.begin_mutation().await;
                self.refresh().await;
                self.events.success("Timer Started");
                Some(session)
            }
            Err(err) => {
                self.report_failure("start", &err);
                None
            }
        }
    }

    /// Starts a focus timer for the current task selection.
    ///
    /// When tasks exist, starting without one requires `without_task`; the
    /// user is asked to pick instead and no command is sent.
    pub async fn start_for_selection(
        &self,
        selected_task: Option<String>,
        has_tasks: bool,
        without_task: bool,
        session_type: SessionType,
    ) -> ClientResult<Option<PomodoroSession>> {
        if selected_task.is_none() && has_tasks && !without_task {
            let message = "Please select a task to start or choose \"No Task\"";
            self.events.info(message);
            return Err(ClientError::validation(message));
        }
        Ok(self.start(selected_task, session_type).await)
    }

    pub async fn pause(&self) -> bool {
        let result = self.backend.pause_session().await;
        self.after_mutation("pause", "Timer Paused", result).await
    }

    pub async fn resume(&self) -> bool {
        let result = self.backend.resume_session().await;
        self.after_mutation("resume", "Timer Resumed", result).await
    }

    pub async fn stop(&self) -> bool {
        match self.backend.stop_session().await {
            Ok(()) => {
                self.begin_mutation().await;
                self.refresh().await;
                self.events.info("Timer Stopped");
                true
            }
            Err(err) => {
                self.report_failure("stop", &err);
                false
            }
        }
    }

    /// Returns the new interruption count, or `None` when the call failed.
    pub async fn record_interruption(&self) -> Option<u32> {
        match self.backend.record_interruption().await {
            Ok(count) => {
                let view = {
                    let mut guard = self.state.lock().await;
                    guard.status.interruption_count = count;
                    TimerView::project(&guard.status, guard.completed)
                };
                self.events.emit(AppEvent::TimerStateChanged(view));
                Some(count)
            }
            Err(err) => {
                log_error!("Error recording interruption: {err}");
                self.events.error("Failed to record interruption");
                None
            }
        }
    }

    pub async fn dismiss_completion(&self) {
        let view = {
            let mut guard = self.state.lock().await;
            guard.completed = false;
            TimerView::project(&guard.status, guard.completed)
        };
        self.events.emit(AppEvent::TimerStateChanged(view));
    }

    /// Stops the poller and waits for it to exit.
    pub async fn shutdown(&self) {
        let poller = self.poller.lock().await.take();
        if let Some(poller) = poller {
            poller.cancel_token.cancel();
            if let Err(err) = poller.handle.await {
                log_error!("Timer poller failed to join: {err}");
            }
        }
    }

    async fn after_mutation(
        &self,
        action: &str,
        success_message: &str,
        result: Result<(), BackendError>,
    ) -> bool {
        match result {
            Ok(()) => {
                self.state.lock().await.generation += 1;
                self.refresh().await;
                self.events.info(success_message);
                true
            }
            Err(err) => {
                self.report_failure(action, &err);
                false
            }
        }
    }

    /// Clears the completion latch and invalidates polls already in flight.
    async fn begin_mutation(&self) {
        let mut guard = self.state.lock().await;
        guard.completed = false;
        guard.generation += 1;
    }

    async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    fn report_failure(&self, action: &str, err: &BackendError) {
        log_error!("Timer {action} failed: {err}");
        self.events.error(format!("Failed to {action} timer"));
    }

    /// Applies `status` unless it was fetched before a later mutation, in
    /// which case nothing changes and `false` is returned.
    async fn apply_status(&self, status: TimerStatus, fetched_at: Option<u64>) -> bool {
        let is_running = status.is_running;
        let (view, became_completed) = {
            let mut guard = self.state.lock().await;
            if fetched_at.is_some_and(|generation| generation != guard.generation) {
                return false;
            }
            let completed = next_completed(guard.completed, &status);
            let became_completed = completed && !guard.completed;
            guard.status = status;
            guard.completed = completed;
            (TimerView::project(&guard.status, completed), became_completed)
        };

        self.events.emit(AppEvent::TimerStateChanged(view));
        if became_completed {
            log_info!("Timer completed");
            self.events.emit(AppEvent::TimerCompleted);
            self.events.success("Timer Completed! Take a break.");
        }

        self.sync_poller(is_running).await;
        true
    }

    /// Keeps exactly one poller alive while the backend reports a running timer.
    async fn sync_poller(&self, is_running: bool) {
        let mut guard = self.poller.lock().await;

        if !is_running {
            if let Some(poller) = guard.take() {
                // May be called from the poller itself, so don't join here.
                poller.cancel_token.cancel();
                log_debug!("Timer poller stopped");
            }
            return;
        }

        if let Some(poller) = guard.as_ref() {
            if !poller.handle.is_finished() && !poller.cancel_token.is_cancelled() {
                return;
            }
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(self.clone(), cancel_token.clone()));
        *guard = Some(Poller {
            handle,
            cancel_token,
        });
        log_debug!("Timer poller started");
    }
}

// Boxed so the poller can be respawned from inside `apply_status`.
fn poll_loop(
    controller: TimerController,
    cancel_token: CancellationToken,
) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        let mut interval = time::interval(controller.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the caller has just fetched.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let generation = controller.generation().await;
                    match controller.backend.get_timer_status().await {
                        Ok(status) => {
                            let still_running = status.is_running;
                            if !controller.apply_status(status, Some(generation)).await {
                                log_debug!("Dropped timer status fetched before a mutation");
                                continue;
                            }
                            if !still_running {
                                break;
                            }
                        }
                        Err(err) => log_error!("Error getting timer status: {err}"),
                    }
                }
                _ = cancel_token.cancelled() => {
                    break;
                }
            }
        }
    })
}
