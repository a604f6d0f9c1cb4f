use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::ClientResult,
    events::{AppEvent, EventBus},
    store::LocalStore,
};

use super::state::{StopwatchEntry, StopwatchState};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_warn};

/// Source of wall-clock time for the stopwatch.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Local stopwatch persisted in the preferences file.
///
/// State changes are saved immediately. Ticks are not: `last_tick` only
/// moves by counted seconds, so the saved state catches up on restore.
#[derive(Clone)]
pub struct Stopwatch {
    state: Arc<Mutex<StopwatchState>>,
    store: Arc<LocalStore>,
    events: EventBus,
    clock: Clock,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
}

impl Stopwatch {
    /// Restores the saved stopwatch, counting time spent while closed.
    pub async fn restore(
        store: Arc<LocalStore>,
        events: EventBus,
        tick_interval: Duration,
        clock: Clock,
    ) -> Self {
        let mut state = store.stopwatch();
        let caught_up = state.tick(clock());
        if caught_up > 0 {
            log_debug!("Stopwatch caught up {caught_up}s");
        }
        let is_running = state.is_running;

        let stopwatch = Self {
            state: Arc::new(Mutex::new(state)),
            store,
            events,
            clock,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        };
        stopwatch.sync_ticker(is_running).await;
        stopwatch
    }

    pub async fn snapshot(&self) -> StopwatchState {
        self.state.lock().await.clone()
    }

    pub async fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .map(|ticker| !ticker.handle.is_finished())
            .unwrap_or(false)
    }

    pub async fn start(&self) {
        self.mutate(|sw, now| sw.start(now)).await;
    }

    pub async fn pause(&self) {
        self.mutate(|sw, now| sw.pause(now)).await;
    }

    pub async fn resume(&self) {
        self.mutate(|sw, now| sw.resume(now)).await;
    }

    pub async fn reset(&self) {
        self.mutate(|sw, now| sw.reset(now)).await;
    }

    pub async fn set_label(&self, label: impl Into<String>) {
        let label = label.into();
        self.mutate(move |sw, _| sw.label = label).await;
    }

    /// Saves the current run. A run at 00:00:00 is refused with an error
    /// toast and nothing is recorded.
    pub async fn stop_and_save(&self, label: Option<&str>) -> ClientResult<StopwatchEntry> {
        let result = self.mutate(|sw, now| sw.stop_and_save(label, now)).await;
        match &result {
            Ok(entry) => {
                self.events.success("Stopwatch session saved");
                log_debug!("Saved stopwatch entry {} ({}s)", entry.id, entry.duration_seconds);
            }
            Err(err) => self.events.error(err.to_string()),
        }
        result
    }

    pub async fn delete_entry(&self, id: &str) -> bool {
        self.mutate(|sw, _| sw.delete_entry(id)).await
    }

    pub async fn clear_history(&self) {
        self.mutate(|sw, _| sw.clear_history()).await;
    }

    pub async fn shutdown(&self) {
        let ticker = self.ticker.lock().await.take();
        if let Some(ticker) = ticker {
            ticker.cancel_token.cancel();
            if let Err(err) = ticker.handle.await {
                log_error!("Stopwatch ticker failed to join: {err}");
            }
        }
    }

    async fn mutate<R>(&self, apply: impl FnOnce(&mut StopwatchState, DateTime<Utc>) -> R) -> R {
        let (result, elapsed_seconds, is_running) = {
            let mut guard = self.state.lock().await;
            let result = apply(&mut guard, (self.clock)());
            if let Err(err) = self.store.save_stopwatch(&guard) {
                log_warn!("Failed to persist stopwatch: {err:#}");
            }
            (result, guard.elapsed_seconds, guard.is_running)
        };

        self.events.emit(AppEvent::StopwatchChanged {
            elapsed_seconds,
            is_running,
        });
        self.sync_ticker(is_running).await;
        result
    }

    async fn sync_ticker(&self, is_running: bool) {
        let mut guard = self.ticker.lock().await;

        if !is_running {
            if let Some(ticker) = guard.take() {
                ticker.cancel_token.cancel();
            }
            return;
        }

        if let Some(ticker) = guard.as_ref() {
            if !ticker.handle.is_finished() && !ticker.cancel_token.is_cancelled() {
                return;
            }
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(self.clone(), cancel_token.clone()));
        *guard = Some(Ticker {
            handle,
            cancel_token,
        });
    }
}

fn tick_loop(
    stopwatch: Stopwatch,
    cancel_token: CancellationToken,
) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        let mut interval = time::interval(stopwatch.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let (added, elapsed_seconds, is_running) = {
                        let mut guard = stopwatch.state.lock().await;
                        let added = guard.tick((stopwatch.clock)());
                        (added, guard.elapsed_seconds, guard.is_running)
                    };
                    if !is_running {
                        break;
                    }
                    if added > 0 {
                        stopwatch.events.emit(AppEvent::StopwatchChanged {
                            elapsed_seconds,
                            is_running,
                        });
                    }
                }
                _ = cancel_token.cancelled() => {
                    break;
                }
            }
        }
    })
}
