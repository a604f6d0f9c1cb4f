//! Events published to the presentation layer.
//!
//! The presentation side subscribes once and renders toasts and timer
//! updates; nothing in the client waits for a subscriber.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::timer::TimerView;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// Transient user notification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum AppEvent {
    TimerStateChanged(TimerView),
    TimerCompleted,
    StopwatchChanged { elapsed_seconds: u64, is_running: bool },
    Toast(Toast),
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Error, message);
    }

    fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        self.emit(AppEvent::Toast(Toast {
            level,
            message: message.into(),
        }));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains every event currently queued on `rx`.
#[cfg(test)]
pub(crate) fn drain(rx: &mut broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
pub(crate) fn toasts(events: &[AppEvent]) -> Vec<Toast> {
    events
        .iter()
        .filter_map(|event| match event {
            AppEvent::Toast(toast) => Some(toast.clone()),
            _ => None,
        })
        .collect()
}
