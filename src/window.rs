//! Close guard for the custom title bar.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::backend::BackendResult;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

/// Window controls plus the two session queries the close dialog needs.
#[async_trait]
pub trait WindowChrome: Send + Sync {
    async fn has_active_session(&self) -> BackendResult<bool>;
    async fn save_active_session(&self) -> BackendResult<()>;
    async fn minimize(&self) -> BackendResult<()>;
    async fn close(&self) -> BackendResult<()>;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CloseDecision {
    Closed,
    /// A session is running; ask the user whether to save it first.
    ConfirmRequired,
    StayOpen,
}

#[derive(Clone)]
pub struct WindowGuard {
    chrome: Arc<dyn WindowChrome>,
}

impl WindowGuard {
    pub fn new(chrome: Arc<dyn WindowChrome>) -> Self {
        Self { chrome }
    }

    /// Close button. If the session check fails the window closes anyway.
    pub async fn request_close(&self) -> CloseDecision {
        match self.chrome.has_active_session().await {
            Ok(true) => CloseDecision::ConfirmRequired,
            Ok(false) => self.close().await,
            Err(err) => {
                log_error!("Error checking active session: {err}");
                self.close().await
            }
        }
    }

    /// "Save & close": a failed save keeps the window open.
    pub async fn save_and_close(&self) -> CloseDecision {
        if let Err(err) = self.chrome.save_active_session().await {
            log_error!("Save error: {err}");
            return CloseDecision::StayOpen;
        }
        log_info!("Active session saved before closing");
        self.close().await
    }

    pub async fn close_without_saving(&self) -> CloseDecision {
        self.close().await
    }

    pub async fn minimize(&self) {
        if let Err(err) = self.chrome.minimize().await {
            log_error!("Minimize error: {err}");
        }
    }

    async fn close(&self) -> CloseDecision {
        match self.chrome.close().await {
            Ok(()) => CloseDecision::Closed,
            Err(err) => {
                log_error!("Close error: {err}");
                CloseDecision::StayOpen
            }
        }
    }
}
