use std::{path::PathBuf, time::Duration};

use crate::utils::dir::{default_state_dir, state_dir_from, APP_DIR};

pub const DEFAULT_USER_ID: &str = "default_user";

const DEFAULT_POLL_MS: u64 = 1000;
const DEBUG_POLL_MS: u64 = 250;
const STOPWATCH_TICK_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_id: String,
    /// Interval between timer status polls while a session is running.
    pub poll_interval: Duration,
    pub stopwatch_tick: Duration,
    /// Directory holding client-only preferences.
    pub data_dir: PathBuf,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            stopwatch_tick: Duration::from_millis(STOPWATCH_TICK_MS),
            data_dir: default_state_dir(),
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            data_dir: state_dir_from(&lookup).unwrap_or_else(|| PathBuf::from(APP_DIR)),
            ..Self::default()
        };

        let debug_mode = lookup("TIMEBOX_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            config.debug = true;
            config.poll_interval = Duration::from_millis(DEBUG_POLL_MS);
        }

        if let Some(user_id) = lookup("TIMEBOX_USER_ID").filter(|v| !v.trim().is_empty()) {
            config.user_id = user_id.trim().to_string();
        }

        if let Some(raw) = lookup("TIMEBOX_POLL_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.poll_interval = Duration::from_millis(ms),
                _ => log::warn!("Ignoring invalid TIMEBOX_POLL_MS value '{raw}'"),
            }
        }

        if let Some(dir) = lookup("TIMEBOX_DATA_DIR").filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }
}
