use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// A saved stopwatch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StopwatchEntry {
    pub id: String,
    pub duration_seconds: u64,
    #[serde(default)]
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StopwatchState {
    pub elapsed_seconds: u64,
    pub is_running: bool,
    /// Instant up to which `elapsed_seconds` has been counted.
    pub last_tick: Option<DateTime<Utc>>,
    pub label: String,
    /// Newest first.
    pub history: Vec<StopwatchEntry>,
}

impl StopwatchState {
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.is_running = true;
        self.last_tick = Some(now);
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.start(now);
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.is_running = false;
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.is_running = false;
        self.elapsed_seconds = 0;
        self.last_tick = Some(now);
    }

    /// Counts the whole seconds since the last tick and returns them.
    ///
    /// `last_tick` only advances by the seconds counted, so sub-second
    /// remainders carry over and a restored state catches up exactly.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u64 {
        if !self.is_running {
            return 0;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return 0;
        };
        let seconds = (now - last).num_seconds();
        if seconds <= 0 {
            return 0;
        }
        self.elapsed_seconds += seconds as u64;
        self.last_tick = Some(last + chrono::Duration::seconds(seconds));
        seconds as u64
    }

    /// Saves the current run to history and resets.
    ///
    /// An empty run is rejected and leaves the state untouched.
    pub fn stop_and_save(
        &mut self,
        label: Option<&str>,
        now: DateTime<Utc>,
    ) -> ClientResult<StopwatchEntry> {
        self.tick(now);
        if self.elapsed_seconds == 0 {
            return Err(ClientError::validation(
                "Nothing to save: the stopwatch is at 00:00:00",
            ));
        }

        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or_else(|| Some(self.label.trim()).filter(|l| !l.is_empty()))
            .map(str::to_string);
        let entry = StopwatchEntry {
            id: Uuid::new_v4().to_string(),
            duration_seconds: self.elapsed_seconds,
            label,
            created_at: now,
        };
        self.history.insert(0, entry.clone());

        self.reset(now);
        self.label.clear();
        Ok(entry)
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|entry| entry.id != id);
        self.history.len() != before
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn display(&self) -> String {
        format_hms(self.elapsed_seconds)
    }
}

/// `HH:MM:SS`; hours keep growing past 99.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
