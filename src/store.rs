//! Client-only preferences kept in a JSON file next to the app data.
//!
//! The backend never sees these: theme and the stopwatch live here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::log_warn;
use crate::state::Theme;
use crate::stopwatch::StopwatchState;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub stopwatch: StopwatchState,
}

pub struct LocalStore {
    path: PathBuf,
    data: RwLock<Preferences>,
}

impl LocalStore {
    /// Opens the store at `path`. A missing or malformed file starts from
    /// defaults; an unreadable one is an error.
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring malformed {}: {err}", path.display());
                Preferences::default()
            })
        } else {
            Preferences::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> Preferences {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn theme(&self) -> Theme {
        self.data.read().unwrap_or_else(PoisonError::into_inner).theme
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.update(|prefs| prefs.theme = theme)
    }

    pub fn stopwatch(&self) -> StopwatchState {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stopwatch
            .clone()
    }

    pub fn save_stopwatch(&self, state: &StopwatchState) -> Result<()> {
        self.update(|prefs| prefs.stopwatch = state.clone())
    }

    fn update(&self, apply: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        // Write beside the target and rename, so a crash never leaves a truncated file.
        let staging = self.staging_path();
        fs::write(&staging, serialized)
            .with_context(|| format!("Failed to write preferences to {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: Preferences = serde_json::from_str(&contents)?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }
}
