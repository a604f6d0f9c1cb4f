use std::sync::Arc;

use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};
use crate::events::EventBus;
use crate::models::PomodoroSettings;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

/// Timer preferences stored by the backend.
#[derive(Clone)]
pub struct SettingsService {
    backend: Arc<dyn Backend>,
    events: EventBus,
    user_id: String,
}

impl SettingsService {
    pub fn new(backend: Arc<dyn Backend>, events: EventBus, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            events,
            user_id: user_id.into(),
        }
    }

    /// Loads settings, falling back to defaults when the backend fails.
    pub async fn load(&self) -> PomodoroSettings {
        match self.backend.get_settings(&self.user_id).await {
            Ok(settings) => settings,
            Err(err) => {
                log_error!("Error loading settings: {err}");
                PomodoroSettings::defaults_for(&self.user_id)
            }
        }
    }

    /// Saves every field of `settings`. Returns whether the backend accepted it.
    pub async fn save(&self, settings: &PomodoroSettings) -> ClientResult<bool> {
        if let Err(err) = validate(settings) {
            self.events.error(err.to_string());
            return Err(err);
        }

        let mut request = settings.to_update();
        request.user_id = self.user_id.clone();
        match self.backend.update_settings(request).await {
            Ok(()) => {
                log_info!("Settings saved");
                self.events.success("Settings saved");
                Ok(true)
            }
            Err(err) => {
                log_error!("Error saving settings: {err}");
                self.events.error("Failed to save settings");
                Ok(false)
            }
        }
    }
}

pub fn validate(settings: &PomodoroSettings) -> ClientResult<()> {
    let minutes = [
        ("Focus", settings.focus_minutes),
        ("Short break", settings.short_break_minutes),
        ("Long break", settings.long_break_minutes),
    ];
    if let Some((name, _)) = minutes.iter().find(|(_, value)| *value == 0) {
        return Err(ClientError::validation(format!(
            "{name} length must be at least one minute"
        )));
    }
    if settings.cycles_before_long_break == 0 {
        return Err(ClientError::validation(
            "Cycles before a long break must be at least one",
        ));
    }
    if !(0.0..=1.0).contains(&settings.sound_volume) {
        return Err(ClientError::validation(
            "Sound volume must be between 0 and 1",
        ));
    }
    Ok(())
}
