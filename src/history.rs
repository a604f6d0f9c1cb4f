//! Session history and the manual entry form.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use crate::analytics::DateRange;
use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};
use crate::events::EventBus;
use crate::models::{ManualSession, PomodoroSession, SessionType};
use crate::state::{AppState, Tab};
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Manual entry form; times are local wall-clock times on `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntryForm {
    pub task_id: Option<String>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub notes: String,
}

impl ManualEntryForm {
    /// Form defaults: today, 09:00 to 10:00.
    pub fn for_day(date: NaiveDate) -> Self {
        Self {
            task_id: None,
            date,
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            notes: String::new(),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        duration_minutes(self.start, self.end)
    }

    pub fn to_session<Tz: TimeZone>(&self, tz: &Tz) -> ClientResult<ManualSession> {
        let task_id = self
            .task_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::validation("Please select a task"))?;

        let duration_minutes = self.duration_minutes();
        if duration_minutes == 0 {
            return Err(ClientError::validation(
                "Session must last at least one minute",
            ));
        }

        let naive = self.date.and_time(self.start);
        let start_time = tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| ClientError::validation("Start time does not exist on that day"))?;

        let notes = self.notes.trim();
        Ok(ManualSession {
            task_id,
            start_time,
            duration_minutes,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Minutes from `start` to `end`, wrapping past midnight.
pub fn duration_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let mut diff = (end - start).num_minutes();
    if diff < 0 {
        diff += MINUTES_PER_DAY;
    }
    diff as u32
}

#[derive(Clone)]
pub struct HistoryService {
    backend: Arc<dyn Backend>,
    events: EventBus,
    state: Arc<AppState>,
    user_id: String,
}

impl HistoryService {
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

    pub async fn today(&self) -> Vec<PomodoroSession> {
        self.backend
            .get_today_sessions(&self.user_id)
            .await
            .unwrap_or_else(|err| {
                log_error!("Error loading sessions: {err}");
                Vec::new()
            })
    }

    pub async fn all(&self) -> Vec<PomodoroSession> {
        self.backend
            .get_sessions(&self.user_id)
            .await
            .unwrap_or_else(|err| {
                log_error!("Error loading sessions: {err}");
                Vec::new()
            })
    }

    pub async fn in_range<Tz>(
        &self,
        range: DateRange,
        tz: &Tz,
        session_type: Option<SessionType>,
    ) -> Vec<PomodoroSession>
    where
        Tz: TimeZone + Sync,
    {
        let (start, end) = range.bounds_in(tz);
        self.backend
            .get_sessions_by_date_range(&self.user_id, start, end, session_type)
            .await
            .unwrap_or_else(|err| {
                log_error!("Error loading sessions for {} - {}: {err}", range.start, range.end);
                Vec::new()
            })
    }

    /// Validates the form and records the entry, then shows the history tab.
    pub async fn log_manual<Tz>(
        &self,
        form: &ManualEntryForm,
        tz: &Tz,
    ) -> ClientResult<ManualSession>
    where
        Tz: TimeZone + Sync,
    {
        let session = match form.to_session(tz) {
            Ok(session) => session,
            Err(err) => {
                self.events.error(err.to_string());
                return Err(err);
            }
        };

        log_info!(
            "Logged manual session for task {} ({} min)",
            session.task_id,
            session.duration_minutes
        );
        self.events.success("Session logged successfully!");
        self.state.set_tab(Tab::History).await;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{fixed_now, ScriptedBackend};
    use crate::events::{drain, toasts, ToastLevel};
    use chrono::{Duration, FixedOffset};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn service(backend: &Arc<ScriptedBackend>) -> (HistoryService, Arc<AppState>, EventBus) {
        let events = EventBus::new();
        let state = Arc::new(AppState::default());
        let service =
            HistoryService::new(backend.clone(), events.clone(), state.clone(), "default_user");
        (service, state, events)
    }

    fn session(session_type: SessionType, offset_days: i64) -> PomodoroSession {
        let start = fixed_now() + Duration::days(offset_days);
        PomodoroSession {
            id: format!("s{offset_days}"),
            user_id: "default_user".into(),
            task_id: None,
            session_type,
            start_time: start,
            end_time: None,
            duration_seconds: Some(300),
            interrupted: false,
            interruption_count: 0,
            manual_override: false,
            created_at: start,
            task_title: None,
        }
    }

    #[test]
    fn duration_wraps_overnight() {
        assert_eq!(duration_minutes(time(9, 0), time(10, 30)), 90);
        assert_eq!(duration_minutes(time(23, 0), time(1, 15)), 135);
        assert_eq!(duration_minutes(time(9, 0), time(9, 0)), 0);
    }

    #[test]
    fn manual_session_uses_local_start() {
        let mut form = ManualEntryForm::for_day(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        form.task_id = Some("t1".into());
        form.notes = "  pair programming ".into();
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();

        let session = form.to_session(&tz).unwrap();
        assert_eq!(session.duration_minutes, 60);
        assert_eq!(session.start_time.to_rfc3339(), "2026-03-02T14:00:00+00:00");
        assert_eq!(session.notes.as_deref(), Some("pair programming"));
    }

    #[tokio::test]
    async fn manual_entry_requires_task_and_duration() {
        let backend = Arc::new(ScriptedBackend::new());
        let (service, state, events) = service(&backend);
        let mut rx = events.subscribe();
        let mut form = ManualEntryForm::for_day(fixed_now().date_naive());

        let err = service.log_manual(&form, &Utc).await.unwrap_err();
        assert_eq!(err.to_string(), "Please select a task");

        form.task_id = Some("t1".into());
        form.end = form.start;
        assert!(service.log_manual(&form, &Utc).await.unwrap_err().is_validation());
        assert_eq!(state.tab().await, Tab::Timer);

        let toasts = toasts(&drain(&mut rx));
        assert_eq!(toasts.len(), 2);
        assert!(toasts.iter().all(|t| t.level == ToastLevel::Error));
    }

    #[tokio::test]
    async fn valid_manual_entry_switches_to_history() {
        let backend = Arc::new(ScriptedBackend::new());
        let (service, state, events) = service(&backend);
        let mut rx = events.subscribe();
        let mut form = ManualEntryForm::for_day(fixed_now().date_naive());
        form.task_id = Some("t1".into());

        let session = service.log_manual(&form, &Utc).await.unwrap();
        assert_eq!(session.duration_minutes, 60);
        assert_eq!(state.tab().await, Tab::History);
        assert_eq!(
            toasts(&drain(&mut rx))[0].message,
            "Session logged successfully!"
        );
    }

    #[tokio::test]
    async fn range_query_filters_by_type_and_days() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.add_session(session(SessionType::Focus, 0));
        backend.add_session(session(SessionType::ShortBreak, 0));
        backend.add_session(session(SessionType::Focus, -3));
        let (service, _, _) = service(&backend);

        let today = fixed_now().date_naive();
        let range = DateRange::new(today, today);
        assert_eq!(service.in_range(range, &Utc, None).await.len(), 2);
        assert_eq!(
            service
                .in_range(range, &Utc, Some(SessionType::Focus))
                .await
                .len(),
            1
        );
        assert_eq!(service.all().await.len(), 3);

        backend.fail("get_today_sessions");
        assert!(service.today().await.is_empty());
    }
}
