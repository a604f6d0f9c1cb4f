pub mod heatmap;
pub mod insight;
pub mod period;
pub mod stats;

pub use heatmap::{aggregate, day_index, CellSummary, HeatmapData, PeakWindow, DAY_NAMES};
pub use insight::{format_hour, format_minutes, HeatmapCards, Insight};
pub use period::{DateRange, TimePeriod};
pub use stats::{format_elapsed, TodayStats};

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::backend::Backend;
use crate::events::EventBus;
use crate::models::{PomodoroSession, SessionType};
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

/// Everything the analytics tab renders for one period.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapReport {
    pub range: DateRange,
    pub data: HeatmapData,
    pub cards: HeatmapCards,
    pub insight: Insight,
}

impl HeatmapReport {
    pub fn new(range: DateRange, data: HeatmapData) -> Self {
        Self {
            range,
            cards: HeatmapCards::from_heatmap(&data),
            insight: Insight::from_heatmap(&data),
            data,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodayReport {
    pub stats: TodayStats,
    pub sessions: Vec<PomodoroSession>,
}

/// Fetches sessions for the analytics tab and runs the aggregations.
///
/// Load failures are logged and reported as a toast; the caller always gets
/// an (empty) report back.
#[derive(Clone)]
pub struct AnalyticsService {
    backend: Arc<dyn Backend>,
    events: EventBus,
    user_id: String,
}

impl AnalyticsService {
    pub fn new(backend: Arc<dyn Backend>, events: EventBus, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            events,
            user_id: user_id.into(),
        }
    }

    pub async fn heatmap<Tz>(&self, period: TimePeriod, today: NaiveDate, tz: &Tz) -> HeatmapReport
    where
        Tz: TimeZone + Sync,
    {
        let range = period.resolve(today);
        let (start, end) = range.bounds_in(tz);

        let sessions = match self
            .backend
            .get_sessions_by_date_range(&self.user_id, start, end, Some(SessionType::Focus))
            .await
        {
            Ok(sessions) => sessions,
            Err(err) => {
                log_error!("Failed to load sessions for {}: {err}", period.label());
                self.events.error("Failed to load focus heatmap");
                return HeatmapReport::new(range, HeatmapData::default());
            }
        };

        log_info!(
            "Aggregating {} sessions from {} to {}",
            sessions.len(),
            range.start,
            range.end
        );
        HeatmapReport::new(range, aggregate(&sessions, tz))
    }

    pub async fn today(&self) -> TodayReport {
        match self.backend.get_today_sessions(&self.user_id).await {
            Ok(sessions) => TodayReport {
                stats: TodayStats::from_sessions(&sessions),
                sessions,
            },
            Err(err) => {
                log_error!("Error loading sessions: {err}");
                self.events.error("Failed to load today's sessions");
                TodayReport::default()
            }
        }
    }
}
