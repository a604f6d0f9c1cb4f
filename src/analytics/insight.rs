//! Text shown around the heatmap: stat cards and the optimization tip.

use serde::Serialize;

use super::heatmap::{HeatmapData, PeakWindow};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Insight {
    GettingStarted,
    FocusDrops { hour: u32 },
    SteadyFocus,
}

impl Insight {
    pub fn from_heatmap(data: &HeatmapData) -> Self {
        if !data.has_enough_data() {
            return Insight::GettingStarted;
        }
        match data.low_productivity_hour {
            Some(hour) => Insight::FocusDrops { hour },
            None => Insight::SteadyFocus,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Insight::GettingStarted => "Complete a few focus sessions to unlock personalized \
                insights and see your productivity patterns."
                .to_string(),
            Insight::FocusDrops { hour } => format!(
                "Based on your heatmap, your focus drops significantly after {}. \
                 We recommend scheduling low-cognitive tasks like emails and meetings \
                 for this period to maximize your morning flow.",
                format_hour(*hour)
            ),
            Insight::SteadyFocus => "Your focus patterns look great! Consider maintaining your \
                current schedule and experimenting with different work blocks to find even \
                more optimal times."
                .to_string(),
        }
    }
}

/// Stat card texts derived from one heatmap.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCards {
    pub peak_hours: String,
    pub peak_detail: String,
    pub most_focused_day: String,
    pub most_focused_detail: String,
    pub flow_state_quality: String,
}

impl HeatmapCards {
    pub fn from_heatmap(data: &HeatmapData) -> Self {
        let (peak_hours, peak_detail) = match data.peak_hours {
            Some(window) => (
                format_window(window),
                format!(
                    "Average high intensity duration: {}",
                    format_minutes(u64::from(window.hours()) * 60)
                ),
            ),
            None => (
                "No data".to_string(),
                "Complete focus sessions to see peak hours".to_string(),
            ),
        };
        let (most_focused_day, most_focused_detail) = match &data.most_focused_day {
            Some(day) => (
                day.clone(),
                format!(
                    "{} of Deep Work sessions",
                    format_minutes(data.most_focused_day_duration / 60)
                ),
            ),
            None => (
                "No data".to_string(),
                "Complete focus sessions across different days".to_string(),
            ),
        };

        Self {
            peak_hours,
            peak_detail,
            most_focused_day,
            most_focused_detail,
            flow_state_quality: format!("{}%", data.flow_state_quality.round() as u32),
        }
    }
}

/// 12-hour clock label, `0` → `12:00 AM`, `13` → `1:00 PM`.
pub fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{display}:00 {period}")
}

pub fn format_window(window: PeakWindow) -> String {
    format!("{} - {}", format_hour(window.start), format_hour(window.end))
}

/// `Xh Ym`, `Xh` or `Ym`.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
