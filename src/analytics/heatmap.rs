//! Focus heatmap: buckets focus sessions into a Monday-first 7×24 grid.
//!
//! The aggregation is a pure function of its input. Callers fetch sessions
//! for the selected range first; nothing here filters by date.

use std::collections::BTreeMap;

use chrono::{Datelike, TimeZone, Timelike, Weekday};
use serde::Serialize;

use crate::models::PomodoroSession;

pub const DAYS: usize = 7;
pub const HOURS: usize = 24;
pub const DAY_NAMES: [&str; DAYS] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const PEAK_WINDOW_SIZES: [usize; 3] = [2, 3, 4];
const LOW_PRODUCTIVITY_RATIO: f64 = 0.3;
const MAX_LISTED_TASKS: usize = 3;

/// Contiguous span of hours, `end` exclusive.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PeakWindow {
    pub start: u32,
    pub end: u32,
}

impl PeakWindow {
    pub fn hours(&self) -> u32 {
        self.end - self.start
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    /// Intensity level 0..=4 per `[day][hour]`.
    pub grid: [[u8; HOURS]; DAYS],
    /// Sessions keyed by `"day-hour"`.
    pub sessions_by_cell: BTreeMap<String, Vec<PomodoroSession>>,
    pub peak_hours: Option<PeakWindow>,
    pub most_focused_day: Option<String>,
    /// Seconds of focus behind `most_focused_day`.
    pub most_focused_day_duration: u64,
    /// Percentage of sessions without interruptions.
    pub flow_state_quality: f64,
    pub low_productivity_hour: Option<u32>,
}

impl Default for HeatmapData {
    fn default() -> Self {
        Self {
            grid: [[0; HOURS]; DAYS],
            sessions_by_cell: BTreeMap::new(),
            peak_hours: None,
            most_focused_day: None,
            most_focused_day_duration: 0,
            flow_state_quality: 0.0,
            low_productivity_hour: None,
        }
    }
}

/// Tooltip details for one cell.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellSummary {
    pub day: &'static str,
    pub hour: u32,
    pub session_count: usize,
    pub total_seconds: u64,
    pub total_interruptions: u32,
    /// First few distinct task titles, in session order.
    pub tasks: Vec<String>,
    /// Distinct titles beyond `tasks`.
    pub more_tasks: usize,
}

impl HeatmapData {
    /// True once any focus session has a positive duration.
    pub fn has_enough_data(&self) -> bool {
        self.peak_hours.is_some()
    }

    pub fn intensity(&self, day: usize, hour: usize) -> u8 {
        self.grid
            .get(day)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn sessions_at(&self, day: usize, hour: usize) -> &[PomodoroSession] {
        self.sessions_by_cell
            .get(&cell_key(day, hour))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Summary for a hovered cell; `None` for empty cells.
    pub fn cell_summary(&self, day: usize, hour: usize) -> Option<CellSummary> {
        if self.intensity(day, hour) == 0 {
            return None;
        }
        let sessions = self.sessions_at(day, hour);
        if sessions.is_empty() {
            return None;
        }

        let mut titles: Vec<String> = Vec::new();
        for title in sessions.iter().filter_map(|s| s.task_title.as_ref()) {
            if !titles.contains(title) {
                titles.push(title.clone());
            }
        }
        let more_tasks = titles.len().saturating_sub(MAX_LISTED_TASKS);
        titles.truncate(MAX_LISTED_TASKS);

        Some(CellSummary {
            day: DAY_NAMES[day],
            hour: hour as u32,
            session_count: sessions.len(),
            total_seconds: sessions.iter().map(PomodoroSession::recorded_seconds).sum(),
            total_interruptions: sessions.iter().map(|s| s.interruption_count).sum(),
            tasks: titles,
            more_tasks,
        })
    }
}

pub fn cell_key(day: usize, hour: usize) -> String {
    format!("{day}-{hour}")
}

/// Monday-first day index: Monday → 0, Sunday → 6.
pub fn day_index(weekday: Weekday) -> usize {
    (weekday.num_days_from_sunday() as usize + 6) % 7
}

/// Builds the heatmap for `sessions`, reading start times in `tz`.
///
/// Break sessions are ignored. Sessions without a recorded duration are
/// listed in their cell but add nothing to the totals.
pub fn aggregate<Tz: TimeZone>(sessions: &[PomodoroSession], tz: &Tz) -> HeatmapData {
    let focus: Vec<&PomodoroSession> = sessions.iter().filter(|s| s.is_focus()).collect();
    if focus.is_empty() {
        return HeatmapData::default();
    }

    let mut minutes = [[0.0_f64; HOURS]; DAYS];
    let mut day_totals = [0_u64; DAYS];
    let mut hour_totals = [0_u64; HOURS];
    let mut sessions_by_cell: BTreeMap<String, Vec<PomodoroSession>> = BTreeMap::new();

    for session in &focus {
        let local = session.start_time.with_timezone(tz);
        let day = day_index(local.weekday());
        let hour = local.hour() as usize;

        sessions_by_cell
            .entry(cell_key(day, hour))
            .or_default()
            .push((*session).clone());

        let Some(seconds) = session.duration_seconds else {
            continue;
        };
        let seconds = u64::from(seconds);
        minutes[day][hour] += seconds as f64 / 60.0;
        day_totals[day] += seconds;
        hour_totals[hour] += seconds;
    }

    let peak = find_peak_window(&hour_totals);
    let (most_focused_day, most_focused_day_duration) = match busiest_day(&day_totals) {
        Some((day, total)) => (Some(DAY_NAMES[day].to_string()), total),
        None => (None, 0),
    };
    let uninterrupted = focus.iter().filter(|s| s.is_uninterrupted()).count();

    HeatmapData {
        grid: normalize(&minutes),
        sessions_by_cell,
        peak_hours: peak.map(|(window, _)| window),
        most_focused_day,
        most_focused_day_duration,
        flow_state_quality: uninterrupted as f64 * 100.0 / focus.len() as f64,
        low_productivity_hour: peak
            .and_then(|(window, total)| low_productivity_hour(&hour_totals, window, total)),
    }
}

/// Maps raw minutes to intensity levels relative to the busiest cell.
pub fn normalize(minutes: &[[f64; HOURS]; DAYS]) -> [[u8; HOURS]; DAYS] {
    let max = minutes
        .iter()
        .flat_map(|row| row.iter())
        .copied()
        .fold(0.0_f64, f64::max);

    let mut grid = [[0_u8; HOURS]; DAYS];
    if max <= 0.0 {
        return grid;
    }
    for (day, row) in minutes.iter().enumerate() {
        for (hour, value) in row.iter().enumerate() {
            grid[day][hour] = intensity_level(value / max);
        }
    }
    grid
}

pub fn intensity_level(ratio: f64) -> u8 {
    if ratio <= 0.0 {
        0
    } else if ratio < 0.25 {
        1
    } else if ratio < 0.5 {
        2
    } else if ratio < 0.75 {
        3
    } else {
        4
    }
}

/// Best 2–4 hour window by summed focus time, with its sum.
///
/// Sizes are tried smallest first and starts earliest first; only a strictly
/// larger sum replaces the current best.
pub fn find_peak_window(hour_totals: &[u64; HOURS]) -> Option<(PeakWindow, u64)> {
    let mut best: Option<(PeakWindow, u64)> = None;
    let mut best_sum = 0;

    for size in PEAK_WINDOW_SIZES {
        for start in 0..=(HOURS - size) {
            let sum: u64 = hour_totals[start..start + size].iter().sum();
            if sum > best_sum {
                best_sum = sum;
                best = Some((
                    PeakWindow {
                        start: start as u32,
                        end: (start + size) as u32,
                    },
                    sum,
                ));
            }
        }
    }

    best
}

/// First hour at or after the window's end whose total drops below 30% of
/// the window's total. The scan stops at 23 and does not wrap.
pub fn low_productivity_hour(
    hour_totals: &[u64; HOURS],
    peak: PeakWindow,
    peak_total: u64,
) -> Option<u32> {
    let threshold = peak_total as f64 * LOW_PRODUCTIVITY_RATIO;
    (peak.end as usize..HOURS)
        .find(|&hour| (hour_totals[hour] as f64) < threshold)
        .map(|hour| hour as u32)
}

fn busiest_day(day_totals: &[u64; DAYS]) -> Option<(usize, u64)> {
    let mut best: Option<(usize, u64)> = None;
    for (day, &total) in day_totals.iter().enumerate() {
        if total > best.map_or(0, |(_, t)| t) {
            best = Some((day, total));
        }
    }
    best
}
