use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const FALLBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimePeriod {
    #[default]
    Last7Days,
    Last30Days,
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl TimePeriod {
    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Last7Days => "Last 7 Days",
            TimePeriod::Last30Days => "Last 30 Days",
            TimePeriod::Custom { .. } => "Custom Range",
        }
    }

    /// Closed range of calendar days covered by this period, ending `today`.
    ///
    /// A custom period needs both ends to count; otherwise it behaves like
    /// the last 7 days.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match *self {
            TimePeriod::Last7Days => DateRange::ending(today, 7),
            TimePeriod::Last30Days => DateRange::ending(today, 30),
            TimePeriod::Custom {
                start: Some(start),
                end: Some(end),
            } => DateRange::new(start, end),
            TimePeriod::Custom { .. } => DateRange::ending(today, FALLBACK_DAYS),
        }
    }
}

/// Inclusive span of calendar days; `start <= end` always holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the ends if given backwards.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// The `days` calendar days ending with `last`.
    pub fn ending(last: NaiveDate, days: i64) -> Self {
        Self {
            start: last - Duration::days(days.max(1) - 1),
            end: last,
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First and last instant of the range in `tz`, as UTC.
    pub fn bounds_in<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let first = self.start.and_time(NaiveTime::MIN);
        let last = (self.end + Duration::days(1)).and_time(NaiveTime::MIN);
        let from = local_to_utc(tz, first);
        let to = local_to_utc(tz, last) - Duration::seconds(1);
        (from, to)
    }
}

const GAP_STEP_MINUTES: i64 = 15;
const MAX_GAP_STEPS: i64 = 24 * 60 / GAP_STEP_MINUTES;

fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    // Midnight can fall in a DST gap; take the first local time after it.
    (0..=MAX_GAP_STEPS)
        .find_map(|step| {
            let candidate = naive + Duration::minutes(step * GAP_STEP_MINUTES);
            tz.from_local_datetime(&candidate).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| tz.from_utc_datetime(&naive).with_timezone(&Utc))
}
