//! Result types produced by the reporters.

use serde::Serialize;

/// A value and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: usize,
}

impl<T> ValueCount<T> {
    pub fn new(value: T, count: usize) -> Self {
        ValueCount { value, count }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueCount<U> {
        ValueCount {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Most frequent travel times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// 1-based month number.
    pub common_month: Option<ValueCount<u32>>,
    pub common_weekday: Option<ValueCount<String>>,
    pub common_hour: Option<ValueCount<u32>>,
}

/// Most popular stations and route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub common_start_station: Option<ValueCount<String>>,
    pub common_end_station: Option<ValueCount<String>>,
    pub common_route: Option<ValueCount<String>>,
}

/// A duration split into whole days, hours and minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    pub total_seconds: f64,
    pub total: DurationBreakdown,
    pub mean_seconds: Option<f64>,
    pub average: Option<DurationBreakdown>,
}

/// Whether an optional column exists in the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: ValueCount<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<ValueCount<String>>,
    pub gender: Availability<Vec<ValueCount<String>>>,
    /// `Available(None)` when the column exists but the table has no values.
    pub birth_year: Availability<Option<BirthYearStats>>,
}

/// Wall-clock seconds spent in each reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SectionTimings {
    pub time: f64,
    pub station: f64,
    pub duration: f64,
    pub user: f64,
}

impl SectionTimings {
    pub fn total(&self) -> f64 {
        self.time + self.station + self.duration + self.user
    }
}
