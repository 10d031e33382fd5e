//! In-memory trip table with calendar columns derived once at load time.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

/// Optional columns present in the loaded dataset, decided from the CSV header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Capabilities {
    pub fn full() -> Self {
        Self {
            has_gender: true,
            has_birth_year: true,
        }
    }
}

/// Row counts recorded while a dataset was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub malformed: usize,
}

/// One trip, with its derived calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    /// Seconds. Some source files carry a fractional part.
    pub trip_duration: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    pub month: u32,
    pub weekday: Weekday,
    pub hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration: f64,
    ) -> Self {
        TripRecord {
            start_time,
            start_station: Some(start_station.into()),
            end_station: Some(end_station.into()),
            trip_duration,
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, birth_year: i32) -> Self {
        self.birth_year = Some(birth_year);
        self
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// `"<start> to <end>"`, or `None` when either station is missing.
    pub fn route(&self) -> Option<String> {
        Some(route(self.start_station.as_deref()?, self.end_station.as_deref()?))
    }
}

pub fn route(start_station: &str, end_station: &str) -> String {
    format!("{} to {}", start_station, end_station)
}

/// Full English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Column-oriented trip table.
///
/// Every column has one entry per row, in file order. The month, weekday and
/// hour columns are derived from `start_time` when a row is pushed and are
/// never recomputed afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    start_time: Vec<NaiveDateTime>,
    start_station: Vec<Option<String>>,
    end_station: Vec<Option<String>>,
    trip_duration: Vec<f64>,
    user_type: Vec<Option<String>>,
    gender: Vec<Option<String>>,
    birth_year: Vec<Option<i32>>,

    month: Vec<u32>,
    weekday: Vec<Weekday>,
    hour: Vec<u32>,

    capabilities: Capabilities,
    summary: LoadSummary,
}

impl TripTable {
    pub fn new(capabilities: Capabilities) -> Self {
        TripTable {
            capabilities,
            ..Default::default()
        }
    }

    pub fn from_records(
        records: impl IntoIterator<Item = TripRecord>,
        capabilities: Capabilities,
    ) -> Self {
        let mut table = TripTable::new(capabilities);
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: TripRecord) {
        self.start_time.push(record.start_time);
        self.start_station.push(record.start_station);
        self.end_station.push(record.end_station);
        self.trip_duration.push(record.trip_duration);
        self.user_type.push(record.user_type);
        self.gender.push(record.gender);
        self.birth_year.push(record.birth_year);
        self.month.push(record.month);
        self.weekday.push(record.weekday);
        self.hour.push(record.hour);
    }

    pub(crate) fn set_load_summary(&mut self, summary: LoadSummary) {
        self.summary = summary;
    }

    pub fn len(&self) -> usize {
        self.start_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start_time.is_empty()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn load_summary(&self) -> LoadSummary {
        self.summary
    }

    pub fn months(&self) -> &[u32] {
        &self.month
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekday
    }

    pub fn hours(&self) -> &[u32] {
        &self.hour
    }

    pub fn start_stations(&self) -> &[Option<String>] {
        &self.start_station
    }

    pub fn end_stations(&self) -> &[Option<String>] {
        &self.end_station
    }

    pub fn trip_durations(&self) -> &[f64] {
        &self.trip_duration
    }

    pub fn user_types(&self) -> &[Option<String>] {
        &self.user_type
    }

    pub fn genders(&self) -> &[Option<String>] {
        &self.gender
    }

    pub fn birth_years(&self) -> &[Option<i32>] {
        &self.birth_year
    }

    /// Reassembles row `index`, or `None` past the end.
    pub fn record(&self, index: usize) -> Option<TripRecord> {
        if index >= self.len() {
            return None;
        }

        Some(TripRecord {
            start_time: self.start_time[index],
            start_station: self.start_station[index].clone(),
            end_station: self.end_station[index].clone(),
            trip_duration: self.trip_duration[index],
            user_type: self.user_type[index].clone(),
            gender: self.gender[index].clone(),
            birth_year: self.birth_year[index],
            month: self.month[index],
            weekday: self.weekday[index],
            hour: self.hour[index],
        })
    }

    pub fn records(&self) -> impl Iterator<Item = TripRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }

    /// Builds a new table from the rows at `indices`, in the given order.
    ///
    /// Capabilities and the load summary carry over unchanged.
    pub fn select(&self, indices: impl IntoIterator<Item = usize>) -> TripTable {
        let mut table = TripTable::new(self.capabilities);
        table.summary = self.summary;
        for record in indices.into_iter().filter_map(|i| self.record(i)) {
            table.push(record);
        }
        table
    }
}
