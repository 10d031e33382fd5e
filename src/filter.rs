//! Month and weekday filters over a [`TripTable`].

use chrono::Weekday;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::city::City;
use crate::error::ExploreError;
use crate::table::{TripTable, weekday_name};

/// The months covered by the source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ExploreError::UnknownMonth(s.to_string()))
    }
}

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parses a full weekday name, ignoring case.
pub fn parse_weekday(s: &str) -> Result<Weekday, ExploreError> {
    let wanted = s.trim();
    WEEKDAYS
        .into_iter()
        .find(|d| weekday_name(*d).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ExploreError::UnknownWeekday(s.to_string()))
}

/// Parses a month answer where `all` means no month filter.
pub fn parse_month_choice(s: &str) -> Result<Option<Month>, ExploreError> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// Parses a weekday answer where `all` means no weekday filter.
pub fn parse_weekday_choice(s: &str) -> Result<Option<Weekday>, ExploreError> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        parse_weekday(s).map(Some)
    }
}

/// A complete selection: one city plus optional month and weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub city: City,
    pub month: Option<Month>,
    pub weekday: Option<Weekday>,
}

impl FilterSpec {
    pub fn new(city: City) -> Self {
        FilterSpec {
            city,
            month: None,
            weekday: None,
        }
    }

    pub fn with_month(mut self, month: Option<Month>) -> Self {
        self.month = month;
        self
    }

    pub fn with_weekday(mut self, weekday: Option<Weekday>) -> Self {
        self.weekday = weekday;
        self
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.map_or("all months", |m| m.name());
        let day = self.weekday.map_or("all days", weekday_name);
        write!(f, "{} ({}, {})", self.city.title(), month, day)
    }
}

/// Returns the rows of `table` matching both predicates, in their original order.
///
/// `None` disables a predicate.
#[tracing::instrument(skip(table), fields(rows_in = table.len()))]
pub fn filter(table: &TripTable, month: Option<Month>, weekday: Option<Weekday>) -> TripTable {
    let months = table.months();
    let weekdays = table.weekdays();

    let keep = (0..table.len()).filter(|&i| {
        month.is_none_or(|m| months[i] == m.number()) && weekday.is_none_or(|d| weekdays[i] == d)
    });

    let filtered = table.select(keep.collect::<Vec<_>>());
    debug!(rows_out = filtered.len(), "Filter applied");
    filtered
}

pub fn apply(table: &TripTable, spec: &FilterSpec) -> TripTable {
    filter(table, spec.month, spec.weekday)
}
