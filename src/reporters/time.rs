use crate::reporters::types::TimeStats;
use crate::reporters::utility::mode;
use crate::table::{TripTable, weekday_name};

/// Most common month, weekday and start hour, each with its count.
///
/// Weekday ties resolve alphabetically by name.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn report_time_stats(table: &TripTable) -> TimeStats {
    TimeStats {
        common_month: mode(table.months().iter().copied()),
        common_weekday: mode(table.weekdays().iter().map(|d| weekday_name(*d)))
            .map(|m| m.map(str::to_string)),
        common_hour: mode(table.hours().iter().copied()),
    }
}
