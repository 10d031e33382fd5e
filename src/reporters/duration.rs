use crate::reporters::types::{DurationBreakdown, DurationStats};
use crate::reporters::utility::mean;
use crate::table::TripTable;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

impl DurationBreakdown {
    /// Splits `seconds` into whole days, hours and minutes.
    ///
    /// Each component is floored; the sub-minute remainder is dropped.
    pub fn from_seconds(seconds: f64) -> Self {
        let seconds = seconds.max(0.0);
        let days = (seconds / SECONDS_PER_DAY).floor();
        let rest = seconds - days * SECONDS_PER_DAY;
        let hours = (rest / SECONDS_PER_HOUR).floor();
        let rest = rest - hours * SECONDS_PER_HOUR;
        let minutes = (rest / SECONDS_PER_MINUTE).floor();

        DurationBreakdown {
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
        }
    }
}

/// Total and mean trip duration.
///
/// An empty table has a total of zero and no average.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn report_duration_stats(table: &TripTable) -> DurationStats {
    let durations = table.trip_durations();
    let total_seconds: f64 = durations.iter().sum();
    let mean_seconds = mean(durations);

    DurationStats {
        trips: durations.len(),
        total_seconds,
        total: DurationBreakdown::from_seconds(total_seconds),
        mean_seconds,
        average: mean_seconds.map(DurationBreakdown::from_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Capabilities;
    use crate::table::test_support::trip;

    fn breakdown(days: u64, hours: u64, minutes: u64) -> DurationBreakdown {
        DurationBreakdown {
            days,
            hours,
            minutes,
        }
    }

    #[test]
    fn test_breakdown_day_and_hour() {
        assert_eq!(DurationBreakdown::from_seconds(90_000.0), breakdown(1, 1, 0));
    }

    #[test]
    fn test_breakdown_hour_and_minute() {
        assert_eq!(DurationBreakdown::from_seconds(3_661.0), breakdown(0, 1, 1));
    }

    #[test]
    fn test_breakdown_floors_fractions() {
        assert_eq!(DurationBreakdown::from_seconds(119.9), breakdown(0, 0, 1));
        assert_eq!(DurationBreakdown::from_seconds(59.0), breakdown(0, 0, 0));
    }

    #[test]
    fn test_total_and_average() {
        let table = TripTable::from_records(
            vec![
                trip(1, 2, 8, "A", "B", 86_400.0),
                trip(1, 2, 9, "A", "B", 3_600.0),
                trip(1, 2, 10, "A", "B", 0.0),
            ],
            Capabilities::default(),
        );

        let stats = report_duration_stats(&table);
        assert_eq!(stats.trips, 3);
        assert_eq!(stats.total_seconds, 90_000.0);
        assert_eq!(stats.total, breakdown(1, 1, 0));
        assert_eq!(stats.mean_seconds, Some(30_000.0));
        assert_eq!(stats.average, Some(breakdown(0, 8, 20)));
    }

    #[test]
    fn test_empty_table_has_zero_total_and_no_average() {
        let stats = report_duration_stats(&TripTable::default());
        assert_eq!(stats.trips, 0);
        assert_eq!(stats.total_seconds, 0.0);
        assert_eq!(stats.total, DurationBreakdown::default());
        assert_eq!(stats.mean_seconds, None);
        assert_eq!(stats.average, None);
    }
}
