use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::filter::FilterSpec;
use crate::reporters::types::{DurationStats, SectionTimings, StationStats, TimeStats, UserStats};
use crate::reporters::{
    report_duration_stats, report_station_stats, report_time_stats, report_user_stats,
};
use crate::table::{LoadSummary, TripTable};

/// Everything printed for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub filter: FilterSpec,
    pub load: LoadSummary,
    pub rows: usize,
    pub time: TimeStats,
    pub station: StationStats,
    pub duration: DurationStats,
    pub user: UserStats,
    pub timings: SectionTimings,
}

fn timed<T>(run: impl FnOnce() -> T) -> (T, f64) {
    let started = Instant::now();
    let value = run();
    (value, started.elapsed().as_secs_f64())
}

impl TripReport {
    /// Runs all four reporters over an already filtered table, timing each one.
    pub fn build(filter: FilterSpec, table: &TripTable) -> Self {
        let (time, time_secs) = timed(|| report_time_stats(table));
        let (station, station_secs) = timed(|| report_station_stats(table));
        let (duration, duration_secs) = timed(|| report_duration_stats(table));
        let (user, user_secs) = timed(|| report_user_stats(table));

        let report = TripReport {
            filter,
            load: table.load_summary(),
            rows: table.len(),
            time,
            station,
            duration,
            user,
            timings: SectionTimings {
                time: time_secs,
                station: station_secs,
                duration: duration_secs,
                user: user_secs,
            },
        };
        info!(
            filter = %filter,
            rows = report.rows,
            elapsed = report.timings.total(),
            "Report built"
        );
        report
    }
}
