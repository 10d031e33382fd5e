//! Descriptive statistics over a filtered trip table.
//!
//! Each reporter is a pure function from a [`TripTable`](crate::table::TripTable)
//! to a serializable stats struct. An empty table never panics: aggregates
//! that are undefined on no rows come back as `None`.

pub mod duration;
pub mod report;
pub mod station;
pub mod time;
pub mod types;
pub mod user;
pub mod utility;

pub use duration::report_duration_stats;
pub use report::TripReport;
pub use station::report_station_stats;
pub use time::report_time_stats;
pub use user::report_user_stats;
