//! CSV loader for a city's trip log.
//!
//! Reads the whole file into a [`TripTable`], parsing the start time of every
//! row and deriving its calendar columns. Rows that cannot be decoded are
//! dropped and counted rather than failing the load.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::city::City;
use crate::config::DatasetConfig;
use crate::error::{ExploreError, Result};
use crate::table::{Capabilities, LoadSummary, TripRecord, TripTable};

pub const START_TIME: &str = "Start Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [START_TIME, START_STATION, END_STATION, TRIP_DURATION, USER_TYPE];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// A single row as it appears in the source CSV.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    // Empty cells become None
    #[serde(rename = "Start Station")]
    start_station: Option<String>,
    #[serde(rename = "End Station")]
    end_station: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // Stored as a float ("1989.0") in the source files
    #[serde(rename = "Birth Year", default, deserialize_with = "csv::invalid_option")]
    birth_year: Option<f64>,
}

/// Loads the trip table for `city` from the file named by `config`.
///
/// # Errors
///
/// Returns [`ExploreError::DatasetUnavailable`] if the file cannot be opened,
/// its header cannot be read, or a required column is missing.
#[tracing::instrument(skip(config), fields(city = %city))]
pub fn load(city: City, config: &DatasetConfig) -> Result<TripTable> {
    let path = config.path_for(city);
    load_path(city, &path)
}

/// Loads a trip table from an explicit file path.
pub fn load_path(city: City, path: &Path) -> Result<TripTable> {
    debug!(path = %path.display(), "Opening dataset");
    let file = File::open(path).map_err(|e| ExploreError::DatasetUnavailable {
        city,
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    read_table(city, path, file)
}

/// Loads a trip table from any reader producing CSV text.
pub fn load_from_reader<R: Read>(city: City, reader: R) -> Result<TripTable> {
    read_table(city, Path::new("<reader>"), reader)
}

fn read_table<R: Read>(city: City, path: &Path, reader: R) -> Result<TripTable> {
    let unavailable = |reason: String| ExploreError::DatasetUnavailable {
        city,
        path: path.to_path_buf(),
        reason,
    };

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(|e| unavailable(e.to_string()))?.clone();
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !has_column(&headers, column))
    {
        return Err(unavailable(format!("missing required column '{}'", column)));
    }

    let capabilities = Capabilities {
        has_gender: has_column(&headers, GENDER),
        has_birth_year: has_column(&headers, BIRTH_YEAR),
    };
    debug!(?capabilities, "Dataset header read");

    let mut table = TripTable::new(capabilities);
    let mut summary = LoadSummary::default();

    for (index, result) in rdr.deserialize::<RawTrip>().enumerate() {
        summary.rows_read += 1;
        // Header is line 1
        let line = index + 2;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(unavailable(e.to_string())),
            Err(e) => {
                summary.malformed += 1;
                warn!(line, error = %e, "Malformed record skipped");
                continue;
            }
        };

        let Some(start_time) = parse_start_time(&raw.start_time) else {
            summary.malformed += 1;
            warn!(line, start_time = %raw.start_time, "Unparseable start time, record skipped");
            continue;
        };

        table.push(to_record(raw, start_time, capabilities));
        summary.rows_kept += 1;
    }

    table.set_load_summary(summary);
    info!(
        city = %city,
        rows_read = summary.rows_read,
        rows_kept = summary.rows_kept,
        malformed = summary.malformed,
        "Dataset loaded"
    );

    Ok(table)
}

fn has_column(headers: &StringRecord, name: &str) -> bool {
    headers.iter().any(|h| h == name)
}

fn to_record(raw: RawTrip, start_time: NaiveDateTime, capabilities: Capabilities) -> TripRecord {
    let mut record = TripRecord::new(start_time, "", "", raw.trip_duration);
    record.start_station = raw.start_station;
    record.end_station = raw.end_station;
    record.user_type = raw.user_type;
    if capabilities.has_gender {
        record.gender = raw.gender;
    }
    if capabilities.has_birth_year {
        // "nan" and "inf" parse as floats but are not years
        record.birth_year = raw
            .birth_year
            .filter(|year| year.is_finite())
            .map(|year| year.round() as i32);
    }
    record
}

/// Parses a start-time cell in any of the accepted formats.
pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};
    use std::io::Write;

    const CHICAGO_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Subscriber
";

    #[test]
    fn test_load_chicago_rows_and_capabilities() {
        let table = load_from_reader(City::Chicago, CHICAGO_SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.capabilities(), Capabilities::full());
        assert_eq!(table.months(), &[6, 5, 1]);
        assert_eq!(table.hours(), &[15, 18, 8]);
        assert_eq!(table.weekdays()[0], Weekday::Fri);
        assert_eq!(table.trip_durations()[1], 1610.0);
        assert_eq!(table.birth_years(), &[Some(1992), Some(1992), None]);
        assert_eq!(table.genders()[2], None);
        assert_eq!(table.user_types()[2].as_deref(), Some("Customer"));
    }

    #[test]
    fn test_load_washington_has_no_optional_columns() {
        let table = load_from_reader(City::Washington, WASHINGTON_SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.capabilities(),
            Capabilities {
                has_gender: false,
                has_birth_year: false
            }
        );
        assert!((table.trip_durations()[0] - 489.066).abs() < 1e-9);
        assert!(table.genders().iter().all(Option::is_none));
    }

    #[test]
    fn test_malformed_timestamp_rows_are_dropped() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,100,A,B,Subscriber
yesterday-ish,100,A,B,Subscriber
2017-01-02 10:00:00,not-a-number,A,B,Subscriber
2017-01-03 11:00:00,200,C,D,Customer
";
        let table = load_from_reader(City::Chicago, csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.load_summary(),
            LoadSummary {
                rows_read: 4,
                rows_kept: 2,
                malformed: 2
            }
        );
    }

    #[test]
    fn test_non_finite_birth_year_is_missing() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-01 00:07:57,100,A,B,Subscriber,Male,1990.0
2017-01-02 10:00:00,100,A,B,Subscriber,Male,nan
2017-01-03 11:00:00,100,A,B,Subscriber,Female,inf
2017-01-04 12:00:00,100,A,B,Subscriber,Female,1991.0
";
        let table = load_from_reader(City::Chicago, csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.birth_years(),
            &[Some(1990), None, None, Some(1991)]
        );
    }

    #[test]
    fn test_empty_station_cell_is_missing() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,100,,B,Subscriber
2017-01-02 10:00:00,100,A,  ,Customer
";
        let table = load_from_reader(City::Washington, csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.start_stations(), &[None, Some("A".to_string())]);
        assert_eq!(table.end_stations(), &[Some("B".to_string()), None]);
        assert_eq!(table.record(0).and_then(|r| r.route()), None);
    }

    #[test]
    fn test_missing_required_column_is_unavailable() {
        let csv = "Start Time,Start Station,End Station\n2017-01-01 00:07:57,A,B\n";
        let err = load_from_reader(City::Chicago, csv.as_bytes()).unwrap_err();

        assert!(err.is_dataset_unavailable());
        assert!(err.to_string().contains("Trip Duration"));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig::new(dir.path());

        let err = load(City::NewYorkCity, &config).unwrap_err();
        assert!(err.is_dataset_unavailable());
        assert!(err.to_string().contains("new_york_city.csv"));
    }

    #[test]
    fn test_load_reads_file_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("washington.csv")).unwrap();
        file.write_all(WASHINGTON_SAMPLE.as_bytes()).unwrap();

        let table = load(City::Washington, &DatasetConfig::new(dir.path())).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_start_time_formats() {
        let ts = parse_start_time("2017-06-23 15:09:32").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (6, 23, 15));

        assert!(parse_start_time("2017-06-23T15:09:32").is_some());
        assert!(parse_start_time("2017-06-23 15:09:32.500").is_some());
        assert!(parse_start_time("6/23/2017 15:09").is_some());
        assert!(parse_start_time("").is_none());
        assert!(parse_start_time("2017-13-40 99:00:00").is_none());
    }
}
