//! Output formatting and persistence for trip reports.
//!
//! Supports human-readable text, JSON serialization, and CSV export of the
//! filtered rows.

use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::reporters::TripReport;
use crate::reporters::types::{Availability, DurationBreakdown, ValueCount};
use crate::table::{Capabilities, TripRecord, TripTable, weekday_name};

pub const SEPARATOR_WIDTH: usize = 40;
const NO_DATA: &str = "No data";

/// Display options for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Show every available column untruncated.
    pub wide: bool,
    /// Station names longer than this are cut in narrow mode.
    pub max_cell_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            wide: true,
            max_cell_width: 28,
        }
    }
}

impl FormatConfig {
    /// Hides gender and birth year and truncates station names.
    pub fn narrow() -> Self {
        FormatConfig {
            wide: false,
            ..Default::default()
        }
    }
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

fn month_name(number: u32) -> String {
    u8::try_from(number)
        .ok()
        .and_then(|n| chrono::Month::try_from(n).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| number.to_string())
}

fn mode_line<T>(label: &str, mode: Option<&ValueCount<T>>, show: impl Fn(&T) -> String) -> String {
    match mode {
        Some(m) => format!("{}: {} (Count: {})", label, show(&m.value), m.count),
        None => format!("{}: {}", label, NO_DATA),
    }
}

fn duration_line(label: &str, breakdown: Option<&DurationBreakdown>) -> String {
    match breakdown {
        Some(b) => format!(
            "{}: {} Days {} Hours {} Minutes",
            label, b.days, b.hours, b.minutes
        ),
        None => format!("{}: {}", label, NO_DATA),
    }
}

fn timing_line(out: &mut String, seconds: f64) {
    out.push_str(&format!("\nThis took {:.6} seconds.\n", seconds));
}

fn counts_block(out: &mut String, title: &str, counts: &[ValueCount<String>]) {
    out.push_str(&format!("{}:\n", title));
    if counts.is_empty() {
        out.push_str(&format!("  {}\n", NO_DATA));
    }
    for c in counts {
        out.push_str(&format!("  {:<20} {}\n", c.value, c.count));
    }
}

/// Renders a report as console text.
pub fn render_report(report: &TripReport) -> String {
    let mut out = String::new();
    let rule = separator();

    out.push_str(&format!("Trips for {}: {}\n", report.filter, report.rows));
    if report.load.malformed > 0 {
        out.push_str(&format!(
            "({} malformed records skipped while loading)\n",
            report.load.malformed
        ));
    }
    out.push_str(&format!("{}\n", rule));

    out.push_str("\nThe Most Frequent Times of Travel\n\n");
    let time = &report.time;
    out.push_str(&mode_line("Most common month", time.common_month.as_ref(), |m| month_name(*m)));
    out.push('\n');
    out.push_str(&mode_line(
        "Most common day of the week",
        time.common_weekday.as_ref(),
        String::clone,
    ));
    out.push('\n');
    out.push_str(&mode_line("Most common start hour", time.common_hour.as_ref(), |h| {
        h.to_string()
    }));
    out.push('\n');
    timing_line(&mut out, report.timings.time);
    out.push_str(&format!("{}\n", rule));

    out.push_str("\nThe Most Popular Stations and Trip\n\n");
    let station = &report.station;
    for (label, mode) in [
        ("Most common start station", &station.common_start_station),
        ("Most common end station", &station.common_end_station),
        ("Most common route", &station.common_route),
    ] {
        out.push_str(&mode_line(label, mode.as_ref(), String::clone));
        out.push('\n');
    }
    timing_line(&mut out, report.timings.station);
    out.push_str(&format!("{}\n", rule));

    out.push_str("\nTrip Duration\n\n");
    let duration = &report.duration;
    out.push_str(&duration_line("Total travel time", Some(&duration.total)));
    out.push('\n');
    out.push_str(&duration_line("Average travel time", duration.average.as_ref()));
    out.push('\n');
    timing_line(&mut out, report.timings.duration);
    out.push_str(&format!("{}\n", rule));

    out.push_str("\nUser Stats\n\n");
    let user = &report.user;
    counts_block(&mut out, "User type counts", &user.user_types);

    match &user.gender {
        Availability::Available(counts) => counts_block(&mut out, "\nGender counts", counts),
        Availability::Unavailable => {
            out.push_str("\nGender statistics not available for this dataset.\n")
        }
    }

    match &user.birth_year {
        Availability::Available(Some(years)) => {
            out.push_str(&format!("\nEarliest birth year: {}\n", years.earliest));
            out.push_str(&format!("Most recent birth year: {}\n", years.latest));
            out.push_str(&format!(
                "Most common birth year: {} (Count: {})\n",
                years.most_common.value, years.most_common.count
            ));
        }
        Availability::Available(None) => {
            out.push_str(&format!("\nBirth year: {}\n", NO_DATA));
        }
        Availability::Unavailable => {
            out.push_str("\nBirth year statistics not available for this dataset.\n")
        }
    }
    timing_line(&mut out, report.timings.user);
    out.push_str(&format!("{}\n", rule));

    out
}

/// Writes a report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &TripReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

/// Renders a page of raw rows as an aligned table.
///
/// Narrow mode hides gender and birth year and truncates station names.
pub fn render_page(rows: &[TripRecord], capabilities: Capabilities, format: &FormatConfig) -> String {
    let show_gender = format.wide && capabilities.has_gender;
    let show_birth_year = format.wide && capabilities.has_birth_year;
    let station = |name: &str| {
        if format.wide {
            name.to_string()
        } else {
            truncate(name, format.max_cell_width)
        }
    };

    let mut header = vec!["Start Time", "Start Station", "End Station", "Trip Duration", "User Type"];
    if show_gender {
        header.push("Gender");
    }
    if show_birth_year {
        header.push("Birth Year");
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let mut row = vec![
                r.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                station(r.start_station.as_deref().unwrap_or_default()),
                station(r.end_station.as_deref().unwrap_or_default()),
                format!("{}", r.trip_duration),
                r.user_type.clone().unwrap_or_default(),
            ];
            if show_gender {
                row.push(r.gender.clone().unwrap_or_default());
            }
            if show_birth_year {
                row.push(r.birth_year.map(|y| y.to_string()).unwrap_or_default());
            }
            row
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(col, title)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(title.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header.clone());
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// One exported row; column names follow the source files.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Start Station")]
    start_station: Option<&'a str>,
    #[serde(rename = "End Station")]
    end_station: Option<&'a str>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "User Type")]
    user_type: Option<&'a str>,
    #[serde(rename = "Gender")]
    gender: Option<&'a str>,
    #[serde(rename = "Birth Year")]
    birth_year: Option<i32>,
    month: u32,
    day_of_week: &'static str,
    hour: u32,
}

/// Writes the rows of `table` to a CSV file at `path`, replacing any existing file.
pub fn export_rows(path: &Path, table: &TripTable) -> Result<()> {
    debug!(path = %path.display(), rows = table.len(), "Exporting rows");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for record in table.records() {
        writer.serialize(ExportRow {
            start_time: record.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            start_station: record.start_station.as_deref(),
            end_station: record.end_station.as_deref(),
            trip_duration: record.trip_duration,
            user_type: record.user_type.as_deref(),
            gender: record.gender.as_deref(),
            birth_year: record.birth_year,
            month: record.month,
            day_of_week: weekday_name(record.weekday),
            hour: record.hour,
        })?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "Rows exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;
    use crate::filter::FilterSpec;
    use crate::table::test_support::trip;
    use std::fs;

    fn sample_table(capabilities: Capabilities) -> TripTable {
        TripTable::from_records(
            vec![
                trip(6, 23, 15, "Wood St & Hubbard St", "Damen Ave & Chicago Ave", 321.0)
                    .with_user_type("Subscriber")
                    .with_gender("Male")
                    .with_birth_year(1992),
                trip(6, 23, 15, "Wood St & Hubbard St", "Clark St", 90_000.0)
                    .with_user_type("Customer"),
            ],
            capabilities,
        )
    }

    #[test]
    fn test_render_report_full_dataset() {
        let table = sample_table(Capabilities::full());
        let report = TripReport::build(FilterSpec::new(City::Chicago), &table);
        let text = render_report(&report);

        assert!(text.contains("Trips for Chicago (all months, all days): 2"));
        assert!(text.contains("Most common month: June (Count: 2)"));
        assert!(text.contains("Most common day of the week: Friday (Count: 2)"));
        assert!(text.contains("Most common start station: Wood St & Hubbard St (Count: 2)"));
        assert!(text.contains("Total travel time: 1 Days 1 Hours 5 Minutes"));
        assert!(text.contains("Gender counts:"));
        assert!(text.contains("Earliest birth year: 1992"));
    }

    #[test]
    fn test_render_report_times_each_section() {
        let table = sample_table(Capabilities::full());
        let mut report = TripReport::build(FilterSpec::new(City::Chicago), &table);
        report.timings.station = 0.25;
        let text = render_report(&report);

        assert_eq!(text.matches("This took ").count(), 4);
        assert!(text.contains("This took 0.250000 seconds."));

        let station_section = text
            .split("The Most Popular Stations and Trip")
            .nth(1)
            .and_then(|rest| rest.split("Trip Duration").next())
            .unwrap();
        assert!(station_section.contains("This took 0.250000 seconds."));
    }

    #[test]
    fn test_render_report_washington_and_empty() {
        let report = TripReport::build(FilterSpec::new(City::Washington), &TripTable::default());
        let text = render_report(&report);

        assert!(text.contains("Most common month: No data"));
        assert!(text.contains("Most common route: No data"));
        assert!(text.contains("Total travel time: 0 Days 0 Hours 0 Minutes"));
        assert!(text.contains("Average travel time: No data"));
        assert!(text.contains("Gender statistics not available for this dataset."));
        assert!(text.contains("Birth year statistics not available for this dataset."));
    }

    #[test]
    fn test_write_json() {
        let table = sample_table(Capabilities::full());
        let report = TripReport::build(FilterSpec::new(City::Chicago), &table);

        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["station"]["common_end_station"]["count"], 1);
    }

    #[test]
    fn test_render_page_narrow_truncates_and_hides_optional_columns() {
        let table = sample_table(Capabilities::full());
        let rows: Vec<_> = table.records().collect();
        let format = FormatConfig {
            max_cell_width: 10,
            ..FormatConfig::narrow()
        };

        let text = render_page(&rows, table.capabilities(), &format);
        assert!(text.starts_with("Start Time"));
        assert!(text.contains("Wood St &~"));
        assert!(!text.contains("Gender"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_render_page_wide_shows_everything() {
        let table = sample_table(Capabilities::full());
        let rows: Vec<_> = table.records().collect();

        let text = render_page(&rows, table.capabilities(), &FormatConfig::default());
        assert!(text.contains("Damen Ave & Chicago Ave"));
        assert!(text.contains("Gender"));
        assert!(text.contains("1992"));
    }

    #[test]
    fn test_default_format_is_wide() {
        assert!(FormatConfig::default().wide);
        assert!(!FormatConfig::narrow().wide);
        assert_eq!(
            FormatConfig::narrow().max_cell_width,
            FormatConfig::default().max_cell_width
        );
    }

    #[test]
    fn test_render_page_blank_for_missing_station() {
        let mut record = trip(1, 2, 8, "Canal St", "Clark St", 60.0);
        record.start_station = None;

        let text = render_page(&[record], Capabilities::default(), &FormatConfig::narrow());
        let row = text.lines().nth(1).unwrap();
        assert!(!row.contains("Canal St"));
        assert!(row.contains("Clark St"));
    }

    #[test]
    fn test_export_rows_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");

        export_rows(&path, &sample_table(Capabilities::full())).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Start Time,Start Station"));
        assert!(lines[1].contains("Friday"));
    }
}
