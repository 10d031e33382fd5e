//! The interactive explore loop: ask for filters, report, page, restart.

use std::io::Write;
use tracing::{info, warn};

use crate::city::City;
use crate::config::DatasetConfig;
use crate::error::Result;
use crate::filter::{FilterSpec, apply, parse_month_choice, parse_weekday_choice};
use crate::loader;
use crate::output::{FormatConfig, render_page, render_report, separator};
use crate::pager::{PAGE_SIZE, RowPager};
use crate::prompt::InputProvider;
use crate::reporters::TripReport;

pub const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
pub const CITY_PROMPT: &str = "Would you like to see data for Chicago, New York City, or Washington?";
pub const MONTH_PROMPT: &str =
    "Would you like to see data for one month or for all months? Type a month name (January to June) or all:";
pub const DAY_PROMPT: &str =
    "Would you like to see data for one day of the week or for all days? Type a day name or all:";
pub const RESTART_PROMPT: &str = "Would you like to restart? Enter yes or no.";
pub const BAD_CITY: &str = "Incorrect city name. Try again";
pub const BAD_INPUT: &str = "Incorrect input. Try again";

fn raw_rows_prompt() -> String {
    format!("Would you like to see {} lines of raw data? Enter yes or no.", PAGE_SIZE)
}

/// Drives one user through any number of filter selections.
pub struct Session<P, W> {
    input: P,
    out: W,
    datasets: DatasetConfig,
    format: FormatConfig,
}

impl<P: InputProvider, W: Write> Session<P, W> {
    pub fn new(input: P, out: W, datasets: DatasetConfig, format: FormatConfig) -> Self {
        Session {
            input,
            out,
            datasets,
            format,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until the user declines to restart or input runs out.
    ///
    /// Returns the number of selections that were reported on.
    pub fn run(&mut self) -> Result<usize> {
        writeln!(self.out, "{}", GREETING)?;
        let mut reported = 0;

        loop {
            let Some(spec) = self.collect_filters()? else {
                break;
            };

            match self.explore(spec) {
                Ok(true) => reported += 1,
                Ok(false) => break,
                Err(e) if e.is_dataset_unavailable() => {
                    warn!(filter = %spec, error = %e, "Skipping report");
                    writeln!(self.out, "Could not load data: {}", e)?;
                    writeln!(self.out, "{}", separator())?;
                }
                Err(e) => return Err(e),
            }

            let Some(answer) = self.input.ask(RESTART_PROMPT)? else {
                break;
            };
            if !answer.trim().eq_ignore_ascii_case("yes") {
                break;
            }
        }

        info!(reported, "Session finished");
        Ok(reported)
    }

    /// Asks for city, month and weekday, re-prompting on invalid answers.
    ///
    /// Returns `None` if input runs out first.
    pub fn collect_filters(&mut self) -> Result<Option<FilterSpec>> {
        let Some(city) = self.ask_until(CITY_PROMPT, BAD_CITY, |s| s.parse::<City>().ok())? else {
            return Ok(None);
        };
        let Some(month) = self.ask_until(MONTH_PROMPT, BAD_INPUT, |s| parse_month_choice(s).ok())?
        else {
            return Ok(None);
        };
        let Some(weekday) = self.ask_until(DAY_PROMPT, BAD_INPUT, |s| parse_weekday_choice(s).ok())?
        else {
            return Ok(None);
        };

        writeln!(self.out, "{}", separator())?;
        Ok(Some(FilterSpec {
            city,
            month,
            weekday,
        }))
    }

    fn ask_until<T>(
        &mut self,
        prompt: &str,
        complaint: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.input.ask(prompt)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => writeln!(self.out, "{}", complaint)?,
            }
        }
    }

    /// Loads, filters and reports one selection, then pages raw rows on request.
    ///
    /// Returns `false` if input ran out while paging.
    fn explore(&mut self, spec: FilterSpec) -> Result<bool> {
        let table = loader::load(spec.city, &self.datasets)?;
        let filtered = apply(&table, &spec);
        drop(table);

        let report = TripReport::build(spec, &filtered);
        write!(self.out, "{}", render_report(&report))?;

        let prompt = raw_rows_prompt();
        let mut pager = RowPager::new(&filtered);
        loop {
            let Some(answer) = self.input.ask(&prompt)? else {
                return Ok(false);
            };
            match answer.trim().to_lowercase().as_str() {
                "no" => break,
                "yes" => {
                    let page = pager.next_page();
                    if page.is_empty() {
                        writeln!(self.out, "No more rows to show.")?;
                    } else {
                        let text = render_page(&page, filtered.capabilities(), &self.format);
                        write!(self.out, "{}", text)?;
                    }
                }
                _ => writeln!(self.out, "{}", BAD_INPUT)?,
            }
        }
        writeln!(self.out, "{}", separator())?;

        Ok(true)
    }
}
