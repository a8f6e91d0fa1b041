//! Interactive session: filter selection, reports, raw-data paging, restart.
//!
//! All user interaction goes through the [`Prompt`] trait so the loop can be
//! driven from stdin or from a script.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info};

use crate::calendar::{Month, Weekday};
use crate::config::OutputFormat;
use crate::filters::{City, FilterKind, Selection};
use crate::loader::{TripTable, load_selection};
use crate::output;
use crate::pager::RowPager;
use crate::stats::TripReports;

pub const INVALID_CHOICE: &str = "Please choose one of the possible definitions as written below.";

/// Request/response channel to the user.
pub trait Prompt {
    /// Shows `question` and returns the trimmed answer, or `None` once input is closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Shows a message that needs no answer.
    fn say(&mut self, message: &str) -> Result<()>;
}

/// A [`Prompt`] over any line-oriented reader and writer (stdin/stdout in the binary).
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

/// Asks until the answer parses as `T`.
pub fn choose<T: FromStr, P: Prompt>(prompt: &mut P, question: &str) -> Result<Option<T>> {
    loop {
        let Some(answer) = prompt.ask(question)? else {
            return Ok(None);
        };
        match answer.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => prompt.say(INVALID_CHOICE)?,
        }
    }
}

/// Collects city, filter kind, and the month/weekday that kind calls for.
pub fn select_filters<P: Prompt>(prompt: &mut P) -> Result<Option<Selection>> {
    prompt.say("Hello! Let's explore some US bikeshare data!")?;

    let Some(city) = choose::<City, _>(
        prompt,
        "Choose one of the following cities: Chicago, New York City or Washington: ",
    )?
    else {
        return Ok(None);
    };

    let Some(kind) = choose::<FilterKind, _>(
        prompt,
        "Would you like to filter the data by month, day, both or not at all?\nType \"None\" for no time filter: ",
    )?
    else {
        return Ok(None);
    };

    let month = if kind.filters_month() {
        match choose::<Month, _>(prompt, "Choose the month: January, February, ... , June: ")? {
            Some(month) => Some(month),
            None => return Ok(None),
        }
    } else {
        None
    };

    let weekday = if kind.filters_day() {
        match choose::<Weekday, _>(prompt, "Choose the weekday: Monday, Tuesday, ... Sunday: ")? {
            Some(weekday) => Some(weekday),
            None => return Ok(None),
        }
    } else {
        None
    };

    prompt.say(&"-".repeat(40))?;

    Ok(Some(Selection {
        city,
        kind,
        month,
        weekday,
    }))
}

/// Pages through `table` five rows at a time for as long as the user asks.
pub fn show_raw_data<P: Prompt, W: Write>(prompt: &mut P, out: &mut W, table: &TripTable) -> Result<()> {
    let mut pager = RowPager::new(table);
    let mut question = "Do you want to see the raw data? Type \"Yes\" or \"No\".";

    loop {
        let Some(answer) = prompt.ask(question)? else {
            return Ok(());
        };
        if answer.eq_ignore_ascii_case("no") {
            return Ok(());
        }

        let page = pager.next_page();
        output::print_page(out, &page)?;
        if !page.more_remaining {
            prompt.say("No more entries to show.")?;
            return Ok(());
        }
        question = "Do you want to see more entries? Type \"Yes\" or \"No\".";
    }
}

/// Runs one load-report-page cycle for a selection.
#[tracing::instrument(skip_all, fields(city = %selection.city, filter = %selection.kind))]
pub fn run_once<P: Prompt, W: Write>(
    prompt: &mut P,
    out: &mut W,
    data_dir: &Path,
    format: OutputFormat,
    selection: &Selection,
) -> Result<()> {
    let table = load_selection(data_dir, selection)
        .with_context(|| format!("Dataset Loader failed for {}", selection.city))?;

    let reports = TripReports::compute(&table, selection.kind);
    let written = match format {
        OutputFormat::Pretty => output::print_pretty(out, &reports),
        OutputFormat::Json => output::print_json(out, &reports),
    };
    written.context("Failed to write reports")?;
    out.flush()?;

    show_raw_data(prompt, out, &table).context("Raw Row Pager failed")
}

/// Repeats filter selection and reporting until the user declines to restart.
///
/// A failed cycle is reported to the user and does not end the session.
pub fn run_session<P: Prompt, W: Write>(
    prompt: &mut P,
    out: &mut W,
    data_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    loop {
        let Some(selection) = select_filters(prompt)? else {
            break;
        };
        info!(?selection, "Filters selected");

        if let Err(e) = run_once(prompt, out, data_dir, format, &selection) {
            error!(error = %format!("{e:#}"), "Report cycle failed");
            prompt.say(&format!("Error: {e:#}"))?;
        }

        let restart = prompt.ask("\nWould you like to restart? Enter yes or no.\n")?;
        if !restart.is_some_and(|a| a.eq_ignore_ascii_case("yes")) {
            break;
        }
    }

    info!("Session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(script: &str) -> LinePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompt::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_choose_retries_until_valid() {
        let mut p = prompt("paris\n  Chicago \n");
        let city = choose::<City, _>(&mut p, "city? ").unwrap();
        assert_eq!(city, Some(City::Chicago));

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(shown.matches(INVALID_CHOICE).count(), 1);
    }

    #[test]
    fn test_choose_returns_none_on_closed_input() {
        let mut p = prompt("");
        assert_eq!(choose::<Month, _>(&mut p, "month? ").unwrap(), None);
    }

    #[test]
    fn test_select_filters_both() {
        let mut p = prompt("washington\nboth\nmarch\nsunday\n");
        let selection = select_filters(&mut p).unwrap().unwrap();
        assert_eq!(
            selection,
            Selection {
                city: City::Washington,
                kind: FilterKind::Both,
                month: Some(Month::March),
                weekday: Some(Weekday::Sunday),
            }
        );
    }

    #[test]
    fn test_select_filters_skips_unrequested_dimensions() {
        let mut p = prompt("new york city\nday\nfriday\n");
        let selection = select_filters(&mut p).unwrap().unwrap();
        assert_eq!(selection.kind, FilterKind::Day);
        assert_eq!(selection.month, None);
        assert_eq!(selection.weekday, Some(Weekday::Friday));

        let mut p = prompt("chicago\nnone\n");
        let selection = select_filters(&mut p).unwrap().unwrap();
        assert_eq!(selection, Selection::unfiltered(City::Chicago));
    }

    #[test]
    fn test_show_raw_data_declined() {
        let table = TripTable::default();
        let mut p = prompt("no\n");
        let mut out = Vec::new();
        show_raw_data(&mut p, &mut out, &table).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_session_reports_load_failure_and_exits() {
        let dir = std::env::temp_dir().join("bikeshare_stats_session_empty");
        let mut p = prompt("chicago\nnone\nno\n");
        let mut out = Vec::new();

        run_session(&mut p, &mut out, &dir, OutputFormat::Pretty).unwrap();

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("Error: Dataset Loader failed for chicago"));
        assert!(out.is_empty());
    }
}
