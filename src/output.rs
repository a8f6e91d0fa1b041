//! Console rendering of reports and raw-data pages.
//!
//! Supports human-readable text and pretty-printed JSON.

use anyhow::Result;
use std::fmt::Display;
use std::io::Write;

use crate::calendar::Month;
use crate::pager::Page;
use crate::stats::{
    DurationReport, Frequency, StationReport, TimeReport, TripReports, UserReport,
};

const RULE_WIDTH: usize = 40;

/// Writes all four reports in the human-readable layout.
pub fn print_pretty<W: Write>(w: &mut W, reports: &TripReports) -> Result<()> {
    print_time(w, &reports.time)?;
    print_station(w, &reports.station)?;
    print_duration(w, &reports.duration)?;
    print_user(w, &reports.user)?;
    Ok(())
}

/// Writes all four reports as pretty-printed JSON.
pub fn print_json<W: Write>(w: &mut W, reports: &TripReports) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, reports)?;
    writeln!(w)?;
    Ok(())
}

pub fn print_time<W: Write>(w: &mut W, report: &TimeReport) -> Result<()> {
    writeln!(w, "\nCalculating The Most Frequent Times of Travel...\n")?;

    let mut parts = Vec::new();
    if let Some(month) = &report.month {
        let month = month.clone().map(|m| match Month::from_ordinal(m) {
            Some(name) => name.to_string(),
            None => m.to_string(),
        });
        parts.push(frequency("Most popular month", &month));
    }
    if let Some(weekday) = &report.weekday {
        parts.push(frequency("Most popular day of week", weekday));
    }
    parts.push(frequency("Most popular hour", &report.hour));
    parts.push(format!("Filter: {}", report.filter));
    writeln!(w, "{}", parts.join(", "))?;

    footer(w, report.elapsed.as_secs_f64())
}

pub fn print_station<W: Write>(w: &mut W, report: &StationReport) -> Result<()> {
    writeln!(w, "\nCalculating The Most Popular Stations and Trip...\n")?;
    writeln!(
        w,
        "{} - {}, Filter: {}",
        frequency("Start Station", &report.start_station),
        frequency("End Station", &report.end_station),
        report.filter
    )?;
    writeln!(
        w,
        "{}, Filter: {}",
        frequency("Trip", &report.route),
        report.filter
    )?;
    footer(w, report.elapsed.as_secs_f64())
}

pub fn print_duration<W: Write>(w: &mut W, report: &DurationReport) -> Result<()> {
    writeln!(w, "\nCalculating Trip Duration...\n")?;
    let mean = match report.mean {
        Some(mean) => mean.to_string(),
        None => "no data".to_string(),
    };
    writeln!(
        w,
        "Total Duration: {}, Count: {}, Avg Duration: {}, Filter: {}",
        report.total, report.count, mean, report.filter
    )?;
    footer(w, report.elapsed.as_secs_f64())
}

pub fn print_user<W: Write>(w: &mut W, report: &UserReport) -> Result<()> {
    writeln!(w, "\nCalculating User Stats...\n")?;

    if let Some(gender) = &report.gender {
        writeln!(
            w,
            "Male: {}, Female: {}, Filter: {}",
            gender.male, gender.female, report.filter
        )?;
    }

    if let Some(birth_year) = &report.birth_year {
        writeln!(
            w,
            "Earliest Birth Year: {}, Most recent Birth Year: {}, {}, Filter: {}",
            or_no_data(birth_year.earliest),
            or_no_data(birth_year.latest),
            frequency("Most Common Birth Year", &birth_year.most_common),
            report.filter
        )?;
    }

    writeln!(
        w,
        "Subscribers: {}, Customers: {}, Filter: {}",
        report.subscribers, report.customers, report.filter
    )?;
    footer(w, report.elapsed.as_secs_f64())
}

/// Writes each row of a page as a block of `column: value` lines.
pub fn print_page<W: Write>(w: &mut W, page: &Page) -> Result<()> {
    for row in &page.rows {
        writeln!(w, "{}", "-".repeat(RULE_WIDTH))?;
        for (column, value) in &row.fields {
            if column.is_empty() {
                writeln!(w, "\"\" : {value},")?;
            } else {
                writeln!(w, "{column}: {value},")?;
            }
        }
    }
    Ok(())
}

fn frequency<T: Display>(label: &str, freq: &Frequency<T>) -> String {
    match freq {
        Frequency::Found { value, count } => format!("{label}: {value}, Count: {count}"),
        Frequency::NoData => format!("{label}: no data"),
    }
}

fn or_no_data(value: Option<i32>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| v.to_string())
}

fn footer<W: Write>(w: &mut W, secs: f64) -> Result<()> {
    writeln!(w, "\nThis took {secs} seconds.")?;
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))?;
    Ok(())
}
