//! Dataset loading and filtering.
//!
//! Reads one city's CSV into a [`TripTable`], derives the calendar and
//! route fields from each row, and narrows the table by month and weekday.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::calendar::{Month, Weekday};
use crate::error::LoadError;
use crate::filters::{City, Selection};

/// Joins start and end station into the composite route field.
pub const ROUTE_SEPARATOR: &str = " -> ";

const GENDER_HEADER: &str = "Gender";
const BIRTH_YEAR_HEADER: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A row as it appears in the source CSV.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "", default)]
    index: Option<String>,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<f64>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserType {
    Subscriber,
    Customer,
    Other(String),
}

impl UserType {
    fn parse(s: &str) -> Self {
        match s {
            "Subscriber" => UserType::Subscriber,
            "Customer" => UserType::Customer,
            other => UserType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Subscriber => f.write_str("Subscriber"),
            UserType::Customer => f.write_str("Customer"),
            UserType::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    fn parse(s: &str) -> Self {
        match s {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            other => Gender::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("Male"),
            Gender::Female => f.write_str("Female"),
            Gender::Other(s) => f.write_str(s),
        }
    }
}

/// Columns only some of the datasets carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalColumn {
    Gender,
    BirthYear,
}

/// One trip plus the fields derived from it at load time.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub index: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<String>,
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,

    // derived
    pub month: u32,
    pub weekday: Weekday,
    pub hour: u32,
    pub route: Option<String>,
}

impl TripRecord {
    fn from_raw(row: usize, raw: RawTrip) -> Result<Self, LoadError> {
        let start_time =
            parse_timestamp(&raw.start_time).ok_or_else(|| LoadError::DataCorruption {
                row,
                value: raw.start_time.clone(),
            })?;

        let start_station = non_empty(raw.start_station);
        let end_station = non_empty(raw.end_station);
        let route = match (&start_station, &end_station) {
            (Some(start), Some(end)) => Some(format!("{start}{ROUTE_SEPARATOR}{end}")),
            _ => None,
        };

        Ok(TripRecord {
            index: non_empty(raw.index),
            month: start_time.month(),
            weekday: Weekday::of(&start_time),
            hour: start_time.hour(),
            start_time,
            end_time: non_empty(raw.end_time),
            trip_duration: raw.trip_duration.filter(|d| !d.is_nan()),
            start_station,
            end_station,
            route,
            user_type: non_empty(raw.user_type).map(|s| UserType::parse(&s)),
            gender: non_empty(raw.gender).map(|s| Gender::parse(&s)),
            birth_year: raw.birth_year.filter(|y| y.is_finite()).map(|y| y as i32),
        })
    }
}

/// An ordered, immutable set of trips from one dataset.
#[derive(Debug, Clone, Default)]
pub struct TripTable {
    records: Vec<TripRecord>,
    has_gender: bool,
    has_birth_year: bool,
}

impl TripTable {
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source schema carries `column`, independent of row values.
    pub fn has_column(&self, column: OptionalColumn) -> bool {
        match column {
            OptionalColumn::Gender => self.has_gender,
            OptionalColumn::BirthYear => self.has_birth_year,
        }
    }

    /// Keeps only trips that started in `month`.
    pub fn retain_month(self, month: Month) -> Self {
        self.retain(|r| r.month == month.ordinal())
    }

    /// Keeps only trips that started on `weekday`.
    pub fn retain_weekday(self, weekday: Weekday) -> Self {
        self.retain(|r| r.weekday == weekday)
    }

    fn retain(mut self, keep: impl Fn(&TripRecord) -> bool) -> Self {
        self.records.retain(|r| keep(r));
        self
    }
}

/// Parses CSV trip data from any reader.
///
/// # Errors
///
/// Returns [`LoadError::DataCorruption`] on the first row whose start time
/// cannot be parsed, and [`LoadError::Csv`] for malformed CSV.
pub fn read_trips<R: Read>(reader: R) -> Result<TripTable, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?;
    let has_gender = headers.iter().any(|h| h == GENDER_HEADER);
    let has_birth_year = headers.iter().any(|h| h == BIRTH_YEAR_HEADER);

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let raw: RawTrip = result?;
        records.push(TripRecord::from_raw(row, raw)?);
    }

    Ok(TripTable {
        records,
        has_gender,
        has_birth_year,
    })
}

/// Reads a dataset file and applies the optional month/weekday filters.
pub fn load_from_path(
    path: &Path,
    month: Option<Month>,
    weekday: Option<Weekday>,
) -> Result<TripTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut table = read_trips(file)?;
    debug!(rows = table.len(), "Dataset parsed");

    if let Some(month) = month {
        table = table.retain_month(month);
    }
    if let Some(weekday) = weekday {
        table = table.retain_weekday(weekday);
    }

    Ok(table)
}

/// Resolves `city` to its dataset under `data_dir`, loads and filters it.
#[tracing::instrument(skip_all, fields(city = %city, month = ?month, weekday = ?weekday))]
pub fn load(
    data_dir: &Path,
    city: &str,
    month: Option<Month>,
    weekday: Option<Weekday>,
) -> Result<TripTable, LoadError> {
    let city = City::from_key(city).ok_or_else(|| LoadError::DatasetNotFound(city.to_string()))?;
    let table = load_from_path(&data_dir.join(city.file_name()), month, weekday)?;
    info!(rows = table.len(), "Dataset loaded");
    Ok(table)
}

/// Loads the dataset described by a filter selection.
pub fn load_selection(data_dir: &Path, selection: &Selection) -> Result<TripTable, LoadError> {
    load(
        data_dir,
        selection.city.key(),
        selection.month,
        selection.weekday,
    )
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
