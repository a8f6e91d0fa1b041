//! Descriptive statistics over a [`TripTable`].
//!
//! Four independent reports (time of travel, stations, trip duration, users),
//! each a pure function of the table that returns a structured result.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::calendar::Weekday;
use crate::filters::FilterKind;
use crate::loader::{Gender, OptionalColumn, TripTable, UserType};

/// Outcome of a "most frequent value" computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Frequency<T> {
    /// No values to count (empty table after filtering).
    NoData,
    Found { value: T, count: usize },
}

impl<T> Frequency<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Frequency<U> {
        match self {
            Frequency::NoData => Frequency::NoData,
            Frequency::Found { value, count } => Frequency::Found {
                value: f(value),
                count,
            },
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Frequency::NoData => 0,
            Frequency::Found { count, .. } => *count,
        }
    }
}

/// Most frequent value and its count.
///
/// Ties resolve to the smallest value in `T`'s natural ordering.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Frequency<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        let better = match &best {
            Some((_, best_count)) => count > *best_count,
            None => true,
        };
        if better {
            best = Some((value, count));
        }
    }

    match best {
        Some((value, count)) => Frequency::Found { value, count },
        None => Frequency::NoData,
    }
}

/// Most frequent start hour, month and weekday.
///
/// `month` and `weekday` are `None` when the user already filtered on that
/// dimension; the hour is always reported.
#[derive(Debug, Clone, Serialize)]
pub struct TimeReport {
    pub filter: FilterKind,
    pub hour: Frequency<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Frequency<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<Frequency<Weekday>>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationReport {
    pub filter: FilterKind,
    pub start_station: Frequency<String>,
    pub end_station: Frequency<String>,
    pub route: Frequency<String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationReport {
    pub filter: FilterKind,
    /// Sum of trip durations in seconds.
    pub total: f64,
    /// `None` when no row has a duration.
    pub mean: Option<f64>,
    pub count: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
    pub most_common: Frequency<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserReport {
    pub filter: FilterKind,
    pub subscribers: usize,
    pub customers: usize,
    /// Present only when the dataset has a Gender column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<GenderCounts>,
    /// Present only when the dataset has a Birth Year column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<BirthYearStats>,
    pub elapsed: Duration,
}

/// All four reports for one filtered table.
#[derive(Debug, Clone, Serialize)]
pub struct TripReports {
    pub rows: usize,
    pub time: TimeReport,
    pub station: StationReport,
    pub duration: DurationReport,
    pub user: UserReport,
}

impl TripReports {
    pub fn compute(table: &TripTable, filter: FilterKind) -> Self {
        TripReports {
            rows: table.len(),
            time: time_stats(table, filter),
            station: station_stats(table, filter),
            duration: trip_duration_stats(table, filter),
            user: user_stats(table, filter),
        }
    }
}

#[tracing::instrument(skip_all, fields(rows = table.len(), filter = %filter))]
pub fn time_stats(table: &TripTable, filter: FilterKind) -> TimeReport {
    let start = Instant::now();

    let hour = mode(table.iter().map(|r| r.hour));
    let month = (!filter.filters_month()).then(|| mode(table.iter().map(|r| r.month)));
    let weekday = (!filter.filters_day()).then(|| mode(table.iter().map(|r| r.weekday)));

    let elapsed = start.elapsed();
    debug!(?elapsed, "Time stats computed");

    TimeReport {
        filter,
        hour,
        month,
        weekday,
        elapsed,
    }
}

#[tracing::instrument(skip_all, fields(rows = table.len(), filter = %filter))]
pub fn station_stats(table: &TripTable, filter: FilterKind) -> StationReport {
    let start = Instant::now();

    let start_station =
        mode(table.iter().filter_map(|r| r.start_station.as_deref())).map(str::to_string);
    let end_station =
        mode(table.iter().filter_map(|r| r.end_station.as_deref())).map(str::to_string);
    let route = mode(table.iter().filter_map(|r| r.route.as_deref())).map(str::to_string);

    let elapsed = start.elapsed();
    debug!(?elapsed, "Station stats computed");

    StationReport {
        filter,
        start_station,
        end_station,
        route,
        elapsed,
    }
}

#[tracing::instrument(skip_all, fields(rows = table.len(), filter = %filter))]
pub fn trip_duration_stats(table: &TripTable, filter: FilterKind) -> DurationReport {
    let start = Instant::now();

    let durations: Vec<f64> = table.iter().filter_map(|r| r.trip_duration).collect();
    let count = durations.len();
    let total: f64 = durations.iter().sum();
    let mean = (count > 0).then(|| total / count as f64);

    let elapsed = start.elapsed();
    debug!(?elapsed, "Trip duration stats computed");

    DurationReport {
        filter,
        total,
        mean,
        count,
        elapsed,
    }
}

#[tracing::instrument(skip_all, fields(rows = table.len(), filter = %filter))]
pub fn user_stats(table: &TripTable, filter: FilterKind) -> UserReport {
    let start = Instant::now();

    let count_user = |kind: UserType| {
        table
            .iter()
            .filter(|r| r.user_type.as_ref() == Some(&kind))
            .count()
    };
    let subscribers = count_user(UserType::Subscriber);
    let customers = count_user(UserType::Customer);

    let gender = table.has_column(OptionalColumn::Gender).then(|| {
        let count_gender =
            |g: Gender| table.iter().filter(|r| r.gender.as_ref() == Some(&g)).count();
        GenderCounts {
            male: count_gender(Gender::Male),
            female: count_gender(Gender::Female),
        }
    });

    let birth_year = table.has_column(OptionalColumn::BirthYear).then(|| {
        let years = || table.iter().filter_map(|r| r.birth_year);
        BirthYearStats {
            earliest: years().min(),
            latest: years().max(),
            most_common: mode(years()),
        }
    });

    let elapsed = start.elapsed();
    debug!(?elapsed, "User stats computed");

    UserReport {
        filter,
        subscribers,
        customers,
        gender,
        birth_year,
        elapsed,
    }
}
