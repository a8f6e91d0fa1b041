//! Filter criteria chosen by the user before a dataset is loaded.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::calendar::{Month, Weekday};

/// One of the three fixed bikeshare datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Key typed at the prompt.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Source CSV file name, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for City {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown city '{s}'"))
    }
}

/// Which time dimensions the user constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Month,
    Day,
    Both,
    None,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Month,
        FilterKind::Day,
        FilterKind::Both,
        FilterKind::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Month => "month",
            FilterKind::Day => "day",
            FilterKind::Both => "both",
            FilterKind::None => "none",
        }
    }

    pub fn filters_month(self) -> bool {
        matches!(self, FilterKind::Month | FilterKind::Both)
    }

    pub fn filters_day(self) -> bool {
        matches!(self, FilterKind::Day | FilterKind::Both)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown filter '{s}'"))
    }
}

/// The tuple handed from filter selection to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub city: City,
    pub kind: FilterKind,
    pub month: Option<Month>,
    pub weekday: Option<Weekday>,
}

impl Selection {
    pub fn unfiltered(city: City) -> Self {
        Self {
            city,
            kind: FilterKind::None,
            month: None,
            weekday: None,
        }
    }
}
