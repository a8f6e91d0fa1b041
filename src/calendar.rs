//! Month and weekday enumerations with explicit ordinals.
//!
//! The datasets only cover January through June, so [`Month`] stops there.
//! Weekdays follow the Monday=0 convention used for the derived column.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

/// A month present in the trip logs (January=1..June=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(n: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.ordinal() == n)
    }

    /// Lower-case name, as typed at the prompt.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&title_case(self.name()))
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown month '{s}'"))
    }
}

/// Day of the week (Monday=0..Sunday=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(n: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.ordinal() == n)
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }

    /// Weekday of a calendar date.
    pub fn of(date: &impl Datelike) -> Self {
        // num_days_from_monday is always 0..=6
        Self::ALL[date.weekday().num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&title_case(self.name()))
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown weekday '{s}'"))
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
