//! Pages through the raw rows of a trip table.

use serde::Serialize;

use crate::loader::{OptionalColumn, TripRecord, TripTable};

/// Shown in place of a missing value.
pub const PLACEHOLDER: &str = "no information";

pub const PAGE_SIZE: usize = 5;

/// A raw row rendered as ordered `(column, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub fields: Vec<(&'static str, String)>,
}

impl DisplayRow {
    fn new(record: &TripRecord, with_gender: bool, with_birth_year: bool) -> Self {
        let mut fields = vec![
            ("", or_placeholder(record.index.clone())),
            (
                "Start Time",
                record.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            ("End Time", or_placeholder(record.end_time.clone())),
            (
                "Trip Duration",
                or_placeholder(record.trip_duration.map(|d| d.to_string())),
            ),
            ("Start Station", or_placeholder(record.start_station.clone())),
            ("End Station", or_placeholder(record.end_station.clone())),
            (
                "User Type",
                or_placeholder(record.user_type.as_ref().map(ToString::to_string)),
            ),
        ];
        if with_gender {
            fields.push((
                "Gender",
                or_placeholder(record.gender.as_ref().map(ToString::to_string)),
            ));
        }
        if with_birth_year {
            fields.push((
                "Birth Year",
                or_placeholder(record.birth_year.map(|y| y.to_string())),
            ));
        }
        DisplayRow { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// One batch of rows and whether more follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub rows: Vec<DisplayRow>,
    pub more_remaining: bool,
}

/// Hands out consecutive pages of a table, never repeating a row.
pub struct RowPager<'a> {
    table: &'a TripTable,
    page_size: usize,
    cursor: usize,
}

impl<'a> RowPager<'a> {
    pub fn new(table: &'a TripTable) -> Self {
        Self::with_page_size(table, PAGE_SIZE)
    }

    pub fn with_page_size(table: &'a TripTable, page_size: usize) -> Self {
        Self {
            table,
            page_size: page_size.max(1),
            cursor: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.table.len()
    }

    pub fn next_page(&mut self) -> Page {
        let with_gender = self.table.has_column(OptionalColumn::Gender);
        let with_birth_year = self.table.has_column(OptionalColumn::BirthYear);

        let records = self.table.records();
        let end = (self.cursor + self.page_size).min(records.len());
        let rows = records[self.cursor..end]
            .iter()
            .map(|r| DisplayRow::new(r, with_gender, with_birth_year))
            .collect();
        self.cursor = end;

        Page {
            rows,
            more_remaining: self.has_more(),
        }
    }
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}
