use serde::Serialize;
use serde_json::Value;

use crate::{
    error::ViolationKind,
    schema::{Fields, FromRaw, Loc, Violations},
};

/// A possibly partial calendar date as `date-parts`, e.g. `[[2020, 3]]` for March 2020.
///
/// The first part always starts with a year; a missing month or day reads as 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Date {
    date_parts: Vec<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

impl Date {
    /// `None` unless the first part has a year.
    pub fn new(date_parts: Vec<Vec<i64>>) -> Option<Self> {
        date_parts.first().filter(|p| !p.is_empty())?;
        Some(Date {
            date_parts,
            date_time: None,
            timestamp: None,
        })
    }

    fn part(&self, i: usize) -> Option<i64> {
        self.date_parts.first().and_then(|p| p.get(i)).copied()
    }

    pub fn year(&self) -> i64 {
        // Guaranteed by construction.
        self.part(0).unwrap_or_default()
    }

    pub fn month(&self) -> i64 {
        self.part(1).unwrap_or(1)
    }

    pub fn day(&self) -> i64 {
        self.part(2).unwrap_or(1)
    }

    pub fn date_time(&self) -> Option<&str> {
        self.date_time.as_deref()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// `[[date:YYYY-MM-DD]]`
    pub fn render(&self) -> String {
        format!(
            "[[date:{}-{:02}-{:02}]]",
            self.year(),
            self.month(),
            self.day()
        )
    }
}

impl FromRaw for Date {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let date_parts: Option<Vec<Vec<i64>>> = f.required("date_parts");
        let date_time = f.optional("date_time");
        let timestamp = f.optional("timestamp");

        let date_parts = date_parts?;
        let Some(date) = Date::new(date_parts) else {
            let loc = f.loc("date_parts");
            f.violations().push(loc, ViolationKind::NoYear);
            return None;
        };
        Some(Date {
            date_time,
            timestamp,
            ..date
        })
    }
}
