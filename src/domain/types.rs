//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - produced by the FRED client or the CSV importer
//! - written into PostgreSQL by the sync pipeline
//! - exported to CSV/JSON alongside analysis reports

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Opaque FRED series key (e.g. `CSUSHPISA`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    /// Trim and validate a raw identifier. Blank identifiers are a config error.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::config(
                "Series identifier has not been provided.",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-supplied description of a series.
///
/// Only `id` and `title` feed into storage naming; the rest is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_adjustment: Option<String>,
}

impl SeriesMetadata {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            frequency: None,
            units: None,
            seasonal_adjustment: None,
        }
    }
}

/// One dated value. Missing provider values never make it into this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A fetched series: metadata plus observations in ascending date order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metadata: SeriesMetadata,
    pub observations: Vec<Observation>,
}

impl Series {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// Name of the surrogate key column in every destination table.
pub const PRIMARY_KEY_COLUMN: &str = "timepoint_id";

/// Name of the date column in every destination table.
pub const DATE_COLUMN: &str = "date_of_obs";

/// Destination table derived from series metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableSpec {
    pub name: String,
    pub value_column: String,
}

/// Calendar-quarter season tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Jan–Mar winter, Apr–Jun spring, Jul–Sep summer, Oct–Dec fall.
    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Season::Winter,
            4..=6 => Season::Spring,
            7..=9 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_id_trims_and_rejects_blank() {
        assert_eq!(SeriesId::parse("  GFDEBTN ").unwrap().as_str(), "GFDEBTN");
        assert!(SeriesId::parse("   ").is_err());
    }

    #[test]
    fn seasons_follow_calendar_quarters() {
        assert_eq!(Season::of(d(2020, 1, 1)), Season::Winter);
        assert_eq!(Season::of(d(2020, 3, 31)), Season::Winter);
        assert_eq!(Season::of(d(2020, 4, 1)), Season::Spring);
        assert_eq!(Season::of(d(2020, 8, 15)), Season::Summer);
        assert_eq!(Season::of(d(2020, 12, 31)), Season::Fall);
    }
}
