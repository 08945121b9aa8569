//! FRED CSV download ingest.
//!
//! FRED's "Download CSV" produces two columns: a date column (`DATE` in older
//! exports, `observation_date` in newer ones) and one value column named after
//! the series code. Missing values are written as `.`.
//!
//! Rows with missing values are skipped silently (that is normal FRED output);
//! rows with unparseable dates are skipped and counted.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::data::fred::parse_value;
use crate::domain::{Observation, Series, SeriesMetadata};
use crate::error::AppError;

const DATE_HEADERS: [&str; 3] = ["date", "observation_date", "date_of_obs"];

/// Ingest output: the series plus row accounting.
#[derive(Debug, Clone)]
pub struct CsvSeries {
    pub series: Series,
    pub rows_read: usize,
    pub rows_missing: usize,
    pub rows_invalid: usize,
}

pub fn load_fred_csv(path: &Path) -> Result<CsvSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_fred_csv(file)
}

pub fn read_fred_csv<R: Read>(reader: R) -> Result<CsvSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let (date_idx, value_idx) = locate_columns(&headers)?;
    let code = normalize_header_name(&headers[value_idx]).to_string();

    let mut observations = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_missing = 0usize;
    let mut rows_invalid = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, "CSV parse error: {e}");
                rows_invalid += 1;
                continue;
            }
        };

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(line, "invalid date '{raw_date}': {e}");
                rows_invalid += 1;
                continue;
            }
        };

        match record.get(value_idx).and_then(parse_value) {
            Some(value) => observations.push(Observation::new(date, value)),
            None => rows_missing += 1,
        }
    }

    observations.sort_by_key(|o| o.date);

    Ok(CsvSeries {
        series: Series {
            metadata: SeriesMetadata::new(code.clone(), code),
            observations,
        },
        rows_read,
        rows_missing,
        rows_invalid,
    })
}

fn locate_columns(headers: &StringRecord) -> Result<(usize, usize), AppError> {
    let date_idx = headers
        .iter()
        .position(|h| DATE_HEADERS.contains(&normalize_header_name(h).to_ascii_lowercase().as_str()))
        .ok_or_else(|| AppError::io("CSV has no DATE/observation_date column."))?;

    let value_idx = (0..headers.len())
        .find(|&i| i != date_idx && !normalize_header_name(&headers[i]).is_empty())
        .ok_or_else(|| AppError::io("CSV has no value column."))?;

    Ok((date_idx, value_idx))
}

fn normalize_header_name(name: &str) -> &str {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. Without stripping it the date column goes unrecognized.
    name.trim().trim_start_matches('\u{feff}')
}
