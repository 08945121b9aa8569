//! Export a series to CSV in the same shape as its database table.
//!
//! Header is `date_of_obs,<code>`, one row per observation. The surrogate key
//! is not exported; it only exists once rows are in PostgreSQL.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DATE_COLUMN, Observation, TableSpec};
use crate::error::AppError;

pub fn write_series_csv(path: &Path, table: &TableSpec, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series_csv_to(file, table, observations)
}

pub fn write_series_csv_to<W: Write>(out: W, table: &TableSpec, observations: &[Observation]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    writer
        .write_record([DATE_COLUMN, table.value_column.as_str()])
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for obs in observations {
        writer
            .write_record([obs.date.to_string(), obs.value.to_string()])
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
