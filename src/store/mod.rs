//! Relational store for synced series.
//!
//! - `SeriesStore`: the two operations the sync pipeline needs
//! - `PgStore`: PostgreSQL, one scoped connection per call
//! - `MemoryStore`: in-process tables (dry runs and tests)
//! - `sql`: statement builders shared by both

use crate::domain::{Observation, TableSpec};
use crate::error::AppError;

pub mod memory;
pub mod pg;
pub mod sql;

pub use memory::{MemoryStore, StoredRow};
pub use pg::PgStore;

pub trait SeriesStore {
    /// Create the destination table.
    ///
    /// An existing table with the same name is a schema error; nothing is
    /// migrated or reused.
    fn create_table(&mut self, table: &TableSpec) -> Result<(), AppError>;

    /// Append all observations in order as one all-or-nothing batch.
    ///
    /// Returns the number of rows written.
    fn insert_observations(&mut self, table: &TableSpec, observations: &[Observation]) -> Result<u64, AppError>;
}

/// Reject the whole batch if any value cannot be stored as NUMERIC.
pub fn check_finite(table: &TableSpec, observations: &[Observation]) -> Result<(), AppError> {
    match observations.iter().find(|o| !o.value.is_finite()) {
        Some(bad) => Err(AppError::store(format!(
            "Refusing to insert into {}: non-numeric value {} on {}.",
            table.name, bad.value, bad.date
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn check_finite_names_the_offending_date() {
        let table = TableSpec {
            name: "gdp".to_string(),
            value_column: "gdp".to_string(),
        };
        let date = NaiveDate::from_ymd_opt(2021, 4, 1).unwrap();
        let obs = [Observation::new(date, 1.0), Observation::new(date, f64::NAN)];
        let err = check_finite(&table, &obs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(err.message().contains("2021-04-01"));
        assert!(check_finite(&table, &obs[..1]).is_ok());
    }
}
