//! In-process `SeriesStore`.
//!
//! Behaves like the PostgreSQL store where the sync pipeline can observe it:
//! duplicate tables are schema errors, inserts are all-or-nothing, surrogate
//! keys start at 1 and increase. It also records the SQL that would have been
//! sent, which is what `--dry-run` prints.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Observation, TableSpec};
use crate::error::AppError;
use crate::store::sql::{create_table_sql, insert_sql};
use crate::store::{SeriesStore, check_finite};

/// One stored row, including its assigned surrogate key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredRow {
    pub id: i64,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone)]
struct MemoryTable {
    value_column: String,
    rows: Vec<StoredRow>,
    next_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, MemoryTable>,
    statements: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn value_column(&self, name: &str) -> Option<&str> {
        self.tables.get(name).map(|t| t.value_column.as_str())
    }

    pub fn rows(&self, name: &str) -> Option<&[StoredRow]> {
        self.tables.get(name).map(|t| t.rows.as_slice())
    }

    /// Statements accepted so far, in order. Inserts are recorded once per batch.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

impl SeriesStore for MemoryStore {
    fn create_table(&mut self, table: &TableSpec) -> Result<(), AppError> {
        if self.tables.contains_key(&table.name) {
            return Err(AppError::schema(format!(
                "Table {} already exists: relation \"{}\" already exists",
                table.name, table.name
            )));
        }

        self.tables.insert(
            table.name.clone(),
            MemoryTable {
                value_column: table.value_column.clone(),
                rows: Vec::new(),
                next_id: 1,
            },
        );
        self.statements.push(format!("{};", create_table_sql(table)));
        Ok(())
    }

    fn insert_observations(&mut self, table: &TableSpec, observations: &[Observation]) -> Result<u64, AppError> {
        check_finite(table, observations)?;

        let stored = self.tables.get_mut(&table.name).ok_or_else(|| {
            AppError::store(format!("Insert into {} failed: relation does not exist", table.name))
        })?;
        if stored.value_column != table.value_column {
            return Err(AppError::store(format!(
                "Insert into {} failed: column \"{}\" does not exist",
                table.name, table.value_column
            )));
        }

        for obs in observations {
            stored.rows.push(StoredRow {
                id: stored.next_id,
                date: obs.date,
                value: obs.value,
            });
            stored.next_id += 1;
        }

        self.statements.push(format!(
            "{}; -- {} rows",
            insert_sql(table),
            observations.len()
        ));
        Ok(observations.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn spec() -> TableSpec {
        TableSpec {
            name: "gross_federal_debt".to_string(),
            value_column: "gfdebtn".to_string(),
        }
    }

    #[test]
    fn create_then_insert_assigns_increasing_keys() {
        let mut store = MemoryStore::new();
        store.create_table(&spec()).unwrap();
        let obs = [Observation::new(d(2020, 1, 1), 1.0), Observation::new(d(2020, 2, 1), 2.0)];
        assert_eq!(store.insert_observations(&spec(), &obs).unwrap(), 2);
        assert_eq!(store.value_column("gross_federal_debt"), Some("gfdebtn"));
        assert_eq!(store.value_column("missing"), None);

        let rows = store.rows("gross_federal_debt").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].id, rows[0].date, rows[0].value), (1, d(2020, 1, 1), 1.0));
        assert_eq!((rows[1].id, rows[1].date, rows[1].value), (2, d(2020, 2, 1), 2.0));
    }

    #[test]
    fn duplicate_create_is_a_schema_error() {
        let mut store = MemoryStore::new();
        store.create_table(&spec()).unwrap();
        let err = store.create_table(&spec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(store.statements().len(), 1);
    }

    #[test]
    fn insert_without_table_is_a_store_error() {
        let mut store = MemoryStore::new();
        let obs = [Observation::new(d(2020, 1, 1), 1.0)];
        assert_eq!(
            store.insert_observations(&spec(), &obs).unwrap_err().kind(),
            ErrorKind::Store
        );
    }

    #[test]
    fn non_finite_batch_writes_nothing() {
        let mut store = MemoryStore::new();
        store.create_table(&spec()).unwrap();
        let obs = [Observation::new(d(2020, 1, 1), 1.0), Observation::new(d(2020, 2, 1), f64::INFINITY)];
        assert!(store.insert_observations(&spec(), &obs).is_err());
        assert!(store.rows("gross_federal_debt").unwrap().is_empty());
    }
}
