//! PostgreSQL implementation of `SeriesStore`.
//!
//! Every operation opens its own connection and releases it before returning,
//! on success and on failure alike. There is no pooling: a sync makes exactly
//! two connections (create, then insert).

use std::fmt;

use postgres::error::SqlState;
use postgres::types::ToSql;
use postgres::{Client, Config, NoTls};

use crate::config::StoreConfig;
use crate::domain::{Observation, TableSpec};
use crate::error::AppError;
use crate::store::sql::{INSERT_CHUNK_ROWS, PG_IDENTIFIER_MAX, create_table_sql, insert_values_sql};
use crate::store::{SeriesStore, check_finite};

pub struct PgStore {
    config: Config,
    target: String,
}

impl PgStore {
    pub fn new(store: &StoreConfig) -> Result<Self, AppError> {
        store.validate()?;

        let mut config = Config::new();
        config.dbname(&store.database).port(store.port);
        if let Some(host) = &store.host {
            config.host(host);
        }
        if let Some(user) = &store.user {
            config.user(user);
        }
        if let Some(password) = &store.password {
            config.password(password);
        }

        Ok(Self {
            config,
            target: format!(
                "{}@{}:{}/{}",
                store.user.as_deref().unwrap_or_default(),
                store.host.as_deref().unwrap_or_default(),
                store.port,
                store.database
            ),
        })
    }

    /// Run `f` against a fresh connection that is closed when this returns.
    fn with_connection<T>(&self, f: impl FnOnce(&mut Client) -> Result<T, AppError>) -> Result<T, AppError> {
        tracing::debug!(target_db = %self.target, "connecting to PostgreSQL");
        let mut client = self
            .config
            .connect(NoTls)
            .map_err(|e| AppError::store(format!("Failed to connect to {}: {e}", self.target)))?;

        let result = f(&mut client);
        drop(client);
        tracing::debug!(target_db = %self.target, "connection closed");
        result
    }
}

impl SeriesStore for PgStore {
    fn create_table(&mut self, table: &TableSpec) -> Result<(), AppError> {
        if table.name.chars().count() > PG_IDENTIFIER_MAX {
            tracing::warn!(
                table = %table.name,
                "table name exceeds {PG_IDENTIFIER_MAX} characters; PostgreSQL will truncate it"
            );
        }

        let sql = create_table_sql(table);
        self.with_connection(|client| {
            client
                .batch_execute(&sql)
                .map_err(|e| create_table_error(&table.name, e.code(), &e))
        })?;

        tracing::info!(table = %table.name, "table created");
        Ok(())
    }

    fn insert_observations(&mut self, table: &TableSpec, observations: &[Observation]) -> Result<u64, AppError> {
        check_finite(table, observations)?;

        let inserted = self.with_connection(|client| {
            let mut tx = client
                .transaction()
                .map_err(|e| AppError::store(format!("Failed to begin transaction: {e}")))?;

            let mut inserted = 0u64;
            for chunk in observations.chunks(INSERT_CHUNK_ROWS) {
                let sql = insert_values_sql(table, chunk.len());
                let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(chunk.len() * 2);
                for obs in chunk {
                    params.push(&obs.date);
                    params.push(&obs.value);
                }
                inserted += tx.execute(sql.as_str(), &params).map_err(|e| {
                    AppError::store(format!(
                        "Insert into {} failed in rows starting {}: {e}",
                        table.name, chunk[0].date
                    ))
                })?;
            }

            // Dropping an uncommitted transaction rolls it back, so any error
            // above leaves the table untouched.
            tx.commit()
                .map_err(|e| AppError::store(format!("Failed to commit insert into {}: {e}", table.name)))?;
            Ok(inserted)
        })?;

        tracing::info!(table = %table.name, rows = inserted, "insertion complete");
        Ok(inserted)
    }
}

/// A duplicate table (42P07) is a schema conflict; anything else is a store failure.
fn create_table_error(table: &str, code: Option<&SqlState>, cause: impl fmt::Display) -> AppError {
    if code == Some(&SqlState::DUPLICATE_TABLE) {
        AppError::schema(format!("Table {table} already exists: {cause}"))
    } else {
        AppError::store(format!("Failed to create table {table}: {cause}"))
    }
}
