//! Series Sync: mirror one FRED series into a new table.
//!
//! The flow is strictly sequential:
//!
//! ```text
//! Unstarted -> Fetched -> Named -> TableReady -> Inserted -> Done
//! ```
//!
//! A failure at any step ends the run and records the last stage that
//! completed. There is no resumption; a failed run starts over from
//! `Unstarted`.
//!
//! Ordering matters for what a failure leaves behind:
//! - provider failures happen before the store is touched, so no table exists
//! - a create-table conflict stops the run before any row is inserted

use std::fmt;

use chrono::NaiveDate;

use crate::data::SeriesProvider;
use crate::domain::{SeriesId, TableSpec};
use crate::error::AppError;
use crate::store::SeriesStore;

pub mod batch;
pub mod naming;

pub use batch::*;
pub use naming::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Unstarted,
    Fetched,
    Named,
    TableReady,
    Inserted,
    Done,
}

impl SyncStage {
    pub fn display_name(self) -> &'static str {
        match self {
            SyncStage::Unstarted => "unstarted",
            SyncStage::Fetched => "fetched",
            SyncStage::Named => "named",
            SyncStage::TableReady => "table ready",
            SyncStage::Inserted => "inserted",
            SyncStage::Done => "done",
        }
    }
}

/// Summary of a completed sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub series_id: SeriesId,
    pub title: String,
    pub table: TableSpec,
    pub rows_inserted: u64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// A sync that stopped early.
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub series_id: SeriesId,
    /// Last stage that completed before the failing step.
    pub reached: SyncStage,
    pub error: AppError,
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sync of {} failed after stage '{}': {}",
            self.series_id,
            self.reached.display_name(),
            self.error
        )
    }
}

struct Progress<'a> {
    id: &'a SeriesId,
    stage: SyncStage,
}

impl<'a> Progress<'a> {
    fn new(id: &'a SeriesId) -> Self {
        Self {
            id,
            stage: SyncStage::Unstarted,
        }
    }

    fn advance(&mut self, next: SyncStage) {
        tracing::debug!(series = %self.id, from = self.stage.display_name(), to = next.display_name(), "sync stage");
        self.stage = next;
    }

    fn fail(&self, error: AppError) -> SyncFailure {
        SyncFailure {
            series_id: self.id.clone(),
            reached: self.stage,
            error,
        }
    }
}

/// Fetch a series, create its table, and insert every observation.
pub fn sync_series<P, S>(provider: &P, store: &mut S, id: &SeriesId) -> Result<SyncReport, SyncFailure>
where
    P: SeriesProvider + ?Sized,
    S: SeriesStore + ?Sized,
{
    let mut progress = Progress::new(id);

    // 1) Fetch metadata + observations.
    let series = provider.fetch_series(id).map_err(|e| progress.fail(e))?;
    progress.advance(SyncStage::Fetched);

    // 2) Derive the destination table.
    let table = derive_table_spec(&series.metadata);
    if table.value_column.is_empty() {
        return Err(progress.fail(AppError::provider(format!(
            "Metadata for series {id} has no short code to name the value column."
        ))));
    }
    progress.advance(SyncStage::Named);

    // 3) Create the table. An existing table stops the run here.
    store.create_table(&table).map_err(|e| progress.fail(e))?;
    progress.advance(SyncStage::TableReady);

    // 4) Insert all rows as one batch.
    if series.observations.is_empty() {
        tracing::warn!(series = %id, table = %table.name, "series has no observations; table left empty");
    }
    let rows_inserted = store
        .insert_observations(&table, &series.observations)
        .map_err(|e| progress.fail(e))?;
    progress.advance(SyncStage::Inserted);

    progress.advance(SyncStage::Done);
    Ok(SyncReport {
        series_id: id.clone(),
        first_date: series.first_date(),
        last_date: series.last_date(),
        title: series.metadata.title,
        table,
        rows_inserted,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use crate::data::SeriesProvider;
    use crate::domain::{Observation, Series, SeriesId, SeriesMetadata};
    use crate::error::AppError;

    /// Provider backed by a fixed map; unknown ids fail like FRED's 400.
    #[derive(Default)]
    pub struct StaticProvider {
        series: HashMap<String, Series>,
    }

    impl StaticProvider {
        pub fn with(mut self, id: &str, title: &str, values: &[(NaiveDate, f64)]) -> Self {
            self.series.insert(
                id.to_string(),
                Series {
                    metadata: SeriesMetadata::new(id, title),
                    observations: values.iter().map(|&(d, v)| Observation::new(d, v)).collect(),
                },
            );
            self
        }
    }

    impl SeriesProvider for StaticProvider {
        fn fetch_series(&self, id: &SeriesId) -> Result<Series, AppError> {
            self.series.get(id.as_str()).cloned().ok_or_else(|| {
                AppError::provider(format!(
                    "FRED request failed with status 400 Bad Request: The series {id} does not exist."
                ))
            })
        }
    }

    pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }
}
