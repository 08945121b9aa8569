//! Batch sync: run Series Sync over a list of named series.
//!
//! Failures are isolated per entry: each one is logged with its cause and the
//! batch moves on to the next series. The batch itself never fails.

use crate::data::SeriesProvider;
use crate::domain::SeriesId;
use crate::error::AppError;
use crate::store::SeriesStore;
use crate::sync::{SyncFailure, SyncReport, sync_series};

/// The series mirrored when no mapping is supplied.
pub const DEFAULT_BATCH: [(&str, &str); 6] = [
    ("gdp", "A191RL1Q225SBEA"),
    ("federal_debt", "GFDEBTN"),
    ("shm", "SAHMREALTIME"),
    ("reserves", "TRESEGUSM052N"),
    ("schp", "CSUSHPISA"),
    ("reit", "WILLREITIND"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub name: String,
    pub id: SeriesId,
}

impl BatchEntry {
    pub fn new(name: impl Into<String>, id: &str) -> Result<Self, AppError> {
        Ok(Self {
            name: name.into(),
            id: SeriesId::parse(id)?,
        })
    }

    /// Parse `name=SERIES_ID`. A bare `SERIES_ID` uses the id as its name.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.split_once('=') {
            Some((name, id)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AppError::config(format!("Batch entry '{raw}' has an empty name.")));
                }
                Self::new(name, id)
            }
            None => {
                let id = SeriesId::parse(raw)?;
                Ok(Self {
                    name: id.as_str().to_string(),
                    id,
                })
            }
        }
    }

    pub fn defaults() -> Result<Vec<Self>, AppError> {
        DEFAULT_BATCH.iter().map(|(name, id)| Self::new(*name, id)).collect()
    }
}

#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Synced(SyncReport),
    Failed(SyncFailure),
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(String, BatchOutcome)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, BatchOutcome::Synced(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

pub fn sync_batch<P, S>(provider: &P, store: &mut S, entries: &[BatchEntry]) -> BatchReport
where
    P: SeriesProvider + ?Sized,
    S: SeriesStore + ?Sized,
{
    let mut report = BatchReport::default();

    for entry in entries {
        tracing::info!(name = %entry.name, series = %entry.id, "syncing series");
        let outcome = match sync_series(provider, store, &entry.id) {
            Ok(synced) => {
                tracing::info!(
                    name = %entry.name,
                    table = %synced.table.name,
                    rows = synced.rows_inserted,
                    "series synced"
                );
                BatchOutcome::Synced(synced)
            }
            Err(failure) => {
                tracing::error!(name = %entry.name, "{failure}");
                BatchOutcome::Failed(failure)
            }
        };
        report.outcomes.push((entry.name.clone(), outcome));
    }

    report
}
