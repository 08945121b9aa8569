//! Shared "analysis pipeline" used by the `analyze` command.
//!
//! Resolves where the series comes from (FRED or a CSV download), loads it,
//! and runs the analysis:
//! source -> series -> clean -> difference -> ADF + kurtosis

use std::path::PathBuf;

use crate::analysis::{AnalysisReport, analyze_series};
use crate::config::ProviderConfig;
use crate::data::{FredClient, SeriesProvider};
use crate::domain::{Series, SeriesId};
use crate::error::AppError;
use crate::io::load_fred_csv;

/// Where an analysed series is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesSource {
    Fred(SeriesId),
    Csv(PathBuf),
}

impl SeriesSource {
    pub fn from_args(series: Option<&str>, csv: Option<PathBuf>) -> Result<Self, AppError> {
        match (series, csv) {
            (_, Some(path)) => Ok(SeriesSource::Csv(path)),
            (Some(raw), None) => Ok(SeriesSource::Fred(SeriesId::parse(raw)?)),
            (None, None) => Err(AppError::config("Provide a series identifier or --csv <file>.")),
        }
    }
}

/// Load the series and analyse it.
pub fn run_analysis(source: &SeriesSource, provider: &ProviderConfig) -> Result<AnalysisReport, AppError> {
    let series = match source {
        SeriesSource::Fred(id) => {
            let client = FredClient::from_config(provider)?;
            return analyze_from_provider(&client, id);
        }
        SeriesSource::Csv(path) => load_csv_series(path)?,
    };
    analyze_series(&series)
}

/// Fetch `id` from `provider` and analyse it.
pub fn analyze_from_provider<P: SeriesProvider + ?Sized>(provider: &P, id: &SeriesId) -> Result<AnalysisReport, AppError> {
    let series = provider.fetch_series(id)?;
    analyze_series(&series)
}

fn load_csv_series(path: &std::path::Path) -> Result<Series, AppError> {
    let loaded = load_fred_csv(path)?;
    tracing::info!(
        path = %path.display(),
        rows = loaded.rows_read,
        missing = loaded.rows_missing,
        invalid = loaded.rows_invalid,
        "loaded FRED CSV"
    );
    Ok(loaded.series)
}
