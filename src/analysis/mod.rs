//! Exploratory analysis of a single series.
//!
//! Pipeline:
//! clean -> regularize spacing -> tag seasons -> first difference -> ADF -> kurtosis
//!
//! Every step is a pure function over observations, so the CLI can feed it a
//! series fetched from FRED or one loaded from a CSV download.

use serde::Serialize;

use crate::domain::{Season, Series, SeriesMetadata};
use crate::error::AppError;

pub mod adf;
pub mod clean;
pub mod kurtosis;
pub mod transform;

pub use adf::*;
pub use clean::*;
pub use kurtosis::*;
pub use transform::*;

/// Fewest cleaned observations we are willing to analyse.
pub const MIN_OBSERVATIONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: SeriesMetadata,
    pub observations_read: usize,
    pub dropped_non_finite: usize,
    pub dropped_irregular: usize,
    pub season_counts: Vec<(Season, usize)>,
    pub adf: AdfResult,
    pub kurtosis: KurtosisDecomposition,
    /// The differenced series the statistics were computed on.
    pub differenced: Vec<TaggedObservation>,
}

impl AnalysisReport {
    /// The observation carrying the largest kurtosis contribution.
    pub fn kurtosis_observation(&self) -> Option<&TaggedObservation> {
        self.differenced.get(self.kurtosis.max_index)
    }
}

pub fn analyze_series(series: &Series) -> Result<AnalysisReport, AppError> {
    let observations_read = series.observations.len();

    // 1) Cleaning.
    let (clean, dropped_non_finite) = drop_non_finite(&series.observations);
    let (regular, dropped_irregular) = regularize_spacing(&clean);
    if dropped_irregular > 0 {
        tracing::info!(series = %series.metadata.id, dropped = dropped_irregular, "dropped irregularly spaced observations");
    }
    if regular.len() < MIN_OBSERVATIONS {
        return Err(AppError::analysis(format!(
            "Series {} has {} usable observations; at least {MIN_OBSERVATIONS} are required.",
            series.metadata.id,
            regular.len()
        )));
    }

    // 2) Seasons + first difference.
    let tagged = tag_seasons(&regular);
    let differenced = first_difference(&tagged);
    let values: Vec<f64> = differenced.iter().map(|o| o.value).collect();

    // 3) Statistics on the differenced series.
    let adf = adf_test(&values)?;
    let kurtosis = kurtosis_decomposition(&values)?;

    Ok(AnalysisReport {
        metadata: series.metadata.clone(),
        observations_read,
        dropped_non_finite,
        dropped_irregular,
        season_counts: season_counts(&differenced),
        adf,
        kurtosis,
        differenced,
    })
}
