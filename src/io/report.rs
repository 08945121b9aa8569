//! Write analysis reports as JSON.
//!
//! The JSON is the portable form of an `analyze` run:
//! - series metadata
//! - cleaning counts and season counts
//! - ADF and kurtosis results
//! - the season-tagged differenced series the statistics were computed on
//!
//! The schema is `analysis::AnalysisReport`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::analysis::AnalysisReport;
use crate::error::AppError;

pub fn write_report_json(path: &Path, report: &AnalysisReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create report JSON '{}': {e}", path.display())))?;
    write_report_json_to(file, report)
}

pub fn write_report_json_to<W: Write>(out: W, report: &AnalysisReport) -> Result<(), AppError> {
    serde_json::to_writer_pretty(out, report)
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))
}
