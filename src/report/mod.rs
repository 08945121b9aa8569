//! Reporting: formatted terminal output for syncs, batches and analyses.
//!
//! Formatting lives in one place so the sync and analysis code stays free of
//! presentation and output changes stay localized.

pub mod format;

pub use format::*;
