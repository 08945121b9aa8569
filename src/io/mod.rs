//! Input/output helpers.
//!
//! - FRED CSV download ingest (`ingest`)
//! - series CSV export (`export`)
//! - analysis report JSON (`report`)

pub mod export;
pub mod ingest;
pub mod report;

pub use export::*;
pub use ingest::*;
pub use report::*;
