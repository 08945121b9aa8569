//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - series identity and provider metadata (`SeriesId`, `SeriesMetadata`)
//! - observations and fetched series (`Observation`, `Series`)
//! - the destination table shape (`TableSpec`)
//! - season tags used by the analysis pipeline (`Season`)

pub mod types;

pub use types::*;
