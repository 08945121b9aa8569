//! `fred-db` library crate.
//!
//! Mirrors FRED economic time series into PostgreSQL (one table per series)
//! and runs exploratory unit-root and kurtosis analysis on them.
//!
//! The binary (`fred-db`) is a thin wrapper around this library so the sync
//! pipeline and the analysis are testable without spawning processes.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod store;
pub mod sync;
