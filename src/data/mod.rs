//! Series providers.
//!
//! The sync and analysis pipelines only need "give me the series for this id";
//! `SeriesProvider` is that seam, and `FredClient` is the production
//! implementation.

use crate::domain::{Series, SeriesId};
use crate::error::AppError;

pub mod fred;

pub use fred::FredClient;

pub trait SeriesProvider {
    /// Fetch metadata and all observations for `id`.
    ///
    /// Implementations report every failure as a provider error and never retry.
    fn fetch_series(&self, id: &SeriesId) -> Result<Series, AppError>;
}
