//! Placement Insights: Filtered Analytics Library
//!
//! Derives KPIs, distributions, grouped rates and correlations from a
//! dataset of precomputed student placement and salary predictions.

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{InsightsError, Result};
