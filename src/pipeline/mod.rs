//! Pipeline module - filtering and aggregation stages over the prediction dataset

pub mod binning;
pub mod correlation;
pub mod dataset;
pub mod filter;
pub mod groups;
pub mod loader;
pub mod metrics;
pub mod snapshot;

pub use binning::*;
pub use correlation::*;
pub use dataset::{Dataset, Gender, Placement, StudentRecord};
pub use filter::*;
pub use groups::*;
pub use loader::*;
pub use metrics::*;
pub use snapshot::*;
