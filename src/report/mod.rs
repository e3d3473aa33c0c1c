//! Report module - rendering and exporting snapshot results

pub mod export;
pub mod records;
pub mod summary;

pub use export::*;
pub use records::*;
pub use summary::*;
