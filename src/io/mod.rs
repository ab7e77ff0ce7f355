//! Input/output helpers.
//!
//! - two-column text ingest (`ingest`)
//! - tab-delimited distribution export (`export`)
//! - run JSON read/write (`json`)

pub mod export;
pub mod ingest;
pub mod json;

pub use export::*;
pub use ingest::*;
pub use json::*;
