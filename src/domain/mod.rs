//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - curve records (`Curve`, `Cpd`, `Psd`)
//! - run configuration (`DistributionConfig`, `MipPhysicalParams`, `PipelineSettings`)
//! - configuration enums (`LogBase`, `ConversionMode`, `RangePolicy`, `SourceKind`)
//! - recoverable pipeline warnings (`PipelineWarning`)

pub mod curve;
pub mod types;

pub use curve::*;
pub use types::*;
