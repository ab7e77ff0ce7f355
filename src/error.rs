//! Error types.
//!
//! Two layers:
//!
//! - `PoreError`: the numerical pipeline's taxonomy. Every variant names the
//!   stage that failed (and the sample index when one is to blame).
//! - `AppError`: what the binary reports, with a process exit code.

use std::fmt;

use thiserror::Error;

/// Pipeline stage, used to locate a failure in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Grid,
    Orientation,
    MipConversion,
    Boundary,
    Resample,
    Differentiate,
    Normalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Grid => "grid",
            Stage::Orientation => "orientation",
            Stage::MipConversion => "mip-conversion",
            Stage::Boundary => "boundary",
            Stage::Resample => "resample",
            Stage::Differentiate => "differentiate",
            Stage::Normalize => "normalize",
        };
        f.write_str(name)
    }
}

/// Which end of the diameter range a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Lower => f.write_str("dmin"),
            Bound::Upper => f.write_str("dmax"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoreError {
    #[error("[{stage}] invalid diameter range: dmin={dmin}, dmax={dmax}, intervals={intervals} (need 0 < dmin < dmax and intervals >= 2)")]
    InvalidRange {
        stage: Stage,
        dmin: f64,
        dmax: f64,
        intervals: usize,
    },

    #[error("[{stage}] invalid sample at index {index}: {reason}")]
    InvalidSample {
        stage: Stage,
        index: usize,
        reason: String,
    },

    #[error("[{stage}] column length mismatch: {left} vs {right}")]
    LengthMismatch { stage: Stage, left: usize, right: usize },

    #[error("[{stage}] no data rows")]
    EmptyInput { stage: Stage },

    #[error("[{stage}] need at least {required} points, got {found}")]
    InsufficientPoints {
        stage: Stage,
        found: usize,
        required: usize,
    },

    #[error("[boundary] requested {bound}={requested} lies outside the observed diameters [{observed_min}, {observed_max}]")]
    RangeExceedsData {
        bound: Bound,
        requested: f64,
        observed_min: f64,
        observed_max: f64,
    },

    #[error("[{stage}] negative frequency {value} at index {index}")]
    NonPhysicalDistribution {
        stage: Stage,
        index: usize,
        value: f64,
    },

    #[error("[{stage}] cannot rescale: reference value is zero")]
    DivideByZero { stage: Stage },

    #[error("range conflict resolution canceled")]
    Canceled,
}

impl PoreError {
    pub(crate) fn invalid_sample(stage: Stage, index: usize, reason: impl Into<String>) -> Self {
        PoreError::InvalidSample {
            stage,
            index,
            reason: reason.into(),
        }
    }

    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PoreError::InvalidRange { .. } | PoreError::RangeExceedsData { .. } | PoreError::Canceled => 2,
            PoreError::InvalidSample { .. }
            | PoreError::LengthMismatch { .. }
            | PoreError::EmptyInput { .. }
            | PoreError::InsufficientPoints { .. } => 3,
            PoreError::NonPhysicalDistribution { .. } | PoreError::DivideByZero { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PoreError> for AppError {
    fn from(err: PoreError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
