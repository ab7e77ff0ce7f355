//! Reconcile the requested grid with the data actually observed.
//!
//! Extrapolating a cumulative curve beyond the measured diameters and then
//! differentiating it produces meaningless frequencies. So before resampling:
//!
//! - the interval count is capped at the number of observations (warning)
//! - a `dmax` above the largest observed diameter, or a `dmin` below the
//!   smallest, is a conflict that a [`RangeConflictResolver`] must settle
//!
//! Resolvers decide policy: fail, clamp to the data, or ask a human
//! (see `cli::prompt`). Whatever they answer is checked against the data.

use crate::domain::{DistributionConfig, ObservedRange, PipelineWarning};
use crate::error::{Bound, PoreError, Stage};

/// A requested bound that lies outside the observed diameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConflict {
    pub bound: Bound,
    pub requested: f64,
    pub observed: ObservedRange,
}

impl RangeConflict {
    pub fn to_error(&self) -> PoreError {
        PoreError::RangeExceedsData {
            bound: self.bound,
            requested: self.requested,
            observed_min: self.observed.min,
            observed_max: self.observed.max,
        }
    }
}

/// Supplies a replacement for an out-of-range bound.
pub trait RangeConflictResolver {
    fn resolve(&mut self, conflict: &RangeConflict) -> Result<f64, PoreError>;
}

/// Non-interactive default: every conflict is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailResolver;

impl RangeConflictResolver for FailResolver {
    fn resolve(&mut self, conflict: &RangeConflict) -> Result<f64, PoreError> {
        Err(conflict.to_error())
    }
}

/// Replace the bound with the observed extreme on that side.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClampResolver;

impl RangeConflictResolver for ClampResolver {
    fn resolve(&mut self, conflict: &RangeConflict) -> Result<f64, PoreError> {
        Ok(match conflict.bound {
            Bound::Upper => conflict.observed.max,
            Bound::Lower => conflict.observed.min,
        })
    }
}

/// Reconciled configuration plus what had to change.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub config: DistributionConfig,
    pub warnings: Vec<PipelineWarning>,
}

/// Fit `config` inside the observed data, asking `resolver` about bound conflicts.
pub fn reconcile(
    observed: ObservedRange,
    mut config: DistributionConfig,
    resolver: &mut dyn RangeConflictResolver,
) -> Result<Reconciled, PoreError> {
    config.validate(Stage::Boundary)?;
    let mut warnings = Vec::new();

    if observed.count < config.intervals {
        warnings.push(PipelineWarning::IntervalsReduced {
            requested: config.intervals,
            available: observed.count,
        });
        config.intervals = observed.count;
    }

    if config.dmax > observed.max {
        let conflict = RangeConflict {
            bound: Bound::Upper,
            requested: config.dmax,
            observed,
        };
        let resolved = resolver.resolve(&conflict)?;
        check_resolution(&conflict, resolved)?;
        warnings.push(PipelineWarning::BoundAdjusted {
            bound: Bound::Upper,
            requested: config.dmax,
            resolved,
        });
        config.dmax = resolved;
    }

    if config.dmin < observed.min {
        let conflict = RangeConflict {
            bound: Bound::Lower,
            requested: config.dmin,
            observed,
        };
        let resolved = resolver.resolve(&conflict)?;
        check_resolution(&conflict, resolved)?;
        warnings.push(PipelineWarning::BoundAdjusted {
            bound: Bound::Lower,
            requested: config.dmin,
            resolved,
        });
        config.dmin = resolved;
    }

    // A replacement bound can still cross the other one.
    config.validate(Stage::Boundary)?;

    Ok(Reconciled { config, warnings })
}

fn check_resolution(conflict: &RangeConflict, resolved: f64) -> Result<(), PoreError> {
    let inside = resolved.is_finite() && resolved >= conflict.observed.min && resolved <= conflict.observed.max;
    if inside {
        Ok(())
    } else {
        Err(PoreError::RangeExceedsData {
            bound: conflict.bound,
            requested: resolved,
            observed_min: conflict.observed.min,
            observed_max: conflict.observed.max,
        })
    }
}
