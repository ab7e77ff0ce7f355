//! Resample an oriented curve onto the log-diameter grid (CPD).
//!
//! For every grid diameter `x` we walk the source curve in order and take the
//! first point with `d > x` as the upper end of the bracket; the point before
//! it is the lower end. The void ratio is interpolated linearly in
//! `(log d, e)`.
//!
//! End handling:
//!
//! - `x` is clamped to `[d_first, d_last]` of the source first. After
//!   reconciliation this only absorbs floating-point rounding of the grid
//!   ends, so no value is ever extrapolated.
//! - when no source point exceeds `x` (i.e. `x == d_last`), the last
//!   non-degenerate interval is used, which reproduces `e_last` exactly.
//!
//! If an interpolated value drops below the previous grid value, resampling
//! stops and the CPD built so far is returned with a `NonMonotone` warning.

use crate::domain::{Cpd, Curve, DistributionConfig, LogBase, PipelineWarning};
use crate::error::{PoreError, Stage};
use crate::math::grid_for;

/// Resampled CPD plus the truncation warning, if resampling stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct Resampled {
    pub cpd: Cpd,
    pub warning: Option<PipelineWarning>,
}

/// Resample `curve` (canonically oriented) on the grid described by `config`.
pub fn resample(curve: &Curve, config: &DistributionConfig, base: LogBase) -> Result<Resampled, PoreError> {
    let grid = grid_for(config, base)?;
    let d = curve.d();
    let e = curve.e();
    let n = d.len();

    if d.windows(2).any(|w| w[1] < w[0]) {
        return Err(PoreError::invalid_sample(
            Stage::Resample,
            0,
            "source diameters must be ascending (orient the curve first)",
        ));
    }
    if d[0] == d[n - 1] {
        return Err(PoreError::invalid_sample(
            Stage::Resample,
            0,
            "source curve spans a single diameter",
        ));
    }

    let log_first = base.log(d[0]);
    let log_last = base.log(d[n - 1]);

    let mut cpd_d = Vec::with_capacity(grid.len());
    let mut cpd_e = Vec::with_capacity(grid.len());
    let mut warning = None;

    for (i, &x) in grid.iter().enumerate() {
        let (lo, hi) = bracket(d, x);
        let log_x = base.log(x).clamp(log_first, log_last);
        let value = interpolate(base.log(d[lo]), e[lo], base.log(d[hi]), e[hi], log_x);

        if let Some(&prev) = cpd_e.last() {
            let increment = value - prev;
            if increment < 0.0 {
                let w = PipelineWarning::NonMonotone {
                    index: i,
                    diameter: x,
                    increment,
                };
                tracing::warn!("{w}");
                warning = Some(w);
                break;
            }
        }

        cpd_d.push(x);
        cpd_e.push(value);
    }

    if cpd_d.len() < 2 {
        return Err(PoreError::InsufficientPoints {
            stage: Stage::Resample,
            found: cpd_d.len(),
            required: 2,
        });
    }

    tracing::debug!(points = cpd_d.len(), requested = grid.len(), "resampled CPD");

    Ok(Resampled {
        cpd: Cpd {
            d: cpd_d,
            e: cpd_e,
            reversed: false,
        },
        warning,
    })
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)`, kept inside `[y0, y1]`.
fn interpolate(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
    let value = y0 + t * (y1 - y0);
    value.clamp(y0.min(y1), y0.max(y1))
}

/// Indices `(lo, hi)` of the source interval used for `x`, with `d[lo] < d[hi]`.
///
/// Requires `d` ascending and `d[0] < d[last]`.
fn bracket(d: &[f64], x: f64) -> (usize, usize) {
    let n = d.len();
    match d.iter().position(|&v| v > x) {
        // Below the first point: first non-degenerate interval.
        Some(0) => {
            let hi = d.iter().position(|&v| v > d[0]).unwrap_or(n - 1);
            (0, hi)
        }
        Some(hi) => (hi - 1, hi),
        // At (or past) the last point: last non-degenerate interval.
        None => {
            let hi = n - 1;
            let lo = d.iter().rposition(|&v| v < d[hi]).unwrap_or(0);
            (lo, hi)
        }
    }
}
