//! Logarithmic diameter grid.
//!
//! Every CPD is sampled on the same kind of grid: `intervals` points spaced
//! uniformly in log-diameter between `dmin` and `dmax` (both inclusive).

use crate::domain::{DistributionConfig, LogBase};
use crate::error::{PoreError, Stage};

/// Generate `intervals` log-spaced diameters between `dmin` and `dmax` (inclusive).
///
/// The end points are stored exactly as given; interior points are
/// `base^(log(dmin) + i Δ)`.
pub fn log_grid(dmin: f64, dmax: f64, intervals: usize, base: LogBase) -> Result<Vec<f64>, PoreError> {
    let config = DistributionConfig { intervals, dmin, dmax };
    config.validate(Stage::Grid)?;

    let log_min = base.log(dmin);
    let log_max = base.log(dmax);
    let step = (log_max - log_min) / (intervals as f64 - 1.0);

    let mut out = Vec::with_capacity(intervals);
    out.push(dmin);
    for i in 1..intervals - 1 {
        out.push(base.pow(log_min + step * i as f64));
    }
    out.push(dmax);
    Ok(out)
}

/// Grid for a distribution config.
pub fn grid_for(config: &DistributionConfig, base: LogBase) -> Result<Vec<f64>, PoreError> {
    log_grid(config.dmin, config.dmax, config.intervals, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_grid_includes_endpoints() {
        let v = log_grid(0.004, 200.0, 40, LogBase::Ten).unwrap();
        assert_eq!(v.len(), 40);
        assert_eq!(v[0], 0.004);
        assert_eq!(v[v.len() - 1], 200.0);
    }

    #[test]
    fn log_grid_is_strictly_increasing_and_geometric() {
        for base in [LogBase::Ten, LogBase::Natural] {
            let v = log_grid(0.01, 1000.0, 6, base).unwrap();
            for w in v.windows(2) {
                assert!(w[1] > w[0]);
            }
            // Five steps over five decades: ratio 10 between neighbors.
            for w in v.windows(2) {
                assert!((w[1] / w[0] - 10.0).abs() < 1e-9, "ratio {}", w[1] / w[0]);
            }
        }
    }

    #[test]
    fn log_grid_with_two_intervals_is_just_the_bounds() {
        let v = log_grid(1.0, 100.0, 2, LogBase::Ten).unwrap();
        assert_eq!(v, vec![1.0, 100.0]);
    }

    #[test]
    fn log_grid_rejects_invalid_ranges() {
        for (dmin, dmax, n) in [(0.0, 1.0, 5), (-1.0, 1.0, 5), (2.0, 1.0, 5), (1.0, 1.0, 5), (1.0, 2.0, 1)] {
            let err = log_grid(dmin, dmax, n, LogBase::Ten).unwrap_err();
            assert!(matches!(err, PoreError::InvalidRange { stage: Stage::Grid, .. }));
        }
        assert!(log_grid(f64::NAN, 2.0, 5, LogBase::Ten).is_err());
    }
}
