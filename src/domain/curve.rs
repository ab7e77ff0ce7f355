//! Diameter / void-ratio records.
//!
//! - `Curve`: a raw or oriented `(d, e)` sequence as delivered by a data source.
//! - `Cpd`: the cumulative distribution resampled on the log grid.
//! - `Psd`: the log-derivative of a `Cpd`.
//!
//! `Cpd` and `Psd` are plain records; the stages in `crate::distribution`
//! produce them and the I/O layers read them.

use serde::{Deserialize, Serialize};

use crate::error::{PoreError, Stage};

/// Paired diameters (µm, > 0) and void ratios (>= 0), at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    d: Vec<f64>,
    e: Vec<f64>,
}

impl Curve {
    /// Build a curve from two columns, rejecting non-physical samples.
    pub fn new(d: Vec<f64>, e: Vec<f64>) -> Result<Self, PoreError> {
        Self::checked(Stage::Orientation, d, e)
    }

    pub(crate) fn checked(stage: Stage, d: Vec<f64>, e: Vec<f64>) -> Result<Self, PoreError> {
        if d.len() != e.len() {
            return Err(PoreError::LengthMismatch {
                stage,
                left: d.len(),
                right: e.len(),
            });
        }
        if d.is_empty() {
            return Err(PoreError::EmptyInput { stage });
        }
        if d.len() < 2 {
            return Err(PoreError::InsufficientPoints {
                stage,
                found: d.len(),
                required: 2,
            });
        }
        for (index, (&di, &ei)) in d.iter().zip(&e).enumerate() {
            if !(di.is_finite() && di > 0.0) {
                return Err(PoreError::invalid_sample(
                    stage,
                    index,
                    format!("diameter {di} must be finite and > 0"),
                ));
            }
            if !(ei.is_finite() && ei >= 0.0) {
                return Err(PoreError::invalid_sample(
                    stage,
                    index,
                    format!("void ratio {ei} must be finite and >= 0"),
                ));
            }
        }
        Ok(Self { d, e })
    }

    pub fn d(&self) -> &[f64] {
        &self.d
    }

    pub fn e(&self) -> &[f64] {
        &self.e
    }

    pub fn len(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.d, self.e)
    }

    /// Smallest and largest diameter.
    pub fn d_range(&self) -> (f64, f64) {
        min_max(&self.d)
    }

    /// Smallest and largest void ratio.
    pub fn e_range(&self) -> (f64, f64) {
        min_max(&self.e)
    }
}

/// Cumulative pore distribution sampled on the log-diameter grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cpd {
    pub d: Vec<f64>,
    pub e: Vec<f64>,
    /// `true` after [`Cpd::reverse`]: `e` is cumulated from the large-pore end.
    #[serde(default)]
    pub reversed: bool,
}

impl Cpd {
    pub fn len(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// Total void ratio covered by the distribution.
    pub fn total(&self) -> f64 {
        let (lo, hi) = min_max(&self.e);
        hi - lo
    }

    /// Rewrite `e` in place as `max(e) - e`, flipping the cumulation direction.
    ///
    /// Applying it twice gives back the original values whenever `min(e) == 0`
    /// (which holds for any CPD that starts at zero).
    pub fn reverse(&mut self) {
        let (_, max) = min_max(&self.e);
        for v in &mut self.e {
            *v = max - *v;
        }
        self.reversed = !self.reversed;
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.d.iter().copied().zip(self.e.iter().copied()).collect()
    }
}

/// Pore size (frequency) distribution: `e` is the void-ratio change per log unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psd {
    pub d: Vec<f64>,
    pub e: Vec<f64>,
}

impl Psd {
    pub fn len(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// Diameter of the highest frequency (dominant pore size), if any.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.d
            .iter()
            .copied()
            .zip(self.e.iter().copied())
            .fold(None, |best, (d, e)| match best {
                Some((_, be)) if be >= e => best,
                _ => Some((d, e)),
            })
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.d.iter().copied().zip(self.e.iter().copied()).collect()
    }
}

pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_rejects_mismatched_columns() {
        let err = Curve::new(vec![1.0, 2.0], vec![0.1]).unwrap_err();
        assert!(matches!(err, PoreError::LengthMismatch { left: 2, right: 1, .. }));
    }

    #[test]
    fn curve_rejects_non_positive_diameter() {
        let err = Curve::new(vec![1.0, 0.0, 3.0], vec![0.0, 0.1, 0.2]).unwrap_err();
        assert!(matches!(err, PoreError::InvalidSample { index: 1, .. }));
    }

    #[test]
    fn curve_needs_two_points() {
        assert!(matches!(
            Curve::new(vec![], vec![]),
            Err(PoreError::EmptyInput { .. })
        ));
        assert!(matches!(
            Curve::new(vec![1.0], vec![0.0]),
            Err(PoreError::InsufficientPoints { found: 1, .. })
        ));
    }

    #[test]
    fn cpd_reverse_twice_restores_values() {
        let mut cpd = Cpd {
            d: vec![1.0, 10.0, 100.0],
            e: vec![0.0, 0.25, 1.0],
            reversed: false,
        };
        cpd.reverse();
        assert_eq!(cpd.e, vec![1.0, 0.75, 0.0]);
        assert!(cpd.reversed);
        cpd.reverse();
        assert_eq!(cpd.e, vec![0.0, 0.25, 1.0]);
        assert!(!cpd.reversed);
    }

    #[test]
    fn psd_peak_picks_first_maximum() {
        let psd = Psd {
            d: vec![1.0, 2.0, 3.0],
            e: vec![0.1, 0.5, 0.5],
        };
        assert_eq!(psd.peak(), Some((2.0, 0.5)));
    }
}
