//! Max-normalization for comparative plots.
//!
//! The normalized PSD is recomputed from the normalized CPD instead of
//! rescaling the PSD on its own, so the pair stays consistent.

use crate::distribution::differentiate;
use crate::domain::{Cpd, LogBase, Psd};
use crate::error::{PoreError, Stage};

/// `e / max(e)` element-wise.
pub fn normalize(e: &[f64]) -> Result<Vec<f64>, PoreError> {
    let max = e.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max.is_finite() && max > 0.0) {
        return Err(PoreError::DivideByZero { stage: Stage::Normalize });
    }
    Ok(e.iter().map(|v| v / max).collect())
}

/// Normalized CPD and the PSD derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedViews {
    pub cpd: Cpd,
    pub psd: Psd,
}

pub fn normalized_views(cpd: &Cpd, base: LogBase) -> Result<NormalizedViews, PoreError> {
    let cpd = Cpd {
        d: cpd.d.clone(),
        e: normalize(&cpd.e)?,
        reversed: cpd.reversed,
    };
    let psd = differentiate(&cpd, base)?;
    Ok(NormalizedViews { cpd, psd })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_maximum_is_one() {
        let v = normalize(&[0.0, 0.2, 0.8, 0.4]).unwrap();
        let max = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 1.0);
        assert!((v[1] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn all_zero_curve_cannot_be_normalized() {
        assert_eq!(
            normalize(&[0.0, 0.0]).unwrap_err(),
            PoreError::DivideByZero { stage: Stage::Normalize }
        );
    }

    #[test]
    fn normalized_psd_is_psd_over_cpd_max() {
        let cpd = Cpd {
            d: vec![1.0, 10.0, 100.0],
            e: vec![0.0, 0.3, 0.6],
            reversed: false,
        };
        let raw = differentiate(&cpd, LogBase::Ten).unwrap();
        let views = normalized_views(&cpd, LogBase::Ten).unwrap();
        assert_eq!(views.cpd.e.last().copied(), Some(1.0));
        for (n, r) in views.psd.e.iter().zip(&raw.e) {
            assert!((n - r / 0.6).abs() < 1e-12);
        }
    }
}
