//! PSD as the discrete log-derivative of a CPD.
//!
//! For consecutive CPD points `i`, `i+1`:
//!
//! ```text
//! d_psd[i] = base^((log d[i] + log d[i+1]) / 2)      geometric midpoint
//! e_psd[i] = (e[i+1] - e[i]) / log(d[i+1] / d[i])   void ratio per log unit
//! ```
//!
//! A canonical CPD never decreases, so a negative frequency means an upstream
//! invariant broke; it is reported as an error, never skipped. A reversed CPD
//! (see `Cpd::reverse`) decreases by construction and its slopes are negated.

use crate::domain::{Cpd, LogBase, Psd};
use crate::error::{PoreError, Stage};

pub fn differentiate(cpd: &Cpd, base: LogBase) -> Result<Psd, PoreError> {
    let stage = Stage::Differentiate;
    if cpd.d.len() != cpd.e.len() {
        return Err(PoreError::LengthMismatch {
            stage,
            left: cpd.d.len(),
            right: cpd.e.len(),
        });
    }
    if cpd.len() < 2 {
        return Err(PoreError::InsufficientPoints {
            stage,
            found: cpd.len(),
            required: 2,
        });
    }

    let sign = if cpd.reversed { -1.0 } else { 1.0 };
    let n = cpd.len() - 1;
    let mut d = Vec::with_capacity(n);
    let mut e = Vec::with_capacity(n);

    for i in 0..n {
        let (d0, d1) = (cpd.d[i], cpd.d[i + 1]);
        if !(d0 > 0.0 && d1 > d0) {
            return Err(PoreError::invalid_sample(
                stage,
                i + 1,
                format!("CPD diameters must be positive and strictly increasing ({d0} -> {d1})"),
            ));
        }

        let log0 = base.log(d0);
        let log1 = base.log(d1);
        let frequency = sign * (cpd.e[i + 1] - cpd.e[i]) / base.log(d1 / d0);
        if frequency < 0.0 || frequency.is_nan() {
            return Err(PoreError::NonPhysicalDistribution {
                stage,
                index: i,
                value: frequency,
            });
        }

        d.push(base.pow((log0 + log1) / 2.0));
        e.push(frequency);
    }

    Ok(Psd { d, e })
}

/// Frequency-density form of a PSD: `e / Σe`, so the frequencies sum to one.
pub fn to_frequency(psd: &Psd) -> Result<Psd, PoreError> {
    let total: f64 = psd.e.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(PoreError::DivideByZero { stage: Stage::Normalize });
    }
    Ok(Psd {
        d: psd.d.clone(),
        e: psd.e.iter().map(|v| v / total).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpd(d: &[f64], e: &[f64]) -> Cpd {
        Cpd {
            d: d.to_vec(),
            e: e.to_vec(),
            reversed: false,
        }
    }

    #[test]
    fn four_point_cpd_gives_three_bracketed_non_negative_frequencies() {
        let c = cpd(&[0.01, 0.1, 1.0, 10.0], &[0.0, 0.1, 0.4, 0.5]);
        let psd = differentiate(&c, LogBase::Ten).unwrap();
        assert_eq!(psd.len(), 3);
        for i in 0..3 {
            assert!(psd.e[i] >= 0.0);
            assert!(psd.d[i] > c.d[i] && psd.d[i] < c.d[i + 1]);
        }
        // One decade per step: frequency equals the void-ratio step.
        assert!((psd.e[0] - 0.1).abs() < 1e-12);
        assert!((psd.e[1] - 0.3).abs() < 1e-12);
        assert!((psd.e[2] - 0.1).abs() < 1e-12);
        // Geometric midpoint of 0.01 and 0.1.
        assert!((psd.d[0] - 0.001f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn natural_base_scales_by_ln10() {
        let c = cpd(&[1.0, 10.0], &[0.0, 1.0]);
        let ten = differentiate(&c, LogBase::Ten).unwrap();
        let nat = differentiate(&c, LogBase::Natural).unwrap();
        assert!((ten.e[0] / nat.e[0] - std::f64::consts::LN_10).abs() < 1e-12);
        assert!((ten.d[0] - nat.d[0]).abs() < 1e-12);
    }

    #[test]
    fn negative_frequency_fails_fast() {
        let c = cpd(&[1.0, 2.0, 4.0, 8.0], &[0.0, 0.3, 0.2, 0.5]);
        let err = differentiate(&c, LogBase::Ten).unwrap_err();
        match err {
            PoreError::NonPhysicalDistribution { stage, index, value } => {
                assert_eq!(stage, Stage::Differentiate);
                assert_eq!(index, 1);
                assert!(value < 0.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn reversed_cpd_gives_the_same_psd() {
        let c = cpd(&[1.0, 3.0, 9.0, 27.0], &[0.0, 0.2, 0.7, 0.8]);
        let mut r = c.clone();
        r.reverse();
        let a = differentiate(&c, LogBase::Ten).unwrap();
        let b = differentiate(&r, LogBase::Ten).unwrap();
        for (x, y) in a.e.iter().zip(&b.e) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn repeated_diameter_is_rejected() {
        let c = cpd(&[1.0, 1.0, 2.0], &[0.0, 0.1, 0.2]);
        assert!(matches!(
            differentiate(&c, LogBase::Ten),
            Err(PoreError::InvalidSample { index: 1, .. })
        ));
    }

    #[test]
    fn frequency_form_sums_to_one() {
        let psd = Psd {
            d: vec![1.0, 2.0, 3.0],
            e: vec![0.5, 1.5, 2.0],
        };
        let f = to_frequency(&psd).unwrap();
        assert!((f.e.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(f.d, psd.d);
    }

    #[test]
    fn frequency_form_of_flat_psd_is_divide_by_zero() {
        let psd = Psd {
            d: vec![1.0, 2.0],
            e: vec![0.0, 0.0],
        };
        assert_eq!(
            to_frequency(&psd).unwrap_err(),
            PoreError::DivideByZero { stage: Stage::Normalize }
        );
    }
}
