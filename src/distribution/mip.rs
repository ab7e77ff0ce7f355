//! Mercury intrusion porosimetry → diameter / void-ratio curve.
//!
//! Units in and out:
//!
//! - pressure: psi in, converted to MPa
//! - intruded volume: cc in, converted to mm³
//! - void ratio: intruded volume over solid volume `Ms / Gs`
//! - diameter: Washburn relation `d = -k γ cos θ / p`, in µm when γ is in N/m
//!   and `p` in MPa (`k = 4` for cylinders, `2` for slits)

use crate::domain::{ConversionMode, Curve, MipPhysicalParams};
use crate::error::{PoreError, Stage};

/// 1 psi in MPa.
pub const PSI_TO_MPA: f64 = 0.006_894_759_086_775_36;

/// 1 cc in mm³.
pub const CC_TO_MM3: f64 = 1000.0;

/// Mercury surface tension used by the parallel-plate form (N/m).
pub const MERCURY_SURFACE_TENSION: f64 = 0.48;

/// Mercury contact angle used by the parallel-plate form (degrees).
pub const MERCURY_CONTACT_ANGLE: f64 = 147.0;

/// Equivalent pore diameter (µm) entered at `pressure_mpa`.
pub fn washburn_diameter(pressure_mpa: f64, surf_tension: f64, teta_deg: f64, mode: ConversionMode) -> f64 {
    -mode.shape_factor() * surf_tension * teta_deg.to_radians().cos() / pressure_mpa
}

/// Convert porosimeter columns into a raw `(d, e)` curve (intrusion order kept).
pub fn convert(
    pressure_psi: &[f64],
    volume_cc: &[f64],
    params: &MipPhysicalParams,
    mode: ConversionMode,
) -> Result<Curve, PoreError> {
    let stage = Stage::MipConversion;
    if pressure_psi.is_empty() || volume_cc.is_empty() {
        return Err(PoreError::EmptyInput { stage });
    }
    if pressure_psi.len() != volume_cc.len() {
        return Err(PoreError::LengthMismatch {
            stage,
            left: pressure_psi.len(),
            right: volume_cc.len(),
        });
    }
    params.validate()?;

    let (surf_tension, teta) = match mode {
        ConversionMode::Axial => (params.surf_tension, params.teta),
        ConversionMode::ParallelPlates => (MERCURY_SURFACE_TENSION, MERCURY_CONTACT_ANGLE),
    };
    let vs = params.solid_volume_mm3();

    let mut d = Vec::with_capacity(pressure_psi.len());
    let mut e = Vec::with_capacity(volume_cc.len());
    for (index, (&p_psi, &v_cc)) in pressure_psi.iter().zip(volume_cc).enumerate() {
        if !(p_psi.is_finite() && p_psi > 0.0) {
            return Err(PoreError::invalid_sample(
                stage,
                index,
                format!("pressure {p_psi} psi must be finite and > 0"),
            ));
        }
        if !(v_cc.is_finite() && v_cc >= 0.0) {
            return Err(PoreError::invalid_sample(
                stage,
                index,
                format!("intruded volume {v_cc} cc must be finite and >= 0"),
            ));
        }

        let diameter = washburn_diameter(p_psi * PSI_TO_MPA, surf_tension, teta, mode);
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(PoreError::invalid_sample(
                stage,
                index,
                format!("non-physical diameter {diameter} um (contact angle {teta} deg must exceed 90 for intrusion)"),
            ));
        }

        d.push(diameter);
        e.push(v_cc * CC_TO_MM3 / vs);
    }

    let curve = Curve::checked(stage, d, e)?;
    let (d_min, d_max) = curve.d_range();
    tracing::info!(
        points = curve.len(),
        "max available diameter {d_max:.4} um, min available diameter {d_min:.6} um"
    );
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MipPhysicalParams {
        MipPhysicalParams {
            gs: 2.65,
            ms: 0.2248,
            w: 0.47,
            teta: 147.0,
            surf_tension: 0.48,
            reference_e: None,
        }
    }

    #[test]
    fn two_pressures_give_positive_diameters_larger_at_lower_pressure() {
        let curve = convert(&[10.0, 100.0], &[0.1, 0.05], &params(), ConversionMode::Axial).unwrap();
        let d = curve.d();
        assert!(d[0] > 0.0 && d[1] > 0.0);
        assert!(d[0] > d[1]);

        // -4 * 0.48 * cos(147°) / (10 psi in MPa) ≈ 23.35 µm
        assert!((d[0] - 23.354).abs() < 1e-2, "d0={}", d[0]);
        assert!((d[0] / d[1] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn void_ratio_is_volume_over_solid_volume() {
        let curve = convert(&[10.0, 100.0], &[0.1, 0.05], &params(), ConversionMode::Axial).unwrap();
        let vs = 0.2248 / 2.65 * 1000.0;
        assert!((curve.e()[0] - 100.0 / vs).abs() < 1e-12);
        assert!((curve.e()[1] - 50.0 / vs).abs() < 1e-12);
    }

    #[test]
    fn parallel_plates_halve_the_diameter_with_mercury_constants() {
        let mut p = params();
        // Ignored by the parallel-plate form.
        p.surf_tension = 0.3;
        p.teta = 130.0;
        let axial = convert(&[50.0], &[0.0], &params(), ConversionMode::Axial);
        // A single row is not a curve.
        assert!(matches!(axial, Err(PoreError::InsufficientPoints { .. })));

        let axial = convert(&[50.0, 60.0], &[0.0, 0.01], &params(), ConversionMode::Axial).unwrap();
        let plates = convert(&[50.0, 60.0], &[0.0, 0.01], &p, ConversionMode::ParallelPlates).unwrap();
        assert!((axial.d()[0] / plates.d()[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = convert(&[], &[], &params(), ConversionMode::Axial).unwrap_err();
        assert_eq!(err, PoreError::EmptyInput { stage: Stage::MipConversion });
    }

    #[test]
    fn zero_pressure_is_rejected_with_its_index() {
        let err = convert(&[10.0, 0.0, 30.0], &[0.0, 0.1, 0.2], &params(), ConversionMode::Axial).unwrap_err();
        assert!(matches!(
            err,
            PoreError::InvalidSample {
                stage: Stage::MipConversion,
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn wetting_contact_angle_is_rejected() {
        let mut p = params();
        p.teta = 60.0;
        let err = convert(&[10.0, 20.0], &[0.0, 0.1], &p, ConversionMode::Axial).unwrap_err();
        assert!(matches!(err, PoreError::InvalidSample { index: 0, .. }));
    }
}
