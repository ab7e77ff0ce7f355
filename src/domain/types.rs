//! Shared configuration and bookkeeping types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - filled from CLI flags / environment
//! - carried through the pipeline unchanged
//! - written into the JSON run file and read back for plotting

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Bound, PoreError, Stage};

/// Logarithm used for the log-diameter axis.
///
/// The grid and the interpolation are base-independent; the base only changes
/// the unit of the PSD (void ratio per decade vs. per e-fold). The resampler
/// and the differentiator always share one `LogBase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogBase {
    /// `log10`, PSD in void ratio per decade of diameter.
    #[default]
    Ten,
    /// `ln`, PSD in void ratio per e-fold of diameter.
    Natural,
}

impl LogBase {
    pub fn log(self, x: f64) -> f64 {
        match self {
            LogBase::Ten => x.log10(),
            LogBase::Natural => x.ln(),
        }
    }

    /// Inverse of [`LogBase::log`].
    pub fn pow(self, x: f64) -> f64 {
        match self {
            LogBase::Ten => 10f64.powf(x),
            LogBase::Natural => x.exp(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogBase::Ten => "de/dlog10(d)",
            LogBase::Natural => "de/dln(d)",
        }
    }
}

/// Capillary geometry used by the Washburn conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionMode {
    /// Cylindrical pores: `d = -4 γ cos θ / p`, using the supplied γ and θ.
    #[default]
    Axial,
    /// Slit pores: `d = -2 γ cos θ / p` with mercury's standard γ and θ.
    ParallelPlates,
}

impl ConversionMode {
    pub fn shape_factor(self) -> f64 {
        match self {
            ConversionMode::Axial => 4.0,
            ConversionMode::ParallelPlates => 2.0,
        }
    }
}

/// What to do when the requested diameter bounds exceed the observed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Ask for a replacement bound on stdin.
    Prompt,
    /// Abort with a range error.
    Fail,
    /// Replace the bound with the observed extreme.
    Clamp,
}

/// Where the raw curve came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Diameter / void-ratio columns.
    Cpd,
    /// Pressure / intruded-volume columns from a porosimeter.
    Mip,
}

impl SourceKind {
    pub fn display_name(self) -> &'static str {
        match self {
            SourceKind::Cpd => "cumulative distribution file",
            SourceKind::Mip => "mercury intrusion porosimetry",
        }
    }
}

/// Target grid resolution and bounds (diameters in µm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub intervals: usize,
    pub dmin: f64,
    pub dmax: f64,
}

impl DistributionConfig {
    pub fn validate(&self, stage: Stage) -> Result<(), PoreError> {
        let ok = self.dmin.is_finite()
            && self.dmax.is_finite()
            && self.dmin > 0.0
            && self.dmax > self.dmin
            && self.intervals >= 2;
        if ok {
            Ok(())
        } else {
            Err(PoreError::InvalidRange {
                stage,
                dmin: self.dmin,
                dmax: self.dmax,
                intervals: self.intervals,
            })
        }
    }
}

/// Specimen and fluid constants for the Washburn conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MipPhysicalParams {
    /// Specific gravity of the solids.
    pub gs: f64,
    /// Dry mass of the specimen (g).
    pub ms: f64,
    /// Water content of the specimen.
    pub w: f64,
    /// Mercury contact angle (degrees).
    pub teta: f64,
    /// Mercury surface tension (N/m).
    pub surf_tension: f64,
    /// Measured void ratio of an unsaturated specimen; replaces `w Gs` as
    /// the reference line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_e: Option<f64>,
}

impl MipPhysicalParams {
    pub fn validate(&self) -> Result<(), PoreError> {
        let checks = [
            (self.gs.is_finite() && self.gs > 0.0, "specific gravity Gs must be > 0"),
            (self.ms.is_finite() && self.ms > 0.0, "dry mass Ms must be > 0"),
            (self.w.is_finite() && self.w >= 0.0, "water content w must be >= 0"),
            (self.teta.is_finite(), "contact angle must be finite"),
            (
                self.surf_tension.is_finite() && self.surf_tension > 0.0,
                "surface tension must be > 0",
            ),
            (
                self.reference_e.is_none_or(|e| e.is_finite() && e >= 0.0),
                "reference void ratio must be >= 0",
            ),
        ];
        for (ok, reason) in checks {
            if !ok {
                return Err(PoreError::invalid_sample(Stage::MipConversion, 0, reason));
            }
        }
        Ok(())
    }

    /// Volume of solids in mm³.
    pub fn solid_volume_mm3(&self) -> f64 {
        self.ms / self.gs * 1000.0
    }

    /// Void ratio of the specimen if it were saturated (`e = w Gs`).
    pub fn saturated_void_ratio(&self) -> f64 {
        self.w * self.gs
    }

    /// Void ratio drawn as the reference line: the measured one if given,
    /// else `w Gs`.
    pub fn reference_void_ratio(&self) -> f64 {
        self.reference_e.unwrap_or_else(|| self.saturated_void_ratio())
    }
}

/// Extent of the oriented source data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedRange {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Recoverable conditions met while elaborating a distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    /// Fewer observations than requested intervals.
    IntervalsReduced { requested: usize, available: usize },
    /// A requested bound was outside the data and got replaced.
    BoundAdjusted { bound: Bound, requested: f64, resolved: f64 },
    /// Resampling stopped at `index` because the interpolated curve decreased.
    NonMonotone { index: usize, diameter: f64, increment: f64 },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::IntervalsReduced { requested, available } => write!(
                f,
                "too many intervals: {requested} requested, reduced to {available} (number of observations)"
            ),
            PipelineWarning::BoundAdjusted {
                bound,
                requested,
                resolved,
            } => write!(f, "{bound} {requested} outside the data, replaced by {resolved}"),
            PipelineWarning::NonMonotone {
                index,
                diameter,
                increment,
            } => write!(
                f,
                "non-monotone CPD at grid point {index} (d={diameter:.5} um, increment {increment:.3e}); truncated to {index} points"
            ),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub distribution: DistributionConfig,
    pub log_base: LogBase,
    pub conversion: ConversionMode,
    /// Also produce the `e / max(e)` views.
    pub normalize: bool,
    /// Also produce the `e / Σe` frequency PSD.
    pub frequency: bool,
    /// Store the CPD reversed (cumulated from the large-pore end).
    pub reverse: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            distribution: DistributionConfig {
                intervals: 40,
                dmin: 0.004,
                dmax: 200.0,
            },
            log_base: LogBase::Ten,
            conversion: ConversionMode::Axial,
            normalize: false,
            frequency: false,
            reverse: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_base_round_trips() {
        for base in [LogBase::Ten, LogBase::Natural] {
            let x = 37.5;
            assert!((base.pow(base.log(x)) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn distribution_config_rejects_bad_bounds() {
        let bad = DistributionConfig {
            intervals: 10,
            dmin: 5.0,
            dmax: 1.0,
        };
        assert!(matches!(
            bad.validate(Stage::Grid),
            Err(PoreError::InvalidRange { stage: Stage::Grid, .. })
        ));

        let one = DistributionConfig {
            intervals: 1,
            dmin: 1.0,
            dmax: 5.0,
        };
        assert!(one.validate(Stage::Grid).is_err());
    }

    #[test]
    fn saturated_void_ratio_is_w_gs() {
        let p = MipPhysicalParams {
            gs: 2.65,
            ms: 0.2248,
            w: 0.47,
            teta: 147.0,
            surf_tension: 0.48,
            reference_e: None,
        };
        assert!((p.saturated_void_ratio() - 1.2455).abs() < 1e-12);
        assert!((p.solid_volume_mm3() - 84.830_188_679).abs() < 1e-6);
        assert_eq!(p.reference_void_ratio(), p.saturated_void_ratio());

        let measured = MipPhysicalParams {
            reference_e: Some(0.8),
            ..p
        };
        assert_eq!(measured.reference_void_ratio(), 0.8);
        assert!(measured.validate().is_ok());
        let negative = MipPhysicalParams {
            reference_e: Some(-0.1),
            ..p
        };
        assert!(negative.validate().is_err());
    }
}
