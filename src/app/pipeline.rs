//! Shared elaboration logic used by both CLI and TUI front-ends.
//!
//! raw input -> (MIP conversion) -> orientation -> reconciliation
//! -> resampling -> differentiation -> reversal / normalized views
//!
//! The CLI and the TUI only differ in the range-conflict resolver they hand
//! in and in how they present the `RunOutput`.

use crate::distribution::{
    self, NormalizedViews, RangeConflictResolver, Reconciled, Resampled,
};
use crate::domain::{
    Cpd, Curve, DistributionConfig, MipPhysicalParams, ObservedRange, PipelineSettings, PipelineWarning, Psd,
    SourceKind,
};
use crate::error::PoreError;

/// Raw data as it arrives from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Diameter / void-ratio pairs, any order.
    Curve(Curve),
    /// Porosimeter columns plus the specimen constants.
    Mip {
        pressure_psi: Vec<f64>,
        volume_cc: Vec<f64>,
        params: MipPhysicalParams,
    },
}

impl RawInput {
    pub fn kind(&self) -> SourceKind {
        match self {
            RawInput::Curve(_) => SourceKind::Cpd,
            RawInput::Mip { .. } => SourceKind::Mip,
        }
    }
}

/// All computed outputs of one elaboration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub source: SourceKind,
    pub observed: ObservedRange,
    pub config: DistributionConfig,
    pub cpd: Cpd,
    pub psd: Psd,
    pub normalized: Option<NormalizedViews>,
    pub frequency: Option<Psd>,
    pub warnings: Vec<PipelineWarning>,
    /// Reference void ratio for MIP input: measured, or `w Gs`.
    pub reference_void_ratio: Option<f64>,
}

/// One elaboration session: settings, input and the latest result.
#[derive(Debug, Clone)]
pub struct Elaboration {
    pub settings: PipelineSettings,
    pub input: RawInput,
    pub output: Option<RunOutput>,
}

impl Elaboration {
    pub fn new(settings: PipelineSettings, input: RawInput) -> Self {
        Self {
            settings,
            input,
            output: None,
        }
    }

    /// Run the pipeline and keep the result.
    ///
    /// The reconciled grid is written back into `settings.distribution`, so a
    /// second run does not hit the same range conflict again.
    pub fn run(&mut self, resolver: &mut dyn RangeConflictResolver) -> Result<&RunOutput, PoreError> {
        let output = run_pipeline(&self.settings, &self.input, resolver)?;
        self.settings.distribution = output.config;
        Ok(self.output.insert(output))
    }
}

/// Execute the full pipeline without keeping any state.
pub fn run_pipeline(
    settings: &PipelineSettings,
    input: &RawInput,
    resolver: &mut dyn RangeConflictResolver,
) -> Result<RunOutput, PoreError> {
    // 1) Raw curve.
    let (raw, reference_void_ratio) = match input {
        RawInput::Curve(curve) => (curve.clone(), None),
        RawInput::Mip {
            pressure_psi,
            volume_cc,
            params,
        } => (
            distribution::convert(pressure_psi, volume_cc, params, settings.conversion)?,
            Some(params.reference_void_ratio()),
        ),
    };

    // 2) Canonical orientation.
    let oriented = distribution::orient(&raw)?;
    let (min, max) = oriented.d_range();
    let observed = ObservedRange {
        min,
        max,
        count: oriented.len(),
    };
    tracing::info!(
        "observed diameters: max {:.5} um, min {:.5} um ({} points)",
        observed.max,
        observed.min,
        observed.count
    );

    // 3) Fit the grid inside the data.
    let Reconciled { config, mut warnings } = distribution::reconcile(observed, settings.distribution, resolver)?;
    for w in &warnings {
        tracing::warn!("{w}");
    }
    tracing::info!(
        intervals = config.intervals,
        dmin = config.dmin,
        dmax = config.dmax,
        "reconciled grid"
    );

    // 4) CPD and PSD.
    let Resampled { mut cpd, warning } = distribution::resample(&oriented, &config, settings.log_base)?;
    warnings.extend(warning);
    let psd = distribution::differentiate(&cpd, settings.log_base)?;

    // 5) Optional views.
    if settings.reverse {
        cpd.reverse();
    }
    let normalized = if settings.normalize {
        Some(distribution::normalized_views(&cpd, settings.log_base)?)
    } else {
        None
    };
    let frequency = if settings.frequency {
        Some(distribution::to_frequency(&psd)?)
    } else {
        None
    };

    Ok(RunOutput {
        source: input.kind(),
        observed,
        config,
        cpd,
        psd,
        normalized,
        frequency,
        warnings,
        reference_void_ratio,
    })
}
