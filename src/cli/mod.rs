//! Command-line parsing for the pore size distribution tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numerical code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{
    ConversionMode, DistributionConfig, LogBase, MipPhysicalParams, PipelineSettings, RangePolicy,
};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "psd", version, about = "Pore size distributions from cumulative curves and MIP runs")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Elaborate a diameter / void-ratio file.
    Cpd(CpdArgs),
    /// Elaborate a mercury intrusion run (pressure psi / volume cc).
    Mip(MipRunArgs),
    /// Elaborate a seeded synthetic MIP run.
    Demo(DemoArgs),
    /// Plot a previously exported run JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Without a file the TUI shows a synthetic MIP run that can be reseeded.
    Tui(TuiArgs),
}

/// Grid and pipeline options shared by every processing command.
#[derive(Debug, Args, Clone)]
pub struct DistArgs {
    /// Number of grid points of the CPD.
    #[arg(short = 'n', long, env = "PSD_INTERVALS", default_value_t = 40)]
    pub intervals: usize,

    /// Smallest grid diameter (um).
    #[arg(long, env = "PSD_DMIN", default_value_t = 0.004)]
    pub dmin: f64,

    /// Largest grid diameter (um).
    #[arg(long, env = "PSD_DMAX", default_value_t = 200.0)]
    pub dmax: f64,

    /// Logarithm of the diameter axis (PSD unit per decade or per e-fold).
    #[arg(long, value_enum, default_value_t = LogBase::Ten)]
    pub log_base: LogBase,

    /// What to do when dmin/dmax lie outside the data.
    #[arg(long, value_enum, default_value_t = RangePolicy::Prompt)]
    pub on_range_conflict: RangePolicy,

    /// Also compute the max-normalized CPD and PSD.
    #[arg(long)]
    pub normalize: bool,

    /// Also compute the PSD as frequencies summing to one.
    #[arg(long)]
    pub frequency: bool,

    /// Cumulate the CPD from the large-pore end.
    #[arg(long)]
    pub reverse: bool,
}

/// Specimen constants for MIP input.
#[derive(Debug, Args, Clone)]
pub struct MipArgs {
    /// Specific gravity of the solids.
    #[arg(long, env = "PSD_GS", default_value_t = 2.65)]
    pub gs: f64,

    /// Dry mass of the specimen (g).
    #[arg(long, env = "PSD_MS", default_value_t = 0.2248)]
    pub ms: f64,

    /// Water content of the specimen.
    #[arg(long, env = "PSD_W", default_value_t = 0.47)]
    pub w: f64,

    /// Mercury contact angle (degrees).
    #[arg(long, env = "PSD_TETA", default_value_t = 147.0)]
    pub teta: f64,

    /// Mercury surface tension (N/m).
    #[arg(long, env = "PSD_SURF_TENSION", default_value_t = 0.48)]
    pub surf_tension: f64,

    /// Pore geometry of the Washburn relation.
    #[arg(long, value_enum, default_value_t = ConversionMode::Axial)]
    pub mode: ConversionMode,

    /// Measured void ratio for the reference line when the specimen was not
    /// saturated (defaults to `w Gs`).
    #[arg(long = "reference-e", env = "PSD_REFERENCE_E", value_name = "E")]
    pub reference_e: Option<f64>,
}

/// Terminal output and export options.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Print the CPD/PSD table.
    #[arg(long)]
    pub table: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write CPD and PSD as a tab-delimited table.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Write the normalized CPD and PSD as a tab-delimited table (implies --normalize).
    #[arg(long, value_name = "FILE")]
    pub export_normalized: Option<PathBuf>,

    /// Write the run (config + curves) as JSON for `psd plot`.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CpdArgs {
    /// Two-column file: diameter (um), void ratio.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub dist: DistArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct MipRunArgs {
    /// Two-column file: pressure (psi), intruded volume (cc).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub dist: DistArgs,

    #[command(flatten)]
    pub mip: MipArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Random seed of the synthetic run.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of pressure steps.
    #[arg(long, default_value_t = 120)]
    pub points: usize,

    #[command(flatten)]
    pub dist: DistArgs,

    #[command(flatten)]
    pub mip: MipArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for plotting a saved run.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Run JSON file produced by `--export-json`.
    #[arg(value_name = "JSON")]
    pub run: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Data file; a synthetic MIP run is shown when omitted.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Read `--file` as pressure / volume columns.
    #[arg(long)]
    pub mip_file: bool,

    /// Seed of the synthetic run.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub dist: DistArgs,

    #[command(flatten)]
    pub mip: MipArgs,
}

impl DistArgs {
    pub fn settings(&self, conversion: ConversionMode) -> PipelineSettings {
        PipelineSettings {
            distribution: DistributionConfig {
                intervals: self.intervals,
                dmin: self.dmin,
                dmax: self.dmax,
            },
            log_base: self.log_base,
            conversion,
            normalize: self.normalize,
            frequency: self.frequency,
            reverse: self.reverse,
        }
    }
}

impl MipArgs {
    pub fn params(&self) -> MipPhysicalParams {
        MipPhysicalParams {
            gs: self.gs,
            ms: self.ms,
            w: self.w,
            teta: self.teta,
            surf_tension: self.surf_tension,
            reference_e: self.reference_e,
        }
    }
}
