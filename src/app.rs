//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments (after loading `.env`)
//! - loads the data (file or synthetic)
//! - runs the elaboration pipeline
//! - prints summary/plots
//! - writes optional exports

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::pipeline::{Elaboration, RawInput, RunOutput};
use crate::cli::prompt::PromptResolver;
use crate::cli::{Command, CpdArgs, DemoArgs, DistArgs, MipRunArgs, OutputArgs, PlotArgs};
use crate::data::{SyntheticSpec, generate_mip_run};
use crate::distribution::{ClampResolver, FailResolver, RangeConflictResolver};
use crate::domain::{ConversionMode, Curve, LogBase, PipelineSettings, RangePolicy};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `psd` binary.
pub fn run() -> Result<(), AppError> {
    // Env-backed flags (PSD_DMIN, PSD_GS, ...) may come from a project `.env`.
    dotenvy::dotenv().ok();

    // We want `psd` and `psd -n 60` to behave like `psd tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; it reports warnings in its status line.
    if !matches!(cli.command, Command::Tui(_)) {
        init_tracing(cli.verbose);
    }

    match cli.command {
        Command::Cpd(args) => handle_cpd(args),
        Command::Mip(args) => handle_mip(args),
        Command::Demo(args) => handle_demo(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_cpd(args: CpdArgs) -> Result<(), AppError> {
    let columns = load(&args.file)?;
    let curve = Curve::new(columns.first, columns.second)?;
    let settings = settings_for(&args.dist, &args.output, ConversionMode::Axial);
    elaborate(settings, RawInput::Curve(curve), &args.dist, &args.output, &args.file.display().to_string())
}

fn handle_mip(args: MipRunArgs) -> Result<(), AppError> {
    let columns = load(&args.file)?;
    let input = RawInput::Mip {
        pressure_psi: columns.first,
        volume_cc: columns.second,
        params: args.mip.params(),
    };
    let settings = settings_for(&args.dist, &args.output, args.mip.mode);
    elaborate(settings, input, &args.dist, &args.output, &args.file.display().to_string())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let run = generate_mip_run(&SyntheticSpec {
        points: args.points,
        seed: args.seed,
        params: args.mip.params(),
        ..SyntheticSpec::default()
    })?;
    let input = RawInput::Mip {
        pressure_psi: run.pressure_psi,
        volume_cc: run.volume_cc,
        params: run.params,
    };
    let settings = settings_for(&args.dist, &args.output, args.mip.mode);
    elaborate(settings, input, &args.dist, &args.output, &format!("synthetic run (seed {})", run.seed))
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let run = crate::io::read_run_json(&args.run)?;
    println!(
        "Run: {} | generated {} | intervals={} | d=[{}, {}] um",
        run.source.display_name(),
        run.generated.format("%Y-%m-%d %H:%M:%S UTC"),
        run.config.intervals,
        run.config.dmin,
        run.config.dmax
    );
    let plot = crate::plot::render_distribution_plot(
        &run.cpd,
        &run.psd,
        run.reference_void_ratio,
        run.log_base,
        args.width,
        args.height,
    );
    println!("{plot}");
    Ok(())
}

fn load(path: &Path) -> Result<crate::io::ColumnData, AppError> {
    let columns = crate::io::load_columns(path)?;
    for err in &columns.row_errors {
        tracing::warn!(line = err.line, "skipped row: {}", err.message);
    }
    Ok(columns)
}

fn settings_for(dist: &DistArgs, output: &OutputArgs, conversion: ConversionMode) -> PipelineSettings {
    let mut settings = dist.settings(conversion);
    settings.normalize |= output.export_normalized.is_some();
    settings
}

pub fn resolver_for(policy: RangePolicy) -> Box<dyn RangeConflictResolver> {
    match policy {
        RangePolicy::Prompt => Box::new(PromptResolver::stdio()),
        RangePolicy::Fail => Box::new(FailResolver),
        RangePolicy::Clamp => Box::new(ClampResolver),
    }
}

fn elaborate(
    settings: PipelineSettings,
    input: RawInput,
    dist: &DistArgs,
    output: &OutputArgs,
    input_label: &str,
) -> Result<(), AppError> {
    let log_base = settings.log_base;
    let mut session = Elaboration::new(settings, input);
    let mut resolver = resolver_for(dist.on_range_conflict);
    let run = session.run(resolver.as_mut())?;

    print_run(run, log_base, output, input_label);
    write_exports(run, log_base, output)
}

fn print_run(run: &RunOutput, log_base: LogBase, output: &OutputArgs, input_label: &str) {
    println!("{}", crate::report::format_run_summary(run, log_base, input_label));

    if output.table {
        println!("{}", crate::report::format_table(&run.cpd, &run.psd));
    }

    if output.no_plot {
        return;
    }
    println!(
        "{}",
        crate::plot::render_distribution_plot(
            &run.cpd,
            &run.psd,
            run.reference_void_ratio,
            log_base,
            output.width,
            output.height,
        )
    );
    if let Some(views) = &run.normalized {
        println!("Normalized (e / max e):");
        println!(
            "{}",
            crate::plot::render_distribution_plot(&views.cpd, &views.psd, None, log_base, output.width, output.height)
        );
    }
    if let Some(freq) = &run.frequency {
        println!(
            "{}",
            crate::plot::render_ascii_plot("frequency (sums to 1)", &freq.points(), None, output.width, output.height)
        );
    }
}

fn write_exports(run: &RunOutput, log_base: LogBase, output: &OutputArgs) -> Result<(), AppError> {
    if let Some(path) = &output.export {
        crate::io::write_distribution(path, &run.cpd, &run.psd)?;
    }
    if let Some(path) = &output.export_normalized {
        let views = run
            .normalized
            .as_ref()
            .ok_or_else(|| AppError::new(4, "Normalized views were not computed."))?;
        crate::io::write_distribution(path, &views.cpd, &views.psd)?;
    }
    if let Some(path) = &output.export_json {
        crate::io::write_run_json(path, &crate::io::RunFile::from_run(run, log_base))?;
    }
    Ok(())
}

/// Rewrite argv so `psd` defaults to `psd tui`.
///
/// Rules:
/// - `psd`                      -> `psd tui`
/// - `psd -n 60 ...`            -> `psd tui -n 60 ...`
/// - `psd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "cpd" | "mip" | "demo" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_tui() {
        assert_eq!(rewrite_args(argv(&["psd"])), argv(&["psd", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["psd", "-n", "60"])),
            argv(&["psd", "tui", "-n", "60"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [&["psd", "cpd", "a.txt"][..], &["psd", "--help"], &["psd", "plot", "run.json"]] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn exports_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputArgs {
            no_plot: true,
            table: false,
            width: 40,
            height: 10,
            export: Some(dir.path().join("psd.txt")),
            export_normalized: Some(dir.path().join("norm.txt")),
            export_json: Some(dir.path().join("run.json")),
        };
        let settings = PipelineSettings {
            normalize: true,
            ..PipelineSettings::default()
        };
        let input = RawInput::Curve(
            Curve::new(vec![0.004, 1.0, 50.0, 200.0], vec![0.0, 0.1, 0.5, 0.6]).unwrap(),
        );
        let mut session = Elaboration::new(settings, input);
        let run = session.run(&mut FailResolver).unwrap();
        write_exports(run, LogBase::Ten, &output).unwrap();

        let norm = crate::io::load_columns(&dir.path().join("norm.txt")).unwrap();
        assert_eq!(norm.second.last().copied(), Some(1.0));
        let json = crate::io::read_run_json(&dir.path().join("run.json")).unwrap();
        assert_eq!(json.cpd.len(), 4);
        assert!(dir.path().join("psd.txt").exists());
    }
}
