//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{Cpd, LogBase, Psd};

/// Format the run summary (input, grid actually used, headline numbers).
pub fn format_run_summary(run: &RunOutput, log_base: LogBase, input_label: &str) -> String {
    let mut out = String::new();

    out.push_str("=== psd - Pore Size Distribution ===\n");
    out.push_str(&format!("Input: {input_label} ({})\n", run.source.display_name()));
    out.push_str(&format!(
        "Observed: n={} | d=[{:.5}, {:.5}] um\n",
        run.observed.count, run.observed.min, run.observed.max
    ));
    out.push_str(&format!(
        "Grid: intervals={} | d=[{:.5}, {:.5}] um | PSD as {}\n",
        run.config.intervals,
        run.config.dmin,
        run.config.dmax,
        log_base.label()
    ));

    out.push_str("\nResults:\n");
    out.push_str(&format!("- CPD points       : {}\n", run.cpd.len()));
    out.push_str(&format!("- total void ratio : {:.4}\n", run.cpd.total()));
    if let Some((d, e)) = run.psd.peak() {
        out.push_str(&format!("- dominant pore    : {d:.5} um ({e:.4})\n"));
    }
    if let Some(e_sat) = run.reference_void_ratio {
        out.push_str(&format!("- reference e      : {e_sat:.4}\n"));
    }
    if run.cpd.reversed {
        out.push_str("- CPD cumulated from the large-pore end\n");
    }

    if !run.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &run.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

/// CPD and PSD side by side; the PSD column is one row shorter.
pub fn format_table(cpd: &Cpd, psd: &Psd) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>5} {:>12} {:>10} {:>12} {:>12}\n",
            "i", "d_cpd_um", "e_cpd", "d_psd_um", "e_psd"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(format!("{:-<5} {:-<12} {:-<10} {:-<12} {:-<12}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for i in 0..cpd.len() {
        let psd_cols = match (psd.d.get(i), psd.e.get(i)) {
            (Some(d), Some(e)) => format!("{:>12} {:>12}", fmt_sig(*d), fmt_sig(*e)),
            _ => String::new(),
        };
        out.push_str(
            format!(
                "{:>5} {:>12} {:>10.5} {}\n",
                i,
                fmt_sig(cpd.d[i]),
                cpd.e[i],
                psd_cols
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Diameters span several decades; keep four significant digits.
fn fmt_sig(v: f64) -> String {
    if v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e4) {
        format!("{v:.3e}")
    } else {
        format!("{v:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{RawInput, run_pipeline};
    use crate::distribution::ClampResolver;
    use crate::domain::{Curve, DistributionConfig, PipelineSettings};

    fn run() -> RunOutput {
        let settings = PipelineSettings {
            distribution: DistributionConfig {
                intervals: 10,
                dmin: 1.0,
                dmax: 100.0,
            },
            ..PipelineSettings::default()
        };
        let input = RawInput::Curve(Curve::new(vec![1.0, 10.0, 100.0], vec![0.0, 0.6, 1.0]).unwrap());
        run_pipeline(&settings, &input, &mut ClampResolver).unwrap()
    }

    #[test]
    fn summary_reports_grid_peak_and_warnings() {
        let txt = format_run_summary(&run(), LogBase::Ten, "sample.txt");
        assert!(txt.contains("Input: sample.txt (cumulative distribution file)"));
        assert!(txt.contains("Grid: intervals=3 | d=[1.00000, 100.00000] um | PSD as de/dlog10(d)"));
        assert!(txt.contains("- total void ratio : 1.0000"));
        assert!(txt.contains("- dominant pore    : 3.16228 um (0.6000)"));
        assert!(txt.contains("too many intervals: 10 requested, reduced to 3"));
        assert!(!txt.contains("reference e"));
    }

    #[test]
    fn table_has_one_row_per_cpd_point() {
        let out = run();
        let txt = format_table(&out.cpd, &out.psd);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 2 + 3);
        assert!(lines[2].starts_with("    0       1.0000    0.00000"));
        // Last CPD row has no PSD counterpart.
        assert_eq!(lines[4], "    2     100.0000    1.00000");
    }

    #[test]
    fn tiny_and_huge_values_use_exponents() {
        assert_eq!(fmt_sig(0.0005), "5.000e-4");
        assert_eq!(fmt_sig(12.5), "12.5000");
        assert_eq!(fmt_sig(0.0), "0.0000");
    }
}
