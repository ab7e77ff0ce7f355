//! Export a distribution as a tab-delimited table.
//!
//! Four columns, one `#` header line:
//!
//! ```text
//! # diameters_cpd	void_ratio_cpd	diameters_psd	void_ratio_psd
//! ```
//!
//! The PSD has one point less than the CPD; its columns are padded with zero
//! rows so every line has four values. The file loads back with `io::ingest`
//! (first two columns) or any spreadsheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Cpd, Psd};
use crate::error::AppError;

pub const HEADER: [&str; 4] = ["# diameters_cpd", "void_ratio_cpd", "diameters_psd", "void_ratio_psd"];

/// Write CPD and PSD columns to `path`.
pub fn write_distribution(path: &Path, cpd: &Cpd, psd: &Psd) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export file '{}': {e}", path.display())))?;
    write_distribution_to(file, cpd, psd)?;
    tracing::info!(path = %path.display(), rows = cpd.len(), "wrote distribution");
    Ok(())
}

pub fn write_distribution_to<W: Write>(sink: W, cpd: &Cpd, psd: &Psd) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink);

    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export header: {e}")))?;

    let rows = cpd.len().max(psd.len());
    for i in 0..rows {
        let value = |v: &[f64]| v.get(i).copied().unwrap_or(0.0).to_string();
        writer
            .write_record([value(&cpd.d[..]), value(&cpd.e[..]), value(&psd.d[..]), value(&psd.e[..])])
            .map_err(|e| AppError::new(2, format!("Failed to write export row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export file: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_columns;

    fn sample() -> (Cpd, Psd) {
        let cpd = Cpd {
            d: vec![1.0, 10.0, 100.0],
            e: vec![0.0, 0.5, 1.0],
            reversed: false,
        };
        let psd = Psd {
            d: vec![3.1622776601683795, 31.622776601683793],
            e: vec![0.5, 0.5],
        };
        (cpd, psd)
    }

    #[test]
    fn four_columns_with_padded_psd() {
        let (cpd, psd) = sample();
        let mut buf = Vec::new();
        write_distribution_to(&mut buf, &cpd, &psd).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "# diameters_cpd\tvoid_ratio_cpd\tdiameters_psd\tvoid_ratio_psd");
        assert_eq!(lines[1], "1\t0\t3.1622776601683795\t0.5");
        assert_eq!(lines[3], "100\t1\t0\t0");
        assert!(lines.iter().all(|l| l.split('\t').count() == 4));
    }

    #[test]
    fn exported_file_reads_back() {
        let (cpd, psd) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psd.txt");
        write_distribution(&path, &cpd, &psd).unwrap();

        let data = read_columns(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(data.first, cpd.d);
        assert_eq!(data.second, cpd.e);
        assert!(data.row_errors.is_empty());
    }
}
