//! Two-column text ingest.
//!
//! Both supported inputs are plain numeric tables without a header:
//!
//! - CPD files: `diameter_um  void_ratio`
//! - MIP files: `pressure_psi  intruded_volume_cc`
//!
//! Columns are tab-separated, but any run of whitespace inside a field also
//! splits it, so space-aligned exports from instruments load as well. Lines
//! starting with `#` are comments. Rows that do not parse are skipped and
//! reported; only a file with no usable row at all is an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// The two numeric columns, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnData {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl ColumnData {
    pub fn rows_used(&self) -> usize {
        self.first.len()
    }
}

/// Load two numeric columns from `path`.
pub fn load_columns(path: &Path) -> Result<ColumnData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open data file '{}': {e}", path.display())))?;
    let data = read_columns(file)?;
    tracing::debug!(
        path = %path.display(),
        rows_read = data.rows_read,
        rows_used = data.rows_used(),
        "loaded data file"
    );
    Ok(data)
}

/// Same as [`load_columns`] for any reader.
pub fn read_columns<R: Read>(source: R) -> Result<ColumnData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(idx + 1);
                row_errors.push(RowError {
                    line,
                    message: format!("parse error: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 1);

        match parse_row(&record) {
            Ok(Some((a, b))) => {
                first.push(a);
                second.push(b);
            }
            Ok(None) => rows_read -= 1,
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if first.is_empty() {
        return Err(AppError::new(3, "No numeric rows found in the data file."));
    }

    Ok(ColumnData {
        first,
        second,
        row_errors,
        rows_read,
    })
}

/// `Ok(None)` for a whitespace-only row.
fn parse_row(record: &StringRecord) -> Result<Option<(f64, f64)>, String> {
    let tokens: Vec<&str> = record.iter().flat_map(str::split_whitespace).collect();
    match tokens.as_slice() {
        [] => Ok(None),
        [_] => Err("expected two numeric columns, found one".to_string()),
        [a, b, ..] => Ok(Some((parse_number(a)?, parse_number(b)?))),
    }
}

fn parse_number(token: &str) -> Result<f64, String> {
    // Some instruments write decimal commas.
    let value: f64 = token
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("not a number: '{token}'"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("not a finite number: '{token}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tab_and_space_separated_rows() {
        let text = "# d\te\n1.0\t0.0\n10  0.5\n 100\t 1.0 \n";
        let data = read_columns(text.as_bytes()).unwrap();
        assert_eq!(data.first, vec![1.0, 10.0, 100.0]);
        assert_eq!(data.second, vec![0.0, 0.5, 1.0]);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.rows_read, 3);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let text = "Pressure\tVolume\n10\t0.1\n20\tabc\n30\n40\t0.3\n";
        let data = read_columns(text.as_bytes()).unwrap();
        assert_eq!(data.first, vec![10.0, 40.0]);
        assert_eq!(data.row_errors.len(), 3);
        assert_eq!(data.row_errors[0].line, 1);
        assert_eq!(data.row_errors[1].line, 3);
        assert!(data.row_errors[2].message.contains("found one"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = read_columns("1\t2\t3\n4\t5\t6\n".as_bytes()).unwrap();
        assert_eq!(data.second, vec![2.0, 5.0]);
    }

    #[test]
    fn decimal_commas_are_accepted() {
        let data = read_columns("0,5\t1,25\n".as_bytes()).unwrap();
        assert_eq!((data.first[0], data.second[0]), (0.5, 1.25));
    }

    #[test]
    fn no_usable_rows_is_exit_code_3() {
        let err = read_columns("# only comments\nfoo\tbar\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.txt");
        std::fs::write(&path, "10\t0.1\n100\t0.05\n").unwrap();
        let data = load_columns(&path).unwrap();
        assert_eq!(data.rows_used(), 2);

        let missing = load_columns(&dir.path().join("nope.txt")).unwrap_err();
        assert_eq!(missing.exit_code(), 2);
    }
}
