//! Read/write run JSON files.
//!
//! A run file is the portable record of one elaboration: where the data came
//! from, the grid that was actually used, and both curves. `psd plot` renders
//! it without re-reading the raw data.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::pipeline::RunOutput;
use crate::domain::{Cpd, DistributionConfig, LogBase, Psd, SourceKind};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub source: SourceKind,
    pub config: DistributionConfig,
    pub log_base: LogBase,
    pub cpd: Cpd,
    pub psd: Psd,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_void_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RunFile {
    pub fn from_run(run: &RunOutput, log_base: LogBase) -> Self {
        Self {
            tool: "psd".to_string(),
            generated: Utc::now(),
            source: run.source,
            config: run.config,
            log_base,
            cpd: run.cpd.clone(),
            psd: run.psd.clone(),
            reference_void_ratio: run.reference_void_ratio,
            warnings: run.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Write a run JSON file.
pub fn write_run_json(path: &Path, run: &RunFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create run JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, run).map_err(|e| AppError::new(2, format!("Failed to write run JSON: {e}")))?;
    Ok(())
}

/// Read a run JSON file.
pub fn read_run_json(path: &Path) -> Result<RunFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open run JSON '{}': {e}", path.display())))?;
    let run: RunFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid run JSON: {e}")))?;
    if run.cpd.d.len() != run.cpd.e.len() || run.psd.d.len() != run.psd.e.len() {
        return Err(AppError::new(3, "Run JSON has columns of different lengths."));
    }
    Ok(run)
}
