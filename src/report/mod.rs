//! Reporting utilities: run summary and CPD/PSD tables.

pub mod format;

pub use format::{format_run_summary, format_table};
