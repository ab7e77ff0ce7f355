//! `pore-sizer` library crate.
//!
//! The binary (`psd`) is a thin wrapper around this library so that:
//!
//! - the numerical pipeline is testable without spawning processes
//! - modules are reusable (other front-ends, notebooks, batch scripts)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
