//! Input data that does not come from a file.

pub mod synthetic;

pub use synthetic::{PoreMode, SyntheticRun, SyntheticSpec, generate_mip_run};
