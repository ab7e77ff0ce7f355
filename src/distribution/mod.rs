//! The numerical pipeline, stage by stage.
//!
//! raw samples → (`mip::convert`) → `orient` → `boundary::reconcile`
//! → `resample` → `differentiate` → (`normalize`)
//!
//! Each stage is a pure function over its inputs; the only caller interaction
//! is the range-conflict resolver handed to `reconcile`.

pub mod boundary;
pub mod differentiate;
pub mod mip;
pub mod normalize;
pub mod orient;
pub mod resample;

pub use boundary::{ClampResolver, FailResolver, RangeConflict, RangeConflictResolver, Reconciled, reconcile};
pub use differentiate::{differentiate, to_frequency};
pub use mip::convert;
pub use normalize::{NormalizedViews, normalize, normalized_views};
pub use orient::{is_canonical, orient};
pub use resample::{Resampled, resample};
