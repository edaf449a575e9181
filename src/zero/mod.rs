//! Zero and missing-value handling at the table boundary.

mod policy;

pub use policy::{apply_zero_policy, ZeroPolicy};
