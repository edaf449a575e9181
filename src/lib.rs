//! Compositional analysis of isotope-labelling mass spectrometry data.
//!
//! Isotope-labelling measurements in fluxomics are compositional: each
//! (sample, metabolite) group of isotopologue intensities carries relative
//! information only. This library provides the primitives for working with
//! such data:
//!
//! - **data**: the long-format measurement table, grouping, isotopologue
//!   label handling
//! - **transform**: the closure operator and the additive / centered /
//!   isometric log-ratio transform pairs
//! - **zero**: missing-value and zero handling at the table boundary
//! - **simulate**: synthetic measurements via Gaussian noise in transform
//!   space
//! - **calibrate**: residuals of measured vs theoretical compositions
//!
//! # Example
//!
//! ```no_run
//! use isoflux::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> isoflux::error::Result<()> {
//! let table = MeasurementTable::from_csv("measurements.csv")?;
//! let table = apply_zero_policy(table, ZeroPolicy::Drop)?;
//!
//! let config = SimulationConfig::new("isometric", 0.1)?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let simulated = simulate_table(&table, &config, &mut rng)?;
//! table.to_csv_with_column("simulated.csv", "sim_fraction", &simulated)?;
//! # Ok(())
//! # }
//! ```

pub mod calibrate;
pub mod data;
pub mod error;
pub mod simulate;
pub mod transform;
pub mod zero;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::calibrate::{residuals, summarize, ResidualRow, ResidualSummary};
    pub use crate::data::{
        mass_index, GroupKey, MeasurementGroup, MeasurementRow, MeasurementTable,
    };
    pub use crate::error::{FluxError, Result};
    pub use crate::simulate::{simulate_composition, simulate_table, SimulationConfig};
    pub use crate::transform::{
        aitchison_distance, alr, alr_inv, close, close_grouped, clr, clr_inv, default_basis,
        ilr, ilr_inv, sbp_sign_matrix, Transformation,
    };
    pub use crate::zero::{apply_zero_policy, ZeroPolicy};
}
