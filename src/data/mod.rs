//! Data structures for isotope-labelling measurement tables.

mod isotopologue;
mod table;

pub use isotopologue::{mass_index, sort_by_mass};
pub use table::{GroupKey, MeasurementGroup, MeasurementRow, MeasurementTable};
