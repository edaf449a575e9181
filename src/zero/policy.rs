//! Zero and missing-value policy for measurement tables.
//!
//! Some measurement sets lack an isotopologue entirely (the instrument never
//! detected it) or report a zero intensity. Both break every log-ratio
//! transform, so the decision of what to do with them is made once, at the
//! table boundary, before any transform runs. The transforms themselves
//! always hard-fail on non-positive input.

use crate::data::{MeasurementRow, MeasurementTable};
use crate::error::{FluxError, Result};
use serde::{Deserialize, Serialize};

/// How to resolve missing or non-positive measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPolicy {
    /// Any missing or non-positive measurement is an error.
    Fail,
    /// Drop affected rows, then drop groups left with fewer than 2 rows,
    /// and re-close the survivors.
    Drop,
    /// Add a constant to every raw measurement (missing counts as 0), then
    /// re-close. The classic pseudocount approach.
    Pseudocount(f64),
}

impl Default for ZeroPolicy {
    fn default() -> Self {
        ZeroPolicy::Fail
    }
}

fn usable(row: &MeasurementRow) -> bool {
    matches!(row.measurement, Some(v) if v > 0.0 && v.is_finite())
}

/// Close the natural-fraction column per group of surviving rows.
///
/// After dropping rows, the theoretical baseline no longer sums to one
/// within a group; it is re-closed over the remaining isotopologues so
/// residuals compare like with like.
fn reclose_natural(table: &mut MeasurementTable) {
    let groups = table.groups();
    let mut updates: Vec<(usize, f64)> = Vec::new();
    for group in &groups {
        let total: f64 = group
            .rows
            .iter()
            .filter_map(|&idx| table.rows()[idx].natural_fraction)
            .sum();
        if total == 0.0 {
            continue;
        }
        for &idx in &group.rows {
            if let Some(nf) = table.rows()[idx].natural_fraction {
                updates.push((idx, nf / total));
            }
        }
    }
    let mut rows = std::mem::take(table).into_rows();
    for (idx, value) in updates {
        rows[idx].natural_fraction = Some(value);
    }
    *table = MeasurementTable::new(rows);
}

/// Apply a zero policy, producing a table whose measured fractions are
/// closed over strictly positive measurements.
pub fn apply_zero_policy(table: MeasurementTable, policy: ZeroPolicy) -> Result<MeasurementTable> {
    match policy {
        ZeroPolicy::Fail => {
            for (index, row) in table.rows().iter().enumerate() {
                match row.measurement {
                    None => {
                        return Err(FluxError::MissingValue {
                            sample: row.sample.clone(),
                            metabolite: row.metabolite.clone(),
                            isotopologue: row.isotopologue.clone(),
                        })
                    }
                    Some(v) if !(v > 0.0) || !v.is_finite() => {
                        return Err(FluxError::NonPositiveEntry { index, value: v })
                    }
                    Some(_) => {}
                }
            }
            let mut table = table;
            table.close_measurements();
            Ok(table)
        }
        ZeroPolicy::Drop => {
            let rows: Vec<MeasurementRow> =
                table.into_rows().into_iter().filter(usable).collect();
            let table = MeasurementTable::new(rows);
            // A single surviving isotopologue is no longer a composition.
            let keep: Vec<bool> = {
                let groups = table.groups();
                let mut keep = vec![false; table.n_rows()];
                for group in groups.iter().filter(|g| g.rows.len() >= 2) {
                    for &idx in &group.rows {
                        keep[idx] = true;
                    }
                }
                keep
            };
            let rows: Vec<MeasurementRow> = table
                .into_rows()
                .into_iter()
                .zip(keep)
                .filter_map(|(row, keep)| keep.then_some(row))
                .collect();
            if rows.is_empty() {
                return Err(FluxError::EmptyData(
                    "no complete measurement groups survive the drop policy".to_string(),
                ));
            }
            let mut table = MeasurementTable::new(rows);
            table.close_measurements();
            reclose_natural(&mut table);
            Ok(table)
        }
        ZeroPolicy::Pseudocount(value) => {
            if !(value > 0.0) {
                return Err(FluxError::InvalidParameter(format!(
                    "pseudocount must be positive, got {}",
                    value
                )));
            }
            let rows: Vec<MeasurementRow> = table
                .into_rows()
                .into_iter()
                .map(|mut row| {
                    row.measurement = Some(row.measurement.unwrap_or(0.0) + value);
                    row
                })
                .collect();
            let mut table = MeasurementTable::new(rows);
            table.close_measurements();
            Ok(table)
        }
    }
}
