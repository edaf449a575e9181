//! Calibration residuals: measured vs theoretical compositions.
//!
//! For calibration runs the theoretical natural-abundance composition of
//! each metabolite is known, so the accuracy of the spectrometer can be
//! judged by transforming both the measured and the theoretical composition
//! with the same log-ratio transform and differencing the coordinates. Each
//! residual is labelled with the ratio it describes and annotated with the
//! raw measurement total it involves, which is where detection-limit
//! effects show up.

use crate::data::{sort_by_mass, MeasurementTable};
use crate::error::{FluxError, Result};
use crate::transform::Transformation;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One transform-space residual for one measurement group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidualRow {
    pub sample: String,
    pub metabolite: String,
    /// Which ratio this coordinate describes, e.g. `m1:m0` or `m2+:m1`.
    pub ratio: String,
    /// Transformed measured value.
    pub measured: f64,
    /// Transformed theoretical value.
    pub expected: f64,
    /// `measured - expected`.
    pub residual: f64,
    /// Raw measurement total involved in this ratio.
    pub total_measurement: f64,
}

/// Summary statistics over a set of residuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidualSummary {
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub max_abs: f64,
}

fn ratio_labels(transformation: Transformation, d: usize) -> Vec<String> {
    match transformation {
        Transformation::Centered => (0..d).map(|i| format!("m{}:gmean", i)).collect(),
        Transformation::Additive => (0..d.saturating_sub(1))
            .map(|i| format!("m{}:m0", i + 1))
            .collect(),
        Transformation::Isometric => (0..d.saturating_sub(1))
            .map(|i| format!("m{}+:m{}", i + 1, i))
            .collect(),
    }
}

fn ratio_totals(transformation: Transformation, measurements: &[f64]) -> Vec<f64> {
    match transformation {
        Transformation::Centered => measurements.to_vec(),
        Transformation::Additive => measurements[1..]
            .iter()
            .map(|m| measurements[0] + m)
            .collect(),
        Transformation::Isometric => (0..measurements.len().saturating_sub(1))
            .map(|i| measurements[i..].iter().sum())
            .collect(),
    }
}

/// Compute per-coordinate residuals for every measurement group.
///
/// Rows within a group are sorted by isotopologue mass index before the
/// transform, so labels and coordinates line up across groups. Every row
/// must carry both a measurement and a natural fraction; the zero policy is
/// expected to have run first. Groups are independent, so they are
/// processed in parallel; the output keeps first-appearance group order.
pub fn residuals(
    table: &MeasurementTable,
    transformation: Transformation,
) -> Result<Vec<ResidualRow>> {
    let groups = table.groups();
    let per_group: Vec<Vec<ResidualRow>> = groups
        .par_iter()
        .map(|group| {
            let labels: Vec<String> = group
                .rows
                .iter()
                .map(|&idx| table.rows()[idx].isotopologue.clone())
                .collect();
            let mut sorted = group.rows.clone();
            sort_by_mass(&mut sorted, &labels)?;

            let mut measurements = Vec::with_capacity(sorted.len());
            let mut natural = Vec::with_capacity(sorted.len());
            for &idx in &sorted {
                let row = &table.rows()[idx];
                let missing = || FluxError::MissingValue {
                    sample: row.sample.clone(),
                    metabolite: row.metabolite.clone(),
                    isotopologue: row.isotopologue.clone(),
                };
                measurements.push(row.measurement.ok_or_else(missing)?);
                natural.push(row.natural_fraction.ok_or_else(missing)?);
            }

            let measured = transformation.forward(&measurements)?;
            let expected = transformation.forward(&natural)?;
            let labels = ratio_labels(transformation, sorted.len());
            let totals = ratio_totals(transformation, &measurements);
            Ok(measured
                .iter()
                .zip(&expected)
                .zip(labels)
                .zip(totals)
                .map(|(((&m, &e), ratio), total)| ResidualRow {
                    sample: group.key.sample.clone(),
                    metabolite: group.key.metabolite.clone(),
                    ratio,
                    measured: m,
                    expected: e,
                    residual: m - e,
                    total_measurement: total,
                })
                .collect())
        })
        .collect::<Result<_>>()?;
    Ok(per_group.into_iter().flatten().collect())
}

/// Summarize residuals: count, mean, sample standard deviation, max |r|.
pub fn summarize(rows: &[ResidualRow]) -> ResidualSummary {
    let n = rows.len();
    if n == 0 {
        return ResidualSummary {
            n: 0,
            mean: f64::NAN,
            sd: f64::NAN,
            max_abs: f64::NAN,
        };
    }
    let mean = rows.iter().map(|r| r.residual).sum::<f64>() / n as f64;
    let sd = if n > 1 {
        (rows
            .iter()
            .map(|r| (r.residual - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64)
            .sqrt()
    } else {
        f64::NAN
    };
    let max_abs = rows
        .iter()
        .map(|r| r.residual.abs())
        .fold(0.0_f64, f64::max);
    ResidualSummary {
        n,
        mean,
        sd,
        max_abs,
    }
}
