//! Centered log-ratio (CLR) transformation.
//!
//! CLR maps a composition into real space by taking the log of each entry
//! relative to the geometric mean of the whole composition. Dimensionality
//! is preserved but the image lies in the zero-sum hyperplane, so one degree
//! of freedom is only apparent.
//!
//! # Formula
//! `clr(x)[i] = ln(x[i]) - mean(ln(x))`

use crate::error::Result;
use crate::transform::{check_positive, closure::close};

/// Forward CLR transform.
///
/// Output has the same length as the input and sums to zero. Fails on any
/// non-positive entry.
pub fn clr(composition: &[f64]) -> Result<Vec<f64>> {
    check_positive(composition)?;
    let logs: Vec<f64> = composition.iter().map(|x| x.ln()).collect();
    let mean_log: f64 = logs.iter().sum::<f64>() / logs.len() as f64;
    Ok(logs.iter().map(|l| l - mean_log).collect())
}

/// Inverse CLR transform: exponentiate and close.
///
/// Recovers the closure of the original composition exactly (up to floating
/// point) when applied to an unperturbed forward image.
pub fn clr_inv(coords: &[f64]) -> Vec<f64> {
    let exps: Vec<f64> = coords.iter().map(|y| y.exp()).collect();
    close(&exps)
}
