//! Isometric log-ratio (ILR) transformation.
//!
//! ILR embeds a d-part composition into `R^(d-1)` using an orthonormal basis
//! of log-contrasts, so Euclidean distances between images equal Aitchison
//! distances between the compositions. The basis comes from a sequential
//! binary partition: step i separates component i from the pool of
//! components i+1..d-1, so balance i reads as `m<i+1>+ : m<i>` for
//! isotopologue data.

use crate::error::{FluxError, Result};
use crate::transform::clr::{clr, clr_inv};
use nalgebra::{DMatrix, DVector};

/// Sequential-binary-partition sign matrix for `d` components.
///
/// Row i has -1 for component i ("down" side), +1 for components i+1..d-1
/// ("up" side), and 0 before i. Fails for `d < 2`, where no partition
/// exists.
pub fn sbp_sign_matrix(d: usize) -> Result<DMatrix<f64>> {
    if d < 2 {
        return Err(FluxError::InvalidParameter(format!(
            "ILR basis requires at least 2 components, got {}",
            d
        )));
    }
    let mut signs = DMatrix::zeros(d - 1, d);
    for i in 0..d - 1 {
        signs[(i, i)] = -1.0;
        for j in i + 1..d {
            signs[(i, j)] = 1.0;
        }
    }
    Ok(signs)
}

/// Orthonormalize a sequential-binary-partition sign matrix.
///
/// Each row becomes a unit-norm, zero-sum contrast: with r components on the
/// +1 side and s on the -1 side, +1 entries become `sqrt(s / (r (r + s)))`
/// and -1 entries `-sqrt(r / (s (r + s)))`. Rows of a proper sequential
/// partition come out mutually orthogonal.
pub fn orthonormalize_sbp(signs: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (n_rows, n_cols) = signs.shape();
    let mut basis = DMatrix::zeros(n_rows, n_cols);
    for i in 0..n_rows {
        let r = signs.row(i).iter().filter(|&&v| v > 0.0).count() as f64;
        let s = signs.row(i).iter().filter(|&&v| v < 0.0).count() as f64;
        if r == 0.0 || s == 0.0 {
            return Err(FluxError::InvalidParameter(format!(
                "partition row {} must have components on both sides",
                i
            )));
        }
        let up = (s / (r * (r + s))).sqrt();
        let down = -(r / (s * (r + s))).sqrt();
        for j in 0..n_cols {
            basis[(i, j)] = match signs[(i, j)].partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Greater) => up,
                Some(std::cmp::Ordering::Less) => down,
                _ => 0.0,
            };
        }
    }
    Ok(basis)
}

/// Default orthonormal ILR basis for `d` components.
pub fn default_basis(d: usize) -> Result<DMatrix<f64>> {
    orthonormalize_sbp(&sbp_sign_matrix(d)?)
}

fn check_basis(basis: &DMatrix<f64>, d: usize) -> Result<()> {
    if basis.shape() != (d - 1, d) {
        return Err(FluxError::DimensionMismatch {
            expected: d - 1,
            actual: basis.nrows(),
        });
    }
    Ok(())
}

/// Forward ILR transform: project the CLR image onto the basis.
///
/// Output has length `d - 1`, one balance per partition. Fails on
/// non-positive entries or a basis of the wrong shape.
pub fn ilr(composition: &[f64], basis: &DMatrix<f64>) -> Result<Vec<f64>> {
    check_basis(basis, composition.len())?;
    let clr_vec = DVector::from_vec(clr(composition)?);
    Ok((basis * clr_vec).iter().copied().collect())
}

/// Inverse ILR transform: back-project the balances and invert the CLR.
pub fn ilr_inv(balances: &[f64], basis: &DMatrix<f64>) -> Result<Vec<f64>> {
    check_basis(basis, balances.len() + 1)?;
    let clr_vec = basis.transpose() * DVector::from_column_slice(balances);
    Ok(clr_inv(clr_vec.as_slice()))
}

/// Aitchison distance between two compositions of equal length.
///
/// Defined as the Euclidean norm of the difference of the CLR images; the
/// ILR transform preserves it exactly.
pub fn aitchison_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(FluxError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let ca = clr(a)?;
    let cb = clr(b)?;
    Ok(ca
        .iter()
        .zip(&cb)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt())
}
