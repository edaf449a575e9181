//! Additive log-ratio (ALR) transformation.
//!
//! ALR maps a composition into real space via log-ratios against one
//! designated reference component, which drops out of the output. The
//! coordinates are unconstrained but the map is not distance-preserving in
//! the Aitchison geometry; for isotopologue data the natural reference is
//! the unlabelled mass class m0.

use crate::error::{FluxError, Result};
use crate::transform::{check_positive, closure::close};

fn check_reference(len: usize, ref_idx: usize) -> Result<()> {
    if ref_idx >= len {
        return Err(FluxError::InvalidParameter(format!(
            "ALR reference index {} out of range for composition of length {}",
            ref_idx, len
        )));
    }
    Ok(())
}

/// Forward ALR transform against the component at `ref_idx`.
///
/// Output has length `d - 1`: `ln(x[i]) - ln(x[ref])` for every non-reference
/// component, in original relative order. Fails on any non-positive entry
/// (reference included) or an out-of-range reference.
pub fn alr(composition: &[f64], ref_idx: usize) -> Result<Vec<f64>> {
    check_reference(composition.len(), ref_idx)?;
    check_positive(composition)?;
    let log_ref = composition[ref_idx].ln();
    Ok(composition
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != ref_idx)
        .map(|(_, x)| x.ln() - log_ref)
        .collect())
}

/// Inverse ALR transform.
///
/// Reinserts the reference component (proportional to 1) at `ref_idx`,
/// exponentiates the remaining coordinates, and closes the result.
pub fn alr_inv(coords: &[f64], ref_idx: usize) -> Result<Vec<f64>> {
    let d = coords.len() + 1;
    check_reference(d, ref_idx)?;
    let mut parts = Vec::with_capacity(d);
    let mut it = coords.iter();
    for i in 0..d {
        if i == ref_idx {
            parts.push(1.0);
        } else {
            // Safe: coords has exactly d - 1 entries.
            parts.push(it.next().copied().unwrap_or(f64::NAN).exp());
        }
    }
    Ok(close(&parts))
}
