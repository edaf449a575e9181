//! Isotopologue label handling.
//!
//! Mass spectrometry exports label each isotopic mass class of a metabolite
//! as `m0` (unlabelled), `m1` (one heavy atom), `m2`, and so on. The mass
//! index orders the components of a composition, so every transform that
//! reports per-coordinate output (balances, residual ratios) sorts group rows
//! by it first. Lexicographic sorting is not enough once `m10` exists.

use crate::error::{FluxError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^m(\d+)$").expect("valid regex literal"))
}

/// Extract the isotopic mass index from an `m<k>` label.
///
/// # Example
/// ```
/// use isoflux::data::mass_index;
/// assert_eq!(mass_index("m0").unwrap(), 0);
/// assert_eq!(mass_index("m12").unwrap(), 12);
/// assert!(mass_index("M+1").is_err());
/// ```
pub fn mass_index(label: &str) -> Result<usize> {
    let captures = label_pattern()
        .captures(label.trim())
        .ok_or_else(|| FluxError::InvalidIsotopologue(label.to_string()))?;
    captures[1]
        .parse::<usize>()
        .map_err(|_| FluxError::InvalidIsotopologue(label.to_string()))
}

/// Sort row indices by the mass index of their isotopologue labels.
///
/// `labels` holds one label per index in `indices`. Fails on the first
/// unparseable label. The sort is stable, so duplicate mass indices keep
/// their input order.
pub fn sort_by_mass(indices: &mut [usize], labels: &[String]) -> Result<()> {
    let mut keyed: Vec<(usize, usize)> = indices
        .iter()
        .zip(labels.iter())
        .map(|(&row, label)| Ok((mass_index(label)?, row)))
        .collect::<Result<_>>()?;
    keyed.sort_by_key(|&(mass, _)| mass);
    for (slot, (_, row)) in indices.iter_mut().zip(keyed) {
        *slot = row;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_index_basic() {
        assert_eq!(mass_index("m0").unwrap(), 0);
        assert_eq!(mass_index("m3").unwrap(), 3);
        assert_eq!(mass_index(" m7 ").unwrap(), 7);
    }

    #[test]
    fn test_mass_index_multi_digit() {
        assert_eq!(mass_index("m10").unwrap(), 10);
        assert_eq!(mass_index("m123").unwrap(), 123);
    }

    #[test]
    fn test_mass_index_invalid() {
        for bad in ["", "m", "m-1", "M1", "x2", "m1b"] {
            assert!(
                matches!(mass_index(bad), Err(FluxError::InvalidIsotopologue(_))),
                "expected failure for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_sort_by_mass() {
        let labels: Vec<String> = ["m2", "m0", "m10", "m1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut indices = vec![0, 1, 2, 3];
        sort_by_mass(&mut indices, &labels).unwrap();
        assert_eq!(indices, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_sort_by_mass_bad_label() {
        let labels: Vec<String> = ["m0", "oops"].iter().map(|s| s.to_string()).collect();
        let mut indices = vec![0, 1];
        assert!(sort_by_mass(&mut indices, &labels).is_err());
    }
}
