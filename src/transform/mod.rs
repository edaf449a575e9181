//! Log-ratio transforms between the simplex and unconstrained space.
//!
//! Three forward/inverse pairs are provided:
//!
//! - **additive** (ALR): log-ratios against a reference component, `d - 1`
//!   coordinates, not distance-preserving.
//! - **centered** (CLR): log-ratios against the geometric mean, `d`
//!   coordinates summing to zero.
//! - **isometric** (ILR): orthonormal balances from a sequential binary
//!   partition, `d - 1` coordinates, distance-preserving in the Aitchison
//!   geometry.
//!
//! All forward transforms reject non-positive entries explicitly rather than
//! letting `ln` produce non-finite values that contaminate downstream
//! aggregates. All inverse transforms return closed compositions.

pub mod alr;
pub mod closure;
pub mod clr;
pub mod ilr;

pub use alr::{alr, alr_inv};
pub use closure::{close, close_grouped};
pub use clr::{clr, clr_inv};
pub use ilr::{aitchison_distance, default_basis, ilr, ilr_inv, orthonormalize_sbp, sbp_sign_matrix};

use crate::error::{FluxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reject compositions outside the domain of the log-ratio transforms.
pub(crate) fn check_positive(composition: &[f64]) -> Result<()> {
    if composition.is_empty() {
        return Err(FluxError::EmptyData(
            "cannot transform an empty composition".to_string(),
        ));
    }
    for (index, &value) in composition.iter().enumerate() {
        if !(value > 0.0) || !value.is_finite() {
            return Err(FluxError::NonPositiveEntry { index, value });
        }
    }
    Ok(())
}

/// The transform family, by name.
///
/// The defaults match the original analysis: ALR uses the first component
/// (the unlabelled isotopologue m0) as reference, ILR uses the sequential
/// binary partition basis of [`default_basis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transformation {
    /// Additive log-ratio, reference component 0.
    Additive,
    /// Centered log-ratio.
    Centered,
    /// Isometric log-ratio, sequential-binary-partition basis.
    Isometric,
}

impl Transformation {
    /// All valid transformation names, as accepted by [`FromStr`].
    pub const NAMES: [&'static str; 3] = ["additive", "centered", "isometric"];

    /// Forward transform of a strictly positive composition.
    pub fn forward(&self, composition: &[f64]) -> Result<Vec<f64>> {
        match self {
            Transformation::Additive => alr(composition, 0),
            Transformation::Centered => clr(composition),
            Transformation::Isometric => {
                let basis = default_basis(composition.len())?;
                ilr(composition, &basis)
            }
        }
    }

    /// Inverse transform back to a closed composition.
    pub fn inverse(&self, coords: &[f64]) -> Result<Vec<f64>> {
        match self {
            Transformation::Additive => alr_inv(coords, 0),
            Transformation::Centered => Ok(clr_inv(coords)),
            Transformation::Isometric => {
                let basis = default_basis(coords.len() + 1)?;
                ilr_inv(coords, &basis)
            }
        }
    }

    /// Length of the forward image of a `d`-part composition.
    pub fn output_len(&self, d: usize) -> usize {
        match self {
            Transformation::Centered => d,
            Transformation::Additive | Transformation::Isometric => d.saturating_sub(1),
        }
    }
}

impl FromStr for Transformation {
    type Err = FluxError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(Transformation::Additive),
            "centered" => Ok(Transformation::Centered),
            "isometric" => Ok(Transformation::Isometric),
            _ => Err(FluxError::UnknownTransformation {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transformation::Additive => "additive",
            Transformation::Centered => "centered",
            Transformation::Isometric => "isometric",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "additive".parse::<Transformation>().unwrap(),
            Transformation::Additive
        );
        assert_eq!(
            "Centered".parse::<Transformation>().unwrap(),
            Transformation::Centered
        );
        assert_eq!(
            " isometric ".parse::<Transformation>().unwrap(),
            Transformation::Isometric
        );
    }

    #[test]
    fn test_parse_unknown_name_lists_options() {
        let err = "xyz".parse::<Transformation>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("xyz"));
        for name in Transformation::NAMES {
            assert!(message.contains(name), "missing option {} in {}", name, message);
        }
    }

    #[test]
    fn test_output_len() {
        assert_eq!(Transformation::Additive.output_len(4), 3);
        assert_eq!(Transformation::Centered.output_len(4), 4);
        assert_eq!(Transformation::Isometric.output_len(4), 3);
    }

    #[test]
    fn test_round_trip_all_transforms() {
        let x = [0.62, 0.25, 0.09, 0.04];
        let expected = close(&x);
        for t in [
            Transformation::Additive,
            Transformation::Centered,
            Transformation::Isometric,
        ] {
            let recovered = t.inverse(&t.forward(&x).unwrap()).unwrap();
            assert_eq!(recovered.len(), x.len());
            for (r, e) in recovered.iter().zip(&expected) {
                assert_relative_eq!(r, e, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_domain_error_all_transforms() {
        for t in [
            Transformation::Additive,
            Transformation::Centered,
            Transformation::Isometric,
        ] {
            assert!(t.forward(&[0.5, 0.0, 0.5]).is_err());
            assert!(t.forward(&[0.5, -1.0, 1.5]).is_err());
        }
    }

    #[test]
    fn test_serde_lowercase_names() {
        let yaml = serde_yaml::to_string(&Transformation::Isometric).unwrap();
        assert_eq!(yaml.trim(), "isometric");
        let parsed: Transformation = serde_yaml::from_str("centered").unwrap();
        assert_eq!(parsed, Transformation::Centered);
    }
}
