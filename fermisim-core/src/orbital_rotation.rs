//! Orbital rotations of the one-particle basis
//!
//! An orbital rotation `U` maps creation operators as
//! `a†_i ↦ Σ_j U[j, i] a†_j`. It can act on both spin sectors at once or
//! independently on each sector, and either sector may be left untouched.

use crate::config::FermiConfig;
use crate::error::{FermiError, Result};
use crate::matrix::ComplexMatrix;

/// One-particle basis rotation for one or both spin sectors
#[derive(Debug, Clone, PartialEq)]
pub enum OrbitalRotation {
    /// Same unitary for alpha and beta
    Both(ComplexMatrix),
    /// Independent optional unitaries for alpha and beta
    PerSpin(Option<ComplexMatrix>, Option<ComplexMatrix>),
}

impl OrbitalRotation {
    /// Rotation applied to the alpha sector, if any
    pub fn alpha(&self) -> Option<&ComplexMatrix> {
        match self {
            OrbitalRotation::Both(u) => Some(u),
            OrbitalRotation::PerSpin(u, _) => u.as_ref(),
        }
    }

    /// Rotation applied to the beta sector, if any
    pub fn beta(&self) -> Option<&ComplexMatrix> {
        match self {
            OrbitalRotation::Both(u) => Some(u),
            OrbitalRotation::PerSpin(_, u) => u.as_ref(),
        }
    }

    /// Check shapes against `norb` and, if configured, unitarity
    pub fn validate(&self, norb: usize, config: &FermiConfig) -> Result<()> {
        for (label, mat) in [("alpha", self.alpha()), ("beta", self.beta())] {
            if let Some(u) = mat {
                u.expect_square(norb)?;
                if config.validate_unitary && !u.is_unitary(config.rtol, config.atol) {
                    return Err(FermiError::invalid_input(format!(
                        "{} orbital rotation is not unitary",
                        label
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<ComplexMatrix> for OrbitalRotation {
    fn from(u: ComplexMatrix) -> Self {
        OrbitalRotation::Both(u)
    }
}

impl From<(ComplexMatrix, ComplexMatrix)> for OrbitalRotation {
    fn from((u_a, u_b): (ComplexMatrix, ComplexMatrix)) -> Self {
        OrbitalRotation::PerSpin(Some(u_a), Some(u_b))
    }
}

impl From<(Option<ComplexMatrix>, Option<ComplexMatrix>)> for OrbitalRotation {
    fn from((u_a, u_b): (Option<ComplexMatrix>, Option<ComplexMatrix>)) -> Self {
        OrbitalRotation::PerSpin(u_a, u_b)
    }
}
