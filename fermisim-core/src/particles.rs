//! Particle numbers and orbital occupations
//!
//! A system is either spinless (a single number of fermions) or spinful
//! (separate alpha and beta counts). Spinless systems are addressed exactly
//! like a spinful system with no beta particles.

use crate::error::{FermiError, Result};
use std::fmt;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Number of fermions in each spin sector
///
/// # Example
/// ```
/// use fermisim_core::Nelec;
///
/// let nelec: Nelec = (2, 1).into();
/// assert_eq!(nelec.total(), 3);
/// assert_eq!(Nelec::from(4).pair(), (4, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Nelec {
    /// Spinless fermions
    Spinless(usize),
    /// Spin alpha and spin beta electrons
    Spinful(usize, usize),
}

impl Nelec {
    /// Total number of particles
    #[inline]
    pub fn total(&self) -> usize {
        let (n_alpha, n_beta) = self.pair();
        n_alpha + n_beta
    }

    /// Particle numbers as an (alpha, beta) pair; spinless maps to (n, 0)
    #[inline]
    pub fn pair(&self) -> (usize, usize) {
        match *self {
            Nelec::Spinless(n) => (n, 0),
            Nelec::Spinful(n_alpha, n_beta) => (n_alpha, n_beta),
        }
    }

    /// Whether this is a spinless system
    #[inline]
    pub fn is_spinless(&self) -> bool {
        matches!(self, Nelec::Spinless(_))
    }

    /// Check that every sector fits into `norb` orbitals
    pub fn validate(&self, norb: usize) -> Result<()> {
        let (n_alpha, n_beta) = self.pair();
        if n_alpha > norb || n_beta > norb {
            return Err(FermiError::invalid_input(format!(
                "{} does not fit into {} orbitals",
                self, norb
            )));
        }
        Ok(())
    }
}

impl From<usize> for Nelec {
    #[inline]
    fn from(n: usize) -> Self {
        Nelec::Spinless(n)
    }
}

impl From<(usize, usize)> for Nelec {
    #[inline]
    fn from((n_alpha, n_beta): (usize, usize)) -> Self {
        Nelec::Spinful(n_alpha, n_beta)
    }
}

impl fmt::Display for Nelec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nelec::Spinless(n) => write!(f, "nelec={}", n),
            Nelec::Spinful(a, b) => write!(f, "nelec=({}, {})", a, b),
        }
    }
}

/// Occupied orbitals of an electronic configuration
///
/// # Example
/// ```
/// use fermisim_core::{Nelec, Occupation};
///
/// let occ: Occupation = ([0, 1], [0]).into();
/// assert_eq!(occ.nelec(), Nelec::Spinful(2, 1));
/// assert!(occ.validate(3).is_ok());
/// assert!(occ.validate(1).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Occupation {
    /// Occupied spinless orbitals
    Spinless(Vec<usize>),
    /// Occupied alpha orbitals and occupied beta orbitals
    Spinful(Vec<usize>, Vec<usize>),
}

impl Occupation {
    /// Spinless occupation from any iterator of orbital indices
    pub fn spinless(orbitals: impl IntoIterator<Item = usize>) -> Self {
        Occupation::Spinless(orbitals.into_iter().collect())
    }

    /// Spinful occupation from alpha and beta orbital indices
    pub fn spinful(
        alpha: impl IntoIterator<Item = usize>,
        beta: impl IntoIterator<Item = usize>,
    ) -> Self {
        Occupation::Spinful(alpha.into_iter().collect(), beta.into_iter().collect())
    }

    /// The lowest orbitals filled for the given particle numbers
    pub fn lowest(nelec: Nelec) -> Self {
        match nelec {
            Nelec::Spinless(n) => Occupation::spinless(0..n),
            Nelec::Spinful(n_alpha, n_beta) => Occupation::spinful(0..n_alpha, 0..n_beta),
        }
    }

    /// Occupied alpha orbitals (all orbitals for a spinless system)
    #[inline]
    pub fn alpha(&self) -> &[usize] {
        match self {
            Occupation::Spinless(orbs) => orbs,
            Occupation::Spinful(alpha, _) => alpha,
        }
    }

    /// Occupied beta orbitals (empty for a spinless system)
    #[inline]
    pub fn beta(&self) -> &[usize] {
        match self {
            Occupation::Spinless(_) => &[],
            Occupation::Spinful(_, beta) => beta,
        }
    }

    /// Particle numbers implied by this occupation
    pub fn nelec(&self) -> Nelec {
        match self {
            Occupation::Spinless(orbs) => Nelec::Spinless(orbs.len()),
            Occupation::Spinful(alpha, beta) => Nelec::Spinful(alpha.len(), beta.len()),
        }
    }

    /// Check orbital ranges and duplicates in every sector
    pub fn validate(&self, norb: usize) -> Result<()> {
        validate_sector(self.alpha(), norb, "alpha")?;
        validate_sector(self.beta(), norb, "beta")
    }
}

fn validate_sector(orbitals: &[usize], norb: usize, label: &str) -> Result<()> {
    let mut seen = vec![false; norb];
    for &orb in orbitals {
        if orb >= norb {
            return Err(FermiError::invalid_input(format!(
                "{} orbital {} out of range for {} orbitals",
                label, orb, norb
            )));
        }
        if seen[orb] {
            return Err(FermiError::invalid_input(format!(
                "duplicate {} orbital {}",
                label, orb
            )));
        }
        seen[orb] = true;
    }
    Ok(())
}

impl From<Vec<usize>> for Occupation {
    fn from(orbitals: Vec<usize>) -> Self {
        Occupation::Spinless(orbitals)
    }
}

impl From<&[usize]> for Occupation {
    fn from(orbitals: &[usize]) -> Self {
        Occupation::Spinless(orbitals.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Occupation {
    fn from(orbitals: [usize; N]) -> Self {
        Occupation::Spinless(orbitals.to_vec())
    }
}

impl From<(Vec<usize>, Vec<usize>)> for Occupation {
    fn from((alpha, beta): (Vec<usize>, Vec<usize>)) -> Self {
        Occupation::Spinful(alpha, beta)
    }
}

impl From<(&[usize], &[usize])> for Occupation {
    fn from((alpha, beta): (&[usize], &[usize])) -> Self {
        Occupation::Spinful(alpha.to_vec(), beta.to_vec())
    }
}

impl<const N: usize, const M: usize> From<([usize; N], [usize; M])> for Occupation {
    fn from((alpha, beta): ([usize; N], [usize; M])) -> Self {
        Occupation::Spinful(alpha.to_vec(), beta.to_vec())
    }
}
