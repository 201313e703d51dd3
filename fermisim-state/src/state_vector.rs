//! Statevector bundled with the system it lives in
//!
//! The free functions of this crate take `(vec, norb, nelec)` triples;
//! [`StateVector`] carries the triple around once its length has been
//! checked.

use crate::one_body::apply_one_body;
use crate::rdm::rdm;
use crate::rotation::apply_orbital_rotation;
use crate::slater::{hartree_fock_state, slater_determinant};
use crate::spin::spin_square;
use crate::strings::indices_to_strings;
use crate::validation::{check_vec_len, norm, vdot};
use fermisim_core::{ComplexMatrix, FermiError, Nelec, Occupation, OrbitalRotation, Result};
use num_complex::Complex64;
use std::fmt;

/// Fock-space statevector of fixed particle number
///
/// # Example
///
/// ```
/// use fermisim_state::StateVector;
///
/// let state = StateVector::hartree_fock(3, (2, 1)).unwrap();
/// assert_eq!(state.dimension(), 9);
/// assert!(state.is_normalized(1e-12));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    norb: usize,
    nelec: Nelec,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Wrap amplitudes, checking the length against the FCI dimension
    ///
    /// # Errors
    /// `DimensionMismatch` for a wrong length, `InvalidInput` if `nelec`
    /// does not fit into `norb` orbitals
    pub fn new(norb: usize, nelec: impl Into<Nelec>, amplitudes: Vec<Complex64>) -> Result<Self> {
        let nelec = nelec.into();
        check_vec_len(amplitudes.len(), norb, nelec)?;
        Ok(Self {
            norb,
            nelec,
            amplitudes,
        })
    }

    /// Hartree-Fock state
    pub fn hartree_fock(norb: usize, nelec: impl Into<Nelec>) -> Result<Self> {
        let nelec = nelec.into();
        Self::new(norb, nelec, hartree_fock_state(norb, nelec)?)
    }

    /// Slater determinant, optionally rotated
    ///
    /// A spinful occupation gives a spinful state even when no beta orbital
    /// is occupied.
    pub fn slater(
        norb: usize,
        occupation: impl Into<Occupation>,
        orbital_rotation: Option<&OrbitalRotation>,
    ) -> Result<Self> {
        let occupation = occupation.into();
        let nelec = occupation.nelec();
        let amplitudes = slater_determinant(norb, occupation, orbital_rotation)?;
        Self::new(norb, nelec, amplitudes)
    }

    #[inline]
    pub fn norb(&self) -> usize {
        self.norb
    }

    #[inline]
    pub fn nelec(&self) -> Nelec {
        self.nelec
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Mutable amplitudes; the length cannot change
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    pub fn norm(&self) -> f64 {
        norm(&self.amplitudes)
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm() - 1.0).abs() < tolerance
    }

    /// Scale to unit norm
    ///
    /// # Errors
    /// `InvalidInput` for the zero vector
    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(FermiError::invalid_input("cannot normalize the zero vector"));
        }
        self.amplitudes.iter_mut().for_each(|a| *a /= norm);
        Ok(())
    }

    /// Inner product `⟨self|other⟩`
    ///
    /// # Errors
    /// `InvalidInput` if the states belong to different systems
    pub fn inner(&self, other: &StateVector) -> Result<Complex64> {
        self.check_same_system(other)?;
        Ok(vdot(&self.amplitudes, &other.amplitudes))
    }

    /// Apply an orbital rotation in place
    pub fn rotate(&mut self, orbital_rotation: &OrbitalRotation) -> Result<()> {
        self.amplitudes =
            apply_orbital_rotation(&self.amplitudes, orbital_rotation, self.norb, self.nelec)?;
        Ok(())
    }

    /// Apply a spin-summed one-body operator
    pub fn apply_one_body(&self, one_body_tensor: &ComplexMatrix) -> Result<StateVector> {
        let amplitudes = apply_one_body(&self.amplitudes, one_body_tensor, self.norb, self.nelec)?;
        Ok(Self {
            amplitudes,
            ..self.clone()
        })
    }

    /// One-particle reduced density matrix
    pub fn one_rdm(&self, spin_summed: bool) -> Result<ComplexMatrix> {
        rdm(&self.amplitudes, self.norb, self.nelec, 1, spin_summed)
    }

    /// Expectation of the total spin squared
    pub fn spin_square(&self) -> Result<f64> {
        spin_square(&self.amplitudes, self.norb, self.nelec)
    }

    /// Bitstrings and amplitudes with magnitude above `threshold`, in
    /// address order
    pub fn nonzero_strings(&self, threshold: f64) -> Result<Vec<(String, Complex64)>> {
        let indices: Vec<usize> = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm() > threshold)
            .map(|(i, _)| i)
            .collect();
        let strings = indices_to_strings(&indices, self.norb, self.nelec)?;
        Ok(strings
            .into_iter()
            .zip(indices)
            .map(|(s, i)| (s, self.amplitudes[i]))
            .collect())
    }

    fn check_same_system(&self, other: &StateVector) -> Result<()> {
        if self.norb != other.norb || self.nelec != other.nelec {
            return Err(FermiError::invalid_input(format!(
                "states of norb={} {} and norb={} {} are not comparable",
                self.norb, self.nelec, other.norb, other.nelec
            )));
        }
        Ok(())
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StateVector(norb={}, {}, dimension={})",
            self.norb,
            self.nelec,
            self.dimension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::random_unitary;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_checks_length() {
        let amplitudes = vec![Complex64::new(0.0, 0.0); 8];
        assert!(matches!(
            StateVector::new(3, (2, 1), amplitudes),
            Err(FermiError::DimensionMismatch { expected: 9, actual: 8 })
        ));
    }

    #[test]
    fn test_hartree_fock() {
        let state = StateVector::hartree_fock(3, (2, 1)).unwrap();
        assert_eq!(state.norb(), 3);
        assert_eq!(state.nelec(), Nelec::Spinful(2, 1));
        assert_eq!(state.amplitudes()[0], Complex64::new(1.0, 0.0));
        assert_eq!(state.to_string(), "StateVector(norb=3, nelec=(2, 1), dimension=9)");
    }

    #[test]
    fn test_normalize() {
        let amplitudes = vec![Complex64::new(3.0, 0.0), Complex64::new(0.0, 4.0), Complex64::new(0.0, 0.0)];
        let mut state = StateVector::new(3, 1, amplitudes).unwrap();
        assert!(!state.is_normalized(1e-12));
        state.normalize().unwrap();
        assert_relative_eq!(state.norm(), 1.0, epsilon = 1e-12);

        let mut zero = StateVector::new(3, 1, vec![Complex64::new(0.0, 0.0); 3]).unwrap();
        assert!(zero.normalize().is_err());
    }

    #[test]
    fn test_rotate_preserves_overlap() {
        let mut rng = StdRng::seed_from_u64(23);
        let rotation = OrbitalRotation::from(random_unitary(4, &mut rng));
        let mut a = StateVector::slater(4, ([0, 1], [0]), None).unwrap();
        let mut b = StateVector::slater(4, ([0, 2], [3]), None).unwrap();
        assert_relative_eq!(a.inner(&b).unwrap().norm(), 0.0);
        a.rotate(&rotation).unwrap();
        b.rotate(&rotation).unwrap();
        assert_relative_eq!(a.inner(&b).unwrap().norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(a.inner(&a).unwrap().re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inner_rejects_other_system() {
        let a = StateVector::hartree_fock(3, (2, 1)).unwrap();
        let b = StateVector::hartree_fock(3, (1, 2)).unwrap();
        assert!(matches!(a.inner(&b), Err(FermiError::InvalidInput(_))));
    }

    #[test]
    fn test_observables() {
        let state = StateVector::slater(2, ([0], [1]), None).unwrap();
        assert_relative_eq!(state.spin_square().unwrap(), 1.0, epsilon = 1e-12);
        let rdm = state.one_rdm(true).unwrap();
        assert_relative_eq!(rdm.trace().re, 2.0, epsilon = 1e-12);
        let doubled = state.apply_one_body(&ComplexMatrix::identity(2)).unwrap();
        assert_eq!(doubled.amplitudes()[1], Complex64::new(2.0, 0.0));
    }

    #[test]
    fn test_nonzero_strings() {
        let mut state = StateVector::hartree_fock(3, (2, 1)).unwrap();
        state.amplitudes_mut()[4] = Complex64::new(0.0, 1.0);
        let strings = state.nonzero_strings(1e-12).unwrap();
        assert_eq!(
            strings,
            vec![
                ("001011".to_string(), Complex64::new(1.0, 0.0)),
                ("010101".to_string(), Complex64::new(0.0, 1.0)),
            ]
        );
    }
}
