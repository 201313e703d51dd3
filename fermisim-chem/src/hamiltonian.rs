//! Molecular Hamiltonian in chemist's notation
//!
//! `H = Σ_pq h_pq Σ_σ a†_pσ a_qσ
//!    + ½ Σ_pqrs (pq|rs) Σ_στ a†_pσ a†_rτ a_sτ a_qσ + constant`

use fermisim_core::{ComplexMatrix, FermiError, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// One-body tensor, two-body tensor and constant of a molecular Hamiltonian
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MolecularHamiltonian {
    pub one_body_tensor: ComplexMatrix,
    /// `(pq|rs)` flattened row-major, `norb⁴` entries
    pub two_body_tensor: Vec<f64>,
    pub constant: f64,
}

impl MolecularHamiltonian {
    /// # Errors
    /// `DimensionMismatch` if the one-body tensor is not square or the
    /// two-body tensor does not have `norb⁴` entries
    pub fn new(one_body_tensor: ComplexMatrix, two_body_tensor: Vec<f64>, constant: f64) -> Result<Self> {
        let norb = one_body_tensor.rows();
        one_body_tensor.expect_square(norb)?;
        let expected = norb.pow(4);
        if two_body_tensor.len() != expected {
            return Err(FermiError::dimension_mismatch(expected, two_body_tensor.len()));
        }
        Ok(Self {
            one_body_tensor,
            two_body_tensor,
            constant,
        })
    }

    pub fn norb(&self) -> usize {
        self.one_body_tensor.rows()
    }

    #[inline]
    pub fn two_body(&self, p: usize, q: usize, r: usize, s: usize) -> f64 {
        let n = self.norb();
        self.two_body_tensor[((p * n + q) * n + r) * n + s]
    }

    /// `Σ_pq h_pq D_pq + constant` for a spin-summed 1-RDM
    ///
    /// # Errors
    /// `DimensionMismatch` if `one_rdm` is not `norb × norb`
    pub fn one_body_energy(&self, one_rdm: &ComplexMatrix) -> Result<f64> {
        one_rdm.expect_square(self.norb())?;
        let energy: Complex64 = self
            .one_body_tensor
            .data()
            .iter()
            .zip(one_rdm.data())
            .map(|(h_pq, d_pq)| h_pq * d_pq)
            .sum();
        Ok(energy.re + self.constant)
    }

    /// Energy of the determinant occupying the lowest orbitals of each spin
    ///
    /// # Errors
    /// `InvalidInput` if either electron count exceeds `norb`
    pub fn hartree_fock_energy(&self, nelec: (usize, usize)) -> Result<f64> {
        let (n_alpha, n_beta) = nelec;
        if n_alpha > self.norb() || n_beta > self.norb() {
            return Err(FermiError::invalid_input(format!(
                "nelec=({}, {}) does not fit in {} orbitals",
                n_alpha,
                n_beta,
                self.norb()
            )));
        }
        let h = &self.one_body_tensor;
        let mut energy = self.constant;
        energy += (0..n_alpha).map(|i| h[(i, i)].re).sum::<f64>();
        energy += (0..n_beta).map(|i| h[(i, i)].re).sum::<f64>();
        // same-spin Coulomb minus exchange
        for n in [n_alpha, n_beta] {
            for i in 0..n {
                for j in 0..n {
                    energy += 0.5 * (self.two_body(i, i, j, j) - self.two_body(i, j, j, i));
                }
            }
        }
        for i in 0..n_alpha {
            for j in 0..n_beta {
                energy += self.two_body(i, i, j, j);
            }
        }
        Ok(energy)
    }
}
