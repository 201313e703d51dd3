//! Givens decomposition of orbital rotations
//!
//! A unitary `U` is reduced to a diagonal of phases by left-multiplying
//! 2×2 rotations on adjacent rows, clearing the lower triangle one column at
//! a time. Inverting that sequence gives `U = R_1 ⋯ R_m · diag(phases)`,
//! where each `R_k` only mixes two orbitals. On the Fock space every factor
//! then acts on pairs of strings, so a rotation never needs the full induced
//! matrix of a particle-number sector.

use crate::error::{FermiError, Result};
use crate::matrix::ComplexMatrix;
use num_complex::Complex64;

/// 2×2 unitary acting on orbitals `p < q`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GivensRotation {
    pub p: usize,
    pub q: usize,
    /// `[[w_pp, w_pq], [w_qp, w_qq]]`
    pub matrix: [[Complex64; 2]; 2],
}

impl GivensRotation {
    pub fn determinant(&self) -> Complex64 {
        let w = &self.matrix;
        w[0][0] * w[1][1] - w[0][1] * w[1][0]
    }

    /// Embed into an `n × n` identity
    pub fn to_matrix(&self, n: usize) -> ComplexMatrix {
        let mut m = ComplexMatrix::identity(n);
        m[(self.p, self.p)] = self.matrix[0][0];
        m[(self.p, self.q)] = self.matrix[0][1];
        m[(self.q, self.p)] = self.matrix[1][0];
        m[(self.q, self.q)] = self.matrix[1][1];
        m
    }
}

/// `U = R_1 ⋯ R_m · diag(phases)`
#[derive(Debug, Clone, PartialEq)]
pub struct GivensDecomposition {
    pub rotations: Vec<GivensRotation>,
    pub phases: Vec<Complex64>,
}

impl GivensDecomposition {
    /// Multiply the factors back together
    pub fn reconstruct(&self) -> Result<ComplexMatrix> {
        let n = self.phases.len();
        let mut u = ComplexMatrix::identity(n);
        for rotation in &self.rotations {
            u = u.matmul(&rotation.to_matrix(n))?;
        }
        u.matmul(&ComplexMatrix::from_diagonal(&self.phases))
    }
}

/// Decompose a unitary into adjacent-orbital rotations and phases
///
/// The input is assumed unitary; for other matrices the discarded upper
/// triangle makes the factorization inexact.
///
/// # Errors
/// Returns `DimensionMismatch` for a non-square matrix
pub fn givens_decomposition(u: &ComplexMatrix) -> Result<GivensDecomposition> {
    if !u.is_square() {
        return Err(FermiError::dimension_mismatch(u.rows(), u.cols()));
    }
    let n = u.rows();
    let mut work = u.clone();
    let mut eliminations = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for col in 0..n {
        for row in (col + 1..n).rev() {
            let a = work[(row - 1, col)];
            let b = work[(row, col)];
            if b.norm() == 0.0 {
                continue;
            }
            let r = a.norm().hypot(b.norm());
            let g = [[a.conj() / r, b.conj() / r], [-b / r, a / r]];
            for k in 0..n {
                let x = work[(row - 1, k)];
                let y = work[(row, k)];
                work[(row - 1, k)] = g[0][0] * x + g[0][1] * y;
                work[(row, k)] = g[1][0] * x + g[1][1] * y;
            }
            eliminations.push((row - 1, row, g));
        }
    }

    // G_m ⋯ G_1 U = D, so U = G_1† ⋯ G_m† D
    let rotations = eliminations
        .into_iter()
        .map(|(p, q, g)| GivensRotation {
            p,
            q,
            matrix: [[g[0][0].conj(), g[1][0].conj()], [g[0][1].conj(), g[1][1].conj()]],
        })
        .collect();
    let phases = (0..n).map(|i| work[(i, i)]).collect();

    Ok(GivensDecomposition { rotations, phases })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Gram-Schmidt on random columns
    fn random_unitary(n: usize, rng: &mut StdRng) -> ComplexMatrix {
        let mut columns: Vec<Vec<Complex64>> = Vec::with_capacity(n);
        for _ in 0..n {
            let mut v: Vec<Complex64> = (0..n)
                .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
                .collect();
            for c in &columns {
                let overlap: Complex64 = c.iter().zip(&v).map(|(a, b)| a.conj() * b).sum();
                for (x, y) in v.iter_mut().zip(c) {
                    *x -= overlap * y;
                }
            }
            let norm = v.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt();
            columns.push(v.into_iter().map(|x| x / norm).collect());
        }
        let mut u = ComplexMatrix::zeros(n, n);
        for (j, c) in columns.iter().enumerate() {
            for (i, &x) in c.iter().enumerate() {
                u[(i, j)] = x;
            }
        }
        u
    }

    #[test]
    fn test_reconstructs_random_unitary() {
        let mut rng = StdRng::seed_from_u64(17);
        for n in 1..=6 {
            let u = random_unitary(n, &mut rng);
            let decomposition = givens_decomposition(&u).unwrap();
            assert!(decomposition.rotations.len() <= n * (n - 1) / 2);
            assert!(decomposition.reconstruct().unwrap().max_abs_diff(&u) < 1e-12);
            for phase in &decomposition.phases {
                assert_relative_eq!(phase.norm(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rotations_are_adjacent_and_unitary() {
        let mut rng = StdRng::seed_from_u64(23);
        let u = random_unitary(5, &mut rng);
        for rotation in givens_decomposition(&u).unwrap().rotations {
            assert_eq!(rotation.q, rotation.p + 1);
            assert!(rotation.to_matrix(5).is_unitary(1e-10, 1e-12));
            assert_relative_eq!(rotation.determinant().norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_diagonal_needs_no_rotations() {
        let phases = vec![Complex64::new(0.0, 1.0), Complex64::new(-1.0, 0.0)];
        let decomposition = givens_decomposition(&ComplexMatrix::from_diagonal(&phases)).unwrap();
        assert!(decomposition.rotations.is_empty());
        assert_eq!(decomposition.phases, phases);
    }

    #[test]
    fn test_empty_and_non_square() {
        let empty = givens_decomposition(&ComplexMatrix::identity(0)).unwrap();
        assert!(empty.rotations.is_empty() && empty.phases.is_empty());
        assert!(givens_decomposition(&ComplexMatrix::zeros(2, 3)).is_err());
    }
}
