//! One-particle reduced density matrices
//!
//! `rdm[p, q] = ⟨ψ| a†_p a_q |ψ⟩`. Spin-resolved results are `2·norb`
//! square with the alpha block first; spin-summed results are `norb` square.
//! Only rank 1 is implemented.

use crate::validation::check_vec_len;
use fermisim_core::cistring::{self, OneBodyLink};
use fermisim_core::{
    ComplexMatrix, FermiConfig, FermiError, Nelec, Occupation, OrbitalRotation, Result,
};
use num_complex::Complex64;
use rayon::prelude::*;

fn check_rank(rank: usize) -> Result<()> {
    if rank != 1 {
        return Err(FermiError::NotSupported { rank });
    }
    Ok(())
}

fn combine(alpha: ComplexMatrix, beta: ComplexMatrix, spin_summed: bool) -> Result<ComplexMatrix> {
    if spin_summed {
        alpha.add(&beta)
    } else {
        Ok(ComplexMatrix::block_diag(&alpha, &beta))
    }
}

/// Reduced density matrix of a Slater determinant
///
/// The occupation matrix of each spin sector is transformed as
/// `conj(U) · D · Uᵀ`.
///
/// # Errors
/// `NotSupported` for `rank != 1`, `InvalidInput` for an invalid occupation
/// or a non-unitary rotation, `DimensionMismatch` for a mis-shaped rotation
///
/// # Example
/// ```
/// use fermisim_state::slater_determinant_rdm;
///
/// let rdm = slater_determinant_rdm(3, ([0, 1], [0]), None, 1, true).unwrap();
/// assert_eq!(rdm.trace().re, 3.0);
/// ```
pub fn slater_determinant_rdm(
    norb: usize,
    occupation: impl Into<Occupation>,
    orbital_rotation: Option<&OrbitalRotation>,
    rank: usize,
    spin_summed: bool,
) -> Result<ComplexMatrix> {
    slater_determinant_rdm_with_config(
        norb,
        occupation,
        orbital_rotation,
        rank,
        spin_summed,
        &FermiConfig::default(),
    )
}

/// [`slater_determinant_rdm`] with explicit configuration
pub fn slater_determinant_rdm_with_config(
    norb: usize,
    occupation: impl Into<Occupation>,
    orbital_rotation: Option<&OrbitalRotation>,
    rank: usize,
    spin_summed: bool,
    config: &FermiConfig,
) -> Result<ComplexMatrix> {
    check_rank(rank)?;
    cistring::check_norb(norb)?;
    let occupation = occupation.into();
    occupation.validate(norb)?;
    if let Some(rotation) = orbital_rotation {
        rotation.validate(norb, config)?;
    }

    let sector = |occupied: &[usize], u: Option<&ComplexMatrix>| -> Result<ComplexMatrix> {
        let mut d = ComplexMatrix::zeros(norb, norb);
        for &i in occupied {
            d[(i, i)] = Complex64::new(1.0, 0.0);
        }
        match u {
            Some(u) => u.conj().matmul(&d)?.matmul(&u.transpose()),
            None => Ok(d),
        }
    };

    let alpha = sector(occupation.alpha(), orbital_rotation.and_then(|r| r.alpha()))?;
    let beta = sector(occupation.beta(), orbital_rotation.and_then(|r| r.beta()))?;
    combine(alpha, beta, spin_summed)
}

/// Reduced density matrix of a general statevector
///
/// # Errors
/// `NotSupported` for `rank != 1`, `DimensionMismatch` if `vec` does not
/// have the FCI dimension of `(norb, nelec)`
pub fn rdm(
    vec: &[Complex64],
    norb: usize,
    nelec: impl Into<Nelec>,
    rank: usize,
    spin_summed: bool,
) -> Result<ComplexMatrix> {
    rdm_with_config(vec, norb, nelec, rank, spin_summed, &FermiConfig::default())
}

/// [`rdm`] with explicit configuration
pub fn rdm_with_config(
    vec: &[Complex64],
    norb: usize,
    nelec: impl Into<Nelec>,
    rank: usize,
    spin_summed: bool,
    config: &FermiConfig,
) -> Result<ComplexMatrix> {
    check_rank(rank)?;
    let nelec = nelec.into();
    let (dim_a, dim_b) = check_vec_len(vec.len(), norb, nelec)?;
    let (n_alpha, n_beta) = nelec.pair();
    tracing::debug!(norb, %nelec, dim_a, dim_b, spin_summed, "computing 1-RDM");

    let links_a = cistring::one_body_links(norb, n_alpha)?;
    let links_b = cistring::one_body_links(norb, n_beta)?;

    let alpha = accumulate(norb, dim_a, config.use_parallel(dim_a), |i, acc| {
        let source = &vec[i * dim_b..(i + 1) * dim_b];
        for link in &links_a[i] {
            let target = &vec[link.target * dim_b..(link.target + 1) * dim_b];
            let overlap: Complex64 = target.iter().zip(source).map(|(t, s)| t.conj() * s).sum();
            add_link(acc, norb, link, overlap);
        }
    });
    let beta = accumulate(norb, dim_b, config.use_parallel(dim_b), |i, acc| {
        for link in &links_b[i] {
            let overlap: Complex64 = (0..dim_a)
                .map(|a| vec[a * dim_b + link.target].conj() * vec[a * dim_b + i])
                .sum();
            add_link(acc, norb, link, overlap);
        }
    });

    combine(
        ComplexMatrix::new(norb, norb, alpha)?,
        ComplexMatrix::new(norb, norb, beta)?,
        spin_summed,
    )
}

fn add_link(acc: &mut [Complex64], norb: usize, link: &OneBodyLink, overlap: Complex64) {
    acc[link.creation * norb + link.annihilation] += overlap * link.sign;
}

/// Sum row contributions into a flat `norb × norb` buffer
fn accumulate<F>(norb: usize, n_rows: usize, parallel: bool, row: F) -> Vec<Complex64>
where
    F: Fn(usize, &mut [Complex64]) + Sync,
{
    let zeros = || vec![Complex64::new(0.0, 0.0); norb * norb];
    if parallel {
        (0..n_rows)
            .into_par_iter()
            .fold(zeros, |mut acc, i| {
                row(i, &mut acc);
                acc
            })
            .reduce(zeros, |mut a, b| {
                a.iter_mut().zip(&b).for_each(|(x, y)| *x += y);
                a
            })
    } else {
        let mut acc = zeros();
        for i in 0..n_rows {
            row(i, &mut acc);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slater::slater_determinant;
    use crate::test_utils::{random_statevector, random_unitary};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unrotated_slater_rdm_is_diagonal() {
        let rdm = slater_determinant_rdm(3, ([0, 2], [1]), None, 1, false).unwrap();
        assert_eq!(rdm.shape(), (6, 6));
        let diag: Vec<f64> = (0..6).map(|i| rdm[(i, i)].re).collect();
        assert_eq!(diag, vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);

        let summed = slater_determinant_rdm(3, ([0, 2], [1]), None, 1, true).unwrap();
        assert_eq!(summed.shape(), (3, 3));
        assert_relative_eq!(summed.trace().re, 3.0);
    }

    #[test]
    fn test_rank_two_not_supported() {
        assert_eq!(
            slater_determinant_rdm(3, ([0], [0]), None, 2, true),
            Err(FermiError::NotSupported { rank: 2 })
        );
        let vec = slater_determinant(3, ([0], [0]), None).unwrap();
        assert_eq!(
            rdm(&vec, 3, (1, 1), 2, true),
            Err(FermiError::NotSupported { rank: 2 })
        );
    }

    #[test]
    fn test_rotated_slater_rdm_is_projector() {
        let mut rng = StdRng::seed_from_u64(13);
        let rotation = OrbitalRotation::from(random_unitary(4, &mut rng));
        let rdm = slater_determinant_rdm(4, ([0, 1], [2]), Some(&rotation), 1, false).unwrap();
        assert!(rdm.is_hermitian(1e-12));
        let squared = rdm.matmul(&rdm).unwrap();
        assert!(squared.max_abs_diff(&rdm) < 1e-10);
        assert_relative_eq!(rdm.trace().re, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_statevector_rdm_matches_slater_rdm() {
        let mut rng = StdRng::seed_from_u64(21);
        let u_a = random_unitary(4, &mut rng);
        let u_b = random_unitary(4, &mut rng);
        let rotation = OrbitalRotation::from((u_a, u_b));
        let occupation = ([0, 2], [1, 3]);

        let vec = slater_determinant(4, occupation, Some(&rotation)).unwrap();
        for spin_summed in [true, false] {
            let expected =
                slater_determinant_rdm(4, occupation, Some(&rotation), 1, spin_summed).unwrap();
            let actual = rdm(&vec, 4, (2, 2), 1, spin_summed).unwrap();
            assert!(
                actual.max_abs_diff(&expected) < 1e-10,
                "spin_summed={} differs by {}",
                spin_summed,
                actual.max_abs_diff(&expected)
            );
        }
    }

    #[test]
    fn test_random_state_rdm_is_hermitian() {
        let mut rng = StdRng::seed_from_u64(5);
        let vec = random_statevector(cistring::dim(4, (2, 1)), &mut rng);
        let rdm = rdm(&vec, 4, (2, 1), 1, false).unwrap();
        assert!(rdm.is_hermitian(1e-12));
        assert_relative_eq!(rdm.trace().re, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_spinless_rdm() {
        let vec = slater_determinant(3, [0, 2], None).unwrap();
        let summed = rdm(&vec, 3, 2, 1, true).unwrap();
        assert_eq!(summed.shape(), (3, 3));
        assert_relative_eq!(summed[(0, 0)].re, 1.0);
        assert_relative_eq!(summed[(1, 1)].re, 0.0);
        assert_relative_eq!(summed[(2, 2)].re, 1.0);
        let resolved = rdm(&vec, 3, 2, 1, false).unwrap();
        assert_eq!(resolved.shape(), (6, 6));
        assert_relative_eq!(resolved.trace().re, 2.0);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut rng = StdRng::seed_from_u64(8);
        let vec = random_statevector(cistring::dim(5, (2, 2)), &mut rng);
        let serial = rdm_with_config(&vec, 5, (2, 2), 1, false, &FermiConfig::strict()).unwrap();
        let parallel = rdm_with_config(
            &vec,
            5,
            (2, 2),
            1,
            false,
            &FermiConfig::default().with_parallel_threshold(1),
        )
        .unwrap();
        assert!(serial.max_abs_diff(&parallel) < 1e-12);
    }

    #[test]
    fn test_wrong_length() {
        let vec = vec![Complex64::new(1.0, 0.0); 5];
        assert!(matches!(
            rdm(&vec, 3, (2, 1), 1, true),
            Err(FermiError::DimensionMismatch { expected: 9, actual: 5 })
        ));
    }
}
