//! Spin-summed one-body operators on statevectors
//!
//! `O = Σ_{pq} M[p, q] (a†_{pα} a_{qα} + a†_{pβ} a_{qβ})`

use crate::validation::check_vec_len;
use fermisim_core::cistring;
use fermisim_core::{ComplexMatrix, FermiConfig, Nelec, Result};
use num_complex::Complex64;
use rayon::prelude::*;

/// Apply a one-body operator to a statevector
///
/// # Errors
/// `DimensionMismatch` if `vec` or `one_body_tensor` has the wrong size
///
/// # Example
/// ```
/// use fermisim_core::ComplexMatrix;
/// use fermisim_state::{apply_one_body, hartree_fock_state};
/// use num_complex::Complex64;
///
/// // number operator
/// let n = ComplexMatrix::identity(3);
/// let vec = hartree_fock_state(3, (2, 1)).unwrap();
/// let out = apply_one_body(&vec, &n, 3, (2, 1)).unwrap();
/// assert_eq!(out[0], Complex64::new(3.0, 0.0));
/// ```
pub fn apply_one_body(
    vec: &[Complex64],
    one_body_tensor: &ComplexMatrix,
    norb: usize,
    nelec: impl Into<Nelec>,
) -> Result<Vec<Complex64>> {
    apply_one_body_with_config(vec, one_body_tensor, norb, nelec, &FermiConfig::default())
}

/// [`apply_one_body`] with explicit configuration
pub fn apply_one_body_with_config(
    vec: &[Complex64],
    one_body_tensor: &ComplexMatrix,
    norb: usize,
    nelec: impl Into<Nelec>,
    config: &FermiConfig,
) -> Result<Vec<Complex64>> {
    let nelec = nelec.into();
    let (dim_a, dim_b) = check_vec_len(vec.len(), norb, nelec)?;
    one_body_tensor.expect_square(norb)?;
    let (n_alpha, n_beta) = nelec.pair();
    tracing::debug!(norb, %nelec, dim_a, dim_b, "applying one-body operator");

    let links_a = cistring::one_body_links(norb, n_alpha)?;
    let links_b = cistring::one_body_links(norb, n_beta)?;

    // Links leaving K with a†_p a_q give ⟨K| a†_q a_p |I⟩, so each output
    // amplitude is gathered with the transposed tensor element.
    let kernel = |(k, out_row): (usize, &mut [Complex64])| {
        for link in &links_a[k] {
            let coeff = one_body_tensor.get(link.annihilation, link.creation) * link.sign;
            let source = &vec[link.target * dim_b..(link.target + 1) * dim_b];
            for (o, s) in out_row.iter_mut().zip(source) {
                *o += coeff * s;
            }
        }
        let row = &vec[k * dim_b..(k + 1) * dim_b];
        for (kb, o) in out_row.iter_mut().enumerate() {
            for link in &links_b[kb] {
                *o += one_body_tensor.get(link.annihilation, link.creation)
                    * link.sign
                    * row[link.target];
            }
        }
    };

    let mut out = vec![Complex64::new(0.0, 0.0); vec.len()];
    if config.use_parallel(dim_a) {
        out.par_chunks_mut(dim_b).enumerate().for_each(kernel);
    } else {
        out.chunks_mut(dim_b).enumerate().for_each(kernel);
    }
    Ok(out)
}
