//! Total spin `⟨S²⟩`
//!
//! `S² = S₋S₊ + S_z(S_z + 1)` with `S₊ = Σ_p a†_{pα} a_{pβ}`. The raising
//! operator maps the `(n_alpha, n_beta)` sector into `(n_alpha + 1,
//! n_beta - 1)`; `S₋` is its transpose.

use crate::validation::{check_vec_len, norm};
use fermisim_core::cistring;
use fermisim_core::{FermiConfig, FermiError, Nelec, Result};
use num_complex::Complex64;
use rayon::prelude::*;

/// Per target string and orbital, the source address and sign of a single
/// creation or annihilation step
type Moves = Vec<Vec<Option<(usize, f64)>>>;

/// Moves from strings of weight `n_target` back to weight `n_source`
/// (`n_source = n_target ± 1`) through orbital `p`
fn sector_moves(norb: usize, n_target: usize, n_source: usize) -> Result<Moves> {
    let removing = n_source < n_target;
    cistring::make_strings(norb, n_target)?
        .into_iter()
        .map(|target| {
            (0..norb)
                .map(|p| {
                    let step = if removing {
                        cistring::annihilate(target, p)
                    } else {
                        cistring::create(target, p)
                    };
                    step.map(|(source, sign)| {
                        cistring::address(norb, n_source, source).map(|addr| (addr, sign))
                    })
                    .transpose()
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

/// Move one particle between spin sectors
///
/// With `raising`, alpha gains the particle (`S₊`); otherwise beta gains it
/// (`S₋`). Output is gathered row by row over the target alpha strings.
fn transfer(
    vec: &[f64],
    norb: usize,
    (n_alpha, n_beta): (usize, usize),
    raising: bool,
    config: &FermiConfig,
) -> Result<Vec<f64>> {
    let (t_alpha, t_beta) = if raising {
        (n_alpha + 1, n_beta - 1)
    } else {
        (n_alpha - 1, n_beta + 1)
    };
    let (src_dim_a, src_dim_b) = cistring::dims(norb, (n_alpha, n_beta));
    let (dim_a, dim_b) = cistring::dims(norb, (t_alpha, t_beta));
    debug_assert_eq!(vec.len(), src_dim_a * src_dim_b);

    let moves_a = sector_moves(norb, t_alpha, n_alpha)?;
    let moves_b = sector_moves(norb, t_beta, n_beta)?;
    // the beta operator passes the alpha operators of the lower-weight string
    let phase = if n_alpha.min(t_alpha) % 2 == 0 { 1.0 } else { -1.0 };

    let kernel = |(ja, out_row): (usize, &mut [f64])| {
        for (jb, out) in out_row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (move_a, move_b) in moves_a[ja].iter().zip(&moves_b[jb]) {
                if let (Some((ia, sign_a)), Some((ib, sign_b))) = (move_a, move_b) {
                    acc += sign_a * sign_b * vec[ia * src_dim_b + ib];
                }
            }
            *out = phase * acc;
        }
    };

    let mut out = vec![0.0; dim_a * dim_b];
    if dim_b > 0 {
        if config.use_parallel(dim_a) {
            out.par_chunks_mut(dim_b).enumerate().for_each(kernel);
        } else {
            out.chunks_mut(dim_b).enumerate().for_each(kernel);
        }
    }
    Ok(out)
}

/// Apply `S²` to a real statevector
///
/// # Errors
/// `DimensionMismatch` if `vec` does not have the FCI dimension
pub fn contract_spin_square(vec: &[f64], norb: usize, nelec: (usize, usize)) -> Result<Vec<f64>> {
    contract_spin_square_with_config(vec, norb, nelec, &FermiConfig::default())
}

/// [`contract_spin_square`] with explicit configuration
pub fn contract_spin_square_with_config(
    vec: &[f64],
    norb: usize,
    nelec: (usize, usize),
    config: &FermiConfig,
) -> Result<Vec<f64>> {
    let (n_alpha, n_beta) = nelec;
    check_vec_len(vec.len(), norb, Nelec::from(nelec))?;

    let sz = (n_alpha as f64 - n_beta as f64) / 2.0;
    let diagonal = sz * (sz + 1.0);
    let mut out: Vec<f64> = vec.iter().map(|v| diagonal * v).collect();

    if n_beta > 0 && n_alpha < norb {
        let raised = transfer(vec, norb, nelec, true, config)?;
        let lowered = transfer(&raised, norb, (n_alpha + 1, n_beta - 1), false, config)?;
        out.iter_mut().zip(&lowered).for_each(|(o, l)| *o += l);
    }
    Ok(out)
}

/// Expectation value of the total spin squared
///
/// The real and imaginary parts are contracted separately and recombined as
/// `Re ⟨vec| S²(Re vec) + i S²(Im vec)⟩`.
///
/// # Errors
/// `InvalidInput` for a spinless `nelec`, `DimensionMismatch` for a wrong
/// vector length
///
/// # Example
/// ```
/// use fermisim_state::{hartree_fock_state, spin_square};
///
/// let vec = hartree_fock_state(2, (1, 0)).unwrap();
/// assert_eq!(spin_square(&vec, 2, (1, 0)).unwrap(), 0.75);
/// ```
pub fn spin_square(vec: &[Complex64], norb: usize, nelec: impl Into<Nelec>) -> Result<f64> {
    spin_square_with_config(vec, norb, nelec, &FermiConfig::default())
}

/// [`spin_square`] with explicit configuration
pub fn spin_square_with_config(
    vec: &[Complex64],
    norb: usize,
    nelec: impl Into<Nelec>,
    config: &FermiConfig,
) -> Result<f64> {
    let nelec = spinful(nelec.into())?;
    check_vec_len(vec.len(), norb, Nelec::from(nelec))?;
    warn_if_unnormalized(norm(vec), config);
    tracing::debug!(norb, n_alpha = nelec.0, n_beta = nelec.1, "computing spin square");

    let real: Vec<f64> = vec.iter().map(|c| c.re).collect();
    let imag: Vec<f64> = vec.iter().map(|c| c.im).collect();
    let s2_real = contract_spin_square_with_config(&real, norb, nelec, config)?;
    let s2_imag = contract_spin_square_with_config(&imag, norb, nelec, config)?;

    Ok(vec
        .iter()
        .zip(s2_real.iter().zip(&s2_imag))
        .map(|(c, (&re, &im))| (c.conj() * Complex64::new(re, im)).re)
        .sum())
}

/// [`spin_square`] for a real statevector
pub fn spin_square_real(vec: &[f64], norb: usize, nelec: impl Into<Nelec>) -> Result<f64> {
    let nelec = spinful(nelec.into())?;
    check_vec_len(vec.len(), norb, Nelec::from(nelec))?;
    warn_if_unnormalized(vec.iter().map(|v| v * v).sum::<f64>().sqrt(), &FermiConfig::default());
    let s2 = contract_spin_square(vec, norb, nelec)?;
    Ok(vec.iter().zip(&s2).map(|(v, s)| v * s).sum())
}

fn spinful(nelec: Nelec) -> Result<(usize, usize)> {
    match nelec {
        Nelec::Spinful(n_alpha, n_beta) => Ok((n_alpha, n_beta)),
        Nelec::Spinless(_) => Err(FermiError::invalid_input(
            "spin square requires (n_alpha, n_beta), got a spinless particle number",
        )),
    }
}

/// Returns whether the warning fired
fn warn_if_unnormalized(norm: f64, config: &FermiConfig) -> bool {
    if config.is_close(norm, 1.0) {
        return false;
    }
    tracing::warn!(norm, "spin square of an unnormalized vector");
    true
}
