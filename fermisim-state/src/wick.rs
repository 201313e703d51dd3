//! Expectation values of one-body operator products on Slater determinants
//!
//! For a determinant with one-particle density matrix `D`, Wick's theorem
//! gives `⟨a†_{p1} a_{q1} ⋯ a†_{pn} a_{qn}⟩ = det G` with
//! `G[i, j] = D[p_i, q_j]` for `i ≤ j` and `D[p_i, q_j] − δ(p_i, q_j)` for
//! `i > j`. Summing over orbital indices, every permutation `σ` of the
//! determinant expansion factorizes into one trace per cycle of
//! `A_i = M_iᵀ · E_i` where `E_i` is `D` if `i ≤ σ(i)` and `D − 1` otherwise.
//!
//! Permutations are never enumerated. Each subset of operators contributes
//! the signed sum over its cyclic orderings, collected by a dynamic program
//! over paths, and subsets are then combined over set partitions. This
//! costs `O(2ⁿ n² norb³)` for `n` distinct operators.
//!
//! Powers of a single operator use the generating function
//! `⟨e^{tO}⟩ = det(1 + (e^{tMᵀ} − 1) D)`, expanded by Gaussian elimination
//! over power series truncated after the requested order. This is
//! polynomial in both the power and the number of orbitals.

use fermisim_core::{ComplexMatrix, FermiError, Result};
use num_complex::Complex64;

/// Most distinct operators [`expectation_one_body_product`] accepts
pub const MAX_DISTINCT_OPERATORS: usize = 16;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Expectation of `Π_k (Σ_{pq} M_k[p, q] a†_p a_q)` on a Slater determinant
///
/// `one_rdm` must be the density matrix over the same orbitals the tensors
/// act on; for spinful determinants pass the spin-resolved RDM together with
/// [`spin_orbital_tensor`] of each operator. A product of identical tensors
/// is evaluated as a power.
///
/// # Errors
/// `DimensionMismatch` if a tensor does not have the shape of `one_rdm`,
/// `InvalidInput` for more than [`MAX_DISTINCT_OPERATORS`] distinct factors
///
/// # Example
/// ```
/// use fermisim_core::ComplexMatrix;
/// use fermisim_state::{expectation_one_body_product, slater_determinant_rdm};
///
/// let rdm = slater_determinant_rdm(3, [0, 1], None, 1, true).unwrap();
/// let number = ComplexMatrix::identity(3);
/// let value = expectation_one_body_product(&[number.clone(), number], &rdm).unwrap();
/// assert!((value.re - 4.0).abs() < 1e-12);
/// ```
pub fn expectation_one_body_product(
    one_body_tensors: &[ComplexMatrix],
    one_rdm: &ComplexMatrix,
) -> Result<Complex64> {
    let n = check_shapes(one_body_tensors, one_rdm)?;
    let n_ops = one_body_tensors.len();
    tracing::debug!(norb = n, n_ops, "wick expectation");

    if n_ops == 0 {
        return Ok(ONE);
    }
    if one_body_tensors.windows(2).all(|w| w[0] == w[1]) {
        return power_moment(&one_body_tensors[0], one_rdm, n_ops);
    }
    if n_ops > MAX_DISTINCT_OPERATORS {
        return Err(FermiError::invalid_input(format!(
            "{} distinct operators exceed the maximum of {}",
            n_ops, MAX_DISTINCT_OPERATORS
        )));
    }

    // M_iᵀ · D and M_iᵀ · (D − 1)
    let hole = one_rdm.sub(&ComplexMatrix::identity(n))?;
    let mut particle_terms = Vec::with_capacity(n_ops);
    let mut hole_terms = Vec::with_capacity(n_ops);
    for tensor in one_body_tensors {
        let transposed = tensor.transpose();
        particle_terms.push(transposed.matmul(one_rdm)?);
        hole_terms.push(transposed.matmul(&hole)?);
    }
    Ok(cycle_cover_sum(&particle_terms, &hole_terms))
}

/// Expectation of the `power`-th power of a one-body operator
///
/// # Example
/// ```
/// use fermisim_core::ComplexMatrix;
/// use fermisim_state::{expectation_one_body_power, slater_determinant_rdm};
///
/// let rdm = slater_determinant_rdm(2, [0], None, 1, true).unwrap();
/// let m = ComplexMatrix::identity(2);
/// let value = expectation_one_body_power(&m, &rdm, 0).unwrap();
/// assert_eq!(value.re, 1.0);
/// ```
pub fn expectation_one_body_power(
    one_body_tensor: &ComplexMatrix,
    one_rdm: &ComplexMatrix,
    power: usize,
) -> Result<Complex64> {
    let n = check_shapes(std::slice::from_ref(one_body_tensor), one_rdm)?;
    tracing::debug!(norb = n, power, "wick power expectation");
    power_moment(one_body_tensor, one_rdm, power)
}

/// Lift a spatial-orbital tensor to spin orbitals, alpha block first
pub fn spin_orbital_tensor(one_body_tensor: &ComplexMatrix) -> ComplexMatrix {
    ComplexMatrix::block_diag(one_body_tensor, one_body_tensor)
}

fn check_shapes(one_body_tensors: &[ComplexMatrix], one_rdm: &ComplexMatrix) -> Result<usize> {
    if !one_rdm.is_square() {
        return Err(FermiError::dimension_mismatch(one_rdm.rows(), one_rdm.cols()));
    }
    let n = one_rdm.rows();
    for tensor in one_body_tensors {
        tensor.expect_square(n)?;
    }
    Ok(n)
}

/// `k! · [tᵏ] det(1 + (e^{tMᵀ} − 1) D)`
fn power_moment(
    one_body_tensor: &ComplexMatrix,
    one_rdm: &ComplexMatrix,
    power: usize,
) -> Result<Complex64> {
    if power == 0 {
        return Ok(ONE);
    }
    let n = one_rdm.rows();
    let transposed = one_body_tensor.transpose();

    // B(t) = Σ_m (Aᵐ / m!) D tᵐ with A = Mᵀ
    let mut series = vec![ComplexMatrix::zeros(n, n); power + 1];
    let mut scaled_power = ComplexMatrix::identity(n);
    for m in 1..=power {
        scaled_power = scaled_power
            .matmul(&transposed)?
            .scale(Complex64::new(1.0 / m as f64, 0.0));
        series[m] = scaled_power.matmul(one_rdm)?;
    }

    // det(1 + B(t)) by elimination over series truncated after tᵏ; every
    // pivot has constant term 1 since B(0) = 0
    let len = power + 1;
    let mut entries: Vec<Vec<Complex64>> = (0..n * n)
        .map(|idx| {
            let mut coeffs = vec![ZERO; len];
            if idx / n == idx % n {
                coeffs[0] = ONE;
            }
            for (m, c) in coeffs.iter_mut().enumerate().skip(1) {
                *c = series[m].data()[idx];
            }
            coeffs
        })
        .collect();
    let mut det = vec![ZERO; len];
    det[0] = ONE;
    for col in 0..n {
        let pivot = entries[col * n + col].clone();
        det = series_mul(&det, &pivot);
        let inverse = series_inverse(&pivot);
        for row in col + 1..n {
            let factor = series_mul(&entries[row * n + col], &inverse);
            if factor.iter().all(|c| *c == ZERO) {
                continue;
            }
            for j in col + 1..n {
                let update = series_mul(&factor, &entries[col * n + j]);
                for (x, u) in entries[row * n + j].iter_mut().zip(&update) {
                    *x -= *u;
                }
            }
        }
    }

    let factorial: f64 = (1..=power).map(|k| k as f64).product();
    Ok(det[power] * factorial)
}

/// Product of two series truncated to the length of `a`
fn series_mul(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let mut out = vec![ZERO; a.len()];
    for (i, &x) in a.iter().enumerate() {
        if x == ZERO {
            continue;
        }
        for (o, &y) in out[i..].iter_mut().zip(b) {
            *o += x * y;
        }
    }
    out
}

/// Reciprocal of a series with nonzero constant term
fn series_inverse(a: &[Complex64]) -> Vec<Complex64> {
    let mut out = vec![ZERO; a.len()];
    let lead = ONE / a[0];
    out[0] = lead;
    for m in 1..a.len() {
        let acc: Complex64 = (1..=m).map(|i| a[i] * out[m - i]).sum();
        out[m] = -acc * lead;
    }
    out
}

/// `Σ_σ sign(σ) Π_cycles tr(A_{c_1} ⋯ A_{c_k})` over all permutations
///
/// `A_i` is `particle_terms[i]` if `i ≤ σ(i)` and `hole_terms[i]` otherwise.
fn cycle_cover_sum(particle_terms: &[ComplexMatrix], hole_terms: &[ComplexMatrix]) -> Complex64 {
    let n_ops = particle_terms.len();
    let full = (1usize << n_ops) - 1;

    // signed sum over the cyclic orderings of each subset
    let mut cycle_weight = vec![ZERO; full + 1];
    for start in 0..n_ops {
        for (sub, value) in cyclic_orderings(start, particle_terms, hole_terms)
            .into_iter()
            .enumerate()
        {
            let mask = (sub << (start + 1)) | (1 << start);
            cycle_weight[mask] += value;
        }
    }

    // set partitions, with the lowest remaining operator in the first block
    let mut partitions = vec![ZERO; full + 1];
    partitions[0] = ONE;
    for mask in 1..=full {
        let lowest = mask & mask.wrapping_neg();
        let rest = mask ^ lowest;
        let mut sub = rest;
        let mut total = ZERO;
        loop {
            let block = sub | lowest;
            total += cycle_weight[block] * partitions[mask ^ block];
            if sub == 0 {
                break;
            }
            sub = (sub - 1) & rest;
        }
        partitions[mask] = total;
    }
    partitions[full]
}

/// Signed traces of all cycles whose smallest operator is `start`, indexed by
/// the subset of higher operators they pass through (bit `k` is operator
/// `start + 1 + k`)
///
/// Paths are carried as row vectors `e_rᵀ A_start ⋯`, one diagonal entry of
/// the trace at a time, so the table never stores full matrices.
fn cyclic_orderings(
    start: usize,
    particle_terms: &[ComplexMatrix],
    hole_terms: &[ComplexMatrix],
) -> Vec<Complex64> {
    let factor = |i: usize, next: usize| {
        if i <= next {
            particle_terms[i].data()
        } else {
            hole_terms[i].data()
        }
    };
    let n = particle_terms[start].rows();
    let higher = particle_terms.len() - start - 1;
    let n_subsets = 1usize << higher;
    // slot 0 is `start`, slot k + 1 is operator `start + 1 + k`
    let slots = higher + 1;

    let mut weights = vec![ZERO; n_subsets];
    let mut paths = vec![ZERO; n_subsets * slots * n];
    let mut reached = vec![false; n_subsets * slots];
    let mut current = vec![ZERO; n];

    for row in 0..n {
        paths.iter_mut().for_each(|x| *x = ZERO);
        reached.iter_mut().for_each(|x| *x = false);
        paths[row] = ONE;
        reached[0] = true;

        for sub in 0..n_subsets {
            let negative = sub.count_ones() % 2 == 1;
            for slot in 0..slots {
                let state = sub * slots + slot;
                if !reached[state] {
                    continue;
                }
                let last = start + slot;
                current.copy_from_slice(&paths[state * n..(state + 1) * n]);

                // close the cycle back to `start`
                let closing = factor(last, start);
                let diagonal: Complex64 = (0..n).map(|p| current[p] * closing[p * n + row]).sum();
                weights[sub] += if negative { -diagonal } else { diagonal };

                for k in (0..higher).filter(|k| sub & (1 << k) == 0) {
                    let step = factor(last, start + 1 + k);
                    let target = (sub | (1 << k)) * slots + k + 1;
                    reached[target] = true;
                    for (q, x) in paths[target * n..(target + 1) * n].iter_mut().enumerate() {
                        *x += (0..n).map(|p| current[p] * step[p * n + q]).sum::<Complex64>();
                    }
                }
            }
        }
    }
    weights
}
