//! Orbital rotations on the Fock-space representation
//!
//! A one-particle unitary `U` with `a†_i ↦ Σ_j U[j, i] a†_j` induces a
//! unitary on each fixed-particle-number sector. Between the strings `J` and
//! `I` its matrix element is the minor `det(U[J, I])`, rows taken from the
//! occupied orbitals of `J` and columns from those of `I`.
//!
//! Statevectors are never multiplied by that induced matrix. `U` is factored
//! into phases and two-orbital rotations, and each factor is applied in
//! place: a rotation of orbitals `p` and `q` mixes only the strings that
//! differ by moving one particle between them.

use crate::validation::check_vec_len;
use fermisim_core::cistring;
use fermisim_core::givens::{givens_decomposition, GivensRotation};
use fermisim_core::{ComplexMatrix, FermiConfig, Nelec, OrbitalRotation, Result};
use num_complex::Complex64;
use rayon::prelude::*;

/// Induced transform of the `n_particles` sector, `C(norb, n) × C(norb, n)`
pub fn rotation_sector_matrix(
    orbital_rotation: &ComplexMatrix,
    norb: usize,
    n_particles: usize,
) -> Result<ComplexMatrix> {
    rotation_sector_matrix_with_config(orbital_rotation, norb, n_particles, &FermiConfig::default())
}

/// [`rotation_sector_matrix`] with explicit configuration
pub fn rotation_sector_matrix_with_config(
    orbital_rotation: &ComplexMatrix,
    norb: usize,
    n_particles: usize,
    config: &FermiConfig,
) -> Result<ComplexMatrix> {
    orbital_rotation.expect_square(norb)?;
    let occupations: Vec<Vec<usize>> = cistring::make_strings(norb, n_particles)?
        .into_iter()
        .map(cistring::occupied_orbitals)
        .collect();
    let dim = occupations.len();

    let row = |target: &Vec<usize>| -> Result<Vec<Complex64>> {
        occupations
            .iter()
            .map(|source| orbital_rotation.submatrix(target, source).determinant())
            .collect()
    };

    let rows: Vec<Vec<Complex64>> = if config.use_parallel(dim) {
        occupations.par_iter().map(row).collect::<Result<_>>()?
    } else {
        occupations.iter().map(row).collect::<Result<_>>()?
    };

    ComplexMatrix::from_rows(rows)
}

/// Column `I` of the induced sector transform, `det(U[J, I])` for every `J`
///
/// This is the rotated image of a single configuration and costs one small
/// determinant per string.
pub fn rotated_configuration(
    orbital_rotation: &ComplexMatrix,
    norb: usize,
    occupied: &[usize],
    config: &FermiConfig,
) -> Result<Vec<Complex64>> {
    orbital_rotation.expect_square(norb)?;
    let strings = cistring::make_strings(norb, occupied.len())?;
    let amplitude = |&string: &u64| -> Result<Complex64> {
        let target = cistring::occupied_orbitals(string);
        orbital_rotation.submatrix(&target, occupied).determinant()
    };
    if config.use_parallel(strings.len()) {
        strings.par_iter().map(amplitude).collect()
    } else {
        strings.iter().map(amplitude).collect()
    }
}

/// Apply an orbital rotation to a statevector
///
/// Each sector's unitary must be unitary. With validation disabled a
/// non-unitary matrix gives an unspecified result.
///
/// # Errors
/// Returns `DimensionMismatch` if the vector length or a rotation shape does
/// not match, and `InvalidInput` for a non-unitary rotation when validation
/// is enabled
///
/// # Example
/// ```
/// use fermisim_core::{ComplexMatrix, OrbitalRotation};
/// use fermisim_state::{apply_orbital_rotation, hartree_fock_state};
/// use num_complex::Complex64;
///
/// // swap orbitals 0 and 1
/// let swap = ComplexMatrix::from_real(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
/// let rotation = OrbitalRotation::from(swap);
/// let vec = hartree_fock_state(2, (1, 0)).unwrap();
/// let rotated = apply_orbital_rotation(&vec, &rotation, 2, (1, 0)).unwrap();
/// assert!((rotated[1] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
/// assert!(rotated[0].norm() < 1e-12);
/// ```
pub fn apply_orbital_rotation(
    vec: &[Complex64],
    orbital_rotation: &OrbitalRotation,
    norb: usize,
    nelec: impl Into<Nelec>,
) -> Result<Vec<Complex64>> {
    apply_orbital_rotation_with_config(vec, orbital_rotation, norb, nelec, &FermiConfig::default())
}

/// [`apply_orbital_rotation`] with explicit configuration
pub fn apply_orbital_rotation_with_config(
    vec: &[Complex64],
    orbital_rotation: &OrbitalRotation,
    norb: usize,
    nelec: impl Into<Nelec>,
    config: &FermiConfig,
) -> Result<Vec<Complex64>> {
    let nelec = nelec.into();
    let (dim_a, dim_b) = check_vec_len(vec.len(), norb, nelec)?;
    orbital_rotation.validate(norb, config)?;
    let (n_alpha, n_beta) = nelec.pair();

    tracing::debug!(norb, %nelec, dim_a, dim_b, "applying orbital rotation");

    let mut out = vec.to_vec();
    if let Some(u_a) = orbital_rotation.alpha() {
        let decomposition = givens_decomposition(u_a)?;
        let strings = cistring::make_strings(norb, n_alpha)?;
        let phases = string_phases(&strings, &decomposition.phases);
        for (row, phase) in out.chunks_mut(dim_b).zip(&phases) {
            row.iter_mut().for_each(|x| *x *= *phase);
        }
        for rotation in decomposition.rotations.iter().rev() {
            let pairs = PairTable::new(&strings, norb, n_alpha, rotation)?;
            pairs.apply_rows(&mut out, dim_b);
        }
    }
    if let Some(u_b) = orbital_rotation.beta() {
        if n_beta > 0 {
            let decomposition = givens_decomposition(u_b)?;
            let strings = cistring::make_strings(norb, n_beta)?;
            let phases = string_phases(&strings, &decomposition.phases);
            let scale = |row: &mut [Complex64]| {
                for (x, phase) in row.iter_mut().zip(&phases) {
                    *x *= *phase;
                }
            };
            if config.use_parallel(dim_a) {
                out.par_chunks_mut(dim_b).for_each(scale);
            } else {
                out.chunks_mut(dim_b).for_each(scale);
            }
            for rotation in decomposition.rotations.iter().rev() {
                let table = PairTable::new(&strings, norb, n_beta, rotation)?;
                if config.use_parallel(dim_a) {
                    out.par_chunks_mut(dim_b).for_each(|row| table.apply_within(row));
                } else {
                    out.chunks_mut(dim_b).for_each(|row| table.apply_within(row));
                }
            }
        }
    }
    Ok(out)
}

/// Product of the phases of the occupied orbitals of each string
fn string_phases(strings: &[u64], phases: &[Complex64]) -> Vec<Complex64> {
    strings
        .iter()
        .map(|&s| {
            cistring::occupied_orbitals(s)
                .into_iter()
                .map(|i| phases[i])
                .product()
        })
        .collect()
}

/// Strings touched by a rotation of orbitals `p < q` within one sector
struct PairTable {
    matrix: [[Complex64; 2]; 2],
    determinant: Complex64,
    /// `(string with p, matching string with q, sign)`
    pairs: Vec<(usize, usize, f64)>,
    /// Strings with both orbitals occupied
    both: Vec<usize>,
}

impl PairTable {
    fn new(
        strings: &[u64],
        norb: usize,
        n_particles: usize,
        rotation: &GivensRotation,
    ) -> Result<Self> {
        let (p, q) = (rotation.p, rotation.q);
        let bit_p = 1u64 << p;
        let bit_q = 1u64 << q;
        let between = (bit_q - 1) & !((bit_p << 1) - 1);

        let mut pairs = Vec::new();
        let mut both = Vec::new();
        for (index, &s) in strings.iter().enumerate() {
            match (s & bit_p != 0, s & bit_q != 0) {
                (true, true) => both.push(index),
                (true, false) => {
                    let partner = cistring::address(norb, n_particles, s ^ bit_p ^ bit_q)?;
                    let sign = if (s & between).count_ones() % 2 == 1 {
                        -1.0
                    } else {
                        1.0
                    };
                    pairs.push((index, partner, sign));
                },
                _ => {},
            }
        }
        Ok(Self {
            matrix: rotation.matrix,
            determinant: rotation.determinant(),
            pairs,
            both,
        })
    }

    #[inline]
    fn mix(&self, x: &mut Complex64, y: &mut Complex64, sign: f64) {
        let w = &self.matrix;
        let (a, b) = (*x, *y);
        *x = w[0][0] * a + w[0][1] * b * sign;
        *y = w[1][0] * a * sign + w[1][1] * b;
    }

    /// Act on the row index of a `dim × width` matrix
    fn apply_rows(&self, data: &mut [Complex64], width: usize) {
        if width == 0 {
            return;
        }
        for &(i, j, sign) in &self.pairs {
            let (row_i, row_j) = two_rows_mut(data, width, i, j);
            for (x, y) in row_i.iter_mut().zip(row_j.iter_mut()) {
                self.mix(x, y, sign);
            }
        }
        for &i in &self.both {
            for x in &mut data[i * width..(i + 1) * width] {
                *x *= self.determinant;
            }
        }
    }

    /// Act on the entries of a single row
    fn apply_within(&self, row: &mut [Complex64]) {
        for &(i, j, sign) in &self.pairs {
            let (mut x, mut y) = (row[i], row[j]);
            self.mix(&mut x, &mut y, sign);
            row[i] = x;
            row[j] = y;
        }
        for &i in &self.both {
            row[i] *= self.determinant;
        }
    }
}

/// Disjoint mutable rows `i != j` of a row-major buffer
fn two_rows_mut(
    data: &mut [Complex64],
    width: usize,
    i: usize,
    j: usize,
) -> (&mut [Complex64], &mut [Complex64]) {
    if i < j {
        let (lo, hi) = data.split_at_mut(j * width);
        (&mut lo[i * width..(i + 1) * width], &mut hi[..width])
    } else {
        let (lo, hi) = data.split_at_mut(i * width);
        let row_i = &mut hi[..width];
        (row_i, &mut lo[j * width..(j + 1) * width])
    }
}
