//! Random fixtures shared by unit tests, integration tests and benches

use fermisim_core::ComplexMatrix;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::Rng;

/// Random `n × n` unitary from Gram-Schmidt on Gaussian-ish columns
pub fn random_unitary(n: usize, rng: &mut StdRng) -> ComplexMatrix {
    let mut columns: Vec<Vec<Complex64>> = Vec::with_capacity(n);
    while columns.len() < n {
        let mut col: Vec<Complex64> = (0..n)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();
        for prev in &columns {
            let overlap: Complex64 = prev.iter().zip(&col).map(|(p, c)| p.conj() * c).sum();
            for (c, p) in col.iter_mut().zip(prev) {
                *c -= overlap * p;
            }
        }
        let norm = col.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
        if norm < 1e-8 {
            continue;
        }
        col.iter_mut().for_each(|c| *c /= norm);
        columns.push(col);
    }

    let mut u = ComplexMatrix::zeros(n, n);
    for (j, col) in columns.iter().enumerate() {
        for (i, &value) in col.iter().enumerate() {
            u[(i, j)] = value;
        }
    }
    u
}

/// Random normalized statevector of length `dim`
pub fn random_statevector(dim: usize, rng: &mut StdRng) -> Vec<Complex64> {
    let mut vec: Vec<Complex64> = (0..dim)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let norm = vec.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    vec.iter_mut().for_each(|c| *c /= norm);
    vec
}

/// Random complex matrix with real and imaginary parts in `[-1, 1)`
pub fn random_matrix(n: usize, rng: &mut StdRng) -> ComplexMatrix {
    let data = (0..n * n)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    ComplexMatrix::new(n, n, data).expect("square data")
}

/// Random Hermitian matrix
pub fn random_hermitian(n: usize, rng: &mut StdRng) -> ComplexMatrix {
    let m = random_matrix(n, rng);
    m.add(&m.adjoint()).expect("same shape").scale(Complex64::new(0.5, 0.0))
}
