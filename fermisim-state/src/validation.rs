//! Statevector shape checks and vector helpers
//!
//! Every operation taking a statevector checks its length against the FCI
//! dimension of `(norb, nelec)` before touching amplitudes.

use fermisim_core::cistring;
use fermisim_core::{FermiError, Nelec, Result};
use num_complex::Complex64;

/// Check that `len` is the FCI dimension of `(norb, nelec)`, returning
/// `(dim_a, dim_b)`
///
/// A spinless system reports a beta dimension of 1.
pub fn check_vec_len(len: usize, norb: usize, nelec: Nelec) -> Result<(usize, usize)> {
    cistring::check_norb(norb)?;
    nelec.validate(norb)?;
    let total = cistring::try_dim(norb, nelec)?;
    if len != total {
        return Err(FermiError::dimension_mismatch(total, len));
    }
    let (dim_a, dim_b) = cistring::dims(norb, nelec);
    Ok((dim_a, dim_b))
}

/// Euclidean norm
pub fn norm(amplitudes: &[Complex64]) -> f64 {
    amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
}

/// Inner product `⟨a|b⟩`, conjugating the left argument
pub fn vdot(a: &[Complex64], b: &[Complex64]) -> Complex64 {
    a.iter().zip(b).map(|(x, y)| x.conj() * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_vec_len() {
        assert_eq!(check_vec_len(9, 3, (2, 1).into()).unwrap(), (3, 3));
        assert_eq!(check_vec_len(3, 3, 2.into()).unwrap(), (3, 1));
        assert_eq!(
            check_vec_len(8, 3, (2, 1).into()),
            Err(FermiError::dimension_mismatch(9, 8))
        );
        assert!(matches!(
            check_vec_len(1, 2, (3, 0).into()),
            Err(FermiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_vec_len_rejects_overflowing_dimension() {
        assert!(matches!(
            check_vec_len(1, 64, (32, 32).into()),
            Err(FermiError::InvalidInput(_))
        ));
        assert!(check_vec_len(1, 64, (0, 0).into()).is_ok());
    }

    #[test]
    fn test_vdot_conjugates_left() {
        let a = [Complex64::new(0.0, 1.0)];
        let b = [Complex64::new(0.0, 1.0)];
        assert_eq!(vdot(&a, &b), Complex64::new(1.0, 0.0));
    }
}
