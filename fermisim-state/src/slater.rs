//! Slater determinants and the Hartree-Fock state
//!
//! A Slater determinant is an electronic configuration `|x⟩`, optionally
//! followed by an orbital rotation `U|x⟩`. Unrotated, it is a one-hot
//! vector in the combined alpha/beta address space.

use crate::rotation::rotated_configuration;
use fermisim_core::cistring;
use fermisim_core::{
    ComplexMatrix, FermiConfig, FermiError, Nelec, Occupation, OrbitalRotation, Result,
};
use num_complex::Complex64;

/// Vector of zeros with a single one at `index`
pub fn one_hot(len: usize, index: usize) -> Result<Vec<Complex64>> {
    if index >= len {
        return Err(FermiError::invalid_input(format!(
            "index {} out of range for length {}",
            index, len
        )));
    }
    let mut vec = vec![Complex64::new(0.0, 0.0); len];
    vec[index] = Complex64::new(1.0, 0.0);
    Ok(vec)
}

/// Combined statevector index of an electronic configuration
///
/// A spinless occupation is addressed as the alpha sector of a system with
/// no beta particles.
pub fn configuration_index(norb: usize, occupation: &Occupation) -> Result<usize> {
    cistring::check_norb(norb)?;
    occupation.validate(norb)?;
    let alpha = occupation.alpha();
    let beta = occupation.beta();
    let string_a = cistring::bitstring_from_orbitals(norb, alpha)?;
    let string_b = cistring::bitstring_from_orbitals(norb, beta)?;
    let addr_a = cistring::address(norb, alpha.len(), string_a)?;
    let addr_b = cistring::address(norb, beta.len(), string_b)?;
    let (_, dim_b) = cistring::dims(norb, (alpha.len(), beta.len()));
    Ok(addr_a * dim_b + addr_b)
}

/// Return a Slater determinant as a statevector
///
/// # Arguments
/// * `norb` - Number of spatial orbitals
/// * `occupation` - Occupied orbitals, spinless or (alpha, beta)
/// * `orbital_rotation` - Optional rotation applied after building the
///   configuration
///
/// # Errors
/// Returns `InvalidInput` for out-of-range or duplicate orbitals or a
/// non-unitary rotation, `DimensionMismatch` for a rotation of the wrong size
///
/// # Example
/// ```
/// use fermisim_state::slater_determinant;
/// use num_complex::Complex64;
///
/// let vec = slater_determinant(3, ([0, 2], [1]), None).unwrap();
/// assert_eq!(vec.len(), 9);
/// assert_eq!(vec[4], Complex64::new(1.0, 0.0));
/// ```
pub fn slater_determinant(
    norb: usize,
    occupation: impl Into<Occupation>,
    orbital_rotation: Option<&OrbitalRotation>,
) -> Result<Vec<Complex64>> {
    slater_determinant_with_config(norb, occupation, orbital_rotation, &FermiConfig::default())
}

/// [`slater_determinant`] with explicit configuration
pub fn slater_determinant_with_config(
    norb: usize,
    occupation: impl Into<Occupation>,
    orbital_rotation: Option<&OrbitalRotation>,
    config: &FermiConfig,
) -> Result<Vec<Complex64>> {
    let occupation = occupation.into();
    occupation.validate(norb)?;
    if norb == 0 {
        return Ok(vec![Complex64::new(1.0, 0.0)]);
    }

    let nelec = Nelec::Spinful(occupation.alpha().len(), occupation.beta().len());
    let total = cistring::try_dim(norb, nelec)?;
    let Some(rotation) = orbital_rotation else {
        let index = configuration_index(norb, &occupation)?;
        tracing::trace!(norb, %nelec, index, "built configuration");
        return one_hot(total, index);
    };

    // the rotated configuration is the product of one induced column per sector
    rotation.validate(norb, config)?;
    let sector = |u: Option<&ComplexMatrix>, occupied: &[usize]| -> Result<Vec<Complex64>> {
        match u {
            Some(u) => rotated_configuration(u, norb, occupied, config),
            None => {
                let string = cistring::bitstring_from_orbitals(norb, occupied)?;
                let index = cistring::address(norb, occupied.len(), string)?;
                one_hot(cistring::binomial(norb, occupied.len()), index)
            },
        }
    };
    let column_a = sector(rotation.alpha(), occupation.alpha())?;
    let column_b = sector(rotation.beta(), occupation.beta())?;
    tracing::trace!(norb, %nelec, dim = total, "built rotated configuration");

    let mut vec = vec![Complex64::new(0.0, 0.0); total];
    for (row, &a) in vec.chunks_mut(column_b.len()).zip(&column_a) {
        for (x, &b) in row.iter_mut().zip(&column_b) {
            *x = a * b;
        }
    }
    Ok(vec)
}

/// Return the Hartree-Fock state, the lowest orbitals filled in each sector
///
/// # Example
/// ```
/// use fermisim_state::hartree_fock_state;
/// use num_complex::Complex64;
///
/// let vec = hartree_fock_state(3, (2, 1)).unwrap();
/// assert_eq!(vec[0], Complex64::new(1.0, 0.0));
/// ```
pub fn hartree_fock_state(norb: usize, nelec: impl Into<Nelec>) -> Result<Vec<Complex64>> {
    let nelec = nelec.into();
    nelec.validate(norb)?;
    slater_determinant(norb, Occupation::lowest(nelec), None)
}
