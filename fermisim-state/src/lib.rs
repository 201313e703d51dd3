//! Fermionic statevectors in the fixed-particle-number Fock space
//!
//! A statevector over `norb` spatial orbitals with `(n_alpha, n_beta)`
//! electrons is a dense complex vector of length
//! `C(norb, n_alpha) · C(norb, n_beta)`, indexed by
//! `address_alpha · dim_beta + address_beta`. Spinless systems use a single
//! sector.
//!
//! # Operations
//!
//! - **Construction**: [`slater_determinant`], [`hartree_fock_state`]
//! - **Basis changes**: [`apply_orbital_rotation`]
//! - **Density matrices**: [`rdm`], [`slater_determinant_rdm`]
//! - **Observables**: [`spin_square`], [`apply_one_body`],
//!   [`expectation_one_body_product`], [`expectation_one_body_power`]
//! - **Text form**: [`indices_to_strings`], [`strings_to_indices`]
//!
//! # Example
//!
//! ```
//! use fermisim_state::{indices_to_strings, rdm, slater_determinant};
//!
//! let vec = slater_determinant(3, ([0, 1], [0]), None).unwrap();
//! assert_eq!(indices_to_strings(&[0], 3, (2, 1)).unwrap(), vec!["001011"]);
//!
//! let one_rdm = rdm(&vec, 3, (2, 1), 1, true).unwrap();
//! assert_eq!(one_rdm[(0, 0)].re, 2.0);
//! ```

pub mod one_body;
pub mod rdm;
pub mod rotation;
pub mod slater;
pub mod spin;
pub mod state_vector;
pub mod strings;
pub mod validation;
pub mod wick;

#[cfg(test)]
mod test_utils;

pub use one_body::{apply_one_body, apply_one_body_with_config};
pub use rdm::{rdm, rdm_with_config, slater_determinant_rdm, slater_determinant_rdm_with_config};
pub use rotation::{
    apply_orbital_rotation, apply_orbital_rotation_with_config, rotated_configuration,
    rotation_sector_matrix, rotation_sector_matrix_with_config,
};
pub use slater::{hartree_fock_state, one_hot, slater_determinant, slater_determinant_with_config};
pub use spin::{
    contract_spin_square, contract_spin_square_with_config, spin_square, spin_square_real,
    spin_square_with_config,
};
pub use state_vector::StateVector;
pub use strings::{indices_to_strings, strings_to_indices};
pub use wick::{
    expectation_one_body_power, expectation_one_body_product, spin_orbital_tensor,
    MAX_DISTINCT_OPERATORS,
};

pub use fermisim_core::{
    dim, dims, try_dim, Complex64, ComplexMatrix, FermiConfig, FermiError, Nelec, Occupation,
    OrbitalRotation, Result,
};
