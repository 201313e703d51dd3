//! Molecular data for fermionic simulations
//!
//! [`MolecularData`] holds the active-space integrals and reference results
//! an electronic-structure package produces, persists them as JSON, and
//! bridges them into `fermisim-state` statevectors. Orbital coefficients and
//! cluster amplitudes ride along as [`Tensor`] and [`Amplitudes`], and
//! [`MolecularData::hamiltonian`] bundles the integrals into a
//! [`MolecularHamiltonian`].
//!
//! # Example
//!
//! ```
//! use fermisim_chem::MolecularData;
//! use fermisim_chem::ComplexMatrix;
//!
//! // two orbitals, one electron of each spin, diagonal one-body integrals
//! let data = MolecularData::new(
//!     2,
//!     (1, 1),
//!     0.5,
//!     ComplexMatrix::from_real(2, 2, &[-1.0, 0.0, 0.0, -0.5]).unwrap(),
//!     vec![0.0; 16],
//! )
//! .unwrap();
//! let hf = data.hartree_fock_state().unwrap();
//! assert_eq!(hf.dimension(), 4);
//! ```

pub mod amplitudes;
pub mod hamiltonian;
pub mod molecular_data;

pub use fermisim_core::{Complex64, ComplexMatrix, FermiError, Result};
pub use amplitudes::{Amplitudes, Tensor};
pub use hamiltonian::MolecularHamiltonian;
pub use molecular_data::{Atom, MolecularData};
