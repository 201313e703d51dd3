//! Core types for fermionic Fock-space simulation
//!
//! This crate provides the pieces every fermionic state operation builds on:
//! - [`cistring`]: bijection between occupation bitstrings and addresses
//! - [`Nelec`] / [`Occupation`]: particle numbers and occupied orbitals
//! - [`ComplexMatrix`]: one-particle matrices (rotations, RDMs, tensors)
//! - [`OrbitalRotation`]: basis rotations for one or both spin sectors
//! - [`givens`]: factoring a rotation into two-orbital steps
//! - [`FermiError`]: the error type shared by the workspace
//!
//! # Example
//! ```
//! use fermisim_core::{cistring, Nelec};
//!
//! let nelec = Nelec::from((2, 1));
//! assert_eq!(cistring::dims(3, nelec), (3, 3));
//! assert_eq!(cistring::dim(3, nelec), 9);
//! ```

pub mod cistring;
pub mod config;
pub mod error;
pub mod givens;
pub mod matrix;
pub mod orbital_rotation;
pub mod particles;

// Re-exports for convenience
pub use cistring::{dim, dims, try_dim};
pub use config::FermiConfig;
pub use error::{FermiError, Result};
pub use givens::{givens_decomposition, GivensDecomposition, GivensRotation};
pub use matrix::ComplexMatrix;
pub use num_complex::Complex64;
pub use orbital_rotation::OrbitalRotation;
pub use particles::{Nelec, Occupation};
