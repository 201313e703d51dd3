//! Active-space molecular data
//!
//! Integrals follow the conventions of the electronic-structure package that
//! produced them: `one_body_integrals[p, q] = h_pq` over the active
//! orbitals and `two_body_integrals` holds `(pq|rs)` in chemist's notation,
//! flattened row-major with length `norb⁴`.
//!
//! Orbital coefficients span the full molecular-orbital space: `mo_coeff` is
//! `n_ao × n_mo` and `active_space` indexes its columns. Cluster amplitudes
//! are over the active space only.

use crate::amplitudes::{Amplitudes, Partition, Tensor};
use crate::hamiltonian::MolecularHamiltonian;
use fermisim_core::{cistring, ComplexMatrix, FermiError, Nelec, Result};
use fermisim_state::StateVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Atom with Cartesian coordinates
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Atom {
    /// Element symbol, e.g. "H"
    pub symbol: String,
    /// Position in the units of the producing package
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(symbol: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            symbol: symbol.into(),
            position,
        }
    }
}

/// Integrals and reference results for a molecule in an active space
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MolecularData {
    /// Atoms of the molecule
    pub atoms: Vec<Atom>,
    /// Basis set name, e.g. "sto-6g"
    pub basis: String,
    /// `2S = n_alpha - n_beta`
    pub spin: i64,
    /// Point group used by the producing package
    pub symmetry: Option<String>,
    /// Number of active spatial orbitals
    pub norb: usize,
    /// Active (alpha, beta) electrons
    pub nelec: (usize, usize),
    /// Molecular orbitals included in the active space
    pub active_space: Vec<usize>,
    /// Nuclear repulsion plus frozen-core energy
    pub core_energy: f64,
    /// `norb × norb` one-body integrals
    pub one_body_integrals: ComplexMatrix,
    /// Two-body integrals, `norb⁴` entries
    pub two_body_integrals: Vec<f64>,
    #[serde(default)]
    pub hf_energy: Option<f64>,
    #[serde(default)]
    pub mp2_energy: Option<f64>,
    #[serde(default)]
    pub ccsd_energy: Option<f64>,
    #[serde(default)]
    pub fci_energy: Option<f64>,
    /// FCI ground state in the combined alpha/beta address space
    #[serde(default)]
    pub fci_vec: Option<Vec<Complex64>>,
    /// x, y and z dipole integrals, `3 · norb²` entries
    #[serde(default)]
    pub dipole_integrals: Option<Vec<f64>>,
    /// Irreducible representation label of each active orbital
    #[serde(default)]
    pub orbital_symmetries: Option<Vec<String>>,
    /// Orbital coefficients, `n_ao × n_mo`
    #[serde(default)]
    pub mo_coeff: Option<Tensor>,
    /// Occupation of every molecular orbital
    #[serde(default)]
    pub mo_occ: Option<Vec<f64>>,
    /// Hartree-Fock orbital coefficients, `n_ao × n_mo`
    #[serde(default)]
    pub hf_mo_coeff: Option<Tensor>,
    #[serde(default)]
    pub hf_mo_occ: Option<Vec<f64>>,
    #[serde(default)]
    pub mp2_t2: Option<Amplitudes>,
    #[serde(default)]
    pub ccsd_t1: Option<Amplitudes>,
    #[serde(default)]
    pub ccsd_t2: Option<Amplitudes>,
}

impl MolecularData {
    /// Minimal data set: integrals over `norb` orbitals with every orbital
    /// active
    ///
    /// # Errors
    /// Returns an error if the integrals do not match `norb` (see
    /// [`MolecularData::validate`])
    pub fn new(
        norb: usize,
        nelec: (usize, usize),
        core_energy: f64,
        one_body_integrals: ComplexMatrix,
        two_body_integrals: Vec<f64>,
    ) -> Result<Self> {
        let data = Self {
            atoms: Vec::new(),
            basis: String::new(),
            spin: nelec.0 as i64 - nelec.1 as i64,
            symmetry: None,
            norb,
            nelec,
            active_space: (0..norb).collect(),
            core_energy,
            one_body_integrals,
            two_body_integrals,
            hf_energy: None,
            mp2_energy: None,
            ccsd_energy: None,
            fci_energy: None,
            fci_vec: None,
            dipole_integrals: None,
            orbital_symmetries: None,
            mo_coeff: None,
            mo_occ: None,
            hf_mo_coeff: None,
            hf_mo_occ: None,
            mp2_t2: None,
            ccsd_t1: None,
            ccsd_t2: None,
        };
        data.validate()?;
        Ok(data)
    }

    /// Check that every array agrees with `norb` and `nelec`
    ///
    /// # Errors
    /// `DimensionMismatch` for mis-sized integrals or FCI vector,
    /// `InvalidInput` for inconsistent electron counts or labels
    pub fn validate(&self) -> Result<()> {
        let norb = self.norb;
        cistring::check_norb(norb)?;
        Nelec::from(self.nelec).validate(norb)?;

        let spin = self.nelec.0 as i64 - self.nelec.1 as i64;
        if self.spin != spin {
            return Err(FermiError::invalid_input(format!(
                "spin {} disagrees with nelec=({}, {})",
                self.spin, self.nelec.0, self.nelec.1
            )));
        }
        if self.active_space.len() != norb {
            return Err(FermiError::invalid_input(format!(
                "active space lists {} orbitals, expected {}",
                self.active_space.len(),
                norb
            )));
        }

        self.one_body_integrals.expect_square(norb)?;
        check_len(self.one_body_integrals.data().len(), norb * norb)?;
        check_len(self.two_body_integrals.len(), norb.pow(4))?;
        if let Some(fci_vec) = &self.fci_vec {
            check_len(fci_vec.len(), cistring::try_dim(norb, self.nelec)?)?;
        }
        if let Some(dipole) = &self.dipole_integrals {
            check_len(dipole.len(), 3 * norb * norb)?;
        }
        if let Some(labels) = &self.orbital_symmetries {
            if labels.len() != norb {
                return Err(FermiError::invalid_input(format!(
                    "{} orbital symmetry labels for {} orbitals",
                    labels.len(),
                    norb
                )));
            }
        }
        self.validate_orbitals()?;

        let partition = Partition::new(norb, self.nelec);
        if let Some(t2) = &self.mp2_t2 {
            t2.validate_doubles(partition, "mp2_t2")?;
        }
        if let Some(t1) = &self.ccsd_t1 {
            t1.validate_singles(partition, "ccsd_t1")?;
        }
        if let Some(t2) = &self.ccsd_t2 {
            t2.validate_doubles(partition, "ccsd_t2")?;
        }
        Ok(())
    }

    fn validate_orbitals(&self) -> Result<()> {
        let n_mo = match (&self.mo_coeff, &self.mo_occ) {
            (Some(coeff), _) => Some(coefficient_columns(coeff, "mo_coeff")?),
            (None, Some(occ)) => Some(occ.len()),
            (None, None) => None,
        };
        let Some(n_mo) = n_mo else {
            return Ok(());
        };

        let mut seen = vec![false; n_mo];
        for &orb in &self.active_space {
            if orb >= n_mo || seen[orb] {
                return Err(FermiError::invalid_input(format!(
                    "active space {:?} is not a set of distinct orbitals below {}",
                    self.active_space, n_mo
                )));
            }
            seen[orb] = true;
        }

        if let Some(occ) = &self.mo_occ {
            check_len(occ.len(), n_mo)?;
            let active: f64 = self.active_space.iter().map(|&orb| occ[orb]).sum();
            let expected = (self.nelec.0 + self.nelec.1) as f64;
            if (active - expected).abs() > 1e-8 {
                return Err(FermiError::invalid_input(format!(
                    "active orbitals hold {} electrons, nelec sums to {}",
                    active, expected
                )));
            }
        }

        if let Some(hf_coeff) = &self.hf_mo_coeff {
            let hf_cols = coefficient_columns(hf_coeff, "hf_mo_coeff")?;
            if let Some(coeff) = &self.mo_coeff {
                hf_coeff.expect_shape(&coeff.shape, "hf_mo_coeff")?;
            }
            if let Some(hf_occ) = &self.hf_mo_occ {
                check_len(hf_occ.len(), hf_cols)?;
            }
        }
        Ok(())
    }

    /// Hamiltonian over the active space
    pub fn hamiltonian(&self) -> Result<MolecularHamiltonian> {
        MolecularHamiltonian::new(
            self.one_body_integrals.clone(),
            self.two_body_integrals.clone(),
            self.core_energy,
        )
    }

    /// Two-body integral `(pq|rs)`
    #[inline]
    pub fn two_body(&self, p: usize, q: usize, r: usize, s: usize) -> f64 {
        let n = self.norb;
        self.two_body_integrals[((p * n + q) * n + r) * n + s]
    }

    /// Hartree-Fock statevector of the active space
    pub fn hartree_fock_state(&self) -> Result<StateVector> {
        StateVector::hartree_fock(self.norb, self.nelec)
    }

    /// Stored FCI ground state, if any
    pub fn fci_state(&self) -> Result<Option<StateVector>> {
        self.fci_vec
            .as_ref()
            .map(|vec| StateVector::new(self.norb, self.nelec, vec.clone()))
            .transpose()
    }

    /// One-body energy `Σ_pq h_pq D_pq + core_energy` for a spin-summed 1-RDM
    ///
    /// # Errors
    /// `DimensionMismatch` if `one_rdm` is not `norb × norb`
    pub fn one_body_energy(&self, one_rdm: &ComplexMatrix) -> Result<f64> {
        self.hamiltonian()?.one_body_energy(one_rdm)
    }

    /// Hartree-Fock energy from the stored integrals
    ///
    /// `Σ_i 2 h_ii + Σ_ij (2 (ii|jj) − (ij|ji))` generalized to open shells,
    /// plus the core energy.
    pub fn hartree_fock_energy(&self) -> Result<f64> {
        self.hamiltonian()?.hartree_fock_energy(self.nelec)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FermiError::Serialization(e.to_string()))
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self =
            serde_json::from_str(json).map_err(|e| FermiError::Serialization(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), norb = self.norb, "wrote molecular data");
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let data = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), norb = data.norb, "read molecular data");
        Ok(data)
    }
}

fn coefficient_columns(coeff: &Tensor, label: &str) -> Result<usize> {
    if coeff.rank() != 2 {
        return Err(FermiError::invalid_input(format!(
            "{} must be a matrix, got shape {:?}",
            label, coeff.shape
        )));
    }
    coeff.expect_shape(&coeff.shape, label)?;
    Ok(coeff.shape[1])
}

fn check_len(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(FermiError::dimension_mismatch(expected, actual));
    }
    Ok(())
}
