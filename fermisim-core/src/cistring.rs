//! Configuration-interaction string addressing
//!
//! An occupation bitstring over `norb` orbitals has bit `i` set iff orbital
//! `i` is occupied. All bitstrings with the same Hamming weight are ordered
//! as increasing integers, and the address of a bitstring is its position in
//! that order. This is the ordering PySCF's `cistring` module uses, so
//! vectors produced by external FCI solvers can be consumed directly.
//!
//! A spinful system combines an alpha address and a beta address into
//! `address_a * dim_b + address_b`.
//!
//! # Example
//!
//! ```
//! use fermisim_core::cistring::{address, unrank, dim};
//!
//! // 0b011, 0b101, 0b110 are the weight-2 strings over 3 orbitals
//! assert_eq!(address(3, 2, 0b101).unwrap(), 1);
//! assert_eq!(unrank(3, 2, &[2]).unwrap(), vec![0b110]);
//! assert_eq!(dim(3, (2, 1)), 9);
//! ```

use crate::error::{FermiError, Result};
use crate::particles::Nelec;

/// Largest orbital count a `u64` bitstring can address
pub const MAX_NORB: usize = 64;

/// Exact binomial coefficient C(n, k), zero when `k > n`
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    result as usize
}

/// Dimensions `(C(norb, n_alpha), C(norb, n_beta))` of the alpha and beta
/// string spaces; a spinless system has a beta dimension of 1
pub fn dims(norb: usize, nelec: impl Into<Nelec>) -> (usize, usize) {
    let (n_alpha, n_beta) = nelec.into().pair();
    (binomial(norb, n_alpha), binomial(norb, n_beta))
}

/// Dimension of the combined FCI space, saturating at `usize::MAX`
///
/// Use [`try_dim`] where an overflowing dimension must be rejected.
pub fn dim(norb: usize, nelec: impl Into<Nelec>) -> usize {
    let (dim_a, dim_b) = dims(norb, nelec);
    dim_a.saturating_mul(dim_b)
}

/// Dimension of the combined FCI space
///
/// # Errors
/// Returns `InvalidInput` if the dimension does not fit in a `usize`
pub fn try_dim(norb: usize, nelec: impl Into<Nelec>) -> Result<usize> {
    let nelec = nelec.into();
    let (dim_a, dim_b) = dims(norb, nelec);
    dim_a.checked_mul(dim_b).ok_or_else(|| {
        FermiError::invalid_input(format!(
            "FCI dimension C({}, {}) x C({}, {}) overflows",
            norb,
            nelec.pair().0,
            norb,
            nelec.pair().1
        ))
    })
}

/// Check that `norb` fits in a bitstring
pub fn check_norb(norb: usize) -> Result<()> {
    if norb > MAX_NORB {
        return Err(FermiError::invalid_input(format!(
            "{} orbitals exceed the maximum of {}",
            norb, MAX_NORB
        )));
    }
    Ok(())
}

/// Mask with the lowest `norb` bits set
#[inline]
fn orbital_mask(norb: usize) -> u64 {
    if norb >= MAX_NORB {
        u64::MAX
    } else {
        (1u64 << norb) - 1
    }
}

/// Lexicographic rank of `bitstring` among weight-`n_particles` strings
///
/// # Errors
/// Returns `InvalidInput` if bits are set at or above `norb` or the weight
/// differs from `n_particles`
pub fn address(norb: usize, n_particles: usize, bitstring: u64) -> Result<usize> {
    check_norb(norb)?;
    if bitstring & !orbital_mask(norb) != 0 {
        return Err(FermiError::invalid_input(format!(
            "bitstring {:#b} has bits beyond {} orbitals",
            bitstring, norb
        )));
    }
    if bitstring.count_ones() as usize != n_particles {
        return Err(FermiError::invalid_input(format!(
            "bitstring {:#b} has {} particles, expected {}",
            bitstring,
            bitstring.count_ones(),
            n_particles
        )));
    }
    Ok(address_unchecked(norb, n_particles, bitstring))
}

/// Rank of a bitstring already known to be valid
#[inline]
pub(crate) fn address_unchecked(norb: usize, n_particles: usize, bitstring: u64) -> usize {
    let mut addr = 0;
    let mut remaining = n_particles;
    for orb in (0..norb).rev() {
        if remaining == 0 {
            break;
        }
        if bitstring >> orb & 1 == 1 {
            addr += binomial(orb, remaining);
            remaining -= 1;
        }
    }
    addr
}

/// Batch form of [`address`]
pub fn addresses(norb: usize, n_particles: usize, bitstrings: &[u64]) -> Result<Vec<usize>> {
    bitstrings
        .iter()
        .map(|&s| address(norb, n_particles, s))
        .collect()
}

/// Bitstrings at the given addresses (inverse of [`address`])
///
/// # Errors
/// Returns `InvalidInput` if an address is not below `C(norb, n_particles)`
pub fn unrank(norb: usize, n_particles: usize, addresses: &[usize]) -> Result<Vec<u64>> {
    check_norb(norb)?;
    let count = binomial(norb, n_particles);
    addresses
        .iter()
        .map(|&addr| {
            if addr >= count {
                return Err(FermiError::invalid_input(format!(
                    "address {} out of range for {} strings",
                    addr, count
                )));
            }
            Ok(unrank_unchecked(norb, n_particles, addr))
        })
        .collect()
}

#[inline]
fn unrank_unchecked(norb: usize, n_particles: usize, mut addr: usize) -> u64 {
    let mut bitstring = 0u64;
    let mut remaining = n_particles;
    for orb in (0..norb).rev() {
        if remaining == 0 {
            break;
        }
        let below = binomial(orb, remaining);
        if addr >= below {
            bitstring |= 1u64 << orb;
            addr -= below;
            remaining -= 1;
        }
    }
    bitstring
}

/// All weight-`n_particles` bitstrings over `norb` orbitals in address order
///
/// An empty vector is returned when `n_particles > norb`.
pub fn make_strings(norb: usize, n_particles: usize) -> Result<Vec<u64>> {
    check_norb(norb)?;
    let count = binomial(norb, n_particles);
    Ok((0..count)
        .map(|addr| unrank_unchecked(norb, n_particles, addr))
        .collect())
}

/// Occupied orbitals of a bitstring in increasing order
pub fn occupied_orbitals(bitstring: u64) -> Vec<usize> {
    (0..MAX_NORB)
        .filter(|&orb| bitstring >> orb & 1 == 1)
        .collect()
}

/// Bitstring with the given orbitals occupied
///
/// # Errors
/// Returns `InvalidInput` for an orbital outside `[0, norb)` or a duplicate
pub fn bitstring_from_orbitals(norb: usize, orbitals: &[usize]) -> Result<u64> {
    check_norb(norb)?;
    let mut bitstring = 0u64;
    for &orb in orbitals {
        if orb >= norb {
            return Err(FermiError::invalid_input(format!(
                "orbital {} out of range for {} orbitals",
                orb, norb
            )));
        }
        let bit = 1u64 << orb;
        if bitstring & bit != 0 {
            return Err(FermiError::invalid_input(format!("duplicate orbital {}", orb)));
        }
        bitstring |= bit;
    }
    Ok(bitstring)
}

// ============================================================================
// Second quantization on bitstrings
// ============================================================================

/// Number of occupied orbitals strictly above `orb`
#[inline]
fn occupied_above(bitstring: u64, orb: usize) -> u32 {
    bitstring
        .checked_shr(orb as u32 + 1)
        .unwrap_or(0)
        .count_ones()
}

/// Fermionic sign of a creation or annihilation operator on orbital `orb`
#[inline]
pub fn parity_sign(bitstring: u64, orb: usize) -> f64 {
    if occupied_above(bitstring, orb) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Apply `a_orb`, returning the new bitstring and sign, or `None` if empty
#[inline]
pub fn annihilate(bitstring: u64, orb: usize) -> Option<(u64, f64)> {
    let bit = 1u64 << orb;
    if bitstring & bit == 0 {
        return None;
    }
    Some((bitstring ^ bit, parity_sign(bitstring, orb)))
}

/// Apply `a†_orb`, returning the new bitstring and sign, or `None` if occupied
#[inline]
pub fn create(bitstring: u64, orb: usize) -> Option<(u64, f64)> {
    let bit = 1u64 << orb;
    if bitstring & bit != 0 {
        return None;
    }
    Some((bitstring | bit, parity_sign(bitstring, orb)))
}

/// Apply the excitation `a†_p a_q`
#[inline]
pub fn excite(bitstring: u64, p: usize, q: usize) -> Option<(u64, f64)> {
    let (mid, sign_q) = annihilate(bitstring, q)?;
    let (target, sign_p) = create(mid, p)?;
    Some((target, sign_q * sign_p))
}

/// Nonzero matrix element of `a†_p a_q` leaving a source string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneBodyLink {
    /// Created orbital `p`
    pub creation: usize,
    /// Annihilated orbital `q`
    pub annihilation: usize,
    /// Address of the resulting string
    pub target: usize,
    /// Fermionic sign of the matrix element
    pub sign: f64,
}

/// For every string (by address) every excitation `a†_p a_q` that maps it
/// to another string of the same weight, diagonal terms included
pub fn one_body_links(norb: usize, n_particles: usize) -> Result<Vec<Vec<OneBodyLink>>> {
    let strings = make_strings(norb, n_particles)?;
    tracing::trace!(norb, n_particles, count = strings.len(), "building one-body link table");
    let links = strings
        .iter()
        .map(|&source| {
            let mut row = Vec::with_capacity(n_particles * (norb - n_particles + 1));
            for q in occupied_orbitals(source) {
                for p in 0..norb {
                    if let Some((target, sign)) = excite(source, p, q) {
                        row.push(OneBodyLink {
                            creation: p,
                            annihilation: q,
                            target: address_unchecked(norb, n_particles, target),
                            sign,
                        });
                    }
                }
            }
            row
        })
        .collect();
    Ok(links)
}
