//! Conversion between statevector indices and occupation bitstrings
//!
//! A spinful index renders as `2 * norb` characters: the beta field followed
//! by the alpha field. Each field lists orbital `norb - 1` first and orbital
//! 0 last, so the rightmost character of the whole string is alpha orbital 0.
//!
//! # Example
//!
//! ```
//! use fermisim_state::{indices_to_strings, strings_to_indices};
//!
//! let strings = indices_to_strings(&[0, 1, 8], 3, (2, 1)).unwrap();
//! assert_eq!(strings, vec!["001011", "010011", "100110"]);
//! assert_eq!(strings_to_indices(&strings, 3, (2, 1)).unwrap(), vec![0, 1, 8]);
//! ```

use fermisim_core::cistring;
use fermisim_core::{FermiError, Nelec, Result};

/// Render the lowest `norb` bits, most significant first
fn render_field(bitstring: u64, norb: usize, out: &mut String) {
    for orb in (0..norb).rev() {
        out.push(if bitstring >> orb & 1 == 1 { '1' } else { '0' });
    }
}

/// Parse a field rendered by [`render_field`]
fn parse_field(field: &str, norb: usize) -> Result<u64> {
    let mut bitstring = 0u64;
    for (pos, ch) in field.chars().enumerate() {
        let orb = norb - 1 - pos;
        match ch {
            '0' => {},
            '1' => bitstring |= 1u64 << orb,
            other => {
                return Err(FermiError::invalid_format(format!(
                    "unexpected character {:?} in bitstring {:?}",
                    other, field
                )))
            },
        }
    }
    Ok(bitstring)
}

/// Convert statevector indices to bitstrings
///
/// # Errors
/// Returns `InvalidInput` if an index is not below the FCI dimension
pub fn indices_to_strings(
    indices: &[usize],
    norb: usize,
    nelec: impl Into<Nelec>,
) -> Result<Vec<String>> {
    let nelec = nelec.into();
    cistring::check_norb(norb)?;
    nelec.validate(norb)?;
    let total = cistring::try_dim(norb, nelec)?;

    let (n_alpha, n_beta) = nelec.pair();
    let (_, dim_b) = cistring::dims(norb, nelec);

    indices
        .iter()
        .map(|&index| {
            if index >= total {
                return Err(FermiError::invalid_input(format!(
                    "index {} out of range for dimension {}",
                    index, total
                )));
            }
            let (addr_a, addr_b) = (index / dim_b, index % dim_b);
            let string_a = cistring::unrank(norb, n_alpha, &[addr_a])?[0];
            match nelec {
                Nelec::Spinless(_) => {
                    let mut out = String::with_capacity(norb);
                    render_field(string_a, norb, &mut out);
                    Ok(out)
                },
                Nelec::Spinful(..) => {
                    let string_b = cistring::unrank(norb, n_beta, &[addr_b])?[0];
                    let mut out = String::with_capacity(2 * norb);
                    render_field(string_b, norb, &mut out);
                    render_field(string_a, norb, &mut out);
                    Ok(out)
                },
            }
        })
        .collect()
}

/// Convert bitstrings to statevector indices (inverse of
/// [`indices_to_strings`])
///
/// # Errors
/// Returns `InvalidFormat` if a string is not `2 * norb` (spinful) or `norb`
/// (spinless) characters of '0'/'1', and `InvalidInput` if a field has the
/// wrong number of particles
pub fn strings_to_indices<S: AsRef<str>>(
    strings: &[S],
    norb: usize,
    nelec: impl Into<Nelec>,
) -> Result<Vec<usize>> {
    let nelec = nelec.into();
    cistring::check_norb(norb)?;
    nelec.validate(norb)?;
    cistring::try_dim(norb, nelec)?;

    let (n_alpha, n_beta) = nelec.pair();
    let (_, dim_b) = cistring::dims(norb, nelec);
    let expected_len = match nelec {
        Nelec::Spinless(_) => norb,
        Nelec::Spinful(..) => 2 * norb,
    };

    strings
        .iter()
        .map(|s| {
            let s = s.as_ref();
            if s.chars().count() != expected_len {
                return Err(FermiError::invalid_format(format!(
                    "bitstring {:?} has length {}, expected {}",
                    s,
                    s.chars().count(),
                    expected_len
                )));
            }
            match nelec {
                Nelec::Spinless(_) => {
                    let string_a = parse_field(s, norb)?;
                    cistring::address(norb, n_alpha, string_a)
                },
                Nelec::Spinful(..) => {
                    // split_at needs a char boundary at norb
                    if !s.is_ascii() {
                        return Err(FermiError::invalid_format(format!(
                            "bitstring {:?} contains non-binary characters",
                            s
                        )));
                    }
                    let (field_b, field_a) = s.split_at(norb);
                    let string_a = parse_field(field_a, norb)?;
                    let string_b = parse_field(field_b, norb)?;
                    let addr_a = cistring::address(norb, n_alpha, string_a)?;
                    let addr_b = cistring::address(norb, n_beta, string_b)?;
                    Ok(addr_a * dim_b + addr_b)
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: [&str; 9] = [
        "001011", "010011", "100011", "001101", "010101", "100101", "001110", "010110", "100110",
    ];

    #[test]
    fn test_indices_to_strings_fixture() {
        let indices: Vec<usize> = (0..9).collect();
        let strings = indices_to_strings(&indices, 3, (2, 1)).unwrap();
        assert_eq!(strings, FIXTURE);
    }

    #[test]
    fn test_strings_to_indices_fixture() {
        let indices = strings_to_indices(&FIXTURE, 3, (2, 1)).unwrap();
        assert_eq!(indices, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_spinless() {
        let strings = indices_to_strings(&[0, 1, 2], 3, 2).unwrap();
        assert_eq!(strings, vec!["011", "101", "110"]);
        assert_eq!(strings_to_indices(&strings, 3, 2).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_vacuum_renders_empty() {
        assert_eq!(indices_to_strings(&[0], 0, (0, 0)).unwrap(), vec![""]);
        assert_eq!(strings_to_indices(&[""], 0, (0, 0)).unwrap(), vec![0]);
    }

    #[test]
    fn test_wrong_length() {
        let err = strings_to_indices(&["00101"], 3, (2, 1)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidFormat(_)));
        let err = strings_to_indices(&["001011"], 3, 2).unwrap_err();
        assert!(matches!(err, FermiError::InvalidFormat(_)));
    }

    #[test]
    fn test_wrong_alphabet() {
        let err = strings_to_indices(&["0010a1"], 3, (2, 1)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidFormat(_)));
        let err = strings_to_indices(&["0010é1"], 3, (2, 1)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidFormat(_)));
    }

    #[test]
    fn test_wrong_particle_number() {
        let err = strings_to_indices(&["011011"], 3, (2, 1)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidInput(_)));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = indices_to_strings(&[9], 3, (2, 1)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidInput(_)));
    }

    #[test]
    fn test_overflowing_dimension_is_rejected() {
        let err = indices_to_strings(&[0], 64, (32, 32)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidInput(_)));

        let lowest = format!("{}{}", "0".repeat(32), "1".repeat(32));
        let both = format!("{}{}", lowest, lowest);
        let err = strings_to_indices(&[both], 64, (32, 32)).unwrap_err();
        assert!(matches!(err, FermiError::InvalidInput(_)));

        // a single sector of the same size still fits
        assert_eq!(indices_to_strings(&[0], 64, 32).unwrap(), vec![lowest]);
    }
}
