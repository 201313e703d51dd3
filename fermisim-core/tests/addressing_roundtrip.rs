//! Integration tests for CI string addressing

use fermisim_core::cistring::{
    address, addresses, binomial, dim, dims, make_strings, occupied_orbitals, unrank,
};
use fermisim_core::{FermiError, Nelec};

#[test]
fn test_roundtrip_every_weight_up_to_eight_orbitals() {
    for norb in 0..=8 {
        for n in 0..=norb {
            let count = binomial(norb, n);
            let mut seen = vec![false; count];

            // enumerate every bitstring over norb bits with weight n
            for s in 0u64..(1u64 << norb) {
                if s.count_ones() as usize != n {
                    continue;
                }
                let addr = address(norb, n, s).unwrap();
                assert!(addr < count, "address {} out of range", addr);
                assert!(!seen[addr], "address {} assigned twice", addr);
                seen[addr] = true;
                assert_eq!(unrank(norb, n, &[addr]).unwrap(), vec![s]);
            }
            assert!(seen.iter().all(|&x| x));
        }
    }
}

#[test]
fn test_addresses_follow_integer_order() {
    for norb in 1..=7 {
        for n in 0..=norb {
            let strings = make_strings(norb, n).unwrap();
            assert!(strings.windows(2).all(|w| w[0] < w[1]));
            let addrs = addresses(norb, n, &strings).unwrap();
            assert_eq!(addrs, (0..strings.len()).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_dim_is_product_of_dims() {
    for norb in 0..=6 {
        for n_alpha in 0..=norb {
            for n_beta in 0..=norb {
                let (dim_a, dim_b) = dims(norb, (n_alpha, n_beta));
                assert_eq!(dim(norb, (n_alpha, n_beta)), dim_a * dim_b);
            }
        }
    }
}

#[test]
fn test_spinless_dim_is_single_binomial() {
    assert_eq!(dim(5, Nelec::Spinless(2)), 10);
    assert_eq!(dims(5, Nelec::Spinless(2)), (10, 1));
}

#[test]
fn test_vacuum() {
    assert_eq!(dim(0, (0, 0)), 1);
    assert_eq!(dim(0, 0), 1);
    assert_eq!(unrank(0, 0, &[0]).unwrap(), vec![0]);
}

#[test]
fn test_unrank_batch() {
    let strings = unrank(4, 2, &[5, 0, 3]).unwrap();
    assert_eq!(strings, vec![0b1100, 0b0011, 0b1001]);
    assert_eq!(occupied_orbitals(strings[2]), vec![0, 3]);
}

#[test]
fn test_address_errors() {
    assert!(matches!(address(3, 1, 0b11), Err(FermiError::InvalidInput(_))));
    assert!(matches!(address(70, 1, 1), Err(FermiError::InvalidInput(_))));
    assert!(matches!(unrank(4, 2, &[6]), Err(FermiError::InvalidInput(_))));
}
