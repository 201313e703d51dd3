//! Spin, Wick and bitstring behavior on small systems

mod common;

use approx::assert_relative_eq;
use common::{init_tracing, random_hermitian, random_statevector, random_unitary};
use fermisim_state::validation::vdot;
use fermisim_state::{
    apply_one_body, apply_orbital_rotation, dim, expectation_one_body_power,
    expectation_one_body_product, indices_to_strings, slater_determinant, slater_determinant_rdm,
    spin_orbital_tensor, spin_square, strings_to_indices, FermiError, OrbitalRotation,
    StateVector,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_bitstring_fixture() {
    let indices: Vec<usize> = (0..9).collect();
    let strings = indices_to_strings(&indices, 3, (2, 1)).unwrap();
    assert_eq!(
        strings,
        vec![
            "001011", "010011", "100011", "001101", "010101", "100101", "001110", "010110",
            "100110"
        ]
    );
    assert_eq!(strings_to_indices(&strings, 3, (2, 1)).unwrap(), indices);
}

#[test]
fn test_bitstrings_of_every_index_roundtrip() {
    for norb in 1..=5 {
        for n_alpha in 0..=norb {
            for n_beta in 0..=norb {
                let indices: Vec<usize> = (0..dim(norb, (n_alpha, n_beta))).collect();
                let strings = indices_to_strings(&indices, norb, (n_alpha, n_beta)).unwrap();
                assert!(strings.iter().all(|s| s.len() == 2 * norb));
                assert_eq!(
                    strings_to_indices(&strings, norb, (n_alpha, n_beta)).unwrap(),
                    indices
                );
            }
        }
    }
}

#[test]
fn test_malformed_bitstrings() {
    assert!(matches!(
        strings_to_indices(&["00101"], 3, (2, 1)),
        Err(FermiError::InvalidFormat(_))
    ));
    assert!(matches!(
        strings_to_indices(&["0010x1"], 3, (2, 1)),
        Err(FermiError::InvalidFormat(_))
    ));
    assert!(matches!(
        strings_to_indices(&["000111"], 3, (2, 1)),
        Err(FermiError::InvalidInput(_))
    ));
}

#[test]
fn test_spin_square_of_triplet_component() {
    init_tracing();
    // (|α0 β1⟩ - |α1 β0⟩)/√2 and its partner with a plus sign span a
    // singlet and the Sz = 0 triplet
    let mut values = Vec::new();
    for sign in [1.0, -1.0] {
        let mut state = StateVector::slater(2, ([0], [1]), None).unwrap();
        let first = state.amplitudes()[1];
        state.amplitudes_mut()[2] = first * sign;
        state.normalize().unwrap();
        values.push(state.spin_square().unwrap());
    }
    values.sort_by(|a, b| a.total_cmp(b));
    assert_relative_eq!(values[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(values[1], 2.0, epsilon = 1e-12);
}

#[test]
fn test_spin_square_bounds_for_random_state() {
    let mut rng = StdRng::seed_from_u64(55);
    let vec = random_statevector(dim(4, (2, 2)), &mut rng);
    let s2 = spin_square(&vec, 4, (2, 2)).unwrap();
    // Sz = 0 sector holds S = 0, 1, 2
    assert!(s2 >= -1e-12 && s2 <= 6.0 + 1e-12, "S² = {}", s2);
}

#[test]
fn test_spin_square_invariant_under_rotation() {
    let mut rng = StdRng::seed_from_u64(56);
    let vec = random_statevector(dim(4, (2, 1)), &mut rng);
    let rotation = OrbitalRotation::from(random_unitary(4, &mut rng));
    let rotated = apply_orbital_rotation(&vec, &rotation, 4, (2, 1)).unwrap();
    assert_relative_eq!(
        spin_square(&vec, 4, (2, 1)).unwrap(),
        spin_square(&rotated, 4, (2, 1)).unwrap(),
        epsilon = 1e-10
    );
}

#[test]
fn test_wick_product_matches_statevector() {
    let mut rng = StdRng::seed_from_u64(77);
    let norb = 4;
    let occupation = ([0, 3], [1]);
    let rotation = OrbitalRotation::from(random_unitary(norb, &mut rng));
    let vec = slater_determinant(norb, occupation, Some(&rotation)).unwrap();
    let one_rdm = slater_determinant_rdm(norb, occupation, Some(&rotation), 1, false).unwrap();

    let m1 = random_hermitian(norb, &mut rng);
    let m2 = random_hermitian(norb, &mut rng);
    let applied = apply_one_body(&vec, &m2, norb, (2, 1)).unwrap();
    let applied = apply_one_body(&applied, &m1, norb, (2, 1)).unwrap();
    let expected = vdot(&vec, &applied);

    let value = expectation_one_body_product(
        &[spin_orbital_tensor(&m1), spin_orbital_tensor(&m2)],
        &one_rdm,
    )
    .unwrap();
    assert_relative_eq!(value.re, expected.re, epsilon = 1e-10);
    assert_relative_eq!(value.im, expected.im, epsilon = 1e-10);

    let squared = expectation_one_body_power(&spin_orbital_tensor(&m1), &one_rdm, 2).unwrap();
    let once = apply_one_body(&vec, &m1, norb, (2, 1)).unwrap();
    assert_relative_eq!(squared.re, vdot(&once, &once).re, epsilon = 1e-10);
}
