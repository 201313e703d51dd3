//! Cross-checks between Slater determinant construction, orbital rotations
//! and density matrices

mod common;

use approx::assert_relative_eq;
use common::{init_tracing, max_abs_diff, random_unitary};
use fermisim_state::validation::{norm, vdot};
use fermisim_state::{
    apply_orbital_rotation, dim, hartree_fock_state, rdm, slater_determinant,
    slater_determinant_rdm, Complex64, ComplexMatrix, FermiError, OrbitalRotation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_rotated_determinant_rdm_agrees_with_closed_form() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(1234);
    let cases: [(usize, (Vec<usize>, Vec<usize>)); 4] = [
        (3, (vec![0, 1], vec![0])),
        (4, (vec![1, 3], vec![0, 2])),
        (5, (vec![0, 2, 4], vec![1])),
        (5, (vec![], vec![0, 1, 2])),
    ];
    for (norb, (alpha, beta)) in cases {
        let nelec = (alpha.len(), beta.len());
        let rotation = OrbitalRotation::from((
            random_unitary(norb, &mut rng),
            random_unitary(norb, &mut rng),
        ));
        let occupation = (alpha, beta);
        let vec = slater_determinant(norb, occupation.clone(), Some(&rotation)).unwrap();
        assert_eq!(vec.len(), dim(norb, nelec));
        assert_relative_eq!(norm(&vec), 1.0, epsilon = 1e-10);

        for spin_summed in [true, false] {
            let expected =
                slater_determinant_rdm(norb, occupation.clone(), Some(&rotation), 1, spin_summed)
                    .unwrap();
            let actual = rdm(&vec, norb, nelec, 1, spin_summed).unwrap();
            assert!(actual.is_hermitian(1e-12));
            assert!(actual.max_abs_diff(&expected) < 1e-10);
            assert_relative_eq!(
                actual.trace().re,
                (nelec.0 + nelec.1) as f64,
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn test_rotating_hartree_fock_equals_rotated_determinant() {
    let mut rng = StdRng::seed_from_u64(99);
    let rotation = OrbitalRotation::from(random_unitary(4, &mut rng));
    let hf = hartree_fock_state(4, (2, 1)).unwrap();
    let rotated = apply_orbital_rotation(&hf, &rotation, 4, (2, 1)).unwrap();
    let direct = slater_determinant(4, ([0, 1], [0]), Some(&rotation)).unwrap();
    assert!(max_abs_diff(&rotated, &direct) < 1e-12);
}

#[test]
fn test_alpha_only_rotation_leaves_beta_untouched() {
    let mut rng = StdRng::seed_from_u64(7);
    let u = random_unitary(3, &mut rng);
    let rotation = OrbitalRotation::PerSpin(Some(u), None);
    let vec = slater_determinant(3, ([0], [2]), Some(&rotation)).unwrap();
    let one_rdm = rdm(&vec, 3, (1, 1), 1, false).unwrap();
    // beta block stays the occupation of orbital 2
    for p in 0..3 {
        for q in 0..3 {
            let expected = if p == 2 && q == 2 { 1.0 } else { 0.0 };
            assert_relative_eq!(one_rdm[(3 + p, 3 + q)].re, expected, epsilon = 1e-12);
            assert_relative_eq!(one_rdm[(3 + p, 3 + q)].im, 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_orthogonal_determinants_stay_orthogonal() {
    let mut rng = StdRng::seed_from_u64(8);
    let rotation = OrbitalRotation::from(random_unitary(4, &mut rng));
    let a = slater_determinant(4, [0, 1], Some(&rotation)).unwrap();
    let b = slater_determinant(4, [2, 3], Some(&rotation)).unwrap();
    assert_relative_eq!(vdot(&a, &b).norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_non_unitary_rotation_rejected() {
    let not_unitary = ComplexMatrix::from_real(2, 2, &[1.0, 1.0, 0.0, 1.0]).unwrap();
    let rotation = OrbitalRotation::from(not_unitary);
    assert!(matches!(
        slater_determinant(2, ([0], [1]), Some(&rotation)),
        Err(FermiError::InvalidInput(_))
    ));
    assert!(matches!(
        slater_determinant_rdm(2, ([0], [1]), Some(&rotation), 1, true),
        Err(FermiError::InvalidInput(_))
    ));
}

#[test]
fn test_vacuum_and_full_occupations() {
    assert_eq!(
        slater_determinant(0, (Vec::<usize>::new(), Vec::<usize>::new()), None).unwrap(),
        vec![Complex64::new(1.0, 0.0)]
    );
    let full = slater_determinant(3, ([0, 1, 2], [0, 1, 2]), None).unwrap();
    assert_eq!(full, vec![Complex64::new(1.0, 0.0)]);
    let empty = slater_determinant(3, (Vec::<usize>::new(), Vec::<usize>::new()), None).unwrap();
    assert_eq!(empty, vec![Complex64::new(1.0, 0.0)]);
}
