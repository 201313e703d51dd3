//! Walks through CI string addressing and the Givens factorization of an
//! orbital rotation
//!
//! Run with: cargo run -p fermisim-core --example string_addressing

use fermisim_core::cistring::{self, binomial};
use fermisim_core::{givens_decomposition, try_dim, Complex64, ComplexMatrix, Result};

fn rotation(theta: f64, phi: f64) -> Result<ComplexMatrix> {
    let (s, c) = theta.sin_cos();
    let phase = Complex64::from_polar(1.0, phi);
    let zero = Complex64::new(0.0, 0.0);
    ComplexMatrix::from_rows(vec![
        vec![Complex64::new(c, 0.0), Complex64::new(-s, 0.0), zero],
        vec![phase * s, phase * c, zero],
        vec![zero, zero, Complex64::new(0.0, 1.0)],
    ])
}

fn main() -> Result<()> {
    println!("=== CI String Addressing ===\n");

    println!("1. Strings of 4 orbitals with 2 particles:");
    for bitstring in cistring::make_strings(4, 2)? {
        println!(
            "   {:04b}  address {}  occupied {:?}",
            bitstring,
            cistring::address(4, 2, bitstring)?,
            cistring::occupied_orbitals(bitstring)
        );
    }
    println!();

    println!("2. Sector dimensions:");
    for (norb, nelec) in [(4, (2, 1)), (8, (4, 4)), (16, (8, 8))] {
        println!(
            "   norb={:>2} nelec={:?}: dims {:?}, dim {}",
            norb,
            nelec,
            cistring::dims(norb, nelec),
            try_dim(norb, nelec)?
        );
    }
    println!("   C(64, 32) = {}", binomial(64, 32));
    match try_dim(64, (32, 32)) {
        Ok(dim) => println!("   norb=64 nelec=(32, 32): dim {}", dim),
        Err(e) => println!("   norb=64 nelec=(32, 32): {}", e),
    }
    println!();

    println!("3. Excitation signs on 0b1011:");
    for (p, q) in [(2, 0), (2, 1), (2, 3)] {
        match cistring::excite(0b1011, p, q) {
            Some((target, sign)) => println!("   a†_{} a_{}: {:04b} sign {:+}", p, q, target, sign),
            None => println!("   a†_{} a_{}: vanishes", p, q),
        }
    }
    println!();

    println!("4. Givens factorization of a 3-orbital rotation:");
    let u = rotation(0.3, 0.7)?;
    let decomposition = givens_decomposition(&u)?;
    for r in &decomposition.rotations {
        println!(
            "   orbitals ({}, {}): det {:.6}",
            r.p,
            r.q,
            r.determinant()
        );
    }
    println!("   phases: {:?}", decomposition.phases);
    println!(
        "   reconstruction error: {:.2e}",
        decomposition.reconstruct()?.max_abs_diff(&u)
    );

    Ok(())
}
