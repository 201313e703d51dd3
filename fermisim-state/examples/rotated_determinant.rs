//! Builds a rotated Slater determinant and reads off its density matrix,
//! spin and particle-number moments
//!
//! Run with: cargo run -p fermisim-state --example rotated_determinant

use fermisim_state::{
    expectation_one_body_power, slater_determinant_rdm, spin_orbital_tensor, Complex64,
    ComplexMatrix, OrbitalRotation, Result, StateVector,
};

/// Mixes orbitals `p` and `p + 1` in `norb` orbitals
fn mixing(norb: usize, p: usize, theta: f64) -> ComplexMatrix {
    let (s, c) = theta.sin_cos();
    let mut u = ComplexMatrix::identity(norb);
    u.set(p, p, Complex64::new(c, 0.0));
    u.set(p, p + 1, Complex64::new(-s, 0.0));
    u.set(p + 1, p, Complex64::new(s, 0.0));
    u.set(p + 1, p + 1, Complex64::new(c, 0.0));
    u
}

fn main() -> Result<()> {
    println!("=== Rotated Slater Determinant ===\n");

    let norb = 4;
    let occupation = ([0, 1], [0]);
    let u = mixing(norb, 1, 0.4).matmul(&mixing(norb, 0, 0.25))?;
    let rotation = OrbitalRotation::from(u);

    let state = StateVector::slater(norb, occupation, Some(&rotation))?;
    println!("1. State over {} orbitals, nelec {}:", norb, state.nelec());
    println!("   dimension {}, norm {:.12}", state.dimension(), state.norm());
    for (string, amplitude) in state.nonzero_strings(1e-3)? {
        println!("   |{}>  {:+.6}", string, amplitude.re);
    }
    println!();

    println!("2. Spin-summed 1-RDM:");
    let one_rdm = state.one_rdm(true)?;
    for p in 0..norb {
        let row: Vec<String> = (0..norb)
            .map(|q| format!("{:+.4}", one_rdm[(p, q)].re))
            .collect();
        println!("   [{}]", row.join(", "));
    }
    println!("   trace {:.6}", one_rdm.trace().re);
    let direct = slater_determinant_rdm(norb, occupation, Some(&rotation), 1, true)?;
    println!("   closed-form difference {:.2e}", direct.max_abs_diff(&one_rdm));
    println!();

    println!("3. Spin:");
    println!("   <S^2> = {:.6}", state.spin_square()?);
    println!();

    println!("4. Moments of the particle number:");
    let spin_resolved = state.one_rdm(false)?;
    let number = spin_orbital_tensor(&ComplexMatrix::identity(norb));
    for power in [1, 2, 8, 12] {
        let moment = expectation_one_body_power(&number, &spin_resolved, power)?;
        println!("   <N^{:<2}> = {:.6}", power, moment.re);
    }

    Ok(())
}
