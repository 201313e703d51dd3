//! Assembles minimal-basis H2 data, saves it as JSON and evaluates
//! Hartree-Fock quantities from the reloaded copy
//!
//! Run with: cargo run -p fermisim-chem --example h2_molecular_data

use fermisim_chem::{Amplitudes, Atom, ComplexMatrix, MolecularData, Result, Tensor};

fn h2() -> Result<MolecularData> {
    let norb = 2;
    let idx = |p: usize, q: usize, r: usize, s: usize| ((p * norb + q) * norb + r) * norb + s;
    let mut eri = vec![0.0; 16];
    eri[idx(0, 0, 0, 0)] = 0.6745;
    eri[idx(1, 1, 1, 1)] = 0.6973;
    eri[idx(0, 0, 1, 1)] = 0.6636;
    eri[idx(1, 1, 0, 0)] = 0.6636;
    for (p, q, r, s) in [(0, 1, 0, 1), (0, 1, 1, 0), (1, 0, 0, 1), (1, 0, 1, 0)] {
        eri[idx(p, q, r, s)] = 0.1813;
    }
    let h = ComplexMatrix::from_real(2, 2, &[-1.2528, 0.0, 0.0, -0.4759])?;

    let mut data = MolecularData::new(norb, (1, 1), 0.7151, h, eri)?;
    data.atoms = vec![Atom::new("H", [0.0, 0.0, 0.0]), Atom::new("H", [0.0, 0.0, 0.74])];
    data.basis = "sto-6g".to_string();
    data.mo_coeff = Some(Tensor::new(vec![2, 2], vec![0.5489, 1.2113, 0.5489, -1.2113])?);
    data.mo_occ = Some(vec![2.0, 0.0]);
    data.ccsd_t2 = Some(Amplitudes::Restricted(Tensor::new(vec![1, 1, 1, 1], vec![-0.0998])?));
    data.validate()?;
    Ok(data)
}

fn main() -> Result<()> {
    println!("=== H2 Molecular Data ===\n");

    let data = h2()?;
    let path = std::env::temp_dir().join("fermisim_h2.json");
    data.to_json_file(&path)?;
    let restored = MolecularData::from_json_file(&path)?;
    println!("1. Saved and reloaded {}", path.display());
    println!("   identical: {}", restored == data);
    println!();

    let hamiltonian = restored.hamiltonian()?;
    println!("2. Hamiltonian over {} orbitals:", hamiltonian.norb());
    println!("   constant {:.4}", hamiltonian.constant);
    println!("   (00|11) = {:.4}", hamiltonian.two_body(0, 0, 1, 1));
    println!();

    let hf = restored.hartree_fock_state()?;
    let one_rdm = hf.one_rdm(true)?;
    println!("3. Hartree-Fock reference:");
    println!("   energy {:.6}", restored.hartree_fock_energy()?);
    println!("   one-body part {:.6}", restored.one_body_energy(&one_rdm)?);
    println!("   <S^2> = {:.6}", hf.spin_square()?);

    std::fs::remove_file(&path)?;
    Ok(())
}
