//! Real tensors for orbital coefficients and cluster amplitudes
//!
//! Amplitudes from spin-restricted methods are a single tensor. Spin-
//! unrestricted methods store one tensor per spin block: `(t1a, t1b)` for
//! singles and `(t2aa, t2ab, t2bb)` for doubles.

use fermisim_core::{FermiError, Result};
use serde::{Deserialize, Serialize};

/// Dense real tensor, row-major
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl Tensor {
    /// # Errors
    /// `DimensionMismatch` if `data` does not fill `shape`
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let tensor = Self { shape, data };
        tensor.check_len()?;
        Ok(tensor)
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Element at a multi-index, `None` when out of range
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &extent) in index.iter().zip(&self.shape) {
            if i >= extent {
                return None;
            }
            flat = flat * extent + i;
        }
        self.data.get(flat).copied()
    }

    fn check_len(&self) -> Result<()> {
        let expected: usize = self.shape.iter().product();
        if self.data.len() != expected {
            return Err(FermiError::dimension_mismatch(expected, self.data.len()));
        }
        Ok(())
    }

    /// Check data length and that the shape is `expected`
    pub(crate) fn expect_shape(&self, expected: &[usize], label: &str) -> Result<()> {
        self.check_len()?;
        if self.shape != expected {
            return Err(FermiError::invalid_input(format!(
                "{} has shape {:?}, expected {:?}",
                label, self.shape, expected
            )));
        }
        Ok(())
    }
}

/// Cluster amplitudes, spin-restricted or per spin block
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Amplitudes {
    Restricted(Tensor),
    Unrestricted(Vec<Tensor>),
}

/// Occupied and virtual counts of each spin sector
#[derive(Clone, Copy, Debug)]
pub(crate) struct Partition {
    pub(crate) occ_a: usize,
    pub(crate) vir_a: usize,
    pub(crate) occ_b: usize,
    pub(crate) vir_b: usize,
}

impl Partition {
    pub(crate) fn new(norb: usize, nelec: (usize, usize)) -> Self {
        Self {
            occ_a: nelec.0,
            vir_a: norb - nelec.0,
            occ_b: nelec.1,
            vir_b: norb - nelec.1,
        }
    }

    fn closed_shell(&self, label: &str) -> Result<(usize, usize)> {
        if self.occ_a != self.occ_b {
            return Err(FermiError::invalid_input(format!(
                "restricted {} needs equal alpha and beta electrons",
                label
            )));
        }
        Ok((self.occ_a, self.vir_a))
    }
}

impl Amplitudes {
    /// Check singles amplitudes: `(nocc, nvir)` per spin
    pub(crate) fn validate_singles(&self, partition: Partition, label: &str) -> Result<()> {
        let p = partition;
        match self {
            Amplitudes::Restricted(t1) => {
                let (occ, vir) = p.closed_shell(label)?;
                t1.expect_shape(&[occ, vir], label)
            },
            Amplitudes::Unrestricted(blocks) => {
                let expected = [vec![p.occ_a, p.vir_a], vec![p.occ_b, p.vir_b]];
                check_blocks(blocks, &expected, label)
            },
        }
    }

    /// Check doubles amplitudes: `(nocc, nocc, nvir, nvir)` per spin pair
    pub(crate) fn validate_doubles(&self, partition: Partition, label: &str) -> Result<()> {
        let p = partition;
        match self {
            Amplitudes::Restricted(t2) => {
                let (occ, vir) = p.closed_shell(label)?;
                t2.expect_shape(&[occ, occ, vir, vir], label)
            },
            Amplitudes::Unrestricted(blocks) => {
                let expected = [
                    vec![p.occ_a, p.occ_a, p.vir_a, p.vir_a],
                    vec![p.occ_a, p.occ_b, p.vir_a, p.vir_b],
                    vec![p.occ_b, p.occ_b, p.vir_b, p.vir_b],
                ];
                check_blocks(blocks, &expected, label)
            },
        }
    }
}

fn check_blocks(blocks: &[Tensor], expected: &[Vec<usize>], label: &str) -> Result<()> {
    if blocks.len() != expected.len() {
        return Err(FermiError::invalid_input(format!(
            "{} has {} spin blocks, expected {}",
            label,
            blocks.len(),
            expected.len()
        )));
    }
    for (block, shape) in blocks.iter().zip(expected) {
        block.expect_shape(shape, label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_indexing() {
        let t = Tensor::new(vec![2, 3], (0..6).map(f64::from).collect()).unwrap();
        assert_eq!(t.rank(), 2);
        assert_eq!(t.get(&[1, 2]), Some(5.0));
        assert_eq!(t.get(&[2, 0]), None);
        assert_eq!(t.get(&[0]), None);
        assert!(matches!(
            Tensor::new(vec![2, 2], vec![0.0; 3]),
            Err(FermiError::DimensionMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_restricted_shapes() {
        let partition = Partition::new(4, (1, 1));
        let t1 = Amplitudes::Restricted(Tensor::zeros(vec![1, 3]));
        assert!(t1.validate_singles(partition, "t1").is_ok());
        let t2 = Amplitudes::Restricted(Tensor::zeros(vec![1, 1, 3, 3]));
        assert!(t2.validate_doubles(partition, "t2").is_ok());
        assert!(t1.validate_doubles(partition, "t2").is_err());
    }

    #[test]
    fn test_restricted_needs_closed_shell() {
        let partition = Partition::new(3, (2, 1));
        let t1 = Amplitudes::Restricted(Tensor::zeros(vec![2, 1]));
        assert!(matches!(
            t1.validate_singles(partition, "t1"),
            Err(FermiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unrestricted_blocks() {
        let partition = Partition::new(3, (2, 1));
        let t2 = Amplitudes::Unrestricted(vec![
            Tensor::zeros(vec![2, 2, 1, 1]),
            Tensor::zeros(vec![2, 1, 1, 2]),
            Tensor::zeros(vec![1, 1, 2, 2]),
        ]);
        assert!(t2.validate_doubles(partition, "t2").is_ok());

        let t1 = Amplitudes::Unrestricted(vec![Tensor::zeros(vec![2, 1])]);
        assert!(matches!(
            t1.validate_singles(partition, "t1"),
            Err(FermiError::InvalidInput(_))
        ));
    }
}
