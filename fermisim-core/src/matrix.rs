//! Dense complex matrices for one-particle quantities
//!
//! One-body tensors, orbital rotations and one-particle reduced density
//! matrices are all small `norb × norb` objects, stored row-major in a flat
//! vector.

use crate::error::{FermiError, Result};
use num_complex::Complex64;
use std::fmt;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Row-major dense complex matrix
///
/// # Example
/// ```
/// use fermisim_core::ComplexMatrix;
/// use num_complex::Complex64;
///
/// let id = ComplexMatrix::identity(3);
/// assert_eq!(id.trace(), Complex64::new(3.0, 0.0));
/// assert!(id.is_unitary(1e-5, 1e-8));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ComplexMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl ComplexMatrix {
    /// Create a matrix from row-major data
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `data.len() != rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<Complex64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(FermiError::dimension_mismatch(rows * cols, data.len()));
        }
        Ok(Self { rows, cols, data })
    }

    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![ZERO; rows * cols],
        }
    }

    /// Identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = ONE;
        }
        m
    }

    /// Square matrix with the given diagonal
    pub fn from_diagonal(diag: &[Complex64]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for (i, &d) in diag.iter().enumerate() {
            m.data[i * n + i] = d;
        }
        m
    }

    /// Matrix from real row-major data
    pub fn from_real(rows: usize, cols: usize, data: &[f64]) -> Result<Self> {
        Self::new(
            rows,
            cols,
            data.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
        )
    }

    /// Matrix from a list of equally long rows
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(FermiError::dimension_mismatch(ncols, row.len()));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: nrows,
            cols: ncols,
            data,
        })
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major element data
    #[inline]
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Consume the matrix, returning its row-major data
    pub fn into_data(self) -> Vec<Complex64> {
        self.data
    }

    /// Get element (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.cols + col]
    }

    /// Set element (row, col)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.cols + col] = value;
    }

    /// Check that the matrix is `n × n`
    pub fn expect_square(&self, n: usize) -> Result<()> {
        if self.rows != n {
            return Err(FermiError::dimension_mismatch(n, self.rows));
        }
        if self.cols != n {
            return Err(FermiError::dimension_mismatch(n, self.cols));
        }
        Ok(())
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &ComplexMatrix) -> Result<ComplexMatrix> {
        if self.cols != other.rows {
            return Err(FermiError::dimension_mismatch(self.cols, other.rows));
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == ZERO {
                    continue;
                }
                let row = &other.data[k * other.cols..(k + 1) * other.cols];
                let target = &mut out.data[i * other.cols..(i + 1) * other.cols];
                for (t, &b) in target.iter_mut().zip(row) {
                    *t += a * b;
                }
            }
        }
        Ok(out)
    }

    /// Element-wise sum
    pub fn add(&self, other: &ComplexMatrix) -> Result<ComplexMatrix> {
        if self.shape() != other.shape() {
            return Err(FermiError::dimension_mismatch(
                self.data.len(),
                other.data.len(),
            ));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Element-wise difference
    pub fn sub(&self, other: &ComplexMatrix) -> Result<ComplexMatrix> {
        if self.shape() != other.shape() {
            return Err(FermiError::dimension_mismatch(
                self.data.len(),
                other.data.len(),
            ));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Multiply every element by a scalar
    pub fn scale(&self, factor: Complex64) -> ComplexMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| x * factor).collect(),
        }
    }

    /// Element-wise complex conjugate
    pub fn conj(&self) -> ComplexMatrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| x.conj()).collect(),
        }
    }

    /// Transpose
    pub fn transpose(&self) -> ComplexMatrix {
        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> ComplexMatrix {
        let mut out = self.transpose();
        out.data.iter_mut().for_each(|x| *x = x.conj());
        out
    }

    /// Sum of the diagonal
    pub fn trace(&self) -> Complex64 {
        (0..self.rows.min(self.cols))
            .map(|i| self.data[i * self.cols + i])
            .sum()
    }

    /// Block-diagonal matrix `[[a, 0], [0, b]]`
    pub fn block_diag(a: &ComplexMatrix, b: &ComplexMatrix) -> ComplexMatrix {
        let rows = a.rows + b.rows;
        let cols = a.cols + b.cols;
        let mut out = Self::zeros(rows, cols);
        for i in 0..a.rows {
            for j in 0..a.cols {
                out.data[i * cols + j] = a.data[i * a.cols + j];
            }
        }
        for i in 0..b.rows {
            for j in 0..b.cols {
                out.data[(a.rows + i) * cols + a.cols + j] = b.data[i * b.cols + j];
            }
        }
        out
    }

    /// Matrix built from selected rows and columns
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> ComplexMatrix {
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &i in rows {
            for &j in cols {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Self {
            rows: rows.len(),
            cols: cols.len(),
            data,
        }
    }

    /// Determinant by LU decomposition with partial pivoting
    ///
    /// The determinant of a `0 × 0` matrix is 1.
    pub fn determinant(&self) -> Result<Complex64> {
        if !self.is_square() {
            return Err(FermiError::dimension_mismatch(self.rows, self.cols));
        }
        let n = self.rows;
        match n {
            0 => return Ok(ONE),
            1 => return Ok(self.data[0]),
            2 => return Ok(self.data[0] * self.data[3] - self.data[1] * self.data[2]),
            _ => {},
        }

        let mut lu = self.data.clone();
        let mut det = ONE;
        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&a, &b| {
                    lu[a * n + col]
                        .norm()
                        .total_cmp(&lu[b * n + col].norm())
                })
                .unwrap_or(col);
            if lu[pivot * n + col] == ZERO {
                return Ok(ZERO);
            }
            if pivot != col {
                for k in 0..n {
                    lu.swap(col * n + k, pivot * n + k);
                }
                det = -det;
            }
            let diag = lu[col * n + col];
            det *= diag;
            for row in col + 1..n {
                let factor = lu[row * n + col] / diag;
                if factor == ZERO {
                    continue;
                }
                for k in col + 1..n {
                    let v = lu[col * n + k];
                    lu[row * n + k] -= factor * v;
                }
            }
        }
        Ok(det)
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Largest element-wise absolute difference
    pub fn max_abs_diff(&self, other: &ComplexMatrix) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Whether the matrix equals its conjugate transpose within `atol`
    pub fn is_hermitian(&self, atol: f64) -> bool {
        self.is_square() && self.max_abs_diff(&self.adjoint()) <= atol
    }

    /// Whether `U† U = I` within `atol + rtol` on every element
    pub fn is_unitary(&self, rtol: f64, atol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let product = match self.adjoint().matmul(self) {
            Ok(p) => p,
            Err(_) => return false,
        };
        let n = self.rows;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { ONE } else { ZERO };
                if (product.data[i * n + j] - expected).norm() > atol + rtol * expected.norm() {
                    return false;
                }
            }
        }
        true
    }
}

impl Index<(usize, usize)> for ComplexMatrix {
    type Output = Complex64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Complex64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for ComplexMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Complex64 {
        &mut self.data[row * self.cols + col]
    }
}

impl fmt::Display for ComplexMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                let z = self.data[i * self.cols + j];
                write!(f, "{:>10.5}{:+.5}i ", z.re, z.im)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
