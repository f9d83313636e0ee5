//! Dense column-major complex matrix buffer
//!
//! [`ComplexMatrix`] is a thin owned-buffer abstraction, not a math type:
//! a contiguous column-major store of `Complex64` with row/column extents
//! and an amortized `resize`. The solver's factorizations mutate it in
//! place; `mdarray` tensors are converted at the boundary.

use mdarray::DTensor;
use num_complex::Complex64;
use num_traits::Zero;
use std::ops::{Index, IndexMut};

/// Resizable dense complex matrix with column-major storage.
///
/// Invariant: `data.len() >= nrows * ncols` at all times; element
/// `(r, c)` lives at linear index `r + c * nrows`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMatrix {
    nrows: usize,
    ncols: usize,
    data: Vec<Complex64>,
}

impl ComplexMatrix {
    /// All-zero matrix of the given extents.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![Complex64::zero(); nrows * ncols],
        }
    }

    /// Build element-wise from a closure over `(row, col)`.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Complex64,
    {
        let mut data = Vec::with_capacity(nrows * ncols);
        for c in 0..ncols {
            for r in 0..nrows {
                data.push(f(r, c));
            }
        }
        Self { nrows, ncols, data }
    }

    /// Build from a column-major slice of `nrows * ncols` entries.
    pub fn from_cols(nrows: usize, ncols: usize, entries: &[Complex64]) -> Self {
        assert_eq!(
            entries.len(),
            nrows * ncols,
            "entries.len()={} must equal nrows*ncols={}",
            entries.len(),
            nrows * ncols
        );
        Self {
            nrows,
            ncols,
            data: entries.to_vec(),
        }
    }

    /// Identity matrix of order `n`.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |r, c| {
            if r == c {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::zero()
            }
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// True when either extent is zero.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row + col * self.nrows]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row + col * self.nrows] = value;
    }

    /// Borrow a segment of column `col` starting at `from_row`.
    pub fn col_slice(&self, col: usize, from_row: usize, len: usize) -> &[Complex64] {
        let start = from_row + col * self.nrows;
        &self.data[start..start + len]
    }

    /// Mutable segment of column `col` starting at `from_row`.
    pub fn col_slice_mut(&mut self, col: usize, from_row: usize, len: usize) -> &mut [Complex64] {
        let start = from_row + col * self.nrows;
        &mut self.data[start..start + len]
    }

    /// Swap rows `r1` and `r2` across all columns.
    pub fn swap_rows(&mut self, r1: usize, r2: usize) {
        if r1 == r2 {
            return;
        }
        for c in 0..self.ncols {
            self.data.swap(r1 + c * self.nrows, r2 + c * self.nrows);
        }
    }

    /// Swap columns `c1` and `c2` across all rows.
    pub fn swap_cols(&mut self, c1: usize, c2: usize) {
        if c1 == c2 {
            return;
        }
        for r in 0..self.nrows {
            self.data.swap(r + c1 * self.nrows, r + c2 * self.nrows);
        }
    }

    /// Adjust the logical extents, growing the backing store by capacity
    /// doubling (floor 16) when `rows * cols` exceeds it.
    ///
    /// Prior contents are preserved by linear (column-major) index up to
    /// the overlap; newly exposed cells are zero. Callers that need
    /// reshape-with-preservation across different extents must copy
    /// explicitly first.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let needed = rows * cols;
        if needed > self.data.len() {
            let mut cap = self.data.len().max(16);
            while cap < needed {
                cap <<= 1;
            }
            self.data.resize(cap, Complex64::zero());
        }
        self.nrows = rows;
        self.ncols = cols;
    }

    /// Convert from an `mdarray` complex tensor, normalizing its
    /// row-major layout to the solver's column-major store.
    pub fn from_tensor(t: &DTensor<Complex64, 2>) -> Self {
        let (m, n) = *t.shape();
        Self::from_fn(m, n, |r, c| t[[r, c]])
    }

    /// Convert from an `mdarray` real tensor (zero imaginary parts).
    pub fn from_real_tensor(t: &DTensor<f64, 2>) -> Self {
        let (m, n) = *t.shape();
        Self::from_fn(m, n, |r, c| Complex64::new(t[[r, c]], 0.0))
    }

    /// Convert back to an `mdarray` complex tensor.
    pub fn to_tensor(&self) -> DTensor<Complex64, 2> {
        DTensor::<Complex64, 2>::from_fn([self.nrows, self.ncols], |idx| self.get(idx[0], idx[1]))
    }
}

impl Index<[usize; 2]> for ComplexMatrix {
    type Output = Complex64;

    fn index(&self, idx: [usize; 2]) -> &Complex64 {
        &self.data[idx[0] + idx[1] * self.nrows]
    }
}

impl IndexMut<[usize; 2]> for ComplexMatrix {
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Complex64 {
        &mut self.data[idx[0] + idx[1] * self.nrows]
    }
}
