//! LU factorization with partial pivoting and the permuted triangular solve
//!
//! The factorization is in place: L (unit lower, diagonal implicit) and U
//! (upper, diagonal included) share the input buffer, and the returned
//! pivot vector records the row swap taken at each elimination column.
//! A zero pivot column skips its scaling step but not the trailing
//! update, so singular matrices factor without error and surface as
//! Inf/NaN in the subsequent solve.

use crate::matrix::ComplexMatrix;
use crate::scalar::{abs1, complex_div};
use num_complex::Complex64;

fn is_nonzero(z: Complex64) -> bool {
    z.re != 0.0 || z.im != 0.0
}

/// Factor a square matrix in place into `P * A = L * U`.
///
/// The pivot for column `j` is the row in `j..n` with the largest
/// `|re| + |im|` magnitude, ties to the first occurrence. Returns the
/// 1-based pivot vector: `pivots[j] = r` means rows `j` and `r-1` were
/// swapped at step `j` (identity entries mean no swap).
pub fn lu_factor(a: &mut ComplexMatrix) -> Vec<usize> {
    let n = a.ncols();
    let mut pivots: Vec<usize> = (1..=n).collect();
    if n < 1 {
        return pivots;
    }
    for j in 0..n - 1 {
        // Pivot scan over column j, rows j..n.
        let mut pivot = j;
        let mut smax = abs1(a.get(j, j));
        for r in j + 1..n {
            let s = abs1(a.get(r, j));
            if s > smax {
                smax = s;
                pivot = r;
            }
        }
        if is_nonzero(a.get(pivot, j)) {
            if pivot != j {
                pivots[j] = pivot + 1;
                a.swap_rows(j, pivot);
            }
            let pv = a.get(j, j);
            for r in j + 1..n {
                let mult = complex_div(a.get(r, j), pv);
                a.set(r, j, mult);
            }
        }
        // Trailing rank-1 update. Runs even for a zero pivot, matching
        // the unscaled-column behavior of pivoted Gaussian elimination.
        for c in j + 1..n {
            let u = a.get(j, c);
            if is_nonzero(u) {
                let nu = -u;
                for r in j + 1..n {
                    let delta = a.get(r, j) * nu;
                    let cur = a.get(r, c);
                    a.set(r, c, cur + delta);
                }
            }
        }
    }
    pivots
}

/// Solve `A * X = B` from an LU factorization of `A`.
///
/// Applies the recorded row swaps to a copy of `B`, forward-substitutes
/// against unit-lower L (no division), then back-substitutes against U,
/// dividing by the diagonal pivots. Each column of `B` is an independent
/// solve; exactly-zero coefficients skip their update loops.
pub fn lu_solve(factors: &ComplexMatrix, pivots: &[usize], b: &ComplexMatrix) -> ComplexMatrix {
    let n = factors.ncols();
    let nb = b.ncols();
    let mut x = b.clone();
    for j in 0..n.saturating_sub(1) {
        let p = pivots[j] - 1;
        if p != j {
            x.swap_rows(j, p);
        }
    }
    if x.is_empty() {
        return x;
    }
    // Forward substitution: L has an implicit unit diagonal.
    for col in 0..nb {
        for k in 0..n {
            let xk = x.get(k, col);
            if is_nonzero(xk) {
                for r in k + 1..n {
                    let delta = xk * factors.get(r, k);
                    let cur = x.get(r, col);
                    x.set(r, col, cur - delta);
                }
            }
        }
    }
    // Back substitution against U, dividing by the pivots.
    for col in 0..nb {
        for k in (0..n).rev() {
            let xk = x.get(k, col);
            if is_nonzero(xk) {
                let q = complex_div(xk, factors.get(k, k));
                x.set(k, col, q);
                for r in 0..k {
                    let delta = q * factors.get(r, k);
                    let cur = x.get(r, col);
                    x.set(r, col, cur - delta);
                }
            }
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matmul(a: &ComplexMatrix, b: &ComplexMatrix) -> ComplexMatrix {
        assert_eq!(a.ncols(), b.nrows());
        ComplexMatrix::from_fn(a.nrows(), b.ncols(), |i, j| {
            let mut sum = Complex64::new(0.0, 0.0);
            for k in 0..a.ncols() {
                sum += a.get(i, k) * b.get(k, j);
            }
            sum
        })
    }

    fn assert_close(a: &ComplexMatrix, b: &ComplexMatrix, tol: f64) {
        assert_eq!(a.nrows(), b.nrows());
        assert_eq!(a.ncols(), b.ncols());
        for r in 0..a.nrows() {
            for c in 0..a.ncols() {
                let diff = (a.get(r, c) - b.get(r, c)).norm();
                assert!(
                    diff <= tol,
                    "mismatch at ({r}, {c}): lhs={:?}, rhs={:?}, diff={diff}",
                    a.get(r, c),
                    b.get(r, c)
                );
            }
        }
    }

    /// Rebuild P*A from the packed factors and pivot vector.
    fn reconstruct(factors: &ComplexMatrix, pivots: &[usize], original: &ComplexMatrix) {
        let n = factors.ncols();
        let lower = ComplexMatrix::from_fn(n, n, |r, c| {
            if r == c {
                Complex64::new(1.0, 0.0)
            } else if r > c {
                factors.get(r, c)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let upper = ComplexMatrix::from_fn(n, n, |r, c| {
            if r <= c {
                factors.get(r, c)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let mut pa = original.clone();
        for j in 0..n.saturating_sub(1) {
            let p = pivots[j] - 1;
            if p != j {
                pa.swap_rows(j, p);
            }
        }
        assert_close(&matmul(&lower, &upper), &pa, 1e-12);
    }

    #[test]
    fn test_factor_real_matrix() {
        let entries = [
            Complex64::new(2.0, 0.0),
            Complex64::new(4.0, 0.0),
            Complex64::new(-2.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(-6.0, 0.0),
            Complex64::new(7.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(2.0, 0.0),
        ];
        let a = ComplexMatrix::from_cols(3, 3, &entries);
        let mut factors = a.clone();
        let pivots = lu_factor(&mut factors);
        reconstruct(&factors, &pivots, &a);
    }

    #[test]
    fn test_factor_complex_matrix() {
        let entries = [
            Complex64::new(1.0, 2.0),
            Complex64::new(3.0, -1.0),
            Complex64::new(2.0, -1.0),
            Complex64::new(4.0, 2.0),
        ];
        let a = ComplexMatrix::from_cols(2, 2, &entries);
        let mut factors = a.clone();
        let pivots = lu_factor(&mut factors);
        reconstruct(&factors, &pivots, &a);
    }

    #[test]
    fn test_pivot_selects_largest_magnitude() {
        // Column 0 has |4| at row 1 > |1| at row 0, so rows swap.
        let entries = [
            Complex64::new(1.0, 0.0),
            Complex64::new(4.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(3.0, 0.0),
        ];
        let a = ComplexMatrix::from_cols(2, 2, &entries);
        let mut factors = a.clone();
        let pivots = lu_factor(&mut factors);
        assert_eq!(pivots, vec![2, 2]);
    }

    #[test]
    fn test_zero_matrix_factors_without_panic() {
        let mut factors = ComplexMatrix::zeros(3, 3);
        let pivots = lu_factor(&mut factors);
        assert_eq!(pivots, vec![1, 2, 3]);
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(factors.get(r, c), Complex64::new(0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_solve_diagonal_system() {
        let mut factors = ComplexMatrix::from_fn(2, 2, |r, c| {
            if r == c {
                Complex64::new((r + 1) as f64 * 2.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let b = ComplexMatrix::from_fn(2, 1, |r, _| Complex64::new((r + 1) as f64 * 2.0, 0.0));
        let pivots = lu_factor(&mut factors);
        let x = lu_solve(&factors, &pivots, &b);
        assert!((x.get(0, 0).re - 1.0).abs() < 1e-15);
        assert!((x.get(1, 0).re - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_solve_multiple_right_hand_sides() {
        let entries = [
            Complex64::new(4.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(-2.0, 0.0),
            Complex64::new(3.0, 0.0),
        ];
        let a = ComplexMatrix::from_cols(2, 2, &entries);
        let b = ComplexMatrix::from_cols(
            2,
            2,
            &[
                Complex64::new(6.0, 0.0),
                Complex64::new(7.0, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(4.0, 0.0),
            ],
        );
        let mut factors = a.clone();
        let pivots = lu_factor(&mut factors);
        let x = lu_solve(&factors, &pivots, &b);
        assert_close(&matmul(&a, &x), &b, 1e-12);
    }

    #[test]
    fn test_singular_system_propagates_non_finite() {
        let mut factors = ComplexMatrix::zeros(2, 2);
        let pivots = lu_factor(&mut factors);
        let b = ComplexMatrix::from_fn(2, 1, |_, _| Complex64::new(1.0, 0.0));
        let x = lu_solve(&factors, &pivots, &b);
        assert!(!x.get(0, 0).re.is_finite() || !x.get(1, 0).re.is_finite());
    }
}
