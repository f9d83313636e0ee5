//! Front-door linear solve with shape-driven dispatch
//!
//! `solve` picks LU with partial pivoting for square systems and
//! column-pivoted QR least-squares otherwise, with left-division
//! semantics throughout: an empty coefficient matrix yields a zero-filled result,
//! and exactly singular or rank-deficient systems return non-finite
//! entries rather than erroring. `solve_with_diagnostics` exposes the
//! degeneracy that the plain entry point deliberately swallows, and
//! `solve_tensor` adapts the mdarray tensor types at the boundary.

use crate::lstsq::lstsq_solve;
use crate::lu::{lu_factor, lu_solve};
use crate::matrix::ComplexMatrix;
use crate::qr::{qr_factor, rank_estimate};
use mdarray::DTensor;
use num_complex::Complex64;
use thiserror::Error;

/// Errors from the shape-checked tensor entry point.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("coefficient matrix has {lhs_rows} rows but right-hand side has {rhs_rows}")]
    ShapeMismatch { lhs_rows: usize, rhs_rows: usize },
}

/// Why a solve was flagged as degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneracyReason {
    /// LU factorization of a square matrix hit an exactly zero pivot.
    SingularPivot,
    /// QR rank estimate fell below min(rows, cols).
    RankDeficient,
}

/// Outcome of [`solve_with_diagnostics`]. The solution matrix is the
/// same one [`solve`] would return, even in the degenerate case.
#[derive(Debug, Clone)]
pub enum Solution {
    Solved(ComplexMatrix),
    Degenerate {
        x: ComplexMatrix,
        rank: usize,
        reason: DegeneracyReason,
    },
}

impl Solution {
    pub fn x(&self) -> &ComplexMatrix {
        match self {
            Solution::Solved(x) => x,
            Solution::Degenerate { x, .. } => x,
        }
    }

    pub fn into_x(self) -> ComplexMatrix {
        match self {
            Solution::Solved(x) => x,
            Solution::Degenerate { x, .. } => x,
        }
    }

    pub fn rank(&self) -> Option<usize> {
        match self {
            Solution::Solved(_) => None,
            Solution::Degenerate { rank, .. } => Some(*rank),
        }
    }
}

/// Solve `A * X = B`. `b` must have `a.nrows()` rows; the result has
/// shape `a.ncols()` by `b.ncols()`.
///
/// Square systems go through LU with partial pivoting, everything else
/// through column-pivoted QR. Singular and rank-deficient inputs are
/// not rejected; the degradation surfaces as Inf/NaN entries.
pub fn solve(a: &ComplexMatrix, b: &ComplexMatrix) -> ComplexMatrix {
    if a.is_empty() || b.is_empty() {
        return ComplexMatrix::zeros(a.ncols(), b.ncols());
    }
    if a.nrows() == a.ncols() {
        let mut factors = a.clone();
        let pivots = lu_factor(&mut factors);
        lu_solve(&factors, &pivots, b)
    } else {
        let qr = qr_factor(a.clone());
        let rank = rank_estimate(&qr);
        lstsq_solve(&qr, rank, b)
    }
}

/// Like [`solve`], but reports when the system was singular or rank
/// deficient. The returned solution is identical to [`solve`]'s.
pub fn solve_with_diagnostics(a: &ComplexMatrix, b: &ComplexMatrix) -> Solution {
    if a.is_empty() || b.is_empty() {
        return Solution::Solved(ComplexMatrix::zeros(a.ncols(), b.ncols()));
    }
    if a.nrows() == a.ncols() {
        let n = a.nrows();
        let mut factors = a.clone();
        let pivots = lu_factor(&mut factors);
        let x = lu_solve(&factors, &pivots, b);
        let rank = (0..n)
            .filter(|&k| {
                let d = factors.get(k, k);
                d.re != 0.0 || d.im != 0.0
            })
            .count();
        if rank < n {
            Solution::Degenerate {
                x,
                rank,
                reason: DegeneracyReason::SingularPivot,
            }
        } else {
            Solution::Solved(x)
        }
    } else {
        let qr = qr_factor(a.clone());
        let rank = rank_estimate(&qr);
        let x = lstsq_solve(&qr, rank, b);
        if rank < a.nrows().min(a.ncols()) {
            Solution::Degenerate {
                x,
                rank,
                reason: DegeneracyReason::RankDeficient,
            }
        } else {
            Solution::Solved(x)
        }
    }
}

/// Tensor-shaped entry point: checks row counts, then defers to
/// [`solve`].
pub fn solve_tensor(
    a: &DTensor<Complex64, 2>,
    b: &DTensor<Complex64, 2>,
) -> Result<DTensor<Complex64, 2>, SolveError> {
    let (am, _) = *a.shape();
    let (bm, _) = *b.shape();
    if am != bm {
        return Err(SolveError::ShapeMismatch {
            lhs_rows: am,
            rhs_rows: bm,
        });
    }
    let x = solve(
        &ComplexMatrix::from_tensor(a),
        &ComplexMatrix::from_tensor(b),
    );
    Ok(x.to_tensor())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lhs_gives_zero_fill() {
        let a = ComplexMatrix::zeros(0, 3);
        let b = ComplexMatrix::zeros(0, 2);
        let x = solve(&a, &b);
        assert_eq!(x.nrows(), 3);
        assert_eq!(x.ncols(), 2);
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(x.get(i, j), Complex64::new(0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_empty_rhs_rows_give_zero_fill() {
        // A zero-row right-hand side short-circuits before any
        // factorization, even against a nonempty square matrix.
        let a = ComplexMatrix::identity(2);
        let b = ComplexMatrix::zeros(0, 3);
        let x = solve(&a, &b);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x.ncols(), 3);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(x.get(i, j), Complex64::new(0.0, 0.0));
            }
        }
        match solve_with_diagnostics(&a, &b) {
            Solution::Solved(x) => {
                assert_eq!(x.nrows(), 2);
                assert_eq!(x.ncols(), 3);
            }
            Solution::Degenerate { .. } => panic!("empty rhs flagged degenerate"),
        }
    }

    #[test]
    fn test_square_dispatch_matches_inverse() {
        let a = ComplexMatrix::from_cols(
            2,
            2,
            &[
                Complex64::new(2.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(4.0, 0.0),
            ],
        );
        let b = ComplexMatrix::identity(2);
        let x = solve(&a, &b);
        assert!((x.get(0, 0).re - 0.5).abs() < 1e-15);
        assert!((x.get(1, 1).re - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_diagnostics_flags_singular_square() {
        let a = ComplexMatrix::from_cols(
            2,
            2,
            &[
                Complex64::new(1.0, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(4.0, 0.0),
            ],
        );
        let b = ComplexMatrix::from_cols(
            2,
            1,
            &[Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
        );
        match solve_with_diagnostics(&a, &b) {
            Solution::Degenerate { x, rank, reason } => {
                assert_eq!(reason, DegeneracyReason::SingularPivot);
                assert_eq!(rank, 1);
                // The plain entry point returns the same matrix.
                // Entries can hold NaN components, so compare bitwise.
                let plain = solve(&a, &b);
                for i in 0..2 {
                    let (lhs, rhs) = (x.get(i, 0), plain.get(i, 0));
                    assert_eq!(lhs.re.to_bits(), rhs.re.to_bits());
                    assert_eq!(lhs.im.to_bits(), rhs.im.to_bits());
                }
            }
            Solution::Solved(_) => panic!("expected degenerate"),
        }
    }

    #[test]
    fn test_diagnostics_clean_on_full_rank_tall() {
        let a = ComplexMatrix::from_cols(
            3,
            2,
            &[
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(1.0, 0.0),
            ],
        );
        let b = ComplexMatrix::from_cols(
            3,
            1,
            &[
                Complex64::new(1.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(1.0, 0.0),
            ],
        );
        match solve_with_diagnostics(&a, &b) {
            Solution::Solved(x) => assert_eq!(x.nrows(), 2),
            Solution::Degenerate { .. } => panic!("full-rank system flagged degenerate"),
        }
    }

    #[test]
    fn test_solve_tensor_rejects_row_mismatch() {
        let a = DTensor::<Complex64, 2>::from_fn([2, 2], |_| Complex64::new(1.0, 0.0));
        let b = DTensor::<Complex64, 2>::from_fn([3, 1], |_| Complex64::new(1.0, 0.0));
        match solve_tensor(&a, &b) {
            Err(SolveError::ShapeMismatch { lhs_rows, rhs_rows }) => {
                assert_eq!(lhs_rows, 2);
                assert_eq!(rhs_rows, 3);
            }
            Ok(_) => panic!("expected shape mismatch"),
        }
    }
}
