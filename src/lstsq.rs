//! Least-squares solve from a column-pivoted QR factorization
//!
//! Applies `Q^H` to the right-hand side reflector by reflector, then
//! back-substitutes the leading rank-by-rank block of R, scattering
//! results through the column permutation. Output rows past the
//! estimated rank stay zero, which yields the basic least-squares /
//! minimum-norm-style solution for rank-deficient and non-square
//! systems.

use crate::matrix::ComplexMatrix;
use crate::qr::PivotedQr;
use crate::scalar::complex_div;
use num_complex::Complex64;

fn is_nonzero(z: Complex64) -> bool {
    z.re != 0.0 || z.im != 0.0
}

/// Solve `A * X = B` in the least-squares sense from `qr = qr_factor(A)`
/// and a rank estimate.
///
/// `b` must have as many rows as the factored matrix; the result has
/// shape (columns of A) x (columns of B).
pub fn lstsq_solve(qr: &PivotedQr, rank: usize, b: &ComplexMatrix) -> ComplexMatrix {
    let m = qr.factors.nrows();
    let n = qr.factors.ncols();
    let mn = m.min(n);
    let nb = b.ncols();
    let mut qtb = b.clone();

    // Q^H * B: apply each reflector with conjugated tau, the same
    // work-then-update pattern used on A's trailing columns.
    for j in 0..mn {
        let ct = qr.tau[j].conj();
        if is_nonzero(ct) {
            for col in 0..nb {
                let mut w = qtb.get(j, col);
                for r in j + 1..m {
                    w += qr.factors.get(r, j).conj() * qtb.get(r, col);
                }
                w = ct * w;
                if is_nonzero(w) {
                    let cur = qtb.get(j, col);
                    qtb.set(j, col, cur - w);
                    for r in j + 1..m {
                        let delta = qr.factors.get(r, j) * w;
                        let cur = qtb.get(r, col);
                        qtb.set(r, col, cur - delta);
                    }
                }
            }
        }
    }

    // Back-substitute the leading rank x rank block of R, writing into
    // the permuted row positions; rows past the rank stay zero.
    let mut x = ComplexMatrix::zeros(n, nb);
    for col in 0..nb {
        for r in 0..rank {
            x.set(qr.jpvt[r] - 1, col, qtb.get(r, col));
        }
        for k in (0..rank).rev() {
            let row_k = qr.jpvt[k] - 1;
            let xk = complex_div(x.get(row_k, col), qr.factors.get(k, k));
            x.set(row_k, col, xk);
            for r in 0..k {
                let delta = xk * qr.factors.get(r, k);
                let row_r = qr.jpvt[r] - 1;
                let cur = x.get(row_r, col);
                x.set(row_r, col, cur - delta);
            }
        }
    }
    x
}
