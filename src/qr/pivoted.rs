//! Column-pivoted QR factorization with running-norm downdates
//!
//! The factored matrix packs R in the upper trapezoid and the Householder
//! reflector tails below the diagonal; tau coefficients and the 1-based
//! column permutation are returned alongside. Column selection tracks two
//! running norms per column (current and as-of-last-recompute) and falls
//! back to a fresh norm when the cheap downdate loses too much accuracy.

use crate::matrix::ComplexMatrix;
use crate::qr::householder;
use crate::scalar::{abs1, hypot};
use crate::utils::nrm2;
use num_complex::Complex64;

/// Downdate reliability threshold: when the squared downdate factor times
/// the (vn1/vn2)^2 drift falls at or below this, the trailing norm is
/// recomputed from scratch. Square root of machine epsilon.
const DOWNDATE_TOL: f64 = 1.490_116_119_384_765_6E-8;

/// Packed column-pivoted QR factorization.
#[derive(Debug, Clone)]
pub struct PivotedQr {
    /// R in the upper trapezoid, reflector tails below the diagonal.
    pub factors: ComplexMatrix,
    /// Householder coefficients, one per reflected column.
    pub tau: Vec<Complex64>,
    /// 1-based column permutation: output column `jpvt[i] - 1` of the
    /// original matrix was factored at position `i`.
    pub jpvt: Vec<usize>,
}

/// Factor `A * P = Q * R` with column pivoting by decreasing norm.
///
/// At each step the remaining column with the largest current norm is
/// swapped into the pivot position (strict comparison, ties to the first
/// occurrence), a reflector is generated on its subdiagonal part, and the
/// trailing block is updated through a shared work vector.
pub fn qr_factor(mut a: ComplexMatrix) -> PivotedQr {
    let m = a.nrows();
    let n = a.ncols();
    let mn = m.min(n);
    let mut jpvt: Vec<usize> = (1..=n).collect();
    let mut tau = vec![Complex64::new(0.0, 0.0); mn];
    if m == 0 || n == 0 {
        return PivotedQr {
            factors: a,
            tau,
            jpvt,
        };
    }

    let mut work = vec![Complex64::new(0.0, 0.0); n];
    let mut vn1: Vec<f64> = (0..n).map(|j| nrm2(a.col_slice(j, 0, m))).collect();
    let mut vn2 = vn1.clone();

    for i in 0..mn {
        // Select the remaining column with the largest current norm.
        let mut pvt = i;
        let mut smax = vn1[i];
        for j in i + 1..n {
            if vn1[j] > smax {
                smax = vn1[j];
                pvt = j;
            }
        }
        if pvt != i {
            a.swap_cols(pvt, i);
            jpvt.swap(pvt, i);
            // The vacated slot inherits the trackers of the column that
            // moved there; position i's trackers are consumed below.
            vn1[pvt] = vn1[i];
            vn2[pvt] = vn2[i];
        }

        tau[i] = householder::reflector(&mut a, i, i);
        if i + 1 < n {
            householder::apply_reflector(&mut a, i, i, tau[i], i + 1, n, &mut work);
        }

        // Downdate the trailing column norms, recomputing when the
        // running estimate drifts too far from the reference norm.
        for j in i + 1..n {
            if vn1[j] != 0.0 {
                let r_ij = a.get(i, j);
                let mut temp = hypot(r_ij.re, r_ij.im) / vn1[j];
                temp = 1.0 - temp * temp;
                if temp < 0.0 {
                    temp = 0.0;
                }
                let drift = vn1[j] / vn2[j];
                if temp * (drift * drift) <= DOWNDATE_TOL {
                    if i + 1 < m {
                        let fresh = nrm2(a.col_slice(j, i + 1, m - i - 1));
                        vn1[j] = fresh;
                        vn2[j] = fresh;
                    } else {
                        vn1[j] = 0.0;
                        vn2[j] = 0.0;
                    }
                } else {
                    vn1[j] *= temp.sqrt();
                }
            }
        }
    }

    PivotedQr {
        factors: a,
        tau,
        jpvt,
    }
}

/// Estimate the numerical rank from the factored diagonal.
///
/// Walks the diagonal of R while `|re| + |im|` stays at or above
/// `max(m, n) * (|re(R00)| + |im(R00)|) * eps`; computed once per
/// factorization.
pub fn rank_estimate(qr: &PivotedQr) -> usize {
    let m = qr.factors.nrows();
    let n = qr.factors.ncols();
    let mn = m.min(n);
    if mn == 0 {
        return 0;
    }
    let tol = m.max(n) as f64 * abs1(qr.factors.get(0, 0)) * f64::EPSILON;
    let mut rank = 0;
    while rank < mn && abs1(qr.factors.get(rank, rank)) >= tol {
        rank += 1;
    }
    rank
}
