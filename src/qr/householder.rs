//! Householder reflector generation and application
//!
//! A reflector is generated in place over a matrix column: the diagonal
//! entry becomes the (real) beta, the scaled reflector tail is stored
//! below it, and the complex tau coefficient is returned. Generation
//! guards against subnormal underflow for pathologically scaled columns
//! by rescaling the column upward, recomputing, and scaling beta back
//! down a bounded number of times.

use crate::matrix::ComplexMatrix;
use crate::scalar::{complex_div, norm3};
use crate::utils::nrm2;
use num_complex::Complex64;

/// Underflow threshold for the computed beta; below this the column is
/// rescaled before the reflector is formed.
pub const SAFE_MIN: f64 = 1.002_084_180_004_486_4E-292;

/// Upward rescale factor applied per retry, `1 / SAFE_MIN`.
pub const SAFE_MIN_RECIP: f64 = 9.979_201_547_673_6E+291;

/// Real-only increment folded into the beta magnitude for a reflector
/// with no tail. Always zero for the complex path; kept as a named
/// constant rather than a literal in the norm call.
pub const BETA_ADJUST: f64 = 0.0;

fn is_nonzero(z: Complex64) -> bool {
    z.re != 0.0 || z.im != 0.0
}

/// Division of `(re, im)` by a nonzero real, preserving exact zeros in
/// either component.
fn div_by_real(re: f64, im: f64, d: f64) -> Complex64 {
    if im == 0.0 {
        Complex64::new(re / d, 0.0)
    } else if re == 0.0 {
        Complex64::new(0.0, im / d)
    } else {
        Complex64::new(re / d, im / d)
    }
}

fn scale_components(z: Complex64, s: f64) -> Complex64 {
    Complex64::new(z.re * s, z.im * s)
}

/// Scale a column segment by a complex factor.
pub fn scale(a: &mut ComplexMatrix, col: usize, from_row: usize, len: usize, factor: Complex64) {
    for z in a.col_slice_mut(col, from_row, len) {
        *z = factor * *z;
    }
}

/// Generate a Householder reflector zeroing column `col` below `row`.
///
/// On return the diagonal entry holds beta (real), the reflector tail is
/// stored in rows `row+1..`, and the returned tau satisfies
/// `H = I - conj(tau) * v * v^H` with `v = [1, tail]`. A column that is
/// already zeroed (real diagonal, zero tail) returns `tau = 0` and
/// leaves the matrix untouched.
pub fn reflector(a: &mut ComplexMatrix, row: usize, col: usize) -> Complex64 {
    let tail = a.nrows() - row - 1;
    let mut alpha = a.get(row, col);
    let mut tau = Complex64::new(0.0, 0.0);

    if tail == 0 {
        // No tail: only a complex diagonal needs rotating onto the real
        // axis.
        if alpha.im != 0.0 {
            let mut beta = norm3(alpha.re, alpha.im, BETA_ADJUST);
            if alpha.re >= 0.0 {
                beta = -beta;
            }
            if beta.abs() < SAFE_MIN {
                let mut knt = 0;
                loop {
                    knt += 1;
                    beta *= SAFE_MIN_RECIP;
                    alpha = scale_components(alpha, SAFE_MIN_RECIP);
                    if beta.abs() >= SAFE_MIN {
                        break;
                    }
                }
                beta = norm3(alpha.re, alpha.im, BETA_ADJUST);
                if alpha.re >= 0.0 {
                    beta = -beta;
                }
                tau = div_by_real(beta - alpha.re, -alpha.im, beta);
                for _ in 0..knt {
                    beta *= SAFE_MIN;
                }
            } else {
                tau = div_by_real(beta - alpha.re, -alpha.im, beta);
            }
            alpha = Complex64::new(beta, 0.0);
            a.set(row, col, alpha);
        }
        return tau;
    }

    let mut xnorm = nrm2(a.col_slice(col, row + 1, tail));
    if xnorm == 0.0 && alpha.im == 0.0 {
        return tau;
    }

    let mut beta = norm3(alpha.re, alpha.im, xnorm);
    if alpha.re >= 0.0 {
        beta = -beta;
    }
    if beta.abs() < SAFE_MIN {
        let mut knt = 0;
        loop {
            knt += 1;
            scale(a, col, row + 1, tail, Complex64::new(SAFE_MIN_RECIP, 0.0));
            beta *= SAFE_MIN_RECIP;
            alpha = scale_components(alpha, SAFE_MIN_RECIP);
            if beta.abs() >= SAFE_MIN {
                break;
            }
        }
        xnorm = nrm2(a.col_slice(col, row + 1, tail));
        beta = norm3(alpha.re, alpha.im, xnorm);
        if alpha.re >= 0.0 {
            beta = -beta;
        }
        tau = div_by_real(beta - alpha.re, -alpha.im, beta);
        let factor = complex_div(
            Complex64::new(1.0, 0.0),
            Complex64::new(alpha.re - beta, alpha.im),
        );
        scale(a, col, row + 1, tail, factor);
        // Undo the upward rescale on the retained beta.
        for _ in 0..knt {
            beta *= SAFE_MIN;
        }
    } else {
        tau = div_by_real(beta - alpha.re, -alpha.im, beta);
        let factor = complex_div(
            Complex64::new(1.0, 0.0),
            Complex64::new(alpha.re - beta, alpha.im),
        );
        scale(a, col, row + 1, tail, factor);
    }
    a.set(row, col, Complex64::new(beta, 0.0));
    tau
}

/// Apply `H = I - conj(tau) * v * v^H` from the left to columns
/// `first..last`, where `v` is the reflector stored in column `col`
/// below `row` with an implicit leading 1.
///
/// The reflector's trailing zeros and any all-zero column suffix of the
/// target block are trimmed before the rank-1 update; `work` must hold
/// at least `last - first` entries.
pub fn apply_reflector(
    a: &mut ComplexMatrix,
    row: usize,
    col: usize,
    tau: Complex64,
    first: usize,
    last: usize,
    work: &mut [Complex64],
) {
    if !is_nonzero(tau) || first >= last {
        return;
    }
    // Effective reflector length: drop trailing zeros (the implicit
    // leading 1 keeps it at least 1).
    let mut lastv = a.nrows() - row;
    while lastv > 1 && !is_nonzero(a.get(row + lastv - 1, col)) {
        lastv -= 1;
    }
    // Effective column count: drop columns whose touched rows are all
    // zero, scanning from the right.
    let mut lastc = last - first;
    'trim: while lastc > 0 {
        let c = first + lastc - 1;
        for r in row..row + lastv {
            if is_nonzero(a.get(r, c)) {
                break 'trim;
            }
        }
        lastc -= 1;
    }
    if lastc == 0 {
        return;
    }

    // work = v^H * A_block
    for c in first..first + lastc {
        let mut acc = a.get(row, c);
        for k in 1..lastv {
            acc += a.get(row + k, col).conj() * a.get(row + k, c);
        }
        work[c - first] = acc;
    }
    // A_block -= conj(tau) * v * work
    let ct = tau.conj();
    for c in first..first + lastc {
        let w = work[c - first];
        if is_nonzero(w) {
            let coef = ct * w;
            let cur = a.get(row, c);
            a.set(row, c, cur - coef);
            for k in 1..lastv {
                let delta = a.get(row + k, col) * coef;
                let cur = a.get(row + k, c);
                a.set(row + k, c, cur - delta);
            }
        }
    }
}
