//! Overflow-safe Euclidean norms over complex storage

use crate::scalar;
use num_complex::Complex64;

/// Euclidean norm of a complex slice without overflow or underflow.
///
/// Scaled sum-of-squares accumulation: the running scale starts at the
/// smallest normal double and is bumped whenever a larger component
/// appears, so squaring never leaves the representable range. Real and
/// imaginary parts contribute as separate terms. A single element
/// short-circuits to the two-term magnitude.
pub fn nrm2(x: &[Complex64]) -> f64 {
    match x.len() {
        0 => 0.0,
        1 => scalar::hypot(x[0].re, x[0].im),
        _ => {
            let mut scale = f64::MIN_POSITIVE;
            let mut ssq = 0.0;
            for z in x {
                for absxk in [z.re.abs(), z.im.abs()] {
                    if absxk > scale {
                        let t = scale / absxk;
                        ssq = 1.0 + ssq * t * t;
                        scale = absxk;
                    } else {
                        let t = absxk / scale;
                        ssq += t * t;
                    }
                }
            }
            scale * ssq.sqrt()
        }
    }
}
