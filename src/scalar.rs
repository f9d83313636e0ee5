//! Numerically robust complex scalar arithmetic
//!
//! Division uses Smith's algorithm (scaling on the larger-magnitude
//! component of the denominator), and the magnitude helpers scale by the
//! largest absolute component before squaring. None of these routines
//! panic; division by zero and NaN inputs follow IEEE-754.

use num_complex::Complex64;

/// Complex division `a / b` via Smith's algorithm.
///
/// Purely real and purely imaginary denominators take exact component
/// divisions; otherwise the quotient is formed by scaling on whichever
/// denominator component is larger, so intermediate products cannot
/// overflow when the result is representable. A zero denominator yields
/// Inf/NaN components per IEEE semantics.
pub fn complex_div(a: Complex64, b: Complex64) -> Complex64 {
    if b.im == 0.0 {
        if a.im == 0.0 {
            Complex64::new(a.re / b.re, 0.0)
        } else if a.re == 0.0 {
            Complex64::new(0.0, a.im / b.re)
        } else {
            Complex64::new(a.re / b.re, a.im / b.re)
        }
    } else if b.re == 0.0 {
        if a.re == 0.0 {
            Complex64::new(a.im / b.im, 0.0)
        } else if a.im == 0.0 {
            Complex64::new(0.0, -(a.re / b.im))
        } else {
            Complex64::new(a.im / b.im, -(a.re / b.im))
        }
    } else {
        let brm = b.re.abs();
        let bim = b.im.abs();
        if brm > bim {
            let s = b.im / b.re;
            let d = b.re + s * b.im;
            Complex64::new((a.re + s * a.im) / d, (a.im - s * a.re) / d)
        } else if bim == brm {
            // |re(b)| == |im(b)|: divide by half-signs over the common
            // magnitude so neither component dominates.
            let sr = if b.re > 0.0 { 0.5 } else { -0.5 };
            let si = if b.im > 0.0 { 0.5 } else { -0.5 };
            Complex64::new(
                (a.re * sr + a.im * si) / brm,
                (a.im * sr - a.re * si) / brm,
            )
        } else {
            let s = b.re / b.im;
            let d = b.im + s * b.re;
            Complex64::new((s * a.re + a.im) / d, (s * a.im - a.re) / d)
        }
    }
}

/// Two-term magnitude `sqrt(x^2 + y^2)` without intermediate overflow.
///
/// NaN propagates; an infinite input with a finite partner returns Inf.
pub fn hypot(x: f64, y: f64) -> f64 {
    let mut a = x.abs();
    let mut b = y.abs();
    if a < b {
        a /= b;
        b * (a * a + 1.0).sqrt()
    } else if a > b {
        b /= a;
        a * (b * b + 1.0).sqrt()
    } else if b.is_nan() {
        b
    } else {
        a * std::f64::consts::SQRT_2
    }
}

/// Three-term magnitude `sqrt(x1^2 + x2^2 + x3^2)` without intermediate
/// overflow (generalized hypot, used in reflector generation).
///
/// The terms are divided by the largest absolute component before
/// squaring; a zero or infinite maximum falls back to `|x1|+|x2|+|x3|`.
pub fn norm3(x1: f64, x2: f64, x3: f64) -> f64 {
    let mut a = x1.abs();
    let mut b = x2.abs();
    let mut c = x3.abs();
    let mut y = if a >= b || b.is_nan() { a } else { b };
    if c > y {
        y = c;
    }
    if y > 0.0 && !y.is_infinite() {
        a /= y;
        b /= y;
        c /= y;
        y * ((a * a + c * c) + b * b).sqrt()
    } else {
        (a + b) + c
    }
}

/// One-norm magnitude `|re| + |im|`, the pivot and rank metric.
pub fn abs1(z: Complex64) -> f64 {
    z.re.abs() + z.im.abs()
}
