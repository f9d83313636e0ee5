//! # zsolve: Dense Complex Left-Division Solver
//!
//! Solves `A * X = B` for dense complex matrices, mirroring the semantics
//! of a general matrix left-division operator:
//!
//! - square `A`: LU decomposition with partial pivoting followed by
//!   permuted forward/back substitution;
//! - rectangular `A`: column-pivoted Householder QR with rank estimation,
//!   producing a least-squares solution with zero-filled rows past the
//!   estimated rank;
//! - empty `A` or `B`: an all-zero result of the conforming shape.
//!
//! Singular systems are not errors: the LU path propagates Inf/NaN per
//! IEEE-754 and the QR path truncates at the estimated rank. Callers that
//! want to detect degeneracy use [`solve_with_diagnostics`].
//!
//! The core operates on [`ComplexMatrix`], an owned column-major buffer;
//! [`solve_tensor`] is the validated `mdarray` entry point.

pub mod lstsq;
pub mod lu;
pub mod matrix;
pub mod qr;
pub mod scalar;
pub mod solve;
pub mod utils;

pub use lstsq::lstsq_solve;
pub use lu::{lu_factor, lu_solve};
pub use matrix::ComplexMatrix;
pub use qr::{qr_factor, rank_estimate, PivotedQr};
pub use scalar::{abs1, complex_div, hypot, norm3};
pub use solve::{
    solve, solve_tensor, solve_with_diagnostics, DegeneracyReason, Solution, SolveError,
};
pub use utils::nrm2;

// Re-export the scalar type so callers do not need a direct num-complex
// dependency for simple use.
pub use num_complex::Complex64;

/// Convenience alias for the solver's working matrix type.
pub type Matrix = ComplexMatrix;
