//! Column-pivoted Householder QR factorization

pub mod householder;
pub mod pivoted;

pub use householder::{apply_reflector, reflector, scale, BETA_ADJUST};
pub use pivoted::{qr_factor, rank_estimate, PivotedQr};
