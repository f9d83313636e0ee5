//! Shared numerical utilities

pub mod norms;

pub use norms::nrm2;
