//! Shared fixtures for integration tests

#![allow(dead_code)]

use fermisim_state::Complex64;

/// Install a test-writer subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[path = "../../src/test_utils.rs"]
mod test_utils;

pub use test_utils::{random_hermitian, random_matrix, random_statevector, random_unitary};

pub fn max_abs_diff(a: &[Complex64], b: &[Complex64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}
