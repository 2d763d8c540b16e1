//! Concrete regression tests for regcheck.

pub mod declared;
pub mod factory;
pub mod julia;
pub mod saxpy;

pub use factory::{build_tests, builtin_tests};
