#![no_std]

// Enables the standard library for tests and for the std::error::Error
// impl, so you can run 'cargo test' on your PC normally.
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod common;
pub mod complex;
pub mod scalar;

pub use common::{FxpError, MAX_WIDTH};
pub use complex::ComplexFixedPoint;
pub use scalar::FixedPoint;
