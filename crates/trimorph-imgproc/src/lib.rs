#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// cross-dissolve of two warped images.
pub mod dissolve;

/// Error types for the morphing operations.
pub mod error;

/// utilities for interpolation.
pub mod interpolation;

/// morph sequence driver.
pub mod morph;

/// module containing parallelization utilities.
pub mod parallel;

/// piecewise-affine image warping module.
pub mod warp;

pub use crate::error::MorphError;
