#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for the morphing pipeline.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image level operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
