//! Pixel interpolation kernels used to resample the source images.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: rounds the sampling position to the closest pixel.
//! - **Bilinear**: linear blend of the four pixels around the sampling position.
//!
//! Sampling positions outside the image are clamped onto its border.

mod bilinear;
pub(crate) mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, sample_pixel, InterpolationMode};
