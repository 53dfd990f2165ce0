//! Piecewise-affine warping of an image pair onto an intermediate landmark mesh.
//!
//! The intermediate landmarks are triangulated and every output pixel is mapped back into
//! both images through the triangle that contains it.
//!
//! # Examples
//!
//! ```
//! use trimorph_image::{Image, ImageSize};
//! use trimorph_imgproc::warp::{warp_frame, WarpOptions};
//!
//! let size = ImageSize { width: 8, height: 8 };
//! let a = Image::<u8, 3>::from_size_pixel(size, [255, 0, 0]).unwrap();
//! let b = Image::<u8, 3>::from_size_pixel(size, [0, 0, 255]).unwrap();
//! let pts = [[2.0, 2.0], [5.0, 2.0], [2.0, 5.0], [5.0, 5.0]];
//!
//! let warped = warp_frame(&a, &b, &pts, &pts, 0.5, &WarpOptions::default()).unwrap();
//! assert_eq!(warped.from_source.size(), size);
//! ```

mod piecewise;

pub use piecewise::{
    validate_fraction, validate_inputs, validate_landmarks, warp_frame, HullPolicy, WarpOptions,
    WarpedPair, MIN_LANDMARKS,
};
