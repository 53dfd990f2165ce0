#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use trimorph_geometry as geometry;

#[doc(inline)]
pub use trimorph_image as image;

#[doc(inline)]
pub use trimorph_imgproc as imgproc;

#[doc(inline)]
pub use trimorph_io as io;

/// Morph configuration loaded from JSON files.
pub mod config;

/// End-to-end morph: read images, render frames, write the animation.
pub mod pipeline;
