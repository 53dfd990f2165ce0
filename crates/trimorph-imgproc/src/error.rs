use trimorph_geometry::GeometryError;
use trimorph_image::{ImageError, ImageSize};

/// An error type for the morphing operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MorphError {
    /// The two landmark sets have different lengths.
    #[error("Landmark count mismatch: {0} source landmarks vs {1} target landmarks")]
    LandmarkCountMismatch(usize, usize),

    /// Fewer landmarks than needed to build a mesh.
    #[error("Not enough landmarks: got {0}, need at least 4")]
    NotEnoughLandmarks(usize),

    /// A landmark has a NaN or infinite coordinate.
    #[error("Landmark {0} has a non finite coordinate")]
    NonFiniteLandmark(usize),

    /// The source and target images have different sizes.
    #[error("Image size mismatch: source is {0}, target is {1}")]
    ImageSizeMismatch(ImageSize, ImageSize),

    /// The warp and dissolve fraction sequences have different lengths.
    #[error("Fraction count mismatch: {0} warp fractions vs {1} dissolve fractions")]
    FractionCountMismatch(usize, usize),

    /// A fraction is not a finite number in [0, 1].
    #[error("Invalid fraction {0}, expected a finite value in [0, 1]")]
    InvalidFraction(f64),

    /// An input image has no pixels.
    #[error("Image is empty")]
    EmptyImage,

    /// Error from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the geometry module.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
