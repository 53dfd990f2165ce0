use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};
use trimorph_geometry::Point2;
use trimorph_image::Image;

use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;

/// Sampling positions closer than this to an integer are moved onto the pixel grid.
const GRID_SNAP_EPS: f64 = 1e-6;

/// Interpolation mode for the resampling of the source images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel values. Coordinates outside the image are clamped onto its border.
///
/// PRECONDITION: the image is not empty.
pub fn interpolate_pixel<T, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> [f32; C]
where
    T: AsPrimitive<f32>,
{
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    }
}

/// Sample an image at a sub-pixel position given in double precision.
///
/// The position is clamped into the image extents and snapped onto the pixel grid when it is
/// within `1e-6` of integer coordinates, so a mapping that is the identity up to rounding
/// returns the source pixels exactly.
///
/// PRECONDITION: the image is not empty.
pub fn sample_pixel<T, const C: usize>(
    image: &Image<T, C>,
    point: Point2,
    interpolation: InterpolationMode,
) -> [f32; C]
where
    T: AsPrimitive<f32>,
{
    let u = snap_to_grid(point[0], (image.cols() - 1) as f64);
    let v = snap_to_grid(point[1], (image.rows() - 1) as f64);
    interpolate_pixel(image, u, v, interpolation)
}

fn snap_to_grid(value: f64, max: f64) -> f32 {
    // NaN clamps to NaN, send it to the origin instead
    if value.is_nan() {
        return 0.0;
    }
    let value = value.clamp(0.0, max);
    let rounded = value.round();
    if (value - rounded).abs() < GRID_SNAP_EPS {
        rounded as f32
    } else {
        value as f32
    }
}
