use serde::{Deserialize, Serialize};
use trimorph_geometry::{lerp_points, triangulate, BarycentricSolver, Point2, Triangulation};
use trimorph_image::{Image, ImageSize};

use crate::error::MorphError;
use crate::interpolation::{sample_pixel, InterpolationMode};
use crate::parallel::{iter_rows_pair, ExecutionStrategy};

/// Minimum number of landmarks per image.
pub const MIN_LANDMARKS: usize = 4;

/// Landmarks closer than this to a canvas corner count as sitting on it.
const CORNER_EPS: f64 = 1e-9;

/// What to do with output pixels outside the convex hull of the intermediate landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullPolicy {
    /// Add the four canvas corners as landmarks that map onto themselves.
    #[default]
    ExtendToCorners,
    /// Extrapolate with the affine map of the closest triangle.
    NearestTriangle,
    /// Fill with a constant color.
    Background([u8; 3]),
}

/// Options of the frame warper.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WarpOptions {
    /// Resampling kernel for the source images.
    pub interpolation: InterpolationMode,
    /// Handling of pixels outside the landmark mesh.
    pub hull_policy: HullPolicy,
    /// Row parallelism of the pixel loop.
    pub strategy: ExecutionStrategy,
}

/// The two source images warped onto the intermediate geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpedPair {
    /// The source image resampled onto the intermediate mesh.
    pub from_source: Image<f32, 3>,
    /// The target image resampled onto the intermediate mesh.
    pub from_target: Image<f32, 3>,
}

/// Validate the inputs shared by every frame of a morph.
///
/// # Errors
///
/// * [`MorphError::EmptyImage`] if an image has no pixels.
/// * [`MorphError::ImageSizeMismatch`] if the images differ in size.
/// * Any error of [`validate_landmarks`].
pub fn validate_inputs(
    source: &Image<u8, 3>,
    target: &Image<u8, 3>,
    source_landmarks: &[Point2],
    target_landmarks: &[Point2],
) -> Result<(), MorphError> {
    if source.size().num_pixels() == 0 || target.size().num_pixels() == 0 {
        return Err(MorphError::EmptyImage);
    }
    if source.size() != target.size() {
        return Err(MorphError::ImageSizeMismatch(source.size(), target.size()));
    }
    validate_landmarks(source_landmarks, target_landmarks)
}

/// Validate a pair of corresponding landmark sets.
///
/// # Errors
///
/// * [`MorphError::LandmarkCountMismatch`] if the landmark sets differ in length.
/// * [`MorphError::NotEnoughLandmarks`] if there are fewer than [`MIN_LANDMARKS`] landmarks.
/// * [`MorphError::NonFiniteLandmark`] if a landmark coordinate is NaN or infinite.
pub fn validate_landmarks(
    source_landmarks: &[Point2],
    target_landmarks: &[Point2],
) -> Result<(), MorphError> {
    if source_landmarks.len() != target_landmarks.len() {
        return Err(MorphError::LandmarkCountMismatch(
            source_landmarks.len(),
            target_landmarks.len(),
        ));
    }
    if source_landmarks.len() < MIN_LANDMARKS {
        return Err(MorphError::NotEnoughLandmarks(source_landmarks.len()));
    }
    let non_finite = |pts: &[Point2]| pts.iter().position(|p| !p.iter().all(|c| c.is_finite()));
    if let Some(idx) = non_finite(source_landmarks).or_else(|| non_finite(target_landmarks)) {
        return Err(MorphError::NonFiniteLandmark(idx));
    }
    Ok(())
}

/// Validate a warp or dissolve fraction.
///
/// # Errors
///
/// Returns [`MorphError::InvalidFraction`] unless the value is finite and in [0, 1].
pub fn validate_fraction(fraction: f64) -> Result<(), MorphError> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(MorphError::InvalidFraction(fraction));
    }
    Ok(())
}

/// Warp both images onto the landmark geometry at `warp_frac`.
///
/// The intermediate landmarks `(1 - warp_frac) * a + warp_frac * b` are triangulated, and
/// every output pixel is mapped back into both images through the barycentric coordinates of
/// the intermediate triangle containing it.
///
/// # Arguments
///
/// * `source` - The image shown at `warp_frac = 0`.
/// * `target` - The image shown at `warp_frac = 1`.
/// * `source_landmarks` - Landmarks on the source image as `[x, y]`.
/// * `target_landmarks` - Corresponding landmarks on the target image.
/// * `warp_frac` - The geometry interpolation parameter in [0, 1].
/// * `options` - Interpolation, out-of-hull policy and parallelism.
///
/// # Returns
///
/// Both images resampled onto the intermediate geometry, without quantization.
///
/// # Errors
///
/// Any error of [`validate_inputs`] and [`validate_fraction`], or
/// [`MorphError::Geometry`] if the intermediate landmarks cannot be triangulated.
pub fn warp_frame(
    source: &Image<u8, 3>,
    target: &Image<u8, 3>,
    source_landmarks: &[Point2],
    target_landmarks: &[Point2],
    warp_frac: f64,
    options: &WarpOptions,
) -> Result<WarpedPair, MorphError> {
    validate_inputs(source, target, source_landmarks, target_landmarks)?;
    validate_fraction(warp_frac)?;

    let mut source_pts = source_landmarks.to_vec();
    let mut target_pts = target_landmarks.to_vec();
    let mut mid_pts = lerp_points(source_landmarks, target_landmarks, warp_frac);

    if options.hull_policy == HullPolicy::ExtendToCorners {
        for corner in canvas_corners(source.size()) {
            let on_corner = mid_pts.iter().any(|p| {
                (p[0] - corner[0]).abs() <= CORNER_EPS && (p[1] - corner[1]).abs() <= CORNER_EPS
            });
            if !on_corner {
                source_pts.push(corner);
                target_pts.push(corner);
                mid_pts.push(corner);
            }
        }
    }

    let mesh = triangulate(&mid_pts)?;
    if mesh.num_degenerate() > 0 {
        log::warn!(
            "{} degenerate triangles at warp fraction {warp_frac}, using the out-of-hull policy",
            mesh.num_degenerate()
        );
    }

    let triangle_pairs = mesh
        .triangles()
        .iter()
        .map(|t| {
            (
                [source_pts[t[0]], source_pts[t[1]], source_pts[t[2]]],
                [target_pts[t[0]], target_pts[t[1]], target_pts[t[2]]],
            )
        })
        .collect::<Vec<_>>();

    let mut from_source = Image::<f32, 3>::from_size_val(source.size(), 0.0)?;
    let mut from_target = Image::<f32, 3>::from_size_val(source.size(), 0.0)?;

    let fill = match options.hull_policy {
        HullPolicy::Background(color) => color.map(f32::from),
        _ => [0.0; 3],
    };

    iter_rows_pair(
        options.strategy,
        &mut from_source,
        &mut from_target,
        |row, row_source, row_target| {
            for (col, (px_source, px_target)) in row_source
                .chunks_exact_mut(3)
                .zip(row_target.chunks_exact_mut(3))
                .enumerate()
            {
                let point = [col as f64, row as f64];
                let Some((idx, solver)) = resolve_triangle(&mesh, point, options.hull_policy)
                else {
                    px_source.copy_from_slice(&fill);
                    px_target.copy_from_slice(&fill);
                    continue;
                };

                let weights = solver.solve(point);
                let (tri_source, tri_target) = &triangle_pairs[idx];
                let p_source = BarycentricSolver::interpolate(tri_source, weights);
                let p_target = BarycentricSolver::interpolate(tri_target, weights);

                px_source.copy_from_slice(&sample_pixel(source, p_source, options.interpolation));
                px_target.copy_from_slice(&sample_pixel(target, p_target, options.interpolation));
            }
        },
    )?;

    Ok(WarpedPair {
        from_source,
        from_target,
    })
}

fn canvas_corners(size: ImageSize) -> [Point2; 4] {
    let (w, h) = ((size.width - 1) as f64, (size.height - 1) as f64);
    [[0.0, 0.0], [w, 0.0], [0.0, h], [w, h]]
}

/// The triangle used for a pixel, `None` when it must be filled with a constant color.
fn resolve_triangle(
    mesh: &Triangulation,
    point: Point2,
    policy: HullPolicy,
) -> Option<(usize, &BarycentricSolver)> {
    let idx = match mesh.locate(point) {
        Some(idx) => idx,
        None => match policy {
            HullPolicy::Background(_) => return None,
            HullPolicy::ExtendToCorners | HullPolicy::NearestTriangle => {
                mesh.nearest_triangle(point)?
            }
        },
    };
    mesh.solver(idx).map(|solver| (idx, solver))
}
