#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// barycentric coordinates of a point with respect to a triangle.
pub mod barycentric;

/// Delaunay triangulation and point location.
pub mod delaunay;

/// Error types for the geometry module.
pub mod error;

pub use crate::barycentric::{solve_barycentric, BarycentricSolver};
pub use crate::delaunay::{triangulate, Triangulation};
pub use crate::error::GeometryError;

/// A 2D point stored as `[x, y]`, with x along the image columns and y along the rows.
pub type Point2 = [f64; 2];

/// Linearly interpolate two point sets index by index.
///
/// Computes `(1 - t) * a[i] + t * b[i]` for every index.
///
/// # Arguments
///
/// * `a` - The point set reached at `t = 0`.
/// * `b` - The point set reached at `t = 1`.
/// * `t` - The interpolation parameter.
///
/// PRECONDITION: `a` and `b` have the same length.
///
/// # Example
///
/// ```
/// use trimorph_geometry::lerp_points;
///
/// let mid = lerp_points(&[[0.0, 0.0]], &[[2.0, 4.0]], 0.5);
/// assert_eq!(mid, vec![[1.0, 2.0]]);
/// ```
pub fn lerp_points(a: &[Point2], b: &[Point2], t: f64) -> Vec<Point2> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(pa, pb)| {
            [
                (1.0 - t) * pa[0] + t * pb[0],
                (1.0 - t) * pa[1] + t * pb[1],
            ]
        })
        .collect()
}
