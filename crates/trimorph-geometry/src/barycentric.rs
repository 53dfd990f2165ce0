use crate::{error::GeometryError, Point2};

/// Determinants smaller than this fraction of the squared longest edge are treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Compute the barycentric coordinates of a point with respect to a triangle.
///
/// Solves the homogeneous system
///
/// ```text
/// | x0 x1 x2 |   | a |   | x |
/// | y0 y1 y2 | * | b | = | y |
/// | 1  1  1  |   | c |   | 1 |
/// ```
///
/// # Arguments
///
/// * `vertices` - The triangle vertices as `[x, y]`.
/// * `point` - The query point.
///
/// # Returns
///
/// The weights `[a, b, c]`. They sum to one and are all non-negative iff the point lies
/// inside the triangle or on its border.
///
/// # Errors
///
/// Returns [`GeometryError::SingularMatrix`] if the vertices are collinear.
///
/// # Example
///
/// ```
/// use trimorph_geometry::solve_barycentric;
///
/// let w = solve_barycentric(&[[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]], [1.0, 1.0]).unwrap();
/// assert!((w[0] - 0.5).abs() < 1e-12);
/// assert!((w[1] - 0.25).abs() < 1e-12);
/// assert!((w[2] - 0.25).abs() < 1e-12);
/// ```
pub fn solve_barycentric(vertices: &[Point2; 3], point: Point2) -> Result<[f64; 3], GeometryError> {
    Ok(BarycentricSolver::new(vertices)?.solve(point))
}

/// The inverse of the homogeneous vertex matrix of one triangle.
///
/// Building the solver once per triangle lets the warper reuse the factorization for every
/// pixel that falls inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarycentricSolver {
    inv: [[f64; 3]; 3],
}

impl BarycentricSolver {
    /// Invert the homogeneous vertex matrix of a triangle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SingularMatrix`] if the triangle has (numerically) zero area.
    pub fn new(vertices: &[Point2; 3]) -> Result<Self, GeometryError> {
        let [[a, d], [b, e], [c, f]] = *vertices;
        // the last row of the matrix is [1, 1, 1]
        let (g, h, i) = (1.0, 1.0, 1.0);

        let c00 = e * i - f * h;
        let c01 = f * g - d * i;
        let c02 = d * h - e * g;
        let det = a * c00 + b * c01 + c * c02;

        let scale = longest_edge_sq(vertices);
        if !det.is_finite() || det.abs() <= SINGULAR_EPS * scale {
            return Err(GeometryError::SingularMatrix(det));
        }

        let inv_det = 1.0 / det;
        let inv = [
            [c00 * inv_det, (c * h - b * i) * inv_det, (b * f - c * e) * inv_det],
            [c01 * inv_det, (a * i - c * g) * inv_det, (c * d - a * f) * inv_det],
            [c02 * inv_det, (b * g - a * h) * inv_det, (a * e - b * d) * inv_det],
        ];

        Ok(Self { inv })
    }

    /// Barycentric weights of `point` with respect to the factored triangle.
    pub fn solve(&self, point: Point2) -> [f64; 3] {
        let [x, y] = point;
        let m = &self.inv;
        [
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
            m[2][0] * x + m[2][1] * y + m[2][2],
        ]
    }

    /// Map barycentric weights onto another triangle.
    ///
    /// # Arguments
    ///
    /// * `vertices` - The vertices of the target triangle.
    /// * `weights` - Weights as returned by [`BarycentricSolver::solve`].
    pub fn interpolate(vertices: &[Point2; 3], weights: [f64; 3]) -> Point2 {
        let [w0, w1, w2] = weights;
        [
            w0 * vertices[0][0] + w1 * vertices[1][0] + w2 * vertices[2][0],
            w0 * vertices[0][1] + w1 * vertices[1][1] + w2 * vertices[2][1],
        ]
    }
}

fn longest_edge_sq(vertices: &[Point2; 3]) -> f64 {
    let mut longest = 0.0f64;
    for k in 0..3 {
        let p = vertices[k];
        let q = vertices[(k + 1) % 3];
        let (dx, dy) = (q[0] - p[0], q[1] - p[1]);
        longest = longest.max(dx * dx + dy * dy);
    }
    longest
}
