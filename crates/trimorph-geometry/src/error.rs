/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// The homogeneous vertex matrix of a triangle is not invertible.
    #[error("Singular matrix: triangle vertices are collinear (det = {0})")]
    SingularMatrix(f64),

    /// The triangulation needs at least three points.
    #[error("Not enough points to triangulate: got {0}, need at least 3")]
    NotEnoughPoints(usize),

    /// A point has a NaN or infinite coordinate.
    #[error("Point {0} has a non finite coordinate")]
    NonFinitePoint(usize),

    /// No triangle could be built, all the points are collinear.
    #[error("Degenerate point set: {0} points produced no triangle")]
    DegeneratePointSet(usize),
}
