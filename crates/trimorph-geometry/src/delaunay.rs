use std::collections::{HashMap, HashSet, VecDeque};

use crate::{barycentric::BarycentricSolver, error::GeometryError, Point2};

/// Vertex at infinity closing every hull edge into a ghost triangle.
const GHOST: usize = usize::MAX;

/// Points closer than this to an already inserted point are skipped.
const DUPLICATE_EPS: f64 = 1e-9;

/// Relative area below which the seed triangle counts as collinear.
const COLLINEAR_EPS: f64 = 1e-12;

/// Barycentric tolerance used when deciding whether a point lies in a triangle.
const LOCATE_EPS: f64 = 1e-9;

/// A Delaunay triangulation of a 2D point set.
///
/// Triangles are stored as counter-clockwise index triples into the input points, so the
/// same triples can be applied to any other point set with the same indexing.
#[derive(Clone, Debug)]
pub struct Triangulation {
    points: Vec<Point2>,
    triangles: Vec<[usize; 3]>,
    // per triangle: None when the triangle is numerically degenerate
    solvers: Vec<Option<BarycentricSolver>>,
    // per triangle: [min_x, min_y, max_x, max_y]
    bounds: Vec<[f64; 4]>,
}

/// Compute the Delaunay triangulation of a point set with the Bowyer-Watson algorithm.
///
/// The mesh starts from a triangle of three input points whose edges are closed by ghost
/// triangles sharing a vertex at infinity. A ghost triangle stands for the open half-plane
/// beyond its hull edge, so a point outside the current hull removes the ghosts it can see
/// together with the solid triangles whose circumcircle contains it. Each cavity is
/// re-triangulated by connecting its border to the new point. The ghosts are dropped at the
/// end and the remaining triangles tile the convex hull of the points.
///
/// # Arguments
///
/// * `points` - The input points. Exact (or near exact) duplicates are ignored.
///
/// # Errors
///
/// * [`GeometryError::NotEnoughPoints`] if fewer than three points are given.
/// * [`GeometryError::NonFinitePoint`] if a coordinate is NaN or infinite.
/// * [`GeometryError::DegeneratePointSet`] if all the points are collinear.
///
/// # Example
///
/// ```
/// use trimorph_geometry::triangulate;
///
/// let tri = triangulate(&[[0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [4.0, 4.0]]).unwrap();
/// assert_eq!(tri.len(), 2);
/// assert!(tri.locate([1.0, 1.0]).is_some());
/// assert!(tri.locate([5.0, 1.0]).is_none());
/// ```
pub fn triangulate(points: &[Point2]) -> Result<Triangulation, GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::NotEnoughPoints(points.len()));
    }
    if let Some(idx) = points
        .iter()
        .position(|p| !p[0].is_finite() || !p[1].is_finite())
    {
        return Err(GeometryError::NonFinitePoint(idx));
    }

    let n = points.len();
    let [a, b, c] = seed_triangle(points).ok_or(GeometryError::DegeneratePointSet(n))?;
    let mut triangles: Vec<[usize; 3]> =
        vec![[a, b, c], [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]];
    let mut inserted: Vec<usize> = vec![a, b, c];

    for idx in (0..n).filter(|idx| ![a, b, c].contains(idx)) {
        let p = points[idx];
        if let Some(&dup) = inserted.iter().find(|&&j| is_duplicate(p, points[j])) {
            log::warn!("skipping point {idx} {p:?}: duplicate of point {dup}");
            continue;
        }
        insert_point(points, &mut triangles, idx);
        inserted.push(idx);
    }

    triangles.retain(|t| !t.contains(&GHOST));

    let mut solvers = Vec::with_capacity(triangles.len());
    let mut bounds = Vec::with_capacity(triangles.len());
    for t in &triangles {
        let tri = [points[t[0]], points[t[1]], points[t[2]]];
        let solver = BarycentricSolver::new(&tri).ok();
        if solver.is_none() {
            log::debug!("triangle {t:?} is degenerate and will not be used for location");
        }
        solvers.push(solver);
        bounds.push(bounding_box(&tri));
    }

    log::debug!(
        "triangulated {} points into {} triangles",
        inserted.len(),
        triangles.len()
    );

    Ok(Triangulation {
        points: points.to_vec(),
        triangles,
        solvers,
        bounds,
    })
}

fn is_duplicate(p: Point2, q: Point2) -> bool {
    (p[0] - q[0]).abs() <= DUPLICATE_EPS && (p[1] - q[1]).abs() <= DUPLICATE_EPS
}

/// The first counter-clockwise triangle of input points, `None` if all points are collinear.
fn seed_triangle(points: &[Point2]) -> Option<[usize; 3]> {
    let [min_x, min_y, max_x, max_y] = bounding_box(points);
    let extent = (max_x - min_x).max(max_y - min_y);
    let min_area = COLLINEAR_EPS * extent * extent;

    let a = 0;
    let b = (1..points.len()).find(|&j| !is_duplicate(points[a], points[j]))?;
    let (c, area) = (b + 1..points.len())
        .map(|k| (k, orient2d(points[a], points[b], points[k])))
        .find(|(_, area)| area.abs() > min_area)?;

    Some(if area > 0.0 { [a, b, c] } else { [a, c, b] })
}

/// Whether the circumcircle of a triangle contains `p`.
///
/// For a ghost triangle `[x, y, GHOST]` the circumcircle degenerates to the open half-plane
/// left of `x -> y` plus the open segment between `x` and `y`.
fn in_triangle_circle(points: &[Point2], t: [usize; 3], p: Point2) -> bool {
    if t[2] != GHOST {
        return in_circumcircle(points[t[0]], points[t[1]], points[t[2]], p);
    }
    let (x, y) = (points[t[0]], points[t[1]]);
    let side = orient2d(x, y, p);
    if side != 0.0 {
        return side > 0.0;
    }
    let dot = (p[0] - x[0]) * (y[0] - x[0]) + (p[1] - x[1]) * (y[1] - x[1]);
    let len_sq = (y[0] - x[0]).powi(2) + (y[1] - x[1]).powi(2);
    dot > 0.0 && dot < len_sq
}

/// How well a triangle contains `p`: the smallest edge orientation for a solid triangle, the
/// distance-like orientation beyond the hull edge for a ghost triangle.
fn containment_score(points: &[Point2], t: [usize; 3], p: Point2) -> f64 {
    if t[2] == GHOST {
        return orient2d(points[t[0]], points[t[1]], p);
    }
    (0..3)
        .map(|k| orient2d(points[t[k]], points[t[(k + 1) % 3]], p))
        .fold(f64::INFINITY, f64::min)
}

/// Rotate a triangle so that the ghost vertex, if any, comes last.
fn ghost_last(t: [usize; 3]) -> [usize; 3] {
    match t {
        [GHOST, y, z] => [y, z, GHOST],
        [x, GHOST, z] => [z, x, GHOST],
        _ => t,
    }
}

fn insert_point(points: &[Point2], triangles: &mut Vec<[usize; 3]>, idx: usize) {
    let p = points[idx];

    // directed edge -> owning triangle; the neighbour across (a, b) owns (b, a)
    let mut edges: HashMap<(usize, usize), usize> = HashMap::with_capacity(triangles.len() * 3);
    for (ti, t) in triangles.iter().enumerate() {
        for k in 0..3 {
            edges.insert((t[k], t[(k + 1) % 3]), ti);
        }
    }

    // a solid triangle containing the point inside the hull, a ghost seeing it outside
    let mut start = 0;
    let mut best = f64::NEG_INFINITY;
    for (ti, &t) in triangles.iter().enumerate() {
        let score = containment_score(points, t, p);
        if score > best {
            best = score;
            start = ti;
        }
    }

    // grow the cavity through neighbours whose circumcircle contains the point
    let mut cavity = vec![start];
    let mut bad: HashSet<usize> = HashSet::from([start]);
    let mut visited: HashSet<usize> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(ti) = queue.pop_front() {
        let t = triangles[ti];
        for k in 0..3 {
            let Some(&nb) = edges.get(&(t[(k + 1) % 3], t[k])) else {
                continue;
            };
            if !visited.insert(nb) {
                continue;
            }
            if in_triangle_circle(points, triangles[nb], p) {
                bad.insert(nb);
                cavity.push(nb);
                queue.push_back(nb);
            }
        }
    }

    // border of the cavity, kept in the winding of the removed triangles
    let mut border = Vec::new();
    for &ti in &cavity {
        let t = triangles[ti];
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            let shared = edges.get(&(b, a)).is_some_and(|nb| bad.contains(nb));
            if !shared {
                border.push((a, b));
            }
        }
    }

    let mut ti = 0;
    triangles.retain(|_| {
        let keep = !bad.contains(&ti);
        ti += 1;
        keep
    });
    triangles.extend(border.into_iter().map(|(a, b)| ghost_last([a, b, idx])));
}

/// Twice the signed area of `abc`, positive when counter-clockwise.
fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Whether `d` lies strictly inside the circumcircle of the counter-clockwise triangle `abc`.
fn in_circumcircle(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    in_circle_det(a, b, c, d) > 0.0
}

fn in_circle_det(a: Point2, b: Point2, c: Point2, d: Point2) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    ad * (bdx * cdy - cdx * bdy) - bd * (adx * cdy - cdx * ady) + cd * (adx * bdy - bdx * ady)
}

fn bounding_box(points: &[Point2]) -> [f64; 4] {
    points.iter().fold(
        [
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        ],
        |[x0, y0, x1, y1], p| [x0.min(p[0]), y0.min(p[1]), x1.max(p[0]), y1.max(p[1])],
    )
}

fn distance_sq_to_segment(p: Point2, a: Point2, b: Point2) -> f64 {
    let (abx, aby) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        (((p[0] - a[0]) * abx + (p[1] - a[1]) * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (a[0] + t * abx - p[0], a[1] + t * aby - p[1]);
    dx * dx + dy * dy
}

impl Triangulation {
    /// The points the triangulation was built from, including skipped duplicates.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The triangles as counter-clockwise index triples into [`Triangulation::points`].
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the triangulation has no triangle.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The vertex coordinates of a triangle.
    pub fn triangle_vertices(&self, idx: usize) -> Option<[Point2; 3]> {
        self.triangles
            .get(idx)
            .map(|t| [self.points[t[0]], self.points[t[1]], self.points[t[2]]])
    }

    /// The factored barycentric solver of a triangle, `None` for degenerate triangles.
    pub fn solver(&self, idx: usize) -> Option<&BarycentricSolver> {
        self.solvers.get(idx).and_then(Option::as_ref)
    }

    /// Number of triangles too thin to solve barycentric coordinates for.
    pub fn num_degenerate(&self) -> usize {
        self.solvers.iter().filter(|s| s.is_none()).count()
    }

    /// Find a triangle containing the point.
    ///
    /// Points on a shared edge or vertex belong to one of the adjacent triangles. Degenerate
    /// triangles are never returned.
    ///
    /// # Returns
    ///
    /// The index of the triangle, or `None` if the point lies outside the convex hull.
    pub fn locate(&self, point: Point2) -> Option<usize> {
        let [x, y] = point;
        for (idx, (solver, b)) in self.solvers.iter().zip(self.bounds.iter()).enumerate() {
            if x < b[0] - LOCATE_EPS
                || y < b[1] - LOCATE_EPS
                || x > b[2] + LOCATE_EPS
                || y > b[3] + LOCATE_EPS
            {
                continue;
            }
            let Some(solver) = solver else {
                continue;
            };
            if solver.solve(point).iter().all(|&w| w >= -LOCATE_EPS) {
                return Some(idx);
            }
        }
        None
    }

    /// Find the non degenerate triangle closest to the point.
    ///
    /// Returns `None` only when every triangle is degenerate.
    pub fn nearest_triangle(&self, point: Point2) -> Option<usize> {
        if let Some(idx) = self.locate(point) {
            return Some(idx);
        }
        let mut nearest = None;
        let mut best = f64::INFINITY;
        for (idx, t) in self.triangles.iter().enumerate() {
            if self.solvers[idx].is_none() {
                continue;
            }
            let d = (0..3)
                .map(|k| {
                    distance_sq_to_segment(
                        point,
                        self.points[t[k]],
                        self.points[t[(k + 1) % 3]],
                    )
                })
                .fold(f64::INFINITY, f64::min);
            if d < best {
                best = d;
                nearest = Some(idx);
            }
        }
        nearest
    }

    /// Check the empty circumcircle property against every input point.
    ///
    /// Points on a circumcircle are accepted, up to a tolerance relative to the extent of the
    /// point set.
    pub fn is_delaunay(&self) -> bool {
        let [min_x, min_y, max_x, max_y] = bounding_box(&self.points);
        let extent = (max_x - min_x).max(max_y - min_y).max(1.0);
        let tol = 1e-9 * extent.powi(4);

        self.triangles.iter().enumerate().all(|(idx, t)| {
            if self.solvers[idx].is_none() {
                return true;
            }
            let [a, b, c] = [self.points[t[0]], self.points[t[1]], self.points[t[2]]];
            self.points
                .iter()
                .enumerate()
                .filter(|(j, _)| !t.contains(j))
                .all(|(_, &d)| in_circle_det(a, b, c, d) <= tol)
        })
    }
}
