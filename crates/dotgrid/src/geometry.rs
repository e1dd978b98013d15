//! Core geometry types and transforms for dotgrid.
//!
//! Everything here works in normalized viewport coordinates: the unit square
//! `[0,1]×[0,1]` is the area a pattern is meant to cover, although points may
//! fall outside it after rotation or offsetting.

use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};

/// Center of the normalized viewport. Lattices rotate about this point.
pub const PATTERN_CENTER: Point = Point { x: 0.5, y: 0.5 };

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A polygon with an outer boundary and optional holes.
///
/// This is the raw, unvalidated shape handed over by a boundary provider.
/// Rings are implicitly closed: the last vertex connects back to the first.
/// Use [`Boundary::new`] (or `TryFrom<&Polygon>`) to validate it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Outer boundary vertices
    pub outer: Vec<Point>,
    /// Interior holes
    pub holes: Vec<Vec<Point>>,
    /// Optional ID from the source document
    pub id: Option<String>,
}

/// A validated fill boundary.
///
/// Guarantees at least 3 finite vertices in the outer ring and in every hole.
/// Self-intersection is not checked; results on self-intersecting rings are
/// unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    outer: Vec<Point>,
    holes: Vec<Vec<Point>>,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl Polygon {
    /// Create a simple polygon with no holes.
    pub fn new(outer: Vec<Point>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
            id: None,
        }
    }

    /// Create a polygon with holes.
    pub fn with_holes(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self {
            outer,
            holes,
            id: None,
        }
    }

    /// Create a polygon with an ID.
    pub fn with_id(outer: Vec<Point>, id: Option<String>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
            id,
        }
    }

    /// Build a polygon from `(x, y)` tuples.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    /// The unit square `[(0,0),(1,0),(1,1),(0,1)]`.
    pub fn unit_square() -> Self {
        Self::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        bounding_box_of_points(&self.outer)
    }

    /// Calculate signed area of the outer ring using the shoelace formula.
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.outer)
    }
}

impl Boundary {
    /// Validate an outer ring and its holes.
    pub fn new(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Result<Self> {
        check_ring(&outer, "outer ring")?;
        for hole in &holes {
            check_ring(hole, "hole")?;
        }
        Ok(Self { outer, holes })
    }

    #[inline]
    pub fn outer(&self) -> &[Point] {
        &self.outer
    }

    #[inline]
    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    /// Iterate over every ring, outer first.
    pub fn rings(&self) -> impl Iterator<Item = &[Point]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Bounding box of the outer ring as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        // Validation guarantees a non-empty outer ring.
        bounding_box_of_points(&self.outer).unwrap_or((0.0, 0.0, 0.0, 0.0))
    }

    /// Unsigned area: outer ring minus holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area_of_points(h).abs()).sum();
        (signed_area_of_points(&self.outer).abs() - holes).max(0.0)
    }
}

impl TryFrom<&Polygon> for Boundary {
    type Error = PatternError;

    fn try_from(polygon: &Polygon) -> Result<Self> {
        Boundary::new(polygon.outer.clone(), polygon.holes.clone())
    }
}

impl From<&Boundary> for Polygon {
    fn from(boundary: &Boundary) -> Self {
        Polygon::with_holes(boundary.outer.clone(), boundary.holes.clone())
    }
}

fn check_ring(ring: &[Point], what: &str) -> Result<()> {
    if ring.len() < 3 {
        return Err(PatternError::InvalidBoundary {
            vertices: ring.len(),
            reason: format!("{what} needs at least 3 vertices"),
        });
    }
    if let Some(p) = ring.iter().find(|p| !p.is_finite()) {
        return Err(PatternError::InvalidBoundary {
            vertices: ring.len(),
            reason: format!("{what} has non-finite vertex ({}, {})", p.x, p.y),
        });
    }
    Ok(())
}

/// Bounding box of a point sequence as (min_x, min_y, max_x, max_y).
pub fn bounding_box_of_points(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Some((min_x, min_y, max_x, max_y))
}

/// Calculate signed area of a point sequence using the shoelace formula.
pub fn signed_area_of_points(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Rotate points about [`PATTERN_CENTER`] by `angle_degrees`, as seen on screen.
///
/// `aspect_ratio` is the factor normalized y-coordinates carry relative to a
/// visually uniform space. Points are un-scaled by it, rotated with the
/// standard rotation matrix, then re-scaled, so the visual angle matches
/// `angle_degrees` even on a non-square viewport.
pub fn rotate(points: &[Point], angle_degrees: f64, aspect_ratio: f64) -> Vec<Point> {
    if angle_degrees == 0.0 {
        return points.to_vec();
    }

    let (sin_a, cos_a) = angle_degrees.to_radians().sin_cos();
    let cx = PATTERN_CENTER.x;
    let cy = PATTERN_CENTER.y / aspect_ratio;

    points
        .iter()
        .map(|p| {
            let dx = p.x - cx;
            let dy = p.y / aspect_ratio - cy;
            Point::new(
                cx + dx * cos_a - dy * sin_a,
                (cy + dx * sin_a + dy * cos_a) * aspect_ratio,
            )
        })
        .collect()
}

/// Multiply every y-coordinate by `factor`.
pub fn scale_y(points: &mut [Point], factor: f64) {
    for p in points {
        p.y *= factor;
    }
}

/// Shift every point by `(dx, dy)`.
pub fn translate(points: &mut [Point], dx: f64, dy: f64) {
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    for p in points {
        p.x += dx;
        p.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0);
    }

    #[test]
    fn polygon_bbox() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]);
        assert_eq!(poly.bounding_box(), Some((0.0, 0.0, 10.0, 5.0)));
    }

    #[test]
    fn empty_polygon_bbox() {
        assert_eq!(Polygon::new(vec![]).bounding_box(), None);
    }

    #[test]
    fn boundary_rejects_two_vertices() {
        let err = Boundary::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)], vec![])
            .unwrap_err();
        assert!(matches!(err, PatternError::InvalidBoundary { vertices: 2, .. }));
    }

    #[test]
    fn boundary_rejects_degenerate_hole() {
        let poly = Polygon::with_holes(
            Polygon::unit_square().outer,
            vec![vec![Point::new(0.5, 0.5)]],
        );
        assert!(Boundary::try_from(&poly).is_err());
    }

    #[test]
    fn boundary_rejects_nan_vertex() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]);
        assert!(Boundary::try_from(&poly).is_err());
    }

    #[test]
    fn boundary_area_subtracts_holes() {
        let hole = vec![
            Point::new(0.25, 0.25),
            Point::new(0.75, 0.25),
            Point::new(0.75, 0.75),
            Point::new(0.25, 0.75),
        ];
        let boundary = Boundary::new(Polygon::unit_square().outer, vec![hole]).unwrap();
        assert_relative_eq!(boundary.area(), 0.75, epsilon = 1e-12);
        assert_eq!(boundary.rings().count(), 2);
    }

    #[test]
    fn signed_area_winding() {
        let ccw = Polygon::unit_square();
        assert!(ccw.signed_area() > 0.0);
        let cw = Polygon::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert!(cw.signed_area() < 0.0);
    }

    #[test]
    fn rotate_quarter_turn_about_center() {
        let rotated = rotate(&[Point::new(1.0, 0.5)], 90.0, 1.0);
        assert_relative_eq!(rotated[0].x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rotated[0].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_zero_is_identity() {
        let pts = vec![Point::new(0.1, 0.9), Point::new(-3.0, 2.0)];
        let rotated = rotate(&pts, 0.0, 2.5);
        for (a, b) in pts.iter().zip(&rotated) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotate_compensates_aspect_ratio() {
        // With y stretched by 2, a point one unit right of center rotated 90°
        // must land one *visual* unit above, i.e. 2 normalized units.
        let rotated = rotate(&[Point::new(1.5, 0.5)], 90.0, 2.0);
        assert_relative_eq!(rotated[0].x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rotated[0].y, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn scale_and_translate() {
        let mut pts = vec![Point::new(1.0, 2.0)];
        scale_y(&mut pts, 3.0);
        translate(&mut pts, 0.5, -1.0);
        assert_eq!(pts[0], Point::new(1.5, 5.0));
    }
}
