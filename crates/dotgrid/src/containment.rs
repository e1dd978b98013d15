//! Point containment and boundary distance queries.
//!
//! This is the HOT PATH: every lattice point runs through these tests, once
//! per buffered polygon.

use crate::geometry::{Boundary, Point};

/// Absolute tolerance for closed (boundary-inclusive) containment.
pub const CONTAINMENT_EPSILON: f64 = 1e-9;

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a ring using ray casting.
///
/// Casts a ray to the right and counts edge crossings.
/// Odd crossings = inside, even = outside. Points exactly on an edge may go
/// either way; callers needing closed containment combine this with
/// [`distance_to_ring`].
#[inline]
pub fn point_in_polygon(px: f64, py: f64, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);

        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }

        j = i;
    }

    inside
}

/// Inside the outer ring and outside every hole (open test).
#[inline]
pub fn point_in_body(p: Point, boundary: &Boundary) -> bool {
    if !point_in_polygon(p.x, p.y, boundary.outer()) {
        return false;
    }
    !boundary
        .holes()
        .iter()
        .any(|hole| point_in_polygon(p.x, p.y, hole))
}

// ============================================================================
// DISTANCE TO BOUNDARY
// ============================================================================

/// Squared distance from `p` to the segment `a`-`b`.
#[inline]
pub fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;

    let t = if len_sq > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let dx = a.x + t * abx - p.x;
    let dy = a.y + t * aby - p.y;
    dx * dx + dy * dy
}

/// Distance from `p` to the nearest edge of a closed ring.
pub fn distance_to_ring(p: Point, ring: &[Point]) -> f64 {
    let n = ring.len();
    if n == 0 {
        return f64::INFINITY;
    }

    let mut best = f64::INFINITY;
    for i in 0..n {
        let j = (i + 1) % n;
        best = best.min(segment_distance_sq(p, ring[i], ring[j]));
    }
    best.sqrt()
}

/// Distance from `p` to the nearest edge of any ring of the boundary.
pub fn distance_to_boundary(p: Point, boundary: &Boundary) -> f64 {
    boundary
        .rings()
        .map(|ring| distance_to_ring(p, ring))
        .fold(f64::INFINITY, f64::min)
}

/// Closed containment: inside the body or on (within epsilon of) an edge.
#[inline]
pub fn contains_closed(p: Point, boundary: &Boundary) -> bool {
    point_in_body(p, boundary) || distance_to_boundary(p, boundary) <= CONTAINMENT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use approx::assert_relative_eq;

    fn unit() -> Boundary {
        Boundary::try_from(&Polygon::unit_square()).unwrap()
    }

    fn with_hole() -> Boundary {
        let hole = vec![
            Point::new(0.4, 0.4),
            Point::new(0.6, 0.4),
            Point::new(0.6, 0.6),
            Point::new(0.4, 0.6),
        ];
        Boundary::new(Polygon::unit_square().outer, vec![hole]).unwrap()
    }

    #[test]
    fn ray_cast_inside_outside() {
        let ring = Polygon::unit_square().outer;
        assert!(point_in_polygon(0.5, 0.5, &ring));
        assert!(!point_in_polygon(1.5, 0.5, &ring));
        assert!(!point_in_polygon(0.5, -0.1, &ring));
    }

    #[test]
    fn ray_cast_concave() {
        // L-shape: the notch at the top right is outside
        let ring = Polygon::from_coords(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.5),
            (0.5, 0.5),
            (0.5, 1.0),
            (0.0, 1.0),
        ])
        .outer;
        assert!(point_in_polygon(0.25, 0.75, &ring));
        assert!(!point_in_polygon(0.75, 0.75, &ring));
    }

    #[test]
    fn body_excludes_holes() {
        let b = with_hole();
        assert!(point_in_body(Point::new(0.2, 0.2), &b));
        assert!(!point_in_body(Point::new(0.5, 0.5), &b));
    }

    #[test]
    fn segment_distance_cases() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_relative_eq!(segment_distance_sq(Point::new(0.5, 2.0), a, b), 4.0);
        // Beyond the end: distance to endpoint
        assert_relative_eq!(segment_distance_sq(Point::new(4.0, 4.0), a, b), 25.0);
        // Degenerate segment
        assert_relative_eq!(segment_distance_sq(Point::new(3.0, 4.0), a, a), 25.0);
    }

    #[test]
    fn boundary_distance_includes_holes() {
        let b = with_hole();
        assert_relative_eq!(distance_to_boundary(Point::new(0.5, 0.3), &b), 0.1, epsilon = 1e-12);
        assert_relative_eq!(distance_to_boundary(Point::new(0.5, 0.5), &b), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn closed_containment_includes_edges() {
        let b = unit();
        assert!(contains_closed(Point::new(0.0, 0.5), &b));
        assert!(contains_closed(Point::new(1.0, 1.0), &b));
        assert!(!contains_closed(Point::new(1.0 + 1e-6, 0.5), &b));
    }
}
