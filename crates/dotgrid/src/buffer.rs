//! Isotropic polygon buffering (dilation and erosion by a disc).
//!
//! A [`BufferedPolygon`] is the Minkowski sum (positive distance) or
//! difference (negative distance) of a boundary with a disc of radius
//! `|distance|`. Containment is evaluated exactly against the source rings
//! through boundary distance, so no offset curve has to be constructed for
//! classification. [`BufferedPolygon::outline`] builds an explicit ring when
//! one is needed for display.

use std::f64::consts::TAU;

use crate::containment::{CONTAINMENT_EPSILON, distance_to_boundary, point_in_body};
use crate::geometry::{Boundary, Point, signed_area_of_points};

/// A boundary offset by a signed distance.
#[derive(Debug, Clone, Copy)]
pub struct BufferedPolygon<'a> {
    base: &'a Boundary,
    distance: f64,
    /// Bounding box of the buffered shape, (min_x, min_y, max_x, max_y).
    bounds: (f64, f64, f64, f64),
    collapsed: bool,
}

/// Offset `boundary` by `distance`: positive expands, negative contracts.
///
/// A contraction large enough to erase the shape yields an empty polygon
/// (see [`BufferedPolygon::is_empty`]); that is never an error.
pub fn buffer_polygon(boundary: &Boundary, distance: f64) -> BufferedPolygon<'_> {
    let (min_x, min_y, max_x, max_y) = boundary.bounding_box();
    let grow = distance.max(0.0) + CONTAINMENT_EPSILON;

    // An inscribed disc of radius r fits in the bounding box, so 2r can't
    // exceed its narrower side.
    let narrow = (max_x - min_x).min(max_y - min_y);
    let collapsed = distance < 0.0 && 2.0 * (-distance - CONTAINMENT_EPSILON) > narrow;

    BufferedPolygon {
        base: boundary,
        distance,
        bounds: (min_x - grow, min_y - grow, max_x + grow, max_y + grow),
        collapsed,
    }
}

impl<'a> BufferedPolygon<'a> {
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn base(&self) -> &'a Boundary {
        self.base
    }

    /// True when the contraction provably removes the whole shape.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.collapsed
    }

    /// Closed containment: points on the buffered edge count as inside.
    pub fn contains(&self, p: Point) -> bool {
        if self.collapsed {
            return false;
        }

        let (min_x, min_y, max_x, max_y) = self.bounds;
        if p.x < min_x || p.x > max_x || p.y < min_y || p.y > max_y {
            return false;
        }

        let d = self.distance;
        if d.abs() <= CONTAINMENT_EPSILON {
            point_in_body(p, self.base)
                || distance_to_boundary(p, self.base) <= CONTAINMENT_EPSILON
        } else if d > 0.0 {
            point_in_body(p, self.base)
                || distance_to_boundary(p, self.base) <= d + CONTAINMENT_EPSILON
        } else {
            point_in_body(p, self.base)
                && distance_to_boundary(p, self.base) >= -d - CONTAINMENT_EPSILON
        }
    }

    /// Keep the points this polygon contains, preserving order.
    pub fn filter_contained(&self, points: &[Point]) -> Vec<Point> {
        if self.collapsed {
            return Vec::new();
        }
        points.iter().copied().filter(|p| self.contains(*p)).collect()
    }

    /// Explicit offset rings, outer ring first.
    ///
    /// Corners that the offset wraps around get round joins of about
    /// `arc_segments` points per full turn; the others get mitered. The result
    /// is exact for convex rings and may self-intersect when an offset is
    /// larger than a concave feature. Empty when the polygon has collapsed.
    pub fn outline(&self, arc_segments: usize) -> Vec<Vec<Point>> {
        if self.collapsed {
            return Vec::new();
        }

        let outer = offset_ring(self.base.outer(), self.distance, arc_segments);
        let holes = self
            .base
            .holes()
            .iter()
            .map(|hole| offset_ring(hole, -self.distance, arc_segments));

        std::iter::once(outer)
            .chain(holes)
            .filter(|ring| ring.len() >= 3)
            .collect()
    }
}

/// Outward unit normal of edge `a`→`b` for a ring with the given winding sign.
#[inline]
fn exterior_normal(a: Point, b: Point, winding: f64) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return Point::new(0.0, 0.0);
    }
    Point::new(winding * dy / len, -winding * dx / len)
}

/// Displace a ring by `shift` along its exterior normals.
fn offset_ring(ring: &[Point], shift: f64, arc_segments: usize) -> Vec<Point> {
    if shift == 0.0 {
        return ring.to_vec();
    }

    let area = signed_area_of_points(ring);
    if area == 0.0 {
        return Vec::new();
    }
    let winding = area.signum();
    let n = ring.len();
    let mut result = Vec::with_capacity(n * 2);

    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let v = ring[i];
        let next = ring[(i + 1) % n];

        let n1 = exterior_normal(prev, v, winding);
        let n2 = exterior_normal(v, next, winding);

        let e1 = (v.x - prev.x, v.y - prev.y);
        let e2 = (next.x - v.x, next.y - v.y);
        let turn = (e1.0 * e2.1 - e1.1 * e2.0) * winding;

        if turn.abs() < 1e-12 {
            result.push(Point::new(v.x + shift * n1.x, v.y + shift * n1.y));
            continue;
        }

        // Convex corners open a gap when pushed outward, reflex ones when
        // pulled inward; gaps get an arc, overlaps get a miter.
        if (turn > 0.0) == (shift > 0.0) {
            push_arc(&mut result, v, n1, n2, shift, arc_segments);
        } else {
            let denom = 1.0 + n1.x * n2.x + n1.y * n2.y;
            if denom.abs() < 1e-12 {
                result.push(Point::new(v.x + shift * n1.x, v.y + shift * n1.y));
            } else {
                result.push(Point::new(
                    v.x + shift * (n1.x + n2.x) / denom,
                    v.y + shift * (n1.y + n2.y) / denom,
                ));
            }
        }
    }

    result
}

fn push_arc(out: &mut Vec<Point>, center: Point, n1: Point, n2: Point, shift: f64, arc_segments: usize) {
    let radius = shift.abs();
    let start = (shift * n1.y).atan2(shift * n1.x);
    let end = (shift * n2.y).atan2(shift * n2.x);

    let mut sweep = end - start;
    while sweep > std::f64::consts::PI {
        sweep -= TAU;
    }
    while sweep <= -std::f64::consts::PI {
        sweep += TAU;
    }

    let steps = ((sweep.abs() / TAU) * arc_segments.max(4) as f64).ceil().max(1.0) as usize;
    for k in 0..=steps {
        let a = start + sweep * k as f64 / steps as f64;
        out.push(Point::new(center.x + radius * a.cos(), center.y + radius * a.sin()));
    }
}
