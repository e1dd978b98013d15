//! Partition lattice points against a boundary with a marker-sized tolerance.

use serde::Serialize;

use crate::buffer::buffer_polygon;
use crate::geometry::{Boundary, Point};

/// Lattice points split by their clearance from the boundary.
///
/// `interior` points sit at least `radius` inside the boundary, so a marker of
/// that radius drawn there stays clear of the edge. `band` points are within
/// `radius` of the edge on either side. Everything else was discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub interior: Vec<Point>,
    pub band: Vec<Point>,
}

impl Classification {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interior.is_empty() && self.band.is_empty()
    }

    /// Number of points that survived (interior + band).
    #[inline]
    pub fn len(&self) -> usize {
        self.interior.len() + self.band.len()
    }
}

/// Classify `lattice` against `boundary` expanded and contracted by `radius`.
///
/// Both output sets keep lattice order. Points are tested against the
/// contraction only once they're known to be inside the expansion.
pub fn classify(lattice: &[Point], boundary: &Boundary, radius: f64) -> Classification {
    let radius = radius.abs();
    let expanded = buffer_polygon(boundary, radius);
    let contracted = buffer_polygon(boundary, -radius);

    let mut result = Classification::default();
    if lattice.is_empty() || expanded.is_empty() {
        return result;
    }

    for &p in lattice {
        if !expanded.contains(p) {
            continue;
        }
        if contracted.contains(p) {
            result.interior.push(p);
        } else {
            result.band.push(p);
        }
    }

    tracing::trace!(
        candidates = lattice.len(),
        interior = result.interior.len(),
        band = result.band.len(),
        "classified lattice"
    );
    result
}
