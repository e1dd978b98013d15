//! Regular lattice of candidate marker positions.
//!
//! The lattice is built in visually uniform space (before the y axis is
//! stretched by the aspect ratio) with the same step along both axes. It is
//! sized so that, once rotated about the viewport center and scaled, it still
//! covers the whole unit viewport with a margin of a marker radius.

use crate::geometry::Point;

/// The covered range is never narrower than this along either axis.
pub const MIN_LATTICE_EXTENT: f64 = 2.0;

/// Lattices above this many candidates are refused.
pub const MAX_LATTICE_POINTS: u64 = 4_000_000;

/// Row/column layout of a lattice: coordinates are `origin + k * spacing` for
/// integer `k` in `first..=last`, identical for both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeLayout {
    pub spacing: f64,
    pub origin: f64,
    pub first: i64,
    pub last: i64,
}

impl LatticeLayout {
    /// Compute the layout, or `None` when the inputs can't produce a lattice.
    pub fn new(spacing: f64, aspect_ratio: f64, radius: f64, fudge_factor: f64) -> Option<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return None;
        }
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return None;
        }

        let reach = radius.max(0.0) * fudge_factor;
        let inv = 1.0 / aspect_ratio;

        // Visual-space viewport is [0,1]×[0,1/ar]; after rotation about its
        // center it stays inside the circumscribed disc. One extra step of
        // margin absorbs the origin offset.
        let half_diagonal = 0.5 * (1.0 + inv * inv).sqrt();
        let margin = reach + spacing;
        let mut lo = (0.5f64.min(0.5 * inv) - half_diagonal - margin).min(-reach);
        let mut hi = (0.5f64.max(0.5 * inv) + half_diagonal + margin).max(inv + reach);

        if hi - lo < MIN_LATTICE_EXTENT {
            let mid = (lo + hi) / 2.0;
            lo = mid - MIN_LATTICE_EXTENT / 2.0;
            hi = mid + MIN_LATTICE_EXTENT / 2.0;
        }

        let origin = -reach;
        let first = ((lo - origin) / spacing).ceil();
        let last = ((hi - origin) / spacing).floor();
        if !(first.is_finite() && last.is_finite()) || last < first {
            return None;
        }

        Some(Self {
            spacing,
            origin,
            first: first as i64,
            last: last as i64,
        })
    }

    /// Points per axis. Saturates when a vanishing spacing pins the row
    /// indices to the ends of `i64`.
    #[inline]
    pub fn per_axis(&self) -> u64 {
        if self.last < self.first {
            return 0;
        }
        self.last.abs_diff(self.first).saturating_add(1)
    }

    /// Total number of points.
    #[inline]
    pub fn len(&self) -> u64 {
        self.per_axis().saturating_mul(self.per_axis())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    /// Coordinate of the `k`th row or column.
    #[inline]
    pub fn coord(&self, k: i64) -> f64 {
        self.origin + k as f64 * self.spacing
    }

    /// Covered range along either axis, (min, max).
    pub fn extent(&self) -> (f64, f64) {
        (self.coord(self.first), self.coord(self.last))
    }

    /// Materialize the grid, row by row.
    pub fn points(&self) -> Vec<Point> {
        let per_axis = self.per_axis() as usize;
        let mut points = Vec::with_capacity(per_axis * per_axis);
        for row in self.first..=self.last {
            let y = self.coord(row);
            for col in self.first..=self.last {
                points.push(Point::new(self.coord(col), y));
            }
        }
        points
    }
}

/// Build the candidate lattice.
///
/// Returns an empty vector when `spacing <= 0` (or the inputs are otherwise
/// unusable); callers treat that as "no pattern". Layouts above
/// [`MAX_LATTICE_POINTS`] are not materialized either.
pub fn generate_lattice(spacing: f64, aspect_ratio: f64, radius: f64, fudge_factor: f64) -> Vec<Point> {
    let Some(layout) = LatticeLayout::new(spacing, aspect_ratio, radius, fudge_factor) else {
        return Vec::new();
    };
    if layout.len() > MAX_LATTICE_POINTS {
        tracing::warn!(spacing, points = layout.len(), "lattice too dense, not generated");
        return Vec::new();
    }
    layout.points()
}

/// Margin multiplier that grows as the aspect ratio departs from 1.
#[inline]
pub fn fudge_factor(aspect_ratio: f64) -> f64 {
    aspect_ratio.max(1.0 / aspect_ratio)
}
