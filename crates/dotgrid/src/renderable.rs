//! Drawable output handed to a rendering backend.

use serde::Serialize;

use crate::geometry::Point;
use crate::style::MarkerStyle;

/// Which classifier output a point set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetRole {
    Interior,
    Band,
}

/// Markers sharing one paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSet {
    pub role: SetRole,
    /// Marker centers in normalized viewport coordinates.
    pub points: Vec<Point>,
    /// Marker radius in normalized x units.
    pub radius: f64,
    pub style: MarkerStyle,
}

/// One or more point sets drawn together, interior first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGroup {
    pub sets: Vec<PointSet>,
}

/// Result of a pattern generator.
///
/// `Empty` is the no-op outcome for degenerate input (nothing fits, spacing
/// too small to matter, etc.) and is distinct from an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Renderable {
    Empty,
    Group(PointGroup),
}

impl Renderable {
    /// Wrap point sets, collapsing to `Empty` when none has points.
    pub fn from_sets(sets: Vec<PointSet>) -> Self {
        let sets: Vec<PointSet> = sets.into_iter().filter(|s| !s.points.is_empty()).collect();
        if sets.is_empty() {
            Renderable::Empty
        } else {
            Renderable::Group(PointGroup { sets })
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Renderable::Empty)
    }

    pub fn sets(&self) -> &[PointSet] {
        match self {
            Renderable::Empty => &[],
            Renderable::Group(group) => &group.sets,
        }
    }

    /// The set with the given role, if it was packaged.
    pub fn set(&self, role: SetRole) -> Option<&PointSet> {
        self.sets().iter().find(|s| s.role == role)
    }

    /// Total number of markers.
    pub fn point_count(&self) -> usize {
        self.sets().iter().map(|s| s.points.len()).sum()
    }

    /// Project every point (e.g. from normalized to device space).
    ///
    /// Radii are scaled by `radius_scale`, since a point map can't tell how
    /// lengths change.
    pub fn map_points<F>(self, radius_scale: f64, f: F) -> Self
    where
        F: Fn(Point) -> Point,
    {
        match self {
            Renderable::Empty => Renderable::Empty,
            Renderable::Group(group) => Renderable::Group(PointGroup {
                sets: group
                    .sets
                    .into_iter()
                    .map(|set| PointSet {
                        points: set.points.into_iter().map(&f).collect(),
                        radius: set.radius * radius_scale,
                        ..set
                    })
                    .collect(),
            }),
        }
    }
}
