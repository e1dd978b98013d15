//! The `points` pattern: a rotated lattice of markers kept clear of the edge.
//!
//! Pipeline per call:
//! 1. validate the boundary and style
//! 2. derive the marker radius and the lattice margin from the aspect ratio
//! 3. lay out the lattice, offset it, stretch y and rotate about the center
//! 4. classify against the boundary grown/shrunk by the marker radius
//! 5. package the interior set (and the band set, if the style asks for it)

use crate::classify::classify;
use crate::error::{PatternError, Result};
use crate::geometry::{Boundary, Polygon, rotate, scale_y, translate};
use crate::lattice::{LatticeLayout, MAX_LATTICE_POINTS, fudge_factor};
use crate::renderable::{PointSet, Renderable, SetRole};
use crate::style::PatternStyle;

/// Classification radius for a style on a viewport with the given aspect
/// ratio, in normalized units.
///
/// Wide viewports stretch normalized y by the aspect ratio, so a glyph of
/// visual radius `base_radius()` reaches `base_radius() * aspect_ratio` in
/// normalized y. The tolerance covers that reach.
pub fn marker_radius(style: &PatternStyle, aspect_ratio: f64) -> f64 {
    let radius = style.base_radius();
    if aspect_ratio > 1.0 {
        radius * aspect_ratio
    } else {
        radius
    }
}

/// Generate the point pattern for `boundary`.
///
/// `legend_mode` is part of the generator signature; a legend swatch differs
/// only in the boundary and aspect ratio the caller passes, so it is not
/// consulted here.
///
/// Fails with [`PatternError::InvalidBoundary`] before any geometry runs when
/// a ring has fewer than 3 vertices. Non-positive spacing or aspect ratio
/// resolve to [`Renderable::Empty`].
pub fn make_pattern(
    boundary: &Polygon,
    style: &PatternStyle,
    aspect_ratio: f64,
    _legend_mode: bool,
) -> Result<Renderable> {
    let boundary = Boundary::try_from(boundary)?;
    style.validate()?;

    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        tracing::warn!(aspect_ratio, "aspect ratio must be positive, pattern left empty");
        return Ok(Renderable::Empty);
    }
    if !(style.spacing.is_finite() && style.spacing > 0.0) {
        tracing::warn!(spacing = style.spacing, "spacing must be positive, pattern left empty");
        return Ok(Renderable::Empty);
    }

    let radius = marker_radius(style, aspect_ratio);
    // Glyphs are drawn at the visual radius in normalized x units.
    let glyph_radius = style.base_radius();
    let fudge = fudge_factor(aspect_ratio);

    let Some(layout) = LatticeLayout::new(style.spacing, aspect_ratio, radius, fudge) else {
        return Ok(Renderable::Empty);
    };
    let candidates = layout.len();
    if candidates > MAX_LATTICE_POINTS {
        return Err(PatternError::LatticeTooDense {
            points: candidates,
            limit: MAX_LATTICE_POINTS,
        });
    }

    let mut lattice = layout.points();
    if lattice.is_empty() {
        return Ok(Renderable::Empty);
    }

    // Offsets shift the lattice origin; whole steps change nothing, so only
    // the remainder is applied and the lattice margin stays sufficient.
    translate(
        &mut lattice,
        style.x_offset.rem_euclid(style.spacing),
        (style.y_offset / aspect_ratio).rem_euclid(style.spacing),
    );
    scale_y(&mut lattice, aspect_ratio);
    let lattice = rotate(&lattice, style.effective_angle(), aspect_ratio);

    let classes = classify(&lattice, &boundary, radius);
    tracing::debug!(
        radius,
        fudge,
        candidates = lattice.len(),
        interior = classes.interior.len(),
        band = classes.band.len(),
        "points pattern"
    );

    let mut sets = vec![PointSet {
        role: SetRole::Interior,
        points: classes.interior,
        radius: glyph_radius,
        style: style.marker_style(),
    }];
    if let Some(band_style) = style.band_style() {
        sets.push(PointSet {
            role: SetRole::Band,
            points: classes.band,
            radius: glyph_radius,
            style: band_style,
        });
    }

    Ok(Renderable::from_sets(sets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::style::BandTreatment;

    fn unit_style() -> PatternStyle {
        PatternStyle::default()
            .with_spacing(0.1)
            .with_density(1.0)
            .with_angle(0.0)
    }

    #[test]
    fn radius_scales_with_wide_aspect_only() {
        let style = unit_style();
        assert_eq!(marker_radius(&style, 1.0), 0.05);
        assert_eq!(marker_radius(&style, 0.5), 0.05);
        assert!((marker_radius(&style, 2.0) - 0.1).abs() < 1e-15);
    }

    #[test]
    fn too_few_vertices_fails_fast() {
        let line = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0)]);
        let err = make_pattern(&line, &unit_style(), 1.0, false).unwrap_err();
        assert!(matches!(err, PatternError::InvalidBoundary { .. }));
    }

    #[test]
    fn invalid_boundary_reported_before_style() {
        // Both the boundary and the style are bad; the boundary wins.
        let line = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0)]);
        let style = unit_style().with_density(7.0);
        let err = make_pattern(&line, &style, 1.0, false).unwrap_err();
        assert!(matches!(err, PatternError::InvalidBoundary { .. }));
    }

    #[test]
    fn zero_spacing_is_empty() {
        let r = make_pattern(&Polygon::unit_square(), &unit_style().with_spacing(0.0), 1.0, false)
            .unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn non_positive_aspect_ratio_is_empty() {
        let r = make_pattern(&Polygon::unit_square(), &unit_style(), 0.0, false).unwrap();
        assert!(r.is_empty());
        let r = make_pattern(&Polygon::unit_square(), &unit_style(), -1.0, false).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn band_suppressed_by_default() {
        let r = make_pattern(&Polygon::unit_square(), &unit_style(), 1.0, false).unwrap();
        assert!(r.set(SetRole::Interior).is_some());
        assert!(r.set(SetRole::Band).is_none());
    }

    #[test]
    fn band_included_on_request() {
        let style = unit_style().with_band(BandTreatment::Include);
        let r = make_pattern(&Polygon::unit_square(), &style, 1.0, false).unwrap();
        assert!(r.set(SetRole::Band).is_some_and(|s| !s.points.is_empty()));
    }

    #[test]
    fn tiny_boundary_gives_empty_renderable() {
        let speck = Polygon::from_coords(&[(0.5, 0.5), (0.501, 0.5), (0.501, 0.501)]);
        let r = make_pattern(&speck, &unit_style(), 1.0, false).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn legend_mode_changes_nothing() {
        let style = PatternStyle::default();
        let a = make_pattern(&Polygon::unit_square(), &style, 1.0, false).unwrap();
        let b = make_pattern(&Polygon::unit_square(), &style, 1.0, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn offset_shifts_lattice() {
        let base = make_pattern(&Polygon::unit_square(), &unit_style(), 1.0, false).unwrap();
        let moved = make_pattern(
            &Polygon::unit_square(),
            &unit_style().with_offset(0.02, 0.0),
            1.0,
            false,
        )
        .unwrap();
        let first = |r: &Renderable| -> Point {
            r.set(SetRole::Interior)
                .map(|s| s.points[0])
                .unwrap_or(Point::new(f64::NAN, f64::NAN))
        };
        assert!((first(&moved).x - first(&base).x - 0.02).abs() < 1e-9);
    }

    #[test]
    fn glyph_radius_is_visual_on_wide_viewport() {
        let style = unit_style().with_angle(30.0);
        let r = make_pattern(&Polygon::unit_square(), &style, 2.0, false).unwrap();
        let set = r.set(SetRole::Interior).unwrap();
        assert_eq!(set.radius, style.base_radius());
        // The glyph's normalized y reach equals the classification radius.
        assert!((set.radius * 2.0 - marker_radius(&style, 2.0)).abs() < 1e-15);
    }

    #[test]
    fn vanishing_spacing_is_refused_not_panicking() {
        let style = PatternStyle::default().with_spacing(1e-300);
        let err = make_pattern(&Polygon::unit_square(), &style, 1.0, false).unwrap_err();
        assert!(matches!(err, PatternError::LatticeTooDense { .. }));
    }

    #[test]
    fn dense_lattice_refused() {
        let style = PatternStyle::default().with_spacing(1e-4);
        let err = make_pattern(&Polygon::unit_square(), &style, 1.0, false).unwrap_err();
        assert!(matches!(err, PatternError::LatticeTooDense { .. }));
    }
}
