//! Classification invariants over random convex boundaries.

use dotgrid::{
    Boundary, BandTreatment, PatternStyle, Point, Polygon, SetRole, buffer_polygon, classify,
    fudge_factor, generate_lattice, make_pattern, marker_radius, rotate,
};
use proptest::prelude::*;

fn rectangle() -> impl Strategy<Value = Polygon> {
    (0.0..0.6f64, 0.0..0.6f64, 0.05..0.4f64, 0.05..0.4f64).prop_map(|(x, y, w, h)| {
        Polygon::from_coords(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
    })
}

fn triangle() -> impl Strategy<Value = Polygon> {
    prop::array::uniform3((0.0..1.0f64, 0.0..1.0f64))
        .prop_filter("degenerate triangle", |v| {
            let [(ax, ay), (bx, by), (cx, cy)] = *v;
            ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs() > 0.02
        })
        .prop_map(|v| Polygon::from_coords(&v))
}

fn convex_boundary() -> impl Strategy<Value = Polygon> {
    prop_oneof![rectangle(), triangle()]
}

/// The rotated, stretched lattice `make_pattern` classifies.
fn placed_lattice(style: &PatternStyle, aspect_ratio: f64) -> (Vec<Point>, f64) {
    let radius = marker_radius(style, aspect_ratio);
    let mut lattice = generate_lattice(style.spacing, aspect_ratio, radius, fudge_factor(aspect_ratio));
    for p in &mut lattice {
        p.y *= aspect_ratio;
    }
    (rotate(&lattice, style.effective_angle(), aspect_ratio), radius)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interior_and_band_respect_buffers(
        polygon in convex_boundary(),
        spacing in 0.03..0.2f64,
        density in 0.05..1.0f64,
        angle in 0.0..360.0f64,
        aspect_ratio in 0.5..2.0f64,
    ) {
        let boundary = Boundary::try_from(&polygon).unwrap();
        let style = PatternStyle::default()
            .with_spacing(spacing)
            .with_density(density)
            .with_angle(angle);
        let (lattice, radius) = placed_lattice(&style, aspect_ratio);
        prop_assume!(radius > 0.0);

        let classes = classify(&lattice, &boundary, radius);
        let expanded = buffer_polygon(&boundary, radius);
        let contracted = buffer_polygon(&boundary, -radius);

        for p in &classes.interior {
            prop_assert!(contracted.contains(*p), "interior {:?} outside contraction", p);
        }
        for p in &classes.band {
            prop_assert!(expanded.contains(*p), "band {:?} outside expansion", p);
            prop_assert!(!contracted.contains(*p), "band {:?} inside contraction", p);
        }

        // Each lattice point lands in at most one set, and together they
        // are exactly the expansion's share of the lattice.
        let in_expansion = lattice.iter().filter(|p| expanded.contains(**p)).count();
        prop_assert_eq!(classes.interior.len() + classes.band.len(), in_expansion);
    }

    #[test]
    fn pattern_sets_match_classifier(
        polygon in convex_boundary(),
        spacing in 0.04..0.2f64,
        density in 0.1..1.0f64,
        angle in -180.0..180.0f64,
        aspect_ratio in 0.5..2.0f64,
    ) {
        let style = PatternStyle::default()
            .with_spacing(spacing)
            .with_density(density)
            .with_angle(angle)
            .with_band(BandTreatment::Include);
        let rendered = make_pattern(&polygon, &style, aspect_ratio, false).unwrap();

        let boundary = Boundary::try_from(&polygon).unwrap();
        let (lattice, radius) = placed_lattice(&style, aspect_ratio);
        let classes = classify(&lattice, &boundary, radius);

        let interior = rendered.set(SetRole::Interior).map(|s| s.points.clone()).unwrap_or_default();
        let band = rendered.set(SetRole::Band).map(|s| s.points.clone()).unwrap_or_default();
        prop_assert_eq!(interior, classes.interior);
        prop_assert_eq!(band, classes.band);
    }

    #[test]
    fn quarter_turns_agree(
        polygon in convex_boundary(),
        angle in 0u32..90,
        turns in 1u32..4,
    ) {
        // Whole degrees keep the folded angle bit-identical.
        let angle = angle as f64;
        let style = PatternStyle::default().with_spacing(0.06).with_band(BandTreatment::Include);
        let a = make_pattern(&polygon, &style.clone().with_angle(angle), 1.0, false).unwrap();
        let b = make_pattern(&polygon, &style.with_angle(angle + 90.0 * turns as f64), 1.0, false).unwrap();
        prop_assert_eq!(a, b);
    }
}
