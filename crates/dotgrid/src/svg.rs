//! SVG boundary provider.
//!
//! Shapes come out of usvg fully resolved (CSS, `<use>`, transforms), with
//! Bézier segments flattened by lyon_geom. usvg drops `data-*` attributes,
//! so per-shape style overrides are read in a second pass with quick-xml.
//!
//! [`ShapeViewport`] maps a shape into the normalized unit viewport the
//! pattern generators work in, and maps generated markers back out.

use std::collections::HashMap;

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use usvg::tiny_skia_path::PathSegment;

use crate::containment::point_in_polygon;
use crate::geometry::{Point, Polygon, bounding_box_of_points};
use crate::renderable::Renderable;
use crate::style::StyleOverrides;

/// Failure to turn an SVG document into boundaries.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    ParseError(String),

    #[error("no closed shapes found in SVG")]
    NoPolygons,

    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },
}

/// Flattening tolerance in user units.
const CURVE_TOLERANCE: f32 = 0.1;

/// Consecutive vertices closer than this are merged.
const DEDUP_EPSILON: f64 = 1e-6;

/// Extract every fillable shape from an SVG document.
///
/// Each `<path>` (and every basic shape usvg converts to one) becomes one or
/// more polygons in absolute document coordinates. Subpaths that start inside
/// an earlier ring of the same path become holes; the rest are separate
/// polygons sharing the element's id.
pub fn extract_polygons_from_svg(svg_content: &str) -> Result<Vec<Polygon>, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::ParseError(e.to_string()))?;

    let mut polygons = Vec::new();
    extract_from_group(tree.root(), &mut polygons);

    tracing::debug!(shapes = polygons.len(), "extracted SVG boundaries");
    if polygons.is_empty() {
        Err(SvgError::NoPolygons)
    } else {
        Ok(polygons)
    }
}

fn extract_from_group(group: &usvg::Group, polygons: &mut Vec<Polygon>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => extract_from_group(group, polygons),
            usvg::Node::Path(path) => polygons.extend(path_to_polygons(path)),
            _ => {}
        }
    }
}

fn path_to_polygons(path: &usvg::Path) -> Vec<Polygon> {
    let Some(data) = path.data().clone().transform(path.abs_transform()) else {
        return Vec::new();
    };
    let id = (!path.id().is_empty()).then(|| path.id().to_string());

    let mut rings = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    let mut last: Option<(f32, f32)> = None;

    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                rings.push(std::mem::take(&mut ring));
                ring.push(Point::new(p.x as f64, p.y as f64));
                last = Some((p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                ring.push(Point::new(p.x as f64, p.y as f64));
                last = Some((p.x, p.y));
            }
            PathSegment::QuadTo(ctrl, p) => {
                match last {
                    Some((lx, ly)) => {
                        let curve = QuadraticBezierSegment {
                            from: point(lx, ly),
                            ctrl: point(ctrl.x, ctrl.y),
                            to: point(p.x, p.y),
                        };
                        curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                            ring.push(Point::new(line.to.x as f64, line.to.y as f64));
                        });
                    }
                    None => ring.push(Point::new(p.x as f64, p.y as f64)),
                }
                last = Some((p.x, p.y));
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                match last {
                    Some((lx, ly)) => {
                        let curve = CubicBezierSegment {
                            from: point(lx, ly),
                            ctrl1: point(ctrl1.x, ctrl1.y),
                            ctrl2: point(ctrl2.x, ctrl2.y),
                            to: point(p.x, p.y),
                        };
                        curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                            ring.push(Point::new(line.to.x as f64, line.to.y as f64));
                        });
                    }
                    None => ring.push(Point::new(p.x as f64, p.y as f64)),
                }
                last = Some((p.x, p.y));
            }
            PathSegment::Close => {}
        }
    }
    rings.push(ring);

    let rings = rings.into_iter().map(clean_ring).filter(|r| r.len() >= 3);
    group_rings(rings, id)
}

/// Drop repeated vertices and an explicit closing vertex.
fn clean_ring(mut ring: Vec<Point>) -> Vec<Point> {
    ring.dedup_by(|a, b| (a.x - b.x).abs() < DEDUP_EPSILON && (a.y - b.y).abs() < DEDUP_EPSILON);
    if ring.len() > 1 {
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        if (first.x - last.x).abs() < DEDUP_EPSILON && (first.y - last.y).abs() < DEDUP_EPSILON {
            ring.pop();
        }
    }
    ring
}

fn group_rings(rings: impl Iterator<Item = Vec<Point>>, id: Option<String>) -> Vec<Polygon> {
    let mut polygons: Vec<Polygon> = Vec::new();
    for ring in rings {
        let start = ring[0];
        match polygons
            .iter_mut()
            .find(|poly| point_in_polygon(start.x, start.y, &poly.outer))
        {
            Some(poly) => poly.holes.push(ring),
            None => polygons.push(Polygon {
                outer: ring,
                holes: Vec::new(),
                id: id.clone(),
            }),
        }
    }
    polygons
}

/// Pattern choice and style overrides attached to one SVG element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    /// Value of `data-pattern`, if present.
    pub pattern: Option<String>,
    pub overrides: StyleOverrides,
}

impl ShapeStyle {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none() && self.overrides.is_empty()
    }
}

/// Read `data-*` style attributes, keyed by element id.
///
/// Elements without an id, or without any recognized attribute, are skipped.
/// Unrecognized `data-*` keys are ignored; values that fail to parse are
/// logged and dropped so one bad attribute does not lose the whole document.
pub fn extract_shape_styles(svg_content: &str) -> Result<HashMap<String, ShapeStyle>, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut styles = HashMap::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if let Some((id, style)) = shape_style_of(e) {
                    styles.insert(id, style);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SvgError::Xml {
                    position: reader.error_position(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(styles)
}

fn shape_style_of(element: &BytesStart) -> Option<(String, ShapeStyle)> {
    let mut id = None;
    let mut style = ShapeStyle::default();

    for attr in element.attributes().flatten() {
        let Ok(key) = std::str::from_utf8(attr.key.as_ref()) else {
            continue;
        };
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        if key == "id" {
            id = Some(value.into_owned());
            continue;
        }
        let Some(name) = key.strip_prefix("data-") else {
            continue;
        };
        if name == "pattern" {
            style.pattern = Some(value.trim().to_string());
            continue;
        }
        match style.overrides.set(name, &value) {
            Ok(true) => {}
            Ok(false) => tracing::trace!(attribute = key, "ignoring unknown data attribute"),
            Err(e) => tracing::warn!(attribute = key, error = %e, "ignoring data attribute"),
        }
    }

    let id = id?;
    (!style.is_empty()).then_some((id, style))
}

/// Mapping between a shape's document coordinates and the normalized
/// viewport of its bounding box.
///
/// The bounding box maps onto `[0,1]×[0,1]`, so y is stretched relative to x
/// by `aspect_ratio() = width / height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeViewport {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ShapeViewport {
    /// Viewport of the outer ring's bounding box. `None` for zero-area boxes.
    pub fn from_polygon(polygon: &Polygon) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = bounding_box_of_points(&polygon.outer)?;
        let (width, height) = (max_x - min_x, max_y - min_y);
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    #[inline]
    pub fn normalize_point(&self, p: Point) -> Point {
        Point::new((p.x - self.min_x) / self.width, (p.y - self.min_y) / self.height)
    }

    #[inline]
    pub fn denormalize_point(&self, p: Point) -> Point {
        Point::new(self.min_x + p.x * self.width, self.min_y + p.y * self.height)
    }

    /// The polygon expressed in normalized viewport coordinates.
    pub fn normalize(&self, polygon: &Polygon) -> Polygon {
        let map = |ring: &Vec<Point>| ring.iter().map(|&p| self.normalize_point(p)).collect();
        Polygon {
            outer: map(&polygon.outer),
            holes: polygon.holes.iter().map(map).collect(),
            id: polygon.id.clone(),
        }
    }

    /// Project a generated pattern back into document coordinates.
    ///
    /// Marker radii are in normalized x units, so they scale by the width.
    pub fn denormalize(&self, renderable: Renderable) -> Renderable {
        renderable.map_points(self.width, |p| self.denormalize_point(p))
    }
}
