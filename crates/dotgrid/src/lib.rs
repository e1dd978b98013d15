//! # dotgrid
//!
//! Point-marker pattern fills for closed polygon boundaries.
//!
//! A regular lattice is laid over the normalized viewport, rotated and
//! stretched to the viewport's aspect ratio, and split against the boundary
//! grown and shrunk by the marker radius: points that leave a whole marker
//! inside the boundary are the fill, points straddling the edge form the
//! band. [`make_pattern`] packages the result as a [`Renderable`].
//!
//! ```
//! use dotgrid::{PatternStyle, Polygon, make_pattern};
//!
//! let style = PatternStyle::default().with_spacing(0.1).with_angle(0.0);
//! let fill = make_pattern(&Polygon::unit_square(), &style, 1.0, false).unwrap();
//! assert!(fill.point_count() > 0);
//! ```

pub mod buffer;
pub mod classify;
pub mod containment;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod points;
pub mod registry;
pub mod renderable;
pub mod style;
pub mod svg;

pub use buffer::{BufferedPolygon, buffer_polygon};
pub use classify::{Classification, classify};
pub use containment::point_in_polygon;
pub use error::{PatternError, Result};
pub use geometry::{Boundary, Point, Polygon, rotate};
pub use lattice::{LatticeLayout, MAX_LATTICE_POINTS, fudge_factor, generate_lattice};
pub use points::{make_pattern, marker_radius};
pub use registry::{PatternEntry, PatternFn, PatternRegistry};
pub use renderable::{PointGroup, PointSet, Renderable, SetRole};
pub use style::{BandTreatment, Colour, LineType, MarkerShape, MarkerStyle, PatternStyle, StyleOverrides};
pub use svg::{ShapeStyle, ShapeViewport, SvgError, extract_polygons_from_svg, extract_shape_styles};
