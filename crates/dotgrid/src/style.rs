//! Typed style configuration for point patterns.
//!
//! [`PatternStyle`] is read-only input to the assembler. It deserializes from
//! YAML/JSON with documented defaults, and [`StyleOverrides`] layers partial
//! settings (CLI flags, SVG `data-*` attributes) on top of a base style.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};

/// Marker glyph drawn at each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    Plus,
}

impl MarkerShape {
    pub fn all() -> &'static [MarkerShape] {
        &[
            MarkerShape::Circle,
            MarkerShape::Square,
            MarkerShape::Diamond,
            MarkerShape::Triangle,
            MarkerShape::Cross,
            MarkerShape::Plus,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MarkerShape::Circle => "circle",
            MarkerShape::Square => "square",
            MarkerShape::Diamond => "diamond",
            MarkerShape::Triangle => "triangle",
            MarkerShape::Cross => "cross",
            MarkerShape::Plus => "plus",
        }
    }

    /// Parse from a name, accepting a few common aliases.
    pub fn from_name(name: &str) -> Option<MarkerShape> {
        match name.trim().to_lowercase().as_str() {
            "circle" | "dot" | "o" => Some(MarkerShape::Circle),
            "square" | "box" => Some(MarkerShape::Square),
            "diamond" | "rhombus" => Some(MarkerShape::Diamond),
            "triangle" | "tri" => Some(MarkerShape::Triangle),
            "cross" | "x" => Some(MarkerShape::Cross),
            "plus" | "+" => Some(MarkerShape::Plus),
            _ => None,
        }
    }

    /// Outline-only glyphs ignore the fill colour.
    pub fn is_stroke_only(&self) -> bool {
        matches!(self, MarkerShape::Cross | MarkerShape::Plus)
    }
}

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DotDash,
    LongDash,
    TwoDash,
    Blank,
}

impl LineType {
    pub fn name(&self) -> &'static str {
        match self {
            LineType::Solid => "solid",
            LineType::Dashed => "dashed",
            LineType::Dotted => "dotted",
            LineType::DotDash => "dotdash",
            LineType::LongDash => "longdash",
            LineType::TwoDash => "twodash",
            LineType::Blank => "blank",
        }
    }

    pub fn from_name(name: &str) -> Option<LineType> {
        match name.trim().to_lowercase().as_str() {
            "solid" => Some(LineType::Solid),
            "dashed" => Some(LineType::Dashed),
            "dotted" => Some(LineType::Dotted),
            "dotdash" => Some(LineType::DotDash),
            "longdash" => Some(LineType::LongDash),
            "twodash" => Some(LineType::TwoDash),
            "blank" | "none" => Some(LineType::Blank),
            _ => None,
        }
    }
}

/// A validated SVG/CSS colour string, or `none`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(String);

impl Colour {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(Colour("none".to_string()));
        }
        svgtypes::Color::from_str(trimmed)
            .map(|_| Colour(trimmed.to_string()))
            .map_err(|_| PatternError::InvalidColour(value.to_string()))
    }

    /// Transparent / no paint.
    pub fn none() -> Self {
        Colour("none".to_string())
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == "none"
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Colour {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self> {
        Colour::parse(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.0
    }
}

impl FromStr for Colour {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        Colour::parse(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the assembler does with near-boundary points.
///
/// The classifier always separates them; this only decides whether and how
/// they reach the renderable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandTreatment {
    /// Drop band points entirely.
    #[default]
    Suppress,
    /// Draw band points with the interior style.
    Include,
    /// Draw band points with their own paint.
    Restyle {
        fill: Colour,
        colour: Colour,
        alpha: f64,
    },
}

/// Resolved paint for one point set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub fill: Colour,
    pub colour: Colour,
    pub alpha: f64,
    pub line_width: f64,
    pub line_type: LineType,
}

/// Style parameters for the point pattern.
///
/// Lengths (`spacing`, offsets) are in normalized viewport units. `angle` is
/// in degrees and only matters modulo 90. `density` is the fraction of the
/// spacing covered by a marker's diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternStyle {
    pub shape: MarkerShape,
    pub angle: f64,
    pub spacing: f64,
    pub density: f64,
    pub fill: Colour,
    #[serde(alias = "color")]
    pub colour: Colour,
    pub alpha: f64,
    #[serde(alias = "size", alias = "linewidth")]
    pub line_width: f64,
    #[serde(alias = "linetype")]
    pub line_type: LineType,
    pub x_offset: f64,
    pub y_offset: f64,
    pub band: BandTreatment,
}

impl Default for PatternStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            angle: 30.0,
            spacing: 0.05,
            density: 0.2,
            fill: Colour("#cccccc".to_string()),
            colour: Colour("#333333".to_string()),
            alpha: 1.0,
            line_width: 0.5,
            line_type: LineType::Solid,
            x_offset: 0.0,
            y_offset: 0.0,
            band: BandTreatment::Suppress,
        }
    }
}

impl PatternStyle {
    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_fill(mut self, fill: Colour) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_line_type(mut self, line_type: LineType) -> Self {
        self.line_type = line_type;
        self
    }

    pub fn with_offset(mut self, x_offset: f64, y_offset: f64) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    pub fn with_band(mut self, band: BandTreatment) -> Self {
        self.band = band;
        self
    }

    /// Check ranges. `spacing` is deliberately not checked here: a
    /// non-positive spacing yields an empty pattern rather than an error.
    pub fn validate(&self) -> Result<()> {
        unit_range("density", self.density)?;
        unit_range("alpha", self.alpha)?;
        finite("angle", self.angle)?;
        finite("x_offset", self.x_offset)?;
        finite("y_offset", self.y_offset)?;
        finite("line_width", self.line_width)?;
        if self.line_width < 0.0 {
            return Err(PatternError::InvalidStyle {
                parameter: "line_width",
                value: self.line_width,
                reason: "must not be negative",
            });
        }
        if let BandTreatment::Restyle { alpha, .. } = &self.band {
            unit_range("band.alpha", *alpha)?;
        }
        Ok(())
    }

    /// Marker radius before aspect-ratio correction.
    #[inline]
    pub fn base_radius(&self) -> f64 {
        self.spacing * self.density / 2.0
    }

    /// Angle folded into `[0, 90)`; the square lattice repeats every 90°.
    #[inline]
    pub fn effective_angle(&self) -> f64 {
        self.angle.rem_euclid(90.0)
    }

    /// Paint for interior markers.
    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle {
            shape: self.shape,
            fill: self.fill.clone(),
            colour: self.colour.clone(),
            alpha: self.alpha,
            line_width: self.line_width,
            line_type: self.line_type,
        }
    }

    /// Paint for band markers, or `None` when they are suppressed.
    pub fn band_style(&self) -> Option<MarkerStyle> {
        match &self.band {
            BandTreatment::Suppress => None,
            BandTreatment::Include => Some(self.marker_style()),
            BandTreatment::Restyle { fill, colour, alpha } => Some(MarkerStyle {
                fill: fill.clone(),
                colour: colour.clone(),
                alpha: *alpha,
                ..self.marker_style()
            }),
        }
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PatternError::InvalidStyle {
            parameter,
            value,
            reason: "must be finite",
        })
    }
}

fn unit_range(parameter: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PatternError::InvalidStyle {
            parameter,
            value,
            reason: "must be within [0, 1]",
        })
    }
}

/// Partial style settings layered over a base [`PatternStyle`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    pub shape: Option<MarkerShape>,
    pub angle: Option<f64>,
    pub spacing: Option<f64>,
    pub density: Option<f64>,
    pub fill: Option<Colour>,
    #[serde(alias = "color")]
    pub colour: Option<Colour>,
    pub alpha: Option<f64>,
    pub line_width: Option<f64>,
    pub line_type: Option<LineType>,
    pub x_offset: Option<f64>,
    pub y_offset: Option<f64>,
}

impl StyleOverrides {
    /// True when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        *self == StyleOverrides::default()
    }

    /// Merge onto `base`, preferring values set here.
    pub fn apply(&self, base: &PatternStyle) -> PatternStyle {
        PatternStyle {
            shape: self.shape.unwrap_or(base.shape),
            angle: self.angle.unwrap_or(base.angle),
            spacing: self.spacing.unwrap_or(base.spacing),
            density: self.density.unwrap_or(base.density),
            fill: self.fill.clone().unwrap_or_else(|| base.fill.clone()),
            colour: self.colour.clone().unwrap_or_else(|| base.colour.clone()),
            alpha: self.alpha.unwrap_or(base.alpha),
            line_width: self.line_width.unwrap_or(base.line_width),
            line_type: self.line_type.unwrap_or(base.line_type),
            x_offset: self.x_offset.unwrap_or(base.x_offset),
            y_offset: self.y_offset.unwrap_or(base.y_offset),
            band: base.band.clone(),
        }
    }

    /// Set one field from a `key`/`value` string pair.
    ///
    /// Keys follow the style field names (with `color`, `size` and
    /// `linetype` accepted as aliases). Returns `Ok(false)` for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        let key = key.trim().to_lowercase().replace('-', "_");
        match key.as_str() {
            "shape" => {
                let shape = MarkerShape::from_name(value).ok_or_else(|| PatternError::UnparsableStyle {
                    parameter: "shape",
                    value: value.to_string(),
                })?;
                self.shape = Some(shape);
            }
            "line_type" | "linetype" => {
                let line_type = LineType::from_name(value).ok_or_else(|| PatternError::UnparsableStyle {
                    parameter: "line_type",
                    value: value.to_string(),
                })?;
                self.line_type = Some(line_type);
            }
            "fill" => self.fill = Some(Colour::parse(value)?),
            "colour" | "color" => self.colour = Some(Colour::parse(value)?),
            "angle" => self.angle = Some(parse_number("angle", value)?),
            "spacing" => self.spacing = Some(parse_number("spacing", value)?),
            "density" => self.density = Some(parse_number("density", value)?),
            "alpha" => self.alpha = Some(parse_number("alpha", value)?),
            "line_width" | "size" => self.line_width = Some(parse_number("line_width", value)?),
            "x_offset" => self.x_offset = Some(parse_number("x_offset", value)?),
            "y_offset" => self.y_offset = Some(parse_number("y_offset", value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn parse_number(parameter: &'static str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| PatternError::UnparsableStyle {
        parameter,
        value: value.to_string(),
    })
}
