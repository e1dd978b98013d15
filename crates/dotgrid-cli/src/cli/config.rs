//! Style configuration: YAML style files layered under command-line flags.
//!
//! ```yaml
//! # style.yaml
//! shape: diamond
//! spacing: 0.04
//! density: 0.5
//! angle: 45
//! fill: "#1f77b4"
//! colour: none
//! band: include
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use dotgrid::{BandTreatment, Colour, LineType, MarkerShape, PatternStyle, StyleOverrides};

/// Style flags shared by the `fill` and `swatch` commands.
#[derive(Debug, Clone, Default, Args)]
pub struct StyleArgs {
    /// YAML style file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Marker glyph (circle, square, diamond, triangle, cross, plus)
    #[arg(long, value_parser = parse_shape)]
    pub shape: Option<MarkerShape>,

    /// Lattice angle in degrees
    #[arg(short, long, allow_negative_numbers = true)]
    pub angle: Option<f64>,

    /// Lattice spacing as a fraction of the shape's width
    #[arg(short, long)]
    pub spacing: Option<f64>,

    /// Marker diameter as a fraction of the spacing, in [0, 1]
    #[arg(short, long)]
    pub density: Option<f64>,

    /// Marker fill colour
    #[arg(long, value_parser = parse_colour)]
    pub fill: Option<Colour>,

    /// Marker stroke colour
    #[arg(long, alias = "color", value_parser = parse_colour)]
    pub colour: Option<Colour>,

    /// Marker opacity, in [0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Marker stroke width in document units
    #[arg(long)]
    pub line_width: Option<f64>,

    /// Marker stroke dash style
    #[arg(long, value_parser = parse_line_type)]
    pub line_type: Option<LineType>,

    /// Lattice shift along x, normalized units
    #[arg(long, allow_negative_numbers = true)]
    pub x_offset: Option<f64>,

    /// Lattice shift along y, normalized units
    #[arg(long, allow_negative_numbers = true)]
    pub y_offset: Option<f64>,

    /// What to do with markers that straddle the edge
    #[arg(long, value_enum)]
    pub band: Option<BandArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandArg {
    Suppress,
    Include,
}

impl StyleArgs {
    /// Flag values as overrides.
    pub fn overrides(&self) -> StyleOverrides {
        StyleOverrides {
            shape: self.shape,
            angle: self.angle,
            spacing: self.spacing,
            density: self.density,
            fill: self.fill.clone(),
            colour: self.colour.clone(),
            alpha: self.alpha,
            line_width: self.line_width,
            line_type: self.line_type,
            x_offset: self.x_offset,
            y_offset: self.y_offset,
        }
    }

    /// Base style from `--style` (or defaults) with the flags applied.
    ///
    /// The merged style is validated here so bad input is reported once,
    /// before any shape is processed.
    pub fn resolve(&self) -> Result<PatternStyle> {
        let base = match &self.style {
            Some(path) => load_style(path)?,
            None => PatternStyle::default(),
        };
        let mut style = self.overrides().apply(&base);
        match self.band {
            Some(BandArg::Suppress) => style.band = BandTreatment::Suppress,
            Some(BandArg::Include) => style.band = BandTreatment::Include,
            None => {}
        }
        style.validate().context("invalid style")?;
        Ok(style)
    }
}

/// Read a YAML style file.
pub fn load_style(path: &Path) -> Result<PatternStyle> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read style file {}", path.display()))?;
    parse_style(&content).with_context(|| format!("failed to parse style file {}", path.display()))
}

/// Parse a YAML style document. An empty document yields the defaults.
pub fn parse_style(content: &str) -> Result<PatternStyle> {
    if content.trim().is_empty() {
        return Ok(PatternStyle::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

fn parse_shape(value: &str) -> std::result::Result<MarkerShape, String> {
    MarkerShape::from_name(value).ok_or_else(|| {
        let names: Vec<_> = MarkerShape::all().iter().map(|s| s.name()).collect();
        format!("unknown shape '{}', expected one of: {}", value, names.join(", "))
    })
}

fn parse_line_type(value: &str) -> std::result::Result<LineType, String> {
    LineType::from_name(value).ok_or_else(|| format!("unknown line type '{}'", value))
}

fn parse_colour(value: &str) -> std::result::Result<Colour, String> {
    Colour::parse(value).map_err(|e| e.to_string())
}
