//! Fill command implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dotgrid::{
    PatternRegistry, PatternStyle, Polygon, Renderable, ShapeStyle, ShapeViewport,
    extract_polygons_from_svg, extract_shape_styles,
};

use super::common::{
    OutputFormat, extract_viewbox, polygon_outline, read_input, svg_header, viewbox_around,
    write_output, write_point_sets,
};
use super::config::StyleArgs;

/// Pattern used when neither `--pattern` nor `data-pattern` names one.
pub const DEFAULT_PATTERN: &str = "points";

#[derive(Debug, Clone, Args)]
pub struct FillArgs {
    /// Input SVG file, or `-` for stdin
    pub input: String,

    /// Pattern for shapes without a `data-pattern` attribute
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Leave the source outlines out of SVG output
    #[arg(long)]
    pub no_outlines: bool,

    #[command(flatten)]
    pub style: StyleArgs,
}

/// Everything `fill_document` needs besides the document itself.
#[derive(Debug, Clone)]
pub struct FillOptions {
    pub pattern: String,
    pub style: PatternStyle,
    pub format: OutputFormat,
    pub outlines: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            style: PatternStyle::default(),
            format: OutputFormat::Svg,
            outlines: true,
        }
    }
}

/// Outcome for one shape. Failed shapes keep their error and an empty fill.
struct ShapeFill<'a> {
    index: usize,
    polygon: &'a Polygon,
    pattern: String,
    aspect_ratio: Option<f64>,
    fill: Renderable,
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonShape<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    index: usize,
    pattern: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    fill: &'a Renderable,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    markers: usize,
    shapes: Vec<JsonShape<'a>>,
}

/// Execute the fill command.
pub fn cmd_fill(args: &FillArgs, registry: &PatternRegistry) -> Result<()> {
    let options = FillOptions {
        pattern: args.pattern.clone(),
        style: args.style.resolve()?,
        format: args.format,
        outlines: !args.no_outlines,
    };
    let content = read_input(&args.input)?;
    let output = fill_document(&content, &options, registry)?;
    write_output(args.output.as_deref(), &output)
}

/// Fill every shape of an SVG document and render the result.
///
/// A shape whose pattern fails is reported and left unfilled; only a
/// document that yields no shapes at all is an error.
pub fn fill_document(svg: &str, options: &FillOptions, registry: &PatternRegistry) -> Result<String> {
    let polygons = extract_polygons_from_svg(svg).context("failed to extract shapes")?;
    let shape_styles = extract_shape_styles(svg).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read data-* attributes, using the base style for every shape");
        HashMap::new()
    });
    let with_holes = polygons.iter().filter(|p| !p.holes.is_empty()).count();
    tracing::info!(shapes = polygons.len(), with_holes, styled = shape_styles.len(), "loaded shapes");

    let start = Instant::now();
    let fills: Vec<ShapeFill> = polygons
        .iter()
        .enumerate()
        .map(|(index, polygon)| fill_shape(index, polygon, options, &shape_styles, registry))
        .collect();

    let markers: usize = fills.iter().map(|f| f.fill.point_count()).sum();
    let failed = fills.iter().filter(|f| f.error.is_some()).count();
    tracing::info!(markers, failed, elapsed = ?start.elapsed(), "generated fills");

    match options.format {
        OutputFormat::Svg => Ok(render_svg(svg, &polygons, &fills, options.outlines)),
        OutputFormat::Json => render_json(&fills, markers),
    }
}

fn fill_shape<'a>(
    index: usize,
    polygon: &'a Polygon,
    options: &FillOptions,
    shape_styles: &HashMap<String, ShapeStyle>,
    registry: &PatternRegistry,
) -> ShapeFill<'a> {
    let shape_style = polygon.id.as_ref().and_then(|id| shape_styles.get(id));
    let pattern = shape_style
        .and_then(|s| s.pattern.clone())
        .unwrap_or_else(|| options.pattern.clone());
    let style = match shape_style {
        Some(s) => s.overrides.apply(&options.style),
        None => options.style.clone(),
    };

    let mut shape = ShapeFill {
        index,
        polygon,
        pattern,
        aspect_ratio: None,
        fill: Renderable::Empty,
        error: None,
    };

    let Some(viewport) = ShapeViewport::from_polygon(polygon) else {
        tracing::debug!(index, id = polygon.id.as_deref(), "shape has no area, left unfilled");
        return shape;
    };
    shape.aspect_ratio = Some(viewport.aspect_ratio());

    let normalized = viewport.normalize(polygon);
    match registry.generate(&shape.pattern, &style, &normalized, viewport.aspect_ratio(), false) {
        Ok(fill) => shape.fill = viewport.denormalize(fill),
        Err(e) => {
            tracing::warn!(
                index,
                id = polygon.id.as_deref(),
                pattern = %shape.pattern,
                error = %e,
                "pattern failed, shape left unfilled"
            );
            shape.error = Some(e.to_string());
        }
    }
    shape
}

fn render_svg(source: &str, polygons: &[Polygon], fills: &[ShapeFill], outlines: bool) -> String {
    let viewbox = extract_viewbox(source).unwrap_or_else(|| viewbox_around(polygons));
    let mut svg = svg_header(&viewbox);

    if outlines {
        svg.push_str("<g class=\"dotgrid-outlines\">\n");
        for polygon in polygons {
            svg.push_str("  ");
            svg.push_str(&polygon_outline(polygon));
            svg.push('\n');
        }
        svg.push_str("</g>\n");
    }
    for shape in fills {
        write_point_sets(&mut svg, &shape.fill, shape.polygon.id.as_deref());
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_json(fills: &[ShapeFill], markers: usize) -> Result<String> {
    let shapes = fills
        .iter()
        .map(|f| JsonShape {
            id: f.polygon.id.as_deref(),
            index: f.index,
            pattern: &f.pattern,
            aspect_ratio: f.aspect_ratio,
            error: f.error.as_deref(),
            fill: &f.fill,
        })
        .collect();
    serde_json::to_string_pretty(&JsonOutput { markers, shapes }).context("failed to serialize JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SHAPES: &str = r#"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">
            <rect id="left" x="0" y="0" width="100" height="100"/>
            <rect id="right" x="110" y="10" width="80" height="40" data-shape="square"/>
        </svg>
    "#;

    #[test]
    fn svg_output_has_outlines_and_markers() {
        let out = fill_document(TWO_SHAPES, &FillOptions::default(), &PatternRegistry::builtin()).unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.contains(r#"viewBox="0 0 200 100""#));
        assert_eq!(out.matches("fill-rule=\"evenodd\"").count(), 2);
        assert!(out.contains(r#"data-shape-id="left""#));
        assert!(out.contains("<circle"));
        assert!(out.contains("<rect x="));
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn outlines_can_be_dropped() {
        let options = FillOptions {
            outlines: false,
            ..FillOptions::default()
        };
        let out = fill_document(TWO_SHAPES, &options, &PatternRegistry::builtin()).unwrap();
        assert!(!out.contains("dotgrid-outlines"));
    }

    #[test]
    fn markers_land_inside_their_shape() {
        let options = FillOptions {
            format: OutputFormat::Json,
            ..FillOptions::default()
        };
        let out = fill_document(TWO_SHAPES, &options, &PatternRegistry::builtin()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let right = &json["shapes"][1];
        assert_eq!(right["id"], "right");
        assert_eq!(right["aspect_ratio"], 2.0);
        for p in right["fill"]["sets"][0]["points"].as_array().unwrap() {
            let (x, y) = (p["x"].as_f64().unwrap(), p["y"].as_f64().unwrap());
            assert!((110.0..=190.0).contains(&x) && (10.0..=50.0).contains(&y), "({x}, {y})");
        }
    }

    #[test]
    fn rotated_glyphs_stay_inside_wide_shape() {
        let options = FillOptions {
            format: OutputFormat::Json,
            style: PatternStyle::default()
                .with_spacing(0.1)
                .with_density(1.0)
                .with_angle(30.0),
            ..FillOptions::default()
        };
        let out = fill_document(TWO_SHAPES, &options, &PatternRegistry::builtin()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let set = &json["shapes"][1]["fill"]["sets"][0];
        let r = set["radius"].as_f64().unwrap();
        // Visual radius on an 80-wide shape: spacing * density / 2 * width.
        assert!((r - 4.0).abs() < 1e-9, "radius {r}");

        let points = set["points"].as_array().unwrap();
        assert!(!points.is_empty());
        let eps = 1e-6;
        for p in points {
            let (x, y) = (p["x"].as_f64().unwrap(), p["y"].as_f64().unwrap());
            assert!(x - r >= 110.0 - eps && x + r <= 190.0 + eps, "({x}, {y}) r {r}");
            assert!(y - r >= 10.0 - eps && y + r <= 50.0 + eps, "({x}, {y}) r {r}");
        }
    }

    #[test]
    fn unknown_pattern_leaves_shape_unfilled() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect id="a" data-pattern="stripes" width="50" height="50"/>
                <rect id="b" x="50" y="50" width="50" height="50"/>
            </svg>
        "#;
        let options = FillOptions {
            format: OutputFormat::Json,
            ..FillOptions::default()
        };
        let out = fill_document(svg, &options, &PatternRegistry::builtin()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["shapes"][0]["fill"]["kind"], "empty");
        assert!(json["shapes"][0]["error"].as_str().unwrap().contains("stripes"));
        assert_eq!(json["shapes"][1]["fill"]["kind"], "group");
    }

    #[test]
    fn empty_document_is_an_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"></svg>"#;
        assert!(fill_document(svg, &FillOptions::default(), &PatternRegistry::builtin()).is_err());
    }
}
