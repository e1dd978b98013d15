//! Common utilities shared across CLI commands: input/output plumbing and
//! the SVG writer for marker glyphs.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

use dotgrid::{LineType, MarkerShape, MarkerStyle, Point, PointSet, Polygon, Renderable, SetRole};

/// Output format for generated patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        tracing::info!("reading SVG from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        Ok(buffer)
    } else {
        tracing::info!(path, "loading SVG");
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
    }
}

/// Write to `path`, or stdout when none is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Size of the root `<svg>` element: its `viewBox`, else `0 0 width height`.
pub fn extract_viewbox(svg: &str) -> Option<String> {
    let mut reader = Reader::from_str(svg);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() != b"svg" {
                    return None;
                }
                let mut width = None;
                let mut height = None;
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match attr.key.as_ref() {
                        b"viewBox" | b"viewbox" => return Some(value.trim().to_string()),
                        b"width" => width = parse_length(&value),
                        b"height" => height = parse_length(&value),
                        _ => {}
                    }
                }
                return match (width, height) {
                    (Some(w), Some(h)) => Some(format!("0 0 {} {}", w, h)),
                    _ => None,
                };
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Leading number of an SVG length such as `210mm` or `100`.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e'))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// `viewBox` value that frames a set of polygons.
pub fn viewbox_around(polygons: &[Polygon]) -> String {
    let bounds = polygons.iter().filter_map(Polygon::bounding_box).reduce(|a, b| {
        (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
    });
    match bounds {
        Some((min_x, min_y, max_x, max_y)) => {
            format!("{} {} {} {}", min_x, min_y, max_x - min_x, max_y - min_y)
        }
        None => "0 0 1000 1000".to_string(),
    }
}

/// `stroke-dasharray` for a line type, in multiples of the stroke width.
pub fn dash_array(line_type: LineType, line_width: f64) -> Option<String> {
    let pattern: &[f64] = match line_type {
        LineType::Solid | LineType::Blank => return None,
        LineType::Dashed => &[4.0, 4.0],
        LineType::Dotted => &[1.0, 3.0],
        LineType::DotDash => &[1.0, 3.0, 4.0, 3.0],
        LineType::LongDash => &[8.0, 4.0],
        LineType::TwoDash => &[2.0, 2.0, 6.0, 2.0],
    };
    let unit = if line_width > 0.0 { line_width } else { 1.0 };
    Some(
        pattern
            .iter()
            .map(|v| format_number(v * unit))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Attributes for the `<g>` wrapping one point set.
pub fn paint_attributes(style: &MarkerStyle) -> String {
    let fill = if style.shape.is_stroke_only() {
        "none"
    } else {
        style.fill.as_str()
    };
    let stroke = if style.line_type == LineType::Blank {
        "none"
    } else {
        style.colour.as_str()
    };

    let mut attrs = format!(
        r#"fill="{}" stroke="{}" stroke-width="{}""#,
        escape(fill),
        escape(stroke),
        format_number(style.line_width)
    );
    if style.alpha < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, format_number(style.alpha));
    }
    if let Some(dashes) = dash_array(style.line_type, style.line_width) {
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, dashes);
    }
    attrs
}

/// One marker glyph centered on `c` with radius `r`.
pub fn glyph(shape: MarkerShape, c: Point, r: f64) -> String {
    let (x, y) = (c.x, c.y);
    let n = format_number;
    match shape {
        MarkerShape::Circle => format!(r#"<circle cx="{}" cy="{}" r="{}"/>"#, n(x), n(y), n(r)),
        MarkerShape::Square => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
            n(x - r),
            n(y - r),
            n(2.0 * r),
            n(2.0 * r)
        ),
        MarkerShape::Diamond => polygon_glyph(&[(x, y - r), (x + r, y), (x, y + r), (x - r, y)]),
        MarkerShape::Triangle => {
            let half = r * 3f64.sqrt() / 2.0;
            polygon_glyph(&[(x, y - r), (x + half, y + r / 2.0), (x - half, y + r / 2.0)])
        }
        MarkerShape::Cross => format!(
            r#"<path d="M{} {}L{} {}M{} {}L{} {}"/>"#,
            n(x - r),
            n(y - r),
            n(x + r),
            n(y + r),
            n(x - r),
            n(y + r),
            n(x + r),
            n(y - r)
        ),
        MarkerShape::Plus => format!(
            r#"<path d="M{} {}L{} {}M{} {}L{} {}"/>"#,
            n(x - r),
            n(y),
            n(x + r),
            n(y),
            n(x),
            n(y - r),
            n(x),
            n(y + r)
        ),
    }
}

fn polygon_glyph(vertices: &[(f64, f64)]) -> String {
    let points: Vec<String> = vertices
        .iter()
        .map(|&(x, y)| format!("{},{}", format_number(x), format_number(y)))
        .collect();
    format!(r#"<polygon points="{}"/>"#, points.join(" "))
}

/// Append a `<g>` per point set.
pub fn write_point_sets(svg: &mut String, renderable: &Renderable, id: Option<&str>) {
    for set in renderable.sets() {
        write_point_set(svg, set, id);
    }
}

fn write_point_set(svg: &mut String, set: &PointSet, id: Option<&str>) {
    let role = match set.role {
        SetRole::Interior => "interior",
        SetRole::Band => "band",
    };
    let _ = write!(svg, r#"<g class="dotgrid-{}""#, role);
    if let Some(id) = id {
        let _ = write!(svg, r#" data-shape-id="{}""#, escape(id));
    }
    let _ = writeln!(svg, " {}>", paint_attributes(&set.style));
    for &p in &set.points {
        let _ = writeln!(svg, "  {}", glyph(set.style.shape, p, set.radius));
    }
    svg.push_str("</g>\n");
}

/// Outline of a polygon (with holes) as a path.
pub fn polygon_outline(polygon: &Polygon) -> String {
    let mut d = String::new();
    for ring in std::iter::once(&polygon.outer).chain(&polygon.holes) {
        for (i, p) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{}{} {}", cmd, format_number(p.x), format_number(p.y));
        }
        d.push('Z');
    }
    format!(r#"<path d="{}" fill="none" stroke="black" stroke-width="0.5" fill-rule="evenodd"/>"#, d)
}

/// Open an SVG document.
pub fn svg_header(viewbox: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">
"#,
        escape(viewbox)
    )
}

/// Compact decimal: at most 4 places, trailing zeros dropped.
pub fn format_number(v: f64) -> String {
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-0" => "0".to_string(),
        s => s.to_string(),
    }
}
