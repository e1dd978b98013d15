//! Legend swatches: the pattern drawn on a plain square.
//!
//! A single swatch shows the resolved style. `--sheet` lays out one swatch
//! per marker shape in a row, labelled, for picking a glyph.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dotgrid::{MarkerShape, PatternRegistry, PatternStyle, Point, Polygon, Renderable};

use super::common::{format_number, svg_header, write_output, write_point_sets};
use super::config::StyleArgs;
use super::fill::DEFAULT_PATTERN;

const DEFAULT_SIZE: f64 = 100.0;
const GUTTER: f64 = 10.0;
const LABEL_HEIGHT: f64 = 14.0;

#[derive(Debug, Clone, Args)]
pub struct SwatchArgs {
    /// Pattern to draw
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Edge length of one swatch in output units
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    pub size: f64,

    /// One labelled swatch per marker shape
    #[arg(long)]
    pub sheet: bool,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub style: StyleArgs,
}

/// Execute the swatch command.
pub fn cmd_swatch(args: &SwatchArgs, registry: &PatternRegistry) -> Result<()> {
    let style = args.style.resolve()?;
    let svg = if args.sheet {
        swatch_sheet_svg(registry, &args.pattern, &style, args.size)?
    } else {
        swatch_svg(registry, &args.pattern, &style, args.size)?
    };
    write_output(args.output.as_deref(), &svg)
}

/// Legend-mode fill of the unit square, scaled to `size`.
pub fn swatch(registry: &PatternRegistry, pattern: &str, style: &PatternStyle, size: f64) -> Result<Renderable> {
    if !(size.is_finite() && size > 0.0) {
        anyhow::bail!("swatch size must be positive, got {}", size);
    }
    let fill = registry
        .generate(pattern, style, &Polygon::unit_square(), 1.0, true)
        .with_context(|| format!("failed to draw swatch for pattern '{}'", pattern))?;
    Ok(fill.map_points(size, |p| Point::new(p.x * size, p.y * size)))
}

/// A single swatch as a standalone SVG document.
pub fn swatch_svg(registry: &PatternRegistry, pattern: &str, style: &PatternStyle, size: f64) -> Result<String> {
    let fill = swatch(registry, pattern, style, size)?;
    tracing::info!(pattern, markers = fill.point_count(), "drew swatch");

    let n = format_number;
    let mut svg = svg_header(&format!("0 0 {} {}", n(size), n(size)));
    write_frame(&mut svg, 0.0, 0.0, size);
    write_point_sets(&mut svg, &fill, None);
    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Every marker shape side by side, each labelled with its name.
pub fn swatch_sheet_svg(
    registry: &PatternRegistry,
    pattern: &str,
    style: &PatternStyle,
    size: f64,
) -> Result<String> {
    let shapes = MarkerShape::all();
    let width = shapes.len() as f64 * (size + GUTTER) + GUTTER;
    let height = size + LABEL_HEIGHT + 2.0 * GUTTER;

    let n = format_number;
    let mut svg = svg_header(&format!("0 0 {} {}", n(width), n(height)));
    for (i, &shape) in shapes.iter().enumerate() {
        let x = GUTTER + i as f64 * (size + GUTTER);
        let y = GUTTER;
        let fill = swatch(registry, pattern, &style.clone().with_shape(shape), size)?;

        let _ = writeln!(svg, r#"<g transform="translate({} {})">"#, n(x), n(y));
        write_frame(&mut svg, 0.0, 0.0, size);
        write_point_sets(&mut svg, &fill, None);
        svg.push_str("</g>\n");
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="10" text-anchor="middle">{}</text>"#,
            n(x + size / 2.0),
            n(y + size + LABEL_HEIGHT),
            shape.name()
        );
    }
    svg.push_str("</svg>\n");
    Ok(svg)
}

fn write_frame(svg: &mut String, x: f64, y: f64, size: f64) {
    let n = format_number;
    let _ = writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black" stroke-width="0.5"/>"#,
        n(x),
        n(y),
        n(size),
        n(size)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_scales_to_size() {
        let registry = PatternRegistry::builtin();
        let style = PatternStyle::default().with_spacing(0.1).with_angle(0.0);
        let fill = swatch(&registry, "points", &style, 200.0).unwrap();
        let set = &fill.sets()[0];
        assert!((set.radius - 0.1 * 0.2 / 2.0 * 200.0).abs() < 1e-9);
        assert!(set.points.iter().all(|p| (0.0..=200.0).contains(&p.x) && (0.0..=200.0).contains(&p.y)));
    }

    #[test]
    fn swatch_svg_has_frame_and_markers() {
        let svg = swatch_svg(&PatternRegistry::builtin(), "dots", &PatternStyle::default(), 50.0).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 50 50""#));
        assert!(svg.contains(r#"<rect x="0" y="0" width="50" height="50""#));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn sheet_labels_every_shape() {
        let svg =
            swatch_sheet_svg(&PatternRegistry::builtin(), "points", &PatternStyle::default(), 60.0).unwrap();
        for shape in MarkerShape::all() {
            assert!(svg.contains(&format!(">{}</text>", shape.name())));
        }
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<path"));
    }

    #[test]
    fn bad_size_rejected() {
        let registry = PatternRegistry::builtin();
        assert!(swatch(&registry, "points", &PatternStyle::default(), 0.0).is_err());
    }

    #[test]
    fn unknown_pattern_is_an_error() {
        let registry = PatternRegistry::builtin();
        let err = swatch(&registry, "waves", &PatternStyle::default(), 10.0).unwrap_err();
        assert!(format!("{err:#}").contains("waves"));
    }
}
