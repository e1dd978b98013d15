//! CLI command implementations.
//!
//! - `fill` - Fill every shape of an SVG with a point pattern
//! - `swatch` - Draw a legend swatch for a style
//! - `patterns` - List registered patterns

pub mod common;
pub mod config;
pub mod fill;
pub mod patterns;
pub mod swatch;

pub use config::StyleArgs;
pub use fill::{FillArgs, FillOptions, cmd_fill, fill_document};
pub use patterns::{cmd_patterns, patterns_listing};
pub use swatch::{SwatchArgs, cmd_swatch, swatch_svg};
