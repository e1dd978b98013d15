use thiserror::Error;

use crate::svg::SvgError;

/// Errors raised while generating a pattern.
///
/// Degenerate geometry (a boundary that collapses under contraction, a lattice
/// with no points, empty intersections) is not an error: it produces
/// [`Renderable::Empty`](crate::Renderable::Empty).
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid boundary ({vertices} vertices): {reason}")]
    InvalidBoundary { vertices: usize, reason: String },

    #[error("style parameter {parameter} = {value} is invalid: {reason}")]
    InvalidStyle {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("cannot parse {value:?} as style parameter {parameter}")]
    UnparsableStyle { parameter: &'static str, value: String },

    #[error("invalid colour: {0:?}")]
    InvalidColour(String),

    #[error("lattice would hold {points} points (limit {limit}); increase spacing")]
    LatticeTooDense { points: u64, limit: u64 },

    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    #[error(transparent)]
    Svg(#[from] SvgError),
}

/// Convenience type alias for results using [`PatternError`].
pub type Result<T> = std::result::Result<T, PatternError>;
