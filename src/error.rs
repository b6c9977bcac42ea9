// error.rs - Error type shared by the container, the evaluator and the grid.
//
// Geometry problems (bad rows, bad windows, leaves of different sizes) are
// values the caller can inspect. Type problems never get here: they are
// rejected by trait bounds at compile time.

use thiserror::Error;

use crate::geometry::{Rect, Size};

/// Errors reported by image, expression and grid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("line out of range ({line}, max is: {height})")]
    LineOutOfRange { line: u32, height: u32 },

    #[error("view {rect} exceeds source bounds [{}, {}]", .bounds.width, .bounds.height)]
    ViewOutOfBounds { rect: Rect, bounds: Size },

    #[error("data length ({actual}) must equal width * height ({expected})")]
    DataLength { expected: usize, actual: usize },

    #[error(
        "expression operands disagree in geometry: [{}, {}] vs [{}, {}]",
        .left.width, .left.height, .right.width, .right.height
    )]
    GeometryMismatch { left: Size, right: Size },

    #[error("image size must be non-zero (got [{}, {}])", .size.width, .size.height)]
    EmptyImage { size: Size },

    #[error("interrogation size must be non-zero (got [{}, {}])", .size.width, .size.height)]
    EmptyWindow { size: Size },

    #[error("overlap must be between 0.0 and 1.0 (got {overlap})")]
    OverlapOutOfRange { overlap: f64 },

    #[error(
        "overlap {overlap} of window [{}, {}] is zero pixels on at least one axis",
        .window.width, .window.height
    )]
    ZeroOverlap { overlap: f64, window: Size },

    #[error(
        "interrogation size [{}, {}] is bigger than image [{}, {}]",
        .window.width, .window.height, .image.width, .image.height
    )]
    WindowTooLarge { window: Size, image: Size },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
