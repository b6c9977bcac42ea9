// piv-image: generic pixel buffers and lazy per-pixel image arithmetic
//
// Building blocks for image-pair analysis (particle image velocimetry and
// similar measurement pipelines): an image container with inline storage
// for interrogation-window-sized images, borrowed views, a fused expression
// evaluator and the cartesian interrogation grid.
//
//   let c = Image::from_expression(&a * 2u8 + &b)?;   // one pass, no temporaries
//   a.update(|a| a - 1u8)?;                            // in place

pub mod error;
pub mod geometry;
pub mod pixel;
pub mod storage;
pub mod image;
pub mod expr;
pub mod ops;
pub mod grid;
pub mod stats;
pub mod convert;

pub use error::{Error, Result};
pub use expr::{ImageExpression, Operand};
pub use geometry::{Point, Rect, Size};
pub use grid::{generate_cartesian_grid, GridOptions};
pub use image::{Image, ImageView, PixelSource};
pub use pixel::{ConvertFrom, Intensity, Pixel, CF, G16, G8, GF, Rgba16, Rgba8};
