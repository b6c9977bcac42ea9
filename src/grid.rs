// grid.rs - Cartesian grid of interrogation windows.
//
// Tiles an image with equally sized, equally spaced windows. The spacing
// between window origins on each axis is `floor(window * overlap)` pixels,
// and the block of windows is centred so the leftover margin is split
// evenly between both sides:
//
//   image width 100, window 20, overlap 0.5 -> step 10
//   count  = 1 + (100 - 20) / 10      = 9
//   offset = (100 - 20 - 10 * 8) / 2  = 0
//
// Windows are emitted row by row: the outer loop walks y, the inner loop x.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};

/// Generate the window rectangles covering an image of `image` size.
///
/// `overlap` is the fraction of the window size between consecutive window
/// origins and must lie in `[0, 1]` and round to at least one pixel on both
/// axes.
pub fn generate_cartesian_grid(image: Size, window: Size, overlap: f64) -> Result<Vec<Rect>> {
    if image.area() == 0 {
        return Err(Error::EmptyImage { size: image });
    }
    if window.area() == 0 {
        return Err(Error::EmptyWindow { size: window });
    }
    if !(0.0..=1.0).contains(&overlap) {
        return Err(Error::OverlapOutOfRange { overlap });
    }

    // Truncation, not rounding.
    let step_x = (window.width as f64 * overlap) as u32;
    let step_y = (window.height as f64 * overlap) as u32;
    if step_x == 0 || step_y == 0 {
        return Err(Error::ZeroOverlap { overlap, window });
    }
    if window.width > image.width || window.height > image.height {
        return Err(Error::WindowTooLarge { window, image });
    }

    let (cols, offset_x) = axis_layout(image.width, window.width, step_x);
    let (rows, offset_y) = axis_layout(image.height, window.height, step_y);

    let mut rects = Vec::with_capacity(cols as usize * rows as usize);
    for y in 0..rows {
        for x in 0..cols {
            let origin = Point::new(offset_x + x * step_x, offset_y + y * step_y);
            rects.push(Rect::new(origin, window));
        }
    }

    debug!(
        "grid: {} windows of {} over {} ({} x {}, step {}x{})",
        rects.len(),
        window,
        image,
        cols,
        rows,
        step_x,
        step_y,
    );
    Ok(rects)
}

/// Number of windows on one axis and the margin before the first one.
fn axis_layout(extent: u32, window: u32, step: u32) -> (u32, u32) {
    let count = 1 + (extent - window) / step;
    let offset = (extent - window - step * (count - 1)) / 2;
    (count, offset)
}

/// Interrogation window configuration.
///
/// Deserializable so it can sit inside a larger processing config:
///
/// ```json
/// { "window": { "width": 32, "height": 32 }, "overlap": 0.5 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    /// Window size in pixels.
    pub window: Size,
    /// Fraction of the window between consecutive window origins.
    #[serde(default = "default_overlap")]
    pub overlap: f64,
}

fn default_overlap() -> f64 {
    0.5
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            window: Size::new(32, 32),
            overlap: default_overlap(),
        }
    }
}

impl GridOptions {
    pub fn new(window: Size) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// Windows for an image of the given size.
    pub fn generate(&self, image: Size) -> Result<Vec<Rect>> {
        generate_cartesian_grid(image, self.window, self.overlap)
    }
}
