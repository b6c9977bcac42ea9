// stats.rs - Whole-image reductions and fills.
//
// All reductions accept anything that reads as a view, so a sub-window can
// be measured without copying it out first.

use crate::image::{Image, PixelSource};
use crate::pixel::{Intensity, Pixel};

/// Smallest and largest pixel value, or `None` for an empty image.
///
/// Values that do not compare (float NaN) are skipped.
pub fn find_image_range<S>(src: &S) -> Option<(S::Pixel, S::Pixel)>
where
    S: PixelSource + ?Sized,
{
    let view = src.as_view();
    let mut pixels = view.iter().copied().filter(|v| v.partial_cmp(v).is_some());
    let first = pixels.next()?;
    Some(pixels.fold((first, first), |(lo, hi), v| {
        (if v < lo { v } else { lo }, if v > hi { v } else { hi })
    }))
}

/// Sum of all pixel values, accumulated in f64.
pub fn pixel_sum<S>(src: &S) -> f64
where
    S: PixelSource + ?Sized,
    S::Pixel: Intensity,
{
    src.as_view().iter().map(|v| v.to_f64()).sum()
}

/// Mean pixel value, or `None` for an empty image.
pub fn mean<S>(src: &S) -> Option<f64>
where
    S: PixelSource + ?Sized,
    S::Pixel: Intensity,
{
    let view = src.as_view();
    match view.pixel_count() {
        0 => None,
        n => Some(pixel_sum(&view) / n as f64),
    }
}

/// Set every pixel of `image` to `value`.
pub fn fill<T: Pixel>(image: &mut Image<T>, value: T) {
    image.data_mut().fill(value);
}
