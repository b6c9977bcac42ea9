// convert.rs - Whole-image pixel type conversions and channel split/join.
//
// Per-pixel conversion rules live on the pixel types (`ConvertFrom`). This
// module applies them to whole images and moves data between multi-channel
// pixels and one-image-per-channel layouts:
//
//   Image<CF>     <-> (Image<GF> re, Image<GF> im)
//   Image<Rgba8>   -> [Image<G8>; 4]
//   r, g, b       ->  Image<GF> luma (ITU-R BT.601)

use crate::error::{Error, Result};
use crate::image::{Image, PixelSource};
use crate::pixel::{bt601_luma, ConvertFrom, Intensity, Pixel, CF, G8, GF, Rgba8};

/// Generic conversion between any two convertible pixel types.
///
/// Monomorphized per (S, D) pair, so this is as fast as a hand-written
/// loop for the concrete types.
pub fn convert_image<S: Pixel, D: Pixel + ConvertFrom<S>>(src: &Image<S>) -> Image<D> {
    Image::convert_from(src)
}

/// Real and imaginary parts as two float images.
pub fn split_complex(src: &Image<CF>) -> (Image<GF>, Image<GF>) {
    let mut re = Image::new(src.width(), src.height());
    let mut im = Image::new(src.width(), src.height());
    for ((r, i), v) in re.iter_mut().zip(im.iter_mut()).zip(src.iter()) {
        *r = GF(v.re);
        *i = GF(v.im);
    }
    (re, im)
}

/// Complex image from its real and imaginary parts.
pub fn join_complex(re: &Image<GF>, im: &Image<GF>) -> Result<Image<CF>> {
    check_same_size(re, im)?;
    let mut out = Image::new(re.width(), re.height());
    for ((c, r), i) in out.iter_mut().zip(re.iter()).zip(im.iter()) {
        *c = CF::new(r.0, i.0);
    }
    Ok(out)
}

/// One grayscale image per channel, in r, g, b, a order.
pub fn split_rgba(src: &Image<Rgba8>) -> [Image<G8>; 4] {
    let (w, h) = (src.width(), src.height());
    let mut channels = [
        Image::new(w, h),
        Image::new(w, h),
        Image::new(w, h),
        Image::new(w, h),
    ];
    for (i, v) in src.iter().enumerate() {
        channels[0][i] = G8(v.r);
        channels[1][i] = G8(v.g);
        channels[2][i] = G8(v.b);
        channels[3][i] = G8(v.a);
    }
    channels
}

/// Grayscale from RGB stored as 3 separate channel images, e.g. the output
/// of `split_rgba`. Same weights as `Rgba8::luma`.
pub fn rgb_to_grayscale<T>(r: &Image<T>, g: &Image<T>, b: &Image<T>) -> Result<Image<GF>>
where
    T: Pixel + Intensity,
{
    check_same_size(r, g)?;
    check_same_size(r, b)?;

    let mut gray = Image::new(r.width(), r.height());
    for (i, px) in gray.iter_mut().enumerate() {
        *px = GF::from_f64(bt601_luma(r[i].to_f64(), g[i].to_f64(), b[i].to_f64()));
    }
    Ok(gray)
}

fn check_same_size<A, B>(a: &A, b: &B) -> Result<()>
where
    A: PixelSource + ?Sized,
    B: PixelSource + ?Sized,
{
    let (left, right) = (a.as_view().size(), b.as_view().size());
    if left != right {
        return Err(Error::GeometryMismatch { left, right });
    }
    Ok(())
}
