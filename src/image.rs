// image.rs - Runtime-sized image container and borrowed views.
//
// Image<T> owns a row-major buffer of exactly width * height pixels held in
// a hybrid `Storage` (inline up to 32×32, heap beyond). There is no stride
// padding on the owning side: pixel (x, y) lives at linear index
// y * width + x.
//
// ImageView<'a, T> is a read-only rectangular window onto an Image (or onto
// another view). It borrows the parent's buffer and walks it with the
// parent's stride:
//
//   parent (width 6), view at (1, 1) size 3×2, stride 6
//
//   . . . . . .
//   . ■ ■ ■ . .      data slice starts at the first ■ and ends at the last
//   . ■ ■ ■ . .
//
// The borrow checker ties the view to the parent: the parent cannot be
// resized, written or dropped while a view of it is alive.
//
// Expression evaluation (`assign`, `update`) lives here too because it
// writes straight into the container's storage; the node types themselves
// are in expr.rs.

use std::cell::Cell;
use std::fmt;
use std::ops::{Index, IndexMut};

use log::trace;

use crate::error::{Error, Result};
use crate::expr::{ImageExpression, Operand, RefNode, SelfRef};
use crate::geometry::{Point, Rect, Size};
use crate::pixel::{ConvertFrom, Pixel};
use crate::storage::Storage;

/// Anything that can be read as an `ImageView`: images and views.
pub trait PixelSource {
    type Pixel: Pixel;

    fn as_view(&self) -> ImageView<'_, Self::Pixel>;
}

// ---------------------------------------------------------------------------
// Image<T>
// ---------------------------------------------------------------------------

/// A 2D image with runtime dimensions, generic over pixel type `T`.
#[derive(Clone)]
pub struct Image<T: Pixel> {
    width: u32,
    height: u32,
    storage: Storage<T>,
}

impl<T: Pixel> Default for Image<T> {
    /// Zero-area image.
    fn default() -> Self {
        Image {
            width: 0,
            height: 0,
            storage: Storage::default(),
        }
    }
}

impl<T: Pixel> Image<T> {
    // --- Constructors ---

    /// Image of `width × height` default (zero) pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Image of `width × height` pixels all set to `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let size = Size::new(width, height);
        Image {
            width,
            height,
            storage: Storage::filled(size.area(), value),
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    /// Image over an existing row-major pixel vector.
    ///
    /// `data` must hold exactly `width * height` elements.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = Size::new(width, height).area();
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Image {
            width,
            height,
            storage: Storage::from_vec(data),
        })
    }

    /// Materialize an expression into a new image.
    ///
    /// A tree made only of constants has no geometry and yields an empty
    /// image.
    pub fn from_expression<E: Operand<T>>(expr: E) -> Result<Self> {
        let mut image = Image::default();
        image.assign(expr)?;
        Ok(image)
    }

    /// Pixel-by-pixel conversion from an image or view of another type.
    pub fn convert_from<S>(src: &S) -> Self
    where
        S: PixelSource + ?Sized,
        T: ConvertFrom<S::Pixel>,
    {
        let mut image = Image::default();
        image.assign_converted(src);
        image
    }

    // --- Geometry ---

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// True while the pixels live in the inline buffer.
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }

    // --- Resizing ---

    /// Resize to `width × height`.
    ///
    /// A no-op when the geometry is unchanged. Otherwise destructive: pixel
    /// values afterwards are unspecified and must be written before being
    /// read.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.resize_impl(Size::new(width, height), None);
    }

    /// Resize to `width × height` and set every pixel to `value`.
    ///
    /// A no-op (pixels untouched) when the geometry is unchanged.
    pub fn resize_filled(&mut self, width: u32, height: u32, value: T) {
        self.resize_impl(Size::new(width, height), Some(value));
    }

    fn resize_impl(&mut self, size: Size, fill: Option<T>) {
        if size == self.size() {
            return;
        }
        self.width = size.width;
        self.height = size.height;
        self.storage.set_len(size.area(), fill);
    }

    // --- Pixel access ---

    /// Get the pixel value at (x, y).
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self[(x, y)]
    }

    /// Set the pixel at (x, y).
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        self[(x, y)] = value;
    }

    /// Raw row-major pixel buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Mutable raw row-major pixel buffer, e.g. for a decoder to fill after
    /// `resize`.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// The `width` pixels of row `y`.
    pub fn line(&self, y: u32) -> Result<&[T]> {
        let range = self.line_range(y)?;
        Ok(&self.data()[range])
    }

    /// Mutable access to the `width` pixels of row `y`.
    pub fn line_mut(&mut self, y: u32) -> Result<&mut [T]> {
        let range = self.line_range(y)?;
        Ok(&mut self.data_mut()[range])
    }

    fn line_range(&self, y: u32) -> Result<std::ops::Range<usize>> {
        if y >= self.height {
            return Err(Error::LineOutOfRange {
                line: y,
                height: self.height,
            });
        }
        let start = y as usize * self.width as usize;
        Ok(start..start + self.width as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data_mut().iter_mut()
    }

    /// Iterate over all pixels as `(x, y, value)` tuples.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, T)> + '_ {
        let w = self.width.max(1) as usize;
        self.data()
            .iter()
            .enumerate()
            .map(move |(i, &v)| ((i % w) as u32, (i / w) as u32, v))
    }

    // --- Views ---

    /// Borrow the whole image as a view.
    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            data: self.data(),
            width: self.width,
            height: self.height,
            stride: self.width as usize,
        }
    }

    /// Borrow a rectangular sub-region as an `ImageView`.
    pub fn view(&self, rect: Rect) -> Result<ImageView<'_, T>> {
        self.as_view().sub_view(rect)
    }

    /// The image as an expression leaf, e.g. to `.cast()` it.
    pub fn as_expr(&self) -> RefNode<'_, T> {
        RefNode::new(self.as_view())
    }

    // --- Bulk operations ---

    /// Resize to the source geometry and convert every pixel.
    pub fn assign_converted<S>(&mut self, src: &S) -> &mut Self
    where
        S: PixelSource + ?Sized,
        T: ConvertFrom<S::Pixel>,
    {
        let view = src.as_view();
        self.resize(view.width(), view.height());
        for (dst, &v) in self.data_mut().iter_mut().zip(view.iter()) {
            *dst = T::convert_from(v);
        }
        self
    }

    /// Evaluate an expression into this image in one fused pass.
    ///
    /// The image is resized to the geometry shared by the expression's image
    /// leaves; a tree of constants only keeps the current geometry. Leaves
    /// of different sizes are an error and leave the image untouched.
    pub fn assign<E: Operand<T>>(&mut self, expr: E) -> Result<&mut Self> {
        let node = expr.into_node();
        let size = node.size()?.unwrap_or_else(|| self.size());
        trace!("assign: evaluating {} into {}", std::any::type_name::<E::Node>(), self);
        self.resize(size.width, size.height);
        for (i, px) in self.data_mut().iter_mut().enumerate() {
            *px = node.eval(i);
        }
        Ok(self)
    }

    /// In-place evaluation of an expression that reads this image.
    ///
    /// `f` receives the image as an expression leaf and returns the tree to
    /// evaluate, e.g. `im.update(|this| this + G8(1))`. Each pixel is read
    /// before it is written and no pixel depends on another, so the result
    /// equals evaluating into a fresh buffer. Every other image leaf must
    /// have this image's geometry.
    pub fn update<'a, F, E>(&'a mut self, f: F) -> Result<()>
    where
        F: FnOnce(SelfRef<'a, T>) -> E,
        E: Operand<T>,
    {
        let size = self.size();
        let cells = Cell::from_mut(self.storage.as_mut_slice()).as_slice_of_cells();
        let node = f(SelfRef::new(cells, size)).into_node();
        if let Some(other) = node.size()? {
            if other != size {
                return Err(Error::GeometryMismatch { left: size, right: other });
            }
        }
        for (i, cell) in cells.iter().enumerate() {
            cell.set(node.eval(i));
        }
        Ok(())
    }

    /// Replace every pixel with `f(index, old_value)`.
    pub fn apply<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(usize, T) -> T,
    {
        for (i, px) in self.data_mut().iter_mut().enumerate() {
            *px = f(i, *px);
        }
        self
    }

    /// Exchange geometry and pixels with `other`.
    pub fn swap(&mut self, other: &mut Image<T>) {
        std::mem::swap(self, other);
    }

    // --- Internal helpers ---

    #[inline]
    fn linear_index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) out of bounds for image {}×{}",
            self.width,
            self.height,
        );
        y as usize * self.width as usize + x as usize
    }
}

impl<T: Pixel> PixelSource for Image<T> {
    type Pixel = T;

    fn as_view(&self) -> ImageView<'_, T> {
        Image::as_view(self)
    }
}

/// Equal iff same geometry and byte-identical buffers. No per-type fuzzy
/// comparison: `GF(NaN)` equals itself, `GF(0.0)` differs from `GF(-0.0)`.
impl<T: Pixel> PartialEq for Image<T> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && bytemuck::cast_slice::<T, u8>(self.data())
                == bytemuck::cast_slice::<T, u8>(other.data())
    }
}

impl<'a, T, U> From<&'a Image<U>> for Image<T>
where
    T: Pixel + ConvertFrom<U>,
    U: Pixel,
{
    fn from(src: &'a Image<U>) -> Self {
        Image::convert_from(src)
    }
}

impl<'a, T, U> From<ImageView<'a, U>> for Image<T>
where
    T: Pixel + ConvertFrom<U>,
    U: Pixel,
{
    fn from(src: ImageView<'a, U>) -> Self {
        Image::convert_from(&src)
    }
}

impl<T: Pixel> fmt::Display for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image<{}>[{}, {}]", T::NAME, self.width, self.height)
    }
}

// Debug formatting - useful for small images in tests.
impl<T: Pixel> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Image<{}> {{ {}×{}, {} }}",
            T::NAME,
            self.width,
            self.height,
            if self.is_inline() { "inline" } else { "heap" },
        )?;
        write_preview(f, &self.as_view())
    }
}

// ---------------------------------------------------------------------------
// Index / IndexMut - img[i], img[(x, y)], img[Point]
// ---------------------------------------------------------------------------

impl<T: Pixel> Index<usize> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data()[i]
    }
}

impl<T: Pixel> IndexMut<usize> for Image<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data_mut()[i]
    }
}

impl<T: Pixel> Index<(u32, u32)> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (u32, u32)) -> &T {
        let i = self.linear_index(x, y);
        &self.data()[i]
    }
}

impl<T: Pixel> IndexMut<(u32, u32)> for Image<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut T {
        let i = self.linear_index(x, y);
        &mut self.data_mut()[i]
    }
}

impl<T: Pixel> Index<Point> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, p: Point) -> &T {
        &self[(p.x, p.y)]
    }
}

impl<T: Pixel> IndexMut<Point> for Image<T> {
    #[inline]
    fn index_mut(&mut self, p: Point) -> &mut T {
        &mut self[(p.x, p.y)]
    }
}

// ---------------------------------------------------------------------------
// ImageView<'a, T> - Borrowed window onto an image
// ---------------------------------------------------------------------------

/// A borrowed, read-only view into a rectangular region of an `Image<T>`.
///
/// Indexing follows the image contract: linear index `y * width + x` and
/// `(x, y)` in the view's own coordinates.
#[derive(Clone, Copy)]
pub struct ImageView<'a, T: Pixel> {
    /// Parent buffer starting at the view's (0, 0) pixel.
    data: &'a [T],
    width: u32,
    height: u32,
    /// Elements between row starts in `data` (the parent's width).
    stride: usize,
}

impl<'a, T: Pixel> ImageView<'a, T> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.size().area()
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// True when rows follow each other without gaps.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width as usize || self.height <= 1
    }

    /// Pixel at row-major linear index `i` of the view.
    #[inline]
    pub fn at(&self, i: usize) -> T {
        let w = self.width as usize;
        if self.stride == w {
            self.data[i]
        } else {
            self.data[(i / w) * self.stride + i % w]
        }
    }

    /// Get the pixel at (x, y) within the view's coordinate system.
    ///
    /// # Panics
    /// Panics if (x, y) is outside the view.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self[(x, y)]
    }

    /// The `width` pixels of row `y`.
    pub fn line(&self, y: u32) -> Result<&'a [T]> {
        if y >= self.height {
            return Err(Error::LineOutOfRange {
                line: y,
                height: self.height,
            });
        }
        if self.width == 0 {
            return Ok(&self.data[..0]);
        }
        let start = y as usize * self.stride;
        Ok(&self.data[start..start + self.width as usize])
    }

    /// Iterate over the view's pixels in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        let (data, w, stride) = (self.data, self.width as usize, self.stride);
        let rows = if w == 0 { 0 } else { self.height as usize };
        (0..rows).flat_map(move |y| data[y * stride..y * stride + w].iter())
    }

    /// Iterate over all pixels in the view as `(x, y, value)`.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, T)> + 'a {
        let view = *self;
        (0..view.height).flat_map(move |y| (0..view.width).map(move |x| (x, y, view.get(x, y))))
    }

    /// A window onto this view; `rect` is in view coordinates.
    pub fn sub_view(&self, rect: Rect) -> Result<ImageView<'a, T>> {
        if !Rect::from_size(self.size()).contains(&rect) {
            return Err(Error::ViewOutOfBounds {
                rect,
                bounds: self.size(),
            });
        }
        let (x, y) = (rect.origin.x as usize, rect.origin.y as usize);
        let (w, h) = (rect.width() as usize, rect.height() as usize);
        // An empty window may sit on the far edge, past the end of `data`.
        if w == 0 || h == 0 {
            return Ok(ImageView {
                data: &self.data[..0],
                width: rect.width(),
                height: rect.height(),
                stride: self.stride,
            });
        }
        let start = y * self.stride + x;
        let end = (y + h - 1) * self.stride + x + w;
        Ok(ImageView {
            data: &self.data[start..end],
            width: rect.width(),
            height: rect.height(),
            stride: self.stride,
        })
    }

    /// The view as an expression leaf.
    pub fn as_expr(&self) -> RefNode<'a, T> {
        RefNode::new(*self)
    }

    /// Copy the view's pixels into a new owned image.
    pub fn to_owned_image(&self) -> Image<T> {
        let mut img = Image::new(self.width, self.height);
        for (dst, &v) in img.data_mut().iter_mut().zip(self.iter()) {
            *dst = v;
        }
        img
    }
}

impl<'a, T: Pixel> PixelSource for ImageView<'a, T> {
    type Pixel = T;

    fn as_view(&self) -> ImageView<'_, T> {
        *self
    }
}

impl<'a, T: Pixel> Index<usize> for ImageView<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        assert!(
            i < self.pixel_count(),
            "ImageView pixel {i} out of bounds for view {}×{}",
            self.width,
            self.height,
        );
        let w = self.width as usize;
        &self.data[(i / w) * self.stride + i % w]
    }
}

impl<'a, T: Pixel> Index<(u32, u32)> for ImageView<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (u32, u32)) -> &T {
        assert!(
            x < self.width && y < self.height,
            "ImageView pixel ({x},{y}) out of bounds for view {}×{}",
            self.width,
            self.height,
        );
        &self.data[y as usize * self.stride + x as usize]
    }
}

impl<'a, T: Pixel> fmt::Debug for ImageView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ImageView<{}> {{ {}×{}, stride={} }}",
            T::NAME,
            self.width,
            self.height,
            self.stride,
        )?;
        write_preview(f, self)
    }
}

fn write_preview<T: Pixel>(f: &mut fmt::Formatter<'_>, view: &ImageView<'_, T>) -> fmt::Result {
    for y in 0..view.height().min(8) {
        write!(f, "  row {y}: [")?;
        for x in 0..view.width().min(16) {
            if x > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", view.get(x, y))?;
        }
        if view.width() > 16 {
            write!(f, ", ...")?;
        }
        writeln!(f, "]")?;
    }
    if view.height() > 8 {
        writeln!(f, "  ...")?;
    }
    Ok(())
}
