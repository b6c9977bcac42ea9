// pixel.rs - The closed set of pixel value types.
//
//   G8, G16  integer grayscale      saturating + - * /, and %
//   GF       float grayscale        IEEE-754
//   CF       complex float          field arithmetic
//   Rgba8,   4-channel color        per-channel saturating + - * /
//   Rgba16
//
// Every pixel type is plain old data (`bytemuck::Pod`), which lets image
// equality compare raw bytes instead of going through `PartialEq`.
//
// Conversions are explicit through `ConvertFrom`. Single-channel values
// (the three grayscale types plus the primitive numeric scalars) all share
// the `Intensity` trait and convert through f64, clamping and rounding when
// the target is an integer type. A pair of types with no `ConvertFrom` impl
// is not convertible, and any attempt to mix them fails to compile.

use std::fmt;
use std::ops::{Add, Div, Mul, Rem, Sub};

use bytemuck::{Pod, Zeroable};

/// Trait for types that can serve as pixel values in an `Image`.
pub trait Pixel:
    Pod
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Short type tag, used when formatting images.
    const NAME: &'static str;
}

/// Total conversion from a pixel or scalar of type `U`.
///
/// Narrowing conversions clamp to the target range and round; they never
/// fail.
pub trait ConvertFrom<U>: Sized {
    fn convert_from(value: U) -> Self;
}

/// Single-channel real value: the grayscale pixels and primitive scalars.
pub trait Intensity: Copy {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

// ---------------------------------------------------------------------------
// Channel arithmetic
// ---------------------------------------------------------------------------

trait SaturatingChannel: Copy {
    fn sat_add(self, rhs: Self) -> Self;
    fn sat_sub(self, rhs: Self) -> Self;
    fn sat_mul(self, rhs: Self) -> Self;
    fn sat_div(self, rhs: Self) -> Self;
    fn sat_rem(self, rhs: Self) -> Self;
}

macro_rules! saturating_channel {
    ($($t:ty),*) => {$(
        impl SaturatingChannel for $t {
            #[inline]
            fn sat_add(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }
            #[inline]
            fn sat_sub(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }
            #[inline]
            fn sat_mul(self, rhs: Self) -> Self {
                self.saturating_mul(rhs)
            }
            // x / 0 saturates to MAX; 0 / 0 is 0.
            #[inline]
            fn sat_div(self, rhs: Self) -> Self {
                match self.checked_div(rhs) {
                    Some(v) => v,
                    None if self == 0 => 0,
                    None => <$t>::MAX,
                }
            }
            #[inline]
            fn sat_rem(self, rhs: Self) -> Self {
                self.checked_rem(rhs).unwrap_or(0)
            }
        }
    )*};
}

saturating_channel!(u8, u16);

// ---------------------------------------------------------------------------
// Grayscale
// ---------------------------------------------------------------------------

/// 8-bit integer grayscale pixel.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct G8(pub u8);

/// 16-bit integer grayscale pixel.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct G16(pub u16);

/// 32-bit float grayscale pixel.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Pod, Zeroable)]
pub struct GF(pub f32);

macro_rules! integer_gray {
    ($name:ident, $prim:ty, $tag:literal) => {
        impl $name {
            pub const MIN: $name = $name(<$prim>::MIN);
            pub const MAX: $name = $name(<$prim>::MAX);
        }

        impl Pixel for $name {
            const NAME: &'static str = $tag;
        }

        impl Add for $name {
            type Output = $name;
            #[inline]
            fn add(self, rhs: $name) -> $name {
                $name(self.0.sat_add(rhs.0))
            }
        }

        impl Sub for $name {
            type Output = $name;
            #[inline]
            fn sub(self, rhs: $name) -> $name {
                $name(self.0.sat_sub(rhs.0))
            }
        }

        impl Mul for $name {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                $name(self.0.sat_mul(rhs.0))
            }
        }

        impl Div for $name {
            type Output = $name;
            #[inline]
            fn div(self, rhs: $name) -> $name {
                $name(self.0.sat_div(rhs.0))
            }
        }

        impl Rem for $name {
            type Output = $name;
            #[inline]
            fn rem(self, rhs: $name) -> $name {
                $name(self.0.sat_rem(rhs.0))
            }
        }

        impl Intensity for $name {
            #[inline]
            fn to_f64(self) -> f64 {
                self.0 as f64
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                $name(<$prim>::from_f64(v))
            }
        }

        impl From<$prim> for $name {
            fn from(v: $prim) -> Self {
                $name(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_gray!(G8, u8, "g8");
integer_gray!(G16, u16, "g16");

impl Pixel for GF {
    const NAME: &'static str = "gf";
}

impl Add for GF {
    type Output = GF;
    #[inline]
    fn add(self, rhs: GF) -> GF {
        GF(self.0 + rhs.0)
    }
}

impl Sub for GF {
    type Output = GF;
    #[inline]
    fn sub(self, rhs: GF) -> GF {
        GF(self.0 - rhs.0)
    }
}

impl Mul for GF {
    type Output = GF;
    #[inline]
    fn mul(self, rhs: GF) -> GF {
        GF(self.0 * rhs.0)
    }
}

impl Div for GF {
    type Output = GF;
    #[inline]
    fn div(self, rhs: GF) -> GF {
        GF(self.0 / rhs.0)
    }
}

impl Intensity for GF {
    #[inline]
    fn to_f64(self) -> f64 {
        self.0 as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        GF(v as f32)
    }
}

impl From<f32> for GF {
    fn from(v: f32) -> Self {
        GF(v)
    }
}

impl fmt::Display for GF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Complex
// ---------------------------------------------------------------------------

/// Complex float pixel. Ordering is lexicographic on (re, im).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Pod, Zeroable)]
pub struct CF {
    pub re: f32,
    pub im: f32,
}

impl CF {
    pub const fn new(re: f32, im: f32) -> Self {
        CF { re, im }
    }

    /// Squared magnitude, re² + im².
    #[inline]
    pub fn norm_sqr(self) -> f32 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    pub fn conj(self) -> CF {
        CF::new(self.re, -self.im)
    }
}

impl Pixel for CF {
    const NAME: &'static str = "cf";
}

impl Add for CF {
    type Output = CF;
    #[inline]
    fn add(self, rhs: CF) -> CF {
        CF::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for CF {
    type Output = CF;
    #[inline]
    fn sub(self, rhs: CF) -> CF {
        CF::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for CF {
    type Output = CF;
    #[inline]
    fn mul(self, rhs: CF) -> CF {
        CF::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for CF {
    type Output = CF;
    #[inline]
    fn div(self, rhs: CF) -> CF {
        let d = rhs.norm_sqr();
        CF::new(
            (self.re * rhs.re + self.im * rhs.im) / d,
            (self.im * rhs.re - self.re * rhs.im) / d,
        )
    }
}

impl fmt::Display for CF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.re, self.im)
    }
}

// ---------------------------------------------------------------------------
// RGBA
// ---------------------------------------------------------------------------

/// ITU-R BT.601 luma: Y = 0.299*R + 0.587*G + 0.114*B
#[inline]
pub fn bt601_luma(r: f64, g: f64, b: f64) -> f64 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// 8-bit-per-channel RGBA pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// 16-bit-per-channel RGBA pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct Rgba16 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

macro_rules! rgba {
    ($name:ident, $prim:ty, $tag:literal) => {
        impl $name {
            pub const fn new(r: $prim, g: $prim, b: $prim, a: $prim) -> Self {
                $name { r, g, b, a }
            }

            /// ITU-R BT.601 luma of the color channels; alpha is ignored.
            pub fn luma(self) -> f64 {
                bt601_luma(self.r as f64, self.g as f64, self.b as f64)
            }

            #[inline]
            fn zip(self, rhs: Self, f: impl Fn($prim, $prim) -> $prim) -> Self {
                $name::new(f(self.r, rhs.r), f(self.g, rhs.g), f(self.b, rhs.b), f(self.a, rhs.a))
            }
        }

        impl Pixel for $name {
            const NAME: &'static str = $tag;
        }

        impl Add for $name {
            type Output = $name;
            #[inline]
            fn add(self, rhs: $name) -> $name {
                self.zip(rhs, <$prim>::sat_add)
            }
        }

        impl Sub for $name {
            type Output = $name;
            #[inline]
            fn sub(self, rhs: $name) -> $name {
                self.zip(rhs, <$prim>::sat_sub)
            }
        }

        impl Mul for $name {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                self.zip(rhs, <$prim>::sat_mul)
            }
        }

        impl Div for $name {
            type Output = $name;
            #[inline]
            fn div(self, rhs: $name) -> $name {
                self.zip(rhs, <$prim>::sat_div)
            }
        }

        impl ConvertFrom<$name> for $name {
            #[inline]
            fn convert_from(value: $name) -> Self {
                value
            }
        }

        impl<T: Intensity> ConvertFrom<$name> for T {
            #[inline]
            fn convert_from(value: $name) -> Self {
                T::from_f64(value.luma())
            }
        }

        // Gray replicated into r, g, b; fully opaque.
        impl<U: Intensity> ConvertFrom<U> for $name {
            #[inline]
            fn convert_from(value: U) -> Self {
                let c = <$prim>::from_f64(value.to_f64());
                $name::new(c, c, c, <$prim>::MAX)
            }
        }
    };
}

rgba!(Rgba8, u8, "rgba8");
rgba!(Rgba16, u16, "rgba16");

impl ConvertFrom<Rgba8> for Rgba16 {
    fn convert_from(v: Rgba8) -> Self {
        Rgba16::new(v.r as u16, v.g as u16, v.b as u16, v.a as u16)
    }
}

impl ConvertFrom<Rgba16> for Rgba8 {
    fn convert_from(v: Rgba16) -> Self {
        let c = |x: u16| x.min(u8::MAX as u16) as u8;
        Rgba8::new(c(v.r), c(v.g), c(v.b), c(v.a))
    }
}

// ---------------------------------------------------------------------------
// Scalars and conversions
// ---------------------------------------------------------------------------

macro_rules! integer_intensity {
    ($($t:ty),*) => {$(
        impl Intensity for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                v.clamp(<$t>::MIN as f64, <$t>::MAX as f64).round() as $t
            }
        }
    )*};
}

integer_intensity!(u8, u16, u32, i32);

impl Intensity for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Intensity for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl<U: Intensity, T: Intensity> ConvertFrom<U> for T {
    #[inline]
    fn convert_from(value: U) -> Self {
        T::from_f64(value.to_f64())
    }
}

impl<U: Intensity> ConvertFrom<U> for CF {
    #[inline]
    fn convert_from(value: U) -> Self {
        CF::new(value.to_f64() as f32, 0.0)
    }
}

impl ConvertFrom<CF> for CF {
    #[inline]
    fn convert_from(value: CF) -> Self {
        value
    }
}
