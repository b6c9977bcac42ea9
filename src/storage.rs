// storage.rs - Hybrid inline/heap pixel buffer.
//
// Most images handled by the toolchain are interrogation windows of a few
// hundred to a thousand pixels, so a buffer of up to `INLINE_CAPACITY`
// elements lives inside the owning `Image` with no heap allocation.
// Anything larger goes to a `Vec`.
//
//   len <= N   Storage::Inline { buf: [T; N], len }   (buf[len..] unused)
//   len >  N   Storage::Heap(Vec<T>)                  (vec.len() == len)
//
// The kind is reselected on every length change, so shrinking a large image
// back under the threshold moves it inline again.

use std::fmt;

use log::debug;

/// Number of pixels kept inline: one 32×32 interrogation window.
pub const INLINE_CAPACITY: usize = 32 * 32;

/// Pixel buffer that is inline up to `N` elements and heap-allocated beyond.
#[derive(Clone)]
pub enum Storage<T: Copy, const N: usize = INLINE_CAPACITY> {
    Inline { buf: [T; N], len: usize },
    Heap(Vec<T>),
}

impl<T: Copy + Default, const N: usize> Default for Storage<T, N> {
    fn default() -> Self {
        Storage::Inline {
            buf: [T::default(); N],
            len: 0,
        }
    }
}

impl<T: Copy + Default, const N: usize> Storage<T, N> {
    /// Storage of `len` elements, each set to `fill`.
    pub fn filled(len: usize, fill: T) -> Self {
        if len <= N {
            Storage::Inline {
                buf: [fill; N],
                len,
            }
        } else {
            Storage::Heap(vec![fill; len])
        }
    }

    /// Storage holding a copy of `data`.
    pub fn from_slice(data: &[T]) -> Self {
        let mut storage = Self::filled(data.len(), T::default());
        storage.as_mut_slice().copy_from_slice(data);
        storage
    }

    /// Take ownership of `data`; moved inline when it fits.
    pub fn from_vec(data: Vec<T>) -> Self {
        if data.len() <= N {
            Self::from_slice(&data)
        } else {
            Storage::Heap(data)
        }
    }

    /// Change the length to `len`, reselecting inline vs heap.
    ///
    /// With `fill == None` the element values afterwards are unspecified
    /// (in practice: whatever was there, or `T::default()`).
    pub fn set_len(&mut self, len: usize, fill: Option<T>) {
        match self {
            Storage::Inline { buf, len: cur } if len <= N => {
                *cur = len;
                if let Some(v) = fill {
                    buf[..len].fill(v);
                }
            }
            Storage::Heap(vec) if len > N => match fill {
                Some(v) => {
                    vec.clear();
                    vec.resize(len, v);
                }
                None => vec.resize(len, T::default()),
            },
            _ => {
                debug!(
                    "storage: {} -> {} elements, {} -> {}",
                    self.len(),
                    len,
                    self.kind(),
                    if len <= N { "inline" } else { "heap" },
                );
                *self = Self::filled(len, fill.unwrap_or_default());
            }
        }
    }
}

impl<T: Copy, const N: usize> Storage<T, N> {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Storage::Inline { len, .. } => *len,
            Storage::Heap(vec) => vec.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self, Storage::Inline { .. })
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Storage::Inline { buf, len } => &buf[..*len],
            Storage::Heap(vec) => vec,
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Storage::Inline { buf, len } => &mut buf[..*len],
            Storage::Heap(vec) => vec,
        }
    }

    fn kind(&self) -> &'static str {
        if self.is_inline() {
            "inline"
        } else {
            "heap"
        }
    }
}

impl<T: Copy, const N: usize> fmt::Debug for Storage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Storage::{}(len={}, capacity={N})", self.kind(), self.len())
    }
}
