// expr.rs - Lazy per-pixel expression trees.
//
// `&a + &b * 2u8` does not compute anything. The operators in ops.rs build a
// tree of small `Copy` nodes that only hold constants and borrows:
//
//   BinaryNode<Plus,
//       RefNode<'a, G8>,                        -> a
//       BinaryNode<Times, RefNode<'b, G8>,      -> b
//                         ConstNode<G8>>>       -> 2
//
// The whole tree is one concrete type, so evaluating it at linear index i is
// a chain of inlined calls. `Image::assign` walks 0..width*height once and
// writes each result straight into the destination buffer: no intermediate
// images are allocated, whatever the depth of the tree.
//
// Every node of a tree produces the same pixel type. Mixing pixel types
// requires an explicit `.cast::<U>()`; anything else is a compile error.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Rem;

use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::image::{Image, ImageView};
use crate::pixel::{ConvertFrom, Pixel, CF, G16, G8, GF, Rgba16, Rgba8};

/// A lazily evaluated image: a pixel value for every linear index.
///
/// Leaves of different pixel types meet through `cast`, and `%` is only
/// available on integer grayscale:
///
/// ```
/// use piv_image::{Image, ImageExpression, G8, GF};
///
/// let a = Image::filled(2, 2, G8(7));
/// let b = Image::filled(2, 2, GF(0.5));
///
/// let sum = Image::from_expression(&b + a.as_expr().cast::<GF>()).unwrap();
/// assert!(sum.iter().all(|&v| v == GF(7.5)));
///
/// let rem = Image::from_expression(&a % 4u8).unwrap();
/// assert!(rem.iter().all(|&v| v == G8(3)));
/// ```
///
/// Without the cast, mixed pixel types are rejected:
///
/// ```compile_fail
/// use piv_image::{Image, G8, GF};
///
/// let a = Image::filled(2, 2, G8(7));
/// let b = Image::filled(2, 2, GF(0.5));
/// let _ = Image::from_expression(&a + &b);
/// ```
///
/// and so is `%` on float pixels:
///
/// ```compile_fail
/// use piv_image::{Image, GF};
///
/// let b = Image::filled(2, 2, GF(0.5));
/// let _ = Image::from_expression(&b % 2.0f32);
/// ```
pub trait ImageExpression: Copy {
    type Pixel: Pixel;

    /// Value at row-major linear index `index`.
    fn eval(&self, index: usize) -> Self::Pixel;

    /// Geometry implied by the image leaves of the tree.
    ///
    /// `Ok(None)` when the tree holds only constants, an error when two
    /// leaves disagree.
    fn size(&self) -> Result<Option<Size>>;

    /// Convert every value of this tree to pixel type `U`.
    fn cast<U>(self) -> CastNode<Self, U>
    where
        U: Pixel + ConvertFrom<Self::Pixel>,
    {
        CastNode {
            inner: self,
            _to: PhantomData,
        }
    }
}

/// Anything usable as an operand in an expression over pixel type `T`.
///
/// Images and views become `RefNode`s, scalars become `ConstNode`s
/// (converted to `T`), and nodes are passed through unchanged.
pub trait Operand<T: Pixel> {
    type Node: ImageExpression<Pixel = T>;

    fn into_node(self) -> Self::Node;
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// A per-pixel binary operation on `T`.
pub trait BinaryOperator<T> {
    const SYMBOL: &'static str;

    fn apply(lhs: T, rhs: T) -> T;
}

macro_rules! binary_operator {
    ($(#[$doc:meta])* $name:ident, $sym:literal, $op:tt $(, $($bound:tt)+)?) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl<T: Pixel $(+ $($bound)+)?> BinaryOperator<T> for $name {
            const SYMBOL: &'static str = $sym;

            #[inline(always)]
            fn apply(lhs: T, rhs: T) -> T {
                lhs $op rhs
            }
        }
    };
}

binary_operator!(/// `lhs + rhs`
    Plus, "+", +);
binary_operator!(/// `lhs - rhs`
    Minus, "-", -);
binary_operator!(/// `lhs * rhs`
    Times, "*", *);
binary_operator!(/// `lhs / rhs`
    Divide, "/", /);
binary_operator!(/// `lhs % rhs`, integer pixel types only.
    Modulo, "%", %, Rem<Output = T>);

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Leaf yielding the same value at every index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstNode<T>(pub T);

impl<T: Pixel> ImageExpression for ConstNode<T> {
    type Pixel = T;

    #[inline(always)]
    fn eval(&self, _index: usize) -> T {
        self.0
    }

    fn size(&self) -> Result<Option<Size>> {
        Ok(None)
    }
}

/// Leaf reading an image or view without copying it.
#[derive(Clone, Copy, Debug)]
pub struct RefNode<'a, T: Pixel> {
    view: ImageView<'a, T>,
}

impl<'a, T: Pixel> RefNode<'a, T> {
    pub fn new(view: ImageView<'a, T>) -> Self {
        RefNode { view }
    }
}

impl<'a, T: Pixel> ImageExpression for RefNode<'a, T> {
    type Pixel = T;

    #[inline(always)]
    fn eval(&self, index: usize) -> T {
        self.view.at(index)
    }

    fn size(&self) -> Result<Option<Size>> {
        Ok(Some(self.view.size()))
    }
}

/// Leaf standing for the destination of `Image::update`.
///
/// Reads go through `Cell`s, so the evaluator may write index `i` after
/// reading it while this leaf is still alive.
#[derive(Clone, Copy)]
pub struct SelfRef<'a, T> {
    cells: &'a [Cell<T>],
    size: Size,
}

impl<'a, T: Pixel> SelfRef<'a, T> {
    pub(crate) fn new(cells: &'a [Cell<T>], size: Size) -> Self {
        SelfRef { cells, size }
    }
}

impl<'a, T: Pixel> ImageExpression for SelfRef<'a, T> {
    type Pixel = T;

    #[inline(always)]
    fn eval(&self, index: usize) -> T {
        self.cells[index].get()
    }

    fn size(&self) -> Result<Option<Size>> {
        Ok(Some(self.size))
    }
}

impl<'a, T> fmt::Debug for SelfRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelfRef({})", self.size)
    }
}

/// Interior node applying operator `O` to the values of both children.
pub struct BinaryNode<O, L, R> {
    pub left: L,
    pub right: R,
    op: PhantomData<O>,
}

impl<O, L, R> BinaryNode<O, L, R> {
    #[inline]
    pub fn new(left: L, right: R) -> Self {
        BinaryNode {
            left,
            right,
            op: PhantomData,
        }
    }
}

// Manual impls: `O` is a marker and should not need to be `Clone`.
impl<O, L: Clone, R: Clone> Clone for BinaryNode<O, L, R> {
    fn clone(&self) -> Self {
        BinaryNode::new(self.left.clone(), self.right.clone())
    }
}

impl<O, L: Copy, R: Copy> Copy for BinaryNode<O, L, R> {}

impl<T, O, L, R> ImageExpression for BinaryNode<O, L, R>
where
    T: Pixel,
    O: BinaryOperator<T>,
    L: ImageExpression<Pixel = T>,
    R: ImageExpression<Pixel = T>,
{
    type Pixel = T;

    #[inline(always)]
    fn eval(&self, index: usize) -> T {
        O::apply(self.left.eval(index), self.right.eval(index))
    }

    fn size(&self) -> Result<Option<Size>> {
        match (self.left.size()?, self.right.size()?) {
            (Some(left), Some(right)) if left != right => {
                Err(Error::GeometryMismatch { left, right })
            }
            (Some(size), _) | (None, Some(size)) => Ok(Some(size)),
            (None, None) => Ok(None),
        }
    }
}

impl<O, L: fmt::Debug, R: fmt::Debug> fmt::Debug for BinaryNode<O, L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryNode")
            .field("op", &std::any::type_name::<O>())
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

/// Node converting the child's pixel values to `U`.
pub struct CastNode<E, U> {
    inner: E,
    _to: PhantomData<U>,
}

impl<E: Clone, U> Clone for CastNode<E, U> {
    fn clone(&self) -> Self {
        CastNode {
            inner: self.inner.clone(),
            _to: PhantomData,
        }
    }
}

impl<E: Copy, U> Copy for CastNode<E, U> {}

impl<E, U> ImageExpression for CastNode<E, U>
where
    E: ImageExpression,
    U: Pixel + ConvertFrom<E::Pixel>,
{
    type Pixel = U;

    #[inline(always)]
    fn eval(&self, index: usize) -> U {
        U::convert_from(self.inner.eval(index))
    }

    fn size(&self) -> Result<Option<Size>> {
        self.inner.size()
    }
}

impl<E: fmt::Debug, U> fmt::Debug for CastNode<E, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastNode")
            .field("to", &std::any::type_name::<U>())
            .field("inner", &self.inner)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Operand dispatch
// ---------------------------------------------------------------------------

impl<'a, T: Pixel> Operand<T> for &'a Image<T> {
    type Node = RefNode<'a, T>;

    #[inline]
    fn into_node(self) -> RefNode<'a, T> {
        RefNode::new(self.as_view())
    }
}

impl<'a, T: Pixel> Operand<T> for ImageView<'a, T> {
    type Node = RefNode<'a, T>;

    #[inline]
    fn into_node(self) -> RefNode<'a, T> {
        RefNode::new(self)
    }
}

impl<'a, 'b, T: Pixel> Operand<T> for &'b ImageView<'a, T> {
    type Node = RefNode<'a, T>;

    #[inline]
    fn into_node(self) -> RefNode<'a, T> {
        RefNode::new(*self)
    }
}

impl<T: Pixel> Operand<T> for ConstNode<T> {
    type Node = ConstNode<T>;

    #[inline]
    fn into_node(self) -> ConstNode<T> {
        self
    }
}

impl<'a, T: Pixel> Operand<T> for RefNode<'a, T> {
    type Node = RefNode<'a, T>;

    #[inline]
    fn into_node(self) -> RefNode<'a, T> {
        self
    }
}

impl<'a, T: Pixel> Operand<T> for SelfRef<'a, T> {
    type Node = SelfRef<'a, T>;

    #[inline]
    fn into_node(self) -> SelfRef<'a, T> {
        self
    }
}

impl<T, O, L, R> Operand<T> for BinaryNode<O, L, R>
where
    T: Pixel,
    O: BinaryOperator<T>,
    L: ImageExpression<Pixel = T>,
    R: ImageExpression<Pixel = T>,
{
    type Node = BinaryNode<O, L, R>;

    #[inline]
    fn into_node(self) -> Self {
        self
    }
}

impl<E, U> Operand<U> for CastNode<E, U>
where
    E: ImageExpression,
    U: Pixel + ConvertFrom<E::Pixel>,
{
    type Node = CastNode<E, U>;

    #[inline]
    fn into_node(self) -> Self {
        self
    }
}

// Scalars turn into constants of the expression's pixel type.
macro_rules! scalar_operand {
    ($($s:ty),*) => {$(
        impl<T: Pixel + ConvertFrom<$s>> Operand<T> for $s {
            type Node = ConstNode<T>;

            #[inline]
            fn into_node(self) -> ConstNode<T> {
                ConstNode(T::convert_from(self))
            }
        }
    )*};
}

scalar_operand!(u8, u16, u32, i32, f32, f64, G8, G16, GF, CF, Rgba8, Rgba16);
