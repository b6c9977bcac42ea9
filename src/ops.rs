// ops.rs - Arithmetic operators that build expression trees.
//
// Any expression-like value on the left (`&Image`, views, nodes) combines
// with any `Operand` of the same pixel type on the right:
//
//   &a + &b            BinaryNode<Plus, RefNode, RefNode>
//   &a * 2.0f32        BinaryNode<Times, RefNode, ConstNode>
//   (&a - &b) / &c     BinaryNode<Divide, BinaryNode<Minus, ..>, RefNode>
//
// A scalar on the left needs its own impls because a foreign type cannot
// take a generic right-hand side; those are generated per scalar type for
// every image and node form.
//
// `%` is only implemented when the pixel type has `Rem`, so `GF % GF` and
// friends do not compile.

use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::expr::{
    BinaryNode, BinaryOperator, CastNode, ConstNode, Divide, ImageExpression, Minus, Modulo,
    Operand, Plus, RefNode, SelfRef, Times,
};
use crate::image::{Image, ImageView};
use crate::pixel::{ConvertFrom, Pixel, CF, G16, G8, GF, Rgba16, Rgba8};

// One operator for one expression-like left-hand side.
macro_rules! expression_op {
    (
        [$($gen:tt)*] $lhs:ty, $px:ident, [$($bounds:tt)*],
        $tr:ident, $method:ident, $op:ty, [$($extra:tt)*]
    ) => {
        impl<$($gen)* Rhs> $tr<Rhs> for $lhs
        where
            Rhs: Operand<$px>,
            $($bounds)*
            $($extra)*
        {
            type Output = BinaryNode<$op, <$lhs as Operand<$px>>::Node, <Rhs as Operand<$px>>::Node>;

            #[inline]
            fn $method(self, rhs: Rhs) -> Self::Output {
                BinaryNode::new(
                    <$lhs as Operand<$px>>::into_node(self),
                    <Rhs as Operand<$px>>::into_node(rhs),
                )
            }
        }
    };
}

// All five operators for each listed left-hand side.
macro_rules! expression_ops {
    ($([$($gen:tt)*] $lhs:ty => $px:ident where [$($bounds:tt)*];)*) => {$(
        expression_op!([$($gen)*] $lhs, $px, [$($bounds)*], Add, add, Plus, []);
        expression_op!([$($gen)*] $lhs, $px, [$($bounds)*], Sub, sub, Minus, []);
        expression_op!([$($gen)*] $lhs, $px, [$($bounds)*], Mul, mul, Times, []);
        expression_op!([$($gen)*] $lhs, $px, [$($bounds)*], Div, div, Divide, []);
        expression_op!([$($gen)*] $lhs, $px, [$($bounds)*], Rem, rem, Modulo, [$px: Rem<Output = $px>,]);
    )*};
}

expression_ops! {
    ['a, T,] &'a Image<T> => T where [T: Pixel,];
    ['a, T,] ImageView<'a, T> => T where [T: Pixel,];
    ['a, 'b, T,] &'b ImageView<'a, T> => T where [T: Pixel,];
    ['a, T,] RefNode<'a, T> => T where [T: Pixel,];
    ['a, T,] SelfRef<'a, T> => T where [T: Pixel,];
    [T,] ConstNode<T> => T where [T: Pixel,];
    [O, L, R, T,] BinaryNode<O, L, R> => T where [
        T: Pixel,
        O: BinaryOperator<T>,
        L: ImageExpression<Pixel = T>,
        R: ImageExpression<Pixel = T>,
    ];
    [E, T,] CastNode<E, T> => T where [E: ImageExpression, T: Pixel + ConvertFrom<E::Pixel>,];
}

// One operator for a scalar left-hand side and one right-hand form.
macro_rules! scalar_op {
    (
        $s:ty, [$($gen:tt)*] $rhs:ty, [$($bounds:tt)*],
        $tr:ident, $method:ident, $op:ty, [$($extra:tt)*]
    ) => {
        impl<$($gen)* T> $tr<$rhs> for $s
        where
            T: Pixel + ConvertFrom<$s>,
            $($bounds)*
            $($extra)*
        {
            type Output = BinaryNode<$op, ConstNode<T>, <$rhs as Operand<T>>::Node>;

            #[inline]
            fn $method(self, rhs: $rhs) -> Self::Output {
                BinaryNode::new(
                    <$s as Operand<T>>::into_node(self),
                    <$rhs as Operand<T>>::into_node(rhs),
                )
            }
        }
    };
}

macro_rules! scalar_ops_for_rhs {
    ($s:ty, [$($gen:tt)*] $rhs:ty, [$($bounds:tt)*]) => {
        scalar_op!($s, [$($gen)*] $rhs, [$($bounds)*], Add, add, Plus, []);
        scalar_op!($s, [$($gen)*] $rhs, [$($bounds)*], Sub, sub, Minus, []);
        scalar_op!($s, [$($gen)*] $rhs, [$($bounds)*], Mul, mul, Times, []);
        scalar_op!($s, [$($gen)*] $rhs, [$($bounds)*], Div, div, Divide, []);
        scalar_op!($s, [$($gen)*] $rhs, [$($bounds)*], Rem, rem, Modulo, [T: Rem<Output = T>,]);
    };
}

macro_rules! scalar_lhs_ops {
    ($($s:ty),*) => {$(
        scalar_ops_for_rhs!($s, ['a,] &'a Image<T>, []);
        scalar_ops_for_rhs!($s, ['a,] ImageView<'a, T>, []);
        scalar_ops_for_rhs!($s, ['a, 'b,] &'b ImageView<'a, T>, []);
        scalar_ops_for_rhs!($s, ['a,] RefNode<'a, T>, []);
        scalar_ops_for_rhs!($s, ['a,] SelfRef<'a, T>, []);
        scalar_ops_for_rhs!($s, [O, L, R,] BinaryNode<O, L, R>, [
            O: BinaryOperator<T>,
            L: ImageExpression<Pixel = T>,
            R: ImageExpression<Pixel = T>,
        ]);
        scalar_ops_for_rhs!($s, [E,] CastNode<E, T>, [
            E: ImageExpression,
            T: ConvertFrom<E::Pixel>,
        ]);
    )*};
}

scalar_lhs_ops!(u8, u16, u32, i32, f32, f64, G8, G16, GF, CF, Rgba8, Rgba16);
