// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Column-major square matrices built from vector columns.
//!
//! `MatN` stores `N` column vectors, so every product is a sum of
//! column × scalar terms evaluated on the backend registers. Multiplication
//! follows column-vector convention: `a * b` applies `b` first, and
//! `m * v` transforms `v`.

use crate::element::Element;

/// Items shared by every matrix type. The type provides `determinant` and
/// `inverse`; everything else is written once here.
macro_rules! matrix_common {
    ($mat:ident, $vec:ident, $n:literal, $nn:literal) => {
        impl<T: Element, B: Lanes<T>> $mat<T, B> {
            /// Builds from column vectors.
            pub fn from_cols(cols: [$vec<T, B>; $n]) -> Self {
                Self { cols }
            }

            /// All entries zero.
            pub fn zero() -> Self {
                Self::from_cols([$vec::zero(); $n])
            }

            /// Diagonal matrix.
            pub fn from_diagonal(diagonal: $vec<T, B>) -> Self {
                let d = diagonal.to_array();
                Self::from_cols(core::array::from_fn(|c| {
                    let mut col = $vec::zero();
                    col[c] = d[c];
                    col
                }))
            }

            /// The identity matrix.
            pub fn identity() -> Self {
                Self::from_diagonal($vec::one())
            }

            /// Builds from column-major entries.
            pub fn from_cols_array(entries: [T; $nn]) -> Self {
                Self::from_cols(core::array::from_fn(|c| {
                    $vec::from_array(core::array::from_fn(|r| entries[c * $n + r]))
                }))
            }

            /// Entries in column-major order.
            pub fn to_cols_array(self) -> [T; $nn] {
                core::array::from_fn(|i| self.cols[i / $n][i % $n])
            }

            /// Column `index`.
            pub fn col(self, index: usize) -> $vec<T, B> {
                self.cols[index]
            }

            /// Row `index`.
            pub fn row(self, index: usize) -> $vec<T, B> {
                $vec::from_array(self.cols.map(|c| c[index]))
            }

            /// Swaps rows and columns.
            pub fn transpose(self) -> Self {
                Self::from_cols(core::array::from_fn(|i| self.row(i)))
            }

            /// `self * v`: the sum of columns weighted by the components of `v`.
            pub fn mul_vec(self, v: $vec<T, B>) -> $vec<T, B> {
                self.cols
                    .iter()
                    .zip(v.to_array())
                    .fold($vec::zero(), |acc, (col, s)| acc + *col * s)
            }

            /// `self * rhs` (column-major, `rhs` applied first).
            pub fn multiply(self, rhs: Self) -> Self {
                Self::from_cols(rhs.cols.map(|c| self.mul_vec(c)))
            }

            /// Same entries on another backend.
            pub fn with_backend<B2: Lanes<T>>(self) -> $mat<T, B2> {
                $mat::from_cols(self.cols.map(|c| c.with_backend()))
            }
        }

        impl<T: Element, B: Lanes<T>> Default for $mat<T, B> {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl<T: Element, B: Lanes<T>> fmt::Debug for $mat<T, B> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.cols.iter()).finish()
            }
        }

        impl<T: Element, B: Lanes<T>> PartialEq for $mat<T, B> {
            fn eq(&self, other: &Self) -> bool {
                self.cols.iter().zip(other.cols.iter()).all(|(a, b)| a == b)
            }
        }

        impl<T: Element, B: Lanes<T>> Index<usize> for $mat<T, B> {
            type Output = $vec<T, B>;
            fn index(&self, index: usize) -> &$vec<T, B> {
                &self.cols[index]
            }
        }

        impl<T: Element, B: Lanes<T>> IndexMut<usize> for $mat<T, B> {
            fn index_mut(&mut self, index: usize) -> &mut $vec<T, B> {
                &mut self.cols[index]
            }
        }

        impl<T: Element, B: Lanes<T>> Mul for $mat<T, B> {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                self.multiply(rhs)
            }
        }

        impl<T: Element, B: Lanes<T>> MulAssign for $mat<T, B> {
            fn mul_assign(&mut self, rhs: Self) {
                *self = self.multiply(rhs);
            }
        }

        impl<T: Element, B: Lanes<T>> Mul<$vec<T, B>> for $mat<T, B> {
            type Output = $vec<T, B>;
            fn mul(self, rhs: $vec<T, B>) -> $vec<T, B> {
                self.mul_vec(rhs)
            }
        }

        impl<T: Element, B: Lanes<T>> Mul<T> for $mat<T, B> {
            type Output = Self;
            fn mul(self, rhs: T) -> Self {
                Self::from_cols(self.cols.map(|c| c * rhs))
            }
        }

        impl<T: Element, B: Lanes<T>> Add for $mat<T, B> {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self::from_cols(core::array::from_fn(|i| self.cols[i] + rhs.cols[i]))
            }
        }

        impl<T: Element, B: Lanes<T>> Sub for $mat<T, B> {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self::from_cols(core::array::from_fn(|i| self.cols[i] - rhs.cols[i]))
            }
        }

        impl<T: Element, B: Lanes<T>> Neg for $mat<T, B> {
            type Output = Self;
            fn neg(self) -> Self {
                Self::from_cols(self.cols.map(|c| -c))
            }
        }
    };
}

mod mat2;
mod mat3;
mod mat4;

pub use mat2::Mat2;
pub use mat3::Mat3;
pub use mat4::Mat4;

/// `1 / det` with the determinant clamped away from zero (sign kept).
fn inverse_determinant<T: Element>(det: T) -> T {
    T::one() / det.clamp_divisor()
}
