// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-, three- and four-component vectors.
//!
//! Every vector is `#[repr(C, align(16))]` with named public fields padded
//! to four lanes. Pad lanes are always zero: every register read back into a
//! vector goes through `from_lanes`, which drops them. Reductions and
//! equality only look at the used lanes.

use crate::element::Element;
use crate::simd::Lanes;

/// A fixed-size value the [`crate::op`] layer can run lane-wise.
///
/// Implemented by [`Vec2`], [`Vec3`], [`Vec4`] and [`crate::Quat`].
pub trait Vector: Copy {
    /// Component type.
    type Elem: Element;
    /// Arithmetic backend.
    type Backend: Lanes<Self::Elem>;
    /// Number of meaningful lanes (the rest are zero padding).
    const LANES: usize;

    /// Loads the components into a backend register.
    fn to_reg(self) -> <Self::Backend as Lanes<Self::Elem>>::Reg;
    /// Reads the first [`Self::LANES`] lanes of a register; the rest are dropped.
    fn from_reg(reg: <Self::Backend as Lanes<Self::Elem>>::Reg) -> Self;
}

/// Items shared by every vector type. The type provides `new`, `lanes` and
/// `from_lanes`; everything else is written once here.
macro_rules! vector_common {
    ($name:ident, $n:literal, [$($idx:literal => $field:ident),+]) => {
        impl<T: Element, B: Lanes<T>> $name<T, B> {
            /// All components set to `value`.
            pub fn splat(value: T) -> Self {
                Self::from_array([value; $n])
            }

            /// All components zero.
            pub fn zero() -> Self {
                Self::splat(T::zero())
            }

            /// All components one.
            pub fn one() -> Self {
                Self::splat(T::one())
            }

            /// Builds from components in field order.
            pub fn from_array(array: [T; $n]) -> Self {
                let [$($field),+] = array;
                Self::new($($field),+)
            }

            /// Components in field order.
            pub fn to_array(self) -> [T; $n] {
                [$(self.$field),+]
            }

            /// Loads the components into a backend register.
            #[inline]
            pub fn to_reg(self) -> B::Reg {
                B::load(self.lanes())
            }

            /// Reads a register; pad lanes are dropped.
            #[inline]
            pub fn from_reg(reg: B::Reg) -> Self {
                Self::from_lanes(B::store(reg))
            }

            /// Same components on another backend.
            pub fn with_backend<B2: Lanes<T>>(self) -> $name<T, B2> {
                $name::new($(self.$field),+)
            }

            /// Converts every component to another element type.
            pub fn cast<U>(self) -> $name<U, B>
            where
                U: Element,
                T: ElementCast<U>,
                B: Lanes<U>,
            {
                $name::new($(self.$field.cast()),+)
            }

            /// Applies `f` to every component.
            pub fn map(self, f: impl Fn(T) -> T) -> Self {
                Self::new($(f(self.$field)),+)
            }

            /// See [`op::dot`].
            pub fn dot(self, rhs: Self) -> T {
                op::dot(self, rhs)
            }

            /// See [`op::length`].
            pub fn length(self) -> T {
                op::length(self)
            }

            /// See [`op::length_squared`].
            pub fn length_squared(self) -> T {
                op::length_squared(self)
            }

            /// See [`op::distance`].
            pub fn distance(self, rhs: Self) -> T {
                op::distance(self, rhs)
            }

            /// See [`op::normalize`].
            pub fn normalize(self) -> Self {
                op::normalize(self)
            }

            /// See [`op::lerp`].
            pub fn lerp(self, rhs: Self, t: T) -> Self {
                op::lerp(self, rhs, t)
            }

            /// See [`op::slerp`].
            pub fn slerp(self, rhs: Self, t: T) -> Self {
                op::slerp(self, rhs, t)
            }

            /// See [`op::move_towards`].
            pub fn move_towards(self, target: Self, max_delta: T) -> Self {
                op::move_towards(self, target, max_delta)
            }

            /// See [`op::abs`].
            pub fn abs(self) -> Self {
                op::abs(self)
            }

            /// See [`op::sign`].
            pub fn sign(self) -> Self {
                op::sign(self)
            }

            /// See [`op::floor`].
            pub fn floor(self) -> Self {
                op::floor(self)
            }

            /// See [`op::ceil`].
            pub fn ceil(self) -> Self {
                op::ceil(self)
            }

            /// See [`op::round`].
            pub fn round(self) -> Self {
                op::round(self)
            }

            /// See [`op::min`].
            pub fn min(self, rhs: Self) -> Self {
                op::min(self, rhs)
            }

            /// See [`op::max`].
            pub fn max(self, rhs: Self) -> Self {
                op::max(self, rhs)
            }

            /// See [`op::clamp`].
            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                op::clamp(self, lo, hi)
            }
        }

        impl<T: Element, B: Lanes<T>> Vector for $name<T, B> {
            type Elem = T;
            type Backend = B;
            const LANES: usize = $n;

            #[inline]
            fn to_reg(self) -> B::Reg {
                B::load(self.lanes())
            }

            #[inline]
            fn from_reg(reg: B::Reg) -> Self {
                Self::from_lanes(B::store(reg))
            }
        }

        impl<T: Element, B: Lanes<T>> Default for $name<T, B> {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl<T: Element, B: Lanes<T>> fmt::Debug for $name<T, B> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($field), &self.$field))+
                    .finish()
            }
        }

        impl<T: Element, B: Lanes<T>> PartialEq for $name<T, B> {
            fn eq(&self, other: &Self) -> bool {
                B::lanes_eq(self.to_reg(), other.to_reg(), $n)
            }
        }

        impl<T: Element, B: Lanes<T>> From<[T; $n]> for $name<T, B> {
            fn from(array: [T; $n]) -> Self {
                Self::from_array(array)
            }
        }

        impl<T: Element, B: Lanes<T>> From<$name<T, B>> for [T; $n] {
            fn from(v: $name<T, B>) -> Self {
                v.to_array()
            }
        }

        impl<T: Element, B: Lanes<T>> Index<usize> for $name<T, B> {
            type Output = T;

            #[allow(clippy::panic)]
            fn index(&self, index: usize) -> &T {
                match index {
                    $($idx => &self.$field,)+
                    _ => panic!("{} index out of range: {index}", stringify!($name)),
                }
            }
        }

        impl<T: Element, B: Lanes<T>> IndexMut<usize> for $name<T, B> {
            #[allow(clippy::panic)]
            fn index_mut(&mut self, index: usize) -> &mut T {
                match index {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{} index out of range: {index}", stringify!($name)),
                }
            }
        }

        impl<T: Element, B: Lanes<T>> Neg for $name<T, B> {
            type Output = Self;
            fn neg(self) -> Self {
                Self::from_reg(B::neg(self.to_reg()))
            }
        }

        vector_common!(@binary $name, Add, add, AddAssign, add_assign);
        vector_common!(@binary $name, Sub, sub, SubAssign, sub_assign);
        vector_common!(@binary $name, Mul, mul, MulAssign, mul_assign);
        vector_common!(@binary $name, Div, div, DivAssign, div_assign);
    };

    (@binary $name:ident, $trait:ident, $method:ident, $assign:ident, $assign_method:ident) => {
        impl<T: Element, B: Lanes<T>> $trait for $name<T, B> {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self::from_reg(B::$method(self.to_reg(), rhs.to_reg()))
            }
        }

        impl<T: Element, B: Lanes<T>> $trait<T> for $name<T, B> {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: T) -> Self {
                Self::from_reg(B::$method(self.to_reg(), B::splat(rhs)))
            }
        }

        impl<T: Element, B: Lanes<T>> $assign for $name<T, B> {
            fn $assign_method(&mut self, rhs: Self) {
                *self = $trait::$method(*self, rhs);
            }
        }

        impl<T: Element, B: Lanes<T>> $assign<T> for $name<T, B> {
            fn $assign_method(&mut self, rhs: T) {
                *self = $trait::$method(*self, rhs);
            }
        }
    };
}

mod vec2;
mod vec3;
mod vec4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fx32;
    use crate::simd::{DefaultBackend, ScalarBackend};

    #[test]
    fn pad_lanes_stay_zero_after_ops() {
        let a = Vec3::<f32, DefaultBackend>::new(1.0, 2.0, 3.0);
        let stepped: Vec3<f32, DefaultBackend> = crate::op::step(Vec3::zero(), a);
        assert_eq!(stepped.lanes()[3], 0.0);
        let q = Vec2::<f32, DefaultBackend>::new(1.0, 1.0) / Vec2::zero();
        assert_eq!(q.lanes()[2..], [0.0, 0.0]);
    }

    #[test]
    fn equality_is_tolerant_for_floats_and_exact_for_fixed() {
        let a = Vec3::<f32, ScalarBackend>::new(1.0, 2.0, 3.0);
        assert_eq!(a, Vec3::new(1.0, 2.000_002, 3.0));
        assert_ne!(a, Vec3::new(1.0, 2.001, 3.0));
        type F = Fx32<16>;
        let f = Vec3::<F, ScalarBackend>::new(F::from_raw(1), F::zero(), F::zero());
        assert_ne!(f, Vec3::zero());
    }

    #[test]
    fn operators_and_indexing() {
        let mut v = Vec4::<f64>::new(1.0, 2.0, 3.0, 4.0);
        v += Vec4::splat(1.0);
        v *= 2.0;
        assert_eq!(v.to_array(), [4.0, 6.0, 8.0, 10.0]);
        assert_eq!(v[3], 10.0);
        v[0] = -1.0;
        assert_eq!((-v).x, 1.0);
        assert_eq!((v / 2.0).y, 3.0);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn index_past_the_last_lane_panics() {
        let v = Vec3::<f32>::zero();
        let _ = v[3];
    }

    #[test]
    fn cast_and_with_backend_preserve_components() {
        let v = Vec2::<f32, DefaultBackend>::new(1.5, -2.25);
        let s: Vec2<f32, ScalarBackend> = v.with_backend();
        assert_eq!(s.to_array(), [1.5, -2.25]);
        let f: Vec2<Fx32<16>, ScalarBackend> = s.cast();
        assert_eq!(f.x.to_f64(), 1.5);
        assert_eq!(f.y.to_f64(), -2.25);
    }
}
