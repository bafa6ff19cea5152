// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Operator and formatting impls for [`FixedPoint`].

use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{FixedPoint, SignedStore, Store};

impl<S: Store, const FRAC: u32> Add for FixedPoint<S, FRAC> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.raw().wrapping_add(rhs.raw()))
    }
}

impl<S: Store, const FRAC: u32> Sub for FixedPoint<S, FRAC> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.raw().wrapping_sub(rhs.raw()))
    }
}

impl<S: Store, const FRAC: u32> Mul for FixedPoint<S, FRAC> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::from_raw(S::mul_floor(self.raw(), rhs.raw(), FRAC).0)
    }
}

impl<S: Store, const FRAC: u32> Div for FixedPoint<S, FRAC> {
    type Output = Self;

    /// Truncating division; quotient overflow wraps.
    ///
    /// # Panics
    /// Panics when `rhs` is zero. Use [`FixedPoint::checked_div`] to get a
    /// [`crate::MathError`] instead.
    #[allow(clippy::panic)]
    fn div(self, rhs: Self) -> Self {
        match S::div_trunc(self.raw(), rhs.raw(), FRAC) {
            Ok((raw, _)) => Self::from_raw(raw),
            Err(err) => panic!("FixedPoint: {err}"),
        }
    }
}

impl<S: SignedStore, const FRAC: u32> Neg for FixedPoint<S, FRAC> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::from_raw(self.raw().wrapping_neg())
    }
}

impl<S: Store, const FRAC: u32> AddAssign for FixedPoint<S, FRAC> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<S: Store, const FRAC: u32> SubAssign for FixedPoint<S, FRAC> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<S: Store, const FRAC: u32> MulAssign for FixedPoint<S, FRAC> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<S: Store, const FRAC: u32> DivAssign for FixedPoint<S, FRAC> {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<S: Store, const FRAC: u32> fmt::Debug for FixedPoint<S, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedPoint<{}, {FRAC}>({} raw={})", core::any::type_name::<S>(), self.to_f64(), self.raw())
    }
}

impl<S: Store, const FRAC: u32> fmt::Display for FixedPoint<S, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}
