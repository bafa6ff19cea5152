// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Portable unsigned 128-bit integer used as a promotion target.
//!
//! `WideUint128` exists so that 64-bit fixed-point multiply/divide never
//! overflows silently: products and shifted dividends are formed at 128 bits
//! and only then narrowed back to the store width.
//!
//! The type keeps two explicit `u64` limbs and implements every operator with
//! limb-level algorithms (carry/borrow propagation, schoolbook multiply,
//! binary long division). Native `u128` implements the same [`Wide`] surface;
//! the `native-u128` feature selects it for the fixed-point path.
//!
//! Semantics: all arithmetic wraps modulo 2^128. Shifts by 128 or more bits
//! yield zero. Division by zero is reported by the `checked_*` family and
//! panics through the operators, exactly like primitive integers.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::error::MathError;

const LOW_HALF: u64 = 0xFFFF_FFFF;
const TOP_BIT: u64 = 1 << 63;

/// Unsigned 128-bit integer stored as a `(lo, hi)` limb pair.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WideUint128 {
    lo: u64,
    hi: u64,
}

impl WideUint128 {
    /// Zero.
    pub const ZERO: Self = Self { lo: 0, hi: 0 };
    /// One.
    pub const ONE: Self = Self { lo: 1, hi: 0 };
    /// 2^128 − 1.
    pub const MAX: Self = Self {
        lo: u64::MAX,
        hi: u64::MAX,
    };
    /// Bit width.
    pub const BITS: u32 = 128;

    /// Builds a value from its low and high limbs.
    pub const fn from_parts(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }

    /// Widens a 64-bit value (high limb = 0).
    pub const fn from_u64(value: u64) -> Self {
        Self { lo: value, hi: 0 }
    }

    /// Low 64 bits.
    pub const fn lo(self) -> u64 {
        self.lo
    }

    /// High 64 bits.
    pub const fn hi(self) -> u64 {
        self.hi
    }

    /// Returns `true` when both limbs are zero.
    pub const fn is_zero(self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// Full 64×64→128 product.
    ///
    /// Each operand is split into 32-bit halves; the four partial products fit
    /// in `u64` and are accumulated with explicit carry resolution.
    pub const fn widening_mul(a: u64, b: u64) -> Self {
        let a0 = a & LOW_HALF;
        let a1 = a >> 32;
        let b0 = b & LOW_HALF;
        let b1 = b >> 32;

        let p00 = a0 * b0;
        let p01 = a0 * b1;
        let p10 = a1 * b0;
        let p11 = a1 * b1;

        // At most three 32-bit quantities: cannot exceed 34 bits.
        let mid = (p00 >> 32) + (p01 & LOW_HALF) + (p10 & LOW_HALF);
        let lo = (mid << 32) | (p00 & LOW_HALF);
        let hi = p11 + (p01 >> 32) + (p10 >> 32) + (mid >> 32);
        Self { lo, hi }
    }

    /// Addition with the carry out of bit 127.
    pub const fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let (lo, carry) = self.lo.overflowing_add(rhs.lo);
        let (hi, c1) = self.hi.overflowing_add(rhs.hi);
        let (hi, c2) = hi.overflowing_add(carry as u64);
        (Self { lo, hi }, c1 || c2)
    }

    /// Subtraction with the borrow out of bit 127.
    pub const fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
        let (lo, borrow) = self.lo.overflowing_sub(rhs.lo);
        let (hi, b1) = self.hi.overflowing_sub(rhs.hi);
        let (hi, b2) = hi.overflowing_sub(borrow as u64);
        (Self { lo, hi }, b1 || b2)
    }

    /// Addition modulo 2^128.
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Subtraction modulo 2^128.
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    /// Multiplication modulo 2^128.
    ///
    /// The low limbs form a full 128-bit product; the cross terms only reach
    /// the high limb, and `hi × hi` lies entirely above bit 127.
    pub const fn wrapping_mul(self, rhs: Self) -> Self {
        let base = Self::widening_mul(self.lo, rhs.lo);
        let cross = self
            .lo
            .wrapping_mul(rhs.hi)
            .wrapping_add(self.hi.wrapping_mul(rhs.lo));
        Self {
            lo: base.lo,
            hi: base.hi.wrapping_add(cross),
        }
    }

    /// Logical left shift; shifting by 128 or more yields zero.
    pub const fn shl_bits(self, n: u32) -> Self {
        if n == 0 {
            self
        } else if n >= 128 {
            Self::ZERO
        } else if n >= 64 {
            Self {
                lo: 0,
                hi: self.lo << (n - 64),
            }
        } else {
            Self {
                lo: self.lo << n,
                hi: (self.hi << n) | (self.lo >> (64 - n)),
            }
        }
    }

    /// Logical right shift; shifting by 128 or more yields zero.
    pub const fn shr_bits(self, n: u32) -> Self {
        if n == 0 {
            self
        } else if n >= 128 {
            Self::ZERO
        } else if n >= 64 {
            Self {
                lo: self.hi >> (n - 64),
                hi: 0,
            }
        } else {
            Self {
                lo: (self.lo >> n) | (self.hi << (64 - n)),
                hi: self.hi >> n,
            }
        }
    }

    /// Number of leading zero bits.
    pub const fn leading_zeros(self) -> u32 {
        if self.hi == 0 {
            64 + self.lo.leading_zeros()
        } else {
            self.hi.leading_zeros()
        }
    }

    /// Number of set bits.
    pub const fn count_ones(self) -> u32 {
        self.lo.count_ones() + self.hi.count_ones()
    }

    /// Returns bit `n` (0 = least significant). Bits past 127 read as zero.
    pub const fn bit(self, n: u32) -> bool {
        if n >= 128 {
            false
        } else if n >= 64 {
            (self.hi >> (n - 64)) & 1 == 1
        } else {
            (self.lo >> n) & 1 == 1
        }
    }

    const fn with_bit(self, n: u32) -> Self {
        if n >= 64 {
            Self {
                lo: self.lo,
                hi: self.hi | (1 << (n - 64)),
            }
        } else {
            Self {
                lo: self.lo | (1 << n),
                hi: self.hi,
            }
        }
    }

    /// Quotient and remainder by binary long division.
    ///
    /// The divisor is doubled until it passes the dividend (or reaches bit
    /// 127), then the shift count walks back down to zero; each position where
    /// the shifted divisor fits under the running remainder contributes one
    /// quotient bit.
    pub fn div_rem(self, divisor: Self) -> Result<(Self, Self), MathError> {
        if divisor.is_zero() {
            tracing::trace!(dividend = %self, "WideUint128 division by zero");
            return Err(MathError::DivisionByZero);
        }
        if divisor == Self::ONE {
            return Ok((self, Self::ZERO));
        }
        if self == divisor {
            return Ok((Self::ONE, Self::ZERO));
        }
        if self < divisor {
            return Ok((Self::ZERO, self));
        }

        let mut shifted = divisor;
        let mut shift = 0_u32;
        while shifted < self && shifted.hi & TOP_BIT == 0 {
            shifted = shifted.shl_bits(1);
            shift += 1;
        }

        let mut remainder = self;
        let mut quotient = Self::ZERO;
        loop {
            if remainder >= shifted {
                remainder = remainder.wrapping_sub(shifted);
                quotient = quotient.with_bit(shift);
            }
            if shift == 0 {
                break;
            }
            shifted = shifted.shr_bits(1);
            shift -= 1;
        }
        Ok((quotient, remainder))
    }

    /// Checked quotient.
    pub fn checked_div(self, divisor: Self) -> Result<Self, MathError> {
        self.div_rem(divisor).map(|(q, _)| q)
    }

    /// Checked remainder.
    pub fn checked_rem(self, divisor: Self) -> Result<Self, MathError> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// 128-by-64 division returning a 64-bit remainder.
    ///
    /// The high limb divides natively; the low limb is folded in one bit at a
    /// time against a `u64` remainder, which is cheaper than a full 128-by-128
    /// long division. Used by 64-bit fixed-point division.
    pub fn div_rem_u64(self, divisor: u64) -> Result<(Self, u64), MathError> {
        if divisor == 0 {
            tracing::trace!(dividend = %self, "WideUint128 division by zero");
            return Err(MathError::DivisionByZero);
        }
        if self.hi == 0 {
            return Ok((Self::from_u64(self.lo / divisor), self.lo % divisor));
        }

        let q_hi = self.hi / divisor;
        let mut rem = self.hi % divisor;
        let mut q_lo = 0_u64;
        for i in (0..64).rev() {
            let carry = rem & TOP_BIT != 0;
            rem = (rem << 1) | ((self.lo >> i) & 1);
            q_lo <<= 1;
            // With a carry the true remainder is ≥ 2^64 > divisor.
            if carry || rem >= divisor {
                rem = rem.wrapping_sub(divisor);
                q_lo |= 1;
            }
        }
        Ok((Self { lo: q_lo, hi: q_hi }, rem))
    }
}

impl PartialOrd for WideUint128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WideUint128 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hi.cmp(&other.hi).then(self.lo.cmp(&other.lo))
    }
}

impl From<u64> for WideUint128 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u32> for WideUint128 {
    fn from(value: u32) -> Self {
        Self::from_u64(u64::from(value))
    }
}

impl From<u128> for WideUint128 {
    // Masked halves of a u128: truncation is the intent.
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: u128) -> Self {
        Self {
            lo: value as u64,
            hi: (value >> 64) as u64,
        }
    }
}

impl From<WideUint128> for u128 {
    fn from(value: WideUint128) -> Self {
        (u128::from(value.hi) << 64) | u128::from(value.lo)
    }
}

impl fmt::Debug for WideUint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideUint128 {{ lo: {:#018x}, hi: {:#018x} }}", self.lo, self.hi)
    }
}

impl fmt::Display for WideUint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&u128::from(*self), f)
    }
}

impl fmt::LowerHex for WideUint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&u128::from(*self), f)
    }
}

impl Add for WideUint128 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl Sub for WideUint128 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl Mul for WideUint128 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}

impl Div for WideUint128 {
    type Output = Self;

    /// # Panics
    /// Panics when `rhs` is zero, like primitive integer division.
    #[allow(clippy::panic)]
    fn div(self, rhs: Self) -> Self {
        match self.div_rem(rhs) {
            Ok((q, _)) => q,
            Err(err) => panic!("WideUint128: {err}"),
        }
    }
}

impl Rem for WideUint128 {
    type Output = Self;

    /// # Panics
    /// Panics when `rhs` is zero, like primitive integer remainder.
    #[allow(clippy::panic)]
    fn rem(self, rhs: Self) -> Self {
        match self.div_rem(rhs) {
            Ok((_, r)) => r,
            Err(err) => panic!("WideUint128: {err}"),
        }
    }
}

impl Shl<u32> for WideUint128 {
    type Output = Self;
    fn shl(self, n: u32) -> Self {
        self.shl_bits(n)
    }
}

impl Shr<u32> for WideUint128 {
    type Output = Self;
    fn shr(self, n: u32) -> Self {
        self.shr_bits(n)
    }
}

impl BitAnd for WideUint128 {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self {
            lo: self.lo & rhs.lo,
            hi: self.hi & rhs.hi,
        }
    }
}

impl BitOr for WideUint128 {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            lo: self.lo | rhs.lo,
            hi: self.hi | rhs.hi,
        }
    }
}

impl BitXor for WideUint128 {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            lo: self.lo ^ rhs.lo,
            hi: self.hi ^ rhs.hi,
        }
    }
}

impl Not for WideUint128 {
    type Output = Self;
    fn not(self) -> Self {
        Self {
            lo: !self.lo,
            hi: !self.hi,
        }
    }
}

macro_rules! forward_assign {
    ($($trait:ident :: $method:ident => $op:ident :: $op_method:ident, $rhs:ty);* $(;)?) => {
        $(
            impl $trait<$rhs> for WideUint128 {
                fn $method(&mut self, rhs: $rhs) {
                    *self = $op::$op_method(*self, rhs);
                }
            }
        )*
    };
}

forward_assign! {
    AddAssign::add_assign => Add::add, Self;
    SubAssign::sub_assign => Sub::sub, Self;
    MulAssign::mul_assign => Mul::mul, Self;
    DivAssign::div_assign => Div::div, Self;
    RemAssign::rem_assign => Rem::rem, Self;
    ShlAssign::shl_assign => Shl::shl, u32;
    ShrAssign::shr_assign => Shr::shr, u32;
    BitAndAssign::bitand_assign => BitAnd::bitand, Self;
    BitOrAssign::bitor_assign => BitOr::bitor, Self;
    BitXorAssign::bitxor_assign => BitXor::bitxor, Self;
}

/// The 128-bit operations needed by the 64-bit fixed-point path.
///
/// Implemented by the limb-pair [`WideUint128`] and by native `u128`; both
/// produce identical results, which the test suite checks directly.
pub trait Wide: Copy + Ord + fmt::Debug {
    /// Full 64×64→128 product.
    fn widening_mul(a: u64, b: u64) -> Self;
    /// Builds a value from its limbs.
    fn from_parts(lo: u64, hi: u64) -> Self;
    /// Low 64 bits.
    fn low(self) -> u64;
    /// High 64 bits.
    fn high(self) -> u64;
    /// Logical left shift (`n < 128`).
    fn shl(self, n: u32) -> Self;
    /// Logical right shift (`n < 128`).
    fn shr(self, n: u32) -> Self;
    /// Wrapping addition of a 64-bit value.
    fn add_u64(self, value: u64) -> Self;
    /// 128-by-64 division with a 64-bit remainder.
    fn div_rem_u64(self, divisor: u64) -> Result<(Self, u64), MathError>;
}

impl Wide for WideUint128 {
    fn widening_mul(a: u64, b: u64) -> Self {
        Self::widening_mul(a, b)
    }
    fn from_parts(lo: u64, hi: u64) -> Self {
        Self::from_parts(lo, hi)
    }
    fn low(self) -> u64 {
        self.lo
    }
    fn high(self) -> u64 {
        self.hi
    }
    fn shl(self, n: u32) -> Self {
        self.shl_bits(n)
    }
    fn shr(self, n: u32) -> Self {
        self.shr_bits(n)
    }
    fn add_u64(self, value: u64) -> Self {
        self.wrapping_add(Self::from_u64(value))
    }
    fn div_rem_u64(self, divisor: u64) -> Result<(Self, u64), MathError> {
        Self::div_rem_u64(self, divisor)
    }
}

impl Wide for u128 {
    fn widening_mul(a: u64, b: u64) -> Self {
        u128::from(a) * u128::from(b)
    }
    fn from_parts(lo: u64, hi: u64) -> Self {
        (u128::from(hi) << 64) | u128::from(lo)
    }
    #[allow(clippy::cast_possible_truncation)]
    fn low(self) -> u64 {
        self as u64
    }
    #[allow(clippy::cast_possible_truncation)]
    fn high(self) -> u64 {
        (self >> 64) as u64
    }
    fn shl(self, n: u32) -> Self {
        self << n
    }
    fn shr(self, n: u32) -> Self {
        self >> n
    }
    fn add_u64(self, value: u64) -> Self {
        self.wrapping_add(u128::from(value))
    }
    fn div_rem_u64(self, divisor: u64) -> Result<(Self, u64), MathError> {
        if divisor == 0 {
            tracing::trace!(dividend = %self, "u128 division by zero");
            return Err(MathError::DivisionByZero);
        }
        let d = u128::from(divisor);
        // The remainder is strictly below a 64-bit divisor.
        #[allow(clippy::cast_possible_truncation)]
        let rem = (self % d) as u64;
        Ok((self / d, rem))
    }
}

/// The wide type the 64-bit fixed-point store is compiled against.
#[cfg(not(feature = "native-u128"))]
pub type FixedWide = WideUint128;

/// The wide type the 64-bit fixed-point store is compiled against.
#[cfg(feature = "native-u128")]
pub type FixedWide = u128;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const BOUNDARY: [u128; 9] = [
        0,
        1,
        2,
        u64::MAX as u128,
        (u64::MAX as u128) + 1,
        1 << 127,
        (1 << 127) - 1,
        u128::MAX - 1,
        u128::MAX,
    ];

    fn w(v: u128) -> WideUint128 {
        WideUint128::from(v)
    }

    #[test]
    fn widening_mul_example_from_carry_chain() {
        let a = WideUint128::from_parts(0xFFFF_FFFF_FFFF_FFFF, 1);
        let b = WideUint128::from_u64(2);
        assert_eq!(a * b, WideUint128::from_parts(0xFFFF_FFFF_FFFF_FFFE, 3));
    }

    #[test]
    fn widening_mul_max_operands() {
        let p = WideUint128::widening_mul(u64::MAX, u64::MAX);
        assert_eq!(u128::from(p), u128::from(u64::MAX) * u128::from(u64::MAX));
    }

    #[test]
    fn boundary_arithmetic_matches_native() {
        for &a in &BOUNDARY {
            for &b in &BOUNDARY {
                assert_eq!(u128::from(w(a) + w(b)), a.wrapping_add(b), "{a} + {b}");
                assert_eq!(u128::from(w(a) - w(b)), a.wrapping_sub(b), "{a} - {b}");
                assert_eq!(u128::from(w(a) * w(b)), a.wrapping_mul(b), "{a} * {b}");
                assert_eq!(w(a).cmp(&w(b)), a.cmp(&b), "{a} cmp {b}");
                if b != 0 {
                    let (q, r) = w(a).div_rem(w(b)).unwrap();
                    assert_eq!(u128::from(q), a / b, "{a} / {b}");
                    assert_eq!(u128::from(r), a % b, "{a} % {b}");
                    assert_eq!(q * w(b) + r, w(a));
                }
            }
        }
    }

    #[test]
    fn shifts_carry_across_limbs() {
        let v = w(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
        for n in [0_u32, 1, 4, 31, 32, 63, 64, 65, 100, 127] {
            assert_eq!(u128::from(v << n), u128::from(v) << n, "shl {n}");
            assert_eq!(u128::from(v >> n), u128::from(v) >> n, "shr {n}");
        }
        assert_eq!(v << 128, WideUint128::ZERO);
        assert_eq!(v >> 200, WideUint128::ZERO);
    }

    #[test]
    fn bitwise_ops_are_limb_wise() {
        let a = w(0xF0F0_0000_0000_0000_0000_0000_0000_FFFF);
        let b = w(0x0FF0_0000_0000_0000_0000_0000_0000_F0F0);
        assert_eq!(u128::from(a & b), u128::from(a) & u128::from(b));
        assert_eq!(u128::from(a | b), u128::from(a) | u128::from(b));
        assert_eq!(u128::from(a ^ b), u128::from(a) ^ u128::from(b));
        assert_eq!(u128::from(!a), !u128::from(a));
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(
            WideUint128::ONE.checked_div(WideUint128::ZERO),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            WideUint128::MAX.div_rem_u64(0),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn division_operator_panics_on_zero() {
        let _ = WideUint128::ONE / WideUint128::ZERO;
    }

    #[test]
    fn short_circuits_hold() {
        let a = w(987_654_321_987_654_321_987_654_321);
        assert_eq!(a.div_rem(WideUint128::ONE).unwrap(), (a, WideUint128::ZERO));
        assert_eq!(a.div_rem(a).unwrap(), (WideUint128::ONE, WideUint128::ZERO));
        assert_eq!(
            WideUint128::ONE.div_rem(a).unwrap(),
            (WideUint128::ZERO, WideUint128::ONE)
        );
    }

    #[test]
    fn div_rem_u64_matches_native_and_u128_impl() {
        let dividends = [
            0_u128,
            1,
            u128::from(u64::MAX),
            1 << 127,
            u128::MAX,
            0xDEAD_BEEF_0000_0001_2345_6789_ABCD_EF01,
        ];
        let divisors = [1_u64, 2, 3, 7, 1 << 32, u64::MAX - 1, u64::MAX];
        for &n in &dividends {
            for &d in &divisors {
                let (q, r) = w(n).div_rem_u64(d).unwrap();
                assert_eq!(u128::from(q), n / u128::from(d), "{n} / {d}");
                assert_eq!(u128::from(r), n % u128::from(d), "{n} % {d}");
                let (nq, nr) = Wide::div_rem_u64(n, d).unwrap();
                assert_eq!((u128::from(q), r), (nq, nr));
            }
        }
    }

    #[test]
    fn leading_zeros_and_bits() {
        assert_eq!(WideUint128::ZERO.leading_zeros(), 128);
        assert_eq!(WideUint128::ONE.leading_zeros(), 127);
        assert_eq!(WideUint128::MAX.leading_zeros(), 0);
        assert_eq!(WideUint128::MAX.count_ones(), 128);
        let v = WideUint128::from_parts(0, 1);
        assert!(v.bit(64));
        assert!(!v.bit(63));
        assert!(!v.bit(500));
    }

    #[test]
    fn display_and_hex_use_full_width() {
        let v = WideUint128::from_parts(0, 1);
        assert_eq!(v.to_string(), "18446744073709551616");
        assert_eq!(format!("{v:x}"), "10000000000000000");
    }
}
