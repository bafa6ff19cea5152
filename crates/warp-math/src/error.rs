// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for the numeric kernel.
//!
//! Only integer-backed division can fail. Every other kernel operation is
//! total: degenerate inputs are clamped rather than reported.

use thiserror::Error;

/// Failures reported by checked wide-integer and fixed-point arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MathError {
    /// The divisor of a `WideUint128` or `FixedPoint` division was zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A checked fixed-point result does not fit the store width.
    #[error("fixed-point result overflows a {bits}-bit store")]
    Overflow {
        /// Width of the destination store in bits.
        bits: u32,
    },
}
