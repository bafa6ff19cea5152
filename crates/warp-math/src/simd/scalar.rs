// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Portable backend: four `T` lanes in a plain array.
//!
//! Written entirely against [`Element`], so it covers every element type and
//! serves as the reference the SIMD backends are tested against.

use super::{Backend, Lanes};
use crate::element::Element;

/// Portable backend operating on `[T; 4]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScalarBackend;

impl Backend for ScalarBackend {
    const NAME: &'static str = "scalar";
}

fn map<T: Element>(a: [T; 4], f: impl Fn(T) -> T) -> [T; 4] {
    a.map(f)
}

fn zip<T: Element>(a: [T; 4], b: [T; 4], f: impl Fn(T, T) -> T) -> [T; 4] {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])]
}

impl<T: Element> Lanes<T> for ScalarBackend {
    type Reg = [T; 4];

    fn load(lanes: [T; 4]) -> [T; 4] {
        lanes
    }

    fn store(reg: [T; 4]) -> [T; 4] {
        reg
    }

    fn splat(value: T) -> [T; 4] {
        [value; 4]
    }

    fn add(a: [T; 4], b: [T; 4]) -> [T; 4] {
        zip(a, b, |x, y| x + y)
    }

    fn sub(a: [T; 4], b: [T; 4]) -> [T; 4] {
        zip(a, b, |x, y| x - y)
    }

    fn mul(a: [T; 4], b: [T; 4]) -> [T; 4] {
        zip(a, b, |x, y| x * y)
    }

    fn div(a: [T; 4], b: [T; 4]) -> [T; 4] {
        zip(a, b, T::div_lane)
    }

    fn neg(a: [T; 4]) -> [T; 4] {
        map(a, |x| -x)
    }

    fn abs(a: [T; 4]) -> [T; 4] {
        map(a, T::abs)
    }

    fn sign(a: [T; 4]) -> [T; 4] {
        map(a, T::sign)
    }

    fn min(a: [T; 4], b: [T; 4]) -> [T; 4] {
        zip(a, b, T::min)
    }

    fn max(a: [T; 4], b: [T; 4]) -> [T; 4] {
        zip(a, b, T::max)
    }

    fn floor(a: [T; 4]) -> [T; 4] {
        map(a, T::floor)
    }

    fn ceil(a: [T; 4]) -> [T; 4] {
        map(a, T::ceil)
    }

    fn round(a: [T; 4]) -> [T; 4] {
        map(a, T::round)
    }

    fn sqrt(a: [T; 4]) -> [T; 4] {
        map(a, T::sqrt)
    }

    fn rsqrt(a: [T; 4]) -> [T; 4] {
        map(a, T::rsqrt)
    }

    fn step(edge: [T; 4], x: [T; 4]) -> [T; 4] {
        zip(edge, x, T::step)
    }

    fn sum(reg: [T; 4], lanes: usize) -> T {
        let zero = T::zero();
        let l = |i: usize| if i < lanes { reg[i] } else { zero };
        (l(0) + l(2)) + (l(1) + l(3))
    }
}
