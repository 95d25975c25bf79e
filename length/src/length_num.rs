// This file is part of netXpert.
// Copyright © 2022, 2023, 2024, 2025 André de Palma, Lucas Javaudin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use num_traits::{Bounded, SaturatingAdd, Zero};
use std::fmt::Debug;

const MARGIN32: f32 = 1e-4;
const MARGIN64: f64 = 1e-9;

/// Trait for the value type of arc lengths and distances.
pub trait Length: Copy + PartialOrd + Debug + Send + Sync {
    /// Returns the length of an empty path.
    fn zero() -> Self;
    /// Returns the length of the concatenation of two paths.
    #[must_use]
    fn plus(self, other: Self) -> Self;
    /// Returns `true` if `self` is strictly shorter than `other`.
    fn less(&self, other: &Self) -> bool {
        self < other
    }
    /// Returns `true` if the two lengths are equal, up to the precision of the type.
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
    /// Returns `true` if the length is not negative.
    fn is_valid(&self) -> bool {
        !self.less(&Self::zero())
    }
}

/// Returns the smallest of two lengths (the first one in case of a tie).
pub fn min_length<T: Length>(a: T, b: T) -> T {
    if b.less(&a) {
        b
    } else {
        a
    }
}

impl Length for f32 {
    fn zero() -> Self {
        0.0
    }
    fn plus(self, other: Self) -> Self {
        self + other
    }
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < MARGIN32
    }
    fn is_valid(&self) -> bool {
        // NaN is not a valid length.
        *self >= 0.0
    }
}

impl Length for f64 {
    fn zero() -> Self {
        0.0
    }
    fn plus(self, other: Self) -> Self {
        self + other
    }
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < MARGIN64 * (1.0 + self.abs().max(other.abs()))
    }
    fn is_valid(&self) -> bool {
        *self >= 0.0
    }
}

/// Saturating addition shared by all integer implementations.
fn saturating_plus<T: SaturatingAdd + Bounded>(a: T, b: T) -> T {
    a.saturating_add(&b)
}

macro_rules! impl_integer_length {
    ($($t:ty),*) => {
        $(
            impl Length for $t {
                fn zero() -> Self {
                    <$t as Zero>::zero()
                }
                fn plus(self, other: Self) -> Self {
                    saturating_plus(self, other)
                }
            }
        )*
    };
}

impl_integer_length!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
