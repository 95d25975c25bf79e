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

//! Upper bounds on lengths.
use length::Length;

/// An upper bound on a length, which can only decrease.
///
/// An empty bound (`None`) is larger than any value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bound<T>(Option<T>);

impl<T> Bound<T> {
    /// Creates a new empty bound.
    pub const fn new() -> Self {
        Bound(None)
    }

    /// Creates a bound from a value.
    pub const fn from_value(value: T) -> Self {
        Bound(Some(value))
    }

    /// Returns the current value of the bound.
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Empties the bound.
    pub fn reset(&mut self) {
        self.0 = None;
    }
}

impl<T: Length> Bound<T> {
    /// Decreases the bound to the new value if it is smaller.
    ///
    /// Returns `true` if the bound was updated.
    pub fn update(&mut self, new_value: T) -> bool {
        match self.0 {
            Some(ref mut old_value) if new_value.less(old_value) => {
                *old_value = new_value;
                true
            }
            Some(_) => false,
            None => {
                self.0 = Some(new_value);
                true
            }
        }
    }

    /// Returns `true` if the bound is smaller than the given value.
    /// Returns `false` if the bound is not smaller than the given value or if the bound is empty.
    pub fn is_smaller(&self, value: T) -> bool {
        self.0.map(|b| b.less(&value)).unwrap_or(false)
    }

    /// Returns `true` if the bound is smaller or equal to the given value.
    /// Returns `false` if the bound is larger than the given value or if the bound is empty.
    pub fn is_smaller_equal(&self, value: T) -> bool {
        self.0.map(|b| !value.less(&b)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_test() {
        let mut bound = Bound::new();
        assert!(!bound.is_smaller(0.0));
        assert!(!bound.is_smaller_equal(f64::INFINITY));
        assert!(bound.update(5.0));
        assert!(!bound.update(6.0));
        assert_eq!(bound.get(), Some(&5.0));
        assert!(bound.is_smaller(5.5));
        assert!(!bound.is_smaller(5.0));
        assert!(bound.is_smaller_equal(5.0));
        assert!(bound.update(2.0));
        assert_eq!(bound, Bound::from_value(2.0));
        bound.reset();
        assert_eq!(bound.get(), None);
    }
}
