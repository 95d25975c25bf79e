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

//! Numeric values that can be used as arc lengths.
//!
//! The shortest-path engine only needs three operations on a length: the neutral element
//! ([Length::zero]), the concatenation of two lengths ([Length::plus]) and a strict order
//! ([Length::less]).
//! Floating-point lengths use the IEEE addition.
//! Integer lengths saturate at their maximum value instead of overflowing.
mod length_num;

pub use length_num::{min_length, Length};
