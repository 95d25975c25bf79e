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

//! Min-priority queues over node keys.
use hashbrown::DefaultHashBuilder;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::hash::{BuildHasher, Hash};

/// Trait representing a priority queue of (key, value) items that are sorted in increasing order
/// of their values.
pub trait MinPriorityQueue {
    /// Type of the keys.
    type Key;
    /// Type of the values.
    type Value;
    /// Reset the priority queue.
    fn reset(&mut self);
    /// Push a new item to the priority queue.
    fn push(&mut self, key: Self::Key, value: Self::Value);
    /// Decrease the value of a key.
    fn decrease_value(&mut self, key: Self::Key, new_value: Self::Value);
    /// Pop the next item in the queue.
    fn pop(&mut self) -> Option<(Self::Key, Self::Value)>;
    /// Peek the next item in the queue.
    fn peek(&self) -> Option<(&Self::Key, &Self::Value)>;
    /// Return the current value of a key (or `None` if the key is not in the queue).
    fn get_value(&self, key: &Self::Key) -> Option<&Self::Value>;
    /// Remove a key from the queue and return its value.
    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;
    /// Return the number of items in the queue.
    fn len(&self) -> usize;
    /// Return true if the priority queue is empty.
    fn is_empty(&self) -> bool {
        self.peek().is_none()
    }
    /// Return true if the key is currently in the queue.
    fn contains(&self, key: &Self::Key) -> bool {
        self.get_value(key).is_some()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct ImplOrd<T>(T);

impl<T: PartialEq> Eq for ImplOrd<T> {}

#[allow(clippy::derive_ord_xor_partial_ord)]
impl<T: PartialOrd> Ord for ImplOrd<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.partial_cmp(other).expect("Invalid comparison")
    }
}

/// Default [MinPriorityQueue]: a binary heap with a hash-map index.
pub type MinPQ<I, P> = PriorityQueue<I, Reverse<ImplOrd<P>>, DefaultHashBuilder>;

impl<I, P, H> MinPriorityQueue for PriorityQueue<I, Reverse<ImplOrd<P>>, H>
where
    I: Copy + Hash + Eq,
    P: Copy + PartialOrd,
    H: BuildHasher,
{
    type Key = I;
    type Value = P;
    fn reset(&mut self) {
        self.clear();
    }
    fn push(&mut self, key: I, value: P) {
        self.push(key, Reverse(ImplOrd(value)));
    }
    fn decrease_value(&mut self, key: I, value: P) {
        // Decreasing the value = increasing the priority.
        self.push_increase(key, Reverse(ImplOrd(value)));
    }
    fn pop(&mut self) -> Option<(I, P)> {
        self.pop().map(|(n, rev_k)| (n, rev_k.0 .0))
    }
    fn peek(&self) -> Option<(&I, &P)> {
        self.peek().map(|(n, rev_k)| (n, &rev_k.0 .0))
    }
    fn get_value(&self, key: &I) -> Option<&P> {
        self.get_priority(key).map(|rev_k| &rev_k.0 .0)
    }
    fn remove(&mut self, key: &I) -> Option<P> {
        self.remove(key).map(|(_, rev_k)| rev_k.0 .0)
    }
    fn len(&self) -> usize {
        self.len()
    }
    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}
