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

//! Maps storing a value for the nodes explored by a search.
use fixedbitset::FixedBitSet;
use petgraph::graph::IndexType;
use std::hash::Hash;
use std::marker::PhantomData;
use std::mem::MaybeUninit;

/// Trait to represent a data structure that can be used as a map of values for nodes.
///
/// The trait is implemented for `&mut NM` whenever `NM` implements it, so a search can either own
/// its maps or borrow maps supplied (and read back) by the caller.
pub trait NodeMap {
    /// Type to represent the nodes that are used as keys in the map.
    type Node;
    /// Type to represent the values associated to the nodes.
    type Value;
    /// Reset the map.
    fn reset(&mut self);
    /// Return a reference to the value of the given node, or None if the node has no value.
    fn get_value(&self, node: &Self::Node) -> Option<&Self::Value>;
    /// Return a mutable reference to the value of the given node, or None if the node has no
    /// value.
    fn get_mut_value(&mut self, node: &Self::Node) -> Option<&mut Self::Value>;
    /// Insert a new value in the map, for the given node, erasing the previous value (if any).
    fn insert(&mut self, node: Self::Node, value: Self::Value);
    /// Return `true` if the node has a value.
    fn contains(&self, node: &Self::Node) -> bool {
        self.get_value(node).is_some()
    }
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (Self::Node, &'a Self::Value)> + 'a>;
}

impl<N, V> NodeMap for hashbrown::HashMap<N, V>
where
    N: Copy + Eq + Hash,
{
    type Node = N;
    type Value = V;
    fn reset(&mut self) {
        self.clear();
    }
    fn get_value(&self, node: &N) -> Option<&V> {
        self.get(node)
    }
    fn get_mut_value(&mut self, node: &N) -> Option<&mut V> {
        self.get_mut(node)
    }
    fn insert(&mut self, node: N, value: V) {
        self.insert(node, value);
    }
    fn contains(&self, node: &N) -> bool {
        self.contains_key(node)
    }
    fn len(&self) -> usize {
        self.len()
    }
    fn is_empty(&self) -> bool {
        self.is_empty()
    }
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (N, &'a V)> + 'a> {
        Box::new(self.iter().map(|(n, v)| (*n, v)))
    }
}

/// A [NodeMap] backed by a vector indexed by the nodes, with a bitset flagging the nodes that hold
/// a value.
///
/// Resetting the map only clears the bitset so the allocation is reused from one search to the
/// next.
pub struct VecMap<N, V> {
    vec: Vec<MaybeUninit<V>>,
    bs: FixedBitSet,
    n: PhantomData<N>,
}

impl<N, V> Default for VecMap<N, V> {
    fn default() -> Self {
        VecMap {
            vec: Vec::new(),
            bs: FixedBitSet::new(),
            n: PhantomData,
        }
    }
}

impl<N, V: Clone> Clone for VecMap<N, V> {
    fn clone(&self) -> Self {
        let mut vec = Vec::with_capacity(self.vec.len());
        vec.resize_with(self.vec.len(), MaybeUninit::uninit);
        for i in self.bs.ones() {
            // The bit of `i` is only set once the value has been written.
            vec[i] = MaybeUninit::new(unsafe { self.vec[i].assume_init_ref() }.clone());
        }
        VecMap {
            vec,
            bs: self.bs.clone(),
            n: PhantomData,
        }
    }
}

impl<N, V> std::fmt::Debug for VecMap<N, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecMap")
            .field("capacity", &self.vec.len())
            .field("len", &self.bs.count_ones(..))
            .finish()
    }
}

impl<N, V> VecMap<N, V> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a VecMap able to store values for nodes `0..capacity` without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut vec = Vec::with_capacity(capacity);
        vec.resize_with(capacity, MaybeUninit::uninit);
        VecMap {
            vec,
            bs: FixedBitSet::with_capacity(capacity),
            n: PhantomData,
        }
    }
}

impl<N, V> NodeMap for VecMap<N, V>
where
    N: IndexType,
{
    type Node = N;
    type Value = V;
    fn reset(&mut self) {
        self.bs.clear();
    }
    fn get_value(&self, node: &N) -> Option<&V> {
        if self.bs.contains(node.index()) {
            unsafe { Some(self.vec[node.index()].assume_init_ref()) }
        } else {
            None
        }
    }
    fn get_mut_value(&mut self, node: &N) -> Option<&mut V> {
        if self.bs.contains(node.index()) {
            unsafe { Some(self.vec[node.index()].assume_init_mut()) }
        } else {
            None
        }
    }
    fn insert(&mut self, node: N, value: V) {
        if self.vec.len() <= node.index() {
            self.vec.resize_with(node.index() + 1, MaybeUninit::uninit);
        }
        if self.bs.len() <= node.index() {
            self.bs.grow(node.index() + 1);
        }
        self.vec[node.index()] = MaybeUninit::new(value);
        self.bs.insert(node.index());
    }
    fn contains(&self, node: &N) -> bool {
        self.bs.contains(node.index())
    }
    fn len(&self) -> usize {
        self.bs.count_ones(..)
    }
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (N, &'a V)> + 'a> {
        unsafe {
            Box::new(
                self.bs
                    .ones()
                    .map(|i| (N::new(i), self.vec[i].assume_init_ref())),
            )
        }
    }
}

impl<'a, NM: NodeMap> NodeMap for &'a mut NM {
    type Node = NM::Node;
    type Value = NM::Value;
    fn reset(&mut self) {
        (*self).reset();
    }
    fn get_value(&self, node: &Self::Node) -> Option<&Self::Value> {
        (**self).get_value(node)
    }
    fn get_mut_value(&mut self, node: &Self::Node) -> Option<&mut Self::Value> {
        (*self).get_mut_value(node)
    }
    fn insert(&mut self, node: Self::Node, value: Self::Value) {
        (*self).insert(node, value);
    }
    fn contains(&self, node: &Self::Node) -> bool {
        (**self).contains(node)
    }
    fn len(&self) -> usize {
        (**self).len()
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
    fn iter<'b>(&'b self) -> Box<dyn Iterator<Item = (Self::Node, &'b Self::Value)> + 'b> {
        (**self).iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;

    #[test]
    fn hash_map_test() {
        let mut map = HashMap::new();
        NodeMap::insert(&mut map, 'a', 1);
        assert_eq!(map.get_value(&'a'), Some(&1));
        let value_a = map.get_mut_value(&'a').unwrap();
        assert_eq!(value_a, &mut 1);
        *value_a = 3;
        assert_eq!(map.get_value(&'a'), Some(&3));
        NodeMap::reset(&mut map);
        assert!(NodeMap::is_empty(&map));
    }

    #[test]
    fn vec_map_test() {
        let mut map: VecMap<u32, char> = VecMap::new();
        map.insert(3, 'a');
        assert_eq!(map.get_value(&3), Some(&'a'));
        assert_eq!(map.get_value(&1), None);
        assert_eq!(map.get_value(&10), None);
        *map.get_mut_value(&3).unwrap() = 'c';
        map.insert(1, 'b');
        assert_eq!(map.len(), 2);
        let items: Vec<_> = map.iter().map(|(n, v)| (n, *v)).collect();
        assert_eq!(items, vec![(1, 'b'), (3, 'c')]);
        let copy = map.clone();
        map.reset();
        assert!(map.is_empty());
        assert_eq!(map.get_value(&3), None);
        assert_eq!(copy.get_value(&3), Some(&'c'));
        // Values can be inserted again after a reset.
        map.insert(0, 'z');
        assert_eq!(map.get_value(&0), Some(&'z'));
    }

    #[test]
    fn borrowed_map_test() {
        let mut owned: VecMap<u32, i32> = VecMap::with_capacity(4);
        {
            let mut borrowed: &mut VecMap<u32, i32> = &mut owned;
            NodeMap::insert(&mut borrowed, 2, 7);
            assert!(NodeMap::contains(&borrowed, &2));
        }
        assert_eq!(owned.get_value(&2), Some(&7));
    }
}
