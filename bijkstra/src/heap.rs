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

//! Addressable heap over the nodes of a graph.
use petgraph::graph::NodeIndex;

use crate::min_queue::MinPriorityQueue;
use crate::node_map::{NodeMap, VecMap};

/// State of a node with respect to a [NodeHeap].
///
/// A node can only move forward in this order: `NotYetSeen → InHeap → Finalized`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeapState {
    /// The node has never been pushed to the heap.
    NotYetSeen,
    /// The node is currently in the heap.
    InHeap,
    /// The node has been popped from the heap (or explicitly finalized).
    Finalized,
}

/// A min-heap keyed by a priority per node, that remembers which nodes have already left the
/// heap.
///
/// The heap panics when it is misused (pushing a node twice, popping from an empty heap,
/// decreasing the priority of a node that is not in the heap): these are programming errors.
#[derive(Clone, Debug)]
pub struct NodeHeap<K, PQ> {
    /// Queue of the nodes currently in the heap.
    queue: PQ,
    /// Final priority of the nodes that left the heap.
    finalized: VecMap<NodeIndex, K>,
}

impl<K, PQ: Default> Default for NodeHeap<K, PQ> {
    fn default() -> Self {
        NodeHeap {
            queue: Default::default(),
            finalized: Default::default(),
        }
    }
}

impl<K, PQ> NodeHeap<K, PQ> {
    /// Creates a new NodeHeap from an (empty) priority queue.
    pub fn new(queue: PQ) -> Self {
        NodeHeap {
            queue,
            finalized: VecMap::new(),
        }
    }

    /// Creates a new NodeHeap able to finalize the nodes `0..nb_nodes` without reallocating.
    pub fn with_capacity(queue: PQ, nb_nodes: usize) -> Self {
        NodeHeap {
            queue,
            finalized: VecMap::with_capacity(nb_nodes),
        }
    }
}

impl<K, PQ> NodeHeap<K, PQ>
where
    K: Copy + PartialOrd + std::fmt::Debug,
    PQ: MinPriorityQueue<Key = NodeIndex, Value = K>,
{
    /// Removes all the nodes from the heap and forgets the finalized nodes.
    pub fn reset(&mut self) {
        self.queue.reset();
        self.finalized.reset();
    }

    /// Returns the [HeapState] of a node.
    pub fn state(&self, node: NodeIndex) -> HeapState {
        if self.queue.contains(&node) {
            HeapState::InHeap
        } else if self.finalized.contains(&node) {
            HeapState::Finalized
        } else {
            HeapState::NotYetSeen
        }
    }

    /// Returns the current priority of a node, or `None` if the node has never been pushed.
    ///
    /// The priority of a finalized node is the priority it had when it left the heap.
    pub fn priority(&self, node: NodeIndex) -> Option<K> {
        self.queue
            .get_value(&node)
            .or_else(|| self.finalized.get_value(&node))
            .copied()
    }

    /// Pushes a node that has never been seen by the heap.
    ///
    /// # Panics
    ///
    /// Panics if the node is already in the heap or finalized.
    pub fn push(&mut self, node: NodeIndex, priority: K) {
        let state = self.state(node);
        assert_eq!(
            state,
            HeapState::NotYetSeen,
            "Cannot push node {} to the heap: its state is {state:?}",
            node.index()
        );
        self.queue.push(node, priority);
    }

    /// Lowers the priority of a node in the heap.
    ///
    /// Returns `true` if the priority was strictly decreased, `false` if the new priority is not
    /// smaller than the current one (in which case the heap is unchanged).
    ///
    /// # Panics
    ///
    /// Panics if the node is not in the heap.
    pub fn decrease(&mut self, node: NodeIndex, priority: K) -> bool {
        let Some(&current) = self.queue.get_value(&node) else {
            panic!(
                "Cannot decrease the priority of node {}: its state is {:?}",
                node.index(),
                self.state(node)
            );
        };
        if priority < current {
            self.queue.decrease_value(node, priority);
            true
        } else {
            false
        }
    }

    /// Removes the node with the smallest priority and returns it with its priority, or returns
    /// `None` if the heap is empty.
    pub fn try_pop(&mut self) -> Option<(NodeIndex, K)> {
        let (node, priority) = self.queue.pop()?;
        self.finalized.insert(node, priority);
        Some((node, priority))
    }

    /// Removes the node with the smallest priority and returns it with its priority.
    ///
    /// # Panics
    ///
    /// Panics if the heap is empty.
    pub fn pop_min(&mut self) -> (NodeIndex, K) {
        match self.try_pop() {
            Some(item) => item,
            None => panic!("Cannot pop from an empty heap"),
        }
    }

    /// Marks a node as finalized with the given priority, removing it from the heap if needed.
    pub fn finalize(&mut self, node: NodeIndex, priority: K) {
        self.queue.remove(&node);
        self.finalized.insert(node, priority);
    }

    /// Returns the node with the smallest priority (without removing it).
    pub fn peek(&self) -> Option<(NodeIndex, K)> {
        self.queue.peek().map(|(&n, &k)| (n, k))
    }

    /// Returns the number of nodes in the heap.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if there is no node in the heap.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
