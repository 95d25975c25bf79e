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

//! Unidirectional Dijkstra search.
use anyhow::{bail, Result};
use hashbrown::HashSet;
use length::Length;
use log::warn;
use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::heap::{HeapState, NodeHeap};
use crate::min_queue::MinPriorityQueue;
use crate::node_data::{Predecessor, ScalarData};
use crate::node_map::NodeMap;
use crate::ops::DijkstraOps;

/// Work done by a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchCounters {
    /// Number of nodes popped from the heap.
    pub scanned: u64,
    /// Number of edges explored.
    pub reached: u64,
    /// Number of nodes pushed to the heap.
    pub inserted: u64,
    /// Number of strict improvements of a tentative distance.
    pub decreased: u64,
    /// Number of meeting candidates found by this search.
    pub important: u64,
    /// Number of popped nodes that were not expanded because they could not improve the best
    /// known path.
    pub rejected: u64,
}

/// Outcome of the relaxation of an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Relaxation {
    /// The node at the other end of the edge was seen for the first time.
    Inserted,
    /// The tentative distance of the node was strictly improved.
    Decreased,
    /// The node is in the heap and its tentative distance was not improved.
    Unchanged,
    /// The node is already finalized.
    AlreadyFinalized,
}

/// Structure used to run a Dijkstra search.
///
/// The structure holds:
///
/// - A [NodeMap] with the label and the predecessor of every explored node.
///
/// - A [NodeHeap] that represents the order in which the nodes are settled and remembers the
///   finalized nodes.
///
/// The graph itself is accessed through a [DijkstraOps], so the same DijkstraSearch can be used
/// for forward and backward searches, or with different graphs (after a [reset](Self::reset)).
#[derive(Clone, Debug)]
pub struct DijkstraSearch<T, M, PQ> {
    /// A map Node -> (label, predecessor).
    data: M,
    /// A heap over the nodes' keys.
    heap: NodeHeap<T, PQ>,
    counters: SearchCounters,
}

impl<T, M: Default, PQ: Default> Default for DijkstraSearch<T, M, PQ> {
    fn default() -> Self {
        DijkstraSearch {
            data: Default::default(),
            heap: Default::default(),
            counters: Default::default(),
        }
    }
}

impl<T, M, PQ> DijkstraSearch<T, M, PQ> {
    /// Initialize a new DijkstraSearch from a node map and a priority queue.
    ///
    /// The node map can be borrowed (`&mut M`), in which case the labels remain available to the
    /// caller after the search is dropped.
    pub fn new(data: M, queue: PQ) -> Self {
        DijkstraSearch {
            data,
            heap: NodeHeap::new(queue),
            counters: Default::default(),
        }
    }

    /// Return a reference to the node map of the DijkstraSearch.
    pub fn node_map(&self) -> &M {
        &self.data
    }

    /// Return the counters of the work done since the last reset.
    pub fn counters(&self) -> &SearchCounters {
        &self.counters
    }

    pub(crate) fn counters_mut(&mut self) -> &mut SearchCounters {
        &mut self.counters
    }
}

impl<T, M, PQ> DijkstraSearch<T, M, PQ>
where
    T: Length,
    M: NodeMap<Node = NodeIndex, Value = ScalarData<T>>,
    PQ: MinPriorityQueue<Key = NodeIndex, Value = T>,
{
    /// Reset all data structures of the instance.
    pub fn reset(&mut self) {
        self.data.reset();
        self.heap.reset();
        self.counters = Default::default();
    }

    /// Return `true` if there is no node left in the heap.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Return the [HeapState] of a node.
    pub fn state(&self, node: &NodeIndex) -> HeapState {
        self.heap.state(*node)
    }

    /// Return `true` if the node has been finalized, i.e., its distance is exact.
    pub fn is_reached(&self, node: &NodeIndex) -> bool {
        self.heap.state(*node) == HeapState::Finalized
    }

    /// Return the current label of a node (or `None` if the node has never been explored).
    ///
    /// The label is a tentative distance if the node is still in the heap.
    pub fn get_label(&self, node: &NodeIndex) -> Option<&T> {
        self.data.get_value(node).map(|(label, _)| label)
    }

    /// Return the distance of a finalized node (or `None` if the node is not finalized).
    pub fn get_distance(&self, node: &NodeIndex) -> Option<T> {
        if self.is_reached(node) {
            self.get_label(node).copied()
        } else {
            None
        }
    }

    /// Return the predecessor of a node (or `None` for the sources and the unexplored nodes).
    pub fn get_predecessor(&self, node: &NodeIndex) -> Option<&Predecessor> {
        self.data.get_value(node).and_then(|(_, pred)| pred.as_ref())
    }

    /// Return the key of a node in the heap (its final key if it is finalized).
    pub fn get_priority(&self, node: &NodeIndex) -> Option<T> {
        self.heap.priority(*node)
    }

    /// Peek the next node to settle and its key.
    pub fn peek(&self) -> Option<(NodeIndex, T)> {
        self.heap.peek()
    }

    /// Peek the value of the next key in the heap.
    pub fn peek_key(&self) -> Option<T> {
        self.heap.peek().map(|(_, k)| k)
    }

    /// Add a source node to the search, with the given initial label.
    ///
    /// If the node is already in the heap with a larger label, its label is improved and its
    /// predecessor is cleared.
    /// A node that is already finalized is left untouched.
    ///
    /// Return `true` if the label of the node was set.
    pub fn add_source<O>(&mut self, node: NodeIndex, label: T, ops: &O) -> bool
    where
        O: DijkstraOps<Label = T>,
    {
        let key = ops.get_key(node, &label);
        match self.heap.state(node) {
            HeapState::NotYetSeen => {
                self.heap.push(node, key);
                self.data.insert(node, (label, None));
                true
            }
            HeapState::InHeap => {
                let node_data = self
                    .data
                    .get_mut_value(&node)
                    .expect("Node in the heap has no label");
                if label.less(&node_data.0) {
                    *node_data = (label, None);
                    self.heap.decrease(node, key);
                    true
                } else {
                    false
                }
            }
            HeapState::Finalized => {
                warn!(
                    "Ignoring source node {}: the node is already finalized",
                    node.index()
                );
                false
            }
        }
    }

    /// Pop the next node from the heap and finalize it, without relaxing its edges.
    pub fn pop(&mut self) -> Option<(NodeIndex, T)> {
        let item = self.heap.try_pop()?;
        self.counters.scanned += 1;
        Some(item)
    }

    /// Relax all the edges explored from a finalized node.
    ///
    /// The closure `visit` is called for every edge, with the node at the other end of the edge,
    /// the [Relaxation] outcome and the (possibly updated) label of that node.
    pub fn relax_edges<O, V>(&mut self, node: NodeIndex, ops: &O, mut visit: V)
    where
        O: DijkstraOps<Label = T>,
        V: FnMut(NodeIndex, Relaxation, T),
    {
        let label = *self
            .get_label(&node)
            .expect("Cannot relax the edges of a node without label");
        for edge in ops.edges_from(node) {
            let (next, relaxation, next_label) = self.relax_edge(node, &label, edge, ops);
            visit(next, relaxation, next_label);
        }
    }

    /// Relax an edge explored from node `u`, with label `u_label`.
    ///
    /// Return the node at the other end of the edge, the [Relaxation] outcome and the label of
    /// that node.
    pub fn relax_edge<O>(
        &mut self,
        u: NodeIndex,
        u_label: &T,
        edge: O::Edge,
        ops: &O,
    ) -> (NodeIndex, Relaxation, T)
    where
        O: DijkstraOps<Label = T>,
    {
        self.counters.reached += 1;
        let v = ops.get_next_node(edge);
        match self.heap.state(v) {
            HeapState::NotYetSeen => {
                let v_label = ops.link(u_label, edge);
                self.heap.push(v, ops.get_key(v, &v_label));
                let pred = Predecessor::new(u, ops.get_edge_id(edge));
                self.data.insert(v, (v_label, Some(pred)));
                self.counters.inserted += 1;
                (v, Relaxation::Inserted, v_label)
            }
            HeapState::InHeap => {
                let v_label = ops.link(u_label, edge);
                let v_data = self
                    .data
                    .get_mut_value(&v)
                    .expect("Node in the heap has no label");
                if v_label.less(&v_data.0) {
                    *v_data = (v_label, Some(Predecessor::new(u, ops.get_edge_id(edge))));
                    self.heap.decrease(v, ops.get_key(v, &v_label));
                    self.counters.decreased += 1;
                    (v, Relaxation::Decreased, v_label)
                } else {
                    (v, Relaxation::Unchanged, v_data.0)
                }
            }
            HeapState::Finalized => {
                let v_label = *self
                    .get_label(&v)
                    .expect("Finalized node has no label");
                (v, Relaxation::AlreadyFinalized, v_label)
            }
        }
    }

    /// Settle a finalized node, i.e., relax all its edges.
    pub fn settle_node<O>(&mut self, node: NodeIndex, ops: &O)
    where
        O: DijkstraOps<Label = T>,
    {
        self.relax_edges(node, ops, |_, _, _| ());
    }

    /// Pop the next node from the heap and settle it.
    ///
    /// Return the node settled or `None` if the heap is empty.
    pub fn settle_next<O>(&mut self, ops: &O) -> Option<NodeIndex>
    where
        O: DijkstraOps<Label = T>,
    {
        let (node, _) = self.pop()?;
        self.settle_node(node, ops);
        Some(node)
    }

    /// Settle nodes until the heap is empty or until the [DijkstraOps] tells to stop.
    pub fn solve<O>(&mut self, ops: &O)
    where
        O: DijkstraOps<Label = T>,
    {
        while let Some((node, key)) = self.heap.peek() {
            if ops.stop(node, key) {
                break;
            }
            self.settle_next(ops);
        }
    }

    /// Settle nodes until `target` is finalized.
    ///
    /// Return `true` if the target has been reached.
    pub fn solve_until<O>(&mut self, target: NodeIndex, ops: &O) -> bool
    where
        O: DijkstraOps<Label = T>,
    {
        self.solve_until_any(|node| node == target, ops).is_some() || self.is_reached(&target)
    }

    /// Settle nodes until a node satisfying the predicate is finalized and return this node.
    ///
    /// Return `None` if the heap is exhausted (or the [DijkstraOps] tells to stop) before such a
    /// node is found.
    pub fn solve_until_any<O, P>(&mut self, predicate: P, ops: &O) -> Option<NodeIndex>
    where
        O: DijkstraOps<Label = T>,
        P: Fn(NodeIndex) -> bool,
    {
        while let Some((node, key)) = self.heap.peek() {
            if ops.stop(node, key) {
                return None;
            }
            self.settle_next(ops);
            if predicate(node) {
                return Some(node);
            }
        }
        None
    }

    /// Settle nodes until all the given nodes are finalized.
    ///
    /// Return `true` if all the nodes have been reached.
    pub fn solve_until_all<O>(&mut self, nodes: &[NodeIndex], ops: &O) -> bool
    where
        O: DijkstraOps<Label = T>,
    {
        let mut remaining: HashSet<NodeIndex> = nodes
            .iter()
            .copied()
            .filter(|n| !self.is_reached(n))
            .collect();
        while !remaining.is_empty() {
            let Some((node, key)) = self.heap.peek() else {
                break;
            };
            if ops.stop(node, key) {
                break;
            }
            self.settle_next(ops);
            remaining.remove(&node);
        }
        remaining.is_empty()
    }

    /// Force the label and the predecessor of a node and mark it as finalized.
    pub(crate) fn finalize_node<O>(
        &mut self,
        node: NodeIndex,
        label: T,
        predecessor: Option<Predecessor>,
        ops: &O,
    ) where
        O: DijkstraOps<Label = T>,
    {
        self.data.insert(node, (label, predecessor));
        self.heap.finalize(node, ops.get_key(node, &label));
    }

    /// Return the predecessors from `end` back to a node without predecessor.
    ///
    /// The function takes recursively the predecessors of the current node until a node without
    /// predecessor is reached.
    /// It does not check that the nodes are finalized.
    pub fn get_reverse_path(&self, end: &NodeIndex) -> Result<Vec<Predecessor>> {
        let mut preds = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(*end);
        let mut next = *end;
        while let Some(&pred) = self.get_predecessor(&next) {
            preds.push(pred);
            if !visited.insert(pred.node) {
                bail!(
                    "Found a loop in the predecessors of node {}: {:?}",
                    end.index(),
                    preds
                );
            }
            next = pred.node;
        }
        Ok(preds)
    }

    /// Return the path, from a source node to `end`, as a vector of nodes.
    ///
    /// For a backward search, the nodes are ordered from a target node to `end`.
    pub fn get_path(&self, end: &NodeIndex) -> Result<Vec<NodeIndex>> {
        self.check_reached(end)?;
        let preds = self.get_reverse_path(end)?;
        let mut path: Vec<_> = std::iter::once(*end)
            .chain(preds.iter().map(|p| p.node))
            .collect();
        path.reverse();
        Ok(path)
    }

    /// Return the path, from a source node to `end`, as a vector of edges.
    ///
    /// The path is empty if `end` is a source.
    pub fn get_arc_path(&self, end: &NodeIndex) -> Result<Vec<EdgeIndex>> {
        self.check_reached(end)?;
        let preds = self.get_reverse_path(end)?;
        Ok(preds.iter().rev().map(|p| p.edge).collect())
    }

    fn check_reached(&self, node: &NodeIndex) -> Result<()> {
        if !self.is_reached(node) {
            bail!("Node {} has not been reached by the search", node.index());
        }
        Ok(())
    }
}
