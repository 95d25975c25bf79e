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

//! Trait and structs used to represent bidirectional Dijkstra algorithms.
use length::Length;
use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::heuristic::Heuristic;
use crate::ops::{AStarDijkstra, DijkstraOps, ScalarDijkstra};

/// Trait representing a set of instructions to perform a bidirectional Dijkstra's algorithm.
///
/// A BidirectionalDijkstraOps is composed of the following:
///
/// - A [DijkstraOps] for the forward search (exploring outgoing edges from the sources).
///
/// - A [DijkstraOps] for the backward search (exploring incoming edges from the targets).
///
/// - Rules telling when the search can stop and which nodes do not need to be expanded.
pub trait BidirectionalDijkstraOps {
    /// Type of the labels, shared by the two directions.
    type Label: Length;
    /// Type of the forward search [DijkstraOps].
    type FOps: DijkstraOps<Label = Self::Label>;
    /// Type of the backward search [DijkstraOps].
    type BOps: DijkstraOps<Label = Self::Label>;
    /// Returns a reference to the forward search [DijkstraOps].
    fn forward_ops(&self) -> &Self::FOps;
    /// Returns a reference to the backward search [DijkstraOps].
    fn backward_ops(&self) -> &Self::BOps;
    /// Function called before the sources and targets of a point-to-point query are added.
    fn set_endpoints(&mut self, _source: Option<NodeIndex>, _target: Option<NodeIndex>) {}
    /// Returns `true` if the search can stop as soon as a node is finalized in both directions.
    fn stop_on_meeting(&self) -> bool {
        true
    }
    /// Returns `true` if a node popped from the heap of the given direction does not need to be
    /// expanded.
    ///
    /// The arguments are the node, its distance label and its key in that direction, the best
    /// known total distance and the last key expanded in the opposite direction.
    fn can_be_pruned(
        &self,
        _direction: Direction,
        _node: NodeIndex,
        _label: Self::Label,
        _key: Self::Label,
        _best: Self::Label,
        _last_opposite_key: Self::Label,
    ) -> bool {
        false
    }
}

/// Instructions for a plain bidirectional Dijkstra's algorithm.
///
/// The algorithm stops as soon as a node is finalized in both directions.
///
/// The graph should implement [petgraph::visit::IntoEdgesDirected] and its edges' lengths must be
/// non-negative.
///
/// # Example
///
/// ```
/// use bijkstra::bidirectional_ops::ScalarBidirectionalDijkstra;
/// use bijkstra::DefaultBidirectionalSearch;
/// use petgraph::graph::{node_index, DiGraph, EdgeReference};
///
/// // Run a point-to-point bidirectonal Dijkstra search on a graph with three edges.
/// let graph = DiGraph::<(), f32>::from_edges(&[(0, 1, 1.), (1, 2, 2.), (0, 2, 4.)]);
/// let mut ops = ScalarBidirectionalDijkstra::new(&graph, |e: EdgeReference<f32>| *e.weight());
/// let mut search = DefaultBidirectionalSearch::default();
/// assert!(search.solve_query(node_index(0), node_index(2), &mut ops));
/// assert_eq!(search.get_distance(&node_index(2)), Some(3.));
/// assert_eq!(
///     search.get_path(&node_index(2)).unwrap(),
///     vec![node_index(0), node_index(1), node_index(2)]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ScalarBidirectionalDijkstra<G1, G2, F1, F2, T> {
    forw_ops: ScalarDijkstra<G1, F1, T>,
    back_ops: ScalarDijkstra<G2, F2, T>,
}

impl<G1, G2, F1, F2, T> ScalarBidirectionalDijkstra<G1, G2, F1, F2, T> {
    /// Initializes a new ScalarBidirectionalDijkstra from a graph with lengths for the forward
    /// search and a graph with lengths for the backward search.
    pub fn new_raw(graph1: G1, edge_label1: F1, graph2: G2, edge_label2: F2) -> Self {
        ScalarBidirectionalDijkstra {
            forw_ops: ScalarDijkstra::new_forward(graph1, edge_label1),
            back_ops: ScalarDijkstra::new_backward(graph2, edge_label2),
        }
    }
}

impl<G: Copy, F: Copy, T> ScalarBidirectionalDijkstra<G, G, F, F, T> {
    /// Initializes a new ScalarBidirectionalDijkstra from a graph with edges' lengths.
    pub fn new(graph: G, edge_label: F) -> Self {
        Self::new_raw(graph, edge_label, graph, edge_label)
    }
}

impl<G1, G2, F1, F2, T> BidirectionalDijkstraOps for ScalarBidirectionalDijkstra<G1, G2, F1, F2, T>
where
    ScalarDijkstra<G1, F1, T>: DijkstraOps<Label = T>,
    ScalarDijkstra<G2, F2, T>: DijkstraOps<Label = T>,
    T: Length,
{
    type Label = T;
    type FOps = ScalarDijkstra<G1, F1, T>;
    type BOps = ScalarDijkstra<G2, F2, T>;
    fn forward_ops(&self) -> &Self::FOps {
        &self.forw_ops
    }
    fn backward_ops(&self) -> &Self::BOps {
        &self.back_ops
    }
}

/// Instructions for a bidirectional A* algorithm.
///
/// The key of a node in the forward heap is its distance from the source plus the estimated
/// distance to the target; the key of a node in the backward heap is its distance to the target
/// plus the estimated distance from the source.
///
/// The search does not stop when the two directions meet: it runs until one of the heaps is
/// exhausted, but a popped node `v` is not expanded when
///
/// - its key is not smaller than the best known distance, or
/// - `label(v) + last_opposite_key` is not smaller than `best + opposite_estimate(v)`, where
///   `last_opposite_key` is the key of the last node expanded in the other direction and
///   `opposite_estimate(v)` is the estimate of `v` in the other direction.
///
/// Both rules are valid when the heuristic is consistent. An admissible heuristic that is not
/// consistent can make the search return a non-optimal distance and path; use
/// [find_inconsistent_edge](crate::heuristic::find_inconsistent_edge) to check a heuristic.
/// With a [ZeroHeuristic](crate::heuristic::ZeroHeuristic), the distances found are those of the
/// plain bidirectional Dijkstra's algorithm.
///
/// When the query has several sources or several targets, the estimates are disabled in the
/// direction whose goal is not unique.
#[derive(Clone, Debug)]
pub struct AStarBidirectionalDijkstra<G, F, T, H> {
    forw_ops: AStarDijkstra<G, F, T, H>,
    back_ops: AStarDijkstra<G, F, T, H>,
}

impl<G: Copy, F: Copy, T, H: Clone> AStarBidirectionalDijkstra<G, F, T, H> {
    /// Initializes a new AStarBidirectionalDijkstra from a graph with edges' lengths and a
    /// heuristic.
    pub fn new(graph: G, edge_label: F, heuristic: H) -> Self {
        AStarBidirectionalDijkstra {
            forw_ops: AStarDijkstra::new_forward(graph, edge_label, heuristic.clone()),
            back_ops: AStarDijkstra::new_backward(graph, edge_label, heuristic),
        }
    }
}

impl<G, F, T, H> BidirectionalDijkstraOps for AStarBidirectionalDijkstra<G, F, T, H>
where
    AStarDijkstra<G, F, T, H>: DijkstraOps<Label = T>,
    T: Length,
    H: Heuristic<T>,
{
    type Label = T;
    type FOps = AStarDijkstra<G, F, T, H>;
    type BOps = AStarDijkstra<G, F, T, H>;
    fn forward_ops(&self) -> &Self::FOps {
        &self.forw_ops
    }
    fn backward_ops(&self) -> &Self::BOps {
        &self.back_ops
    }
    fn set_endpoints(&mut self, source: Option<NodeIndex>, target: Option<NodeIndex>) {
        // The forward search is guided towards the target, the backward search towards the
        // source.
        self.forw_ops.set_goal(target);
        self.back_ops.set_goal(source);
    }
    fn stop_on_meeting(&self) -> bool {
        false
    }
    fn can_be_pruned(
        &self,
        direction: Direction,
        node: NodeIndex,
        label: T,
        key: T,
        best: T,
        last_opposite_key: T,
    ) -> bool {
        if !key.less(&best) {
            return true;
        }
        let opposite_ops = match direction {
            Direction::Outgoing => &self.back_ops,
            Direction::Incoming => &self.forw_ops,
        };
        let opposite_estimate = opposite_ops.estimate(node).unwrap_or_else(T::zero);
        !label
            .plus(last_opposite_key)
            .less(&best.plus(opposite_estimate))
    }
}
