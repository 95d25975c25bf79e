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

//! Instructions telling a [DijkstraSearch](crate::DijkstraSearch) how to explore a graph.
use length::Length;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::{EdgeRef, IntoEdgesDirected};
use petgraph::Direction;

use crate::bound::Bound;
use crate::heuristic::Heuristic;

/// Trait representing the graph access and the label operations of a Dijkstra search.
///
/// This trait is usually implemented on structures that hold a reference to the graph and a
/// function returning the length of the edges.
pub trait DijkstraOps {
    /// Type of the labels (and of the keys used in the priority queue).
    type Label: Length;
    /// Type of the edges.
    type Edge: Copy;
    /// Iterator used when iterating over the edges of a node.
    type EdgeIterator: Iterator<Item = Self::Edge>;

    /// Returns the direction of the search: [Direction::Outgoing] for a search exploring the
    /// outgoing edges of the nodes, [Direction::Incoming] for a search exploring the incoming
    /// edges.
    fn direction(&self) -> Direction;
    /// Returns an iterator over the edges to explore from a node.
    fn edges_from(&self, node: NodeIndex) -> Self::EdgeIterator;
    /// Returns the node reached when exploring an edge.
    fn get_next_node(&self, edge: Self::Edge) -> NodeIndex;
    /// Returns the id of an edge.
    fn get_edge_id(&self, edge: Self::Edge) -> EdgeIndex;
    /// Links the label of a node to an edge explored from it.
    fn link(&self, label: &Self::Label, edge: Self::Edge) -> Self::Label;
    /// Returns the key of a node in the priority queue, given its label.
    fn get_key(&self, _node: NodeIndex, label: &Self::Label) -> Self::Label {
        *label
    }
    /// Returns the edge with the given id among the edges explored from a node.
    fn find_edge(&self, node: NodeIndex, edge_id: EdgeIndex) -> Option<Self::Edge> {
        self.edges_from(node)
            .find(|&edge| self.get_edge_id(edge) == edge_id)
    }
    /// Returns `true` if the search can stop just before the given node is being settled, given
    /// its key.
    fn stop(&self, _node: NodeIndex, _key: Self::Label) -> bool {
        false
    }
}

/// Instructions for Dijkstra's algorithm where the keys are the distance labels.
///
/// The search can be run forward or backward and can be bounded, i.e., the search stops as soon
/// as the key of the next node to settle exceeds the bound.
///
/// The graph should implement [petgraph::visit::IntoEdgesDirected] and its edges' lengths must be
/// non-negative.
///
/// # Example
///
/// ```
/// use bijkstra::ops::ScalarDijkstra;
/// use bijkstra::DefaultDijkstraSearch;
/// use petgraph::graph::{node_index, DiGraph, EdgeReference};
///
/// // Run a standard point-to-point Dijkstra search on a graph with three edges.
/// let graph = DiGraph::<(), u32>::from_edges(&[(0, 1, 1), (1, 2, 2), (0, 2, 4)]);
/// let ops = ScalarDijkstra::new_forward(&graph, |e: EdgeReference<u32>| *e.weight());
/// let mut search = DefaultDijkstraSearch::default();
/// search.add_source(node_index(0), 0, &ops);
/// assert!(search.solve_until(node_index(2), &ops));
/// assert_eq!(search.get_distance(&node_index(2)), Some(3));
/// assert_eq!(
///     search.get_path(&node_index(2)).unwrap(),
///     vec![node_index(0), node_index(1), node_index(2)]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ScalarDijkstra<G, F, T> {
    /// Graph used by the algorithm.
    graph: G,
    /// Direction of the search (Forward, using outgoing edges, or Backward, using incoming edges).
    direction: Direction,
    /// Function used to retrieve edge's lengths.
    edge_label: F,
    /// Nodes whose key is larger than the bound are never settled.
    bound: Bound<T>,
}

impl<G, F, T> ScalarDijkstra<G, F, T> {
    /// Initialize a new ScalarDijkstra instance, with the given direction.
    fn new(graph: G, edge_label: F, direction: Direction) -> Self {
        ScalarDijkstra {
            graph,
            edge_label,
            direction,
            bound: Bound::new(),
        }
    }

    /// Initialize a new ScalarDijkstra instance for a forward search.
    pub fn new_forward(graph: G, edge_label: F) -> Self {
        ScalarDijkstra::new(graph, edge_label, Direction::Outgoing)
    }

    /// Initialize a new ScalarDijkstra instance for a backward search.
    pub fn new_backward(graph: G, edge_label: F) -> Self {
        ScalarDijkstra::new(graph, edge_label, Direction::Incoming)
    }

    /// Initialize a new ScalarDijkstra instance for a forward search which does not settle the
    /// nodes farther than `bound`.
    pub fn new_forward_with_bound(graph: G, edge_label: F, bound: T) -> Self {
        let mut ops = ScalarDijkstra::new_forward(graph, edge_label);
        ops.bound = Bound::from_value(bound);
        ops
    }

    /// Return the current bound of the ScalarDijkstra.
    pub fn get_bound(&self) -> &Bound<T> {
        &self.bound
    }
}

impl<G, F, T> DijkstraOps for ScalarDijkstra<G, F, T>
where
    G: IntoEdgesDirected<NodeId = NodeIndex, EdgeId = EdgeIndex>,
    F: Fn(G::EdgeRef) -> T,
    T: Length,
{
    type Label = T;
    type Edge = G::EdgeRef;
    type EdgeIterator = G::EdgesDirected;

    fn direction(&self) -> Direction {
        self.direction
    }
    fn edges_from(&self, node: NodeIndex) -> G::EdgesDirected {
        self.graph.edges_directed(node, self.direction)
    }
    fn get_next_node(&self, edge: G::EdgeRef) -> NodeIndex {
        match self.direction {
            Direction::Outgoing => edge.target(),
            Direction::Incoming => edge.source(),
        }
    }
    fn get_edge_id(&self, edge: G::EdgeRef) -> EdgeIndex {
        edge.id()
    }
    fn link(&self, label: &T, edge: G::EdgeRef) -> T {
        label.plus((self.edge_label)(edge))
    }
    fn stop(&self, _node: NodeIndex, key: T) -> bool {
        self.bound.is_smaller(key)
    }
}

/// Instructions for Dijkstra's algorithm where the key of a node is its distance label plus an
/// estimate of the remaining distance to a goal.
///
/// For a forward search, the estimate is `heuristic(node, goal)`; for a backward search, it is
/// `heuristic(goal, node)`.
/// When no goal is set, the keys are the labels and the search is a plain Dijkstra search.
///
/// For the distances of the settled nodes to be exact, the heuristic must be consistent.
#[derive(Clone, Debug)]
pub struct AStarDijkstra<G, F, T, H> {
    scalar: ScalarDijkstra<G, F, T>,
    heuristic: H,
    goal: Option<NodeIndex>,
}

impl<G, F, T, H> AStarDijkstra<G, F, T, H> {
    /// Initialize a new AStarDijkstra instance for a forward search.
    pub fn new_forward(graph: G, edge_label: F, heuristic: H) -> Self {
        AStarDijkstra {
            scalar: ScalarDijkstra::new_forward(graph, edge_label),
            heuristic,
            goal: None,
        }
    }

    /// Initialize a new AStarDijkstra instance for a backward search.
    pub fn new_backward(graph: G, edge_label: F, heuristic: H) -> Self {
        AStarDijkstra {
            scalar: ScalarDijkstra::new_backward(graph, edge_label),
            heuristic,
            goal: None,
        }
    }

    /// Sets the node the estimates are computed to (forward) or from (backward).
    pub fn set_goal(&mut self, goal: Option<NodeIndex>) {
        self.goal = goal;
    }

    /// Returns the current goal.
    pub fn get_goal(&self) -> Option<NodeIndex> {
        self.goal
    }

    /// Returns the heuristic.
    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }
}

impl<G, F, T, H> AStarDijkstra<G, F, T, H>
where
    H: Heuristic<T>,
{
    /// Returns the estimated distance between a node and the goal, in the direction of the
    /// search.
    pub fn estimate(&self, node: NodeIndex) -> Option<T> {
        self.goal.map(|goal| match self.scalar.direction {
            Direction::Outgoing => self.heuristic.estimate(node, goal),
            Direction::Incoming => self.heuristic.estimate(goal, node),
        })
    }
}

impl<G, F, T, H> DijkstraOps for AStarDijkstra<G, F, T, H>
where
    G: IntoEdgesDirected<NodeId = NodeIndex, EdgeId = EdgeIndex>,
    F: Fn(G::EdgeRef) -> T,
    T: Length,
    H: Heuristic<T>,
{
    type Label = T;
    type Edge = G::EdgeRef;
    type EdgeIterator = G::EdgesDirected;

    fn direction(&self) -> Direction {
        self.scalar.direction()
    }
    fn edges_from(&self, node: NodeIndex) -> G::EdgesDirected {
        self.scalar.edges_from(node)
    }
    fn get_next_node(&self, edge: G::EdgeRef) -> NodeIndex {
        self.scalar.get_next_node(edge)
    }
    fn get_edge_id(&self, edge: G::EdgeRef) -> EdgeIndex {
        edge.id()
    }
    fn link(&self, label: &T, edge: G::EdgeRef) -> T {
        self.scalar.link(label, edge)
    }
    fn get_key(&self, node: NodeIndex, label: &T) -> T {
        match self.estimate(node) {
            Some(estimate) => label.plus(estimate),
            None => *label,
        }
    }
}
