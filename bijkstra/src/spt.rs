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

//! One-to-all shortest-path trees.
use anyhow::Result;
use length::Length;
use log::debug;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::IntoEdgesDirected;

use crate::node_map::NodeMap;
use crate::ops::ScalarDijkstra;
use crate::DefaultDijkstraSearch;

/// Shortest paths from a source node to all the nodes reachable from it (possibly limited to the
/// nodes within a distance threshold).
#[derive(Clone, Debug)]
pub struct ShortestPathTree<T> {
    source: NodeIndex,
    search: DefaultDijkstraSearch<T>,
}

/// Computes the shortest-path tree rooted at `source`.
///
/// If `threshold` is given, the nodes whose distance from the source is larger than the threshold
/// are not part of the tree.
///
/// # Example
///
/// ```
/// use bijkstra::shortest_path_tree;
/// use petgraph::graph::{edge_index, node_index, DiGraph, EdgeReference};
///
/// let graph = DiGraph::<(), f64>::from_edges(&[(0, 1, 1.), (1, 2, 2.), (0, 2, 4.)]);
/// let tree = shortest_path_tree(&graph, |e: EdgeReference<f64>| *e.weight(), node_index(0), None);
/// assert_eq!(tree.distance(&node_index(2)), Some(3.));
/// assert_eq!(
///     tree.get_arc_path(&node_index(2)).unwrap(),
///     vec![edge_index(0), edge_index(1)]
/// );
/// let tree = shortest_path_tree(&graph, |e: EdgeReference<f64>| *e.weight(), node_index(0), Some(2.));
/// assert!(!tree.is_reached(&node_index(2)));
/// ```
pub fn shortest_path_tree<G, F, T>(
    graph: G,
    edge_label: F,
    source: NodeIndex,
    threshold: Option<T>,
) -> ShortestPathTree<T>
where
    G: IntoEdgesDirected<NodeId = NodeIndex, EdgeId = EdgeIndex>,
    F: Fn(G::EdgeRef) -> T,
    T: Length,
{
    let ops = match threshold {
        Some(threshold) => ScalarDijkstra::new_forward_with_bound(graph, edge_label, threshold),
        None => ScalarDijkstra::new_forward(graph, edge_label),
    };
    let mut search = DefaultDijkstraSearch::default();
    search.add_source(source, T::zero(), &ops);
    search.solve(&ops);
    debug!(
        "Shortest-path tree from node {} (threshold: {:?}): {:?}",
        source.index(),
        threshold,
        search.counters()
    );
    ShortestPathTree { source, search }
}

impl<T: Length> ShortestPathTree<T> {
    /// Returns the root of the tree.
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// Returns `true` if the node belongs to the tree.
    pub fn is_reached(&self, node: &NodeIndex) -> bool {
        self.search.is_reached(node)
    }

    /// Returns the distance from the source to the node, or `None` if the node does not belong
    /// to the tree.
    pub fn distance(&self, node: &NodeIndex) -> Option<T> {
        self.search.get_distance(node)
    }

    /// Returns the arc through which the node is reached in the tree (`None` for the source and
    /// the nodes outside the tree).
    pub fn predecessor_edge(&self, node: &NodeIndex) -> Option<EdgeIndex> {
        if self.is_reached(node) {
            self.search.get_predecessor(node).map(|p| p.edge)
        } else {
            None
        }
    }

    /// Returns the path from the source to the node, as a vector of nodes.
    pub fn get_path(&self, node: &NodeIndex) -> Result<Vec<NodeIndex>> {
        self.search.get_path(node)
    }

    /// Returns the path from the source to the node, as a vector of edges.
    pub fn get_arc_path(&self, node: &NodeIndex) -> Result<Vec<EdgeIndex>> {
        self.search.get_arc_path(node)
    }

    /// Returns an iterator over the nodes of the tree and their distance from the source, in
    /// arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, T)> + '_ {
        self.search
            .node_map()
            .iter()
            .filter(|(node, _)| self.search.is_reached(node))
            .map(|(node, &(label, _))| (node, label))
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::{edge_index, node_index, DiGraph, EdgeReference};

    fn graph() -> DiGraph<(), u32> {
        DiGraph::from_edges(&[(0, 1, 2), (1, 2, 2), (0, 2, 5), (2, 3, 1), (4, 0, 1)])
    }

    #[test]
    fn full_tree_test() {
        let graph = graph();
        let tree = shortest_path_tree(&graph, |e: EdgeReference<u32>| *e.weight(), node_index(0), None);
        assert_eq!(tree.source(), node_index(0));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.distance(&node_index(0)), Some(0));
        assert_eq!(tree.distance(&node_index(3)), Some(5));
        assert_eq!(tree.distance(&node_index(4)), None);
        assert_eq!(tree.predecessor_edge(&node_index(2)), Some(edge_index(1)));
        assert_eq!(tree.predecessor_edge(&node_index(0)), None);
        assert_eq!(
            tree.get_path(&node_index(3)).unwrap(),
            vec![node_index(0), node_index(1), node_index(2), node_index(3)]
        );
        let mut nodes: Vec<_> = tree.iter().collect();
        nodes.sort();
        assert_eq!(
            nodes,
            vec![
                (node_index(0), 0),
                (node_index(1), 2),
                (node_index(2), 4),
                (node_index(3), 5)
            ]
        );
    }

    #[test]
    fn threshold_test() {
        let graph = graph();
        let tree =
            shortest_path_tree(&graph, |e: EdgeReference<u32>| *e.weight(), node_index(0), Some(4));
        assert_eq!(tree.len(), 3);
        assert!(tree.is_reached(&node_index(2)));
        assert!(!tree.is_reached(&node_index(3)));
        assert_eq!(tree.predecessor_edge(&node_index(3)), None);
        assert!(tree.get_arc_path(&node_index(3)).is_err());
        assert!(tree.iter().all(|(_, d)| d <= 4));
    }
}
