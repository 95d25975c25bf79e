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

//! Bidirectional Dijkstra and A* shortest-path searches over [petgraph] graphs.
//!
//! The main entry points are:
//!
//! - [DijkstraSearch]: a unidirectional Dijkstra search, forward or backward.
//! - [BidirectionalDijkstraSearch]: a forward and a backward search advancing in turn until they
//!   meet, driven by a [BidirectionalDijkstraOps](bidirectional_ops::BidirectionalDijkstraOps)
//!   (plain Dijkstra or A* with a [Heuristic](heuristic::Heuristic)).
//! - [shortest_path_tree], [run_queries] and [od_matrix] for one-to-all, batch and many-to-many
//!   computations.
//!
//! # Example
//!
//! ```
//! use bijkstra::bidirectional_ops::AStarBidirectionalDijkstra;
//! use bijkstra::heuristic::EuclideanHeuristic;
//! use bijkstra::{DefaultBidirectionalSearch, SearchStatus};
//! use petgraph::graph::{node_index, DiGraph, EdgeReference};
//!
//! // Four nodes on a unit square, the diagonal 0 -> 2 being longer than the two sides.
//! let coordinates = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//! let graph = DiGraph::<(), f64>::from_edges(&[
//!     (0, 1, 1.0),
//!     (1, 2, 1.0),
//!     (0, 3, 1.0),
//!     (3, 2, 1.5),
//!     (0, 2, 2.5),
//! ]);
//! let mut ops = AStarBidirectionalDijkstra::new(
//!     &graph,
//!     |e: EdgeReference<f64>| *e.weight(),
//!     EuclideanHeuristic::new(&coordinates),
//! );
//! let mut search = DefaultBidirectionalSearch::default();
//! assert!(search.solve_query(node_index(0), node_index(2), &mut ops));
//! assert_eq!(search.get_status(), SearchStatus::PathFound);
//! assert_eq!(search.get_distance(&node_index(2)), Some(2.0));
//! assert_eq!(
//!     search.get_path(&node_index(2)).unwrap(),
//!     vec![node_index(0), node_index(1), node_index(2)]
//! );
//! ```
use petgraph::graph::NodeIndex;

pub mod bidirectional_ops;
mod bidirectional_search;
pub mod bound;
pub mod heap;
pub mod heuristic;
pub mod min_queue;
pub mod node_data;
pub mod node_map;
pub mod ops;
pub mod parameters;
mod search;
pub mod spt;
pub mod tools;

pub use bidirectional_search::{BidirectionalDijkstraSearch, Meeting, SearchStatus, Step};
pub use heap::{HeapState, NodeHeap};
pub use length::Length;
pub use node_map::VecMap;
pub use parameters::{DirectionPolicy, SearchParameters};
pub use search::{DijkstraSearch, Relaxation, SearchCounters};
pub use spt::{shortest_path_tree, ShortestPathTree};
pub use tools::{od_matrix, run_astar_queries, run_queries, OdMatrix, Query, QueryResult};

/// Baseline [DijkstraSearch], with nodes' data stored in a [VecMap].
pub type DefaultDijkstraSearch<T> =
    DijkstraSearch<T, VecMap<NodeIndex, node_data::ScalarData<T>>, min_queue::MinPQ<NodeIndex, T>>;

/// Baseline [BidirectionalDijkstraSearch], with nodes' data stored in a [VecMap].
pub type DefaultBidirectionalSearch<T> = BidirectionalDijkstraSearch<
    T,
    VecMap<NodeIndex, node_data::ScalarData<T>>,
    min_queue::MinPQ<NodeIndex, T>,
>;
