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

//! Tools to run many shortest-path queries in parallel.
use anyhow::{Context, Result};
use length::Length;
use log::{debug, warn};
use object_pool::Pool;
use petgraph::graph::{node_index, EdgeIndex, NodeIndex};
use petgraph::visit::{IntoEdgesDirected, NodeIndexable};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::bidirectional_ops::{
    AStarBidirectionalDijkstra, BidirectionalDijkstraOps, ScalarBidirectionalDijkstra,
};
use crate::heuristic::Heuristic;
use crate::min_queue::MinPriorityQueue;
use crate::node_data::ScalarData;
use crate::node_map::NodeMap;
use crate::ops::ScalarDijkstra;
use crate::parameters::SearchParameters;
use crate::search::DijkstraSearch;
use crate::{DefaultBidirectionalSearch, DefaultDijkstraSearch};

/// Point-to-point query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Query {
    /// Index of the query.
    pub id: u64,
    /// Index of the source node.
    pub source: u64,
    /// Index of the target node.
    pub target: u64,
}

/// Result of a query.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryResult<T> {
    /// Id of the query, distance and route (as edge indices).
    DistanceAndRoute((u64, T, Vec<usize>)),
    /// The source and target of the query are not connected.
    NotConnected(u64),
}

impl<T: Copy> QueryResult<T> {
    /// Returns the id of the query.
    pub fn id(&self) -> u64 {
        match self {
            Self::DistanceAndRoute((id, _, _)) => *id,
            Self::NotConnected(id) => *id,
        }
    }

    /// Returns the distance from source to target (if they are connected).
    pub fn distance(&self) -> Option<T> {
        match self {
            Self::DistanceAndRoute((_, distance, _)) => Some(*distance),
            Self::NotConnected(_) => None,
        }
    }

    /// Returns the route from source to target, as a vector of edges (if they are connected).
    pub fn route(&self) -> Option<Vec<EdgeIndex>> {
        match self {
            Self::DistanceAndRoute((_, _, route)) => {
                Some(route.iter().map(|&e| EdgeIndex::new(e)).collect())
            }
            Self::NotConnected(_) => None,
        }
    }
}

/// Memory allocation to use for a point-to-point query.
#[derive(Clone, Debug)]
pub struct DijkstraAllocation<T> {
    /// Memory allocation for a unidirectional query.
    pub search: DefaultDijkstraSearch<T>,
    /// Memory allocation for a bidirectional query.
    pub bidirectional_search: DefaultBidirectionalSearch<T>,
}

impl<T: PartialOrd> Default for DijkstraAllocation<T> {
    fn default() -> Self {
        DijkstraAllocation {
            search: Default::default(),
            bidirectional_search: Default::default(),
        }
    }
}

fn build_thread_pool(nb_threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(nb_threads)
        .build()
        .context("Failed to initialize the thread pool")
}

/// Converts the index of a node given by a query to a [NodeIndex], if it is in the graph.
fn checked_node(index: u64, node_bound: usize) -> Option<NodeIndex> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < node_bound)
        .map(node_index)
}

/// Returns the result of a query whose target has been finalized by the search.
fn query_result<T, M, PQ>(
    search: &DijkstraSearch<T, M, PQ>,
    id: u64,
    target: NodeIndex,
) -> Result<QueryResult<T>>
where
    T: Length,
    M: NodeMap<Node = NodeIndex, Value = ScalarData<T>>,
    PQ: MinPriorityQueue<Key = NodeIndex, Value = T>,
{
    let Some(distance) = search.get_distance(&target) else {
        return Ok(QueryResult::NotConnected(id));
    };
    let route = search
        .get_arc_path(&target)
        .with_context(|| format!("Invalid route for query {id}"))?;
    Ok(QueryResult::DistanceAndRoute((
        id,
        distance,
        route.into_iter().map(|e| e.index()).collect(),
    )))
}

/// Runs point-to-point queries in parallel, using the [BidirectionalDijkstraOps] returned by
/// `make_ops`.
///
/// A new [BidirectionalDijkstraOps] is created for each query but the memory of the searches is
/// reused between the queries run by the same thread.
///
/// The results are returned in the same order as the queries.
/// A query whose source or target is not a node of the graph is reported as not connected.
pub fn run_queries_with<G, T, O, FO>(
    graph: G,
    queries: &[Query],
    parameters: &SearchParameters<T>,
    make_ops: FO,
) -> Result<Vec<QueryResult<T>>>
where
    G: NodeIndexable,
    T: Length,
    O: BidirectionalDijkstraOps<Label = T>,
    FO: Fn() -> O + Sync,
{
    let node_bound = graph.node_bound();
    let thread_pool = build_thread_pool(parameters.nb_threads)?;
    debug!(
        "Running {} queries on {} threads (bidirectional: {})",
        queries.len(),
        thread_pool.current_num_threads(),
        parameters.bidirectional,
    );
    thread_pool.install(|| {
        let pool: Pool<DijkstraAllocation<T>> =
            Pool::new(rayon::current_num_threads(), Default::default);
        queries
            .par_iter()
            .map_init(
                || pool.pull(Default::default),
                |alloc, query| {
                    let (Some(source), Some(target)) = (
                        checked_node(query.source, node_bound),
                        checked_node(query.target, node_bound),
                    ) else {
                        warn!(
                            "Query {} references a node which is not in the graph",
                            query.id
                        );
                        return Ok(QueryResult::NotConnected(query.id));
                    };
                    let mut ops = make_ops();
                    if parameters.bidirectional {
                        let search = &mut alloc.bidirectional_search;
                        search.set_policy(parameters.direction_policy);
                        search.solve_query(source, target, &mut ops);
                        query_result(search.get_forward_search(), query.id, target)
                    } else {
                        ops.set_endpoints(Some(source), Some(target));
                        let search = &mut alloc.search;
                        search.reset();
                        search.add_source(source, T::zero(), ops.forward_ops());
                        search.solve_until(target, ops.forward_ops());
                        query_result(search, query.id, target)
                    }
                },
            )
            .collect()
    })
}

/// Runs point-to-point shortest-path queries in parallel.
///
/// # Example
///
/// ```
/// use bijkstra::{run_queries, Query, QueryResult, SearchParameters};
/// use petgraph::graph::{DiGraph, EdgeReference};
///
/// let graph = DiGraph::<(), u32>::from_edges(&[(0, 1, 1), (1, 2, 2), (0, 2, 4)]);
/// let queries = [
///     Query { id: 0, source: 0, target: 2 },
///     Query { id: 1, source: 2, target: 0 },
/// ];
/// let results = run_queries(
///     &graph,
///     |e: EdgeReference<u32>| *e.weight(),
///     &queries,
///     &SearchParameters::default(),
/// )
/// .unwrap();
/// assert_eq!(results[0], QueryResult::DistanceAndRoute((0, 3, vec![0, 1])));
/// assert_eq!(results[1], QueryResult::NotConnected(1));
/// ```
pub fn run_queries<G, F, T>(
    graph: G,
    edge_label: F,
    queries: &[Query],
    parameters: &SearchParameters<T>,
) -> Result<Vec<QueryResult<T>>>
where
    G: IntoEdgesDirected<NodeId = NodeIndex, EdgeId = EdgeIndex> + NodeIndexable + Copy + Sync,
    F: Fn(G::EdgeRef) -> T + Copy + Sync,
    T: Length,
{
    run_queries_with(graph, queries, parameters, || {
        ScalarBidirectionalDijkstra::new(graph, edge_label)
    })
}

/// Runs point-to-point A* queries in parallel, guided by the given heuristic.
///
/// The heuristic must be consistent for the results to be exact: with an admissible heuristic
/// that is not consistent, some distances and routes can be non-optimal.
pub fn run_astar_queries<G, F, T, H>(
    graph: G,
    edge_label: F,
    heuristic: H,
    queries: &[Query],
    parameters: &SearchParameters<T>,
) -> Result<Vec<QueryResult<T>>>
where
    G: IntoEdgesDirected<NodeId = NodeIndex, EdgeId = EdgeIndex> + NodeIndexable + Copy + Sync,
    F: Fn(G::EdgeRef) -> T + Copy + Sync,
    T: Length,
    H: Heuristic<T> + Clone + Sync,
{
    run_queries_with(graph, queries, parameters, || {
        AStarBidirectionalDijkstra::new(graph, edge_label, heuristic.clone())
    })
}

/// Matrix of the shortest distances between a set of origins and a set of destinations.
#[derive(Clone, Debug, PartialEq)]
pub struct OdMatrix<T> {
    origins: Vec<NodeIndex>,
    destinations: Vec<NodeIndex>,
    /// Distances, row by row (`None` if the destination is not reached).
    values: Vec<Option<T>>,
}

impl<T: Copy> OdMatrix<T> {
    /// Returns the origins of the matrix.
    pub fn origins(&self) -> &[NodeIndex] {
        &self.origins
    }

    /// Returns the destinations of the matrix.
    pub fn destinations(&self) -> &[NodeIndex] {
        &self.destinations
    }

    /// Returns the distance between the `i`-th origin and the `j`-th destination (`None` if the
    /// destination cannot be reached from the origin).
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        assert!(j < self.destinations.len(), "Destination {j} is out of bounds");
        self.values[i * self.destinations.len() + j]
    }

    /// Returns the distances from the `i`-th origin to all the destinations.
    pub fn row(&self, i: usize) -> &[Option<T>] {
        let n = self.destinations.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// Returns an iterator over the `(origin, destination, distance)` triplets.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, Option<T>)> + '_ {
        self.origins.iter().enumerate().flat_map(move |(i, &o)| {
            self.destinations
                .iter()
                .zip(self.row(i))
                .map(move |(&d, &v)| (o, d, v))
        })
    }
}

/// Computes the shortest distances from each origin to each destination.
///
/// One forward search is run per origin (in parallel); it stops as soon as all the destinations
/// are finalized. When the parameters have a distance threshold, the destinations farther than
/// the threshold are reported as not reached. Origins and destinations that are not nodes of the
/// graph are logged and reported as not reached.
pub fn od_matrix<G, F, T>(
    graph: G,
    edge_label: F,
    origins: &[NodeIndex],
    destinations: &[NodeIndex],
    parameters: &SearchParameters<T>,
) -> Result<OdMatrix<T>>
where
    G: IntoEdgesDirected<NodeId = NodeIndex, EdgeId = EdgeIndex> + NodeIndexable + Sync,
    F: Fn(G::EdgeRef) -> T + Sync,
    T: Length,
{
    let node_bound = graph.node_bound();
    let is_valid = |node: &NodeIndex| node.index() < node_bound;
    for origin in origins.iter().filter(|&&o| !is_valid(&o)) {
        warn!("Origin {} is not a node of the graph", origin.index());
    }
    for destination in destinations.iter().filter(|&&d| !is_valid(&d)) {
        warn!("Destination {} is not a node of the graph", destination.index());
    }
    let valid_destinations: Vec<NodeIndex> =
        destinations.iter().copied().filter(is_valid).collect();
    let ops = match parameters.distance_threshold {
        Some(threshold) => ScalarDijkstra::new_forward_with_bound(graph, edge_label, threshold),
        None => ScalarDijkstra::new_forward(graph, edge_label),
    };
    let thread_pool = build_thread_pool(parameters.nb_threads)?;
    debug!(
        "Computing a {}x{} OD matrix on {} threads",
        origins.len(),
        destinations.len(),
        thread_pool.current_num_threads(),
    );
    let rows: Vec<Vec<Option<T>>> = thread_pool.install(|| {
        let pool: Pool<DefaultDijkstraSearch<T>> =
            Pool::new(rayon::current_num_threads(), Default::default);
        origins
            .par_iter()
            .map_init(
                || pool.pull(Default::default),
                |search, &origin| {
                    search.reset();
                    if !is_valid(&origin) {
                        return vec![None; destinations.len()];
                    }
                    search.add_source(origin, T::zero(), &ops);
                    search.solve_until_all(&valid_destinations, &ops);
                    destinations
                        .iter()
                        .map(|d| search.get_distance(d))
                        .collect::<Vec<_>>()
                },
            )
            .collect()
    });
    Ok(OdMatrix {
        origins: origins.to_vec(),
        destinations: destinations.to_vec(),
        values: rows.into_iter().flatten().collect(),
    })
}
