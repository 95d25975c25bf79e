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

//! Comparison of the bidirectional searches with a unidirectional Dijkstra search on random
//! networks.
use bijkstra::bidirectional_ops::{AStarBidirectionalDijkstra, ScalarBidirectionalDijkstra};
use bijkstra::heuristic::{EuclideanHeuristic, ZeroHeuristic};
use bijkstra::ops::ScalarDijkstra;
use bijkstra::*;
use petgraph::graph::{node_index, DiGraph, EdgeReference, NodeIndex};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;

const SEEDS: [u64; 4] = [13081, 42, 7, 2024];

/// Returns a random graph with `n` nodes and `m` edges whose lengths are in `[1, 20)`.
fn random_graph(rng: &mut XorShiftRng, n: usize, m: usize) -> DiGraph<(), u32> {
    let mut graph = DiGraph::with_capacity(n, m);
    for _ in 0..n {
        graph.add_node(());
    }
    for _ in 0..m {
        let source = node_index(rng.gen_range(0..n));
        let target = node_index(rng.gen_range(0..n));
        graph.add_edge(source, target, rng.gen_range(1..20));
    }
    graph
}

/// Returns random points in the unit square and a graph connecting each point to its closest
/// neighbours, with lengths at least equal to the straight-line distance.
fn random_geometric_graph(rng: &mut XorShiftRng, n: usize) -> (DiGraph<(), f64>, Vec<[f64; 2]>) {
    let points: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen(), rng.gen()]).collect();
    let mut graph = DiGraph::with_capacity(n, 4 * n);
    for _ in 0..n {
        graph.add_node(());
    }
    let distance = |i: usize, j: usize| {
        (points[i][0] - points[j][0]).hypot(points[i][1] - points[j][1])
    };
    for i in 0..n {
        let mut neighbours: Vec<usize> = (0..n).filter(|&j| j != i).collect();
        neighbours.sort_by(|&a, &b| distance(i, a).total_cmp(&distance(i, b)));
        for &j in neighbours.iter().take(4) {
            let detour = 1.0 + rng.gen::<f64>();
            graph.add_edge(node_index(i), node_index(j), detour * distance(i, j));
        }
    }
    (graph, points)
}

fn weight(e: EdgeReference<u32>) -> u32 {
    *e.weight()
}

/// Distances from `source` to all the nodes, computed with a unidirectional search.
fn reference_distances(graph: &DiGraph<(), u32>, source: NodeIndex) -> Vec<Option<u32>> {
    let ops = ScalarDijkstra::new_forward(graph, weight);
    let mut search = DefaultDijkstraSearch::default();
    search.add_source(source, 0, &ops);
    search.solve(&ops);
    graph
        .node_indices()
        .map(|node| search.get_distance(&node))
        .collect()
}

/// Checks that the arcs form a chain from `source` to `target` and returns their total length.
fn check_route(
    graph: &DiGraph<(), u32>,
    arcs: &[petgraph::graph::EdgeIndex],
    source: NodeIndex,
    target: NodeIndex,
) -> u32 {
    let mut current = source;
    let mut total = 0;
    for &edge in arcs {
        let (a, b) = graph.edge_endpoints(edge).unwrap();
        assert_eq!(a, current, "The route is not contiguous");
        total += graph[edge];
        current = b;
    }
    assert_eq!(current, target, "The route does not end at the target");
    total
}

#[test]
fn bidirectional_vs_unidirectional_test() {
    for seed in SEEDS {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let n = 40;
        let graph = random_graph(&mut rng, n, 120);
        for policy in [DirectionPolicy::default(), DirectionPolicy::Alternate] {
            let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
            let mut search = DefaultBidirectionalSearch::default().with_policy(policy);
            for s in graph.node_indices() {
                let expected = reference_distances(&graph, s);
                for t in graph.node_indices() {
                    let reached = search.solve_query(s, t, &mut ops);
                    assert_eq!(
                        reached,
                        expected[t.index()].is_some(),
                        "Reachability differs from {s:?} to {t:?} (seed {seed})"
                    );
                    assert_eq!(
                        search.get_distance(&t),
                        expected[t.index()],
                        "Distance differs from {s:?} to {t:?} (seed {seed})"
                    );
                    if reached {
                        let arcs = search.get_arc_path(&t).unwrap();
                        assert_eq!(
                            Some(check_route(&graph, &arcs, s, t)),
                            expected[t.index()]
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn zero_heuristic_vs_plain_test() {
    for seed in SEEDS {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng, 30, 90);
        let mut plain_ops = ScalarBidirectionalDijkstra::new(&graph, weight);
        let mut astar_ops = AStarBidirectionalDijkstra::new(&graph, weight, ZeroHeuristic);
        let mut plain = DefaultBidirectionalSearch::default();
        let mut astar = DefaultBidirectionalSearch::default();
        for _ in 0..200 {
            let s = node_index(rng.gen_range(0..30));
            let t = node_index(rng.gen_range(0..30));
            let reached = plain.solve_query(s, t, &mut plain_ops);
            assert_eq!(astar.solve_query(s, t, &mut astar_ops), reached);
            assert_eq!(astar.get_distance(&t), plain.get_distance(&t));
            if reached {
                let arcs = astar.get_arc_path(&t).unwrap();
                assert_eq!(
                    Some(check_route(&graph, &arcs, s, t)),
                    astar.get_distance(&t)
                );
            }
        }
    }
}

#[test]
fn euclidean_heuristic_test() {
    for seed in SEEDS {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let n = 60;
        let (graph, points) = random_geometric_graph(&mut rng, n);
        let length = |e: EdgeReference<f64>| *e.weight();
        let mut plain_ops = ScalarBidirectionalDijkstra::new(&graph, length);
        let mut astar_ops =
            AStarBidirectionalDijkstra::new(&graph, length, EuclideanHeuristic::new(&points));
        let mut plain = DefaultBidirectionalSearch::default();
        let mut astar = DefaultBidirectionalSearch::default();
        for _ in 0..200 {
            let s = node_index(rng.gen_range(0..n));
            let t = node_index(rng.gen_range(0..n));
            let reached = plain.solve_query(s, t, &mut plain_ops);
            assert_eq!(astar.solve_query(s, t, &mut astar_ops), reached);
            if reached {
                let expected = plain.get_distance(&t).unwrap();
                let actual = astar.get_distance(&t).unwrap();
                assert!(
                    expected.approx_eq(&actual),
                    "A* found {actual} instead of {expected} from {s:?} to {t:?} (seed {seed})"
                );
            } else {
                assert_eq!(astar.get_status(), SearchStatus::Exhausted);
            }
        }
    }
}

#[test]
fn batch_queries_test() {
    let mut rng = XorShiftRng::seed_from_u64(SEEDS[0]);
    let n = 50;
    let graph = random_graph(&mut rng, n, 150);
    let queries: Vec<Query> = (0..300)
        .map(|id| Query {
            id,
            source: rng.gen_range(0..n as u64),
            target: rng.gen_range(0..n as u64),
        })
        .collect();
    let parameters = SearchParameters {
        nb_threads: 4,
        ..Default::default()
    };
    let bidirectional = run_queries(&graph, weight, &queries, &parameters).unwrap();
    let unidirectional = run_queries(
        &graph,
        weight,
        &queries,
        &SearchParameters {
            bidirectional: false,
            ..parameters.clone()
        },
    )
    .unwrap();
    let astar = run_astar_queries(&graph, weight, ZeroHeuristic, &queries, &parameters).unwrap();
    for (((query, r1), r2), r3) in queries
        .iter()
        .zip(&bidirectional)
        .zip(&unidirectional)
        .zip(&astar)
    {
        let expected = reference_distances(&graph, node_index(query.source as usize))
            [query.target as usize];
        assert_eq!(r1.id(), query.id);
        assert_eq!(r1.distance(), expected);
        assert_eq!(r2.distance(), expected);
        assert_eq!(r3.distance(), expected);
        for result in [r1, r2, r3] {
            if let Some(route) = result.route() {
                let total = check_route(
                    &graph,
                    &route,
                    node_index(query.source as usize),
                    node_index(query.target as usize),
                );
                assert_eq!(Some(total), expected);
            }
        }
    }
}

#[test]
fn od_matrix_vs_queries_test() {
    let mut rng = XorShiftRng::seed_from_u64(SEEDS[1]);
    let n = 40;
    let graph = random_graph(&mut rng, n, 100);
    let origins: Vec<NodeIndex> = (0..8).map(|_| node_index(rng.gen_range(0..n))).collect();
    let destinations: Vec<NodeIndex> = (0..10).map(|_| node_index(rng.gen_range(0..n))).collect();
    let matrix = od_matrix(
        &graph,
        weight,
        &origins,
        &destinations,
        &SearchParameters::default(),
    )
    .unwrap();
    let bounded = od_matrix(
        &graph,
        weight,
        &origins,
        &destinations,
        &SearchParameters::default().with_threshold(15),
    )
    .unwrap();
    for (i, origin) in origins.iter().enumerate() {
        let expected = reference_distances(&graph, *origin);
        for (j, destination) in destinations.iter().enumerate() {
            assert_eq!(matrix.get(i, j), expected[destination.index()]);
            assert_eq!(
                bounded.get(i, j),
                expected[destination.index()].filter(|&d| d <= 15)
            );
        }
    }
}

#[test]
fn threshold_tree_test() {
    for seed in SEEDS {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let graph = random_graph(&mut rng, 40, 120);
        let source = node_index(0);
        let expected = reference_distances(&graph, source);
        let tree = shortest_path_tree(&graph, weight, source, Some(25));
        for node in graph.node_indices() {
            let expected = expected[node.index()].filter(|&d| d <= 25);
            assert_eq!(tree.distance(&node), expected);
            if let Some(distance) = expected {
                let arcs = tree.get_arc_path(&node).unwrap();
                assert_eq!(check_route(&graph, &arcs, source, node), distance);
            }
        }
    }
}
