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

//! The concrete scenarios of the bidirectional search on small networks.
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use bijkstra::bidirectional_ops::{AStarBidirectionalDijkstra, ScalarBidirectionalDijkstra};
use bijkstra::heuristic::ZeroHeuristic;
use bijkstra::*;
use petgraph::graph::{edge_index, node_index, DiGraph, EdgeReference, NodeIndex};
use petgraph::Direction;

const A: u32 = 0;
const B: u32 = 1;
const C: u32 = 2;
const D: u32 = 3;
const E: u32 = 4;

/// A -> B (1), B -> D (1), A -> C (4), C -> D (1), plus an isolated node E.
fn diamond() -> DiGraph<(), u32> {
    let mut graph = DiGraph::from_edges(&[(A, B, 1), (B, D, 1), (A, C, 4), (C, D, 1)]);
    graph.add_node(());
    graph
}

fn weight(e: EdgeReference<u32>) -> u32 {
    *e.weight()
}

#[test]
fn shortest_path_test() {
    let graph = diamond();
    let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    assert!(search.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut ops));
    assert_eq!(search.get_status(), SearchStatus::PathFound);
    assert_eq!(search.get_distance(&NodeIndex::from(D)), Some(2));
    assert_eq!(search.get_meeting().map(|m| m.distance), Some(2));
    assert_eq!(
        search.get_path(&NodeIndex::from(D)).unwrap(),
        vec![NodeIndex::from(A), NodeIndex::from(B), NodeIndex::from(D)]
    );
    assert_eq!(
        search.get_arc_path(&NodeIndex::from(D)).unwrap(),
        vec![edge_index(0), edge_index(1)]
    );
}

#[test]
fn disconnected_test() {
    let graph = diamond();
    let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    assert!(!search.solve_query(NodeIndex::from(A), NodeIndex::from(E), &mut ops));
    assert_eq!(search.get_status(), SearchStatus::Exhausted);
    assert!(!search.is_reached(&NodeIndex::from(E)));
    assert_eq!(search.get_distance(&NodeIndex::from(E)), None);
    assert!(search.get_meeting().is_none());
    assert!(search.get_path(&NodeIndex::from(E)).is_err());
    // Same thing in the other direction.
    assert!(!search.solve_query(NodeIndex::from(E), NodeIndex::from(A), &mut ops));
    assert!(!search.is_reached(&NodeIndex::from(A)));
}

#[test]
fn single_node_test() {
    let mut graph = DiGraph::<(), u32>::new();
    let node = graph.add_node(());
    let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    assert!(search.solve_query(node, node, &mut ops));
    assert_eq!(search.get_status(), SearchStatus::PathFound);
    assert_eq!(search.get_distance(&node), Some(0));
    assert!(search.get_arc_path(&node).unwrap().is_empty());
    assert_eq!(search.get_path(&node).unwrap(), vec![node]);
    // Source equals target in a larger graph.
    let graph = diamond();
    let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    assert!(search.solve_query(NodeIndex::from(B), NodeIndex::from(B), &mut ops));
    assert_eq!(search.get_distance(&NodeIndex::from(B)), Some(0));
    assert!(search.get_arc_path(&NodeIndex::from(B)).unwrap().is_empty());
}

#[test]
fn tie_breaking_test() {
    let graph = DiGraph::<(), u32>::from_edges(&[(A, B, 1), (B, D, 1), (A, C, 1), (C, D, 1)]);
    for policy in [DirectionPolicy::default(), DirectionPolicy::Alternate] {
        let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
        let mut search = DefaultBidirectionalSearch::default().with_policy(policy);
        assert!(search.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut ops));
        assert_eq!(search.get_distance(&NodeIndex::from(D)), Some(2));
        let arcs = search.get_arc_path(&NodeIndex::from(D)).unwrap();
        assert_eq!(arcs.len(), 2);
        let first = graph.edge_endpoints(arcs[0]).unwrap();
        let second = graph.edge_endpoints(arcs[1]).unwrap();
        assert_eq!(first.0, NodeIndex::from(A));
        assert_eq!(first.1, second.0);
        assert_eq!(second.1, NodeIndex::from(D));
    }
}

#[test]
fn zero_heuristic_test() {
    let graph = diamond();
    let mut plain_ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut plain = DefaultBidirectionalSearch::default();
    plain.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut plain_ops);

    let mut astar_ops = AStarBidirectionalDijkstra::new(&graph, weight, ZeroHeuristic);
    let mut astar = DefaultBidirectionalSearch::default();
    assert!(astar.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut astar_ops));
    assert_eq!(astar.get_status(), SearchStatus::PathFound);
    assert_eq!(
        astar.get_distance(&NodeIndex::from(D)),
        plain.get_distance(&NodeIndex::from(D))
    );
    assert_eq!(
        astar.get_arc_path(&NodeIndex::from(D)).unwrap(),
        plain.get_arc_path(&NodeIndex::from(D)).unwrap()
    );

    assert!(!astar.solve_query(NodeIndex::from(A), NodeIndex::from(E), &mut astar_ops));
    assert_eq!(astar.get_status(), SearchStatus::Exhausted);
}

#[test]
fn reset_test() {
    let graph = diamond();
    let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    search.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut ops);
    let distance = search.get_distance(&NodeIndex::from(D));
    let arcs = search.get_arc_path(&NodeIndex::from(D)).unwrap();
    let counters = (*search.forward_counters(), *search.backward_counters());

    // Another query in between must not leak into the next one.
    search.solve_query(NodeIndex::from(C), NodeIndex::from(D), &mut ops);
    assert_eq!(search.get_distance(&NodeIndex::from(D)), Some(1));
    assert!(!search.is_reached(&NodeIndex::from(A)));

    search.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut ops);
    assert_eq!(search.get_distance(&NodeIndex::from(D)), distance);
    assert_eq!(search.get_arc_path(&NodeIndex::from(D)).unwrap(), arcs);
    assert_eq!(
        (*search.forward_counters(), *search.backward_counters()),
        counters
    );

    search.reset();
    assert_eq!(search.get_status(), SearchStatus::Initialized);
    assert!(search.get_meeting().is_none());
    assert!(!search.is_reached(&NodeIndex::from(A)));
    assert_eq!(search.choose_direction(), None);
}

#[test]
fn monotonic_finalization_test() {
    // Two parallel chains between 0 and 9 with a few shortcuts.
    let graph = DiGraph::<(), u32>::from_edges(&[
        (0, 1, 2),
        (1, 2, 2),
        (2, 3, 2),
        (3, 9, 2),
        (0, 4, 1),
        (4, 5, 3),
        (5, 6, 1),
        (6, 9, 3),
        (1, 5, 1),
        (4, 2, 2),
        (6, 3, 0),
        (2, 7, 1),
        (7, 8, 1),
        (8, 9, 1),
    ]);
    let ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    search.add_source(node_index(0), 0, &ops);
    search.add_target(node_index(9), 0, &ops);
    let mut finalized: HashMap<(bool, NodeIndex), u32> = HashMap::new();
    while search.next(&ops).is_some() {
        for node in graph.node_indices() {
            for (forward, s) in [
                (true, search.get_forward_search()),
                (false, search.get_backward_search()),
            ] {
                if let Some(d) = s.get_distance(&node) {
                    let previous = *finalized.entry((forward, node)).or_insert(d);
                    assert_eq!(previous, d, "Distance of node {node:?} changed");
                }
            }
        }
    }
    assert_eq!(search.get_status(), SearchStatus::Running);
    assert!(search.get_forward_search().is_empty());
    assert!(search.get_backward_search().is_empty());
    assert_eq!(search.get_meeting().map(|m| m.distance), Some(6));
}

#[test]
fn step_direction_test() {
    let graph = diamond();
    let ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default().with_policy(DirectionPolicy::Alternate);
    search.add_source(NodeIndex::from(A), 0, &ops);
    search.add_target(NodeIndex::from(D), 0, &ops);
    let mut directions = Vec::new();
    while let Some(step) = search.next(&ops) {
        let (Step::Settled(_, direction) | Step::Met(_, direction) | Step::Rejected(_, direction)) =
            step;
        directions.push(direction);
        if let Step::Met(..) = step {
            break;
        }
    }
    // The directions alternate, starting with the forward one.
    for (i, direction) in directions.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Direction::Outgoing
        } else {
            Direction::Incoming
        };
        assert_eq!(*direction, expected);
    }
    assert_eq!(search.get_meeting().map(|m| m.distance), Some(2));
}

#[test]
fn interrupt_test() {
    let graph = diamond();
    let mut ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    let flag = Arc::new(AtomicBool::new(true));
    search.set_interrupt(Some(Arc::clone(&flag)));
    assert!(!search.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut ops));
    assert_eq!(search.get_status(), SearchStatus::Interrupted);
    assert_eq!(search.forward_counters().scanned, 0);

    // The flag is kept after a reset.
    flag.store(false, std::sync::atomic::Ordering::Relaxed);
    assert!(search.solve_query(NodeIndex::from(A), NodeIndex::from(D), &mut ops));
    assert_eq!(search.get_status(), SearchStatus::PathFound);
}

#[test]
fn multiple_sources_test() {
    let graph = diamond();
    let ops = ScalarBidirectionalDijkstra::new(&graph, weight);
    let mut search = DefaultBidirectionalSearch::default();
    // Source A starts with an initial distance of 2.
    search.add_source(NodeIndex::from(A), 2, &ops);
    search.add_source(NodeIndex::from(C), 0, &ops);
    search.add_target(NodeIndex::from(D), 0, &ops);
    search.solve(&ops);
    assert_eq!(search.get_status(), SearchStatus::PathFound);
    assert_eq!(search.get_distance(&NodeIndex::from(D)), Some(1));
    assert_eq!(
        search.get_path(&NodeIndex::from(D)).unwrap(),
        vec![NodeIndex::from(C), NodeIndex::from(D)]
    );
    assert_eq!(search.get_meeting().map(|m| m.distance), Some(1));
}
