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

//! Bidirectional Dijkstra search.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use length::Length;
use log::{debug, trace, warn};
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::Direction;

use crate::bidirectional_ops::BidirectionalDijkstraOps;
use crate::min_queue::MinPriorityQueue;
use crate::node_data::{Predecessor, ScalarData};
use crate::node_map::NodeMap;
use crate::ops::DijkstraOps;
use crate::parameters::DirectionPolicy;
use crate::search::{DijkstraSearch, Relaxation, SearchCounters};

/// Status of a [BidirectionalDijkstraSearch].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// The search has been reset and no node has been settled yet.
    #[default]
    Initialized,
    /// Nodes are being settled.
    Running,
    /// The search is over and a path between a source and a target has been found.
    PathFound,
    /// The search is over and no path between a source and a target exists.
    Exhausted,
    /// The search was stopped by the interrupt flag.
    Interrupted,
}

/// Best known path between the sources and the targets of a [BidirectionalDijkstraSearch].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Meeting<T> {
    /// Node where the forward and the backward paths are joined.
    pub node: NodeIndex,
    /// Total length of the path (including the initial labels of the source and the target).
    pub distance: T,
}

/// Outcome of one step of a [BidirectionalDijkstraSearch].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The node was popped and its edges were relaxed.
    Settled(NodeIndex, Direction),
    /// The node was popped and it was already finalized in the opposite direction.
    Met(NodeIndex, Direction),
    /// The node was popped but it could not improve the best known path so its edges were not
    /// relaxed.
    Rejected(NodeIndex, Direction),
}

/// A data structure that can be used to run bidirectional Dijkstra's algorithms.
///
/// The structure holds a forward and a backward [DijkstraSearch]. The forward search starts from
/// the sources and explores outgoing edges; the backward search starts from the targets and
/// explores incoming edges. The two searches advance in turn, following a [DirectionPolicy],
/// until they meet.
///
/// When the search is over, the forward search holds the shortest path from a source to the
/// target reached: the part of the path explored by the backward search is copied into the
/// forward predecessor map.
///
/// See [ScalarBidirectionalDijkstra](crate::bidirectional_ops::ScalarBidirectionalDijkstra) for
/// an example.
#[derive(Clone, Debug)]
pub struct BidirectionalDijkstraSearch<T, M, PQ> {
    forward_search: DijkstraSearch<T, M, PQ>,
    backward_search: DijkstraSearch<T, M, PQ>,
    meeting: Option<Meeting<T>>,
    sources: Vec<NodeIndex>,
    targets: Vec<NodeIndex>,
    /// Key of the last node expanded by the forward search.
    last_forward_key: Option<T>,
    /// Key of the last node expanded by the backward search.
    last_backward_key: Option<T>,
    current_direction: Direction,
    policy: DirectionPolicy,
    status: SearchStatus,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<T, M: Default, PQ: Default> Default for BidirectionalDijkstraSearch<T, M, PQ> {
    fn default() -> Self {
        BidirectionalDijkstraSearch::new(Default::default(), Default::default())
    }
}

impl<T, M, PQ> BidirectionalDijkstraSearch<T, M, PQ> {
    /// Initializes a new BidirectionalDijkstraSearch from a forward and a backward
    /// [DijkstraSearch].
    pub fn new(
        forward_search: DijkstraSearch<T, M, PQ>,
        backward_search: DijkstraSearch<T, M, PQ>,
    ) -> Self {
        BidirectionalDijkstraSearch {
            forward_search,
            backward_search,
            meeting: None,
            sources: Vec::new(),
            targets: Vec::new(),
            last_forward_key: None,
            last_backward_key: None,
            current_direction: Direction::Incoming,
            policy: Default::default(),
            status: Default::default(),
            interrupt: None,
        }
    }

    /// Sets the [DirectionPolicy] of the search.
    pub fn with_policy(mut self, policy: DirectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the [DirectionPolicy] of the search.
    pub fn set_policy(&mut self, policy: DirectionPolicy) {
        self.policy = policy;
    }

    /// Sets a flag that stops the search when it is set to `true`.
    ///
    /// The flag is checked before each step of the search.
    pub fn set_interrupt(&mut self, flag: Option<Arc<AtomicBool>>) {
        self.interrupt = flag;
    }

    /// Returns a reference to the [DijkstraSearch] for the forward direction.
    pub fn get_forward_search(&self) -> &DijkstraSearch<T, M, PQ> {
        &self.forward_search
    }

    /// Returns a reference to the [DijkstraSearch] for the backward direction.
    pub fn get_backward_search(&self) -> &DijkstraSearch<T, M, PQ> {
        &self.backward_search
    }

    /// Returns the counters of the forward search.
    pub fn forward_counters(&self) -> &SearchCounters {
        self.forward_search.counters()
    }

    /// Returns the counters of the backward search.
    pub fn backward_counters(&self) -> &SearchCounters {
        self.backward_search.counters()
    }

    /// Returns the current status of the search.
    pub fn get_status(&self) -> SearchStatus {
        self.status
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl<T: Copy, M, PQ> BidirectionalDijkstraSearch<T, M, PQ> {
    /// Returns the best known path between the sources and the targets (if any).
    pub fn get_meeting(&self) -> Option<Meeting<T>> {
        self.meeting
    }
}

impl<T, M, PQ> BidirectionalDijkstraSearch<T, M, PQ>
where
    T: Length,
    M: NodeMap<Node = NodeIndex, Value = ScalarData<T>>,
    PQ: MinPriorityQueue<Key = NodeIndex, Value = T>,
{
    /// Resets all data structures of the BidirectionalDijkstraSearch.
    ///
    /// The policy and the interrupt flag are kept.
    pub fn reset(&mut self) {
        self.forward_search.reset();
        self.backward_search.reset();
        self.meeting = None;
        self.sources.clear();
        self.targets.clear();
        self.last_forward_key = None;
        self.last_backward_key = None;
        self.current_direction = Direction::Incoming;
        self.status = SearchStatus::Initialized;
    }

    /// Adds a source to the forward search, with the given initial distance.
    ///
    /// If the source is already in the forward heap with a larger distance, its distance is
    /// improved.
    pub fn add_source<O>(&mut self, node: NodeIndex, label: T, ops: &O) -> bool
    where
        O: BidirectionalDijkstraOps<Label = T>,
    {
        self.sources.push(node);
        self.forward_search.add_source(node, label, ops.forward_ops())
    }

    /// Adds a target to the backward search, with the given initial distance.
    ///
    /// If the target is already in the backward heap with a larger distance, its distance is
    /// improved.
    pub fn add_target<O>(&mut self, node: NodeIndex, label: T, ops: &O) -> bool
    where
        O: BidirectionalDijkstraOps<Label = T>,
    {
        self.targets.push(node);
        self.backward_search
            .add_source(node, label, ops.backward_ops())
    }

    /// Returns the direction of the next step, or `None` if both heaps are empty.
    pub fn choose_direction(&self) -> Option<Direction> {
        match (
            self.forward_search.is_empty(),
            self.backward_search.is_empty(),
        ) {
            (true, true) => None,
            (true, false) => Some(Direction::Incoming),
            (false, true) => Some(Direction::Outgoing),
            (false, false) => Some(self.policy.next_direction(
                self.forward_search.counters(),
                self.backward_search.counters(),
                self.current_direction,
            )),
        }
    }

    /// Runs one step of the search: pops a node in the direction chosen by the
    /// [DirectionPolicy] and relaxes its edges.
    ///
    /// Return `None` if both heaps are empty.
    pub fn next<O>(&mut self, ops: &O) -> Option<Step>
    where
        O: BidirectionalDijkstraOps<Label = T>,
    {
        let direction = self.choose_direction()?;
        self.current_direction = direction;
        if self.status == SearchStatus::Initialized {
            self.status = SearchStatus::Running;
        }
        match direction {
            Direction::Outgoing => advance(
                &mut self.forward_search,
                &self.backward_search,
                ops.forward_ops(),
                ops,
                direction,
                &mut self.meeting,
                &mut self.last_forward_key,
                self.last_backward_key,
            ),
            Direction::Incoming => advance(
                &mut self.backward_search,
                &self.forward_search,
                ops.backward_ops(),
                ops,
                direction,
                &mut self.meeting,
                &mut self.last_backward_key,
                self.last_forward_key,
            ),
        }
    }

    /// Runs the search until the shortest path between the sources and the targets is found.
    ///
    /// If there is no target, the forward search settles all the nodes reachable from the
    /// sources.
    pub fn solve<O>(&mut self, ops: &O)
    where
        O: BidirectionalDijkstraOps<Label = T>,
    {
        self.status = SearchStatus::Running;
        if self.targets.is_empty() {
            let forward_ops = ops.forward_ops();
            while let Some((node, key)) = self.forward_search.peek() {
                if self.is_interrupted() {
                    self.status = SearchStatus::Interrupted;
                    self.log_summary();
                    return;
                }
                if forward_ops.stop(node, key) {
                    break;
                }
                self.forward_search.settle_next(forward_ops);
            }
            self.status = SearchStatus::Exhausted;
            self.log_summary();
            return;
        }
        while !self.forward_search.is_empty() && !self.backward_search.is_empty() {
            if self.is_interrupted() {
                self.status = SearchStatus::Interrupted;
                self.log_summary();
                return;
            }
            if let Some(Step::Met(..)) = self.next(ops) {
                if ops.stop_on_meeting() {
                    break;
                }
            }
        }
        self.close_seeds();
        if let Some(meeting) = self.meeting {
            self.stitch(meeting, ops);
            self.status = SearchStatus::PathFound;
        } else {
            self.status = SearchStatus::Exhausted;
        }
        self.log_summary();
    }

    /// Resets the search and finds the shortest path from `source` to `target`.
    ///
    /// Returns `true` if the target can be reached from the source.
    pub fn solve_query<O>(&mut self, source: NodeIndex, target: NodeIndex, ops: &mut O) -> bool
    where
        O: BidirectionalDijkstraOps<Label = T>,
    {
        self.reset();
        ops.set_endpoints(Some(source), Some(target));
        self.add_source(source, T::zero(), ops);
        self.add_target(target, T::zero(), ops);
        self.solve(ops);
        self.is_reached(&target)
    }

    /// Returns `true` if the node has been finalized by the forward search.
    ///
    /// When the search is over, the target of the shortest path is finalized by the forward
    /// search.
    pub fn is_reached(&self, node: &NodeIndex) -> bool {
        self.forward_search.is_reached(node)
    }

    /// Returns the distance from the sources to a node finalized by the forward search.
    pub fn get_distance(&self, node: &NodeIndex) -> Option<T> {
        self.forward_search.get_distance(node)
    }

    /// Returns the path from a source to a node finalized by the forward search, as a vector of
    /// nodes.
    pub fn get_path(&self, node: &NodeIndex) -> Result<Vec<NodeIndex>> {
        self.forward_search.get_path(node)
    }

    /// Returns the path from a source to a node finalized by the forward search, as a vector of
    /// edges.
    pub fn get_arc_path(&self, node: &NodeIndex) -> Result<Vec<EdgeIndex>> {
        self.forward_search.get_arc_path(node)
    }

    /// Adds as candidates the sources finalized by the backward search and the targets finalized
    /// by the forward search.
    fn close_seeds(&mut self) {
        for source in self.sources.iter() {
            if let (Some(&forward), Some(backward)) = (
                self.forward_search.get_label(source),
                self.backward_search.get_distance(source),
            ) {
                update_meeting(&mut self.meeting, *source, forward.plus(backward));
            }
        }
        for target in self.targets.iter() {
            if let (Some(forward), Some(&backward)) = (
                self.forward_search.get_distance(target),
                self.backward_search.get_label(target),
            ) {
                update_meeting(&mut self.meeting, *target, forward.plus(backward));
            }
        }
    }

    /// Copies the backward path from the meeting node to a target into the forward search.
    fn stitch<O>(&mut self, meeting: Meeting<T>, ops: &O)
    where
        O: BidirectionalDijkstraOps<Label = T>,
    {
        let mut node = meeting.node;
        let Some(&(mut label, predecessor)) = self.forward_search.node_map().get_value(&node)
        else {
            warn!(
                "Meeting node {} has not been explored by the forward search",
                node.index()
            );
            return;
        };
        self.forward_search
            .finalize_node(node, label, predecessor, ops.forward_ops());
        while let Some(&Predecessor { node: next, edge }) =
            self.backward_search.get_predecessor(&node)
        {
            let Some(edge_ref) = ops.backward_ops().find_edge(next, edge) else {
                warn!(
                    "Edge {} cannot be found from node {}",
                    edge.index(),
                    next.index()
                );
                return;
            };
            label = ops.backward_ops().link(&label, edge_ref);
            self.forward_search.finalize_node(
                next,
                label,
                Some(Predecessor::new(node, edge)),
                ops.forward_ops(),
            );
            node = next;
        }
    }

    fn log_summary(&self) {
        debug!(
            "Bidirectional search over (status: {:?}, meeting: {:?}, forward: {:?}, backward: {:?})",
            self.status,
            self.meeting,
            self.forward_search.counters(),
            self.backward_search.counters(),
        );
    }
}

/// Records a candidate path through `node` if it is shorter than the best known path.
fn update_meeting<T: Length>(meeting: &mut Option<Meeting<T>>, node: NodeIndex, distance: T) {
    if meeting.map_or(true, |m| distance.less(&m.distance)) {
        trace!("New best path through node {}: {distance:?}", node.index());
        *meeting = Some(Meeting { node, distance });
    }
}

/// Pops the next node of `this` search and relaxes its edges, looking for nodes already
/// finalized by the `other` search.
#[allow(clippy::too_many_arguments)]
fn advance<T, M, PQ, O, B>(
    this: &mut DijkstraSearch<T, M, PQ>,
    other: &DijkstraSearch<T, M, PQ>,
    this_ops: &O,
    ops: &B,
    direction: Direction,
    meeting: &mut Option<Meeting<T>>,
    last_this_key: &mut Option<T>,
    last_other_key: Option<T>,
) -> Option<Step>
where
    T: Length,
    M: NodeMap<Node = NodeIndex, Value = ScalarData<T>>,
    PQ: MinPriorityQueue<Key = NodeIndex, Value = T>,
    O: DijkstraOps<Label = T>,
    B: BidirectionalDijkstraOps<Label = T>,
{
    let (node, key) = this.pop()?;
    let label = *this
        .get_label(&node)
        .expect("Popped node has no label");
    if let Some(other_label) = other.get_distance(&node) {
        this.counters_mut().important += 1;
        update_meeting(meeting, node, label.plus(other_label));
        *last_this_key = Some(key);
        return Some(Step::Met(node, direction));
    }
    if let Some(best) = meeting.map(|m| m.distance) {
        let last_other_key = last_other_key.unwrap_or_else(T::zero);
        if ops.can_be_pruned(direction, node, label, key, best, last_other_key) {
            this.counters_mut().rejected += 1;
            trace!(
                "Node {} rejected ({direction:?}): key = {key:?}, best = {best:?}",
                node.index()
            );
            return Some(Step::Rejected(node, direction));
        }
    }
    *last_this_key = Some(key);
    let mut important = 0;
    this.relax_edges(node, this_ops, |next, relaxation, next_label| {
        if relaxation == Relaxation::AlreadyFinalized {
            return;
        }
        if let Some(other_label) = other.get_distance(&next) {
            important += 1;
            update_meeting(meeting, next, next_label.plus(other_label));
        }
    });
    this.counters_mut().important += important;
    Some(Step::Settled(node, direction))
}
