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

//! Estimates of the remaining distance between two nodes, used to guide A* searches.
//!
//! A heuristic must be admissible (it never overestimates the shortest distance from `from` to
//! `to`). The bidirectional A* search additionally requires it to be consistent:
//! `estimate(u, t) <= length(u, v) + estimate(v, t)` for every edge `(u, v)`, and symmetrically
//! for the estimates computed from the source. With a heuristic that is admissible but not
//! consistent, the bidirectional A* search can finalize a node with a non-optimal distance and
//! return a non-optimal path. [find_inconsistent_edge] can be used to check a heuristic before
//! running queries.
use length::Length;
use petgraph::graph::NodeIndex;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

/// Trait representing an estimate of the shortest distance between two nodes.
pub trait Heuristic<T> {
    /// Returns a lower bound of the shortest distance from `from` to `to`.
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> T;
}

impl<T, F> Heuristic<T> for F
where
    F: Fn(NodeIndex, NodeIndex) -> T,
{
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> T {
        self(from, to)
    }
}

/// Returns the first edge `(u, v)` such that `estimate(u, goal) > length(u, v) + estimate(v, goal)`,
/// or `None` if the heuristic is consistent towards `goal`.
pub fn find_inconsistent_edge<G, F, T, H>(
    graph: G,
    edge_label: F,
    heuristic: &H,
    goal: NodeIndex,
) -> Option<G::EdgeId>
where
    G: IntoEdgeReferences<NodeId = NodeIndex>,
    F: Fn(G::EdgeRef) -> T,
    T: Length,
    H: Heuristic<T>,
{
    graph
        .edge_references()
        .find(|edge| {
            let through = edge_label(*edge).plus(heuristic.estimate(edge.target(), goal));
            through.less(&heuristic.estimate(edge.source(), goal))
        })
        .map(|edge| edge.id())
}

/// Heuristic that always returns zero: an A* search using it is a Dijkstra search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl<T: Length> Heuristic<T> for ZeroHeuristic {
    fn estimate(&self, _from: NodeIndex, _to: NodeIndex) -> T {
        T::zero()
    }
}

/// Straight-line distance between the planar coordinates of the nodes, multiplied by a scale
/// factor.
///
/// The heuristic is consistent as long as the length of every edge is at least `scale` times the
/// straight-line distance between its endpoints.
///
/// # Example
///
/// ```
/// use bijkstra::heuristic::{EuclideanHeuristic, Heuristic};
/// use petgraph::graph::node_index;
///
/// let coordinates = [[0.0, 0.0], [3.0, 4.0]];
/// let heuristic = EuclideanHeuristic::new(&coordinates);
/// assert_eq!(heuristic.estimate(node_index(0), node_index(1)), 5.0);
/// let heuristic = EuclideanHeuristic::with_scale(&coordinates, 0.5);
/// assert_eq!(heuristic.estimate(node_index(1), node_index(0)), 2.5);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct EuclideanHeuristic<'a> {
    /// `[x, y]` coordinates of the nodes, indexed by node.
    coordinates: &'a [[f64; 2]],
    scale: f64,
}

impl<'a> EuclideanHeuristic<'a> {
    /// Creates a new EuclideanHeuristic from the coordinates of the nodes.
    pub fn new(coordinates: &'a [[f64; 2]]) -> Self {
        Self::with_scale(coordinates, 1.0)
    }

    /// Creates a new EuclideanHeuristic where the straight-line distances are multiplied by
    /// `scale` (e.g., the inverse of the maximum speed to estimate travel times).
    pub fn with_scale(coordinates: &'a [[f64; 2]], scale: f64) -> Self {
        debug_assert!(scale >= 0.0);
        EuclideanHeuristic { coordinates, scale }
    }
}

impl Heuristic<f64> for EuclideanHeuristic<'_> {
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        let [x0, y0] = self.coordinates[from.index()];
        let [x1, y1] = self.coordinates[to.index()];
        self.scale * (x1 - x0).hypot(y1 - y0)
    }
}

/// Mean radius of the Earth, in meters.
const EARTH_RADIUS: f64 = 6_371_000.0;

/// Great-circle distance (in meters) between the `[longitude, latitude]` coordinates (in degrees)
/// of the nodes, multiplied by a scale factor.
#[derive(Copy, Clone, Debug)]
pub struct HaversineHeuristic<'a> {
    coordinates: &'a [[f64; 2]],
    scale: f64,
}

impl<'a> HaversineHeuristic<'a> {
    /// Creates a new HaversineHeuristic from the `[longitude, latitude]` coordinates of the
    /// nodes.
    pub fn new(coordinates: &'a [[f64; 2]]) -> Self {
        Self::with_scale(coordinates, 1.0)
    }

    /// Creates a new HaversineHeuristic where the distances (in meters) are multiplied by
    /// `scale`.
    pub fn with_scale(coordinates: &'a [[f64; 2]], scale: f64) -> Self {
        debug_assert!(scale >= 0.0);
        HaversineHeuristic { coordinates, scale }
    }
}

impl Heuristic<f64> for HaversineHeuristic<'_> {
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        let [lon0, lat0] = self.coordinates[from.index()];
        let [lon1, lat1] = self.coordinates[to.index()];
        let dlat = (lat1 - lat0).to_radians();
        let dlon = (lon1 - lon0).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + lat0.to_radians().cos() * lat1.to_radians().cos() * (dlon / 2.0).sin().powi(2);
        // Clamp to avoid NaN for antipodal points with rounding errors.
        let c = 2.0 * a.sqrt().min(1.0).asin();
        self.scale * EARTH_RADIUS * c
    }
}
