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

//! Parameters of the shortest-path searches.
use petgraph::Direction;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::search::SearchCounters;

/// Rule used by a bidirectional search to choose which direction advances next.
///
/// The rule only affects the amount of work done: both directions keep making progress, so the
/// distances found are the same for all policies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "values")]
pub enum DirectionPolicy {
    /// Advance the direction which has done the least work so far, where the work is a weighted
    /// sum of the number of inserted, scanned and decreased nodes.
    Balanced {
        /// Weight of the nodes pushed to the heap.
        inserted_weight: u64,
        /// Weight of the nodes popped from the heap.
        scanned_weight: u64,
        /// Weight of the decreased tentative distances.
        decreased_weight: u64,
    },
    /// Alternate between the forward and the backward directions.
    Alternate,
}

impl Default for DirectionPolicy {
    fn default() -> Self {
        DirectionPolicy::Balanced {
            inserted_weight: 1,
            scanned_weight: 2,
            decreased_weight: 1,
        }
    }
}

impl DirectionPolicy {
    /// Returns the work measure of a direction given its counters.
    ///
    /// With [DirectionPolicy::Alternate], the work is the number of scanned nodes.
    /// The weighted sum saturates at `u64::MAX`.
    pub fn work(&self, counters: &SearchCounters) -> u64 {
        match *self {
            Self::Balanced {
                inserted_weight,
                scanned_weight,
                decreased_weight,
            } => {
                counters
                    .inserted
                    .saturating_mul(inserted_weight)
                    .saturating_add(counters.scanned.saturating_mul(scanned_weight))
                    .saturating_add(counters.decreased.saturating_mul(decreased_weight))
            }
            Self::Alternate => counters.scanned,
        }
    }

    /// Returns the direction to advance next, given the counters of the two directions and the
    /// previous direction.
    pub fn next_direction(
        &self,
        forward: &SearchCounters,
        backward: &SearchCounters,
        previous: Direction,
    ) -> Direction {
        match self {
            Self::Balanced { .. } => {
                if self.work(forward) > self.work(backward) {
                    Direction::Incoming
                } else {
                    Direction::Outgoing
                }
            }
            Self::Alternate => previous.opposite(),
        }
    }
}

fn default_is_true() -> bool {
    true
}

/// Set of parameters used when running shortest-path queries.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[schemars(title = "Search Parameters")]
#[schemars(description = "Set of parameters used when running shortest-path queries.")]
pub struct SearchParameters<T> {
    /// Rule used to choose the direction of the next step of bidirectional searches.
    #[serde(default)]
    pub direction_policy: DirectionPolicy,
    /// If `false`, point-to-point queries are answered with a unidirectional search stopped at the
    /// target.
    #[serde(default = "default_is_true")]
    pub bidirectional: bool,
    /// Nodes farther than this distance from the origin are not settled by shortest-path trees
    /// and OD matrices.
    #[serde(default)]
    pub distance_threshold: Option<T>,
    /// Number of threads to use for batch queries (`0` means all the threads of the global
    /// thread pool).
    #[serde(default)]
    pub nb_threads: usize,
}

impl<T> Default for SearchParameters<T> {
    fn default() -> Self {
        SearchParameters {
            direction_policy: Default::default(),
            bidirectional: true,
            distance_threshold: None,
            nb_threads: 0,
        }
    }
}

impl<T> SearchParameters<T> {
    /// Returns SearchParameters with the given distance threshold.
    pub fn with_threshold(mut self, threshold: T) -> Self {
        self.distance_threshold = Some(threshold);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_policy_test() {
        let policy = DirectionPolicy::default();
        let forward = SearchCounters {
            scanned: 2,
            inserted: 3,
            decreased: 1,
            ..Default::default()
        };
        let backward = SearchCounters {
            scanned: 3,
            inserted: 1,
            ..Default::default()
        };
        assert_eq!(policy.work(&forward), 8);
        assert_eq!(policy.work(&backward), 7);
        assert_eq!(
            policy.next_direction(&forward, &backward, Direction::Outgoing),
            Direction::Incoming
        );
        assert_eq!(
            policy.next_direction(&backward, &forward, Direction::Incoming),
            Direction::Outgoing
        );
        // Ties are broken in favor of the forward direction.
        assert_eq!(
            policy.next_direction(&forward, &forward, Direction::Outgoing),
            Direction::Outgoing
        );
    }

    #[test]
    fn saturated_work_test() {
        let policy = DirectionPolicy::Balanced {
            inserted_weight: u64::MAX,
            scanned_weight: u64::MAX,
            decreased_weight: 0,
        };
        let busy = SearchCounters {
            scanned: 3,
            inserted: 2,
            decreased: u64::MAX,
            ..Default::default()
        };
        let idle = SearchCounters::default();
        assert_eq!(policy.work(&busy), u64::MAX);
        assert_eq!(policy.work(&idle), 0);
        assert_eq!(
            policy.next_direction(&busy, &idle, Direction::Outgoing),
            Direction::Incoming
        );
        // Two saturated directions tie.
        assert_eq!(
            policy.next_direction(&busy, &busy, Direction::Incoming),
            Direction::Outgoing
        );
    }

    #[test]
    fn alternate_policy_test() {
        let policy = DirectionPolicy::Alternate;
        let counters = SearchCounters::default();
        assert_eq!(
            policy.next_direction(&counters, &counters, Direction::Outgoing),
            Direction::Incoming
        );
        assert_eq!(
            policy.next_direction(&counters, &counters, Direction::Incoming),
            Direction::Outgoing
        );
    }

    #[test]
    fn deserialize_parameters_test() {
        let parameters: SearchParameters<f64> = serde_json::from_str("{}").unwrap();
        assert_eq!(parameters, SearchParameters::default());
        let parameters: SearchParameters<f64> = serde_json::from_str(
            r#"{
                "direction_policy": {"type": "Alternate"},
                "bidirectional": false,
                "distance_threshold": 12.5,
                "nb_threads": 4
            }"#,
        )
        .unwrap();
        assert_eq!(parameters.direction_policy, DirectionPolicy::Alternate);
        assert!(!parameters.bidirectional);
        assert_eq!(parameters.distance_threshold, Some(12.5));
        assert_eq!(parameters.nb_threads, 4);
        let parameters: SearchParameters<u32> = serde_json::from_str(
            r#"{"direction_policy": {"type": "Balanced", "values": {
                "inserted_weight": 1, "scanned_weight": 1, "decreased_weight": 0
            }}}"#,
        )
        .unwrap();
        assert_eq!(
            parameters.direction_policy,
            DirectionPolicy::Balanced {
                inserted_weight: 1,
                scanned_weight: 1,
                decreased_weight: 0
            }
        );
        assert!(parameters.bidirectional);
    }
}
