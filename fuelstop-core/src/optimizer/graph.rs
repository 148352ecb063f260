//! Cheapest path through the refuelling graph.
//!
//! Nodes are the start, every candidate station and the finish, ordered by
//! route position. A state pairs a node with the fuel on board when the
//! vehicle arrives there: either an empty tank, or whatever is left after
//! filling up at an earlier node. Leaving a node towards a station that is no
//! more expensive (or towards the finish) buys only the shortfall for the
//! leg; leaving towards a pricier station fills the tank first. Every edge is
//! priced at the departure node, so the path cost equals what is spent.
//!
//! Two kinds of edge can never lie on a cheapest path and are not generated.
//! Filling up only pays at a node with no cheaper node (the finish counts as
//! free) strictly within one tank ahead. Any fuel carried past that cheaper
//! node could have been bought there instead. For the same reason, shortfall
//! edges stop at the first strictly cheaper node. Equal-priced nodes before it
//! stay reachable so ties can still fall back to fewer stops.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::projector::EPSILON_MILES;

/// Costs closer than this are treated as equal, in currency units.
const COST_TOLERANCE: f64 = 1e-9;

/// A node of the refuelling graph.
#[derive(Debug, Clone, Copy)]
pub(super) struct Node {
    pub(super) miles: f64,
    pub(super) price_per_gallon: f64,
}

/// Fuel on board when arriving at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Arrival {
    Empty,
    FilledAt(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct State {
    node: usize,
    arrival: Arrival,
}

#[derive(Debug, Clone, Copy)]
struct Label {
    cost: f64,
    stops: usize,
    previous: Option<State>,
}

impl Label {
    /// Lower cost wins; near-equal costs fall back to fewer stops.
    #[expect(clippy::float_arithmetic, reason = "cost comparison uses a tolerance")]
    fn improves_on(&self, other: &Self) -> bool {
        if self.cost < other.cost - COST_TOLERANCE {
            return true;
        }
        (self.cost - other.cost).abs() <= COST_TOLERANCE && self.stops < other.stops
    }
}

#[derive(Debug, Clone, Copy)]
struct Queued {
    cost: f64,
    stops: usize,
    state: State,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the cheapest entry first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.stops.cmp(&self.stops))
            .then_with(|| other.state.cmp(&self.state))
    }
}

/// Refuelling graph for a single trip.
#[derive(Debug)]
pub(super) struct FuelGraph {
    nodes: Vec<Node>,
    range_limit_miles: f64,
    miles_per_gallon: f64,
}

#[expect(
    clippy::float_arithmetic,
    reason = "fuel levels and edge costs are floating-point quantities"
)]
impl FuelGraph {
    /// `nodes` must start with the trip start, end with the finish and be
    /// sorted by position.
    pub(super) const fn new(nodes: Vec<Node>, range_limit_miles: f64, miles_per_gallon: f64) -> Self {
        Self {
            nodes,
            range_limit_miles,
            miles_per_gallon,
        }
    }

    /// Node indices of the cheapest start-to-finish path, or `None` when the
    /// finish is unreachable.
    pub(super) fn cheapest_path(&self) -> Option<Vec<usize>> {
        let finish = self.nodes.len().checked_sub(1)?;
        let start = State {
            node: 0,
            arrival: Arrival::Empty,
        };
        let mut labels: HashMap<State, Label> = HashMap::new();
        let mut queue = BinaryHeap::new();
        labels.insert(
            start,
            Label {
                cost: 0.0,
                stops: 0,
                previous: None,
            },
        );
        queue.push(Queued {
            cost: 0.0,
            stops: 0,
            state: start,
        });

        let fill_points = self.fill_points();

        while let Some(entry) = queue.pop() {
            let Some(label) = labels.get(&entry.state).copied() else {
                continue;
            };
            // Stale entry superseded by a better label.
            if label.cost.total_cmp(&entry.cost) != Ordering::Equal || label.stops != entry.stops {
                continue;
            }
            if entry.state.node == finish {
                continue;
            }
            for (next, cost) in self.departures(entry.state, finish, &fill_points) {
                let candidate = Label {
                    cost: label.cost + cost,
                    stops: label.stops + usize::from(next.node != finish),
                    previous: Some(entry.state),
                };
                let better = labels
                    .get(&next)
                    .is_none_or(|existing| candidate.improves_on(existing));
                if better {
                    labels.insert(next, candidate);
                    queue.push(Queued {
                        cost: candidate.cost,
                        stops: candidate.stops,
                        state: next,
                    });
                }
            }
        }

        let goal = State {
            node: finish,
            arrival: Arrival::Empty,
        };
        labels.contains_key(&goal).then(|| trace(&labels, goal))
    }

    /// Per node, whether filling the tank there can be part of a cheapest
    /// path: no strictly cheaper node lies strictly within one tank ahead.
    fn fill_points(&self) -> Vec<bool> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, here)| {
                !self
                    .nodes
                    .iter()
                    .skip(index + 1)
                    .take_while(|node| node.miles - here.miles < self.range_limit_miles)
                    .any(|node| node.price_per_gallon < here.price_per_gallon)
            })
            .collect()
    }

    /// Reachable successor states of `state` with the cost of leaving it.
    fn departures<'a>(
        &'a self,
        state: State,
        finish: usize,
        fill_points: &'a [bool],
    ) -> impl Iterator<Item = (State, f64)> + 'a {
        let fuel = self.fuel_on_arrival(state);
        let fills = fill_points.get(state.node).copied().unwrap_or(false);
        let reach = self.range_limit_miles + EPSILON_MILES;
        self.nodes
            .get(state.node)
            .copied()
            .into_iter()
            .flat_map(move |here| {
                self.nodes
                    .iter()
                    .enumerate()
                    .skip(state.node + 1)
                    .take_while(move |(_, node)| node.miles - here.miles <= reach)
                    .scan(false, move |passed_cheaper, (index, node)| {
                        if *passed_cheaper {
                            return None;
                        }
                        *passed_cheaper = node.price_per_gallon < here.price_per_gallon;
                        let leg = node.miles - here.miles;
                        let edge = if index == finish
                            || node.price_per_gallon <= here.price_per_gallon
                        {
                            Some(((leg - fuel).max(0.0), Arrival::Empty))
                        } else if fills {
                            Some((
                                (self.range_limit_miles - fuel).max(0.0),
                                Arrival::FilledAt(state.node),
                            ))
                        } else {
                            None
                        };
                        Some(edge.map(|(bought, arrival)| {
                            let cost = bought / self.miles_per_gallon * here.price_per_gallon;
                            (
                                State {
                                    node: index,
                                    arrival,
                                },
                                cost,
                            )
                        }))
                    })
                    .flatten()
            })
    }

    /// Miles of fuel on board when `state` is reached.
    fn fuel_on_arrival(&self, state: State) -> f64 {
        match state.arrival {
            Arrival::Empty => 0.0,
            Arrival::FilledAt(origin) => {
                let (Some(from), Some(to)) = (self.nodes.get(origin), self.nodes.get(state.node))
                else {
                    return 0.0;
                };
                (self.range_limit_miles - (to.miles - from.miles)).max(0.0)
            }
        }
    }
}

fn trace(labels: &HashMap<State, Label>, goal: State) -> Vec<usize> {
    let mut path = vec![goal.node];
    let mut cursor = labels.get(&goal).and_then(|label| label.previous);
    while let Some(state) = cursor {
        path.push(state.node);
        cursor = labels.get(&state).and_then(|label| label.previous);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn graph(stations: &[(f64, f64)], length: f64) -> FuelGraph {
        let mut nodes = vec![Node {
            miles: 0.0,
            price_per_gallon: 0.0,
        }];
        nodes.extend(stations.iter().map(|&(miles, price_per_gallon)| Node {
            miles,
            price_per_gallon,
        }));
        nodes.push(Node {
            miles: length,
            price_per_gallon: 0.0,
        });
        FuelGraph::new(nodes, 500.0, 10.0)
    }

    #[rstest]
    fn picks_the_cheaper_of_two_reachable_stations() {
        let path = graph(&[(300.0, 3.50), (400.0, 3.00)], 700.0)
            .cheapest_path()
            .expect("path");
        assert_eq!(path, vec![0, 2, 3]);
    }

    #[rstest]
    fn prefers_fewer_stops_at_equal_prices() {
        let path = graph(
            &[(200.0, 3.0), (300.0, 3.0), (450.0, 3.0), (700.0, 3.0)],
            900.0,
        )
        .cheapest_path()
        .expect("path");
        assert_eq!(path.len(), 3, "one stop suffices: {path:?}");
    }

    #[rstest]
    fn fills_up_before_an_expensive_stretch() {
        // Cheap at 100, dear at 550: fill at 100 and only top up at 550.
        let path = graph(&[(100.0, 2.00), (550.0, 5.00)], 1_000.0)
            .cheapest_path()
            .expect("path");
        assert_eq!(path, vec![0, 1, 2, 3]);
    }

    #[rstest]
    fn only_nodes_without_a_cheaper_one_ahead_fill_up() {
        let points = graph(&[(100.0, 3.0), (300.0, 2.5), (900.0, 4.0)], 1_200.0).fill_points();
        // The finish is free, so the station 300 miles before it never fills.
        assert_eq!(points, vec![true, false, true, false, true]);
    }

    #[rstest]
    fn shortfall_edges_stop_at_the_first_cheaper_node() {
        let fuel_graph = graph(
            &[(100.0, 3.0), (150.0, 3.0), (200.0, 2.0), (250.0, 1.5)],
            1_000.0,
        );
        let fill_points = fuel_graph.fill_points();
        let from = State {
            node: 1,
            arrival: Arrival::Empty,
        };
        let targets: Vec<usize> = fuel_graph
            .departures(from, 5, &fill_points)
            .map(|(next, _)| next.node)
            .collect();
        assert_eq!(targets, vec![2, 3]);
    }

    #[rstest]
    fn reports_unreachable_finish() {
        assert!(graph(&[(100.0, 3.0)], 800.0).cheapest_path().is_none());
    }
}
