use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::iter;

use crate::graph::RouteGraph;
use crate::grid::Coordinate;

/// Lowest-cost path found by [`shortest_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Ordered coordinates from start to goal, both inclusive.
    pub nodes: Vec<Coordinate>,
    /// Sum of edge weights along `nodes`.
    pub cost: f64,
}

/// Run Dijkstra's algorithm between two coordinates of `graph`.
///
/// Returns `None` when either endpoint is not a graph node or the goal is
/// unreachable. Equal-cost frontiers are popped by coordinate order, so
/// repeated runs return the same path.
///
/// Every node is settled at most once. With negative edge weights the
/// search still terminates, but the returned path is not guaranteed to be
/// the cheapest.
pub fn shortest_path(graph: &RouteGraph, start: Coordinate, goal: Coordinate) -> Option<PathResult> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }

    let mut best: HashMap<Coordinate, f64> = HashMap::from([(start, 0.0)]);
    let mut came_from: HashMap<Coordinate, Coordinate> = HashMap::new();
    let mut settled: HashSet<Coordinate> = HashSet::with_capacity(graph.node_count());
    let mut frontier = BinaryHeap::from([Frontier { cost: 0.0, node: start }]);

    while let Some(Frontier { cost, node }) = frontier.pop() {
        if !settled.insert(node) {
            continue;
        }
        if node == goal {
            return Some(PathResult {
                nodes: walk_back(&came_from, goal),
                cost,
            });
        }

        for edge in graph.neighbours(node) {
            if settled.contains(&edge.target) {
                continue;
            }
            let candidate = cost + edge.weight;
            let improves = best
                .get(&edge.target)
                .map_or(true, |known| candidate < *known);
            if improves {
                best.insert(edge.target, candidate);
                came_from.insert(edge.target, node);
                frontier.push(Frontier {
                    cost: candidate,
                    node: edge.target,
                });
            }
        }
    }

    None
}

/// Follow predecessor links from `goal` back to the start. Predecessors are
/// always settled before their successors, so the chain cannot loop.
fn walk_back(came_from: &HashMap<Coordinate, Coordinate>, goal: Coordinate) -> Vec<Coordinate> {
    let mut nodes: Vec<Coordinate> =
        iter::successors(Some(goal), |node| came_from.get(node).copied()).collect();
    nodes.reverse();
    nodes
}

/// Heap entry ordered so that `BinaryHeap` pops the lowest cost first, then
/// the lowest coordinate.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: Coordinate,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LayeredDataset;
    use crate::graph::build_route_graph;
    use crate::layers::{Cell, Current, Hazard};
    use crate::scoring::ScoreMode;

    fn grid(rows: usize, cols: usize, hazard_at: &[(usize, usize)]) -> LayeredDataset {
        let mut builder = LayeredDataset::builder().bounds(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                builder = builder.cell((row, col), Cell::default());
            }
        }
        for &coord in hazard_at {
            builder = builder.hazard(
                coord,
                Hazard {
                    kind: "vent".to_string(),
                    severity: 5.0,
                },
            );
        }
        builder.build().expect("dataset")
    }

    #[test]
    fn same_start_and_goal_is_zero_cost() {
        let dataset = grid(2, 2, &[]);
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        let result = shortest_path(&graph, Coordinate::new(0, 0), Coordinate::new(0, 0))
            .expect("path");
        assert_eq!(result.nodes, vec![Coordinate::new(0, 0)]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn detours_around_hazard() {
        // Direct line (0,0)->(0,2) crosses the vent at (0,1).
        let dataset = grid(2, 3, &[(0, 1)]);
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        let result = shortest_path(&graph, Coordinate::new(0, 0), Coordinate::new(0, 2))
            .expect("path");
        assert!(!result.nodes.contains(&Coordinate::new(0, 1)));
        assert_eq!(result.nodes.len(), 5);
        assert!((result.cost - 4.0).abs() < 1e-12);
    }

    #[test]
    fn fast_route_takes_fewest_hops() {
        let dataset = grid(4, 4, &[(0, 1), (0, 2)]);
        let graph = build_route_graph(&dataset, ScoreMode::FastRoute);
        let start = Coordinate::new(0, 0);
        let goal = Coordinate::new(3, 3);
        let result = shortest_path(&graph, start, goal).expect("path");
        assert_eq!(result.nodes.len(), start.manhattan(goal) + 1);
        assert_eq!(result.cost, start.manhattan(goal) as f64);
    }

    #[test]
    fn unknown_endpoint_has_no_path() {
        let dataset = grid(2, 2, &[]);
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        assert!(shortest_path(&graph, Coordinate::new(0, 0), Coordinate::new(5, 5)).is_none());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dataset = grid(5, 5, &[]);
        let graph = build_route_graph(&dataset, ScoreMode::FastRoute);
        let first = shortest_path(&graph, Coordinate::new(0, 0), Coordinate::new(4, 4));
        let second = shortest_path(&graph, Coordinate::new(0, 0), Coordinate::new(4, 4));
        assert_eq!(first, second);
    }

    #[test]
    fn negative_cycle_still_terminates() {
        let mut builder = LayeredDataset::builder().bounds(1, 3);
        for col in 0..3 {
            builder = builder.cell((0, col), Cell::default());
        }
        for col in 0..2 {
            builder = builder.current(
                (0, col),
                Current {
                    speed_mps: 0.0,
                    stability: 9.0,
                },
            );
        }
        let dataset = builder.build().expect("dataset");
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        assert!(graph.has_invalid_weights());

        let result = shortest_path(&graph, Coordinate::new(0, 0), Coordinate::new(0, 2))
            .expect("path");
        assert_eq!(
            result.nodes,
            vec![Coordinate::new(0, 0), Coordinate::new(0, 1), Coordinate::new(0, 2)]
        );
    }

    #[test]
    fn frontier_pops_cheapest_then_lowest_coordinate() {
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { cost: 2.0, node: Coordinate::new(0, 0) });
        heap.push(Frontier { cost: 1.0, node: Coordinate::new(1, 1) });
        heap.push(Frontier { cost: 1.0, node: Coordinate::new(0, 1) });
        let order: Vec<Coordinate> = iter::from_fn(|| heap.pop().map(|entry| entry.node)).collect();
        assert_eq!(
            order,
            vec![Coordinate::new(0, 1), Coordinate::new(1, 1), Coordinate::new(0, 0)]
        );
    }
}
