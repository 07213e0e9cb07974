use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dataset::LayeredDataset;
use crate::grid::Coordinate;
use crate::scoring::{score_cell, ScoreMode};

/// Fixed cost of one grid step before the destination's score is added.
pub const STEP_COST: f64 = 1.0;

/// Directed edge into a neighbouring cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: Coordinate,
    /// `STEP_COST` plus the destination's combined score.
    pub weight: f64,
}

/// Weighted 4-connected grid graph for a single scoring mode.
///
/// Built per query: weights depend on the mode, so a graph is never reused
/// across modes.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    mode: ScoreMode,
    adjacency: HashMap<Coordinate, Vec<Edge>>,
    invalid_weights: usize,
}

impl RouteGraph {
    /// Mode whose scores produced the edge weights.
    pub fn mode(&self) -> ScoreMode {
        self.mode
    }

    /// Outgoing edges of `coord` in down/up/right/left order.
    pub fn neighbours(&self, coord: Coordinate) -> &[Edge] {
        self.adjacency
            .get(&coord)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.adjacency.contains_key(&coord)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether any edge is negative or non-finite, which voids Dijkstra's
    /// optimality guarantee.
    pub fn has_invalid_weights(&self) -> bool {
        self.invalid_weights > 0
    }
}

/// Build the routing graph for `mode`.
///
/// Nodes are every coordinate with a cell record; edges link in-bounds
/// axis-aligned neighbours that also have a cell.
pub fn build_route_graph(dataset: &LayeredDataset, mode: ScoreMode) -> RouteGraph {
    let bounds = dataset.bounds();
    let scores: HashMap<Coordinate, f64> = dataset
        .coordinates()
        .iter()
        .map(|&coord| (coord, score_cell(dataset, coord, mode)))
        .collect();

    let mut adjacency = HashMap::with_capacity(scores.len());
    let mut invalid_weights = 0usize;

    for &coord in dataset.coordinates() {
        let edges: Vec<Edge> = coord
            .neighbours(bounds)
            .filter_map(|target| {
                let score = scores.get(&target)?;
                Some(Edge {
                    target,
                    weight: STEP_COST + score,
                })
            })
            .collect();
        invalid_weights += edges
            .iter()
            .filter(|edge| edge.weight < 0.0 || !edge.weight.is_finite())
            .count();
        adjacency.insert(coord, edges);
    }

    if invalid_weights > 0 {
        warn!(
            mode = %mode,
            invalid_weights,
            "route graph contains negative or non-finite edge weights; shortest paths are not guaranteed"
        );
    }

    let graph = RouteGraph {
        mode,
        adjacency,
        invalid_weights,
    };
    debug!(
        mode = %mode,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built route graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{Cell, Hazard};

    fn flat(rows: usize, cols: usize) -> crate::dataset::DatasetBuilder {
        let mut builder = LayeredDataset::builder().bounds(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                builder = builder.cell((row, col), Cell::default());
            }
        }
        builder
    }

    #[test]
    fn neighbours_follow_direction_order() {
        let dataset = flat(3, 3).build().expect("dataset");
        let graph = build_route_graph(&dataset, ScoreMode::FastRoute);
        let targets: Vec<Coordinate> = graph
            .neighbours(Coordinate::new(1, 1))
            .iter()
            .map(|edge| edge.target)
            .collect();
        assert_eq!(
            targets,
            vec![
                Coordinate::new(2, 1),
                Coordinate::new(0, 1),
                Coordinate::new(1, 2),
                Coordinate::new(1, 0),
            ]
        );
        assert_eq!(graph.node_count(), 9);
        assert_eq!(graph.edge_count(), 24);
    }

    #[test]
    fn holes_have_no_edges() {
        let dataset = LayeredDataset::builder()
            .bounds(1, 3)
            .cell((0, 0), Cell::default())
            .cell((0, 2), Cell::default())
            .build()
            .expect("dataset");
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        assert!(graph.neighbours(Coordinate::new(0, 0)).is_empty());
        assert!(!graph.contains(Coordinate::new(0, 1)));
    }

    #[test]
    fn weight_is_step_plus_destination_score() {
        let dataset = flat(1, 2)
            .hazard(
                (0, 1),
                Hazard {
                    kind: "vent".to_string(),
                    severity: 1.0,
                },
            )
            .build()
            .expect("dataset");
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        let edge = &graph.neighbours(Coordinate::new(0, 0))[0];
        assert!((edge.weight - 1.55).abs() < 1e-12);
        assert!(!graph.has_invalid_weights());
    }

    #[test]
    fn negative_weights_are_flagged() {
        let dataset = flat(1, 2)
            .hazard(
                (0, 1),
                Hazard {
                    kind: "glitch".to_string(),
                    severity: -4.0,
                },
            )
            .build()
            .expect("dataset");
        let graph = build_route_graph(&dataset, ScoreMode::SafeRoute);
        assert!(graph.has_invalid_weights());
    }
}
