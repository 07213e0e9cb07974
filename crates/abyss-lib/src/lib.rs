//! Abyss survey library entry points.
//!
//! This crate loads a layered abyssal survey grid into memory, scores each
//! cell for danger, resource value and ecological impact, plans
//! minimum-cost routes across the grid and ranks zones for mining or
//! conservation. Higher-level consumers (the CLI, a chat or map front end)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.
//!
//! Every query returns an explicit value; the library keeps no session state.

pub mod dataset;
pub mod error;
pub mod explain;
pub mod features;
pub mod graph;
pub mod grid;
pub mod layers;
pub mod loader;
pub mod output;
pub mod path;
pub mod routing;
pub mod scoring;
pub mod zones;

pub use dataset::{
    default_dataset_dir, resolve_dataset_dir, CellLayers, DatasetBuilder, DatasetMetadata,
    LayerCounts, LayeredDataset, DATA_DIR_ENV, MAX_GRID_CELLS,
};
pub use error::{Error, Result};
pub use explain::{explain_cell, CellExplanation, ExplanationScores};
pub use features::{CellFeatures, CurrentSelection, HazardSelection};
pub use graph::{build_route_graph, Edge, RouteGraph};
pub use grid::{Coordinate, GridBounds, ParseCoordinateError};
pub use layers::{Cell, Coral, Current, Hazard, Life, Poi, Resource};
pub use loader::load_dataset;
pub use output::QueryResult;
pub use path::{shortest_path, PathResult};
pub use routing::{
    find_route, find_route_with_label, plan_route, RoutePlan, RouteRequest, RouteStatus,
};
pub use scoring::{
    adaptive_weights, combined_score, danger_breakdown, danger_score, eco_impact_score,
    normalize, resource_score, score_cell, weighted_score, CellScores, DangerBreakdown,
    ScoreMode, ScoreWeights,
};
pub use zones::{
    rank_zones, rank_zones_with, rank_zones_with_label, scan_zones, scan_zones_with_label,
    Highlight, RankingOptions, ZoneRanking,
};
