use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::dataset::LayeredDataset;
use crate::error::{Error, Result};
use crate::graph::build_route_graph;
use crate::grid::Coordinate;
use crate::path::shortest_path;
use crate::scoring::ScoreMode;

const OPERATION: &str = "routing";

/// Outcome of a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Found,
    /// Both endpoints exist but no sequence of cells connects them.
    NotFound,
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStatus::Found => f.write_str("found"),
            RouteStatus::NotFound => f.write_str("not_found"),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub goal: Coordinate,
    pub mode: ScoreMode,
}

impl RouteRequest {
    /// Danger-averse route between two coordinates.
    pub fn safe(start: impl Into<Coordinate>, goal: impl Into<Coordinate>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            mode: ScoreMode::SafeRoute,
        }
    }

    /// Fewest-steps route between two coordinates.
    pub fn fast(start: impl Into<Coordinate>, goal: impl Into<Coordinate>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            mode: ScoreMode::FastRoute,
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub mode: ScoreMode,
    pub start: Coordinate,
    pub goal: Coordinate,
    pub status: RouteStatus,
    pub path: Option<Vec<Coordinate>>,
    /// `+∞` when no route exists; serialized as `null`.
    #[serde(serialize_with = "serialize_cost")]
    pub total_cost: f64,
}

impl RoutePlan {
    fn not_found(request: &RouteRequest) -> Self {
        Self {
            mode: request.mode,
            start: request.start,
            goal: request.goal,
            status: RouteStatus::NotFound,
            path: None,
            total_cost: f64::INFINITY,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == RouteStatus::Found
    }

    /// Number of steps in the route, if one was found.
    pub fn hop_count(&self) -> Option<usize> {
        self.path
            .as_ref()
            .map(|steps| steps.len().saturating_sub(1))
    }

    /// The route's coordinates, or [`Error::RouteNotFound`] when the query
    /// came back empty.
    pub fn require_path(&self) -> Result<&[Coordinate]> {
        match &self.path {
            Some(steps) => Ok(steps),
            None => Err(Error::RouteNotFound {
                start: self.start.to_string(),
                goal: self.goal.to_string(),
            }),
        }
    }
}

fn serialize_cost<S: Serializer>(cost: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if cost.is_finite() {
        serializer.serialize_f64(*cost)
    } else {
        serializer.serialize_none()
    }
}

/// Compute the minimum-cost route between two coordinates.
///
/// The mode must be a route mode and is checked before the coordinates.
/// Endpoints that are out of bounds or holes yield [`Error::CellNotFound`];
/// valid but disconnected endpoints yield a plan with
/// [`RouteStatus::NotFound`].
pub fn find_route(
    dataset: &LayeredDataset,
    start: Coordinate,
    goal: Coordinate,
    mode: ScoreMode,
) -> Result<RoutePlan> {
    plan_route(dataset, &RouteRequest { start, goal, mode })
}

/// Compute a route for a request, see [`find_route`].
pub fn plan_route(dataset: &LayeredDataset, request: &RouteRequest) -> Result<RoutePlan> {
    request.mode.ensure_in(&ScoreMode::ROUTE_MODES, OPERATION)?;
    dataset.require_cell(request.start)?;
    dataset.require_cell(request.goal)?;

    let graph = build_route_graph(dataset, request.mode);
    let Some(result) = shortest_path(&graph, request.start, request.goal) else {
        debug!(
            start = %request.start,
            goal = %request.goal,
            mode = %request.mode,
            "no route between endpoints"
        );
        return Ok(RoutePlan::not_found(request));
    };

    debug!(
        start = %request.start,
        goal = %request.goal,
        mode = %request.mode,
        steps = result.nodes.len(),
        cost = result.cost,
        "route found"
    );

    Ok(RoutePlan {
        mode: request.mode,
        start: request.start,
        goal: request.goal,
        status: RouteStatus::Found,
        path: Some(result.nodes),
        total_cost: result.cost,
    })
}

/// Like [`find_route`] but parses the mode label strictly first.
pub fn find_route_with_label(
    dataset: &LayeredDataset,
    start: Coordinate,
    goal: Coordinate,
    mode: &str,
) -> Result<RoutePlan> {
    let mode = ScoreMode::parse_for(mode, &ScoreMode::ROUTE_MODES, OPERATION)?;
    find_route(dataset, start, goal, mode)
}
