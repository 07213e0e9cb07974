use serde::Serialize;

use crate::error::Result;
use crate::explain::CellExplanation;
use crate::grid::Coordinate;
use crate::routing::RoutePlan;
use crate::zones::ZoneRanking;

/// Result of one query, handed to whichever presentation layer asked for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    Explain(CellExplanation),
    Route(RoutePlan),
    Zones(ZoneRanking),
}

impl QueryResult {
    /// Short label for the query type.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryResult::Explain(_) => "explain",
            QueryResult::Route(_) => "route",
            QueryResult::Zones(_) => "zones",
        }
    }

    /// Coordinates a map view should emphasise.
    pub fn highlighted_cells(&self) -> Vec<Coordinate> {
        match self {
            QueryResult::Explain(explanation) => vec![explanation.coordinate],
            QueryResult::Route(plan) => plan.path.clone().unwrap_or_default(),
            QueryResult::Zones(ranking) => ranking
                .highlights
                .iter()
                .map(|highlight| highlight.coordinate)
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<CellExplanation> for QueryResult {
    fn from(value: CellExplanation) -> Self {
        QueryResult::Explain(value)
    }
}

impl From<RoutePlan> for QueryResult {
    fn from(value: RoutePlan) -> Self {
        QueryResult::Route(value)
    }
}

impl From<ZoneRanking> for QueryResult {
    fn from(value: ZoneRanking) -> Self {
        QueryResult::Zones(value)
    }
}
