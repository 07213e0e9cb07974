//! Multi-criteria cell scoring.
//!
//! Three base scores describe a cell: danger (navigation risk), resource
//! (economic attractiveness) and ecological impact (fragility). A
//! [`ScoreMode`] merges them into one objective-specific value. All functions
//! here are pure and never fail; inputs outside their nominal ranges simply
//! produce values outside the nominal output range.
//!
//! The weights are not normalized and intentionally so: hazards accumulate
//! without a cap.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::dataset::{CellLayers, LayeredDataset};
use crate::error::{Error, Result};
use crate::features::{DANGER_CURRENT_POLICY, DANGER_HAZARD_POLICY};
use crate::grid::Coordinate;
use crate::layers::{Cell, Coral, Current, Hazard, Life, Resource};

/// Depth at which the depth term saturates.
pub const DEPTH_SATURATION_M: f64 = 7000.0;

/// Current speed treated as the practical maximum.
pub const MAX_CURRENT_SPEED_MPS: f64 = 5.0;

/// Cells deeper than this use the danger-leaning adaptive weights.
pub const DEEP_WATER_THRESHOLD_M: f64 = 4000.0;

/// Minimum Jaro-Winkler similarity for a mode suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.9;

/// Scoring objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Maximize resources while penalizing danger and ecological damage.
    Mining,
    /// Highlight ecological fragility; higher means more fragile.
    Conservation,
    /// Route cost dominated by danger.
    SafeRoute,
    /// Uniform zero score, which reduces routing to hop count.
    FastRoute,
    /// General analysis.
    #[default]
    Balanced,
}

impl ScoreMode {
    pub const ALL: [ScoreMode; 5] = [
        ScoreMode::Mining,
        ScoreMode::Conservation,
        ScoreMode::SafeRoute,
        ScoreMode::FastRoute,
        ScoreMode::Balanced,
    ];

    /// Modes accepted by [`crate::routing::find_route`].
    pub const ROUTE_MODES: [ScoreMode; 2] = [ScoreMode::SafeRoute, ScoreMode::FastRoute];

    /// Modes accepted by [`crate::zones::rank_zones`].
    pub const ZONE_MODES: [ScoreMode; 2] = [ScoreMode::Mining, ScoreMode::Conservation];

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreMode::Mining => "mining",
            ScoreMode::Conservation => "conservation",
            ScoreMode::SafeRoute => "safe_route",
            ScoreMode::FastRoute => "fast_route",
            ScoreMode::Balanced => "balanced",
        }
    }

    /// Exact (case-insensitive) label match against every mode.
    fn lookup(label: &str) -> Option<ScoreMode> {
        let normalized = normalize_label(label);
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
    }

    /// Permissive parse used by the zone-scoring core: labels that do not
    /// name a mode fall back to [`ScoreMode::Balanced`].
    pub fn from_label_or_balanced(label: &str) -> ScoreMode {
        match Self::lookup(label) {
            Some(mode) => mode,
            None => {
                debug!(label, "unrecognized mode label; falling back to balanced");
                ScoreMode::Balanced
            }
        }
    }

    /// Strict parse for entry points: the label must name one of `allowed`.
    pub fn parse_for(label: &str, allowed: &[ScoreMode], operation: &'static str) -> Result<ScoreMode> {
        match Self::lookup(label) {
            Some(mode) if allowed.contains(&mode) => Ok(mode),
            _ => Err(unsupported_mode(label, allowed, operation)),
        }
    }

    /// Reject an already-typed mode that the entry point does not serve.
    pub fn ensure_in(self, allowed: &[ScoreMode], operation: &'static str) -> Result<ScoreMode> {
        if allowed.contains(&self) {
            Ok(self)
        } else {
            Err(unsupported_mode(self.as_str(), allowed, operation))
        }
    }
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_for(s, &Self::ALL, "scoring")
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase().replace('-', "_")
}

fn unsupported_mode(label: &str, allowed: &[ScoreMode], operation: &'static str) -> Error {
    let normalized = normalize_label(label);
    let mut scored: Vec<(f64, &'static str)> = allowed
        .iter()
        .map(|mode| (strsim::jaro_winkler(&normalized, mode.as_str()), mode.as_str()))
        .filter(|(similarity, _)| *similarity >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    Error::UnsupportedMode {
        mode: label.to_string(),
        operation,
        suggestions: scored.into_iter().map(|(_, name)| name.to_string()).collect(),
    }
}

/// Navigation risk of a cell; higher is more dangerous.
///
/// Hazards are summed per [`DANGER_HAZARD_POLICY`]; only the current chosen by
/// [`DANGER_CURRENT_POLICY`] is consulted, and a missing current counts as
/// calm, fully stable water.
pub fn danger_score(cell: &Cell, hazards: &[Hazard], currents: &[Current]) -> f64 {
    let mut score = 0.0;

    score += (cell.depth_m / DEPTH_SATURATION_M).min(1.0) * 0.25;

    for hazard in DANGER_HAZARD_POLICY.apply(hazards) {
        score += hazard.severity * 0.55;
    }

    if let Some(current) = DANGER_CURRENT_POLICY.select(currents) {
        score += (current.speed_mps / MAX_CURRENT_SPEED_MPS) * 0.15;
        score += (1.0 - current.stability) * 0.25;
    }

    score
}

/// Economic attractiveness of a cell; higher is more valuable.
pub fn resource_score(resources: &[Resource]) -> f64 {
    resources
        .iter()
        .map(|r| r.abundance * 0.35 + r.economic_value * 0.50 + r.purity * 0.15)
        .sum()
}

/// Ecological sensitivity of a cell; higher is more fragile.
pub fn eco_impact_score(corals: &[Coral], life: &[Life], resources: &[Resource]) -> f64 {
    let coral: f64 = corals
        .iter()
        .map(|c| (c.health_index + c.biodiversity_index) * 0.4)
        .sum();
    let species: f64 = life
        .iter()
        .map(|l| l.density * l.threat_level * 0.25)
        .sum();
    let extraction: f64 = resources
        .iter()
        .map(|r| r.environmental_impact * 0.30 + r.extraction_difficulty * 0.10)
        .sum();
    coral + species + extraction
}

/// Merge the base scores for one objective.
pub fn combined_score(danger: f64, eco: f64, resource: f64, mode: ScoreMode) -> f64 {
    match mode {
        ScoreMode::Mining => resource - 0.35 * danger - 0.55 * eco,
        ScoreMode::Conservation => -eco - 0.25 * danger,
        ScoreMode::SafeRoute => danger + 0.25 * eco,
        ScoreMode::FastRoute => 0.0,
        ScoreMode::Balanced => resource - 0.25 * danger - 0.35 * eco,
    }
}

/// Depth-dependent weights used only by cell explanations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    pub danger: f64,
    pub eco: f64,
    pub resource: f64,
}

/// Deep water favours danger; shallower cells (reefs) favour ecology.
pub fn adaptive_weights(cell: &Cell) -> ScoreWeights {
    if cell.depth_m > DEEP_WATER_THRESHOLD_M {
        ScoreWeights {
            danger: 0.5,
            eco: 0.3,
            resource: 0.2,
        }
    } else {
        ScoreWeights {
            danger: 0.3,
            eco: 0.5,
            resource: 0.2,
        }
    }
}

/// Weighted sum for the explanation path; distinct from [`combined_score`].
pub fn weighted_score(danger: f64, eco: f64, resource: f64, weights: &ScoreWeights) -> f64 {
    resource * weights.resource - danger * weights.danger - eco * weights.eco
}

/// The three base scores of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellScores {
    pub danger: f64,
    pub resource: f64,
    pub eco_impact: f64,
}

impl CellScores {
    pub fn from_layers(layers: &CellLayers<'_>) -> Self {
        Self {
            danger: danger_score(layers.cell, layers.hazards, layers.currents),
            resource: resource_score(layers.resources),
            eco_impact: eco_impact_score(layers.corals, layers.life, layers.resources),
        }
    }

    pub fn combined(&self, mode: ScoreMode) -> f64 {
        combined_score(self.danger, self.eco_impact, self.resource, mode)
    }
}

/// Combined score of the cell at `coord`, or `+∞` when the coordinate has no
/// cell record. Routing treats the infinite value as an impassable cost.
pub fn score_cell(dataset: &LayeredDataset, coord: Coordinate, mode: ScoreMode) -> f64 {
    match dataset.layers_at(coord) {
        Some(layers) => CellScores::from_layers(&layers).combined(mode),
        None => f64::INFINITY,
    }
}

/// Why a cell is dangerous.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DangerBreakdown {
    pub depth_m: f64,
    pub hazard_count: usize,
    /// Speed of the current chosen by [`DANGER_CURRENT_POLICY`].
    pub current_speed: f64,
    pub hazards_present: Vec<String>,
}

pub fn danger_breakdown(cell: &Cell, hazards: &[Hazard], currents: &[Current]) -> DangerBreakdown {
    DangerBreakdown {
        depth_m: cell.depth_m,
        hazard_count: hazards.len(),
        current_speed: DANGER_CURRENT_POLICY
            .select(currents)
            .map_or(0.0, |c| c.speed_mps),
        hazards_present: hazards
            .iter()
            .map(|h| {
                if h.kind.is_empty() {
                    "unknown".to_string()
                } else {
                    h.kind.clone()
                }
            })
            .collect(),
    }
}

/// Min-max rescale into `[0, 1]`; a degenerate range maps to `0`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}
