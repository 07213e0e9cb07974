//! Per-cell explanations: scores, their drivers and a short narrative.

use serde::Serialize;

use crate::dataset::{CellLayers, LayeredDataset};
use crate::error::Result;
use crate::features::{CellFeatures, CurrentSelection, NARRATIVE_HAZARD_POLICY};
use crate::grid::Coordinate;
use crate::layers::{Cell, Coral, Current, Hazard, Life, Poi, Resource};
use crate::scoring::{
    adaptive_weights, danger_breakdown, weighted_score, CellScores, DangerBreakdown, ScoreWeights,
};

const STABLE_CURRENT: f64 = 0.7;
const STRONG_CURRENT_MPS: f64 = 1.5;
const HEALTHY_CORAL: f64 = 0.7;
const DEGRADED_CORAL: f64 = 0.3;

/// Base scores plus the depth-weighted combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplanationScores {
    pub danger: f64,
    pub resource: f64,
    pub eco_impact: f64,
    pub weighted_combined: f64,
}

/// Everything known about one cell, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellExplanation {
    pub coordinate: Coordinate,
    pub scores: ExplanationScores,
    pub weights: ScoreWeights,
    pub breakdown: DangerBreakdown,
    pub features: CellFeatures,
    pub narrative: String,
}

/// Explain the cell at `coord`.
///
/// Out-of-bounds coordinates and holes yield [`crate::Error::CellNotFound`].
pub fn explain_cell(dataset: &LayeredDataset, coord: Coordinate) -> Result<CellExplanation> {
    let layers = dataset.require_layers(coord)?;
    Ok(explain_layers(&layers))
}

fn explain_layers(layers: &CellLayers<'_>) -> CellExplanation {
    let base = CellScores::from_layers(layers);
    let weights = adaptive_weights(layers.cell);

    CellExplanation {
        coordinate: layers.coordinate,
        scores: ExplanationScores {
            danger: base.danger,
            resource: base.resource,
            eco_impact: base.eco_impact,
            weighted_combined: weighted_score(base.danger, base.eco_impact, base.resource, &weights),
        },
        weights,
        breakdown: danger_breakdown(layers.cell, layers.hazards, layers.currents),
        features: CellFeatures::from_layers(layers),
        narrative: narrative(layers),
    }
}

/// Join the per-layer sentences, skipping layers that have nothing to say.
pub fn narrative(layers: &CellLayers<'_>) -> String {
    [
        Some(describe_cell(layers.cell)),
        describe_currents(layers.currents),
        Some(describe_hazards(layers.hazards)),
        describe_corals(layers.corals),
        Some(describe_resources(layers.resources)),
        describe_life(layers.life),
        describe_poi(layers.poi),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

fn or_default<'a>(label: &'a str, fallback: &'a str) -> &'a str {
    if label.trim().is_empty() {
        fallback
    } else {
        label
    }
}

fn describe_cell(cell: &Cell) -> String {
    format!(
        "This cell sits at ~{} m in a {} biome with temperature around {:.1}°C.",
        cell.depth_m as i64,
        or_default(&cell.biome, "unknown"),
        cell.temperature_c
    )
}

fn describe_currents(currents: &[Current]) -> Option<String> {
    let current = CurrentSelection::First.select(currents)?;
    let note = if current.stability > STABLE_CURRENT {
        "stable"
    } else {
        "unstable"
    };
    Some(if current.speed_mps > STRONG_CURRENT_MPS {
        format!(
            "Currents are {note} and strong (~{:.1} m/s), adding nav risk.",
            current.speed_mps
        )
    } else {
        format!("Currents are {note} (~{:.1} m/s).", current.speed_mps)
    })
}

fn describe_hazards(hazards: &[Hazard]) -> String {
    match NARRATIVE_HAZARD_POLICY.select(hazards) {
        Some(hazard) => format!(
            "Contains a {} (severity {:.2}), raising operational risk.",
            or_default(&hazard.kind, "hazard"),
            hazard.severity
        ),
        None => "No major hazards recorded.".to_string(),
    }
}

fn describe_corals(corals: &[Coral]) -> Option<String> {
    let coral = corals.first()?;
    let (health, biodiversity, cover) = (coral.health_index, coral.biodiversity_index, coral.cover_pct);
    Some(if health > HEALTHY_CORAL && biodiversity > HEALTHY_CORAL {
        format!(
            "High coral health (H={health:.2}, B={biodiversity:.2}, cover ~{cover:.0}%), ecologically valuable."
        )
    } else if health < DEGRADED_CORAL {
        format!("Coral health is low (H={health:.2}), indicating sensitivity or prior disturbance.")
    } else {
        format!("Moderate coral presence (H={health:.2}, B={biodiversity:.2}, cover ~{cover:.0}%).")
    })
}

fn describe_resources(resources: &[Resource]) -> String {
    match resources.first() {
        Some(resource) => format!(
            "Resources: {} (value {:.2}, impact {:.2}); check extraction difficulty.",
            or_default(&resource.family, "resource"),
            resource.economic_value,
            resource.environmental_impact
        ),
        None => "No notable resource deposits logged.".to_string(),
    }
}

fn describe_life(life: &[Life]) -> Option<String> {
    let sighting = life.first()?;
    Some(format!(
        "Species noted: {} (density {}, threat {}).",
        or_default(&sighting.species, "unknown"),
        sighting.density,
        sighting.threat_level
    ))
}

fn describe_poi(poi: &[Poi]) -> Option<String> {
    let point = poi.first()?;
    let label = or_default(&point.label, "POI");
    Some(if point.description.trim().is_empty() {
        format!("Point of interest: {label}.")
    } else {
        format!("Point of interest: {label}: {}", point.description.trim())
    })
}
