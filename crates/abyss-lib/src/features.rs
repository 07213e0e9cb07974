//! Record selection policies and the flattened per-cell feature view.
//!
//! Sparse layers can hold several records at one coordinate. Consumers do not
//! agree on which record matters: danger scoring sums every hazard but reads
//! only the first current, the flattened feature view keeps the most severe
//! hazard, and the narrative quotes the first hazard it finds. Each rule is a
//! named policy here so call sites state which one they use.

use serde::Serialize;

use crate::dataset::CellLayers;
use crate::layers::{Current, Hazard};

/// How a consumer picks among several hazards at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardSelection {
    /// Every hazard, in load order.
    All,
    /// The first hazard in load order.
    First,
    /// The hazard with the highest severity; earliest wins on ties.
    MostSevere,
}

impl HazardSelection {
    /// The hazards this policy keeps, as a subslice of `hazards`.
    pub fn apply(self, hazards: &[Hazard]) -> &[Hazard] {
        match self {
            HazardSelection::All => hazards,
            HazardSelection::First => &hazards[..hazards.len().min(1)],
            HazardSelection::MostSevere => {
                let mut worst: Option<usize> = None;
                for (idx, hazard) in hazards.iter().enumerate() {
                    match worst {
                        Some(best) if hazards[best].severity >= hazard.severity => {}
                        _ => worst = Some(idx),
                    }
                }
                match worst {
                    Some(idx) => &hazards[idx..=idx],
                    None => &[],
                }
            }
        }
    }

    /// First hazard kept by the policy.
    pub fn select(self, hazards: &[Hazard]) -> Option<&Hazard> {
        self.apply(hazards).first()
    }
}

/// How a consumer picks the current that applies to a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentSelection {
    /// The first current in load order. The only policy in use.
    First,
}

impl CurrentSelection {
    pub fn select(self, currents: &[Current]) -> Option<&Current> {
        match self {
            CurrentSelection::First => currents.first(),
        }
    }
}

/// Hazards summed by danger scoring.
pub const DANGER_HAZARD_POLICY: HazardSelection = HazardSelection::All;

/// Current consulted by danger scoring and its breakdown.
pub const DANGER_CURRENT_POLICY: CurrentSelection = CurrentSelection::First;

/// Hazard kept by the flattened feature view.
pub const FEATURE_HAZARD_POLICY: HazardSelection = HazardSelection::MostSevere;

/// Hazard quoted by the narrative explanation.
pub const NARRATIVE_HAZARD_POLICY: HazardSelection = HazardSelection::First;

/// Flat summary of one coordinate, one value per field.
///
/// Hazards use [`FEATURE_HAZARD_POLICY`]; corals, resources and currents use
/// the first record. Absent layers fall back to zero, except current
/// stability which falls back to fully stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellFeatures {
    pub depth_m: f64,
    pub biome: String,
    pub temperature_c: f64,
    pub hazard_type: Option<String>,
    pub hazard_severity: f64,
    pub coral_cover_pct: f64,
    pub coral_health_index: f64,
    pub biodiversity_index: f64,
    pub resource_abundance: f64,
    pub economic_value: f64,
    pub extraction_difficulty: f64,
    pub environmental_impact: f64,
    pub current_speed_mps: f64,
    pub current_stability: f64,
}

impl CellFeatures {
    pub fn from_layers(layers: &CellLayers<'_>) -> Self {
        let hazard = FEATURE_HAZARD_POLICY.select(layers.hazards);
        let coral = layers.corals.first();
        let resource = layers.resources.first();
        let current = layers.currents.first().cloned().unwrap_or_default();

        Self {
            depth_m: layers.cell.depth_m,
            biome: layers.cell.biome.clone(),
            temperature_c: layers.cell.temperature_c,
            hazard_type: hazard.map(|h| h.kind.clone()),
            hazard_severity: hazard.map_or(0.0, |h| h.severity),
            coral_cover_pct: coral.map_or(0.0, |c| c.cover_pct),
            coral_health_index: coral.map_or(0.0, |c| c.health_index),
            biodiversity_index: coral.map_or(0.0, |c| c.biodiversity_index),
            resource_abundance: resource.map_or(0.0, |r| r.abundance),
            economic_value: resource.map_or(0.0, |r| r.economic_value),
            extraction_difficulty: resource.map_or(0.0, |r| r.extraction_difficulty),
            environmental_impact: resource.map_or(0.0, |r| r.environmental_impact),
            current_speed_mps: current.speed_mps,
            current_stability: current.stability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LayeredDataset;
    use crate::grid::Coordinate;
    use crate::layers::{Cell, Coral};

    fn hazard(kind: &str, severity: f64) -> Hazard {
        Hazard {
            kind: kind.to_string(),
            severity,
        }
    }

    #[test]
    fn most_severe_keeps_earliest_on_ties() {
        let hazards = vec![hazard("a", 0.4), hazard("b", 0.9), hazard("c", 0.9)];
        let selected = HazardSelection::MostSevere.select(&hazards).expect("hazard");
        assert_eq!(selected.kind, "b");
        assert_eq!(
            HazardSelection::First.select(&hazards).map(|h| h.kind.as_str()),
            Some("a")
        );
        assert!(HazardSelection::MostSevere.select(&[]).is_none());
        assert_eq!(HazardSelection::All.apply(&hazards).len(), 3);
        assert!(HazardSelection::First.apply(&[]).is_empty());
    }

    #[test]
    fn features_flatten_policies() {
        let dataset = LayeredDataset::builder()
            .cell(
                (0, 0),
                Cell {
                    depth_m: 1200.0,
                    biome: "reef".to_string(),
                    temperature_c: 8.0,
                },
            )
            .hazard((0, 0), hazard("vent", 0.2))
            .hazard((0, 0), hazard("slide", 0.7))
            .coral(
                (0, 0),
                Coral {
                    cover_pct: 40.0,
                    health_index: 0.8,
                    biodiversity_index: 0.6,
                },
            )
            .coral(
                (0, 0),
                Coral {
                    cover_pct: 90.0,
                    health_index: 0.1,
                    biodiversity_index: 0.1,
                },
            )
            .build()
            .expect("dataset");

        let layers = dataset.layers_at(Coordinate::new(0, 0)).expect("layers");
        let features = CellFeatures::from_layers(&layers);
        assert_eq!(features.hazard_type.as_deref(), Some("slide"));
        assert_eq!(features.hazard_severity, 0.7);
        assert_eq!(features.coral_cover_pct, 40.0);
        assert_eq!(features.current_speed_mps, 0.0);
        assert_eq!(features.current_stability, 1.0);
        assert_eq!(features.economic_value, 0.0);
    }
}
