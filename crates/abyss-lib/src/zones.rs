//! Whole-grid zone scoring: a dense heatmap plus the top-scoring cells.

use serde::Serialize;
use tracing::debug;

use crate::dataset::LayeredDataset;
use crate::error::Result;
use crate::grid::Coordinate;
use crate::scoring::{normalize, CellScores, ScoreMode};

const OPERATION: &str = "zone ranking";

/// Number of highlights reported when the caller does not choose.
pub const DEFAULT_TOP_K: usize = 5;

/// Tuning knobs for a zone scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    /// Maximum number of highlights.
    pub top_k: usize,
    /// Heatmap value for coordinates without a cell record.
    pub fill_value: f64,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            fill_value: 0.0,
        }
    }
}

impl RankingOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// One of the best-scoring cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Highlight {
    pub coordinate: Coordinate,
    pub score: f64,
}

/// Result of scoring every cell under one mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRanking {
    pub mode: ScoreMode,
    pub rows: usize,
    pub cols: usize,
    /// `heatmap[row][col]`; holes hold the fill value.
    pub heatmap: Vec<Vec<f64>>,
    /// Ascending by score, so the best cell is last.
    pub highlights: Vec<Highlight>,
    #[serde(skip)]
    scored: Vec<Vec<bool>>,
    #[serde(skip)]
    fill_value: f64,
}

impl ZoneRanking {
    /// Score at `coord`, or `None` for holes and out-of-bounds coordinates.
    pub fn score_at(&self, coord: Coordinate) -> Option<f64> {
        let scored = *self.scored.get(coord.row)?.get(coord.col)?;
        scored.then(|| self.heatmap[coord.row][coord.col])
    }

    /// Highest-scoring highlight.
    pub fn best(&self) -> Option<&Highlight> {
        self.highlights.last()
    }

    /// Heatmap rescaled to `[0, 1]` over the observed scores. Holes keep the
    /// fill value; a uniform grid maps every scored cell to `0`.
    pub fn normalized_heatmap(&self) -> Vec<Vec<f64>> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (row, flags) in self.heatmap.iter().zip(&self.scored) {
            for (&value, &scored) in row.iter().zip(flags) {
                if scored {
                    min = min.min(value);
                    max = max.max(value);
                }
            }
        }

        self.heatmap
            .iter()
            .zip(&self.scored)
            .map(|(row, flags)| {
                row.iter()
                    .zip(flags)
                    .map(|(&value, &scored)| {
                        if scored {
                            normalize(value, min, max)
                        } else {
                            self.fill_value
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Score every cell under `mode` without restricting the mode.
///
/// Cells are visited in dataset enumeration order; ties among highlights
/// keep that order.
pub fn scan_zones(dataset: &LayeredDataset, mode: ScoreMode, options: &RankingOptions) -> ZoneRanking {
    let bounds = dataset.bounds();
    let mut heatmap = vec![vec![options.fill_value; bounds.cols]; bounds.rows];
    let mut scored = vec![vec![false; bounds.cols]; bounds.rows];
    let mut all = Vec::with_capacity(dataset.cell_count());

    for &coord in dataset.coordinates() {
        let Some(layers) = dataset.layers_at(coord) else {
            continue;
        };
        let score = CellScores::from_layers(&layers).combined(mode);
        heatmap[coord.row][coord.col] = score;
        scored[coord.row][coord.col] = true;
        all.push(Highlight {
            coordinate: coord,
            score,
        });
    }

    all.sort_by(|a, b| a.score.total_cmp(&b.score));
    let highlights = all.split_off(all.len().saturating_sub(options.top_k));

    debug!(
        mode = %mode,
        cells = dataset.cell_count(),
        highlights = highlights.len(),
        "scanned zones"
    );

    ZoneRanking {
        mode,
        rows: bounds.rows,
        cols: bounds.cols,
        heatmap,
        highlights,
        scored,
        fill_value: options.fill_value,
    }
}

/// Permissive scan: labels that name no mode score as `balanced`.
pub fn scan_zones_with_label(dataset: &LayeredDataset, label: &str, options: &RankingOptions) -> ZoneRanking {
    scan_zones(dataset, ScoreMode::from_label_or_balanced(label), options)
}

/// Rank zones for `mining` or `conservation` with default options.
pub fn rank_zones(dataset: &LayeredDataset, mode: ScoreMode) -> Result<ZoneRanking> {
    rank_zones_with(dataset, mode, &RankingOptions::default())
}

/// Rank zones with explicit options; other modes yield
/// [`crate::Error::UnsupportedMode`].
pub fn rank_zones_with(
    dataset: &LayeredDataset,
    mode: ScoreMode,
    options: &RankingOptions,
) -> Result<ZoneRanking> {
    let mode = mode.ensure_in(&ScoreMode::ZONE_MODES, OPERATION)?;
    Ok(scan_zones(dataset, mode, options))
}

/// Strictly parse `label` and rank zones.
pub fn rank_zones_with_label(
    dataset: &LayeredDataset,
    label: &str,
    options: &RankingOptions,
) -> Result<ZoneRanking> {
    let mode = ScoreMode::parse_for(label, &ScoreMode::ZONE_MODES, OPERATION)?;
    Ok(scan_zones(dataset, mode, options))
}
