//! Output formatting for query results.
//!
//! Text renderers return strings so the command handlers decide where they
//! go; JSON output is the serialized [`QueryResult`].

use abyss_lib::{
    CellExplanation, Coordinate, QueryResult, RoutePlan, ScoreMode, ZoneRanking,
};
use clap::ValueEnum;
use serde::Serialize;

use crate::terminal::ColorPalette;

/// Placeholder for grid coordinates without a survey cell.
const HOLE_MARKER: &str = "·";
const CELL_WIDTH: usize = 8;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Render a query result in this format.
    pub fn render(&self, result: &QueryResult, palette: ColorPalette) -> anyhow::Result<String> {
        match self {
            OutputFormat::Text => Ok(TextRenderer::new(palette).render(result)),
            OutputFormat::Json => Ok(result.to_json_pretty()?),
        }
    }

    /// Render a heatmap view in this format.
    pub fn render_heatmap(&self, view: &HeatmapView, palette: ColorPalette) -> anyhow::Result<String> {
        match self {
            OutputFormat::Text => Ok(TextRenderer::new(palette).heatmap(view)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        }
    }
}

/// Dense matrix printed by the `heatmap` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapView {
    pub mode: ScoreMode,
    pub rows: usize,
    pub cols: usize,
    pub normalized: bool,
    pub values: Vec<Vec<f64>>,
    /// Coordinates without a survey cell.
    pub holes: Vec<Coordinate>,
}

impl HeatmapView {
    pub fn from_ranking(ranking: &ZoneRanking, normalized: bool) -> Self {
        let values = if normalized {
            ranking.normalized_heatmap()
        } else {
            ranking.heatmap.clone()
        };
        let holes = (0..ranking.rows)
            .flat_map(|row| (0..ranking.cols).map(move |col| Coordinate::new(row, col)))
            .filter(|&coord| ranking.score_at(coord).is_none())
            .collect();
        Self {
            mode: ranking.mode,
            rows: ranking.rows,
            cols: ranking.cols,
            normalized,
            values,
            holes,
        }
    }
}

/// Plain or colored text rendering.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    palette: ColorPalette,
}

impl TextRenderer {
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn render(&self, result: &QueryResult) -> String {
        match result {
            QueryResult::Explain(explanation) => self.explain(explanation),
            QueryResult::Route(plan) => self.route(plan),
            QueryResult::Zones(ranking) => self.zones(ranking),
        }
    }

    fn explain(&self, explanation: &CellExplanation) -> String {
        let p = &self.palette;
        let scores = &explanation.scores;
        let weights = &explanation.weights;
        let breakdown = &explanation.breakdown;

        let mut lines = vec![
            format!("{}Cell {}{}", p.white_bold, explanation.coordinate, p.reset),
            format!(
                "  Danger      {}{:.3}{}",
                p.severity(scores.danger),
                scores.danger,
                p.reset
            ),
            format!("  Resource    {:.3}", scores.resource),
            format!("  Eco impact  {:.3}", scores.eco_impact),
            format!(
                "  Weighted    {:.3} {}(danger {:.1}, eco {:.1}, resource {:.1}){}",
                scores.weighted_combined,
                p.gray,
                weights.danger,
                weights.eco,
                weights.resource,
                p.reset
            ),
        ];

        let hazards = if breakdown.hazards_present.is_empty() {
            "none".to_string()
        } else {
            breakdown.hazards_present.join(", ")
        };
        lines.push(format!(
            "  Hazards     {} {}(depth {:.0} m, current {:.1} m/s){}",
            hazards, p.gray, breakdown.depth_m, breakdown.current_speed, p.reset
        ));
        lines.push(String::new());
        lines.push(explanation.narrative.clone());
        lines.join("\n")
    }

    fn route(&self, plan: &RoutePlan) -> String {
        let p = &self.palette;
        let Some(path) = plan.path.as_deref() else {
            return format!(
                "{}No viable route from {} to {} under {}.{}",
                p.red, plan.start, plan.goal, plan.mode, p.reset
            );
        };

        let mut lines = vec![format!(
            "Route from {} to {} ({} steps; mode: {}; cost {:.3}):",
            plan.start,
            plan.goal,
            path.len().saturating_sub(1),
            plan.mode,
            plan.total_cost
        )];
        for (index, coord) in path.iter().enumerate() {
            lines.push(format!("  {:>3}. {}{}{}", index, p.cyan, coord, p.reset));
        }
        lines.join("\n")
    }

    fn zones(&self, ranking: &ZoneRanking) -> String {
        let p = &self.palette;
        let mut lines = vec![format!(
            "Top {} zones for {} (best last):",
            ranking.highlights.len(),
            ranking.mode
        )];
        if ranking.highlights.is_empty() {
            lines.push(format!("  {}no scored cells{}", p.gray, p.reset));
        }
        for highlight in &ranking.highlights {
            lines.push(format!(
                "  {}{:<10}{} {:>8.3}",
                p.white_bold,
                highlight.coordinate.to_string(),
                p.reset,
                highlight.score
            ));
        }
        lines.join("\n")
    }

    pub fn heatmap(&self, view: &HeatmapView) -> String {
        let p = &self.palette;
        let scale = if view.normalized { "normalized" } else { "raw" };
        let mut lines = vec![format!(
            "Heatmap for {} ({}x{}, {}):",
            view.mode, view.rows, view.cols, scale
        )];

        for (row, values) in view.values.iter().enumerate() {
            let cells: Vec<String> = values
                .iter()
                .enumerate()
                .map(|(col, value)| {
                    if view.holes.contains(&Coordinate::new(row, col)) {
                        format!("{}{:>width$}{}", p.gray, HOLE_MARKER, p.reset, width = CELL_WIDTH)
                    } else {
                        format!("{:>width$.3}", value, width = CELL_WIDTH)
                    }
                })
                .collect();
            lines.push(cells.join(""));
        }
        lines.join("\n")
    }
}
