use anyhow::Result;
use tracing::warn;

use abyss_lib::{scan_zones, RankingOptions, ScoreMode};
use abyss_cli::output::HeatmapView;

use super::CommandContext;

/// Handle `heatmap --mode <label>`. Any label is accepted; unknown labels
/// score as balanced.
pub fn handle_heatmap_command(ctx: &CommandContext<'_>, mode: &str, normalized: bool) -> Result<()> {
    let dataset = ctx.load_survey()?;
    let resolved = ScoreMode::from_label_or_balanced(mode);
    if resolved == ScoreMode::Balanced && !mode.trim().eq_ignore_ascii_case("balanced") {
        warn!(label = mode, "unrecognized mode; scoring as balanced");
    }

    let ranking = scan_zones(&dataset, resolved, &RankingOptions::default());
    let view = HeatmapView::from_ranking(&ranking, normalized);
    let rendered = ctx.format.render_heatmap(&view, ctx.palette)?;
    println!("{rendered}");
    Ok(())
}
