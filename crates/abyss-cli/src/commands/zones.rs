use anyhow::Result;

use abyss_lib::{rank_zones_with_label, QueryResult, RankingOptions};

use super::{friendly_error, CommandContext};

/// Handle `zones --mode mining|conservation [--top K]`.
pub fn handle_zones_command(ctx: &CommandContext<'_>, mode: &str, top: usize) -> Result<()> {
    let dataset = ctx.load_survey()?;
    let options = RankingOptions::default().with_top_k(top);
    let ranking =
        rank_zones_with_label(&dataset, mode, &options).map_err(|err| friendly_error(&dataset, err))?;
    let rendered = ctx.format.render(&QueryResult::from(ranking), ctx.palette)?;
    println!("{rendered}");
    Ok(())
}
