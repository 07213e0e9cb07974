use anyhow::Result;

use abyss_lib::{explain_cell, Coordinate, QueryResult};

use super::{friendly_error, CommandContext};

/// Handle `explain --at R,C`.
pub fn handle_explain_command(ctx: &CommandContext<'_>, at: Coordinate) -> Result<()> {
    let dataset = ctx.load_survey()?;
    let explanation = explain_cell(&dataset, at).map_err(|err| friendly_error(&dataset, err))?;
    let rendered = ctx
        .format
        .render(&QueryResult::from(explanation), ctx.palette)?;
    println!("{rendered}");
    Ok(())
}
