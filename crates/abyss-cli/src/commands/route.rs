//! Route command handler for grid paths between two survey cells.

use anyhow::Result;
use tracing::info;

use abyss_lib::{plan_route, Coordinate, QueryResult, RouteRequest, ScoreMode};

use super::{friendly_error, CommandContext};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    pub from: Coordinate,
    pub to: Coordinate,
    /// Mode label; only route modes are accepted.
    pub mode: String,
}

/// Handle `route`. A missing route is reported on stdout and is not a
/// failure.
pub fn handle_route_command(ctx: &CommandContext<'_>, args: &RouteCommandArgs) -> Result<()> {
    let dataset = ctx.load_survey()?;
    let mode = ScoreMode::parse_for(&args.mode, &ScoreMode::ROUTE_MODES, "routing")
        .map_err(|err| friendly_error(&dataset, err))?;
    let request = RouteRequest {
        start: args.from,
        goal: args.to,
        mode,
    };

    let plan = plan_route(&dataset, &request).map_err(|err| friendly_error(&dataset, err))?;
    if !plan.is_found() {
        info!(start = %plan.start, goal = %plan.goal, "no viable route");
    }

    let rendered = ctx.format.render(&QueryResult::from(plan), ctx.palette)?;
    println!("{rendered}");
    Ok(())
}
