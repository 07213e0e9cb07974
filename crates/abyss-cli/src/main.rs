mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use abyss_cli::logging::{init_logging, LoggingConfig};
use abyss_cli::output::OutputFormat;
use abyss_cli::terminal::ColorPalette;
use abyss_lib::Coordinate;

use commands::route::RouteCommandArgs;
use commands::CommandContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "Abyssal survey explanations, routes, and zone rankings")]
struct Cli {
    /// Directory holding the survey layer CSV files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable colored output (also honours NO_COLOR).
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explain the scores of one cell.
    Explain {
        /// Cell coordinate as ROW,COL.
        #[arg(long)]
        at: Coordinate,
    },
    /// Compute the minimum-cost route between two cells.
    Route {
        /// Starting cell as ROW,COL.
        #[arg(long = "from")]
        from: Coordinate,
        /// Destination cell as ROW,COL.
        #[arg(long = "to")]
        to: Coordinate,
        /// Routing mode: safe_route or fast_route.
        #[arg(long, default_value = "safe_route")]
        mode: String,
    },
    /// Rank the best zones for mining or conservation.
    Zones {
        /// Ranking mode: mining or conservation.
        #[arg(long)]
        mode: String,
        /// Number of highlights to report.
        #[arg(long, default_value_t = abyss_lib::zones::DEFAULT_TOP_K)]
        top: usize,
    },
    /// Print the score of every cell as a grid.
    Heatmap {
        /// Any mode label; unknown labels score as balanced.
        #[arg(long, default_value = "balanced")]
        mode: String,
        /// Rescale scores to the 0..1 range.
        #[arg(long)]
        normalized: bool,
    },
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let cli = Cli::parse();

    let ctx = CommandContext {
        data_dir: cli.data_dir.as_deref(),
        format: cli.format,
        palette: ColorPalette::detect(cli.no_color || cli.format == OutputFormat::Json),
    };

    match cli.command {
        Command::Explain { at } => commands::explain::handle_explain_command(&ctx, at),
        Command::Route { from, to, mode } => {
            let args = RouteCommandArgs { from, to, mode };
            commands::route::handle_route_command(&ctx, &args)
        }
        Command::Zones { mode, top } => commands::zones::handle_zones_command(&ctx, &mode, top),
        Command::Heatmap { mode, normalized } => {
            commands::heatmap::handle_heatmap_command(&ctx, &mode, normalized)
        }
    }
}
