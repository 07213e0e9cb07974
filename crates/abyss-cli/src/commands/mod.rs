//! Subcommand handlers. `main.rs` parses arguments and dispatches here.

pub mod explain;
pub mod heatmap;
pub mod route;
pub mod zones;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use abyss_lib::{load_dataset, resolve_dataset_dir, Error as SurveyError, LayeredDataset};
use abyss_cli::output::OutputFormat;
use abyss_cli::terminal::ColorPalette;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub data_dir: Option<&'a Path>,
    pub format: OutputFormat,
    pub palette: ColorPalette,
}

impl CommandContext<'_> {
    /// Resolve and load the survey dataset.
    pub fn load_survey(&self) -> Result<LayeredDataset> {
        let dir = resolve_dataset_dir(self.data_dir)
            .context("failed to locate the survey dataset; pass --data-dir or set ABYSS_DATA_DIR")?;
        debug!(path = %dir.display(), "loading survey");
        load_dataset(&dir).with_context(|| format!("failed to load survey from {}", dir.display()))
    }
}

/// Turn library errors users can fix into short messages.
pub fn friendly_error(dataset: &LayeredDataset, err: SurveyError) -> anyhow::Error {
    match err {
        SurveyError::CellNotFound { row, col } => {
            let bounds = dataset.bounds();
            anyhow::anyhow!(
                "No survey cell at ({row}, {col}). The grid spans {} rows and {} columns; some coordinates inside it may be unsurveyed.",
                bounds.rows,
                bounds.cols
            )
        }
        other => anyhow::Error::new(other),
    }
}
