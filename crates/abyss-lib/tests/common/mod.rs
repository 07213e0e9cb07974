//! Shared fixtures for the integration tests.

use std::path::PathBuf;

use abyss_lib::{load_dataset, Cell, Hazard, LayeredDataset};

/// Directory holding the checked-in survey fixtures.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the small 4x5 survey used by most tests.
#[allow(dead_code)]
pub fn survey_small_dir() -> PathBuf {
    fixtures_dir().join("survey_small")
}

#[allow(dead_code)]
pub fn survey_small() -> LayeredDataset {
    load_dataset(&survey_small_dir()).expect("fixture survey loads")
}

/// Fully populated flat grid: every cell at `depth_m`, no overlays.
#[allow(dead_code)]
pub fn flat_grid(rows: usize, cols: usize, depth_m: f64) -> abyss_lib::DatasetBuilder {
    let mut builder = LayeredDataset::builder().bounds(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            builder = builder.cell(
                (row, col),
                Cell {
                    depth_m,
                    biome: "plain".to_string(),
                    temperature_c: 4.0,
                },
            );
        }
    }
    builder
}

#[allow(dead_code)]
pub fn hazard(kind: &str, severity: f64) -> Hazard {
    Hazard {
        kind: kind.to_string(),
        severity,
    }
}
