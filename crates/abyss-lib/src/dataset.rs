//! Immutable, coordinate-keyed view over every survey layer.
//!
//! A [`LayeredDataset`] is built once (from CSV files via
//! [`crate::loader::load_dataset`] or in memory via [`DatasetBuilder`]) and is
//! only ever read afterwards. Consumers get slices of records per coordinate;
//! a slice may be empty and may hold more than one record, so every consumer
//! picks records through a named policy from [`crate::features`].

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{Coordinate, GridBounds};
use crate::layers::{Cell, Coral, Current, Hazard, Life, Poi, Resource};

/// Environment variable that overrides the dataset directory.
pub const DATA_DIR_ENV: &str = "ABYSS_DATA_DIR";

/// Largest grid area accepted by [`DatasetBuilder::build`]. Heatmaps are
/// dense, so the area bounds their memory.
pub const MAX_GRID_CELLS: usize = 4_000_000;

/// Optional descriptive metadata shipped next to the layer files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub cols: Option<usize>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DatasetMetadata {
    fn bounds(&self) -> Option<GridBounds> {
        match (self.rows, self.cols) {
            (Some(rows), Some(cols)) if rows > 0 && cols > 0 => Some(GridBounds::new(rows, cols)),
            _ => None,
        }
    }
}

/// Sparse overlay: zero or more records per coordinate.
#[derive(Debug, Clone)]
pub struct SparseLayer<T> {
    records: HashMap<Coordinate, Vec<T>>,
}

impl<T> Default for SparseLayer<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<T> SparseLayer<T> {
    /// Records at `coord` in load order; empty when none exist.
    pub fn at(&self, coord: Coordinate) -> &[T] {
        self.records
            .get(&coord)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total record count across all coordinates.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, coord: Coordinate, record: T) {
        self.records.entry(coord).or_default().push(record);
    }

    fn count_outside(&self, cells: &HashMap<Coordinate, Cell>) -> usize {
        self.records
            .iter()
            .filter(|(coord, _)| !cells.contains_key(coord))
            .map(|(_, records)| records.len())
            .sum()
    }
}

/// Borrowed bundle of every layer at one coordinate.
#[derive(Debug, Clone, Copy)]
pub struct CellLayers<'a> {
    pub coordinate: Coordinate,
    pub cell: &'a Cell,
    pub hazards: &'a [Hazard],
    pub currents: &'a [Current],
    pub corals: &'a [Coral],
    pub resources: &'a [Resource],
    pub life: &'a [Life],
    pub poi: &'a [Poi],
}

/// Read-only in-memory view of all per-cell layers.
#[derive(Debug, Clone)]
pub struct LayeredDataset {
    bounds: GridBounds,
    cells: HashMap<Coordinate, Cell>,
    order: Vec<Coordinate>,
    hazards: SparseLayer<Hazard>,
    currents: SparseLayer<Current>,
    corals: SparseLayer<Coral>,
    resources: SparseLayer<Resource>,
    life: SparseLayer<Life>,
    poi: SparseLayer<Poi>,
    metadata: Option<DatasetMetadata>,
}

impl LayeredDataset {
    /// Start building a dataset in memory.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn metadata(&self) -> Option<&DatasetMetadata> {
        self.metadata.as_ref()
    }

    /// Cell coordinates in enumeration (load) order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.order
    }

    pub fn cell_count(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Resolve the cell at `coord`, rejecting out-of-bounds coordinates and
    /// holes with [`Error::CellNotFound`].
    pub fn require_cell(&self, coord: Coordinate) -> Result<&Cell> {
        if !self.bounds.contains(coord) {
            return Err(cell_not_found(coord));
        }
        self.cells.get(&coord).ok_or_else(|| cell_not_found(coord))
    }

    pub fn hazards(&self, coord: Coordinate) -> &[Hazard] {
        self.hazards.at(coord)
    }

    pub fn currents(&self, coord: Coordinate) -> &[Current] {
        self.currents.at(coord)
    }

    pub fn corals(&self, coord: Coordinate) -> &[Coral] {
        self.corals.at(coord)
    }

    pub fn resources(&self, coord: Coordinate) -> &[Resource] {
        self.resources.at(coord)
    }

    pub fn life(&self, coord: Coordinate) -> &[Life] {
        self.life.at(coord)
    }

    pub fn poi(&self, coord: Coordinate) -> &[Poi] {
        self.poi.at(coord)
    }

    /// Every layer at `coord`, or `None` when the coordinate has no cell.
    pub fn layers_at(&self, coord: Coordinate) -> Option<CellLayers<'_>> {
        let cell = self.cells.get(&coord)?;
        Some(self.layers_with(coord, cell))
    }

    /// Like [`Self::layers_at`], but out-of-bounds coordinates and holes
    /// yield [`Error::CellNotFound`] as in [`Self::require_cell`].
    pub fn require_layers(&self, coord: Coordinate) -> Result<CellLayers<'_>> {
        let cell = self.require_cell(coord)?;
        Ok(self.layers_with(coord, cell))
    }

    fn layers_with<'a>(&'a self, coord: Coordinate, cell: &'a Cell) -> CellLayers<'a> {
        CellLayers {
            coordinate: coord,
            cell,
            hazards: self.hazards.at(coord),
            currents: self.currents.at(coord),
            corals: self.corals.at(coord),
            resources: self.resources.at(coord),
            life: self.life.at(coord),
            poi: self.poi.at(coord),
        }
    }

    /// Record counts per layer, for load summaries.
    pub fn layer_counts(&self) -> LayerCounts {
        LayerCounts {
            cells: self.order.len(),
            hazards: self.hazards.len(),
            currents: self.currents.len(),
            corals: self.corals.len(),
            resources: self.resources.len(),
            life: self.life.len(),
            poi: self.poi.len(),
        }
    }
}

/// Number of records held by each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerCounts {
    pub cells: usize,
    pub hazards: usize,
    pub currents: usize,
    pub corals: usize,
    pub resources: usize,
    pub life: usize,
    pub poi: usize,
}

fn cell_not_found(coord: Coordinate) -> Error {
    Error::CellNotFound {
        row: coord.row,
        col: coord.col,
    }
}

/// Accumulates layer records and validates them into a [`LayeredDataset`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    bounds: Option<GridBounds>,
    cells: Vec<(Coordinate, Cell)>,
    hazards: SparseLayer<Hazard>,
    currents: SparseLayer<Current>,
    corals: SparseLayer<Coral>,
    resources: SparseLayer<Resource>,
    life: SparseLayer<Life>,
    poi: SparseLayer<Poi>,
    metadata: Option<DatasetMetadata>,
}

impl DatasetBuilder {
    /// Fix the grid extent instead of deriving it from metadata or cells.
    pub fn bounds(mut self, rows: usize, cols: usize) -> Self {
        self.bounds = Some(GridBounds::new(rows, cols));
        self
    }

    pub fn metadata(mut self, metadata: DatasetMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn cell(mut self, coord: impl Into<Coordinate>, cell: Cell) -> Self {
        self.push_cell(coord.into(), cell);
        self
    }

    pub fn hazard(mut self, coord: impl Into<Coordinate>, hazard: Hazard) -> Self {
        self.hazards.push(coord.into(), hazard);
        self
    }

    pub fn current(mut self, coord: impl Into<Coordinate>, current: Current) -> Self {
        self.currents.push(coord.into(), current);
        self
    }

    pub fn coral(mut self, coord: impl Into<Coordinate>, coral: Coral) -> Self {
        self.corals.push(coord.into(), coral);
        self
    }

    pub fn resource(mut self, coord: impl Into<Coordinate>, resource: Resource) -> Self {
        self.resources.push(coord.into(), resource);
        self
    }

    pub fn life(mut self, coord: impl Into<Coordinate>, life: Life) -> Self {
        self.life.push(coord.into(), life);
        self
    }

    pub fn poi(mut self, coord: impl Into<Coordinate>, poi: Poi) -> Self {
        self.poi.push(coord.into(), poi);
        self
    }

    pub(crate) fn push_cell(&mut self, coord: Coordinate, cell: Cell) {
        self.cells.push((coord, cell));
    }

    pub(crate) fn push_hazard(&mut self, coord: Coordinate, hazard: Hazard) {
        self.hazards.push(coord, hazard);
    }

    pub(crate) fn push_current(&mut self, coord: Coordinate, current: Current) {
        self.currents.push(coord, current);
    }

    pub(crate) fn push_coral(&mut self, coord: Coordinate, coral: Coral) {
        self.corals.push(coord, coral);
    }

    pub(crate) fn push_resource(&mut self, coord: Coordinate, resource: Resource) {
        self.resources.push(coord, resource);
    }

    pub(crate) fn push_life(&mut self, coord: Coordinate, life: Life) {
        self.life.push(coord, life);
    }

    pub(crate) fn push_poi(&mut self, coord: Coordinate, poi: Poi) {
        self.poi.push(coord, poi);
    }

    pub(crate) fn set_metadata(&mut self, metadata: DatasetMetadata) {
        self.metadata = Some(metadata);
    }

    /// Validate the dense layer and freeze everything into a dataset.
    ///
    /// Fails when the cell layer is empty, when a coordinate carries more
    /// than one cell, or when a cell lies outside the grid bounds.
    pub fn build(self) -> Result<LayeredDataset> {
        if self.cells.is_empty() {
            return Err(Error::InvalidDataset {
                message: "cell layer is empty".to_string(),
            });
        }

        let bounds = match self
            .bounds
            .or_else(|| self.metadata.as_ref().and_then(DatasetMetadata::bounds))
        {
            Some(bounds) => bounds,
            None => derived_bounds(&self.cells)?,
        };
        if bounds.area() > MAX_GRID_CELLS {
            return Err(Error::InvalidDataset {
                message: format!(
                    "{}x{} grid exceeds the limit of {} cells",
                    bounds.rows, bounds.cols, MAX_GRID_CELLS
                ),
            });
        }

        let mut cells = HashMap::with_capacity(self.cells.len());
        let mut order = Vec::with_capacity(self.cells.len());
        for (coord, cell) in self.cells {
            if !bounds.contains(coord) {
                return Err(Error::InvalidDataset {
                    message: format!(
                        "cell {} lies outside the {}x{} grid",
                        coord, bounds.rows, bounds.cols
                    ),
                });
            }
            if cells.insert(coord, cell).is_some() {
                return Err(Error::InvalidDataset {
                    message: format!("duplicate cell record at {}", coord),
                });
            }
            order.push(coord);
        }

        let orphans = self.hazards.count_outside(&cells)
            + self.currents.count_outside(&cells)
            + self.corals.count_outside(&cells)
            + self.resources.count_outside(&cells)
            + self.life.count_outside(&cells)
            + self.poi.count_outside(&cells);
        if orphans > 0 {
            debug!(orphans, "sparse records reference coordinates without a cell");
        }

        Ok(LayeredDataset {
            bounds,
            cells,
            order,
            hazards: self.hazards,
            currents: self.currents,
            corals: self.corals,
            resources: self.resources,
            life: self.life,
            poi: self.poi,
            metadata: self.metadata,
        })
    }
}

fn derived_bounds(cells: &[(Coordinate, Cell)]) -> Result<GridBounds> {
    let extent = |max: Option<usize>| {
        max.unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| Error::InvalidDataset {
                message: "cell coordinate is too large to size the grid".to_string(),
            })
    };
    let rows = extent(cells.iter().map(|(c, _)| c.row).max())?;
    let cols = extent(cells.iter().map(|(c, _)| c.col).max())?;
    Ok(GridBounds::new(rows, cols))
}

/// Resolve the default dataset directory using platform-specific project directories.
pub fn default_dataset_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "abyss", "abyss").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Resolve the directory holding the layer files.
///
/// Resolution order:
/// 1. Explicit `target` argument when provided.
/// 2. `ABYSS_DATA_DIR` environment variable.
/// 3. Platform-specific project data directory.
///
/// The resolved directory must exist.
pub fn resolve_dataset_dir(target: Option<&Path>) -> Result<PathBuf> {
    let resolved = if let Some(explicit) = target {
        explicit.to_path_buf()
    } else if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        PathBuf::from(env_path)
    } else {
        default_dataset_dir()?
    };

    if !resolved.is_dir() {
        return Err(Error::DatasetNotFound { path: resolved });
    }
    debug!(path = %resolved.display(), "resolved dataset directory");
    Ok(resolved)
}
