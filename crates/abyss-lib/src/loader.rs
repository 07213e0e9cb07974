//! CSV ingestion for the survey layers.
//!
//! Each layer lives in its own CSV file inside the dataset directory. Headers
//! are normalized and matched against a list of synonyms so that exports with
//! slightly different column names still load. Coordinates must parse; every
//! other numeric field goes through [`safe_float`] so one bad value degrades a
//! single record instead of failing the load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::dataset::{DatasetMetadata, LayeredDataset};
use crate::error::{Error, Result};
use crate::grid::Coordinate;
use crate::layers::{safe_float, Cell, Coral, Current, Hazard, Life, Poi, Resource};

pub const CELLS_FILE: &str = "cells.csv";
pub const HAZARDS_FILE: &str = "hazards.csv";
pub const CURRENTS_FILE: &str = "currents.csv";
pub const CORALS_FILE: &str = "corals.csv";
pub const RESOURCES_FILE: &str = "resources.csv";
pub const LIFE_FILE: &str = "life.csv";
pub const POI_FILE: &str = "poi.csv";
pub const METADATA_FILE: &str = "metadata.json";

/// Every layer file that must be present before the dataset can serve queries.
pub const REQUIRED_FILES: [&str; 7] = [
    CELLS_FILE,
    HAZARDS_FILE,
    CURRENTS_FILE,
    CORALS_FILE,
    RESOURCES_FILE,
    LIFE_FILE,
    POI_FILE,
];

type Synonyms = &'static [(&'static str, &'static [&'static str])];

const COORDINATE_FIELDS: Synonyms = &[
    ("row", &["row", "r", "grid_row"]),
    ("col", &["col", "c", "column", "grid_col"]),
];

const CELL_FIELDS: Synonyms = &[
    ("depth_m", &["depth_m", "depth", "depth_meters"]),
    ("biome", &["biome", "biome_type", "habitat"]),
    ("temperature_c", &["temperature_c", "temperature", "temp_c", "temp"]),
];

const HAZARD_FIELDS: Synonyms = &[
    ("type", &["type", "hazard_type", "kind", "hazard"]),
    ("severity", &["severity", "hazard_severity"]),
];

const CURRENT_FIELDS: Synonyms = &[
    (
        "speed_mps",
        &["speed_mps", "speed", "current_speed_mps", "current_speed"],
    ),
    ("stability", &["stability", "current_stability"]),
];

const CORAL_FIELDS: Synonyms = &[
    (
        "cover_pct",
        &["coral_cover_pct", "cover_pct", "coverage_pct", "cover"],
    ),
    ("health_index", &["health_index", "coral_health_index", "health"]),
    ("biodiversity_index", &["biodiversity_index", "biodiversity"]),
];

const RESOURCE_FIELDS: Synonyms = &[
    ("family", &["family", "type", "resource_type"]),
    ("abundance", &["abundance", "resource_abundance"]),
    ("economic_value", &["economic_value", "value"]),
    ("purity", &["purity"]),
    (
        "extraction_difficulty",
        &["extraction_difficulty", "difficulty"],
    ),
    ("environmental_impact", &["environmental_impact", "impact"]),
];

const LIFE_FIELDS: Synonyms = &[
    ("species", &["species", "species_name", "name"]),
    ("density", &["density"]),
    ("threat_level", &["threat_level", "threat"]),
];

const POI_FIELDS: Synonyms = &[
    ("label", &["label", "name", "category"]),
    ("description", &["description", "desc", "details"]),
];

/// Load every layer from `dir` and validate the result.
///
/// Any missing layer file, unreadable CSV, or malformed coordinate aborts the
/// load with [`Error::DataLoad`]; the dataset is never returned partially
/// populated. `metadata.json` is optional and ignored with a warning when it
/// cannot be parsed.
pub fn load_dataset(dir: &Path) -> Result<LayeredDataset> {
    for file in REQUIRED_FILES {
        let path = dir.join(file);
        if !path.is_file() {
            return Err(Error::DataLoad {
                path,
                message: "required layer file is missing".to_string(),
            });
        }
    }

    let mut builder = LayeredDataset::builder();

    read_layer(dir, CELLS_FILE, CELL_FIELDS, &["depth_m"], |coord, row| {
        builder.push_cell(
            coord,
            Cell {
                depth_m: row.number_or("depth_m", 0.0),
                biome: row.label("biome"),
                temperature_c: row.number_or("temperature_c", 0.0),
            },
        );
    })?;

    read_layer(dir, HAZARDS_FILE, HAZARD_FIELDS, &[], |coord, row| {
        builder.push_hazard(
            coord,
            Hazard {
                kind: row.label("type"),
                severity: row.number_or("severity", 0.0),
            },
        );
    })?;

    read_layer(dir, CURRENTS_FILE, CURRENT_FIELDS, &[], |coord, row| {
        let calm = Current::default();
        builder.push_current(
            coord,
            Current {
                speed_mps: row.number_or("speed_mps", calm.speed_mps),
                stability: row.number_or("stability", calm.stability),
            },
        );
    })?;

    read_layer(dir, CORALS_FILE, CORAL_FIELDS, &[], |coord, row| {
        builder.push_coral(
            coord,
            Coral {
                cover_pct: row.number_or("cover_pct", 0.0),
                health_index: row.number_or("health_index", 0.0),
                biodiversity_index: row.number_or("biodiversity_index", 0.0),
            },
        );
    })?;

    read_layer(dir, RESOURCES_FILE, RESOURCE_FIELDS, &[], |coord, row| {
        builder.push_resource(
            coord,
            Resource {
                family: row.label("family"),
                abundance: row.number_or("abundance", 0.0),
                economic_value: row.number_or("economic_value", 0.0),
                purity: row.number_or("purity", 0.0),
                extraction_difficulty: row.number_or("extraction_difficulty", 0.0),
                environmental_impact: row.number_or("environmental_impact", 0.0),
            },
        );
    })?;

    read_layer(dir, LIFE_FILE, LIFE_FIELDS, &[], |coord, row| {
        builder.push_life(
            coord,
            Life {
                species: row.label("species"),
                density: row.number_or("density", 0.0),
                threat_level: row.number_or("threat_level", 0.0),
            },
        );
    })?;

    read_layer(dir, POI_FILE, POI_FIELDS, &[], |coord, row| {
        builder.push_poi(
            coord,
            Poi {
                label: row.label("label"),
                description: row.label("description"),
            },
        );
    })?;

    if let Some(metadata) = read_metadata(&dir.join(METADATA_FILE)) {
        builder.set_metadata(metadata);
    }

    let dataset = builder.build().map_err(|err| match err {
        Error::InvalidDataset { message } => Error::DataLoad {
            path: dir.to_path_buf(),
            message,
        },
        other => other,
    })?;

    let counts = dataset.layer_counts();
    let bounds = dataset.bounds();
    info!(
        rows = bounds.rows,
        cols = bounds.cols,
        cells = counts.cells,
        hazards = counts.hazards,
        currents = counts.currents,
        corals = counts.corals,
        resources = counts.resources,
        life = counts.life,
        poi = counts.poi,
        "loaded survey dataset from {}",
        dir.display()
    );

    Ok(dataset)
}

fn read_metadata(path: &Path) -> Option<DatasetMetadata> {
    if !path.is_file() {
        return None;
    }
    let parsed = fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|raw| serde_json::from_str::<DatasetMetadata>(&raw).map_err(Error::from));
    match parsed {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable dataset metadata");
            None
        }
    }
}

/// Normalize header strings for robust matching.
fn normalize_header(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Canonical field name -> column index for one layer file.
struct Columns {
    index: BTreeMap<&'static str, usize>,
}

impl Columns {
    fn resolve(
        file: &str,
        headers: &StringRecord,
        fields: Synonyms,
        required: &[&str],
    ) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut index = BTreeMap::new();

        for (canon, alts) in COORDINATE_FIELDS.iter().chain(fields.iter()) {
            'outer: for alt in *alts {
                for (i, header) in normalized.iter().enumerate() {
                    if header == alt {
                        index.insert(*canon, i);
                        break 'outer;
                    }
                }
            }
        }

        let missing: Vec<String> = ["row", "col"]
            .iter()
            .chain(required.iter())
            .filter(|field| !index.contains_key(**field))
            .map(|field| field.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                file: file.to_string(),
                missing,
                available: headers.iter().map(str::to_string).collect(),
            });
        }

        Ok(Self { index })
    }
}

/// One CSV record viewed through the resolved column map.
struct RowView<'a> {
    record: &'a StringRecord,
    columns: &'a Columns,
}

impl RowView<'_> {
    fn raw(&self, field: &str) -> Option<&str> {
        self.columns
            .index
            .get(field)
            .and_then(|&i| self.record.get(i))
    }

    /// Safe-float value when the column exists, `default` when it does not.
    fn number_or(&self, field: &str, default: f64) -> f64 {
        self.raw(field).map(safe_float).unwrap_or(default)
    }

    fn label(&self, field: &str) -> String {
        self.raw(field).map(str::trim).unwrap_or_default().to_string()
    }
}

fn read_layer<F>(
    dir: &Path,
    file: &'static str,
    fields: Synonyms,
    required: &[&str],
    mut sink: F,
) -> Result<()>
where
    F: FnMut(Coordinate, &RowView<'_>),
{
    let path = dir.join(file);
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(&path)?;

    let headers = reader
        .headers()
        .map_err(|err| data_load(&path, format!("failed to read headers: {err}")))?
        .clone();
    let columns = Columns::resolve(file, &headers, fields, required)?;

    let mut line: usize = 1;
    for result in reader.records() {
        line += 1;
        let record = result.map_err(|err| data_load(&path, err.to_string()))?;
        let row = RowView {
            record: &record,
            columns: &columns,
        };
        let coord = Coordinate::new(
            grid_index(row.raw("row"), "row", &path, line)?,
            grid_index(row.raw("col"), "col", &path, line)?,
        );
        sink(coord, &row);
    }

    Ok(())
}

/// Parse a grid index. Integral floats such as `3.0` are accepted because
/// spreadsheet exports commonly write them.
fn grid_index(raw: Option<&str>, field: &str, path: &Path, line: usize) -> Result<usize> {
    let raw = raw.unwrap_or_default().trim();
    if let Ok(value) = raw.parse::<usize>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            Ok(value as usize)
        }
        _ => Err(data_load(
            path,
            format!("invalid {field} '{raw}' at line {line}"),
        )),
    }
}

fn data_load(path: &Path, message: String) -> Error {
    Error::DataLoad {
        path: PathBuf::from(path),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_minimal(dir: &Path, cells: &str) {
        fs::write(dir.join(CELLS_FILE), cells).expect("write cells");
        fs::write(dir.join(HAZARDS_FILE), "row,col,type,severity\n").expect("write hazards");
        fs::write(dir.join(CURRENTS_FILE), "row,col,speed_mps,stability\n")
            .expect("write currents");
        fs::write(
            dir.join(CORALS_FILE),
            "row,col,coral_cover_pct,health_index,biodiversity_index\n",
        )
        .expect("write corals");
        fs::write(
            dir.join(RESOURCES_FILE),
            "row,col,family,abundance,economic_value,purity,extraction_difficulty,environmental_impact\n",
        )
        .expect("write resources");
        fs::write(dir.join(LIFE_FILE), "row,col,species,density,threat_level\n")
            .expect("write life");
        fs::write(dir.join(POI_FILE), "row,col,label,description\n").expect("write poi");
    }

    #[test]
    fn header_synonyms_are_normalized() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(
            temp.path(),
            "Row, Col ,Depth,Biome,Temperature\n0,0,500,abyssal plain,2.5\n",
        );
        let dataset = load_dataset(temp.path()).expect("loads");
        let cell = dataset.cell(Coordinate::new(0, 0)).expect("cell");
        assert_eq!(cell.depth_m, 500.0);
        assert_eq!(cell.biome, "abyssal plain");
        assert_eq!(cell.temperature_c, 2.5);
    }

    #[test]
    fn missing_depth_column_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,biome\n0,0,reef\n");
        let err = load_dataset(temp.path()).expect_err("missing depth");
        assert!(err.to_string().contains("missing required columns: depth_m"));
    }

    #[test]
    fn integral_float_coordinates_are_accepted() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m\n1.0,2.0,100\n");
        let dataset = load_dataset(temp.path()).expect("loads");
        assert!(dataset.contains(Coordinate::new(1, 2)));
    }

    #[test]
    fn fractional_coordinates_are_rejected_with_line() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m\n0,0,1\n1.5,2,100\n");
        let err = load_dataset(temp.path()).expect_err("bad row");
        assert!(err.to_string().contains("invalid row '1.5' at line 3"));
    }

    #[test]
    fn missing_layer_file_aborts() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m\n0,0,1\n");
        fs::remove_file(temp.path().join(LIFE_FILE)).expect("remove");
        let err = load_dataset(temp.path()).expect_err("missing life.csv");
        match err {
            Error::DataLoad { path, .. } => assert!(path.ends_with(LIFE_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_numeric_values_become_zero() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m,biome\n0,0,,reef\n");
        fs::write(
            temp.path().join(CURRENTS_FILE),
            "row,col,speed_mps,stability\n0,0,oops,\n",
        )
        .expect("write currents");
        let dataset = load_dataset(temp.path()).expect("loads");
        let coord = Coordinate::new(0, 0);
        assert_eq!(dataset.cell(coord).map(|c| c.depth_m), Some(0.0));
        let current = &dataset.currents(coord)[0];
        assert_eq!(current.speed_mps, 0.0);
        assert_eq!(current.stability, 0.0);
    }

    #[test]
    fn absent_stability_column_defaults_to_stable() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m\n0,0,10\n");
        fs::write(temp.path().join(CURRENTS_FILE), "row,col,speed\n0,0,2.0\n")
            .expect("write currents");
        let dataset = load_dataset(temp.path()).expect("loads");
        let current = &dataset.currents(Coordinate::new(0, 0))[0];
        assert_eq!(current.speed_mps, 2.0);
        assert_eq!(current.stability, 1.0);
    }

    #[test]
    fn malformed_metadata_is_ignored() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m\n0,0,10\n");
        fs::write(temp.path().join(METADATA_FILE), "{not json").expect("write metadata");
        let dataset = load_dataset(temp.path()).expect("loads");
        assert!(dataset.metadata().is_none());
    }

    #[test]
    fn duplicate_cells_surface_as_data_load_errors() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_minimal(temp.path(), "row,col,depth_m\n0,0,10\n0,0,20\n");
        let err = load_dataset(temp.path()).expect_err("duplicate");
        assert!(matches!(err, Error::DataLoad { .. }));
    }
}
