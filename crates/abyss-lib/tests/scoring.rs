mod common;

use abyss_lib::{
    combined_score, danger_score, score_cell, CellScores, Coordinate, Current, ScoreMode,
};
use common::{flat_grid, survey_small};

#[test]
fn base_scores_are_finite_and_non_negative() {
    let dataset = survey_small();
    for &coord in dataset.coordinates() {
        let layers = dataset.layers_at(coord).expect("cell present");
        let scores = CellScores::from_layers(&layers);
        for value in [scores.danger, scores.resource, scores.eco_impact] {
            assert!(value.is_finite(), "{coord}: {value}");
            assert!(value >= 0.0, "{coord}: {value}");
        }
    }
}

#[test]
fn scoring_is_deterministic() {
    let dataset = survey_small();
    for &coord in dataset.coordinates() {
        for mode in ScoreMode::ALL {
            let first = score_cell(&dataset, coord, mode);
            let second = score_cell(&dataset, coord, mode);
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }
}

#[test]
fn shallow_buoy_cell_matches_reference_danger() {
    let dataset = survey_small();
    let layers = dataset.layers_at(Coordinate::new(0, 0)).expect("cell present");
    let danger = CellScores::from_layers(&layers).danger;
    assert!((danger - 0.0554).abs() < 1e-4, "danger was {danger}");
}

#[test]
fn in_memory_scenario_matches_fixture() {
    let dataset = flat_grid(1, 1, 500.0)
        .current(
            (0, 0),
            Current {
                speed_mps: 0.5,
                stability: 0.9,
            },
        )
        .build()
        .expect("dataset");
    let layers = dataset.layers_at(Coordinate::new(0, 0)).expect("cell");
    let danger = danger_score(layers.cell, layers.hazards, layers.currents);
    assert!((danger - 0.0554).abs() < 1e-4);
}

#[test]
fn missing_cells_score_infinite() {
    let dataset = survey_small();
    for mode in ScoreMode::ALL {
        assert!(score_cell(&dataset, Coordinate::new(3, 3), mode).is_infinite());
        assert!(score_cell(&dataset, Coordinate::new(40, 0), mode).is_infinite());
    }
}

#[test]
fn fast_route_scores_zero_everywhere() {
    let dataset = survey_small();
    for &coord in dataset.coordinates() {
        assert_eq!(score_cell(&dataset, coord, ScoreMode::FastRoute), 0.0);
    }
}

#[test]
fn combined_score_is_monotone_in_danger() {
    let samples = [0.0, 0.05, 0.3, 1.0, 2.5];
    for window in samples.windows(2) {
        let (low, high) = (window[0], window[1]);
        for (eco, resource) in [(0.0, 0.0), (0.4, 1.2), (2.0, 0.1)] {
            assert!(
                combined_score(high, eco, resource, ScoreMode::Mining)
                    < combined_score(low, eco, resource, ScoreMode::Mining)
            );
            assert!(
                combined_score(high, eco, resource, ScoreMode::Balanced)
                    < combined_score(low, eco, resource, ScoreMode::Balanced)
            );
            assert!(
                combined_score(high, eco, resource, ScoreMode::SafeRoute)
                    > combined_score(low, eco, resource, ScoreMode::SafeRoute)
            );
        }
    }
}
