mod common;

use abyss_lib::{
    rank_zones, rank_zones_with, rank_zones_with_label, scan_zones_with_label, Coordinate, Error,
    RankingOptions, ScoreMode,
};
use common::survey_small;

fn coords(ranking: &abyss_lib::ZoneRanking) -> Vec<Coordinate> {
    ranking.highlights.iter().map(|h| h.coordinate).collect()
}

#[test]
fn mining_highlights_favour_deposits() {
    let dataset = survey_small();
    let ranking = rank_zones(&dataset, ScoreMode::Mining).expect("ranking");
    assert_eq!(
        coords(&ranking),
        vec![
            Coordinate::new(0, 0),
            Coordinate::new(0, 2),
            Coordinate::new(1, 4),
            Coordinate::new(2, 3),
            Coordinate::new(0, 4),
        ]
    );
}

#[test]
fn highlights_are_bounded_sorted_and_end_at_max() {
    let dataset = survey_small();
    for mode in ScoreMode::ZONE_MODES {
        for top_k in [0, 1, 5, 50] {
            let options = RankingOptions::default().with_top_k(top_k);
            let ranking = rank_zones_with(&dataset, mode, &options).expect("ranking");
            assert!(ranking.highlights.len() <= top_k);
            assert!(ranking.highlights.len() <= dataset.cell_count());
            for pair in ranking.highlights.windows(2) {
                assert!(pair[0].score <= pair[1].score);
            }
            if let Some(best) = ranking.best() {
                let max = dataset
                    .coordinates()
                    .iter()
                    .filter_map(|&coord| ranking.score_at(coord))
                    .fold(f64::NEG_INFINITY, f64::max);
                assert_eq!(best.score, max);
            }
        }
    }
}

#[test]
fn heatmap_is_dense_with_zero_holes() {
    let dataset = survey_small();
    let ranking = rank_zones(&dataset, ScoreMode::Conservation).expect("ranking");
    assert_eq!(ranking.rows, 4);
    assert_eq!(ranking.cols, 5);
    assert_eq!(ranking.heatmap.len(), 4);
    assert!(ranking.heatmap.iter().all(|row| row.len() == 5));
    assert!(ranking.heatmap.iter().flatten().all(|v| !v.is_nan()));
    assert_eq!(ranking.heatmap[2][4], 0.0);
    assert_eq!(ranking.heatmap[3][3], 0.0);
}

#[test]
fn ranking_is_idempotent() {
    let dataset = survey_small();
    let first = rank_zones(&dataset, ScoreMode::Conservation).expect("ranking");
    let second = rank_zones(&dataset, ScoreMode::Conservation).expect("ranking");
    assert_eq!(first, second);
}

#[test]
fn normalized_heatmap_stays_in_unit_range() {
    let dataset = survey_small();
    let ranking = rank_zones(&dataset, ScoreMode::Mining).expect("ranking");
    let normalized = ranking.normalized_heatmap();
    for &coord in dataset.coordinates() {
        let value = normalized[coord.row][coord.col];
        assert!((0.0..=1.0).contains(&value), "{coord}: {value}");
    }
    assert_eq!(normalized[0][4], 1.0);
}

#[test]
fn route_modes_are_rejected_for_ranking() {
    let dataset = survey_small();
    let err = rank_zones_with_label(&dataset, "safe_route", &RankingOptions::default())
        .expect_err("route mode");
    assert!(matches!(err, Error::UnsupportedMode { operation: "zone ranking", .. }));

    let err = rank_zones_with_label(&dataset, "minning", &RankingOptions::default())
        .expect_err("typo");
    assert!(err.to_string().contains("Did you mean 'mining'?"), "{err}");
}

#[test]
fn permissive_scan_falls_back_to_balanced() {
    let dataset = survey_small();
    let ranking = scan_zones_with_label(&dataset, "treasure_hunt", &RankingOptions::default());
    assert_eq!(ranking.mode, ScoreMode::Balanced);
    assert_eq!(ranking.highlights.len(), 5);
}
