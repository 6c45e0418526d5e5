//! Terrain index validation: the kd-tree must agree with an exhaustive
//! linear scan on every query, and the loader must survive dirty input.

use std::fs;

use artillery_engine::{SolveError, TerrainHeightIndex, TerrainPoint};

/// xorshift64*-style generator so the datasets are irregular but repeatable.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn brute_force_nearest(points: &[TerrainPoint], x: f64, y: f64) -> (TerrainPoint, f64) {
    let best = points
        .iter()
        .min_by(|a, b| {
            let da = (a.x - x).powi(2) + (a.y - y).powi(2);
            let db = (b.x - x).powi(2) + (b.y - y).powi(2);
            da.total_cmp(&db)
        })
        .copied()
        .unwrap();
    let dist = ((best.x - x).powi(2) + (best.y - y).powi(2)).sqrt();
    (best, dist)
}

#[test]
fn kd_tree_matches_brute_force_exhaustively() {
    for (seed, count) in [(0x9E37_79B9_7F4A_7C15u64, 1usize), (42, 7), (7, 100), (1234, 500)] {
        let mut rng = Rng(seed);
        let points: Vec<TerrainPoint> = (0..count)
            .map(|_| TerrainPoint {
                x: rng.next() * 20_000.0,
                y: rng.next() * 20_000.0,
                height: rng.next() * 400.0 - 50.0,
            })
            .collect();
        let index = TerrainHeightIndex::from_points(points.clone());
        assert_eq!(index.len(), count);

        for _ in 0..300 {
            // Queries inside and well outside the sampled region
            let qx = rng.next() * 30_000.0 - 5000.0;
            let qy = rng.next() * 30_000.0 - 5000.0;
            let (expected, expected_dist) = brute_force_nearest(&points, qx, qy);
            let (found, dist) = index.query(qx, qy).unwrap();
            assert!(
                (dist - expected_dist).abs() < 1e-9,
                "seed {seed} n {count}: query ({qx}, {qy}) found {found:?} at {dist}, \
                 brute force {expected:?} at {expected_dist}"
            );
        }
    }
}

#[test]
fn single_point_index_answers_everything() {
    let index = TerrainHeightIndex::from_points(vec![TerrainPoint {
        x: 14851.0,
        y: 15100.0,
        height: 37.5,
    }]);
    assert_eq!(index.height_at(0.0, 0.0).unwrap(), 37.5);
    assert_eq!(index.height_at(99999.0, -4.0).unwrap(), 37.5);
}

#[test]
fn empty_index_reports_no_data() {
    let index = TerrainHeightIndex::from_points(Vec::new());
    assert!(matches!(index.query(100.0, 100.0), Err(SolveError::NoData)));
}

#[test]
fn loader_skips_malformed_rows_and_keeps_the_rest() {
    let path = std::env::temp_dir().join("artillery_engine_terrain_scenarios.txt");
    fs::write(
        &path,
        "\
100 200 12.5
garbage line
300 400
14851 15100 22.0
  500   600   -3.25
1e3 2e3 4e1
",
    )
    .unwrap();
    let index = TerrainHeightIndex::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(index.len(), 4);
    assert_eq!(index.height_at(14850.0, 15099.0).unwrap(), 22.0);
    assert_eq!(index.height_at(501.0, 601.0).unwrap(), -3.25);
    assert_eq!(index.height_at(1000.0, 2000.0).unwrap(), 40.0);
}

#[test]
fn all_malformed_file_builds_an_empty_index() {
    let path = std::env::temp_dir().join("artillery_engine_terrain_bad.txt");
    fs::write(&path, "only\njunk here\n").unwrap();
    let index = TerrainHeightIndex::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert!(index.is_empty());
    assert!(matches!(index.height_at(0.0, 0.0), Err(SolveError::NoData)));
}

#[test]
fn concurrent_queries_share_one_index() {
    let mut rng = Rng(0xDEAD_BEEF_CAFE_F00D);
    let points: Vec<TerrainPoint> = (0..256)
        .map(|_| TerrainPoint {
            x: rng.next() * 10_000.0,
            y: rng.next() * 10_000.0,
            height: rng.next() * 100.0,
        })
        .collect();
    let index = TerrainHeightIndex::from_points(points.clone());

    // Read-only sharing across threads, no synchronization
    std::thread::scope(|scope| {
        for t in 0..4 {
            let index = &index;
            let points = &points;
            scope.spawn(move || {
                let mut rng = Rng(1 + t as u64);
                for _ in 0..100 {
                    let qx = rng.next() * 10_000.0;
                    let qy = rng.next() * 10_000.0;
                    let (_, dist) = index.query(qx, qy).unwrap();
                    let (_, expected) = brute_force_nearest(points, qx, qy);
                    assert!((dist - expected).abs() < 1e-9);
                }
            });
        }
    });
}
