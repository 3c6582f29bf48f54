use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use singledetect::{
    random_points, Animation, DetectionEngine, DetectorConfig, GridStrategy, NaiveStrategy, Point,
    PointId, PointIdAllocator, Viewport,
};

const VIEWPORT: Viewport = Viewport {
    min_x: 0.0,
    min_y: 0.0,
    max_x: 600.0,
    max_y: 500.0,
};

fn engines(
    points: Vec<Point>,
    config: &DetectorConfig,
) -> (DetectionEngine<NaiveStrategy>, DetectionEngine<GridStrategy>) {
    let naive = DetectionEngine::new(points.clone(), config, NaiveStrategy::new()).unwrap();
    let grid = DetectionEngine::new(points, config, GridStrategy::new(&config.layout())).unwrap();
    (naive, grid)
}

fn clustered_points(count: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut ids = PointIdAllocator::new();
    let centers = [(100.0, 100.0), (450.0, 380.0), (300.0, 250.0)];
    (0..count)
        .map(|i| {
            let (cx, cy) = centers[i % centers.len()];
            let x: f64 = cx + rng.gen_range(-60.0..60.0);
            let y: f64 = cy + rng.gen_range(-60.0..60.0);
            ids.point(x, y)
        })
        .collect()
}

#[test]
fn test_singles_match_naive_uniform() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = random_points(300, &VIEWPORT, &mut PointIdAllocator::new(), &mut rng);
        let config = DetectorConfig::new(VIEWPORT, 25.0);
        let (mut naive, mut grid) = engines(points, &config);
        naive.refresh_singles();
        grid.refresh_singles();
        assert!(!naive.singles().is_empty());
        assert_eq!(naive.singles().indices(), grid.singles().indices(), "seed {}", seed);
    }
}

#[test]
fn test_singles_match_naive_clustered_and_wide_cells() {
    let mut rng = StdRng::seed_from_u64(99);
    let points = clustered_points(400, &mut rng);
    for (max_distance, cell_side) in [(5.0, 5.0), (12.5, 12.5), (12.5, 40.0), (45.0, 45.0)] {
        let config = DetectorConfig::new(VIEWPORT, max_distance).with_cell_side(cell_side);
        let (mut naive, mut grid) = engines(points.clone(), &config);
        naive.refresh_singles();
        grid.refresh_singles();
        assert_eq!(
            naive.singles().indices(),
            grid.singles().indices(),
            "max_distance {} cell_side {}",
            max_distance,
            cell_side
        );
    }
}

#[test]
fn test_singles_match_while_points_move() {
    let mut rng = StdRng::seed_from_u64(4);
    let points = random_points(150, &VIEWPORT, &mut PointIdAllocator::new(), &mut rng);
    let config = DetectorConfig::new(VIEWPORT, 45.0);
    let (mut naive, mut grid) = engines(points, &config);

    let mut anim = Animation::new(21);
    for frame in 0..100 {
        anim.select_moving(10, grid.len());
        anim.step(&mut grid, 20.0).unwrap();
        for &i in anim.moving() {
            let [x, y] = grid.points()[i].position();
            naive.set_position(i, x, y).unwrap();
        }
        naive.refresh_singles();
        grid.refresh_singles();
        assert_eq!(naive.singles().indices(), grid.singles().indices(), "frame {}", frame);
    }
}

#[test]
fn test_knn_matches_naive() {
    let mut rng = StdRng::seed_from_u64(17);
    let points = random_points(250, &VIEWPORT, &mut PointIdAllocator::new(), &mut rng);
    let config = DetectorConfig::new(VIEWPORT, 30.0);
    let (mut naive, mut grid) = engines(points, &config);

    for origin in [0, 13, 128, 249] {
        for k in [1, 2, 7, 50, 248, 249, 1000] {
            let a = naive.query_knn_at(origin, k).unwrap().neighbors().to_vec();
            let b = grid.query_knn_at(origin, k).unwrap().neighbors().to_vec();
            assert_eq!(a.len(), k.min(249));
            assert_eq!(a, b, "origin {} k {}", origin, k);
        }
    }
}

#[test]
fn test_knn_matches_naive_for_external_origins() {
    let mut rng = StdRng::seed_from_u64(23);
    let points = clustered_points(200, &mut rng);
    let config = DetectorConfig::new(VIEWPORT, 20.0);
    let (mut naive, mut grid) = engines(points, &config);

    let origins = [(0.0, 0.0), (600.0, 500.0), (-250.0, 120.0), (310.5, 248.25), (5_000.0, -40.0)];
    for (n, &(x, y)) in origins.iter().enumerate() {
        let origin = Point::new(PointId::new(10_000 + n as u32), x, y);
        for k in [1, 5, 30, 200] {
            let a = naive.query_knn(&origin, k).neighbors().to_vec();
            let b = grid.query_knn(&origin, k).neighbors().to_vec();
            assert_eq!(a.len(), k);
            assert_eq!(a, b, "origin ({}, {}) k {}", x, y, k);
        }
    }
}

#[test]
fn test_refresh_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(8);
    let points = random_points(200, &VIEWPORT, &mut PointIdAllocator::new(), &mut rng);
    let config = DetectorConfig::new(VIEWPORT, 30.0);
    let (_, mut grid) = engines(points, &config);

    grid.refresh_singles();
    let first = grid.singles().indices().to_vec();
    grid.refresh_singles();
    assert_eq!(grid.singles().indices(), first.as_slice());
}

#[test]
fn test_classification_ignores_point_order() {
    let mut rng = StdRng::seed_from_u64(31);
    let points = random_points(200, &VIEWPORT, &mut PointIdAllocator::new(), &mut rng);
    let mut reversed = points.clone();
    reversed.reverse();

    let config = DetectorConfig::new(VIEWPORT, 35.0);
    let (_, mut forward) = engines(points, &config);
    let (_, mut backward) = engines(reversed, &config);
    forward.refresh_singles();
    backward.refresh_singles();

    let mut a = forward.singles_ids();
    let mut b = backward.singles_ids();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}
