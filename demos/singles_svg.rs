use plotters::prelude::*;
use singledetect::{
    random_points, Animation, Cell, DetectionEngine, DetectorConfig, PointIdAllocator, Viewport,
};
use tracing_subscriber::EnvFilter;

const DOTS_COUNT: usize = 50;
const DOTS_MOVING: usize = 10;
const MAX_DISTANCE: f64 = 45.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("singledetect=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let viewport = Viewport::new(0.0, 0.0, 600.0, 500.0);
    let config = DetectorConfig::new(viewport, MAX_DISTANCE);

    let mut anim = Animation::new(2024);
    let points = random_points(DOTS_COUNT, &viewport, &mut PointIdAllocator::new(), anim.rng());
    let mut engine = DetectionEngine::from_config(points, &config)?;

    // Let the dots wander for a while before taking the picture.
    for _ in 0..50 {
        anim.frame(&mut engine, DOTS_MOVING, 3.0)?;
    }
    let knn = engine.query_knn_at(0, 5)?.clone();

    let filename = "singles.svg";
    let root = SVGBackend::new(filename, (600, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(viewport.min_x..viewport.max_x, viewport.min_y..viewport.max_y)?;

    // Draw grid
    let layout = *engine.layout();
    for x in 0..=layout.grid_width {
        let [gx, _] = layout.cell_origin(Cell::new(x, 0));
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(gx, viewport.min_y), (gx, viewport.max_y)],
            BLACK.mix(0.15),
        )))?;
    }
    for y in 0..=layout.grid_height {
        let [_, gy] = layout.cell_origin(Cell::new(0, y));
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(viewport.min_x, gy), (viewport.max_x, gy)],
            BLACK.mix(0.15),
        )))?;
    }

    // Draw k-NN of the first dot
    let origin = (knn.origin().x(), knn.origin().y());
    chart.draw_series(knn.neighbors().iter().map(|n| {
        let p = &engine.points()[n.index];
        PathElement::new(vec![origin, (p.x(), p.y())], GREEN.mix(0.6))
    }))?;

    // Draw dots and singles
    chart.draw_series(engine.points().iter().map(|p| Circle::new((p.x(), p.y()), 2, BLUE.filled())))?;
    chart.draw_series(engine.singles().indices().iter().map(|&i| {
        let p = &engine.points()[i];
        Circle::new((p.x(), p.y()), 6, RED.stroke_width(2))
    }))?;

    root.present()?;
    println!(
        "Singles: {} of {} dots (max distance {}, grid {}x{}); output saved to {}",
        engine.singles().len(),
        engine.len(),
        engine.max_distance(),
        engine.grid_width(),
        engine.grid_height(),
        filename
    );
    Ok(())
}
