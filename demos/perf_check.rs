use singledetect::{
    random_points, Animation, DetectionEngine, DetectorConfig, PointIdAllocator, StrategyKind,
    Viewport,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("singledetect=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Large viewport with many dots to stress the grid strategy
    let viewport = Viewport::new(0.0, 0.0, 10_000.0, 10_000.0);
    let config = DetectorConfig::new(viewport, 45.0).with_strategy(StrategyKind::Grid);

    let mut anim = Animation::new(1);
    let points = random_points(100_000, &viewport, &mut PointIdAllocator::new(), anim.rng());
    let mut engine = DetectionEngine::from_config(points, &config)?;

    // Run the frame loop (this is the hot path)
    let mut total_ms = 0.0;
    for _ in 0..100 {
        total_ms += anim.frame(&mut engine, 1_000, 10.0)?;
    }
    println!(
        "{} singles, {:.3} ms per refresh",
        engine.singles().len(),
        total_ms / 100.0
    );
    Ok(())
}
