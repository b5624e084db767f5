//! Headless demo walking a player across a small level

use std::time::Duration;

use tilekit::prelude::*;

const DEMO_LEVEL: &str = r#"(
    name: "demo",
    tile_size: [16.0, 16.0],
    tiles: [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    solid: [1, 2],
    spawn: Some([24.0, 40.0]),
)"#;

const DEMO_FRAMES: u32 = 120;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let level = match std::env::args().nth(1) {
        Some(path) if path.ends_with(".json") => Level::load_json(&path)?,
        Some(path) => Level::load_ron(&path)?,
        None => Level::from_ron_str(DEMO_LEVEL)?,
    };

    let config = StageConfig::default().with_camera_size(96.0, 64.0);
    let mut stage = Stage::from_level(&level, config)?;
    let mut sprite = Sprite::new(
        [("idle", vec![1, 2]), ("walk", vec![3, 4, 5, 6])],
        4,
        Sprite::DEFAULT_DELAY,
    )?;
    let mut clock = Clock::new();

    for frame in 0..DEMO_FRAMES {
        let dt = clock.tick_with(Duration::from_millis(16));
        // Walk right, then down, then back left
        let heading = match frame / 40 {
            0 => Vector2::new(1.0, 0.0),
            1 => Vector2::new(0.0, 1.0),
            _ => Vector2::new(-1.0, 0.0),
        };
        let velocity = heading.scale(90.0 * dt);

        let report = stage.tick(velocity, |_, _| {})?;
        let moving = report.sweep.x.delta() != 0.0 || report.sweep.y.delta() != 0.0;
        sprite.set_frame(if moving { "walk" } else { "idle" })?;
        let source = sprite.get_source();

        if frame % 20 == 0 {
            log::info!(
                "Frame {frame}: player ({:.1}, {:.1}), view {:?}..{:?}, {} tiles, sprite {:?}",
                stage.player.pos.x,
                stage.player.pos.y,
                report.view.min,
                report.view.max,
                report.rendered,
                source
            );
        }
    }

    log::info!(
        "Ran {} frames over {:.2}s",
        clock.frame_count(),
        clock.elapsed().as_secs_f32()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Demo error: {e}");
        std::process::exit(1);
    }
}
