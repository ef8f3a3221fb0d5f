//! # ISORASTER Demo
//!
//! Renders one view of the demo island through the full host (actor thread,
//! ticker, cache) and writes the canvas to a PNG image.
//!
//! ```bash
//! # Defaults: in-memory cache, 128x128 canvas, writes out.png
//! RUST_LOG=info ./isoraster_demo
//!
//! # With a host config and an output path
//! ./isoraster_demo host.toml view.png
//! ```

use isoraster::export::write_png;
use isoraster::rendering::PanDirection;
use isoraster::shared::{BlockPos, SessionId, WorldId};
use isoraster::{DemoWorld, DisplayHandle, DisplayHost, HostConfig, HostResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const WORLD: WorldId = WorldId(1);
const SEED: u64 = 0x1505_1a57;
const ISLAND_SIZE: u32 = 192;
const RENDER_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_SCALE: u32 = 4;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("isoraster_demo: {e}");
        std::process::exit(1);
    }
}

fn run() -> HostResult<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => HostConfig::load(path)?,
        None => {
            let mut config = HostConfig::default();
            config.render.enable_light = true;
            config
        }
    };
    let output = args.next().unwrap_or_else(|| "out.png".to_string());

    let world = Arc::new(DemoWorld::generate(WORLD, SEED, ISLAND_SIZE));
    let mut host = DisplayHost::new(config, world.clone(), Some(world.clone()))?;

    let center = world.height_at(0, 0).unwrap_or(world.sea_level());
    let display = host.attach(SessionId(1), WORLD, BlockPos::new(0, center, 0))?;
    host.start_ticker()?;

    let started = Instant::now();
    wait_until_idle(&display, started)?;
    tracing::info!("First view finished in {:?}", started.elapsed());

    // Dig a pit in the middle of the view and pan once, to exercise repair.
    for (x, z) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        if let Some(pos) = world.dig(x, z) {
            host.broadcast_block_change(WORLD, pos);
        }
    }
    display.pan(PanDirection::Right)?;
    wait_until_idle(&display, Instant::now())?;

    let status = display.status()?;
    tracing::info!(
        "Rendered {} at {}: {} render ticks, {} tiles composited, worst tick {}us",
        status.session,
        status.properties.anchor,
        status.stats.render_ticks,
        status.stats.tiles_composited,
        status.stats.worst_tick_us
    );

    let snapshot = display.capture()?;
    write_png(&output, &snapshot, IMAGE_SCALE)?;
    println!("Wrote {}x{} canvas to {}", snapshot.width, snapshot.height, output);

    host.shutdown();
    Ok(())
}

fn wait_until_idle(display: &DisplayHandle, started: Instant) -> HostResult<()> {
    while started.elapsed() < RENDER_TIMEOUT {
        if display.status()?.idle {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    tracing::warn!("Render still running after {:?}, writing what there is", RENDER_TIMEOUT);
    Ok(())
}
