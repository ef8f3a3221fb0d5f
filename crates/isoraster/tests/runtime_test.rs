//! Host runtime: actors, registry fan-out and persistence on detach.

use isoraster::cache::MemoryCache;
use isoraster::rendering::{DisplayServices, PanDirection, RenderConfig};
use isoraster::shared::{BlockPos, SessionId, WorldId};
use isoraster::{DemoWorld, DisplayHandle, DisplayHost, HostConfig, HostError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WORLD: WorldId = WorldId(1);
const OTHER_WORLD: WorldId = WorldId(2);

fn config() -> HostConfig {
    HostConfig {
        render: RenderConfig {
            canvas_width: 64,
            canvas_height: 64,
            world_max_y: 32,
            ..RenderConfig::default()
        },
        tick_interval_ms: 5,
        ..HostConfig::default()
    }
}

fn host() -> (DisplayHost, Arc<DemoWorld>, Arc<MemoryCache>) {
    let world = Arc::new(DemoWorld::generate(WORLD, 11, 64));
    let cache = Arc::new(MemoryCache::new());
    let services = DisplayServices {
        sprites: world.clone(),
        light: Some(world.clone()),
        canvases: cache.clone(),
        properties: cache.clone(),
    };
    let host = DisplayHost::with_services(config(), services).unwrap();
    (host, world, cache)
}

fn surface(world: &DemoWorld) -> BlockPos {
    BlockPos::new(0, world.height_at(0, 0).unwrap(), 0)
}

/// Ticks by hand until the display reports idle.
fn tick_until_idle(host: &DisplayHost, display: &DisplayHandle) {
    for _ in 0..10_000 {
        host.tick_all();
        // Status is answered after every tick queued before it.
        if display.status().unwrap().idle {
            return;
        }
    }
    panic!("display never went idle");
}

#[test]
fn test_attach_and_render() {
    let (host, world, cache) = host();
    let display = host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    assert!(display.is_running());
    assert_eq!(display.world(), WORLD);
    assert_eq!(host.registry().len(), 1);

    tick_until_idle(&host, &display);
    let status = display.status().unwrap();
    assert!(status.properties.finished_rendering);
    assert!(status.stats.tiles_composited > 0);
    assert!(cache.has_canvas(SessionId(1)));
}

#[test]
fn test_double_attach_rejected() {
    let (host, world, _) = host();
    host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    let again = host.attach(SessionId(1), WORLD, surface(&world));
    assert!(matches!(again, Err(HostError::AlreadyAttached(SessionId(1)))));
}

#[test]
fn test_block_changes_reach_matching_world_only() {
    let (host, world, _) = host();
    host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    host.attach(SessionId(2), WORLD, surface(&world)).unwrap();
    host.attach(SessionId(3), OTHER_WORLD, surface(&world)).unwrap();

    assert_eq!(host.registry().displays_for_world(WORLD).len(), 2);
    assert_eq!(host.broadcast_block_change(WORLD, surface(&world)), 2);
    assert_eq!(host.broadcast_block_change(OTHER_WORLD, surface(&world)), 1);
    assert_eq!(host.broadcast_block_change(WorldId(9), surface(&world)), 0);
}

#[test]
fn test_dug_block_is_repaired() {
    let (host, world, _) = host();
    let display = host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    tick_until_idle(&host, &display);
    let before = display.status().unwrap().stats.dirty_tiles_processed;

    let dug = world.dig(0, 0).unwrap();
    assert_eq!(host.broadcast_block_change(WORLD, dug), 1);
    tick_until_idle(&host, &display);

    let status = display.status().unwrap();
    assert!(status.stats.dirty_tiles_processed > before);
    assert!(status.properties.finished_rendering);
}

#[test]
fn test_query_hits_terrain() {
    let (host, world, _) = host();
    let display = host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    tick_until_idle(&host, &display);

    let hit = display.query(32, 32).unwrap().expect("terrain under the centre");
    assert!(world.material_at(hit).is_some());
    assert_eq!(display.query(-1, 0).unwrap(), None);
}

#[test]
fn test_pan_restarts_render() {
    let (host, world, _) = host();
    let display = host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    tick_until_idle(&host, &display);

    display.pan(PanDirection::Up).unwrap();
    let status = display.status().unwrap();
    assert!(!status.idle);
    assert!(!status.properties.finished_rendering);
    assert_ne!(status.properties.anchor, surface(&world));

    tick_until_idle(&host, &display);
    assert!(display.status().unwrap().properties.finished_rendering);
}

#[test]
fn test_detach_persists_and_stops() {
    let (host, world, cache) = host();
    let display = host.attach(SessionId(5), WORLD, surface(&world)).unwrap();
    assert!(cache.properties(SessionId(5)).is_some());
    assert!(!cache.has_canvas(SessionId(5)));

    assert!(host.detach(SessionId(5)));
    assert!(!display.is_running());
    assert!(cache.has_canvas(SessionId(5)));
    assert!(host.registry().is_empty());
    assert!(matches!(display.status(), Err(HostError::Disconnected(SessionId(5)))));
    assert!(!host.detach(SessionId(5)));
}

#[test]
fn test_ticker_drives_displays() {
    let (mut host, world, _) = host();
    let display = host.attach(SessionId(1), WORLD, surface(&world)).unwrap();
    host.start_ticker().unwrap();
    assert!(host.is_ticking());

    let started = Instant::now();
    while !display.status().unwrap().idle {
        assert!(started.elapsed() < Duration::from_secs(30), "ticker never finished the render");
        std::thread::sleep(Duration::from_millis(5));
    }

    host.stop_ticker();
    assert!(!host.is_ticking());
    host.shutdown();
    assert!(!display.is_running());
}
