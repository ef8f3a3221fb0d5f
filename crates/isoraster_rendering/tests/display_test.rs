//! End-to-end behaviour of a display driven tick by tick.

mod common;

use common::{cave_config, cave_services, services, small_config, tiny_config, BrokenCache, CaveWorld, FlatWorld};
use isoraster_cache::MemoryCache;
use isoraster_rendering::{DepthCanvas, DisplayServices, IsoDisplay, PanDirection};
use isoraster_shared::{BlockPos, Facing, SessionId, WorldId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;

const FOREVER: Duration = Duration::from_secs(3600);
const WORLD: WorldId = WorldId(1);

fn attached(config: isoraster_rendering::RenderConfig, world: &Arc<FlatWorld>, cache: &Arc<MemoryCache>, anchor: BlockPos) -> IsoDisplay {
    let mut display = IsoDisplay::new(SessionId(42), config, services(world, cache)).unwrap();
    display.on_attach(WORLD, anchor);
    display
}

const DIRECTIONS: [PanDirection; 4] = [PanDirection::Up, PanDirection::Right, PanDirection::Down, PanDirection::Left];
const CAVE_ANCHOR: BlockPos = BlockPos::new(0, 8, 0);

fn attached_cave(facing: Facing, world: &Arc<CaveWorld>, anchor: BlockPos) -> IsoDisplay {
    let cache = Arc::new(MemoryCache::new());
    let mut display = IsoDisplay::new(SessionId(42), cave_config(facing), cave_services(world, &cache)).unwrap();
    display.on_attach(WORLD, anchor);
    display
}

/// Renders the same view from nothing and compares it pixel for pixel.
fn assert_matches_fresh_render(display: &IsoDisplay, world: &Arc<CaveWorld>, context: &str) {
    let properties = display.properties();
    let mut fresh = attached_cave(properties.facing, world, properties.anchor);
    render_to_completion(&mut fresh);

    let (actual, expected) = (display.canvas(), fresh.canvas());
    let wrong = (0..actual.depths().len())
        .filter(|&i| actual.depths()[i] != expected.depths()[i] || actual.colors()[i] != expected.colors()[i])
        .count();
    assert_eq!(wrong, 0, "{context}: {wrong} pixels differ from a fresh render");
}

fn render_to_completion(display: &mut IsoDisplay) {
    for _ in 0..10_000 {
        if display.scheduler().is_idle() {
            return;
        }
        display.tick_with_budget(FOREVER);
    }
    panic!("render never finished");
}

#[test]
fn test_opaque_world_finishes_within_one_tick_per_layer() {
    let world = Arc::new(FlatWorld::new(6));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(tiny_config(), &world, &cache, BlockPos::new(0, 3, 0));

    let bounds = *display.scheduler().bounds();
    assert_eq!((bounds.min_render_z, bounds.max_render_z), (-5, 5));

    let mut ticks = 0;
    while !display.properties().finished_rendering {
        display.tick_with_budget(Duration::ZERO);
        ticks += 1;
        assert!(ticks <= 11, "still rendering after {ticks} ticks");
    }
    assert_eq!(cache.canvas_saves(), 1);
    assert!(cache.properties(SessionId(42)).unwrap().finished_rendering);

    for _ in 0..5 {
        display.tick_with_budget(Duration::ZERO);
    }
    assert_eq!(cache.canvas_saves(), 1);
}

#[test]
fn test_attach_bootstraps_and_persists_properties() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let display = attached(small_config(), &world, &cache, BlockPos::new(5, 10, -5));

    let stored = cache.properties(SessionId(42)).unwrap();
    assert_eq!(stored.anchor, BlockPos::new(5, 10, -5));
    assert_eq!(stored.world, WORLD);
    assert!(display.is_rendering_world(WORLD));
    assert!(!display.is_rendering_world(WorldId(2)));
    assert_eq!(display.scheduler().current_render_z(), display.scheduler().bounds().min_render_z);
}

#[test]
fn test_change_outside_view_leaves_dirty_set_empty() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));

    assert!(!display.on_world_position_changed(WORLD, BlockPos::new(10_000, 10, 10_000)));
    assert!(!display.on_world_position_changed(WorldId(7), BlockPos::new(0, 10, 0)));
    assert!(display.invalidation().is_empty());

    assert!(display.on_world_position_changed(WORLD, BlockPos::new(0, 10, 0)));
    assert!(display.on_world_position_changed(WORLD, BlockPos::new(0, 10, 0)));
    assert_eq!(display.invalidation().len(), 1);
}

#[test]
fn test_zoom_there_and_back_restores_grid_size() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    let original = display.scheduler().resolved_len();
    assert_eq!(original, display.scheduler().bounds().len());

    assert!(display.on_zoom_requested(1));
    assert_ne!(display.scheduler().resolved_len(), original);
    assert!(display.on_zoom_requested(-1));
    assert_eq!(display.scheduler().resolved_len(), original);
    assert_eq!(display.scheduler().resolved_count(), 0);
}

#[test]
fn test_horizontal_pan_moves_pixels_and_flags() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut display);

    let before = display.canvas().clone();
    let scheduler_before = display.scheduler().clone();
    assert!(display.on_pan_requested(PanDirection::Left));

    let cw = display.viewport().zoom().column_width();
    let dx = 2 * cw;
    let (w, h) = (64, 64);
    for y in 0..h {
        for x in 0..w {
            let expected_depth = if x >= dx { before.depth_at(x - dx, y) } else { Some(DepthCanvas::VOID_DEPTH) };
            assert_eq!(display.canvas().depth_at(x, y), expected_depth, "{x},{y}");
            if x >= dx {
                assert_eq!(display.canvas().color_at(x, y), before.color_at(x - dx, y));
            }
        }
    }

    let bounds = *display.scheduler().bounds();
    let projection = display.viewport().projection();
    // Tiles that were drawn fully inside the left edge keep their flag.
    for ty in bounds.min_rows..=bounds.max_rows {
        for tx in bounds.min_cols..=bounds.max_cols - 2 {
            if projection.draw_x(tx) >= 0 && scheduler_before.is_resolved(tx, ty) {
                assert!(display.scheduler().is_resolved(tx + 2, ty), "{tx},{ty}");
            }
        }
    }
    assert!(!display.properties().finished_rendering);
}

#[test]
fn test_vertical_pan_shifts_depths() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut display);

    let before = display.canvas().clone();
    assert!(display.on_pan_requested(PanDirection::Up));
    let dy = 2 * display.viewport().zoom().row_height();

    for y in dy..64 {
        for x in 0..64 {
            let old = before.depth_at(x, y - dy).unwrap();
            let new = display.canvas().depth_at(x, y).unwrap();
            if old == DepthCanvas::VOID_DEPTH {
                assert_eq!(new, DepthCanvas::VOID_DEPTH);
            } else {
                assert_eq!(i32::from(new), i32::from(old) - 2, "{x},{y}");
            }
        }
    }
}

#[test]
fn test_pan_then_render_matches_fresh_render() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut panned = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut panned);
    assert!(panned.on_pan_requested(PanDirection::Right));
    render_to_completion(&mut panned);

    let fresh_cache = Arc::new(MemoryCache::new());
    let mut fresh = attached(small_config(), &world, &fresh_cache, panned.properties().anchor);
    render_to_completion(&mut fresh);

    assert_eq!(panned.canvas().depths(), fresh.canvas().depths());
    assert_eq!(panned.canvas().colors(), fresh.canvas().colors());
}

#[test]
fn test_pans_over_rough_terrain_match_fresh_render() {
    let world = Arc::new(CaveWorld::generate(7));
    for facing in Facing::ALL {
        for (i, direction) in DIRECTIONS.into_iter().enumerate() {
            let mut display = attached_cave(facing, &world, CAVE_ANCHOR);
            render_to_completion(&mut display);

            assert!(display.on_pan_requested(direction));
            display.tick_with_budget(Duration::ZERO);
            assert!(display.on_pan_requested(direction));
            assert!(display.on_pan_requested(DIRECTIONS[(i + 1) % 4]));
            render_to_completion(&mut display);

            assert_matches_fresh_render(&display, &world, &format!("{facing} pan {direction}"));
        }
    }
}

#[test]
fn test_block_changes_in_rough_terrain_match_fresh_render() {
    for (seed, facing) in Facing::ALL.into_iter().enumerate() {
        let world = Arc::new(CaveWorld::generate(seed as u64 + 100));
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        let mut display = attached_cave(facing, &world, CAVE_ANCHOR);
        render_to_completion(&mut display);

        for round in 0..5 {
            for _ in 0..rng.gen_range(1..=3) {
                let pos = CaveWorld::random_position(&mut rng);
                world.toggle(pos);
                display.on_world_position_changed(WORLD, pos);
            }
            // A second batch lands while the first is still being repaired.
            display.tick_with_budget(Duration::ZERO);
            for _ in 0..rng.gen_range(0..=2) {
                let pos = CaveWorld::random_position(&mut rng);
                world.toggle(pos);
                display.on_world_position_changed(WORLD, pos);
            }
            display.tick_with_budget(FOREVER);
            render_to_completion(&mut display);

            assert_matches_fresh_render(&display, &world, &format!("{facing} seed {seed} round {round}"));
        }
    }
}

#[test]
fn test_removed_block_is_repaired() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut display);

    let pos = BlockPos::new(0, 10, 0);
    world.remove(pos);
    assert!(display.on_world_position_changed(WORLD, pos));
    display.tick_with_budget(FOREVER);
    render_to_completion(&mut display);

    let fresh_cache = Arc::new(MemoryCache::new());
    let mut fresh = attached(small_config(), &world, &fresh_cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut fresh);
    assert_eq!(display.canvas().depths(), fresh.canvas().depths());
    assert_eq!(display.canvas().colors(), fresh.canvas().colors());
}

#[test]
fn test_hit_testing() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    assert!(display.tile_at_pixel(32, 32).is_none());

    render_to_completion(&mut display);
    assert_eq!(display.block_at_pixel(32, 32), Some(BlockPos::new(0, 10, 0)));
    assert!(display.tile_at_pixel(-1, 0).is_none());
}

#[test]
fn test_finished_snapshot_resumes_idle() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut first = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut first);
    first.on_detach();
    let saves = cache.canvas_saves();

    let mut second = attached(small_config(), &world, &cache, BlockPos::new(99, 99, 99));
    assert_eq!(second.properties().anchor, BlockPos::new(0, 10, 0));
    assert_eq!(second.scheduler().current_render_z(), second.scheduler().bounds().max_render_z);
    assert_eq!(second.canvas().colors(), first.canvas().colors());

    second.tick_with_budget(Duration::ZERO);
    assert!(second.scheduler().is_idle());
    assert_eq!(cache.canvas_saves(), saves);
}

#[test]
fn test_unreadable_cache_falls_back_to_full_render() {
    let world = Arc::new(FlatWorld::new(10));
    let broken = Arc::new(BrokenCache);
    let services = DisplayServices {
        sprites: world.clone(),
        light: None,
        canvases: broken.clone(),
        properties: broken,
    };
    let mut display = IsoDisplay::new(SessionId(1), small_config(), services).unwrap();
    display.on_attach(WORLD, BlockPos::new(0, 10, 0));
    assert!(!display.properties().finished_rendering);
    assert_eq!(display.scheduler().current_render_z(), display.scheduler().bounds().min_render_z);
    render_to_completion(&mut display);
    assert!(display.properties().finished_rendering);
}

#[test]
fn test_controls_reset_the_render() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut display);

    assert!(!display.on_rotate_requested(4));
    assert!(display.on_rotate_requested(1));
    assert!(!display.properties().finished_rendering);
    assert_eq!(display.scheduler().current_render_z(), display.scheduler().bounds().min_render_z);
    assert!(!display.canvas().depths().iter().any(|&d| d != DepthCanvas::VOID_DEPTH));

    render_to_completion(&mut display);
    assert!(display.set_lighting_enabled(true));
    assert!(!display.set_lighting_enabled(true));
    assert_eq!(display.stats().render_ticks, 0);
    render_to_completion(&mut display);

    display.on_reset_requested();
    assert_eq!(display.scheduler().resolved_count(), 0);
}

#[test]
fn test_detached_display_ignores_input() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = IsoDisplay::new(SessionId(5), small_config(), services(&world, &cache)).unwrap();
    assert_eq!(display.tick_with_budget(FOREVER).layers, 0);
    assert!(!display.on_world_position_changed(WORLD, BlockPos::new(0, 0, 0)));
    assert!(!display.on_pan_requested(PanDirection::Right));
    assert!(!display.on_zoom_requested(1));
    assert!(!display.on_rotate_requested(1));
    assert!(!display.on_reset_requested());
    assert!(!display.set_lighting_enabled(true));
    assert_eq!(display.viewport().anchor(), BlockPos::new(0, 0, 0));
    assert!(cache.properties(SessionId(5)).is_none());
    display.on_detach();
    assert_eq!(cache.canvas_saves(), 0);
}

#[test]
fn test_input_after_detach_is_ignored() {
    let world = Arc::new(FlatWorld::new(10));
    let cache = Arc::new(MemoryCache::new());
    let mut display = attached(small_config(), &world, &cache, BlockPos::new(0, 10, 0));
    render_to_completion(&mut display);
    display.on_detach();
    let stored = cache.properties(SessionId(42)).unwrap();

    assert!(!display.on_pan_requested(PanDirection::Up));
    assert!(!display.on_zoom_requested(-1));
    assert!(!display.on_rotate_requested(2));
    assert!(!display.on_reset_requested());
    assert!(!display.set_lighting_enabled(true));
    assert_eq!(cache.properties(SessionId(42)).unwrap(), stored);
    assert_eq!(display.viewport().anchor(), BlockPos::new(0, 10, 0));
}
