//! Test worlds and stores shared by the integration tests.

#![allow(dead_code)]

use isoraster_cache::{CacheError, CacheResult, CanvasCache, CanvasSnapshot, MemoryCache, PropertyStore};
use isoraster_rendering::{DisplayServices, LightSampler, RenderConfig, Sprite, SpriteSource};
use isoraster_shared::{BlockPos, Facing, Rgba, SessionId, ViewportProperties, WorldId, ZoomLevel};
use parking_lot::RwLock;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Everything at or below `ground` is stone, everything above is air, except
/// for blocks listed in `removed`.
pub struct FlatWorld {
    pub ground: i32,
    removed: RwLock<HashSet<BlockPos>>,
    stone: [Sprite; 4],
}

impl FlatWorld {
    pub fn new(ground: i32) -> Self {
        let stone = ZoomLevel::ALL.map(|zoom| {
            let mut sprite = Sprite::for_zoom(zoom);
            let (w, h) = (sprite.width(), sprite.height());
            for y in 0..h {
                for x in 0..w {
                    sprite.set(x, y, Rgba::opaque(90 + (y * 7 % 60) as u8, 90, 100));
                }
            }
            sprite
        });
        Self {
            ground,
            removed: RwLock::new(HashSet::new()),
            stone,
        }
    }

    pub fn remove(&self, pos: BlockPos) {
        self.removed.write().insert(pos);
    }
}

impl SpriteSource for FlatWorld {
    fn sprite(&self, _: WorldId, pos: BlockPos, _: Facing, zoom: ZoomLevel) -> Option<&Sprite> {
        if pos.y > self.ground || self.removed.read().contains(&pos) {
            None
        } else {
            Some(&self.stone[zoom.index()])
        }
    }
}

impl LightSampler for FlatWorld {
    fn skylight_at(&self, _: WorldId, pos: BlockPos) -> u8 {
        if pos.y > self.ground { 15 } else { 0 }
    }
}

/// Half the side of the square of columns a `CaveWorld` fills.
pub const CAVE_RADIUS: i32 = 32;
const CAVE_PALETTE: usize = 6;

/// Seeded rough terrain: uneven ground riddled with holes, with floating
/// blocks above it. Every block colour depends on its position, so two
/// renders only agree when the same block wins every pixel.
pub struct CaveWorld {
    solid: RwLock<HashSet<BlockPos>>,
    palette: [[Sprite; CAVE_PALETTE]; 4],
}

impl CaveWorld {
    pub fn generate(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut solid = HashSet::new();
        for x in -CAVE_RADIUS..CAVE_RADIUS {
            for z in -CAVE_RADIUS..CAVE_RADIUS {
                let ground = rng.gen_range(2..10);
                for y in 0..=ground {
                    if y == 0 || rng.gen_range(0..5) != 0 {
                        solid.insert(BlockPos::new(x, y, z));
                    }
                }
                if rng.gen_range(0..3) == 0 {
                    let base = ground + rng.gen_range(2..5);
                    for y in base..base + rng.gen_range(1..3) {
                        solid.insert(BlockPos::new(x, y, z));
                    }
                }
            }
        }
        Self {
            solid: RwLock::new(solid),
            palette: ZoomLevel::ALL.map(|zoom| std::array::from_fn(|shade| cave_sprite(zoom, shade))),
        }
    }

    /// Flips `pos` between solid and air. Returns true if it is now solid.
    pub fn toggle(&self, pos: BlockPos) -> bool {
        let mut solid = self.solid.write();
        if solid.remove(&pos) {
            false
        } else {
            solid.insert(pos);
            true
        }
    }

    /// A position near the origin, within the generated terrain's height.
    pub fn random_position(rng: &mut ChaCha8Rng) -> BlockPos {
        BlockPos::new(rng.gen_range(-8..8), rng.gen_range(0..14), rng.gen_range(-8..8))
    }
}

impl SpriteSource for CaveWorld {
    fn sprite(&self, _: WorldId, pos: BlockPos, _: Facing, zoom: ZoomLevel) -> Option<&Sprite> {
        if !self.solid.read().contains(&pos) {
            return None;
        }
        let shade = (pos.x.wrapping_mul(7) ^ pos.y.wrapping_mul(13) ^ pos.z.wrapping_mul(5)).rem_euclid(CAVE_PALETTE as i32);
        Some(&self.palette[zoom.index()][shade as usize])
    }
}

/// Row-graded sprite; the last shade is glass, see-through in its top third.
fn cave_sprite(zoom: ZoomLevel, shade: usize) -> Sprite {
    let mut sprite = Sprite::for_zoom(zoom);
    let (w, h) = (sprite.width(), sprite.height());
    let base = 40 * shade as u32;
    for y in 0..h {
        if shade == CAVE_PALETTE - 1 && y < h / 3 {
            continue;
        }
        for x in 0..w {
            sprite.set(x, y, Rgba::opaque((base % 256) as u8, (y * 11 % 256) as u8, (x * 5 % 256) as u8));
        }
    }
    sprite
}

/// A store that remembers a finished render but whose canvas reads fail.
pub struct BrokenCache;

impl CanvasCache for BrokenCache {
    fn load_canvas(&self, _: SessionId) -> CacheResult<Option<CanvasSnapshot>> {
        Err(CacheError::BadMagic)
    }

    fn save_canvas(&self, _: SessionId, _: &CanvasSnapshot) -> CacheResult<()> {
        Ok(())
    }
}

impl PropertyStore for BrokenCache {
    fn load_properties(&self, _: SessionId) -> CacheResult<Option<ViewportProperties>> {
        let mut properties =
            ViewportProperties::anchored(WorldId(1), BlockPos::new(0, 10, 0), Facing::NorthEast, ZoomLevel::Default);
        properties.finished_rendering = true;
        Ok(Some(properties))
    }

    fn save_properties(&self, _: SessionId, _: &ViewportProperties) -> CacheResult<()> {
        Ok(())
    }
}

pub fn services(world: &Arc<FlatWorld>, cache: &Arc<MemoryCache>) -> DisplayServices {
    DisplayServices {
        sprites: world.clone(),
        light: Some(world.clone()),
        canvases: cache.clone(),
        properties: cache.clone(),
    }
}

pub fn cave_services(world: &Arc<CaveWorld>, cache: &Arc<MemoryCache>) -> DisplayServices {
    DisplayServices {
        sprites: world.clone(),
        light: None,
        canvases: cache.clone(),
        properties: cache.clone(),
    }
}

/// 8x8 canvas in a 7-block-tall world: layers -5..=5 for an anchor at y 3.
pub fn tiny_config() -> RenderConfig {
    RenderConfig {
        canvas_width: 8,
        canvas_height: 8,
        world_min_y: 0,
        world_max_y: 7,
        ..RenderConfig::default()
    }
}

/// 48x48 canvas over a 24-block-tall world, seen through `facing`.
pub fn cave_config(facing: Facing) -> RenderConfig {
    RenderConfig {
        canvas_width: 48,
        canvas_height: 48,
        world_min_y: 0,
        world_max_y: 24,
        default_facing: facing,
        ..RenderConfig::default()
    }
}

pub fn small_config() -> RenderConfig {
    RenderConfig {
        canvas_width: 64,
        canvas_height: 64,
        world_min_y: 0,
        world_max_y: 32,
        ..RenderConfig::default()
    }
}
