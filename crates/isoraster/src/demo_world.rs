//! # Demo World
//!
//! A small square island of rolling terrain, generated from a seed. Used by
//! the demo binary and the host tests as a stand-in for a real world.
//!
//! ## Generation
//!
//! A coarse lattice of random heights every `CELL` blocks, bilinearly
//! interpolated. Columns at or below `sea_level` are flooded. Same seed,
//! same island.

use isoraster_rendering::{LightSampler, Sprite, SpriteSource};
use isoraster_shared::{BlockPos, Facing, Rgba, WorldId, ZoomLevel, MAX_SKYLIGHT};
use parking_lot::RwLock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Spacing of the random height lattice, in blocks.
const CELL: usize = 8;

/// Lowest terrain surface.
const BASE_HEIGHT: f32 = 8.0;

/// Surface height range above `BASE_HEIGHT`.
const AMPLITUDE: f32 = 16.0;

/// Blocks of dirt between grass and stone.
const DIRT_DEPTH: i32 = 3;

/// What a block is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// Top of dry land.
    Grass,
    /// Under the grass.
    Dirt,
    /// Everything deeper.
    Stone,
    /// Top of land at the waterline.
    Sand,
    /// Flooded columns up to sea level.
    Water,
}

impl Material {
    /// All materials, in sprite table order.
    pub const ALL: [Self; 5] = [Self::Grass, Self::Dirt, Self::Stone, Self::Sand, Self::Water];

    /// Position in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Colour of the lit top face.
    #[must_use]
    pub const fn base_color(self) -> Rgba {
        match self {
            Self::Grass => Rgba::opaque(92, 156, 60),
            Self::Dirt => Rgba::opaque(134, 96, 67),
            Self::Stone => Rgba::opaque(125, 125, 125),
            Self::Sand => Rgba::opaque(219, 207, 163),
            Self::Water => Rgba::opaque(48, 88, 200),
        }
    }
}

/// Seeded heightmap world with cube sprites.
pub struct DemoWorld {
    world: WorldId,
    size: usize,
    sea_level: i32,
    heights: RwLock<Vec<i32>>,
    sprites: [[Sprite; 4]; 5],
}

impl DemoWorld {
    /// Generates a `size` x `size` island centred on the origin.
    #[must_use]
    pub fn generate(world: WorldId, seed: u64, size: u32) -> Self {
        let size = (size as usize).max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let lattice = size / CELL + 2;
        let corners: Vec<f32> = (0..lattice * lattice).map(|_| rng.gen::<f32>()).collect();
        let mut heights = Vec::with_capacity(size * size);
        for z in 0..size {
            for x in 0..size {
                let (cx, fx) = (x / CELL, (x % CELL) as f32 / CELL as f32);
                let (cz, fz) = (z / CELL, (z % CELL) as f32 / CELL as f32);
                let at = |ix: usize, iz: usize| corners[iz * lattice + ix];
                let north = at(cx, cz) * (1.0 - fx) + at(cx + 1, cz) * fx;
                let south = at(cx, cz + 1) * (1.0 - fx) + at(cx + 1, cz + 1) * fx;
                let v = north * (1.0 - fz) + south * fz;
                heights.push((BASE_HEIGHT + v * AMPLITUDE).round() as i32);
            }
        }

        let sprites = Material::ALL.map(|material| ZoomLevel::ALL.map(|zoom| cube_sprite(material, zoom)));
        tracing::info!("Demo world {}: {}x{} blocks from seed {}", world, size, size, seed);

        Self {
            world,
            size,
            sea_level: (BASE_HEIGHT + AMPLITUDE * 0.4) as i32,
            heights: RwLock::new(heights),
            sprites,
        }
    }

    /// The world this terrain belongs to.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Water surface height.
    #[must_use]
    pub const fn sea_level(&self) -> i32 {
        self.sea_level
    }

    fn column(&self, x: i32, z: i32) -> Option<usize> {
        let half = (self.size / 2) as i64;
        let (x, z) = (i64::from(x) + half, i64::from(z) + half);
        let size = self.size as i64;
        ((0..size).contains(&x) && (0..size).contains(&z)).then(|| (z * size + x) as usize)
    }

    /// Topmost solid block in column `(x, z)`, or `None` off the island.
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> Option<i32> {
        let column = self.column(x, z)?;
        self.heights.read().get(column).copied()
    }

    /// Material of the block at `pos`, or `None` for air.
    #[must_use]
    pub fn material_at(&self, pos: BlockPos) -> Option<Material> {
        let height = self.height_at(pos.x, pos.z)?;
        if pos.y < 0 {
            return None;
        }
        if pos.y > height {
            return (pos.y <= self.sea_level).then_some(Material::Water);
        }
        Some(if pos.y == height {
            if height <= self.sea_level + 1 { Material::Sand } else { Material::Grass }
        } else if pos.y > height - DIRT_DEPTH {
            Material::Dirt
        } else {
            Material::Stone
        })
    }

    /// Removes the top block of column `(x, z)` and returns where it was.
    /// `None` off the island or at bedrock.
    pub fn dig(&self, x: i32, z: i32) -> Option<BlockPos> {
        let column = self.column(x, z)?;
        let mut heights = self.heights.write();
        let height = heights.get_mut(column)?;
        if *height < 0 {
            return None;
        }
        let removed = BlockPos::new(x, *height, z);
        *height -= 1;
        Some(removed)
    }
}

impl SpriteSource for DemoWorld {
    fn sprite(&self, world: WorldId, pos: BlockPos, _: Facing, zoom: ZoomLevel) -> Option<&Sprite> {
        if world != self.world {
            return None;
        }
        let material = self.material_at(pos)?;
        Some(&self.sprites[material.index()][zoom.index()])
    }
}

impl LightSampler for DemoWorld {
    fn skylight_at(&self, world: WorldId, pos: BlockPos) -> u8 {
        if world != self.world {
            return MAX_SKYLIGHT;
        }
        match self.material_at(pos) {
            None => MAX_SKYLIGHT,
            // Light fades two levels per block of water above.
            Some(Material::Water) => {
                let depth = (self.sea_level - pos.y).clamp(0, i32::from(MAX_SKYLIGHT)) as u8;
                MAX_SKYLIGHT.saturating_sub(depth.saturating_mul(2))
            }
            Some(_) => 0,
        }
    }
}

/// Three-face cube: lit top, dimmer left, dimmest right.
fn cube_sprite(material: Material, zoom: ZoomLevel) -> Sprite {
    let (cw, rh) = (zoom.column_width(), zoom.row_height());
    let mut sprite = Sprite::for_zoom(zoom);
    let base = material.base_color();
    for y in 0..zoom.sprite_height() {
        for x in 0..zoom.sprite_width() {
            // Top rhombus centred on (cw, rh), in doubled coordinates.
            let d = (2 * x + 1 - 2 * cw).abs();
            let e = (2 * y + 1 - 2 * rh).abs();
            let color = if d * rh + e * cw <= 2 * cw * rh {
                base
            } else if x < cw {
                base.scaled(0.8)
            } else {
                base.scaled(0.6)
            };
            sprite.set(x as u32, y as u32, color);
        }
    }
    sprite
}
