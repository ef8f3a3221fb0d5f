//! # Occlusion Compositor
//!
//! Draws one block into one tile and reports whether anything behind it can
//! still show through. That report is what lets the scheduler stop visiting a
//! tile: once its footprint holds no void, deeper layers are invisible there.

use crate::canvas::{DepthCanvas, PixelRect, Sprite};
use crate::services::{LightSampler, SpriteSource};
use isoraster_shared::{BlockPos, Projection, TileCoord, WorldHeight, WorldId, MAX_SKYLIGHT};

/// What a composite pass needs to know about the viewport.
#[derive(Clone, Copy)]
pub struct CompositeContext<'a> {
    /// Block sprites
    pub sprites: &'a dyn SpriteSource,
    /// Sky light, or `None` when lighting is off
    pub light: Option<&'a dyn LightSampler>,
    /// World being rendered
    pub world: WorldId,
    /// Block the projection is anchored to
    pub anchor: BlockPos,
    /// Vertical extent of the world
    pub world_height: WorldHeight,
    /// Current projection
    pub projection: Projection,
}

impl CompositeContext<'_> {
    /// World position shown by `tile`, or `None` if no block can sit there.
    #[must_use]
    pub fn block_at(&self, tile: TileCoord) -> Option<BlockPos> {
        let offset = self.projection.tile_to_block(tile)?;
        let pos = self.anchor.relative(offset)?;
        self.world_height.contains(i64::from(pos.y)).then_some(pos)
    }

    /// Pixel rectangle `tile`'s sprite covers.
    #[must_use]
    pub fn footprint(&self, tile: TileCoord) -> PixelRect {
        let zoom = self.projection.zoom();
        PixelRect::new(
            self.projection.draw_x(tile.x),
            self.projection.draw_y(tile.y),
            zoom.sprite_width() as u32,
            zoom.sprite_height() as u32,
        )
    }

    /// Light multiplier for the block at `pos`, in `0.0..=1.0`.
    ///
    /// Sky light of the block above, or if that is not full daylight, the
    /// brightest of it and the block's four horizontal neighbours. Normalised
    /// and squared.
    #[must_use]
    pub fn light_factor(&self, light: &dyn LightSampler, pos: BlockPos) -> f32 {
        let above = BlockPos::new(pos.x, pos.y.saturating_add(1), pos.z);
        let mut level = light.skylight_at(self.world, above);
        if level < MAX_SKYLIGHT {
            for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let side = BlockPos::new(pos.x.saturating_add(dx), pos.y, pos.z.saturating_add(dz));
                level = level.max(light.skylight_at(self.world, side));
            }
        }
        let normalized = f32::from(level.min(MAX_SKYLIGHT)) / f32::from(MAX_SKYLIGHT);
        normalized * normalized
    }
}

/// Composites tiles into a canvas. Owns a scratch sprite so lit sprites
/// never allocate per tile.
#[derive(Debug, Default)]
pub struct Compositor {
    scratch: Sprite,
    tiles_composited: u64,
}

impl Compositor {
    /// Creates a compositor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles composited since creation.
    #[must_use]
    pub const fn tiles_composited(&self) -> u64 {
        self.tiles_composited
    }

    /// Draws the block shown by `tile` and reports whether a void remains in
    /// the tile's footprint.
    ///
    /// - A tile that maps to no block reports `false`: there is nothing behind
    ///   it to find.
    /// - Air without `force` reports `true` and draws nothing.
    /// - With `force`, everything this layer painted inside the footprint is
    ///   cleared and drawn again from the blocks as they are now, so a block
    ///   that turned to air leaves a void for deeper layers to fill.
    pub fn composite_tile(&mut self, ctx: &CompositeContext<'_>, canvas: &mut DepthCanvas, tile: TileCoord, force: bool) -> bool {
        let Some(pos) = ctx.block_at(tile) else {
            return false;
        };
        self.tiles_composited += 1;

        let footprint = ctx.footprint(tile);
        canvas.set_draw_depth(tile.z);
        if force {
            canvas.clear_draw_depth(footprint);
            // Within a layer only the two rows either side in the same column
            // overlap this footprint. Top row first, so ties keep the upper block.
            for dy in -2..=2 {
                let neighbour = TileCoord::new(tile.x, tile.y + dy, tile.z);
                if let Some(neighbour_pos) = ctx.block_at(neighbour) {
                    self.draw_block(ctx, canvas, neighbour_pos, ctx.footprint(neighbour), Some(footprint));
                }
            }
        } else if !self.draw_block(ctx, canvas, pos, footprint, None) {
            return true;
        }

        canvas.has_more_depth(footprint.x, footprint.y, footprint.width, footprint.height)
    }

    /// Draws the (lit) sprite of the block at `pos` into `at`. Returns false
    /// for air.
    fn draw_block(
        &mut self,
        ctx: &CompositeContext<'_>,
        canvas: &mut DepthCanvas,
        pos: BlockPos,
        at: PixelRect,
        clip: Option<PixelRect>,
    ) -> bool {
        let Some(sprite) = ctx.sprites.sprite(ctx.world, pos, ctx.projection.facing(), ctx.projection.zoom()) else {
            return false;
        };
        let sprite = match ctx.light {
            Some(light) => {
                self.scratch.copy_from(sprite);
                self.scratch.modulate(ctx.light_factor(light, pos));
                &self.scratch
            }
            None => sprite,
        };
        match clip {
            Some(clip) => canvas.draw_clipped(sprite, at.x, at.y, clip),
            None => canvas.draw(sprite, at.x, at.y),
        }
        true
    }
}
