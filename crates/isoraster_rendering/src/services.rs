//! # Collaborator Seams
//!
//! The renderer does not know what blocks look like or how bright the sky is.
//! The host plugs those in through these traits.

use crate::canvas::{BrushMask, Sprite};
use isoraster_shared::{BlockPos, Facing, WorldId, ZoomLevel};

/// Supplies block sprites.
///
/// Sprites must be `zoom.sprite_width()` x `zoom.sprite_height()` pixels.
pub trait SpriteSource: Send + Sync {
    /// Appearance of the block at `pos` seen through `facing` at `zoom`.
    ///
    /// `None` means air: nothing to draw, the tile stays see-through.
    fn sprite(&self, world: WorldId, pos: BlockPos, facing: Facing, zoom: ZoomLevel) -> Option<&Sprite>;

    /// Silhouette of one tile at `zoom`. Defaults to the cube outline.
    fn brush(&self, zoom: ZoomLevel) -> BrushMask {
        BrushMask::hexagon(zoom)
    }
}

/// Supplies sky light levels.
pub trait LightSampler: Send + Sync {
    /// Sky light at `pos`, from 0 (dark) to `MAX_SKYLIGHT`.
    fn skylight_at(&self, world: WorldId, pos: BlockPos) -> u8;
}
