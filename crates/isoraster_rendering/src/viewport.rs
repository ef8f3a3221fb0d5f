//! # Viewport Controller
//!
//! Owns where the display looks from (world, anchor, facing, zoom) and keeps
//! the derived projection and bounds in step with it.

use isoraster_shared::{
    BlockBounds, BlockPos, Facing, Projection, TileBounds, TileCoord, ViewportProperties, WorldHeight, WorldId, ZoomLevel,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Screen direction of a pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanDirection {
    /// Content moves down, view moves forward
    Up,
    /// Content moves up, view moves back
    Down,
    /// Content moves right, view moves left
    Left,
    /// Content moves left, view moves right
    Right,
}

impl fmt::Display for PanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// How far the existing picture moves for one pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanStep {
    /// Tile columns every tile moves by
    pub tile_dx: i32,
    /// Tile rows every tile moves by
    pub tile_dy: i32,
    /// Pixels the canvas moves horizontally
    pub pixel_dx: i32,
    /// Pixels the canvas moves vertically
    pub pixel_dy: i32,
}

impl PanStep {
    /// Change of every tile's depth layer.
    #[must_use]
    pub const fn depth_delta(&self) -> i32 {
        -self.tile_dy
    }

    /// Where a tile drawn before the pan is after it.
    #[must_use]
    pub const fn apply(&self, tile: TileCoord) -> TileCoord {
        TileCoord::new(tile.x + self.tile_dx, tile.y + self.tile_dy, tile.z + self.depth_delta())
    }
}

/// Viewport state and its derived geometry.
#[derive(Clone, Debug)]
pub struct ViewportController {
    properties: ViewportProperties,
    width: u32,
    height: u32,
    world_height: WorldHeight,
    projection: Projection,
    tile_bounds: TileBounds,
    block_bounds: BlockBounds,
}

impl ViewportController {
    /// Creates a controller for a `width` x `height` canvas.
    #[must_use]
    pub fn new(properties: ViewportProperties, width: u32, height: u32, world_height: WorldHeight) -> Self {
        let projection = Projection::new(properties.facing, properties.zoom, width, height);
        let tile_bounds = TileBounds::compute(properties.zoom, width, height, properties.anchor.y, world_height);
        let block_bounds = BlockBounds::compute(properties.facing, &tile_bounds, properties.anchor, world_height);
        Self {
            properties,
            width,
            height,
            world_height,
            projection,
            tile_bounds,
            block_bounds,
        }
    }

    fn recompute(&mut self) {
        *self = Self::new(self.properties, self.width, self.height, self.world_height);
    }

    /// Persistable state.
    #[must_use]
    pub const fn properties(&self) -> &ViewportProperties {
        &self.properties
    }

    /// Sets the completion flag stored with the properties.
    pub fn set_finished_rendering(&mut self, finished: bool) {
        self.properties.finished_rendering = finished;
    }

    /// World being viewed.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.properties.world
    }

    /// Anchor block.
    #[must_use]
    pub const fn anchor(&self) -> BlockPos {
        self.properties.anchor
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.properties.facing
    }

    /// Current zoom.
    #[must_use]
    pub const fn zoom(&self) -> ZoomLevel {
        self.properties.zoom
    }

    /// Current projection.
    #[must_use]
    pub const fn projection(&self) -> Projection {
        self.projection
    }

    /// Current tile bounds.
    #[must_use]
    pub const fn tile_bounds(&self) -> &TileBounds {
        &self.tile_bounds
    }

    /// Current world-space pre-filter box.
    #[must_use]
    pub const fn block_bounds(&self) -> &BlockBounds {
        &self.block_bounds
    }

    /// Vertical extent of the world.
    #[must_use]
    pub const fn world_height(&self) -> WorldHeight {
        self.world_height
    }

    /// Canvas size in pixels.
    #[must_use]
    pub const fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Moves `delta` zoom levels. Returns false if the level did not change.
    pub fn zoom_by(&mut self, delta: i32) -> bool {
        let zoom = self.properties.zoom.step(delta);
        if zoom == self.properties.zoom {
            return false;
        }
        self.properties.zoom = zoom;
        self.recompute();
        true
    }

    /// Rotates by `quarter_turns` clockwise. Returns false if the facing did
    /// not change.
    pub fn rotate_by(&mut self, quarter_turns: i32) -> bool {
        let facing = self.properties.facing.rotated(quarter_turns);
        if facing == self.properties.facing {
            return false;
        }
        self.properties.facing = facing;
        self.recompute();
        true
    }

    /// Replaces the whole viewport state.
    pub fn relocate(&mut self, properties: ViewportProperties) {
        self.properties = properties;
        self.recompute();
    }

    /// Moves the anchor one step in `direction` and reports how the existing
    /// picture moves with it.
    ///
    /// Up and down move the anchor along the facing, left and right across
    /// it. Either way the anchor moves one diagonal block, which is two tiles.
    /// `None` if the anchor would leave the coordinate range.
    pub fn pan(&mut self, direction: PanDirection) -> Option<PanStep> {
        let (fx, fz) = self.properties.facing.forward();
        let (rx, rz) = self.properties.facing.right();
        let ((mx, mz), tile_dx, tile_dy) = match direction {
            PanDirection::Up => ((fx, fz), 0, 2),
            PanDirection::Down => ((-fx, -fz), 0, -2),
            PanDirection::Left => ((-rx, -rz), 2, 0),
            PanDirection::Right => ((rx, rz), -2, 0),
        };

        let anchor = self.properties.anchor;
        self.properties.anchor = BlockPos::new(anchor.x.checked_add(mx)?, anchor.y, anchor.z.checked_add(mz)?);
        self.recompute();

        let zoom = self.properties.zoom;
        Some(PanStep {
            tile_dx,
            tile_dy,
            pixel_dx: tile_dx * zoom.column_width(),
            pixel_dy: tile_dy * zoom.row_height(),
        })
    }

    /// Tile showing `pos`, if `pos` is in this world and on screen.
    ///
    /// The block box is checked first; the exact mapping only runs for
    /// blocks that pass it.
    #[must_use]
    pub fn tile_for_block(&self, world: WorldId, pos: BlockPos) -> Option<TileCoord> {
        if world != self.properties.world || !self.block_bounds.contains(pos) {
            return None;
        }
        let offset = pos.offset_from(self.properties.anchor)?;
        let tile = self.projection.block_to_tile(offset)?;
        self.tile_bounds.contains(tile).then_some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ViewportController {
        let props = ViewportProperties::anchored(WorldId(1), BlockPos::new(10, 64, 10), Facing::NorthEast, ZoomLevel::Default);
        ViewportController::new(props, 128, 128, WorldHeight::default())
    }

    #[test]
    fn test_zoom_changes_bounds_and_clamps() {
        let mut viewport = controller();
        let before = *viewport.tile_bounds();
        assert!(viewport.zoom_by(1));
        assert_ne!(*viewport.tile_bounds(), before);
        assert!(!viewport.zoom_by(1));
        assert!(viewport.zoom_by(-1));
        assert_eq!(*viewport.tile_bounds(), before);
    }

    #[test]
    fn test_rotate_full_turn_is_noop() {
        let mut viewport = controller();
        assert!(!viewport.rotate_by(4));
        assert!(viewport.rotate_by(1));
        assert_eq!(viewport.facing(), Facing::SouthEast);
    }

    #[test]
    fn test_pan_keeps_blocks_on_their_moved_tiles() {
        for direction in [PanDirection::Up, PanDirection::Down, PanDirection::Left, PanDirection::Right] {
            let mut viewport = controller();
            let pos = BlockPos::new(12, 66, 7);
            let before = viewport.tile_for_block(WorldId(1), pos).unwrap();
            let step = viewport.pan(direction).unwrap();
            let after = viewport.tile_for_block(WorldId(1), pos).unwrap();
            assert_eq!(after, step.apply(before), "{direction}");
        }
    }

    #[test]
    fn test_pan_pixel_delta_matches_zoom() {
        let mut viewport = controller();
        let step = viewport.pan(PanDirection::Up).unwrap();
        assert_eq!((step.pixel_dx, step.pixel_dy), (0, 2 * ZoomLevel::Default.row_height()));
        let step = viewport.pan(PanDirection::Left).unwrap();
        assert_eq!((step.pixel_dx, step.pixel_dy), (2 * ZoomLevel::Default.column_width(), 0));
    }

    #[test]
    fn test_tile_for_block_filters() {
        let viewport = controller();
        assert!(viewport.tile_for_block(WorldId(1), BlockPos::new(10, 64, 10)).is_some());
        assert!(viewport.tile_for_block(WorldId(2), BlockPos::new(10, 64, 10)).is_none());
        assert!(viewport.tile_for_block(WorldId(1), BlockPos::new(10_000, 64, 10)).is_none());
    }
}
