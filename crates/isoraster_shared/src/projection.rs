//! Isometric projection between anchor space, tile space and pixels.
//!
//! For a facing with forward vector `f` and right vector `r`:
//!
//! ```text
//! a  = f · (dx, dz)        forward distance (doubled, diagonals)
//! b  = r · (dx, dz)        sideways distance (doubled, diagonals)
//!
//! tx = b                   screen column
//! ty = -a - dy             screen row, grows downwards
//! tz = a                   depth layer, grows away from the viewer
//! ```
//!
//! `a` and `b` always share parity, so a tile holds a block at layer `tz`
//! only when `tx + tz` is even. Every other tile/layer pair is a gap in the
//! block lattice and maps to `None`.
//!
//! Within one layer, sprites overlap only when stacked in the same column; the
//! upper block (smaller row) is in front.

use crate::facing::Facing;
use crate::math::{BlockOffset, TileCoord};
use crate::zoom::ZoomLevel;

/// Maps a block offset (relative to the anchor) to the tile displaying it.
///
/// `None` when the tile coordinate is not representable.
#[must_use]
pub fn block_to_screen_tile(facing: Facing, offset: BlockOffset) -> Option<TileCoord> {
    let (fx, fz) = facing.forward();
    let (rx, rz) = facing.right();
    let (dx, dy, dz) = (i64::from(offset.dx), i64::from(offset.dy), i64::from(offset.dz));

    let a = i64::from(fx) * dx + i64::from(fz) * dz;
    let b = i64::from(rx) * dx + i64::from(rz) * dz;

    Some(TileCoord {
        x: i32::try_from(b).ok()?,
        y: i32::try_from(-a - dy).ok()?,
        z: i32::try_from(a).ok()?,
    })
}

/// Exact inverse of [`block_to_screen_tile`].
///
/// `None` when no block sits on this tile at this layer, or when the offset is
/// not representable.
#[must_use]
pub fn screen_tile_to_block(facing: Facing, tile: TileCoord) -> Option<BlockOffset> {
    let (fx, fz) = facing.forward();
    let (rx, rz) = facing.right();
    let (tx, ty, tz) = (i64::from(tile.x), i64::from(tile.y), i64::from(tile.z));

    if !is_on_lattice(tile.x, tile.z) {
        return None;
    }

    // f and r are orthogonal with |f|² = |r|² = 2, hence the halving.
    let dx = (i64::from(fx) * tz + i64::from(rx) * tx) / 2;
    let dz = (i64::from(fz) * tz + i64::from(rz) * tx) / 2;
    let dy = -ty - tz;

    Some(BlockOffset {
        dx: i32::try_from(dx).ok()?,
        dy: i32::try_from(dy).ok()?,
        dz: i32::try_from(dz).ok()?,
    })
}

/// True if column `tx` holds blocks at depth layer `tz`.
#[must_use]
pub const fn is_on_lattice(tx: i32, tz: i32) -> bool {
    (tx as i64 + tz as i64) % 2 == 0
}

/// Block offset Y shown by row `ty` at depth layer `tz`.
#[must_use]
pub fn row_block_dy(ty: i32, tz: i32) -> i64 {
    -i64::from(ty) - i64::from(tz)
}

/// Projection bound to one facing, zoom level and canvas size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    facing: Facing,
    zoom: ZoomLevel,
    center_x: i32,
    center_y: i32,
}

impl Projection {
    /// Creates a projection for a canvas of `width` x `height` pixels.
    #[must_use]
    pub const fn new(facing: Facing, zoom: ZoomLevel, width: u32, height: u32) -> Self {
        Self {
            facing,
            zoom,
            center_x: (width / 2) as i32,
            center_y: (height / 2) as i32,
        }
    }

    /// Facing of this projection.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Zoom level of this projection.
    #[must_use]
    pub const fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    /// Maps a block offset to its tile.
    #[must_use]
    pub fn block_to_tile(&self, offset: BlockOffset) -> Option<TileCoord> {
        block_to_screen_tile(self.facing, offset)
    }

    /// Maps a tile to the block offset it shows.
    #[must_use]
    pub fn tile_to_block(&self, tile: TileCoord) -> Option<BlockOffset> {
        screen_tile_to_block(self.facing, tile)
    }

    /// Canvas X of the left edge of column `tx`'s sprite.
    #[must_use]
    pub const fn draw_x(&self, tx: i32) -> i32 {
        self.zoom.draw_x(tx) + self.center_x
    }

    /// Canvas Y of the top edge of row `ty`'s sprite.
    #[must_use]
    pub const fn draw_y(&self, ty: i32) -> i32 {
        self.zoom.draw_y(ty) + self.center_y
    }

    /// Recovers the tile drawn at canvas pixel `(x, y)`, given the depth
    /// stored there.
    ///
    /// The column is exact. Up to three same-layer sprites stack over one
    /// pixel; the row returned is the one whose side band contains the pixel.
    #[must_use]
    pub fn pixel_to_tile(&self, x: i32, y: i32, depth: i32) -> TileCoord {
        let rel_x = x - self.center_x;
        let rel_y = y - self.center_y;

        let column = rel_x.div_euclid(self.zoom.column_width());
        let tx = if is_on_lattice(column, depth) { column } else { column + 1 };
        let ty = rel_y.div_euclid(self.zoom.row_height());

        TileCoord::new(tx, ty, depth)
    }
}
