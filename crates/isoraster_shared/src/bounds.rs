//! Tile-grid bounds and the world-space pre-filter box.

use crate::constants::{WORLD_MAX_Y, WORLD_MIN_Y};
use crate::facing::Facing;
use crate::math::{BlockPos, TileCoord};
use crate::projection::row_block_dy;
use crate::zoom::ZoomLevel;
use serde::{Deserialize, Serialize};

// =============================================================================
// WORLD HEIGHT
// =============================================================================

/// Vertical extent of a world: `min_y` inclusive, `max_y` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldHeight {
    /// Lowest block Y (inclusive)
    pub min_y: i32,
    /// One past the highest block Y (exclusive)
    pub max_y: i32,
}

impl Default for WorldHeight {
    fn default() -> Self {
        Self::new(WORLD_MIN_Y, WORLD_MAX_Y)
    }
}

impl WorldHeight {
    /// Creates a height range. An inverted range collapses to a single layer.
    #[must_use]
    pub const fn new(min_y: i32, max_y: i32) -> Self {
        let max_y = if max_y > min_y { max_y } else { min_y + 1 };
        Self { min_y, max_y }
    }

    /// True if `y` can hold a block.
    #[must_use]
    pub const fn contains(&self, y: i64) -> bool {
        y >= self.min_y as i64 && y < self.max_y as i64
    }

    /// Clamps `y` to the nearest Y that can hold a block.
    #[must_use]
    pub const fn clamp(&self, y: i32) -> i32 {
        if y < self.min_y {
            self.min_y
        } else if y >= self.max_y {
            self.max_y - 1
        } else {
            y
        }
    }
}

// =============================================================================
// TILE BOUNDS
// =============================================================================

/// Inclusive tile-space bounds of a viewport.
///
/// Columns and rows follow from canvas size and zoom. The depth range follows
/// from the anchor's height: the nearest layer holds the highest blocks at the
/// bottom row, the farthest holds the lowest blocks at the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileBounds {
    /// Leftmost column
    pub min_cols: i32,
    /// Rightmost column
    pub max_cols: i32,
    /// Top row
    pub min_rows: i32,
    /// Bottom row
    pub max_rows: i32,
    /// Nearest depth layer
    pub min_render_z: i32,
    /// Farthest depth layer
    pub max_render_z: i32,
}

impl TileBounds {
    /// Computes bounds for a `width` x `height` canvas anchored at `anchor_y`.
    #[must_use]
    pub fn compute(zoom: ZoomLevel, width: u32, height: u32, anchor_y: i32, world: WorldHeight) -> Self {
        let columns = zoom.columns(width);
        let rows = zoom.rows(height);
        let py = world.clamp(anchor_y);

        Self {
            min_cols: -columns,
            max_cols: columns,
            min_rows: -rows,
            max_rows: rows,
            min_render_z: -rows - (world.max_y - 1 - py),
            max_render_z: rows + (py - world.min_y),
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        (self.max_cols - self.min_cols + 1) as usize
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        (self.max_rows - self.min_rows + 1) as usize
    }

    /// Number of tiles in one layer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Always false; a grid has at least one tile.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// True if column `tx`, row `ty` lies on the grid.
    #[must_use]
    pub const fn contains_tile(&self, tx: i32, ty: i32) -> bool {
        tx >= self.min_cols && tx <= self.max_cols && ty >= self.min_rows && ty <= self.max_rows
    }

    /// True if the tile lies on the grid and within the depth range.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        self.contains_tile(tile.x, tile.y) && tile.z >= self.min_render_z && tile.z <= self.max_render_z
    }

    /// Row-major index of column `tx`, row `ty`, or `None` off the grid.
    #[must_use]
    pub const fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if !self.contains_tile(tx, ty) {
            return None;
        }
        let col = (tx - self.min_cols) as usize;
        let row = (ty - self.min_rows) as usize;
        Some(row * self.width() + col)
    }

    /// True if row `ty` at layer `tz` shows a block inside `world`, for an
    /// anchor at `anchor_y`.
    #[must_use]
    pub fn row_in_world(ty: i32, tz: i32, anchor_y: i32, world: WorldHeight) -> bool {
        world.contains(i64::from(anchor_y) + row_block_dy(ty, tz))
    }
}

// =============================================================================
// BLOCK BOUNDS
// =============================================================================

/// Axis-aligned world box containing every block a viewport can show.
///
/// Checked before the exact tile mapping on every block change, so most
/// changes elsewhere in the world cost six comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockBounds {
    min: [i64; 3],
    max: [i64; 3],
}

impl BlockBounds {
    /// Computes the box for `tiles` seen through `facing` from `anchor`.
    ///
    /// The inverse projection is linear, so the extremes sit on the corners
    /// of the tile box.
    #[must_use]
    pub fn compute(facing: Facing, tiles: &TileBounds, anchor: BlockPos, world: WorldHeight) -> Self {
        let (fx, fz) = facing.forward();
        let (rx, rz) = facing.right();

        let mut min = [i64::MAX; 3];
        let mut max = [i64::MIN; 3];

        for tx in [tiles.min_cols, tiles.max_cols] {
            for ty in [tiles.min_rows, tiles.max_rows] {
                for tz in [tiles.min_render_z, tiles.max_render_z] {
                    let (tx, ty, tz) = (i64::from(tx), i64::from(ty), i64::from(tz));
                    // Doubled offsets; halved with floor/ceil below.
                    let corner = [
                        i64::from(fx) * tz + i64::from(rx) * tx,
                        2 * (-ty - tz),
                        i64::from(fz) * tz + i64::from(rz) * tx,
                    ];
                    for axis in 0..3 {
                        min[axis] = min[axis].min(corner[axis]);
                        max[axis] = max[axis].max(corner[axis]);
                    }
                }
            }
        }

        let origin = [i64::from(anchor.x), i64::from(anchor.y), i64::from(anchor.z)];
        for axis in 0..3 {
            min[axis] = min[axis].div_euclid(2) + origin[axis];
            max[axis] = (max[axis] + 1).div_euclid(2) + origin[axis];
        }
        min[1] = min[1].max(i64::from(world.min_y));
        max[1] = max[1].min(i64::from(world.max_y) - 1);

        Self { min, max }
    }

    /// True if `pos` lies inside the box.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        let p = [i64::from(pos.x), i64::from(pos.y), i64::from(pos.z)];
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    /// Lowest corner of the box.
    #[must_use]
    pub const fn min(&self) -> [i64; 3] {
        self.min
    }

    /// Highest corner of the box.
    #[must_use]
    pub const fn max(&self) -> [i64; 3] {
        self.max
    }
}
