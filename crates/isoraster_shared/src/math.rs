//! Integer coordinate types.
//!
//! Three coordinate spaces meet in the renderer:
//!
//! - **World space** (`BlockPos`): absolute block coordinates.
//! - **Anchor space** (`BlockOffset`): a block relative to the viewport anchor.
//! - **Tile space** (`TileCoord`): screen column, screen row and depth layer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one world (dimension) of the host.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Serialize, Deserialize)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

/// Identifies one display session (one canvas, one cache entry).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Absolute block position in a world.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct BlockPos {
    /// X coordinate (east is positive)
    pub x: i32,
    /// Y coordinate (up is positive)
    pub y: i32,
    /// Z coordinate (south is positive)
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the block `offset` away from this one.
    ///
    /// `None` if the result does not fit in world coordinates.
    #[must_use]
    pub fn relative(self, offset: BlockOffset) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(offset.dx)?,
            y: self.y.checked_add(offset.dy)?,
            z: self.z.checked_add(offset.dz)?,
        })
    }

    /// Returns the offset that takes `anchor` to this position.
    #[must_use]
    pub fn offset_from(self, anchor: Self) -> Option<BlockOffset> {
        Some(BlockOffset {
            dx: self.x.checked_sub(anchor.x)?,
            dy: self.y.checked_sub(anchor.y)?,
            dz: self.z.checked_sub(anchor.z)?,
        })
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Block position relative to the viewport anchor.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct BlockOffset {
    /// Offset along X
    pub dx: i32,
    /// Offset along Y
    pub dy: i32,
    /// Offset along Z
    pub dz: i32,
}

impl BlockOffset {
    /// Creates a new offset.
    #[must_use]
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }
}

/// Screen-projected tile coordinate.
///
/// `x` is the column, `y` the row (growing downwards on the canvas) and `z`
/// the depth layer (growing away from the viewer).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Depth layer
    pub z: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {} @ {}]", self.x, self.y, self.z)
    }
}
