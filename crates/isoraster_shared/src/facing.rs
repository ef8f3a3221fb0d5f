//! The four diagonal view directions.
//!
//! The viewer always looks along a horizontal diagonal. Rotating steps through
//! the diagonals a quarter turn at a time; there is no way to obtain an axis
//! aligned facing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagonal compass direction the viewer looks towards.
///
/// North is -Z and east is +X. Variants are listed clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Looking towards +X, -Z
    #[default]
    NorthEast,
    /// Looking towards +X, +Z
    SouthEast,
    /// Looking towards -X, +Z
    SouthWest,
    /// Looking towards -X, -Z
    NorthWest,
}

impl Facing {
    /// All facings in clockwise order.
    pub const ALL: [Self; 4] = [Self::NorthEast, Self::SouthEast, Self::SouthWest, Self::NorthWest];

    const fn index(self) -> i32 {
        match self {
            Self::NorthEast => 0,
            Self::SouthEast => 1,
            Self::SouthWest => 2,
            Self::NorthWest => 3,
        }
    }

    /// Rotates by `quarter_turns` (positive is clockwise seen from above).
    #[must_use]
    pub const fn rotated(self, quarter_turns: i32) -> Self {
        Self::ALL[(self.index() + quarter_turns.rem_euclid(4)).rem_euclid(4) as usize]
    }

    /// Horizontal direction the viewer looks towards, as `(x, z)`.
    #[must_use]
    pub const fn forward(self) -> (i32, i32) {
        match self {
            Self::NorthEast => (1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Horizontal direction to the viewer's right, as `(x, z)`.
    #[must_use]
    pub const fn right(self) -> (i32, i32) {
        self.rotated(1).forward()
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NorthEast => "north_east",
            Self::SouthEast => "south_east",
            Self::SouthWest => "south_west",
            Self::NorthWest => "north_west",
        };
        f.write_str(name)
    }
}
