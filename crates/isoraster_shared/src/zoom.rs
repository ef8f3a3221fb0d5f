//! Discrete zoom levels.
//!
//! A zoom level fixes the pixel size of one tile column and one tile row. A
//! block sprite is two columns wide and three rows tall: a diamond top face
//! spanning two rows plus one row of side faces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zoom setting, ordered from furthest out to closest in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    /// 4x3 pixel sprites
    Tiny,
    /// 8x6 pixel sprites
    Small,
    /// 16x12 pixel sprites
    #[default]
    Default,
    /// 32x24 pixel sprites
    Large,
}

impl ZoomLevel {
    /// All zoom levels, furthest out first.
    pub const ALL: [Self; 4] = [Self::Tiny, Self::Small, Self::Default, Self::Large];

    /// Position of this level in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Tiny => 0,
            Self::Small => 1,
            Self::Default => 2,
            Self::Large => 3,
        }
    }

    /// Moves `delta` levels in (positive) or out (negative), clamped at both ends.
    #[must_use]
    pub fn step(self, delta: i32) -> Self {
        let last = Self::ALL.len() as i64 - 1;
        let index = (self.index() as i64 + i64::from(delta)).clamp(0, last);
        Self::ALL[index as usize]
    }

    /// Pixel width of one tile column (half a sprite).
    #[must_use]
    pub const fn column_width(self) -> i32 {
        match self {
            Self::Tiny => 2,
            Self::Small => 4,
            Self::Default => 8,
            Self::Large => 16,
        }
    }

    /// Pixel height of one tile row.
    #[must_use]
    pub const fn row_height(self) -> i32 {
        self.column_width() / 2
    }

    /// Width of a block sprite in pixels.
    #[must_use]
    pub const fn sprite_width(self) -> i32 {
        self.column_width() * 2
    }

    /// Height of a block sprite in pixels.
    #[must_use]
    pub const fn sprite_height(self) -> i32 {
        self.row_height() * 3
    }

    /// Number of tile columns on each side of the centre needed to cover a
    /// canvas `width` pixels wide.
    #[must_use]
    pub const fn columns(self, width: u32) -> i32 {
        let half = (width / 2) as i32;
        (half + self.column_width() - 1) / self.column_width() + 1
    }

    /// Number of tile rows on each side of the centre needed to cover a
    /// canvas `height` pixels tall.
    #[must_use]
    pub const fn rows(self, height: u32) -> i32 {
        let half = (height / 2) as i32;
        (half + self.row_height() - 1) / self.row_height() + 1
    }

    /// Pixel X of tile column `tx` relative to the canvas centre.
    #[must_use]
    pub const fn screen_x(self, tx: i32) -> i32 {
        tx * self.column_width()
    }

    /// Pixel Y of tile row `ty` relative to the canvas centre.
    #[must_use]
    pub const fn screen_y(self, ty: i32) -> i32 {
        ty * self.row_height()
    }

    /// Left edge of the sprite drawn for column `tx`, relative to the canvas centre.
    #[must_use]
    pub const fn draw_x(self, tx: i32) -> i32 {
        self.screen_x(tx - 1)
    }

    /// Top edge of the sprite drawn for row `ty`, relative to the canvas centre.
    #[must_use]
    pub const fn draw_y(self, ty: i32) -> i32 {
        self.screen_y(ty - 1)
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.sprite_width(), self.sprite_height())
    }
}
