//! # Render Configuration
//!
//! Loaded once per display from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! canvas_width = 128
//! canvas_height = 128
//! max_render_time_ms = 50
//! enable_light = true
//! default_zoom = "large"
//! default_facing = "south_west"
//!
//! [background_color]
//! r = 136
//! g = 178
//! b = 255
//! a = 255
//! ```

use crate::canvas::DepthCanvas;
use crate::error::{RenderError, RenderResult};
use isoraster_shared::{Facing, Rgba, WorldHeight, ZoomLevel, DEFAULT_CANVAS_SIZE, DEFAULT_TICK_INTERVAL_MS, WORLD_MAX_Y, WORLD_MIN_Y};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Per-display render settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Wall-clock budget for one tick's forward render
    pub max_render_time_ms: u64,
    /// Whether sprites are darkened by skylight
    pub enable_light: bool,
    /// Lowest block Y (inclusive)
    pub world_min_y: i32,
    /// One past the highest block Y (exclusive)
    pub world_max_y: i32,
    /// Extra tile columns re-rendered along the leading edge of a pan
    pub pan_extra_margin_columns: u32,
    /// Extra tile rows re-rendered along the leading edge of a pan
    pub pan_extra_margin_rows: u32,
    /// Zoom for a display with no stored properties
    pub default_zoom: ZoomLevel,
    /// Facing for a display with no stored properties
    pub default_facing: Facing,
    /// Colour painted where no block was found
    pub background_color: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            max_render_time_ms: DEFAULT_TICK_INTERVAL_MS,
            background_color: Rgba::opaque(136, 178, 255),
            enable_light: false,
            world_min_y: WORLD_MIN_Y,
            world_max_y: WORLD_MAX_Y,
            pan_extra_margin_columns: 0,
            pan_extra_margin_rows: 0,
            default_zoom: ZoomLevel::Default,
            default_facing: Facing::NorthEast,
        }
    }
}

impl RenderConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> RenderResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the invariants the renderer relies on.
    pub fn validate(&self) -> RenderResult<()> {
        let (width, height) = (self.canvas_width, self.canvas_height);
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 || width > i16::MAX as u32 || height > i16::MAX as u32 {
            return Err(RenderError::InvalidCanvasSize { width, height });
        }
        if self.world_max_y <= self.world_min_y {
            return Err(RenderError::Config(format!(
                "world_max_y ({}) must be above world_min_y ({})",
                self.world_max_y, self.world_min_y
            )));
        }
        // Layer depths reach one screen of rows plus the world height on
        // either side of the anchor and must stay below the void marker.
        let rows = ZoomLevel::ALL.iter().map(|zoom| i64::from(zoom.rows(height))).max().unwrap_or(0);
        let deepest = rows + i64::from(self.world_max_y) - i64::from(self.world_min_y);
        if deepest >= i64::from(DepthCanvas::VOID_DEPTH) {
            return Err(RenderError::Config(format!(
                "world height {}..{} is too tall to render on a {height} pixel canvas",
                self.world_min_y, self.world_max_y
            )));
        }
        Ok(())
    }

    /// Per-tick render budget.
    #[must_use]
    pub const fn max_render_time(&self) -> Duration {
        Duration::from_millis(self.max_render_time_ms)
    }

    /// Vertical extent of the rendered world.
    #[must_use]
    pub const fn world_height(&self) -> WorldHeight {
        WorldHeight::new(self.world_min_y, self.world_max_y)
    }
}
