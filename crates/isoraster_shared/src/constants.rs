//! # World & Display Constants
//!
//! Defaults shared by the render core and the host. Everything here can be
//! overridden through `RenderConfig`; these are the values used when a config
//! file does not say otherwise.

// =============================================================================
// WORLD
// =============================================================================

/// Lowest block Y coordinate that can hold a block (inclusive).
pub const WORLD_MIN_Y: i32 = 0;

/// Block Y coordinate one past the highest block (exclusive).
pub const WORLD_MAX_Y: i32 = 256;

/// Brightest skylight value a light sampler can report.
pub const MAX_SKYLIGHT: u8 = 15;

// =============================================================================
// DISPLAY
// =============================================================================

/// Width and height of a display canvas in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 128;

/// Host tick cadence. The per-tick render budget is derived from this.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
