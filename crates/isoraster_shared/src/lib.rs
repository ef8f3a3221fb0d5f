//! # ISORASTER Shared
//!
//! Common types used by the render core, the snapshot cache and the host.
//!
//! ## Contents
//!
//! - `color`: the RGBA canvas pixel
//! - `math`: block positions, block offsets and tile coordinates
//! - `facing`: the four diagonal view directions
//! - `zoom`: discrete zoom levels and their tile pixel footprint
//! - `projection`: the block <-> screen tile <-> pixel mapping
//! - `bounds`: tile-grid bounds and the world-space pre-filter box
//! - `viewport`: persisted viewport configuration
//!
//! ## CRITICAL RULE
//!
//! Nothing in here draws. If you need pixels, put it in `isoraster_rendering`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bounds;
pub mod color;
pub mod constants;
pub mod facing;
pub mod math;
pub mod projection;
pub mod viewport;
pub mod zoom;

pub use bounds::{BlockBounds, TileBounds, WorldHeight};
pub use color::Rgba;
pub use constants::{DEFAULT_CANVAS_SIZE, DEFAULT_TICK_INTERVAL_MS, MAX_SKYLIGHT, WORLD_MAX_Y, WORLD_MIN_Y};
pub use facing::Facing;
pub use math::{BlockOffset, BlockPos, SessionId, TileCoord, WorldId};
pub use projection::{block_to_screen_tile, is_on_lattice, screen_tile_to_block, Projection};
pub use viewport::ViewportProperties;
pub use zoom::ZoomLevel;
