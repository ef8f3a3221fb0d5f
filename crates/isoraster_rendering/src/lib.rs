//! # ISORASTER Rendering
//!
//! Incremental isometric renderer for small voxel-world canvases.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ONE TICK                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  block changes ─► InvalidationTracker ─► dirty tiles         │
//! │                                             │                │
//! │                                  forced composite + repair   │
//! │                                             ↓                │
//! │  RenderScheduler ─► layer z, z+1, ... until budget spent     │
//! │        │                                                     │
//! │        └─► Compositor ─► SpriteSource ─► DepthCanvas         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering goes nearest layer first. A tile whose footprint has no void
//! left is resolved and skipped by every deeper layer, which is what keeps a
//! full render cheap: most tiles stop after the first solid block.
//!
//! ## Rules
//!
//! - No operation blocks; the budget is checked between layers.
//! - Block changes are only queued when they arrive.
//! - A coordinate that does not map is "not visible", not an error.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod canvas;
pub mod compositor;
pub mod config;
pub mod display;
pub mod error;
pub mod invalidation;
pub mod scheduler;
pub mod services;
pub mod stats;
pub mod viewport;

pub use canvas::{BrushMask, DepthCanvas, PixelRect, Sprite};
pub use compositor::{CompositeContext, Compositor};
pub use config::RenderConfig;
pub use display::{DisplayServices, IsoDisplay};
pub use error::{RenderError, RenderResult};
pub use invalidation::InvalidationTracker;
pub use scheduler::{AdvanceReport, RenderMode, RenderScheduler};
pub use services::{LightSampler, SpriteSource};
pub use stats::{RenderStats, TickReport};
pub use viewport::{PanDirection, PanStep, ViewportController};
