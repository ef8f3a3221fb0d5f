//! # ISORASTER
//!
//! The host side of the isometric renderer: threads, mailboxes and a demo
//! world around the render core.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          DisplayHost                             │
//! │                                                                  │
//! │   ticker ──Tick──┐                                               │
//! │                  ▼                                               │
//! │   DisplayRegistry ──▶ DisplayHandle ──mailbox──▶ DisplayActor    │
//! │        ▲                                            │            │
//! │   block changes                                 IsoDisplay       │
//! │                                                     │            │
//! │                          SpriteSource / LightSampler / caches    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: host settings wrapping the render settings
//! - `runtime`: registry, actors and the host
//! - `demo_world`: seeded heightmap terrain with cube sprites
//! - `export`: canvas to PNG export

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod demo_world;
pub mod error;
pub mod export;
pub mod runtime;

// Re-export the core crates
pub use isoraster_cache as cache;
pub use isoraster_rendering as rendering;
pub use isoraster_shared as shared;

pub use config::HostConfig;
pub use demo_world::{DemoWorld, Material};
pub use error::{HostError, HostResult};
pub use runtime::{DisplayActor, DisplayHandle, DisplayHost, DisplayMessage, DisplayRegistry, DisplayStatus};
