//! # ISORASTER Cache
//!
//! Persistence for display sessions: the canvas (colours + depths) and the
//! viewport properties needed to resume it.
//!
//! ## Implementations
//!
//! - [`MemoryCache`]: in-process maps behind `parking_lot` locks
//! - [`FileCache`]: lz4-compressed, CRC-checked snapshot files plus TOML
//!
//! Both are shared between displays, so every method takes `&self`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;

pub use error::{CacheError, CacheResult};
pub use file::FileCache;
pub use memory::MemoryCache;
pub use snapshot::CanvasSnapshot;

use isoraster_shared::{SessionId, ViewportProperties};

/// Stores canvas snapshots by session.
pub trait CanvasCache: Send + Sync {
    /// Loads the snapshot for `session`, or `None` if there is none.
    fn load_canvas(&self, session: SessionId) -> CacheResult<Option<CanvasSnapshot>>;

    /// Replaces the snapshot for `session`.
    fn save_canvas(&self, session: SessionId, snapshot: &CanvasSnapshot) -> CacheResult<()>;
}

/// Stores viewport properties by session.
pub trait PropertyStore: Send + Sync {
    /// Loads the properties for `session`, or `None` if there are none.
    fn load_properties(&self, session: SessionId) -> CacheResult<Option<ViewportProperties>>;

    /// Replaces the properties for `session`.
    fn save_properties(&self, session: SessionId, properties: &ViewportProperties) -> CacheResult<()>;
}
