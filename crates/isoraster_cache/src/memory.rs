//! In-process cache.

use crate::error::CacheResult;
use crate::snapshot::CanvasSnapshot;
use crate::{CanvasCache, PropertyStore};
use isoraster_shared::{SessionId, ViewportProperties};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keeps snapshots and properties in memory, and counts writes.
///
/// Useful for hosts that do not outlive their displays, and for tests that
/// need to see how often a display persisted.
#[derive(Debug, Default)]
pub struct MemoryCache {
    canvases: Mutex<HashMap<SessionId, CanvasSnapshot>>,
    properties: Mutex<HashMap<SessionId, ViewportProperties>>,
    canvas_saves: AtomicU64,
    property_saves: AtomicU64,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshot saves since creation.
    #[must_use]
    pub fn canvas_saves(&self) -> u64 {
        self.canvas_saves.load(Ordering::Relaxed)
    }

    /// Number of property saves since creation.
    #[must_use]
    pub fn property_saves(&self) -> u64 {
        self.property_saves.load(Ordering::Relaxed)
    }

    /// Last properties saved for `session`, if any.
    #[must_use]
    pub fn properties(&self, session: SessionId) -> Option<ViewportProperties> {
        self.properties.lock().get(&session).copied()
    }

    /// True if a snapshot is stored for `session`.
    #[must_use]
    pub fn has_canvas(&self, session: SessionId) -> bool {
        self.canvases.lock().contains_key(&session)
    }
}

impl CanvasCache for MemoryCache {
    fn load_canvas(&self, session: SessionId) -> CacheResult<Option<CanvasSnapshot>> {
        Ok(self.canvases.lock().get(&session).cloned())
    }

    fn save_canvas(&self, session: SessionId, snapshot: &CanvasSnapshot) -> CacheResult<()> {
        self.canvases.lock().insert(session, snapshot.clone());
        self.canvas_saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl PropertyStore for MemoryCache {
    fn load_properties(&self, session: SessionId) -> CacheResult<Option<ViewportProperties>> {
        Ok(self.properties(session))
    }

    fn save_properties(&self, session: SessionId, properties: &ViewportProperties) -> CacheResult<()> {
        self.properties.lock().insert(session, *properties);
        self.property_saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
