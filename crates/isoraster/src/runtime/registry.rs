//! # Display Registry
//!
//! Which displays are attached, and which world each one looks at. Block
//! change notifications fan out through here.

use crate::runtime::actor::DisplayHandle;
use isoraster_shared::{BlockPos, SessionId, WorldId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Attached displays by session.
#[derive(Default)]
pub struct DisplayRegistry {
    displays: RwLock<HashMap<SessionId, Arc<DisplayHandle>>>,
}

impl DisplayRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a display, returning the one it replaces.
    pub fn insert(&self, handle: Arc<DisplayHandle>) -> Option<Arc<DisplayHandle>> {
        self.displays.write().insert(handle.session(), handle)
    }

    /// Unregisters a display.
    pub fn remove(&self, session: SessionId) -> Option<Arc<DisplayHandle>> {
        self.displays.write().remove(&session)
    }

    /// Looks up a display.
    #[must_use]
    pub fn get(&self, session: SessionId) -> Option<Arc<DisplayHandle>> {
        self.displays.read().get(&session).cloned()
    }

    /// True if `session` is registered.
    #[must_use]
    pub fn contains(&self, session: SessionId) -> bool {
        self.displays.read().contains_key(&session)
    }

    /// Number of registered displays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.displays.read().len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.displays.read().is_empty()
    }

    /// Registered sessions, sorted.
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionId> {
        let mut sessions: Vec<_> = self.displays.read().keys().copied().collect();
        sessions.sort_unstable();
        sessions
    }

    /// Displays looking into `world`.
    #[must_use]
    pub fn displays_for_world(&self, world: WorldId) -> Vec<Arc<DisplayHandle>> {
        self.displays.read().values().filter(|handle| handle.world() == world).cloned().collect()
    }

    /// Queues a block change on every display looking into `world`.
    /// Returns how many displays were told.
    pub fn broadcast_block_change(&self, world: WorldId, pos: BlockPos) -> usize {
        // Sends may block on a full mailbox, so not under the lock.
        self.displays_for_world(world)
            .into_iter()
            .filter(|handle| handle.block_changed(world, pos).is_ok())
            .count()
    }

    /// Queues a tick on every display. Returns how many accepted it.
    pub fn tick_all(&self) -> usize {
        let displays: Vec<_> = self.displays.read().values().cloned().collect();
        displays.iter().filter(|handle| handle.tick()).count()
    }

    /// Unregisters everything, returning what was registered.
    pub fn drain(&self) -> Vec<Arc<DisplayHandle>> {
        self.displays.write().drain().map(|(_, handle)| handle).collect()
    }
}
