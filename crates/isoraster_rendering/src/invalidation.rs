//! # Invalidation Tracker
//!
//! Block changes arrive at any time and are only queued. The queue is drained
//! once at the start of the next tick, before the scheduler runs.

use crate::canvas::DepthCanvas;
use crate::compositor::{CompositeContext, Compositor};
use crate::scheduler::RenderScheduler;
use crate::viewport::{PanStep, ViewportController};
use isoraster_shared::{BlockPos, TileBounds, TileCoord, WorldId};
use std::collections::HashSet;

/// Set of tiles waiting to be recomposited.
#[derive(Clone, Debug, Default)]
pub struct InvalidationTracker {
    dirty: HashSet<TileCoord>,
}

impl InvalidationTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// True if `tile` is queued.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.dirty.contains(&tile)
    }

    /// Drops every queued tile.
    pub fn clear(&mut self) {
        self.dirty.clear();
    }

    /// Queues the tile showing `pos` if the viewport can see it.
    ///
    /// Returns true if `pos` maps to a visible tile (already queued or not).
    pub fn on_block_changed(&mut self, viewport: &ViewportController, world: WorldId, pos: BlockPos) -> bool {
        match viewport.tile_for_block(world, pos) {
            Some(tile) => {
                self.dirty.insert(tile);
                true
            }
            None => false,
        }
    }

    /// Moves queued tiles along with a pan, dropping those that left the grid.
    pub fn translate(&mut self, step: PanStep, bounds: &TileBounds) {
        self.dirty = self
            .dirty
            .drain()
            .map(|tile| step.apply(tile))
            .filter(|tile| bounds.contains(*tile))
            .collect();
    }

    /// Takes every queued tile, nearest layer first and top row first.
    pub fn drain(&mut self) -> Vec<TileCoord> {
        let mut tiles: Vec<TileCoord> = self.dirty.drain().collect();
        tiles.sort_unstable_by_key(|t| (t.z, t.y, t.x));
        tiles
    }

    /// Redraws every queued tile and repairs around those that exposed a
    /// void. Returns the number of tiles processed.
    pub fn process(
        &mut self,
        ctx: &CompositeContext<'_>,
        compositor: &mut Compositor,
        canvas: &mut DepthCanvas,
        scheduler: &mut RenderScheduler,
    ) -> usize {
        let tiles = self.drain();
        for &tile in &tiles {
            if compositor.composite_tile(ctx, canvas, tile, true) {
                scheduler.invalidate_neighbourhood(tile);
            }
        }
        if !tiles.is_empty() {
            tracing::debug!("Recomposited {} dirty tiles", tiles.len());
        }
        tiles.len()
    }
}
