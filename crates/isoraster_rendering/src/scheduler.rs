//! # Render Scheduler
//!
//! Renders the scene front to back, one depth layer at a time, and stops when
//! the tick's budget is spent. The cursor and the per-tile resolved flags carry
//! over to the next tick.
//!
//! ```text
//!  minimum_render_z ──► current_render_z ──► maximum_render_z ──► idle
//!        (nearest)          (next layer)          (farthest)
//! ```
//!
//! A layer pass is atomic: the clock is only read between layers.

use crate::canvas::DepthCanvas;
use crate::compositor::{CompositeContext, Compositor};
use crate::viewport::PanStep;
use isoraster_shared::{is_on_lattice, Projection, Rgba, TileBounds, TileCoord};
use std::time::{Duration, Instant};

/// How a (re)started render treats the existing canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Start from scratch at the nearest layer.
    Initialize,
    /// Canvas came from the cache. A finished snapshot only gets the last
    /// layer checked; anything else renders again from the nearest layer.
    FromCache {
        /// Completion flag stored with the snapshot
        finished: bool,
    },
    /// Canvas and flags were shifted by a pan and are partially valid.
    Translation,
}

/// Result of one [`RenderScheduler::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Depth layers processed
    pub layers: u32,
    /// Tiles composited
    pub tiles: u32,
    /// Rendering reached the end for the first time since the last reset;
    /// the caller should persist the canvas
    pub completed: bool,
}

/// Resumable layer-by-layer render state.
#[derive(Clone, Debug)]
pub struct RenderScheduler {
    bounds: TileBounds,
    resolved: Vec<bool>,
    current_render_z: i32,
    forward_render_needed: bool,
    finished_rendering: bool,
}

impl RenderScheduler {
    /// Creates a scheduler at the start of a fresh render.
    #[must_use]
    pub fn new(bounds: TileBounds) -> Self {
        Self {
            bounds,
            resolved: vec![false; bounds.len()],
            current_render_z: bounds.min_render_z,
            forward_render_needed: true,
            finished_rendering: false,
        }
    }

    /// Restarts rendering over `bounds`.
    ///
    /// Resolved flags are cleared unless `mode` is a translation, in which
    /// case they must already have been remapped with
    /// [`RenderScheduler::remap_for_pan`].
    pub fn reset(&mut self, bounds: TileBounds, mode: RenderMode) {
        self.bounds = bounds;
        if mode != RenderMode::Translation || self.resolved.len() != bounds.len() {
            self.resolved.clear();
            self.resolved.resize(bounds.len(), false);
        }
        self.forward_render_needed = true;

        match mode {
            RenderMode::FromCache { finished: true } => {
                self.current_render_z = bounds.max_render_z;
                self.finished_rendering = true;
            }
            _ => {
                self.current_render_z = bounds.min_render_z;
                self.finished_rendering = false;
            }
        }
    }

    /// Tile bounds being rendered.
    #[must_use]
    pub const fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    /// Next depth layer to composite.
    #[must_use]
    pub const fn current_render_z(&self) -> i32 {
        self.current_render_z
    }

    /// Whether the current layer still has void to fill.
    #[must_use]
    pub const fn forward_render_needed(&self) -> bool {
        self.forward_render_needed
    }

    /// Whether rendering has completed since the last reset.
    #[must_use]
    pub const fn finished_rendering(&self) -> bool {
        self.finished_rendering
    }

    /// True once the cursor is past the farthest layer.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.current_render_z > self.bounds.max_render_z
    }

    /// Whether column `tx`, row `ty` is resolved. Off-grid tiles are not.
    #[must_use]
    pub fn is_resolved(&self, tx: i32, ty: i32) -> bool {
        self.bounds.index(tx, ty).is_some_and(|i| self.resolved.get(i).copied().unwrap_or(false))
    }

    /// Number of resolved flags, one per tile column and row.
    #[must_use]
    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }

    /// Number of tiles currently resolved.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved.iter().filter(|&&r| r).count()
    }

    /// Renders layers until idle or until `budget` has elapsed. At least one
    /// layer is processed per call unless already idle.
    pub fn advance(
        &mut self,
        budget: Duration,
        ctx: &CompositeContext<'_>,
        compositor: &mut Compositor,
        canvas: &mut DepthCanvas,
        background: Rgba,
    ) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if self.is_idle() {
            return report;
        }
        if self.resolved.len() != self.bounds.len() {
            tracing::warn!(
                "Resolved-tile map has {} entries for {} tiles, reallocating",
                self.resolved.len(),
                self.bounds.len()
            );
            self.resolved.clear();
            self.resolved.resize(self.bounds.len(), false);
        }

        let start = Instant::now();
        loop {
            report.tiles += self.render_layer(ctx, compositor, canvas);
            report.layers += 1;
            if self.is_idle() || start.elapsed() >= budget {
                break;
            }
        }

        if self.is_idle() {
            canvas.fill_void(background);
            if !self.finished_rendering {
                self.finished_rendering = true;
                report.completed = true;
            }
        }
        report
    }

    /// Composites every unresolved, on-lattice, in-world tile at the current
    /// layer, then moves the cursor on.
    fn render_layer(&mut self, ctx: &CompositeContext<'_>, compositor: &mut Compositor, canvas: &mut DepthCanvas) -> u32 {
        let z = self.current_render_z;
        let mut tiles = 0;

        if self.forward_render_needed {
            let bounds = self.bounds;
            for tx in bounds.min_cols..=bounds.max_cols {
                if !is_on_lattice(tx, z) {
                    continue;
                }
                // Top row first: ties keep the first pixel, so the upper
                // block stays in front.
                for ty in bounds.min_rows..=bounds.max_rows {
                    if !TileBounds::row_in_world(ty, z, ctx.anchor.y, ctx.world_height) {
                        continue;
                    }
                    let Some(index) = bounds.index(tx, ty) else { continue };
                    if self.resolved[index] {
                        continue;
                    }

                    let tile = TileCoord::new(tx, ty, z);
                    tiles += 1;
                    if !compositor.composite_tile(ctx, canvas, tile, false) {
                        self.resolved[index] = true;
                    }
                }
            }
            self.forward_render_needed = canvas.has_more_depth_anywhere();
        }

        self.current_render_z = if self.forward_render_needed {
            z + 1
        } else {
            // Nothing left to fill anywhere: every deeper layer is hidden.
            self.bounds.max_render_z + 1
        };
        tiles
    }

    /// Clears the resolved flags of every tile whose footprint overlaps
    /// `tile`'s and rewinds the cursor so `tile`'s layer is rendered again.
    ///
    /// A sprite spans three columns and four rows of tile cells, so the
    /// overlapping tiles are one column and two rows either side.
    pub fn invalidate_neighbourhood(&mut self, tile: TileCoord) {
        for dy in -2..=2 {
            for dx in -1..=1 {
                if let Some(index) = self.bounds.index(tile.x + dx, tile.y + dy) {
                    if let Some(flag) = self.resolved.get_mut(index) {
                        *flag = false;
                    }
                }
            }
        }
        self.current_render_z = self.current_render_z.min(tile.z.max(self.bounds.min_render_z));
        self.forward_render_needed = true;
    }

    /// Moves the resolved flags along with a pan.
    ///
    /// A flag survives only if the tile's footprint after the move stays
    /// clear of the strip the pan revealed, widened by the extra margins.
    /// Footprint pixels outside the strip were all carried over from the old
    /// canvas, so they are still covered.
    pub fn remap_for_pan(
        &mut self,
        step: PanStep,
        projection: &Projection,
        canvas_size: (u32, u32),
        extra_margin: (u32, u32),
    ) {
        let bounds = self.bounds;
        let zoom = projection.zoom();
        let (width, height) = (canvas_size.0 as i32, canvas_size.1 as i32);
        let margin_x = extra_margin.0 as i32 * zoom.column_width();
        let margin_y = extra_margin.1 as i32 * zoom.row_height();

        // Revealed columns and rows as half-open pixel ranges.
        let revealed_x = match step.pixel_dx {
            0 => (0, 0),
            dx if dx > 0 => (0, dx + margin_x),
            dx => (width + dx - margin_x, width),
        };
        let revealed_y = match step.pixel_dy {
            0 => (0, 0),
            dy if dy > 0 => (0, dy + margin_y),
            dy => (height + dy - margin_y, height),
        };
        let overlaps = |start: i32, len: i32, range: (i32, i32)| start < range.1 && start + len > range.0;

        let mut remapped = vec![false; bounds.len()];
        for ty in bounds.min_rows..=bounds.max_rows {
            for tx in bounds.min_cols..=bounds.max_cols {
                if !self.is_resolved(tx - step.tile_dx, ty - step.tile_dy) {
                    continue;
                }
                let x0 = projection.draw_x(tx);
                let y0 = projection.draw_y(ty);
                let on_rows = overlaps(y0, zoom.sprite_height(), (0, height));
                let on_cols = overlaps(x0, zoom.sprite_width(), (0, width));
                let hits_columns = on_rows && overlaps(x0, zoom.sprite_width(), revealed_x);
                let hits_rows = on_cols && overlaps(y0, zoom.sprite_height(), revealed_y);
                if !hits_columns && !hits_rows {
                    if let Some(index) = bounds.index(tx, ty) {
                        remapped[index] = true;
                    }
                }
            }
        }
        self.resolved = remapped;
    }
}
