//! # Iso Display
//!
//! One attached canvas: the state machine the host drives.
//!
//! ```text
//!   on_attach ──► on_tick ◄──┐
//!                   │        │  on_world_position_changed (queued)
//!                   │        │  on_pan / on_zoom / on_rotate / on_reset
//!                   ▼        │
//!              dirty tiles ──► forward render ──► finished (persist once)
//!                   │
//!   on_detach ◄─────┘ (persist)
//! ```
//!
//! Nothing here blocks or spawns. Each display owns all of its state; the
//! host gives every display its own thread or task.

use crate::canvas::DepthCanvas;
use crate::compositor::{CompositeContext, Compositor};
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::invalidation::InvalidationTracker;
use crate::scheduler::{RenderMode, RenderScheduler};
use crate::services::{LightSampler, SpriteSource};
use crate::stats::{RenderStats, TickReport};
use crate::viewport::{PanDirection, ViewportController};
use isoraster_cache::{CanvasCache, PropertyStore};
use isoraster_shared::{BlockPos, SessionId, TileCoord, ViewportProperties, WorldId};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The collaborators a display renders and persists through.
#[derive(Clone)]
pub struct DisplayServices {
    /// Block sprites
    pub sprites: Arc<dyn SpriteSource>,
    /// Sky light; lighting cannot be enabled without one
    pub light: Option<Arc<dyn LightSampler>>,
    /// Canvas snapshot store
    pub canvases: Arc<dyn CanvasCache>,
    /// Viewport property store
    pub properties: Arc<dyn PropertyStore>,
}

/// An incrementally rendered isometric view of a world.
pub struct IsoDisplay {
    session: SessionId,
    config: RenderConfig,
    services: DisplayServices,
    viewport: ViewportController,
    canvas: DepthCanvas,
    compositor: Compositor,
    scheduler: RenderScheduler,
    invalidation: InvalidationTracker,
    lighting: bool,
    attached: bool,
    stats: RenderStats,
}

impl IsoDisplay {
    /// Creates a detached display. Nothing renders until [`IsoDisplay::on_attach`].
    pub fn new(session: SessionId, config: RenderConfig, services: DisplayServices) -> RenderResult<Self> {
        config.validate()?;
        let properties = ViewportProperties::anchored(WorldId::default(), BlockPos::default(), config.default_facing, config.default_zoom);
        let viewport = ViewportController::new(properties, config.canvas_width, config.canvas_height, config.world_height());
        let scheduler = RenderScheduler::new(*viewport.tile_bounds());
        let canvas = DepthCanvas::new(config.canvas_width, config.canvas_height);
        let lighting = config.enable_light && services.light.is_some();

        Ok(Self {
            session,
            config,
            services,
            viewport,
            canvas,
            compositor: Compositor::new(),
            scheduler,
            invalidation: InvalidationTracker::new(),
            lighting,
            attached: false,
            stats: RenderStats::default(),
        })
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Loads the session's persisted state and starts rendering.
    ///
    /// Without stored properties the view is anchored at `owner_position` in
    /// `world` and the new properties are saved right away. A missing or
    /// unreadable snapshot means rendering from scratch.
    pub fn on_attach(&mut self, world: WorldId, owner_position: BlockPos) {
        let bootstrap = || {
            ViewportProperties::anchored(world, owner_position, self.config.default_facing, self.config.default_zoom)
        };
        let (properties, fresh) = match self.services.properties.load_properties(self.session) {
            Ok(Some(properties)) => (properties, false),
            Ok(None) => (bootstrap(), true),
            Err(e) => {
                tracing::warn!("Display {}: unreadable properties, starting over: {}", self.session, e);
                (bootstrap(), true)
            }
        };
        self.viewport.relocate(properties);
        self.canvas.set_brush(Some(self.services.sprites.brush(properties.zoom)));

        let mode = if fresh { RenderMode::Initialize } else { self.restore_canvas(properties.finished_rendering) };
        if mode == RenderMode::Initialize {
            self.canvas.clear_depth_buffer();
            self.canvas.fill_background(self.config.background_color);
        }
        self.restart(mode);
        self.attached = true;

        if fresh {
            self.persist_properties();
        }
        tracing::info!(
            "Display {} attached to {} at {} facing {} zoom {} ({:?})",
            self.session,
            properties.world,
            properties.anchor,
            properties.facing,
            properties.zoom,
            mode
        );
    }

    fn restore_canvas(&mut self, finished: bool) -> RenderMode {
        match self.services.canvases.load_canvas(self.session) {
            Ok(Some(snapshot)) => match self.canvas.restore(&snapshot) {
                Ok(()) => RenderMode::FromCache { finished },
                Err(e) => {
                    tracing::warn!("Display {}: cached canvas rejected: {}", self.session, e);
                    RenderMode::Initialize
                }
            },
            Ok(None) => {
                if finished {
                    tracing::warn!("Display {}: finished canvas expected but none cached", self.session);
                }
                RenderMode::Initialize
            }
            Err(e) => {
                tracing::warn!("Display {}: cached canvas unreadable: {}", self.session, e);
                RenderMode::Initialize
            }
        }
    }

    /// Persists the canvas and properties and stops rendering.
    pub fn on_detach(&mut self) {
        if !self.attached {
            return;
        }
        self.persist_canvas();
        self.persist_properties();
        self.attached = false;
        self.invalidation.clear();
        tracing::info!("Display {} detached after {} ticks", self.session, self.stats.total_ticks);
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Runs one host tick with the configured budget.
    pub fn on_tick(&mut self) -> TickReport {
        self.tick_with_budget(self.config.max_render_time())
    }

    /// Runs one host tick: drain dirty tiles, then render forward until
    /// `budget` is spent.
    pub fn tick_with_budget(&mut self, budget: Duration) -> TickReport {
        if !self.attached {
            return TickReport::default();
        }
        let start = Instant::now();
        let light = if self.lighting { self.services.light.as_deref() } else { None };
        let ctx = CompositeContext {
            sprites: &*self.services.sprites,
            light,
            world: self.viewport.world(),
            anchor: self.viewport.anchor(),
            world_height: self.viewport.world_height(),
            projection: self.viewport.projection(),
        };

        let dirty_tiles = self.invalidation.process(&ctx, &mut self.compositor, &mut self.canvas, &mut self.scheduler);
        let advance = self.scheduler.advance(
            budget,
            &ctx,
            &mut self.compositor,
            &mut self.canvas,
            self.config.background_color,
        );

        let report = TickReport {
            dirty_tiles: dirty_tiles as u32,
            layers: advance.layers,
            tiles: advance.tiles,
            completed: advance.completed,
            elapsed_us: start.elapsed().as_micros() as u64,
        };
        self.stats.record(&report);

        if report.layers > 0 || report.dirty_tiles > 0 {
            tracing::debug!(
                "Display {} tick: {} dirty, {} layers, {} tiles, z={} ({}us)",
                self.session,
                report.dirty_tiles,
                report.layers,
                report.tiles,
                self.scheduler.current_render_z(),
                report.elapsed_us
            );
        }
        if report.completed {
            self.viewport.set_finished_rendering(true);
            self.persist_canvas();
            self.persist_properties();
            tracing::info!(
                "Display {} finished rendering in {} ticks",
                self.session,
                self.stats.render_ticks
            );
        }
        report
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Queues the tile showing `pos` for redraw. Returns true if it is visible.
    pub fn on_world_position_changed(&mut self, world: WorldId, pos: BlockPos) -> bool {
        self.attached && self.invalidation.on_block_changed(&self.viewport, world, pos)
    }

    /// Moves the view one step, keeping what is still valid of the picture.
    /// Returns false if the view did not move.
    pub fn on_pan_requested(&mut self, direction: PanDirection) -> bool {
        if !self.attached {
            return false;
        }
        let Some(step) = self.viewport.pan(direction) else {
            return false;
        };

        self.canvas.move_pixels(step.pixel_dx, step.pixel_dy);
        if step.depth_delta() != 0 {
            self.canvas.shift_depths(step.depth_delta());
        }
        self.scheduler.remap_for_pan(
            step,
            &self.viewport.projection(),
            self.viewport.canvas_size(),
            (self.config.pan_extra_margin_columns, self.config.pan_extra_margin_rows),
        );
        self.invalidation.translate(step, self.viewport.tile_bounds());
        self.scheduler.reset(*self.viewport.tile_bounds(), RenderMode::Translation);
        self.viewport.set_finished_rendering(false);
        self.stats.reset_render_ticks();
        self.persist_properties();

        tracing::debug!("Display {} panned {} to {}", self.session, direction, self.viewport.anchor());
        true
    }

    /// Zooms `delta` levels in (positive) or out. Returns false at the limit.
    pub fn on_zoom_requested(&mut self, delta: i32) -> bool {
        if !self.attached || !self.viewport.zoom_by(delta) {
            return false;
        }
        self.canvas.set_brush(Some(self.services.sprites.brush(self.viewport.zoom())));
        self.reinitialize();
        tracing::info!("Display {} zoom {}", self.session, self.viewport.zoom());
        true
    }

    /// Rotates `delta` quarter turns clockwise. Returns false for whole turns.
    pub fn on_rotate_requested(&mut self, delta: i32) -> bool {
        if !self.attached || !self.viewport.rotate_by(delta) {
            return false;
        }
        self.reinitialize();
        tracing::info!("Display {} facing {}", self.session, self.viewport.facing());
        true
    }

    /// Throws the picture away and renders again from scratch. Returns false
    /// when detached.
    pub fn on_reset_requested(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.reinitialize();
        tracing::info!("Display {} reset", self.session);
        true
    }

    /// Turns sky-light shading on or off. Returns true if this changed the
    /// display; a change re-renders from scratch.
    pub fn set_lighting_enabled(&mut self, enabled: bool) -> bool {
        let enabled = enabled && self.services.light.is_some();
        if !self.attached || enabled == self.lighting {
            return false;
        }
        self.lighting = enabled;
        self.reinitialize();
        tracing::info!("Display {} lighting {}", self.session, if enabled { "on" } else { "off" });
        true
    }

    fn reinitialize(&mut self) {
        self.canvas.clear_depth_buffer();
        self.restart(RenderMode::Initialize);
        self.persist_properties();
    }

    fn restart(&mut self, mode: RenderMode) {
        self.scheduler.reset(*self.viewport.tile_bounds(), mode);
        self.invalidation.clear();
        self.viewport.set_finished_rendering(self.scheduler.finished_rendering());
        self.stats.reset_render_ticks();
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Tile drawn at canvas pixel `(x, y)`, or `None` where nothing is drawn.
    #[must_use]
    pub fn tile_at_pixel(&self, x: i32, y: i32) -> Option<TileCoord> {
        let depth = self.canvas.depth_at(x, y)?;
        if depth == DepthCanvas::VOID_DEPTH {
            return None;
        }
        let projection = self.viewport.projection();
        let guess = projection.pixel_to_tile(x, y, i32::from(depth));

        // Up to three stacked sprites cover a pixel; the topmost one wins.
        for ty in guess.y - 1..=guess.y + 1 {
            let tile = TileCoord::new(guess.x, ty, guess.z);
            let in_silhouette = self
                .canvas
                .brush()
                .map_or(true, |mask| mask.covers(x - projection.draw_x(tile.x), y - projection.draw_y(ty)));
            if in_silhouette && self.has_block(tile) {
                return Some(tile);
            }
        }
        Some(guess)
    }

    /// World block drawn at canvas pixel `(x, y)`.
    #[must_use]
    pub fn block_at_pixel(&self, x: i32, y: i32) -> Option<BlockPos> {
        let tile = self.tile_at_pixel(x, y)?;
        let offset = self.viewport.projection().tile_to_block(tile)?;
        self.viewport.anchor().relative(offset)
    }

    fn has_block(&self, tile: TileCoord) -> bool {
        let Some(offset) = self.viewport.projection().tile_to_block(tile) else { return false };
        let Some(pos) = self.viewport.anchor().relative(offset) else { return false };
        self.services
            .sprites
            .sprite(self.viewport.world(), pos, self.viewport.facing(), self.viewport.zoom())
            .is_some()
    }

    /// True if attached and looking into `world`.
    #[must_use]
    pub fn is_rendering_world(&self, world: WorldId) -> bool {
        self.attached && self.viewport.world() == world
    }

    /// Session this display persists under.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// True between attach and detach.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// True if sprites are shaded by sky light.
    #[must_use]
    pub const fn lighting_enabled(&self) -> bool {
        self.lighting
    }

    /// The canvas.
    #[must_use]
    pub const fn canvas(&self) -> &DepthCanvas {
        &self.canvas
    }

    /// Current viewport properties.
    #[must_use]
    pub const fn properties(&self) -> &ViewportProperties {
        self.viewport.properties()
    }

    /// Viewport geometry.
    #[must_use]
    pub const fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Render cursor and resolved tiles.
    #[must_use]
    pub const fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Queued dirty tiles.
    #[must_use]
    pub const fn invalidation(&self) -> &InvalidationTracker {
        &self.invalidation
    }

    /// Statistics since attach.
    #[must_use]
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Render configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    fn persist_canvas(&mut self) {
        match self.services.canvases.save_canvas(self.session, &self.canvas.snapshot()) {
            Ok(()) => self.stats.snapshots_saved += 1,
            Err(e) => tracing::warn!("Display {}: failed to save canvas: {}", self.session, e),
        }
    }

    fn persist_properties(&self) {
        if let Err(e) = self.services.properties.save_properties(self.session, self.viewport.properties()) {
            tracing::warn!("Display {}: failed to save properties: {}", self.session, e);
        }
    }
}
