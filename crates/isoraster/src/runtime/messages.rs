//! # Display Messages
//!
//! Everything a display actor can be asked to do. Requests that need an
//! answer carry their own reply channel.

use crossbeam_channel::Sender;
use isoraster_cache::CanvasSnapshot;
use isoraster_rendering::{PanDirection, RenderStats};
use isoraster_shared::{BlockPos, SessionId, ViewportProperties, WorldId};

/// A request to a display actor.
#[derive(Debug)]
pub enum DisplayMessage {
    // =========================================================================
    // Driven by the host
    // =========================================================================
    /// Run one tick with the configured budget.
    Tick,

    /// A block changed somewhere in `world`.
    BlockChanged {
        /// World the block is in.
        world: WorldId,
        /// Position of the changed block.
        pos: BlockPos,
    },

    // =========================================================================
    // Viewer controls
    // =========================================================================
    /// Move the view one step.
    Pan(PanDirection),
    /// Zoom in (positive) or out.
    Zoom(i32),
    /// Rotate clockwise (positive) or counter-clockwise.
    Rotate(i32),
    /// Throw the picture away and render from scratch.
    Reset,
    /// Turn sky-light shading on or off.
    SetLighting(bool),

    // =========================================================================
    // Queries
    // =========================================================================
    /// Which block is drawn at canvas pixel `(x, y)`.
    Query {
        /// Pixel column.
        x: i32,
        /// Pixel row.
        y: i32,
        /// Receives the block, or `None` where nothing is drawn.
        reply: Sender<Option<BlockPos>>,
    },

    /// Current progress of the display.
    Status {
        /// Receives the status.
        reply: Sender<DisplayStatus>,
    },

    /// A copy of the current canvas.
    Capture {
        /// Receives the snapshot.
        reply: Sender<CanvasSnapshot>,
    },

    // =========================================================================
    // Lifecycle
    // =========================================================================
    /// Persist and stop.
    Detach,
}

/// Progress report for one display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayStatus {
    /// Session the display persists under.
    pub session: SessionId,
    /// Current viewport, including the finished flag.
    pub properties: ViewportProperties,
    /// True once nothing is left to render.
    pub idle: bool,
    /// Statistics since attach.
    pub stats: RenderStats,
}
