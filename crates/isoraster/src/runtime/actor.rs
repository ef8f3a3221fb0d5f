//! # Display Actor
//!
//! One thread per attached display. The thread owns its `IsoDisplay`
//! outright, so the render core never sees a lock. Everyone else talks to it
//! through a `DisplayHandle`.
//!
//! ```text
//! ┌──────────────┐   DisplayMessage   ┌──────────────┐
//! │ DisplayHost  │ ─────────────────▶ │ DisplayActor │ ── owns ── IsoDisplay
//! │ (ticker)     │   bounded channel  │ (thread)     │
//! └──────────────┘                    └──────────────┘
//! ```

use crate::error::{HostError, HostResult};
use crate::runtime::messages::{DisplayMessage, DisplayStatus};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use isoraster_cache::CanvasSnapshot;
use isoraster_rendering::{IsoDisplay, PanDirection};
use isoraster_shared::{BlockPos, SessionId, WorldId};
use parking_lot::Mutex;
use std::thread::JoinHandle;

/// The thread side: drains the mailbox into the display.
pub struct DisplayActor {
    display: IsoDisplay,
    inbox: Receiver<DisplayMessage>,
}

impl DisplayActor {
    /// Attaches `display` on the calling thread, then moves it onto a new
    /// thread. The display is attached by the time this returns.
    pub fn spawn(
        mut display: IsoDisplay,
        world: WorldId,
        owner_position: BlockPos,
        mailbox_capacity: usize,
    ) -> HostResult<DisplayHandle> {
        display.on_attach(world, owner_position);
        let session = display.session();
        // Stored properties may point the display at another world.
        let world = display.properties().world;

        let (sender, inbox) = bounded(mailbox_capacity);
        let actor = Self { display, inbox };
        let thread = std::thread::Builder::new()
            .name(format!("isoraster-display-{session}"))
            .spawn(move || actor.run())?;

        Ok(DisplayHandle {
            session,
            world,
            sender,
            thread: Mutex::new(Some(thread)),
        })
    }

    fn run(mut self) {
        tracing::debug!("Display {} actor started", self.display.session());
        while let Ok(message) = self.inbox.recv() {
            if !self.handle(message) {
                break;
            }
        }
        // Detach also covers the host dropping every sender.
        self.display.on_detach();
        tracing::debug!("Display {} actor stopped", self.display.session());
    }

    /// Applies one message. Returns false when the actor should stop.
    fn handle(&mut self, message: DisplayMessage) -> bool {
        let display = &mut self.display;
        match message {
            DisplayMessage::Tick => {
                display.on_tick();
            }
            DisplayMessage::BlockChanged { world, pos } => {
                display.on_world_position_changed(world, pos);
            }
            DisplayMessage::Pan(direction) => {
                display.on_pan_requested(direction);
            }
            DisplayMessage::Zoom(delta) => {
                display.on_zoom_requested(delta);
            }
            DisplayMessage::Rotate(delta) => {
                display.on_rotate_requested(delta);
            }
            DisplayMessage::Reset => {
                display.on_reset_requested();
            }
            DisplayMessage::SetLighting(enabled) => {
                display.set_lighting_enabled(enabled);
            }
            // A dropped reply receiver just means nobody waited for the answer.
            DisplayMessage::Query { x, y, reply } => {
                let _ = reply.send(display.block_at_pixel(x, y));
            }
            DisplayMessage::Status { reply } => {
                let _ = reply.send(DisplayStatus {
                    session: display.session(),
                    properties: *display.properties(),
                    idle: display.scheduler().is_idle(),
                    stats: *display.stats(),
                });
            }
            DisplayMessage::Capture { reply } => {
                let _ = reply.send(display.canvas().snapshot());
            }
            DisplayMessage::Detach => return false,
        }
        true
    }
}

/// The caller side of a running display actor.
pub struct DisplayHandle {
    session: SessionId,
    world: WorldId,
    sender: Sender<DisplayMessage>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl DisplayHandle {
    /// Session of the display.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// World the display was attached to.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// True while the actor thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread.lock().as_ref().is_some_and(|thread| !thread.is_finished())
    }

    /// Queues a tick unless the mailbox is full. A display that is behind
    /// skips ticks instead of piling them up.
    pub fn tick(&self) -> bool {
        match self.sender.try_send(DisplayMessage::Tick) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Display {} is behind, tick skipped", self.session);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queues a message, waiting for mailbox space if needed.
    pub fn send(&self, message: DisplayMessage) -> HostResult<()> {
        self.sender.send(message).map_err(|_| HostError::Disconnected(self.session))
    }

    /// Tells the display that a block changed.
    pub fn block_changed(&self, world: WorldId, pos: BlockPos) -> HostResult<()> {
        self.send(DisplayMessage::BlockChanged { world, pos })
    }

    /// Moves the view one step.
    pub fn pan(&self, direction: PanDirection) -> HostResult<()> {
        self.send(DisplayMessage::Pan(direction))
    }

    /// Block drawn at canvas pixel `(x, y)`. Waits for the actor.
    pub fn query(&self, x: i32, y: i32) -> HostResult<Option<BlockPos>> {
        let (reply, answer) = bounded(1);
        self.send(DisplayMessage::Query { x, y, reply })?;
        answer.recv().map_err(|_| HostError::Disconnected(self.session))
    }

    /// Current progress. Waits for the actor.
    pub fn status(&self) -> HostResult<DisplayStatus> {
        let (reply, answer) = bounded(1);
        self.send(DisplayMessage::Status { reply })?;
        answer.recv().map_err(|_| HostError::Disconnected(self.session))
    }

    /// Copy of the current canvas. Waits for the actor.
    pub fn capture(&self) -> HostResult<CanvasSnapshot> {
        let (reply, answer) = bounded(1);
        self.send(DisplayMessage::Capture { reply })?;
        answer.recv().map_err(|_| HostError::Disconnected(self.session))
    }

    /// Asks the actor to persist and stop, then waits for its thread.
    /// Safe to call more than once.
    pub fn detach(&self) {
        let Some(thread) = self.thread.lock().take() else {
            return;
        };
        // Already gone if this fails; the join below still reaps it.
        let _ = self.sender.send(DisplayMessage::Detach);
        if thread.join().is_err() {
            tracing::warn!("Display {} actor panicked", self.session);
        }
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.detach();
    }
}
