//! # Display Host
//!
//! Owns the shared services, spawns one actor per attached display and
//! drives them all from a single ticker thread.

use crate::config::HostConfig;
use crate::error::{HostError, HostResult};
use crate::runtime::actor::{DisplayActor, DisplayHandle};
use crate::runtime::registry::DisplayRegistry;
use crossbeam_channel::{bounded, select, Sender};
use isoraster_cache::{CanvasCache, FileCache, MemoryCache, PropertyStore};
use isoraster_rendering::{DisplayServices, IsoDisplay, LightSampler, SpriteSource};
use isoraster_shared::{BlockPos, SessionId, WorldId};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Background thread sending a tick to every display each interval.
struct Ticker {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

/// Spawns, drives and stops display actors.
pub struct DisplayHost {
    config: HostConfig,
    services: DisplayServices,
    registry: Arc<DisplayRegistry>,
    ticker: Option<Ticker>,
}

impl DisplayHost {
    /// Creates a host whose displays persist under `config.cache_dir`, or in
    /// memory when it is unset.
    pub fn new(
        config: HostConfig,
        sprites: Arc<dyn SpriteSource>,
        light: Option<Arc<dyn LightSampler>>,
    ) -> HostResult<Self> {
        let (canvases, properties): (Arc<dyn CanvasCache>, Arc<dyn PropertyStore>) = match &config.cache_dir {
            Some(dir) => {
                let cache = Arc::new(FileCache::open(dir)?);
                (cache.clone(), cache)
            }
            None => {
                let cache = Arc::new(MemoryCache::new());
                (cache.clone(), cache)
            }
        };
        Self::with_services(config, DisplayServices { sprites, light, canvases, properties })
    }

    /// Creates a host with explicit services.
    pub fn with_services(config: HostConfig, services: DisplayServices) -> HostResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            services,
            registry: Arc::new(DisplayRegistry::new()),
            ticker: None,
        })
    }

    /// Host configuration.
    #[must_use]
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Attached displays.
    #[must_use]
    pub const fn registry(&self) -> &Arc<DisplayRegistry> {
        &self.registry
    }

    // =========================================================================
    // DISPLAYS
    // =========================================================================

    /// Creates a display for `session`, attaches it and starts its actor.
    /// `owner_position` anchors the view if the session has no stored one.
    pub fn attach(&self, session: SessionId, world: WorldId, owner_position: BlockPos) -> HostResult<Arc<DisplayHandle>> {
        if self.registry.contains(session) {
            return Err(HostError::AlreadyAttached(session));
        }
        let display = IsoDisplay::new(session, self.config.render.clone(), self.services.clone())?;
        let handle = Arc::new(DisplayActor::spawn(display, world, owner_position, self.config.mailbox_capacity)?);
        self.registry.insert(Arc::clone(&handle));
        tracing::info!("Host: {} displays attached", self.registry.len());
        Ok(handle)
    }

    /// Persists and stops a display. Returns false if it was not attached.
    pub fn detach(&self, session: SessionId) -> bool {
        match self.registry.remove(session) {
            Some(handle) => {
                handle.detach();
                true
            }
            None => false,
        }
    }

    /// Tells every display looking into `world` that a block changed.
    pub fn broadcast_block_change(&self, world: WorldId, pos: BlockPos) -> usize {
        self.registry.broadcast_block_change(world, pos)
    }

    /// Sends one tick to every display, without the ticker.
    pub fn tick_all(&self) -> usize {
        self.registry.tick_all()
    }

    // =========================================================================
    // TICKER
    // =========================================================================

    /// Starts sending ticks every `tick_interval_ms`. Does nothing if already
    /// running.
    pub fn start_ticker(&mut self) -> HostResult<()> {
        if self.ticker.is_some() {
            return Ok(());
        }
        let (stop, stopped) = bounded::<()>(0);
        let ticks = crossbeam_channel::tick(self.config.tick_interval());
        let registry = Arc::clone(&self.registry);
        let thread = std::thread::Builder::new().name("isoraster-ticker".to_string()).spawn(move || loop {
            select! {
                recv(ticks) -> _ => {
                    registry.tick_all();
                }
                // Disconnects when the host drops the sender.
                recv(stopped) -> _ => break,
            }
        })?;
        self.ticker = Some(Ticker { stop, thread });
        tracing::info!("Host: ticking every {}ms", self.config.tick_interval_ms);
        Ok(())
    }

    /// Stops the ticker and waits for it.
    pub fn stop_ticker(&mut self) {
        if let Some(Ticker { stop, thread }) = self.ticker.take() {
            drop(stop);
            if thread.join().is_err() {
                tracing::warn!("Host: ticker panicked");
            }
        }
    }

    /// True while the ticker runs.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stops the ticker and detaches every display.
    pub fn shutdown(mut self) {
        self.stop_all();
    }

    fn stop_all(&mut self) {
        self.stop_ticker();
        let displays = self.registry.drain();
        let count = displays.len();
        for handle in displays {
            handle.detach();
        }
        if count > 0 {
            tracing::info!("Host: detached {} displays", count);
        }
    }
}

impl Drop for DisplayHost {
    fn drop(&mut self) {
        self.stop_all();
    }
}
