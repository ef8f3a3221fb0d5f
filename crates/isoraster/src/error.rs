//! # Host Error Types

use isoraster_cache::CacheError;
use isoraster_rendering::RenderError;
use isoraster_shared::SessionId;
use thiserror::Error;

/// Errors raised by the display host.
#[derive(Error, Debug)]
pub enum HostError {
    /// Host configuration could not be read or parsed.
    #[error("invalid host configuration: {0}")]
    Config(String),

    /// A display could not be created.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The snapshot store could not be opened.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Spawning a thread failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or writing an image failed.
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    /// A session is already attached.
    #[error("display {0} is already attached")]
    AlreadyAttached(SessionId),

    /// The display's actor has stopped.
    #[error("display {0} is no longer running")]
    Disconnected(SessionId),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
