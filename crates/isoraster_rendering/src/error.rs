//! # Render Error Types
//!
//! The render path itself is infallible. Errors come from configuration and
//! from the persistence layer, and only at the edges.

use isoraster_cache::CacheError;
use thiserror::Error;

/// Errors raised by the render core.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Configuration could not be read or parsed.
    #[error("invalid render configuration: {0}")]
    Config(String),

    /// Canvas dimensions are unusable.
    #[error("invalid canvas size {width}x{height}: dimensions must be non-zero and even")]
    InvalidCanvasSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Persisting or restoring display state failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
