//! # Cache Error Types
//!
//! Everything that can go wrong loading or saving a display's persisted state.

use thiserror::Error;

/// Errors raised by canvas caches and property stores.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying file operation failed.
    #[error("cache i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot does not start with the expected magic bytes.
    #[error("not a canvas snapshot (bad magic)")]
    BadMagic,

    /// Snapshot was written by a newer or older format.
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    /// Snapshot bytes do not match their checksum.
    #[error("snapshot checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the file.
        stored: u32,
        /// Checksum of the bytes actually read.
        computed: u32,
    },

    /// Snapshot ended before a declared section did.
    #[error("snapshot truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes the header promised.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// Snapshot dimensions do not match the canvas it is restored into.
    #[error("snapshot is {found_width}x{found_height}, canvas is {expected_width}x{expected_height}")]
    DimensionMismatch {
        /// Canvas width.
        expected_width: u32,
        /// Canvas height.
        expected_height: u32,
        /// Snapshot width.
        found_width: u32,
        /// Snapshot height.
        found_height: u32,
    },

    /// Compressed block could not be decoded.
    #[error("snapshot decompression failed: {0}")]
    Decompress(String),

    /// Properties file is not valid TOML for the expected shape.
    #[error("invalid viewport properties: {0}")]
    PropertiesParse(#[from] toml::de::Error),

    /// Properties could not be rendered as TOML.
    #[error("could not serialize viewport properties: {0}")]
    PropertiesSerialize(#[from] toml::ser::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
