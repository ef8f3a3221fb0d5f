//! # File-Backed Cache
//!
//! One directory, two files per session:
//!
//! - `<session>.isoc`: the canvas snapshot (see `snapshot`)
//! - `<session>.toml`: the viewport properties
//!
//! Writes go to a temporary file first and are renamed into place, so a crash
//! mid-write leaves the previous version intact.

use crate::error::CacheResult;
use crate::snapshot::CanvasSnapshot;
use crate::{CanvasCache, PropertyStore};
use isoraster_shared::{SessionId, ViewportProperties};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Snapshot file extension.
const CANVAS_EXTENSION: &str = "isoc";

/// Properties file extension.
const PROPERTIES_EXTENSION: &str = "toml";

/// Directory-backed store for snapshots and properties.
#[derive(Debug)]
pub struct FileCache {
    /// Root directory.
    root: PathBuf,
    /// Serializes writers so two saves never race on the same temp file.
    write_lock: Mutex<()>,
}

impl FileCache {
    /// Opens (creating if needed) a cache rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> CacheResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::debug!("Canvas cache opened at {}", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of this cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `session`'s snapshot file.
    #[must_use]
    pub fn canvas_path(&self, session: SessionId) -> PathBuf {
        self.root.join(format!("{session}.{CANVAS_EXTENSION}"))
    }

    /// Path of `session`'s properties file.
    #[must_use]
    pub fn properties_path(&self, session: SessionId) -> PathBuf {
        self.root.join(format!("{session}.{PROPERTIES_EXTENSION}"))
    }

    /// Reads a whole file, mapping "not found" to `None`.
    fn read_optional(path: &Path) -> CacheResult<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `bytes` to `path` through a temp file and a rename.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> CacheResult<()> {
        let _guard = self.write_lock.lock();
        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            writer.write_all(bytes)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl CanvasCache for FileCache {
    fn load_canvas(&self, session: SessionId) -> CacheResult<Option<CanvasSnapshot>> {
        Self::read_optional(&self.canvas_path(session))?
            .map(|bytes| CanvasSnapshot::decode(&bytes))
            .transpose()
    }

    fn save_canvas(&self, session: SessionId, snapshot: &CanvasSnapshot) -> CacheResult<()> {
        self.write_atomic(&self.canvas_path(session), &snapshot.encode())
    }
}

impl PropertyStore for FileCache {
    fn load_properties(&self, session: SessionId) -> CacheResult<Option<ViewportProperties>> {
        let Some(bytes) = Self::read_optional(&self.properties_path(session))? else {
            return Ok(None);
        };
        let text = String::from_utf8_lossy(&bytes);
        Ok(Some(toml::from_str(&text)?))
    }

    fn save_properties(&self, session: SessionId, properties: &ViewportProperties) -> CacheResult<()> {
        let text = toml::to_string(properties)?;
        self.write_atomic(&self.properties_path(session), text.as_bytes())
    }
}
