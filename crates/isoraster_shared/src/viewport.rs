//! Persisted viewport configuration.

use crate::facing::Facing;
use crate::math::{BlockPos, WorldId};
use crate::zoom::ZoomLevel;
use serde::{Deserialize, Serialize};

/// Everything a display needs to come back to the same view after a restart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportProperties {
    /// World the viewport looks into
    pub world: WorldId,
    /// View direction
    pub facing: Facing,
    /// Zoom level
    pub zoom: ZoomLevel,
    /// Whether the cached canvas was fully rendered when it was saved
    pub finished_rendering: bool,
    /// Block the projection is anchored to. Last, so TOML writes it as a table.
    pub anchor: BlockPos,
}

impl ViewportProperties {
    /// Properties for a fresh viewport anchored at `anchor`.
    #[must_use]
    pub const fn anchored(world: WorldId, anchor: BlockPos, facing: Facing, zoom: ZoomLevel) -> Self {
        Self {
            world,
            anchor,
            facing,
            zoom,
            finished_rendering: false,
        }
    }
}
