//! Rendering statistics.

/// Result of one display tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Dirty tiles recomposited before the forward render
    pub dirty_tiles: u32,
    /// Depth layers processed
    pub layers: u32,
    /// Tiles composited by the forward render
    pub tiles: u32,
    /// Rendering completed during this tick
    pub completed: bool,
    /// Wall-clock time spent (microseconds)
    pub elapsed_us: u64,
}

/// Accumulated statistics for one display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Ticks seen since attach
    pub total_ticks: u64,
    /// Ticks that did render work since the last reset
    pub render_ticks: u64,
    /// Depth layers processed since attach
    pub layers_composited: u64,
    /// Tiles composited by forward renders since attach
    pub tiles_composited: u64,
    /// Dirty tiles recomposited since attach
    pub dirty_tiles_processed: u64,
    /// Snapshots persisted since attach
    pub snapshots_saved: u64,
    /// Slowest tick (microseconds)
    pub worst_tick_us: u64,
}

impl RenderStats {
    /// Folds one tick into the totals.
    pub fn record(&mut self, tick: &TickReport) {
        self.total_ticks += 1;
        if tick.layers > 0 || tick.dirty_tiles > 0 {
            self.render_ticks += 1;
        }
        self.layers_composited += u64::from(tick.layers);
        self.tiles_composited += u64::from(tick.tiles);
        self.dirty_tiles_processed += u64::from(tick.dirty_tiles);
        self.worst_tick_us = self.worst_tick_us.max(tick.elapsed_us);
    }

    /// Starts a new render: the render-tick counter goes back to zero.
    pub fn reset_render_ticks(&mut self) {
        self.render_ticks = 0;
    }

    /// Average tiles per rendering tick.
    #[must_use]
    pub fn tiles_per_render_tick(&self) -> f64 {
        if self.render_ticks == 0 {
            0.0
        } else {
            self.tiles_composited as f64 / self.render_ticks as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_ticks_are_not_render_ticks() {
        let mut stats = RenderStats::default();
        stats.record(&TickReport { layers: 2, tiles: 10, elapsed_us: 300, ..TickReport::default() });
        stats.record(&TickReport::default());
        assert_eq!(stats.total_ticks, 2);
        assert_eq!(stats.render_ticks, 1);
        assert_eq!(stats.worst_tick_us, 300);
        assert!((stats.tiles_per_render_tick() - 10.0).abs() < f64::EPSILON);

        stats.reset_render_ticks();
        assert_eq!(stats.render_ticks, 0);
        assert_eq!(stats.tiles_composited, 10);
    }
}
