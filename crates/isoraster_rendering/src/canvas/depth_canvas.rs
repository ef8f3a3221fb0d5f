//! The colour + depth raster a display shows.
//!
//! Depth is the tile depth layer a pixel was drawn at. Smaller is nearer.
//! [`DepthCanvas::VOID_DEPTH`] marks a pixel nothing has been drawn to yet.

use super::sprite::{BrushMask, Sprite};
use isoraster_cache::{CacheResult, CanvasSnapshot};
use isoraster_shared::Rgba;

/// Axis-aligned pixel rectangle, usually a sprite footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// True if pixel `(x, y)` lies inside.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width as i32 && y - self.y < self.height as i32
    }
}

/// Fixed-size colour and depth buffers.
#[derive(Clone, Debug)]
pub struct DepthCanvas {
    width: u32,
    height: u32,
    colors: Vec<Rgba>,
    depths: Vec<i16>,
    draw_depth: i16,
    brush: Option<BrushMask>,
    draw_calls: u64,
}

impl DepthCanvas {
    /// Depth of a pixel nothing has been drawn to.
    pub const VOID_DEPTH: i16 = i16::MAX;

    /// Creates a canvas with every pixel void and transparent.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            colors: vec![Rgba::TRANSPARENT; len],
            depths: vec![Self::VOID_DEPTH; len],
            draw_depth: 0,
            brush: None,
            draw_calls: 0,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major colours.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Row-major depths.
    #[must_use]
    pub fn depths(&self) -> &[i16] {
        &self.depths
    }

    /// Number of draw calls since creation.
    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Sets the mask applied to every sprite drawn from now on.
    pub fn set_brush(&mut self, brush: Option<BrushMask>) {
        self.brush = brush;
    }

    /// Current brush mask.
    #[must_use]
    pub const fn brush(&self) -> Option<&BrushMask> {
        self.brush.as_ref()
    }

    /// Sets the depth written by subsequent draws. Clamped below the void.
    pub fn set_draw_depth(&mut self, depth: i32) {
        self.draw_depth = depth.clamp(i32::from(i16::MIN), i32::from(Self::VOID_DEPTH) - 1) as i16;
    }

    /// Depth written by draws.
    #[must_use]
    pub const fn draw_depth(&self) -> i16 {
        self.draw_depth
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Depth at `(x, y)`, or `None` off the canvas.
    #[must_use]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<i16> {
        self.index(x, y).map(|i| self.depths[i])
    }

    /// Colour at `(x, y)`, or `None` off the canvas.
    #[must_use]
    pub fn color_at(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.colors[i])
    }

    fn masked(&self, sx: u32, sy: u32) -> bool {
        self.brush.as_ref().map_or(true, |mask| mask.covers(sx as i32, sy as i32))
    }

    /// Draws `sprite` with its top-left corner at `(x, y)`.
    ///
    /// Opaque, masked pixels are written where the draw depth is nearer than
    /// what is already there. A tie keeps the pixel drawn first, which is why
    /// a layer is drawn top row first. Transparent pixels leave the canvas
    /// alone.
    pub fn draw(&mut self, sprite: &Sprite, x: i32, y: i32) {
        self.blit(sprite, x, y, None);
    }

    /// Like [`DepthCanvas::draw`], but only pixels inside `clip` change.
    pub fn draw_clipped(&mut self, sprite: &Sprite, x: i32, y: i32, clip: PixelRect) {
        self.blit(sprite, x, y, Some(clip));
    }

    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32, clip: Option<PixelRect>) {
        self.draw_calls += 1;
        let depth = self.draw_depth;

        for sy in 0..sprite.height() {
            for sx in 0..sprite.width() {
                let (px, py) = (x + sx as i32, y + sy as i32);
                if clip.is_some_and(|rect| !rect.contains(px, py)) {
                    continue;
                }
                let Some(i) = self.index(px, py) else { continue };
                if !self.masked(sx, sy) {
                    continue;
                }
                let color = sprite.pixels()[(sy * sprite.width() + sx) as usize];
                if color.is_opaque() && depth < self.depths[i] {
                    self.colors[i] = color;
                    self.depths[i] = depth;
                }
            }
        }
    }

    /// Sends every masked pixel of `rect` that was drawn at exactly the draw
    /// depth back to void.
    ///
    /// Used when a tile's block changed: whatever its layer painted there has
    /// to be worked out again.
    pub fn clear_draw_depth(&mut self, rect: PixelRect) {
        let depth = self.draw_depth;
        for sy in 0..rect.height {
            for sx in 0..rect.width {
                if !self.masked(sx, sy) {
                    continue;
                }
                let Some(i) = self.index(rect.x + sx as i32, rect.y + sy as i32) else { continue };
                if self.depths[i] == depth {
                    self.colors[i] = Rgba::TRANSPARENT;
                    self.depths[i] = Self::VOID_DEPTH;
                }
            }
        }
    }

    /// True if any masked, on-canvas pixel of the `w` x `h` box at `(x, y)`
    /// is still void.
    #[must_use]
    pub fn has_more_depth(&self, x: i32, y: i32, w: u32, h: u32) -> bool {
        for sy in 0..h {
            for sx in 0..w {
                if !self.masked(sx, sy) {
                    continue;
                }
                if let Some(i) = self.index(x + sx as i32, y + sy as i32) {
                    if self.depths[i] == Self::VOID_DEPTH {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// True if any pixel on the canvas is still void.
    #[must_use]
    pub fn has_more_depth_anywhere(&self) -> bool {
        self.depths.iter().any(|&d| d == Self::VOID_DEPTH)
    }

    /// Shifts colours and depths by `(dx, dy)` pixels.
    ///
    /// Pixels pushed off the canvas are dropped; revealed pixels are void.
    pub fn move_pixels(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let (w, h) = (self.width as i32, self.height as i32);
        let mut colors = vec![Rgba::TRANSPARENT; self.colors.len()];
        let mut depths = vec![Self::VOID_DEPTH; self.depths.len()];

        for y in 0..h {
            let src_y = y - dy;
            if src_y < 0 || src_y >= h {
                continue;
            }
            for x in 0..w {
                let src_x = x - dx;
                if src_x < 0 || src_x >= w {
                    continue;
                }
                let dst = (y * w + x) as usize;
                let src = (src_y * w + src_x) as usize;
                colors[dst] = self.colors[src];
                depths[dst] = self.depths[src];
            }
        }

        self.colors = colors;
        self.depths = depths;
    }

    /// Adds `delta` to every drawn depth. Void stays void.
    pub fn shift_depths(&mut self, delta: i32) {
        let max = i32::from(Self::VOID_DEPTH) - 1;
        for depth in &mut self.depths {
            if *depth != Self::VOID_DEPTH {
                *depth = (i32::from(*depth) + delta).clamp(i32::from(i16::MIN), max) as i16;
            }
        }
    }

    /// Marks every pixel void without touching colours.
    pub fn clear_depth_buffer(&mut self) {
        self.depths.fill(Self::VOID_DEPTH);
    }

    /// Paints every pixel `color`.
    pub fn fill_background(&mut self, color: Rgba) {
        self.colors.fill(color);
    }

    /// Paints void pixels `color`. They stay void.
    pub fn fill_void(&mut self, color: Rgba) {
        for (c, &d) in self.colors.iter_mut().zip(&self.depths) {
            if d == Self::VOID_DEPTH {
                *c = color;
            }
        }
    }

    /// Copies the buffers out for persistence.
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width,
            height: self.height,
            colors: self.colors.clone(),
            depths: self.depths.clone(),
        }
    }

    /// Replaces the buffers with a persisted snapshot of the same size.
    pub fn restore(&mut self, snapshot: &CanvasSnapshot) -> CacheResult<()> {
        snapshot.check_dimensions(self.width, self.height)?;
        self.colors.copy_from_slice(&snapshot.colors);
        self.depths.copy_from_slice(&snapshot.depths);
        Ok(())
    }
}
