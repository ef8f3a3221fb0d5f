//! Block sprites and the tile silhouette mask.

use isoraster_shared::{Rgba, ZoomLevel};

// =============================================================================
// SPRITE
// =============================================================================

/// A small RGBA image, one block's isometric appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Sprite {
    /// Creates a fully transparent sprite.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Creates a sprite of one colour.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wraps row-major pixels. `None` if the length does not match.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self { width, height, pixels })
    }

    /// Sprite sized for one block at `zoom`.
    #[must_use]
    pub fn for_zoom(zoom: ZoomLevel) -> Self {
        Self::new(zoom.sprite_width() as u32, zoom.sprite_height() as u32)
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

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the sprite.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Sets the pixel at `(x, y)`. Ignored outside the sprite.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Becomes a copy of `other`, reusing this sprite's allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.width = other.width;
        self.height = other.height;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }

    /// Scales every pixel's colour by `factor`, keeping alpha.
    pub fn modulate(&mut self, factor: f32) {
        for pixel in &mut self.pixels {
            *pixel = pixel.scaled(factor);
        }
    }
}

// =============================================================================
// BRUSH MASK
// =============================================================================

/// Which pixels of a sprite footprint belong to the tile.
///
/// Without a mask a sprite would stamp its whole bounding box, including the
/// corners that belong to neighbouring tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrushMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BrushMask {
    /// Mask covering the whole `width` x `height` box.
    #[must_use]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    /// The hexagonal outline of a cube sprite at `zoom`.
    ///
    /// Vertices, with `w` the column width and `h` the row height:
    /// `(w, 0) (2w, h) (2w, 2h) (w, 3h) (0, 2h) (0, h)`. A pixel is inside
    /// when its centre is.
    #[must_use]
    pub fn hexagon(zoom: ZoomLevel) -> Self {
        let cw = i64::from(zoom.column_width());
        let rh = i64::from(zoom.row_height());
        let width = (2 * cw) as u32;
        let height = (3 * rh) as u32;

        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..i64::from(height) {
            for x in 0..i64::from(width) {
                // Doubled coordinates of the pixel centre keep this in integers.
                let d = (2 * x + 1 - 2 * cw).abs();
                let y2 = 2 * y + 1;
                bits.push(y2 * cw >= d * rh && y2 * cw <= 6 * rh * cw - d * rh);
            }
        }

        Self { width, height, bits }
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

    /// True if `(x, y)` is inside the mask. Pixels outside the mask's box are
    /// not covered.
    #[must_use]
    pub fn covers(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_hexagon_shape() {
        let mask = BrushMask::hexagon(ZoomLevel::Tiny);
        let rows: Vec<String> = (0..3)
            .map(|y| (0..4).map(|x| if mask.covers(x, y) { 'X' } else { '.' }).collect())
            .collect();
        assert_eq!(rows, [".XX.", "XXXX", ".XX."]);
    }

    #[test]
    fn test_hexagon_is_symmetric_and_sized() {
        for zoom in ZoomLevel::ALL {
            let mask = BrushMask::hexagon(zoom);
            assert_eq!(mask.width() as i32, zoom.sprite_width());
            assert_eq!(mask.height() as i32, zoom.sprite_height());
            let (w, h) = (mask.width() as i32, mask.height() as i32);
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(mask.covers(x, y), mask.covers(w - 1 - x, y), "{zoom} {x},{y}");
                    assert_eq!(mask.covers(x, y), mask.covers(x, h - 1 - y), "{zoom} {x},{y}");
                }
            }
            // The middle row band is solid across.
            assert!((0..w).all(|x| mask.covers(x, h / 2)));
        }
    }

    #[test]
    fn test_mask_outside_box() {
        let mask = BrushMask::full(2, 2);
        assert!(mask.covers(1, 1));
        assert!(!mask.covers(-1, 0));
        assert!(!mask.covers(2, 0));
    }

    #[test]
    fn test_sprite_modulate() {
        let mut sprite = Sprite::filled(2, 2, Rgba::opaque(100, 200, 50));
        sprite.modulate(0.5);
        assert_eq!(sprite.get(1, 1), Some(Rgba::opaque(50, 100, 25)));
        assert_eq!(sprite.get(2, 0), None);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Sprite::from_pixels(2, 2, vec![Rgba::TRANSPARENT; 3]).is_none());
        assert!(Sprite::from_pixels(2, 2, vec![Rgba::TRANSPARENT; 4]).is_some());
    }
}
