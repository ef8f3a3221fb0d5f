//! Canvas primitives: the depth-buffered raster, sprites and brush masks.

mod depth_canvas;
mod sprite;

pub use depth_canvas::{DepthCanvas, PixelRect};
pub use sprite::{BrushMask, Sprite};
