//! Presentation: scenes painted by story views and their rasterization.

mod raster;
mod scene;

pub use raster::{RenderError, painted_pixels, rasterize};
pub use scene::{Group, PathElement, Scene, StrokeDash, ViewBox};
