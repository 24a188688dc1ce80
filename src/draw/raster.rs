use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to parse SVG: {0}")]
    Parse(#[from] resvg::usvg::Error),
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
}

/// Rasterize SVG markup at `scale` over an opaque or transparent `background`.
pub fn rasterize(svg: &str, scale: f32, background: Rgba<u8>) -> Result<RgbaImage, RenderError> {
    let tree = Tree::from_str(svg, &Options::default())?;
    let size = tree.size();

    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;

    let [r, g, b, a] = background.0;
    pixmap.fill(Color::from_rgba8(r, g, b, a));
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let mut image = RgbaImage::new(width, height);
    for (pixel, out) in pixmap.pixels().iter().zip(image.pixels_mut()) {
        let color = pixel.demultiply();
        *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(image)
}

/// Number of pixels that differ from `background`.
pub fn painted_pixels(image: &RgbaImage, background: Rgba<u8>) -> usize {
    image.pixels().filter(|pixel| **pixel != background).count()
}
