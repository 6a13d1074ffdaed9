use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::assets::decode::{OutputFormat, encode_rgba8};
use crate::composite::blend::blend_pixel;
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::layout::engine::LayoutCalculation;
use crate::raster::resample::resize;

/// Encoded output of one (logo, preset) composite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeResult {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// `bytes.len()`.
    pub byte_size: usize,
}

/// Alpha-blend `logo` onto `canvas` with its top-left corner at `(x, y)`.
///
/// Logo pixels outside the canvas are clipped. Canvas pixels the logo does not cover, or
/// covers only with fully transparent pixels, keep their exact bytes.
pub fn overlay(canvas: &mut RgbaImage, logo: &RgbaImage, x: i32, y: i32) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (lw, lh) = (i64::from(logo.width()), i64::from(logo.height()));
    let (x, y) = (i64::from(x), i64::from(y));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + lw).min(cw);
    let y1 = (y + lh).min(ch);
    if x0 >= x1 || y0 >= y1 {
        tracing::debug!(x, y, "logo lies entirely outside the canvas");
        return;
    }

    // Bounds above keep every coordinate inside both images and in u32 range.
    for row in y0..y1 {
        for col in x0..x1 {
            let src = *logo.get_pixel((col - x) as u32, (row - y) as u32);
            blend_pixel(canvas.get_pixel_mut(col as u32, row as u32), src);
        }
    }
}

/// Merge a prepared logo onto `background` at the layout position and encode.
///
/// `logo` must already be `layout.logo_width x layout.logo_height`. A background of a
/// different size is resampled to the canvas first.
#[tracing::instrument(skip(background, logo, layout), fields(
    canvas_w = layout.canvas_width,
    canvas_h = layout.canvas_height,
))]
pub fn composite_images(
    background: &RgbaImage,
    logo: &RgbaImage,
    layout: &LayoutCalculation,
    format: OutputFormat,
    quality: u8,
) -> LogofitResult<CompositeResult> {
    let declared = (layout.logo_width, layout.logo_height);
    if logo.dimensions() != declared {
        return Err(LogofitError::mismatch(declared, logo.dimensions()));
    }

    let canvas_size = (layout.canvas_width, layout.canvas_height);
    let mut canvas = if background.dimensions() == canvas_size {
        background.clone()
    } else {
        tracing::debug!(
            from = ?background.dimensions(),
            to = ?canvas_size,
            "resampling background to canvas"
        );
        resize(background, canvas_size.0, canvas_size.1)?
    };

    overlay(&mut canvas, logo, layout.logo_x, layout.logo_y);
    let bytes = encode_rgba8(&canvas, format, quality)?;
    let byte_size = bytes.len();
    tracing::debug!(byte_size, ?format, "composite encoded");
    Ok(CompositeResult {
        bytes,
        format,
        width: canvas.width(),
        height: canvas.height(),
        byte_size,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
