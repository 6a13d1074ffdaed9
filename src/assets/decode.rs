use std::io::Cursor;

use anyhow::Context;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{LogofitError, LogofitResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Encoded output format of a composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy, quality-parameterized; alpha is flattened onto white.
    Jpeg,
    /// Lossless WebP, keeps transparency; quality is ignored.
    Webp,
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// `true` when the encoding keeps the alpha channel.
    pub fn preserves_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

/// Default quality used for lossy formats when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 90;

/// Decode any supported raster, rejecting zero-sized images.
pub fn decode_image(bytes: &[u8]) -> LogofitResult<DynamicImage> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    if img.width() == 0 || img.height() == 0 {
        return Err(LogofitError::dimensions(format!(
            "decoded image is {}x{}",
            img.width(),
            img.height()
        )));
    }
    Ok(img)
}

/// Decode into straight-alpha RGBA8.
pub fn decode_rgba8(bytes: &[u8]) -> LogofitResult<RgbaImage> {
    Ok(decode_image(bytes)?.to_rgba8())
}

/// Premultiplied copy of a straight-alpha image's pixels.
pub fn to_premul(img: &RgbaImage) -> Vec<u8> {
    let mut px = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut px);
    px
}

/// Straight-alpha image from premultiplied pixels.
pub fn from_premul(width: u32, height: u32, mut px: Vec<u8>) -> LogofitResult<RgbaImage> {
    unpremultiply_rgba8_in_place(&mut px);
    RgbaImage::from_raw(width, height, px)
        .ok_or_else(|| LogofitError::dimensions(format!("buffer does not hold {width}x{height} pixels")))
}

/// Encode as PNG.
pub fn encode_png(img: &RgbaImage) -> LogofitResult<Vec<u8>> {
    encode_rgba8(img, OutputFormat::Png, DEFAULT_QUALITY)
}

/// Encode into `format`; `quality` (clamped to 1..=100) only affects lossy formats.
pub fn encode_rgba8(img: &RgbaImage, format: OutputFormat, quality: u8) -> LogofitResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            DynamicImage::ImageRgba8(img.clone())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .context("encode png")?;
        }
        OutputFormat::Webp => {
            DynamicImage::ImageRgba8(img.clone())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::WebP)
                .context("encode webp")?;
        }
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_white(img);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
            encoder.encode_image(&rgb).context("encode jpeg")?;
        }
    }
    Ok(buf)
}

fn flatten_onto_white(img: &RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let a = u16::from(a);
        let blend = |c: u8| -> u8 {
            crate::foundation::math::mul_div255_u8(u16::from(c), a)
                + crate::foundation::math::mul_div255_u8(255, 255 - a)
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
