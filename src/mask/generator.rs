use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::foundation::core::BoundingBox;
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::foundation::math::mul_div255_u8;
use crate::mask::filters;

/// Mask values above this count as content for the bounding box and coverage.
pub const CONTENT_THRESHOLD: u8 = 10;

/// Knobs for [`generate_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Blend a Sobel edge pass back into the mask.
    pub edge_detection: bool,
    /// Binarization threshold on alpha.
    pub threshold: u8,
    /// Gaussian blur radius in pixels applied before binarizing; `0` disables it.
    pub blur: u32,
    /// Number of 3x3 dilation passes.
    pub dilate: u32,
    /// Number of 3x3 erosion passes, run after dilation.
    pub erode: u32,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            edge_detection: true,
            threshold: CONTENT_THRESHOLD,
            blur: 0,
            dilate: 0,
            erode: 0,
        }
    }
}

/// Single-channel coverage buffer with derived content statistics.
///
/// Masks are values: every transformation returns a new mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
    bounding_box: Option<BoundingBox>,
    coverage: f64,
}

impl Mask {
    /// Wrap a row-major `width * height` buffer and compute its statistics.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> LogofitResult<Self> {
        if width == 0 || height == 0 {
            return Err(LogofitError::dimensions(format!(
                "mask must be non-empty, got {width}x{height}"
            )));
        }
        if data.len() != filters::expected_len(width, height)? {
            return Err(LogofitError::dimensions(format!(
                "mask buffer has {} values, expected {width}x{height}",
                data.len()
            )));
        }
        let (bounding_box, coverage) = content_stats(&data, width, height);
        Ok(Self {
            width,
            height,
            data,
            bounding_box,
            coverage,
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major coverage values.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Coverage value at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Box of pixels above [`CONTENT_THRESHOLD`]; `None` when nothing qualifies.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    /// Percentage of pixels above [`CONTENT_THRESHOLD`], in `0.0..=100.0`.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// `255 - v` for every pixel.
    pub fn invert(&self) -> Self {
        self.map_data(self.data.iter().map(|&v| 255 - v).collect())
    }

    /// `iterations` passes of 3x3 max filtering.
    pub fn dilate(&self, iterations: u32) -> Self {
        let mut data = self.data.clone();
        for _ in 0..iterations {
            data = filters::dilate(&data, self.width, self.height);
        }
        self.map_data(data)
    }

    /// `iterations` passes of 3x3 min filtering.
    pub fn erode(&self, iterations: u32) -> Self {
        let mut data = self.data.clone();
        for _ in 0..iterations {
            data = filters::erode(&data, self.width, self.height);
        }
        self.map_data(data)
    }

    /// Grayscale image view of the mask.
    pub fn to_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width, self.height, |x, y| image::Luma([self.get(x, y)]))
    }

    fn map_data(&self, data: Vec<u8>) -> Self {
        let (bounding_box, coverage) = content_stats(&data, self.width, self.height);
        Self {
            width: self.width,
            height: self.height,
            data,
            bounding_box,
            coverage,
        }
    }
}

/// Derive a coverage mask from an image's alpha channel.
///
/// Stages run in a fixed order: blur, binarize, dilate, erode, edge enhancement.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn generate_mask(img: &RgbaImage, opts: &MaskOptions) -> LogofitResult<Mask> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(LogofitError::dimensions("cannot build a mask for an empty image"));
    }

    let alpha: Vec<u8> = img.pixels().map(|p| p.0[3]).collect();
    let smoothed = filters::gaussian_blur(&alpha, w, h, opts.blur)?;
    let mut data = filters::binarize(&smoothed, opts.threshold);
    for _ in 0..opts.dilate {
        data = filters::dilate(&data, w, h);
    }
    for _ in 0..opts.erode {
        data = filters::erode(&data, w, h);
    }
    if opts.edge_detection {
        data = filters::enhance_edges(&data, w, h);
    }

    let mask = Mask::from_raw(w, h, data)?;
    tracing::debug!(
        coverage = mask.coverage(),
        bbox = ?mask.bounding_box(),
        "mask generated"
    );
    Ok(mask)
}

/// Multiply the image's alpha by the mask (destination-in).
pub fn apply_mask(img: &RgbaImage, mask: &Mask) -> LogofitResult<RgbaImage> {
    if img.dimensions() != (mask.width, mask.height) {
        return Err(LogofitError::mismatch(
            (mask.width, mask.height),
            img.dimensions(),
        ));
    }
    let mut out = img.clone();
    for (px, &m) in out.pixels_mut().zip(&mask.data) {
        px.0[3] = mul_div255_u8(u16::from(px.0[3]), u16::from(m));
    }
    Ok(out)
}

fn content_stats(data: &[u8], width: u32, height: u32) -> (Option<BoundingBox>, f64) {
    let w = width as usize;
    let mut count = 0usize;
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
    for (i, &v) in data.iter().enumerate() {
        if v <= CONTENT_THRESHOLD {
            continue;
        }
        let (x, y) = (i % w, i / w);
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
        count += 1;
    }

    let total = (width as usize) * (height as usize);
    let coverage = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    let bbox = (count > 0).then(|| {
        BoundingBox::new(
            x0 as f64,
            y0 as f64,
            (x1 - x0 + 1) as f64,
            (y1 - y0 + 1) as f64,
        )
    });
    (bbox, coverage)
}

#[cfg(test)]
#[path = "../../tests/unit/mask/generator.rs"]
mod tests;
