use anyhow::anyhow;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{BoundingBox, Point};
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::foundation::math::luma;
use crate::mask::filters::sobel_magnitude;
use crate::mask::generator::{MaskOptions, generate_mask};
use crate::raster::resample::resample_region;

/// Strategy used to pick the crop rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    /// Largest target-aspect rectangle centered in the source.
    #[default]
    Center,
    /// Smallest target-aspect rectangle containing the alpha-mask content.
    Smart,
    /// Center-sized rectangle moved onto the window with the most gradient energy.
    Attention,
}

/// Crop configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropOptions {
    /// Rectangle selection strategy.
    pub mode: CropMode,
    /// Smart-mode padding: `0 < p < 1` is a fraction of the longer source side, `p >= 1`
    /// is pixels.
    pub padding: Option<f64>,
}

/// Crop rectangle in source pixel coordinates.
///
/// Always inside the source bounds and matching the requested aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl CropSpec {
    /// The rectangle as a [`BoundingBox`].
    pub fn to_box(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    /// Center point.
    pub fn center(&self) -> Point {
        self.to_box().center()
    }
}

// Window side for attention scanning is min(W, H) / this.
const ATTENTION_WINDOW_DIVISOR: u32 = 4;

/// Pick a crop rectangle and resample it to exactly `target_width x target_height`.
///
/// Cropping is best-effort: a failing smart or attention heuristic falls back to
/// [`CropMode::Center`] instead of failing.
#[tracing::instrument(skip(img), fields(src_w = img.width(), src_h = img.height()))]
pub fn crop_image(
    img: &RgbaImage,
    target_width: u32,
    target_height: u32,
    opts: &CropOptions,
) -> LogofitResult<(CropSpec, RgbaImage)> {
    LogofitError::check_target(target_width, target_height)?;
    let (sw, sh) = img.dimensions();
    if sw == 0 || sh == 0 {
        return Err(LogofitError::dimensions("cannot crop an empty image"));
    }

    if (sw, sh) == (target_width, target_height) {
        let spec = center_crop_spec(sw, sh, target_width, target_height);
        return Ok((spec, img.clone()));
    }

    let spec = match opts.mode {
        CropMode::Center => center_crop_spec(sw, sh, target_width, target_height),
        CropMode::Smart => match smart_crop_spec(img, target_width, target_height, opts.padding) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(error = %e, "smart crop failed; falling back to center");
                center_crop_spec(sw, sh, target_width, target_height)
            }
        },
        CropMode::Attention => match attention_crop_spec(img, target_width, target_height) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!(error = %e, "attention crop failed; falling back to center");
                center_crop_spec(sw, sh, target_width, target_height)
            }
        },
    };
    tracing::debug!(?spec, mode = ?opts.mode, "crop rectangle");

    let out = resample_region(img, spec.to_box(), target_width, target_height)?;
    Ok((spec, out))
}

/// Largest rectangle of the target aspect ratio centered in a `sw x sh` source.
pub fn center_crop_spec(sw: u32, sh: u32, target_width: u32, target_height: u32) -> CropSpec {
    let (sw, sh) = (f64::from(sw), f64::from(sh));
    let (w, h) = largest_fit(sw, sh, aspect(target_width, target_height));
    CropSpec {
        x: (sw - w) * 0.5,
        y: (sh - h) * 0.5,
        width: w,
        height: h,
    }
}

/// Smallest target-aspect rectangle containing the padded mask content, centered on it.
pub fn smart_crop_spec(
    img: &RgbaImage,
    target_width: u32,
    target_height: u32,
    padding: Option<f64>,
) -> LogofitResult<CropSpec> {
    let (sw, sh) = img.dimensions();
    let mask = generate_mask(img, &MaskOptions::default())?;
    let content = mask
        .bounding_box()
        .ok_or_else(|| anyhow!("mask has no content"))?;

    let bounds = BoundingBox::from_size(f64::from(sw), f64::from(sh));
    let pad = padding_px(padding, sw, sh);
    let padded = content.inflate(pad).intersect(&bounds).unwrap_or(bounds);

    Ok(place_around(
        padded.center(),
        padded.width,
        padded.height,
        aspect(target_width, target_height),
        f64::from(sw),
        f64::from(sh),
    ))
}

/// Center-sized rectangle re-centered on the window with the largest gradient energy.
pub fn attention_crop_spec(
    img: &RgbaImage,
    target_width: u32,
    target_height: u32,
) -> LogofitResult<CropSpec> {
    let (sw, sh) = img.dimensions();
    let gray: Vec<f32> = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            luma(r, g, b) * f32::from(a) / 255.0
        })
        .collect();
    let grad = sobel_magnitude(&gray, sw, sh);
    if grad.iter().any(|g| !g.is_finite()) {
        return Err(anyhow!("gradient map contains non-finite values").into());
    }

    let table = SummedArea::new(&grad, sw, sh);
    if table.total() <= 0.0 {
        return Err(anyhow!("image has no gradient energy").into());
    }

    let win = (sw.min(sh) / ATTENTION_WINDOW_DIVISOR).max(1);
    let stride = (win / 4).max(1) as usize;
    let mut best: Option<(f64, u32, u32)> = None;
    for y in (0..=sh - win).step_by(stride) {
        for x in (0..=sw - win).step_by(stride) {
            let sum = table.window(x, y, win);
            if best.is_none_or(|(b, _, _)| sum > b) {
                best = Some((sum, x, y));
            }
        }
    }
    let (_, bx, by) = best.ok_or_else(|| anyhow!("no attention window fits the image"))?;
    let half = f64::from(win) * 0.5;
    let centroid = Point::new(f64::from(bx) + half, f64::from(by) + half);

    let (sw, sh) = (f64::from(sw), f64::from(sh));
    let (w, h) = largest_fit(sw, sh, aspect(target_width, target_height));
    Ok(clamp_centered(centroid, w, h, sw, sh))
}

fn aspect(width: u32, height: u32) -> f64 {
    f64::from(width) / f64::from(height)
}

fn largest_fit(sw: f64, sh: f64, ratio: f64) -> (f64, f64) {
    if sw / sh > ratio {
        (sh * ratio, sh)
    } else {
        (sw, (sw / ratio).min(sh))
    }
}

fn padding_px(padding: Option<f64>, sw: u32, sh: u32) -> f64 {
    match padding {
        Some(p) if p.is_finite() && p > 0.0 && p < 1.0 => p * f64::from(sw.max(sh)),
        Some(p) if p.is_finite() && p >= 1.0 => p,
        _ => 0.0,
    }
}

/// Smallest `ratio` rectangle containing `min_w x min_h`, shrunk to fit the source when
/// needed, centered on `center` and clamped inside the source.
fn place_around(center: Point, min_w: f64, min_h: f64, ratio: f64, sw: f64, sh: f64) -> CropSpec {
    let (mut w, mut h) = (min_w.max(1.0), min_h.max(1.0));
    if w / h < ratio {
        w = h * ratio;
    } else {
        h = w / ratio;
    }
    if w > sw {
        w = sw;
        h = w / ratio;
    }
    if h > sh {
        h = sh;
        w = h * ratio;
    }
    clamp_centered(center, w, h, sw, sh)
}

fn clamp_centered(center: Point, w: f64, h: f64, sw: f64, sh: f64) -> CropSpec {
    CropSpec {
        x: (center.x - w * 0.5).clamp(0.0, (sw - w).max(0.0)),
        y: (center.y - h * 0.5).clamp(0.0, (sh - h).max(0.0)),
        width: w,
        height: h,
    }
}

/// Summed-area table for O(1) window sums.
struct SummedArea {
    stride: usize,
    sums: Vec<f64>,
}

impl SummedArea {
    fn new(values: &[f32], width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        let stride = w + 1;
        let mut sums = vec![0f64; stride * (h + 1)];
        for y in 0..h {
            let mut row = 0f64;
            for x in 0..w {
                row += f64::from(values[y * w + x]);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self { stride, sums }
    }

    fn total(&self) -> f64 {
        self.sums.last().copied().unwrap_or(0.0)
    }

    fn window(&self, x: u32, y: u32, size: u32) -> f64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + size as usize, y0 + size as usize);
        let at = |x: usize, y: usize| self.sums[y * self.stride + x];
        at(x1, y1) - at(x0, y1) - at(x1, y0) + at(x0, y0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/cropper.rs"]
mod tests;
