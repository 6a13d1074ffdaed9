use std::io::Cursor;

use anyhow::Context;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::assets::decode::decode_image;
use crate::foundation::core::BoundingBox;
use crate::foundation::error::{LogofitError, LogofitResult};

/// Side of the sampling grid used for color quantization.
pub const COLOR_SAMPLE_GRID: u32 = 50;
/// Samples with alpha below this are ignored for color ranking.
pub const MIN_SAMPLE_ALPHA: u8 = 25;
/// Maximum number of dominant colors reported.
pub const MAX_DOMINANT_COLORS: usize = 5;

// 3 bits per channel.
const CUBE_SHIFT: u32 = 5;
const CUBE_BINS: usize = 1 << (3 * (8 - CUBE_SHIFT));

/// One entry of the dominant-color palette.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    /// Mean color of the samples that fell into this bin.
    pub color: Color,
    /// Fraction of counted samples in this bin, in `0.0..=1.0`.
    pub share: f64,
}

/// Properties of a raster logo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterAnalysis {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Channel count of the decoded color type.
    pub channels: u8,
    /// `true` when the source carries an alpha channel.
    pub has_alpha: bool,
    /// Up to five colors ranked by frequency.
    pub dominant_colors: Vec<DominantColor>,
    /// Minimal rectangle enclosing non-transparent pixels, when it can be estimated.
    pub trim_box: Option<BoundingBox>,
}

impl RasterAnalysis {
    /// Full image rectangle.
    pub fn image_box(&self) -> BoundingBox {
        BoundingBox::from_size(f64::from(self.width), f64::from(self.height))
    }

    /// Trim box, falling back to the full image rectangle.
    pub fn bounding_box(&self) -> BoundingBox {
        self.trim_box.unwrap_or_else(|| self.image_box())
    }

    /// Share of the image rectangle occupied by the content box, in `0.0..=1.0`.
    pub fn content_fill(&self) -> f64 {
        let full = self.image_box().area();
        if full <= 0.0 {
            return 1.0;
        }
        (self.bounding_box().area() / full).clamp(0.0, 1.0)
    }
}

/// Analyze a raster logo: dimensions, alpha, dominant colors and trim box.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn analyze_raster(bytes: &[u8]) -> LogofitResult<RasterAnalysis> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff raster format")?
        .into_dimensions()
        .context("read raster header")?;
    if width == 0 || height == 0 {
        return Err(LogofitError::dimensions(format!(
            "raster header declares {width}x{height}"
        )));
    }

    let img = decode_image(bytes)?;
    let color = img.color();
    let has_alpha = color.has_alpha();
    let rgba = img.to_rgba8();

    let trim_box = if has_alpha {
        let trim = estimate_trim_box(&rgba);
        if trim.is_none() {
            tracing::warn!(width, height, "raster is fully transparent; using full image box");
        }
        trim
    } else {
        None
    };

    let analysis = RasterAnalysis {
        width,
        height,
        channels: color.channel_count(),
        has_alpha,
        dominant_colors: dominant_colors(&rgba),
        trim_box,
    };
    tracing::debug!(
        width,
        height,
        has_alpha,
        colors = analysis.dominant_colors.len(),
        trim_box = ?analysis.trim_box,
        "raster analysis"
    );
    Ok(analysis)
}

/// Rank colors of a downsampled grid in a reduced color cube.
///
/// Ties in count are broken by bin index so the ranking is deterministic.
pub fn dominant_colors(img: &RgbaImage) -> Vec<DominantColor> {
    #[derive(Clone, Copy, Default)]
    struct Bin {
        count: u32,
        sum: [u32; 3],
    }

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let gw = w.min(COLOR_SAMPLE_GRID);
    let gh = h.min(COLOR_SAMPLE_GRID);

    let mut bins = vec![Bin::default(); CUBE_BINS];
    let mut counted = 0u32;
    for gy in 0..gh {
        let y = grid_coord(gy, gh, h);
        for gx in 0..gw {
            let x = grid_coord(gx, gw, w);
            let [r, g, b, a] = img.get_pixel(x, y).0;
            if a < MIN_SAMPLE_ALPHA {
                continue;
            }
            let idx = (usize::from(r >> CUBE_SHIFT) << 6)
                | (usize::from(g >> CUBE_SHIFT) << 3)
                | usize::from(b >> CUBE_SHIFT);
            let bin = &mut bins[idx];
            bin.count += 1;
            bin.sum[0] += u32::from(r);
            bin.sum[1] += u32::from(g);
            bin.sum[2] += u32::from(b);
            counted += 1;
        }
    }
    if counted == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, Bin)> = bins
        .into_iter()
        .enumerate()
        .filter(|(_, b)| b.count > 0)
        .collect();
    ranked.sort_by(|(ia, a), (ib, b)| b.count.cmp(&a.count).then(ia.cmp(ib)));

    ranked
        .into_iter()
        .take(MAX_DOMINANT_COLORS)
        .map(|(_, bin)| {
            let mean = |s: u32| ((s + bin.count / 2) / bin.count) as u8;
            DominantColor {
                color: Color::rgb(mean(bin.sum[0]), mean(bin.sum[1]), mean(bin.sum[2])),
                share: f64::from(bin.count) / f64::from(counted),
            }
        })
        .collect()
}

/// Minimal rectangle enclosing pixels with non-zero alpha, found by scanning inward from
/// each edge. `None` when every pixel is fully transparent.
pub fn estimate_trim_box(img: &RgbaImage) -> Option<BoundingBox> {
    let (w, h) = img.dimensions();
    let opaque = |x: u32, y: u32| img.get_pixel(x, y).0[3] > 0;
    let row_has = |y: u32| (0..w).any(|x| opaque(x, y));

    let top = (0..h).find(|&y| row_has(y))?;
    let bottom = (top..h).rev().find(|&y| row_has(y))?;
    let col_has = |x: u32| (top..=bottom).any(|y| opaque(x, y));
    let left = (0..w).find(|&x| col_has(x))?;
    let right = (left..w).rev().find(|&x| col_has(x))?;

    Some(BoundingBox::new(
        f64::from(left),
        f64::from(top),
        f64::from(right - left + 1),
        f64::from(bottom - top + 1),
    ))
}

fn grid_coord(i: u32, cells: u32, len: u32) -> u32 {
    let pos = ((f64::from(i) + 0.5) * f64::from(len) / f64::from(cells)) as u32;
    pos.min(len - 1)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/analyzer.rs"]
mod tests;
