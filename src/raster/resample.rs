use image::RgbaImage;

use crate::assets::decode::{from_premul, to_premul};
use crate::foundation::core::BoundingBox;
use crate::foundation::error::{LogofitError, LogofitResult};

/// Area-preserving resample of the whole image to `width x height`.
pub fn resize(img: &RgbaImage, width: u32, height: u32) -> LogofitResult<RgbaImage> {
    let full = BoundingBox::from_size(f64::from(img.width()), f64::from(img.height()));
    resample_region(img, full, width, height)
}

/// Area-preserving resample of a (possibly fractional) source `region` to `width x height`.
///
/// Each destination pixel is the coverage-weighted mean of the source pixels its footprint
/// overlaps, computed separably over premultiplied RGBA so transparent pixels do not bleed
/// color. The region is clamped to the image bounds.
pub fn resample_region(
    img: &RgbaImage,
    region: BoundingBox,
    width: u32,
    height: u32,
) -> LogofitResult<RgbaImage> {
    LogofitError::check_target(width, height)?;
    let (sw, sh) = img.dimensions();
    if sw == 0 || sh == 0 {
        return Err(LogofitError::dimensions("cannot resample an empty image"));
    }
    let bounds = BoundingBox::from_size(f64::from(sw), f64::from(sh));
    let region = region.intersect(&bounds).unwrap_or(bounds);

    if region == bounds && (sw, sh) == (width, height) {
        return Ok(img.clone());
    }

    let xw = axis_taps(region.x, region.width, sw, width);
    let yw = axis_taps(region.y, region.height, sh, height);

    let src = to_premul(img);
    let (sw, dw, dh) = (sw as usize, width as usize, height as usize);

    // Horizontal pass over only the rows the vertical pass will read.
    let row_lo = yw.iter().flatten().map(|&(j, _)| j).min().unwrap_or(0);
    let row_hi = yw.iter().flatten().map(|&(j, _)| j).max().unwrap_or(0);
    let mut tmp = vec![0f32; (row_hi - row_lo + 1) * dw * 4];
    for y in row_lo..=row_hi {
        let src_row = &src[y * sw * 4..(y + 1) * sw * 4];
        let tmp_row = &mut tmp[(y - row_lo) * dw * 4..(y - row_lo + 1) * dw * 4];
        for (dx, taps) in xw.iter().enumerate() {
            let mut acc = [0f32; 4];
            for &(sx, w) in taps {
                for c in 0..4 {
                    acc[c] += w * f32::from(src_row[sx * 4 + c]);
                }
            }
            tmp_row[dx * 4..dx * 4 + 4].copy_from_slice(&acc);
        }
    }

    let mut out = vec![0u8; dw * dh * 4];
    for (dy, taps) in yw.iter().enumerate() {
        for dx in 0..dw {
            let mut acc = [0f32; 4];
            for &(sy, w) in taps {
                let idx = ((sy - row_lo) * dw + dx) * 4;
                for c in 0..4 {
                    acc[c] += w * tmp[idx + c];
                }
            }
            let o = (dy * dw + dx) * 4;
            for c in 0..4 {
                out[o + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    from_premul(width, height, out)
}

/// Normalized `(source index, weight)` taps for every destination index along one axis.
fn axis_taps(start: f64, len: f64, src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f32)>> {
    let last = src_len as usize - 1;
    let step = len / f64::from(dst_len);
    (0..dst_len)
        .map(|i| {
            let lo = start + f64::from(i) * step;
            let hi = lo + step;
            if step <= 0.0 {
                let j = (lo.floor().max(0.0) as usize).min(last);
                return vec![(j, 1.0)];
            }

            let first = (lo.floor().max(0.0) as usize).min(last);
            let end = (hi.ceil().max(1.0) as usize).min(last + 1);
            let mut taps: Vec<(usize, f64)> = (first..end.max(first + 1))
                .filter_map(|j| {
                    let overlap = hi.min(j as f64 + 1.0) - lo.max(j as f64);
                    (overlap > 0.0).then_some((j, overlap))
                })
                .collect();
            if taps.is_empty() {
                taps.push((first, 1.0));
            }
            let total: f64 = taps.iter().map(|&(_, w)| w).sum();
            taps.into_iter()
                .map(|(j, w)| (j, (w / total) as f32))
                .collect()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/raster/resample.rs"]
mod tests;
