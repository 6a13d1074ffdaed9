//! Single-channel buffer filters.
//!
//! Every pass reads its input and allocates a fresh output; nothing is mutated in place.

use crate::foundation::error::{LogofitError, LogofitResult};

/// Gain applied to the Sobel magnitude when it is blended back into a mask.
pub const EDGE_BLEND: f32 = 0.3;

pub(crate) fn expected_len(width: u32, height: u32) -> LogofitResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| LogofitError::dimensions("mask buffer size overflow"))
}

/// Separable Gaussian smoothing with a `radius`-pixel kernel (sigma = radius / 2).
pub fn gaussian_blur(src: &[u8], width: u32, height: u32, radius: u32) -> LogofitResult<Vec<u8>> {
    if src.len() != expected_len(width, height)? {
        return Err(LogofitError::dimensions(
            "gaussian_blur expects src matching width*height",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let sigma = (radius as f32 * 0.5).max(0.5);
    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| (-f64::from(i * i) / denom).exp())
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Push rounding drift into the center tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                acc += u64::from(kw) * u64::from(src[(y * w + sx) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                acc += u64::from(kw) * u64::from(src[(sy * w + x) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

/// `255` where `v > threshold`, else `0`.
pub fn binarize(src: &[u8], threshold: u8) -> Vec<u8> {
    src.iter()
        .map(|&v| if v > threshold { 255 } else { 0 })
        .collect()
}

/// One 3x3 max-filter pass. Neighbors outside the buffer are ignored.
pub fn dilate(src: &[u8], width: u32, height: u32) -> Vec<u8> {
    neighborhood(src, width, height, u8::max)
}

/// One 3x3 min-filter pass. Neighbors outside the buffer are ignored.
pub fn erode(src: &[u8], width: u32, height: u32) -> Vec<u8> {
    neighborhood(src, width, height, u8::min)
}

fn neighborhood(src: &[u8], width: u32, height: u32, pick: fn(u8, u8) -> u8) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let ys = y.saturating_sub(1)..=(y + 1).min(h - 1);
        for x in 0..w {
            let xs = x.saturating_sub(1)..=(x + 1).min(w - 1);
            let mut v = src[y * w + x];
            for ny in ys.clone() {
                for nx in xs.clone() {
                    v = pick(v, src[ny * w + nx]);
                }
            }
            out[y * w + x] = v;
        }
    }
    out
}

/// 3x3 Sobel gradient magnitude with edge-replicated borders.
pub fn sobel_magnitude(src: &[f32], width: u32, height: u32) -> Vec<f32> {
    let (w, h) = (width as i64, height as i64);
    let at = |x: i64, y: i64| src[(y.clamp(0, h - 1) * w + x.clamp(0, w - 1)) as usize];

    let mut out = vec![0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let gx = (at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x - 1, y) + at(x - 1, y + 1));
            let gy = (at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x, y - 1) + at(x + 1, y - 1));
            out[(y * w + x) as usize] = (gx * gx + gy * gy).sqrt();
        }
    }
    out
}

/// Add `EDGE_BLEND * |sobel|` to every pixel, clamped to 255.
pub fn enhance_edges(src: &[u8], width: u32, height: u32) -> Vec<u8> {
    let as_f32: Vec<f32> = src.iter().map(|&v| f32::from(v)).collect();
    let grad = sobel_magnitude(&as_f32, width, height);
    src.iter()
        .zip(grad)
        .map(|(&v, g)| (f32::from(v) + EDGE_BLEND * g).round().min(255.0) as u8)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/mask/filters.rs"]
mod tests;
