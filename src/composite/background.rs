use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::assets::decode::from_premul;
use crate::composite::blend::{PremulRgba8, mix};
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::foundation::math::mul_div255_u8;

/// Generated canvas background.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundSpec {
    /// Fully transparent canvas.
    #[default]
    Transparent,
    /// Single flat color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// Two-stop linear gradient across the whole canvas.
    LinearGradient {
        /// Color at the start edge.
        from: Color,
        /// Color at the end edge.
        to: Color,
        /// Direction in degrees; `0` runs left to right, `90` top to bottom.
        #[serde(default)]
        angle_deg: f64,
    },
}

/// Render `spec` into a `width x height` straight-alpha image.
pub fn render_background(spec: &BackgroundSpec, width: u32, height: u32) -> LogofitResult<RgbaImage> {
    LogofitError::check_target(width, height)?;
    match spec {
        BackgroundSpec::Transparent => Ok(RgbaImage::new(width, height)),
        BackgroundSpec::Solid { color } => Ok(RgbaImage::from_pixel(width, height, color.to_pixel())),
        BackgroundSpec::LinearGradient {
            from,
            to,
            angle_deg,
        } => linear_gradient(*from, *to, *angle_deg, width, height),
    }
}

fn linear_gradient(
    from: Color,
    to: Color,
    angle_deg: f64,
    width: u32,
    height: u32,
) -> LogofitResult<RgbaImage> {
    let angle = if angle_deg.is_finite() {
        angle_deg.to_radians()
    } else {
        0.0
    };
    let (dx, dy) = (angle.cos(), angle.sin());
    let (w, h) = (f64::from(width), f64::from(height));
    let (cx, cy) = (w * 0.5, h * 0.5);
    // Projection of the canvas corners onto the direction spans [-extent, extent].
    let extent = ((dx.abs() * w + dy.abs() * h) * 0.5).max(f64::EPSILON);

    let a = premul(from);
    let b = premul(to);
    let mut px = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for y in 0..height {
        for x in 0..width {
            let px_x = f64::from(x) + 0.5 - cx;
            let px_y = f64::from(y) + 0.5 - cy;
            let t = ((px_x * dx + px_y * dy) / extent + 1.0) * 0.5;
            px.extend_from_slice(&mix(a, b, t as f32));
        }
    }
    from_premul(width, height, px)
}

fn premul(c: Color) -> PremulRgba8 {
    let a = u16::from(c.a);
    [
        mul_div255_u8(u16::from(c.r), a),
        mul_div255_u8(u16::from(c.g), a),
        mul_div255_u8(u16::from(c.b), a),
        c.a,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/composite/background.rs"]
mod tests;
