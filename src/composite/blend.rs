use image::Rgba;

use crate::foundation::math::{
    mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let inv = 255 - u16::from(src[3]);
    std::array::from_fn(|i| src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv)))
}

/// Draw straight-alpha `src` over straight-alpha `dst` in place.
///
/// A transparent `src` leaves `dst` byte-identical and an opaque one replaces it. Only
/// partial coverage goes through premultiplied space.
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    match src.0[3] {
        0 => {}
        255 => *dst = src,
        _ => {
            let (mut d, mut s) = (dst.0, src.0);
            premultiply_rgba8_in_place(&mut d);
            premultiply_rgba8_in_place(&mut s);
            let mut out = over(d, s);
            unpremultiply_rgba8_in_place(&mut out);
            *dst = Rgba(out);
        }
    }
}

/// Interpolate premultiplied pixels, `t = 0` gives `a` and `t = 1` gives `b`.
pub fn mix(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| {
        let (a, b) = (f32::from(a[i]), f32::from(b[i]));
        (a + (b - a) * t).round() as u8
    })
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
