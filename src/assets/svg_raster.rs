use std::sync::{Arc, LazyLock};

use anyhow::Context;
use image::RgbaImage;

use crate::assets::decode::from_premul;
use crate::foundation::core::{Affine, BoundingBox};
use crate::foundation::error::{LogofitError, LogofitResult};

// Avoid pathological allocations when a preset asks for a huge logo.
const MAX_DIM: u32 = 16_384;

// Loading system fonts scans the disk, so it happens once per process.
static SVG_FONTDB: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system fonts for svg text");
    Arc::new(db)
});

/// Font database used to shape `<text>` in vector logos.
pub fn svg_fontdb() -> Arc<usvg::fontdb::Database> {
    Arc::clone(&SVG_FONTDB)
}

/// Parse vector markup with `usvg`, shaping text against the system fonts.
pub fn parse_svg(bytes: &[u8]) -> LogofitResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: svg_fontdb(),
        font_resolver: font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Requested families first, then the generic ones, then any installed face.
///
/// A wordmark naming a font that is not installed still renders in some face instead of
/// disappearing.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(s) => Family::Name(s),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let stretch = match font.stretch() {
                usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
                usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
                usvg::FontStretch::Condensed => Stretch::Condensed,
                usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
                usvg::FontStretch::Normal => Stretch::Normal,
                usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
                usvg::FontStretch::Expanded => Stretch::Expanded,
                usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
                usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
            };
            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };

            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Rasterize the user-space `region` of a vector document onto exactly `width x height` pixels.
///
/// `canvas_box` is the document's declared canvas (its `viewBox`, or width/height) and is
/// used to undo the viewport mapping `usvg` bakes into the tree.
pub fn rasterize_region(
    tree: &usvg::Tree,
    canvas_box: BoundingBox,
    region: BoundingBox,
    width: u32,
    height: u32,
) -> LogofitResult<RgbaImage> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(LogofitError::InvalidTargetSize { width, height });
    }

    let to_target = Affine::scale_non_uniform(
        f64::from(width) / region.width.max(1e-6),
        f64::from(height) / region.height.max(1e-6),
    ) * Affine::translate((-region.x, -region.y));
    let xform = to_target * viewport_transform(tree, canvas_box).inverse();

    let [a, b, c, d, e, f] = xform.as_coeffs();
    let ts = resvg::tiny_skia::Transform::from_row(
        a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
    );

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LogofitError::dimensions("failed to allocate svg pixmap"))?;
    resvg::render(tree, ts, &mut pixmap.as_mut());

    from_premul(width, height, pixmap.data().to_vec())
}

/// Rasterize the whole canvas so that its longer side is at most `max_side` pixels.
pub fn rasterize_canvas(
    tree: &usvg::Tree,
    canvas_box: BoundingBox,
    max_side: u32,
) -> LogofitResult<RgbaImage> {
    let longest = canvas_box.width.max(canvas_box.height).max(1e-6);
    let k = f64::from(max_side.max(1)) / longest;
    let w = ((canvas_box.width * k).round() as u32).max(1);
    let h = ((canvas_box.height * k).round() as u32).max(1);
    rasterize_region(tree, canvas_box, canvas_box, w, h)
}

/// User space -> `usvg` tree space, assuming the default `xMidYMid meet` aspect policy.
fn viewport_transform(tree: &usvg::Tree, canvas_box: BoundingBox) -> Affine {
    let size = tree.size();
    let (sw, sh) = (f64::from(size.width()), f64::from(size.height()));
    if canvas_box.is_degenerate() {
        return Affine::IDENTITY;
    }
    let k = (sw / canvas_box.width).min(sh / canvas_box.height);
    let tx = (sw - canvas_box.width * k) * 0.5 - canvas_box.x * k;
    let ty = (sh - canvas_box.height * k) * 0.5 - canvas_box.y * k;
    Affine::new([k, 0.0, 0.0, k, tx, ty])
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
