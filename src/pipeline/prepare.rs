use image::RgbaImage;

use crate::assets::decode::decode_rgba8;
use crate::assets::svg_raster::{parse_svg, rasterize_region};
use crate::foundation::error::LogofitResult;
use crate::layout::engine::LayoutCalculation;
use crate::pipeline::engine::{LogoAnalysis, LogoKind};
use crate::raster::resample::resample_region;

/// Produce the logo raster at exactly `layout.logo_width x layout.logo_height`.
///
/// Only the analyzed content box is drawn, so padding baked into the source does not shrink
/// the placed logo. Vectors are rendered straight at the target size; rasters are
/// area-resampled.
#[tracing::instrument(skip(source, analysis, layout), fields(
    kind = ?analysis.kind,
    w = layout.logo_width,
    h = layout.logo_height,
))]
pub fn prepare_logo(
    source: &[u8],
    analysis: &LogoAnalysis,
    layout: &LayoutCalculation,
) -> LogofitResult<RgbaImage> {
    let (w, h) = (layout.logo_width, layout.logo_height);
    let region = if analysis.bounding_box.is_degenerate() {
        tracing::debug!(bbox = ?analysis.bounding_box, "degenerate content box; drawing the canvas");
        analysis.canvas_box
    } else {
        analysis.bounding_box
    };

    match analysis.kind {
        LogoKind::Vector => {
            let tree = parse_svg(source)?;
            rasterize_region(&tree, analysis.canvas_box, region, w, h)
        }
        LogoKind::Raster => {
            let img = decode_rgba8(source)?;
            resample_region(&img, region, w, h)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/prepare.rs"]
mod tests;
