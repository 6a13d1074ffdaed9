use serde::{Deserialize, Serialize};

use crate::assets::decode::{OutputFormat, decode_rgba8, encode_png};
use crate::assets::svg_raster::{parse_svg, rasterize_canvas};
use crate::composite::compositor::{CompositeResult, composite_images};
use crate::crop::cropper::{CropMode, CropOptions, CropSpec, crop_image};
use crate::foundation::core::BoundingBox;
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::layout::engine::{LayoutCalculation, LayoutOptions, compute_layout_for_box};
use crate::layout::margins::{Margins, safe_margins};
use crate::raster::analyzer::{DominantColor, analyze_raster, dominant_colors};
use crate::vector::analyzer::analyze_vector;

/// Longest side of the preview raster used to sample a vector logo's colors.
pub const VECTOR_COLOR_SAMPLE_SIDE: u32 = 256;

/// Broad class of a source logo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoKind {
    /// Vector markup.
    Vector,
    /// Bitmap.
    Raster,
}

/// Geometry and color summary of a source logo, computed once and reused per preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoAnalysis {
    /// Vector or raster.
    pub kind: LogoKind,
    /// Content box in source coordinates (user units or pixels).
    pub bounding_box: BoundingBox,
    /// Declared canvas (vectors) or full image rectangle (rasters).
    pub canvas_box: BoundingBox,
    /// Width over height of `bounding_box`; `1.0` when the box is degenerate.
    pub intrinsic_aspect_ratio: f64,
    /// Up to five colors ranked by frequency.
    pub dominant_colors: Vec<DominantColor>,
    /// `true` when the logo can be transparent.
    pub has_alpha: bool,
    /// Share of the logo's own canvas covered by the content box.
    pub content_fill: f64,
    /// Margins from the safe-margin policy.
    pub safe_margins: Margins,
}

/// Result of [`crop`].
#[derive(Clone, Debug, PartialEq)]
pub struct CropOutput {
    /// Chosen crop rectangle in source pixels.
    pub spec: CropSpec,
    /// PNG bytes of the resampled crop, or the untouched input when no work was needed.
    pub bytes: Vec<u8>,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
}

/// Classify a MIME type, ignoring case and parameters.
pub fn logo_kind_for_mime(mime: &str) -> LogofitResult<LogoKind> {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/svg+xml" => Ok(LogoKind::Vector),
        "image/png" | "image/jpeg" | "image/jpg" | "image/webp" | "image/gif" | "image/bmp" => {
            Ok(LogoKind::Raster)
        }
        _ => Err(LogofitError::unsupported_mime(mime)),
    }
}

/// Analyze a source logo.
#[tracing::instrument(skip(source), fields(len = source.len()))]
pub fn analyze(source: &[u8], mime: &str) -> LogofitResult<LogoAnalysis> {
    let analysis = match logo_kind_for_mime(mime)? {
        LogoKind::Vector => analyze_vector_logo(source)?,
        LogoKind::Raster => analyze_raster_logo(source)?,
    };
    tracing::debug!(
        kind = ?analysis.kind,
        bbox = ?analysis.bounding_box,
        aspect = analysis.intrinsic_aspect_ratio,
        "logo analyzed"
    );
    Ok(analysis)
}

fn analyze_vector_logo(source: &[u8]) -> LogofitResult<LogoAnalysis> {
    let vector = analyze_vector(source)?;
    let bounding_box = vector.bounding_box();

    let dominant = match parse_svg(source)
        .and_then(|tree| rasterize_canvas(&tree, vector.canvas_box, VECTOR_COLOR_SAMPLE_SIDE))
    {
        Ok(preview) => dominant_colors(&preview),
        Err(e) => {
            tracing::warn!(error = %e, "vector preview failed; no dominant colors");
            Vec::new()
        }
    };

    Ok(finish(
        LogoKind::Vector,
        bounding_box,
        vector.canvas_box,
        dominant,
        true,
        1.0,
    ))
}

fn analyze_raster_logo(source: &[u8]) -> LogofitResult<LogoAnalysis> {
    let raster = analyze_raster(source)?;
    let content_fill = raster.content_fill();
    Ok(finish(
        LogoKind::Raster,
        raster.bounding_box(),
        raster.image_box(),
        raster.dominant_colors,
        raster.has_alpha,
        content_fill,
    ))
}

fn finish(
    kind: LogoKind,
    bounding_box: BoundingBox,
    canvas_box: BoundingBox,
    dominant_colors: Vec<DominantColor>,
    has_alpha: bool,
    content_fill: f64,
) -> LogoAnalysis {
    let intrinsic_aspect_ratio = bounding_box.aspect_ratio().unwrap_or(1.0);
    LogoAnalysis {
        kind,
        bounding_box,
        canvas_box,
        intrinsic_aspect_ratio,
        dominant_colors,
        has_alpha,
        content_fill,
        safe_margins: safe_margins(intrinsic_aspect_ratio, content_fill),
    }
}

/// Place an analyzed logo on a `width x height` canvas.
pub fn compute_layout(
    analysis: &LogoAnalysis,
    width: u32,
    height: u32,
    opts: &LayoutOptions,
) -> LogofitResult<LayoutCalculation> {
    compute_layout_for_box(
        &analysis.bounding_box,
        analysis.safe_margins,
        width,
        height,
        opts,
    )
}

/// Crop raster bytes to exactly `width x height`.
#[tracing::instrument(skip(source), fields(len = source.len()))]
pub fn crop(
    source: &[u8],
    width: u32,
    height: u32,
    mode: CropMode,
    padding: Option<f64>,
) -> LogofitResult<CropOutput> {
    LogofitError::check_target(width, height)?;
    let img = decode_rgba8(source)?;
    let (sw, sh) = img.dimensions();
    if (sw, sh) == (width, height) {
        return Ok(CropOutput {
            spec: CropSpec {
                x: 0.0,
                y: 0.0,
                width: f64::from(sw),
                height: f64::from(sh),
            },
            bytes: source.to_vec(),
            width,
            height,
        });
    }

    let (spec, out) = crop_image(&img, width, height, &CropOptions { mode, padding })?;
    Ok(CropOutput {
        spec,
        bytes: encode_png(&out)?,
        width: out.width(),
        height: out.height(),
    })
}

/// Decode a background and a prepared logo and merge them per `layout`.
pub fn composite(
    background: &[u8],
    prepared_logo: &[u8],
    layout: &LayoutCalculation,
    format: OutputFormat,
    quality: u8,
) -> LogofitResult<CompositeResult> {
    let bg = decode_rgba8(background)?;
    let logo = decode_rgba8(prepared_logo)?;
    composite_images(&bg, &logo, layout, format, quality)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/engine.rs"]
mod tests;
