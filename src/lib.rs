//! logofit is a logo geometry and composition engine.
//!
//! A source logo is analyzed once and then laid out and composited onto any number of target
//! canvases (social banners, app icons, print formats).
//!
//! # Pipeline overview
//!
//! 1. **Analyze**: vector markup or raster bytes -> [`LogoAnalysis`] (content box, aspect
//!    ratio, dominant colors, safe margins)
//! 2. **Layout**: [`LogoAnalysis`] + canvas size -> [`LayoutCalculation`]
//! 3. **Prepare**: draw the logo's content box at exactly the laid-out size
//! 4. **Composite**: merge onto a background and encode -> [`CompositeResult`]
//!
//! [`crop`] and [`generate_mask`] are available on their own for content-aware cropping of
//! arbitrary rasters.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: every stage is a pure function of its inputs; ties are broken by
//!   fixed rules.
//! - **No IO**: callers pass bytes in and get bytes out.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composite;
mod crop;
mod foundation;
mod layout;
mod mask;
mod pipeline;
mod raster;
mod vector;

pub use assets::color::Color;
pub use assets::decode::{
    DEFAULT_QUALITY, OutputFormat, decode_image, decode_rgba8, encode_png, encode_rgba8,
};
pub use assets::svg_raster::{parse_svg, rasterize_canvas, rasterize_region, svg_fontdb};
pub use composite::background::{BackgroundSpec, render_background};
pub use composite::blend::{PremulRgba8, blend_pixel, mix, over};
pub use composite::compositor::{CompositeResult, composite_images, overlay};
pub use crop::cropper::{
    CropMode, CropOptions, CropSpec, attention_crop_spec, center_crop_spec, crop_image,
    smart_crop_spec,
};
pub use foundation::core::{Affine, BoundingBox, Point, Rect, Vec2};
pub use foundation::error::{LogofitError, LogofitResult};
pub use layout::engine::{
    Alignment, FillMode, LayoutCalculation, LayoutOptions, compute_layout_for_box,
};
pub use layout::margins::{
    BASE_MARGIN, EXTREME_ASPECT_MARGIN, MAX_SIDE_MARGIN, Margins, PADDED_ARTWORK_MARGIN,
    safe_margins,
};
pub use mask::filters::{
    EDGE_BLEND, binarize, dilate, enhance_edges, erode, gaussian_blur, sobel_magnitude,
};
pub use mask::generator::{CONTENT_THRESHOLD, Mask, MaskOptions, apply_mask, generate_mask};
pub use pipeline::batch::{BatchOpts, PresetOutcome, render_batch, render_preset};
pub use pipeline::engine::{
    CropOutput, LogoAnalysis, LogoKind, VECTOR_COLOR_SAMPLE_SIDE, analyze, composite,
    compute_layout, crop, logo_kind_for_mime,
};
pub use pipeline::prepare::prepare_logo;
pub use pipeline::presets::{
    Preset, PresetCategory, builtin_presets, load_presets_json, preset_by_name,
};
pub use raster::analyzer::{
    COLOR_SAMPLE_GRID, DominantColor, MAX_DOMINANT_COLORS, MIN_SAMPLE_ALPHA, RasterAnalysis,
    analyze_raster, dominant_colors, estimate_trim_box,
};
pub use raster::resample::{resample_region, resize};
pub use vector::analyzer::{FALLBACK_CANVAS_SIZE, VectorAnalysis, analyze_vector};
pub use vector::transform::{compose, identity, parse_transform, rotate_about, transform_box};
pub use vector::tree::{NodeKind, VectorNode};
