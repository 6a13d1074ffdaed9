//! Codec, color and rasterization helpers shared by the analysis and composition stages.

pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod svg_raster;
