//! Raster analysis and area-preserving resampling.

pub(crate) mod analyzer;
pub(crate) mod resample;
