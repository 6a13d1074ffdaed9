//! The four call contracts, logo preparation, the preset catalog and batch rendering.

pub(crate) mod batch;
pub(crate) mod engine;
pub(crate) mod prepare;
pub(crate) mod presets;
