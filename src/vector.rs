//! Vector structural analysis: markup -> node tree with resolved transforms -> boxes.

pub(crate) mod analyzer;
pub(crate) mod transform;
pub(crate) mod tree;
