//! Backgrounds, alpha blending and the final merge-and-encode step.

pub(crate) mod background;
pub(crate) mod blend;
pub(crate) mod compositor;
