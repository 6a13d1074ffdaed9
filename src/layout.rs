//! Placement math: safe margins, fill modes, alignment.

pub(crate) mod engine;
pub(crate) mod margins;
