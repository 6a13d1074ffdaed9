//! Alpha-derived coverage masks and the morphological filters behind them.

pub(crate) mod filters;
pub(crate) mod generator;
