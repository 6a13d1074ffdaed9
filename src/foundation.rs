//! Shared value types, errors and pixel math.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
