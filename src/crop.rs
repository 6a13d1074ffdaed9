//! Content-aware cropping to exact target dimensions.

pub(crate) mod cropper;
