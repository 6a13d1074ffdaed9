use serde::{Deserialize, Serialize};

/// Default margin on every side, as a fraction of the canvas.
pub const BASE_MARGIN: f64 = 0.10;
/// Margin for logos more extreme than 2:1 or 1:2.
pub const EXTREME_ASPECT_MARGIN: f64 = 0.15;
/// Margin for artwork whose content fills less than half of its own box.
pub const PADDED_ARTWORK_MARGIN: f64 = 0.05;
/// Upper bound for any single side.
pub const MAX_SIDE_MARGIN: f64 = 0.45;

const EXTREME_ASPECT: f64 = 2.0;
const SPARSE_CONTENT_FILL: f64 = 0.5;

/// Per-side margins as fractions of the canvas.
///
/// `left`/`right` scale the canvas width, `top`/`bottom` scale the canvas height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top fraction.
    pub top: f64,
    /// Right fraction.
    pub right: f64,
    /// Bottom fraction.
    pub bottom: f64,
    /// Left fraction.
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(BASE_MARGIN)
    }
}

impl Margins {
    /// Same fraction on every side.
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// No margins at all.
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// Every side clamped to `[0, MAX_SIDE_MARGIN]`; non-finite sides become `0`.
    pub fn clamped(self) -> Self {
        let c = |v: f64| {
            if v.is_finite() {
                v.clamp(0.0, MAX_SIDE_MARGIN)
            } else {
                0.0
            }
        };
        Self {
            top: c(self.top),
            right: c(self.right),
            bottom: c(self.bottom),
            left: c(self.left),
        }
    }
}

/// Safe-margin policy for a logo with the given aspect ratio and content fill.
///
/// `content_fill` is the share of the logo's own box covered by content, in `0..=1`.
/// The extreme-aspect rule wins over the sparse-content rule.
pub fn safe_margins(aspect: f64, content_fill: f64) -> Margins {
    let extreme = aspect.is_finite()
        && aspect > 0.0
        && (aspect > EXTREME_ASPECT || aspect < 1.0 / EXTREME_ASPECT);
    let v = if extreme {
        EXTREME_ASPECT_MARGIN
    } else if content_fill < SPARSE_CONTENT_FILL {
        PADDED_ARTWORK_MARGIN
    } else {
        BASE_MARGIN
    };
    Margins::uniform(v)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/margins.rs"]
mod tests;
