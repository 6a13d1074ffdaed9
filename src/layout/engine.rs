use serde::{Deserialize, Serialize};

use crate::foundation::core::BoundingBox;
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::layout::margins::Margins;

/// Where the logo sits inside the usable area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Top-left corner.
    NorthWest,
    /// Top edge, centered horizontally.
    North,
    /// Top-right corner.
    NorthEast,
    /// Left edge, centered vertically.
    West,
    /// Centered on both axes.
    #[default]
    Center,
    /// Right edge, centered vertically.
    East,
    /// Bottom-left corner.
    SouthWest,
    /// Bottom edge, centered horizontally.
    South,
    /// Bottom-right corner.
    SouthEast,
}

impl Alignment {
    fn axes(self) -> (AlignKind, AlignKind) {
        use AlignKind::{Center, End, Start};
        match self {
            Self::NorthWest => (Start, Start),
            Self::North => (Center, Start),
            Self::NorthEast => (End, Start),
            Self::West => (Start, Center),
            Self::Center => (Center, Center),
            Self::East => (End, Center),
            Self::SouthWest => (Start, End),
            Self::South => (Center, End),
            Self::SouthEast => (End, End),
        }
    }
}

/// How the logo's aspect ratio is reconciled with the usable area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Uniform scale so the whole logo fits.
    #[default]
    Contain,
    /// Uniform scale so the logo fills the usable area; may overflow.
    Cover,
    /// Independent width and height matching the usable area.
    Stretch,
}

/// Placement knobs for [`compute_layout_for_box`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Anchor inside the usable area.
    pub alignment: Alignment,
    /// Scaling policy.
    pub fill_mode: FillMode,
    /// Explicit margins; `None` uses the safe-margin policy.
    pub margins: Option<Margins>,
}

/// Resolved placement of a logo on a canvas, in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutCalculation {
    /// Canvas width.
    pub canvas_width: u32,
    /// Canvas height.
    pub canvas_height: u32,
    /// Placed logo width, at least 1.
    pub logo_width: u32,
    /// Placed logo height, at least 1.
    pub logo_height: u32,
    /// Logo left edge; negative only for overflowing `cover` placements.
    pub logo_x: i32,
    /// Logo top edge; negative only for overflowing `cover` placements.
    pub logo_y: i32,
    /// Top margin in pixels.
    pub margin_top: u32,
    /// Right margin in pixels.
    pub margin_right: u32,
    /// Bottom margin in pixels.
    pub margin_bottom: u32,
    /// Left margin in pixels.
    pub margin_left: u32,
    /// Usable-area left edge.
    pub usable_x: u32,
    /// Usable-area top edge.
    pub usable_y: u32,
    /// Usable-area width.
    pub usable_width: u32,
    /// Usable-area height.
    pub usable_height: u32,
    /// Scale applied to the logo box. For `stretch` this is the smaller axis factor.
    pub scale: f64,
}

/// Place a logo box on a `canvas_width x canvas_height` canvas.
///
/// `safe` is used when `opts.margins` is `None`. All math runs in `f64`; values are rounded
/// once when the result is assembled.
pub fn compute_layout_for_box(
    logo: &BoundingBox,
    safe: Margins,
    canvas_width: u32,
    canvas_height: u32,
    opts: &LayoutOptions,
) -> LogofitResult<LayoutCalculation> {
    LogofitError::check_target(canvas_width, canvas_height)?;

    let (cw, ch) = (f64::from(canvas_width), f64::from(canvas_height));
    let m = opts.margins.unwrap_or(safe).clamped();
    let (ml, mr) = (m.left * cw, m.right * cw);
    let (mt, mb) = (m.top * ch, m.bottom * ch);
    let uw = cw - ml - mr;
    let uh = ch - mt - mb;

    let (lw, lh) = logo_extent(logo);
    let sx = uw / lw;
    let sy = uh / lh;
    let (scale, w, h) = match opts.fill_mode {
        FillMode::Contain => {
            let s = sx.min(sy);
            (s, lw * s, lh * s)
        }
        FillMode::Cover => {
            let s = sx.max(sy);
            (s, lw * s, lh * s)
        }
        FillMode::Stretch => (sx.min(sy), uw, uh),
    };

    let (ax, ay) = opts.alignment.axes();
    let x = ml + align_offset(uw, w, ax);
    let y = mt + align_offset(uh, h, ay);

    let logo_width = round_px(w).max(1);
    let logo_height = round_px(h).max(1);
    let mut logo_x = x.round() as i32;
    let mut logo_y = y.round() as i32;
    if opts.fill_mode != FillMode::Cover {
        logo_x = logo_x.clamp(0, canvas_width.saturating_sub(logo_width) as i32);
        logo_y = logo_y.clamp(0, canvas_height.saturating_sub(logo_height) as i32);
    }

    let calc = LayoutCalculation {
        canvas_width,
        canvas_height,
        logo_width,
        logo_height,
        logo_x,
        logo_y,
        margin_top: round_px(mt),
        margin_right: round_px(mr),
        margin_bottom: round_px(mb),
        margin_left: round_px(ml),
        usable_x: round_px(ml),
        usable_y: round_px(mt),
        usable_width: round_px(uw).max(1),
        usable_height: round_px(uh).max(1),
        scale,
    };
    tracing::debug!(?calc, fill = ?opts.fill_mode, align = ?opts.alignment, "layout computed");
    Ok(calc)
}

fn logo_extent(logo: &BoundingBox) -> (f64, f64) {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(logo.width) && ok(logo.height) {
        (logo.width, logo.height)
    } else {
        tracing::warn!(?logo, "degenerate logo box; assuming a square logo");
        (1.0, 1.0)
    }
}

fn round_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

fn align_offset(container: f64, content: f64, align: AlignKind) -> f64 {
    let rem = container - content;
    match align {
        AlignKind::Start => 0.0,
        AlignKind::Center => rem * 0.5,
        AlignKind::End => rem,
    }
}

#[derive(Clone, Copy)]
enum AlignKind {
    Start,
    Center,
    End,
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
