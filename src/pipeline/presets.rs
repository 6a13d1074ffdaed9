use std::collections::HashSet;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::assets::decode::{DEFAULT_QUALITY, OutputFormat};
use crate::composite::background::BackgroundSpec;
use crate::foundation::error::{LogofitError, LogofitResult};
use crate::layout::engine::{Alignment, FillMode, LayoutOptions};
use crate::layout::margins::Margins;

/// Group a preset belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetCategory {
    /// Social network banners, covers and posts.
    #[default]
    Social,
    /// Application and browser icons.
    AppIcon,
    /// Website headers and inline logos.
    Web,
    /// Print artwork at 300 dpi.
    Print,
}

/// One named target canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Unique name.
    pub name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Catalog group.
    #[serde(default)]
    pub category: PresetCategory,
    /// Scaling policy.
    #[serde(default)]
    pub fill_mode: FillMode,
    /// Anchor inside the usable area.
    #[serde(default)]
    pub alignment: Alignment,
    /// Explicit margins; `None` uses the logo's safe margins.
    #[serde(default)]
    pub margins: Option<Margins>,
    /// Generated background.
    #[serde(default)]
    pub background: BackgroundSpec,
    /// Output encoding.
    #[serde(default)]
    pub format: OutputFormat,
    /// Quality for lossy formats.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl Preset {
    /// Preset with default placement, transparent background and PNG output.
    pub fn new(name: impl Into<String>, width: u32, height: u32, category: PresetCategory) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            category,
            fill_mode: FillMode::default(),
            alignment: Alignment::default(),
            margins: None,
            background: BackgroundSpec::default(),
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
        }
    }

    /// Layout knobs for this preset.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            alignment: self.alignment,
            fill_mode: self.fill_mode,
            margins: self.margins,
        }
    }

    fn with_background(mut self, background: BackgroundSpec) -> Self {
        self.background = background;
        self
    }

    fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }

    fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// The built-in preset catalog.
pub fn builtin_presets() -> Vec<Preset> {
    use PresetCategory::{AppIcon, Print, Social, Web};
    let white = BackgroundSpec::Solid {
        color: Color::WHITE,
    };

    vec![
        Preset::new("twitter_header", 1500, 500, Social).with_background(white.clone()),
        Preset::new("facebook_cover", 820, 312, Social).with_background(white.clone()),
        Preset::new("linkedin_banner", 1584, 396, Social).with_background(white.clone()),
        Preset::new("youtube_banner", 2560, 1440, Social).with_background(white.clone()),
        Preset::new("instagram_post", 1080, 1080, Social).with_background(white.clone()),
        Preset::new("og_image", 1200, 630, Social)
            .with_background(white.clone())
            .with_format(OutputFormat::Jpeg),
        Preset::new("ios_app_icon", 1024, 1024, AppIcon).with_background(white.clone()),
        Preset::new("android_adaptive_icon", 432, 432, AppIcon).with_margins(Margins::uniform(0.25)),
        Preset::new("pwa_icon_512", 512, 512, AppIcon),
        Preset::new("favicon_32", 32, 32, AppIcon).with_margins(Margins::zero()),
        Preset::new("website_header", 600, 200, Web),
        Preset::new("email_signature", 300, 100, Web).with_background(white.clone()),
        Preset::new("business_card", 1050, 600, Print).with_background(white.clone()),
        Preset::new("letterhead", 2550, 330, Print).with_background(white.clone()),
        Preset::new("sticker", 1200, 1200, Print),
    ]
}

/// Look up a built-in preset by name.
pub fn preset_by_name(name: &str) -> Option<Preset> {
    builtin_presets().into_iter().find(|p| p.name == name)
}

/// Parse a JSON array of presets, rejecting zero-sized canvases and duplicate names.
pub fn load_presets_json(json: &str) -> LogofitResult<Vec<Preset>> {
    let presets: Vec<Preset> =
        serde_json::from_str(json).map_err(|e| anyhow!("parse preset json: {e}"))?;
    let mut seen = HashSet::new();
    for p in &presets {
        LogofitError::check_target(p.width, p.height)?;
        if !seen.insert(p.name.as_str()) {
            return Err(anyhow!("duplicate preset name {:?}", p.name).into());
        }
    }
    Ok(presets)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/presets.rs"]
mod tests;
