//! Font resolution for icon labels
//!
//! A label font is resolved per icon in a fixed order: the preferred scalable
//! face at a size proportional to the icon, then a default face at a fixed
//! size, then no font at all. Failures along the chain are never surfaced;
//! they only move resolution to the next step.

use anyhow::{Context, Result};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::{Path, PathBuf};

/// Preferred scalable face probed for every icon.
pub const DEFAULT_SCALABLE_FONT: &str = "/System/Library/Fonts/Arial.ttf";

/// Em size in pixels of the default face. Independent of the icon size.
pub const DEFAULT_FONT_EM_PX: f32 = 11.0;

/// Well-known sans-serif faces tried, in order, for the default font.
pub const DEFAULT_FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Where label fonts are looked up
#[derive(Debug, Clone)]
pub struct FontSources {
    /// Scalable face sized at `icon size / 3` pixels
    pub scalable: Option<PathBuf>,

    /// Candidates for the fixed-size default face, first readable one wins
    pub fallbacks: Vec<PathBuf>,
}

impl Default for FontSources {
    fn default() -> Self {
        Self::system(DEFAULT_SCALABLE_FONT)
    }
}

impl FontSources {
    /// Preferred face at `scalable`, default face from the well-known system paths
    pub fn system(scalable: impl Into<PathBuf>) -> Self {
        Self {
            scalable: Some(scalable.into()),
            fallbacks: DEFAULT_FALLBACK_FONTS.iter().map(PathBuf::from).collect(),
        }
    }

    /// No font sources at all; every icon is rendered without text
    pub fn none() -> Self {
        Self {
            scalable: None,
            fallbacks: Vec::new(),
        }
    }

    /// Resolve the label font for an icon of `icon_size` pixels.
    pub fn resolve(&self, icon_size: u32) -> LabelFont {
        if let Some(path) = &self.scalable {
            if let Ok(font) = load_scalable(path, icon_size / 3) {
                return font;
            }
        }

        for path in &self.fallbacks {
            if let Ok(font) = load_font(path) {
                let scale = em_scale(&font, DEFAULT_FONT_EM_PX);
                return LabelFont::Default { font, scale };
            }
        }

        LabelFont::None
    }
}

fn load_scalable(path: &Path, em_px: u32) -> Result<LabelFont> {
    if em_px == 0 {
        anyhow::bail!("Font size must be positive");
    }
    let font = load_font(path)?;
    let scale = em_scale(&font, em_px as f32);
    Ok(LabelFont::Scalable { font, scale })
}

fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file: {}", path.display()))?;
    Font::try_from_vec(data)
        .with_context(|| format!("Failed to parse font file: {}", path.display()))
}

/// rusttype scales by the ascent-to-descent height; convert an em size in
/// pixels into that scale so sizes behave like point sizes.
fn em_scale(font: &Font<'_>, em_px: f32) -> Scale {
    let v_metrics = font.v_metrics_unscaled();
    let units_per_em = f32::from(font.units_per_em().max(1));
    Scale::uniform(em_px * (v_metrics.ascent - v_metrics.descent) / units_per_em)
}

/// Inked extent of a laid-out label, in pixels relative to the draw origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Outcome of font resolution for a single icon
pub enum LabelFont {
    Scalable { font: Font<'static>, scale: Scale },
    Default { font: Font<'static>, scale: Scale },
    None,
}

impl LabelFont {
    pub fn kind(&self) -> &'static str {
        match self {
            LabelFont::Scalable { .. } => "scalable",
            LabelFont::Default { .. } => "default",
            LabelFont::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, LabelFont::None)
    }

    fn face(&self) -> Option<(&Font<'static>, Scale)> {
        match self {
            LabelFont::Scalable { font, scale } | LabelFont::Default { font, scale } => {
                Some((font, *scale))
            }
            LabelFont::None => None,
        }
    }

    /// Lay out `text` with the top of its ascender line at `(x, y)`.
    ///
    /// Returns an empty list when there is no font.
    pub fn layout(&self, text: &str, x: i32, y: i32) -> Vec<PositionedGlyph<'static>> {
        let Some((font, scale)) = self.face() else {
            return Vec::new();
        };
        let ascent = font.v_metrics(scale).ascent;
        font.layout(text, scale, point(x as f32, y as f32 + ascent)).collect()
    }

    /// Pixel bounding box of `text` drawn at the origin.
    ///
    /// `None` when there is no font to measure with. Text without any inked
    /// glyph measures as an empty box.
    pub fn measure(&self, text: &str) -> Option<TextBox> {
        if self.is_none() {
            return None;
        }

        let mut bounds: Option<TextBox> = None;
        for glyph in self.layout(text, 0, 0) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            bounds = Some(match bounds {
                None => TextBox {
                    left: bb.min.x,
                    top: bb.min.y,
                    right: bb.max.x,
                    bottom: bb.max.y,
                },
                Some(b) => TextBox {
                    left: b.left.min(bb.min.x),
                    top: b.top.min(bb.min.y),
                    right: b.right.max(bb.max.x),
                    bottom: b.bottom.max(bb.max.y),
                },
            });
        }

        Some(bounds.unwrap_or_default())
    }
}

/// First default-font candidate that exists on this machine, if any
pub fn find_system_font() -> Option<PathBuf> {
    DEFAULT_FALLBACK_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|path| load_font(path).is_ok())
}
