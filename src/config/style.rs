use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::error::{HookreelError, HookreelResult};

/// Font used when no other font path is configured.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/roboto/Roboto-Bold.ttf";

/// Caption appearance and placement.
///
/// Loaded once (from JSON or defaults) and passed by reference into the caption renderer and
/// batch runner. Every field has a default, so a config file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionStyle {
    /// Path to a TrueType/OpenType font file.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Glyph color.
    pub fg: Rgba8,
    /// Caption canvas background color.
    pub bg: Rgba8,
    /// Empty band above the first line.
    pub top_margin_px: u32,
    /// Empty band below the last line.
    pub bottom_margin_px: u32,
    /// Extra vertical space added to the font size for each line.
    pub line_spacing_pad_px: u32,
    /// Horizontal budget subtracted from the canvas width when wrapping.
    pub wrap_margin_px: f32,
    /// Overlay offset from the top of the frame as a fraction of the video height.
    pub overlay_top_fraction: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size_px: 90.0,
            fg: Rgba8::BLACK,
            bg: Rgba8::WHITE,
            top_margin_px: 50,
            bottom_margin_px: 50,
            line_spacing_pad_px: 10,
            wrap_margin_px: 100.0,
            overlay_top_fraction: 0.15,
        }
    }
}

impl CaptionStyle {
    /// Parse a style from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HookreelResult<Self> {
        let style: Self = serde_json::from_reader(r)
            .map_err(|e| HookreelError::validation(format!("parse caption style JSON: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    /// Parse a style from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> HookreelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HookreelError::validation(format!("open caption style '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check numeric fields for usable values.
    pub fn validate(&self) -> HookreelResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(HookreelError::validation(
                "font_size_px must be finite and > 0",
            ));
        }
        if !self.wrap_margin_px.is_finite() || self.wrap_margin_px < 0.0 {
            return Err(HookreelError::validation(
                "wrap_margin_px must be finite and >= 0",
            ));
        }
        if !self.overlay_top_fraction.is_finite()
            || !(0.0..=1.0).contains(&self.overlay_top_fraction)
        {
            return Err(HookreelError::validation(
                "overlay_top_fraction must be within [0, 1]",
            ));
        }
        if self.font_path.as_os_str().is_empty() {
            return Err(HookreelError::validation("font_path must be non-empty"));
        }
        Ok(())
    }

    /// Vertical overlay offset for a frame of `video_height` pixels.
    pub fn overlay_top_px(&self, video_height: u32) -> i32 {
        (f64::from(video_height) * self.overlay_top_fraction).floor() as i32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/style.rs"]
mod tests;
