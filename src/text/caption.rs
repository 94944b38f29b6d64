use crate::config::style::CaptionStyle;
use crate::foundation::error::{HookreelError, HookreelResult};
use crate::text::font::{FontSpec, TextShaper};
use crate::text::raster::{CaptionImage, CaptionMetrics, rasterize};
use crate::text::wrap::wrap;

/// Wrap-then-rasterize for one caption at a time.
///
/// Owns a [`TextShaper`], so it is a per-worker object; build one per thread from a shared
/// [`FontSpec`].
#[derive(Debug)]
pub struct CaptionRenderer {
    shaper: TextShaper,
    style: CaptionStyle,
    metrics: CaptionMetrics,
}

impl CaptionRenderer {
    /// Build a renderer for `font` with the colors and spacing of `style`.
    ///
    /// `style.font_path`/`style.font_size_px` are not re-read here: `font` is authoritative.
    pub fn new(font: &FontSpec, style: &CaptionStyle) -> HookreelResult<Self> {
        style.validate()?;
        Ok(Self {
            shaper: TextShaper::new(font)?,
            style: style.clone(),
            metrics: CaptionMetrics::from_style(style),
        })
    }

    /// Load the font named by `style` and build a renderer for it.
    pub fn from_style(style: &CaptionStyle) -> HookreelResult<Self> {
        style.validate()?;
        let font = FontSpec::load(&style.font_path, style.font_size_px)?;
        Self::new(&font, style)
    }

    /// The style this renderer draws with.
    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Wrap `text` for a canvas of `canvas_width` pixels.
    pub fn wrap_lines(&mut self, text: &str, canvas_width: u32) -> Vec<String> {
        wrap(
            text,
            canvas_width as f32,
            self.style.wrap_margin_px,
            &mut self.shaper,
        )
    }

    /// Render `text` into a caption image `canvas_width` pixels wide.
    ///
    /// Surrounding whitespace is trimmed first; if nothing remains this fails with
    /// [`HookreelError::EmptyInput`] before any canvas is allocated.
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub fn render(&mut self, text: &str, canvas_width: u32) -> HookreelResult<CaptionImage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HookreelError::empty_input("caption text is empty"));
        }
        if canvas_width == 0 {
            return Err(HookreelError::validation(
                "caption canvas width must be non-zero",
            ));
        }

        let lines = self.wrap_lines(text, canvas_width);
        tracing::debug!(lines = lines.len(), "wrapped caption");
        rasterize(
            &lines,
            canvas_width,
            &mut self.shaper,
            self.style.fg,
            self.style.bg,
            self.metrics,
        )
    }
}
