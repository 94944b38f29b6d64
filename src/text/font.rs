use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{HookreelError, HookreelResult};
use crate::text::measure::TextMeasure;

/// A loaded font file at a fixed pixel size.
///
/// Immutable and cheap to clone; share one instance across every caption in a batch so that all
/// measurements agree.
#[derive(Clone)]
pub struct FontSpec {
    path: PathBuf,
    size_px: f32,
    bytes: Arc<Vec<u8>>,
    family: String,
}

impl std::fmt::Debug for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSpec")
            .field("path", &self.path)
            .field("size_px", &self.size_px)
            .field("bytes_len", &self.bytes.len())
            .field("family", &self.family)
            .finish()
    }
}

impl FontSpec {
    /// Read and validate a font file.
    ///
    /// Fails with [`HookreelError::FontLoad`] when the file cannot be read or holds no usable
    /// font family.
    pub fn load(path: impl AsRef<Path>, size_px: f32) -> HookreelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            HookreelError::font_load(format!("read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(path, bytes, size_px)
    }

    /// Validate in-memory font data. `path` is kept for diagnostics only.
    pub fn from_bytes(
        path: impl Into<PathBuf>,
        bytes: Vec<u8>,
        size_px: f32,
    ) -> HookreelResult<Self> {
        let path = path.into();
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(HookreelError::validation(
                "font size_px must be finite and > 0",
            ));
        }

        let bytes = Arc::new(bytes);
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, &bytes).map_err(|e| {
            HookreelError::font_load(format!("font '{}': {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), %family, size_px, "loaded font");
        Ok(Self {
            path,
            size_px,
            bytes,
            family,
        })
    }

    /// Source path of the font file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Primary family name read from the font data.
    pub fn family(&self) -> &str {
        &self.family
    }
}

fn register_family(
    font_ctx: &mut parley::FontContext,
    bytes: &Arc<Vec<u8>>,
) -> Result<String, String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| "no font families registered from font bytes".to_string())?;

    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_string)
        .ok_or_else(|| "registered font family has no name".to_string())
}

/// Per-worker shaping state bound to one [`FontSpec`].
///
/// Holds the mutable parley contexts, so each thread needs its own shaper. Measurement and
/// drawing both go through [`TextShaper::layout_line`], which is what keeps the wrapper and the
/// rasterizer consistent.
pub struct TextShaper {
    font: FontSpec,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    glyph_font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper").field("font", &self.font).finish()
    }
}

impl TextShaper {
    /// Register `font` into fresh parley contexts.
    pub fn new(font: &FontSpec) -> HookreelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        register_family(&mut font_ctx, &font.bytes).map_err(|e| {
            HookreelError::font_load(format!("font '{}': {e}", font.path.display()))
        })?;

        let glyph_font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );

        Ok(Self {
            font: font.clone(),
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            glyph_font,
        })
    }

    /// The font this shaper lays text out with.
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub(crate) fn glyph_font(&self) -> &vello_cpu::peniko::FontData {
        &self.glyph_font
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(&mut self, text: &str, brush: Rgba8) -> parley::Layout<Rgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Advance width of `text` on one line, in pixels.
    pub fn measure_line(&mut self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout_line(text, Rgba8::default()).width()
    }
}

impl TextMeasure for TextShaper {
    fn measure(&mut self, text: &str) -> f32 {
        self.measure_line(text)
    }
}
