use std::path::Path;

use anyhow::Context as _;

use crate::config::style::CaptionStyle;
use crate::foundation::color::Rgba8;
use crate::foundation::error::{HookreelError, HookreelResult};
use crate::text::font::TextShaper;
use crate::text::measure::TextMeasure;

/// Vertical spacing of a caption canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionMetrics {
    /// Empty band above the first line.
    pub top_margin_px: u32,
    /// Empty band below the last line.
    pub bottom_margin_px: u32,
    /// Added to the font size to get the line height.
    pub line_spacing_pad_px: u32,
}

impl Default for CaptionMetrics {
    fn default() -> Self {
        Self {
            top_margin_px: 50,
            bottom_margin_px: 50,
            line_spacing_pad_px: 10,
        }
    }
}

impl CaptionMetrics {
    /// Metrics configured by `style`.
    pub fn from_style(style: &CaptionStyle) -> Self {
        Self {
            top_margin_px: style.top_margin_px,
            bottom_margin_px: style.bottom_margin_px,
            line_spacing_pad_px: style.line_spacing_pad_px,
        }
    }

    /// Distance between the tops of consecutive lines.
    pub fn line_height_px(&self, font_size_px: f32) -> u32 {
        font_size_px.round() as u32 + self.line_spacing_pad_px
    }

    /// Canvas height for `line_count` lines. Independent of line content.
    pub fn canvas_height_px(&self, font_size_px: f32, line_count: usize) -> u32 {
        let lines = u32::try_from(line_count).unwrap_or(u32::MAX);
        self.top_margin_px
            .saturating_add(lines.saturating_mul(self.line_height_px(font_size_px)))
            .saturating_add(self.bottom_margin_px)
    }
}

/// One line of a laid-out caption.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Line text.
    pub text: String,
    /// Left edge of the line box. Negative when the line is wider than the canvas.
    pub x: i32,
    /// Top edge of the line box.
    pub y: i32,
    /// Measured advance width.
    pub width: f32,
}

/// Canvas geometry and per-line placement, before any pixels exist.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Line pitch in pixels.
    pub line_height: u32,
    /// Lines in reading order.
    pub lines: Vec<PlacedLine>,
}

/// Left edge that centers a line of `line_width` on a canvas of `canvas_width`.
pub fn center_x(canvas_width: u32, line_width: f32) -> i32 {
    ((f64::from(canvas_width) - f64::from(line_width)) / 2.0).floor() as i32
}

/// Stack `lines` top to bottom and center each one on its own.
///
/// Lines are centered independently rather than as a block, so a paragraph with uneven line
/// lengths has a ragged left edge.
pub fn layout_caption<M>(
    lines: &[String],
    canvas_width: u32,
    font_size_px: f32,
    metrics: CaptionMetrics,
    measure: &mut M,
) -> CaptionLayout
where
    M: TextMeasure + ?Sized,
{
    let line_height = metrics.line_height_px(font_size_px);
    let height = metrics.canvas_height_px(font_size_px, lines.len());

    let mut y = i64::from(metrics.top_margin_px);
    let mut placed = Vec::with_capacity(lines.len());
    for text in lines {
        let width = measure.measure(text);
        placed.push(PlacedLine {
            text: text.clone(),
            x: center_x(canvas_width, width),
            y: i32::try_from(y).unwrap_or(i32::MAX),
            width,
        });
        y += i64::from(line_height);
    }

    CaptionLayout {
        width: canvas_width,
        height,
        line_height,
        lines: placed,
    }
}

/// A rendered caption: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl CaptionImage {
    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(off..off + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha RGBA8 bytes, as expected by encoders and PNG writers.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Convert into an [`image::RgbaImage`] with straight alpha.
    pub fn to_rgba_image(&self) -> HookreelResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| HookreelError::validation("caption byte length mismatch"))
    }

    /// Write the caption as a PNG file, creating parent directories.
    pub fn save_png(&self, path: &Path) -> HookreelResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Draw `lines` onto a fresh `canvas_width`-wide canvas filled with `bg`.
///
/// Widths come from `shaper`, the same metric the wrapper should have used.
pub fn rasterize(
    lines: &[String],
    canvas_width: u32,
    shaper: &mut TextShaper,
    fg: Rgba8,
    bg: Rgba8,
    metrics: CaptionMetrics,
) -> HookreelResult<CaptionImage> {
    let font_size_px = shaper.font().size_px();
    let layout = layout_caption(lines, canvas_width, font_size_px, metrics, &mut *shaper);

    let width_u16: u16 = layout
        .width
        .try_into()
        .map_err(|_| HookreelError::validation("caption width exceeds u16"))?;
    let height_u16: u16 = layout
        .height
        .try_into()
        .map_err(|_| HookreelError::validation("caption height exceeds u16"))?;
    if width_u16 == 0 || height_u16 == 0 {
        return Err(HookreelError::validation(
            "caption canvas width/height must be non-zero",
        ));
    }

    let font = shaper.glyph_font().clone();
    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    ctx.set_paint(bg.to_cpu_color());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(layout.width),
        f64::from(layout.height),
    ));

    for placed in &layout.lines {
        if placed.text.is_empty() {
            continue;
        }
        let text_layout = shaper.layout_line(&placed.text, fg);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(placed.x),
            f64::from(placed.y),
        )));
        draw_text_layout(&mut ctx, &font, &text_layout);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    ctx.render_to_pixmap(&mut pixmap);

    tracing::debug!(
        width = layout.width,
        height = layout.height,
        lines = layout.lines.len(),
        "rasterized caption"
    );

    Ok(CaptionImage {
        width: layout.width,
        height: layout.height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

fn draw_text_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<Rgba8>,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            ctx.set_paint(run.style().brush.to_cpu_color());
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
