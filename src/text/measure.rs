/// Rendered-width metric for a single line of text, in pixels.
///
/// The wrapper and the rasterizer must be driven by the same implementation for a caption,
/// otherwise lines accepted by the wrapper can overflow once drawn. [`crate::TextShaper`] is the
/// font-backed implementation; any `FnMut(&str) -> f32` closure also qualifies, which keeps
/// layout tests independent of font files.
pub trait TextMeasure {
    /// Width of `text` laid out on one line.
    fn measure(&mut self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str) -> f32,
{
    fn measure(&mut self, text: &str) -> f32 {
        self(text)
    }
}
