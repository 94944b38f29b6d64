//! Hookreel burns short text hooks onto a template video as captions.
//!
//! The core is a text-to-image layout engine: a caption string is greedily word-wrapped against
//! the template width, rasterized as centered lines on a solid background, and handed to a
//! [`Compositor`] together with a placement and the template duration.
//!
//! - [`wrap`] and [`rasterize`] are the pure layout/raster steps
//! - [`CaptionRenderer`] runs both for one caption
//! - [`generate_batch`] drives a whole batch through a [`Compositor`] such as [`FfmpegCompositor`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod batch;
pub(crate) mod config;
pub(crate) mod media;
pub(crate) mod text;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::error::{HookreelError, HookreelResult};

pub use crate::batch::run::{
    BatchOpts, BatchReport, HashedOutputNamer, OutputNamer, generate_batch,
    generate_from_payload, overlay_position,
};
pub use crate::batch::split::{BATCH_SEPARATOR, split_hooks};
pub use crate::config::style::{CaptionStyle, DEFAULT_FONT_PATH};
pub use crate::media::compositor::{
    Compositor, EncodeConfig, FfmpegCompositor, OverlayJob, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use crate::media::probe::{
    VideoSourceInfo, is_ffprobe_on_path, parse_probe_json, probe_video,
};
pub use crate::text::caption::CaptionRenderer;
pub use crate::text::font::{FontSpec, TextShaper};
pub use crate::text::measure::TextMeasure;
pub use crate::text::raster::{
    CaptionImage, CaptionLayout, CaptionMetrics, PlacedLine, center_x, layout_caption, rasterize,
};
pub use crate::text::wrap::{PARAGRAPH_SEPARATOR, wrap};
