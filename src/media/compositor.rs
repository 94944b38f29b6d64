use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{HookreelError, HookreelResult};
use crate::media::probe::VideoSourceInfo;
use crate::text::raster::CaptionImage;

/// One still overlay composited onto a template for a fixed duration.
#[derive(Clone, Copy, Debug)]
pub struct OverlayJob<'a> {
    /// Base video.
    pub template: &'a VideoSourceInfo,
    /// Still layer drawn on top of every frame.
    pub image: &'a CaptionImage,
    /// Left edge of the layer in frame pixels.
    pub x: i32,
    /// Top edge of the layer in frame pixels.
    pub y: i32,
    /// Output duration in seconds.
    pub duration_sec: f64,
    /// Destination file.
    pub out_path: &'a Path,
}

/// The external video capability: base video + still layer + placement + duration -> new video.
///
/// Implementations own codec choice and persistence. Errors are reported as
/// [`HookreelError::Compositor`] and are not retried by callers in this crate.
pub trait Compositor {
    /// Produce `job.out_path`.
    fn composite(&self, job: &OverlayJob<'_>) -> HookreelResult<()>;
}

/// Pass-through encoder settings for [`FfmpegCompositor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// `-c:v` value.
    pub video_codec: String,
    /// `-c:a` value, used when the template has audio.
    pub audio_codec: String,
    /// Output pixel format.
    pub pix_fmt: String,
    /// Replace existing output files.
    pub overwrite: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            pix_fmt: "yuv420p".to_string(),
            overwrite: true,
        }
    }
}

impl EncodeConfig {
    /// Reject empty codec names.
    pub fn validate(&self) -> HookreelResult<()> {
        if self.video_codec.trim().is_empty() {
            return Err(HookreelError::validation("video_codec must be non-empty"));
        }
        if self.audio_codec.trim().is_empty() {
            return Err(HookreelError::validation("audio_codec must be non-empty"));
        }
        if self.pix_fmt.trim().is_empty() {
            return Err(HookreelError::validation("pix_fmt must be non-empty"));
        }
        Ok(())
    }
}

/// Whether an `ffmpeg` binary can be executed.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> HookreelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// [`Compositor`] backed by the system `ffmpeg` binary.
///
/// The overlay is streamed as a single raw RGBA frame on stdin; ffmpeg's `overlay` filter keeps
/// repeating that last frame, and `-t` bounds the output to the requested duration. Template
/// audio is copied through the configured audio codec when present.
#[derive(Clone, Debug, Default)]
pub struct FfmpegCompositor {
    cfg: EncodeConfig,
}

impl FfmpegCompositor {
    /// Create a compositor with the given encoder settings.
    pub fn new(cfg: EncodeConfig) -> Self {
        Self { cfg }
    }

    /// Encoder settings in use.
    pub fn config(&self) -> &EncodeConfig {
        &self.cfg
    }

    /// Full ffmpeg argument list for `job` (program name excluded).
    pub fn ffmpeg_args(&self, job: &OverlayJob<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let overwrite = if self.cfg.overwrite { "-y" } else { "-n" };
        args.extend([overwrite, "-loglevel", "error", "-i"].map(OsString::from));
        args.push(job.template.source_path.clone().into_os_string());

        // Input 1: the caption as one raw RGBA frame on stdin.
        args.extend(
            [
                "-f".to_string(),
                "rawvideo".to_string(),
                "-pix_fmt".to_string(),
                "rgba".to_string(),
                "-s".to_string(),
                format!("{}x{}", job.image.width, job.image.height),
                "-i".to_string(),
                "pipe:0".to_string(),
                "-filter_complex".to_string(),
                format!(
                    "[0:v][1:v]overlay=x={}:y={}:eof_action=repeat[v]",
                    job.x, job.y
                ),
                "-map".to_string(),
                "[v]".to_string(),
            ]
            .map(OsString::from),
        );

        if job.template.has_audio {
            args.extend(["-map", "0:a?", "-c:a"].map(OsString::from));
            args.push(OsString::from(&self.cfg.audio_codec));
        } else {
            args.push(OsString::from("-an"));
        }

        args.extend(
            [
                "-t".to_string(),
                format!("{:.6}", job.duration_sec),
                "-c:v".to_string(),
                self.cfg.video_codec.clone(),
                "-pix_fmt".to_string(),
                self.cfg.pix_fmt.clone(),
                "-movflags".to_string(),
                "+faststart".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(job.out_path.as_os_str().to_os_string());
        args
    }
}

impl Compositor for FfmpegCompositor {
    #[tracing::instrument(skip(self, job), fields(out = %job.out_path.display()))]
    fn composite(&self, job: &OverlayJob<'_>) -> HookreelResult<()> {
        self.cfg.validate()?;
        if !job.duration_sec.is_finite() || job.duration_sec <= 0.0 {
            return Err(HookreelError::validation(
                "overlay duration must be finite and > 0",
            ));
        }
        let expected_len = job.image.width as usize * job.image.height as usize * 4;
        if job.image.width == 0 || job.image.height == 0 || job.image.data.len() != expected_len
        {
            return Err(HookreelError::validation(
                "overlay image size mismatch with width*height*4",
            ));
        }

        ensure_parent_dir(job.out_path)?;
        if !self.cfg.overwrite && job.out_path.exists() {
            return Err(HookreelError::validation(format!(
                "output file '{}' already exists",
                job.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(HookreelError::compositor(
                "ffmpeg is required for compositing, but was not found on PATH",
            ));
        }

        let args = self.ffmpeg_args(job);
        tracing::debug!(?args, "spawning ffmpeg");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                HookreelError::compositor(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| HookreelError::compositor("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            HookreelError::compositor("failed to open ffmpeg stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let write_result = stdin.write_all(&job.image.to_straight_rgba8());
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| HookreelError::compositor(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| HookreelError::compositor("ffmpeg stderr reader panicked"))?
            .unwrap_or_default();

        if !status.success() {
            return Err(HookreelError::compositor(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        write_result.map_err(|e| {
            HookreelError::compositor(format!("failed to write overlay to ffmpeg stdin: {e}"))
        })?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/compositor.rs"]
mod tests;
