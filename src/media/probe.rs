use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{HookreelError, HookreelResult};

/// Template video metadata as reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Path the metadata was read from.
    pub source_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate numerator.
    pub fps_num: u32,
    /// Frame rate denominator.
    pub fps_den: u32,
    /// Container duration in seconds.
    pub duration_sec: f64,
    /// Whether the container has an audio stream.
    pub has_audio: bool,
}

impl VideoSourceInfo {
    /// Frame rate as a float, `0.0` when unknown.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Whether an `ffprobe` binary can be executed.
pub fn is_ffprobe_on_path() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Read width, height, frame rate, duration, and audio presence of `source_path`.
#[tracing::instrument(skip(source_path), fields(path = %source_path.display()))]
pub fn probe_video(source_path: &Path) -> HookreelResult<VideoSourceInfo> {
    if !source_path.is_file() {
        return Err(HookreelError::compositor(format!(
            "template video '{}' does not exist",
            source_path.display()
        )));
    }

    if !is_ffprobe_on_path() {
        return Err(HookreelError::compositor(
            "ffprobe is required for probing templates, but was not found on PATH",
        ));
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| {
            HookreelError::compositor(format!(
                "failed to run ffprobe (is it installed and on PATH?): {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(HookreelError::compositor(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let info = parse_probe_json(source_path, &out.stdout)?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        duration_sec = info.duration_sec,
        "probed template"
    );
    Ok(info)
}

/// Build [`VideoSourceInfo`] from `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_json(source_path: &Path, json: &[u8]) -> HookreelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| HookreelError::compositor(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| HookreelError::compositor("no video stream found"))?;
    let width = video_stream
        .width
        .filter(|&w| w > 0)
        .ok_or_else(|| HookreelError::compositor("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .filter(|&h| h > 0)
        .ok_or_else(|| HookreelError::compositor("missing video height from ffprobe"))?;

    // Frame rate is informational only; ffprobe reports "0/0" for some containers.
    let (fps_num, fps_den) = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_ff_ratio)
        .unwrap_or((0, 1));

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video_stream.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| {
            HookreelError::compositor(format!(
                "template video '{}' has no usable duration",
                source_path.display()
            ))
        })?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        has_audio,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.trim().parse::<u32>().ok()?;
    let b = parts.next()?.trim().parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
