#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Fonts commonly present on Linux/macOS CI images. `HOOKREEL_TEST_FONT` wins when set.
const CANDIDATE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/roboto/Roboto-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

pub fn find_test_font() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("HOOKREEL_TEST_FONT").map(PathBuf::from)
        && p.is_file()
    {
        return Some(p);
    }
    CANDIDATE_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

pub fn ffmpeg_tools_available() -> bool {
    let ok = |bin: &str| {
        Command::new(bin)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    };
    ok("ffmpeg") && ok("ffprobe")
}

/// Synthesize a small template video with a test pattern and, optionally, a tone.
pub fn synth_template(path: &Path, with_audio: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-v", "error", "-y", "-f", "lavfi", "-i", "testsrc=size=320x240:rate=25"]);
    if with_audio {
        cmd.args(["-f", "lavfi", "-i", "sine=frequency=440:sample_rate=48000"]);
    }
    cmd.args(["-t", "1", "-pix_fmt", "yuv420p", "-c:v", "libx264"]);
    if with_audio {
        cmd.args(["-c:a", "aac"]);
    }
    let status = cmd.arg(path).status()?;
    anyhow::ensure!(status.success(), "ffmpeg failed creating {}", path.display());
    Ok(())
}

pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("hookreel_tests").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
