use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use sha2::Digest as _;

use crate::batch::split::split_hooks;
use crate::config::style::CaptionStyle;
use crate::foundation::error::{HookreelError, HookreelResult};
use crate::media::compositor::{Compositor, OverlayJob};
use crate::media::probe::VideoSourceInfo;
use crate::text::caption::CaptionRenderer;
use crate::text::font::FontSpec;
use crate::text::raster::CaptionImage;

/// Assigns an output path to each batch item.
///
/// Called once per hook, in input order, before any item is rendered.
pub trait OutputNamer {
    /// Output path for hook `index` (zero-based).
    fn output_path(&mut self, index: usize, hook: &str) -> PathBuf;
}

impl<F> OutputNamer for F
where
    F: FnMut(usize, &str) -> PathBuf,
{
    fn output_path(&mut self, index: usize, hook: &str) -> PathBuf {
        self(index, hook)
    }
}

/// Names outputs `output_<8 hex>.mp4` inside `dir`, hashing the item index and text.
#[derive(Clone, Debug)]
pub struct HashedOutputNamer {
    dir: PathBuf,
}

impl HashedOutputNamer {
    /// Place outputs under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputNamer for HashedOutputNamer {
    fn output_path(&mut self, index: usize, hook: &str) -> PathBuf {
        let mut hasher = sha2::Sha256::new();
        hasher.update((index as u64).to_le_bytes());
        hasher.update(hook.as_bytes());
        let digest = hasher.finalize();

        let mut short = String::with_capacity(8);
        for b in &digest[..4] {
            short.push_str(&format!("{b:02x}"));
        }
        self.dir.join(format!("output_{short}.mp4"))
    }
}

/// Batch execution options.
#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    /// Fan items out over a rayon pool instead of processing them one at a time.
    pub parallel: bool,
    /// Worker count for the parallel path; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Outcome of a successful batch, in input order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Always `"success"`; failures are returned as errors instead.
    pub status: String,
    /// One output per input hook.
    pub files: Vec<PathBuf>,
}

impl BatchReport {
    /// Report for a batch that produced `files`.
    pub fn success(files: Vec<PathBuf>) -> Self {
        Self {
            status: "success".to_string(),
            files,
        }
    }

    /// Pretty JSON rendering of the report.
    pub fn to_json(&self) -> HookreelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HookreelError::Other(anyhow::Error::new(e)))
    }
}

/// Top-left placement of `image` on `template`.
///
/// Horizontally centered (floored, negative when the image is wider than the frame) and
/// `style.overlay_top_fraction` of the frame height down from the top.
pub fn overlay_position(
    template: &VideoSourceInfo,
    image: &CaptionImage,
    style: &CaptionStyle,
) -> (i32, i32) {
    let x = ((f64::from(template.width) - f64::from(image.width)) / 2.0).floor() as i32;
    (x, style.overlay_top_px(template.height))
}

/// Render every hook onto `template` and hand each result to `compositor`.
///
/// Output paths are assigned by `namer` up front, in input order. The first failing item aborts
/// the batch and its error names the item index. With `opts.parallel`, items run on a rayon pool
/// with one [`CaptionRenderer`] per worker. Once an item fails, items with a higher index are
/// skipped; items already in flight may still finish, and the reported failure is the lowest
/// failing index.
#[tracing::instrument(skip_all, fields(hooks = hooks.len(), parallel = opts.parallel))]
pub fn generate_batch<C, N>(
    hooks: &[String],
    template: &VideoSourceInfo,
    font: &FontSpec,
    style: &CaptionStyle,
    compositor: &C,
    namer: &mut N,
    opts: &BatchOpts,
) -> HookreelResult<BatchReport>
where
    C: Compositor + Sync + ?Sized,
    N: OutputNamer + ?Sized,
{
    if hooks.is_empty() {
        return Err(HookreelError::empty_input("batch has no hooks"));
    }
    style.validate()?;

    let out_paths: Vec<PathBuf> = hooks
        .iter()
        .enumerate()
        .map(|(i, hook)| namer.output_path(i, hook))
        .collect();

    tracing::info!(
        width = template.width,
        height = template.height,
        duration_sec = template.duration_sec,
        "starting batch"
    );

    let files = if opts.parallel {
        run_parallel(hooks, &out_paths, template, font, style, compositor, opts)?
    } else {
        let mut renderer = CaptionRenderer::new(font, style)?;
        let mut files = Vec::with_capacity(hooks.len());
        for (index, (hook, out_path)) in hooks.iter().zip(&out_paths).enumerate() {
            let path = process_item(&mut renderer, compositor, template, index, hook, out_path)
                .map_err(|e| e.with_item(index))?;
            files.push(path);
        }
        files
    };

    Ok(BatchReport::success(files))
}

/// Split `payload` into hooks and run [`generate_batch`] on them.
pub fn generate_from_payload<C, N>(
    payload: &str,
    template: &VideoSourceInfo,
    font: &FontSpec,
    style: &CaptionStyle,
    compositor: &C,
    namer: &mut N,
    opts: &BatchOpts,
) -> HookreelResult<BatchReport>
where
    C: Compositor + Sync + ?Sized,
    N: OutputNamer + ?Sized,
{
    let hooks = split_hooks(payload)?;
    generate_batch(&hooks, template, font, style, compositor, namer, opts)
}

fn run_parallel<C>(
    hooks: &[String],
    out_paths: &[PathBuf],
    template: &VideoSourceInfo,
    font: &FontSpec,
    style: &CaptionStyle,
    compositor: &C,
    opts: &BatchOpts,
) -> HookreelResult<Vec<PathBuf>>
where
    C: Compositor + Sync + ?Sized,
{
    let pool = build_thread_pool(opts.threads)?;
    // Lowest failed index so far; items above it are skipped.
    let first_failure = AtomicUsize::new(usize::MAX);

    let results: Vec<Option<HookreelResult<PathBuf>>> = pool.install(|| {
        hooks
            .par_iter()
            .zip(out_paths.par_iter())
            .enumerate()
            .map_init(
                || None::<CaptionRenderer>,
                |slot, (index, (hook, out_path))| {
                    if index > first_failure.load(Ordering::Acquire) {
                        return None;
                    }
                    let result = render_on_worker(
                        slot, font, style, compositor, template, index, hook, out_path,
                    );
                    if result.is_err() {
                        first_failure.fetch_min(index, Ordering::AcqRel);
                    }
                    Some(result)
                },
            )
            .collect()
    });

    // Every skipped item sits above a recorded failure, so a real error is reached first.
    let mut files = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Some(r) => files.push(r?),
            None => {
                return Err(HookreelError::validation(
                    "internal error: batch item skipped without a recorded failure",
                ));
            }
        }
    }
    Ok(files)
}

#[allow(clippy::too_many_arguments)]
fn render_on_worker<C>(
    slot: &mut Option<CaptionRenderer>,
    font: &FontSpec,
    style: &CaptionStyle,
    compositor: &C,
    template: &VideoSourceInfo,
    index: usize,
    hook: &str,
    out_path: &Path,
) -> HookreelResult<PathBuf>
where
    C: Compositor + ?Sized,
{
    if slot.is_none() {
        *slot = Some(CaptionRenderer::new(font, style).map_err(|e| e.with_item(index))?);
    }
    let renderer = slot
        .as_mut()
        .ok_or_else(|| HookreelError::validation("internal error: worker renderer missing"))?;
    process_item(renderer, compositor, template, index, hook, out_path)
        .map_err(|e| e.with_item(index))
}

fn process_item<C>(
    renderer: &mut CaptionRenderer,
    compositor: &C,
    template: &VideoSourceInfo,
    index: usize,
    hook: &str,
    out_path: &Path,
) -> HookreelResult<PathBuf>
where
    C: Compositor + ?Sized,
{
    let image = renderer.render(hook, template.width)?;
    let (x, y) = overlay_position(template, &image, renderer.style());

    compositor.composite(&OverlayJob {
        template,
        image: &image,
        x,
        y,
        duration_sec: template.duration_sec,
        out_path,
    })?;

    tracing::info!(
        index,
        caption_height = image.height,
        out = %out_path.display(),
        "hook rendered"
    );
    Ok(out_path.to_path_buf())
}

fn build_thread_pool(threads: Option<usize>) -> HookreelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HookreelError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HookreelError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/run.rs"]
mod tests;
