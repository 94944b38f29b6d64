use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "hookreel", version)]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one video per hook over a template (requires `ffmpeg`/`ffprobe` on PATH).
    Generate(GenerateArgs),
    /// Render a single caption as a PNG.
    Caption(CaptionArgs),
    /// Print template video metadata as JSON (requires `ffprobe` on PATH).
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct StyleArgs {
    /// Caption style JSON; missing keys use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file, overriding the style.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels, overriding the style.
    #[arg(long)]
    font_size: Option<f32>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Template video.
    #[arg(long, default_value = "template.mp4")]
    template: PathBuf,

    /// File with hooks separated by blank lines (`-` for stdin).
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    hooks: Option<PathBuf>,

    /// Hooks payload given inline, separated by blank lines.
    #[arg(long)]
    text: Option<String>,

    /// Directory receiving the generated videos.
    #[arg(long, default_value = "videos")]
    out_dir: PathBuf,

    /// Render items concurrently.
    #[arg(long)]
    parallel: bool,

    /// Worker count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct CaptionArgs {
    /// Caption text.
    #[arg(long)]
    text: String,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print font diagnostics (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_font: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Template video.
    #[arg(long, default_value = "template.mp4")]
    template: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Caption(args) => cmd_caption(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_style(args: &StyleArgs) -> anyhow::Result<hookreel::CaptionStyle> {
    let mut style = match &args.config {
        Some(path) => hookreel::CaptionStyle::from_path(path)?,
        None => hookreel::CaptionStyle::default(),
    };
    if let Some(font) = &args.font {
        style.font_path = font.clone();
    }
    if let Some(size) = args.font_size {
        style.font_size_px = size;
    }
    style.validate()?;
    Ok(style)
}

fn read_payload(args: &GenerateArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    let Some(path) = &args.hooks else {
        anyhow::bail!("either --hooks or --text is required");
    };
    if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read hooks from stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("read hooks '{}'", path.display()))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let style = load_style(&args.style)?;
    let payload = read_payload(&args)?;
    let hooks = hookreel::split_hooks(&payload)?;

    let font = hookreel::FontSpec::load(&style.font_path, style.font_size_px)?;
    let template = hookreel::probe_video(&args.template)?;
    let compositor = hookreel::FfmpegCompositor::default();
    let mut namer = hookreel::HashedOutputNamer::new(&args.out_dir);
    let opts = hookreel::BatchOpts {
        parallel: args.parallel,
        threads: args.threads,
    };

    let report = hookreel::generate_batch(
        &hooks,
        &template,
        &font,
        &style,
        &compositor,
        &mut namer,
        &opts,
    )?;

    println!("{}", report.to_json()?);
    Ok(())
}

fn cmd_caption(args: CaptionArgs) -> anyhow::Result<()> {
    let style = load_style(&args.style)?;
    let font = hookreel::FontSpec::load(&style.font_path, style.font_size_px)?;

    if args.dump_font {
        eprintln!("font diagnostics:");
        eprintln!("  path:    {}", font.path().display());
        eprintln!("  family:  {}", font.family());
        eprintln!("  size_px: {}", font.size_px());
        eprintln!("  sha256:  {}", sha256_hex(font.bytes()));
    }

    let mut renderer = hookreel::CaptionRenderer::new(&font, &style)?;
    let image = renderer.render(&args.text, args.width)?;

    hookreel::ensure_parent_dir(&args.out)?;
    image.save_png(&args.out)?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        image.width,
        image.height
    );
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let info = hookreel::probe_video(&args.template)?;
    let json = serde_json::json!({
        "path": info.source_path,
        "width": info.width,
        "height": info.height,
        "fps": info.source_fps(),
        "duration_sec": info.duration_sec,
        "has_audio": info.has_audio,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
