use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a hairstyle onto one image using recorded landmarks.
    Frame(FrameArgs),
    /// List the hairstyles of one category.
    List(ListArgs),
    /// Print the default engine configuration as JSON.
    Config,
    /// Print a synthetic frontal landmark set as JSON.
    Synth(SynthArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Landmark JSON: `{"space": "normalized" | "pixel", "landmarks": [[x, y], ...]}`.
    #[arg(long)]
    landmarks: PathBuf,

    /// Hairstyle reference relative to the assets root, e.g. `male/fade.png`.
    #[arg(long)]
    asset: String,

    /// Hairstyle directory (overrides the config's `assets.root`).
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Horizontal offset in pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_x: f64,

    /// Vertical offset in pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_y: f64,

    /// Scale multiplier.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Extra rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Output path; `.jpg`/`.jpeg` writes JPEG, anything else PNG.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Hairstyle directory.
    #[arg(long)]
    assets_root: PathBuf,

    /// Category subdirectory, e.g. `male`.
    #[arg(long)]
    category: String,
}

#[derive(Parser, Debug)]
struct SynthArgs {
    /// Frame width the landmarks are normalized against.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Frame height the landmarks are normalized against.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Face centre x in pixels.
    #[arg(long, default_value_t = 320.0)]
    cx: f64,

    /// Face centre y in pixels.
    #[arg(long, default_value_t = 240.0)]
    cy: f64,

    /// Temple-to-temple distance in pixels.
    #[arg(long, default_value_t = 160.0)]
    face_width: f64,

    /// Head tilt in degrees, counter-clockwise on screen.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    roll: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::List(args) => cmd_list(args),
        Command::Config => cmd_config(),
        Command::Synth(args) => cmd_synth(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => coif::EngineConfig::from_path(path)?,
        None => coif::EngineConfig::default(),
    };
    if let Some(root) = &args.assets_root {
        cfg.assets.root = root.clone();
    }

    let detector = Arc::new(coif::StaticDetector::from_path(&args.landmarks)?);
    let pipeline = coif::FramePipeline::with_dir_assets(cfg, detector)?;

    const SESSION: &str = "cli";
    pipeline.select_asset(SESSION, &args.asset)?;
    pipeline.set_adjustment(
        SESSION,
        coif::Adjustment {
            offset_x: args.offset_x,
            offset_y: args.offset_y,
            scale: args.scale,
            rotation_deg: args.rotation,
        },
    )?;

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read input image '{}'", args.in_path.display()))?;
    let frame = coif::decode_frame(&bytes)?;
    let result = pipeline.process_frame(&frame, SESSION)?;

    let encoded = if is_jpeg(&args.out) {
        coif::encode_jpeg(&result.frame, pipeline.config().composite.jpeg_quality)?
    } else {
        coif::encode_png(&result.frame)?
    };
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, encoded)
        .with_context(|| format!("write output '{}'", args.out.display()))?;

    println!("face_detected={}", result.face_detected);
    if let Some(p) = &result.placement {
        println!(
            "scale={:.4} rotation_deg={:.2} target=({:.1}, {:.1})",
            p.scale,
            p.rotation_deg(),
            p.target.x,
            p.target.y
        );
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let provider = coif::DirAssetProvider::with_root(args.assets_root);
    for name in provider.list(&args.category)? {
        println!("{name}");
    }
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    println!("{}", coif::EngineConfig::default().to_json_pretty()?);
    Ok(())
}

fn cmd_synth(args: SynthArgs) -> anyhow::Result<()> {
    let face = coif::SyntheticFace {
        center: coif::Point::new(args.cx, args.cy),
        face_width: args.face_width,
        roll: args.roll.to_radians(),
        ..coif::SyntheticFace::default()
    };
    let landmarks =
        face.normalized_landmarks(&coif::PoseConfig::default(), args.width, args.height);
    let doc = serde_json::json!({
        "space": coif::CoordinateSpace::Normalized,
        "landmarks": landmarks
            .iter()
            .map(|l| [l.x, l.y])
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}
