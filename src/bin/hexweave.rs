use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Parser, Debug)]
#[command(name = "hexweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the encoding of a text as JSON.
    Encode(EncodeArgs),
    /// Replay an interaction script into numbered PNG frames.
    Play(PlayArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DeviceChoice {
    Pointer,
    Touch,
}

impl From<DeviceChoice> for hexweave::DeviceClass {
    fn from(d: DeviceChoice) -> Self {
        match d {
            DeviceChoice::Pointer => Self::Pointer,
            DeviceChoice::Touch => Self::Touch,
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Text to encode.
    #[arg(long, default_value = "")]
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Side of the square canvas in CSS pixels.
    #[arg(long, default_value_t = 512.0)]
    size: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    #[arg(long, value_enum, default_value_t = DeviceChoice::Pointer)]
    device: DeviceChoice,

    /// Profile overrides (JSON).
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Tilt in degrees; any rotation or progress flag switches to the 3D view.
    #[arg(long)]
    rotate_x: Option<f64>,

    /// Spin in degrees.
    #[arg(long)]
    rotate_y: Option<f64>,

    /// 2D/3D blend in [0, 1].
    #[arg(long)]
    progress: Option<f64>,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Text to encode.
    #[arg(long)]
    text: String,

    /// Side of the canvas used for the frame digest.
    #[arg(long, default_value_t = 256.0)]
    size: f64,

    #[arg(long, value_enum, default_value_t = DeviceChoice::Pointer)]
    device: DeviceChoice,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Override the script frame rate.
    #[arg(long)]
    fps: Option<f64>,

    /// Render frames on a thread pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Encode(args) => cmd_encode(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_profile(
    path: Option<&Path>,
    device: hexweave::DeviceClass,
) -> anyhow::Result<hexweave::Profile> {
    match path {
        Some(p) => hexweave::Profile::from_path(p, device)
            .with_context(|| format!("load profile '{}'", p.display())),
        None => Ok(hexweave::Profile::for_device(device)),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let device = hexweave::DeviceClass::from(args.device);
    let profile = load_profile(args.profile.as_deref(), device)?;
    let layout = hexweave::GridLayout::new(args.size, args.dpr)?;

    let wants_3d = args.rotate_x.is_some() || args.rotate_y.is_some() || args.progress.is_some();
    let snapshot = if wants_3d {
        let rotation = hexweave::Rotation::new(
            args.rotate_x.unwrap_or(0.0),
            args.rotate_y.unwrap_or(0.0),
        )
        .clamp_tilt();
        hexweave::Snapshot::new(
            args.text.as_str(),
            hexweave::ProjectionState {
                is_3d: true,
                rotation,
                progress: args.progress.unwrap_or(1.0).clamp(0.0, 1.0),
            },
        )
    } else {
        hexweave::Snapshot::flat(args.text.as_str())
    };

    let mut backend = hexweave::create_backend(hexweave::BackendKind::Cpu, layout.side_px())?;
    let frame = hexweave::render_snapshot(&snapshot, &layout, &profile, backend.as_mut())?;
    hexweave::save_png(&frame, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let glyph = hexweave::Glyph::from_text(&args.text);
    let device = hexweave::DeviceClass::from(args.device);
    let profile = hexweave::Profile::for_device(device);
    let layout = hexweave::GridLayout::new(args.size, 1.0)?;

    let mut backend = hexweave::CpuBackend::new(layout.side_px())?;
    let frame = hexweave::render_snapshot(
        &hexweave::Snapshot::flat(args.text.as_str()),
        &layout,
        &profile,
        &mut backend,
    )?;

    let out = serde_json::json!({
        "text": args.text,
        "hex": glyph.hex,
        "vertices": glyph.vertices,
        "triangles": glyph.triangle_count(),
        "frame": {
            "width": frame.width,
            "height": frame.height,
            "sha256": sha256_hex(&frame.data),
        },
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize encoding")?
    );
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut script = hexweave::Script::from_path(&args.script)
        .with_context(|| format!("load script '{}'", args.script.display()))?;
    if let Some(fps) = args.fps {
        script.fps = fps;
    }
    let recording = script.record()?;

    let threading = hexweave::RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
        elide_duplicates: true,
    };
    let (frames, stats) = recording.render(&threading)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        let path = args.out_dir.join(format!("frame_{i:05}.png"));
        hexweave::save_png(frame, &path)
            .with_context(|| format!("write png '{}'", path.display()))?;
    }

    tracing::info!(
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "playback finished"
    );
    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
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
