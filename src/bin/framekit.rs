use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use framekit::{
    CanvasSize, EditorSession, FrameCatalog, FrameLibrary, export_to_dir, load_preset, write_png,
};

#[derive(Parser, Debug)]
#[command(name = "framekit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a photo behind a frame overlay and write a PNG.
    Render(RenderArgs),
    /// List catalog frames and their overlay load status.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input photo (JPEG, PNG, or WebP; max 5 MiB).
    #[arg(long)]
    photo: PathBuf,

    /// Directory containing frame overlay images.
    #[arg(long)]
    frames_root: PathBuf,

    /// Frame catalog JSON; defaults to the built-in catalog (ids 1..=8).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Frame id to overlay; defaults to the first catalog entry.
    #[arg(long)]
    frame: Option<u32>,

    /// Zoom factor (> 0).
    #[arg(long)]
    zoom: Option<f64>,

    /// Rotation in degrees.
    #[arg(long)]
    rotate: Option<f64>,

    /// Brightness percentage (100 = unchanged).
    #[arg(long)]
    brightness: Option<f64>,

    /// Mirror horizontally.
    #[arg(long, default_value_t = false)]
    flip_h: bool,

    /// Mirror vertically.
    #[arg(long, default_value_t = false)]
    flip_v: bool,

    /// Standard output resolution.
    #[arg(long, value_enum, default_value_t = SizeChoice::Hd)]
    size: SizeChoice,

    /// Override the square canvas side in pixels.
    #[arg(long)]
    pixels: Option<u32>,

    /// Output PNG path; an existing directory gets a generated file name.
    #[arg(long)]
    out: PathBuf,

    /// Apply the preset slot saved in this directory before other flags.
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Save the effective settings as the preset slot in this directory.
    #[arg(long)]
    save_preset: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Directory containing frame overlay images.
    #[arg(long)]
    frames_root: PathBuf,

    /// Frame catalog JSON; defaults to the built-in catalog (ids 1..=8).
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SizeChoice {
    Hd,
    Share,
    Preview,
}

impl SizeChoice {
    fn canvas(self) -> CanvasSize {
        match self {
            Self::Hd => CanvasSize::HD,
            Self::Share => CanvasSize::SHARE,
            Self::Preview => CanvasSize::PREVIEW,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_library(catalog: &Option<PathBuf>, frames_root: &Path) -> anyhow::Result<FrameLibrary> {
    let catalog = match catalog {
        Some(path) => FrameCatalog::from_json_file(path)?,
        None => FrameCatalog::builtin(),
    };
    Ok(FrameLibrary::prepare(&catalog, frames_root)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let library = load_library(&args.catalog, &args.frames_root)?;
    let mut session = EditorSession::new(library)?;

    if let Some(dir) = &args.preset {
        let preset = load_preset(dir)?;
        session.apply_preset(&preset)?;
    }

    session.load_photo_file(&args.photo)?;

    if let Some(id) = args.frame {
        session.select_frame(id)?;
    }
    if let Some(zoom) = args.zoom {
        session.set_zoom(zoom)?;
    }
    if let Some(rotate) = args.rotate {
        session.set_rotation_deg(rotate)?;
    }
    if let Some(brightness) = args.brightness {
        session.set_brightness_pct(brightness)?;
    }
    if args.flip_h {
        session.toggle_flip_horizontal();
    }
    if args.flip_v {
        session.toggle_flip_vertical();
    }

    let canvas = match args.pixels {
        Some(side) => CanvasSize::new(side)?,
        None => args.size.canvas(),
    };
    let output = session.render(canvas)?;

    let out_path = if args.out.is_dir() {
        export_to_dir(&args.out, "framekit", &output)?
    } else {
        write_png(&args.out, &output)?;
        args.out.clone()
    };

    if let Some(dir) = &args.save_preset {
        session.save_preset(dir)?;
    }

    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let library = load_library(&args.catalog, &args.frames_root)?;
    for frame in library.frames() {
        let status = match &frame.overlay {
            Some(img) => format!("{}x{}", img.width, img.height),
            None => "unavailable".to_string(),
        };
        println!("{:>3}  {:<24} {}", frame.entry.id, frame.entry.file, status);
    }
    Ok(())
}
