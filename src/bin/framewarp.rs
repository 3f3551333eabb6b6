use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framewarp::{Affine, FrameBuffer, Homography, OutputOrigin, Worker};

#[derive(Parser, Debug)]
#[command(name = "framewarp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Worker threads (omit for single-threaded execution).
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Nearest-neighbor resize of a PNG.
    Resize(ResizeArgs),
    /// Rotate a PNG about its center (nearest-pixel sampling).
    Rotate(RotateArgs),
    /// Warp a PNG through a homography read from a JSON file.
    Warp(WarpArgs),
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Target width in pixels.
    #[arg(long)]
    width: u32,

    /// Target height in pixels.
    #[arg(long)]
    height: u32,
}

#[derive(Parser, Debug)]
struct RotateArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Clockwise rotation angle in degrees.
    #[arg(long)]
    degrees: f64,
}

#[derive(Parser, Debug)]
struct WarpArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON file holding the output-to-input homography as
    /// `{"rows": [[..], [..], [..]]}`.
    #[arg(long)]
    transform: PathBuf,

    /// Output width (defaults to the input width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height (defaults to the input height).
    #[arg(long)]
    height: Option<u32>,

    /// Output-origin offset x.
    #[arg(long, default_value_t = 0)]
    origin_x: i32,

    /// Output-origin offset y.
    #[arg(long, default_value_t = 0)]
    origin_y: i32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let worker = match cli.threads {
        Some(n) => Some(Worker::with_threads(n)?),
        None => None,
    };
    let worker = worker.as_ref();

    match cli.cmd {
        Command::Resize(args) => cmd_resize(args, worker),
        Command::Rotate(args) => cmd_rotate(args, worker),
        Command::Warp(args) => cmd_warp(args, worker),
    }
}

fn load_rgba(path: &Path) -> anyhow::Result<FrameBuffer<u8>> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(FrameBuffer::from_vec(width, height, 4, 0, img.into_raw())?)
}

fn save_rgba(frame: &FrameBuffer<u8>, path: &Path) -> anyhow::Result<()> {
    let img =
        image::RgbaImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .context("assemble output image")?;
    img.save(path)
        .with_context(|| format!("write image '{}'", path.display()))
}

fn read_homography_json(path: &Path) -> anyhow::Result<Homography> {
    let f = File::open(path).with_context(|| format!("open transform '{}'", path.display()))?;
    let r = BufReader::new(f);
    let h: Homography = serde_json::from_reader(r).with_context(|| "parse transform JSON")?;
    Ok(h)
}

fn cmd_resize(args: ResizeArgs, worker: Option<&Worker>) -> anyhow::Result<()> {
    let source = load_rgba(&args.in_path)?;
    let mut target = FrameBuffer::<u8>::new(args.width, args.height, 4, 0)?;
    framewarp::resize(&source.view(), &mut target.view_mut(), worker)?;
    save_rgba(&target, &args.out)
}

fn cmd_rotate(args: RotateArgs, worker: Option<&Worker>) -> anyhow::Result<()> {
    let source = load_rgba(&args.in_path)?;
    let mut target =
        FrameBuffer::<u8>::new(source.width(), source.height(), 4, 0)?;

    // The transform maps output pixels to input pixels, so a clockwise
    // rotation of the image samples along the counterclockwise rotation.
    let center = (
        f64::from(source.width()) / 2.0,
        f64::from(source.height()) / 2.0,
    );
    let transform = Affine::translate(center)
        * Affine::rotate(-args.degrees.to_radians())
        * Affine::translate((-center.0, -center.1));

    framewarp::affine(
        &source.view(),
        &mut target.view_mut(),
        &transform,
        &framewarp::WarpOptions::default(),
        worker,
    )?;
    save_rgba(&target, &args.out)
}

fn cmd_warp(args: WarpArgs, worker: Option<&Worker>) -> anyhow::Result<()> {
    let source = load_rgba(&args.in_path)?;
    let transform = read_homography_json(&args.transform)?;
    let width = args.width.unwrap_or_else(|| source.width());
    let height = args.height.unwrap_or_else(|| source.height());
    let mut target = FrameBuffer::<u8>::new(width, height, 4, 0)?;

    let options = framewarp::WarpOptions {
        origin: OutputOrigin::new(args.origin_x, args.origin_y),
        ..Default::default()
    };
    framewarp::homography(
        &source.view(),
        &mut target.view_mut(),
        &transform,
        &options,
        worker,
    )?;
    save_rgba(&target, &args.out)
}
