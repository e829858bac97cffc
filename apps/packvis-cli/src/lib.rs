use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;

use packvis_core::{build, AnchorMode, LayoutInput, Subject, VisError};
use packvis_io::{
    load_scene_file, load_style, merge_json_files, read_document, write_merged, MergeError,
    MergeOutcome, SettingsError,
};
use packvis_renderer::{render, RenderMode, RenderResult, Viewport};

// ── Arguments ────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "packvis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render packed rectangle layouts for visual verification", long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw rectangles inside their container, on screen or to an image file
    Render(RenderArgs),

    /// Combine several JSON files into one document keyed by file name
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Rectangle list: inline JSON or a JSON file
    #[arg(required_unless_present = "scene")]
    pub rectangles: Option<String>,

    /// Container: [w, h], {"width", "height"} or {"x", "y", "w", "h"}; inline or a file
    #[arg(required_unless_present = "scene")]
    pub container: Option<String>,

    /// Optional usable area rectangle; inline or a file
    pub usable_area: Option<String>,

    /// Which corner the packer reports (bottom-left or top-left)
    #[arg(short, long, required_unless_present = "scene")]
    pub anchor: Option<AnchorMode>,

    /// Scene file holding all inputs instead of the positional arguments
    #[arg(long, conflicts_with_all = ["rectangles", "container", "usable_area"])]
    pub scene: Option<PathBuf>,

    /// Style settings file
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// Write an .svg or .png image instead of opening a window
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Figure title
    #[arg(long)]
    pub title: Option<String>,

    /// Print what was drawn as JSON
    #[arg(long)]
    pub summary: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// JSON files to combine
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Combined output file
    #[arg(short, long)]
    pub output: PathBuf,
}

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Vis(#[from] VisError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl CliError {
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Vis(err) => err.kind(),
            CliError::Settings(_) => "SettingsError",
            CliError::Merge(_) => "MergeError",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Vis(VisError::MalformedInput { .. }) => 2,
            CliError::Vis(VisError::EmptyContainer { .. }) => 3,
            CliError::Vis(VisError::DegenerateGeometry { .. }) => 4,
            CliError::Vis(VisError::RenderTarget { .. }) => 5,
            CliError::Vis(VisError::NoDisplay(_)) => 6,
            CliError::Settings(_) | CliError::Merge(_) => 1,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

/// Normalize, build and render one layout.
pub fn render_command(args: &RenderArgs) -> Result<RenderResult, CliError> {
    let (input, scene_style) = match &args.scene {
        Some(path) => load_scene_file(path, args.anchor)?,
        None => (positional_input(args)?, None),
    };

    let mut style = match &args.style {
        Some(path) => load_style(path)?,
        None => scene_style.unwrap_or_default(),
    };
    if let Some(title) = &args.title {
        style.title = Some(title.clone());
    }

    let normalized = input.normalize()?;
    let scene = build(&normalized)?;
    let viewport = Viewport::from_extent(normalized.viewport_extent());
    let mode = match &args.output {
        Some(path) => RenderMode::Export(path.clone()),
        None => RenderMode::Display,
    };

    Ok(render(&scene, viewport, &mode, &style)?)
}

fn positional_input(args: &RenderArgs) -> Result<LayoutInput, VisError> {
    let anchor_mode = args.anchor.ok_or_else(|| {
        VisError::malformed(Subject::AnchorMode, "--anchor is required without --scene")
    })?;
    let rectangles = args
        .rectangles
        .as_deref()
        .ok_or_else(|| VisError::malformed(Subject::RectangleList, "no rectangles given"))?;
    let container = args
        .container
        .as_deref()
        .ok_or_else(|| VisError::malformed(Subject::Container, "no container given"))?;

    let rectangles = read_document(rectangles, Subject::RectangleList)?;
    let container = read_document(container, Subject::Container)?;
    let usable_area = args
        .usable_area
        .as_deref()
        .map(|source| read_document(source, Subject::UsableArea))
        .transpose()?;

    LayoutInput::from_values(&rectangles, &container, usable_area.as_ref(), anchor_mode)
}

/// Merge the inputs and write the combined document.
pub fn merge_command(args: &MergeArgs) -> Result<MergeOutcome, CliError> {
    let outcome = merge_json_files(&args.inputs);
    write_merged(&args.output, &outcome)?;
    Ok(outcome)
}

// ── Entry point ──────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// Run with the process arguments and return the exit code.
pub fn run() -> i32 {
    run_with(std::env::args_os())
}

pub fn run_with<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    init_logging(cli.verbose);

    let outcome = match &cli.command {
        Command::Render(args) => render_command(args).map(|result| {
            if args.summary {
                match serde_json::to_string(&result) {
                    Ok(json) => println!("{}", json),
                    Err(err) => log::warn!("Could not serialize render summary: {}", err),
                }
            }
        }),
        Command::Merge(args) => merge_command(args).map(|outcome| {
            if !outcome.skipped.is_empty() {
                log::warn!("{} input file(s) skipped", outcome.skipped.len());
            }
            println!(
                "Combined JSON data has been written to '{}'",
                args.output.display()
            );
        }),
    };

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}: {}", err.kind(), err);
            err.exit_code()
        }
    }
}
