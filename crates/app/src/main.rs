use std::path::{Path, PathBuf};

use beat_collage_core::{AppConfig, BeatSchedule, Composition, CompositionProps};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> beat_collage_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { inputs, output } => run_plan(&inputs, output.as_deref()),
        Commands::Frame { inputs, frame } => run_frame(&inputs, frame),
    }
}

fn run_plan(inputs: &Inputs, output: Option<&Path>) -> beat_collage_core::Result<()> {
    let composition = inputs.load()?;
    let timeline = composition.timeline();
    tracing::info!(
        items = timeline.len(),
        groups = timeline.group_count(),
        "planned timeline"
    );

    let json = serde_json::to_string_pretty(timeline)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(?path, "timeline written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_frame(inputs: &Inputs, frame: u64) -> beat_collage_core::Result<()> {
    let composition = inputs.load()?;
    if frame >= composition.duration_frames() {
        tracing::warn!(
            frame,
            duration = composition.duration_frames(),
            "frame is past the configured duration"
        );
    }

    let scene = composition.frame(frame);
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Beat-synchronised image collage planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the full timeline and dump it as JSON.
    Plan {
        #[command(flatten)]
        inputs: Inputs,
        /// Write the timeline here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the layers visible on a single frame.
    Frame {
        #[command(flatten)]
        inputs: Inputs,
        /// Zero-based frame number.
        frame: u64,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Composition props: `{ "title", "images", "music" }`.
    #[arg(short, long)]
    props: PathBuf,
    /// Beat schedule `{ "beat_times": [...] }`; the demo schedule when omitted.
    #[arg(short, long)]
    beats: Option<PathBuf>,
    /// Video and layout configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Inputs {
    fn load(&self) -> beat_collage_core::Result<Composition> {
        let config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::shorts_defaults(),
        };
        let schedule = match &self.beats {
            Some(path) => BeatSchedule::load(path)?,
            None => BeatSchedule::demo(),
        };
        let props = CompositionProps::load(&self.props)?;
        tracing::debug!(images = props.images.len(), beats = schedule.len(), "inputs loaded");

        Composition::new(config, schedule, props)
    }
}
