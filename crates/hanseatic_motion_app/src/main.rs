// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hanseatic motion - headless driver
//!
//! Replays a synthetic scroll over the simulated landing page and reports
//! what the motion engine rendered.

use clap::Parser;
use hanseatic_motion::MotionConfig;
use hanseatic_motion_app::{run, DriverError, HeadlessPage, RunSummary, ScrollScript};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "hanseatic_motion")]
#[command(version, about = "Replay scroll-driven motion over the headless Hanseatic page")]
struct Cli {
    /// Motion configuration (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Behave as if the user prefers reduced motion
    #[arg(long)]
    reduced_motion: bool,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 900)]
    frames: usize,

    /// Raw scroll input per frame in pixels
    #[arg(short, long, default_value_t = 24.0)]
    scroll_step: f32,

    /// Emit sampled frames as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Sample every N frames
    #[arg(long, default_value_t = 30)]
    sample_every: usize,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 900.0)]
    viewport: f32,
}

fn execute(cli: &Cli) -> Result<RunSummary, DriverError> {
    let config = match &cli.config {
        Some(path) => MotionConfig::load(path)?,
        None => MotionConfig::default(),
    };
    let script = ScrollScript {
        frames: cli.frames,
        scroll_step: cli.scroll_step,
        sample_every: cli.sample_every,
        ..ScrollScript::default()
    };

    let mut page = HeadlessPage::hanseatic(cli.viewport).with_reduced_motion(cli.reduced_motion);
    let summary = run(&mut page, config, &script, |report| {
        if cli.json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            tracing::info!(
                frame = report.frame,
                position = report.position,
                pinned = report.pinned,
                "Frame sampled"
            );
        }
        Ok(())
    })?;

    if cli.json {
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(summary)
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("hanseatic_motion_app=info".parse().unwrap())
        .add_directive("hanseatic_motion=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting Hanseatic motion v{}", env!("CARGO_PKG_VERSION"));

    match execute(&cli) {
        Ok(summary) => tracing::info!(
            mode = %summary.mode,
            timelines = summary.timelines,
            final_states = summary.final_states,
            max_pinned = summary.max_pinned,
            "Done"
        ),
        Err(e) => {
            tracing::error!("Motion run failed: {e}");
            std::process::exit(1);
        }
    }
}
