use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use squat_sentinel::camera::{next_output_path, AnnotatedOutput, VideoFile};
use squat_sentinel::inference::PoseDetector;
use squat_sentinel::prompt::{validate_video_path, Prompter};
use squat_sentinel::session::{parse_date, parse_load};
use squat_sentinel::storage::SessionLog;
use squat_sentinel::{Config, Pipeline, Session, Timing};

#[derive(Parser, Debug)]
#[command(name = "squat-sentinel")]
#[command(about = "Count squat reps in a video and log concentric rep speed")]
struct Args {
    /// Video to analyze (prompted if omitted)
    #[arg(long, value_name = "PATH")]
    video: Option<String>,

    /// Session date, YYYY-MM-DD (prompted if omitted)
    #[arg(long, value_name = "DATE")]
    date: Option<String>,

    /// Weight on the bar, e.g. "100 kg" (prompted if omitted)
    #[arg(long, value_name = "LOAD")]
    load: Option<String>,

    /// TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Clock used to time reps
    #[arg(long, value_enum)]
    timing: Option<Timing>,

    /// Do not open the live window
    #[arg(long)]
    headless: bool,

    /// Session log file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("squat_sentinel=info,ort=warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(timing) = args.timing {
        config.timing = timing;
    }
    if let Some(log) = args.log {
        config.log_path = log;
    }
    if args.headless {
        config.show_window = false;
    }

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let video = match args.video {
        Some(path) => validate_video_path(&path)?,
        None => prompter.video_path()?,
    };
    let date = match args.date {
        Some(date) => parse_date(&date)?,
        None => prompter.date()?,
    };
    let load = match args.load {
        Some(load) => parse_load(&load)?,
        None => prompter.load()?,
    };
    let session = Session::begin(date, load);

    let source = VideoFile::open(&video)?;
    let output_path = next_output_path(
        &config.output.dir,
        &config.output.base_name,
        &config.output.extension,
    );
    let sink = AnnotatedOutput::create(
        output_path.clone(),
        config.output.fps,
        source.size(),
        config.show_window,
        config.quit_key,
    )?;
    let detector = PoseDetector::new(&config.model_path, config.min_detection_confidence)
        .with_context(|| format!("failed to load pose model {}", config.model_path))?;

    info!(timing = ?config.timing, "analyzing {}", video.display());
    let summary = Pipeline::new(source, detector, sink, &config).run(session)?;

    let log = SessionLog::new(&config.log_path);
    if let Err(err) = log.append(&summary.record) {
        error!("Error while saving data to {}: {}", log.path().display(), err);
    }

    let record = &summary.record;
    println!("Reps: {}", record.rep_speeds.len());
    if let Some(avg) = record.average_speed {
        println!("Avg. speed: {avg:.2} sec/rep");
    }
    println!("Annotated video: {}", output_path.display());

    Ok(())
}
