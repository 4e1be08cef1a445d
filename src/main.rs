mod app;
mod catalog;
mod config;
mod game;
mod input;
mod model;
mod render;
mod scoring;
mod storage;
mod timer;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Food-safety picture quiz for the terminal")]
struct Args {
    /// Directory holding question_gb.json and question_rf.json.
    #[arg(long, env = "QUIZ_ASSETS", default_value = "assets")]
    assets: PathBuf,

    /// Settings file (defaults to the platform data directory).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log file (defaults to the platform data directory).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Frame rate cap.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = config::project_paths()?;

    let log_path = args.log_file.clone().unwrap_or(paths.log_path);
    let _guard = init_logging(&log_path, args.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    app::run(app::Options {
        assets: args.assets,
        settings_path: args.settings.unwrap_or(paths.settings_path),
        fps: args.fps,
    })
}

/// The terminal belongs to the game, so logs go to a file.
fn init_logging(path: &std::path::Path, verbose: u8) -> Result<WorkerGuard> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .context("log file path has no file name")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(guard)
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "foodsafe_quiz=warn",
        1 => "foodsafe_quiz=info",
        2 => "foodsafe_quiz=debug",
        _ => "trace",
    }
}
