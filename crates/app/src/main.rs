use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scrubline_state::config::ScrubConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scrubline")]
#[command(about = "Seek bar with ad markers, chapters and thumbnail previews over a simulated player")]
#[command(version)]
struct Cli {
    /// TOML file overriding the default seek bar settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulate a live stream with a sliding window
    #[arg(long)]
    live: bool,

    /// VOD length in seconds
    #[arg(long, default_value_t = 600.0)]
    duration: f64,

    /// Log filter, e.g. `debug` or `thumbnails=debug`. Falls back to RUST_LOG, then `info`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter '{directives}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = match &cli.config {
        Some(path) => ScrubConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScrubConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("starting thumbnail runtime")?;

    info!(live = cli.live, duration = cli.duration, "starting scrubline");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("Scrubline"),
        vsync: true,
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    let Cli { live, duration, .. } = cli;
    eframe::run_native(
        "Scrubline",
        options,
        Box::new(move |cc| {
            Ok(Box::new(scrubline_app::ScrubApp::new(
                cc, runtime, config, live, duration,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("eframe failed: {err}"))
}
