mod app;
mod util;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use marker_spiderfier::SpiderfyConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with spiderfier options (camelCase keys, all optional)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 12)]
    clusters: usize,

    /// Upper bound on markers per cluster
    #[arg(long, default_value_t = 14)]
    cluster_size: usize,
}

fn load_config(path: Option<&Path>) -> Result<SpiderfyConfig> {
    let Some(path) = path else {
        return Ok(SpiderfyConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SpiderfyConfig::from_json_str(&raw)
        .with_context(|| format!("invalid spiderfier options in {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "spiderfy-demo",
        options,
        Box::new(move |cc| {
            let app = app::SpiderfyDemoApp::new(cc, config, args.clusters, args.cluster_size)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|error| anyhow!("eframe failed: {error}"))
}
