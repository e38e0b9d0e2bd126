//! Match Analysis CLI
//!
//! Runs the possession and pass pipeline over a tracks file and prints the
//! per-player pass report.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use match_core::{AnalysisConfig, FrameSource, ImageDirSource, MatchPipeline, Trajectory};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "match-analyze")]
#[command(about = "Possession and pass statistics from tracked match footage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a tracks file
    Analyze {
        /// Tracks JSON (`{"players": [...], "ball": [...]}`)
        #[arg(long)]
        tracks: PathBuf,

        /// Directory of `frame_{n}.png` images used for ball validation
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// YAML or JSON config; falls back to MATCH_ANALYSIS_PROFILE
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full report as JSON
        #[arg(long)]
        out: Option<PathBuf>,

        /// Fill ball gaps by linear interpolation
        #[arg(long, default_value = "false")]
        interpolate: bool,

        /// Write the pass network edges as JSON
        #[arg(long)]
        network_out: Option<PathBuf>,
    },

    /// Print a config preset as YAML
    Config {
        /// Preset name (default, strict, lenient)
        #[arg(long, default_value = "default")]
        preset: String,
    },
}

fn main() -> Result<()> {
    // Respect RUST_LOG; default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            tracks,
            frames_dir,
            config,
            out,
            interpolate,
            network_out,
        } => cmd_analyze(
            &tracks,
            frames_dir.as_deref(),
            config.as_deref(),
            out.as_deref(),
            interpolate,
            network_out.as_deref(),
        ),
        Commands::Config { preset } => cmd_config(&preset),
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_path(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(AnalysisConfig::from_env_or_default()),
    }
}

fn cmd_analyze(
    tracks: &Path,
    frames_dir: Option<&Path>,
    config: Option<&Path>,
    out: Option<&Path>,
    interpolate: bool,
    network_out: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let mut trajectory = Trajectory::from_path(tracks)
        .with_context(|| format!("loading tracks {}", tracks.display()))?;
    info!(path = %tracks.display(), frames = trajectory.len(), "tracks loaded");

    let source = match frames_dir {
        Some(dir) if !dir.is_dir() => {
            return Err(anyhow!("frames dir {} does not exist", dir.display()));
        }
        Some(dir) => Some(ImageDirSource::new(dir)),
        None => None,
    };

    let pipeline = MatchPipeline::new(config)
        .context("invalid analysis config")?
        .with_interpolation(interpolate);
    let report = pipeline.run(
        &mut trajectory,
        source.as_ref().map(|s| s as &dyn FrameSource),
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    report.passes.write_stats(&mut handle)?;
    for (team, frames) in &report.ball_control.frames_controlled {
        writeln!(
            handle,
            "Team {} Ball Control: {:.2}% ({} frames)",
            team,
            report.ball_control.share(*team) * 100.0,
            frames
        )?;
    }

    if let Some(path) = out {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    if let Some(path) = network_out {
        let json = serde_json::to_string_pretty(&report.network)?;
        fs::write(path, json)
            .with_context(|| format!("writing pass network {}", path.display()))?;
        info!(path = %path.display(), edges = report.network.edge_count(), "pass network written");
    }

    Ok(())
}

fn cmd_config(preset: &str) -> Result<()> {
    let config = AnalysisConfig::preset(preset)
        .ok_or_else(|| anyhow!("unknown preset '{preset}' (expected default, strict or lenient)"))?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
