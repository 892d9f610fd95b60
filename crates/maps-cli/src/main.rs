mod commands;
mod progress;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maps", about = "MAPS sensor characterization tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Analysis config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show raw dump metadata
    Info(commands::info::InfoArgs),
    /// Compute offset and read noise maps from a dark run
    Calibrate(commands::calibrate::CalibrateArgs),
    /// Print the per-frame mean trend of a run
    Trend(commands::trend::TrendArgs),
    /// Build photon transfer curves from a run directory
    Ptc(commands::ptc::PtcArgs),
    /// Run the per-pixel chi-square Gaussian test
    Pearson(commands::pearson::PearsonArgs),
    /// Classify pixels of a saved chi-square result
    Cutoff(commands::cutoff::CutoffArgs),
    /// Print or save the default analysis config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Commands::Config(args) = &cli.command {
        return commands::config::run(args);
    }
    let config = commands::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Info(args) => commands::info::run(args, &config),
        Commands::Calibrate(args) => commands::calibrate::run(args, config),
        Commands::Trend(args) => commands::trend::run(args, &config),
        Commands::Ptc(args) => commands::ptc::run(args, config),
        Commands::Pearson(args) => commands::pearson::run(args, config),
        Commands::Cutoff(args) => commands::cutoff::run(args, config),
        Commands::Config(args) => commands::config::run(args),
    }
}
