use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use maps_core::config::AnalysisConfig;
use maps_core::run::Run;
use maps_core::stats::{frame_mean_trend, smooth_clamped};

#[derive(Args)]
pub struct TrendArgs {
    /// Input raw frame dump
    pub file: PathBuf,

    /// Half-width of the moving average, in frames (0 disables smoothing)
    #[arg(long, default_value = "0")]
    pub smooth: usize,
}

/// Print the mean of every frame, to find where the sensor has settled.
pub fn run(args: &TrendArgs, config: &AnalysisConfig) -> Result<()> {
    let run = Run::load(&args.file, config.resolution, config.start_frame)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let trend = frame_mean_trend(run.frames().view());
    let smoothed = smooth_clamped(trend.view(), args.smooth);

    println!("{:>7}  {:>12}  {:>12}", "Frame", "Mean", "Smoothed");
    println!("{}", "-".repeat(35));
    for (i, (mean, smooth)) in trend.iter().zip(smoothed.iter()).enumerate() {
        let marker = if i < run.start_frame() { " (skipped)" } else { "" };
        println!("{:>7}  {:>12.3}  {:>12.3}{}", i, mean, smooth, marker);
    }

    Ok(())
}
