use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use maps_core::config::AnalysisConfig;

use crate::summary::print_calibration_summary;

#[derive(Args)]
pub struct CalibrateArgs {
    /// Dark run raw dump
    pub file: PathBuf,

    /// Output path for the offset map (.npy)
    #[arg(long, default_value = "offset.npy")]
    pub offset_out: PathBuf,

    /// Output path for the read noise map (.npy)
    #[arg(long, default_value = "read_noise.npy")]
    pub noise_out: PathBuf,
}

pub fn run(args: &CalibrateArgs, config: AnalysisConfig) -> Result<()> {
    let offset_out = config.output_path(&args.offset_out);
    let noise_out = config.output_path(&args.noise_out);
    let mut session = super::session(config);
    let name = session
        .load_run(&args.file)
        .with_context(|| format!("Failed to load dark run {}", args.file.display()))?;
    let calibration = session.calibrate_from_run(&name, 0)?;
    print_calibration_summary(calibration);

    session
        .save_calibration(&offset_out, &noise_out)
        .context("Failed to save calibration maps")?;
    println!("\nOffset saved to {}", offset_out.display());
    println!("Read noise saved to {}", noise_out.display());

    Ok(())
}
