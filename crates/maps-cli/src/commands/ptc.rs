use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use maps_core::config::AnalysisConfig;

use crate::summary::print_ptc_summary;

#[derive(Args)]
pub struct PtcArgs {
    /// Directory of raw dumps, one per exposure
    pub dir: PathBuf,

    /// Only use files whose name contains this text
    #[arg(long)]
    pub identifier: Option<String>,

    /// Dark run to calibrate from instead of the configured maps
    #[arg(long)]
    pub dark: Option<PathBuf>,

    /// Sort each pixel's curve by signal
    #[arg(long)]
    pub sort: bool,

    /// Output prefix; arrays are written as <prefix>_<name>.npy
    #[arg(long, default_value = "ptc")]
    pub out_prefix: PathBuf,
}

pub fn run(args: &PtcArgs, config: AnalysisConfig) -> Result<()> {
    let out_prefix = config.output_path(&args.out_prefix);
    let mut session = super::session(config);

    if let Some(ref dark) = args.dark {
        let name = session
            .load_run(dark)
            .with_context(|| format!("Failed to load dark run {}", dark.display()))?;
        session.calibrate_from_run(&name, 0)?;
    } else {
        session
            .load_calibration()
            .context("No calibration: set [calibration] in the config or pass --dark")?;
    }

    let runs = session
        .load_run_dir(&args.dir, args.identifier.as_deref())
        .with_context(|| format!("Failed to load runs from {}", args.dir.display()))?;
    let curve = session.build_curve(&runs, args.sort)?;
    let dataset = session.curve(&curve)?;
    print_ptc_summary(dataset);

    dataset
        .save(&out_prefix)
        .with_context(|| format!("Failed to save curves to {}_*.npy", out_prefix.display()))?;
    println!("\nCurves saved to {}_*.npy", out_prefix.display());

    Ok(())
}
