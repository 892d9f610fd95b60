use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use maps_core::config::{AnalysisConfig, HistogramScale};

use crate::summary::{print_fit_summary, print_p_value_summary};

#[derive(Args)]
pub struct PearsonArgs {
    /// Input raw frame dump
    pub file: PathBuf,

    /// Integer sample values per histogram bin
    #[arg(long)]
    pub points_per_bin: Option<usize>,

    /// Compare raw bin counts instead of densities
    #[arg(long)]
    pub counts: bool,

    /// Output path for the chi2 / p-value pair (.npy)
    #[arg(short, long, default_value = "chi2.npy")]
    pub output: PathBuf,
}

pub fn run(args: &PearsonArgs, mut config: AnalysisConfig) -> Result<()> {
    if args.counts {
        config.pearson.scale = HistogramScale::Counts;
    }
    let output = config.output_path(&args.output);
    let mut session = super::session(config);
    let runs = session
        .load_run(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let name = session
        .run_pearson(&runs, 0, args.points_per_bin)
        .context("Chi-square test failed")?;

    let result = session.result(&name)?;
    print_fit_summary(result, session.config());
    print_p_value_summary(&result.p_value);

    session
        .save_result(&name, &output)
        .with_context(|| format!("Failed to save result to {}", output.display()))?;
    println!("\nResult saved to {}", output.display());

    Ok(())
}
