use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use maps_core::config::AnalysisConfig;
use maps_core::cutoff::Threshold;
use maps_core::pearson::ChiSquareResult;

use crate::summary::{print_cutoff_summary, print_p_value_summary};

#[derive(Args)]
pub struct CutoffArgs {
    /// Saved chi2 / p-value pair (.npy)
    pub result: PathBuf,

    /// Significance level in [0, 1]; omit to skip the cutoff
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Write the pass mask (.npy)
    #[arg(long)]
    pub mask_out: Option<PathBuf>,
}

pub fn run(args: &CutoffArgs, config: AnalysisConfig) -> Result<()> {
    let threshold = args
        .threshold
        .map(Threshold::new)
        .transpose()
        .context("Invalid --threshold")?;

    let mask_out = args.mask_out.as_deref().map(|p| config.output_path(p));
    let mut session = super::session(config);
    let loaded = ChiSquareResult::load(&args.result)
        .with_context(|| format!("Failed to load {}", args.result.display()))?;
    let name = session.insert_result(loaded);

    let Some(decision) = session.classify_result(&name, threshold)? else {
        println!("No threshold given, cutoff skipped");
        print_p_value_summary(&session.result(&name)?.p_value);
        return Ok(());
    };

    if let Some(threshold) = threshold {
        print_cutoff_summary(&decision, threshold);
    }

    if let Some(ref path) = mask_out {
        decision
            .save_mask(path)
            .with_context(|| format!("Failed to save mask to {}", path.display()))?;
        println!("\nMask saved to {}", path.display());
    }

    Ok(())
}
