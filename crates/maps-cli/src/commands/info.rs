use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use maps_core::config::AnalysisConfig;
use maps_core::io::raw::RawReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input raw frame dump
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs, config: &AnalysisConfig) -> Result<()> {
    let reader = RawReader::open(&args.file, config.resolution)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let byte_len = reader.byte_len();
    let slots = reader.slot_count();
    let (frames, usable) = reader
        .decode()
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;
    drop(reader);

    let settled = frames
        .frame(config.start_frame)
        .with_context(|| format!("Start frame {} is not in the file", config.start_frame))?;
    let settled_mean =
        settled.iter().map(|&v| f64::from(v)).sum::<f64>() / settled.len().max(1) as f64;

    println!("File:        {}", args.file.display());
    println!("Resolution:  {}", config.resolution);
    println!("Slots:       {}", slots);
    println!("Frames:      {}", usable);
    println!("Start frame: {}", config.start_frame);
    println!("Start level: {:.1}", settled_mean);
    let total_mb = byte_len as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
