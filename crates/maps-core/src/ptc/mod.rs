pub mod builder;
pub mod sort;

use std::path::Path;

use ndarray::{Array3, ArrayView1, Axis};

use crate::error::{MapsError, Result};
use crate::frame::Resolution;
use crate::io::npy::save_array;

pub use builder::{build_ptc, build_ptc_reported};
pub use sort::{argsort_runs, take_along_runs};

/// Photon transfer curve data for every pixel.
///
/// All arrays are shaped (run, row, column). Once `is_sorted()` is true the run
/// axis of each pixel is ordered by that pixel's own signal, so index `k` no
/// longer refers to the same exposure across pixels.
#[derive(Clone, Debug)]
pub struct PtcDataset {
    resolution: Resolution,
    sorted: bool,
    signal_mean: Array3<f64>,
    noise_total: Array3<f64>,
    temporal_noise: Array3<f64>,
    shot_noise: Array3<f64>,
}

impl PtcDataset {
    pub fn run_count(&self) -> usize {
        self.signal_mean.len_of(Axis(0))
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Offset-subtracted mean signal.
    pub fn signal_mean(&self) -> &Array3<f64> {
        &self.signal_mean
    }

    /// Standard deviation of the usable frames.
    pub fn noise_total(&self) -> &Array3<f64> {
        &self.noise_total
    }

    /// Noise from consecutive-frame differences.
    pub fn temporal_noise(&self) -> &Array3<f64> {
        &self.temporal_noise
    }

    /// Total noise with the read noise removed in quadrature.
    pub fn shot_noise(&self) -> &Array3<f64> {
        &self.shot_noise
    }

    /// (signal, total noise) curve of one pixel.
    pub fn pixel_curve(&self, row: usize, col: usize) -> (ArrayView1<'_, f64>, ArrayView1<'_, f64>) {
        (
            self.signal_mean.slice(ndarray::s![.., row, col]),
            self.noise_total.slice(ndarray::s![.., row, col]),
        )
    }

    /// Reorder each pixel's curve by ascending signal, independently per pixel.
    ///
    /// Ties keep their original run order. Consumes the dataset; the original
    /// run ordering cannot be recovered afterwards.
    pub fn into_sorted(self) -> Self {
        if self.sorted {
            return self;
        }
        let index = argsort_runs(&self.signal_mean);
        Self {
            resolution: self.resolution,
            sorted: true,
            signal_mean: sort::gather(&self.signal_mean, &index),
            noise_total: sort::gather(&self.noise_total, &index),
            temporal_noise: sort::gather(&self.temporal_noise, &index),
            shot_noise: sort::gather(&self.shot_noise, &index),
        }
    }

    /// Write each array as `<prefix>_<name>.npy`.
    pub fn save(&self, prefix: &Path) -> Result<()> {
        let named = [
            ("signal_mean", &self.signal_mean),
            ("noise_total", &self.noise_total),
            ("temporal_noise", &self.temporal_noise),
            ("shot_noise", &self.shot_noise),
        ];
        let paths: Vec<_> = named
            .iter()
            .map(|(name, _)| suffixed(prefix, name))
            .collect();
        if let Some(taken) = paths.iter().find(|p| p.exists()) {
            return Err(MapsError::PathAlreadyInUse(taken.clone()));
        }
        for ((_, array), path) in named.iter().zip(&paths) {
            save_array(*array, path)?;
        }
        Ok(())
    }
}

fn suffixed(prefix: &Path, name: &str) -> std::path::PathBuf {
    let stem = prefix
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("ptc");
    prefix.with_file_name(format!("{stem}_{name}.npy"))
}
