use std::path::Path;

use ndarray::Array2;
use tracing::info;

use crate::error::{MapsError, Result};
use crate::frame::Resolution;
use crate::io::npy::save_mask;

/// Significance level in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MapsError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = MapsError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// Pass/fail map of a chi-square result under one threshold.
#[derive(Clone, Debug)]
pub struct CutoffDecision {
    /// `true` where the Gaussian fit is not rejected.
    pub passed_mask: Array2<bool>,
    pub passed_count: usize,
    pub failed_count: usize,
    /// `failed_count` over the total pixel count.
    pub failed_fraction: f64,
}

impl CutoffDecision {
    pub fn failed_mask(&self) -> Array2<bool> {
        self.passed_mask.mapv(|p| !p)
    }

    pub fn save_mask(&self, path: &Path) -> Result<()> {
        save_mask(&self.passed_mask, path)
    }
}

/// Classify pixels by p-value.
///
/// A pixel passes when `p >= threshold`: a low p-value rejects the Gaussian
/// model. NaN p-values never pass.
pub fn classify(
    p_values: &Array2<f64>,
    threshold: Threshold,
    resolution: Resolution,
) -> Result<CutoffDecision> {
    resolution.check(p_values.dim())?;

    let passed_mask = p_values.mapv(|p| p >= threshold.value());
    let total = resolution.pixel_count();
    let passed_count = passed_mask.iter().filter(|&&p| p).count();
    let failed_count = total - passed_count;
    let failed_fraction = failed_count as f64 / total as f64;

    info!(
        threshold = threshold.value(),
        passed = passed_count,
        failed = failed_count,
        "Applied chi-square cutoff"
    );

    Ok(CutoffDecision {
        passed_mask,
        passed_count,
        failed_count,
        failed_fraction,
    })
}
