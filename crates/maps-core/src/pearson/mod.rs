pub mod chi_square;
pub mod gaussian;
pub mod histogram;

use std::path::Path;

use ndarray::{stack, Array2, Array3, Axis};

use crate::cutoff::{classify, CutoffDecision, Threshold};
use crate::error::{MapsError, Result};
use crate::frame::Resolution;
use crate::io::npy::{load_array, save_array};

pub use chi_square::{fit_pixel, run_test, run_test_reported, PixelFit};

/// Outcome of the chi-square test at one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitStatus {
    Fitted,
    /// All samples identical.
    InsufficientVariance,
    /// Fewer than 3 occupied bins.
    InsufficientBins,
    /// No statistic available (e.g. NaN read back from storage).
    Invalid,
}

/// Per-pixel chi-square statistics and p-values, both shaped (row, column).
#[derive(Clone, Debug)]
pub struct ChiSquareResult {
    pub chi2: Array2<f64>,
    pub p_value: Array2<f64>,
    pub status: Array2<FitStatus>,
}

impl ChiSquareResult {
    pub fn resolution(&self) -> (usize, usize) {
        self.chi2.dim()
    }

    pub fn fitted_count(&self) -> usize {
        self.status.iter().filter(|s| **s == FitStatus::Fitted).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.status.len() - self.fitted_count()
    }

    /// Both planes stacked as (2, row, column): plane 0 chi2, plane 1 p-value.
    pub fn to_planes(&self) -> Result<Array3<f64>> {
        stack(Axis(0), &[self.chi2.view(), self.p_value.view()]).map_err(|_| {
            MapsError::ShapeMismatch {
                expected: self.chi2.shape().to_vec(),
                found: self.p_value.shape().to_vec(),
            }
        })
    }

    /// Rebuild from stacked planes. Pixels with a NaN statistic are `Invalid`.
    pub fn from_planes(planes: Array3<f64>) -> Result<Self> {
        let (depth, rows, cols) = planes.dim();
        if depth != 2 {
            return Err(MapsError::ShapeMismatch {
                expected: vec![2, rows, cols],
                found: vec![depth, rows, cols],
            });
        }
        let chi2 = planes.index_axis(Axis(0), 0).to_owned();
        let p_value = planes.index_axis(Axis(0), 1).to_owned();
        let status = ndarray::Zip::from(&chi2)
            .and(&p_value)
            .map_collect(|c, p| {
                if c.is_nan() || p.is_nan() {
                    FitStatus::Invalid
                } else {
                    FitStatus::Fitted
                }
            });
        Ok(Self {
            chi2,
            p_value,
            status,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_array(&self.to_planes()?, path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let planes: Array3<f64> = load_array(path)?;
        Self::from_planes(planes)
    }

    /// Apply a significance threshold to the p-values.
    pub fn classify(&self, threshold: Threshold) -> Result<CutoffDecision> {
        let (rows, cols) = self.resolution();
        classify(&self.p_value, threshold, Resolution::new(rows, cols)?)
    }
}
