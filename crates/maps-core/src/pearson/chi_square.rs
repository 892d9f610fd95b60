use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ndarray::{Array2, ArrayView1, ArrayView3, Axis, Zip};
use num_traits::AsPrimitive;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{info, warn};

use crate::config::{HistogramScale, PearsonConfig};
use crate::consts::{
    EPSILON, GAUSSIAN_MODEL_PARAMS, MIN_EXPECTED_COUNT, MIN_FIT_BINS, PROGRESS_PIXEL_STRIDE,
};
use crate::error::{MapsError, Result};
use crate::frame::Resolution;
use crate::progress::{AnalysisStage, NoOpReporter, ProgressReporter};
use crate::stats::mean_std;

use super::gaussian::{bin_probabilities, gaussian_values};
use super::histogram::{bin_edges, histogram, merge_sparse_bins, occupied_bins};
use super::{ChiSquareResult, FitStatus};

/// Chi-square fit of a single pixel.
#[derive(Clone, Debug)]
pub struct PixelFit {
    pub chi2: f64,
    pub p_value: f64,
    /// Non-empty bins that entered the statistic.
    pub bins: usize,
    pub degrees_of_freedom: usize,
    pub loc: f64,
    pub spread: f64,
}

/// Pearson's chi-square test of one pixel's samples against a Gaussian with
/// the sample mean and standard deviation.
///
/// On the density scale the empty bins are dropped and the Gaussian density at
/// each occupied bin centre is rescaled to the observed total. On the count
/// scale the expected count of every bin is the Gaussian mass over the bin,
/// and sparse tail bins are merged until each expects at least
/// [`MIN_EXPECTED_COUNT`] samples.
pub fn fit_pixel<T>(samples: ArrayView1<'_, T>, config: &PearsonConfig) -> Result<PixelFit>
where
    T: AsPrimitive<f64>,
{
    if config.points_per_bin == 0 {
        return Err(MapsError::InvalidPointsPerBin);
    }
    if samples.is_empty() {
        return Err(MapsError::EmptySequence);
    }

    let (loc, spread) = mean_std(samples.view());
    let (min, max) = samples
        .iter()
        .map(|v| v.as_())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if spread <= EPSILON || min == max {
        return Err(MapsError::InsufficientVariance);
    }

    let edges = bin_edges(min, max, config.points_per_bin);
    let values = histogram(samples.iter().map(|v| v.as_()), &edges, config.scale);
    let (observed, expected) = match config.scale {
        HistogramScale::Density => {
            let bins = occupied_bins(&edges, &values);
            let expected =
                gaussian_values(&bins.midpoints, loc, spread, Some(bins.observed_total()));
            (bins.observed, expected)
        }
        HistogramScale::Counts => {
            let total: f64 = values.iter().sum();
            let expected: Vec<f64> = bin_probabilities(&edges, loc, spread)?
                .into_iter()
                .map(|p| p * total)
                .collect();
            merge_sparse_bins(&values, &expected, MIN_EXPECTED_COUNT)
        }
    };
    let k = observed.len();
    if k < MIN_FIT_BINS {
        return Err(MapsError::InsufficientBins { bins: k });
    }

    let chi2: f64 = observed
        .iter()
        .zip(&expected)
        .map(|(&o, &e)| (o - e) * (o - e) / e)
        .sum();

    let df = k - GAUSSIAN_MODEL_PARAMS;
    let p_value = if chi2.is_finite() {
        ChiSquared::new(df as f64)
            .map_err(|e| MapsError::Statistics(e.to_string()))?
            .sf(chi2)
    } else {
        0.0
    };

    Ok(PixelFit {
        chi2,
        p_value,
        bins: k,
        degrees_of_freedom: df,
        loc,
        spread,
    })
}

/// Run the chi-square test on every pixel of `data` (shape = sample, row, column).
///
/// Pixels whose samples cannot be tested get NaN in both planes and a
/// non-`Fitted` status; the rest of the grid is unaffected.
pub fn run_test<T>(
    data: ArrayView3<'_, T>,
    resolution: Resolution,
    config: &PearsonConfig,
) -> Result<ChiSquareResult>
where
    T: AsPrimitive<f64> + Send + Sync,
{
    run_test_reported(data, resolution, config, &NoOpReporter)
}

/// [`run_test`] with progress reporting. Pixels are fitted in parallel.
pub fn run_test_reported<T>(
    data: ArrayView3<'_, T>,
    resolution: Resolution,
    config: &PearsonConfig,
    reporter: &dyn ProgressReporter,
) -> Result<ChiSquareResult>
where
    T: AsPrimitive<f64> + Send + Sync,
{
    let (n, rows, cols) = data.dim();
    resolution.check((rows, cols))?;
    if n == 0 {
        return Err(MapsError::EmptySequence);
    }
    if config.points_per_bin == 0 {
        return Err(MapsError::InvalidPointsPerBin);
    }

    info!(
        samples = n,
        %resolution,
        points_per_bin = config.points_per_bin,
        scale = %config.scale,
        "Running Pearson chi-square test"
    );

    let shape = resolution.shape();
    let mut chi2 = Array2::<f64>::from_elem(shape, f64::NAN);
    let mut p_value = Array2::<f64>::from_elem(shape, f64::NAN);
    let mut status = Array2::<FitStatus>::from_elem(shape, FitStatus::Invalid);

    let total = resolution.pixel_count();
    reporter.begin_stage(AnalysisStage::GoodnessOfFit, Some(total));
    let done = AtomicUsize::new(0);
    // Workers finish out of order; only forward positions past the last one
    // reported so the reporter sees a monotonic sequence.
    let reported = Mutex::new(0usize);

    Zip::from(&mut chi2)
        .and(&mut p_value)
        .and(&mut status)
        .and(data.lanes(Axis(0)))
        .par_for_each(|c, p, s, series| {
            match fit_pixel(series, config) {
                Ok(fit) => {
                    *c = fit.chi2;
                    *p = fit.p_value;
                    *s = FitStatus::Fitted;
                }
                Err(MapsError::InsufficientVariance) => *s = FitStatus::InsufficientVariance,
                Err(MapsError::InsufficientBins { .. }) => *s = FitStatus::InsufficientBins,
                Err(_) => *s = FitStatus::Invalid,
            }
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % PROGRESS_PIXEL_STRIDE == 0 || finished == total {
                if let Ok(mut last) = reported.lock() {
                    if finished > *last {
                        *last = finished;
                        reporter.advance(finished);
                    }
                }
            }
        });
    reporter.finish_stage();

    let result = ChiSquareResult {
        chi2,
        p_value,
        status,
    };
    let skipped = result.skipped_count();
    if skipped > 0 {
        warn!(skipped, total, "Pixels skipped by the chi-square test");
    }
    Ok(result)
}
