use ndarray::{Array3, Axis, Zip};
use tracing::{debug, info};

use crate::error::{MapsError, Result};
use crate::frame::Resolution;
use crate::progress::{AnalysisStage, NoOpReporter, ProgressReporter};
use crate::run::{Calibration, Run};
use crate::stats::{compute_noise, compute_offset, temporal_noise};

use super::PtcDataset;

/// Build photon transfer curves from a series of runs at different exposures.
///
/// Each run contributes one point per pixel, computed from its usable frames:
/// the offset-subtracted mean signal and the noise at that signal. The
/// calibration maps are only read.
pub fn build_ptc(
    runs: &[Run],
    calibration: &Calibration,
    resolution: Resolution,
    sort: bool,
) -> Result<PtcDataset> {
    build_ptc_reported(runs, calibration, resolution, sort, &NoOpReporter)
}

/// [`build_ptc`] with per-run progress reporting.
pub fn build_ptc_reported(
    runs: &[Run],
    calibration: &Calibration,
    resolution: Resolution,
    sort: bool,
    reporter: &dyn ProgressReporter,
) -> Result<PtcDataset> {
    if runs.is_empty() {
        return Err(MapsError::EmptySequence);
    }
    check_dims("calibration offset", resolution, calibration.offset.dim())?;
    check_dims("calibration read noise", resolution, calibration.read_noise.dim())?;
    for run in runs {
        check_dims(&format!("run {}", run.id), resolution, run.resolution())?;
    }

    let n = runs.len();
    let shape = (n, resolution.rows, resolution.cols);
    let mut signal_mean = Array3::<f64>::zeros(shape);
    let mut noise_total = Array3::<f64>::zeros(shape);
    let mut temporal = Array3::<f64>::zeros(shape);
    let mut shot_noise = Array3::<f64>::zeros(shape);

    info!(runs = n, %resolution, sort, "Building photon transfer curves");
    reporter.begin_stage(AnalysisStage::PhotonTransfer, Some(n));

    for (i, run) in runs.iter().enumerate() {
        let usable = run.usable_frames();
        let mean = compute_offset(usable, resolution)?;
        let total = compute_noise(usable, resolution)?;

        signal_mean
            .index_axis_mut(Axis(0), i)
            .assign(&(&mean - &calibration.offset));
        temporal
            .index_axis_mut(Axis(0), i)
            .assign(&temporal_noise(usable, resolution)?);
        Zip::from(shot_noise.index_axis_mut(Axis(0), i))
            .and(&total)
            .and(&calibration.read_noise)
            .for_each(|out, &t, &r| *out = (t * t - r * r).max(0.0).sqrt());
        noise_total.index_axis_mut(Axis(0), i).assign(&total);

        debug!(
            run = %run.id,
            frames = run.usable_frame_count(),
            "Reduced run to PTC point"
        );
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    let dataset = PtcDataset {
        resolution,
        sorted: false,
        signal_mean,
        noise_total,
        temporal_noise: temporal,
        shot_noise,
    };
    Ok(if sort { dataset.into_sorted() } else { dataset })
}

fn check_dims(context: &str, resolution: Resolution, found: (usize, usize)) -> Result<()> {
    if found != resolution.shape() {
        return Err(MapsError::DimensionMismatch {
            context: context.to_string(),
            expected: resolution.shape(),
            found,
        });
    }
    Ok(())
}
