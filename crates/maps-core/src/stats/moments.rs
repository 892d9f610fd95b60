use ndarray::{Array2, ArrayView1, ArrayView3, Axis, Zip};
use num_traits::AsPrimitive;

use crate::error::{MapsError, Result};
use crate::frame::Resolution;

fn check_frames<T>(frames: &ArrayView3<'_, T>, resolution: Resolution) -> Result<()> {
    let (n, rows, cols) = frames.dim();
    resolution.check((rows, cols))?;
    if n == 0 {
        return Err(MapsError::EmptySequence);
    }
    Ok(())
}

/// Arithmetic mean and population standard deviation (ddof = 0) of one series.
pub fn mean_std<T>(series: ArrayView1<'_, T>) -> (f64, f64)
where
    T: AsPrimitive<f64>,
{
    let n = series.len() as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let mean = series.iter().map(|v| v.as_()).sum::<f64>() / n;
    let var = series
        .iter()
        .map(|v| {
            let d = v.as_() - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}

/// Per-pixel mean over the frame axis (the pedestal / offset map).
///
/// Reduces every frame it is given; restricting to settled frames is the
/// caller's job (see `Run::usable_frames`).
pub fn compute_offset<T>(frames: ArrayView3<'_, T>, resolution: Resolution) -> Result<Array2<f64>>
where
    T: AsPrimitive<f64> + Send + Sync,
{
    check_frames(&frames, resolution)?;
    let mut offset = Array2::<f64>::zeros(resolution.shape());
    Zip::from(&mut offset)
        .and(frames.lanes(Axis(0)))
        .par_for_each(|out, series| *out = mean_std(series).0);
    Ok(offset)
}

/// Per-pixel population standard deviation over the frame axis.
pub fn compute_noise<T>(frames: ArrayView3<'_, T>, resolution: Resolution) -> Result<Array2<f64>>
where
    T: AsPrimitive<f64> + Send + Sync,
{
    check_frames(&frames, resolution)?;
    let mut noise = Array2::<f64>::zeros(resolution.shape());
    Zip::from(&mut noise)
        .and(frames.lanes(Axis(0)))
        .par_for_each(|out, series| *out = mean_std(series).1);
    Ok(noise)
}

/// Per-pixel noise from consecutive-frame differences.
///
/// `sqrt(sum((x[j] - x[j-1])^2) / (2 * pairs))`. Slow drifts cancel in the
/// differences, so this tracks the temporal (shot + read) noise only. A single
/// frame has no pairs and yields 0.
pub fn temporal_noise<T>(frames: ArrayView3<'_, T>, resolution: Resolution) -> Result<Array2<f64>>
where
    T: AsPrimitive<f64> + Send + Sync,
{
    check_frames(&frames, resolution)?;
    let mut noise = Array2::<f64>::zeros(resolution.shape());
    Zip::from(&mut noise)
        .and(frames.lanes(Axis(0)))
        .par_for_each(|out, series| {
            let pairs = series.len().saturating_sub(1);
            if pairs == 0 {
                *out = 0.0;
                return;
            }
            let sum_sq: f64 = series
                .windows(2)
                .into_iter()
                .map(|w| {
                    let d = w[1].as_() - w[0].as_();
                    d * d
                })
                .sum();
            *out = (sum_sq / (2.0 * pairs as f64)).sqrt();
        });
    Ok(noise)
}
