use ndarray::{Array1, ArrayView1, ArrayView3, Axis};
use num_traits::AsPrimitive;
use rayon::prelude::*;

/// Mean over all pixels of each frame, in frame order.
///
/// Used to spot the frames at the start of a run where the sensor has not yet
/// settled.
pub fn frame_mean_trend<T>(frames: ArrayView3<'_, T>) -> Array1<f64>
where
    T: AsPrimitive<f64> + Send + Sync,
{
    let means: Vec<f64> = frames
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|frame| {
            let n = frame.len().max(1) as f64;
            frame.iter().map(|v| v.as_()).sum::<f64>() / n
        })
        .collect();
    Array1::from(means)
}

/// Moving average over `2 * half_width + 1` samples with clamped edges.
///
/// Indices outside `[0, n - 1]` take the value at the nearest end, so the
/// output has the same length as the input.
pub fn smooth_clamped(values: ArrayView1<'_, f64>, half_width: usize) -> Array1<f64> {
    let n = values.len();
    if n == 0 || half_width == 0 {
        return values.to_owned();
    }

    let last = n - 1;
    let padded: Array1<f64> = (0..n + 2 * half_width)
        .map(|k| values[k.saturating_sub(half_width).min(last)])
        .collect();

    padded
        .windows(2 * half_width + 1)
        .into_iter()
        .map(|window| window.mean().unwrap_or(0.0))
        .collect()
}
