use ndarray::{Array3, Axis, Zip};

use crate::error::{MapsError, Result};

/// Per-pixel stable argsort along the run axis.
///
/// `index[k, i, j]` is the run holding the k-th smallest value at pixel (i, j).
/// Equal values keep their original run order; NaN sorts last.
pub fn argsort_runs(values: &Array3<f64>) -> Array3<usize> {
    let mut index = Array3::<usize>::zeros(values.raw_dim());
    Zip::from(index.lanes_mut(Axis(0)))
        .and(values.lanes(Axis(0)))
        .par_for_each(|mut order_out, series| {
            let mut order: Vec<usize> = (0..series.len()).collect();
            order.sort_by(|&a, &b| series[a].total_cmp(&series[b]));
            for (slot, k) in order_out.iter_mut().zip(order) {
                *slot = k;
            }
        });
    index
}

/// Gather `values` along the run axis with a full per-pixel index array.
pub fn take_along_runs(values: &Array3<f64>, index: &Array3<usize>) -> Result<Array3<f64>> {
    if values.shape() != index.shape() {
        return Err(MapsError::ShapeMismatch {
            expected: values.shape().to_vec(),
            found: index.shape().to_vec(),
        });
    }
    let runs = values.len_of(Axis(0));
    if let Some(&bad) = index.iter().find(|&&k| k >= runs) {
        return Err(MapsError::ShapeMismatch {
            expected: vec![runs],
            found: vec![bad + 1],
        });
    }
    Ok(gather(values, index))
}

pub(super) fn gather(values: &Array3<f64>, index: &Array3<usize>) -> Array3<f64> {
    let mut out = Array3::<f64>::zeros(values.raw_dim());
    Zip::from(out.lanes_mut(Axis(0)))
        .and(values.lanes(Axis(0)))
        .and(index.lanes(Axis(0)))
        .par_for_each(|mut dst, src, order| {
            for (d, &k) in dst.iter_mut().zip(order.iter()) {
                *d = src[k];
            }
        });
    out
}
