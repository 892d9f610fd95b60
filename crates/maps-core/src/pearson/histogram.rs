use crate::config::HistogramScale;
use crate::consts::BIN_EDGE_OFFSET;

/// Bin edges from `min - 0.5` in steps of `points_per_bin` up to at least
/// `max + 0.5`, so every sample in `[min, max]` lands in a bin.
///
/// For integer-valued samples each bin holds exactly `points_per_bin`
/// distinct values.
pub fn bin_edges(min: f64, max: f64, points_per_bin: usize) -> Vec<f64> {
    let step = points_per_bin.max(1) as f64;
    let start = min - BIN_EDGE_OFFSET;
    let end = max + BIN_EDGE_OFFSET;
    let bins = ((end - start) / step).ceil().max(1.0) as usize;
    (0..=bins).map(|k| start + k as f64 * step).collect()
}

/// Histogram of `samples` over uniform `edges`.
///
/// With `HistogramScale::Density` each value is `count / (n * width)`, so the
/// histogram integrates to 1.
pub fn histogram(samples: impl IntoIterator<Item = f64>, edges: &[f64], scale: HistogramScale) -> Vec<f64> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return Vec::new();
    }
    let start = edges[0];
    let width = edges[1] - edges[0];

    let mut n = 0usize;
    for x in samples {
        let k = ((x - start) / width).floor();
        if !x.is_finite() || k < 0.0 || x > edges[bins] {
            continue;
        }
        counts[(k as usize).min(bins - 1)] += 1;
        n += 1;
    }

    match scale {
        HistogramScale::Counts => counts.into_iter().map(|c| c as f64).collect(),
        HistogramScale::Density => {
            let norm = (n.max(1) as f64) * width;
            counts.into_iter().map(|c| c as f64 / norm).collect()
        }
    }
}

/// Occupied bins of a histogram: their midpoints and observed values.
#[derive(Clone, Debug, Default)]
pub struct OccupiedBins {
    pub midpoints: Vec<f64>,
    pub observed: Vec<f64>,
}

impl OccupiedBins {
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }

    pub fn observed_total(&self) -> f64 {
        self.observed.iter().sum()
    }
}

/// Drop empty bins together with their midpoints.
pub fn occupied_bins(edges: &[f64], values: &[f64]) -> OccupiedBins {
    let mut bins = OccupiedBins::default();
    for (k, &v) in values.iter().enumerate() {
        if v > 0.0 {
            bins.midpoints.push(0.5 * (edges[k] + edges[k + 1]));
            bins.observed.push(v);
        }
    }
    bins
}

/// Merge adjacent bins, left to right, until each holds an expected count of
/// at least `min_expected`. A short remainder at the right end joins the last
/// merged bin. Returns the merged (observed, expected) pairs.
pub fn merge_sparse_bins(observed: &[f64], expected: &[f64], min_expected: f64) -> (Vec<f64>, Vec<f64>) {
    let mut merged_obs = Vec::new();
    let mut merged_exp = Vec::new();
    let (mut o_acc, mut e_acc) = (0.0, 0.0);
    for (&o, &e) in observed.iter().zip(expected) {
        o_acc += o;
        e_acc += e;
        if e_acc >= min_expected {
            merged_obs.push(o_acc);
            merged_exp.push(e_acc);
            o_acc = 0.0;
            e_acc = 0.0;
        }
    }
    if o_acc > 0.0 || e_acc > 0.0 {
        match (merged_obs.last_mut(), merged_exp.last_mut()) {
            (Some(o), Some(e)) => {
                *o += o_acc;
                *e += e_acc;
            }
            _ => {
                merged_obs.push(o_acc);
                merged_exp.push(e_acc);
            }
        }
    }
    (merged_obs, merged_exp)
}
