use std::f64::consts::PI;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{MapsError, Result};

/// Normal probability density at `x`.
pub fn gaussian_density(x: f64, loc: f64, spread: f64) -> f64 {
    let z = (x - loc) / spread;
    (-0.5 * z * z).exp() / (spread * (2.0 * PI).sqrt())
}

/// Gaussian density at each of `xs`.
///
/// With `total = Some(t)` the values are rescaled to sum to `t` rather than
/// integrating to 1, which matches them to the observed histogram values they
/// are compared with.
pub fn gaussian_values(xs: &[f64], loc: f64, spread: f64, total: Option<f64>) -> Vec<f64> {
    let mut values: Vec<f64> = xs.iter().map(|&x| gaussian_density(x, loc, spread)).collect();
    if let Some(total) = total {
        let sum: f64 = values.iter().sum();
        if sum > 0.0 {
            let norm = sum / total;
            for v in &mut values {
                *v /= norm;
            }
        }
    }
    values
}

/// Probability mass of a normal distribution in each bin between `edges`.
///
/// The outermost bins are open-ended, so the masses sum to 1 and no tail
/// probability is lost.
pub fn bin_probabilities(edges: &[f64], loc: f64, spread: f64) -> Result<Vec<f64>> {
    let normal = Normal::new(loc, spread).map_err(|e| MapsError::Statistics(e.to_string()))?;
    let last = edges.len().saturating_sub(2);
    Ok(edges
        .windows(2)
        .enumerate()
        .map(|(k, w)| {
            let lo = if k == 0 { 0.0 } else { normal.cdf(w[0]) };
            let hi = if k == last { 1.0 } else { normal.cdf(w[1]) };
            hi - lo
        })
        .collect())
}
