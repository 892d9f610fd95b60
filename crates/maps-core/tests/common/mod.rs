#![allow(dead_code)]

use maps_core::frame::{FrameSequence, Resolution};
use maps_core::run::{Run, RunId};
use ndarray::{Array3, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Build a raw sample stream of `frames.len()` slots, each prefixed with the
/// two metadata samples `[0xAAAA, slot_index]`.
pub fn build_raw_samples(frames: &[Vec<u16>]) -> Vec<u16> {
    let mut buf = Vec::new();
    for (i, frame) in frames.iter().enumerate() {
        buf.push(0xAAAA);
        buf.push(i as u16);
        buf.extend_from_slice(frame);
    }
    buf
}

/// Little-endian bytes of a sample stream.
pub fn to_le_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Write raw bytes to a temporary file with the given extension.
pub fn write_raw_file(dir: &std::path::Path, name: &str, samples: &[u16]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, to_le_bytes(samples)).expect("write raw file");
    path
}

pub fn resolution(rows: usize, cols: usize) -> Resolution {
    Resolution::new(rows, cols).unwrap()
}

/// Frames where every pixel of frame `f` equals `values[f]`.
pub fn frames_from_levels(values: &[u16], rows: usize, cols: usize) -> FrameSequence {
    FrameSequence::new(Array3::from_shape_fn((values.len(), rows, cols), |(f, _, _)| {
        values[f]
    }))
}

pub fn run_from_levels(name: &str, values: &[u16], rows: usize, cols: usize) -> Run {
    Run::new(
        RunId::Named(name.to_string()),
        name.into(),
        frames_from_levels(values, rows, cols),
        0,
    )
    .unwrap()
}

/// Integer-rounded Gaussian samples, shape = (n, rows, cols).
pub fn gaussian_samples(n: usize, rows: usize, cols: usize, loc: f64, spread: f64, seed: u64) -> Array3<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(loc, spread).expect("valid normal parameters");
    Array3::from_shape_fn((n, rows, cols), |_| normal.sample(&mut rng).round())
}

pub fn zeros(rows: usize, cols: usize) -> Array2<f64> {
    Array2::zeros((rows, cols))
}
