use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Dimension mismatch in {context}: expected {expected:?}, got {found:?}")]
    DimensionMismatch {
        context: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Array shape mismatch: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Incomplete frame data: {samples} samples is not a multiple of the {slot_size}-sample frame slot")]
    IncompleteFrameData { samples: usize, slot_size: usize },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Frame index {index} out of range (total: {total})")]
    FrameOutOfRange { index: usize, total: usize },

    #[error("Start frame {start} out of range (total: {total})")]
    InvalidStartFrame { start: usize, total: usize },

    #[error("Pixel samples have zero variance")]
    InsufficientVariance,

    #[error("Only {bins} non-empty bins, at least 3 are needed")]
    InsufficientBins { bins: usize },

    #[error("Points per bin must be at least 1")]
    InvalidPointsPerBin,

    #[error("Threshold {0} is not between 0 and 1")]
    InvalidThreshold(f64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Path already in use: {0}")]
    PathAlreadyInUse(PathBuf),

    #[error("Missing calibration: {0}")]
    MissingCalibration(&'static str),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("PT curve not found: {0}")]
    CurveNotFound(String),

    #[error("Chi-square result not found: {0}")]
    ResultNotFound(String),

    #[error("Statistics error: {0}")]
    Statistics(String),
}

pub type Result<T> = std::result::Result<T, MapsError>;
