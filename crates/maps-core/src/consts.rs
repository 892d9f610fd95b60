/// Default MAPS sensor resolution (rows, columns).
pub const DEFAULT_RESOLUTION: (usize, usize) = (520, 520);

/// Metadata samples at the front of every physical frame slot.
pub const FRAME_HEADER_SAMPLES: usize = 2;

/// Leading frame slots discarded by convention (slot 0 is metadata only).
pub const DISCARDED_LEADING_FRAMES: usize = 1;

/// Size of one raw sample in bytes (u16).
pub const BYTES_PER_SAMPLE: usize = 2;

/// Default extension of raw frame dumps inside a run directory.
pub const DEFAULT_RAW_EXTENSION: &str = "raw";

/// Fitted parameters of the Gaussian read-noise model (mean, spread).
pub const GAUSSIAN_MODEL_PARAMS: usize = 2;

/// Fewest non-empty bins for which a chi-square test is meaningful.
pub const MIN_FIT_BINS: usize = GAUSSIAN_MODEL_PARAMS + 1;

/// Smallest expected count per bin on the count scale; sparser tail bins are
/// merged into their neighbours.
pub const MIN_EXPECTED_COUNT: f64 = 5.0;

/// Half-width of the bin edges around integer sample values.
pub const BIN_EDGE_OFFSET: f64 = 0.5;

/// Pixels processed between progress callbacks in per-pixel reductions.
pub const PROGRESS_PIXEL_STRIDE: usize = 4_096;

/// Spread below which a pixel's samples count as constant.
pub const EPSILON: f64 = 1e-12;
