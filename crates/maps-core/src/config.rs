use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RAW_EXTENSION;
use crate::frame::Resolution;

/// Session-wide analysis settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub resolution: Resolution,
    /// First settled frame of every run; earlier frames are ignored.
    #[serde(default)]
    pub start_frame: usize,
    #[serde(default = "default_raw_extension")]
    pub raw_extension: String,
    #[serde(default)]
    pub calibration: CalibrationPaths,
    #[serde(default)]
    pub pearson: PearsonConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_raw_extension() -> String {
    DEFAULT_RAW_EXTENSION.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            start_frame: 0,
            raw_extension: default_raw_extension(),
            calibration: CalibrationPaths::default(),
            pearson: PearsonConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl AnalysisConfig {
    /// Resolve an output path: relative paths land in `output_dir`, absolute
    /// paths are kept as given.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }
}

/// Locations of the default offset and read-noise maps (`.npy`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalibrationPaths {
    pub offset: Option<PathBuf>,
    pub read_noise: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PearsonConfig {
    /// Width of each histogram bin in integer sample values.
    pub points_per_bin: usize,
    #[serde(default)]
    pub scale: HistogramScale,
}

impl Default for PearsonConfig {
    fn default() -> Self {
        Self {
            points_per_bin: 1,
            scale: HistogramScale::Density,
        }
    }
}

/// How observed bin values are expressed before the chi-square sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistogramScale {
    /// Probability density, `count / (n * bin_width)`.
    #[default]
    Density,
    /// Raw occupancy counts.
    Counts,
}

impl std::fmt::Display for HistogramScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Density => write!(f, "Density"),
            Self::Counts => write!(f, "Counts"),
        }
    }
}
