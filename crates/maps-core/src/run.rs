use std::path::{Path, PathBuf};

use ndarray::{s, Array2, ArrayView3};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{MapsError, Result};
use crate::frame::{FrameSequence, Resolution};
use crate::io::npy::{load_array, save_array};
use crate::io::raw::read_raw_file;
use crate::io::run_dir::discover_runs;
use crate::stats::{compute_noise, compute_offset};

/// Identifier of a run: a name taken from its source, or an assigned number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RunId {
    Named(String),
    Auto(usize),
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Auto(n) => write!(f, "#{n}"),
        }
    }
}

/// One decoded frame dump with its provenance and derived statistics.
#[derive(Clone, Debug)]
pub struct Run {
    pub id: RunId,
    pub source_path: PathBuf,
    frames: FrameSequence,
    start_frame: usize,
    offset: Option<Array2<f64>>,
    noise: Option<Array2<f64>>,
}

impl Run {
    pub fn new(
        id: RunId,
        source_path: PathBuf,
        frames: FrameSequence,
        start_frame: usize,
    ) -> Result<Self> {
        let total = frames.frame_count();
        if start_frame >= total {
            return Err(MapsError::InvalidStartFrame {
                start: start_frame,
                total,
            });
        }
        Ok(Self {
            id,
            source_path,
            frames,
            start_frame,
            offset: None,
            noise: None,
        })
    }

    /// Decode a raw dump; the run is named after the file stem.
    pub fn load(path: &Path, resolution: Resolution, start_frame: usize) -> Result<Self> {
        let frames = read_raw_file(path, resolution)?;
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| RunId::Named(s.to_string()))
            .unwrap_or(RunId::Auto(0));
        Self::new(id, path.to_path_buf(), frames, start_frame)
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    pub fn resolution(&self) -> (usize, usize) {
        self.frames.resolution()
    }

    /// Frames from `start_frame` onward.
    pub fn usable_frames(&self) -> ArrayView3<'_, u16> {
        self.frames.data.slice(s![self.start_frame.., .., ..])
    }

    pub fn usable_frame_count(&self) -> usize {
        self.frame_count() - self.start_frame
    }

    /// Fill in the offset and noise maps from the usable frames.
    pub fn compute_statistics(&mut self) -> Result<()> {
        let (rows, cols) = self.resolution();
        let resolution = Resolution::new(rows, cols)?;
        let usable = self.usable_frames();
        let offset = compute_offset(usable, resolution)?;
        let noise = compute_noise(usable, resolution)?;
        debug!(
            run = %self.id,
            frames = usable.len_of(ndarray::Axis(0)),
            "Computed run statistics"
        );
        self.offset = Some(offset);
        self.noise = Some(noise);
        Ok(())
    }

    pub fn offset(&self) -> Option<&Array2<f64>> {
        self.offset.as_ref()
    }

    pub fn noise(&self) -> Option<&Array2<f64>> {
        self.noise.as_ref()
    }

    /// The run's offset and noise as a calibration, once computed.
    ///
    /// Used on dark runs: the noise of a dark run is the read noise.
    pub fn calibration(&self) -> Option<Calibration> {
        match (&self.offset, &self.noise) {
            (Some(offset), Some(noise)) => Some(Calibration {
                offset: offset.clone(),
                read_noise: noise.clone(),
            }),
            _ => None,
        }
    }
}

/// Decode every matching raw dump in a run directory.
pub fn load_run_dir(
    dir: &Path,
    identifier: Option<&str>,
    config: &AnalysisConfig,
) -> Result<Vec<Run>> {
    let paths = discover_runs(dir, identifier, &config.raw_extension)?;
    if paths.is_empty() {
        return Err(MapsError::FileNotFound(dir.to_path_buf()));
    }
    info!(dir = %dir.display(), runs = paths.len(), "Loading run directory");
    paths
        .iter()
        .map(|p| Run::load(p, config.resolution, config.start_frame))
        .collect()
}

/// Per-pixel offset and read-noise maps shared by every analysis in a session.
#[derive(Clone, Debug)]
pub struct Calibration {
    pub offset: Array2<f64>,
    pub read_noise: Array2<f64>,
}

impl Calibration {
    pub fn new(offset: Array2<f64>, read_noise: Array2<f64>) -> Result<Self> {
        if offset.dim() != read_noise.dim() {
            return Err(MapsError::DimensionMismatch {
                context: "calibration read noise".into(),
                expected: offset.dim(),
                found: read_noise.dim(),
            });
        }
        Ok(Self { offset, read_noise })
    }

    pub fn resolution(&self) -> (usize, usize) {
        self.offset.dim()
    }

    pub fn load(offset_path: &Path, read_noise_path: &Path) -> Result<Self> {
        let offset: Array2<f64> = load_array(offset_path)?;
        let read_noise: Array2<f64> = load_array(read_noise_path)?;
        Self::new(offset, read_noise)
    }

    pub fn save(&self, offset_path: &Path, read_noise_path: &Path) -> Result<()> {
        if read_noise_path.exists() {
            return Err(MapsError::PathAlreadyInUse(read_noise_path.to_path_buf()));
        }
        save_array(&self.offset, offset_path)?;
        save_array(&self.read_noise, read_noise_path)
    }
}
