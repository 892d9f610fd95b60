use ndarray::{Array3, ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RESOLUTION;
use crate::error::{MapsError, Result};

/// Sensor geometry as (rows, columns).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Resolution {
    pub rows: usize,
    pub cols: usize,
}

impl Resolution {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MapsError::InvalidResolution(format!(
                "{rows}x{cols} has an empty axis"
            )));
        }
        Ok(Self { rows, cols })
    }

    /// Build from a list of axis extents; exactly two are required.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        match dims {
            [rows, cols] => Self::new(*rows, *cols),
            _ => Err(MapsError::InvalidResolution(format!(
                "expected 2 dimensions, got {}",
                dims.len()
            ))),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Fail with `ShapeMismatch` unless `dims` equals this resolution.
    pub fn check(&self, dims: (usize, usize)) -> Result<()> {
        if dims != self.shape() {
            return Err(MapsError::ShapeMismatch {
                expected: vec![self.rows, self.cols],
                found: vec![dims.0, dims.1],
            });
        }
        Ok(())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            rows: DEFAULT_RESOLUTION.0,
            cols: DEFAULT_RESOLUTION.1,
        }
    }
}

impl TryFrom<Vec<usize>> for Resolution {
    type Error = MapsError;

    fn try_from(dims: Vec<usize>) -> Result<Self> {
        Self::from_dims(&dims)
    }
}

impl From<Resolution> for Vec<usize> {
    fn from(r: Resolution) -> Self {
        vec![r.rows, r.cols]
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Decoded raw samples, shape = (frame, row, column).
#[derive(Clone, Debug)]
pub struct FrameSequence {
    pub data: Array3<u16>,
}

impl FrameSequence {
    pub fn new(data: Array3<u16>) -> Self {
        Self { data }
    }

    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn resolution(&self) -> (usize, usize) {
        let (_, rows, cols) = self.data.dim();
        (rows, cols)
    }

    pub fn frame(&self, index: usize) -> Result<ArrayView2<'_, u16>> {
        let total = self.frame_count();
        if index >= total {
            return Err(MapsError::FrameOutOfRange { index, total });
        }
        Ok(self.data.index_axis(Axis(0), index))
    }

    pub fn view(&self) -> ArrayView3<'_, u16> {
        self.data.view()
    }
}
