use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;

use ndarray::{Array, Array2, ArrayBase, Data, Dimension, IxDyn};
use npyz::{AutoSerialize, Deserialize, NpyFile, Order, WriterBuilder};
use tracing::debug;

use crate::error::{MapsError, Result};

/// Open `path` for writing, refusing to touch an existing file.
fn create_new(path: &Path) -> Result<File> {
    if path.exists() {
        return Err(MapsError::PathAlreadyInUse(path.to_path_buf()));
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(MapsError::PathAlreadyInUse(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

fn open_existing(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MapsError::FileNotFound(path.to_path_buf()),
        _ => MapsError::Io(e),
    })
}

/// Write an array as a C-ordered `.npy` file.
pub fn save_array<S, D>(array: &ArrayBase<S, D>, path: &Path) -> Result<()>
where
    S: Data,
    S::Elem: AutoSerialize + Copy,
    D: Dimension,
{
    let file = create_new(path)?;
    let shape: Vec<u64> = array.shape().iter().map(|&d| d as u64).collect();
    let mut writer = npyz::WriteOptions::new()
        .default_dtype()
        .shape(&shape)
        .writer(BufWriter::new(file))
        .begin_nd()?;
    for value in array.iter() {
        writer.push(value)?;
    }
    writer.finish()?;
    debug!(path = %path.display(), shape = ?array.shape(), "Saved array");
    Ok(())
}

/// Read a C-ordered `.npy` file into an array of dimensionality `D`.
pub fn load_array<T, D>(path: &Path) -> Result<Array<T, D>>
where
    T: Deserialize,
    D: Dimension,
{
    let reader = BufReader::new(open_existing(path)?);
    let npy = NpyFile::new(reader)?;
    let shape: Vec<usize> = npy.shape().iter().map(|&d| d as usize).collect();
    if npy.order() == Order::Fortran {
        return Err(MapsError::Io(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("{} is Fortran-ordered", path.display()),
        )));
    }
    let values = npy.into_vec::<T>()?;
    let array = Array::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
        MapsError::ShapeMismatch {
            expected: shape.clone(),
            found: vec![],
        }
    })?;
    let ndim = D::NDIM.unwrap_or(shape.len());
    array
        .into_dimensionality::<D>()
        .map_err(|_| MapsError::ShapeMismatch {
            expected: vec![0; ndim],
            found: shape,
        })
}

/// Save a boolean mask as 0/1 bytes.
pub fn save_mask(mask: &Array2<bool>, path: &Path) -> Result<()> {
    save_array(&mask.mapv(u8::from), path)
}

pub fn load_mask(path: &Path) -> Result<Array2<bool>> {
    let raw: Array2<u8> = load_array(path)?;
    Ok(raw.mapv(|v| v != 0))
}
