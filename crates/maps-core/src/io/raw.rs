use std::fs::File;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use ndarray::Array3;
use tracing::debug;

use crate::consts::{BYTES_PER_SAMPLE, DISCARDED_LEADING_FRAMES, FRAME_HEADER_SAMPLES};
use crate::error::{MapsError, Result};
use crate::frame::{FrameSequence, Resolution};

/// Samples occupied by one physical frame: the pixels plus the metadata header.
pub fn slot_size(resolution: Resolution) -> usize {
    resolution.pixel_count() + FRAME_HEADER_SAMPLES
}

/// Decode a flat stream of raw samples into per-pixel frames.
///
/// The stream is a sequence of frame slots of `rows * cols + 2` samples. Slot 0
/// is discarded entirely and the 2 leading metadata samples are stripped from
/// every remaining slot. Returns the frames and the usable frame count.
pub fn decode(samples: &[u16], resolution: Resolution) -> Result<(FrameSequence, usize)> {
    let slot = slot_size(resolution);
    if samples.len() % slot != 0 {
        return Err(MapsError::IncompleteFrameData {
            samples: samples.len(),
            slot_size: slot,
        });
    }

    let slots = samples.len() / slot;
    if slots <= DISCARDED_LEADING_FRAMES {
        return Err(MapsError::EmptySequence);
    }
    let usable = slots - DISCARDED_LEADING_FRAMES;

    let mut pixels = Vec::with_capacity(usable * resolution.pixel_count());
    for frame in samples.chunks_exact(slot).skip(DISCARDED_LEADING_FRAMES) {
        pixels.extend_from_slice(&frame[FRAME_HEADER_SAMPLES..]);
    }

    let data = Array3::from_shape_vec((usable, resolution.rows, resolution.cols), pixels)
        .map_err(|_| MapsError::ShapeMismatch {
            expected: vec![usable, resolution.rows, resolution.cols],
            found: vec![samples.len()],
        })?;

    debug!(slots, usable, %resolution, "Decoded raw frame stream");
    Ok((FrameSequence::new(data), usable))
}

/// Decode little-endian raw bytes. An odd byte count is incomplete data.
pub fn decode_bytes(bytes: &[u8], resolution: Resolution) -> Result<(FrameSequence, usize)> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(MapsError::IncompleteFrameData {
            samples: bytes.len() / BYTES_PER_SAMPLE,
            slot_size: slot_size(resolution),
        });
    }
    let mut samples = vec![0u16; bytes.len() / BYTES_PER_SAMPLE];
    LittleEndian::read_u16_into(bytes, &mut samples);
    decode(&samples, resolution)
}

/// Memory-mapped raw frame dump.
pub struct RawReader {
    mmap: Mmap,
    pub resolution: Resolution,
}

impl RawReader {
    pub fn open(path: &Path, resolution: Resolution) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MapsError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if file.metadata()?.len() == 0 {
            return Err(MapsError::EmptySequence);
        }
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap, resolution })
    }

    pub fn byte_len(&self) -> usize {
        self.mmap.len()
    }

    /// Physical frame slots in the file, including the discarded slot 0.
    pub fn slot_count(&self) -> usize {
        self.byte_len() / (slot_size(self.resolution) * BYTES_PER_SAMPLE)
    }

    /// Decode the whole file. The map is dropped with the reader.
    pub fn decode(&self) -> Result<(FrameSequence, usize)> {
        decode_bytes(&self.mmap, self.resolution)
    }
}

/// Read and decode a raw dump, releasing the file before returning.
pub fn read_raw_file(path: &Path, resolution: Resolution) -> Result<FrameSequence> {
    let (frames, usable) = {
        let reader = RawReader::open(path, resolution)?;
        reader.decode()?
    };
    debug!(path = %path.display(), usable, "Loaded raw frames");
    Ok(frames)
}
