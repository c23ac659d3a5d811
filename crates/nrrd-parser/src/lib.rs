//! NRRD ("Nearly Raw Raster Data") reader.
//!
//! The atlas publishes its annotation, template and per-experiment grid
//! volumes as attached NRRD files, typically gzip-encoded. This crate reads
//! the header and decodes the payload into an `ndarray` array.
//!
//! # Axis order
//!
//! NRRD lists axis sizes fastest-varying first. The returned array keeps that
//! order: its shape equals `header.sizes`, laid out in Fortran (column-major)
//! order, so `array[[x, y, z]]` addresses the sample at `x + sx * (y + sy * z)`
//! in the file.
//!
//! # Limitations
//!
//! Detached data files, `bzip2` and `hex` encodings, and non-zero line/byte
//! skips are rejected with [`NrrdError::Unsupported`].

pub mod data;
pub mod error;
pub mod header;

use std::path::Path;

use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use num_traits::NumCast;
use tracing::debug;

pub use error::{NrrdError, NrrdResult};
pub use header::{parse_header, Encoding, Endian, NrrdHeader, ScalarType};

/// Read an NRRD file, casting samples to `T`.
pub fn read_nrrd<T: NumCast + Copy>(path: impl AsRef<Path>) -> NrrdResult<(NrrdHeader, ArrayD<T>)> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Reading NRRD file");
    parse_nrrd(&bytes)
}

/// Parse an in-memory NRRD file, casting samples to `T`.
pub fn parse_nrrd<T: NumCast + Copy>(bytes: &[u8]) -> NrrdResult<(NrrdHeader, ArrayD<T>)> {
    let (header, offset) = parse_header(bytes)?;
    let samples = data::decode_samples(&header, &bytes[offset..])?;

    let array = ArrayD::from_shape_vec(IxDyn(&header.sizes).f(), samples)
        .map_err(|e| NrrdError::InvalidData(format!("shape error: {}", e)))?;

    Ok((header, array))
}
