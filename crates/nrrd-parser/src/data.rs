//! Payload decoding.
//!
//! Samples are decoded in their stored type and then cast to the caller's
//! element type with `NumCast`, so a `uint32` annotation volume can be read
//! as `u32`, `i64` or `f64` alike. A sample that does not fit the target type
//! is an error rather than a silent wrap.

use std::io::Read;

use flate2::read::GzDecoder;
use num_traits::{NumCast, ToPrimitive};
use tracing::{debug, warn};

use crate::error::{NrrdError, NrrdResult};
use crate::header::{Encoding, Endian, NrrdHeader, ScalarType};

/// Decode the payload that follows `header` into a flat sample vector in file
/// order (fastest axis first).
pub fn decode_samples<T: NumCast + Copy>(header: &NrrdHeader, payload: &[u8]) -> NrrdResult<Vec<T>> {
    let count = header.num_samples()?;

    match header.encoding {
        Encoding::Ascii => decode_ascii(payload, count),
        Encoding::Raw => decode_binary(header, payload),
        Encoding::Gzip => {
            // Inflate at most one byte past the declared length; anything
            // beyond that is only reported as trailing data.
            let limit = header.payload_len()?.saturating_add(1) as u64;
            let mut inflated = Vec::new();
            GzDecoder::new(payload)
                .take(limit)
                .read_to_end(&mut inflated)
                .map_err(|e| NrrdError::InvalidData(format!("gzip decompression failed: {}", e)))?;
            debug!(
                compressed = payload.len(),
                inflated = inflated.len(),
                "Inflated gzip payload"
            );
            decode_binary(header, &inflated)
        }
    }
}

fn decode_ascii<T: NumCast + Copy>(payload: &[u8], count: usize) -> NrrdResult<Vec<T>> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| NrrdError::InvalidData("ascii payload is not UTF-8".to_string()))?;

    let values = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let value: f64 = token
                .parse()
                .map_err(|_| NrrdError::InvalidData(format!("bad ascii sample: {}", token)))?;
            cast(value)
        })
        .collect::<NrrdResult<Vec<T>>>()?;

    if values.len() != count {
        return Err(NrrdError::InvalidData(format!(
            "expected {} samples, found {}",
            count,
            values.len()
        )));
    }
    Ok(values)
}

fn decode_binary<T: NumCast + Copy>(header: &NrrdHeader, bytes: &[u8]) -> NrrdResult<Vec<T>> {
    let size = header.scalar_type.size();
    let needed = header.payload_len()?;

    if bytes.len() < needed {
        return Err(NrrdError::InvalidData(format!(
            "expected {} bytes of sample data, found {}",
            needed,
            bytes.len()
        )));
    }
    if bytes.len() > needed {
        warn!(
            expected = needed,
            actual = bytes.len(),
            "Ignoring trailing bytes after sample data"
        );
    }

    let endian = match (size, header.endian) {
        (1, _) => Endian::Little,
        (_, Some(endian)) => endian,
        (_, None) => return Err(NrrdError::MissingField("endian")),
    };

    let bytes = &bytes[..needed];

    macro_rules! decode_as {
        ($ty:ty) => {
            bytes
                .chunks_exact(size)
                .map(|chunk| {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(chunk);
                    let value = match endian {
                        Endian::Little => <$ty>::from_le_bytes(raw),
                        Endian::Big => <$ty>::from_be_bytes(raw),
                    };
                    cast(value)
                })
                .collect::<NrrdResult<Vec<T>>>()
        };
    }

    match header.scalar_type {
        ScalarType::Int8 => decode_as!(i8),
        ScalarType::UInt8 => decode_as!(u8),
        ScalarType::Int16 => decode_as!(i16),
        ScalarType::UInt16 => decode_as!(u16),
        ScalarType::Int32 => decode_as!(i32),
        ScalarType::UInt32 => decode_as!(u32),
        ScalarType::Int64 => decode_as!(i64),
        ScalarType::UInt64 => decode_as!(u64),
        ScalarType::Float32 => decode_as!(f32),
        ScalarType::Float64 => decode_as!(f64),
    }
}

fn cast<S: ToPrimitive + Copy + std::fmt::Debug, T: NumCast>(value: S) -> NrrdResult<T> {
    T::from(value).ok_or_else(|| {
        NrrdError::InvalidData(format!(
            "sample {:?} does not fit the requested element type",
            value
        ))
    })
}
