//! Generators for synthetic NRRD volumes.
//!
//! Volumes are written with predictable sample values so decoded arrays can be
//! checked element by element. Sample order is always NRRD file order
//! (fastest axis first).

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Creates `count` samples whose value is their linear index.
///
/// # Example
///
/// ```
/// use test_utils::create_index_samples;
///
/// assert_eq!(create_index_samples(4), vec![0, 1, 2, 3]);
/// ```
pub fn create_index_samples(count: usize) -> Vec<u32> {
    (0..count as u32).collect()
}

/// Renders an attached-data NRRD header (including the terminating blank line).
///
/// `endian` is omitted from the header when `None`.
pub fn nrrd_header(type_name: &str, sizes: &[usize], encoding: &str, endian: Option<&str>) -> String {
    let sizes_str = sizes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut header = String::from("NRRD0004\n# generated by test-utils\n");
    header.push_str(&format!("type: {}\n", type_name));
    header.push_str(&format!("dimension: {}\n", sizes.len()));
    header.push_str(&format!("sizes: {}\n", sizes_str));
    if let Some(endian) = endian {
        header.push_str(&format!("endian: {}\n", endian));
    }
    header.push_str(&format!("encoding: {}\n", encoding));
    header.push('\n');
    header
}

/// Gzip-compresses `bytes`.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("Failed to gzip test payload");
    encoder.finish().expect("Failed to finish gzip stream")
}

/// Raw little-endian `uint32` volume (the annotation volume layout).
pub fn raw_u32_le_nrrd(sizes: &[usize], samples: &[u32]) -> Vec<u8> {
    let mut bytes = nrrd_header("uint32", sizes, "raw", Some("little")).into_bytes();
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Raw big-endian `uint16` volume.
pub fn raw_u16_be_nrrd(sizes: &[usize], samples: &[u16]) -> Vec<u8> {
    let mut bytes = nrrd_header("unsigned short", sizes, "raw", Some("big")).into_bytes();
    for sample in samples {
        bytes.extend_from_slice(&sample.to_be_bytes());
    }
    bytes
}

/// Gzip-encoded little-endian `float` volume (the grid data layout).
pub fn gzip_f32_le_nrrd(sizes: &[usize], samples: &[f32]) -> Vec<u8> {
    let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let mut bytes = nrrd_header("float", sizes, "gzip", Some("little")).into_bytes();
    bytes.extend_from_slice(&gzip(&payload));
    bytes
}

/// ASCII-encoded volume of any type.
pub fn ascii_nrrd(type_name: &str, sizes: &[usize], samples: &[f64]) -> Vec<u8> {
    let mut text = nrrd_header(type_name, sizes, "ascii", None);
    let body = samples
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    text.push_str(&body);
    text.push('\n');
    text.into_bytes()
}
