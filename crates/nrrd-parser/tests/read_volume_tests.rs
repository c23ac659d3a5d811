//! End-to-end decoding tests over synthetic NRRD volumes.

use ndarray::IxDyn;
use nrrd_parser::{parse_nrrd, read_nrrd, Encoding, NrrdError, ScalarType};
use test_utils::{
    ascii_nrrd, create_index_samples, gzip, gzip_f32_le_nrrd, nrrd_header, raw_u16_be_nrrd,
    raw_u32_le_nrrd, temp_test_dir,
};

// ============================================================================
// Encodings
// ============================================================================

#[test]
fn test_raw_little_endian_u32() {
    let bytes = raw_u32_le_nrrd(&[4, 3, 2], &create_index_samples(24));
    let (header, volume) = parse_nrrd::<u32>(&bytes).unwrap();

    assert_eq!(header.scalar_type, ScalarType::UInt32);
    assert_eq!(volume.shape(), &[4, 3, 2]);
    // First axis varies fastest in the file.
    assert_eq!(volume[IxDyn(&[0, 0, 0])], 0);
    assert_eq!(volume[IxDyn(&[1, 0, 0])], 1);
    assert_eq!(volume[IxDyn(&[0, 1, 0])], 4);
    assert_eq!(volume[IxDyn(&[0, 0, 1])], 12);
    assert_eq!(volume[IxDyn(&[3, 2, 1])], 23);
}

#[test]
fn test_raw_big_endian_u16() {
    let bytes = raw_u16_be_nrrd(&[3], &[1, 256, 65535]);
    let (header, volume) = parse_nrrd::<u16>(&bytes).unwrap();

    assert_eq!(header.endian, Some(nrrd_parser::Endian::Big));
    assert_eq!(volume.iter().copied().collect::<Vec<_>>(), vec![1, 256, 65535]);
}

#[test]
fn test_gzip_f32() {
    let samples = [0.0f32, 0.25, 0.5, 1.0, 2.0, 4.0];
    let bytes = gzip_f32_le_nrrd(&[3, 2], &samples);
    let (header, volume) = parse_nrrd::<f32>(&bytes).unwrap();

    assert_eq!(header.encoding, Encoding::Gzip);
    assert_eq!(volume.shape(), &[3, 2]);
    assert_eq!(volume[IxDyn(&[2, 1])], 4.0);
    assert_eq!(volume[IxDyn(&[1, 0])], 0.25);
}

#[test]
fn test_ascii_double() {
    let bytes = ascii_nrrd("double", &[2, 2], &[1.5, -2.0, 3.25, 0.0]);
    let (_, volume) = parse_nrrd::<f64>(&bytes).unwrap();

    assert_eq!(volume[IxDyn(&[0, 0])], 1.5);
    assert_eq!(volume[IxDyn(&[1, 0])], -2.0);
    assert_eq!(volume[IxDyn(&[0, 1])], 3.25);
}

#[test]
fn test_single_byte_type_needs_no_endian() {
    let mut bytes = nrrd_header("uchar", &[4], "raw", None).into_bytes();
    bytes.extend_from_slice(&[10, 20, 30, 40]);
    let (_, volume) = parse_nrrd::<u8>(&bytes).unwrap();
    assert_eq!(volume.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30, 40]);
}

// ============================================================================
// Casting
// ============================================================================

#[test]
fn test_cast_u32_to_f64() {
    let bytes = raw_u32_le_nrrd(&[2], &[997, 4294967295]);
    let (_, volume) = parse_nrrd::<f64>(&bytes).unwrap();
    assert_eq!(volume[IxDyn(&[1])], 4294967295.0);
}

#[test]
fn test_cast_out_of_range_fails() {
    let bytes = raw_u32_le_nrrd(&[1], &[70000]);
    let result = parse_nrrd::<u16>(&bytes);
    assert!(matches!(result, Err(NrrdError::InvalidData(_))));
}

// ============================================================================
// Malformed payloads
// ============================================================================

#[test]
fn test_truncated_payload() {
    let mut bytes = raw_u32_le_nrrd(&[4], &[1, 2, 3, 4]);
    bytes.truncate(bytes.len() - 3);
    let result = parse_nrrd::<u32>(&bytes);
    assert!(matches!(result, Err(NrrdError::InvalidData(_))));
}

#[test]
fn test_missing_endian_for_multibyte() {
    let mut bytes = nrrd_header("short", &[2], "raw", None).into_bytes();
    bytes.extend_from_slice(&[0, 1, 0, 2]);
    let result = parse_nrrd::<i16>(&bytes);
    assert!(matches!(result, Err(NrrdError::MissingField("endian"))));
}

#[test]
fn test_corrupt_gzip() {
    let mut bytes = nrrd_header("float", &[2], "gzip", Some("little")).into_bytes();
    let mut compressed = gzip(&[0u8; 8]);
    compressed.truncate(compressed.len() / 2);
    bytes.extend_from_slice(&compressed);
    let result = parse_nrrd::<f32>(&bytes);
    assert!(matches!(result, Err(NrrdError::InvalidData(_))));
}

#[test]
fn test_ascii_sample_count_mismatch() {
    let bytes = ascii_nrrd("int", &[3], &[1.0, 2.0]);
    let result = parse_nrrd::<i32>(&bytes);
    assert!(matches!(result, Err(NrrdError::InvalidData(_))));
}

#[test]
fn test_sample_count_overflow() {
    let bytes = nrrd_header("uchar", &[4294967296, 4294967296, 4294967296], "raw", None).into_bytes();
    match parse_nrrd::<u8>(&bytes) {
        Err(NrrdError::InvalidField { field, .. }) => assert_eq!(field, "sizes"),
        other => panic!("expected sizes error, got {:?}", other.map(|(h, _)| h)),
    }
}

#[test]
fn test_payload_length_overflow() {
    // Sample count fits, byte length does not.
    let bytes = nrrd_header("double", &[1 << 62], "raw", Some("little")).into_bytes();
    assert!(matches!(
        parse_nrrd::<f64>(&bytes),
        Err(NrrdError::InvalidField { .. })
    ));
}

#[test]
fn test_gzip_huge_declared_size_short_payload() {
    let mut bytes =
        nrrd_header("double", &[1_000_000_000, 1_000_000_000], "gzip", Some("little")).into_bytes();
    bytes.extend_from_slice(&gzip(&[0u8; 8]));
    assert!(matches!(
        parse_nrrd::<f64>(&bytes),
        Err(NrrdError::InvalidData(_))
    ));
}

#[test]
fn test_bzip2_unsupported() {
    let bytes = nrrd_header("float", &[1], "bzip2", Some("little")).into_bytes();
    let result = parse_nrrd::<f32>(&bytes);
    assert!(matches!(result, Err(NrrdError::Unsupported(_))));
}

// ============================================================================
// Files on disk
// ============================================================================

#[test]
fn test_read_from_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("annotation_100.nrrd");
    std::fs::write(&path, raw_u32_le_nrrd(&[2, 2, 2], &create_index_samples(8))).unwrap();

    let (header, volume) = read_nrrd::<u32>(&path).unwrap();
    assert_eq!(header.num_samples().unwrap(), 8);
    assert_eq!(volume.sum(), 28);
}

#[test]
fn test_read_missing_file() {
    let dir = temp_test_dir();
    let result = read_nrrd::<u32>(dir.path().join("absent.nrrd"));
    assert!(matches!(result, Err(NrrdError::IoError(_))));
}
