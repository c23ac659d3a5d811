//! NRRD header parsing.
//!
//! The header is ASCII: a `NRRD000<n>` magic line, then `field: value` lines,
//! `key:=value` pairs and `#` comments, terminated by an empty line. For
//! attached data the payload starts immediately after that empty line.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{NrrdError, NrrdResult};

/// Sample type of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    /// Parse any of the spellings the format allows (`uchar`, `unsigned char`,
    /// `uint8`, `uint8_t`, ...).
    pub fn parse(value: &str) -> NrrdResult<Self> {
        let normalized = value.trim().to_lowercase();
        let scalar = match normalized.as_str() {
            "signed char" | "int8" | "int8_t" => ScalarType::Int8,
            "uchar" | "unsigned char" | "uint8" | "uint8_t" => ScalarType::UInt8,
            "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
                ScalarType::Int16
            }
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
                ScalarType::UInt16
            }
            "int" | "signed int" | "int32" | "int32_t" => ScalarType::Int32,
            "uint" | "unsigned int" | "uint32" | "uint32_t" => ScalarType::UInt32,
            "longlong" | "long long" | "long long int" | "signed long long"
            | "signed long long int" | "int64" | "int64_t" => ScalarType::Int64,
            "ulonglong" | "unsigned long long" | "unsigned long long int" | "uint64"
            | "uint64_t" => ScalarType::UInt64,
            "float" => ScalarType::Float32,
            "double" => ScalarType::Float64,
            "block" => return Err(NrrdError::Unsupported("block type".to_string())),
            _ => return Err(NrrdError::invalid_field("type", value)),
        };
        Ok(scalar)
    }

    /// Bytes per sample.
    pub fn size(&self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Int64 | ScalarType::UInt64 | ScalarType::Float64 => 8,
        }
    }
}

/// Payload encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Gzip,
    Ascii,
}

impl Encoding {
    pub fn parse(value: &str) -> NrrdResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "raw" => Ok(Encoding::Raw),
            "gzip" | "gz" => Ok(Encoding::Gzip),
            "ascii" | "text" | "txt" => Ok(Encoding::Ascii),
            "bzip2" | "bz2" | "hex" => Err(NrrdError::Unsupported(format!(
                "{} encoding",
                value.trim()
            ))),
            _ => Err(NrrdError::invalid_field("encoding", value)),
        }
    }
}

/// Byte order of multi-byte binary samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn parse(value: &str) -> NrrdResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "little" => Ok(Endian::Little),
            "big" => Ok(Endian::Big),
            _ => Err(NrrdError::invalid_field("endian", value)),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => f.write_str("little"),
            Endian::Big => f.write_str("big"),
        }
    }
}

/// Parsed NRRD header.
#[derive(Debug, Clone, PartialEq)]
pub struct NrrdHeader {
    /// Format version from the magic line.
    pub version: u32,
    pub scalar_type: ScalarType,
    pub dimension: usize,
    /// Axis lengths, fastest-varying axis first.
    pub sizes: Vec<usize>,
    pub encoding: Encoding,
    /// Required for multi-byte binary samples.
    pub endian: Option<Endian>,
    pub space: Option<String>,
    /// One vector per axis; `None` for non-spatial axes.
    pub space_directions: Option<Vec<Option<Vec<f64>>>>,
    pub space_origin: Option<Vec<f64>>,
    pub spacings: Option<Vec<f64>>,
    pub kinds: Option<Vec<String>>,
    pub content: Option<String>,
    /// Every field exactly as read, keyed by lower-cased field name.
    pub fields: BTreeMap<String, String>,
    /// `key:=value` pairs.
    pub key_values: BTreeMap<String, String>,
}

impl NrrdHeader {
    /// Number of samples the payload holds.
    pub fn num_samples(&self) -> NrrdResult<usize> {
        self.sizes
            .iter()
            .try_fold(1usize, |count, &size| count.checked_mul(size))
            .ok_or_else(|| NrrdError::invalid_field("sizes", self.overflow_message()))
    }

    /// Decoded payload length in bytes.
    pub fn payload_len(&self) -> NrrdResult<usize> {
        self.num_samples()?
            .checked_mul(self.scalar_type.size())
            .ok_or_else(|| NrrdError::invalid_field("sizes", self.overflow_message()))
    }

    fn overflow_message(&self) -> String {
        format!(
            "{:?} samples of {} bytes overflow the address space",
            self.sizes,
            self.scalar_type.size()
        )
    }

    /// Per-axis voxel size, from `space directions` (vector norms) or `spacings`.
    pub fn voxel_size(&self) -> Option<Vec<f64>> {
        if let Some(directions) = &self.space_directions {
            return Some(
                directions
                    .iter()
                    .map(|dir| {
                        dir.as_ref()
                            .map(|v| v.iter().map(|c| c * c).sum::<f64>().sqrt())
                            .unwrap_or(f64::NAN)
                    })
                    .collect(),
            );
        }
        self.spacings.clone()
    }

    fn field(&self, name: &'static str) -> NrrdResult<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or(NrrdError::MissingField(name))
    }
}

/// Split `bytes` into a parsed header and the byte offset of the payload.
pub fn parse_header(bytes: &[u8]) -> NrrdResult<(NrrdHeader, usize)> {
    let mut offset = 0;
    let mut lines = Vec::new();
    let mut terminated = false;

    while offset < bytes.len() {
        let end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| offset + p)
            .unwrap_or(bytes.len());
        let raw = &bytes[offset..end];
        offset = (end + 1).min(bytes.len());

        let line = std::str::from_utf8(raw)
            .map_err(|_| NrrdError::InvalidData("non-ASCII header line".to_string()))?
            .trim_end_matches('\r');

        if line.is_empty() {
            terminated = true;
            break;
        }
        lines.push(line.to_string());
    }

    let magic = lines
        .first()
        .ok_or_else(|| NrrdError::InvalidMagic("empty file".to_string()))?;
    let version = parse_magic(magic)?;

    let mut fields = BTreeMap::new();
    let mut key_values = BTreeMap::new();

    for line in &lines[1..] {
        if line.starts_with('#') {
            continue;
        }
        // The first separator on the line decides its kind.
        match (line.find(":="), line.find(": ")) {
            (Some(kv), field) if field.map_or(true, |f| kv < f) => {
                key_values.insert(line[..kv].to_string(), line[kv + 2..].to_string());
            }
            (_, Some(f)) => {
                fields.insert(line[..f].trim().to_lowercase(), line[f + 2..].trim().to_string());
            }
            _ => {
                return Err(NrrdError::InvalidData(format!(
                    "malformed header line: {}",
                    line
                )));
            }
        }
    }

    if !terminated && (fields.contains_key("data file") || fields.contains_key("datafile")) {
        // Detached headers may end at EOF; rejected below either way.
        terminated = true;
    }
    if !terminated {
        return Err(NrrdError::InvalidData(
            "header is not terminated by an empty line".to_string(),
        ));
    }

    let header = build_header(version, fields, key_values)?;
    debug!(
        version = header.version,
        dimension = header.dimension,
        sizes = ?header.sizes,
        data_offset = offset,
        "Parsed NRRD header"
    );
    Ok((header, offset))
}

fn parse_magic(line: &str) -> NrrdResult<u32> {
    let digits = line
        .strip_prefix("NRRD")
        .ok_or_else(|| NrrdError::InvalidMagic(line.to_string()))?;
    if digits.len() != 4 {
        return Err(NrrdError::InvalidMagic(line.to_string()));
    }
    digits
        .parse()
        .map_err(|_| NrrdError::InvalidMagic(line.to_string()))
}

fn build_header(
    version: u32,
    fields: BTreeMap<String, String>,
    key_values: BTreeMap<String, String>,
) -> NrrdResult<NrrdHeader> {
    let mut header = NrrdHeader {
        version,
        scalar_type: ScalarType::UInt8,
        dimension: 0,
        sizes: Vec::new(),
        encoding: Encoding::Raw,
        endian: None,
        space: None,
        space_directions: None,
        space_origin: None,
        spacings: None,
        kinds: None,
        content: None,
        fields,
        key_values,
    };

    if header.fields.contains_key("data file") || header.fields.contains_key("datafile") {
        return Err(NrrdError::Unsupported("detached data file".to_string()));
    }
    for skip in ["line skip", "lineskip", "byte skip", "byteskip"] {
        if let Some(value) = header.fields.get(skip) {
            if value.trim() != "0" {
                return Err(NrrdError::Unsupported(format!("{} {}", skip, value)));
            }
        }
    }

    header.scalar_type = ScalarType::parse(header.field("type")?)?;

    let dimension = header.field("dimension")?;
    header.dimension = dimension
        .parse()
        .map_err(|_| NrrdError::invalid_field("dimension", dimension))?;

    let sizes = header.field("sizes")?;
    header.sizes = sizes
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| NrrdError::invalid_field("sizes", sizes))?;
    if header.sizes.len() != header.dimension {
        return Err(NrrdError::invalid_field(
            "sizes",
            format!("{} entries for dimension {}", header.sizes.len(), header.dimension),
        ));
    }
    header.payload_len()?;

    header.encoding = Encoding::parse(header.field("encoding")?)?;

    if let Some(endian) = header.fields.get("endian") {
        header.endian = Some(Endian::parse(endian)?);
    }

    header.space = header.fields.get("space").cloned();
    header.content = header.fields.get("content").cloned();
    header.kinds = header
        .fields
        .get("kinds")
        .map(|k| k.split_whitespace().map(str::to_string).collect());

    if let Some(spacings) = header.fields.get("spacings") {
        header.spacings = Some(
            spacings
                .split_whitespace()
                .map(|s| s.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| NrrdError::invalid_field("spacings", spacings.as_str()))?,
        );
    }

    if let Some(directions) = header.fields.get("space directions") {
        header.space_directions = Some(
            directions
                .split_whitespace()
                .map(|token| {
                    if token == "none" {
                        Ok(None)
                    } else {
                        parse_vector(token).map(Some)
                    }
                })
                .collect::<NrrdResult<Vec<_>>>()?,
        );
    }

    if let Some(origin) = header.fields.get("space origin") {
        header.space_origin = Some(parse_vector(origin)?);
    }

    Ok(header)
}

/// Parse a `(x,y,z)` vector.
fn parse_vector(token: &str) -> NrrdResult<Vec<f64>> {
    let inner = token
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| NrrdError::invalid_field("vector", token))?;
    inner
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| NrrdError::invalid_field("vector", token))
}
