//! Grid data image kinds served by the `grid_data` endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A per-experiment volume available from `grid_data/download_file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridImage {
    InjectionDensity,
    ProjectionDensity,
    DataMask,
    InjectionFraction,
}

impl GridImage {
    /// All image kinds, in the order the service documents them.
    pub const ALL: [GridImage; 4] = [
        GridImage::InjectionDensity,
        GridImage::ProjectionDensity,
        GridImage::DataMask,
        GridImage::InjectionFraction,
    ];

    /// Value of the `image` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            GridImage::InjectionDensity => "injection_density",
            GridImage::ProjectionDensity => "projection_density",
            GridImage::DataMask => "data_mask",
            GridImage::InjectionFraction => "injection_fraction",
        }
    }
}

impl fmt::Display for GridImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridImage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridImage::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown grid image kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for kind in GridImage::ALL {
            assert_eq!(kind.as_str().parse::<GridImage>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!("projection_energy".parse::<GridImage>().is_err());
    }
}
