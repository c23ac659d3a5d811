//! Named service queries.
//!
//! The connectivity search services take their arguments as `[key$eqvalue]`
//! clauses appended to `service::<name>`. Key order is fixed per service so
//! the rendered URL is stable; keys whose value is unset (or an empty list) are
//! left out.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::rma::{filter_eq, join};

/// Search experiments by injection structure.
pub const INJECTION_STRUCTURE_SERVICE: &str = "mouse_connectivity_injection_structure";

/// Search experiments by projection target coordinate.
pub const TARGET_SPATIAL_SERVICE: &str = "mouse_connectivity_target_spatial";

/// Search experiments by injection coordinate.
pub const INJECTION_COORDINATE_SERVICE: &str = "mouse_connectivity_injection_coordinate";

/// Search experiments by projection profile correlation.
pub const CORRELATION_SERVICE: &str = "mouse_connectivity_correlation";

/// Builder for a `service::<name>[key$eqvalue]...` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceQuery {
    name: String,
    params: Vec<String>,
}

impl ServiceQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append `[key$eqvalue]`.
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push(filter_eq(key, value));
        self
    }

    /// Append `[key$eqvalue]` only when `value` is set.
    pub fn param_opt<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Append `[key$eqv1,v2,...]` only when `values` is non-empty.
    pub fn param_list<T: Display>(self, key: &str, values: &[T]) -> Self {
        if values.is_empty() {
            self
        } else {
            self.param(key, join(values))
        }
    }

    /// Render the `q=` value.
    pub fn to_query(&self) -> String {
        format!("service::{}{}", self.name, self.params.concat())
    }
}

/// Arguments for the injection structure search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionStructureSearch {
    /// Structure acronyms or ids the injection must hit.
    pub injection_structures: Vec<String>,
    /// Only match the primary injection structure.
    pub primary_structure_only: Option<bool>,
    pub target_domain: Vec<String>,
    pub injection_domain: Vec<String>,
    pub transgenic_lines: Vec<String>,
    pub product_ids: Vec<u32>,
    pub start_row: Option<u32>,
    pub num_rows: Option<u32>,
}

impl InjectionStructureSearch {
    /// Search for injections into the given structures.
    pub fn new<S: Into<String>>(injection_structures: impl IntoIterator<Item = S>) -> Self {
        Self {
            injection_structures: injection_structures.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn to_service_query(&self) -> ServiceQuery {
        ServiceQuery::new(INJECTION_STRUCTURE_SERVICE)
            .param_opt("primary_structure_only", self.primary_structure_only)
            .param_list("injection_structures", &self.injection_structures)
            .param_list("target_domain", &self.target_domain)
            .param_list("injection_domain", &self.injection_domain)
            .param_list("transgenic_lines", &self.transgenic_lines)
            .param_list("product_ids", &self.product_ids)
            .param_opt("start_row", self.start_row)
            .param_opt("num_rows", self.num_rows)
    }
}

/// Arguments shared by the two seed-point searches (target spatial and
/// injection coordinate).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedPointSearch {
    /// Reference space coordinate in microns (anterior-posterior, dorsal-ventral, left-right).
    pub seed_point: [f64; 3],
    pub section_data_set: Option<u64>,
    pub injection_structures: Vec<String>,
    pub primary_structure_only: Option<bool>,
    pub transgenic_lines: Vec<String>,
    pub product_ids: Vec<u32>,
    pub start_row: Option<u32>,
    pub num_rows: Option<u32>,
}

/// Arguments for the target spatial search.
pub type SpatialSearch = SeedPointSearch;

/// Arguments for the injection coordinate search.
pub type InjectionCoordinateSearch = SeedPointSearch;

impl SeedPointSearch {
    pub fn new(seed_point: [f64; 3]) -> Self {
        Self {
            seed_point,
            ..Default::default()
        }
    }

    /// Render against the named service (one of the two seed-point services).
    pub fn to_service_query(&self, service: &str) -> ServiceQuery {
        ServiceQuery::new(service)
            .param("seed_point", join(&self.seed_point))
            .param_opt("section_data_set", self.section_data_set)
            .param_list("injection_structures", &self.injection_structures)
            .param_opt("primary_structure_only", self.primary_structure_only)
            .param_list("transgenic_lines", &self.transgenic_lines)
            .param_list("product_ids", &self.product_ids)
            .param_opt("start_row", self.start_row)
            .param_opt("num_rows", self.num_rows)
    }
}

/// Arguments for the correlation search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSearch {
    /// Experiment whose projection profile is the seed.
    pub row: u64,
    /// Structures to correlate over.
    pub structure: Vec<String>,
    pub domain: Vec<String>,
    pub hemisphere: Option<String>,
    pub transgenic_lines: Vec<String>,
    pub product_ids: Vec<u32>,
    pub start_row: Option<u32>,
    pub num_rows: Option<u32>,
}

impl CorrelationSearch {
    pub fn new<S: Into<String>>(row: u64, structure: impl IntoIterator<Item = S>) -> Self {
        Self {
            row,
            structure: structure.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn to_service_query(&self) -> ServiceQuery {
        ServiceQuery::new(CORRELATION_SERVICE)
            .param_list("structure", &self.structure)
            .param("row", self.row)
            .param_list("domain", &self.domain)
            .param_opt("hemisphere", self.hemisphere.as_deref())
            .param_list("transgenic_lines", &self.transgenic_lines)
            .param_list("product_ids", &self.product_ids)
            .param_opt("start_row", self.start_row)
            .param_opt("num_rows", self.num_rows)
    }
}
