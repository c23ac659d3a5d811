//! URL builders for the mouse connectivity endpoints.
//!
//! Every function here is a pure string builder; nothing is validated and
//! nothing is escaped. The rendered URLs must match the service grammar byte
//! for byte, so clause order is part of the contract.

use atlas_common::ccf;
use atlas_common::{ApiConfig, GridImage};
use serde::{Deserialize, Serialize};

use crate::rma::{filter_eq, filter_in, RmaQuery};
use crate::service::{
    CorrelationSearch, InjectionCoordinateSearch, InjectionStructureSearch, SpatialSearch,
    INJECTION_COORDINATE_SERVICE, TARGET_SPATIAL_SERVICE,
};

/// Fields returned by the manual injection summary query.
pub const MANUAL_INJECTION_SUMMARY_FIELDS: &[&str] = &[
    "id",
    "failed",
    "storage_directory",
    "red_lower",
    "red_upper",
    "green_lower",
    "green_upper",
    "blue_lower",
    "blue_upper",
    "products.id",
    "specimen_id",
    "structure_id",
    "reference_space_id",
    "primary_injection_structure_id",
    "registration_point",
    "coordinates_ap",
    "coordinates_dv",
    "coordinates_ml",
    "angle",
    "sex",
    "strain",
    "injection_materials",
    "acronym",
    "structures.name",
    "days",
    "transgenic_mice.name",
    "transgenic_lines.name",
    "transgenic_lines.description",
    "transgenic_lines.id",
    "donors.id",
];

/// Well-known file type holding the 25 micron reference-aligned channel volumes.
pub const REFERENCE_ALIGNED_FILE_TYPE: &str = "ImagesResampledTo25MicronARA";

/// Zero or more experiment ids. A single id converts to a one-element list and
/// `None` to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(pub Vec<u64>);

impl IdList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl From<u64> for IdList {
    fn from(id: u64) -> Self {
        IdList(vec![id])
    }
}

impl From<Vec<u64>> for IdList {
    fn from(ids: Vec<u64>) -> Self {
        IdList(ids)
    }
}

impl From<&[u64]> for IdList {
    fn from(ids: &[u64]) -> Self {
        IdList(ids.to_vec())
    }
}

impl<const N: usize> From<[u64; N]> for IdList {
    fn from(ids: [u64; N]) -> Self {
        IdList(ids.to_vec())
    }
}

impl<T: Into<IdList>> From<Option<T>> for IdList {
    fn from(ids: Option<T>) -> Self {
        ids.map(Into::into).unwrap_or_default()
    }
}

/// Filters for the projection structure unionize query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureUnionizeQuery {
    pub experiment_ids: Vec<u64>,
    /// Restrict to injection (`true`) or projection (`false`) records.
    pub is_injection: Option<bool>,
    /// Hemisphere filter; only the first entry reaches the query.
    pub hemisphere_ids: Option<Vec<String>>,
    /// Related models to include with each record (e.g. `structure`).
    pub include: Option<String>,
}

impl StructureUnionizeQuery {
    pub fn new(experiment_ids: impl Into<IdList>) -> Self {
        Self {
            experiment_ids: experiment_ids.into().0,
            ..Default::default()
        }
    }

    pub fn is_injection(mut self, is_injection: bool) -> Self {
        self.is_injection = Some(is_injection);
        self
    }

    pub fn hemisphere_ids<T: ToString>(mut self, ids: impl IntoIterator<Item = T>) -> Self {
        self.hemisphere_ids = Some(ids.into_iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }
}

/// Builds query and download URLs against a configured pair of hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    api_url: String,
    query_endpoint: String,
    download_url: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(&ApiConfig::default())
    }
}

impl QueryBuilder {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            query_endpoint: config.query_endpoint(),
            download_url: config.download_url.clone(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Wrap a rendered `q=` value in the query endpoint URL.
    pub fn query_url(&self, query: &str) -> String {
        format!("{}?q={}", self.query_endpoint, query)
    }

    /// Non-failed projection experiments, optionally restricted to `ids`.
    pub fn experiments_url(&self, ids: impl Into<IdList>) -> String {
        let ids = ids.into();
        let mut query = RmaQuery::model("SectionDataSet")
            .criteria(filter_eq("failed", false))
            .criteria(format!(
                "products{}",
                filter_in("id", &ccf::CONNECTIVITY_PRODUCT_IDS)
            ));

        if !ids.is_empty() {
            query = query.criteria(filter_in("id", ids.as_slice()));
        }

        self.query_url(&query.to_query())
    }

    /// Specimen, injection and channel-threshold summary for one experiment.
    pub fn manual_injection_summary_url(&self, experiment_id: u64) -> String {
        let query = RmaQuery::model("SectionDataSet")
            .criteria(filter_in("id", &[experiment_id]))
            .include("specimen(donor(transgenic_mouse(transgenic_lines)),injections(structure,age))")
            .include("equalization")
            .include("products")
            .option("only", MANUAL_INJECTION_SUMMARY_FIELDS.join(","));

        self.query_url(&query.to_query())
    }

    /// Stereotaxic injection detail and the ordered list of section images.
    pub fn experiment_detail_url(&self, experiment_id: u64) -> String {
        let query = RmaQuery::model("SectionDataSet")
            .criteria(filter_eq("id", experiment_id))
            .include(
                "specimen(stereotaxic_injections(primary_injection_structure,structures,\
                 stereotaxic_injection_coordinates))",
            )
            .include("equalization")
            .include("sub_images")
            .option("order", "'sub_images.section_number$asc'");

        self.query_url(&query.to_query())
    }

    /// Equalization and the sub-image metadata for one section.
    pub fn projection_image_info_url(&self, experiment_id: u64, section_number: u32) -> String {
        let query = RmaQuery::model("SectionDataSet")
            .criteria(filter_eq("id", experiment_id))
            .include("equalization")
            .include(format!(
                "sub_images{}",
                filter_eq("section_number", section_number)
            ));

        self.query_url(&query.to_query())
    }

    /// Well-known file record for the reference-aligned channel volumes.
    pub fn reference_aligned_volumes_url(&self, attachable_id: u64) -> String {
        let query = RmaQuery::model("WellKnownFile").criteria(format!(
            "well_known_file_type{}{}",
            filter_eq("name", format!("'{}'", REFERENCE_ALIGNED_FILE_TYPE)),
            filter_eq("attachable_id", attachable_id)
        ));

        self.query_url(&query.to_query())
    }

    pub fn injection_structure_search_url(&self, search: &InjectionStructureSearch) -> String {
        self.query_url(&search.to_service_query().to_query())
    }

    pub fn spatial_search_url(&self, search: &SpatialSearch) -> String {
        self.query_url(&search.to_service_query(TARGET_SPATIAL_SERVICE).to_query())
    }

    pub fn injection_coordinate_search_url(&self, search: &InjectionCoordinateSearch) -> String {
        self.query_url(
            &search
                .to_service_query(INJECTION_COORDINATE_SERVICE)
                .to_query(),
        )
    }

    pub fn correlation_search_url(&self, search: &CorrelationSearch) -> String {
        self.query_url(&search.to_service_query().to_query())
    }

    /// Per-structure projection statistics for a set of experiments.
    ///
    /// Only the first hemisphere id is sent even when several are given.
    pub fn structure_unionizes_url(&self, unionizes: &StructureUnionizeQuery) -> String {
        let mut filters = filter_in("section_data_set_id", &unionizes.experiment_ids);

        if let Some(is_injection) = unionizes.is_injection {
            filters.push_str(&filter_eq("is_injection", is_injection));
        }

        if let Some(first) = unionizes.hemisphere_ids.as_ref().and_then(|ids| ids.first()) {
            filters.push_str(&filter_in("hemisphere_id", std::slice::from_ref(first)));
        }

        let mut query = RmaQuery::model("ProjectionStructureUnionize").criteria(filters);

        if let Some(include) = &unionizes.include {
            query = query.include(include.as_str());
        }

        let query = query.option("num_rows", "'all'").option("count", false);

        self.query_url(&query.to_query())
    }

    /// File `file_name` under `mouse_ccf/<data_path>/` on the download host.
    pub fn volumetric_file_url(&self, data_path: &str, file_name: &str) -> String {
        format!("{}/mouse_ccf/{}/{}", self.download_url, data_path, file_name)
    }

    /// Annotation volume at `resolution` microns under `data_path`.
    pub fn volumetric_data_url(&self, data_path: &str, resolution: u32) -> String {
        self.volumetric_file_url(data_path, &annotation_file_name(resolution))
    }

    /// Annotation volume for `ccf_version`, or the default release when unset.
    pub fn annotation_volume_url(&self, ccf_version: Option<&str>, resolution: u32) -> String {
        self.volumetric_data_url(
            ccf_version.unwrap_or(ccf::CCF_VERSION_DEFAULT),
            resolution,
        )
    }

    /// Average template volume at `resolution` microns.
    pub fn template_volume_url(&self, resolution: u32) -> String {
        self.volumetric_file_url(ccf::AVERAGE_TEMPLATE, &template_file_name(resolution))
    }

    /// Per-experiment grid volume of the given kind.
    pub fn grid_data_url(&self, image: GridImage, experiment_id: u64, resolution: u32) -> String {
        format!(
            "{}/grid_data/download_file/{}?image={}&resolution={}",
            self.api_url, experiment_id, image, resolution
        )
    }

    /// Absolute URL for a `download_link` returned by a well-known file query.
    pub fn well_known_file_download_url(&self, download_link: &str) -> String {
        format!("{}{}", self.api_url, download_link)
    }
}

/// `annotation_<resolution>.nrrd`
pub fn annotation_file_name(resolution: u32) -> String {
    format!("annotation_{}.nrrd", resolution)
}

/// `average_template_<resolution>.nrrd`
pub fn template_file_name(resolution: u32) -> String {
    format!("average_template_{}.nrrd", resolution)
}
