//! Mouse connectivity atlas client.
//!
//! Each query method builds one URL with [`QueryBuilder`], issues a single
//! JSON message query and returns the `msg` rows. Each download method builds
//! one URL, makes sure the destination directory exists and hands both to the
//! transport.

use std::path::{Path, PathBuf};

use atlas_common::{ApiConfig, GridImage};
use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use nrrd_parser::NrrdHeader;
use num_traits::NumCast;
use rma_query::{
    CorrelationSearch, IdList, InjectionCoordinateSearch, InjectionStructureSearch, QueryBuilder,
    SpatialSearch, StructureUnionizeQuery,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::centroid::{injection_centroid, CentroidScalar};
use crate::error::{ApiError, ApiResult};
use crate::response::{RmaResponse, WellKnownFile};
use crate::transport::{HttpTransport, Transport};

/// Client for the connectivity endpoints of the atlas API.
#[derive(Debug, Clone)]
pub struct MouseConnectivityApi<T: Transport = HttpTransport> {
    transport: T,
    queries: QueryBuilder,
}

impl MouseConnectivityApi<HttpTransport> {
    /// Client over HTTP using `config`.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> MouseConnectivityApi<T> {
    /// Client over an arbitrary transport.
    pub fn with_transport(transport: T, config: &ApiConfig) -> Self {
        Self {
            transport,
            queries: QueryBuilder::new(config),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    // ------------------------------------------------------------------------
    // JSON message queries
    // ------------------------------------------------------------------------

    /// Fetch `url` and return the rows of the RMA envelope.
    pub async fn json_msg_query(&self, url: &str) -> ApiResult<Vec<Value>> {
        debug!(url = %url, "RMA query");
        let body = self.transport.json_query(url).await?;
        let rows = RmaResponse::from_value(body)?.into_rows()?;
        debug!(rows = rows.len(), "RMA query returned");
        Ok(rows)
    }

    /// Fetch `url` and deserialize each row as `R`.
    pub async fn json_msg_query_as<R: DeserializeOwned>(&self, url: &str) -> ApiResult<Vec<R>> {
        let body = self.transport.json_query(url).await?;
        RmaResponse::from_value(body)?.into_typed()
    }

    /// Non-failed projection experiments, optionally restricted to `ids`.
    pub async fn get_experiments(&self, ids: impl Into<IdList>) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.experiments_url(ids)).await
    }

    pub async fn get_manual_injection_summary(&self, experiment_id: u64) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.manual_injection_summary_url(experiment_id))
            .await
    }

    pub async fn get_experiment_detail(&self, experiment_id: u64) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.experiment_detail_url(experiment_id))
            .await
    }

    pub async fn get_projection_image_info(
        &self,
        experiment_id: u64,
        section_number: u32,
    ) -> ApiResult<Vec<Value>> {
        self.json_msg_query(
            &self
                .queries
                .projection_image_info_url(experiment_id, section_number),
        )
        .await
    }

    /// Experiments whose injection hits the given structures.
    pub async fn experiment_source_search(
        &self,
        search: &InjectionStructureSearch,
    ) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.injection_structure_search_url(search))
            .await
    }

    /// Experiments projecting to the seed point.
    pub async fn experiment_spatial_search(&self, search: &SpatialSearch) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.spatial_search_url(search))
            .await
    }

    /// Experiments injected near the seed point.
    pub async fn experiment_injection_coordinate_search(
        &self,
        search: &InjectionCoordinateSearch,
    ) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.injection_coordinate_search_url(search))
            .await
    }

    /// Experiments whose projection profile correlates with a seed experiment.
    pub async fn experiment_correlation_search(
        &self,
        search: &CorrelationSearch,
    ) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.correlation_search_url(search))
            .await
    }

    /// Projection structure unionize records.
    pub async fn get_structure_unionizes(
        &self,
        query: &StructureUnionizeQuery,
    ) -> ApiResult<Vec<Value>> {
        self.json_msg_query(&self.queries.structure_unionizes_url(query))
            .await
    }

    // ------------------------------------------------------------------------
    // Downloads
    // ------------------------------------------------------------------------

    /// Download the 25 micron reference-aligned channel volumes archive.
    ///
    /// Saves to `<data_set_id>.zip` in the working directory when
    /// `save_path` is not given.
    #[instrument(skip(self, save_path))]
    pub async fn download_reference_aligned_image_channel_volumes(
        &self,
        data_set_id: u64,
        save_path: Option<&Path>,
    ) -> ApiResult<PathBuf> {
        let url = self.queries.reference_aligned_volumes_url(data_set_id);
        let files: Vec<WellKnownFile> = self.json_msg_query_as(&url).await?;
        let file = files.into_iter().next().ok_or_else(|| {
            ApiError::NotFound(format!(
                "reference-aligned channel volumes for data set {}",
                data_set_id
            ))
        })?;

        let destination = save_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format!("{}.zip", data_set_id)));

        let download_url = self.queries.well_known_file_download_url(&file.download_link);
        self.retrieve_file(&download_url, &destination).await?;
        Ok(destination)
    }

    /// Download a per-experiment grid volume.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn download_grid_data(
        &self,
        image: GridImage,
        path: impl AsRef<Path> + Send,
        experiment_id: u64,
        resolution: u32,
    ) -> ApiResult<()> {
        let url = self.queries.grid_data_url(image, experiment_id, resolution);
        self.retrieve_file(&url, path.as_ref()).await
    }

    pub async fn download_injection_density(
        &self,
        path: impl AsRef<Path> + Send,
        experiment_id: u64,
        resolution: u32,
    ) -> ApiResult<()> {
        self.download_grid_data(GridImage::InjectionDensity, path, experiment_id, resolution)
            .await
    }

    pub async fn download_projection_density(
        &self,
        path: impl AsRef<Path> + Send,
        experiment_id: u64,
        resolution: u32,
    ) -> ApiResult<()> {
        self.download_grid_data(GridImage::ProjectionDensity, path, experiment_id, resolution)
            .await
    }

    pub async fn download_data_mask(
        &self,
        path: impl AsRef<Path> + Send,
        experiment_id: u64,
        resolution: u32,
    ) -> ApiResult<()> {
        self.download_grid_data(GridImage::DataMask, path, experiment_id, resolution)
            .await
    }

    pub async fn download_injection_fraction(
        &self,
        path: impl AsRef<Path> + Send,
        experiment_id: u64,
        resolution: u32,
    ) -> ApiResult<()> {
        self.download_grid_data(GridImage::InjectionFraction, path, experiment_id, resolution)
            .await
    }

    /// Download `file_name` from `mouse_ccf/<data_path>/`, saving to
    /// `save_path` or to `file_name` in the working directory.
    pub async fn download_volumetric_data(
        &self,
        data_path: &str,
        file_name: &str,
        save_path: Option<&Path>,
    ) -> ApiResult<PathBuf> {
        let url = self.queries.volumetric_file_url(data_path, file_name);
        let destination = save_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(file_name));
        self.retrieve_file(&url, &destination).await?;
        Ok(destination)
    }

    /// Download the annotation volume for `ccf_version` (default release when
    /// `None`) at `resolution` microns.
    pub async fn download_annotation_volume(
        &self,
        ccf_version: Option<&str>,
        resolution: u32,
        path: impl AsRef<Path> + Send,
    ) -> ApiResult<()> {
        let url = self.queries.annotation_volume_url(ccf_version, resolution);
        self.retrieve_file(&url, path.as_ref()).await
    }

    /// Download the average template volume at `resolution` microns.
    pub async fn download_template_volume(
        &self,
        resolution: u32,
        path: impl AsRef<Path> + Send,
    ) -> ApiResult<()> {
        let url = self.queries.template_volume_url(resolution);
        self.retrieve_file(&url, path.as_ref()).await
    }

    async fn retrieve_file(&self, url: &str, destination: &Path) -> ApiResult<()> {
        ensure_parent_dir(destination).await?;
        info!(url = %url, path = %destination.display(), "Retrieving file");
        self.transport.retrieve_file(url, destination).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Volumes
    // ------------------------------------------------------------------------

    /// Read a downloaded NRRD volume, casting samples to `V`.
    pub fn load_volume<V: NumCast + Copy>(
        &self,
        path: impl AsRef<Path>,
    ) -> ApiResult<(NrrdHeader, ArrayD<V>)> {
        Ok(nrrd_parser::read_nrrd(path)?)
    }

    /// Injection centroid in physical units, one coordinate per axis.
    pub fn calculate_injection_centroid<V, S1, S2, D>(
        &self,
        injection_density: &ArrayBase<S1, D>,
        injection_fraction: &ArrayBase<S2, D>,
        resolution: V,
    ) -> ApiResult<Vec<V>>
    where
        V: CentroidScalar,
        S1: Data<Elem = V>,
        S2: Data<Elem = V>,
        D: Dimension,
    {
        Ok(injection_centroid(
            injection_density,
            injection_fraction,
            resolution,
        )?)
    }
}

/// Create the parent directory of `path` if it is missing. Bare file names
/// have no parent to create.
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
