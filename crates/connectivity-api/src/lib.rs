//! Client for the mouse brain connectivity atlas.
//!
//! [`MouseConnectivityApi`] wraps the RMA query service and the volume
//! download hosts. All network access goes through a [`Transport`], which
//! defaults to [`HttpTransport`].
//!
//! ```ignore
//! use atlas_common::ApiConfig;
//! use connectivity_api::MouseConnectivityApi;
//!
//! let api = MouseConnectivityApi::new(&ApiConfig::from_env())?;
//! let experiments = api.get_experiments(None::<u64>).await?;
//! api.download_annotation_volume(None, 25, "/data/annotation_25.nrrd").await?;
//! ```

pub mod centroid;
pub mod client;
pub mod error;
pub mod response;
pub mod transport;

pub use centroid::{injection_centroid, injection_centroid_2d, CentroidError, CentroidScalar};
pub use client::{ensure_parent_dir, MouseConnectivityApi};
pub use error::{ApiError, ApiResult};
pub use response::{RmaResponse, WellKnownFile};
pub use transport::{HttpTransport, Transport};
