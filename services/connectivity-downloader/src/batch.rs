//! Batch execution of manifest downloads.

use std::path::PathBuf;

use connectivity_api::{ApiResult, MouseConnectivityApi, Transport};
use futures::stream::{self, StreamExt};
use tracing::{error, info};

use crate::config::{BatchManifest, DownloadJob};

/// Outcome counts for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Downloaded,
    Skipped,
    Failed(PathBuf, String),
}

/// Run every job in `manifest`, at most `max_concurrent` at a time. A failed
/// job is recorded and the rest still run.
pub async fn run_batch<T: Transport>(
    api: &MouseConnectivityApi<T>,
    manifest: &BatchManifest,
) -> BatchSummary {
    let jobs = manifest.jobs();
    info!(
        jobs = jobs.len(),
        max_concurrent = manifest.max_concurrent,
        output_dir = %manifest.output_dir.display(),
        "Starting batch"
    );

    let outcomes = stream::iter(jobs)
        .map(|job| async move {
            if manifest.skip_existing && job.path().exists() {
                info!(path = %job.path().display(), "Already present, skipping");
                return Outcome::Skipped;
            }

            match run_job(api, &job).await {
                Ok(()) => Outcome::Downloaded,
                Err(e) => {
                    error!(path = %job.path().display(), error = %e, "Download failed");
                    Outcome::Failed(job.path().to_path_buf(), e.to_string())
                }
            }
        })
        .buffer_unordered(manifest.max_concurrent)
        .collect::<Vec<_>>()
        .await;

    let mut summary = BatchSummary::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Downloaded => summary.downloaded += 1,
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Failed(path, message) => summary.failed.push((path, message)),
        }
    }

    info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        "Batch complete"
    );
    summary
}

async fn run_job<T: Transport>(api: &MouseConnectivityApi<T>, job: &DownloadJob) -> ApiResult<()> {
    match job {
        DownloadJob::Grid {
            image,
            experiment_id,
            resolution,
            path,
        } => {
            api.download_grid_data(*image, path, *experiment_id, *resolution)
                .await
        }
        DownloadJob::ReferenceAligned {
            experiment_id,
            path,
        } => api
            .download_reference_aligned_image_channel_volumes(*experiment_id, Some(path.as_path()))
            .await
            .map(|_| ()),
        DownloadJob::Annotation {
            ccf_version,
            resolution,
            path,
        } => {
            api.download_annotation_volume(Some(ccf_version.as_str()), *resolution, path)
                .await
        }
        DownloadJob::Template { resolution, path } => {
            api.download_template_volume(*resolution, path).await
        }
    }
}
