//! Batch manifest loading.
//!
//! A manifest names the experiments and reference volumes to fetch in one run:
//!
//! ```yaml
//! output_dir: /data/connectivity
//! resolution: 25
//! experiments: [126862385, 112670853]
//! images: [injection_density, projection_density]
//! reference_aligned: false
//! annotation:
//!   ccf_version: annotation/ccf_2016
//! template: {}
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use atlas_common::ccf;
use atlas_common::GridImage;
use rma_query::{annotation_file_name, template_file_name};
use serde::Deserialize;
use tracing::{debug, warn};

/// Root of a batch manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchManifest {
    /// Directory every download is written under.
    pub output_dir: PathBuf,

    /// Voxel size in microns, used unless a section overrides it.
    #[serde(default = "default_resolution")]
    pub resolution: u32,

    /// Downloads in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default)]
    pub experiments: Vec<u64>,

    /// Grid volumes fetched per experiment.
    #[serde(default = "default_images")]
    pub images: Vec<GridImage>,

    /// Also fetch each experiment's reference-aligned channel volumes archive.
    #[serde(default)]
    pub reference_aligned: bool,

    /// Leave files that already exist in place.
    #[serde(default = "default_skip_existing")]
    pub skip_existing: bool,

    #[serde(default)]
    pub annotation: Option<AnnotationSection>,

    #[serde(default)]
    pub template: Option<TemplateSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationSection {
    /// Annotation release path, e.g. `annotation/ccf_2015`.
    #[serde(default)]
    pub ccf_version: Option<String>,
    #[serde(default)]
    pub resolution: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSection {
    #[serde(default)]
    pub resolution: Option<u32>,
}

fn default_resolution() -> u32 {
    ccf::VOXEL_RESOLUTION_25_MICRONS
}

fn default_max_concurrent() -> usize {
    4
}

fn default_skip_existing() -> bool {
    true
}

fn default_images() -> Vec<GridImage> {
    GridImage::ALL.to_vec()
}

/// One file to fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadJob {
    Grid {
        image: GridImage,
        experiment_id: u64,
        resolution: u32,
        path: PathBuf,
    },
    ReferenceAligned {
        experiment_id: u64,
        path: PathBuf,
    },
    Annotation {
        ccf_version: String,
        resolution: u32,
        path: PathBuf,
    },
    Template {
        resolution: u32,
        path: PathBuf,
    },
}

impl DownloadJob {
    pub fn path(&self) -> &Path {
        match self {
            DownloadJob::Grid { path, .. }
            | DownloadJob::ReferenceAligned { path, .. }
            | DownloadJob::Annotation { path, .. }
            | DownloadJob::Template { path, .. } => path,
        }
    }
}

impl BatchManifest {
    /// Load a manifest from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        debug!(
            path = %path.display(),
            experiments = manifest.experiments.len(),
            "Loaded batch manifest"
        );
        Ok(manifest)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let manifest: BatchManifest = serde_yaml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            bail!("max_concurrent must be at least 1");
        }

        for resolution in self.resolutions() {
            if !ccf::is_published_resolution(resolution) {
                warn!(resolution, "Resolution is not one of the published voxel sizes");
            }
        }

        Ok(())
    }

    fn resolutions(&self) -> Vec<u32> {
        let mut resolutions = vec![self.resolution];
        if let Some(r) = self.annotation.as_ref().and_then(|a| a.resolution) {
            resolutions.push(r);
        }
        if let Some(r) = self.template.as_ref().and_then(|t| t.resolution) {
            resolutions.push(r);
        }
        resolutions
    }

    /// Expand the manifest into individual downloads, experiments first.
    pub fn jobs(&self) -> Vec<DownloadJob> {
        let mut jobs = Vec::new();

        for &experiment_id in &self.experiments {
            let experiment_dir = self
                .output_dir
                .join("experiments")
                .join(experiment_id.to_string());

            for &image in &self.images {
                jobs.push(DownloadJob::Grid {
                    image,
                    experiment_id,
                    resolution: self.resolution,
                    path: experiment_dir.join(format!("{}_{}.nrrd", image, self.resolution)),
                });
            }

            if self.reference_aligned {
                jobs.push(DownloadJob::ReferenceAligned {
                    experiment_id,
                    path: experiment_dir.join(format!("{}.zip", experiment_id)),
                });
            }
        }

        if let Some(annotation) = &self.annotation {
            let ccf_version = annotation
                .ccf_version
                .clone()
                .unwrap_or_else(|| ccf::CCF_VERSION_DEFAULT.to_string());
            let resolution = annotation.resolution.unwrap_or(self.resolution);
            jobs.push(DownloadJob::Annotation {
                path: self
                    .output_dir
                    .join(&ccf_version)
                    .join(annotation_file_name(resolution)),
                ccf_version,
                resolution,
            });
        }

        if let Some(template) = &self.template {
            let resolution = template.resolution.unwrap_or(self.resolution);
            jobs.push(DownloadJob::Template {
                resolution,
                path: self
                    .output_dir
                    .join(ccf::AVERAGE_TEMPLATE)
                    .join(template_file_name(resolution)),
            });
        }

        jobs
    }
}
