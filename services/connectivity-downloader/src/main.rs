//! Mouse connectivity atlas command-line client.
//!
//! Runs single queries (results printed as JSON), single downloads, injection
//! centroid calculation on downloaded volumes, and batch downloads described
//! by a YAML manifest.

mod batch;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use atlas_common::{ApiConfig, GridImage};
use clap::{Parser, Subcommand};
use connectivity_api::MouseConnectivityApi;
use rma_query::{
    CorrelationSearch, InjectionCoordinateSearch, InjectionStructureSearch, SpatialSearch,
    StructureUnionizeQuery,
};
use serde_json::Value;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::BatchManifest;

#[derive(Parser, Debug)]
#[command(name = "connectivity-downloader")]
#[command(about = "Query the mouse connectivity atlas and download its volumes")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// API host (query service and grid data); overrides BRAIN_MAP_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Release archive host (CCF volumes); overrides BRAIN_MAP_DOWNLOAD_URL
    #[arg(long, global = true)]
    download_url: Option<String>,

    /// Per-request timeout in seconds; overrides BRAIN_MAP_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List non-failed projection experiments
    Experiments {
        /// Restrict to these experiment ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
    },

    /// Injection summary for one experiment
    Summary { experiment_id: u64 },

    /// Stereotaxic injection detail and section images for one experiment
    Detail { experiment_id: u64 },

    /// Image metadata for one section of an experiment
    ImageInfo {
        experiment_id: u64,
        section_number: u32,
    },

    /// Projection structure unionizes
    Unionizes {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u64>,
        #[arg(long)]
        is_injection: Option<bool>,
        /// Hemisphere ids (only the first is sent)
        #[arg(long, value_delimiter = ',')]
        hemisphere_ids: Vec<u32>,
        #[arg(long)]
        include: Option<String>,
    },

    /// Experiments injected into the given structures
    SourceSearch {
        #[arg(long, value_delimiter = ',', required = true)]
        structures: Vec<String>,
        #[arg(long)]
        primary_structure_only: Option<bool>,
    },

    /// Experiments projecting to a seed point
    SpatialSearch {
        #[arg(num_args = 3, required = true)]
        seed_point: Vec<f64>,
    },

    /// Experiments injected near a seed point
    InjectionCoordinateSearch {
        #[arg(num_args = 3, required = true)]
        seed_point: Vec<f64>,
    },

    /// Experiments whose projections correlate with a seed experiment
    CorrelationSearch {
        #[arg(long)]
        row: u64,
        #[arg(long, value_delimiter = ',', required = true)]
        structures: Vec<String>,
        #[arg(long)]
        hemisphere: Option<String>,
    },

    /// Download one per-experiment grid volume
    Grid {
        experiment_id: u64,
        /// injection_density, projection_density, data_mask or injection_fraction
        #[arg(long, default_value = "projection_density")]
        image: GridImage,
        #[arg(long, default_value = "25")]
        resolution: u32,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Download an annotation volume
    Annotation {
        /// Annotation release path, e.g. annotation/ccf_2015
        #[arg(long)]
        ccf_version: Option<String>,
        #[arg(long, default_value = "25")]
        resolution: u32,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Download the average template volume
    Template {
        #[arg(long, default_value = "25")]
        resolution: u32,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Download an experiment's reference-aligned channel volumes archive
    ReferenceAligned {
        experiment_id: u64,
        /// Defaults to <experiment_id>.zip in the working directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Injection centroid from downloaded density and fraction volumes
    Centroid {
        #[arg(long)]
        density: PathBuf,
        #[arg(long)]
        fraction: PathBuf,
        /// Voxel size in microns
        #[arg(long, default_value = "25")]
        resolution: f64,
    },

    /// Run every download listed in a YAML manifest
    Batch { manifest: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let api_config = api_config(&args);
    info!(
        api_url = %api_config.api_url,
        download_url = %api_config.download_url,
        "Starting connectivity client"
    );

    let api = MouseConnectivityApi::new(&api_config).context("Failed to create API client")?;

    match args.command {
        Command::Experiments { ids } => print_rows(api.get_experiments(ids).await?)?,
        Command::Summary { experiment_id } => {
            print_rows(api.get_manual_injection_summary(experiment_id).await?)?
        }
        Command::Detail { experiment_id } => {
            print_rows(api.get_experiment_detail(experiment_id).await?)?
        }
        Command::ImageInfo {
            experiment_id,
            section_number,
        } => print_rows(
            api.get_projection_image_info(experiment_id, section_number)
                .await?,
        )?,
        Command::Unionizes {
            ids,
            is_injection,
            hemisphere_ids,
            include,
        } => {
            let mut query = StructureUnionizeQuery::new(ids);
            if let Some(is_injection) = is_injection {
                query = query.is_injection(is_injection);
            }
            if !hemisphere_ids.is_empty() {
                query = query.hemisphere_ids(hemisphere_ids);
            }
            if let Some(include) = include {
                query = query.include(include);
            }
            print_rows(api.get_structure_unionizes(&query).await?)?
        }
        Command::SourceSearch {
            structures,
            primary_structure_only,
        } => {
            let mut search = InjectionStructureSearch::new(structures);
            search.primary_structure_only = primary_structure_only;
            print_rows(api.experiment_source_search(&search).await?)?
        }
        Command::SpatialSearch { seed_point } => {
            let search = SpatialSearch::new(seed(&seed_point)?);
            print_rows(api.experiment_spatial_search(&search).await?)?
        }
        Command::InjectionCoordinateSearch { seed_point } => {
            let search = InjectionCoordinateSearch::new(seed(&seed_point)?);
            print_rows(api.experiment_injection_coordinate_search(&search).await?)?
        }
        Command::CorrelationSearch {
            row,
            structures,
            hemisphere,
        } => {
            let mut search = CorrelationSearch::new(row, structures);
            search.hemisphere = hemisphere;
            print_rows(api.experiment_correlation_search(&search).await?)?
        }
        Command::Grid {
            experiment_id,
            image,
            resolution,
            output,
        } => {
            api.download_grid_data(image, &output, experiment_id, resolution)
                .await?;
            info!(path = %output.display(), "Saved grid volume");
        }
        Command::Annotation {
            ccf_version,
            resolution,
            output,
        } => {
            api.download_annotation_volume(ccf_version.as_deref(), resolution, &output)
                .await?;
            info!(path = %output.display(), "Saved annotation volume");
        }
        Command::Template { resolution, output } => {
            api.download_template_volume(resolution, &output).await?;
            info!(path = %output.display(), "Saved template volume");
        }
        Command::ReferenceAligned {
            experiment_id,
            output,
        } => {
            let saved = api
                .download_reference_aligned_image_channel_volumes(experiment_id, output.as_deref())
                .await?;
            info!(path = %saved.display(), "Saved reference-aligned volumes");
        }
        Command::Centroid {
            density,
            fraction,
            resolution,
        } => {
            let (_, density) = api
                .load_volume::<f64>(&density)
                .with_context(|| format!("Failed to read {}", density.display()))?;
            let (_, fraction) = api
                .load_volume::<f64>(&fraction)
                .with_context(|| format!("Failed to read {}", fraction.display()))?;
            let centroid = api.calculate_injection_centroid(&density, &fraction, resolution)?;
            println!("{}", serde_json::to_string(&centroid)?);
        }
        Command::Batch { manifest } => {
            let manifest = BatchManifest::load(&manifest)?;
            let summary = batch::run_batch(&api, &manifest).await;
            if !summary.is_success() {
                for (path, message) in &summary.failed {
                    eprintln!("{}: {}", path.display(), message);
                }
                bail!("{} of the batch downloads failed", summary.failed.len());
            }
        }
    }

    Ok(())
}

/// Environment settings with command-line overrides applied on top.
fn api_config(args: &Args) -> ApiConfig {
    let mut config = ApiConfig::from_env();
    if let Some(url) = &args.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = &args.download_url {
        config.download_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    config
}

fn seed(values: &[f64]) -> Result<[f64; 3]> {
    match values {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => bail!("seed point needs exactly three coordinates"),
    }
}

fn print_rows(rows: Vec<Value>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
