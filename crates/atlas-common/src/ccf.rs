//! Common Coordinate Framework (CCF) releases and volume resolutions.
//!
//! Data paths are relative to `mouse_ccf/` on the download host. Annotation
//! volumes live under a versioned path (e.g. `annotation/ccf_2016`), the
//! template and Nissl volumes under an unversioned one.

/// 2015 release of the annotation volume.
pub const CCF_2015: &str = "annotation/ccf_2015";

/// 2016 release of the annotation volume.
pub const CCF_2016: &str = "annotation/ccf_2016";

/// Annotation version used when the caller does not name one.
pub const CCF_VERSION_DEFAULT: &str = CCF_2016;

/// Average template brain.
pub const AVERAGE_TEMPLATE: &str = "average_template";

/// Nissl-stained reference volume.
pub const ARA_NISSL: &str = "ara_nissl";

/// Legacy 2011 adult mouse annotation.
pub const MOUSE_2011: &str = "annotation/mouse_2011";

/// Legacy 2012 developing mouse annotation.
pub const DEVMOUSE_2012: &str = "annotation/devmouse_2012";

/// Annotation releases that can be passed as a CCF version.
pub const CCF_VERSIONS: [&str; 2] = [CCF_2015, CCF_2016];

/// Every data path published under `mouse_ccf/`.
pub const DATA_PATHS: [&str; 6] = [
    AVERAGE_TEMPLATE,
    ARA_NISSL,
    MOUSE_2011,
    DEVMOUSE_2012,
    CCF_2015,
    CCF_2016,
];

/// Isotropic voxel sizes in microns.
pub const VOXEL_RESOLUTION_10_MICRONS: u32 = 10;
pub const VOXEL_RESOLUTION_25_MICRONS: u32 = 25;
pub const VOXEL_RESOLUTION_50_MICRONS: u32 = 50;
pub const VOXEL_RESOLUTION_100_MICRONS: u32 = 100;

/// Resolutions the download host publishes volumes for.
pub const RESOLUTIONS: [u32; 4] = [
    VOXEL_RESOLUTION_10_MICRONS,
    VOXEL_RESOLUTION_25_MICRONS,
    VOXEL_RESOLUTION_50_MICRONS,
    VOXEL_RESOLUTION_100_MICRONS,
];

/// Product ids for the projection experiments (mouse connectivity and its
/// transgenic variant).
pub const CONNECTIVITY_PRODUCT_IDS: [u32; 2] = [5, 31];

/// Returns true if `resolution` is one of the published voxel sizes.
pub fn is_published_resolution(resolution: u32) -> bool {
    RESOLUTIONS.contains(&resolution)
}
