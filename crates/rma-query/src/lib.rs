//! Query URL construction for the brain atlas web service.
//!
//! Supports:
//! - RMA model queries (`model::X,rma::criteria,...,rma::include,...,rma::options...`)
//! - Named service queries (`service::name[key$eqvalue]...`)
//! - Download URLs for CCF volumes and per-experiment grid data

pub mod connectivity;
pub mod rma;
pub mod service;

pub use connectivity::{
    annotation_file_name, template_file_name, IdList, QueryBuilder, StructureUnionizeQuery,
};
pub use rma::{filter_eq, filter_in, RmaQuery};
pub use service::{
    CorrelationSearch, InjectionCoordinateSearch, InjectionStructureSearch, ServiceQuery,
    SpatialSearch,
};
