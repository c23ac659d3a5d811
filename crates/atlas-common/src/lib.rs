//! Common types and constants shared across the mouse connectivity atlas crates.

pub mod ccf;
pub mod config;
pub mod error;
pub mod image;

pub use config::ApiConfig;
pub use error::{TransferError, TransferResult};
pub use image::GridImage;
