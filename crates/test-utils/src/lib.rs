//! Shared test utilities for the mouse connectivity workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Scratch directory helpers
//! - Synthetic NRRD volume generators
//! - Canned RMA responses
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, raw_u32_le_nrrd};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Assert two coordinate lists (centroids, seed points) agree to within
/// `epsilon` on every axis.
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!(vec![37.5, 37.5], [37.5000001, 37.5], 1e-6);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let actual: Vec<f64> = $actual.iter().map(|&v| v as f64).collect();
        let expected: Vec<f64> = $expected.iter().map(|&v| v as f64).collect();
        let epsilon: f64 = $epsilon as f64;
        assert_eq!(
            actual.len(),
            expected.len(),
            "axis count differs: {:?} vs {:?}",
            actual,
            expected
        );
        for (axis, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            if (a - e).abs() > epsilon {
                panic!(
                    "coordinates differ on axis {}: actual {:?}, expected {:?} (epsilon {:?})",
                    axis, actual, expected, epsilon
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_coords_within_epsilon() {
        assert_coords_approx_eq!(vec![37.5001, 12.0], [37.5, 12.0], 0.001);
        assert_coords_approx_eq!([1.0f32, 2.0, 3.0], vec![1.0, 2.0, 3.0], 0.0);
    }

    #[test]
    #[should_panic(expected = "coordinates differ on axis 1")]
    fn test_coords_outside_epsilon() {
        assert_coords_approx_eq!(vec![1.0, 2.5], vec![1.0, 2.0], 0.001);
    }

    #[test]
    #[should_panic(expected = "axis count differs")]
    fn test_coords_axis_count() {
        assert_coords_approx_eq!(vec![1.0, 2.0, 3.0], vec![1.0, 2.0], 0.001);
    }
}
