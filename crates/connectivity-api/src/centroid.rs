//! Injection centroid calculation.
//!
//! The centroid is the mean voxel index weighted by `density * fraction`,
//! taken over voxels whose injection fraction is non-zero, then scaled by the
//! voxel size. Weights and moments are summed in `f64`. The mean index is then
//! converted to the element type, so integer volumes truncate it and
//! floating-point volumes keep the fractional index.

use ndarray::{ArrayBase, Data, Dimension, Ix2};
use num_traits::{Num, NumCast, ToPrimitive};
use thiserror::Error;

/// Errors from centroid calculation.
#[derive(Debug, Error, PartialEq)]
pub enum CentroidError {
    #[error("density shape {density:?} does not match fraction shape {fraction:?}")]
    ShapeMismatch {
        density: Vec<usize>,
        fraction: Vec<usize>,
    },

    /// Weights sum to zero (or less), so the mean index is undefined.
    #[error("injection weights sum to zero; centroid is undefined")]
    DegenerateWeights,

    #[error("centroid coordinate {0} is not representable in the element type")]
    Unrepresentable(f64),
}

/// Result type for centroid operations.
pub type CentroidResult<T> = Result<T, CentroidError>;

/// Element types the centroid can be computed in.
pub trait CentroidScalar: Num + NumCast + Copy + PartialOrd {}

impl<T: Num + NumCast + Copy + PartialOrd> CentroidScalar for T {}

/// Centroid of an N-dimensional injection, one coordinate per axis.
pub fn injection_centroid<T, S1, S2, D>(
    density: &ArrayBase<S1, D>,
    fraction: &ArrayBase<S2, D>,
    resolution: T,
) -> CentroidResult<Vec<T>>
where
    T: CentroidScalar,
    S1: Data<Elem = T>,
    S2: Data<Elem = T>,
    D: Dimension,
{
    if density.shape() != fraction.shape() {
        return Err(CentroidError::ShapeMismatch {
            density: density.shape().to_vec(),
            fraction: fraction.shape().to_vec(),
        });
    }

    let density = density.view().into_dyn();
    let fraction = fraction.view().into_dyn();

    let mut total = 0.0f64;
    let mut moments = vec![0.0f64; density.ndim()];

    for ((index, &d), &f) in density.indexed_iter().zip(fraction.iter()) {
        if f == T::zero() {
            continue;
        }

        let weight = as_f64(d)? * as_f64(f)?;
        total += weight;

        for (axis, &i) in index.slice().iter().enumerate() {
            moments[axis] += i as f64 * weight;
        }
    }

    if !(total > 0.0) {
        return Err(CentroidError::DegenerateWeights);
    }

    let resolution = as_f64(resolution)?;
    moments
        .into_iter()
        .map(|moment| {
            let mean: T = from_f64(moment / total)?;
            from_f64(as_f64(mean)? * resolution)
        })
        .collect()
}

fn as_f64<T: ToPrimitive>(value: T) -> CentroidResult<f64> {
    value.to_f64().ok_or(CentroidError::Unrepresentable(f64::NAN))
}

fn from_f64<T: NumCast>(value: f64) -> CentroidResult<T> {
    <T as NumCast>::from(value).ok_or(CentroidError::Unrepresentable(value))
}

/// Centroid of a 2D injection as `(axis 0, axis 1)` in physical units.
pub fn injection_centroid_2d<T, S1, S2>(
    density: &ArrayBase<S1, Ix2>,
    fraction: &ArrayBase<S2, Ix2>,
    resolution: T,
) -> CentroidResult<(T, T)>
where
    T: CentroidScalar,
    S1: Data<Elem = T>,
    S2: Data<Elem = T>,
{
    let centroid = injection_centroid(density, fraction, resolution)?;
    Ok((centroid[0], centroid[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    #[test]
    fn test_uniform_integer_field() {
        let density = Array2::<i64>::ones((4, 4));
        let fraction = Array2::<i64>::ones((4, 4));
        assert_eq!(injection_centroid_2d(&density, &fraction, 25).unwrap(), (25, 25));
    }

    #[test]
    fn test_uniform_float_field() {
        let density = Array2::<f64>::ones((4, 4));
        let fraction = Array2::<f64>::ones((4, 4));
        assert_eq!(
            injection_centroid_2d(&density, &fraction, 25.0).unwrap(),
            (37.5, 37.5)
        );
    }

    #[test]
    fn test_single_voxel() {
        let mut density = Array2::<f64>::zeros((5, 5));
        density[[3, 1]] = 2.0;
        let fraction = Array2::<f64>::ones((5, 5));
        assert_eq!(
            injection_centroid_2d(&density, &fraction, 10.0).unwrap(),
            (30.0, 10.0)
        );
    }

    #[test]
    fn test_fraction_masks_voxels() {
        let density = array![[1.0, 1.0], [1.0, 1.0]];
        let fraction = array![[0.0, 0.0], [0.0, 0.5]];
        assert_eq!(
            injection_centroid_2d(&density, &fraction, 1.0).unwrap(),
            (1.0, 1.0)
        );
    }

    #[test]
    fn test_zero_weights() {
        let density = Array2::<f64>::ones((3, 3));
        let fraction = Array2::<f64>::zeros((3, 3));
        assert_eq!(
            injection_centroid_2d(&density, &fraction, 25.0),
            Err(CentroidError::DegenerateWeights)
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let density = Array2::<f64>::ones((3, 3));
        let fraction = Array2::<f64>::ones((3, 4));
        assert!(matches!(
            injection_centroid_2d(&density, &fraction, 25.0),
            Err(CentroidError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_large_integer_field() {
        let density = Array2::<i32>::from_elem((200, 200), 1000);
        let fraction = Array2::<i32>::ones((200, 200));
        // Mean index 99.5 truncates to 99.
        assert_eq!(
            injection_centroid_2d(&density, &fraction, 25).unwrap(),
            (99 * 25, 99 * 25)
        );
    }

    #[test]
    fn test_narrow_integer_type() {
        let ones = Array2::<u8>::ones((16, 16));
        assert_eq!(injection_centroid_2d(&ones, &ones, 25u8).unwrap(), (175, 175));
    }

    #[test]
    fn test_coordinate_outside_element_type() {
        let ones = Array2::<u8>::ones((64, 64));
        assert!(matches!(
            injection_centroid_2d(&ones, &ones, 25u8),
            Err(CentroidError::Unrepresentable(_))
        ));
    }

    #[test]
    fn test_three_dimensional() {
        let mut density = Array3::<f32>::zeros((2, 3, 4));
        density[[1, 2, 3]] = 1.0;
        density[[1, 0, 1]] = 1.0;
        let fraction = Array3::<f32>::ones((2, 3, 4));
        assert_eq!(
            injection_centroid(&density, &fraction, 100.0).unwrap(),
            vec![100.0, 100.0, 200.0]
        );
    }
}
