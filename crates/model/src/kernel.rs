//! The squared-exponential kernel over state-action vectors.
//!
//! For inputs x, x' and bandwidths σ the kernel is
//!
//! ```text
//! k(x, x') = exp(-Σᵢ dᵢ² / (2·σᵢ²))
//! ```
//!
//! where `dᵢ = xᵢ - x'ᵢ` for every dimension except the pole angle, which
//! uses `d₂ = sin((x₂ - x'₂)/2)`. The sine makes the kernel 2π-periodic in
//! the angle, so two states on either side of the ±π seam are recognized
//! as neighbors; a plain Euclidean difference would treat them as maximally
//! far apart. (It is an approximation of true angular distance for large
//! separations, kept as-is.)

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Input dimensionality: four state components plus the action.
pub const INPUT_DIM: usize = 5;

/// Output dimensionality: the four state-delta components.
pub const OUTPUT_DIM: usize = 4;

/// Index of the pole angle within an input vector.
pub const ANGLE_INDEX: usize = 2;

/// Per-dimension kernel bandwidths.
///
/// Construction rejects zero, negative, and NaN components: a zero width
/// would divide by zero inside the kernel, so the contract violation is
/// surfaced here instead of as a NaN downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bandwidth([f64; INPUT_DIM]);

impl Bandwidth {
    /// Create a bandwidth vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BandwidthNotPositive`] if any component is
    /// not strictly positive.
    pub fn new(widths: [f64; INPUT_DIM]) -> Result<Self, ModelError> {
        for (index, &value) in widths.iter().enumerate() {
            if !(value > 0.0) {
                return Err(ModelError::BandwidthNotPositive { index, value });
            }
        }
        Ok(Self(widths))
    }

    /// The same width in every dimension.
    pub fn uniform(width: f64) -> Result<Self, ModelError> {
        Self::new([width; INPUT_DIM])
    }

    /// The widths in input order.
    pub fn as_array(&self) -> &[f64; INPUT_DIM] {
        &self.0
    }
}

/// Evaluate the kernel between two state-action vectors.
///
/// Always in (0, 1]: exactly 1 at zero distance, decaying with the scaled
/// separation. Symmetric in its arguments.
pub fn kernel(x: &[f64; INPUT_DIM], y: &[f64; INPUT_DIM], bandwidth: &Bandwidth) -> f64 {
    let sigma = bandwidth.as_array();
    let mut exponent = 0.0;
    for i in 0..INPUT_DIM {
        let d = if i == ANGLE_INDEX {
            ((x[i] - y[i]) / 2.0).sin()
        } else {
            x[i] - y[i]
        };
        exponent += d * d / (2.0 * sigma[i] * sigma[i]);
    }
    (-exponent).exp()
}

/// Evaluate the kernel between every row of `rows` and every row of
/// `centers`, producing the N×M Gram block.
///
/// # Errors
///
/// Fails fast if either matrix does not have [`INPUT_DIM`] columns.
pub fn kernel_matrix(
    rows: &DMatrix<f64>,
    centers: &DMatrix<f64>,
    bandwidth: &Bandwidth,
) -> Result<DMatrix<f64>, ModelError> {
    let row_vectors = to_rows(rows)?;
    let center_vectors = to_rows(centers)?;

    let mut gram = DMatrix::zeros(row_vectors.len(), center_vectors.len());
    for (i, x) in row_vectors.iter().enumerate() {
        for (j, c) in center_vectors.iter().enumerate() {
            gram[(i, j)] = kernel(x, c, bandwidth);
        }
    }
    Ok(gram)
}

/// Copy a matrix's rows into fixed-size vectors, checking the width once.
pub(crate) fn to_rows(matrix: &DMatrix<f64>) -> Result<Vec<[f64; INPUT_DIM]>, ModelError> {
    if matrix.ncols() != INPUT_DIM {
        return Err(ModelError::WrongColumns {
            got: matrix.ncols(),
            expected: INPUT_DIM,
        });
    }
    Ok((0..matrix.nrows())
        .map(|i| {
            let mut row = [0.0; INPUT_DIM];
            for (dst, src) in row.iter_mut().zip(matrix.row(i).iter()) {
                *dst = *src;
            }
            row
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn bandwidth() -> Bandwidth {
        Bandwidth::new([1.0, 2.0, 0.5, 3.0, 10.0]).unwrap()
    }

    #[test]
    fn test_self_kernel_is_one() {
        let x = [0.3, -2.0, 2.9, 11.0, -19.0];
        assert_eq!(kernel(&x, &x, &bandwidth()), 1.0);
    }

    #[test]
    fn test_symmetry() {
        let x = [0.1, 0.2, 0.3, 0.4, 0.5];
        let y = [-1.0, 2.0, -3.0, 4.0, -5.0];
        let bw = bandwidth();
        assert_eq!(kernel(&x, &y, &bw), kernel(&y, &x, &bw));
    }

    #[test]
    fn test_angle_periodicity() {
        // Shifting the angle coordinate by 2π leaves the kernel unchanged.
        let x = [0.0, 0.0, 0.4, 0.0, 0.0];
        let mut shifted = x;
        shifted[ANGLE_INDEX] += 2.0 * PI;
        let y = [0.0, 0.0, 0.4, 0.0, 0.0];
        let bw = bandwidth();
        assert!((kernel(&shifted, &y, &bw) - kernel(&x, &y, &bw)).abs() < 1e-12);
        assert!((kernel(&x, &y, &bw) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seam_neighbors_are_close() {
        // Just under +π and just over -π are the same physical
        // configuration; the periodic term must score them as neighbors.
        let a = [0.0, 0.0, PI - 0.01, 0.0, 0.0];
        let b = [0.0, 0.0, -PI + 0.01, 0.0, 0.0];
        assert!(kernel(&a, &b, &bandwidth()) > 0.99);
    }

    #[test]
    fn test_decays_with_distance() {
        let origin = [0.0; INPUT_DIM];
        let near = [0.1, 0.0, 0.0, 0.0, 0.0];
        let far = [3.0, 0.0, 0.0, 0.0, 0.0];
        let bw = bandwidth();
        let k_near = kernel(&origin, &near, &bw);
        let k_far = kernel(&origin, &far, &bw);
        assert!(k_near > k_far);
        assert!(k_far > 0.0);
    }

    #[test]
    fn test_bandwidth_rejects_non_positive() {
        assert!(matches!(
            Bandwidth::new([1.0, 1.0, 0.0, 1.0, 1.0]),
            Err(ModelError::BandwidthNotPositive { index: 2, .. })
        ));
        assert!(Bandwidth::uniform(-1.0).is_err());
        assert!(Bandwidth::uniform(f64::NAN).is_err());
    }

    #[test]
    fn test_kernel_matrix_shape_and_bounds() {
        let rows = DMatrix::from_row_slice(3, 5, &[0.0; 15]);
        let centers = DMatrix::from_row_slice(2, 5, &[0.1; 10]);
        let gram = kernel_matrix(&rows, &centers, &bandwidth()).unwrap();
        assert_eq!((gram.nrows(), gram.ncols()), (3, 2));
        assert!(gram.iter().all(|&k| k > 0.0 && k <= 1.0));
    }

    #[test]
    fn test_kernel_matrix_rejects_wrong_width() {
        let rows = DMatrix::from_row_slice(2, 4, &[0.0; 8]);
        let centers = DMatrix::from_row_slice(2, 5, &[0.0; 10]);
        assert!(matches!(
            kernel_matrix(&rows, &centers, &bandwidth()),
            Err(ModelError::WrongColumns { got: 4, expected: 5 })
        ));
    }
}
