//! Kernel-ridge regression over sampled transitions.
//!
//! Training draws a basis set from the samples (uniformly, with
//! replacement), builds the rectangular and square Gram blocks, and solves
//! the regularized normal equations
//!
//! ```text
//! (K_nmᵀ·K_nm + λ·K_mm) · α = K_nmᵀ·Y
//! ```
//!
//! by SVD least squares. The SVD route matters: with-replacement sampling
//! can duplicate basis points and leave the left-hand side rank-deficient,
//! and a minimum-norm solution is the correct degradation there — a direct
//! inverse would fail outright.

use nalgebra::DMatrix;
use rand::Rng;

use crate::error::ModelError;
use crate::kernel::{kernel, kernel_matrix, to_rows, Bandwidth, INPUT_DIM, OUTPUT_DIM};

/// Singular values below this threshold are treated as zero when solving.
const SOLVE_EPS: f64 = 1e-10;

/// Fit parameters: basis size, kernel bandwidths, ridge coefficient.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Number of basis points to draw (with replacement) from the samples.
    pub num_basis: usize,
    /// Per-dimension kernel bandwidths.
    pub bandwidth: Bandwidth,
    /// Ridge coefficient λ on the K_mm term.
    pub regularization: f64,
}

impl FitConfig {
    /// Create a config with the default ridge coefficient (1e-5).
    pub fn new(num_basis: usize, bandwidth: Bandwidth) -> Self {
        Self {
            num_basis,
            bandwidth,
            regularization: 1e-5,
        }
    }

    /// Set the ridge coefficient.
    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }
}

/// A fitted kernel-ridge transition model.
///
/// Holds the drawn basis points, one weight column per output dimension,
/// and the bandwidths used at fit time. All of it is immutable after
/// [`fit`](Self::fit); refitting produces a new model.
#[derive(Debug, Clone)]
pub struct KernelModel {
    basis: Vec<[f64; INPUT_DIM]>,
    alpha: DMatrix<f64>,
    bandwidth: Bandwidth,
}

impl KernelModel {
    /// Fit weights to transition samples.
    ///
    /// `x` is N×5 (state + action per row), `y` is N×4 (state delta per
    /// row). Basis indices come from the caller's generator, so a seeded
    /// generator makes the fit reproducible.
    ///
    /// # Errors
    ///
    /// Fails fast on wrong column counts, mismatched row counts, an empty
    /// training set, `num_basis` of zero or exceeding N, or a negative
    /// ridge coefficient. Rank deficiency of the normal equations is not
    /// an error; it degrades to the minimum-norm solution (with a
    /// warning).
    pub fn fit<R: Rng + ?Sized>(
        x: &DMatrix<f64>,
        y: &DMatrix<f64>,
        config: &FitConfig,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        if x.ncols() != INPUT_DIM {
            return Err(ModelError::WrongColumns {
                got: x.ncols(),
                expected: INPUT_DIM,
            });
        }
        if y.ncols() != OUTPUT_DIM {
            return Err(ModelError::WrongColumns {
                got: y.ncols(),
                expected: OUTPUT_DIM,
            });
        }
        if x.nrows() == 0 {
            return Err(ModelError::NoSamples);
        }
        if x.nrows() != y.nrows() {
            return Err(ModelError::RowCountMismatch {
                inputs: x.nrows(),
                targets: y.nrows(),
            });
        }
        if config.num_basis == 0 || config.num_basis > x.nrows() {
            return Err(ModelError::BasisCount {
                requested: config.num_basis,
                available: x.nrows(),
            });
        }
        if !(config.regularization >= 0.0) {
            return Err(ModelError::BadRegularization {
                value: config.regularization,
            });
        }

        // Uniform draw with replacement; duplicates are legal and absorbed
        // by the ridge term below.
        let indices: Vec<usize> = (0..config.num_basis)
            .map(|_| rng.gen_range(0..x.nrows()))
            .collect();
        let basis_matrix = x.select_rows(indices.iter());

        let knm = kernel_matrix(x, &basis_matrix, &config.bandwidth)?;
        let kmm = kernel_matrix(&basis_matrix, &basis_matrix, &config.bandwidth)?;

        let lhs = knm.transpose() * &knm + kmm * config.regularization;
        let rhs = knm.transpose() * y;

        let svd = lhs.svd(true, true);
        let rank = svd.rank(SOLVE_EPS);
        if rank < config.num_basis {
            log::warn!(
                "normal equations are rank {} of {}; using the minimum-norm solution",
                rank,
                config.num_basis
            );
        }
        let alpha = svd
            .solve(&rhs, SOLVE_EPS)
            .map_err(|message| ModelError::SolveFailed {
                message: message.to_string(),
            })?;

        Ok(Self {
            basis: to_rows(&basis_matrix)?,
            alpha,
            bandwidth: config.bandwidth.clone(),
        })
    }

    /// Predicted state delta for a single state-action vector.
    pub fn predict(&self, query: &[f64; INPUT_DIM]) -> [f64; OUTPUT_DIM] {
        let mut delta = [0.0; OUTPUT_DIM];
        for (j, center) in self.basis.iter().enumerate() {
            let k = kernel(query, center, &self.bandwidth);
            for (d, out) in delta.iter_mut().enumerate() {
                *out += k * self.alpha[(j, d)];
            }
        }
        delta
    }

    /// Predicted state deltas for a batch of queries (M×5 in, M×4 out).
    ///
    /// # Errors
    ///
    /// Fails fast if the query matrix does not have 5 columns.
    pub fn predict_batch(&self, queries: &DMatrix<f64>) -> Result<DMatrix<f64>, ModelError> {
        let query_rows = to_rows(queries)?;
        let mut out = DMatrix::zeros(query_rows.len(), OUTPUT_DIM);
        for (i, query) in query_rows.iter().enumerate() {
            let delta = self.predict(query);
            for (d, value) in delta.iter().enumerate() {
                out[(i, d)] = *value;
            }
        }
        Ok(out)
    }

    /// Number of basis points (duplicates counted).
    pub fn num_basis(&self) -> usize {
        self.basis.len()
    }

    /// The basis points drawn at fit time.
    pub fn basis(&self) -> &[[f64; INPUT_DIM]] {
        &self.basis
    }

    /// The weight matrix, one column per output dimension.
    pub fn alpha(&self) -> &DMatrix<f64> {
        &self.alpha
    }

    /// The bandwidths used at fit time.
    pub fn bandwidth(&self) -> &Bandwidth {
        &self.bandwidth
    }
}

/// Per-dimension root-mean-square error between predictions and targets.
///
/// # Errors
///
/// Fails fast on wrong column counts, mismatched row counts, or empty
/// inputs.
pub fn rmse(
    predictions: &DMatrix<f64>,
    targets: &DMatrix<f64>,
) -> Result<[f64; OUTPUT_DIM], ModelError> {
    if predictions.ncols() != OUTPUT_DIM {
        return Err(ModelError::WrongColumns {
            got: predictions.ncols(),
            expected: OUTPUT_DIM,
        });
    }
    if targets.ncols() != OUTPUT_DIM {
        return Err(ModelError::WrongColumns {
            got: targets.ncols(),
            expected: OUTPUT_DIM,
        });
    }
    if predictions.nrows() != targets.nrows() {
        return Err(ModelError::RowCountMismatch {
            inputs: predictions.nrows(),
            targets: targets.nrows(),
        });
    }
    if predictions.nrows() == 0 {
        return Err(ModelError::NoSamples);
    }

    let n = predictions.nrows() as f64;
    let mut out = [0.0; OUTPUT_DIM];
    for (d, value) in out.iter_mut().enumerate() {
        let sum_sq: f64 = (0..predictions.nrows())
            .map(|i| (predictions[(i, d)] - targets[(i, d)]).powi(2))
            .sum();
        *value = (sum_sq / n).sqrt();
    }
    Ok(out)
}
