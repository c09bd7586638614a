//! # Cart-Pole Transition Model
//!
//! Kernel-ridge regression for approximating a state-transition function.
//! Inputs are five-component vectors (a four-dimensional state plus a
//! scalar action); outputs are the four-component state deltas one step
//! later.
//!
//! ## Core Components
//!
//! - [`kernel()`]: squared-exponential kernel with per-dimension
//!   bandwidths and a periodic treatment of the angle dimension
//! - [`Bandwidth`]: validated bandwidth vector (every component positive)
//! - [`KernelModel`]: basis selection, Gram matrices, regularized
//!   least-squares fit, and single/batch prediction
//!
//! ## Example
//!
//! ```rust
//! use cartpole_model::{Bandwidth, FitConfig, KernelModel};
//! use nalgebra::DMatrix;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // Eight transitions of a trivial system: every delta is zero.
//! let x = DMatrix::from_fn(8, 5, |i, j| (i * 5 + j) as f64 * 0.1);
//! let y = DMatrix::zeros(8, 4);
//!
//! let config = FitConfig::new(8, Bandwidth::uniform(1.0).unwrap());
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let model = KernelModel::fit(&x, &y, &config, &mut rng).unwrap();
//!
//! let delta = model.predict(&[0.0, 0.1, 0.2, 0.3, 0.4]);
//! assert!(delta.iter().all(|d| d.abs() < 1e-6));
//! ```
//!
//! The fitted weights and basis points are immutable after [`KernelModel::fit`];
//! a model can be shared read-only across threads for concurrent prediction.

mod error;
pub mod kernel;
pub mod regression;

pub use error::ModelError;
pub use kernel::{kernel, kernel_matrix, Bandwidth, ANGLE_INDEX, INPUT_DIM, OUTPUT_DIM};
pub use regression::{rmse, FitConfig, KernelModel};
