//! Error types for model construction and prediction.

use thiserror::Error;

/// Errors that can occur when building or querying the transition model.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// A bandwidth component was zero, negative, or NaN.
    #[error("bandwidth component {index} is {value}, expected a positive value")]
    BandwidthNotPositive { index: usize, value: f64 },

    /// A matrix did not have the required number of columns.
    #[error("matrix has {got} columns, expected {expected}")]
    WrongColumns { got: usize, expected: usize },

    /// Input and target matrices disagree on the number of samples.
    #[error("input matrix has {inputs} rows but target matrix has {targets}")]
    RowCountMismatch { inputs: usize, targets: usize },

    /// A sample matrix contained no rows.
    #[error("no samples provided")]
    NoSamples,

    /// The requested basis size cannot be drawn from the training set.
    #[error("requested {requested} basis points from {available} training samples")]
    BasisCount { requested: usize, available: usize },

    /// The regularization coefficient was negative or NaN.
    #[error("regularization is {value}, expected a non-negative value")]
    BadRegularization { value: f64 },

    /// The least-squares solve reported failure.
    #[error("least-squares solve failed: {message}")]
    SolveFailed { message: String },
}
