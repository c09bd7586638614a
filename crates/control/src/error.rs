//! Error types for control-layer operations.

use thiserror::Error;

/// Errors that can occur when building policies or generating data.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// An RBF policy was given mismatched weight and center counts.
    #[error("policy has {weights} weights but {centers} centers")]
    WeightCenterMismatch { weights: usize, centers: usize },

    /// Zero transition samples were requested.
    #[error("requested zero transition samples")]
    ZeroSamples,

    /// The train proportion was outside (0, 1].
    #[error("train proportion is {value}, expected a value in (0, 1]")]
    BadTrainProportion { value: f64 },

    /// The requested split leaves the training half empty.
    #[error("{samples} samples at proportion {proportion} leave the training split empty")]
    EmptyTrainingSplit { samples: usize, proportion: f64 },
}
